//! Host capability - the engine's handle on whatever runs a plugin's code

use std::collections::HashSet;

use async_trait::async_trait;
use parking_lot::Mutex;
use wox_plugin_api::{Metadata, Runtime};

use super::error::HostError;

/// The control surface the engine holds over a plugin's runtime.
///
/// One adapter exists per runtime family (a managed-runtime host process,
/// a script host process, the launcher process itself). The engine never
/// looks past this trait.
#[async_trait]
pub trait PluginHost: Send + Sync {
    /// The runtime this host executes
    fn runtime(&self) -> Runtime;

    /// Release the runtime resources held for `metadata`'s plugin
    async fn unload_plugin(&self, metadata: &Metadata) -> Result<(), HostError>;
}

/// Host for plugins compiled into the launcher process.
///
/// There is no process to stop: unloading just forgets the plugin id.
#[derive(Debug, Default)]
pub struct InProcessHost {
    hosted: Mutex<HashSet<String>>,
}

impl InProcessHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `plugin_id` now runs in this process
    pub fn host(&self, plugin_id: &str) {
        self.hosted.lock().insert(plugin_id.to_string());
    }

    pub fn is_hosting(&self, plugin_id: &str) -> bool {
        self.hosted.lock().contains(plugin_id)
    }

    pub fn hosted_count(&self) -> usize {
        self.hosted.lock().len()
    }
}

#[async_trait]
impl PluginHost for InProcessHost {
    fn runtime(&self) -> Runtime {
        Runtime::Go
    }

    async fn unload_plugin(&self, metadata: &Metadata) -> Result<(), HostError> {
        if self.hosted.lock().remove(&metadata.id) {
            tracing::debug!(plugin = %metadata.name, "In-process plugin released");
            Ok(())
        } else {
            Err(HostError::NotHosted {
                id: metadata.id.clone(),
            })
        }
    }
}
