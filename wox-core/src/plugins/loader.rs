//! Loader boundary - descriptor parsing and the "plugin loaded" channel
//!
//! Discovery (walking plugin directories, starting host processes) lives
//! outside the engine. What the engine needs from it is small: descriptors
//! that parse, and a stream of ready [`PluginInstance`]s.

use std::sync::Arc;

use tokio::sync::mpsc;
use wox_plugin_api::Metadata;

use super::error::MetadataError;
use super::instance::PluginInstance;

/// Sending half the loader emits ready instances on. Never blocks.
pub type PluginLoadedSender = mpsc::UnboundedSender<Arc<PluginInstance>>;

/// Receiving half, consumed by [`PluginManager::listen`](super::PluginManager::listen)
pub type PluginLoadedReceiver = mpsc::UnboundedReceiver<Arc<PluginInstance>>;

/// Create the loader → engine notification channel
pub fn loaded_channel() -> (PluginLoadedSender, PluginLoadedReceiver) {
    mpsc::unbounded_channel()
}

/// Parse and validate a `plugin.json` descriptor
pub fn parse_plugin_metadata(raw: &str) -> Result<Metadata, MetadataError> {
    let metadata: Metadata = serde_json::from_str(raw)?;

    if metadata.id.trim().is_empty() {
        return Err(MetadataError::MissingField("Id"));
    }
    if metadata.name.trim().is_empty() {
        return Err(MetadataError::MissingField("Name"));
    }
    if metadata.trigger_keywords.is_empty() {
        return Err(MetadataError::EmptyTriggerKeywords {
            id: metadata.id.clone(),
        });
    }

    Ok(metadata)
}
