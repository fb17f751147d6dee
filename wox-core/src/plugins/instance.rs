//! PluginInstance - one loaded, running plugin

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use wox_plugin_api::{GLOBAL_TRIGGER_KEYWORD, Metadata, Plugin};

use super::host::PluginHost;

/// User-facing switches every plugin has, regardless of runtime
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommonSetting {
    /// Disabled plugins stay loaded but answer no queries
    #[serde(default)]
    pub disabled: bool,
    /// User override of the declared trigger keywords
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_keywords: Option<Vec<String>>,
}

/// Everything the settings store keeps for one plugin
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PluginSetting {
    #[serde(default)]
    pub common: CommonSetting,
    /// Plugin-defined key/value settings
    #[serde(default)]
    pub values: BTreeMap<String, String>,
}

/// Monotonic timestamps of a plugin's load and init phases
#[derive(Debug, Clone, Copy, Default)]
pub struct LifecycleTimestamps {
    pub load_start: Option<Instant>,
    pub load_finish: Option<Instant>,
    pub init_start: Option<Instant>,
    pub init_finish: Option<Instant>,
}

impl LifecycleTimestamps {
    pub fn load_time(&self) -> Option<Duration> {
        Some(self.load_finish?.saturating_duration_since(self.load_start?))
    }

    pub fn init_time(&self) -> Option<Duration> {
        Some(self.init_finish?.saturating_duration_since(self.init_start?))
    }
}

/// A loaded plugin with its runtime state
///
/// Created by the loader once the plugin's host has it running. The instance
/// owns its mutable state (settings, timestamps, lifecycle flags); other
/// components only change it through the methods below.
pub struct PluginInstance {
    metadata: Arc<Metadata>,
    plugin: Arc<dyn Plugin>,
    host: Arc<dyn PluginHost>,
    setting: RwLock<PluginSetting>,
    timestamps: Mutex<LifecycleTimestamps>,
    init_started: AtomicBool,
    initialized: AtomicBool,
    unloaded: AtomicBool,
    unload_signal: CancellationToken,
}

impl PluginInstance {
    /// Create an instance whose load began at `load_started` and finished now
    pub fn new(
        metadata: Arc<Metadata>,
        plugin: Arc<dyn Plugin>,
        host: Arc<dyn PluginHost>,
        setting: PluginSetting,
        load_started: Instant,
    ) -> Self {
        Self {
            metadata,
            plugin,
            host,
            setting: RwLock::new(setting),
            timestamps: Mutex::new(LifecycleTimestamps {
                load_start: Some(load_started),
                load_finish: Some(Instant::now()),
                ..Default::default()
            }),
            init_started: AtomicBool::new(false),
            initialized: AtomicBool::new(false),
            unloaded: AtomicBool::new(false),
            unload_signal: CancellationToken::new(),
        }
    }

    pub fn metadata(&self) -> &Arc<Metadata> {
        &self.metadata
    }

    pub fn plugin(&self) -> &Arc<dyn Plugin> {
        &self.plugin
    }

    pub fn host(&self) -> &Arc<dyn PluginHost> {
        &self.host
    }

    pub fn id(&self) -> &str {
        &self.metadata.id
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    // ─── Settings ────────────────────────────────────────────────────

    /// Snapshot of the plugin's current settings
    pub fn setting(&self) -> PluginSetting {
        self.setting.read().clone()
    }

    pub fn is_disabled(&self) -> bool {
        self.setting.read().common.disabled
    }

    pub fn set_disabled(&self, disabled: bool) {
        self.setting.write().common.disabled = disabled;
    }

    /// Trigger keywords in effect: the user's override, else the declared set
    pub fn trigger_keywords(&self) -> Vec<String> {
        self.setting
            .read()
            .common
            .trigger_keywords
            .clone()
            .unwrap_or_else(|| self.metadata.trigger_keywords.clone())
    }

    pub fn set_trigger_keywords(&self, keywords: Vec<String>) {
        self.setting.write().common.trigger_keywords = Some(keywords);
    }

    /// Whether the effective trigger keywords contain the global `*`
    pub fn has_global_trigger_keyword(&self) -> bool {
        let setting = self.setting.read();
        let effective = setting
            .common
            .trigger_keywords
            .as_ref()
            .unwrap_or(&self.metadata.trigger_keywords);
        effective.iter().any(|k| k == GLOBAL_TRIGGER_KEYWORD)
    }

    pub fn setting_value(&self, key: &str) -> Option<String> {
        self.setting.read().values.get(key).cloned()
    }

    pub fn set_setting_value(&self, key: &str, value: &str) {
        self.setting
            .write()
            .values
            .insert(key.to_string(), value.to_string());
    }

    // ─── Lifecycle ───────────────────────────────────────────────────

    pub fn timestamps(&self) -> LifecycleTimestamps {
        *self.timestamps.lock()
    }

    pub fn load_time(&self) -> Option<Duration> {
        self.timestamps().load_time()
    }

    pub fn init_time(&self) -> Option<Duration> {
        self.timestamps().init_time()
    }

    /// Claim the single init attempt. Returns `false` if it was already claimed.
    pub(crate) fn begin_init(&self) -> bool {
        !self.init_started.swap(true, Ordering::AcqRel)
    }

    pub(crate) fn record_init_start(&self) {
        self.timestamps.lock().init_start = Some(Instant::now());
    }

    pub(crate) fn record_init_finish(&self) {
        self.timestamps.lock().init_finish = Some(Instant::now());
        self.initialized.store(true, Ordering::Release);
    }

    /// Init has completed successfully
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// Mark the instance unloaded. Returns `false` if it already was.
    pub(crate) fn mark_unloaded(&self) -> bool {
        let first = !self.unloaded.swap(true, Ordering::AcqRel);
        if first {
            self.unload_signal.cancel();
        }
        first
    }

    pub fn is_unloaded(&self) -> bool {
        self.unloaded.load(Ordering::Acquire)
    }

    /// Resolves once the instance has been marked unloaded
    pub async fn unloaded(&self) {
        self.unload_signal.cancelled().await
    }
}

impl fmt::Debug for PluginInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginInstance")
            .field("id", &self.metadata.id)
            .field("name", &self.metadata.name)
            .field("runtime", &self.metadata.runtime)
            .field("initialized", &self.is_initialized())
            .field("unloaded", &self.is_unloaded())
            .finish()
    }
}
