//! Plugins compiled into the launcher, hosted in-process

pub mod calculator;

use std::sync::Arc;
use std::time::Instant;

use wox_core::plugins::{
    InProcessHost, PluginInstance, PluginLoadedReceiver, PluginSettingStore, loaded_channel,
};
use wox_plugin_api::{Metadata, Plugin};

/// Descriptor and implementation of every built-in plugin
pub fn builtin_plugins() -> Vec<(Metadata, Arc<dyn Plugin>)> {
    vec![(
        calculator::metadata(),
        Arc::new(calculator::CalculatorPlugin::new()) as Arc<dyn Plugin>,
    )]
}

/// Whether `plugin_id` names a built-in plugin
pub fn is_builtin(plugin_id: &str) -> bool {
    builtin_plugins()
        .iter()
        .any(|(metadata, _)| metadata.id == plugin_id)
}

/// Load every built-in plugin into `host` and emit it on a fresh loader channel.
///
/// The sender is dropped once all plugins are queued, so a listener on the
/// returned receiver finishes by itself.
pub fn load_builtin_plugins(
    host: &Arc<InProcessHost>,
    settings: &PluginSettingStore,
) -> PluginLoadedReceiver {
    let (tx, rx) = loaded_channel();

    for (metadata, plugin) in builtin_plugins() {
        let load_started = Instant::now();
        host.host(&metadata.id);
        let setting = settings.setting_for(&metadata.id);
        let instance = PluginInstance::new(
            Arc::new(metadata),
            plugin,
            Arc::clone(host) as _,
            setting,
            load_started,
        );
        if tx.send(Arc::new(instance)).is_err() {
            tracing::warn!("Plugin listener gone, stopping built-in load");
            break;
        }
    }

    rx
}
