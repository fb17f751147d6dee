//! PluginApi - the host API handed to each plugin at init

use std::sync::{Arc, Weak};

use wox_plugin_api::{LogLevel, PluginError, PublicApi};

use super::instance::PluginInstance;
use super::registry::PluginRegistry;

/// [`PublicApi`] bound to one plugin instance.
///
/// Holds the instance and the registry weakly: plugins usually keep their
/// init context, and the registry owns the plugin, so strong references
/// would be a cycle. Calls fail once the instance leaves the registry.
pub struct PluginApi {
    plugin_id: String,
    plugin_name: String,
    instance: Weak<PluginInstance>,
    registry: Weak<PluginRegistry>,
}

impl PluginApi {
    pub fn new(instance: &Arc<PluginInstance>, registry: &Arc<PluginRegistry>) -> Self {
        Self {
            plugin_id: instance.id().to_string(),
            plugin_name: instance.name().to_string(),
            instance: Arc::downgrade(instance),
            registry: Arc::downgrade(registry),
        }
    }

    fn resolve(&self) -> Result<Arc<PluginInstance>, PluginError> {
        let registry = self.registry.upgrade();
        self.instance
            .upgrade()
            .filter(|instance| registry.is_some_and(|registry| registry.contains(instance)))
            .ok_or_else(|| PluginError::NotRegistered(self.plugin_id.clone()))
    }
}

impl PublicApi for PluginApi {
    fn plugin_id(&self) -> &str {
        &self.plugin_id
    }

    fn log(&self, level: LogLevel, message: &str) {
        let plugin = self.plugin_name.as_str();
        match level {
            LogLevel::Debug => tracing::debug!(plugin = %plugin, "{}", message),
            LogLevel::Info => tracing::info!(plugin = %plugin, "{}", message),
            LogLevel::Warning => tracing::warn!(plugin = %plugin, "{}", message),
            LogLevel::Error => tracing::error!(plugin = %plugin, "{}", message),
        }
    }

    fn get_setting(&self, key: &str) -> Result<Option<String>, PluginError> {
        Ok(self.resolve()?.setting_value(key))
    }

    fn save_setting(&self, key: &str, value: &str) -> Result<(), PluginError> {
        self.resolve()?.set_setting_value(key, value);
        Ok(())
    }

    fn trigger_keywords(&self) -> Result<Vec<String>, PluginError> {
        Ok(self.resolve()?.trigger_keywords())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::instance::tests::instance_with_keywords;

    #[test]
    fn test_api_resolves_registered_plugin() {
        let registry = Arc::new(PluginRegistry::new());
        let instance = Arc::new(instance_with_keywords("calc", &["calc"]));
        registry.add(Arc::clone(&instance));

        let api = PluginApi::new(&instance, &registry);
        assert_eq!(api.plugin_id(), "calc");
        assert_eq!(api.trigger_keywords().unwrap(), vec!["calc"]);

        api.save_setting("precision", "2").unwrap();
        assert_eq!(api.get_setting("precision").unwrap(), Some("2".into()));
        assert_eq!(instance.setting_value("precision"), Some("2".into()));
    }

    #[test]
    fn test_api_fails_for_unregistered_plugin() {
        let registry = Arc::new(PluginRegistry::new());
        let instance = Arc::new(instance_with_keywords("ghost", &["g"]));
        let api = PluginApi::new(&instance, &registry);

        assert!(matches!(
            api.get_setting("anything"),
            Err(PluginError::NotRegistered(id)) if id == "ghost"
        ));
        assert!(api.save_setting("k", "v").is_err());
    }

    #[test]
    fn test_api_fails_once_removed_or_registry_dropped() {
        let registry = Arc::new(PluginRegistry::new());
        let instance = Arc::new(instance_with_keywords("calc", &["calc"]));
        registry.add(Arc::clone(&instance));
        let api = PluginApi::new(&instance, &registry);

        registry.remove(&instance);
        assert!(api.trigger_keywords().is_err());

        registry.add(Arc::clone(&instance));
        assert!(api.trigger_keywords().is_ok());
        drop(registry);
        assert!(api.trigger_keywords().is_err());
    }

    #[test]
    fn test_duplicate_ids_keep_settings_apart() {
        let registry = Arc::new(PluginRegistry::new());
        let first = Arc::new(instance_with_keywords("dup", &["d"]));
        let second = Arc::new(instance_with_keywords("dup", &["d"]));
        registry.add(Arc::clone(&first));
        registry.add(Arc::clone(&second));

        PluginApi::new(&second, &registry)
            .save_setting("precision", "3")
            .unwrap();

        assert_eq!(second.setting_value("precision"), Some("3".into()));
        assert_eq!(first.setting_value("precision"), None);
    }
}
