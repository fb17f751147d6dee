pub mod metadata;
pub mod plugin;
pub mod query;

use std::sync::Arc;

use anyhow::Result;
use wox_core::PluginManager;
use wox_core::plugins::{InProcessHost, PluginSettingStore};

use crate::builtin;
use crate::config::WoxConfig;

/// Start an engine with the built-in plugins loaded and initialized
pub async fn start_engine(config: &WoxConfig) -> Result<PluginManager> {
    let settings = PluginSettingStore::load(&config.settings.path)?;
    let manager = PluginManager::new(config.manager_config());
    let host = Arc::new(InProcessHost::new());

    let loaded = builtin::load_builtin_plugins(&host, &settings);
    manager.listen(loaded).await?;
    manager.wait_for_initialization().await;

    tracing::debug!(plugins = manager.registry().len(), "Engine ready");
    Ok(manager)
}

/// Unload every plugin, then persist settings the plugins changed while running
pub async fn stop_engine(manager: &PluginManager, config: &WoxConfig) -> Result<()> {
    let plugins = manager.registry().list_all();
    manager.shutdown().await;

    let path = &config.settings.path;
    let mut store = PluginSettingStore::load(path)?;
    let mut changed = false;
    for instance in plugins.iter() {
        changed |= store.update_from(instance);
    }
    if changed {
        store.save(path)?;
        tracing::debug!(path = %path.display(), "Saved plugin settings");
    }
    Ok(())
}

/// Render an optional duration as milliseconds
pub fn format_millis(duration: Option<std::time::Duration>) -> String {
    match duration {
        Some(d) => format!("{}ms", d.as_millis()),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::calculator::{PLUGIN_ID, PRECISION_SETTING};
    use tempfile::TempDir;
    use wox_plugin_api::Query;

    fn config_in(dir: &TempDir) -> WoxConfig {
        let mut config = WoxConfig::default();
        config.settings.path = dir.path().join("plugin_settings.toml");
        config
    }

    #[tokio::test]
    async fn test_saved_plugin_setting_survives_restart() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);

        let manager = start_engine(&config).await.unwrap();
        let calculator = manager.registry().find(PLUGIN_ID).unwrap();
        calculator.set_setting_value(PRECISION_SETTING, "2");
        stop_engine(&manager, &config).await.unwrap();

        let store = PluginSettingStore::load(&config.settings.path).unwrap();
        assert_eq!(
            store.setting_for(PLUGIN_ID).values.get(PRECISION_SETTING).map(String::as_str),
            Some("2")
        );

        let manager = start_engine(&config).await.unwrap();
        let results = manager.query(Query::global("1/3")).await;
        assert_eq!(results[0].result.title, "0.33");
        stop_engine(&manager, &config).await.unwrap();
    }

    #[tokio::test]
    async fn test_untouched_settings_are_not_written() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);

        let manager = start_engine(&config).await.unwrap();
        stop_engine(&manager, &config).await.unwrap();

        assert!(manager.registry().is_empty());
        assert!(!config.settings.path.exists());
    }

    #[test]
    fn test_format_millis() {
        assert_eq!(format_millis(Some(std::time::Duration::from_millis(12))), "12ms");
        assert_eq!(format_millis(None), "-");
    }
}
