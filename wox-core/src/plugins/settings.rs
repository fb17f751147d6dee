//! Plugin settings store - persisted per-plugin settings

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::error::SettingsError;
use super::instance::{PluginInstance, PluginSetting};

/// Settings for every known plugin, keyed by plugin id
///
/// Stored as TOML in `~/.config/wox/plugin_settings.toml`:
///
/// ```toml
/// [plugins.calculator.common]
/// disabled = false
/// trigger_keywords = ["calc", "*"]
///
/// [plugins.calculator.values]
/// precision = "4"
/// ```
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginSettingStore {
    #[serde(default)]
    pub plugins: BTreeMap<String, PluginSetting>,
}

impl PluginSettingStore {
    /// Default location of the store file
    pub fn default_path() -> PathBuf {
        wox_paths::plugin_settings_path()
    }

    /// Load the store from a TOML file
    ///
    /// Returns an empty store if the file doesn't exist.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Save the store to a TOML file
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent().filter(|p| !p.exists()) {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Settings for `plugin_id`, defaulted when none were saved
    pub fn setting_for(&self, plugin_id: &str) -> PluginSetting {
        self.plugins.get(plugin_id).cloned().unwrap_or_default()
    }

    /// Capture an instance's current settings. Returns whether the store changed.
    ///
    /// A plugin still on default settings gets no entry.
    pub fn update_from(&mut self, instance: &PluginInstance) -> bool {
        let setting = instance.setting();
        match self.plugins.get(instance.id()) {
            Some(saved) if *saved == setting => false,
            None if setting == PluginSetting::default() => false,
            _ => {
                self.plugins.insert(instance.id().to_string(), setting);
                true
            }
        }
    }

    pub fn set(&mut self, plugin_id: &str, setting: PluginSetting) {
        self.plugins.insert(plugin_id.to_string(), setting);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::instance::tests::instance_with_keywords;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file() {
        let store = PluginSettingStore::load(Path::new("/nonexistent/wox/settings.toml")).unwrap();
        assert!(store.plugins.is_empty());
    }

    #[test]
    fn test_default_path_is_under_wox_config() {
        assert!(PluginSettingStore::default_path().ends_with("wox/plugin_settings.toml"));
    }

    #[test]
    fn test_unknown_plugin_gets_default_setting() {
        let store = PluginSettingStore::default();
        let setting = store.setting_for("calc");
        assert!(!setting.common.disabled);
        assert!(setting.common.trigger_keywords.is_none());
        assert!(setting.values.is_empty());
    }

    #[test]
    fn test_save_load_keeps_overrides() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plugin_settings.toml");

        let instance = instance_with_keywords("calc", &["calc"]);
        instance.set_disabled(true);
        instance.set_trigger_keywords(vec!["math".to_string(), "*".to_string()]);
        instance.set_setting_value("precision", "4");

        let mut store = PluginSettingStore::default();
        assert!(store.update_from(&instance));
        store.save(&path).unwrap();

        let loaded = PluginSettingStore::load(&path).unwrap();
        let setting = loaded.setting_for("calc");
        assert!(setting.common.disabled);
        assert_eq!(
            setting.common.trigger_keywords,
            Some(vec!["math".to_string(), "*".to_string()])
        );
        assert_eq!(setting.values.get("precision").map(String::as_str), Some("4"));
    }

    #[test]
    fn test_update_from_reports_changes_only() {
        let instance = instance_with_keywords("calc", &["calc"]);
        let mut store = PluginSettingStore::default();

        assert!(!store.update_from(&instance));
        assert!(store.plugins.is_empty());

        instance.set_setting_value("precision", "2");
        assert!(store.update_from(&instance));
        assert!(!store.update_from(&instance));

        instance.set_setting_value("precision", "3");
        assert!(store.update_from(&instance));
        assert_eq!(
            store.setting_for("calc").values.get("precision").map(String::as_str),
            Some("3")
        );
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/wox/plugin_settings.toml");

        PluginSettingStore::default().save(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_parse_hand_written_file() {
        let content = r#"
[plugins.wpm.common]
disabled = true

[plugins.calculator.common]
trigger_keywords = ["="]
"#;
        let store: PluginSettingStore = toml::from_str(content).unwrap();
        assert!(store.setting_for("wpm").common.disabled);
        assert_eq!(
            store.setting_for("calculator").common.trigger_keywords,
            Some(vec!["=".to_string()])
        );
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plugin_settings.toml");
        std::fs::write(&path, "plugins = [").unwrap();

        assert!(matches!(
            PluginSettingStore::load(&path),
            Err(SettingsError::Parse(_))
        ));
    }
}
