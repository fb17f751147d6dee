use super::types::{
    DEFAULT_LOG_LEVEL, EngineConfig, LogConfig, RawEngineConfig, RawLogConfig, RawSettingsConfig,
    RawWoxConfig, SettingsConfig, WoxConfig,
};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load merged configuration (user + project)
    pub fn load() -> Result<WoxConfig> {
        Self::load_from(&Self::user_config_path(), &Self::project_config_path())
    }

    /// Load and merge the given layers; missing files are skipped
    pub fn load_from(user_path: &Path, project_path: &Path) -> Result<WoxConfig> {
        let mut raw = RawWoxConfig::default();

        // Layer 1: User config
        if let Some(user_config) = Self::read_layer(user_path)? {
            raw = Self::merge_raw(raw, user_config);
        }

        // Layer 2: Project config
        if let Some(project_config) = Self::read_layer(project_path)? {
            raw = Self::merge_raw(raw, project_config);
        }

        Ok(Self::finalize(raw))
    }

    fn read_layer(path: &Path) -> Result<Option<RawWoxConfig>> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = toml::from_str(&contents)
            .with_context(|| format!("Invalid config in {}", path.display()))?;
        Ok(Some(config))
    }

    /// User config path (`~/.config/wox/config.toml`)
    pub fn user_config_path() -> PathBuf {
        wox_paths::user_config_path()
    }

    /// Project config path
    /// Can be overridden with WOX_PROJECT_CONFIG_DIR (isolates e2e tests from the checkout)
    pub fn project_config_path() -> PathBuf {
        if let Ok(dir) = std::env::var("WOX_PROJECT_CONFIG_DIR") {
            PathBuf::from(dir).join("config.toml")
        } else {
            PathBuf::from(".wox/config.toml")
        }
    }

    /// Merge two raw configs (overlay values override base only if explicitly set)
    fn merge_raw(base: RawWoxConfig, overlay: RawWoxConfig) -> RawWoxConfig {
        RawWoxConfig {
            engine: RawEngineConfig {
                init_timeout_ms: overlay.engine.init_timeout_ms.or(base.engine.init_timeout_ms),
                query_timeout_ms: overlay
                    .engine
                    .query_timeout_ms
                    .or(base.engine.query_timeout_ms),
            },
            settings: RawSettingsConfig {
                path: overlay.settings.path.or(base.settings.path),
            },
            log: RawLogConfig {
                level: overlay.log.level.or(base.log.level),
            },
        }
    }

    /// Convert raw config to final config with defaults applied
    fn finalize(raw: RawWoxConfig) -> WoxConfig {
        WoxConfig {
            engine: EngineConfig {
                init_timeout_ms: raw.engine.init_timeout_ms,
                query_timeout_ms: raw.engine.query_timeout_ms,
            },
            settings: SettingsConfig {
                path: raw
                    .settings
                    .path
                    .unwrap_or_else(wox_paths::plugin_settings_path),
            },
            log: LogConfig {
                level: raw
                    .log
                    .level
                    .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            },
        }
    }
}
