use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use wox_core::PluginManagerConfig;

/// Configuration as stored in TOML files (with optional fields for merging)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawWoxConfig {
    #[serde(default)]
    pub engine: RawEngineConfig,

    #[serde(default)]
    pub settings: RawSettingsConfig,

    #[serde(default)]
    pub log: RawLogConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawEngineConfig {
    pub init_timeout_ms: Option<u64>,
    pub query_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawSettingsConfig {
    /// Plugin settings store file
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawLogConfig {
    pub level: Option<String>,
}

/// Final configuration with defaults applied
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WoxConfig {
    pub engine: EngineConfig,
    pub settings: SettingsConfig,
    pub log: LogConfig,
}

/// Plugin engine deadlines; unset means the engine imposes none
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    pub init_timeout_ms: Option<u64>,
    pub query_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: String,
}

/// Default log filter
pub const DEFAULT_LOG_LEVEL: &str = "info";

impl Default for WoxConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            settings: SettingsConfig {
                path: wox_paths::plugin_settings_path(),
            },
            log: LogConfig {
                level: DEFAULT_LOG_LEVEL.to_string(),
            },
        }
    }
}

impl WoxConfig {
    pub fn manager_config(&self) -> PluginManagerConfig {
        PluginManagerConfig {
            init_timeout: self.engine.init_timeout_ms.map(Duration::from_millis),
            query_timeout: self.engine.query_timeout_ms.map(Duration::from_millis),
            ..Default::default()
        }
    }
}
