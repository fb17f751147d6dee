//! XDG Base Directory paths for wox.
//!
//! The launcher keeps its config and plugin settings under XDG paths on
//! every platform rather than platform-native locations.

use std::path::{Path, PathBuf};

const APP_DIR: &str = "wox";

/// Get the wox config directory.
///
/// Returns `$XDG_CONFIG_HOME/wox` if set, otherwise `~/.config/wox`.
///
/// # Examples
///
/// ```
/// use wox_paths::config_dir;
///
/// let config = config_dir();
/// assert!(config.ends_with("wox"));
/// ```
pub fn config_dir() -> PathBuf {
    resolve(
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        dirs::home_dir(),
        ".config",
    )
}

/// Get the wox data directory.
///
/// Returns `$XDG_DATA_HOME/wox` if set, otherwise `~/.local/share/wox`.
pub fn data_dir() -> PathBuf {
    resolve(
        std::env::var_os("XDG_DATA_HOME").map(PathBuf::from),
        dirs::home_dir(),
        ".local/share",
    )
}

/// User config file: `<config_dir>/config.toml`
pub fn user_config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Persisted per-plugin settings: `<config_dir>/plugin_settings.toml`
pub fn plugin_settings_path() -> PathBuf {
    config_dir().join("plugin_settings.toml")
}

/// Where installed plugins live: `<data_dir>/plugins`
pub fn plugins_dir() -> PathBuf {
    data_dir().join("plugins")
}

fn resolve(xdg: Option<PathBuf>, home: Option<PathBuf>, home_relative: &str) -> PathBuf {
    match (xdg.filter(|p| p.is_absolute()), home) {
        (Some(base), _) => base.join(APP_DIR),
        (None, Some(home)) => home.join(home_relative).join(APP_DIR),
        (None, None) => Path::new(home_relative).join(APP_DIR),
    }
}
