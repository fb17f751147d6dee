//! Plugin engine error types

use thiserror::Error;
use wox_plugin_api::PluginError;

/// Failures the engine records at a plugin boundary.
///
/// These never escape the engine: they are logged, published as
/// [`PluginEvent`](super::PluginEvent)s and resolved locally (unload on init
/// failure, empty results on query failure).
#[derive(Error, Debug)]
pub enum PluginManagerError {
    /// A plugin's init entry point failed
    #[error("Plugin '{name}' ({id}) failed to init: {source}")]
    InitFailed {
        id: String,
        name: String,
        website: String,
        #[source]
        source: PluginError,
    },

    /// A plugin's query entry point failed
    #[error("Plugin '{name}' ({id}) query ({query}) failed: {source}")]
    QueryFailed {
        id: String,
        name: String,
        query: String,
        #[source]
        source: PluginError,
    },
}

/// Errors a host capability reports when releasing a plugin
#[derive(Error, Debug)]
pub enum HostError {
    /// The host has no record of the plugin
    #[error("Plugin '{id}' is not hosted here")]
    NotHosted { id: String },

    /// The host could not release the plugin's runtime resources
    #[error("Failed to release plugin '{id}': {message}")]
    Release { id: String, message: String },

    /// The host panicked while releasing the plugin
    #[error("Host panicked while unloading plugin '{id}'")]
    Panicked { id: String },
}

/// Errors from parsing a plugin descriptor
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Invalid plugin metadata: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Plugin metadata is missing required field '{0}'")]
    MissingField(&'static str),

    #[error("Plugin '{id}' declares no trigger keywords")]
    EmptyTriggerKeywords { id: String },
}

/// Errors from the plugin settings store
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse plugin settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize plugin settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}
