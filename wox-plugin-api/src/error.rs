//! Error types for plugin authors

use std::time::Duration;

use thiserror::Error;

/// Errors that plugins (and the host API handed to them) can return
#[derive(Error, Debug)]
pub enum PluginError {
    /// Initialization failed
    #[error("Init failed: {0}")]
    Init(String),

    /// A query could not be answered
    #[error("Query failed: {0}")]
    Query(String),

    /// The calling plugin is not (or no longer) registered with the host
    #[error("Plugin '{0}' is not registered")]
    NotRegistered(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The call did not complete within the configured deadline
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    /// The plugin panicked while handling the call
    #[error("Plugin panicked: {0}")]
    Panicked(String),
}

impl PluginError {
    /// Create an init error
    pub fn init(message: impl Into<String>) -> Self {
        Self::Init(message.into())
    }

    /// Create a query error
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query(message.into())
    }
}
