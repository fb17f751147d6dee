//! PluginInitContext - a plugin's interface to the launcher core

use std::fmt;
use std::sync::Arc;

use crate::error::PluginError;

/// Severity of a message a plugin logs through [`PublicApi::log`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
        };
        f.write_str(s)
    }
}

/// Host API handed to a plugin, bound to that plugin's identity.
///
/// Every call resolves the calling plugin in the core's registry, so it is
/// only usable while the plugin is registered. That includes the plugin's own
/// `init`: the core registers a plugin before initializing it.
pub trait PublicApi: Send + Sync {
    /// Id of the plugin this handle is bound to
    fn plugin_id(&self) -> &str;

    /// Log a message, tagged with the plugin's name
    fn log(&self, level: LogLevel, message: &str);

    /// Read one of the plugin's own settings
    fn get_setting(&self, key: &str) -> Result<Option<String>, PluginError>;

    /// Write one of the plugin's own settings (in memory; the settings store persists it)
    fn save_setting(&self, key: &str, value: &str) -> Result<(), PluginError>;

    /// The trigger keywords currently in effect for the plugin
    fn trigger_keywords(&self) -> Result<Vec<String>, PluginError>;
}

/// Passed to [`Plugin::init`](crate::Plugin::init)
///
/// Cheap to clone; plugins typically keep a copy to use the API later from `query`.
#[derive(Clone)]
pub struct PluginInitContext {
    api: Arc<dyn PublicApi>,
}

impl PluginInitContext {
    pub fn new(api: Arc<dyn PublicApi>) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &Arc<dyn PublicApi> {
        &self.api
    }

    // ─── Logging ─────────────────────────────────────────────────────

    pub fn log_info(&self, message: &str) {
        self.api.log(LogLevel::Info, message);
    }

    pub fn log_warn(&self, message: &str) {
        self.api.log(LogLevel::Warning, message);
    }

    pub fn log_error(&self, message: &str) {
        self.api.log(LogLevel::Error, message);
    }

    pub fn log_debug(&self, message: &str) {
        self.api.log(LogLevel::Debug, message);
    }
}

impl fmt::Debug for PluginInitContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginInitContext")
            .field("plugin_id", &self.api.plugin_id())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingApi {
        logged: Mutex<Vec<(LogLevel, String)>>,
    }

    impl PublicApi for RecordingApi {
        fn plugin_id(&self) -> &str {
            "recording"
        }

        fn log(&self, level: LogLevel, message: &str) {
            self.logged.lock().unwrap().push((level, message.to_string()));
        }

        fn get_setting(&self, _key: &str) -> Result<Option<String>, PluginError> {
            Ok(None)
        }

        fn save_setting(&self, _key: &str, _value: &str) -> Result<(), PluginError> {
            Ok(())
        }

        fn trigger_keywords(&self) -> Result<Vec<String>, PluginError> {
            Ok(vec!["*".to_string()])
        }
    }

    #[test]
    fn test_context_logging_goes_through_api() {
        let api = Arc::new(RecordingApi::default());
        let ctx = PluginInitContext::new(api.clone());

        ctx.log_info("hello");
        ctx.log_warn("careful");
        ctx.log_error("broken");
        ctx.log_debug("details");

        let logged = api.logged.lock().unwrap();
        assert_eq!(logged.len(), 4);
        assert_eq!(logged[0], (LogLevel::Info, "hello".to_string()));
        assert_eq!(logged[1].0, LogLevel::Warning);
        assert_eq!(logged[2].0, LogLevel::Error);
        assert_eq!(logged[3].0, LogLevel::Debug);
    }

    #[test]
    fn test_context_debug_shows_plugin_id() {
        let ctx = PluginInitContext::new(Arc::new(RecordingApi::default()));
        assert!(format!("{:?}", ctx).contains("recording"));
    }

    #[test]
    fn test_log_level_display() {
        assert_eq!(LogLevel::Warning.to_string(), "warning");
        assert_eq!(LogLevel::Debug.to_string(), "debug");
    }
}
