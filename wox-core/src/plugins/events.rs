//! Lifecycle events published by the plugin manager
//!
//! Subscribers (a settings window, a notification toast) learn which plugin
//! came up, which failed and why, and which went away.

use std::time::Duration;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PluginEvent {
    /// A plugin finished init and is answering queries
    Initialized {
        plugin_id: String,
        name: String,
        load_time: Option<Duration>,
        init_time: Option<Duration>,
    },
    /// A plugin's init failed; it is about to be unloaded
    InitFailed {
        plugin_id: String,
        name: String,
        website: String,
        error: String,
    },
    /// A plugin was removed from the registry
    Unloaded {
        plugin_id: String,
        name: String,
        reason: String,
    },
}

impl PluginEvent {
    pub fn plugin_id(&self) -> &str {
        match self {
            PluginEvent::Initialized { plugin_id, .. }
            | PluginEvent::InitFailed { plugin_id, .. }
            | PluginEvent::Unloaded { plugin_id, .. } => plugin_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = PluginEvent::Unloaded {
            plugin_id: "p3".to_string(),
            name: "Broken".to_string(),
            reason: "failed to init".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "unloaded");
        assert_eq!(json["reason"], "failed to init");
        assert_eq!(event.plugin_id(), "p3");
    }
}
