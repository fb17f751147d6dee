//! wox-core: plugin engine for the wox launcher
//!
//! Turns independently written plugins, whatever runtime hosts them, into a
//! uniform set of queryable, lifecycle-managed instances. See [`plugins`].

pub mod plugins;

pub use plugins::{
    PluginEvent, PluginInstance, PluginManager, PluginManagerConfig, PluginQueryResult,
    PluginRegistry,
};
pub use wox_plugin_api as api;
