//! wox-plugin-api - Plugin API for the wox launcher
//!
//! This crate provides the traits and types shared by plugins and the launcher
//! core. Whatever runtime actually executes a plugin (a managed-runtime host,
//! a script host, or the launcher process itself), the core talks to it
//! through the [`Plugin`] trait defined here.
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//! use wox_plugin_api::{Plugin, PluginError, PluginInitContext, Query, WoxResult};
//!
//! pub struct HelloPlugin;
//!
//! #[async_trait]
//! impl Plugin for HelloPlugin {
//!     async fn init(&self, ctx: PluginInitContext) -> Result<(), PluginError> {
//!         ctx.log_info("Hello plugin loaded!");
//!         Ok(())
//!     }
//!
//!     async fn query(&self, query: &Query) -> Result<Vec<WoxResult>, PluginError> {
//!         Ok(vec![WoxResult::new(format!("Hello, {}", query.search))])
//!     }
//! }
//! ```

use async_trait::async_trait;

pub mod context;
pub mod error;
pub mod result;
pub mod types;

pub use context::{LogLevel, PluginInitContext, PublicApi};
pub use error::PluginError;
pub use result::*;
pub use types::*;

/// The query surface of a running plugin - implement this to create a wox plugin.
///
/// Methods take `&self`: the core queries one plugin from several tasks at
/// once, so plugins keep mutable state behind their own synchronization.
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Called exactly once, after the plugin is registered with the core.
    ///
    /// Returning an error (or panicking) gets the plugin unloaded.
    async fn init(&self, ctx: PluginInitContext) -> Result<(), PluginError>;

    /// Answer a query whose trigger keyword matched this plugin.
    ///
    /// Errors are logged and treated as "no results"; they never unload the plugin.
    async fn query(&self, query: &Query) -> Result<Vec<WoxResult>, PluginError>;
}
