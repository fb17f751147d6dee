//! Plugin lifecycle and query dispatch
//!
//! - [`PluginManager`]: registers loaded plugins, initializes each exactly
//!   once, fans queries out to eligible plugins and unloads broken ones
//! - [`PluginRegistry`]: the live, copy-on-write set of active instances
//! - [`PluginInstance`]: one loaded plugin with its settings and timestamps
//! - [`PluginHost`]: the unload capability of whatever runs a plugin's code
//! - [`PluginSettingStore`]: per-plugin settings persisted as TOML
//!
//! # Example
//!
//! ```no_run
//! use wox_core::plugins::{PluginManager, PluginManagerConfig, loaded_channel};
//! use wox_plugin_api::Query;
//!
//! # async fn example() {
//! let manager = PluginManager::new(PluginManagerConfig::default());
//! let (tx, rx) = loaded_channel();
//! manager.listen(rx);
//!
//! // The loader sends ready instances on `tx` ...
//! # drop(tx);
//! manager.wait_for_initialization().await;
//!
//! for result in manager.query(Query::new("calc", "2+2")).await {
//!     println!("{}: {}", result.plugin.name(), result.result.title);
//! }
//! # }
//! ```

mod api;
mod error;
mod events;
mod host;
mod instance;
mod loader;
mod manager;
mod query;
mod registry;
mod settings;

pub use api::PluginApi;
pub use error::{HostError, MetadataError, PluginManagerError, SettingsError};
pub use events::PluginEvent;
pub use host::{InProcessHost, PluginHost};
pub use instance::{CommonSetting, LifecycleTimestamps, PluginInstance, PluginSetting};
pub use loader::{PluginLoadedReceiver, PluginLoadedSender, loaded_channel, parse_plugin_metadata};
pub use manager::{PluginManager, PluginManagerConfig, REASON_INIT_FAILED, REASON_SHUTDOWN};
pub use query::{PluginQueryResult, QueryResultResponse, is_eligible};
pub use registry::{PluginRegistry, PluginSnapshot};
pub use settings::PluginSettingStore;
