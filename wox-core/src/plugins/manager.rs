//! PluginManager - init pipeline, query dispatch and the unload path

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use futures::future::join_all;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};
use wox_plugin_api::{PluginError, PluginInitContext, Query};

use super::api::PluginApi;
use super::error::{HostError, PluginManagerError};
use super::events::PluginEvent;
use super::instance::PluginInstance;
use super::loader::PluginLoadedReceiver;
use super::query::{PluginQueryResult, is_eligible};
use super::registry::PluginRegistry;

/// Unload reason used when a plugin's init fails
pub const REASON_INIT_FAILED: &str = "failed to init";

/// Unload reason used by [`PluginManager::shutdown`]
pub const REASON_SHUTDOWN: &str = "shutting down";

/// Configuration for the plugin manager
#[derive(Debug, Clone)]
pub struct PluginManagerConfig {
    /// Deadline for a plugin's init call. `None` leaves it to the host.
    pub init_timeout: Option<Duration>,
    /// Deadline for a single plugin's query call. `None` leaves it to the host.
    pub query_timeout: Option<Duration>,
    /// Capacity of the lifecycle event channel
    pub event_capacity: usize,
}

impl Default for PluginManagerConfig {
    fn default() -> Self {
        Self {
            init_timeout: None,
            query_timeout: None,
            event_capacity: 64,
        }
    }
}

/// Owns the plugin registry and drives every plugin through its lifecycle.
///
/// Cloning is cheap; all clones share the same registry, task tracker and
/// event channel. Each manager is independent, so tests can run several
/// side by side.
#[derive(Clone)]
pub struct PluginManager {
    registry: Arc<PluginRegistry>,
    tracker: TaskTracker,
    events: broadcast::Sender<PluginEvent>,
    config: Arc<PluginManagerConfig>,
}

impl PluginManager {
    pub fn new(config: PluginManagerConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        let tracker = TaskTracker::new();
        // Kept closed so `wait` resolves whenever no init task is in flight.
        tracker.close();
        Self {
            registry: Arc::new(PluginRegistry::new()),
            tracker,
            events,
            config: Arc::new(config),
        }
    }

    pub fn registry(&self) -> &Arc<PluginRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &PluginManagerConfig {
        &self.config
    }

    /// Subscribe to lifecycle events
    pub fn subscribe(&self) -> broadcast::Receiver<PluginEvent> {
        self.events.subscribe()
    }

    fn publish(&self, event: PluginEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    // ─── Init pipeline ───────────────────────────────────────────────

    /// Accept a newly loaded plugin.
    ///
    /// Registers the instance, then initializes it on a task of its own; the
    /// caller is never blocked on the plugin. Must be called from within a
    /// tokio runtime.
    pub fn on_plugin_loaded(&self, instance: Arc<PluginInstance>) {
        if !instance.begin_init() {
            warn!(
                plugin = %instance.name(),
                plugin_id = %instance.id(),
                "Plugin instance already initialized, ignoring"
            );
            return;
        }

        if self.registry.find(instance.id()).is_some() {
            warn!(
                plugin = %instance.name(),
                plugin_id = %instance.id(),
                "Another instance with this plugin id is already registered"
            );
        }

        // Registered before init: init may call back into the API, which
        // resolves the plugin through the registry.
        self.registry.add(Arc::clone(&instance));

        let manager = self.clone();
        self.tracker.spawn(async move {
            manager.initialize(instance).await;
        });
    }

    async fn initialize(&self, instance: Arc<PluginInstance>) {
        instance.record_init_start();

        // An unload while init is in flight abandons the call
        let outcome = tokio::select! {
            biased;
            () = instance.unloaded() => None,
            outcome = self.run_init(&instance) => Some(outcome),
        };
        let outcome = match outcome {
            Some(outcome) if !instance.is_unloaded() => outcome,
            _ => {
                debug!(
                    plugin = %instance.name(),
                    plugin_id = %instance.id(),
                    "Plugin unloaded during init, discarding init outcome"
                );
                return;
            }
        };

        match outcome {
            Ok(()) => {
                instance.record_init_finish();
                let load_time = instance.load_time();
                let init_time = instance.init_time();
                info!(
                    plugin = %instance.name(),
                    plugin_id = %instance.id(),
                    load_ms = load_time.map(|d| d.as_millis() as u64),
                    init_ms = init_time.map(|d| d.as_millis() as u64),
                    "Plugin initialized"
                );
                self.publish(PluginEvent::Initialized {
                    plugin_id: instance.id().to_string(),
                    name: instance.name().to_string(),
                    load_time,
                    init_time,
                });
            }
            Err(source) => {
                let metadata = instance.metadata();
                let message = source.to_string();
                let err = PluginManagerError::InitFailed {
                    id: metadata.id.clone(),
                    name: metadata.name.clone(),
                    website: metadata.website.clone(),
                    source,
                };
                error!(
                    plugin = %metadata.name,
                    plugin_id = %metadata.id,
                    website = %metadata.website,
                    error = %err,
                    "Plugin init failed"
                );
                self.publish(PluginEvent::InitFailed {
                    plugin_id: metadata.id.clone(),
                    name: metadata.name.clone(),
                    website: metadata.website.clone(),
                    error: message,
                });
                self.unload_plugin(&instance, REASON_INIT_FAILED).await;
            }
        }
    }

    async fn run_init(&self, instance: &Arc<PluginInstance>) -> Result<(), PluginError> {
        let api = PluginApi::new(instance, &self.registry);
        let ctx = PluginInitContext::new(Arc::new(api));
        let plugin = Arc::clone(instance.plugin());

        guarded(self.config.init_timeout, async move { plugin.init(ctx).await }).await
    }

    /// Resolve once no init task is in flight
    pub async fn wait_for_initialization(&self) {
        self.tracker.wait().await;
    }

    /// Feed every instance the loader emits into [`on_plugin_loaded`](Self::on_plugin_loaded).
    ///
    /// The returned task ends when every sender is dropped.
    pub fn listen(&self, mut loaded: PluginLoadedReceiver) -> JoinHandle<()> {
        let manager = self.clone();
        tokio::spawn(async move {
            while let Some(instance) = loaded.recv().await {
                manager.on_plugin_loaded(instance);
            }
            debug!("Plugin loader channel closed");
        })
    }

    // ─── Query dispatch ──────────────────────────────────────────────

    /// Ask one plugin to answer `query`.
    ///
    /// Never fails: a disabled, uninitialized, unloaded or ineligible plugin
    /// yields nothing, and so does one whose query call errors, panics or
    /// times out. A failed query does not unload the plugin.
    pub async fn query_for_plugin(
        &self,
        instance: &Arc<PluginInstance>,
        query: &Arc<Query>,
    ) -> Vec<PluginQueryResult> {
        if instance.is_disabled() {
            debug!(plugin = %instance.name(), "Plugin disabled, skipping query");
            return Vec::new();
        }
        if instance.is_unloaded() || !instance.is_initialized() {
            debug!(plugin = %instance.name(), "Plugin not ready, skipping query");
            return Vec::new();
        }
        if !is_eligible(instance, query) {
            return Vec::new();
        }

        debug!(plugin = %instance.name(), query = %query, "Querying plugin");

        let plugin = Arc::clone(instance.plugin());
        let invocation = {
            let query = Arc::clone(query);
            async move { plugin.query(&query).await }
        };

        match guarded(self.config.query_timeout, invocation).await {
            Ok(results) => results
                .into_iter()
                .map(|result| PluginQueryResult {
                    result,
                    associated_query: Arc::clone(query),
                    plugin: Arc::clone(instance),
                })
                .collect(),
            Err(source) => {
                let err = PluginManagerError::QueryFailed {
                    id: instance.id().to_string(),
                    name: instance.name().to_string(),
                    query: query.raw_query(),
                    source,
                };
                error!(
                    plugin = %instance.name(),
                    plugin_id = %instance.id(),
                    error = %err,
                    "Plugin query failed"
                );
                Vec::new()
            }
        }
    }

    /// Dispatch `query` to every registered plugin concurrently.
    ///
    /// The result is the union of each plugin's list. Each plugin's results
    /// keep the order it returned them in; the order between plugins is
    /// unspecified.
    pub async fn query(&self, query: Query) -> Vec<PluginQueryResult> {
        let query = Arc::new(query);
        let snapshot = self.registry.list_all();

        let tasks = snapshot.iter().map(|instance| {
            let manager = self.clone();
            let instance = Arc::clone(instance);
            let query = Arc::clone(&query);
            tokio::spawn(async move { manager.query_for_plugin(&instance, &query).await })
        });

        let mut results = Vec::new();
        for joined in join_all(tasks).await {
            match joined {
                Ok(plugin_results) => results.extend(plugin_results),
                Err(e) => error!(error = %e, "Query task failed"),
            }
        }
        results
    }

    // ─── Unload path ─────────────────────────────────────────────────

    /// Remove a plugin and release its runtime resources.
    ///
    /// The instance stops answering queries at once. Host release failures
    /// are logged; removal from the registry happens regardless. Calling this
    /// again for the same instance is harmless.
    pub async fn unload_plugin(&self, instance: &Arc<PluginInstance>, reason: &str) {
        if !instance.mark_unloaded() {
            warn!(
                plugin = %instance.name(),
                plugin_id = %instance.id(),
                reason = %reason,
                "Plugin already unloaded"
            );
            self.registry.remove(instance);
            return;
        }

        let host = Arc::clone(instance.host());
        let metadata = Arc::clone(instance.metadata());
        let release = AssertUnwindSafe(async move { host.unload_plugin(&metadata).await })
            .catch_unwind()
            .await
            .unwrap_or_else(|_| {
                Err(HostError::Panicked {
                    id: instance.id().to_string(),
                })
            });
        if let Err(e) = release {
            error!(
                plugin = %instance.name(),
                plugin_id = %instance.id(),
                error = %e,
                "Failed to release plugin host resources"
            );
        }

        self.registry.remove(instance);

        info!(
            plugin_id = %instance.id(),
            reason = %reason,
            "{} plugin was unloaded because {}",
            instance.name(),
            reason
        );
        self.publish(PluginEvent::Unloaded {
            plugin_id: instance.id().to_string(),
            name: instance.name().to_string(),
            reason: reason.to_string(),
        });
    }

    /// Replace `old` with `new`, e.g. when a dev plugin's files change
    pub async fn reload_plugin(
        &self,
        old: &Arc<PluginInstance>,
        new: Arc<PluginInstance>,
        reason: &str,
    ) {
        self.unload_plugin(old, reason).await;
        self.on_plugin_loaded(new);
    }

    /// Unload every registered plugin
    pub async fn shutdown(&self) {
        let snapshot = self.registry.list_all();
        join_all(
            snapshot
                .iter()
                .map(|instance| self.unload_plugin(instance, REASON_SHUTDOWN)),
        )
        .await;
        // Init tasks of unloaded instances give up, so this cannot hang
        self.wait_for_initialization().await;
        info!(count = snapshot.len(), "Plugin manager shut down");
    }

    // ─── Settings ────────────────────────────────────────────────────

    /// Enable or disable every registered instance of `plugin_id`.
    /// Returns `false` if none is registered.
    pub fn set_disabled(&self, plugin_id: &str, disabled: bool) -> bool {
        self.for_each_with_id(plugin_id, |instance| instance.set_disabled(disabled))
    }

    /// Override the effective trigger keywords of every registered instance
    /// of `plugin_id`. Returns `false` if none is registered.
    pub fn set_trigger_keywords(&self, plugin_id: &str, keywords: Vec<String>) -> bool {
        self.for_each_with_id(plugin_id, |instance| {
            instance.set_trigger_keywords(keywords.clone())
        })
    }

    fn for_each_with_id(&self, plugin_id: &str, apply: impl Fn(&PluginInstance)) -> bool {
        let mut found = false;
        for instance in self.registry.list_all().iter().filter(|i| i.id() == plugin_id) {
            apply(instance.as_ref());
            found = true;
        }
        found
    }
}

impl Default for PluginManager {
    fn default() -> Self {
        Self::new(PluginManagerConfig::default())
    }
}

/// Run a plugin call, turning a panic or an expired deadline into a [`PluginError`]
async fn guarded<T, F>(deadline: Option<Duration>, call: F) -> Result<T, PluginError>
where
    F: Future<Output = Result<T, PluginError>>,
{
    let call = AssertUnwindSafe(call).catch_unwind();
    let outcome = match deadline {
        Some(limit) => tokio::time::timeout(limit, call)
            .await
            .map_err(|_| PluginError::Timeout(limit))?,
        None => call.await,
    };
    outcome.map_err(|payload| PluginError::Panicked(panic_message(payload.as_ref())))?
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::instance::tests::instance_with_keywords;

    #[test]
    fn test_config_defaults_have_no_deadlines() {
        let config = PluginManagerConfig::default();
        assert!(config.init_timeout.is_none());
        assert!(config.query_timeout.is_none());
        assert_eq!(config.event_capacity, 64);
    }

    #[test]
    fn test_panic_message_extraction() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn Any + Send> = Box::new(String::from("owned boom"));
        assert_eq!(panic_message(payload.as_ref()), "owned boom");
        let payload: Box<dyn Any + Send> = Box::new(42u8);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic");
    }

    async fn explode() -> Result<(), PluginError> {
        panic!("plugin blew up")
    }

    #[tokio::test]
    async fn test_guarded_converts_panic() {
        let result = guarded(None, explode()).await;
        assert!(matches!(result, Err(PluginError::Panicked(msg)) if msg == "plugin blew up"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_guarded_enforces_deadline() {
        let result: Result<(), PluginError> = guarded(Some(Duration::from_secs(1)), async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(())
        })
        .await;
        assert!(matches!(result, Err(PluginError::Timeout(d)) if d == Duration::from_secs(1)));
    }

    #[tokio::test]
    async fn test_guarded_passes_through_results() {
        assert_eq!(guarded(None, async { Ok(7) }).await.unwrap(), 7);
        let err = guarded::<(), _>(None, async { Err(PluginError::query("bad")) })
            .await
            .unwrap_err();
        assert!(matches!(err, PluginError::Query(_)));
    }

    #[tokio::test]
    async fn test_loaded_instance_is_registered_and_initialized() {
        let manager = PluginManager::default();
        let instance = Arc::new(instance_with_keywords("calc", &["calc"]));

        manager.on_plugin_loaded(Arc::clone(&instance));
        assert!(manager.registry().contains(&instance));

        manager.wait_for_initialization().await;
        assert!(instance.is_initialized());
        assert!(instance.init_time().is_some());
    }

    #[tokio::test]
    async fn test_second_load_of_same_instance_is_ignored() {
        let manager = PluginManager::default();
        let instance = Arc::new(instance_with_keywords("calc", &["calc"]));

        manager.on_plugin_loaded(Arc::clone(&instance));
        manager.on_plugin_loaded(Arc::clone(&instance));
        manager.wait_for_initialization().await;

        assert_eq!(manager.registry().len(), 1);
    }

    #[tokio::test]
    async fn test_query_skips_uninitialized_instance() {
        let manager = PluginManager::default();
        let instance = Arc::new(instance_with_keywords("calc", &["calc"]));
        manager.registry().add(Arc::clone(&instance));

        let query = Arc::new(Query::new("calc", "1"));
        assert!(manager.query_for_plugin(&instance, &query).await.is_empty());
    }

    #[tokio::test]
    async fn test_set_disabled_by_id() {
        let manager = PluginManager::default();
        let instance = Arc::new(instance_with_keywords("calc", &["calc"]));
        manager.on_plugin_loaded(Arc::clone(&instance));

        assert!(manager.set_disabled("calc", true));
        assert!(instance.is_disabled());
        assert!(!manager.set_disabled("missing", true));

        assert!(manager.set_trigger_keywords("calc", vec!["=".to_string()]));
        assert_eq!(instance.trigger_keywords(), vec!["="]);
        manager.wait_for_initialization().await;
    }

    #[tokio::test]
    async fn test_unload_publishes_event() {
        let manager = PluginManager::default();
        let mut events = manager.subscribe();
        let instance = Arc::new(instance_with_keywords("calc", &["calc"]));
        manager.on_plugin_loaded(Arc::clone(&instance));
        manager.wait_for_initialization().await;

        manager.unload_plugin(&instance, "user request").await;

        let mut saw_unload = false;
        while let Ok(event) = events.try_recv() {
            if let PluginEvent::Unloaded { reason, .. } = event {
                assert_eq!(reason, "user request");
                saw_unload = true;
            }
        }
        assert!(saw_unload);
        assert!(manager.registry().is_empty());
    }

    #[tokio::test]
    async fn test_shutdown_empties_registry() {
        let manager = PluginManager::default();
        for id in ["a", "b", "c"] {
            manager.on_plugin_loaded(Arc::new(instance_with_keywords(id, &["*"])));
        }
        manager.wait_for_initialization().await;
        assert_eq!(manager.registry().len(), 3);

        manager.shutdown().await;
        assert!(manager.registry().is_empty());
    }
}
