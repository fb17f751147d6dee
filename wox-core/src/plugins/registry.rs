//! Plugin registry - the live set of active plugin instances

use std::sync::Arc;

use parking_lot::RwLock;

use super::instance::PluginInstance;

/// A point-in-time view of the registry
pub type PluginSnapshot = Arc<Vec<Arc<PluginInstance>>>;

/// Registry of active plugin instances
///
/// Copy-on-write: readers clone the current `Arc` and iterate it without
/// holding the lock, writers replace the vector. The lock is only held for
/// the pointer swap (or the copy, when a snapshot is still alive), so query
/// fan-out never waits on plugin load/unload churn and vice versa.
///
/// Instances are identified by pointer identity, not by plugin id; the
/// registry itself enforces no uniqueness.
#[derive(Debug, Default)]
pub struct PluginRegistry {
    instances: RwLock<PluginSnapshot>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an instance
    pub fn add(&self, instance: Arc<PluginInstance>) {
        let mut instances = self.instances.write();
        Arc::make_mut(&mut *instances).push(instance);
    }

    /// Remove an instance by identity. Returns `false` if it was not registered.
    pub fn remove(&self, instance: &Arc<PluginInstance>) -> bool {
        let mut instances = self.instances.write();
        if !instances.iter().any(|i| Arc::ptr_eq(i, instance)) {
            return false;
        }
        Arc::make_mut(&mut *instances).retain(|i| !Arc::ptr_eq(i, instance));
        true
    }

    /// Snapshot of all registered instances, in registration order
    pub fn list_all(&self) -> PluginSnapshot {
        Arc::clone(&*self.instances.read())
    }

    /// Whether this exact instance is registered
    pub fn contains(&self, instance: &Arc<PluginInstance>) -> bool {
        self.instances
            .read()
            .iter()
            .any(|i| Arc::ptr_eq(i, instance))
    }

    /// First registered instance with the given plugin id
    pub fn find(&self, plugin_id: &str) -> Option<Arc<PluginInstance>> {
        self.instances
            .read()
            .iter()
            .find(|i| i.id() == plugin_id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.instances.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::instance::tests::instance_with_keywords;

    #[test]
    fn test_registry_default_is_empty() {
        let registry = PluginRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.list_all().is_empty());
    }

    #[test]
    fn test_add_and_find() {
        let registry = PluginRegistry::new();
        let calc = Arc::new(instance_with_keywords("calc", &["calc"]));
        registry.add(Arc::clone(&calc));

        assert_eq!(registry.len(), 1);
        assert!(registry.contains(&calc));
        let found = registry.find("calc").unwrap();
        assert!(Arc::ptr_eq(&found, &calc));
        assert!(registry.find("other").is_none());
    }

    #[test]
    fn test_remove_by_identity() {
        let registry = PluginRegistry::new();
        let first = Arc::new(instance_with_keywords("dup", &["d"]));
        let second = Arc::new(instance_with_keywords("dup", &["d"]));
        registry.add(Arc::clone(&first));
        registry.add(Arc::clone(&second));

        assert!(registry.remove(&first));
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(&second));
        assert!(!registry.contains(&first));
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let registry = PluginRegistry::new();
        let instance = Arc::new(instance_with_keywords("p1", &["p"]));
        assert!(!registry.remove(&instance));

        registry.add(Arc::clone(&instance));
        assert!(registry.remove(&instance));
        assert!(!registry.remove(&instance));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_snapshot_is_unaffected_by_later_writes() {
        let registry = PluginRegistry::new();
        let a = Arc::new(instance_with_keywords("a", &["a"]));
        let b = Arc::new(instance_with_keywords("b", &["b"]));
        registry.add(Arc::clone(&a));

        let snapshot = registry.list_all();
        registry.add(Arc::clone(&b));
        registry.remove(&a);

        assert_eq!(snapshot.len(), 1);
        assert!(Arc::ptr_eq(&snapshot[0], &a));
        let current = registry.list_all();
        assert_eq!(current.len(), 1);
        assert!(Arc::ptr_eq(&current[0], &b));
    }

    #[test]
    fn test_snapshot_keeps_registration_order() {
        let registry = PluginRegistry::new();
        for id in ["one", "two", "three"] {
            registry.add(Arc::new(instance_with_keywords(id, &["k"])));
        }
        let ids: Vec<String> = registry
            .list_all()
            .iter()
            .map(|i| i.id().to_string())
            .collect();
        assert_eq!(ids, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_concurrent_add_remove() {
        let registry = Arc::new(PluginRegistry::new());
        let mut handles = vec![];

        for n in 0..8 {
            let registry = Arc::clone(&registry);
            handles.push(std::thread::spawn(move || {
                let keep = Arc::new(instance_with_keywords(&format!("keep-{n}"), &["k"]));
                let gone = Arc::new(instance_with_keywords(&format!("drop-{n}"), &["k"]));
                registry.add(Arc::clone(&keep));
                registry.add(Arc::clone(&gone));
                let _ = registry.list_all();
                registry.remove(&gone);
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.len(), 8);
        assert!(registry.list_all().iter().all(|i| i.id().starts_with("keep-")));
    }
}
