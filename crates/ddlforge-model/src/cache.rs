//! Shared object-name cache
//!
//! Containers (schemas, tables) own lazily populated sets of child object
//! names. The cache is shared across editing sessions on the same
//! connection; callers serialize access through one active session.
//! Eviction happens only through [`ObjectCache::invalidate`], driven by
//! successful structural-DDL execution, never by reads.

use crate::ObjectRef;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};

/// Per-container cache of known child object names.
#[derive(Debug, Default)]
pub struct ObjectCache {
    containers: RwLock<HashMap<ObjectRef, HashSet<String>>>,
}

impl ObjectCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cached name set for a container.
    pub fn populate<I, S>(&self, container: &ObjectRef, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: HashSet<String> = names.into_iter().map(Into::into).collect();
        tracing::debug!(container = %container.qualified_name(), count = names.len(), "populating object cache");
        self.containers.write().insert(container.clone(), names);
    }

    /// Whether the container holds an object with the given name.
    /// `None` when the container was never populated; callers must treat
    /// that as unknown rather than loading on the spot.
    pub fn contains(&self, container: &ObjectRef, name: &str) -> Option<bool> {
        let containers = self.containers.read();
        match containers.get(container) {
            Some(names) => {
                tracing::debug!(container = %container.qualified_name(), name, "cache hit");
                Some(names.contains(name))
            }
            None => {
                tracing::debug!(container = %container.qualified_name(), name, "cache miss");
                None
            }
        }
    }

    pub fn is_populated(&self, container: &ObjectRef) -> bool {
        self.containers.read().contains_key(container)
    }

    /// Record a newly created child name. No-op for unloaded containers.
    pub fn insert_name(&self, container: &ObjectRef, name: &str) {
        if let Some(names) = self.containers.write().get_mut(container) {
            names.insert(name.to_string());
        }
    }

    /// Drop a child name after a successful DROP. No-op for unloaded
    /// containers.
    pub fn remove_name(&self, container: &ObjectRef, name: &str) {
        if let Some(names) = self.containers.write().get_mut(container) {
            names.remove(name);
        }
    }

    /// Apply a successful rename to the cached name set.
    pub fn rename(&self, container: &ObjectRef, old: &str, new: &str) {
        if let Some(names) = self.containers.write().get_mut(container) {
            if names.remove(old) {
                names.insert(new.to_string());
            }
        }
    }

    /// Evict a container entirely; the next populate reloads it.
    pub fn invalidate(&self, container: &ObjectRef) {
        tracing::debug!(container = %container.qualified_name(), "invalidating object cache");
        self.containers.write().remove(container);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ObjectKind;

    fn schema() -> ObjectRef {
        ObjectRef::top_level("public", ObjectKind::Schema)
    }

    #[test]
    fn test_unloaded_container_is_unknown() {
        let cache = ObjectCache::new();
        assert_eq!(cache.contains(&schema(), "users"), None);
    }

    #[test]
    fn test_populate_and_lookup() {
        let cache = ObjectCache::new();
        cache.populate(&schema(), ["users", "orders"]);
        assert_eq!(cache.contains(&schema(), "users"), Some(true));
        assert_eq!(cache.contains(&schema(), "missing"), Some(false));
    }

    #[test]
    fn test_rename_moves_name() {
        let cache = ObjectCache::new();
        cache.populate(&schema(), ["users"]);
        cache.rename(&schema(), "users", "accounts");
        assert_eq!(cache.contains(&schema(), "users"), Some(false));
        assert_eq!(cache.contains(&schema(), "accounts"), Some(true));
    }

    #[test]
    fn test_invalidate_forgets_container() {
        let cache = ObjectCache::new();
        cache.populate(&schema(), ["users"]);
        cache.invalidate(&schema());
        assert_eq!(cache.contains(&schema(), "users"), None);
    }

    #[test]
    fn test_insert_remove_only_touch_loaded_containers() {
        let cache = ObjectCache::new();
        cache.insert_name(&schema(), "users");
        assert_eq!(cache.contains(&schema(), "users"), None);

        cache.populate(&schema(), Vec::<String>::new());
        cache.insert_name(&schema(), "users");
        assert_eq!(cache.contains(&schema(), "users"), Some(true));
        cache.remove_name(&schema(), "users");
        assert_eq!(cache.contains(&schema(), "users"), Some(false));
    }
}
