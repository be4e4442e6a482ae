//! Scoped registry for sharing controllers between view components
//!
//! Controllers are injected explicitly rather than through ambient globals: a
//! view scope creates a registry, inserts the controllers it owns on entry,
//! and removes them on exit. Lookup is keyed by resource name and typed at
//! the call site.

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::controller::CollectionController;
use crate::core::resource::Resource;

/// Registry of live controllers keyed by resource name
#[derive(Default)]
pub struct ControllerRegistry {
    entries: RwLock<HashMap<&'static str, Arc<dyn Any + Send + Sync>>>,
}

impl ControllerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a controller under its resource name, replacing any previous
    /// controller for the same resource
    pub fn insert<T: Resource>(&self, controller: CollectionController<T>) {
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(T::resource_name(), Arc::new(controller));
    }

    /// Fetch a handle to the controller for `T`, if one is registered
    pub fn get<T: Resource>(&self) -> Option<CollectionController<T>> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries
            .get(T::resource_name())?
            .clone()
            .downcast::<CollectionController<T>>()
            .ok()
            .map(|controller| (*controller).clone())
    }

    /// Drop the controller for a resource; returns whether one was present
    pub fn remove(&self, resource_name: &str) -> bool {
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(resource_name)
            .is_some()
    }

    pub fn contains(&self, resource_name: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(resource_name)
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::Filter;
    use crate::transport::InMemoryTransport;
    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    #[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
    struct Review {
        id: Uuid,
        status: String,
        created_at: DateTime<Utc>,
    }

    impl Resource for Review {
        fn resource_name() -> &'static str {
            "reviews"
        }

        fn resource_name_singular() -> &'static str {
            "review"
        }

        fn id(&self) -> Uuid {
            self.id
        }

        fn status(&self) -> &str {
            &self.status
        }
    }

    #[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
    struct Team {
        id: Uuid,
        status: String,
    }

    impl Resource for Team {
        fn resource_name() -> &'static str {
            "teams"
        }

        fn resource_name_singular() -> &'static str {
            "team"
        }

        fn id(&self) -> Uuid {
            self.id
        }

        fn status(&self) -> &str {
            &self.status
        }
    }

    fn review_controller() -> CollectionController<Review> {
        CollectionController::new(
            Arc::new(InMemoryTransport::<Review>::new()),
            Filter::new(20),
        )
    }

    #[test]
    fn test_insert_and_get() {
        let registry = ControllerRegistry::new();
        registry.insert(review_controller());

        assert!(registry.contains("reviews"));
        assert!(registry.get::<Review>().is_some());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_get_unregistered_resource_is_none() {
        let registry = ControllerRegistry::new();
        registry.insert(review_controller());
        assert!(registry.get::<Team>().is_none());
    }

    #[test]
    fn test_remove_on_view_exit() {
        let registry = ControllerRegistry::new();
        registry.insert(review_controller());

        assert!(registry.remove("reviews"));
        assert!(!registry.remove("reviews"));
        assert!(registry.get::<Review>().is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_shared_handles_see_the_same_state() {
        let registry = ControllerRegistry::new();
        registry.insert(review_controller());

        let a = registry.get::<Review>().unwrap();
        let b = registry.get::<Review>().unwrap();
        assert_eq!(a.filter().page(), b.filter().page());
    }
}
