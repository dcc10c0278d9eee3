//! Query cache
//!
//! Results of server reads keyed by resource. The cache is shared by all views of the
//! application. Entries are dropped when a mutation changes the resource on the server.
//!
//! Every invalidation advances the generation of the resource. A read records the generation
//! when it starts and its result is only stored if the generation is still the same, so a read
//! that overlaps a mutation cannot bring back the state from before the mutation.

use std::{
    any::Any,
    cell::{Cell, RefCell},
    collections::HashMap,
    rc::Rc,
};

use forma_domain as domain;
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    CurrentUser,
    Profile,
    Plans,
    Programs,
    Exercises,
    Template(domain::TemplateID),
    Session(domain::SessionID),
}

/// State of a resource at the start of a read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation {
    epoch: u64,
    resource: u64,
}

#[derive(Debug, Default)]
pub struct QueryCache {
    entries: RefCell<HashMap<Resource, Rc<dyn Any>>>,
    generations: RefCell<HashMap<Resource, u64>>,
    epoch: Cell<u64>,
}

impl QueryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached value of `resource`, if it is present and of type `T`.
    #[must_use]
    pub fn get<T: Clone + 'static>(&self, resource: Resource) -> Option<T> {
        self.entries
            .borrow()
            .get(&resource)
            .and_then(|value| value.downcast_ref::<T>())
            .cloned()
    }

    pub fn insert<T: 'static>(&self, resource: Resource, value: T) {
        self.entries.borrow_mut().insert(resource, Rc::new(value));
    }

    #[must_use]
    pub fn generation(&self, resource: Resource) -> Generation {
        Generation {
            epoch: self.epoch.get(),
            resource: self
                .generations
                .borrow()
                .get(&resource)
                .copied()
                .unwrap_or_default(),
        }
    }

    /// Stores the result of a read that started at `generation`.
    ///
    /// Returns `false` and keeps the cache unchanged if the resource was invalidated meanwhile.
    pub fn insert_if_current<T: 'static>(
        &self,
        resource: Resource,
        generation: Generation,
        value: T,
    ) -> bool {
        if self.generation(resource) != generation {
            debug!("discarding outdated read of {resource:?}");
            return false;
        }
        self.insert(resource, value);
        true
    }

    #[must_use]
    pub fn contains(&self, resource: Resource) -> bool {
        self.entries.borrow().contains_key(&resource)
    }

    pub fn invalidate(&self, resource: Resource) {
        *self.generations.borrow_mut().entry(resource).or_default() += 1;
        if self.entries.borrow_mut().remove(&resource).is_some() {
            debug!("invalidated {resource:?}");
        }
    }

    pub fn clear(&self) {
        self.epoch.set(self.epoch.get() + 1);
        self.entries.borrow_mut().clear();
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_get_and_insert() {
        let cache = QueryCache::new();
        assert_eq!(cache.get::<Vec<u32>>(Resource::Plans), None);

        cache.insert(Resource::Plans, vec![1_u32, 2]);

        assert_eq!(cache.get::<Vec<u32>>(Resource::Plans), Some(vec![1, 2]));
        assert_eq!(cache.get::<Vec<u32>>(Resource::Programs), None);
    }

    #[test]
    fn test_get_with_other_type() {
        let cache = QueryCache::new();
        cache.insert(Resource::Profile, 42_u32);

        assert_eq!(cache.get::<String>(Resource::Profile), None);
        assert_eq!(cache.get::<u32>(Resource::Profile), Some(42));
    }

    #[test]
    fn test_invalidate_only_affects_resource() {
        let cache = QueryCache::new();
        cache.insert(Resource::Template(1.into()), "a".to_string());
        cache.insert(Resource::Template(2.into()), "b".to_string());
        cache.insert(Resource::Session(1.into()), "c".to_string());

        cache.invalidate(Resource::Template(1.into()));

        assert!(!cache.contains(Resource::Template(1.into())));
        assert!(cache.contains(Resource::Template(2.into())));
        assert!(cache.contains(Resource::Session(1.into())));
    }

    #[test]
    fn test_clear() {
        let cache = QueryCache::new();
        cache.insert(Resource::CurrentUser, 1_u32);
        cache.insert(Resource::Exercises, 2_u32);

        cache.clear();

        assert!(!cache.contains(Resource::CurrentUser));
        assert!(!cache.contains(Resource::Exercises));
    }

    #[test]
    fn test_read_overlapping_invalidation_is_not_stored() {
        let cache = QueryCache::new();
        let resource = Resource::Template(1.into());
        let generation = cache.generation(resource);

        cache.invalidate(resource);

        assert!(!cache.insert_if_current(resource, generation, "before".to_string()));
        assert!(!cache.contains(resource));

        let generation = cache.generation(resource);
        assert!(cache.insert_if_current(resource, generation, "after".to_string()));
        assert_eq!(cache.get::<String>(resource), Some("after".to_string()));
    }

    #[test]
    fn test_invalidation_of_other_resource_keeps_read() {
        let cache = QueryCache::new();
        let generation = cache.generation(Resource::Template(1.into()));

        cache.invalidate(Resource::Template(2.into()));

        assert!(cache.insert_if_current(Resource::Template(1.into()), generation, 1_u32));
        assert!(cache.contains(Resource::Template(1.into())));
    }

    #[test]
    fn test_read_overlapping_clear_is_not_stored() {
        let cache = QueryCache::new();
        let generation = cache.generation(Resource::CurrentUser);

        cache.clear();

        assert!(!cache.insert_if_current(Resource::CurrentUser, generation, 1_u32));
        assert!(!cache.contains(Resource::CurrentUser));
    }
}
