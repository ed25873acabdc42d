//! `PropertySet` for pass communication.
//!
//! Passes share results through a [`PropertySet`] threaded through the
//! whole pass manager run. It is a type-keyed map: every value is stored
//! under its own type, so each property type has at most one entry.
//!
//! The reduction passes append their [`ReductionReport`](crate::ReductionReport)s
//! to a [`ReductionLog`](crate::ReductionLog) kept here.
//!
//! # Examples
//!
//! ```
//! use lightopt_compile::PropertySet;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct OptimizationStats {
//!     gates_removed: usize,
//! }
//!
//! let mut props = PropertySet::new();
//! props.insert(OptimizationStats { gates_removed: 15 });
//!
//! let stats = props.get::<OptimizationStats>().unwrap();
//! assert_eq!(stats.gates_removed, 15);
//! ```

use rustc_hash::FxHashMap;
use std::any::{Any, TypeId};

/// Shared state passed through all passes of a run.
#[derive(Debug, Default)]
pub struct PropertySet {
    /// Custom properties storage (type-erased).
    custom: FxHashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl PropertySet {
    /// Create a new empty property set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a custom property.
    pub fn insert<T: Any + Send + Sync>(&mut self, value: T) {
        self.custom.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Get a custom property.
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.custom
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref())
    }

    /// Get a mutable custom property.
    pub fn get_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.custom
            .get_mut(&TypeId::of::<T>())
            .and_then(|v| v.downcast_mut())
    }

    /// Update a custom property in place, starting from its default if absent.
    pub fn update_or_default<T, F>(&mut self, update: F)
    where
        T: Any + Send + Sync + Default,
        F: FnOnce(&mut T),
    {
        let mut value = self.remove::<T>().unwrap_or_default();
        update(&mut value);
        self.insert(value);
    }

    /// Remove a custom property.
    pub fn remove<T: Any>(&mut self) -> Option<T> {
        self.custom
            .remove(&TypeId::of::<T>())
            .and_then(|v| v.downcast().ok())
            .map(|v| *v)
    }

    /// Check whether a property of type `T` is present.
    pub fn contains<T: Any>(&self) -> bool {
        self.custom.contains_key(&TypeId::of::<T>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::items_after_statements)]
    fn test_property_set_custom() {
        let mut props = PropertySet::new();

        #[derive(Debug, PartialEq)]
        struct CustomData(i32);

        props.insert(CustomData(42));
        assert_eq!(props.get::<CustomData>(), Some(&CustomData(42)));
        assert!(props.contains::<CustomData>());

        let removed = props.remove::<CustomData>();
        assert_eq!(removed, Some(CustomData(42)));
        assert_eq!(props.get::<CustomData>(), None);
    }

    #[test]
    fn test_update_or_default() {
        let mut props = PropertySet::new();
        props.update_or_default(|v: &mut Vec<u32>| v.push(1));
        props.update_or_default(|v: &mut Vec<u32>| v.push(2));
        assert_eq!(props.get::<Vec<u32>>(), Some(&vec![1, 2]));
    }
}
