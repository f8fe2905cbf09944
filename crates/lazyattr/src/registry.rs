//! Per-type property registries.
//!
//! A [`Registry`] maps property names to their [`PropertySpec`], in declaration
//! order. Each model type owns one, usually as a lazily built static:
//!
//! ```ignore
//! static PERSON: Lazy<Registry> = Lazy::new(|| {
//!     Registry::new()
//!         .property("name", PropertyOptions::new().required())
//!         .property("age", PropertyOptions::new().from(["years", "yrs"]).with(Selector::ToI))
//! });
//!
//! static EMPLOYEE: Lazy<Registry> = Lazy::new(|| {
//!     Registry::inherit(&PERSON).property("badge", PropertyOptions::new())
//! });
//! ```
//!
//! Inheritance is an explicit copy of the parent's entries taken when the child
//! registry is built; the child's own declarations then shadow same-named
//! parent entries.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use crate::spec::{PropertyOptions, PropertySpec};

#[derive(Debug, Clone, Default)]
pub struct Registry {
    properties: IndexMap<String, Arc<PropertySpec>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a registry holding every property of `parent`.
    pub fn inherit(parent: &Registry) -> Self {
        parent.clone()
    }

    /// Declare a property and return its name.
    ///
    /// Redeclaring an existing name replaces its spec (last write wins) but keeps
    /// its original position in [`Registry::properties`].
    pub fn declare(&mut self, name: impl Into<String>, options: PropertyOptions) -> String {
        let spec = PropertySpec::new(name, options);
        let name = spec.name().to_string();
        debug!(
            property = %name,
            source_keys = ?spec.source_keys(),
            required = spec.is_required(),
            "declared property"
        );
        self.properties.insert(name.clone(), Arc::new(spec));
        name
    }

    /// Builder form of [`Registry::declare`].
    pub fn property(mut self, name: impl Into<String>, options: PropertyOptions) -> Self {
        self.declare(name, options);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<PropertySpec>> {
        self.properties.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    /// Every declared property, inherited ones included.
    pub fn properties(&self) -> &IndexMap<String, Arc<PropertySpec>> {
        &self.properties
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{Selector, Transformer};

    fn base() -> Registry {
        Registry::new()
            .property("name", PropertyOptions::new().required())
            .property("age", PropertyOptions::new().with(Selector::ToI))
    }

    #[test]
    fn declare_returns_the_name() {
        let mut registry = Registry::new();
        assert_eq!(registry.declare("title", PropertyOptions::new()), "title");
        assert!(registry.contains("title"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn unknown_property_returns_none() {
        assert!(base().get("nonexistent").is_none());
    }

    #[test]
    fn properties_keep_declaration_order() {
        let names: Vec<_> = base().names().map(str::to_string).collect();
        assert_eq!(names, vec!["name", "age"]);
    }

    #[test]
    fn redeclaring_replaces_the_spec_in_place() {
        let registry = base()
            .property("email", PropertyOptions::new())
            .property("name", PropertyOptions::new().default("anonymous"));

        let spec = registry.get("name").unwrap();
        assert!(!spec.is_required());
        assert!(spec.has_default());

        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, vec!["name", "age", "email"]);
    }

    #[test]
    fn inherited_registry_sees_parent_properties() {
        let parent = base();
        let child = Registry::inherit(&parent).property("badge", PropertyOptions::new());

        assert!(child.contains("name"));
        assert!(child.contains("age"));
        assert!(child.contains("badge"));
        assert!(!parent.contains("badge"));
    }

    #[test]
    fn child_declarations_shadow_parent() {
        let parent = base();
        let child = Registry::inherit(&parent)
            .property("age", PropertyOptions::new().from(["years"]));

        assert!(child.get("age").unwrap().transformer().is_none());
        assert_eq!(child.get("age").unwrap().source_keys(), ["years"]);
        assert!(matches!(
            parent.get("age").unwrap().transformer(),
            Transformer::Selector(Selector::ToI)
        ));
    }

    #[test]
    fn empty_registry() {
        let registry = Registry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.names().count(), 0);
    }
}
