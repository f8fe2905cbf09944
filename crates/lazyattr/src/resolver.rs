//! # Attribute Resolution
//!
//! Reading a property walks these steps, in order:
//!
//! 1. **Spec lookup**: the property's [`PropertySpec`] from the instance's
//!    registry, or an implicit `from: [name]` spec for undeclared names.
//! 2. **Source-key search**: the source keys are tried left to right against the
//!    raw attributes; the first key *present* wins, even when its value is `Nil`.
//! 3. **Default**: with no key present, a declared default stands in for the
//!    found value. Defaults never trigger a reload.
//! 4. **Reload**: with no key and no default, a partial instance (not fully
//!    loaded) gets its reload hook called once, then steps 2-3 run again.
//!    Complete instances skip this step.
//! 5. **Failure**: still nothing means `RequiredAttribute` for required
//!    properties and `MissingAttribute` otherwise.
//! 6. **Transformation**: the found value (or default) is passed through the
//!    property's transformer, if it has one.
//!
//! Reload and transformer errors are returned untouched. A reload is attempted
//! at most once per read, but each read of a still-missing property on a partial
//! instance tries again.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::error::{AttrError, Result};
use crate::model::Model;
use crate::spec::PropertySpec;
use crate::state::AttributeSet;
use crate::value::AttrValue;

/// Resolve `name` on `model`.
pub fn read_attribute(model: &mut dyn Model, name: &str) -> Result<AttrValue> {
    let spec = model
        .registry()
        .get(name)
        .cloned()
        .unwrap_or_else(|| Arc::new(PropertySpec::implicit(name)));

    let found = match locate(model.attributes(), &spec) {
        Some(value) => value,
        None if model.attributes().is_fully_loaded() => return Err(unresolved(&spec)),
        None => {
            debug!(property = %spec.name(), "attribute not loaded, reloading");
            model.reload()?;
            locate(model.attributes(), &spec).ok_or_else(|| unresolved(&spec))?
        }
    };

    spec.transformer().apply(found, model)
}

/// Resolve every registered property, in declaration order.
pub fn to_hash(model: &mut dyn Model) -> Result<IndexMap<String, AttrValue>> {
    let names: Vec<String> = model.registry().names().map(str::to_string).collect();
    names
        .into_iter()
        .map(|name| {
            let value = read_attribute(model, &name)?;
            Ok((name, value))
        })
        .collect()
}

/// Raw value for `spec`: first present source key, else the default.
fn locate(attributes: &AttributeSet, spec: &PropertySpec) -> Option<AttrValue> {
    for key in spec.source_keys() {
        if let Some(value) = attributes.get(key) {
            trace!(property = %spec.name(), key = %key, "source key hit");
            return Some(value.clone());
        }
    }

    let default = spec.default_value()?;
    trace!(property = %spec.name(), "using default");
    Some(default.clone())
}

fn unresolved(spec: &PropertySpec) -> AttrError {
    if spec.is_required() {
        AttrError::RequiredAttribute(spec.name().to_string())
    } else {
        AttrError::MissingAttribute(spec.name().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelExt;
    use crate::registry::Registry;
    use crate::spec::PropertyOptions;
    use crate::transform::Selector;

    /// Bare-bones host: registry owned inline, reload counts calls and can
    /// merge a canned payload.
    struct Probe {
        registry: Registry,
        attributes: AttributeSet,
        payload: Vec<(&'static str, AttrValue)>,
        reloads: usize,
    }

    impl Probe {
        fn new(registry: Registry, raw: Vec<(&'static str, AttrValue)>) -> Self {
            Self {
                registry,
                attributes: raw.into_iter().collect(),
                payload: Vec::new(),
                reloads: 0,
            }
        }
    }

    impl Model for Probe {
        fn registry(&self) -> &Registry {
            &self.registry
        }

        fn attributes(&self) -> &AttributeSet {
            &self.attributes
        }

        fn attributes_mut(&mut self) -> &mut AttributeSet {
            &mut self.attributes
        }

        fn reload(&mut self) -> Result<()> {
            self.reloads += 1;
            let payload = self.payload.clone();
            self.attributes.merge(payload);
            Ok(())
        }
    }

    #[test]
    fn first_present_source_key_wins() {
        let registry =
            Registry::new().property("x", PropertyOptions::new().from(["k1", "k2", "k3"]));
        let mut probe = Probe::new(
            registry,
            vec![("k3", "third".into()), ("k2", "second".into())],
        );
        assert_eq!(probe.read_attribute("x").unwrap(), AttrValue::from("second"));
        assert_eq!(probe.reloads, 0);
    }

    #[test]
    fn nil_value_counts_as_present() {
        let registry = Registry::new().property("x", PropertyOptions::new().from(["a", "b"]));
        let mut probe = Probe::new(registry, vec![("a", AttrValue::Nil), ("b", 2.into())]);
        assert_eq!(probe.read_attribute("x").unwrap(), AttrValue::Nil);
    }

    #[test]
    fn default_skips_reload() {
        let registry = Registry::new().property("x", PropertyOptions::new().default(7));
        let mut probe = Probe::new(registry, vec![]);
        assert_eq!(probe.read_attribute("x").unwrap(), AttrValue::Int(7));
        assert_eq!(probe.reloads, 0);
    }

    #[test]
    fn missing_value_reloads_once_then_fails() {
        let registry = Registry::new().property("x", PropertyOptions::new());
        let mut probe = Probe::new(registry, vec![]);

        let err = probe.read_attribute("x").unwrap_err();
        assert!(err.is_missing());
        assert_eq!(err.property(), Some("x"));
        assert_eq!(probe.reloads, 1);
    }

    #[test]
    fn reload_can_supply_the_value() {
        let registry = Registry::new().property("x", PropertyOptions::new().with(Selector::ToI));
        let mut probe = Probe::new(registry, vec![]);
        probe.payload = vec![("x", "41".into())];

        assert_eq!(probe.read_attribute("x").unwrap(), AttrValue::Int(41));
        assert_eq!(probe.reloads, 1);

        // now cached in raw attributes
        probe.read_attribute("x").unwrap();
        assert_eq!(probe.reloads, 1);
    }

    #[test]
    fn fully_loaded_instances_never_reload() {
        let registry = Registry::new().property("x", PropertyOptions::new().required());
        let mut probe = Probe::new(registry, vec![]);
        probe.set_fully_loaded(true);

        let err = probe.read_attribute("x").unwrap_err();
        assert!(err.is_required());
        assert_eq!(probe.reloads, 0);
    }

    #[test]
    fn required_with_default_is_satisfied_by_default() {
        let registry =
            Registry::new().property("x", PropertyOptions::new().required().default("d"));
        let mut probe = Probe::new(registry, vec![]);
        assert_eq!(probe.read_attribute("x").unwrap(), AttrValue::from("d"));
    }

    #[test]
    fn undeclared_names_use_implicit_spec() {
        let mut probe = Probe::new(Registry::new(), vec![("loose", 1.into())]);
        assert_eq!(probe.read_attribute("loose").unwrap(), AttrValue::Int(1));

        let err = probe.read_attribute("absent").unwrap_err();
        assert!(err.is_missing());
        assert_eq!(probe.reloads, 1);
    }

    #[test]
    fn transformer_errors_propagate() {
        let registry =
            Registry::new().property("x", PropertyOptions::new().with(Selector::Downcase));
        let mut probe = Probe::new(registry, vec![("x", 3.into())]);
        let err = probe.read_attribute("x").unwrap_err();
        assert!(matches!(err, AttrError::UndefinedMethod { .. }));
    }

    #[test]
    fn to_hash_follows_declaration_order() {
        let registry = Registry::new()
            .property("b", PropertyOptions::new())
            .property("a", PropertyOptions::new().default(0));
        let mut probe = Probe::new(registry, vec![("b", 1.into())]);

        let hash = probe.to_hash().unwrap();
        let pairs: Vec<_> = hash.into_iter().collect();
        assert_eq!(
            pairs,
            vec![
                ("b".to_string(), AttrValue::Int(1)),
                ("a".to_string(), AttrValue::Int(0))
            ]
        );
    }

    #[test]
    fn to_hash_fails_on_first_unresolvable_property() {
        let registry = Registry::new()
            .property("ok", PropertyOptions::new().default(1))
            .property("gone", PropertyOptions::new().required());
        let mut probe = Probe::new(registry, vec![]);

        let err = probe.to_hash().unwrap_err();
        assert!(err.is_required());
        assert_eq!(err.property(), Some("gone"));
    }
}
