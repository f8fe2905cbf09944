//! Property specifications.
//!
//! A [`PropertySpec`] describes where a property's raw value comes from, how it
//! is transformed, and what happens when it can't be found. Specs are built once,
//! from [`PropertyOptions`], when the property is declared and are never mutated.

use crate::transform::Transformer;
use crate::value::AttrValue;

/// Declaration-time options for a property.
///
/// Mirrors the option keys accepted at declaration: `from`, `with`, `required`
/// and `default`. Every combination is accepted; in particular `required` with a
/// `default` is legal and the default satisfies the requirement.
#[derive(Debug, Clone, Default)]
pub struct PropertyOptions {
    from: Vec<String>,
    with: Transformer,
    required: bool,
    default: Option<AttrValue>,
}

impl PropertyOptions {
    pub fn new() -> Self {
        <Self as Default>::default()
    }

    /// Source keys to search, in order. Replaces any previous `from`.
    pub fn from<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.from = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn with(mut self, transformer: impl Into<Transformer>) -> Self {
        self.with = transformer.into();
        self
    }

    /// Shorthand for `with(Transformer::function(f))`.
    pub fn with_fn<F>(self, f: F) -> Self
    where
        F: Fn(AttrValue, &mut dyn crate::Model) -> crate::Result<AttrValue> + Send + Sync + 'static,
    {
        self.with(Transformer::function(f))
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default(mut self, value: impl Into<AttrValue>) -> Self {
        self.default = Some(value.into());
        self
    }
}

/// Immutable specification of one declared property.
#[derive(Debug, Clone)]
pub struct PropertySpec {
    name: String,
    source_keys: Vec<String>,
    transformer: Transformer,
    required: bool,
    default: Option<AttrValue>,
}

impl PropertySpec {
    /// Build the spec for `name`. An empty `from` falls back to `[name]`.
    pub fn new(name: impl Into<String>, options: PropertyOptions) -> Self {
        let name = name.into();
        let source_keys = if options.from.is_empty() {
            vec![name.clone()]
        } else {
            options.from
        };
        Self {
            name,
            source_keys,
            transformer: options.with,
            required: options.required,
            default: options.default,
        }
    }

    /// The spec used for names that were never declared: looked up under its own
    /// name, untransformed, optional, without default.
    pub fn implicit(name: impl Into<String>) -> Self {
        Self::new(name, PropertyOptions::new())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Never empty.
    pub fn source_keys(&self) -> &[String] {
        &self.source_keys
    }

    pub fn transformer(&self) -> &Transformer {
        &self.transformer
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn default_value(&self) -> Option<&AttrValue> {
        self.default.as_ref()
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}
