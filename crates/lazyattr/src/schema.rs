//! # Declarative Schemas
//!
//! Property declarations can live in data files instead of code. A schema is a
//! list of property definitions using the same option names as programmatic
//! declaration:
//!
//! ```toml
//! [[property]]
//! name = "age"
//! from = ["years", "yrs"]   # or a single string
//! with = "to_i"
//! default = "0"
//!
//! [[property]]
//! name = "login"
//! required = true
//! ```
//!
//! The JSON form is `{"properties": [{"name": "age", ...}]}`.
//!
//! Only selector transformers can be named in a schema. Definitions are applied
//! in document order through [`Registry::declare`], so a repeated name replaces
//! the earlier definition exactly as it would in code. A JSON `null` default is
//! the same as leaving `default` out.

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{AttrError, Result};
use crate::registry::Registry;
use crate::spec::PropertyOptions;
use crate::transform::Selector;
use crate::value::AttrValue;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(rename = "property", alias = "properties", default)]
    pub properties: Vec<PropertyDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropertyDef {
    pub name: String,
    #[serde(default, deserialize_with = "one_or_many")]
    pub from: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub with: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<AttrValue>,
}

fn one_or_many<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Keys {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Keys::deserialize(deserializer)? {
        Keys::One(key) => vec![key],
        Keys::Many(keys) => keys,
    })
}

impl PropertyDef {
    /// Translate into declaration options, resolving the selector name.
    pub fn options(&self) -> Result<PropertyOptions> {
        if self.name.trim().is_empty() {
            return Err(AttrError::Schema("property name cannot be empty".into()));
        }

        let mut options = PropertyOptions::new().from(self.from.iter().cloned());
        if let Some(with) = &self.with {
            let selector: Selector = with.parse().map_err(|_| {
                AttrError::Schema(format!(
                    "property `{}`: unknown transformer `{with}`",
                    self.name
                ))
            })?;
            options = options.with(selector);
        }
        if self.required {
            options = options.required();
        }
        if let Some(default) = &self.default {
            options = options.default(default.clone());
        }
        Ok(options)
    }
}

impl Schema {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a `.toml` or `.json` schema file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&text),
            Some("json") => Self::from_json_str(&text),
            _ => Err(AttrError::Schema(format!(
                "unsupported schema format: {}",
                path.display()
            ))),
        }
    }

    /// Declare every property on `registry`.
    ///
    /// All definitions are validated before the first one is declared, so a bad
    /// schema leaves the registry untouched.
    pub fn apply_to(&self, registry: &mut Registry) -> Result<()> {
        let declarations = self
            .properties
            .iter()
            .map(|def| -> Result<(String, PropertyOptions)> {
                Ok((def.name.clone(), def.options()?))
            })
            .collect::<Result<Vec<_>>>()?;

        for (name, options) in declarations {
            registry.declare(name, options);
        }
        Ok(())
    }

    pub fn to_registry(&self) -> Result<Registry> {
        let mut registry = Registry::new();
        self.apply_to(&mut registry)?;
        Ok(registry)
    }

    /// A registry inheriting `parent`, with this schema's properties on top.
    pub fn extend(&self, parent: &Registry) -> Result<Registry> {
        let mut registry = Registry::inherit(parent);
        self.apply_to(&mut registry)?;
        Ok(registry)
    }
}
