use thiserror::Error;

use crate::transform::Selector;

#[derive(Error, Debug)]
pub enum AttrError {
    /// A `required` property could not be resolved from any source key,
    /// had no default, and reloading did not supply it.
    #[error("{0} is required")]
    RequiredAttribute(String),

    /// A non-required property without a default could not be resolved.
    #[error("{0} is missing")]
    MissingAttribute(String),

    /// A selector transformer was applied to a value it does not support.
    #[error("undefined method `{selector}` for {kind}")]
    UndefinedMethod {
        selector: Selector,
        kind: &'static str,
    },

    /// `to_i` on a NaN or infinite float.
    #[error("{0} cannot be converted to an integer")]
    FloatDomain(f64),

    /// Failure raised by host code (a reload hook or a function transformer).
    #[error(transparent)]
    Custom(Box<dyn std::error::Error + Send + Sync>),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl AttrError {
    /// Wrap an arbitrary host error so it reaches the caller unchanged.
    pub fn custom<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        AttrError::Custom(err.into())
    }

    pub fn is_required(&self) -> bool {
        matches!(self, AttrError::RequiredAttribute(_))
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, AttrError::MissingAttribute(_))
    }

    /// The property a resolver error is about, if this is one.
    pub fn property(&self) -> Option<&str> {
        match self {
            AttrError::RequiredAttribute(name) | AttrError::MissingAttribute(name) => Some(name),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, AttrError>;
