//! # Host Contract
//!
//! [`Model`] is implemented by any type whose attributes are resolved lazily.
//! The host supplies three things: its type's [`Registry`], access to its
//! per-instance [`AttributeSet`], and optionally a [`Model::reload`] hook that
//! fetches missing raw attributes. Everything else is provided.
//!
//! ```ignore
//! static USER: Lazy<Registry> = Lazy::new(|| {
//!     Registry::new()
//!         .property("login", PropertyOptions::new().from(["login", "username"]).required())
//!         .property("followers", PropertyOptions::new().with(Selector::ToI).default(0))
//! });
//!
//! struct User {
//!     attributes: AttributeSet,
//!     client: ApiClient,
//! }
//!
//! impl Model for User {
//!     fn registry(&self) -> &Registry { &USER }
//!     fn attributes(&self) -> &AttributeSet { &self.attributes }
//!     fn attributes_mut(&mut self) -> &mut AttributeSet { &mut self.attributes }
//!
//!     fn reload(&mut self) -> lazyattr::Result<()> {
//!         let full = self.client.fetch_user(self.attributes.get("login"))
//!             .map_err(AttrError::custom)?;
//!         self.attributes.merge(full);
//!         self.set_fully_loaded(true);
//!         Ok(())
//!     }
//! }
//!
//! impl User {
//!     lazyattr::readers!(login, followers);
//! }
//! ```
//!
//! ## Reentrancy
//!
//! Function transformers receive the owning instance as `&mut dyn Model` and
//! may read other properties through it with [`ModelExt`]. Such a nested read follows the full
//! resolution path, so it can itself call `reload`. A transformer that reads
//! its own property recurses without bound.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::Result;
use crate::registry::Registry;
use crate::resolver;
use crate::spec::PropertySpec;
use crate::state::AttributeSet;
use crate::value::AttrValue;

pub trait Model {
    /// The registry of the host's type.
    fn registry(&self) -> &Registry;

    fn attributes(&self) -> &AttributeSet;

    fn attributes_mut(&mut self) -> &mut AttributeSet;

    /// Fetch and merge missing raw attributes. Does nothing by default.
    ///
    /// Called by the resolver at most once per read, and only while the
    /// instance is not fully loaded. Implementations usually finish with
    /// `self.set_fully_loaded(true)` once they know the data is complete.
    fn reload(&mut self) -> Result<()> {
        Ok(())
    }

    fn properties(&self) -> &IndexMap<String, Arc<PropertySpec>> {
        self.registry().properties()
    }

    fn is_fully_loaded(&self) -> bool {
        self.attributes().is_fully_loaded()
    }

    fn set_fully_loaded(&mut self, loaded: bool) {
        self.attributes_mut().set_fully_loaded(loaded);
    }
}

/// Reading and writing through the resolver.
///
/// Implemented for every sized [`Model`] and for `dyn Model`, so a host and the
/// `&mut dyn Model` handed to a function transformer share one surface:
///
/// ```ignore
/// PropertyOptions::new().with_fn(|first, owner| {
///     let last = owner.read_attribute("last_name")?;
///     Ok(format!("{first} {last}").into())
/// })
/// ```
pub trait ModelExt: Model {
    #[doc(hidden)]
    fn as_model(&mut self) -> &mut dyn Model;

    /// Resolve a property. See [`crate::resolver`] for the rules.
    fn read_attribute(&mut self, name: &str) -> Result<AttrValue> {
        resolver::read_attribute(self.as_model(), name)
    }

    /// Store a raw value. No transformer runs and nothing is validated.
    fn write_attribute(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        self.attributes_mut().insert(name, value);
    }

    /// [`ModelExt::write_attribute`] for each pair, in iteration order.
    fn assign_attributes<I, K, V>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AttrValue>,
    {
        for (name, value) in pairs {
            self.write_attribute(name, value);
        }
    }

    /// Every registered property resolved. Fails like the first failing read.
    fn to_hash(&mut self) -> Result<IndexMap<String, AttrValue>> {
        resolver::to_hash(self.as_model())
    }
}

impl<M: Model> ModelExt for M {
    fn as_model(&mut self) -> &mut dyn Model {
        self
    }
}

impl ModelExt for dyn Model + '_ {
    fn as_model(&mut self) -> &mut dyn Model {
        self
    }
}

/// Generate one reader method per property, for use inside an `impl` block of a
/// [`Model`] type.
///
/// ```ignore
/// impl Person {
///     lazyattr::readers!(name, age);
/// }
///
/// let age = person.age()?;
/// ```
#[macro_export]
macro_rules! readers {
    ($($name:ident),* $(,)?) => {
        $(
            pub fn $name(&mut self) -> $crate::Result<$crate::AttrValue> {
                $crate::ModelExt::read_attribute(self, stringify!($name))
            }
        )*
    };
}
