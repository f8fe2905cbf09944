//! A general-purpose [`Model`] for registries that are only known at runtime,
//! e.g. ones loaded from a [`Schema`](crate::schema::Schema).

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::model::{Model, ModelExt};
use crate::registry::Registry;
use crate::state::AttributeSet;
use crate::value::AttrValue;

type Reloader = Box<dyn FnMut(&mut AttributeSet) -> Result<()>>;

pub struct Record {
    registry: Arc<Registry>,
    attributes: AttributeSet,
    reloader: Option<Reloader>,
}

impl Record {
    pub fn new(registry: Arc<Registry>, attributes: AttributeSet) -> Self {
        Self {
            registry,
            attributes,
            reloader: None,
        }
    }

    /// Install the reload hook. It receives this record's raw attributes and is
    /// expected to merge whatever it fetched, and to mark them fully loaded when
    /// nothing more can arrive.
    pub fn with_reloader<F>(mut self, reloader: F) -> Self
    where
        F: FnMut(&mut AttributeSet) -> Result<()> + 'static,
    {
        self.reloader = Some(Box::new(reloader));
        self
    }

    /// Generic accessor: same as [`ModelExt::read_attribute`].
    pub fn get(&mut self, name: &str) -> Result<AttrValue> {
        self.read_attribute(name)
    }
}

impl Model for Record {
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
        match self.reloader.as_mut() {
            Some(reloader) => reloader(&mut self.attributes),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("properties", &self.registry.len())
            .field("attributes", &self.attributes)
            .field("reloader", &self.reloader.is_some())
            .finish()
    }
}
