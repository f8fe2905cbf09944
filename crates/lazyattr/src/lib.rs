//! # Lazyattr Architecture
//!
//! Lazyattr is a **lazy, declarative attribute layer** for data objects whose
//! backing values arrive from an external and possibly incomplete source, such as
//! a list endpoint that returns a summary of each item while the detail endpoint
//! returns everything.
//!
//! A model type declares its properties up front. Each declaration says where the
//! raw value comes from, how to transform it, whether it is required, and what to
//! use when it is absent. Reading a property that is not populated yet calls the
//! model's reload hook once before giving up, which allows partial hydration
//! followed by lazy completion.
//!
//! ## The Two Components
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Property Registry (registry.rs, spec.rs)                   │
//! │  - One per model type, built once (usually a static)        │
//! │  - name → PropertySpec { from, with, required, default }    │
//! │  - Inherited by copying the parent before declaring         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │  spec for `name`
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Attribute Resolver (resolver.rs, model.rs, state.rs)       │
//! │  - Per instance: raw AttributeSet + fully-loaded flag       │
//! │  - Source-key search → default → reload once → error        │
//! │  - Applies the transformer to whatever was found            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │  reload()
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Host type (implements Model)                               │
//! │  - Owns the network/database code behind `reload`           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: The Core Never Fetches
//!
//! Everything in this crate is synchronous, in-memory and single-threaded per
//! instance. The only way data enters an instance is construction, explicit
//! writes, and the host's own `reload`. The core never flips the fully-loaded
//! flag itself: only the host knows when its data is complete.
//!
//! ## Errors
//!
//! Resolution fails with exactly two kinds, both naming the property:
//! [`AttrError::RequiredAttribute`] and [`AttrError::MissingAttribute`]. Errors
//! raised by `reload` or by a transformer are returned as they are.
//!
//! ## Module Overview
//!
//! - [`value`]: [`AttrValue`], the raw and resolved value type
//! - [`transform`]: selector and function transformers
//! - [`spec`]: [`PropertySpec`] and declaration [`PropertyOptions`]
//! - [`registry`]: per-type [`Registry`] with inheritance
//! - [`state`]: per-instance [`AttributeSet`]
//! - [`model`]: the [`Model`] host trait, the [`ModelExt`] read/write surface
//!   and the [`readers!`] macro
//! - [`resolver`]: the read algorithm
//! - [`record`]: [`Record`], a ready-made model for runtime registries
//! - [`schema`]: loading declarations from TOML/JSON
//! - [`error`]: error types

pub mod error;
pub mod model;
pub mod record;
pub mod registry;
pub mod resolver;
pub mod schema;
pub mod spec;
pub mod state;
pub mod transform;
pub mod value;

pub use error::{AttrError, Result};
pub use model::{Model, ModelExt};
pub use once_cell::sync::Lazy;
pub use record::Record;
pub use registry::Registry;
pub use schema::{PropertyDef, Schema};
pub use spec::{PropertyOptions, PropertySpec};
pub use state::AttributeSet;
pub use transform::{Selector, Transformer};
pub use value::AttrValue;
