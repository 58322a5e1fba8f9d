//! # cfnkit_schema
//!
//! Declarative property schemas for cfnkit.
//!
//! A schema lists the fields of one resource or nested-structure type: their
//! idiomatic and wire-format names, their kind and whether they are required.
//! Schemas are data, loaded from catalog files or built in code, and are
//! interpreted by the validator, renderer and parser in `cfnkit_core`.
//!
//! ## Example
//!
//! ```rust
//! use cfnkit_schema::{FieldKind, PropertySchema, SchemaRegistry};
//!
//! let link = PropertySchema::resource("AWS::Oam::Link")
//!     .required("labelTemplate", FieldKind::String)
//!     .required("resourceTypes", FieldKind::list(FieldKind::String))
//!     .optional("tags", FieldKind::map(FieldKind::String))
//!     .build()
//!     .unwrap();
//!
//! let registry = SchemaRegistry::new().with(link);
//! assert!(registry.exists("AWS::Oam::Link"));
//! ```

pub mod error;
pub mod loader;
pub mod naming;
pub mod registry;
pub mod schema;

pub use error::{SchemaError, SchemaResult};
pub use loader::{SchemaDocument, SchemaLoader};
pub use registry::SchemaRegistry;
pub use schema::{FieldDescriptor, FieldKind, PropertySchema, SchemaBuilder, SchemaCategory};
