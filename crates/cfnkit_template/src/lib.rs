//! # cfnkit_template
//!
//! Resource wrappers and template documents for cfnkit.
//!
//! - [`CfnResource`] binds a validated property bag to a logical ID, renders
//!   it into a `{"Type", "Properties", ...}` entry and reconstructs itself from
//!   an existing template entry.
//! - [`Template`] collects resources by logical ID, passes the other sections
//!   through, and imports whole documents.
//! - [`serialize`] reads and writes JSON and YAML, including short-form
//!   intrinsic tags.
//!
//! ## Example
//!
//! ```rust
//! use cfnkit_core::{IntrinsicResolver, PropertyBag};
//! use cfnkit_schema::{FieldKind, PropertySchema, SchemaRegistry};
//! use cfnkit_template::{CfnResource, Scope, Template};
//!
//! let registry = SchemaRegistry::new().with(
//!     PropertySchema::resource("AWS::Oam::Sink")
//!         .required("name", FieldKind::String)
//!         .build()
//!         .unwrap(),
//! );
//!
//! let sink = CfnResource::new(
//!     &Scope::named("Monitoring"),
//!     "Sink",
//!     registry.get("AWS::Oam::Sink").unwrap(),
//!     PropertyBag::new().with("name", "central"),
//!     &registry,
//! )
//! .unwrap();
//!
//! let mut template = Template::new();
//! template.add_resource(sink).unwrap();
//!
//! let document = template.synthesize(&registry, &IntrinsicResolver::new()).unwrap();
//! assert_eq!(document["Resources"]["Sink"]["Properties"]["Name"], "central");
//! ```

pub mod document;
pub mod error;
pub mod options;
pub mod overrides;
pub mod resource;
pub mod scope;
pub mod serialize;

pub use document::Template;
pub use error::{TemplateError, TemplateResult};
pub use options::{RemovalPolicy, ResourceOptions};
pub use overrides::{apply_overrides, PropertyOverride};
pub use resource::{is_valid_logical_id, CfnResource, ResourceState};
pub use scope::Scope;
pub use serialize::{
    deserialize_structure, load_structured_file, obscure_template, serialize_structure, to_json,
    to_yaml,
};
