//! # cfnkit_core
//!
//! The schema-driven property engine of cfnkit.
//!
//! - [`PropertyValidator`] checks a property bag against a schema and reports
//!   every problem at once.
//! - [`PropertyRenderer`] validates and then renders an idiomatic (camelCase)
//!   bag into a wire-format (PascalCase) template fragment.
//! - [`PropertyParser`] turns a template fragment back into a bag, keeping
//!   unrecognized fields as extra properties.
//!
//! Values that are only known later (references, attributes, imported
//! intrinsic functions) are [`Token`]s. They pass every validation and are
//! handed to a [`Resolver`] at render time.
//!
//! ## Example
//!
//! ```rust
//! use cfnkit_core::{IntrinsicResolver, PropertyBag, PropertyRenderer, PropertyValue};
//! use cfnkit_schema::{FieldKind, PropertySchema, SchemaRegistry};
//! use serde_json::json;
//!
//! let registry = SchemaRegistry::new().with(
//!     PropertySchema::resource("AWS::Comprehend::Flywheel")
//!         .optional("entityTypes", FieldKind::list(FieldKind::String))
//!         .build()
//!         .unwrap(),
//! );
//! let schema = registry.get("AWS::Comprehend::Flywheel").unwrap();
//! let bag = PropertyBag::new().with("entityTypes", vec!["EMAIL", "PHONE_NUMBER"]);
//!
//! let resolver = IntrinsicResolver::new();
//! let fragment = PropertyRenderer::new(&registry, &resolver)
//!     .render(schema, &PropertyValue::Object(bag))
//!     .unwrap();
//! assert_eq!(fragment, json!({ "EntityTypes": ["EMAIL", "PHONE_NUMBER"] }));
//! ```

pub mod error;
pub mod parser;
pub mod renderer;
pub mod token;
pub mod validation;
pub mod validator;
pub mod value;

pub use error::{CoreError, CoreResult};
pub use parser::{escape_path_segment, FromTemplateResult, PropertyParser};
pub use renderer::PropertyRenderer;
pub use token::{is_intrinsic, IntrinsicResolver, Resolver, Token};
pub use validation::{FieldError, ValidationError, ValidationResult};
pub use validator::PropertyValidator;
pub use value::{PropertyBag, PropertyValue};
