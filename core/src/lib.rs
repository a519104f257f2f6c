#![deny(missing_docs)]

//! # YANG OpenAPI Core
//!
//! Compiles a YANG schema tree into an OpenAPI 3.0 description of its
//! RESTCONF-style CRUD surface.
//!
//! The entry point is [`generate_openapi_document`]; [`build_schema`] exposes
//! the per-subtree compilation for callers that assemble documents themselves.

/// Shared error types.
pub mod error;

/// Generator settings and the build context.
pub mod settings;

/// The schema tree input contract.
pub mod tree;

/// Numeric range and string length resolution.
pub mod range;

/// Leafref path resolution.
pub mod leafref;

/// Path, component and operation naming.
pub mod naming;

/// OpenAPI output structures.
pub mod oas;

/// Schema tree walk.
pub mod builder;

/// Document assembly.
pub mod document;

pub use builder::{build_schema, BuildOutput, SchemaBuilder};
pub use document::{generate_openapi_document, to_yaml_string, OPENAPI_VERSION};
pub use error::{AppError, AppResult};
pub use leafref::{resolve_reference_kind, resolve_reference_target};
pub use naming::{derive_name, operation_id, path_to_schema_name};
pub use oas::{new_path_item, PathItem, PathType, SchemaComponent};
pub use range::{
    decimal_to_float, effective_length, effective_range, Decimal, EffectiveRange, SubRange,
};
pub use settings::{BuildContext, GeneratorSettings};
pub use tree::{LeafType, NodeId, NodeKind, SchemaNode, SchemaTree, TriState, TypeKind};
