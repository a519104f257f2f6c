#![deny(missing_docs)]

//! # OpenAPI Output Module
//!
//! - **models**: Serializable OpenAPI 3.0 structures (schemas, paths, parameters).
//! - **path_item**: Construction of the PathItem of one addressable resource.

pub mod models;
pub mod path_item;

pub use models::{
    Components, JsonType, Operation, Parameter, PathItem, Paths, Ref, RefOr, SchemaComponent,
    Schemas,
};
pub use path_item::{new_path_item, path_parameters, PathType};
