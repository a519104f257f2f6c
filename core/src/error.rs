//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.
//!
//! Every compilation error is fatal for the enclosing build: the builder never
//! returns partial output. Errors that originate at a schema node carry the
//! node's full ancestor path (e.g. `/device/switch/port/speed`).

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// A leafref path could not be walked to a concrete leaf.
    #[from(ignore)]
    #[display("Unresolvable reference '{path}' in {leaf}: {reason}")]
    UnresolvableReference {
        /// Full path of the referencing leaf.
        leaf: String,
        /// The path expression as declared.
        path: String,
        /// What went wrong while walking.
        reason: String,
    },

    /// A declared range or length has inverted or non-numeric bounds.
    #[from(ignore)]
    #[display("Malformed range in {node}: {detail}")]
    MalformedRange {
        /// Full path of the constrained node (or the offending literal).
        node: String,
        /// Description of the defect.
        detail: String,
    },

    /// Two distinct nodes derived the same schema name or operation id.
    #[from(ignore)]
    #[display("Name collision on '{name}' between {first} and {second}")]
    NameCollision {
        /// The colliding derived name.
        name: String,
        /// Path that claimed the name first.
        first: String,
        /// Path that tried to claim it again.
        second: String,
    },

    /// A leaf type the generator cannot express.
    #[from(ignore)]
    #[display("Unsupported type '{kind}' in {node}")]
    UnsupportedType {
        /// Full path of the leaf.
        node: String,
        /// The YANG type keyword.
        kind: String,
    },

    /// The input tree violates its structural contract.
    #[from(ignore)]
    #[display("Invalid Tree: {_0}")]
    InvalidTree(String),

    /// JSON (de)serialization failure.
    #[display("JSON Error: {_0}")]
    Json(serde_json::Error),

    /// YAML (de)serialization failure.
    #[display("YAML Error: {_0}")]
    Yaml(serde_yaml::Error),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

impl AppError {
    /// Moves a range error onto the node that declared the range.
    ///
    /// The offending literal is kept in the detail. Other variants pass through.
    pub fn at_node(self, node: impl Into<String>) -> AppError {
        match self {
            AppError::MalformedRange {
                node: literal,
                detail,
            } => AppError::MalformedRange {
                node: node.into(),
                detail: format!("{} ({})", detail, literal),
            },
            other => other,
        }
    }
}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
