#![deny(missing_docs)]

//! # OpenAPI Models
//!
//! Output structures of a compilation: schema components and path items.
//!
//! They serialize directly into the OpenAPI 3.0 shapes they describe, so the
//! document assembler only has to place them under `paths` and
//! `components`. Only the pragmatic subset the generator emits is modelled.

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::fmt;

/// `paths`: path template -> PathItem, in emission order.
pub type Paths = IndexMap<String, PathItem>;

/// `components.schemas`: component name -> schema, in emission order.
pub type Schemas = IndexMap<String, SchemaComponent>;

/// The JSON Schema `type` keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonType {
    /// A string type.
    #[default]
    String,
    /// An integer type.
    Integer,
    /// A floating point number.
    Number,
    /// A boolean type.
    Boolean,
    /// An object with properties.
    Object,
    /// An array of items.
    Array,
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JsonType::String => "string",
            JsonType::Integer => "integer",
            JsonType::Number => "number",
            JsonType::Boolean => "boolean",
            JsonType::Object => "object",
            JsonType::Array => "array",
        };
        write!(f, "{}", s)
    }
}

/// A `$ref` to a named component schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ref {
    /// Full reference location, e.g. `#/components/schemas/Switch`.
    #[serde(rename = "$ref")]
    pub ref_location: String,
}

impl Ref {
    /// Reference to `#/components/schemas/{name}`.
    pub fn from_schema_name(name: impl AsRef<str>) -> Self {
        Self {
            ref_location: format!("#/components/schemas/{}", name.as_ref()),
        }
    }

    /// The referenced component name, if the reference is local.
    pub fn schema_name(&self) -> Option<&str> {
        self.ref_location.strip_prefix("#/components/schemas/")
    }
}

/// Either a reference or an inline value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RefOr<T> {
    /// `$ref` object.
    Ref(Ref),
    /// Inline value.
    T(T),
}

impl<T> RefOr<T> {
    /// The inline value, if not a reference.
    pub fn as_inline(&self) -> Option<&T> {
        match self {
            RefOr::T(value) => Some(value),
            RefOr::Ref(_) => None,
        }
    }

    /// The reference, if not inline.
    pub fn as_reference(&self) -> Option<&Ref> {
        match self {
            RefOr::Ref(r) => Some(r),
            RefOr::T(_) => None,
        }
    }
}

/// A schema component (or an inline schema).
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaComponent {
    /// Primitive JSON type.
    #[serde(rename = "type")]
    pub schema_type: JsonType,
    /// Optional format specifier (e.g. "int32", "double").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// The node's local name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// The node's description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Inclusive lower bound.
    #[serde(
        rename = "minimum",
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_bound"
    )]
    pub min: Option<f64>,
    /// Inclusive upper bound.
    #[serde(
        rename = "maximum",
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_bound"
    )]
    pub max: Option<f64>,
    /// Minimum string length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    /// Maximum string length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    /// Regular expression the value must match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Default value, typed after the schema's `type`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    /// Allowed values (enumerations, identities).
    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
    /// Set for state (non-config) data.
    #[serde(skip_serializing_if = "is_false")]
    pub read_only: bool,
    /// Element schema of arrays.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<RefOr<SchemaComponent>>>,
    /// Object properties, keyed by child name.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, RefOr<SchemaComponent>>,
    /// Mandatory properties.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    /// Path expression of a leafref.
    #[serde(rename = "x-leafref", skip_serializing_if = "Option::is_none")]
    pub leafref: Option<String>,
}

impl SchemaComponent {
    /// An untitled schema of the given type.
    pub fn new(schema_type: JsonType) -> Self {
        Self {
            schema_type,
            ..Self::default()
        }
    }

    /// Sets title and description.
    pub fn titled(mut self, title: impl Into<String>, description: Option<String>) -> Self {
        self.title = Some(title.into());
        self.description = description;
        self
    }

    /// Inline element schema of an array, if any.
    pub fn inline_items(&self) -> Option<&SchemaComponent> {
        self.items.as_deref().and_then(RefOr::as_inline)
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Integral bounds are written as JSON integers, others as floats.
fn serialize_bound<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    const EXACT_LIMIT: f64 = 9_007_199_254_740_992.0;
    match value {
        Some(v) if v.fract() == 0.0 && v.abs() <= EXACT_LIMIT => {
            serializer.serialize_i64(*v as i64)
        }
        Some(v) => serializer.serialize_f64(*v),
        None => serializer.serialize_none(),
    }
}

/// Location of a parameter. Only path parameters are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterIn {
    /// URL Path parameter (e.g. /switch/{switch-id})
    Path,
}

/// A path parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    /// Placeholder name.
    pub name: String,
    /// Always `path`.
    #[serde(rename = "in")]
    pub location: ParameterIn,
    /// Human readable description.
    pub description: String,
    /// Path parameters are always required.
    pub required: bool,
    /// Value schema.
    pub schema: SchemaComponent,
}

impl Parameter {
    /// A required string path parameter.
    pub fn path(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: ParameterIn::Path,
            description: description.into(),
            required: true,
            schema: SchemaComponent::new(JsonType::String),
        }
    }
}

/// Media type object holding a schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaType {
    /// Payload schema.
    pub schema: RefOr<SchemaComponent>,
}

/// A response entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    /// Response description.
    pub description: String,
    /// Payload by media type.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub content: IndexMap<String, MediaType>,
}

/// A request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestBody {
    /// Whether the body is mandatory.
    pub required: bool,
    /// Payload by media type.
    pub content: IndexMap<String, MediaType>,
}

/// One operation on a path.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Summary text, e.g. `GET /switch Container`.
    pub summary: String,
    /// Derived identifier, e.g. `getSwitch`.
    pub operation_id: String,
    /// Payload of create operations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,
    /// Responses by status code.
    pub responses: IndexMap<String, Response>,
}

/// The operations and shared parameters of one path template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathItem {
    /// Read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    /// Create.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    /// Delete.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
    /// Parameters shared by every operation: inherited keys, then the target.
    pub parameters: Vec<Parameter>,
}

impl PathItem {
    /// Operations present on this path, in get/post/delete order.
    pub fn operations(&self) -> impl Iterator<Item = &Operation> {
        [&self.get, &self.post, &self.delete]
            .into_iter()
            .filter_map(Option::as_ref)
    }
}

/// The `components` section.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Components {
    /// Named schemas.
    pub schemas: Schemas,
    /// Named parameters.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub parameters: IndexMap<String, Parameter>,
}
