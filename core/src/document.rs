#![deny(missing_docs)]

//! # Document Assembly
//!
//! Compiles every top-level subtree of a schema tree under the settings' path
//! prefix and wraps the result into a complete OpenAPI 3.0 document.

use crate::builder::SchemaBuilder;
use crate::error::AppResult;
use crate::oas::models::{Components, JsonType, Parameter, Paths, Ref, RefOr, SchemaComponent};
use crate::oas::path_item::{LEAFREF_OPTION, LEAFREF_OPTIONS};
use crate::settings::{BuildContext, GeneratorSettings};
use crate::tree::{SchemaTree, TriState};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

/// OpenAPI version written into every document.
pub const OPENAPI_VERSION: &str = "3.0.0";

const GENERATED_OWNER: &str = "(generated)";

#[derive(Serialize)]
struct Info<'a> {
    title: String,
    version: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
}

#[derive(Serialize)]
struct OpenApiDocument<'a> {
    openapi: &'static str,
    info: Info<'a>,
    paths: Paths,
    components: Components,
}

/// Compiles `tree` into an OpenAPI document.
///
/// Each child of the tree root is compiled with
/// [`GeneratorSettings::path_prefix`] as parent path. Names must be unique
/// across all subtrees. When any leafref was compiled the shared
/// `LeafRefOption`/`LeafRefOptions` schemas are added.
pub fn generate_openapi_document(
    tree: &SchemaTree,
    settings: &GeneratorSettings,
) -> AppResult<Value> {
    settings.validate()?;
    let ctx = BuildContext::from(settings);
    let prefix = settings.path_prefix();

    let mut builder = SchemaBuilder::new(tree, &ctx);
    builder.build_schema(tree.root(), TriState::Unset, &prefix)?;
    if builder.has_reference() {
        builder.insert_component(LEAFREF_OPTION, leafref_option(), GENERATED_OWNER)?;
        let mut options = SchemaComponent::new(JsonType::Array);
        options.items = Some(Box::new(RefOr::Ref(Ref::from_schema_name(LEAFREF_OPTION))));
        builder.insert_component(LEAFREF_OPTIONS, options, GENERATED_OWNER)?;
    }
    let out = builder.finish();

    let mut parameters = IndexMap::new();
    parameters.insert(
        ctx.target_alias.clone(),
        Parameter::path(ctx.target_alias.clone(), ctx.target_description()),
    );

    let document = OpenApiDocument {
        openapi: OPENAPI_VERSION,
        info: Info {
            title: settings.resolved_title(),
            version: &settings.model_version,
            description: settings.description.as_deref(),
        },
        paths: out.paths,
        components: Components {
            schemas: out.components,
            parameters,
        },
    };
    info!(
        title = %document.info.title,
        paths = document.paths.len(),
        components = document.components.schemas.len(),
        "Generated OpenAPI document"
    );
    Ok(serde_json::to_value(&document)?)
}

/// Renders a document as YAML.
pub fn to_yaml_string(document: &Value) -> AppResult<String> {
    Ok(serde_yaml::to_string(document)?)
}

/// One selectable leafref value.
fn leafref_option() -> SchemaComponent {
    let mut option = SchemaComponent::new(JsonType::Object);
    option.description = Some("Selectable value of a leafref".into());
    for field in ["value", "label"] {
        option.properties.insert(
            field.to_string(),
            RefOr::T(SchemaComponent::new(JsonType::String)),
        );
    }
    option.required.push("value".to_string());
    option
}
