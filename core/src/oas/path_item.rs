#![deny(missing_docs)]

//! # Path Items
//!
//! Builds the PathItem of one addressable resource: its read/create/delete
//! operations and the parameters shared by them.

use crate::naming::{derive_name, key_placeholders, operation_id};
use crate::oas::models::{
    MediaType, Operation, Parameter, PathItem, Ref, RefOr, RequestBody, Response,
    SchemaComponent,
};
use crate::settings::BuildContext;
use indexmap::IndexMap;

/// Name of the component returned by leafref option endpoints.
pub const LEAFREF_OPTIONS: &str = "LeafRefOptions";

/// Name of a single leafref option component.
pub const LEAFREF_OPTION: &str = "LeafRefOption";

/// Suffix of the array component wrapping all entries of a list.
///
/// Child segments are always joined with `_`, so a child node named `list`
/// yields `<Name>_List` and never meets the array name.
pub const LIST_SUFFIX: &str = "-List";

const JSON_MEDIA: &str = "application/json";

/// What kind of resource a path addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathType {
    /// A container.
    Container,
    /// One entry of a list (keyed path).
    ListEntry,
    /// All entries of a list (unkeyed path). Read only.
    ListMultiple,
    /// The selectable values of a leafref. Read only.
    LeafRefValues,
}

impl PathType {
    fn label(self) -> &'static str {
        match self {
            PathType::Container => "Container",
            PathType::ListEntry => "List",
            PathType::ListMultiple => "List (all entries)",
            PathType::LeafRefValues => "Leafref values",
        }
    }

    fn read_only(self) -> bool {
        matches!(self, PathType::ListMultiple | PathType::LeafRefValues)
    }
}

/// Builds the PathItem for `item_path`.
///
/// `key_path` supplies the key placeholders that become parameters (the
/// target placeholder excluded, it is always appended last). Create and delete
/// are only emitted when `writable` and the path type allows it.
pub fn new_path_item(
    ctx: &BuildContext,
    item_path: &str,
    key_path: &str,
    path_type: PathType,
    writable: bool,
) -> PathItem {
    let base_name = derive_name(item_path, &ctx.naming_root);
    let (schema_name, id_suffix) = match path_type {
        PathType::ListMultiple => (format!("{}{}", base_name, LIST_SUFFIX), LIST_SUFFIX),
        PathType::LeafRefValues => (LEAFREF_OPTIONS.to_string(), ""),
        PathType::Container | PathType::ListEntry => (base_name, ""),
    };
    let op_id = |verb: &str| {
        format!(
            "{}{}",
            operation_id(verb, item_path, &ctx.naming_root),
            id_suffix
        )
    };
    let schema = || RefOr::Ref(Ref::from_schema_name(&schema_name));

    let get = Operation {
        summary: format!("GET {} {}", item_path, path_type.label()),
        operation_id: op_id("get"),
        request_body: None,
        responses: responses("200", "GET OK 200", Some(schema())),
    };

    let (post, delete) = if writable && !path_type.read_only() {
        let post = Operation {
            summary: format!("POST {}", item_path),
            operation_id: op_id("post"),
            request_body: Some(RequestBody {
                required: true,
                content: json_content(schema()),
            }),
            responses: responses("201", "created", None),
        };
        let delete = Operation {
            summary: format!("DELETE {}", item_path),
            operation_id: op_id("delete"),
            request_body: None,
            responses: responses("200", "DELETE 200 OK", None),
        };
        (Some(post), Some(delete))
    } else {
        (None, None)
    };

    PathItem {
        get: Some(get),
        post,
        delete,
        parameters: path_parameters(ctx, key_path),
    }
}

/// Key parameters of `key_path` (deduplicated, target excluded) followed by the target.
pub fn path_parameters(ctx: &BuildContext, key_path: &str) -> Vec<Parameter> {
    let mut params: Vec<Parameter> = Vec::new();
    for key in key_placeholders(key_path) {
        if key == ctx.target_alias || params.iter().any(|p| p.name == key) {
            continue;
        }
        let description = format!("key {{{}}}", key);
        params.push(Parameter::path(key, description));
    }
    params.push(Parameter::path(
        ctx.target_alias.clone(),
        ctx.target_description(),
    ));
    params
}

fn json_content(schema: RefOr<SchemaComponent>) -> IndexMap<String, MediaType> {
    let mut content = IndexMap::new();
    content.insert(JSON_MEDIA.to_string(), MediaType { schema });
    content
}

fn responses(
    status: &str,
    description: &str,
    schema: Option<RefOr<SchemaComponent>>,
) -> IndexMap<String, Response> {
    let mut map = IndexMap::new();
    map.insert(
        status.to_string(),
        Response {
            description: description.to_string(),
            content: schema.map(json_content).unwrap_or_default(),
        },
    );
    map
}
