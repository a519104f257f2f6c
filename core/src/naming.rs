#![deny(missing_docs)]

//! # Naming Utilities
//!
//! Derives REST path segments, component names and operation identifiers from
//! positions in the schema tree.
//!
//! Names are computed from path templates, so they mirror the ancestor chain:
//! `/qos-profile/qos-profile/{id}/arp` is named `Qos-profile_Qos-profile_Arp`
//! and its create operation is `postQos-profile_Qos-profile_Arp`.

use crate::tree::{NodeId, SchemaTree};
use regex::Regex;
use std::sync::OnceLock;

fn placeholder_re() -> &'static Regex {
    static PLACEHOLDER_RE: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER_RE.get_or_init(|| Regex::new(r"\{([^{}/]+)\}").expect("Invalid regex"))
}

/// Removes every `{key}` segment from a path template.
///
/// e.g. `/subscriber/ue/{id}/profiles` -> `/subscriber/ue/profiles`
pub fn path_to_schema_name(path: &str) -> String {
    path.split('/')
        .filter(|segment| !segment.starts_with('{'))
        .collect::<Vec<_>>()
        .join("/")
}

/// Names of the `{key}` placeholders in a path template, in order of appearance.
pub fn key_placeholders(path: &str) -> Vec<String> {
    placeholder_re()
        .captures_iter(path)
        .map(|c| c[1].to_string())
        .collect()
}

/// Upper-cases the first character only (`cont-int-ref` -> `Cont-int-ref`).
pub fn title_case(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Strips `root` from the front of `path` when it is a whole-segment prefix.
pub fn relative_to<'a>(path: &'a str, root: &str) -> &'a str {
    if root.is_empty() {
        return path;
    }
    match path.strip_prefix(root) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => path,
    }
}

/// Joins the title-cased literal segments of a path template with `_`.
///
/// Key placeholders are dropped; a `prefix:name` segment contributes both parts.
pub fn schema_name(path: &str) -> String {
    path_to_schema_name(path)
        .split(['/', ':'])
        .filter(|part| !part.is_empty())
        .map(title_case)
        .collect::<Vec<_>>()
        .join("_")
}

/// Component name of the node at `item_path`, relative to `naming_root`.
///
/// The root's own segments never take part, so the same subtree compiled under
/// different REST prefixes yields the same names.
pub fn derive_name(item_path: &str, naming_root: &str) -> String {
    schema_name(relative_to(item_path, naming_root))
}

/// `verb` followed by the derived name, e.g. `postA_B_C` for `/a/b/{id}/c`.
pub fn operation_id(verb: &str, item_path: &str, naming_root: &str) -> String {
    format!("{}{}", verb, derive_name(item_path, naming_root))
}

/// REST segment of a node: its local name, qualified as `prefix:name` when the
/// node is declared in a different module than its parent.
pub fn path_segment(tree: &SchemaTree, id: NodeId) -> String {
    let node = tree.node(id);
    let parent_prefix = tree
        .parent(id)
        .and_then(|p| tree.node(p).namespace_prefix.as_deref());
    match (node.namespace_prefix.as_deref(), parent_prefix) {
        (Some(own), Some(parent)) if own != parent => format!("{}:{}", own, node.name),
        _ => node.name.clone(),
    }
}
