#![deny(missing_docs)]

//! # Leafref Resolution
//!
//! Walks a leafref `path` expression over the schema tree and returns the
//! concrete type of the leaf it ends on.
//!
//! Two forms are supported:
//! - **Relative**: `../../peer/name`. Each `..` moves one level up starting at
//!   the referencing leaf (so the first `..` lands on its parent), the
//!   remaining segments descend by name.
//! - **Absolute**: `/sw:device/sw:port/sw:name`. Descends from the tree root;
//!   module prefixes are ignored when matching names.
//!
//! Predicates (`[name = current()/../if]`) constrain instances, not schema
//! nodes, and are stripped before walking. Chains of leafrefs are followed to
//! the first non-leafref leaf; cycles are errors.

use crate::error::{AppError, AppResult};
use crate::tree::{LeafType, NodeId, SchemaTree, TypeKind};
use regex::Regex;
use std::sync::OnceLock;

/// A parsed leafref path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathExpr {
    /// Root-anchored path; segments are local names.
    Absolute(Vec<String>),
    /// `up` parent steps followed by child names.
    Relative {
        /// Number of leading `..` segments.
        up: usize,
        /// Child names to descend through.
        down: Vec<String>,
    },
}

/// Parses a leafref path expression. Returns a human readable reason on failure.
pub fn parse_path_expr(expr: &str) -> Result<PathExpr, String> {
    static PREDICATE_RE: OnceLock<Regex> = OnceLock::new();
    let predicate_re =
        PREDICATE_RE.get_or_init(|| Regex::new(r"\[[^\]]*\]").expect("Invalid regex"));

    let stripped = predicate_re.replace_all(expr.trim(), "");
    if stripped.is_empty() {
        return Err("empty path".into());
    }

    if let Some(rest) = stripped.strip_prefix('/') {
        let segments = rest
            .split('/')
            .map(local_name)
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(PathExpr::Absolute(segments));
    }

    let mut up = 0;
    let mut down = Vec::new();
    for segment in stripped.split('/') {
        let segment = segment.trim();
        if segment == ".." {
            if !down.is_empty() {
                return Err("'..' after a child segment".into());
            }
            up += 1;
        } else {
            down.push(local_name(segment)?);
        }
    }
    if up == 0 {
        return Err("relative path must start with '..'".into());
    }
    Ok(PathExpr::Relative { up, down })
}

/// Drops a `prefix:` qualifier from a path segment.
fn local_name(segment: &str) -> Result<String, String> {
    let segment = segment.trim();
    let name = segment.rsplit(':').next().unwrap_or(segment);
    if name.is_empty() {
        return Err(format!("empty segment in '{}'", segment));
    }
    Ok(name.to_string())
}

/// Follows one leafref hop from `leaf` along `expr` and returns the node reached.
pub fn resolve_path(tree: &SchemaTree, leaf: NodeId, expr: &str) -> AppResult<NodeId> {
    let fail = |reason: String| AppError::UnresolvableReference {
        leaf: tree.node_path(leaf),
        path: expr.to_string(),
        reason,
    };

    let parsed = parse_path_expr(expr).map_err(fail)?;
    let (mut current, down) = match parsed {
        PathExpr::Absolute(segments) => (tree.root(), segments),
        PathExpr::Relative { up, down } => {
            let mut current = leaf;
            for _ in 0..up {
                current = tree
                    .parent(current)
                    .ok_or_else(|| fail(format!("'..' goes above the root ({} levels)", up)))?;
            }
            (current, down)
        }
    };

    for name in &down {
        current = tree.child_by_name(current, name).ok_or_else(|| {
            fail(format!(
                "no child '{}' under {}",
                name,
                tree.node_path(current)
            ))
        })?;
    }

    if !tree.node(current).kind.is_leaf_like() {
        return Err(fail(format!(
            "target {} is a {}, not a leaf",
            tree.node_path(current),
            tree.node(current).kind
        )));
    }
    Ok(current)
}

/// Follows the leafref chain starting at `leaf` to the first non-leafref leaf.
///
/// Returns `leaf` itself when it is not a leafref.
pub fn resolve_reference_target(tree: &SchemaTree, leaf: NodeId) -> AppResult<NodeId> {
    let mut chain = vec![leaf];
    let mut current = leaf;
    loop {
        let ty = leaf_type(tree, current)?;
        if ty.kind != TypeKind::LeafRef {
            return Ok(current);
        }
        let expr = ty.path.as_deref().ok_or_else(|| AppError::UnresolvableReference {
            leaf: tree.node_path(current),
            path: String::new(),
            reason: "leafref without a path".into(),
        })?;

        let next = resolve_path(tree, current, expr)?;
        if chain.contains(&next) {
            let cycle = chain
                .iter()
                .chain(std::iter::once(&next))
                .map(|n| tree.node_path(*n))
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(AppError::UnresolvableReference {
                leaf: tree.node_path(leaf),
                path: expr.to_string(),
                reason: format!("cyclic reference chain {}", cycle),
            });
        }
        chain.push(next);
        current = next;
    }
}

/// The concrete (non-leafref) type kind a leafref ultimately refers to.
pub fn resolve_reference_kind(tree: &SchemaTree, leaf: NodeId) -> AppResult<TypeKind> {
    let target = resolve_reference_target(tree, leaf)?;
    Ok(leaf_type(tree, target)?.kind)
}

fn leaf_type(tree: &SchemaTree, id: NodeId) -> AppResult<&LeafType> {
    tree.node(id).leaf_type.as_ref().ok_or_else(|| {
        AppError::InvalidTree(format!(
            "{} {} has no type",
            tree.node(id).kind,
            tree.node_path(id)
        ))
    })
}
