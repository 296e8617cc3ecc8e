//! leafref target resolution.
//!
//! A leafref's wire representation is the type of the leaf its `path` points
//! at. Relative paths (`../x`) start from the leaf's data parent, absolute
//! paths (`/a/b`) from the tree root. Choice and case nodes are not part of
//! the data tree, so both directions step through them transparently.
//!
//! Anything that cannot be followed resolves to `string`, which is always a
//! safe representation for a reference value.

use tracing::debug;
use yang_rest_core::{NodeId, NodeKind, SchemaTree, TypeKind};

/// Upper bound on leafref → leafref chains (guards against cycles).
const MAX_HOPS: usize = 16;

/// Resolve the type kind a leafref leaf ultimately refers to.
///
/// Chains of leafrefs are followed. Unsupported path forms, missing nodes,
/// prefix mismatches, non-leaf targets and cycles all yield
/// [`TypeKind::String`].
pub(crate) fn resolve_kind(tree: &SchemaTree, leaf: NodeId) -> TypeKind {
    let mut current = leaf;
    for _ in 0..MAX_HOPS {
        let Some(expr) = tree
            .node(current)
            .kind
            .leaf_type()
            .and_then(|t| t.path.as_deref())
        else {
            return TypeKind::String;
        };

        let Some(target) = follow(tree, current, expr) else {
            debug!(path = %tree.path_of(current), leafref = expr, "unresolved leafref, using string");
            return TypeKind::String;
        };

        match tree.node(target).kind.leaf_type() {
            Some(ty) if ty.kind == TypeKind::Leafref => current = target,
            Some(ty) => return ty.kind,
            None => {
                debug!(path = %tree.path_of(current), leafref = expr, "leafref target is not a leaf");
                return TypeKind::String;
            }
        }
    }

    debug!(path = %tree.path_of(leaf), "leafref chain too long, using string");
    TypeKind::String
}

/// Follow a path expression from the leaf `from`.
fn follow(tree: &SchemaTree, from: NodeId, expr: &str) -> Option<NodeId> {
    let expr = strip_predicates(expr.trim());
    if expr.starts_with("//") {
        return None;
    }
    if let Some(rest) = expr.strip_prefix('/') {
        return descend(tree, tree.root_of(from), rest);
    }
    if expr.starts_with("..") {
        // The leaf itself is the context node; `..` is its data parent.
        let rest = expr.strip_prefix("..").unwrap_or_default();
        return descend(tree, data_parent(tree, from)?, rest.trim_start_matches('/'));
    }
    None
}

/// Walk `path` (`a/b`, `../x`, `p:a/p:b`) downward from `start`.
fn descend(tree: &SchemaTree, start: NodeId, path: &str) -> Option<NodeId> {
    let mut current = start;
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        match segment {
            "." => {}
            ".." => current = data_parent(tree, current)?,
            _ => {
                let (prefix, name) = match segment.split_once(':') {
                    Some((prefix, name)) => (Some(prefix), name),
                    None => (None, segment),
                };
                let child = data_child(tree, current, name)?;
                // Nodes loaded without a prefix accept any prefix.
                if let (Some(want), Some(have)) = (prefix, tree.node(child).prefix.as_deref()) {
                    if want != have {
                        return None;
                    }
                }
                current = child;
            }
        }
    }
    Some(current)
}

/// Nearest ancestor that is a data node.
fn data_parent(tree: &SchemaTree, id: NodeId) -> Option<NodeId> {
    let mut parent = tree.parent(id)?;
    while matches!(tree.node(parent).kind, NodeKind::Choice | NodeKind::Case) {
        parent = tree.parent(parent)?;
    }
    Some(parent)
}

/// Data child `name` of `parent`, looking through choices and cases.
fn data_child(tree: &SchemaTree, parent: NodeId, name: &str) -> Option<NodeId> {
    tree.children(parent).find_map(|(id, node)| match node.kind {
        NodeKind::Choice | NodeKind::Case => data_child(tree, id, name),
        _ if node.name == name => Some(id),
        _ => None,
    })
}

/// Drop `[...]` predicates, which may themselves contain `/`.
fn strip_predicates(expr: &str) -> String {
    let mut out = String::with_capacity(expr.len());
    let mut depth = 0usize;
    for c in expr.chars() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}
