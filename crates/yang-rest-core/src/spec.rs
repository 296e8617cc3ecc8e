//! Serde tree description and its conversion into a [`SchemaTree`].
//!
//! This is the hand-off format from the YANG loader: a nested document where
//! each node lists its children inline. [`SchemaTree::from_spec`] flattens it
//! into the arena and checks the structural rules the compiler relies on.

use serde::Deserialize;

use crate::tree::{ListAttr, Must, NodeId, NodeKind, SchemaNode, SchemaTree, TriState};
use crate::types::{LeafType, TypeKind, YangRange};
use crate::TreeError;

/// Node kind keyword in a tree description.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[allow(missing_docs)]
pub enum NodeSpecKind {
    Leaf,
    LeafList,
    Choice,
    Case,
    #[default]
    Container,
    List,
}

/// One node of a tree description.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeSpec {
    /// Local name.
    pub name: String,
    /// Node kind; containers may omit it.
    #[serde(default)]
    pub kind: NodeSpecKind,
    /// Defining module prefix.
    #[serde(default)]
    pub prefix: Option<String>,
    /// `description` statement.
    #[serde(default)]
    pub description: String,
    /// `config` statement; absent means inherit.
    #[serde(default)]
    pub config: Option<bool>,
    /// `mandatory` statement.
    #[serde(default)]
    pub mandatory: bool,
    /// Type of a leaf or leaf-list.
    #[serde(default, rename = "type")]
    pub type_spec: Option<TypeSpec>,
    /// List attributes (`keys`, `min_elements`, `max_elements`, `must`).
    #[serde(flatten)]
    pub list: ListSpec,
    /// Child nodes in schema order.
    #[serde(default)]
    pub children: Vec<NodeSpec>,
}

/// List attributes of a tree description node.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListSpec {
    /// Key leaf names; either a sequence or a YANG-style space separated string.
    #[serde(default, deserialize_with = "deserialize_keys")]
    pub keys: Vec<String>,
    /// `min-elements`.
    #[serde(default)]
    pub min_elements: u64,
    /// `max-elements`; absent means unbounded.
    #[serde(default)]
    pub max_elements: Option<u64>,
    /// `must` statements.
    #[serde(default)]
    pub must: Vec<Must>,
}

/// Leaf type in a tree description.
#[derive(Debug, Clone, Deserialize)]
pub struct TypeSpec {
    /// Built-in kind after typedef resolution.
    pub kind: TypeKind,
    /// Typedef name, defaults to the built-in keyword.
    #[serde(default)]
    pub name: Option<String>,
    /// `length` intervals.
    #[serde(default)]
    pub length: Option<YangRange>,
    /// `range` intervals.
    #[serde(default)]
    pub range: Option<YangRange>,
    /// `pattern` statements.
    #[serde(default, alias = "pattern")]
    pub patterns: Vec<String>,
    /// `default` statement.
    #[serde(default, deserialize_with = "deserialize_scalar")]
    pub default: Option<String>,
    /// Enum names or identity names.
    #[serde(default, rename = "enum")]
    pub enum_values: Vec<String>,
    /// leafref `path`.
    #[serde(default)]
    pub path: Option<String>,
}

impl From<&TypeSpec> for LeafType {
    fn from(spec: &TypeSpec) -> Self {
        Self {
            kind: spec.kind,
            name: spec
                .name
                .clone()
                .unwrap_or_else(|| spec.kind.as_str().to_string()),
            length: spec.length.clone(),
            range: spec.range.clone(),
            patterns: spec.patterns.clone(),
            default: spec.default.clone(),
            enum_values: spec.enum_values.clone(),
            path: spec.path.clone(),
        }
    }
}

fn deserialize_keys<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Keys {
        Text(String),
        List(Vec<String>),
    }

    Ok(match Keys::deserialize(deserializer)? {
        Keys::Text(s) => s.split_whitespace().map(str::to_string).collect(),
        Keys::List(v) => v,
    })
}

/// Defaults are written unquoted in most tree dumps (`default: 10`).
fn deserialize_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Bool(bool),
        Unsigned(u64),
        Signed(i64),
        Float(f64),
        Text(String),
    }

    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|s| match s {
        Scalar::Bool(b) => b.to_string(),
        Scalar::Unsigned(n) => n.to_string(),
        Scalar::Signed(n) => n.to_string(),
        Scalar::Float(f) => f.to_string(),
        Scalar::Text(t) => t,
    }))
}

impl SchemaTree {
    /// Flatten a tree description into an arena.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError`] when a list key does not name a leaf child, a
    /// case is not directly under a choice, or a type statement is missing
    /// or misplaced.
    pub fn from_spec(root: &NodeSpec) -> Result<Self, TreeError> {
        let mut tree = Self { nodes: Vec::new() };
        tree.push(root, None, "")?;
        Ok(tree)
    }

    fn push(
        &mut self,
        spec: &NodeSpec,
        parent: Option<NodeId>,
        parent_path: &str,
    ) -> Result<NodeId, TreeError> {
        let path = if parent.is_none() {
            String::new()
        } else {
            format!("{parent_path}/{}", spec.name)
        };
        let display_path = || if path.is_empty() { "/".to_string() } else { path.clone() };

        let parent_is_choice =
            parent.is_some_and(|p| matches!(self.node(p).kind, NodeKind::Choice));
        if parent_is_choice != (spec.kind == NodeSpecKind::Case) {
            return Err(TreeError::MisplacedCase {
                path: display_path(),
            });
        }

        let kind = match (spec.kind, &spec.type_spec) {
            (NodeSpecKind::Leaf, Some(t)) => NodeKind::Leaf(t.into()),
            (NodeSpecKind::LeafList, Some(t)) => NodeKind::LeafList(t.into()),
            (NodeSpecKind::Leaf | NodeSpecKind::LeafList, None) => {
                return Err(TreeError::InvalidType {
                    path: display_path(),
                    reason: "leaf without a type",
                });
            }
            (_, Some(_)) => {
                return Err(TreeError::InvalidType {
                    path: display_path(),
                    reason: "only leaf and leaf-list nodes take a type",
                });
            }
            (NodeSpecKind::Choice, None) => NodeKind::Choice,
            (NodeSpecKind::Case, None) => NodeKind::Case,
            (NodeSpecKind::Container, None) => NodeKind::Container,
            (NodeSpecKind::List, None) => NodeKind::List(ListAttr {
                keys: spec.list.keys.clone(),
                min_elements: spec.list.min_elements,
                max_elements: spec.list.max_elements.unwrap_or(u64::MAX),
                must: spec.list.must.clone(),
            }),
        };

        let id = NodeId(self.nodes.len());
        self.nodes.push(SchemaNode {
            name: spec.name.clone(),
            prefix: spec.prefix.clone(),
            description: spec.description.clone(),
            config: TriState::from(spec.config),
            mandatory: spec.mandatory,
            kind,
            parent,
            children: Vec::with_capacity(spec.children.len()),
        });

        for child in &spec.children {
            let child_id = self.push(child, Some(id), &path)?;
            self.nodes[id.index()].children.push(child_id);
        }

        if let NodeKind::List(attr) = &self.node(id).kind {
            for key in &attr.keys {
                let is_leaf = self
                    .child(id, key)
                    .is_some_and(|c| matches!(self.node(c).kind, NodeKind::Leaf(_)));
                if !is_leaf {
                    return Err(TreeError::UnknownKey {
                        list: display_path(),
                        key: key.clone(),
                    });
                }
            }
        }

        Ok(id)
    }
}
