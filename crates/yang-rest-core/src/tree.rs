//! Arena-backed schema tree.

use serde::Deserialize;

use crate::types::LeafType;

/// Index of a node inside its [`SchemaTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position of the node in the arena.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// YANG `config` statement as written on a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TriState {
    /// No `config` statement: inherit from the parent.
    #[default]
    Inherit,
    /// `config true`.
    True,
    /// `config false`.
    False,
}

impl TriState {
    /// Effective configurability given the parent's effective value.
    #[must_use]
    pub fn resolve(self, parent: bool) -> bool {
        match self {
            Self::True => true,
            Self::False => false,
            Self::Inherit => parent,
        }
    }
}

impl From<Option<bool>> for TriState {
    fn from(flag: Option<bool>) -> Self {
        match flag {
            None => Self::Inherit,
            Some(true) => Self::True,
            Some(false) => Self::False,
        }
    }
}

/// A `must` constraint: an XPath condition and the error shown when it fails.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Must {
    /// The XPath expression.
    pub name: String,
    /// `error-message` substatement.
    #[serde(default)]
    pub error_message: Option<String>,
}

/// List statement attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListAttr {
    /// Key leaf names in `key` statement order.
    pub keys: Vec<String>,
    /// `must` statements in declaration order.
    pub must: Vec<Must>,
    /// `min-elements`.
    pub min_elements: u64,
    /// `max-elements`; `u64::MAX` when unbounded.
    pub max_elements: u64,
}

impl ListAttr {
    /// `true` when the list has no `max-elements` statement.
    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.max_elements == u64::MAX
    }
}

/// What a schema node is.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// A scalar leaf.
    Leaf(LeafType),
    /// A leaf holding a set of scalar values.
    LeafList(LeafType),
    /// Mutually exclusive alternatives; children are [`NodeKind::Case`] nodes.
    Choice,
    /// One alternative of a choice.
    Case,
    /// A single structured object.
    Container,
    /// Zero or more keyed structured objects.
    List(ListAttr),
}

impl NodeKind {
    /// YANG keyword for the node kind.
    #[must_use]
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Leaf(_) => "leaf",
            Self::LeafList(_) => "leaf-list",
            Self::Choice => "choice",
            Self::Case => "case",
            Self::Container => "container",
            Self::List(_) => "list",
        }
    }

    /// Type of a leaf or leaf-list.
    #[must_use]
    pub fn leaf_type(&self) -> Option<&LeafType> {
        match self {
            Self::Leaf(t) | Self::LeafList(t) => Some(t),
            _ => None,
        }
    }
}

/// One node of the schema tree.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    /// Local name.
    pub name: String,
    /// Prefix of the module defining the node.
    pub prefix: Option<String>,
    /// `description` statement.
    pub description: String,
    /// `config` statement.
    pub config: TriState,
    /// `mandatory true`.
    pub mandatory: bool,
    /// Node kind and kind-specific attributes.
    pub kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

/// An immutable YANG schema tree.
///
/// Built once by [`SchemaTree::from_spec`](crate::SchemaTree::from_spec);
/// nothing in this workspace mutates it afterwards.
#[derive(Debug, Clone)]
pub struct SchemaTree {
    pub(crate) nodes: Vec<SchemaNode>,
}

impl SchemaTree {
    /// The top-level node (`Device` for ygot-generated models).
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Look up a node.
    ///
    /// # Panics
    ///
    /// Panics if `id` belongs to another tree.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &SchemaNode {
        &self.nodes[id.index()]
    }

    /// Children of `id` in schema order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = (NodeId, &SchemaNode)> + '_ {
        self.node(id)
            .children
            .iter()
            .map(move |&child| (child, self.node(child)))
    }

    /// Child of `id` named `name`, if any.
    #[must_use]
    pub fn child(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.node(id)
            .children
            .iter()
            .copied()
            .find(|&child| self.node(child).name == name)
    }

    /// Parent of `id`, `None` for the root.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Walk parent links up to the root.
    #[must_use]
    pub fn root_of(&self, mut id: NodeId) -> NodeId {
        while let Some(parent) = self.parent(id) {
            id = parent;
        }
        id
    }

    /// Effective configurability of `id`, derived from its ancestor chain.
    #[must_use]
    pub fn is_config(&self, id: NodeId) -> bool {
        let mut chain = vec![id];
        let mut cur = id;
        while let Some(parent) = self.parent(cur) {
            chain.push(parent);
            cur = parent;
        }
        chain
            .iter()
            .rev()
            .fold(true, |parent, &node| self.node(node).config.resolve(parent))
    }

    /// Slash-separated schema path of `id` (root excluded), e.g. `/cont1a/list2a`.
    #[must_use]
    pub fn path_of(&self, id: NodeId) -> String {
        let mut parts = Vec::new();
        let mut cur = id;
        while let Some(parent) = self.parent(cur) {
            parts.push(self.node(cur).name.as_str());
            cur = parent;
        }
        parts.reverse();
        format!("/{}", parts.join("/"))
    }

    /// Total number of nodes, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: a tree has at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in depth-first pre-order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SchemaNode)> + '_ {
        let mut stack = vec![self.root()];
        std::iter::from_fn(move || {
            let id = stack.pop()?;
            let node = self.node(id);
            stack.extend(node.children.iter().rev().copied());
            Some((id, node))
        })
    }
}
