//! Errors raised while building a [`SchemaTree`](crate::SchemaTree) from a tree description.

/// A tree description that cannot be turned into a schema tree.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TreeError {
    /// A list names a key that is not one of its leaf children.
    #[error("list '{list}' declares key '{key}' but has no leaf child with that name")]
    UnknownKey {
        /// Schema path of the list.
        list: String,
        /// The unmatched key name.
        key: String,
    },

    /// A `case` node outside a `choice`, or a `choice` child that is not a `case`.
    #[error("'{path}': case nodes may only appear directly under a choice")]
    MisplacedCase {
        /// Schema path of the offending node.
        path: String,
    },

    /// A `leaf` or `leaf-list` without a type, or a type on any other node.
    #[error("'{path}': {reason}")]
    InvalidType {
        /// Schema path of the offending node.
        path: String,
        /// What is wrong with the type statement.
        reason: &'static str,
    },

    /// A range or length bound that is not a decimal number.
    #[error("invalid range bound '{0}'")]
    InvalidNumber(String),
}
