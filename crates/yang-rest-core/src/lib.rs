#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! ## API Reference

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod error;
mod spec;
mod tree;
pub mod types;

pub use error::TreeError;
pub use spec::{ListSpec, NodeSpec, NodeSpecKind, TypeSpec};
pub use tree::{ListAttr, Must, NodeId, NodeKind, SchemaNode, SchemaTree, TriState};
pub use types::{Interval, LeafType, Number, TypeKind, YangRange};
