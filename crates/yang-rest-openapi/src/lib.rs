#![allow(clippy::doc_markdown)] // README uses "OpenAPI" proper noun throughout
#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! ## API Reference

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assemble;
mod config;
mod constraint;
pub mod document;
mod error;
mod input;
mod leafref;
pub mod naming;
mod validate;
mod walk;

pub use assemble::{build_openapi, OPENAPI_VERSION};
pub use config::{GeneratorSettings, ResolvedSettings, DEFAULT_MODEL_VERSION, DEFAULT_TARGET_ALIAS};
pub use document::{Contact, Document, License};
pub use error::{Error, Result};
pub use input::{load_tree, parse_tree};

/// Vendor extensions written into generated schemas.
pub mod extensions {
    pub use crate::walk::{
        GO_TYPE_EXTENSION, LIST_KEYS_EXTENSION, LIST_KEY_EXTENSION, LIST_MULTIPLE_EXTENSION,
        MUST_EXTENSION,
    };

    /// Path expression of a leafref leaf.
    pub const LEAFREF_EXTENSION: &str = "x-leafref";
}
