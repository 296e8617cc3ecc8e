//! Typed error enum for the `yang-rest-openapi` library API.
//!
//! Library consumers can match on specific variants. The CLI (`main.rs`)
//! converts these to `anyhow::Error` at the binary boundary for richer
//! context messages.

/// Errors produced by `yang-rest-openapi` library operations.
///
/// Every variant is fatal: compilation stops and no partial document is
/// returned. Unresolvable leafref paths are not errors; they fall back to a
/// string schema.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// File I/O failure (reading settings or tree files).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error(transparent)]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON parsing or serialization failure.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// The tree description is structurally invalid.
    #[error(transparent)]
    Tree(#[from] yang_rest_core::TreeError),

    /// A mandatory generator setting was not provided.
    #[error("generator setting '{setting}' is required")]
    MissingSetting {
        /// Name of the missing setting.
        setting: &'static str,
    },

    /// A node kind has no handling at this position in the tree.
    #[error("unhandled {kind} node at '{path}'")]
    UnhandledNode {
        /// Schema path of the node.
        path: String,
        /// YANG keyword of the node kind.
        kind: &'static str,
    },

    /// A leaf type has no `OpenAPI` mapping.
    #[error("unhandled leaf type {type_name} at '{path}'")]
    UnhandledType {
        /// Schema path of the leaf.
        path: String,
        /// Declared type name and kind.
        type_name: String,
    },

    /// A child fragment cannot be placed in its parent's object schema.
    #[error("unhandled {shape} '{fragment}' in '{parent}'")]
    UnhandledShape {
        /// Canonical name of the aggregating container or list.
        parent: String,
        /// Canonical name of the child fragment.
        fragment: String,
        /// Shape of the child fragment.
        shape: &'static str,
    },

    /// A `default` value does not parse as the leaf's type.
    #[error("default '{value}' of '{path}' is not a valid {kind}: {reason}")]
    InvalidDefault {
        /// Schema path of the leaf.
        path: String,
        /// The declared default.
        value: String,
        /// YANG type kind the value was parsed as.
        kind: &'static str,
        /// Parser message.
        reason: String,
    },

    /// A `length` bound that is negative, fractional or wider than `u64`.
    #[error("invalid length bound '{bound}' at '{path}'")]
    InvalidLength {
        /// Schema path of the leaf.
        path: String,
        /// The offending bound as written.
        bound: String,
    },

    /// A `range` or `length` statement without any interval.
    #[error("empty range or length statement at '{path}'")]
    EmptyRange {
        /// Schema path of the leaf.
        path: String,
    },

    /// Two nodes produced the same schema name.
    #[error("schema '{name}' generated twice")]
    DuplicateFragment {
        /// The contested canonical name.
        name: String,
    },

    /// The assembled document references a component that does not exist.
    #[error("dangling reference '{reference}' in {location}")]
    DanglingReference {
        /// Where the reference was found.
        location: String,
        /// The unresolved `$ref` value.
        reference: String,
    },

    /// Two parameters of one path item share a name.
    #[error("path '{path}' declares parameter '{parameter}' more than once")]
    DuplicatePathParameter {
        /// Full path template.
        path: String,
        /// The repeated parameter name.
        parameter: String,
    },

    /// A path template placeholder with no matching path parameter.
    #[error("path '{path}' uses '{{{parameter}}}' without declaring it")]
    UndeclaredPathParameter {
        /// Full path template.
        path: String,
        /// Placeholder name.
        parameter: String,
    },
}

/// Convenience alias used throughout the library's public API.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time assertion that `Error` is `Send + Sync`.
    /// Required for compiling several models in parallel threads.
    const _: () = {
        const fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    };

    #[test]
    fn messages_name_the_offending_path() {
        let err = Error::UnhandledType {
            path: "/cont1a/bits1".to_string(),
            type_name: "bits (bits)".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "unhandled leaf type bits (bits) at '/cont1a/bits1'"
        );

        let err = Error::UndeclaredPathParameter {
            path: "/a/{id}".to_string(),
            parameter: "id".to_string(),
        };
        assert_eq!(err.to_string(), "path '/a/{id}' uses '{id}' without declaring it");
    }
}
