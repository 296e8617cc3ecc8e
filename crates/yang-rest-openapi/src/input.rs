//! Reading tree descriptions from disk.

use std::path::Path;

use yang_rest_core::{NodeSpec, SchemaTree};

use crate::error::Result;

/// Parse a tree description (YAML, or JSON by `.json` extension).
///
/// # Errors
///
/// Returns an error if the text does not parse or the tree is structurally
/// invalid.
pub fn parse_tree(text: &str, json: bool) -> Result<SchemaTree> {
    let spec: NodeSpec = if json {
        serde_json::from_str(text)?
    } else {
        serde_yaml_ng::from_str(text)?
    };
    Ok(SchemaTree::from_spec(&spec)?)
}

/// Load a tree description file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, does not parse, or the tree
/// is structurally invalid.
pub fn load_tree(path: &Path) -> Result<SchemaTree> {
    let text = std::fs::read_to_string(path)?;
    let json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    parse_tree(&text, json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn json_and_yaml_agree() {
        let yaml = parse_tree("name: Device\nchildren:\n  - name: cont1a\n", false).unwrap();
        let json =
            parse_tree(r#"{"name": "Device", "children": [{"name": "cont1a"}]}"#, true).unwrap();
        assert_eq!(yaml.len(), json.len());
        assert!(json.child(json.root(), "cont1a").is_some());
    }

    #[test]
    fn structural_errors_surface() {
        let err = parse_tree(
            "name: Device\nchildren:\n  - { name: l, kind: list, keys: [id] }\n",
            false,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Tree(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_tree(Path::new("/nonexistent/tree.yaml")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
