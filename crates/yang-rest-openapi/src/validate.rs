//! Consistency checks on an assembled document.
//!
//! - Every `$ref` resolves to an existing component
//! - Every `{placeholder}` in a path template has a declared path parameter
//! - No path item declares the same parameter name twice

use std::collections::BTreeSet;

use serde_yaml_ng::Value;

use crate::document::{
    Document, ParameterRef, PARAMETER_REF_PREFIX, REQUEST_BODY_REF_PREFIX, SCHEMA_REF_PREFIX,
};
use crate::error::{Error, Result};
use crate::naming;

/// Run all checks, reporting the first violation.
///
/// # Errors
///
/// - [`Error::DanglingReference`] for a `$ref` without a target
/// - [`Error::DuplicatePathParameter`] for a parameter name used twice
/// - [`Error::UndeclaredPathParameter`] for an undeclared placeholder
pub(crate) fn check(doc: &Document) -> Result<()> {
    check_refs(doc)?;
    check_path_parameters(doc)
}

fn check_refs(doc: &Document) -> Result<()> {
    let value = serde_yaml_ng::to_value(doc)?;
    let mut refs = Vec::new();
    collect_refs(&value, "#", &mut refs);

    for (location, reference) in refs {
        if !resolves(doc, &reference) {
            return Err(Error::DanglingReference {
                location,
                reference,
            });
        }
    }
    Ok(())
}

fn resolves(doc: &Document, reference: &str) -> bool {
    let c = &doc.components;
    if let Some(name) = reference.strip_prefix(SCHEMA_REF_PREFIX) {
        c.schemas.contains_key(name)
    } else if let Some(name) = reference.strip_prefix(PARAMETER_REF_PREFIX) {
        c.parameters.contains_key(name)
    } else if let Some(name) = reference.strip_prefix(REQUEST_BODY_REF_PREFIX) {
        c.request_bodies.contains_key(name)
    } else {
        false
    }
}

/// Recursively collect `(location, $ref)` pairs from a YAML value tree.
fn collect_refs(value: &Value, location: &str, refs: &mut Vec<(String, String)>) {
    match value {
        Value::Mapping(map) => {
            for (k, v) in map {
                let key = k.as_str().unwrap_or_default();
                if key == "$ref" {
                    if let Some(s) = v.as_str() {
                        refs.push((location.to_string(), s.to_string()));
                    }
                }
                collect_refs(v, &format!("{location}/{}", escape(key)), refs);
            }
        }
        Value::Sequence(seq) => {
            for (i, item) in seq.iter().enumerate() {
                collect_refs(item, &format!("{location}/{i}"), refs);
            }
        }
        _ => {}
    }
}

/// JSON pointer escaping (`~` → `~0`, `/` → `~1`).
fn escape(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}

fn check_path_parameters(doc: &Document) -> Result<()> {
    for (path, item) in &doc.paths {
        let mut declared = BTreeSet::new();
        let names = item.parameters.iter().filter_map(|p| match p {
            ParameterRef::Inline(p) => Some(p.name.as_str()),
            ParameterRef::Ref(r) => r
                .reference
                .strip_prefix(PARAMETER_REF_PREFIX)
                .and_then(|name| doc.components.parameters.get(name))
                .map(|p| p.name.as_str()),
        });
        for name in names {
            if !declared.insert(name) {
                return Err(Error::DuplicatePathParameter {
                    path: path.clone(),
                    parameter: name.to_string(),
                });
            }
        }

        if let Some(missing) = naming::placeholders(path).find(|p| !declared.contains(p)) {
            return Err(Error::UndeclaredPathParameter {
                path: path.clone(),
                parameter: missing.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::document::{
        Components, Info, Operation, Parameter, PathItem, Reference, Response, Schema, SchemaRef,
    };
    use pretty_assertions::assert_eq;

    fn document() -> Document {
        let mut schemas = BTreeMap::new();
        schemas.insert("Cont1a".to_string(), Schema::object());
        Document {
            openapi: "3.0.0".to_string(),
            info: Info {
                title: "t".to_string(),
                version: "1".to_string(),
                description: String::new(),
                contact: None,
                license: None,
            },
            paths: BTreeMap::from([(
                "/td/v1/{target}/cont1a".to_string(),
                PathItem {
                    description: String::new(),
                    parameters: vec![ParameterRef::Ref(Reference::parameter("target"))],
                    get: Some(Operation {
                        summary: "GET /cont1a Container".to_string(),
                        operation_id: "getCont1a".to_string(),
                        request_body: None,
                        responses: BTreeMap::from([(
                            "200".to_string(),
                            Response::json("GET OK 200", "Cont1a"),
                        )]),
                    }),
                    post: None,
                    delete: None,
                },
            )]),
            components: Components {
                schemas,
                parameters: BTreeMap::from([(
                    "target".to_string(),
                    Parameter::path("target", "target".to_string()),
                )]),
                request_bodies: BTreeMap::new(),
            },
        }
    }

    #[test]
    fn consistent_document_passes() {
        check(&document()).unwrap();
    }

    #[test]
    fn dangling_schema_ref_is_reported_with_location() {
        let mut doc = document();
        doc.components
            .schemas
            .get_mut("Cont1a")
            .unwrap()
            .properties
            .insert("gone".to_string(), SchemaRef::component("Missing"));

        let err = check(&doc).unwrap_err();
        let Error::DanglingReference {
            location,
            reference,
        } = err
        else {
            panic!("expected dangling reference");
        };
        assert_eq!(reference, "#/components/schemas/Missing");
        assert_eq!(location, "#/components/schemas/Cont1a/properties/gone");
    }

    #[test]
    fn undeclared_placeholder_is_reported() {
        let mut doc = document();
        let item = doc.paths.remove("/td/v1/{target}/cont1a").unwrap();
        doc.paths.insert("/td/v1/{target}/list/{id}".to_string(), item);

        let err = check(&doc).unwrap_err();
        assert!(matches!(
            err,
            Error::UndeclaredPathParameter { ref parameter, .. } if parameter == "id"
        ));
    }

    #[test]
    fn repeated_parameter_name_is_reported() {
        let mut doc = document();
        let mut item = doc.paths.remove("/td/v1/{target}/cont1a").unwrap();
        item.parameters
            .push(ParameterRef::Inline(Parameter::path("target", "key {target}".to_string())));
        doc.paths.insert("/td/v1/{target}/devices/{target}".to_string(), item);

        let err = check(&doc).unwrap_err();
        assert!(matches!(
            err,
            Error::DuplicatePathParameter { ref parameter, .. } if parameter == "target"
        ));
    }

    #[test]
    fn path_keys_are_escaped_in_locations() {
        assert_eq!(escape("/a/{b}"), "~1a~1{b}");
        assert_eq!(escape("x~y"), "x~0y");
    }
}
