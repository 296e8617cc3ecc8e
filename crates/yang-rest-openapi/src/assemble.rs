//! Document assembly: walk the tree, add the shared components, validate.

use std::collections::BTreeMap;

use tracing::{info, instrument};
use yang_rest_core::SchemaTree;

use crate::config::{GeneratorSettings, ResolvedSettings};
use crate::document::{Components, Document, Info, Parameter, Schema, SchemaRef};
use crate::error::Result;
use crate::naming::{self, ADDITIONAL_PROPERTIES_UNCH_TARGET, ADDITIONAL_PROPERTY_UNCHANGED};
use crate::validate;
use crate::walk::{Fragment, FragmentSet, Shape, Walker};

/// `OpenAPI` version of every generated document.
pub const OPENAPI_VERSION: &str = "3.0.0";

/// Property carrying the names of required fields a client leaves unchanged.
const UNCHANGED_PROPERTY: &str = "unchanged";

/// Compile a schema tree into an `OpenAPI` document.
///
/// The result is deterministic: the same tree and settings always serialize
/// to the same bytes.
///
/// # Errors
///
/// Returns [`Error`](crate::Error) when a setting is missing, a node or type
/// has no mapping, a default does not parse, two nodes produce the same
/// schema name, or the assembled document fails its consistency checks.
#[instrument(skip_all, fields(model_type = settings.model_type.as_deref().unwrap_or_default()))]
pub fn build_openapi(tree: &SchemaTree, settings: &GeneratorSettings) -> Result<Document> {
    let settings = settings.resolve()?;
    let walker = Walker::new(tree, &settings);
    let root = tree.root();
    let compiled = walker.walk(root, tree.is_config(root), "")?;

    let mut fragments = compiled.fragments;
    fragments.merge(helper_schemas(&settings.target_alias)?)?;

    let alias = &settings.target_alias;
    let components = Components {
        schemas: fragments.into_schemas(),
        parameters: BTreeMap::from([(alias.clone(), target_parameter(alias))]),
        request_bodies: compiled.request_bodies,
    };

    let doc = Document {
        openapi: OPENAPI_VERSION.to_string(),
        info: info_block(&settings),
        paths: compiled.paths,
        components,
    };
    validate::check(&doc)?;

    info!(
        paths = doc.paths.len(),
        schemas = doc.components.schemas.len(),
        request_bodies = doc.components.request_bodies.len(),
        "generated OpenAPI document"
    );
    Ok(doc)
}

fn info_block(settings: &ResolvedSettings) -> Info {
    Info {
        title: settings.title.clone(),
        version: settings.model_version.clone(),
        description: settings.description.clone(),
        contact: settings.contact.clone(),
        license: settings.license.clone(),
    }
}

/// The device-selecting parameter every path item references.
fn target_parameter(alias: &str) -> Parameter {
    Parameter::path(alias, format!("{alias} (target in onos-config)"))
}

fn string_property(title: &str, description: String) -> SchemaRef {
    SchemaRef::Inline(Box::new(Schema {
        title: title.to_string(),
        description,
        ..Schema::string()
    }))
}

/// The three `additionalProperties` targets.
fn helper_schemas(alias: &str) -> Result<FragmentSet> {
    let target = || {
        (
            alias.to_string(),
            string_property(alias, format!("an override of the {alias} (target)")),
        )
    };
    let unchanged = || {
        (
            UNCHANGED_PROPERTY.to_string(),
            string_property(
                UNCHANGED_PROPERTY,
                "A comma separated list of unchanged mandatory attribute names".to_string(),
            ),
        )
    };
    let target_name = naming::additional_property_target(alias);

    let helpers = [
        Schema {
            title: target_name,
            description: format!(
                "Optionally specify a {alias} other than the default (only on PATCH method)"
            ),
            properties: BTreeMap::from([target()]),
            ..Schema::object()
        },
        Schema {
            title: ADDITIONAL_PROPERTY_UNCHANGED.to_string(),
            description: "To optionally omit 'required' properties, add them to 'unchanged' list"
                .to_string(),
            properties: BTreeMap::from([unchanged()]),
            ..Schema::object()
        },
        Schema {
            title: ADDITIONAL_PROPERTIES_UNCH_TARGET.to_string(),
            description: format!("both the additional property 'unchanged' and the '{alias}'"),
            properties: BTreeMap::from([unchanged(), target()]),
            ..Schema::object()
        },
    ];

    let mut set = FragmentSet::default();
    for schema in helpers {
        set.claim(Fragment {
            name: schema.title.clone(),
            shape: Shape::Container,
            schema,
        })?;
    }
    Ok(set)
}
