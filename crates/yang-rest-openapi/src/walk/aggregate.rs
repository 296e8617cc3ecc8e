//! Folding child fragments into a container or list-entry object.
//!
//! Scalars and leaf-lists are inlined as properties and disappear. Objects
//! and arrays that are direct children become `$ref` properties; every
//! object and array, direct or not, is passed up so it reaches the
//! document's components.

use crate::document::{Schema, SchemaRef, SchemaType};
use crate::error::{Error, Result};
use crate::naming::{self, LIST_SUFFIX, SEPARATOR};

use super::fragment::{FragmentSet, Shape};

/// Marks the properties that are list keys.
pub const LIST_KEY_EXTENSION: &str = "x-list-key";

/// Go type hint for string-typed list keys, read by Go client generators.
pub const GO_TYPE_EXTENSION: &str = "x-go-type";

const GO_LIST_KEY_TYPE: &str = "ListKey";

/// Absorb `children` into `parent` (named `parent_name`).
///
/// `keys` are the key leaf names when `parent` is a list entry. Returns the
/// fragments to pass up.
pub(crate) fn aggregate(
    parent_name: &str,
    parent: &mut Schema,
    children: FragmentSet,
    keys: &[String],
) -> Result<FragmentSet> {
    let mut passthrough = FragmentSet::default();

    for mut fragment in children {
        let unhandled = |name: &str| Error::UnhandledShape {
            parent: parent_name.to_string(),
            fragment: name.to_string(),
            shape: fragment.shape.label(),
        };

        match fragment.shape {
            Shape::ListCollection => {
                let relative = naming::relative_name(parent_name, &fragment.name)
                    .and_then(|r| r.strip_suffix(LIST_SUFFIX))
                    .and_then(|r| r.strip_suffix(SEPARATOR))
                    .ok_or_else(|| unhandled(&fragment.name))?;
                if naming::is_direct(relative) {
                    parent.properties.insert(
                        relative.to_lowercase(),
                        SchemaRef::component(&fragment.name),
                    );
                }
                passthrough.claim(fragment)?;
            }
            Shape::Container => {
                let relative = naming::relative_name(parent_name, &fragment.name)
                    .ok_or_else(|| unhandled(&fragment.name))?;
                if !fragment.schema.title.is_empty() && naming::is_direct(relative) {
                    parent.properties.insert(
                        naming::last_segment(&fragment.name).to_lowercase(),
                        SchemaRef::component(&fragment.name),
                    );
                }
                passthrough.claim(fragment)?;
            }
            Shape::ListEntry => passthrough.claim(fragment)?,
            Shape::Scalar | Shape::LeafList => {
                parent.required.append(&mut fragment.schema.required);
                let property = if fragment.shape == Shape::Scalar {
                    if keys.contains(&fragment.schema.title) {
                        fragment.schema.set_extension(LIST_KEY_EXTENSION, true);
                        if fragment.schema.schema_type == Some(SchemaType::String) {
                            fragment.schema.set_extension(GO_TYPE_EXTENSION, GO_LIST_KEY_TYPE);
                        }
                    }
                    fragment.schema.title.clone()
                } else {
                    naming::leaf_list_property_name(&fragment.schema.title).to_string()
                };
                parent
                    .properties
                    .insert(property, SchemaRef::Inline(Box::new(fragment.schema)));
            }
        }
    }

    parent.required.sort();
    parent.required.dedup();
    Ok(passthrough)
}
