//! Typed `OpenAPI` 3.0 document model.
//!
//! Only the subset the generator emits. All maps are `BTreeMap`, so two
//! compilations of the same tree serialize byte-for-byte identically.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Media type of JSON request and response bodies.
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Media type of path parameters.
pub const TEXT_MEDIA_TYPE: &str = "text/plain; charset=utf-8";

/// `$ref` prefix of component schemas.
pub const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// `$ref` prefix of component parameters.
pub const PARAMETER_REF_PREFIX: &str = "#/components/parameters/";

/// `$ref` prefix of component request bodies.
pub const REQUEST_BODY_REF_PREFIX: &str = "#/components/requestBodies/";

/// A complete `OpenAPI` document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    /// `OpenAPI` version (`3.0.0`).
    pub openapi: String,
    /// Document metadata.
    pub info: Info,
    /// Path templates.
    pub paths: BTreeMap<String, PathItem>,
    /// Reusable schemas, parameters and request bodies.
    pub components: Components,
}

/// `info` block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Info {
    /// Title.
    pub title: String,
    /// API version (the model version).
    pub version: String,
    /// Free-form description.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Contact block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    /// License block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,
}

/// `info.contact`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    /// Contact name.
    pub name: String,
    /// Contact URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Contact email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// `info.license`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct License {
    /// SPDX identifier or license name.
    pub name: String,
    /// License text URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// `components` block.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Components {
    /// Named schemas.
    pub schemas: BTreeMap<String, Schema>,
    /// Named parameters.
    pub parameters: BTreeMap<String, Parameter>,
    /// Named request bodies.
    #[serde(rename = "requestBodies")]
    pub request_bodies: BTreeMap<String, RequestBody>,
}

/// One path template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathItem {
    /// Node description.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Target parameter plus one parameter per key placeholder.
    pub parameters: Vec<ParameterRef>,
    /// Read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    /// Create or replace.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    /// Delete.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
}

/// An HTTP operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Operation {
    /// One-line summary.
    pub summary: String,
    /// Unique operation ID.
    #[serde(rename = "operationId")]
    pub operation_id: String,
    /// Request body reference.
    #[serde(rename = "requestBody", skip_serializing_if = "Option::is_none")]
    pub request_body: Option<Reference>,
    /// Responses keyed by status code.
    pub responses: BTreeMap<String, Response>,
}

/// An operation response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    /// Response description.
    pub description: String,
    /// Body by media type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<BTreeMap<String, MediaType>>,
}

impl Response {
    /// A response with no body.
    #[must_use]
    pub fn empty(description: &str) -> Self {
        Self {
            description: description.to_string(),
            content: None,
        }
    }

    /// A JSON response whose body is the named component schema.
    #[must_use]
    pub fn json(description: &str, schema_name: &str) -> Self {
        Self {
            description: description.to_string(),
            content: Some(json_content(schema_name)),
        }
    }
}

/// A media type entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaType {
    /// Body schema.
    pub schema: SchemaRef,
}

/// A reusable request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestBody {
    /// Body by media type.
    pub content: BTreeMap<String, MediaType>,
}

impl RequestBody {
    /// A JSON body whose schema is the named component schema.
    #[must_use]
    pub fn json(schema_name: &str) -> Self {
        Self {
            content: json_content(schema_name),
        }
    }
}

/// Build `content` for `application/json` with a component schema `$ref`.
fn json_content(schema_name: &str) -> BTreeMap<String, MediaType> {
    BTreeMap::from([(
        JSON_MEDIA_TYPE.to_string(),
        MediaType {
            schema: SchemaRef::component(schema_name),
        },
    )])
}

/// A path parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    /// Parameter name, matching the `{placeholder}` in the template.
    pub name: String,
    /// Location; always `path` here.
    #[serde(rename = "in")]
    pub location: String,
    /// Parameter description.
    pub description: String,
    /// Path parameters are always required.
    pub required: bool,
    /// Plain-text string content.
    pub content: BTreeMap<String, MediaType>,
}

impl Parameter {
    /// A required path parameter carried as a plain-text string.
    #[must_use]
    pub fn path(name: &str, description: String) -> Self {
        Self {
            name: name.to_string(),
            location: "path".to_string(),
            description,
            required: true,
            content: BTreeMap::from([(
                TEXT_MEDIA_TYPE.to_string(),
                MediaType {
                    schema: SchemaRef::Inline(Box::new(Schema::string())),
                },
            )]),
        }
    }
}

/// A parameter or a reference to a component parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParameterRef {
    /// `$ref` to `#/components/parameters/...`.
    Ref(Reference),
    /// Inline parameter.
    Inline(Parameter),
}

/// A JSON reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
    /// Target of the reference.
    #[serde(rename = "$ref")]
    pub reference: String,
}

impl Reference {
    /// Reference to a component schema.
    #[must_use]
    pub fn schema(name: &str) -> Self {
        Self {
            reference: format!("{SCHEMA_REF_PREFIX}{name}"),
        }
    }

    /// Reference to a component parameter.
    #[must_use]
    pub fn parameter(name: &str) -> Self {
        Self {
            reference: format!("{PARAMETER_REF_PREFIX}{name}"),
        }
    }

    /// Reference to a component request body.
    #[must_use]
    pub fn request_body(name: &str) -> Self {
        Self {
            reference: format!("{REQUEST_BODY_REF_PREFIX}{name}"),
        }
    }
}

/// A schema or a reference to a component schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SchemaRef {
    /// `$ref` to `#/components/schemas/...`.
    Ref(Reference),
    /// Inline schema.
    Inline(Box<Schema>),
}

impl SchemaRef {
    /// Reference to a component schema.
    #[must_use]
    pub fn component(name: &str) -> Self {
        Self::Ref(Reference::schema(name))
    }

    /// The inline schema, if this is not a reference.
    #[must_use]
    pub fn as_inline(&self) -> Option<&Schema> {
        match self {
            Self::Inline(schema) => Some(schema),
            Self::Ref(_) => None,
        }
    }

    /// The `$ref` target, if this is a reference.
    #[must_use]
    pub fn as_ref_str(&self) -> Option<&str> {
        match self {
            Self::Ref(r) => Some(&r.reference),
            Self::Inline(_) => None,
        }
    }
}

/// JSON Schema `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum SchemaType {
    Object,
    Array,
    String,
    Integer,
    Number,
    Boolean,
}

/// A `default` value sized to the schema it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
#[allow(missing_docs)]
pub enum DefaultValue {
    Int8(i8),
    Uint8(u8),
    Int16(i16),
    Uint16(u16),
    Int32(i32),
    Uint32(u32),
    Int64(i64),
    Uint64(u64),
    Float64(f64),
    Bool(bool),
    String(String),
}

/// A `minimum`/`maximum` value. Whole numbers stay exact integers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Bound {
    /// A negative whole number.
    Signed(i64),
    /// A non-negative whole number.
    Unsigned(u64),
    /// A number with a fractional part.
    Decimal(f64),
}

/// A JSON Schema object (`OpenAPI` 3.0 dialect).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// `type`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,
    /// `format`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// `title`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    /// `description`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// `enum`.
    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
    /// `default`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultValue>,
    /// `minimum`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Bound>,
    /// `maximum`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Bound>,
    /// `minLength`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    /// `maxLength`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    /// `pattern`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// `items`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaRef>>,
    /// `minItems`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,
    /// `maxItems`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,
    /// `uniqueItems`.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub unique_items: bool,
    /// `required`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    /// `properties`.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, SchemaRef>,
    /// `additionalProperties`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<Box<SchemaRef>>,
    /// `x-` vendor extensions.
    #[serde(flatten)]
    pub extensions: BTreeMap<String, serde_json::Value>,
}

impl Schema {
    fn typed(schema_type: SchemaType, format: Option<&str>) -> Self {
        Self {
            schema_type: Some(schema_type),
            format: format.map(str::to_string),
            ..Self::default()
        }
    }

    /// `type: string`.
    #[must_use]
    pub fn string() -> Self {
        Self::typed(SchemaType::String, None)
    }

    /// `type: string, format: byte`.
    #[must_use]
    pub fn bytes() -> Self {
        Self::typed(SchemaType::String, Some("byte"))
    }

    /// `type: integer` without a width.
    #[must_use]
    pub fn integer() -> Self {
        Self::typed(SchemaType::Integer, None)
    }

    /// `type: integer, format: int32`.
    #[must_use]
    pub fn int32() -> Self {
        Self::typed(SchemaType::Integer, Some("int32"))
    }

    /// `type: integer, format: int64`.
    #[must_use]
    pub fn int64() -> Self {
        Self::typed(SchemaType::Integer, Some("int64"))
    }

    /// `type: number, format: double`.
    #[must_use]
    pub fn float64() -> Self {
        Self::typed(SchemaType::Number, Some("double"))
    }

    /// `type: boolean`.
    #[must_use]
    pub fn boolean() -> Self {
        Self::typed(SchemaType::Boolean, None)
    }

    /// `type: object`.
    #[must_use]
    pub fn object() -> Self {
        Self::typed(SchemaType::Object, None)
    }

    /// `type: array` over `items`.
    #[must_use]
    pub fn array(items: SchemaRef) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::typed(SchemaType::Array, None)
        }
    }

    /// Set a vendor extension (`name` includes the `x-` prefix).
    pub fn set_extension(&mut self, name: &str, value: impl Into<serde_json::Value>) {
        self.extensions.insert(name.to_string(), value.into());
    }

    /// `true` when the vendor extension is present.
    #[must_use]
    pub fn has_extension(&self, name: &str) -> bool {
        self.extensions.contains_key(name)
    }
}
