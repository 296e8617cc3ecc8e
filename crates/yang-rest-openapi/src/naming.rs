//! Canonical names for schemas, operations and path parameters.
//!
//! Every generated name is derived from a node's slash-separated schema path
//! (`/cont1a/list2a/{name}/cont3`). Key placeholders are dropped, each
//! remaining segment gets an upper-case first character, and the segments are
//! joined with `_`: `Cont1a_List2a_Cont3`.

/// Separator between canonical name segments.
pub const SEPARATOR: char = '_';

/// Suffix of a list's collection ("multiple") schema.
pub const LIST_SUFFIX: &str = "List";

/// Helper schema allowing required fields to be listed as unchanged.
pub const ADDITIONAL_PROPERTY_UNCHANGED: &str = "AdditionalPropertyUnchanged";

/// Helper schema combining the unchanged list and the target override.
pub const ADDITIONAL_PROPERTIES_UNCH_TARGET: &str = "AdditionalPropertiesUnchTarget";

/// Leading label some loaders put on leaf-list titles.
const LEAF_LIST_LABEL: &str = "leaf-list";

/// Upper-case the first character (Unicode aware).
#[must_use]
pub fn uppercase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `true` for `{placeholder}` path segments.
fn is_placeholder(segment: &str) -> bool {
    segment.starts_with('{') || segment.ends_with('}')
}

/// Canonical schema name of a path: `/cont1a/list2a/{name}` → `Cont1a_List2a`.
#[must_use]
pub fn canonical_name(path: &str) -> String {
    path.split('/')
        .filter(|segment| !segment.is_empty() && !is_placeholder(segment))
        .map(uppercase_first)
        .collect::<Vec<_>>()
        .join(&SEPARATOR.to_string())
}

/// Name of a list's collection schema: `Cont1a_List2a_List`.
#[must_use]
pub fn list_collection_name(path: &str) -> String {
    format!("{}{SEPARATOR}{LIST_SUFFIX}", canonical_name(path))
}

/// Last `_`-separated segment of a canonical name.
#[must_use]
pub fn last_segment(name: &str) -> &str {
    name.rsplit(SEPARATOR).next().unwrap_or(name)
}

/// Part of `child` below `parent`: `Cont1a_List2a` under `Cont1a` → `List2a`.
///
/// `None` when `child` is not named under `parent`.
#[must_use]
pub fn relative_name<'a>(parent: &str, child: &'a str) -> Option<&'a str> {
    if parent.is_empty() {
        return Some(child);
    }
    child.strip_prefix(parent)?.strip_prefix(SEPARATOR)
}

/// `true` when a relative name is a direct child (no further separator).
#[must_use]
pub fn is_direct(relative: &str) -> bool {
    !relative.contains(SEPARATOR)
}

/// Property name for a leaf-list, dropping a leading `leaf-list` label and
/// the separator that follows it.
#[must_use]
pub fn leaf_list_property_name(title: &str) -> &str {
    match title.strip_prefix(LEAF_LIST_LABEL) {
        Some(rest) => {
            let mut chars = rest.chars();
            chars.next();
            chars.as_str()
        }
        None => title,
    }
}

/// Title-case each word: `my-target` → `My-Target`.
#[must_use]
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_alphanumeric() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

/// Helper schema carrying the target override: `AdditionalPropertyTarget`.
#[must_use]
pub fn additional_property_target(alias: &str) -> String {
    format!("AdditionalProperty{}", title_case(alias))
}

/// Name of the request body for a schema: `RequestBody_Cont1a`.
#[must_use]
pub fn request_body_name(schema_name: &str) -> String {
    format!("RequestBody{SEPARATOR}{schema_name}")
}

/// Placeholder names of a path template, in order.
pub fn placeholders(path: &str) -> impl Iterator<Item = &str> {
    path.split('/')
        .filter_map(|segment| segment.strip_prefix('{')?.strip_suffix('}'))
}

/// Append one `{key}` segment per list key.
///
/// A key already used as a placeholder earlier in the template, or equal to
/// `reserved` (the target parameter of the path prefix), is renamed
/// `key_<n>`, where `n` is the number of key placeholders preceding it. Every
/// placeholder in the full template is therefore unique.
#[must_use]
pub fn append_keys(path: &str, keys: &[String], reserved: &str) -> String {
    let mut used: Vec<String> = placeholders(path).map(str::to_string).collect();
    let taken = |used: &[String], name: &str| name == reserved || used.iter().any(|u| u == name);

    let mut out = path.to_string();
    for key in keys {
        let mut name = key.clone();
        let mut n = used.len();
        while taken(&used, &name) {
            name = format!("{key}{SEPARATOR}{n}");
            n += 1;
        }
        out.push_str(&format!("/{{{name}}}"));
        used.push(name);
    }
    out
}

/// Operation ID for reading a container or list entry: `getCont1a_List2a`.
#[must_use]
pub fn get_operation_id(path: &str) -> String {
    format!("get{}", canonical_name(path))
}

/// Operation ID for reading a list collection: `getCont1a_List2a_List`.
#[must_use]
pub fn get_collection_operation_id(path: &str) -> String {
    format!("get{}", list_collection_name(path))
}

/// Operation ID for creating: `postCont1a`.
#[must_use]
pub fn post_operation_id(path: &str) -> String {
    format!("post{}", canonical_name(path))
}

/// Operation ID for deleting: `deleteCont1a`.
#[must_use]
pub fn delete_operation_id(path: &str) -> String {
    format!("delete{}", canonical_name(path))
}
