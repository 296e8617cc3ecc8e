//! Intermediate output of a tree walk.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::document::{PathItem, RequestBody, Schema};
use crate::error::{Error, Result};

/// What a fragment was produced from; drives how a parent absorbs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Shape {
    /// A leaf.
    Scalar,
    /// A leaf-list (array of scalars).
    LeafList,
    /// A container object.
    Container,
    /// The single-entry object of a list.
    ListEntry,
    /// The array of list entries (`..._List`).
    ListCollection,
}

impl Shape {
    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::LeafList => "leaf-list",
            Self::Container => "object",
            Self::ListEntry => "list entry",
            Self::ListCollection => "array",
        }
    }
}

/// A named schema produced by the walk.
#[derive(Debug, Clone)]
pub(crate) struct Fragment {
    pub name: String,
    pub shape: Shape,
    pub schema: Schema,
}

/// Fragments keyed by canonical name; names are claimed once.
#[derive(Debug, Default)]
pub(crate) struct FragmentSet {
    entries: BTreeMap<String, Fragment>,
}

impl FragmentSet {
    /// Add a fragment, failing if its name is taken.
    pub(crate) fn claim(&mut self, fragment: Fragment) -> Result<()> {
        match self.entries.entry(fragment.name.clone()) {
            Entry::Occupied(e) => Err(Error::DuplicateFragment {
                name: e.key().clone(),
            }),
            Entry::Vacant(e) => {
                e.insert(fragment);
                Ok(())
            }
        }
    }

    pub(crate) fn merge(&mut self, other: Self) -> Result<()> {
        other.into_iter().try_for_each(|f| self.claim(f))
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Fragment> {
        self.entries.values_mut()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn into_schemas(self) -> BTreeMap<String, Schema> {
        self.entries
            .into_iter()
            .map(|(name, f)| (name, f.schema))
            .collect()
    }
}

impl IntoIterator for FragmentSet {
    type Item = Fragment;
    type IntoIter = std::collections::btree_map::IntoValues<String, Fragment>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_values()
    }
}

/// Everything a subtree contributes to the document.
#[derive(Debug, Default)]
pub(crate) struct Compiled {
    /// Path items keyed by full template (prefix included).
    pub paths: BTreeMap<String, PathItem>,
    pub fragments: FragmentSet,
    pub request_bodies: BTreeMap<String, RequestBody>,
}

impl Compiled {
    pub(crate) fn merge(&mut self, other: Self) -> Result<()> {
        self.fragments.merge(other.fragments)?;
        for (path, item) in other.paths {
            if self.paths.insert(path.clone(), item).is_some() {
                return Err(Error::DuplicateFragment { name: path });
            }
        }
        for (name, body) in other.request_bodies {
            if self.request_bodies.insert(name.clone(), body).is_some() {
                return Err(Error::DuplicateFragment { name });
            }
        }
        Ok(())
    }
}
