//! Recursive schema tree walk.
//!
//! Each level returns a [`Compiled`]: path items for its containers and
//! lists, named schema fragments, and request bodies. A container or list
//! folds its children's fragments into its own object schema (see
//! [`aggregate`](aggregate::aggregate)) before handing the result to its
//! parent.
//!
//! Paths passed down are schema paths without the model prefix
//! (`/cont1a/list2a/{name}`); the prefix is added when a path item is
//! recorded.

mod aggregate;
mod fragment;

use std::collections::BTreeMap;

use tracing::debug;
use yang_rest_core::{LeafType, ListAttr, Must, NodeId, NodeKind, SchemaNode, SchemaTree};

use crate::config::ResolvedSettings;
use crate::constraint;
use crate::document::{
    Operation, Parameter, ParameterRef, PathItem, Reference, RequestBody, Response, Schema,
    SchemaRef,
};
use crate::error::{Error, Result};
use crate::naming::{self, ADDITIONAL_PROPERTIES_UNCH_TARGET, ADDITIONAL_PROPERTY_UNCHANGED};

pub use aggregate::{GO_TYPE_EXTENSION, LIST_KEY_EXTENSION};
pub(crate) use fragment::{Compiled, Fragment, FragmentSet, Shape};

/// Marks both schemas of a list (entry and collection).
pub const LIST_MULTIPLE_EXTENSION: &str = "x-list-multiple";

/// Key names of a list, on its collection schema.
pub const LIST_KEYS_EXTENSION: &str = "x-keys";

/// `must` statements of a list, on its entry schema.
pub const MUST_EXTENSION: &str = "x-must";

/// Which read operation a path item carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Addressing {
    /// One object: a container or a keyed list entry.
    Single,
    /// All entries of a list.
    Collection,
}

/// Walks a [`SchemaTree`] for one set of generator settings.
pub(crate) struct Walker<'a> {
    tree: &'a SchemaTree,
    path_prefix: String,
    target_alias: &'a str,
}

impl<'a> Walker<'a> {
    pub(crate) fn new(tree: &'a SchemaTree, settings: &'a ResolvedSettings) -> Self {
        Self {
            tree,
            path_prefix: settings.path_prefix(),
            target_alias: &settings.target_alias,
        }
    }

    /// Compile the children of `node`.
    ///
    /// `config` is the effective configurability of `node` and `path` its
    /// schema path (key placeholders included, empty for the root).
    pub(crate) fn walk(&self, node: NodeId, config: bool, path: &str) -> Result<Compiled> {
        let mut out = Compiled::default();
        for (id, child) in self.tree.children(node) {
            let compiled = self.visit(id, child, config, path)?;
            out.merge(compiled)?;
        }
        Ok(out)
    }

    fn visit(
        &self,
        id: NodeId,
        node: &SchemaNode,
        parent_config: bool,
        parent_path: &str,
    ) -> Result<Compiled> {
        let config = node.config.resolve(parent_config);
        match &node.kind {
            NodeKind::Leaf(ty) => self.leaf(id, node, ty, Shape::Scalar, parent_path),
            NodeKind::LeafList(ty) => self.leaf(id, node, ty, Shape::LeafList, parent_path),
            NodeKind::Choice => self.choice(id, node, config, parent_path),
            NodeKind::Container => self.container(id, node, config, parent_config, parent_path),
            NodeKind::List(attr) => {
                self.list(id, node, attr, config, parent_config, parent_path)
            }
            NodeKind::Case => Err(Error::UnhandledNode {
                path: format!("{parent_path}/{}", node.name),
                kind: node.kind.keyword(),
            }),
        }
    }

    fn leaf(
        &self,
        id: NodeId,
        node: &SchemaNode,
        ty: &LeafType,
        shape: Shape,
        parent_path: &str,
    ) -> Result<Compiled> {
        let path = format!("{parent_path}/{}", node.name);
        let mut schema = constraint::leaf_schema(self.tree, id, ty, &path)?;
        schema.title.clone_from(&node.name);
        schema.description.clone_from(&node.description);

        let required = if node.mandatory || self.is_key(id, node) {
            vec![node.name.clone()]
        } else {
            Vec::new()
        };

        let schema = if shape == Shape::LeafList {
            Schema {
                title: node.name.clone(),
                description: node.description.clone(),
                required,
                ..Schema::array(SchemaRef::Inline(Box::new(schema)))
            }
        } else {
            Schema { required, ..schema }
        };

        debug!(%path, kind = %ty.kind, "leaf");
        let mut out = Compiled::default();
        out.fragments.claim(Fragment {
            name: naming::canonical_name(&path),
            shape,
            schema,
        })?;
        Ok(out)
    }

    /// `true` when `node` is named by its parent list's key statement.
    fn is_key(&self, id: NodeId, node: &SchemaNode) -> bool {
        self.tree
            .parent(id)
            .map(|p| &self.tree.node(p).kind)
            .is_some_and(|kind| match kind {
                NodeKind::List(attr) => attr.keys.contains(&node.name),
                _ => false,
            })
    }

    /// Cases contribute to the choice's parent; no path item of their own.
    fn choice(
        &self,
        id: NodeId,
        node: &SchemaNode,
        config: bool,
        parent_path: &str,
    ) -> Result<Compiled> {
        let mut out = Compiled::default();
        for (case_id, case) in self.tree.children(id) {
            if !matches!(case.kind, NodeKind::Case) {
                return Err(Error::UnhandledNode {
                    path: format!("{parent_path}/{}/{}", node.name, case.name),
                    kind: case.kind.keyword(),
                });
            }
            let case_config = case.config.resolve(config);
            let mut compiled = self.walk(case_id, case_config, parent_path)?;
            let label = format!("For choice {}:{}", node.name, case.name);
            for fragment in compiled.fragments.iter_mut() {
                fragment.schema.description.clone_from(&label);
            }
            debug!(choice = %node.name, case = %case.name, fragments = compiled.fragments.len(), "case");
            out.merge(compiled)?;
        }
        Ok(out)
    }

    fn container(
        &self,
        id: NodeId,
        node: &SchemaNode,
        config: bool,
        parent_config: bool,
        parent_path: &str,
    ) -> Result<Compiled> {
        let item_path = format!("{parent_path}/{}", node.name);
        let name = naming::canonical_name(&item_path);
        debug!(path = %item_path, %name, "container");

        let children = self.walk(id, config, &item_path)?;

        let mut schema = Schema {
            title: name.clone(),
            description: node.description.clone(),
            ..Schema::object()
        };
        let passthrough = aggregate::aggregate(&name, &mut schema, children.fragments, &[])?;
        schema.additional_properties =
            self.companion(is_top_level(&item_path), !schema.required.is_empty());

        let mut out = Compiled::default();
        let item = self.path_item(
            node,
            &item_path,
            &item_path,
            Addressing::Single,
            config && parent_config,
            &name,
        );
        self.record(&mut out, &item_path, item, &name);
        out.fragments.claim(Fragment {
            name,
            shape: Shape::Container,
            schema,
        })?;
        out.fragments.merge(passthrough)?;
        out.paths.extend(children.paths);
        out.request_bodies.extend(children.request_bodies);
        Ok(out)
    }

    fn list(
        &self,
        id: NodeId,
        node: &SchemaNode,
        attr: &ListAttr,
        config: bool,
        parent_config: bool,
        parent_path: &str,
    ) -> Result<Compiled> {
        let item_path = format!("{parent_path}/{}", node.name);
        let name = naming::canonical_name(&item_path);
        let collection_name = naming::list_collection_name(&item_path);
        let keyed = !attr.keys.is_empty();
        let entry_path = if keyed {
            naming::append_keys(&item_path, &attr.keys, self.target_alias)
        } else {
            item_path.clone()
        };
        debug!(path = %entry_path, %name, keys = ?attr.keys, "list");

        let children = self.walk(id, config, &entry_path)?;

        let mut single = Schema {
            title: name.clone(),
            description: format!("{} (single)", node.description),
            ..Schema::object()
        };
        single.set_extension(LIST_MULTIPLE_EXTENSION, true);
        if !attr.must.is_empty() {
            single.set_extension(MUST_EXTENSION, must_value(&attr.must));
        }
        let passthrough = aggregate::aggregate(&name, &mut single, children.fragments, &attr.keys)?;
        single.additional_properties =
            self.companion(is_top_level(&item_path), !single.required.is_empty());

        let mut multiple = Schema {
            title: collection_name.clone(),
            description: format!("{} (list)", node.description),
            min_items: Some(attr.min_elements),
            max_items: (!attr.is_unbounded()).then_some(attr.max_elements),
            unique_items: true,
            ..Schema::array(SchemaRef::component(&name))
        };
        multiple.set_extension(LIST_MULTIPLE_EXTENSION, true);
        multiple.set_extension(LIST_KEYS_EXTENSION, attr.keys.clone());

        let mut out = Compiled::default();
        let collection = self.path_item(
            node,
            &item_path,
            &item_path,
            Addressing::Collection,
            false,
            &collection_name,
        );
        self.record(&mut out, &item_path, collection, &collection_name);
        if keyed {
            let entry = self.path_item(
                node,
                &item_path,
                &entry_path,
                Addressing::Single,
                config && parent_config,
                &name,
            );
            self.record(&mut out, &entry_path, entry, &name);
        }

        out.fragments.claim(Fragment {
            name,
            shape: Shape::ListEntry,
            schema: single,
        })?;
        out.fragments.claim(Fragment {
            name: collection_name,
            shape: Shape::ListCollection,
            schema: multiple,
        })?;
        out.fragments.merge(passthrough)?;
        out.paths.extend(children.paths);
        out.request_bodies.extend(children.request_bodies);
        Ok(out)
    }

    /// `additionalProperties` for an object: the target override at the top
    /// level, the unchanged list when something is required, or both.
    fn companion(&self, top_level: bool, has_required: bool) -> Option<Box<SchemaRef>> {
        let name = match (top_level, has_required) {
            (true, true) => ADDITIONAL_PROPERTIES_UNCH_TARGET.to_string(),
            (true, false) => naming::additional_property_target(self.target_alias),
            (false, true) => ADDITIONAL_PROPERTY_UNCHANGED.to_string(),
            (false, false) => return None,
        };
        Some(Box::new(SchemaRef::component(&name)))
    }

    /// Build a path item.
    ///
    /// `item_path` (no key placeholders) drives summaries and operation IDs;
    /// `template` is the addressable path whose placeholders become
    /// parameters. `schema_name` is the response and request body schema.
    fn path_item(
        &self,
        node: &SchemaNode,
        item_path: &str,
        template: &str,
        addressing: Addressing,
        writable: bool,
        schema_name: &str,
    ) -> PathItem {
        let mut parameters = vec![ParameterRef::Ref(Reference::parameter(self.target_alias))];
        parameters.extend(naming::placeholders(template).map(|key| {
            ParameterRef::Inline(Parameter::path(key, format!("key {{{key}}}")))
        }));

        let (kind, operation_id) = match addressing {
            Addressing::Single => ("Container", naming::get_operation_id(item_path)),
            Addressing::Collection => ("List", naming::get_collection_operation_id(item_path)),
        };
        let get = Operation {
            summary: format!("GET {item_path} {kind}"),
            operation_id,
            request_body: None,
            responses: BTreeMap::from([(
                "200".to_string(),
                Response::json("GET OK 200", schema_name),
            )]),
        };

        let (post, delete) = if writable && addressing == Addressing::Single {
            let post = Operation {
                summary: format!("POST {item_path}"),
                operation_id: naming::post_operation_id(item_path),
                request_body: Some(Reference::request_body(&naming::request_body_name(
                    schema_name,
                ))),
                responses: BTreeMap::from([("201".to_string(), Response::empty("created"))]),
            };
            let delete = Operation {
                summary: format!("DELETE {item_path}"),
                operation_id: naming::delete_operation_id(item_path),
                request_body: None,
                responses: BTreeMap::from([(
                    "200".to_string(),
                    Response::empty("DELETE 200 OK"),
                )]),
            };
            (Some(post), Some(delete))
        } else {
            (None, None)
        };

        PathItem {
            description: node.description.clone(),
            parameters,
            get: Some(get),
            post,
            delete,
        }
    }

    /// Store a path item under the full path, with its request body if it
    /// accepts one.
    fn record(&self, out: &mut Compiled, path: &str, item: PathItem, schema_name: &str) {
        if item.post.is_some() {
            out.request_bodies.insert(
                naming::request_body_name(schema_name),
                RequestBody::json(schema_name),
            );
        }
        out.paths.insert(format!("{}{path}", self.path_prefix), item);
    }
}

fn must_value(must: &[Must]) -> serde_json::Value {
    must.iter()
        .map(|m| {
            let mut entry = serde_json::Map::new();
            entry.insert("name".to_string(), m.name.clone().into());
            if let Some(message) = &m.error_message {
                entry.insert("error-message".to_string(), message.clone().into());
            }
            serde_json::Value::Object(entry)
        })
        .collect()
}

/// A direct child of the root: `/cont1a`.
fn is_top_level(item_path: &str) -> bool {
    item_path.matches('/').count() == 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GeneratorSettings;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use yang_rest_core::NodeSpec;

    fn compile(yaml: &str) -> Result<Compiled> {
        let spec: NodeSpec = serde_yaml_ng::from_str(yaml).unwrap();
        let tree = SchemaTree::from_spec(&spec).unwrap();
        let settings = GeneratorSettings::new("td").resolve().unwrap();
        let walker = Walker::new(&tree, &settings);
        walker.walk(tree.root(), true, "")
    }

    fn schemas(compiled: Compiled) -> BTreeMap<String, Schema> {
        compiled.fragments.into_schemas()
    }

    #[test]
    fn container_path_item_and_operations() {
        let compiled = compile(indoc! {"
            name: Device
            children:
              - name: cont1a
                description: The top level container
                children:
                  - { name: leaf1a, kind: leaf, type: { kind: string } }
        "})
        .unwrap();

        let item = &compiled.paths["/td/v0.0.1/{target}/cont1a"];
        assert_eq!(item.description, "The top level container");
        assert_eq!(item.parameters.len(), 1);
        let get = item.get.as_ref().unwrap();
        assert_eq!(get.summary, "GET /cont1a Container");
        assert_eq!(get.operation_id, "getCont1a");
        let post = item.post.as_ref().unwrap();
        assert_eq!(post.operation_id, "postCont1a");
        assert_eq!(
            post.request_body.as_ref().unwrap().reference,
            "#/components/requestBodies/RequestBody_Cont1a"
        );
        assert_eq!(item.delete.as_ref().unwrap().summary, "DELETE /cont1a");
        assert!(compiled.request_bodies.contains_key("RequestBody_Cont1a"));

        let schemas = schemas(compiled);
        let names: Vec<&str> = schemas.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Cont1a"]);
        let cont = &schemas["Cont1a"];
        assert_eq!(
            cont.additional_properties.as_ref().unwrap().as_ref_str(),
            Some("#/components/schemas/AdditionalPropertyTarget")
        );
        assert!(cont.properties.contains_key("leaf1a"));
    }

    #[test]
    fn root_leaf_stays_a_component() {
        let compiled = compile(indoc! {"
            name: Device
            children:
              - { name: leafAtTopLevel, kind: leaf, type: { kind: string, pattern: ['\\w+'] } }
        "})
        .unwrap();
        assert!(compiled.paths.is_empty());
        let schemas = schemas(compiled);
        assert_eq!(schemas["LeafAtTopLevel"].title, "leafAtTopLevel");
    }

    #[test]
    fn keyed_list_paths_and_schemas() {
        let compiled = compile(indoc! {"
            name: Device
            children:
              - name: cont1a
                children:
                  - name: list5
                    kind: list
                    description: A list with two keys
                    keys: key1 key2
                    max_elements: 5
                    children:
                      - { name: key1, kind: leaf, type: { kind: string } }
                      - { name: key2, kind: leaf, type: { kind: uint8 } }
                      - { name: leaf5a, kind: leaf, type: { kind: string } }
        "})
        .unwrap();

        let collection = &compiled.paths["/td/v0.0.1/{target}/cont1a/list5"];
        assert_eq!(collection.get.as_ref().unwrap().operation_id, "getCont1a_List5_List");
        assert!(collection.post.is_none() && collection.delete.is_none());

        let entry = &compiled.paths["/td/v0.0.1/{target}/cont1a/list5/{key1}/{key2}"];
        assert_eq!(entry.parameters.len(), 3);
        assert_eq!(entry.get.as_ref().unwrap().summary, "GET /cont1a/list5 Container");
        assert!(entry.post.is_some());

        let schemas = schemas(compiled);
        let single = &schemas["Cont1a_List5"];
        assert_eq!(single.description, "A list with two keys (single)");
        assert_eq!(single.required, vec!["key1", "key2"]);
        assert_eq!(
            single.additional_properties.as_ref().unwrap().as_ref_str(),
            Some("#/components/schemas/AdditionalPropertyUnchanged")
        );

        let multiple = &schemas["Cont1a_List5_List"];
        assert_eq!(multiple.min_items, Some(0));
        assert_eq!(multiple.max_items, Some(5));
        assert!(multiple.unique_items);
        assert_eq!(multiple.extensions[LIST_KEYS_EXTENSION], serde_json::json!(["key1", "key2"]));

        assert_eq!(
            schemas["Cont1a"].properties["list5"].as_ref_str(),
            Some("#/components/schemas/Cont1a_List5_List")
        );
    }

    #[test]
    fn must_statements_tag_the_entry_schema() {
        let compiled = compile(indoc! {"
            name: Device
            children:
              - name: ports
                kind: list
                keys: [id]
                must:
                  - name: id != 0
                    error_message: port 0 is reserved
                  - name: count(../ports) < 8
                children:
                  - { name: id, kind: leaf, type: { kind: uint8 } }
              - name: plain
                kind: list
                keys: [id]
                children:
                  - { name: id, kind: leaf, type: { kind: uint8 } }
        "})
        .unwrap();
        let schemas = schemas(compiled);
        assert_eq!(
            schemas["Ports"].extensions[MUST_EXTENSION],
            serde_json::json!([
                { "name": "id != 0", "error-message": "port 0 is reserved" },
                { "name": "count(../ports) < 8" },
            ])
        );
        assert!(!schemas["Ports_List"].has_extension(MUST_EXTENSION));
        assert!(!schemas["Plain"].has_extension(MUST_EXTENSION));
    }

    #[test]
    fn keyless_list_has_only_a_collection_path() {
        let compiled = compile(indoc! {"
            name: Device
            children:
              - name: stats
                kind: list
                children:
                  - { name: counter, kind: leaf, type: { kind: uint32 } }
        "})
        .unwrap();
        let paths: Vec<&str> = compiled.paths.keys().map(String::as_str).collect();
        assert_eq!(paths, vec!["/td/v0.0.1/{target}/stats"]);
        assert!(compiled.request_bodies.is_empty());
        let schemas = schemas(compiled);
        assert_eq!(schemas["Stats_List"].max_items, None);
    }

    #[test]
    fn state_subtree_is_read_only() {
        let compiled = compile(indoc! {"
            name: Device
            children:
              - name: cont1b-state
                config: false
                children:
                  - name: list2b
                    kind: list
                    keys: [index]
                    children:
                      - { name: index, kind: leaf, type: { kind: uint8 } }
        "})
        .unwrap();
        for (path, item) in &compiled.paths {
            assert!(item.post.is_none(), "{path} has post");
            assert!(item.delete.is_none(), "{path} has delete");
        }
        assert!(compiled.request_bodies.is_empty());
    }

    #[test]
    fn choice_cases_are_relabelled() {
        let compiled = compile(indoc! {"
            name: Device
            children:
              - name: cont1a
                children:
                  - name: transport
                    kind: choice
                    children:
                      - name: tcp
                        kind: case
                        children:
                          - { name: port, kind: leaf, mandatory: true, type: { kind: uint16 } }
                      - name: udp
                        kind: case
                        children:
                          - { name: datagram-size, kind: leaf, type: { kind: uint16 } }
        "})
        .unwrap();
        let paths: Vec<&str> = compiled.paths.keys().map(String::as_str).collect();
        assert_eq!(paths, vec!["/td/v0.0.1/{target}/cont1a"]);

        let schemas = schemas(compiled);
        let cont = &schemas["Cont1a"];
        let port = cont.properties["port"].as_inline().unwrap();
        assert_eq!(port.description, "For choice transport:tcp");
        let size = cont.properties["datagram-size"].as_inline().unwrap();
        assert_eq!(size.description, "For choice transport:udp");
        assert_eq!(cont.required, vec!["port"]);
        assert_eq!(
            cont.additional_properties.as_ref().unwrap().as_ref_str(),
            Some("#/components/schemas/AdditionalPropertiesUnchTarget")
        );
    }

    #[test]
    fn nested_list_keys_are_disambiguated() {
        let compiled = compile(indoc! {"
            name: Device
            children:
              - name: a
                kind: list
                keys: [name]
                children:
                  - { name: name, kind: leaf, type: { kind: string } }
                  - name: b
                    kind: list
                    keys: [name]
                    children:
                      - { name: name, kind: leaf, type: { kind: string } }
        "})
        .unwrap();
        let item = &compiled.paths["/td/v0.0.1/{target}/a/{name}/b/{name_1}"];
        let names: Vec<&str> = item
            .parameters
            .iter()
            .filter_map(|p| match p {
                ParameterRef::Inline(p) => Some(p.name.as_str()),
                ParameterRef::Ref(_) => None,
            })
            .collect();
        assert_eq!(names, vec!["name", "name_1"]);
    }

    #[test]
    fn key_named_like_the_target_gets_its_own_placeholder() {
        let compiled = compile(indoc! {"
            name: Device
            children:
              - name: devices
                kind: list
                keys: [target]
                children:
                  - { name: target, kind: leaf, type: { kind: string } }
        "})
        .unwrap();
        let item = &compiled.paths["/td/v0.0.1/{target}/devices/{target_0}"];
        let ParameterRef::Inline(key) = &item.parameters[1] else {
            panic!("expected inline key parameter");
        };
        assert_eq!(key.name, "target_0");
        assert_eq!(key.description, "key {target_0}");
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = compile(indoc! {"
            name: Device
            children:
              - name: cont
              - name: Cont
        "})
        .unwrap_err();
        assert!(matches!(err, Error::DuplicateFragment { .. }));
    }
}
