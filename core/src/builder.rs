#![deny(missing_docs)]

//! # Schema Builder
//!
//! Walks a schema tree depth-first and compiles it into OpenAPI paths and
//! component schemas.
//!
//! * Leaves and leaf-lists become scalar (or array) components. Ranges,
//!   lengths and leafref targets are resolved on the way.
//! * Containers and lists become `object` components and addressable paths.
//!   Lists extend the path template with their key placeholders.
//! * Leafrefs additionally expose a `/values` path listing the selectable
//!   options.
//!
//! Every derived component name, operation id and path is claimed by exactly
//! one node; a second claim aborts the build with [`AppError::NameCollision`].

use crate::error::{AppError, AppResult};
use crate::leafref::resolve_reference_target;
use crate::naming::{derive_name, key_placeholders, path_segment};
use crate::oas::models::{JsonType, PathItem, Paths, Ref, RefOr, SchemaComponent, Schemas};
use crate::oas::path_item::{new_path_item, PathType, LIST_SUFFIX};
use crate::range::{effective_length, effective_range};
use crate::settings::BuildContext;
use crate::tree::{LeafType, NodeId, NodeKind, SchemaTree, TriState, TypeKind};
use serde_json::Value;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Placeholder used for lists that declare no key.
const KEYLESS_PLACEHOLDER: &str = "id";

/// Everything one build produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildOutput {
    /// Path template -> PathItem.
    pub paths: Paths,
    /// Component name -> schema.
    pub components: Schemas,
    /// Set once any leafref was compiled.
    pub has_reference: bool,
}

/// Accumulates the output of one or more subtree builds.
pub struct SchemaBuilder<'a> {
    tree: &'a SchemaTree,
    ctx: &'a BuildContext,
    schema_owners: HashMap<String, String>,
    operation_owners: HashMap<String, String>,
    path_owners: HashMap<String, String>,
    out: BuildOutput,
}

impl<'a> SchemaBuilder<'a> {
    /// Creates an empty builder over `tree`.
    pub fn new(tree: &'a SchemaTree, ctx: &'a BuildContext) -> Self {
        Self {
            tree,
            ctx,
            schema_owners: HashMap::new(),
            operation_owners: HashMap::new(),
            path_owners: HashMap::new(),
            out: BuildOutput::default(),
        }
    }

    /// Compiles every child of `node` under `parent_path`.
    ///
    /// `inherited` is the `config` value in effect above `node`; the node's own
    /// setting (if any) overrides it for the children.
    pub fn build_schema(
        &mut self,
        node: NodeId,
        inherited: TriState,
        parent_path: &str,
    ) -> AppResult<()> {
        let config = self.tree.node(node).config.or_inherit(inherited);
        for child in self.tree.children(node) {
            self.build_subtree(child, config, parent_path)?;
        }
        Ok(())
    }

    /// Compiles `node` itself and all of its descendants.
    pub fn build_subtree(
        &mut self,
        node: NodeId,
        inherited: TriState,
        parent_path: &str,
    ) -> AppResult<()> {
        let config = self.tree.node(node).config.or_inherit(inherited);
        let item_path = format!("{}/{}", parent_path, path_segment(self.tree, node));
        trace!(node = %self.tree.node_path(node), path = %item_path, "Compiling node");

        match self.tree.node(node).kind {
            NodeKind::Container => self.build_container(node, config, &item_path),
            NodeKind::List => self.build_list(node, config, &item_path),
            NodeKind::Leaf | NodeKind::LeafList => self.build_leaf(node, config, &item_path),
        }
    }

    /// Registers a component that has no node of its own (e.g. shared helper schemas).
    pub fn insert_component(
        &mut self,
        name: impl Into<String>,
        component: SchemaComponent,
        owner: impl Into<String>,
    ) -> AppResult<()> {
        let name = name.into();
        claim(&mut self.schema_owners, &name, owner.into())?;
        self.out.components.insert(name, component);
        Ok(())
    }

    /// Whether a leafref has been compiled so far.
    pub fn has_reference(&self) -> bool {
        self.out.has_reference
    }

    /// Consumes the builder and returns what it accumulated.
    pub fn finish(self) -> BuildOutput {
        self.out
    }

    fn build_container(&mut self, id: NodeId, config: TriState, item_path: &str) -> AppResult<()> {
        let name = derive_name(item_path, &self.ctx.naming_root);
        let writable = config != TriState::False;
        debug!(node = %self.tree.node_path(id), component = %name, "Container");

        let item = new_path_item(self.ctx, item_path, item_path, PathType::Container, writable);
        self.add_path(id, item_path, item)?;
        let object = self.object_component(id, config, item_path)?;
        self.add_component(id, name, object)?;

        for child in self.tree.children(id) {
            self.build_subtree(child, config, item_path)?;
        }
        Ok(())
    }

    fn build_list(&mut self, id: NodeId, config: TriState, item_path: &str) -> AppResult<()> {
        let node = self.tree.node(id);
        let name = derive_name(item_path, &self.ctx.naming_root);
        let writable = config != TriState::False;
        let entry_path = self.entry_path(id, item_path);
        debug!(node = %self.tree.node_path(id), component = %name, path = %entry_path, "List");

        let collection = new_path_item(
            self.ctx,
            item_path,
            item_path,
            PathType::ListMultiple,
            writable,
        );
        self.add_path(id, item_path, collection)?;
        let entry = new_path_item(self.ctx, &entry_path, &entry_path, PathType::ListEntry, writable);
        self.add_path(id, &entry_path, entry)?;

        let object = self.object_component(id, config, &entry_path)?;
        let mut array = SchemaComponent::new(JsonType::Array)
            .titled(node.name.clone(), node.description.clone());
        array.items = Some(Box::new(RefOr::Ref(Ref::from_schema_name(&name))));
        array.read_only = !writable;
        self.add_component(id, format!("{}{}", name, LIST_SUFFIX), array)?;
        self.add_component(id, name, object)?;

        for child in self.tree.children(id) {
            self.build_subtree(child, config, &entry_path)?;
        }
        Ok(())
    }

    fn build_leaf(&mut self, id: NodeId, config: TriState, item_path: &str) -> AppResult<()> {
        let node = self.tree.node(id);
        let leaf_type = node.leaf_type.as_ref().ok_or_else(|| {
            AppError::InvalidTree(format!("{} {} has no type", node.kind, self.tree.node_path(id)))
        })?;
        let name = derive_name(item_path, &self.ctx.naming_root);
        let read_only = config == TriState::False;
        let leafref = match leaf_type.kind {
            TypeKind::LeafRef => leaf_type.path.clone(),
            _ => None,
        };

        let scalar = self.scalar_component(id)?;
        let component = if node.kind == NodeKind::LeafList {
            let mut array = SchemaComponent::new(JsonType::Array)
                .titled(node.name.clone(), node.description.clone());
            array.items = Some(Box::new(RefOr::T(scalar)));
            array
        } else {
            scalar.titled(node.name.clone(), node.description.clone())
        };
        let component = SchemaComponent {
            read_only,
            leafref: leafref.clone(),
            ..component
        };
        trace!(node = %self.tree.node_path(id), component = %name, "Leaf");
        self.add_component(id, name, component)?;

        if leafref.is_some() {
            self.out.has_reference = true;
            let values_path = format!("{}/values", item_path);
            let item = new_path_item(
                self.ctx,
                &values_path,
                item_path,
                PathType::LeafRefValues,
                false,
            );
            self.add_path(id, &values_path, item)?;
        }
        Ok(())
    }

    /// The untitled value schema of a leaf, following leafrefs to their target.
    fn scalar_component(&self, id: NodeId) -> AppResult<SchemaComponent> {
        let declaring = resolve_reference_target(self.tree, id)?;
        let ty = self.leaf_type(declaring)?;
        let (schema_type, format) = json_type(ty.kind).ok_or_else(|| AppError::UnsupportedType {
            node: self.tree.node_path(declaring),
            kind: ty.kind.to_string(),
        })?;

        let mut schema = SchemaComponent::new(schema_type);
        schema.format = format.map(str::to_string);

        if ty.kind.is_numeric() {
            let range = effective_range(&ty.range, ty.kind)
                .map_err(|e| e.at_node(self.tree.node_path(declaring)))?;
            schema.min = range.min;
            schema.max = range.max;
        }
        if !ty.length.is_empty() {
            let (min_length, max_length) = effective_length(&ty.length)
                .map_err(|e| e.at_node(self.tree.node_path(declaring)))?;
            schema.min_length = min_length;
            schema.max_length = max_length;
        }
        if ty.pattern.len() > 1 {
            debug!(
                node = %self.tree.node_path(declaring),
                count = ty.pattern.len(),
                "Only the first pattern is emitted"
            );
        }
        schema.pattern = ty.pattern.first().cloned();
        schema.default = ty.default.as_deref().map(|d| typed_default(schema_type, d));
        if matches!(ty.kind, TypeKind::Enumeration | TypeKind::IdentityRef) {
            schema.enum_values = ty.enum_values.clone();
        }
        if ty.kind == TypeKind::Union {
            debug!(node = %self.tree.node_path(declaring), "Union emitted as string");
        }
        Ok(schema)
    }

    /// Object schema of a container or list entry: one `$ref` property per child.
    fn object_component(
        &self,
        id: NodeId,
        config: TriState,
        item_path: &str,
    ) -> AppResult<SchemaComponent> {
        let node = self.tree.node(id);
        let mut object = SchemaComponent::new(JsonType::Object)
            .titled(node.name.clone(), node.description.clone());
        object.read_only = config == TriState::False;

        for key in &node.keys {
            let key_child = self.tree.child_by_name(id, key).ok_or_else(|| {
                AppError::InvalidTree(format!(
                    "list {} declares key '{}' but has no such child",
                    self.tree.node_path(id),
                    key
                ))
            })?;
            object.required.push(path_segment(self.tree, key_child));
        }

        for child in self.tree.children(id) {
            let segment = path_segment(self.tree, child);
            let mut child_name = derive_name(
                &format!("{}/{}", item_path, segment),
                &self.ctx.naming_root,
            );
            if self.tree.node(child).is_list() {
                child_name.push_str(LIST_SUFFIX);
            }
            if self.tree.node(child).mandatory.is_true() && !object.required.contains(&segment) {
                object.required.push(segment.clone());
            }
            object
                .properties
                .insert(segment, RefOr::Ref(Ref::from_schema_name(child_name)));
        }
        Ok(object)
    }

    /// `item_path` extended by one placeholder per list key.
    ///
    /// A key whose name is already a placeholder of `item_path` (or the target
    /// alias) becomes `{<list>-<key>}`, then `{<list>-<key>-2}`, `-3`, ...
    /// until it is unique along the path.
    fn entry_path(&self, id: NodeId, item_path: &str) -> String {
        let node = self.tree.node(id);
        let mut taken = key_placeholders(item_path);
        taken.push(self.ctx.target_alias.clone());
        let keys: Vec<&str> = if node.keys.is_empty() {
            vec![KEYLESS_PLACEHOLDER]
        } else {
            node.keys.iter().map(String::as_str).collect()
        };

        let mut path = item_path.to_string();
        for key in keys {
            let mut placeholder = key.to_string();
            let mut attempt = 1;
            while taken.contains(&placeholder) {
                placeholder = match attempt {
                    1 => format!("{}-{}", node.name, key),
                    n => format!("{}-{}-{}", node.name, key, n),
                };
                attempt += 1;
            }
            path.push_str("/{");
            path.push_str(&placeholder);
            path.push('}');
            taken.push(placeholder);
        }
        path
    }

    fn leaf_type(&self, id: NodeId) -> AppResult<&'a LeafType> {
        let tree = self.tree;
        tree.node(id).leaf_type.as_ref().ok_or_else(|| {
            AppError::InvalidTree(format!(
                "{} {} has no type",
                tree.node(id).kind,
                tree.node_path(id)
            ))
        })
    }

    fn add_component(
        &mut self,
        id: NodeId,
        name: String,
        component: SchemaComponent,
    ) -> AppResult<()> {
        let owner = self.tree.node_path(id);
        self.insert_component(name, component, owner)
    }

    fn add_path(&mut self, id: NodeId, path: &str, item: PathItem) -> AppResult<()> {
        let owner = self.tree.node_path(id);
        claim(&mut self.path_owners, path, owner.clone())?;
        for op in item.operations() {
            claim(&mut self.operation_owners, &op.operation_id, owner.clone())?;
        }
        self.out.paths.insert(path.to_string(), item);
        Ok(())
    }
}

/// Compiles the children of `node` into a fresh [`BuildOutput`].
///
/// Any failure aborts the whole build; partial output is never returned.
pub fn build_schema(
    tree: &SchemaTree,
    ctx: &BuildContext,
    node: NodeId,
    inherited: TriState,
    parent_path: &str,
) -> AppResult<BuildOutput> {
    let mut builder = SchemaBuilder::new(tree, ctx);
    builder.build_schema(node, inherited, parent_path)?;
    Ok(builder.finish())
}

/// JSON type and format of a built-in kind. `None` for kinds that must be resolved first.
fn json_type(kind: TypeKind) -> Option<(JsonType, Option<&'static str>)> {
    let mapped = match kind {
        TypeKind::Int8 | TypeKind::Int16 | TypeKind::Int32 | TypeKind::Uint8 | TypeKind::Uint16 => {
            (JsonType::Integer, Some("int32"))
        }
        TypeKind::Int64 | TypeKind::Uint32 | TypeKind::Uint64 => (JsonType::Integer, Some("int64")),
        TypeKind::Decimal64 => (JsonType::Number, Some("double")),
        TypeKind::Binary => (JsonType::String, Some("byte")),
        TypeKind::Boolean | TypeKind::Empty => (JsonType::Boolean, None),
        TypeKind::String
        | TypeKind::Bits
        | TypeKind::Enumeration
        | TypeKind::IdentityRef
        | TypeKind::InstanceIdentifier
        | TypeKind::Union => (JsonType::String, None),
        TypeKind::LeafRef => return None,
    };
    Some(mapped)
}

/// Default value typed after the schema's JSON type; unparsable text stays a string.
fn typed_default(json_type: JsonType, text: &str) -> Value {
    let parsed = match json_type {
        JsonType::Integer => text
            .parse::<i64>()
            .map(Value::from)
            .or_else(|_| text.parse::<u64>().map(Value::from))
            .ok(),
        JsonType::Number => text
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number),
        JsonType::Boolean => text.parse::<bool>().ok().map(Value::Bool),
        _ => None,
    };
    parsed.unwrap_or_else(|| Value::from(text))
}


fn claim(owners: &mut HashMap<String, String>, name: &str, owner: String) -> AppResult<()> {
    match owners.entry(name.to_string()) {
        Entry::Occupied(first) => Err(AppError::NameCollision {
            name: name.to_string(),
            first: first.get().clone(),
            second: owner,
        }),
        Entry::Vacant(slot) => {
            slot.insert(owner);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::{Decimal, SubRange};
    use crate::tree::SchemaNode;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn ctx() -> BuildContext {
        BuildContext::new("targettest")
    }

    fn build_yaml(yaml: &str) -> AppResult<BuildOutput> {
        let tree = SchemaTree::from_yaml_str(yaml)?;
        build_schema(&tree, &ctx(), tree.root(), TriState::Unset, "/test")
    }

    fn items_type(component: &SchemaComponent) -> JsonType {
        component.inline_items().map(|i| i.schema_type).unwrap()
    }

    #[test]
    fn test_build_schema_integer_leaf() {
        let yaml = r#"
name: Test1
config: true
children:
  - name: Leaf1
    kind: leaf
    description: Leaf1 Description
    config: true
    mandatory: true
    type: { kind: int16, range: "1..10" }
  - name: Leaf2
    kind: leaf
    description: Leaf2 Description
    config: true
    type:
      kind: string
      pattern: ["^[abc]*"]
      default: test default
      length: "20..30"
"#;
        let out = build_yaml(yaml).unwrap();
        assert_eq!(out.paths.len(), 0);
        assert_eq!(out.components.len(), 2);
        assert!(!out.has_reference);

        let leaf1 = &out.components["Test_Leaf1"];
        assert_eq!(leaf1.title.as_deref(), Some("Leaf1"));
        assert_eq!(leaf1.description.as_deref(), Some("Leaf1 Description"));
        assert_eq!(leaf1.schema_type, JsonType::Integer);
        assert_eq!(leaf1.format.as_deref(), Some("int32"));
        assert_eq!(leaf1.min, Some(1.0));
        assert_eq!(leaf1.max, Some(10.0));

        let leaf2 = &out.components["Test_Leaf2"];
        assert_eq!(leaf2.title.as_deref(), Some("Leaf2"));
        assert_eq!(leaf2.schema_type, JsonType::String);
        assert_eq!(leaf2.pattern.as_deref(), Some("^[abc]*"));
        assert_eq!(leaf2.default, Some(json!("test default")));
        assert_eq!(leaf2.min_length, Some(20));
        assert_eq!(leaf2.max_length, Some(30));
    }

    const LEAF_LIST_TREE: &str = r#"
name: parent-list
kind: list
prefix: Test
children:
  - name: leaf-uint16
    kind: leaf
    type: { kind: uint16 }
  - name: leaf-string
    kind: leaf
    type: { kind: string }
  - name: list1
    kind: list
    children:
      - name: list-int-ref-leaf-list
        kind: leaf-list
        type: { kind: leafref, path: "../../leaf-uint16" }
      - name: list-str-ref-leaf-list
        kind: leaf-list
        type: { kind: leafref, path: "../../leaf-string" }
      - name: container1
        children:
          - name: cont-int-ref-leaf-list
            kind: leaf-list
            type: { kind: leafref, path: "../../../leaf-uint16" }
          - name: cont-str-ref-leaf-list
            kind: leaf-list
            type: { kind: leafref, path: "../../../leaf-string" }
"#;

    #[test]
    fn test_build_schema_leaf_list() {
        let out = build_yaml(LEAF_LIST_TREE).unwrap();
        assert_eq!(out.paths.len(), 7);
        assert_eq!(out.components.len(), 9);
        assert!(out.has_reference);

        let cases = [
            ("Test_List1_Container1_Cont-int-ref-leaf-list", "cont-int-ref-leaf-list", JsonType::Integer),
            ("Test_List1_Container1_Cont-str-ref-leaf-list", "cont-str-ref-leaf-list", JsonType::String),
            ("Test_List1_List-int-ref-leaf-list", "list-int-ref-leaf-list", JsonType::Integer),
            ("Test_List1_List-str-ref-leaf-list", "list-str-ref-leaf-list", JsonType::String),
        ];
        for (name, title, item_type) in cases {
            let component = out
                .components
                .get(name)
                .unwrap_or_else(|| panic!("expecting {name}"));
            assert_eq!(component.title.as_deref(), Some(title));
            assert_eq!(component.schema_type, JsonType::Array);
            assert_eq!(items_type(component), item_type);
            assert!(component.leafref.is_some());
        }
    }

    #[test]
    fn test_leaf_list_paths_and_list_components() {
        let out = build_yaml(LEAF_LIST_TREE).unwrap();
        let paths: Vec<&str> = out.paths.keys().map(String::as_str).collect();
        assert_eq!(
            paths,
            vec![
                "/test/list1",
                "/test/list1/{id}",
                "/test/list1/{id}/list-int-ref-leaf-list/values",
                "/test/list1/{id}/list-str-ref-leaf-list/values",
                "/test/list1/{id}/container1",
                "/test/list1/{id}/container1/cont-int-ref-leaf-list/values",
                "/test/list1/{id}/container1/cont-str-ref-leaf-list/values",
            ]
        );

        let list = &out.components["Test_List1-List"];
        assert_eq!(list.schema_type, JsonType::Array);
        assert_eq!(
            list.items.as_deref().and_then(RefOr::as_reference).and_then(Ref::schema_name),
            Some("Test_List1")
        );

        let entry = &out.components["Test_List1"];
        assert_eq!(entry.schema_type, JsonType::Object);
        let props: Vec<&str> = entry.properties.keys().map(String::as_str).collect();
        assert_eq!(
            props,
            vec!["list-int-ref-leaf-list", "list-str-ref-leaf-list", "container1"]
        );
        assert_eq!(
            entry.properties["container1"],
            RefOr::Ref(Ref::from_schema_name("Test_List1_Container1"))
        );

        let entry_item = &out.paths["/test/list1/{id}"];
        let names: Vec<&str> = entry_item.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["id", "targettest"]);
        assert!(entry_item.post.is_some());
        assert!(out.paths["/test/list1"].post.is_none());
    }

    #[test]
    fn test_read_only() {
        let yaml = r#"
name: test-parent
config: true
prefix: Test
children:
  - name: Leaf1
    kind: leaf
    description: Leaf1 Description
    config: true
    mandatory: true
    type: { kind: int16 }
  - name: Leaf2
    kind: leaf
    description: Leaf2 Description
    config: false
    mandatory: true
    type: { kind: leafref, path: "../Leaf1" }
"#;
        let out = build_yaml(yaml).unwrap();
        assert_eq!(out.paths.len(), 1);
        assert_eq!(out.components.len(), 2);
        assert!(!out.components["Test_Leaf1"].read_only);
        assert!(out.components["Test_Leaf2"].read_only);
        assert_eq!(out.components["Test_Leaf2"].schema_type, JsonType::Integer);
        assert_eq!(out.components["Test_Leaf2"].leafref.as_deref(), Some("../Leaf1"));
        assert!(out.paths.contains_key("/test/Leaf2/values"));
    }

    #[test]
    fn test_parent_read_only() {
        let yaml = r#"
name: test-parent
config: false
prefix: Test
children:
  - name: Leaf1
    kind: leaf
    mandatory: true
    type: { kind: int16 }
  - name: Leaf2
    kind: leaf
    config: false
    mandatory: true
    type: { kind: leafref, path: "../Leaf1" }
"#;
        let out = build_yaml(yaml).unwrap();
        assert_eq!(out.paths.len(), 1);
        assert_eq!(out.components.len(), 2);
        assert!(out.components["Test_Leaf1"].read_only);
        assert!(out.components["Test_Leaf2"].read_only);
    }

    #[test]
    fn test_unset_config_defaults_to_writable() {
        let yaml = r#"
name: root
children:
  - name: box
    children:
      - name: size
        kind: leaf
        type: { kind: uint8 }
"#;
        let out = build_yaml(yaml).unwrap();
        assert!(!out.components["Test_Box_Size"].read_only);
        let item = &out.paths["/test/box"];
        assert!(item.post.is_some());
        assert!(item.delete.is_some());
    }

    #[test]
    fn test_read_only_container_has_only_get() {
        let yaml = r#"
name: root
children:
  - name: state
    config: false
    children:
      - name: uptime
        kind: leaf
        type: { kind: uint64 }
"#;
        let out = build_yaml(yaml).unwrap();
        let item = &out.paths["/test/state"];
        assert_eq!(item.operations().count(), 1);
        assert!(out.components["Test_State"].read_only);
        assert!(out.components["Test_State_Uptime"].read_only);
    }

    #[test]
    fn test_same_leaf_name_under_distinct_parents() {
        let yaml = r#"
name: device
children:
  - name: left
    children:
      - name: name
        kind: leaf
        type: { kind: string }
  - name: right
    children:
      - name: name
        kind: leaf
        type: { kind: string }
"#;
        let out = build_yaml(yaml).unwrap();
        assert!(out.components.contains_key("Test_Left_Name"));
        assert!(out.components.contains_key("Test_Right_Name"));
    }

    #[test]
    fn test_colliding_names_are_rejected() {
        // "/x:y" and "/x/y" both derive "X_Y"
        let mut tree = SchemaTree::new(SchemaNode::container("root").with_prefix("m"));
        let root = tree.root();
        let x = tree.add_child(root, SchemaNode::container("x").with_prefix("m")).unwrap();
        tree.add_child(x, SchemaNode::leaf("y", LeafType::new(TypeKind::String)).with_prefix("m"))
            .unwrap();
        tree.add_child(root, SchemaNode::leaf("y", LeafType::new(TypeKind::String)).with_prefix("x"))
            .unwrap();

        let err = build_schema(&tree, &ctx(), root, TriState::Unset, "").unwrap_err();
        match err {
            AppError::NameCollision { name, first, second } => {
                assert_eq!(name, "X_Y");
                assert_eq!(first, "/root/x/y");
                assert_eq!(second, "/root/y");
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_list_keys_and_required() {
        let yaml = r#"
name: root
children:
  - name: switch
    kind: list
    keys: [switch-id]
    children:
      - name: switch-id
        kind: leaf
        type: { kind: string }
      - name: model-id
        kind: leaf
        mandatory: true
        type: { kind: string }
      - name: port
        kind: list
        keys: [cage-number, channel-number]
        children:
          - name: cage-number
            kind: leaf
            type: { kind: uint8 }
          - name: channel-number
            kind: leaf
            type: { kind: uint8 }
"#;
        let out = build_yaml(yaml).unwrap();
        let switch = &out.components["Test_Switch"];
        assert_eq!(switch.required, vec!["switch-id".to_string(), "model-id".to_string()]);
        assert_eq!(
            switch.properties["port"],
            RefOr::Ref(Ref::from_schema_name("Test_Switch_Port-List"))
        );

        let port_path = "/test/switch/{switch-id}/port/{cage-number}/{channel-number}";
        let names: Vec<&str> = out.paths[port_path]
            .parameters
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["switch-id", "cage-number", "channel-number", "targettest"]);
        assert_eq!(
            out.paths[port_path].get.as_ref().unwrap().operation_id,
            "getTest_Switch_Port"
        );
        assert_eq!(
            out.paths["/test/switch/{switch-id}/port"].get.as_ref().unwrap().operation_id,
            "getTest_Switch_Port-List"
        );
    }

    #[test]
    fn test_repeated_key_placeholder_is_disambiguated() {
        let yaml = r#"
name: root
children:
  - name: outer
    kind: list
    children:
      - name: inner
        kind: list
        children:
          - name: v
            kind: leaf
            type: { kind: string }
"#;
        let out = build_yaml(yaml).unwrap();
        assert!(out.paths.contains_key("/test/outer/{id}/inner/{inner-id}"));
    }

    #[test]
    fn test_nested_lists_sharing_a_name_get_unique_placeholders() {
        let yaml = r#"
name: root
children:
  - name: a
    kind: list
    children:
      - name: a
        kind: list
        children:
          - name: a
            kind: list
            children:
              - name: v
                kind: leaf
                type: { kind: string }
"#;
        let out = build_yaml(yaml).unwrap();
        let path = "/test/a/{id}/a/{a-id}/a/{a-id-2}";
        let item = &out.paths[path];
        let names: Vec<&str> = item.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["id", "a-id", "a-id-2", "targettest"]);
        assert_eq!(path.matches('{').count(), names.len() - 1);
    }

    #[test]
    fn test_list_with_child_named_list() {
        let yaml = r#"
name: root
children:
  - name: acl
    kind: list
    keys: [name]
    children:
      - name: name
        kind: leaf
        type: { kind: string }
      - name: list
        kind: leaf
        type: { kind: string }
"#;
        let out = build_yaml(yaml).unwrap();
        assert_eq!(out.components["Test_Acl-List"].schema_type, JsonType::Array);
        assert_eq!(out.components["Test_Acl_List"].schema_type, JsonType::String);
        assert_eq!(
            out.paths["/test/acl"].get.as_ref().unwrap().operation_id,
            "getTest_Acl-List"
        );
        assert!(out.components["Test_Acl"].properties.contains_key("list"));
    }

    #[test]
    fn test_missing_key_child_is_invalid() {
        let yaml = r#"
name: root
children:
  - name: switch
    kind: list
    keys: [switch-id]
    children:
      - name: other
        kind: leaf
        type: { kind: string }
"#;
        let err = build_yaml(yaml).unwrap_err();
        assert!(matches!(err, AppError::InvalidTree(_)));
    }

    #[test]
    fn test_malformed_range_reports_node_path() {
        let mut tree = SchemaTree::new(SchemaNode::container("device"));
        let root = tree.root();
        let port = tree.add_child(root, SchemaNode::container("port")).unwrap();
        let inverted = SubRange::between(Decimal::new(10, 0, false), Decimal::new(1, 0, false));
        tree.add_child(
            port,
            SchemaNode::leaf("speed", LeafType::new(TypeKind::Uint16).with_range(vec![inverted])),
        )
        .unwrap();

        let err = build_schema(&tree, &ctx(), root, TriState::Unset, "").unwrap_err();
        match err {
            AppError::MalformedRange { node, .. } => assert_eq!(node, "/device/port/speed"),
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_unresolvable_reference_aborts_build() {
        let yaml = r#"
name: root
children:
  - name: ref
    kind: leaf
    type: { kind: leafref, path: "../missing" }
"#;
        let err = build_yaml(yaml).unwrap_err();
        match err {
            AppError::UnresolvableReference { leaf, path, .. } => {
                assert_eq!(leaf, "/root/ref");
                assert_eq!(path, "../missing");
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_type_mapping_and_defaults() {
        let yaml = r#"
name: root
children:
  - name: mtu
    kind: leaf
    type: { kind: uint32, default: "1500" }
  - name: ratio
    kind: leaf
    type: { kind: decimal64, range: "-2.01..20.05", default: "0.5" }
  - name: enabled
    kind: leaf
    type: { kind: boolean, default: "true" }
  - name: speed
    kind: leaf
    type: { kind: enumeration, enum: [speed-10g, speed-100g], default: speed-10g }
  - name: blob
    kind: leaf
    type: { kind: binary }
"#;
        let out = build_yaml(yaml).unwrap();

        let mtu = &out.components["Test_Mtu"];
        assert_eq!(mtu.format.as_deref(), Some("int64"));
        assert_eq!(mtu.min, None);
        assert_eq!(mtu.default, Some(json!(1500)));

        let ratio = &out.components["Test_Ratio"];
        assert_eq!(ratio.schema_type, JsonType::Number);
        assert_eq!(ratio.min, Some(-2.01));
        assert_eq!(ratio.max, Some(20.05));
        assert_eq!(ratio.default, Some(json!(0.5)));

        assert_eq!(out.components["Test_Enabled"].default, Some(json!(true)));

        let speed = &out.components["Test_Speed"];
        assert_eq!(speed.schema_type, JsonType::String);
        assert_eq!(speed.enum_values, vec!["speed-10g".to_string(), "speed-100g".to_string()]);
        assert_eq!(speed.default, Some(json!("speed-10g")));

        assert_eq!(out.components["Test_Blob"].format.as_deref(), Some("byte"));
    }

    #[test]
    fn test_leafref_carries_target_enum() {
        let yaml = r#"
name: root
children:
  - name: kind
    kind: leaf
    type: { kind: identityref, enum: [a, b] }
  - name: alias
    kind: leaf
    type: { kind: leafref, path: "../kind" }
"#;
        let out = build_yaml(yaml).unwrap();
        let alias = &out.components["Test_Alias"];
        assert_eq!(alias.enum_values, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(alias.leafref.as_deref(), Some("../kind"));
    }

    #[test]
    fn test_build_subtree_includes_node_itself() {
        let tree = SchemaTree::from_yaml_str(LEAF_LIST_TREE).unwrap();
        let ctx = ctx();
        let list1 = tree.child_by_name(tree.root(), "list1").unwrap();

        let mut builder = SchemaBuilder::new(&tree, &ctx);
        builder.build_subtree(list1, TriState::Unset, "/test").unwrap();
        assert!(builder.has_reference());
        let out = builder.finish();
        assert!(out.components.contains_key("Test_List1"));
        assert_eq!(out.paths.len(), 7);
    }
}
