// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Annotated schema graph.
//!
//! The graph is an arena of [`SchemaNode`]s with one node per distinct
//! type. Every edge (pointee, element, key, field, alias target) is a
//! [`NodeId`] into the arena, so recursive schemas are represented without
//! shared references.
//!
//! # Submodules
//!
//! - [`builder`] — Discovers the graph from root types
//! - [`analyzer`] — Memoized "has any validation" queries

pub mod analyzer;
pub mod builder;

use std::fmt;

use indexmap::IndexMap;

pub use analyzer::Analyzer;
pub use builder::Builder;

use crate::{tags::Rule, universe::TypeName};

/// Index of a node in its [`Graph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Arena position.
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Structural kind of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Leaf.
    Builtin,
    /// Possibly absent value.
    Pointer,
    /// Growable list.
    Slice,
    /// Fixed-size list.
    Array,
    /// Keyed collection.
    Map,
    /// Record.
    Struct,
    /// Named alias of another representation.
    Alias
}

impl NodeKind {
    /// Check if the kind is a list or map.
    pub const fn is_container(self) -> bool {
        matches!(self, Self::Slice | Self::Array | Self::Map)
    }

    /// Check if values of this kind may have their own generated function.
    pub const fn is_named(self) -> bool {
        matches!(self, Self::Struct | Self::Alias)
    }
}

/// Rules attached to one struct field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldBinding {
    /// Declared name.
    pub name:          String,
    /// Serialized name.
    pub wire_name:     Option<String>,
    /// Field type.
    pub node:          NodeId,
    /// Rules declared on the field.
    pub rules:         Vec<Rule>,
    /// Rules applied to every map key.
    pub each_key:      Vec<Rule>,
    /// Rules applied to every list element or map value.
    pub each_val:      Vec<Rule>,
    /// Serialized names of the key fields of a list declared as a map.
    pub list_map_keys: Vec<String>
}

impl FieldBinding {
    /// Check if the field itself carries any rule.
    pub fn has_rules(&self) -> bool {
        !self.rules.is_empty() || !self.each_key.is_empty() || !self.each_val.is_empty()
    }
}

/// Rules attached to the element or key position of a container.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementBinding {
    /// Element or key type.
    pub node:  NodeId,
    /// Rules applied to every element or key.
    pub rules: Vec<Rule>
}

/// Key position of a map.
pub type KeyBinding = ElementBinding;

/// One type of the schema.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    /// Identity.
    pub ty:         TypeName,
    /// Structural kind.
    pub kind:       NodeKind,
    /// Spelling in generated code.
    pub rust:       String,
    /// Rules declared on the type.
    pub rules:      Vec<Rule>,
    /// Fields (Struct only).
    pub fields:     Vec<FieldBinding>,
    /// Key position (Map, or Alias of a Map).
    pub key:        Option<KeyBinding>,
    /// Element position (Slice, Array, Map, or Alias of one).
    pub elem:       Option<ElementBinding>,
    /// Pointee (Pointer only).
    pub pointee:    Option<NodeId>,
    /// Pointee is boxed (Pointer only).
    pub boxed:      bool,
    /// First non-alias representation (Alias only).
    pub underlying: Option<NodeId>,
    /// Name of the generated function; `None` for opaque types.
    pub function:   Option<String>
}

impl SchemaNode {
    fn new(ty: TypeName, kind: NodeKind, rust: String) -> Self {
        Self {
            ty,
            kind,
            rust,
            rules: Vec::new(),
            fields: Vec::new(),
            key: None,
            elem: None,
            pointee: None,
            boxed: false,
            underlying: None,
            function: None
        }
    }
}

/// Arena of nodes indexed by type identity.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<SchemaNode>,
    index: IndexMap<TypeName, NodeId>,
    roots: Vec<NodeId>
}

impl Graph {
    /// Node by id.
    ///
    /// Ids are only created by the graph itself, so every id is valid.
    pub fn node(&self, id: NodeId) -> &SchemaNode {
        &self.nodes[id.0]
    }

    /// Node id of a type, if discovered.
    pub fn lookup(&self, ty: &TypeName) -> Option<NodeId> {
        self.index.get(ty).copied()
    }

    /// Roots in the order they were requested.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Check if `id` is a root.
    pub fn is_root(&self, id: NodeId) -> bool {
        self.roots.contains(&id)
    }

    /// All nodes with their ids, in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SchemaNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if nothing was discovered.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Strip one pointer level: `(target, is_pointer, boxed)`.
    pub fn strip_pointer(&self, id: NodeId) -> (NodeId, bool, bool) {
        let node = self.node(id);
        match (node.kind, node.pointee) {
            (NodeKind::Pointer, Some(pointee)) => (pointee, true, node.boxed),
            _ => (id, false, false)
        }
    }

    /// Node whose fields and positions describe the shape of `id`.
    ///
    /// An alias descends as its underlying representation.
    pub fn shape(&self, id: NodeId) -> NodeId {
        let node = self.node(id);
        match (node.kind, node.underlying) {
            (NodeKind::Alias, Some(underlying)) => underlying,
            _ => id
        }
    }

    /// Fields of the shape of `id`.
    pub fn fields_of(&self, id: NodeId) -> &[FieldBinding] {
        &self.node(self.shape(id)).fields
    }

    /// Key and element positions of `id`.
    ///
    /// An alias of a container carries its own positions, holding the
    /// rules declared on the alias.
    pub fn positions_of(&self, id: NodeId) -> (Option<&KeyBinding>, Option<&ElementBinding>) {
        let node = self.node(id);
        (node.key.as_ref(), node.elem.as_ref())
    }

    fn insert(&mut self, node: SchemaNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.index.insert(node.ty.clone(), id);
        self.nodes.push(node);
        id
    }

    fn node_mut(&mut self, id: NodeId) -> &mut SchemaNode {
        &mut self.nodes[id.0]
    }
}
