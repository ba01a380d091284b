// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Graph discovery from root types.
//!
//! Discovery is depth-first and memoized by type identity. A node is
//! registered before its children are visited, so self-referential and
//! mutually recursive types terminate: the second visit finds the node
//! already present and returns its id.
//!
//! # Per-Kind Handling
//!
//! | Kind | Action |
//! |------|--------|
//! | Builtin | Leaf |
//! | Pointer | Visit pointee; pointer to pointer is an error |
//! | Slice / Array | Visit element |
//! | Map | Visit key, then value |
//! | Struct | Opaque unless from an input package; otherwise visit every exported member |
//! | Alias | Visit the first non-alias representation; alias to pointer is an error |
//!
//! Type-level rules are attached to every node regardless of kind.

use std::collections::{HashMap, HashSet};

use convert_case::{Case, Casing};

use super::{ElementBinding, FieldBinding, Graph, NodeId, NodeKind, SchemaNode};
use crate::{
    config::GeneratorConfig,
    error::GenerateError,
    tags::{ExtractContext, Rule, RuleExtractor, Scope, parse_tag},
    universe::{Member, TypeDef, TypeDefKind, TypeName, Universe}
};

/// Structural directives of one comment block.
#[derive(Debug, Default)]
struct Directives {
    each_key:      Vec<String>,
    each_val:      Vec<String>,
    list_type_map: bool,
    list_map_keys: Vec<String>
}

impl Directives {
    fn parse(lines: &[String]) -> Self {
        let mut directives = Self::default();
        for tag in lines.iter().filter_map(|line| parse_tag(line)) {
            match (tag.name, tag.payload) {
                ("k8s:eachKey" | "eachKey", Some(nested)) => {
                    directives.each_key.push(nested_tag(nested))
                }
                ("k8s:eachVal" | "eachVal", Some(nested)) => {
                    directives.each_val.push(nested_tag(nested))
                }
                ("k8s:listType", Some("map")) => directives.list_type_map = true,
                ("k8s:listMapKey", Some(key)) => directives
                    .list_map_keys
                    .push(key.trim_matches('"').to_string()),
                _ => {}
            }
        }
        directives
    }

    fn has_each(&self) -> bool {
        !self.each_key.is_empty() || !self.each_val.is_empty()
    }
}

fn nested_tag(payload: &str) -> String {
    if payload.starts_with('+') {
        payload.to_string()
    } else {
        format!("+{}", payload)
    }
}

/// Builds a [`Graph`] from a universe.
///
/// A builder owns the per-run discovery state and is consumed by
/// [`Builder::discover`].
pub struct Builder<'a> {
    universe:  &'a Universe,
    extractor: &'a dyn RuleExtractor,
    config:    &'a GeneratorConfig,
    graph:     Graph,
    functions: HashMap<String, TypeName>
}

impl<'a> Builder<'a> {
    /// Builder over `universe` using `extractor` for rules.
    pub fn new(
        universe: &'a Universe,
        extractor: &'a dyn RuleExtractor,
        config: &'a GeneratorConfig
    ) -> Self {
        Self {
            universe,
            extractor,
            config,
            graph: Graph::default(),
            functions: HashMap::new()
        }
    }

    /// Discover every type reachable from `roots`.
    ///
    /// # Errors
    ///
    /// Fails on pointers to pointers, aliases to pointers, unsupported or
    /// unknown types, tag errors, and roots without a generated function.
    pub fn discover(mut self, roots: &[TypeName]) -> Result<Graph, GenerateError> {
        for root in roots {
            let id = self.discover_type(root, "root list")?;
            let node = self.graph.node(id);
            if !node.kind.is_named() || node.function.is_none() {
                return Err(GenerateError::OpaqueRoot(root.clone()));
            }
            if !self.graph.roots.contains(&id) {
                self.graph.roots.push(id);
            }
        }
        tracing::debug!(
            nodes = self.graph.len(),
            roots = self.graph.roots.len(),
            "graph discovered"
        );
        Ok(self.graph)
    }

    fn def(&self, name: &TypeName, from: &str) -> Result<&'a TypeDef, GenerateError> {
        self.universe
            .get(name)
            .ok_or_else(|| GenerateError::UnknownType {
                name: name.clone(),
                from: from.to_string()
            })
    }

    /// Claim the generated function name of `def`.
    ///
    /// Distinct types whose names snake-case alike are rejected.
    fn function_for(&mut self, def: &TypeDef) -> Result<Option<String>, GenerateError> {
        if !self.config.is_input_package(&def.name.package) {
            return Ok(None);
        }
        let function = format!(
            "{}{}",
            self.config.function_prefix,
            def.name.name.to_case(Case::Snake)
        );
        match self.functions.get(&function) {
            Some(first) if *first != def.name => Err(GenerateError::DuplicateFunction {
                function,
                first: first.clone(),
                second: def.name.clone()
            }),
            Some(_) => Ok(Some(function)),
            None => {
                self.functions.insert(function.clone(), def.name.clone());
                Ok(Some(function))
            }
        }
    }

    fn extract(
        &self,
        scope: Scope,
        name: &str,
        ty: &TypeDef,
        member: Option<&Member>,
        lines: &[String]
    ) -> Result<Vec<Rule>, GenerateError> {
        if lines.is_empty() {
            return Ok(Vec::new());
        }
        let ctx = ExtractContext {
            scope,
            name,
            ty,
            member,
            universe: self.universe
        };
        self.extractor.extract_rules(&ctx, lines)
    }

    fn discover_type(&mut self, name: &TypeName, from: &str) -> Result<NodeId, GenerateError> {
        if let Some(id) = self.graph.lookup(name) {
            return Ok(id);
        }
        let def = self.def(name, from)?;
        let kind = match &def.kind {
            TypeDefKind::Builtin => NodeKind::Builtin,
            TypeDefKind::Pointer {
                ..
            } => NodeKind::Pointer,
            TypeDefKind::Slice {
                ..
            } => NodeKind::Slice,
            TypeDefKind::Array {
                ..
            } => NodeKind::Array,
            TypeDefKind::Map {
                ..
            } => NodeKind::Map,
            TypeDefKind::Struct {
                ..
            } => NodeKind::Struct,
            TypeDefKind::Alias {
                ..
            } => NodeKind::Alias,
            TypeDefKind::Unsupported {
                reason
            } => {
                return Err(GenerateError::Unsupported {
                    name:   name.clone(),
                    reason: reason.clone()
                });
            }
        };

        let id = self
            .graph
            .insert(SchemaNode::new(def.name.clone(), kind, def.rust.clone()));
        tracing::trace!(ty = %name, kind = def.kind.label(), %id, "discovering");

        let rules = self.extract(Scope::Type, &def.name.name, def, None, &def.comments)?;
        self.graph.node_mut(id).rules = rules;

        match &def.kind {
            TypeDefKind::Pointer {
                elem,
                boxed
            } => {
                if matches!(
                    self.def(elem, &name.to_string())?.kind,
                    TypeDefKind::Pointer { .. }
                ) {
                    return Err(GenerateError::PointerToPointer(name.clone()));
                }
                let pointee = self.discover_type(elem, &name.to_string())?;
                let node = self.graph.node_mut(id);
                node.pointee = Some(pointee);
                node.boxed = *boxed;
            }
            TypeDefKind::Slice {
                elem
            }
            | TypeDefKind::Array {
                elem, ..
            } => {
                let elem = self.discover_type(elem, &name.to_string())?;
                self.graph.node_mut(id).elem = Some(ElementBinding {
                    node:  elem,
                    rules: Vec::new()
                });
            }
            TypeDefKind::Map {
                key,
                elem
            } => {
                let key = self.discover_type(key, &name.to_string())?;
                let elem = self.discover_type(elem, &name.to_string())?;
                let node = self.graph.node_mut(id);
                node.key = Some(ElementBinding {
                    node:  key,
                    rules: Vec::new()
                });
                node.elem = Some(ElementBinding {
                    node:  elem,
                    rules: Vec::new()
                });
            }
            TypeDefKind::Struct {
                members
            } => {
                let Some(function) = self.function_for(def)? else {
                    tracing::debug!(ty = %name, "opaque struct, not descending");
                    return Ok(id);
                };
                self.graph.node_mut(id).function = Some(function);

                let mut fields = Vec::with_capacity(members.len());
                for member in members {
                    if !member.exported {
                        tracing::trace!(ty = %name, field = %member.name, "skipping private field");
                        continue;
                    }
                    fields.push(self.discover_field(def, member)?);
                }
                tracing::debug!(ty = %name, fields = fields.len(), "struct discovered");
                self.graph.node_mut(id).fields = fields;
            }
            TypeDefKind::Alias {
                ..
            } => {
                let target = self.resolve_alias(def)?;
                let underlying = self.discover_type(&target.name, &name.to_string())?;
                let (key, elem) = self.alias_positions(def, target)?;
                let function = self.function_for(def)?;
                tracing::debug!(ty = %name, underlying = %target.name, "alias flattened");
                let node = self.graph.node_mut(id);
                node.underlying = Some(underlying);
                node.function = function;
                node.key = key;
                node.elem = elem;
            }
            TypeDefKind::Builtin
            | TypeDefKind::Unsupported {
                ..
            } => {}
        }
        Ok(id)
    }

    /// First non-alias definition behind `def`.
    fn resolve_alias(&self, def: &'a TypeDef) -> Result<&'a TypeDef, GenerateError> {
        let mut seen = HashSet::new();
        let mut current = def;
        while let TypeDefKind::Alias {
            underlying
        } = &current.kind
        {
            if !seen.insert(&current.name) {
                return Err(GenerateError::Unsupported {
                    name:   def.name.clone(),
                    reason: "alias cycle".to_string()
                });
            }
            let next = self.def(underlying, &current.name.to_string())?;
            if matches!(next.kind, TypeDefKind::Pointer { .. }) {
                return Err(GenerateError::AliasToPointer(def.name.clone()));
            }
            current = next;
        }
        Ok(current)
    }

    /// Definition behind at most one pointer level.
    fn without_pointer(&self, def: &'a TypeDef) -> Result<&'a TypeDef, GenerateError> {
        match &def.kind {
            TypeDefKind::Pointer {
                elem, ..
            } => self.def(elem, &def.name.to_string()),
            _ => Ok(def)
        }
    }

    /// Each-key and each-value rules for a container definition.
    fn each_rules(
        &self,
        context: &str,
        container: &TypeDef,
        directives: &Directives,
        member: Option<&Member>
    ) -> Result<(Vec<Rule>, Vec<Rule>), GenerateError> {
        match &container.kind {
            TypeDefKind::Map {
                key,
                elem
            } => {
                let key_def = self.def(key, context)?;
                let elem_def = self.def(elem, context)?;
                Ok((
                    self.extract(
                        Scope::EachKey,
                        &format!("{}[keys]", context),
                        key_def,
                        member,
                        &directives.each_key
                    )?,
                    self.extract(
                        Scope::EachVal,
                        &format!("{}[vals]", context),
                        elem_def,
                        member,
                        &directives.each_val
                    )?
                ))
            }
            TypeDefKind::Slice {
                elem
            }
            | TypeDefKind::Array {
                elem, ..
            } => {
                if !directives.each_key.is_empty() {
                    return Err(GenerateError::tag_payload(
                        context,
                        "k8s:eachKey",
                        "may only be used on maps"
                    ));
                }
                let elem_def = self.def(elem, context)?;
                Ok((
                    Vec::new(),
                    self.extract(
                        Scope::EachVal,
                        &format!("{}[vals]", context),
                        elem_def,
                        member,
                        &directives.each_val
                    )?
                ))
            }
            _ => {
                if directives.has_each() {
                    tracing::warn!(
                        context,
                        kind = container.kind.label(),
                        "each-key/each-value tags ignored on a non-container type"
                    );
                }
                Ok((Vec::new(), Vec::new()))
            }
        }
    }

    fn discover_field(
        &mut self,
        owner: &TypeDef,
        member: &Member
    ) -> Result<FieldBinding, GenerateError> {
        let context = format!("{}.{}", owner.name.name, member.name);
        let node = self.discover_type(&member.ty, &context)?;
        let member_def = self.def(&member.ty, &context)?;
        let container = self.without_pointer(member_def)?;

        let directives = Directives::parse(&member.comments);
        let (each_key, each_val) = self.each_rules(&context, container, &directives, Some(member))?;

        let is_list = matches!(
            container.kind,
            TypeDefKind::Slice { .. } | TypeDefKind::Array { .. }
        );
        if directives.list_type_map && !is_list {
            return Err(GenerateError::InvalidListMap {
                context,
                message: format!("a {} is not a list", container.kind.label())
            });
        }
        if directives.list_type_map && directives.list_map_keys.is_empty() {
            return Err(GenerateError::InvalidListMap {
                context,
                message: "+k8s:listType=map requires at least one +k8s:listMapKey".to_string()
            });
        }
        if !directives.list_type_map && !directives.list_map_keys.is_empty() {
            return Err(GenerateError::InvalidListMap {
                context,
                message: "+k8s:listMapKey requires +k8s:listType=map".to_string()
            });
        }

        let rules = self.extract(
            Scope::Field,
            &context,
            member_def,
            Some(member),
            &member.comments
        )?;
        tracing::trace!(
            field = %context,
            rules = rules.len(),
            each_key = each_key.len(),
            each_val = each_val.len(),
            "field discovered"
        );

        Ok(FieldBinding {
            name: member.name.clone(),
            wire_name: member.wire_name.clone(),
            node,
            rules,
            each_key,
            each_val,
            list_map_keys: directives.list_map_keys
        })
    }

    /// Positions of an alias of a container, carrying the alias's own
    /// each-key and each-value rules.
    fn alias_positions(
        &mut self,
        alias: &TypeDef,
        target: &TypeDef
    ) -> Result<(Option<ElementBinding>, Option<ElementBinding>), GenerateError> {
        let directives = Directives::parse(&alias.comments);
        let context = alias.name.name.clone();
        let (each_key, each_val) = self.each_rules(&context, target, &directives, None)?;
        let from = alias.name.to_string();
        match &target.kind {
            TypeDefKind::Map {
                key,
                elem
            } => Ok((
                Some(ElementBinding {
                    node:  self.discover_type(key, &from)?,
                    rules: each_key
                }),
                Some(ElementBinding {
                    node:  self.discover_type(elem, &from)?,
                    rules: each_val
                })
            )),
            TypeDefKind::Slice {
                elem
            }
            | TypeDefKind::Array {
                elem, ..
            } => Ok((
                None,
                Some(ElementBinding {
                    node:  self.discover_type(elem, &from)?,
                    rules: each_val
                })
            )),
            _ => Ok((None, None))
        }
    }
}
