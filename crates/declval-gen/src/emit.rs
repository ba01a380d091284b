// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Code emission.
//!
//! [`Emitter`] lowers a [`Graph`] into the [`ir`] and [`rust::render`]
//! prints it. One function is emitted per node that has a function name
//! and is either a root or has validations.
//!
//! # Rule Ordering
//!
//! Rules attached to one value run in four buckets, stable within each:
//!
//! | Bucket | Fatal | Pointer-tolerant |
//! |--------|-------|------------------|
//! | 1 | yes | yes |
//! | 2 | yes | no |
//! | 3 | no | yes |
//! | 4 | no | no |
//!
//! Pointer-tolerant rules receive `Option<&T>` and run without a presence
//! guard. Consecutive value-only rules on an optional value share one
//! `if let Some(obj) = obj` guard.
//!
//! # Submodules
//!
//! - [`ir`] — Emission IR
//! - [`literal`] — Literal argument rendering
//! - [`rust`] — Rust source backend

pub mod ir;
pub mod literal;
pub mod rust;

use std::collections::BTreeMap;

use ir::{
    Arg, Block, FieldAccess, File, Function, ListElem, ListMapKey, MapKey, MapValue, Registration,
    Scope, StatusDispatch, Stmt, UnionStatic, ValueForm, Via
};

use crate::{
    error::GenerateError,
    graph::{Analyzer, FieldBinding, Graph, NodeId, NodeKind, SchemaNode},
    tags::{Rule, RuleArg}
};

/// Serialized name of the status subresource field.
pub const STATUS_FIELD: &str = "status";

fn bucket(rule: &Rule) -> u8 {
    match (rule.fatal, rule.pointer_tolerant) {
        (true, true) => 0,
        (true, false) => 1,
        (false, true) => 2,
        (false, false) => 3
    }
}

/// Lowers a graph into an [`ir::File`].
#[derive(Debug)]
pub struct Emitter<'g> {
    graph:    &'g Graph,
    analyzer: Analyzer<'g>,
    unions:   BTreeMap<String, UnionStatic>
}

impl<'g> Emitter<'g> {
    /// Emitter over `graph` with a fresh analyzer.
    pub fn new(graph: &'g Graph) -> Self {
        Self {
            graph,
            analyzer: Analyzer::new(graph),
            unions: BTreeMap::new()
        }
    }

    /// Emit the whole file.
    ///
    /// # Errors
    ///
    /// Fails on arguments that cannot be rendered, fields without a
    /// serialized name that need a path, and invalid list-map keys.
    pub fn emit(mut self) -> Result<File, GenerateError> {
        let mut functions = Vec::new();
        for (id, node) in self.graph.iter() {
            let Some(name) = &node.function else {
                continue;
            };
            if !self.graph.is_root(id) && !self.analyzer.has_validations(id) {
                tracing::trace!(ty = %node.ty, "no validations, no function");
                continue;
            }
            tracing::debug!(ty = %node.ty, function = %name, "emitting function");
            functions.push(Function {
                name: name.clone(),
                ty:   node.rust.clone(),
                body: self.function_body(id)?
            });
        }
        functions.sort_by(|a, b| a.name.cmp(&b.name));

        let mut registrations = self
            .graph
            .roots()
            .iter()
            .map(|&root| self.registration(root))
            .collect::<Vec<_>>();
        registrations.sort_by(|a, b| a.function.cmp(&b.function));
        registrations.dedup();

        Ok(File {
            unions: self.unions.into_values().collect(),
            functions,
            registrations
        })
    }

    fn function_body(&mut self, id: NodeId) -> Result<Block, GenerateError> {
        let graph = self.graph;
        let node = graph.node(id);
        let mut body = Block::new();
        if !node.rules.is_empty() {
            body.push(Stmt::Comment(format!("type {}", node.ty.name)));
            body.extend(self.checks(&node.ty.name, &node.rules, false)?);
        }

        let shape = graph.node(graph.shape(id));
        match shape.kind {
            NodeKind::Struct => {
                for field in &shape.fields {
                    body.extend(self.field(shape, field)?);
                }
            }
            NodeKind::Slice | NodeKind::Array | NodeKind::Map => {
                body.extend(self.container(id, graph.shape(id), &[], &[], None)?);
            }
            NodeKind::Builtin | NodeKind::Pointer | NodeKind::Alias => {}
        }
        Ok(body)
    }

    /// Rule calls on the current value, in bucket order.
    fn checks(
        &mut self,
        context: &str,
        rules: &[Rule],
        pointer: bool
    ) -> Result<Block, GenerateError> {
        let mut ordered: Vec<&Rule> = rules.iter().collect();
        ordered.sort_by_key(|rule| bucket(rule));

        let mut block = Block::new();
        let mut guarded = Block::new();
        for rule in ordered {
            let args = self.args(context, rule)?;
            let value = match (rule.pointer_tolerant, pointer) {
                (true, true) => ValueForm::Pointer,
                (true, false) => ValueForm::WrapSome,
                (false, _) => ValueForm::Direct
            };
            let check = Stmt::Check {
                function: rule.function.clone(),
                value,
                args,
                fatal: rule.fatal
            };
            if pointer && !rule.pointer_tolerant {
                guarded.push(check);
                continue;
            }
            if !guarded.is_empty() {
                block.push(Stmt::Guarded(std::mem::take(&mut guarded)));
            }
            block.push(check);
        }
        if !guarded.is_empty() {
            block.push(Stmt::Guarded(guarded));
        }
        Ok(block)
    }

    fn args(&mut self, context: &str, rule: &Rule) -> Result<Vec<Arg>, GenerateError> {
        rule.args
            .iter()
            .map(|arg| match arg {
                RuleArg::Literal(value) => literal::render(value).map(Arg::Literal).ok_or_else(
                    || GenerateError::UnsupportedArgument {
                        context:  context.to_string(),
                        function: rule.function.clone(),
                        value:    value.to_string()
                    }
                ),
                RuleArg::UnionMembership {
                    name,
                    discriminator,
                    members
                } => {
                    self.unions
                        .entry(name.clone())
                        .or_insert_with(|| UnionStatic {
                            name:          name.clone(),
                            discriminator: discriminator.clone(),
                            members:       members.clone()
                        });
                    Ok(Arg::Static(name.clone()))
                }
                RuleArg::MemberStr(member) => Ok(Arg::MemberStr(member.clone())),
                RuleArg::MemberPresence(members) => Ok(Arg::MemberPresence(members.clone()))
            })
            .collect()
    }

    /// Validation of the current value beyond its own rules: a call into
    /// its function or a loop over its contents.
    fn descent(&mut self, id: NodeId) -> Result<Block, GenerateError> {
        let graph = self.graph;
        let (target, pointer, _) = graph.strip_pointer(id);
        let node = graph.node(target);
        let stmt = match node.kind {
            NodeKind::Struct | NodeKind::Alias => {
                if !self.analyzer.has_validations(target) {
                    return Ok(Block::new());
                }
                match &node.function {
                    Some(function) => Stmt::CallType {
                        function: function.clone()
                    },
                    None => {
                        tracing::warn!(ty = %node.ty, "type has validations but no function, skipping");
                        return Ok(Block::new());
                    }
                }
            }
            NodeKind::Slice | NodeKind::Array | NodeKind::Map => {
                match self.container(target, target, &[], &[], None)? {
                    Some(stmt) => stmt,
                    None => return Ok(Block::new())
                }
            }
            NodeKind::Builtin | NodeKind::Pointer => return Ok(Block::new())
        };
        Ok(if pointer {
            vec![Stmt::Guarded(vec![stmt])]
        } else {
            vec![stmt]
        })
    }

    /// Body for one element, key or value position.
    fn position(
        &mut self,
        context: &str,
        id: NodeId,
        rules: &[Rule],
        extra: &[Rule]
    ) -> Result<(Block, Via, String), GenerateError> {
        let (target, pointer, boxed) = self.graph.strip_pointer(id);
        let all: Vec<Rule> = rules.iter().chain(extra).cloned().collect();
        let mut body = self.checks(context, &all, pointer)?;
        body.extend(self.descent(id)?);
        Ok((
            body,
            Via::new(pointer, boxed),
            self.graph.node(target).rust.clone()
        ))
    }

    /// Loop over a list or map.
    ///
    /// `positions` supplies the key and element bindings (an alias of a
    /// container carries its own); `shape` supplies the kind.
    fn container(
        &mut self,
        positions: NodeId,
        shape: NodeId,
        each_key: &[Rule],
        each_val: &[Rule],
        list_map: Option<ListMapKey>
    ) -> Result<Option<Stmt>, GenerateError> {
        let graph = self.graph;
        let context = graph.node(positions).ty.name.clone();
        let (key, elem) = graph.positions_of(positions);
        match graph.node(shape).kind {
            NodeKind::Slice | NodeKind::Array => {
                let Some(elem) = elem else {
                    return Ok(None);
                };
                let (body, via, ty) =
                    self.position(&format!("{}[vals]", context), elem.node, &elem.rules, each_val)?;
                if body.is_empty() {
                    return Ok(None);
                }
                Ok(Some(Stmt::ListLoop {
                    elem: Scope {
                        binding: ListElem {
                            via,
                            correlated: list_map.is_some()
                        },
                        ty,
                        body
                    },
                    list_map
                }))
            }
            NodeKind::Map => {
                let key_scope = match key {
                    Some(key) => {
                        let (body, _, ty) = self.position(
                            &format!("{}[keys]", context),
                            key.node,
                            &key.rules,
                            each_key
                        )?;
                        (!body.is_empty()).then_some(Scope {
                            binding: MapKey,
                            ty,
                            body
                        })
                    }
                    None => None
                };
                let val_scope = match elem {
                    Some(elem) => {
                        let (body, via, ty) = self.position(
                            &format!("{}[vals]", context),
                            elem.node,
                            &elem.rules,
                            each_val
                        )?;
                        (!body.is_empty()).then_some(Scope {
                            binding: MapValue {
                                via
                            },
                            ty,
                            body
                        })
                    }
                    None => None
                };
                if key_scope.is_none() && val_scope.is_none() {
                    return Ok(None);
                }
                Ok(Some(Stmt::MapLoop {
                    key: key_scope,
                    val: val_scope
                }))
            }
            _ => Ok(None)
        }
    }

    fn field(
        &mut self,
        owner: &SchemaNode,
        field: &FieldBinding
    ) -> Result<Block, GenerateError> {
        let graph = self.graph;
        let context = format!("{}.{}", owner.ty.name, field.name);
        let (target, pointer, boxed) = graph.strip_pointer(field.node);
        let node = graph.node(target);

        let mut body = self.checks(&context, &field.rules, pointer)?;
        if node.kind.is_container() {
            let list_map = if field.list_map_keys.is_empty() {
                None
            } else {
                Some(self.list_map_key(&context, target, &field.list_map_keys)?)
            };
            if let Some(stmt) =
                self.container(target, target, &field.each_key, &field.each_val, list_map)?
            {
                body.push(if pointer {
                    Stmt::Guarded(vec![stmt])
                } else {
                    stmt
                });
            }
        } else {
            body.extend(self.descent(field.node)?);
        }

        if body.is_empty() {
            return Ok(vec![Stmt::Comment(format!("field {} has no validation", context))]);
        }
        let wire = field
            .wire_name
            .clone()
            .ok_or_else(|| GenerateError::MissingWireName {
                field: context.clone()
            })?;
        tracing::trace!(field = %context, statements = body.len(), "field scope");
        Ok(vec![
            Stmt::Comment(format!("field {}", context)),
            Stmt::Scope(Scope {
                binding: FieldAccess {
                    name: field.name.clone(),
                    wire,
                    via: Via::new(pointer, boxed)
                },
                ty: node.rust.clone(),
                body
            }),
        ])
    }

    /// Resolve serialized list-map key names to declared field names.
    fn list_map_key(
        &self,
        context: &str,
        list: NodeId,
        keys: &[String]
    ) -> Result<ListMapKey, GenerateError> {
        let graph = self.graph;
        let invalid = |message: String| GenerateError::InvalidListMap {
            context: context.to_string(),
            message
        };
        let elem = graph
            .node(list)
            .elem
            .as_ref()
            .ok_or_else(|| invalid("list has no element type".to_string()))?;
        let (target, pointer, _) = graph.strip_pointer(elem.node);
        if pointer {
            return Err(invalid("list-map elements must not be optional".to_string()));
        }
        if graph.node(graph.shape(target)).kind != NodeKind::Struct {
            return Err(invalid("list-map elements must be structs".to_string()));
        }
        let fields = graph.fields_of(target);
        let resolved = keys
            .iter()
            .map(|key| {
                fields
                    .iter()
                    .find(|f| f.wire_name.as_deref() == Some(key.as_str()))
                    .map(|f| f.name.clone())
                    .ok_or_else(|| {
                        invalid(format!(
                            "{} has no field serialized as {:?}",
                            graph.node(target).ty.name,
                            key
                        ))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ListMapKey {
            elem_type: graph.node(target).rust.clone(),
            fields:    resolved
        })
    }

    fn registration(&mut self, root: NodeId) -> Registration {
        let graph = self.graph;
        let node = graph.node(root);
        let status = graph
            .fields_of(root)
            .iter()
            .find(|f| f.wire_name.as_deref() == Some(STATUS_FIELD))
            .and_then(|f| {
                let status = graph.node(f.node);
                if !status.kind.is_named() {
                    return None;
                }
                let function = status.function.clone()?;
                Some(
                    if graph.is_root(f.node) || self.analyzer.has_validations(f.node) {
                        StatusDispatch::Function {
                            field: f.name.clone(),
                            function
                        }
                    } else {
                        StatusDispatch::NoValidation(status.ty.name.clone())
                    }
                )
            });
        Registration {
            ty: node.rust.clone(),
            function: node.function.clone().unwrap_or_default(),
            status
        }
    }
}
