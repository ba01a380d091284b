// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Rust source loader.
//!
//! Lowers the items of one or more parsed Rust files into a [`Universe`]
//! and selects the root types.
//!
//! # Items
//!
//! | Item | Definition |
//! |------|------------|
//! | `struct S { .. }` | Struct; doc lines are annotation comments |
//! | `struct S;` | Struct without members |
//! | `type A = T;` | Alias |
//! | `enum E { A, B }` | Builtin |
//! | generic items, tuple structs, data enums | Unsupported |
//!
//! Items are collected first and lowered in [`Loader::finish`], so a type
//! may refer to types declared later or in another loaded file.
//!
//! # Roots
//!
//! An inner doc comment selects roots among the loaded structs:
//!
//! ```rust,ignore
//! //! +k8s:validation-gen=*          every struct
//! //! +k8s:validation-gen=type_meta  every struct with a `type_meta` member
//! ```
//!
//! Roots can also be named explicitly with [`Loader::root`].
//!
//! # Submodules
//!
//! - [`attrs`] — Serialized names from serde attributes
//! - [`types`] — Type lowering

pub mod attrs;
pub mod types;

use std::collections::HashSet;

use syn::{Fields, Item, ItemEnum, ItemStruct, ItemType, Visibility};
use types::TypeLowering;

use crate::{
    error::LoadError,
    tags::parse_tag,
    universe::{Member, TypeDef, TypeDefKind, TypeName, Universe},
    utils::docs::{doc_lines, inner_doc_lines}
};

const ROOT_TAG: &str = "k8s:validation-gen";

/// Root selection from an inner doc comment.
#[derive(Debug, Clone, PartialEq, Eq)]
enum RootMarker {
    All,
    WithMember(String)
}

/// Output of a [`Loader`].
#[derive(Debug, Clone)]
pub struct Loaded {
    /// Every lowered type.
    pub universe: Universe,
    /// Selected roots, in declaration order.
    pub roots:    Vec<TypeName>
}

/// Collects items of one package and lowers them.
///
/// ```rust
/// use declval_gen::loader::Loader;
///
/// let file: syn::File = syn::parse_quote! {
///     //! +k8s:validation-gen=*
///
///     pub struct Widget {
///         /// +k8s:required
///         pub name: String,
///     }
/// };
/// let mut loader = Loader::new("api");
/// loader.load_file(&file).unwrap();
/// let loaded = loader.finish().unwrap();
/// assert_eq!(loaded.roots.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Loader {
    package:     String,
    type_prefix: String,
    items:       Vec<Item>,
    declared:    HashSet<String>,
    markers:     Vec<RootMarker>,
    explicit:    Vec<String>
}

impl Loader {
    /// Loader for types of `package`.
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package:     package.into(),
            type_prefix: String::new(),
            items:       Vec::new(),
            declared:    HashSet::new(),
            markers:     Vec::new(),
            explicit:    Vec::new()
        }
    }

    /// Path prepended to local type names in generated code, e.g.
    /// `crate::types::`.
    #[must_use]
    pub fn with_type_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.type_prefix = prefix.into();
        self
    }

    /// Name a root type explicitly.
    pub fn root(&mut self, name: impl Into<String>) {
        self.explicit.push(name.into());
    }

    /// Parse and collect Rust source text.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Parse`] for invalid source and
    /// [`LoadError::Duplicate`] for a type declared twice.
    pub fn load_str(&mut self, source: &str) -> Result<(), LoadError> {
        let file = syn::parse_file(source)?;
        self.load_file(&file)
    }

    /// Collect the items of a parsed file.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Duplicate`] for a type declared twice.
    pub fn load_file(&mut self, file: &syn::File) -> Result<(), LoadError> {
        for line in inner_doc_lines(&file.attrs) {
            let Some(tag) = parse_tag(&line) else {
                continue;
            };
            match (tag.name, tag.payload) {
                (ROOT_TAG, Some("*")) => self.markers.push(RootMarker::All),
                (ROOT_TAG, Some(member)) if !member.is_empty() => self
                    .markers
                    .push(RootMarker::WithMember(member.to_string())),
                _ => {}
            }
        }

        for item in &file.items {
            let name = match item {
                Item::Struct(s) => s.ident.to_string(),
                Item::Type(t) => t.ident.to_string(),
                Item::Enum(e) => e.ident.to_string(),
                _ => {
                    tracing::trace!("skipping item without a type definition");
                    continue;
                }
            };
            if !self.declared.insert(name.clone()) {
                return Err(LoadError::Duplicate(name));
            }
            self.items.push(item.clone());
        }
        tracing::debug!(
            package = %self.package,
            items = self.items.len(),
            markers = self.markers.len(),
            "source loaded"
        );
        Ok(())
    }

    /// Lower every collected item and select roots.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Serde`] for malformed serde attributes and
    /// [`LoadError::UnknownRoot`] for explicit roots that were not loaded.
    pub fn finish(self) -> Result<Loaded, LoadError> {
        let mut universe = Universe::new();
        let mut structs: Vec<TypeName> = Vec::new();

        for item in &self.items {
            let mut lowering = TypeLowering {
                package:     &self.package,
                type_prefix: &self.type_prefix,
                local:       &self.declared,
                universe:    &mut universe
            };
            let def = match item {
                Item::Struct(item) => {
                    let def = lower_struct(&mut lowering, item)?;
                    if matches!(def.kind, TypeDefKind::Struct { .. }) {
                        structs.push(def.name.clone());
                    }
                    def
                }
                Item::Type(item) => lower_alias(&mut lowering, item),
                Item::Enum(item) => lower_enum(&lowering, item),
                _ => continue
            };
            universe.insert(def);
        }

        let mut roots: Vec<TypeName> = Vec::new();
        for name in &structs {
            let Some(def) = universe.get(name) else {
                continue;
            };
            let selected = self.markers.iter().any(|marker| match marker {
                RootMarker::All => true,
                RootMarker::WithMember(member) => def.members().iter().any(|m| {
                    m.name == *member || m.wire_name.as_deref() == Some(member.as_str())
                })
            });
            if selected {
                roots.push(name.clone());
            }
        }
        for name in &self.explicit {
            if !self.declared.contains(name) {
                return Err(LoadError::UnknownRoot(name.clone()));
            }
            let name = TypeName::new(self.package.as_str(), name.as_str());
            if !roots.contains(&name) {
                roots.push(name);
            }
        }

        tracing::debug!(
            package = %self.package,
            types = universe.len(),
            roots = roots.len(),
            "universe built"
        );
        Ok(Loaded {
            universe,
            roots
        })
    }
}

fn unsupported(name: TypeName, rust: String, reason: &str) -> TypeDef {
    TypeDef::new(
        name,
        rust,
        TypeDefKind::Unsupported {
            reason: reason.to_string()
        }
    )
}

fn lower_struct(lowering: &mut TypeLowering<'_>, item: &ItemStruct) -> Result<TypeDef, LoadError> {
    let name = TypeName::new(lowering.package, item.ident.to_string());
    let rust = format!("{}{}", lowering.type_prefix, item.ident);
    let comments = doc_lines(&item.attrs);
    if !item.generics.params.is_empty() {
        return Ok(unsupported(name, rust, "generic structs are not supported"));
    }

    let members = match &item.fields {
        Fields::Named(named) => {
            let wire_names = attrs::wire_names(item).map_err(|err| LoadError::Serde {
                context: name.to_string(),
                message: err.to_string()
            })?;
            named
                .named
                .iter()
                .zip(wire_names)
                .filter_map(|(field, wire_name)| {
                    let ident = field.ident.as_ref()?;
                    let ty = lowering.lower(&field.ty);
                    let mut member = Member::new(attrs::unraw(ident), None, ty.name)
                        .with_comments(doc_lines(&field.attrs));
                    member.wire_name = wire_name;
                    if matches!(field.vis, Visibility::Inherited) {
                        member = member.private();
                    }
                    Some(member)
                })
                .collect()
        }
        Fields::Unit => Vec::new(),
        Fields::Unnamed(_) => {
            return Ok(unsupported(name, rust, "tuple structs are not supported"));
        }
    };
    tracing::trace!(ty = %name, members = members.len(), "struct lowered");
    Ok(TypeDef::new(
        name,
        rust,
        TypeDefKind::Struct {
            members
        }
    )
    .with_comments(comments))
}

fn lower_alias(lowering: &mut TypeLowering<'_>, item: &ItemType) -> TypeDef {
    let name = TypeName::new(lowering.package, item.ident.to_string());
    let rust = format!("{}{}", lowering.type_prefix, item.ident);
    if !item.generics.params.is_empty() {
        return unsupported(name, rust, "generic aliases are not supported");
    }
    let underlying = lowering.lower(&item.ty);
    TypeDef::new(
        name,
        rust,
        TypeDefKind::Alias {
            underlying: underlying.name
        }
    )
    .with_comments(doc_lines(&item.attrs))
}

fn lower_enum(lowering: &TypeLowering<'_>, item: &ItemEnum) -> TypeDef {
    let name = TypeName::new(lowering.package, item.ident.to_string());
    let rust = format!("{}{}", lowering.type_prefix, item.ident);
    if !item.generics.params.is_empty()
        || item
            .variants
            .iter()
            .any(|v| !matches!(v.fields, Fields::Unit))
    {
        return unsupported(name, rust, "enums with data are not supported");
    }
    TypeDef::new(name, rust, TypeDefKind::Builtin).with_comments(doc_lines(&item.attrs))
}
