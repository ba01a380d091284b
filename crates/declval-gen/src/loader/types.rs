// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Lowering of `syn::Type` into universe definitions.
//!
//! | Rust type | Kind |
//! |-----------|------|
//! | `Option<T>` | Pointer |
//! | `Option<Box<T>>` | Pointer, boxed |
//! | `Vec<T>` | Slice |
//! | `[T; N]` | Array |
//! | `HashMap<K, V>`, `BTreeMap<K, V>`, `IndexMap<K, V>` | Map |
//! | primitives, `String` | Builtin |
//! | local type | named (defined by its item) |
//! | other paths | opaque external struct |
//!
//! Anything else is lowered to an `Unsupported` definition; the graph
//! builder reports it only if it is reachable from a root.

use std::collections::HashSet;

use quote::ToTokens;
use syn::{Expr, ExprLit, GenericArgument, Lit, Path, PathArguments, Type};

use crate::universe::{TypeDef, TypeDefKind, TypeName, Universe};

const PRIMITIVES: &[&str] = &[
    "bool", "char", "u8", "u16", "u32", "u64", "u128", "usize", "i8", "i16", "i32", "i64",
    "i128", "isize", "f32", "f64", "String"
];

const MAPS: &[&str] = &["HashMap", "BTreeMap", "IndexMap"];

/// Package of external types written without a path.
pub const EXTERN_PACKAGE: &str = "extern";

/// A lowered type: its universe name and its spelling.
#[derive(Debug, Clone)]
pub struct Lowered {
    pub name: TypeName,
    pub rust: String
}

/// Lowers types of one package into a universe.
pub struct TypeLowering<'a> {
    pub package:     &'a str,
    pub type_prefix: &'a str,
    pub local:       &'a HashSet<String>,
    pub universe:    &'a mut Universe
}

fn spelling(tokens: &impl ToTokens) -> String {
    tokens
        .to_token_stream()
        .to_string()
        .replace(" :: ", "::")
        .replace(":: ", "::")
        .replace(" <", "<")
        .replace("< ", "<")
        .replace(" >", ">")
        .replace(" ,", ",")
}

fn type_args(path: &Path) -> Vec<&Type> {
    let Some(last) = path.segments.last() else {
        return Vec::new();
    };
    match &last.arguments {
        PathArguments::AngleBracketed(args) => args
            .args
            .iter()
            .filter_map(|arg| match arg {
                GenericArgument::Type(ty) => Some(ty),
                _ => None
            })
            .collect(),
        _ => Vec::new()
    }
}

/// Path written before the last segment, e.g. `std::collections::`.
fn path_prefix(path: &Path) -> String {
    let mut prefix = String::new();
    if path.leading_colon.is_some() {
        prefix.push_str("::");
    }
    let count = path.segments.len();
    for segment in path.segments.iter().take(count.saturating_sub(1)) {
        prefix.push_str(&segment.ident.to_string());
        prefix.push_str("::");
    }
    prefix
}

impl TypeLowering<'_> {
    fn define(&mut self, def: TypeDef) -> Lowered {
        let lowered = Lowered {
            name: def.name.clone(),
            rust: def.rust.clone()
        };
        if !self.universe.contains(&def.name) {
            self.universe.insert(def);
        }
        lowered
    }

    fn unsupported(&mut self, ty: &impl ToTokens, reason: &str) -> Lowered {
        let rust = spelling(ty);
        self.define(TypeDef::new(
            TypeName::anonymous(rust.clone()),
            rust,
            TypeDefKind::Unsupported {
                reason: reason.to_string()
            }
        ))
    }

    fn anonymous(&mut self, rust: String, kind: TypeDefKind) -> Lowered {
        self.define(TypeDef::new(TypeName::anonymous(rust.clone()), rust, kind))
    }

    /// Lower `ty`, defining every anonymous type it is built from.
    pub fn lower(&mut self, ty: &Type) -> Lowered {
        match ty {
            Type::Path(type_path) if type_path.qself.is_none() => self.lower_path(&type_path.path),
            Type::Paren(paren) => self.lower(&paren.elem),
            Type::Group(group) => self.lower(&group.elem),
            Type::Array(array) => {
                let len = match &array.len {
                    Expr::Lit(ExprLit {
                        lit: Lit::Int(int),
                        ..
                    }) => int.base10_parse::<usize>().ok(),
                    _ => None
                };
                let Some(len) = len else {
                    return self.unsupported(ty, "array length must be an integer literal");
                };
                let elem = self.lower(&array.elem);
                self.anonymous(
                    format!("[{}; {}]", elem.rust, len),
                    TypeDefKind::Array {
                        elem: elem.name,
                        len
                    }
                )
            }
            Type::Reference(_) => self.unsupported(ty, "references are not supported"),
            Type::Tuple(_) => self.unsupported(ty, "tuples are not supported"),
            _ => self.unsupported(ty, "type form is not supported")
        }
    }

    fn lower_path(&mut self, path: &Path) -> Lowered {
        let Some(last) = path.segments.last() else {
            return self.unsupported(path, "empty path");
        };
        let ident = last.ident.to_string();
        let args = type_args(path);
        let single = path.segments.len() == 1 && path.leading_colon.is_none();

        match (ident.as_str(), args.as_slice()) {
            ("Option", [inner]) => self.lower_option(path, inner),
            ("Vec", [elem]) => {
                let elem = self.lower(elem);
                self.anonymous(
                    format!("{}Vec<{}>", path_prefix(path), elem.rust),
                    TypeDefKind::Slice {
                        elem: elem.name
                    }
                )
            }
            (map, [key, value]) if MAPS.contains(&map) => {
                let key = self.lower(key);
                let value = self.lower(value);
                self.anonymous(
                    format!("{}{}<{}, {}>", path_prefix(path), map, key.rust, value.rust),
                    TypeDefKind::Map {
                        key:  key.name,
                        elem: value.name
                    }
                )
            }
            ("Box", _) => self.unsupported(path, "Box is only supported inside Option"),
            (primitive, []) if single && PRIMITIVES.contains(&primitive) => {
                self.define(TypeDef::builtin(primitive))
            }
            (local, []) if single && self.local.contains(local) => Lowered {
                name: TypeName::new(self.package, local),
                rust: format!("{}{}", self.type_prefix, local)
            },
            _ => self.lower_extern(path)
        }
    }

    fn lower_option(&mut self, path: &Path, inner: &Type) -> Lowered {
        if let Type::Path(inner_path) = inner
            && inner_path.qself.is_none()
            && inner_path
                .path
                .segments
                .last()
                .is_some_and(|s| s.ident == "Box")
            && let [boxed] = type_args(&inner_path.path).as_slice()
        {
            let elem = self.lower(boxed);
            return self.anonymous(
                format!(
                    "{}Option<{}Box<{}>>",
                    path_prefix(path),
                    path_prefix(&inner_path.path),
                    elem.rust
                ),
                TypeDefKind::Pointer {
                    elem:  elem.name,
                    boxed: true
                }
            );
        }
        let elem = self.lower(inner);
        self.anonymous(
            format!("{}Option<{}>", path_prefix(path), elem.rust),
            TypeDefKind::Pointer {
                elem:  elem.name,
                boxed: false
            }
        )
    }

    fn lower_extern(&mut self, path: &Path) -> Lowered {
        let rust = spelling(path);
        let package = match path_prefix(path).trim_end_matches("::") {
            "" => EXTERN_PACKAGE.to_string(),
            prefix => prefix.to_string()
        };
        let name = rust.strip_prefix(&format!("{}::", package)).unwrap_or(&rust).to_string();
        tracing::trace!(ty = %rust, "external type, treated as opaque");
        self.define(TypeDef::new(
            TypeName::new(package, name),
            rust,
            TypeDefKind::Struct {
                members: Vec::new()
            }
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lower(ty: Type, local: &[&str]) -> (Lowered, Universe) {
        let local: HashSet<String> = local.iter().map(|s| s.to_string()).collect();
        let mut universe = Universe::new();
        let lowered = TypeLowering {
            package:     "api",
            type_prefix: "",
            local:       &local,
            universe:    &mut universe
        }
        .lower(&ty);
        (lowered, universe)
    }

    fn kind<'u>(universe: &'u Universe, name: &str) -> &'u TypeDefKind {
        &universe
            .get(&TypeName::anonymous(name))
            .unwrap_or_else(|| panic!("{name} not defined"))
            .kind
    }

    #[test]
    fn option_of_box_is_a_boxed_pointer() {
        let (lowered, universe) = lower(syn::parse_quote!(Option<Box<Node>>), &["Node"]);
        assert_eq!(lowered.rust, "Option<Box<Node>>");
        assert_eq!(
            kind(&universe, "Option<Box<Node>>"),
            &TypeDefKind::Pointer {
                elem:  TypeName::new("api", "Node"),
                boxed: true
            }
        );
    }

    #[test]
    fn nested_containers() {
        let (lowered, universe) = lower(
            syn::parse_quote!(std::collections::BTreeMap<String, Vec<Option<u32>>>),
            &[]
        );
        assert_eq!(
            lowered.rust,
            "std::collections::BTreeMap<String, Vec<Option<u32>>>"
        );
        assert!(matches!(kind(&universe, "Vec<Option<u32>>"), TypeDefKind::Slice { .. }));
        assert!(matches!(kind(&universe, "Option<u32>"), TypeDefKind::Pointer { .. }));
        assert_eq!(kind(&universe, "u32"), &TypeDefKind::Builtin);
        assert_eq!(universe.len(), 5);
    }

    #[test]
    fn arrays_need_literal_lengths() {
        let (lowered, universe) = lower(syn::parse_quote!([u8; 4]), &[]);
        assert_eq!(lowered.rust, "[u8; 4]");
        assert!(matches!(kind(&universe, "[u8; 4]"), TypeDefKind::Array { len: 4, .. }));

        let (lowered, universe) = lower(syn::parse_quote!([u8; N]), &[]);
        assert!(matches!(
            kind(&universe, &lowered.rust),
            TypeDefKind::Unsupported { .. }
        ));
    }

    #[test]
    fn unknown_paths_are_opaque_structs() {
        let (lowered, universe) = lower(syn::parse_quote!(chrono::DateTime<chrono::Utc>), &[]);
        assert_eq!(lowered.rust, "chrono::DateTime<chrono::Utc>");
        assert_eq!(
            lowered.name,
            TypeName::new("chrono", "DateTime<chrono::Utc>")
        );
        assert_eq!(
            universe.get(&lowered.name).map(|d| d.members().len()),
            Some(0)
        );

        let (lowered, _) = lower(syn::parse_quote!(Uuid), &[]);
        assert_eq!(lowered.name, TypeName::new(EXTERN_PACKAGE, "Uuid"));
    }

    #[test]
    fn unsupported_forms() {
        for ty in [
            syn::parse_quote!(&'static str),
            syn::parse_quote!((u8, u8)),
            syn::parse_quote!(Box<u8>),
        ] {
            let (lowered, universe) = lower(ty, &[]);
            assert!(
                matches!(
                    universe.get(&lowered.name).map(|d| &d.kind),
                    Some(TypeDefKind::Unsupported { .. })
                ),
                "{}",
                lowered.rust
            );
        }
    }

    #[test]
    fn local_types_use_the_prefix() {
        let local: HashSet<String> = ["Widget".to_string()].into();
        let mut universe = Universe::new();
        let lowered = TypeLowering {
            package:     "api",
            type_prefix: "crate::types::",
            local:       &local,
            universe:    &mut universe
        }
        .lower(&syn::parse_quote!(Vec<Widget>));
        assert_eq!(lowered.rust, "Vec<crate::types::Widget>");
        assert!(universe.get(&TypeName::new("api", "Widget")).is_none());
    }
}
