// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Explicit type universe consumed by the graph builder.
//!
//! The universe is the compiler's only view of the schema: every type the
//! builder may reach is a [`TypeDef`] keyed by its [`TypeName`]. Named
//! types carry the package they were loaded from; anonymous types such as
//! `Vec<Item>` or `Option<String>` use an empty package and their Rust
//! spelling as the name, so each distinct spelling maps to one definition.
//!
//! Universes are usually produced by the [`loader`](crate::loader) from Rust
//! source, but can also be assembled by hand:
//!
//! ```rust
//! use declval_gen::universe::{Member, TypeDef, TypeDefKind, TypeName, Universe};
//!
//! let mut universe = Universe::new();
//! let string = universe.insert(TypeDef::builtin("String"));
//! universe.insert(TypeDef::new(
//!     TypeName::new("api", "Widget"),
//!     "Widget",
//!     TypeDefKind::Struct {
//!         members: vec![Member::new("name", Some("name"), string)]
//!     }
//! ));
//! assert_eq!(universe.len(), 2);
//! ```

use std::fmt;

use indexmap::IndexMap;

/// Identity of a type within one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeName {
    /// Package the type was loaded from; empty for anonymous types.
    pub package: String,

    /// Declared name, or the Rust spelling for anonymous types.
    pub name: String
}

impl TypeName {
    /// Named type in `package`.
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            name:    name.into()
        }
    }

    /// Anonymous type identified by its spelling.
    pub fn anonymous(spelling: impl Into<String>) -> Self {
        Self::new("", spelling)
    }

    /// Check if the type has no package.
    pub fn is_anonymous(&self) -> bool {
        self.package.is_empty()
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_anonymous() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}.{}", self.package, self.name)
        }
    }
}

/// Structural kind of a [`TypeDef`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDefKind {
    /// Scalar or other leaf type.
    Builtin,

    /// Possibly absent value (`Option<T>`, `Option<Box<T>>`).
    Pointer {
        /// Pointee.
        elem:  TypeName,
        /// Pointee is boxed.
        boxed: bool
    },

    /// Growable list.
    Slice {
        /// Element type.
        elem: TypeName
    },

    /// Fixed-size list.
    Array {
        /// Element type.
        elem: TypeName,
        /// Declared length.
        len:  usize
    },

    /// Keyed collection.
    Map {
        /// Key type.
        key:  TypeName,
        /// Value type.
        elem: TypeName
    },

    /// Record with named members. External records have no members.
    Struct {
        /// Members in declaration order.
        members: Vec<Member>
    },

    /// Type defined in terms of another type's representation.
    Alias {
        /// Aliased type.
        underlying: TypeName
    },

    /// A type this compiler cannot walk.
    Unsupported {
        /// Human-readable explanation.
        reason: String
    }
}

impl TypeDefKind {
    /// Short label for logs and errors.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Builtin => "builtin",
            Self::Pointer { .. } => "pointer",
            Self::Slice { .. } => "slice",
            Self::Array { .. } => "array",
            Self::Map { .. } => "map",
            Self::Struct { .. } => "struct",
            Self::Alias { .. } => "alias",
            Self::Unsupported { .. } => "unsupported"
        }
    }
}

/// One member of a struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Declared name.
    pub name:      String,
    /// Serialized name; `None` when the member is not serialized.
    pub wire_name: Option<String>,
    /// Member type.
    pub ty:        TypeName,
    /// Annotation comment lines.
    pub comments:  Vec<String>,
    /// Whether generated code may access the member.
    pub exported:  bool
}

impl Member {
    /// Exported member without comments.
    pub fn new(name: impl Into<String>, wire_name: Option<&str>, ty: TypeName) -> Self {
        Self {
            name: name.into(),
            wire_name: wire_name.map(str::to_string),
            ty,
            comments: Vec::new(),
            exported: true
        }
    }

    /// Attach annotation comment lines.
    #[must_use]
    pub fn with_comments<I, S>(mut self, comments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>
    {
        self.comments = comments.into_iter().map(Into::into).collect();
        self
    }

    /// Mark the member as private.
    #[must_use]
    pub fn private(mut self) -> Self {
        self.exported = false;
        self
    }
}

/// Definition of one type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDef {
    /// Identity.
    pub name:     TypeName,
    /// Structure.
    pub kind:     TypeDefKind,
    /// Spelling used in generated code.
    pub rust:     String,
    /// Annotation comment lines attached to the type.
    pub comments: Vec<String>
}

impl TypeDef {
    /// Definition without comments.
    pub fn new(name: TypeName, rust: impl Into<String>, kind: TypeDefKind) -> Self {
        Self {
            name,
            kind,
            rust: rust.into(),
            comments: Vec::new()
        }
    }

    /// Anonymous leaf type such as `String` or `u32`.
    pub fn builtin(spelling: &str) -> Self {
        Self::new(TypeName::anonymous(spelling), spelling, TypeDefKind::Builtin)
    }

    /// Anonymous `Option<elem>`.
    pub fn pointer(elem: &TypeDef) -> Self {
        let rust = format!("Option<{}>", elem.rust);
        Self::new(
            TypeName::anonymous(rust.clone()),
            rust,
            TypeDefKind::Pointer {
                elem:  elem.name.clone(),
                boxed: false
            }
        )
    }

    /// Anonymous `Vec<elem>`.
    pub fn slice(elem: &TypeDef) -> Self {
        let rust = format!("Vec<{}>", elem.rust);
        Self::new(
            TypeName::anonymous(rust.clone()),
            rust,
            TypeDefKind::Slice {
                elem: elem.name.clone()
            }
        )
    }

    /// Anonymous `BTreeMap<key, elem>`.
    pub fn map(key: &TypeDef, elem: &TypeDef) -> Self {
        let rust = format!("BTreeMap<{}, {}>", key.rust, elem.rust);
        Self::new(
            TypeName::anonymous(rust.clone()),
            rust,
            TypeDefKind::Map {
                key:  key.name.clone(),
                elem: elem.name.clone()
            }
        )
    }

    /// Attach annotation comment lines.
    #[must_use]
    pub fn with_comments<I, S>(mut self, comments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>
    {
        self.comments = comments.into_iter().map(Into::into).collect();
        self
    }

    /// Members of a struct definition.
    pub fn members(&self) -> &[Member] {
        match &self.kind {
            TypeDefKind::Struct {
                members
            } => members,
            _ => &[]
        }
    }
}

/// Insertion-ordered set of type definitions.
#[derive(Debug, Clone, Default)]
pub struct Universe {
    types: IndexMap<TypeName, TypeDef>
}

impl Universe {
    /// Empty universe.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a definition, returning its name.
    pub fn insert(&mut self, def: TypeDef) -> TypeName {
        let name = def.name.clone();
        self.types.insert(name.clone(), def);
        name
    }

    /// Look up a definition.
    pub fn get(&self, name: &TypeName) -> Option<&TypeDef> {
        self.types.get(name)
    }

    /// Check if `name` is defined.
    pub fn contains(&self, name: &TypeName) -> bool {
        self.types.contains_key(name)
    }

    /// Definitions in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeDef> {
        self.types.values()
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if nothing is defined.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_names_display_bare() {
        assert_eq!(TypeName::anonymous("Vec<u8>").to_string(), "Vec<u8>");
        assert_eq!(TypeName::new("api", "Widget").to_string(), "api.Widget");
    }

    #[test]
    fn composite_spellings() {
        let string = TypeDef::builtin("String");
        assert_eq!(TypeDef::pointer(&string).rust, "Option<String>");
        assert_eq!(TypeDef::slice(&string).rust, "Vec<String>");
        assert_eq!(
            TypeDef::map(&string, &TypeDef::slice(&string)).rust,
            "BTreeMap<String, Vec<String>>"
        );
    }

    #[test]
    fn insert_replaces_same_name() {
        let mut universe = Universe::new();
        universe.insert(TypeDef::builtin("u8"));
        universe.insert(TypeDef::builtin("u8").with_comments(["+x"]));
        assert_eq!(universe.len(), 1);
        assert_eq!(
            universe
                .get(&TypeName::anonymous("u8"))
                .map(|d| d.comments.len()),
            Some(1)
        );
    }

    #[test]
    fn member_builders() {
        let member = Member::new("a", None, TypeName::anonymous("u8"))
            .with_comments(["+k8s:required"])
            .private();
        assert!(!member.exported);
        assert_eq!(member.comments, vec!["+k8s:required"]);
        assert_eq!(member.wire_name, None);
    }
}
