// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Field paths and structured validation errors.
//!
//! Every generated check reports problems as [`FieldError`] values collected
//! into an ordered [`ErrorList`]. Errors carry the [`Path`] of the offending
//! value, so a caller can point at `spec.containers[0].name` rather than at
//! the whole object.
//!
//! # Path Rendering
//!
//! | Step | Constructor | Rendered |
//! |------|-------------|----------|
//! | Field | [`Path::child`] | `.name` |
//! | Index | [`Path::index`] | `[3]` |
//! | Key | [`Path::key`] | `[key]` |
//!
//! ```rust
//! use declval_core::field::Path;
//!
//! let path = Path::new("spec").child("containers").index(0).child("name");
//! assert_eq!(path.to_string(), "spec.containers[0].name");
//! ```

use std::{fmt, ops::Deref};

/// One step of a [`Path`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathElement {
    /// Named struct field (serialized name).
    Field(String),

    /// Position in a list.
    Index(usize),

    /// Entry of a map, rendered with the key's `Display`.
    Key(String)
}

/// Location of a value inside the validated object.
///
/// Paths are immutable; every step returns a new path so that sibling
/// fields never observe each other's steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    elements: Vec<PathElement>
}

impl Path {
    /// The empty path, naming the object itself.
    pub const fn root() -> Self {
        Self {
            elements: Vec::new()
        }
    }

    /// Path with a single field step.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            elements: vec![PathElement::Field(name.into())]
        }
    }

    /// Extend with a field step.
    #[must_use]
    pub fn child(&self, name: &str) -> Self {
        self.with(PathElement::Field(name.to_string()))
    }

    /// Extend with a list index step.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        self.with(PathElement::Index(index))
    }

    /// Extend with a map key step.
    #[must_use]
    pub fn key(&self, key: impl fmt::Display) -> Self {
        self.with(PathElement::Key(key.to_string()))
    }

    /// Steps from the root, outermost first.
    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    /// Check if this path names the object itself.
    pub fn is_root(&self) -> bool {
        self.elements.is_empty()
    }

    fn with(&self, element: PathElement) -> Self {
        let mut elements = Vec::with_capacity(self.elements.len() + 1);
        elements.extend(self.elements.iter().cloned());
        elements.push(element);
        Self {
            elements
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, element) in self.elements.iter().enumerate() {
            match element {
                PathElement::Field(name) if i == 0 => f.write_str(name)?,
                PathElement::Field(name) => write!(f, ".{}", name)?,
                PathElement::Index(index) => write!(f, "[{}]", index)?,
                PathElement::Key(key) => write!(f, "[{}]", key)?
            }
        }
        Ok(())
    }
}

/// Category of a [`FieldError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// A required value was absent or zero.
    Required,

    /// The value is malformed.
    Invalid,

    /// The value may not be set or changed in this context.
    Forbidden,

    /// Validation itself could not run.
    Internal
}

impl ErrorType {
    /// Human-readable label used in error messages.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Required => "Required value",
            Self::Invalid => "Invalid value",
            Self::Forbidden => "Forbidden",
            Self::Internal => "Internal error"
        }
    }
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single validation failure.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    /// Failure category.
    pub error_type: ErrorType,

    /// Location of the offending value.
    pub field: Path,

    /// `Debug` rendering of the offending value, when one is meaningful.
    pub bad_value: Option<String>,

    /// Explanation for humans; may be empty.
    pub detail: String
}

impl FieldError {
    /// A required value is missing.
    pub fn required(field: &Path, detail: impl Into<String>) -> Self {
        Self {
            error_type: ErrorType::Required,
            field:      field.clone(),
            bad_value:  None,
            detail:     detail.into()
        }
    }

    /// A value is malformed.
    pub fn invalid<T: fmt::Debug + ?Sized>(
        field: &Path,
        value: &T,
        detail: impl Into<String>
    ) -> Self {
        Self {
            error_type: ErrorType::Invalid,
            field:      field.clone(),
            bad_value:  Some(format!("{:?}", value)),
            detail:     detail.into()
        }
    }

    /// A value is not allowed here.
    pub fn forbidden(field: &Path, detail: impl Into<String>) -> Self {
        Self {
            error_type: ErrorType::Forbidden,
            field:      field.clone(),
            bad_value:  None,
            detail:     detail.into()
        }
    }

    /// Validation could not be performed at all.
    pub fn internal(field: &Path, detail: impl Into<String>) -> Self {
        Self {
            error_type: ErrorType::Internal,
            field:      field.clone(),
            bad_value:  None,
            detail:     detail.into()
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.field.is_root() {
            f.write_str("<root>")?;
        } else {
            write!(f, "{}", self.field)?;
        }
        write!(f, ": {}", self.error_type)?;
        if let (ErrorType::Invalid, Some(value)) = (self.error_type, &self.bad_value) {
            write!(f, ": {}", value)?;
        }
        if !self.detail.is_empty() {
            write!(f, ": {}", self.detail)?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldError {}

/// Ordered collection of [`FieldError`]s.
///
/// Order reflects evaluation order of the generated checks and is never
/// re-sorted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorList(Vec<FieldError>);

impl ErrorList {
    /// Empty list.
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Append one error.
    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    /// Consume into the underlying vector.
    pub fn into_vec(self) -> Vec<FieldError> {
        self.0
    }
}

impl Deref for ErrorList {
    type Target = [FieldError];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<FieldError>> for ErrorList {
    fn from(errors: Vec<FieldError>) -> Self {
        Self(errors)
    }
}

impl From<FieldError> for ErrorList {
    fn from(error: FieldError) -> Self {
        Self(vec![error])
    }
}

impl Extend<FieldError> for ErrorList {
    fn extend<I: IntoIterator<Item = FieldError>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl FromIterator<FieldError> for ErrorList {
    fn from_iter<I: IntoIterator<Item = FieldError>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ErrorList {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ErrorList {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for ErrorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}
