// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Generation-time errors.
//!
//! Every error aborts the whole run: no partial output is ever produced.
//! Validation-time failures are not errors here; they are data returned by
//! the generated code as `ErrorList`s.

use std::path::PathBuf;

use thiserror::Error;

use crate::universe::TypeName;

/// Errors raised while building the graph or emitting code.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("type {0}: pointers to pointers are not supported")]
    PointerToPointer(TypeName),

    #[error("type {0}: aliases to pointers are not supported")]
    AliasToPointer(TypeName),

    #[error("type {name}: unsupported type: {reason}")]
    Unsupported { name: TypeName, reason: String },

    #[error("unknown type {name} referenced from {from}")]
    UnknownType { name: TypeName, from: String },

    #[error("{context}: unsupported argument {value} for {function}")]
    UnsupportedArgument {
        context:  String,
        function: String,
        value:    String
    },

    #[error("missing serialized name for field {field}")]
    MissingWireName { field: String },

    #[error("types {first} and {second} both generate function {function}")]
    DuplicateFunction {
        function: String,
        first:    TypeName,
        second:   TypeName
    },

    #[error("root type {0} has no generated function")]
    OpaqueRoot(TypeName),

    #[error("validator for tag {0} registered twice")]
    DuplicateTag(String),

    #[error("{context}: tag {tag}: {message}")]
    TagPayload {
        context: String,
        tag:     String,
        message: String
    },

    #[error("{context}: tag {tag} may not be used on a {scope}")]
    TagScope {
        context: String,
        tag:     String,
        scope:   String
    },

    #[error("{context}: invalid list map: {message}")]
    InvalidListMap { context: String, message: String },

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("cannot read {path}: {source}")]
    Read {
        path:   PathBuf,
        #[source]
        source: std::io::Error
    }
}

/// Errors raised while lowering Rust source into a universe.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid Rust source: {0}")]
    Parse(#[from] syn::Error),

    #[error("{context}: invalid serde attribute: {message}")]
    Serde { context: String, message: String },

    #[error("type {0} is defined twice")]
    Duplicate(String),

    #[error("root type {0} is not defined")]
    UnknownRoot(String)
}

impl GenerateError {
    /// Payload error for `tag` in `context`.
    pub fn tag_payload(context: &str, tag: &str, message: impl Into<String>) -> Self {
        Self::TagPayload {
            context: context.to_string(),
            tag:     tag.to_string(),
            message: message.into()
        }
    }
}
