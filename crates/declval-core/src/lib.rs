// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Runtime primitives for declval-gen generated validation code.
//!
//! Generated `validate_*` functions are thin compositions of the functions
//! in this crate. The crate can also be used directly for hand-written
//! checks that follow the same error contract.
//!
//! # Overview
//!
//! - [`field`] — Field paths, [`FieldError`] and the ordered [`ErrorList`]
//! - [`operation`] — Create/update [`Context`]
//! - [`validate`] — The primitives: [`required`], [`optional`],
//!   [`max_length`], [`dns_label`], [`immutable`], [`discriminated_union`]
//! - [`content`] — Message-level string checks
//! - [`ListMap`] — Correlation of list elements by key across updates
//! - [`Scheme`] — Type-keyed registry of generated entry points
//! - [`prelude`] — Convenient re-exports
//!
//! # Generated Code Shape
//!
//! ```rust
//! use declval_core::prelude::*;
//!
//! #[derive(Default, PartialEq)]
//! pub struct Widget {
//!     pub name: String
//! }
//!
//! pub fn validate_widget(
//!     op_ctx: &Context,
//!     obj: &Widget,
//!     old_obj: Option<&Widget>,
//!     fld_path: &Path
//! ) -> ErrorList {
//!     let mut errs = ErrorList::new();
//!     errs.extend(required(
//!         op_ctx,
//!         &fld_path.child("name"),
//!         Some(&obj.name),
//!         old_obj.map(|o| &o.name)
//!     ));
//!     errs
//! }
//!
//! let errs = validate_widget(&Context::create(), &Widget::default(), None, &Path::root());
//! assert_eq!(errs.to_string(), "name: Required value");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod content;
pub mod field;
pub mod list_map;
pub mod operation;
pub mod prelude;
pub mod scheme;
pub mod validate;

pub use field::{ErrorList, ErrorType, FieldError, Path, PathElement};
pub use list_map::ListMap;
pub use operation::{Context, Operation};
pub use scheme::Scheme;
pub use validate::{
    Presence, UnionMembership, discriminated_union, dns_label, fixed_result, fixed_result_ptr,
    immutable, max_length, optional, required
};
