// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Validation primitives called by generated code.
//!
//! Every primitive has the same leading parameters:
//!
//! ```text
//! fn primitive(op_ctx: &Context, fld_path: &Path, value, old_value, args...) -> ErrorList
//! ```
//!
//! Two shapes exist for `value`:
//!
//! | Shape | Value | Old value | Used for |
//! |-------|-------|-----------|----------|
//! | Pointer-tolerant | `Option<&T>` | `Option<&T>` | [`required`], [`optional`], [`immutable`], [`fixed_result_ptr`] |
//! | Value-only | `&T` | `Option<&T>` | [`max_length`], [`dns_label`], [`fixed_result`], [`discriminated_union`] |
//!
//! Generated code calls value-only primitives inside a presence guard, and
//! wraps non-optional values in `Some` before calling pointer-tolerant ones.
//!
//! Primitives never panic and never short-circuit by themselves; fatality
//! is decided by the generated caller.

mod union;

use std::fmt::Debug;

pub use union::{Presence, UnionMembership, discriminated_union};

use crate::{
    content,
    field::{ErrorList, FieldError, Path},
    operation::Context
};

/// Fail iff the value is absent or equal to its type's default.
pub fn required<T: Default + PartialEq>(
    _op_ctx: &Context,
    fld_path: &Path,
    value: Option<&T>,
    _old_value: Option<&T>
) -> ErrorList {
    if is_specified(value) {
        return ErrorList::new();
    }
    FieldError::required(fld_path, "").into()
}

/// Same check as [`required`], reported with a distinct detail.
///
/// An `optional` tag documents intent; a zero value is still reported.
pub fn optional<T: Default + PartialEq>(
    _op_ctx: &Context,
    fld_path: &Path,
    value: Option<&T>,
    _old_value: Option<&T>
) -> ErrorList {
    if is_specified(value) {
        return ErrorList::new();
    }
    FieldError::required(fld_path, "optional value was not specified").into()
}

/// Fail iff the string is longer than `max` bytes.
pub fn max_length<S: AsRef<str> + ?Sized>(
    _op_ctx: &Context,
    fld_path: &Path,
    value: &S,
    _old_value: Option<&S>,
    max: usize
) -> ErrorList {
    let value = value.as_ref();
    if value.len() > max {
        return FieldError::invalid(fld_path, value, content::max_len_error(max)).into();
    }
    ErrorList::new()
}

/// Report every DNS label violation of the string.
pub fn dns_label<S: AsRef<str> + ?Sized>(
    _op_ctx: &Context,
    fld_path: &Path,
    value: &S,
    _old_value: Option<&S>
) -> ErrorList {
    let value = value.as_ref();
    content::is_dns1123_label(value)
        .into_iter()
        .map(|msg| FieldError::invalid(fld_path, value, msg))
        .collect()
}

/// Fail on update iff the value differs from the old value.
///
/// Without an old value there is nothing to compare: elements added to a
/// list and values set for the first time pass. Clearing a value that was
/// set is a change.
pub fn immutable<T: PartialEq>(
    op_ctx: &Context,
    fld_path: &Path,
    value: Option<&T>,
    old_value: Option<&T>
) -> ErrorList {
    if !op_ctx.is_update() || old_value.is_none() || value == old_value {
        return ErrorList::new();
    }
    FieldError::forbidden(fld_path, "field is immutable").into()
}

/// Return a fixed result regardless of the value.
///
/// `result == false` produces one Invalid error carrying `arg`.
pub fn fixed_result<T: Debug + ?Sized>(
    _op_ctx: &Context,
    fld_path: &Path,
    value: &T,
    _old_value: Option<&T>,
    result: bool,
    arg: &str
) -> ErrorList {
    if result {
        return ErrorList::new();
    }
    FieldError::invalid(fld_path, value, format!("forced failure: {}", arg)).into()
}

/// [`fixed_result`] for values that may be absent.
pub fn fixed_result_ptr<T: Debug>(
    _op_ctx: &Context,
    fld_path: &Path,
    value: Option<&T>,
    _old_value: Option<&T>,
    result: bool,
    arg: &str
) -> ErrorList {
    if result {
        return ErrorList::new();
    }
    FieldError::invalid(fld_path, &value, format!("forced failure: {}", arg)).into()
}

fn is_specified<T: Default + PartialEq>(value: Option<&T>) -> bool {
    value.is_some_and(|v| *v != T::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::ErrorType;

    fn path() -> Path {
        Path::new("f")
    }

    #[test]
    fn required_accepts_non_zero() {
        let ctx = Context::create();
        assert!(required(&ctx, &path(), Some(&"x".to_string()), None).is_empty());
        assert!(required(&ctx, &path(), Some(&1_i32), None).is_empty());
    }

    #[test]
    fn required_rejects_absent_and_zero() {
        let ctx = Context::create();
        let absent = required::<String>(&ctx, &path(), None, None);
        assert_eq!(absent.len(), 1);
        assert_eq!(absent[0].error_type, ErrorType::Required);
        assert_eq!(absent[0].detail, "");

        let zero = required(&ctx, &path(), Some(&0_u8), None);
        assert_eq!(zero.len(), 1);
    }

    #[test]
    fn optional_reports_zero_value() {
        let ctx = Context::create();
        let errs = optional(&ctx, &path(), Some(&String::new()), None);
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].error_type, ErrorType::Required);
        assert_eq!(errs[0].detail, "optional value was not specified");
        assert!(optional(&ctx, &path(), Some(&true), None).is_empty());
    }

    #[test]
    fn max_length_boundary() {
        let ctx = Context::create();
        assert!(max_length(&ctx, &path(), "abc", None, 3).is_empty());
        let errs = max_length(&ctx, &path(), "abcd", None, 3);
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].error_type, ErrorType::Invalid);
        assert_eq!(errs[0].detail, "must be no more than 3 characters");
        assert_eq!(errs[0].bad_value.as_deref(), Some("\"abcd\""));
    }

    #[test]
    fn max_length_on_owned_string() {
        let ctx = Context::create();
        let value = "toolong".to_string();
        assert_eq!(max_length(&ctx, &path(), &value, None, 2).len(), 1);
    }

    #[test]
    fn dns_label_reports_all_violations() {
        let ctx = Context::create();
        assert!(dns_label(&ctx, &path(), "abc", None).is_empty());
        let errs = dns_label(&ctx, &path(), "-A_", None);
        assert_eq!(errs.len(), 2);
        assert!(errs.iter().all(|e| e.error_type == ErrorType::Invalid));
    }

    #[test]
    fn immutable_ignores_create() {
        let ctx = Context::create();
        assert!(immutable(&ctx, &path(), Some(&1), Some(&2)).is_empty());
    }

    #[test]
    fn immutable_rejects_change_on_update() {
        let ctx = Context::update();
        assert!(immutable(&ctx, &path(), Some(&1), Some(&1)).is_empty());
        assert!(immutable::<i32>(&ctx, &path(), None, None).is_empty());

        let errs = immutable(&ctx, &path(), Some(&1), Some(&2));
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].error_type, ErrorType::Forbidden);
        assert_eq!(immutable(&ctx, &path(), None, Some(&2)).len(), 1);
    }

    #[test]
    fn immutable_without_old_value_passes() {
        let ctx = Context::update();
        assert!(immutable(&ctx, &path(), Some(&1), None).is_empty());
    }

    #[test]
    fn fixed_result_forces_failure() {
        let ctx = Context::create();
        assert!(fixed_result(&ctx, &path(), &5, None, true, "x").is_empty());
        let errs = fixed_result(&ctx, &path(), &5, None, false, "type T1");
        assert_eq!(errs[0].detail, "forced failure: type T1");
        assert_eq!(errs[0].bad_value.as_deref(), Some("5"));
    }

    #[test]
    fn fixed_result_ptr_accepts_absent() {
        let ctx = Context::create();
        let errs = fixed_result_ptr::<String>(&ctx, &path(), None, None, false, "p");
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].bad_value.as_deref(), Some("None"));
    }
}
