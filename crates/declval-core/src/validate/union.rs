// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Discriminated union membership checks.

use std::collections::{BTreeMap, HashMap};

use crate::{
    field::{ErrorList, FieldError, Path},
    operation::Context
};

/// Whether a union member counts as set.
pub trait Presence {
    /// Check if the member carries a value.
    fn is_set(&self) -> bool;
}

impl<T> Presence for Option<T> {
    fn is_set(&self) -> bool {
        self.is_some()
    }
}

impl Presence for String {
    fn is_set(&self) -> bool {
        !self.is_empty()
    }
}

impl Presence for bool {
    fn is_set(&self) -> bool {
        *self
    }
}

impl<T> Presence for Vec<T> {
    fn is_set(&self) -> bool {
        !self.is_empty()
    }
}

impl<K, V, S> Presence for HashMap<K, V, S> {
    fn is_set(&self) -> bool {
        !self.is_empty()
    }
}

impl<K, V> Presence for BTreeMap<K, V> {
    fn is_set(&self) -> bool {
        !self.is_empty()
    }
}

macro_rules! impl_presence_for_numbers {
    ($($ty:ty),*) => {
        $(
            impl Presence for $ty {
                fn is_set(&self) -> bool {
                    *self != (0 as $ty)
                }
            }
        )*
    };
}

impl_presence_for_numbers!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

/// Static description of one discriminated union.
///
/// `members` pairs each member's serialized name with the discriminator
/// value that selects it. Generated code emits one `static` per union type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnionMembership {
    discriminator: &'static str,
    members:       &'static [(&'static str, &'static str)]
}

impl UnionMembership {
    /// Describe a union by its discriminator and `(member, value)` pairs.
    pub const fn new(
        discriminator: &'static str,
        members: &'static [(&'static str, &'static str)]
    ) -> Self {
        Self {
            discriminator,
            members
        }
    }

    /// Serialized name of the discriminator field.
    pub const fn discriminator(&self) -> &'static str {
        self.discriminator
    }

    /// Member names paired with their discriminator values.
    pub const fn members(&self) -> &'static [(&'static str, &'static str)] {
        self.members
    }

    fn member_list(&self) -> String {
        self.members
            .iter()
            .map(|(name, _)| format!("`{}`", name))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Check that exactly one member is set and that it matches the
/// discriminator.
///
/// `presence[i]` says whether member `i` of `membership` is set. Three
/// failures are distinguished:
///
/// - more than one member is set;
/// - no member is set;
/// - exactly one member is set but the discriminator names another.
pub fn discriminated_union<T: ?Sized>(
    _op_ctx: &Context,
    fld_path: &Path,
    _value: &T,
    _old_value: Option<&T>,
    membership: &UnionMembership,
    discriminator: &str,
    presence: &[bool]
) -> ErrorList {
    let set: Vec<&(&str, &str)> = membership
        .members
        .iter()
        .zip(presence)
        .filter_map(|(member, is_set)| is_set.then_some(member))
        .collect();

    match set.as_slice() {
        [] => FieldError::invalid(
            fld_path,
            "",
            format!(
                "must specify one of: {} when `{}` is {:?}",
                membership.member_list(),
                membership.discriminator,
                discriminator
            )
        )
        .into(),
        [(_, value)] if *value == discriminator => ErrorList::new(),
        [(name, value)] => FieldError::invalid(
            &fld_path.child(name),
            "",
            format!(
                "may only be specified when `{}` is {:?}",
                membership.discriminator, value
            )
        )
        .into(),
        many => {
            let names: Vec<&str> = many.iter().map(|(name, _)| *name).collect();
            FieldError::invalid(
                fld_path,
                &names,
                format!("must specify exactly one of: {}", membership.member_list())
            )
            .into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static MEMBERSHIP: UnionMembership =
        UnionMembership::new("d", &[("m1", "CustomM1"), ("m2", "CustomM2")]);

    fn check(discriminator: &str, presence: &[bool]) -> ErrorList {
        discriminated_union(
            &Context::create(),
            &Path::root(),
            &(),
            None,
            &MEMBERSHIP,
            discriminator,
            presence
        )
    }

    #[test]
    fn matching_member_passes() {
        assert!(check("CustomM1", &[true, false]).is_empty());
        assert!(check("CustomM2", &[false, true]).is_empty());
    }

    #[test]
    fn multiple_set() {
        let errs = check("CustomM1", &[true, true]);
        assert_eq!(errs.len(), 1);
        assert!(errs[0].detail.starts_with("must specify exactly one of"));
    }

    #[test]
    fn none_set() {
        let errs = check("CustomM2", &[false, false]);
        assert_eq!(errs.len(), 1);
        assert!(errs[0].detail.starts_with("must specify one of"));
    }

    #[test]
    fn discriminator_mismatch() {
        let errs = check("CustomM2", &[true, false]);
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].field.to_string(), "m1");
        assert_eq!(errs[0].detail, "may only be specified when `d` is \"CustomM1\"");
    }

    #[test]
    fn presence_of_common_types() {
        assert!(Some(1).is_set());
        assert!(!None::<u8>.is_set());
        assert!(!String::new().is_set());
        assert!(3_u32.is_set());
        assert!(!0.0_f64.is_set());
        assert!(!Vec::<u8>::new().is_set());
    }
}
