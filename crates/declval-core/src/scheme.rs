// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Dispatch from a value's runtime type to its generated entry point.
//!
//! Generated code exposes one `register_validations(scheme: &mut Scheme)`
//! that adds a function per root type. Callers then validate any registered
//! value without naming its generated function.
//!
//! ```rust
//! use declval_core::{Context, ErrorList, Path, Scheme, required};
//!
//! #[derive(Default, PartialEq)]
//! struct Widget {
//!     name: String
//! }
//!
//! let mut scheme = Scheme::new();
//! scheme.add_validation_func::<Widget>(|op_ctx, obj, old_obj, _subresources| {
//!     required(
//!         op_ctx,
//!         &Path::new("name"),
//!         Some(&obj.name),
//!         old_obj.map(|o| &o.name)
//!     )
//! });
//!
//! let errs = scheme.validate(&Context::create(), &Widget::default(), &[]);
//! assert_eq!(errs.len(), 1);
//! ```

use std::{
    any::{Any, TypeId, type_name},
    collections::HashMap,
    fmt
};

use crate::{
    field::{ErrorList, FieldError, Path},
    operation::Context
};

type ErasedFn =
    Box<dyn Fn(&Context, &dyn Any, Option<&dyn Any>, &[&str]) -> ErrorList + Send + Sync>;

/// Registry of validation entry points keyed by type.
#[derive(Default)]
pub struct Scheme {
    funcs: HashMap<TypeId, ErasedFn>
}

impl Scheme {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the entry point for `T`, replacing any previous one.
    pub fn add_validation_func<T: Any>(
        &mut self,
        func: impl Fn(&Context, &T, Option<&T>, &[&str]) -> ErrorList + Send + Sync + 'static
    ) {
        let erased: ErasedFn = Box::new(
            move |op_ctx: &Context,
                  obj: &dyn Any,
                  old_obj: Option<&dyn Any>,
                  subresources: &[&str]| match obj.downcast_ref::<T>() {
                Some(obj) => func(
                    op_ctx,
                    obj,
                    old_obj.and_then(|o| o.downcast_ref::<T>()),
                    subresources
                ),
                None => FieldError::internal(
                    &Path::root(),
                    format!("value is not a {}", type_name::<T>())
                )
                .into()
            }
        );
        self.funcs.insert(TypeId::of::<T>(), erased);
    }

    /// Check if `T` has a registered entry point.
    pub fn is_registered<T: Any>(&self) -> bool {
        self.funcs.contains_key(&TypeId::of::<T>())
    }

    /// Validate a newly created value.
    pub fn validate<T: Any>(&self, op_ctx: &Context, obj: &T, subresources: &[&str]) -> ErrorList {
        self.dispatch(op_ctx, obj, None, subresources)
    }

    /// Validate a value against its previous version.
    pub fn validate_update<T: Any>(
        &self,
        op_ctx: &Context,
        obj: &T,
        old_obj: &T,
        subresources: &[&str]
    ) -> ErrorList {
        self.dispatch(op_ctx, obj, Some(old_obj), subresources)
    }

    fn dispatch<T: Any>(
        &self,
        op_ctx: &Context,
        obj: &T,
        old_obj: Option<&T>,
        subresources: &[&str]
    ) -> ErrorList {
        match self.funcs.get(&TypeId::of::<T>()) {
            Some(func) => func(
                op_ctx,
                obj,
                old_obj.map(|o| o as &dyn Any),
                subresources
            ),
            None => FieldError::internal(
                &Path::root(),
                format!("no validation registered for {}", type_name::<T>())
            )
            .into()
        }
    }
}

impl fmt::Debug for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheme")
            .field("types", &self.funcs.len())
            .finish()
    }
}
