// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Convenient re-exports for common usage.
//!
//! # Usage
//!
//! ```rust
//! use declval_core::prelude::*;
//!
//! let errs = required(&Context::create(), &Path::new("name"), Some(&String::new()), None);
//! assert_eq!(errs.len(), 1);
//! ```

pub use crate::{
    ListMap, Scheme,
    field::{ErrorList, ErrorType, FieldError, Path},
    operation::{Context, Operation},
    validate::{
        Presence, UnionMembership, discriminated_union, dns_label, fixed_result,
        fixed_result_ptr, immutable, max_length, optional, required
    }
};
