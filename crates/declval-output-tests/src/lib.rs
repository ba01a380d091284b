// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Fixture types and their generated validations.
//!
//! `build.rs` runs the generator over [`types`] and the output is compiled
//! into [`validations`]. Tests in `tests/` check its runtime behaviour.

pub mod types;

/// Code generated from [`types`].
#[allow(unused_imports, clippy::all)]
pub mod validations {
    use std::collections::{BTreeMap, HashMap};

    include!(concat!(env!("OUT_DIR"), "/validations.rs"));
}
