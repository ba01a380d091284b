// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Shared helpers for the source loader.
//!
//! # Submodules
//!
//! - [`docs`] — Doc comment lines as annotation comments

pub mod docs;
