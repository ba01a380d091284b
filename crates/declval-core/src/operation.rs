// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Operation context passed to every generated validation function.

/// Kind of write being validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Operation {
    /// A new object is being created; there is no previous value.
    #[default]
    Create,

    /// An existing object is being replaced; previous values may exist.
    Update
}

/// Context shared by all checks of one validation call.
///
/// The previous value itself is not stored here: generated code threads it
/// alongside each value as `old_obj`, so every nested check sees the old
/// value at its own path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Context {
    /// Create or update.
    pub operation: Operation
}

impl Context {
    /// Context for validating a newly created object.
    pub const fn create() -> Self {
        Self {
            operation: Operation::Create
        }
    }

    /// Context for validating an update of an existing object.
    pub const fn update() -> Self {
        Self {
            operation: Operation::Update
        }
    }

    /// Check if this is an update.
    pub const fn is_update(&self) -> bool {
        matches!(self.operation, Operation::Update)
    }
}
