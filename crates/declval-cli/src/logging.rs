// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Logging setup with `tracing-subscriber`.
//!
//! Logs go to stderr so generated code on stdout stays clean. `RUST_LOG`
//! overrides the level chosen with `-v`/`-q`.

use std::io;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError
};

/// Filter for our crates at `level`, other crates at warn.
fn env_filter(level: LevelFilter) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = level.to_string().to_lowercase();
        EnvFilter::new(format!(
            "warn,declval_gen={level},declval_cli={level}",
            level = level
        ))
    })
}

/// Install the global subscriber.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init(level: LevelFilter) -> Result<(), TryInitError> {
    let layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .without_time();
    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(layer)
        .try_init()
}
