// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Compiler from declarative validation tags to Rust validation functions.
//!
//! Types annotated with `+tag` doc comments are compiled into plain Rust
//! functions that check values of those types and return every violation
//! as an `ErrorList` from `declval-core`.
//!
//! # Pipeline
//!
//! ```text
//! Rust source ──▶ loader ──▶ Universe ──▶ graph::Builder ──▶ Graph
//!                                                             │
//!                       Rust source ◀── emit::rust ◀── emit::Emitter
//! ```
//!
//! - [`loader`] — Lowers `syn` items into a [`Universe`] and selects roots
//! - [`tags`] — Turns annotation comments into rules ([`ValidatorRegistry`])
//! - [`graph`] — Discovers the schema graph and answers "has validations"
//! - [`emit`] — Lowers the graph to an IR and renders Rust source
//!
//! # Usage in a Build Script
//!
//! ```rust,no_run
//! use declval_gen::{Generator, GeneratorConfig};
//!
//! let out = std::path::PathBuf::from(std::env::var("OUT_DIR").unwrap());
//! let code = Generator::new(GeneratorConfig::new(["types"]))
//!     .load_file("src/types.rs")?
//!     .generate()?;
//! std::fs::write(out.join("validations.rs"), code)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Example
//!
//! ```rust
//! use declval_gen::{Generator, GeneratorConfig};
//!
//! let code = Generator::new(GeneratorConfig::new(["api"]))
//!     .load_str(
//!         r#"
//!         //! +k8s:validation-gen=*
//!
//!         pub struct Widget {
//!             /// +k8s:required
//!             pub name: String,
//!         }
//!         "#
//!     )?
//!     .generate()?;
//! assert!(code.contains("pub fn validate_widget("));
//! assert!(code.contains("declval::validate::required("));
//! # Ok::<(), declval_gen::GenerateError>(())
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod emit;
pub mod error;
pub mod graph;
pub mod loader;
pub mod tags;
pub mod universe;
mod utils;

use std::path::Path;

pub use config::GeneratorConfig;
pub use error::{GenerateError, LoadError};
use graph::Builder;
use loader::Loader;
pub use tags::{RuleExtractor, ValidatorRegistry};
pub use universe::{TypeName, Universe};

/// Generate Rust source validating `roots` and everything they reach.
///
/// # Errors
///
/// Returns the first error of graph discovery or emission; no partial
/// output is produced.
pub fn generate(
    universe: &Universe,
    roots: &[TypeName],
    extractor: &dyn RuleExtractor,
    config: &GeneratorConfig
) -> Result<String, GenerateError> {
    let graph = Builder::new(universe, extractor, config).discover(roots)?;
    let file = emit::Emitter::new(&graph).emit()?;
    tracing::debug!(
        functions = file.functions.len(),
        unions = file.unions.len(),
        roots = file.registrations.len(),
        "code emitted"
    );
    Ok(emit::rust::render(&file, config))
}

/// One-shot generation from Rust source files.
///
/// The loader package is the first input package of the configuration.
#[derive(Debug)]
pub struct Generator {
    config:   GeneratorConfig,
    loader:   Loader,
    registry: ValidatorRegistry
}

impl Generator {
    /// Generator with the built-in tags.
    pub fn new(config: GeneratorConfig) -> Self {
        let package = config
            .input_packages
            .first()
            .cloned()
            .unwrap_or_default();
        Self {
            config,
            loader: Loader::new(package),
            registry: ValidatorRegistry::with_builtins()
        }
    }

    /// Prefix local type names in generated code, e.g. `crate::types::`.
    #[must_use]
    pub fn type_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.loader = self.loader.with_type_prefix(prefix);
        self
    }

    /// Use another tag registry.
    #[must_use]
    pub fn registry(mut self, registry: ValidatorRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Name a root type explicitly.
    #[must_use]
    pub fn root(mut self, name: impl Into<String>) -> Self {
        self.loader.root(name);
        self
    }

    /// Load a Rust source file.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::Read`] if the file cannot be read and
    /// [`GenerateError::Load`] if it cannot be parsed.
    pub fn load_file(self, path: impl AsRef<Path>) -> Result<Self, GenerateError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| GenerateError::Read {
            path: path.to_path_buf(),
            source
        })?;
        tracing::debug!(path = %path.display(), "loading source file");
        self.load_str(&source)
    }

    /// Load Rust source text.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::Load`] if the source cannot be parsed.
    pub fn load_str(mut self, source: &str) -> Result<Self, GenerateError> {
        self.loader.load_str(source)?;
        Ok(self)
    }

    /// Lower the loaded sources and generate code.
    ///
    /// # Errors
    ///
    /// Returns any load, discovery or emission error.
    pub fn generate(self) -> Result<String, GenerateError> {
        let loaded = self.loader.finish()?;
        generate(&loaded.universe, &loaded.roots, &self.registry, &self.config)
    }
}
