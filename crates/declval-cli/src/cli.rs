// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Command line arguments.

use std::path::PathBuf;

use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use declval_gen::config::{DEFAULT_FUNCTION_PREFIX, DEFAULT_RUNTIME_CRATE};

#[derive(Debug, Parser)]
#[command(
    name = "declval-gen",
    version,
    about = "Generate Rust validation functions from declarative tags",
    long_about = "Generate Rust validation functions from declarative tags.\n\n\
                  Reads Rust source files whose type and field doc comments carry \
                  +tag annotations and writes one Rust file with a validation \
                  function per type and a register_validations function for the \
                  root types."
)]
pub struct Cli {
    /// Rust source files defining the input types.
    #[arg(value_name = "INPUT", required_unless_present = "docs")]
    pub inputs: Vec<PathBuf>,

    /// Package name of the input types.
    #[arg(long, default_value = "types")]
    pub package: String,

    /// Path prefix of input types in generated code, e.g. `crate::types::`.
    #[arg(long = "type-prefix", value_name = "PATH", default_value = "")]
    pub type_prefix: String,

    /// Root type, in addition to those marked in the sources (repeatable).
    #[arg(long = "root", value_name = "TYPE")]
    pub roots: Vec<String>,

    /// Write generated code to a file instead of stdout.
    #[arg(long = "output-file", short = 'o', value_name = "PATH")]
    pub output_file: Option<PathBuf>,

    /// File placed before the generated code; `YEAR` becomes the current year.
    #[arg(long = "header-file", value_name = "PATH")]
    pub header_file: Option<PathBuf>,

    /// Path of the runtime crate in generated code.
    #[arg(long = "runtime-crate", value_name = "PATH", default_value = DEFAULT_RUNTIME_CRATE)]
    pub runtime_crate: String,

    /// Prefix of generated function names.
    #[arg(long = "function-prefix", value_name = "PREFIX", default_value = DEFAULT_FUNCTION_PREFIX)]
    pub function_prefix: String,

    /// Print the documentation of every known tag as JSON and exit.
    #[arg(long)]
    pub docs: bool,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let cli = Cli::parse_from(["declval-gen", "types.rs"]);
        assert_eq!(cli.inputs, vec![PathBuf::from("types.rs")]);
        assert_eq!(cli.package, "types");
        assert_eq!(cli.runtime_crate, "::declval_core");
        assert_eq!(cli.function_prefix, "validate_");
        assert!(cli.roots.is_empty());
        assert!(!cli.docs);
    }

    #[test]
    fn repeated_roots() {
        let cli = Cli::parse_from(["declval-gen", "a.rs", "--root", "Widget", "--root", "Gadget"]);
        assert_eq!(cli.roots, vec!["Widget", "Gadget"]);
    }

    #[test]
    fn inputs_are_required_without_docs() {
        assert!(Cli::try_parse_from(["declval-gen"]).is_err());
        assert!(Cli::try_parse_from(["declval-gen", "--docs"]).is_ok());
    }
}
