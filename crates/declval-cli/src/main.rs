// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! `declval-gen` binary.

mod cli;
mod logging;

use std::{
    fs,
    io::{self, Write},
    process::ExitCode
};

use anyhow::{Context, Result};
use chrono::{Datelike, Utc};
use clap::Parser;
use declval_gen::{Generator, GeneratorConfig, ValidatorRegistry, tags::TagDoc};

use crate::cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(error) = logging::init(cli.verbosity.tracing_level_filter()) {
        eprintln!("error: failed to initialize logging: {error}");
        return ExitCode::FAILURE;
    }
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    if cli.docs {
        return print_docs();
    }

    let mut generator = Generator::new(config(cli)?).type_prefix(cli.type_prefix.as_str());
    for root in &cli.roots {
        generator = generator.root(root.as_str());
    }
    for input in &cli.inputs {
        generator = generator
            .load_file(input)
            .with_context(|| format!("failed to load {}", input.display()))?;
    }
    let code = generator.generate().context("code generation failed")?;

    match &cli.output_file {
        Some(path) => {
            fs::write(path, &code)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), bytes = code.len(), "generated code written");
        }
        None => io::stdout()
            .write_all(code.as_bytes())
            .context("failed to write generated code")?
    }
    Ok(())
}

fn config(cli: &Cli) -> Result<GeneratorConfig> {
    let mut config = GeneratorConfig::new([cli.package.as_str()])
        .with_runtime_crate(cli.runtime_crate.as_str())
        .with_function_prefix(cli.function_prefix.as_str());
    if let Some(path) = &cli.header_file {
        let header = fs::read_to_string(path)
            .with_context(|| format!("failed to read header {}", path.display()))?;
        config = config.with_header(&header, Utc::now().year());
    }
    Ok(config)
}

fn print_docs() -> Result<()> {
    let docs = ValidatorRegistry::with_builtins()
        .docs()
        .iter()
        .map(TagDoc::to_json)
        .collect::<Vec<_>>();
    let mut stdout = io::stdout();
    serde_json::to_writer_pretty(&mut stdout, &docs).context("failed to write tag docs")?;
    writeln!(stdout).context("failed to write tag docs")?;
    Ok(())
}
