// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use std::{env, error::Error, fs, path::PathBuf};

use declval_gen::{Generator, GeneratorConfig};

fn main() -> Result<(), Box<dyn Error>> {
    println!("cargo::rerun-if-changed=src/types.rs");

    let code = Generator::new(GeneratorConfig::new(["types"]))
        .type_prefix("crate::types::")
        .load_file("src/types.rs")?
        .generate()?;

    let out = PathBuf::from(env::var("OUT_DIR")?);
    fs::write(out.join("validations.rs"), code)?;
    Ok(())
}
