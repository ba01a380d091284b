// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Generation run configuration.

/// Default path of the runtime crate in generated code.
pub const DEFAULT_RUNTIME_CRATE: &str = "::declval_core";

/// Default prefix of generated function names.
pub const DEFAULT_FUNCTION_PREFIX: &str = "validate_";

/// Settings shared by the builder, emitter and backend.
///
/// # Example
///
/// ```rust
/// use declval_gen::GeneratorConfig;
///
/// let config = GeneratorConfig::new(["api"])
///     .with_runtime_crate("crate::rt")
///     .with_header("// Copyright YEAR Example", 2026);
/// assert!(config.is_input_package("api"));
/// assert_eq!(config.header.as_deref(), Some("// Copyright 2026 Example"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Packages whose named types get generated functions.
    pub input_packages:  Vec<String>,
    /// Path of the runtime crate as written in generated code.
    pub runtime_crate:   String,
    /// Prefix of every generated function name.
    pub function_prefix: String,
    /// Boilerplate placed before the generated-code marker.
    pub header:          Option<String>
}

impl GeneratorConfig {
    /// Configuration generating functions for `input_packages`.
    pub fn new<I, S>(input_packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>
    {
        Self {
            input_packages:  input_packages.into_iter().map(Into::into).collect(),
            runtime_crate:   DEFAULT_RUNTIME_CRATE.to_string(),
            function_prefix: DEFAULT_FUNCTION_PREFIX.to_string(),
            header:          None
        }
    }

    /// Use another path for the runtime crate.
    #[must_use]
    pub fn with_runtime_crate(mut self, path: impl Into<String>) -> Self {
        self.runtime_crate = path.into();
        self
    }

    /// Use another function name prefix.
    #[must_use]
    pub fn with_function_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.function_prefix = prefix.into();
        self
    }

    /// Set header boilerplate, replacing every `YEAR` with `year`.
    #[must_use]
    pub fn with_header(mut self, text: &str, year: i32) -> Self {
        let text = text.replace("YEAR", &year.to_string());
        self.header = Some(text.trim_end().to_string());
        self
    }

    /// Check if named types of `package` get generated functions.
    pub fn is_input_package(&self, package: &str) -> bool {
        self.input_packages.iter().any(|p| p == package)
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::new(Vec::<String>::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = GeneratorConfig::default();
        assert!(config.input_packages.is_empty());
        assert_eq!(config.runtime_crate, "::declval_core");
        assert_eq!(config.function_prefix, "validate_");
        assert_eq!(config.header, None);
    }

    #[test]
    fn header_year_is_replaced_everywhere() {
        let config = GeneratorConfig::default().with_header("YEAR/YEAR\n\n", 1999);
        assert_eq!(config.header.as_deref(), Some("1999/1999"));
    }

    #[test]
    fn input_package_lookup() {
        let config = GeneratorConfig::new(["a", "b"]);
        assert!(config.is_input_package("b"));
        assert!(!config.is_input_package(""));
    }
}
