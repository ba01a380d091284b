// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Rule literal rendering.

use proc_macro2::Literal;
use serde_json::Value;

/// Strip one level of JSON string quoting, if present.
fn unquote(text: &str) -> String {
    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        serde_json::from_str::<String>(text).unwrap_or_else(|_| text.to_string())
    } else {
        text.to_string()
    }
}

/// Rust literal for a rule argument.
///
/// Numbers and booleans render verbatim. Strings are unquoted once if
/// they arrive quoted and then quoted as a Rust string literal. `None`
/// for null, arrays and objects.
pub fn render(value: &Value) -> Option<String> {
    match value {
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                Some(Literal::u64_unsuffixed(u).to_string())
            } else if let Some(i) = n.as_i64() {
                Some(Literal::i64_unsuffixed(i).to_string())
            } else {
                n.as_f64().map(|f| Literal::f64_unsuffixed(f).to_string())
            }
        }
        Value::String(s) => Some(Literal::string(&unquote(s)).to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None
    }
}
