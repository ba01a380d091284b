// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Content checks that return plain messages.
//!
//! These functions know nothing about paths or operations; the wrappers in
//! [`crate::validate`] turn their messages into [`FieldError`]s.
//!
//! [`FieldError`]: crate::field::FieldError

/// Maximum length of a DNS label (RFC 1123).
pub const DNS1123_LABEL_MAX_LENGTH: usize = 63;

/// Message for a value longer than `max` characters.
pub fn max_len_error(max: usize) -> String {
    format!("must be no more than {} characters", max)
}

/// Check `value` against the DNS label rules of RFC 1123.
///
/// Returns every violated constraint in a fixed order. A value that is too
/// long reports only the length violation, and an empty value reports only
/// that it is empty.
///
/// ```rust
/// use declval_core::content::is_dns1123_label;
///
/// assert!(is_dns1123_label("my-name").is_empty());
/// assert_eq!(is_dns1123_label("-abc").len(), 1);
/// ```
pub fn is_dns1123_label(value: &str) -> Vec<String> {
    let mut errs = Vec::new();
    if value.len() > DNS1123_LABEL_MAX_LENGTH {
        errs.push(max_len_error(DNS1123_LABEL_MAX_LENGTH));
        return errs;
    }
    if value.is_empty() {
        errs.push("must contain at least 1 character".to_string());
        return errs;
    }

    let chars: Vec<char> = value.chars().collect();
    let first = chars[0];
    let last = chars[chars.len() - 1];
    if !is_lower_alnum(first) || !is_lower_alnum(last) {
        errs.push("must start and end with lower-case alphanumeric characters".to_string());
    }
    if chars.len() > 2
        && !chars[1..chars.len() - 1]
            .iter()
            .all(|c| is_lower_alnum(*c) || *c == '-')
    {
        errs.push("must contain only lower-case alphanumeric characters or '-'".to_string());
    }
    errs
}

fn is_lower_alnum(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_labels() {
        for value in ["a", "abc", "a-b", "0", "a1-2b", "x-y-z"] {
            assert!(is_dns1123_label(value).is_empty(), "{value}");
        }
    }

    #[test]
    fn leading_hyphen() {
        assert_eq!(
            is_dns1123_label("-abc"),
            vec!["must start and end with lower-case alphanumeric characters"]
        );
    }

    #[test]
    fn trailing_hyphen() {
        assert_eq!(
            is_dns1123_label("abc-"),
            vec!["must start and end with lower-case alphanumeric characters"]
        );
    }

    #[test]
    fn upper_case_interior() {
        assert_eq!(
            is_dns1123_label("aBc"),
            vec!["must contain only lower-case alphanumeric characters or '-'"]
        );
    }

    #[test]
    fn both_edge_and_interior_violations() {
        assert_eq!(is_dns1123_label("A_B").len(), 2);
    }

    #[test]
    fn max_length_is_allowed() {
        let value = "a".repeat(DNS1123_LABEL_MAX_LENGTH);
        assert!(is_dns1123_label(&value).is_empty());
    }

    #[test]
    fn too_long_reports_only_length() {
        let value = format!("-{}", "A".repeat(DNS1123_LABEL_MAX_LENGTH));
        assert_eq!(
            is_dns1123_label(&value),
            vec!["must be no more than 63 characters"]
        );
    }

    #[test]
    fn empty_reports_only_emptiness() {
        assert_eq!(
            is_dns1123_label(""),
            vec!["must contain at least 1 character"]
        );
    }

    #[test]
    fn non_ascii_rejected() {
        assert!(!is_dns1123_label("é").is_empty());
    }
}
