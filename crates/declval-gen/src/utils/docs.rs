// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Doc comment extraction.
//!
//! Doc comments (`///`, `//!` and `/** */`) reach syn as `#[doc = "..."]`
//! attributes. Their lines are the annotation comments tags are read from:
//!
//! ```rust,ignore
//! /// Widget name.
//! /// +k8s:required
//! pub name: String
//!
//! // Lines: ["Widget name.", "+k8s:required"]
//! ```

use syn::{AttrStyle, Attribute};

fn doc_value(attr: &Attribute) -> Option<String> {
    if !attr.path().is_ident("doc") {
        return None;
    }
    if let syn::Meta::NameValue(meta) = &attr.meta
        && let syn::Expr::Lit(syn::ExprLit {
            lit: syn::Lit::Str(lit_str),
            ..
        }) = &meta.value
    {
        return Some(lit_str.value());
    }
    None
}

fn lines<'a>(attrs: impl Iterator<Item = &'a Attribute>) -> Vec<String> {
    attrs
        .filter_map(doc_value)
        .flat_map(|value| {
            value
                .lines()
                .map(|line| line.trim().trim_start_matches('*').trim().to_string())
                .collect::<Vec<_>>()
        })
        .filter(|line| !line.is_empty())
        .collect()
}

/// Non-empty, trimmed lines of the outer doc comments.
pub fn doc_lines(attrs: &[Attribute]) -> Vec<String> {
    lines(
        attrs
            .iter()
            .filter(|attr| matches!(attr.style, AttrStyle::Outer))
    )
}

/// Non-empty, trimmed lines of the inner (`//!`) doc comments.
pub fn inner_doc_lines(attrs: &[Attribute]) -> Vec<String> {
    lines(
        attrs
            .iter()
            .filter(|attr| matches!(attr.style, AttrStyle::Inner(_)))
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_attrs(input: &str) -> Vec<Attribute> {
        let item: syn::ItemStruct = syn::parse_str(input).unwrap();
        item.attrs
    }

    #[test]
    fn single_line() {
        let attrs = parse_attrs(
            r#"
            /// +k8s:required
            struct Foo;
        "#
        );
        assert_eq!(doc_lines(&attrs), vec!["+k8s:required"]);
    }

    #[test]
    fn blank_lines_are_dropped() {
        let attrs = parse_attrs(
            r#"
            /// Summary.
            ///
            ///   +k8s:maxLength=5
            struct Foo;
        "#
        );
        assert_eq!(doc_lines(&attrs), vec!["Summary.", "+k8s:maxLength=5"]);
    }

    #[test]
    fn block_comments_split_into_lines() {
        let attrs = parse_attrs(
            r#"
            /**
             * +k8s:required
             * +k8s:immutable
             */
            struct Foo;
        "#
        );
        assert_eq!(doc_lines(&attrs), vec!["+k8s:required", "+k8s:immutable"]);
    }

    #[test]
    fn other_attributes_are_ignored() {
        let attrs = parse_attrs(
            r#"
            #[derive(Debug)]
            struct Foo;
        "#
        );
        assert!(doc_lines(&attrs).is_empty());
    }

    #[test]
    fn inner_docs_of_a_file() {
        let file: syn::File = syn::parse_str(
            r#"
            //! +k8s:validation-gen=*

            /// outer
            struct Foo;
        "#
        )
        .unwrap();
        assert_eq!(inner_doc_lines(&file.attrs), vec!["+k8s:validation-gen=*"]);
        assert!(doc_lines(&file.attrs).is_empty());
    }
}
