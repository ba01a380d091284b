// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Serialized names from `#[serde(...)]` attributes, parsed with darling.
//!
//! # Supported Attributes
//!
//! | Attribute | Level | Effect |
//! |-----------|-------|--------|
//! | `rename_all = "..."` | container | Case convention for every field |
//! | `rename = "..."` | field | Serialized name of the field |
//! | `skip` | field | Field has no serialized name |
//!
//! Every other serde option is accepted and ignored.

use convert_case::{Case, Casing};
use darling::{FromDeriveInput, FromField, ast::Data, util::Ignored};
use syn::{DeriveInput, Ident, ItemStruct};

/// Field-level serde options.
#[derive(Debug, FromField)]
#[darling(attributes(serde), allow_unknown_fields)]
struct SerdeField {
    ident:  Option<Ident>,
    #[darling(default)]
    rename: Option<String>,
    #[darling(default)]
    skip:   bool
}

/// Container-level serde options.
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(serde), supports(struct_named), allow_unknown_fields)]
struct SerdeStruct {
    data:       Data<Ignored, SerdeField>,
    #[darling(default)]
    rename_all: Option<String>
}

/// Apply a serde `rename_all` convention to a field name.
fn apply_rename_all(rule: &str, name: &str) -> darling::Result<String> {
    Ok(match rule {
        "lowercase" => name.to_lowercase(),
        "UPPERCASE" => name.to_uppercase(),
        "PascalCase" => name.to_case(Case::Pascal),
        "camelCase" => name.to_case(Case::Camel),
        "snake_case" => name.to_case(Case::Snake),
        "SCREAMING_SNAKE_CASE" => name.to_case(Case::Snake).to_uppercase(),
        "kebab-case" => name.to_case(Case::Kebab),
        "SCREAMING-KEBAB-CASE" => name.to_case(Case::Kebab).to_uppercase(),
        other => return Err(darling::Error::unknown_value(other))
    })
}

/// Strip the raw identifier prefix.
pub fn unraw(ident: &Ident) -> String {
    let name = ident.to_string();
    match name.strip_prefix("r#") {
        Some(stripped) => stripped.to_string(),
        None => name
    }
}

/// Serialized name of every field of a named struct, in declaration order.
///
/// `None` marks a field serde skips.
pub fn wire_names(item: &ItemStruct) -> darling::Result<Vec<Option<String>>> {
    let parsed = SerdeStruct::from_derive_input(&DeriveInput::from(item.clone()))?;
    let fields = parsed
        .data
        .take_struct()
        .ok_or_else(|| darling::Error::unsupported_shape("non-struct"))?;

    fields
        .fields
        .into_iter()
        .map(|field| {
            if field.skip {
                return Ok(None);
            }
            if let Some(rename) = field.rename {
                return Ok(Some(rename));
            }
            let name = field
                .ident
                .as_ref()
                .map(unraw)
                .ok_or_else(|| darling::Error::custom("fields must be named"))?;
            match &parsed.rename_all {
                Some(rule) => apply_rename_all(rule, &name).map(Some),
                None => Ok(Some(name))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(item: ItemStruct) -> Vec<Option<String>> {
        wire_names(&item).unwrap()
    }

    #[test]
    fn plain_fields_keep_their_names() {
        let item: ItemStruct = syn::parse_quote! {
            struct Widget { name: String, r#type: String }
        };
        assert_eq!(
            names(item),
            vec![Some("name".to_string()), Some("type".to_string())]
        );
    }

    #[test]
    fn rename_all_camel_case() {
        let item: ItemStruct = syn::parse_quote! {
            #[serde(rename_all = "camelCase", deny_unknown_fields)]
            struct Widget { display_name: String, max_size: u32 }
        };
        assert_eq!(
            names(item),
            vec![Some("displayName".to_string()), Some("maxSize".to_string())]
        );
    }

    #[test]
    fn rename_beats_rename_all() {
        let item: ItemStruct = syn::parse_quote! {
            #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
            struct Widget {
                #[serde(rename = "id")]
                widget_id: String,
                owner_name: String,
            }
        };
        assert_eq!(
            names(item),
            vec![Some("id".to_string()), Some("OWNER_NAME".to_string())]
        );
    }

    #[test]
    fn skipped_fields_have_no_name() {
        let item: ItemStruct = syn::parse_quote! {
            struct Widget {
                #[serde(skip, default)]
                cache: String,
            }
        };
        assert_eq!(names(item), vec![None]);
    }

    #[test]
    fn unknown_convention_fails() {
        let item: ItemStruct = syn::parse_quote! {
            #[serde(rename_all = "Title Case")]
            struct Widget { name: String }
        };
        assert!(wire_names(&item).is_err());
    }
}
