// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! `+k8s:discriminatedUnion` handler.
//!
//! The tag goes on the union struct; its members are marked individually:
//!
//! ```rust,ignore
//! /// +k8s:discriminatedUnion
//! pub struct Shape {
//!     /// +k8s:unionDiscriminator
//!     pub kind: String,
//!     /// +k8s:unionMember=Circle
//!     pub circle: Option<Circle>,
//!     /// +k8s:unionMember
//!     pub square: Option<Square>
//! }
//! ```
//!
//! The handler emits one rule referencing a file-scope membership table,
//! the discriminator member and the presence of every union member.

use convert_case::{Case, Casing};

use super::{ExtractContext, Rule, RuleArg, Scope, TagDoc, TagValidator, parse_tag};
use crate::{error::GenerateError, universe::Member};

const TAG: &str = "k8s:discriminatedUnion";
const MEMBER_TAG: &str = "k8s:unionMember";
const DISCRIMINATOR_TAG: &str = "k8s:unionDiscriminator";

pub(super) struct DiscriminatedUnion;

fn member_tag<'a>(member: &'a Member, tag: &str) -> Option<Option<&'a str>> {
    member
        .comments
        .iter()
        .filter_map(|line| parse_tag(line))
        .find(|t| t.name == tag)
        .map(|t| t.payload)
}

fn unquote(value: &str) -> String {
    serde_json::from_str::<String>(value).unwrap_or_else(|_| value.to_string())
}

fn wire_name(ctx: &ExtractContext<'_>, member: &Member) -> Result<String, GenerateError> {
    member.wire_name.clone().ok_or_else(|| GenerateError::MissingWireName {
        field: format!("{}.{}", ctx.name, member.name)
    })
}

impl TagValidator for DiscriminatedUnion {
    fn tag_name(&self) -> &'static str {
        TAG
    }

    fn valid_scopes(&self) -> &'static [Scope] {
        &[Scope::Type]
    }

    fn rules(
        &self,
        ctx: &ExtractContext<'_>,
        _payload: Option<&str>
    ) -> Result<Vec<Rule>, GenerateError> {
        let members = ctx.ty.members();
        if members.is_empty() {
            return Err(GenerateError::tag_payload(
                ctx.name,
                TAG,
                "may only be used on a struct with members"
            ));
        }

        let mut discriminators = members
            .iter()
            .filter(|m| member_tag(m, DISCRIMINATOR_TAG).is_some());
        let discriminator = match (discriminators.next(), discriminators.next()) {
            (Some(d), None) => d,
            (None, _) => {
                return Err(GenerateError::tag_payload(
                    ctx.name,
                    TAG,
                    format!("no member is tagged +{}", DISCRIMINATOR_TAG)
                ));
            }
            (Some(_), Some(_)) => {
                return Err(GenerateError::tag_payload(
                    ctx.name,
                    TAG,
                    format!("more than one member is tagged +{}", DISCRIMINATOR_TAG)
                ));
            }
        };

        let mut table = Vec::new();
        let mut presence = Vec::new();
        for member in members {
            let Some(payload) = member_tag(member, MEMBER_TAG) else {
                continue;
            };
            let value = match payload {
                Some(value) if !value.is_empty() => unquote(value),
                _ => member.name.to_case(Case::Pascal)
            };
            table.push((wire_name(ctx, member)?, value));
            presence.push(member.name.clone());
        }
        if table.is_empty() {
            return Err(GenerateError::tag_payload(
                ctx.name,
                TAG,
                format!("no member is tagged +{}", MEMBER_TAG)
            ));
        }

        let static_name = format!(
            "UNION_MEMBERSHIP_FOR_{}",
            ctx.ty.name.name.to_case(Case::Snake).to_uppercase()
        );
        tracing::debug!(union = ctx.name, members = table.len(), "discriminated union");
        Ok(vec![
            Rule::new("validate::discriminated_union")
                .arg(RuleArg::UnionMembership {
                    name:          static_name,
                    discriminator: wire_name(ctx, discriminator)?,
                    members:       table
                })
                .arg(RuleArg::MemberStr(discriminator.name.clone()))
                .arg(RuleArg::MemberPresence(presence)),
        ])
    }

    fn docs(&self) -> TagDoc {
        TagDoc {
            tag:         TAG.to_string(),
            description: "Requires exactly one union member to be set, matching the \
                          discriminator."
                .to_string(),
            scopes:      self.valid_scopes().to_vec(),
            payloads:    Vec::new()
        }
    }
}
