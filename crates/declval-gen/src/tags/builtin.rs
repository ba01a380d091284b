// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Built-in tag handlers.

use serde_json::Value;

use super::{ExtractContext, Rule, Scope, TagDoc, TagValidator, union::DiscriminatedUnion};
use crate::error::GenerateError;

/// Every built-in handler.
pub(super) fn all() -> Vec<Box<dyn TagValidator>> {
    vec![
        Box::new(ZeroCheck::REQUIRED),
        Box::new(ZeroCheck::OPTIONAL),
        Box::new(MaxLength),
        Box::new(Format),
        Box::new(Immutable),
        Box::new(DiscriminatedUnion),
        Box::new(FixedResult::TRUE),
        Box::new(FixedResult::FALSE),
        Box::new(Marker {
            tag:         "k8s:eachKey",
            description: "Applies the nested tag to every key of a map.",
            scopes:      &[Scope::Type, Scope::Field],
            payload:     ("+<tag>", "tag applied to each key")
        }),
        Box::new(Marker {
            tag:         "k8s:eachVal",
            description: "Applies the nested tag to every element of a list or value of a map.",
            scopes:      &[Scope::Type, Scope::Field],
            payload:     ("+<tag>", "tag applied to each element")
        }),
        Box::new(Marker {
            tag:         "k8s:listType",
            description: "Declares the semantics of a list.",
            scopes:      &[Scope::Field],
            payload:     ("map", "elements are identified by their list-map keys")
        }),
        Box::new(Marker {
            tag:         "k8s:listMapKey",
            description: "Names one key field of a list declared as a map.",
            scopes:      &[Scope::Field],
            payload:     ("<field>", "serialized name of the key field")
        }),
        Box::new(Marker {
            tag:         "k8s:unionMember",
            description: "Marks a member of a discriminated union.",
            scopes:      &[Scope::Field],
            payload:     (
                "<value>",
                "discriminator value selecting this member; defaults to the member name in PascalCase"
            )
        }),
        Box::new(Marker {
            tag:         "k8s:unionDiscriminator",
            description: "Marks the discriminator of a discriminated union.",
            scopes:      &[Scope::Field],
            payload:     ("", "no payload")
        }),
    ]
}

fn expect_no_payload(
    ctx: &ExtractContext<'_>,
    tag: &str,
    payload: Option<&str>
) -> Result<(), GenerateError> {
    match payload {
        None => Ok(()),
        Some(p) => Err(GenerateError::tag_payload(
            ctx.name,
            tag,
            format!("takes no payload, got {:?}", p)
        ))
    }
}

/// `+k8s:required` and `+k8s:optional`.
struct ZeroCheck {
    tag:      &'static str,
    function: &'static str,
    summary:  &'static str
}

impl ZeroCheck {
    const REQUIRED: Self = Self {
        tag:      "k8s:required",
        function: "validate::required",
        summary:  "Fails if the value is absent or zero. Stops further checks of the value."
    };

    const OPTIONAL: Self = Self {
        tag:      "k8s:optional",
        function: "validate::optional",
        summary:  "Marks the value as optional. A zero value is still reported. Stops further \
                   checks of the value."
    };
}

impl TagValidator for ZeroCheck {
    fn tag_name(&self) -> &'static str {
        self.tag
    }

    fn valid_scopes(&self) -> &'static [Scope] {
        &[Scope::Field]
    }

    fn rules(
        &self,
        ctx: &ExtractContext<'_>,
        payload: Option<&str>
    ) -> Result<Vec<Rule>, GenerateError> {
        expect_no_payload(ctx, self.tag, payload)?;
        Ok(vec![Rule::new(self.function).fatal().pointer_tolerant()])
    }

    fn docs(&self) -> TagDoc {
        TagDoc {
            tag:         self.tag.to_string(),
            description: self.summary.to_string(),
            scopes:      self.valid_scopes().to_vec(),
            payloads:    Vec::new()
        }
    }
}

/// `+k8s:maxLength=<n>`.
struct MaxLength;

impl TagValidator for MaxLength {
    fn tag_name(&self) -> &'static str {
        "k8s:maxLength"
    }

    fn valid_scopes(&self) -> &'static [Scope] {
        Scope::ALL
    }

    fn rules(
        &self,
        ctx: &ExtractContext<'_>,
        payload: Option<&str>
    ) -> Result<Vec<Rule>, GenerateError> {
        let raw = payload.ok_or_else(|| {
            GenerateError::tag_payload(ctx.name, self.tag_name(), "requires a length")
        })?;
        let max: u64 = raw.parse().map_err(|_| {
            GenerateError::tag_payload(
                ctx.name,
                self.tag_name(),
                format!("{:?} is not a non-negative integer", raw)
            )
        })?;
        Ok(vec![Rule::new("validate::max_length").literal(max)])
    }

    fn docs(&self) -> TagDoc {
        TagDoc {
            tag:         self.tag_name().to_string(),
            description: "Fails if a string is longer than the given number of bytes.".to_string(),
            scopes:      self.valid_scopes().to_vec(),
            payloads:    vec![("<n>".to_string(), "maximum length".to_string())]
        }
    }
}

/// `+k8s:format=<name>`.
struct Format;

impl TagValidator for Format {
    fn tag_name(&self) -> &'static str {
        "k8s:format"
    }

    fn valid_scopes(&self) -> &'static [Scope] {
        Scope::ALL
    }

    fn rules(
        &self,
        ctx: &ExtractContext<'_>,
        payload: Option<&str>
    ) -> Result<Vec<Rule>, GenerateError> {
        match payload {
            Some("dns-label") => Ok(vec![Rule::new("validate::dns_label")]),
            Some(other) => Err(GenerateError::tag_payload(
                ctx.name,
                self.tag_name(),
                format!("unsupported format {:?}", other)
            )),
            None => Err(GenerateError::tag_payload(
                ctx.name,
                self.tag_name(),
                "requires a format name"
            ))
        }
    }

    fn docs(&self) -> TagDoc {
        TagDoc {
            tag:         self.tag_name().to_string(),
            description: "Checks a string against a named format.".to_string(),
            scopes:      self.valid_scopes().to_vec(),
            payloads:    vec![(
                "dns-label".to_string(),
                "RFC 1123 DNS label: at most 63 lower-case alphanumerics or '-'".to_string()
            )]
        }
    }
}

/// `+k8s:immutable`.
struct Immutable;

impl TagValidator for Immutable {
    fn tag_name(&self) -> &'static str {
        "k8s:immutable"
    }

    fn valid_scopes(&self) -> &'static [Scope] {
        Scope::ALL
    }

    fn rules(
        &self,
        ctx: &ExtractContext<'_>,
        payload: Option<&str>
    ) -> Result<Vec<Rule>, GenerateError> {
        expect_no_payload(ctx, self.tag_name(), payload)?;
        Ok(vec![Rule::new("validate::immutable").pointer_tolerant()])
    }

    fn docs(&self) -> TagDoc {
        TagDoc {
            tag:         self.tag_name().to_string(),
            description: "Fails on update if the value differs from the previous one."
                .to_string(),
            scopes:      self.valid_scopes().to_vec(),
            payloads:    Vec::new()
        }
    }
}

/// `+validateTrue` and `+validateFalse`, used to exercise generated code.
///
/// The payload is either a quoted message or an object
/// `{"flags": [...], "msg": "..."}` where `ShortCircuit` makes the rule
/// fatal and `NonNullable` makes it value-only.
struct FixedResult {
    tag:    &'static str,
    result: bool
}

impl FixedResult {
    const TRUE: Self = Self {
        tag:    "validateTrue",
        result: true
    };

    const FALSE: Self = Self {
        tag:    "validateFalse",
        result: false
    };
}

struct FixedPayload {
    fatal:        bool,
    non_nullable: bool,
    msg:          String
}

fn parse_fixed_payload(
    ctx: &ExtractContext<'_>,
    tag: &str,
    payload: Option<&str>
) -> Result<FixedPayload, GenerateError> {
    let mut parsed = FixedPayload {
        fatal:        false,
        non_nullable: false,
        msg:          String::new()
    };
    let Some(raw) = payload else {
        return Ok(parsed);
    };
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::String(msg)) => parsed.msg = msg,
        Ok(Value::Object(object)) => {
            if let Some(flags) = object.get("flags") {
                let flags = flags.as_array().ok_or_else(|| {
                    GenerateError::tag_payload(ctx.name, tag, "flags must be an array")
                })?;
                for flag in flags {
                    match flag.as_str() {
                        Some("ShortCircuit") => parsed.fatal = true,
                        Some("NonNullable") => parsed.non_nullable = true,
                        _ => {
                            return Err(GenerateError::tag_payload(
                                ctx.name,
                                tag,
                                format!("unknown flag {}", flag)
                            ));
                        }
                    }
                }
            }
            match object.get("msg") {
                Some(Value::String(msg)) => parsed.msg = msg.clone(),
                Some(other) => {
                    return Err(GenerateError::tag_payload(
                        ctx.name,
                        tag,
                        format!("msg must be a string, got {}", other)
                    ));
                }
                None => {}
            }
        }
        _ => parsed.msg = raw.to_string()
    }
    Ok(parsed)
}

impl TagValidator for FixedResult {
    fn tag_name(&self) -> &'static str {
        self.tag
    }

    fn valid_scopes(&self) -> &'static [Scope] {
        Scope::ALL
    }

    fn rules(
        &self,
        ctx: &ExtractContext<'_>,
        payload: Option<&str>
    ) -> Result<Vec<Rule>, GenerateError> {
        let parsed = parse_fixed_payload(ctx, self.tag, payload)?;
        let mut rule = if parsed.non_nullable {
            Rule::new("validate::fixed_result")
        } else {
            Rule::new("validate::fixed_result_ptr").pointer_tolerant()
        };
        if parsed.fatal {
            rule = rule.fatal();
        }
        Ok(vec![rule.literal(self.result).literal(parsed.msg)])
    }

    fn docs(&self) -> TagDoc {
        let outcome = if self.result { "passes" } else { "fails" };
        TagDoc {
            tag:         self.tag.to_string(),
            description: format!("Always {}. Intended for testing generated code.", outcome),
            scopes:      self.valid_scopes().to_vec(),
            payloads:    vec![
                ("\"<msg>\"".to_string(), "message of the forced failure".to_string()),
                (
                    "{\"flags\": [...], \"msg\": \"<msg>\"}".to_string(),
                    "flags ShortCircuit (fatal) and NonNullable (value-only)".to_string()
                ),
            ]
        }
    }
}

/// Tag consumed by the graph builder or another handler.
struct Marker {
    tag:         &'static str,
    description: &'static str,
    scopes:      &'static [Scope],
    payload:     (&'static str, &'static str)
}

impl TagValidator for Marker {
    fn tag_name(&self) -> &'static str {
        self.tag
    }

    fn valid_scopes(&self) -> &'static [Scope] {
        self.scopes
    }

    fn rules(
        &self,
        _ctx: &ExtractContext<'_>,
        _payload: Option<&str>
    ) -> Result<Vec<Rule>, GenerateError> {
        Ok(Vec::new())
    }

    fn docs(&self) -> TagDoc {
        let payloads = if self.payload.0.is_empty() {
            Vec::new()
        } else {
            vec![(self.payload.0.to_string(), self.payload.1.to_string())]
        };
        TagDoc {
            tag: self.tag.to_string(),
            description: self.description.to_string(),
            scopes: self.scopes.to_vec(),
            payloads
        }
    }
}
