// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Rule extraction from annotation tags.
//!
//! Annotation comments are lines of the form `+<name>[=<payload>]`. The
//! graph builder hands the comment lines of every type, field, map key and
//! list element to a [`RuleExtractor`], which turns them into [`Rule`]s.
//!
//! [`ValidatorRegistry`] is the standard extractor: an open set of
//! [`TagValidator`]s keyed by tag name. Unknown tags are ignored so that
//! annotations meant for other generators can coexist.
//!
//! # Built-in Tags
//!
//! | Tag | Scopes | Rule |
//! |-----|--------|------|
//! | `+k8s:required` | field | `required`, fatal |
//! | `+k8s:optional` | field | `optional`, fatal |
//! | `+k8s:maxLength=<n>` | any | `max_length` |
//! | `+k8s:format=dns-label` | any | `dns_label` |
//! | `+k8s:immutable` | any | `immutable` |
//! | `+k8s:discriminatedUnion` | type | `discriminated_union` |
//! | `+validateTrue` / `+validateFalse` | any | `fixed_result` |
//!
//! Structural tags consumed elsewhere (`+k8s:eachKey`, `+k8s:eachVal`,
//! `+k8s:listType`, `+k8s:listMapKey`, `+k8s:unionMember`,
//! `+k8s:unionDiscriminator`) are registered for documentation only.

mod builtin;
mod union;

use std::{collections::BTreeMap, fmt};

use serde_json::{Value, json};

use crate::{
    error::GenerateError,
    universe::{Member, TypeDef, Universe}
};

/// Argument of a rule call.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleArg {
    /// Static literal: number, boolean or string.
    Literal(Value),

    /// Reference to a file-scope union membership table.
    UnionMembership {
        /// Name of the `static`.
        name:          String,
        /// Serialized name of the discriminator member.
        discriminator: String,
        /// `(member serialized name, discriminator value)` pairs.
        members:       Vec<(String, String)>
    },

    /// String view of a member of the validated value.
    MemberStr(String),

    /// Presence flags of members of the validated value.
    MemberPresence(Vec<String>)
}

/// A call to a runtime primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    /// Path of the primitive relative to the runtime crate.
    pub function:         String,
    /// Arguments after the common leading parameters.
    pub args:             Vec<RuleArg>,
    /// Failure stops the remaining checks of the current value.
    pub fatal:            bool,
    /// Callable on an absent value without a presence guard.
    pub pointer_tolerant: bool
}

impl Rule {
    /// Non-fatal, value-only call without arguments.
    pub fn new(function: impl Into<String>) -> Self {
        Self {
            function:         function.into(),
            args:             Vec::new(),
            fatal:            false,
            pointer_tolerant: false
        }
    }

    /// Append an argument.
    #[must_use]
    pub fn arg(mut self, arg: RuleArg) -> Self {
        self.args.push(arg);
        self
    }

    /// Append a literal argument.
    #[must_use]
    pub fn literal(self, value: impl Into<Value>) -> Self {
        self.arg(RuleArg::Literal(value.into()))
    }

    /// Mark as fatal.
    #[must_use]
    pub fn fatal(mut self) -> Self {
        self.fatal = true;
        self
    }

    /// Mark as pointer-tolerant.
    #[must_use]
    pub fn pointer_tolerant(mut self) -> Self {
        self.pointer_tolerant = true;
        self
    }
}

/// Where a tag was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scope {
    /// On a type declaration.
    Type,
    /// On a struct field.
    Field,
    /// Applied to every key of a map.
    EachKey,
    /// Applied to every element of a list or value of a map.
    EachVal
}

impl Scope {
    /// All scopes.
    pub const ALL: &'static [Scope] = &[Self::Type, Self::Field, Self::EachKey, Self::EachVal];

    /// Lower-case label.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Field => "field",
            Self::EachKey => "map key",
            Self::EachVal => "list or map value"
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the extractor knows about the annotated position.
#[derive(Debug, Clone, Copy)]
pub struct ExtractContext<'a> {
    /// Kind of position.
    pub scope:    Scope,
    /// Human-readable position, e.g. `Widget.items[vals]`.
    pub name:     &'a str,
    /// Type the rules will be applied to.
    pub ty:       &'a TypeDef,
    /// Member the tags were written on, for field-level positions.
    pub member:   Option<&'a Member>,
    /// Whole universe, for tags that inspect sibling members.
    pub universe: &'a Universe
}

/// Parsed `+name[=payload]` tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag<'a> {
    /// Tag name.
    pub name:    &'a str,
    /// Text after `=`, if any.
    pub payload: Option<&'a str>
}

/// Parse one comment line as a tag.
///
/// ```rust
/// use declval_gen::tags::{Tag, parse_tag};
///
/// assert_eq!(
///     parse_tag(" +k8s:maxLength=10"),
///     Some(Tag { name: "k8s:maxLength", payload: Some("10") })
/// );
/// assert_eq!(parse_tag("plain prose"), None);
/// ```
pub fn parse_tag(line: &str) -> Option<Tag<'_>> {
    let body = line.trim().strip_prefix('+')?;
    let (name, payload) = match body.split_once('=') {
        Some((name, payload)) => (name.trim(), Some(payload.trim())),
        None => (body.trim(), None)
    };
    if name.is_empty() {
        return None;
    }
    Some(Tag {
        name,
        payload
    })
}

/// Turns annotation comments into rules.
///
/// The graph builder depends only on this trait.
pub trait RuleExtractor {
    /// Rules for the position described by `ctx`, in tag order.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed payloads or tags used where they
    /// are not allowed.
    fn extract_rules(
        &self,
        ctx: &ExtractContext<'_>,
        lines: &[String]
    ) -> Result<Vec<Rule>, GenerateError>;
}

/// Self-description of a tag for `--docs` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDoc {
    /// Tag name without the leading `+`.
    pub tag:         String,
    /// What the tag does.
    pub description: String,
    /// Where the tag may be written.
    pub scopes:      Vec<Scope>,
    /// Accepted payloads with their meaning.
    pub payloads:    Vec<(String, String)>
}

impl TagDoc {
    /// JSON rendering.
    pub fn to_json(&self) -> Value {
        json!({
            "tag": self.tag,
            "description": self.description,
            "scopes": self.scopes.iter().map(Scope::as_str).collect::<Vec<_>>(),
            "payloads": self
                .payloads
                .iter()
                .map(|(payload, meaning)| json!({ "payload": payload, "description": meaning }))
                .collect::<Vec<_>>()
        })
    }
}

/// Handler for one tag name.
pub trait TagValidator {
    /// Tag name without the leading `+`.
    fn tag_name(&self) -> &'static str;

    /// Scopes the tag may be written in.
    fn valid_scopes(&self) -> &'static [Scope];

    /// Rules produced by one occurrence of the tag.
    ///
    /// # Errors
    ///
    /// Returns an error when the payload is malformed.
    fn rules(
        &self,
        ctx: &ExtractContext<'_>,
        payload: Option<&str>
    ) -> Result<Vec<Rule>, GenerateError>;

    /// Documentation.
    fn docs(&self) -> TagDoc;
}

/// Tag-name keyed set of [`TagValidator`]s.
#[derive(Default)]
pub struct ValidatorRegistry {
    validators: BTreeMap<&'static str, Box<dyn TagValidator>>
}

impl ValidatorRegistry {
    /// Registry without handlers.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry with every built-in handler.
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        for validator in builtin::all() {
            // Built-in names are distinct.
            let _ = registry.register(validator);
        }
        registry
    }

    /// Add a handler.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::DuplicateTag`] if the tag name is taken.
    pub fn register(&mut self, validator: Box<dyn TagValidator>) -> Result<(), GenerateError> {
        let name = validator.tag_name();
        if self.validators.contains_key(name) {
            return Err(GenerateError::DuplicateTag(name.to_string()));
        }
        self.validators.insert(name, validator);
        Ok(())
    }

    /// Check if a handler for `tag` exists.
    pub fn contains(&self, tag: &str) -> bool {
        self.validators.contains_key(tag)
    }

    /// Documentation of every handler, sorted by tag name.
    pub fn docs(&self) -> Vec<TagDoc> {
        self.validators.values().map(|v| v.docs()).collect()
    }
}

impl RuleExtractor for ValidatorRegistry {
    fn extract_rules(
        &self,
        ctx: &ExtractContext<'_>,
        lines: &[String]
    ) -> Result<Vec<Rule>, GenerateError> {
        let mut rules = Vec::new();
        for tag in lines.iter().filter_map(|line| parse_tag(line)) {
            let Some(validator) = self.validators.get(tag.name) else {
                tracing::trace!(tag = tag.name, context = ctx.name, "ignoring unknown tag");
                continue;
            };
            if !validator.valid_scopes().contains(&ctx.scope) {
                return Err(GenerateError::TagScope {
                    context: ctx.name.to_string(),
                    tag:     tag.name.to_string(),
                    scope:   ctx.scope.to_string()
                });
            }
            rules.extend(validator.rules(ctx, tag.payload)?);
        }
        Ok(rules)
    }
}

impl fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorRegistry")
            .field("tags", &self.validators.keys().collect::<Vec<_>>())
            .finish()
    }
}
