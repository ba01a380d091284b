// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Annotated API types.
//!
//! +k8s:validation-gen=type_meta

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeMeta {
    pub kind: String
}

/// A name of at most five characters.
///
/// +k8s:maxLength=5
pub type ShortName = String;

/// A DNS label.
///
/// +k8s:format=dns-label
pub type Hostname = String;

/// +k8s:eachVal=+k8s:maxLength=12
pub type Hostnames = Vec<Hostname>;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    pub type_meta:    TypeMeta,
    /// +k8s:required
    /// +k8s:format=dns-label
    pub name:         String,
    /// +k8s:maxLength=16
    pub display_name: Option<String>,
    pub nickname:     ShortName,
    pub spec:         WidgetSpec,
    pub status:       WidgetStatus,
    #[serde(skip)]
    pub cache:        Vec<u8>
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetSpec {
    /// +k8s:immutable
    pub replicas:    u32,
    pub hosts:       Hostnames,
    /// +k8s:eachKey=+k8s:maxLength=8
    /// +k8s:eachVal=+k8s:format=dns-label
    pub labels:      BTreeMap<String, String>,
    pub annotations: HashMap<String, ShortName>,
    /// +k8s:listType=map
    /// +k8s:listMapKey=portName
    pub ports:       Vec<Port>,
    pub backend:     Option<Backend>,
    pub template:    Option<Box<WidgetSpec>>
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Port {
    pub port_name: String,
    /// +k8s:immutable
    pub protocol:  String,
    pub number:    u16
}

/// +k8s:discriminatedUnion
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backend {
    /// +k8s:unionDiscriminator
    pub backend_type:   String,
    /// +k8s:unionMember
    pub service:        Option<ServiceRef>,
    /// +k8s:unionMember="Bucket"
    pub storage_bucket: Option<String>
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRef {
    /// +k8s:required
    pub name:   String,
    /// +k8s:maxLength=8
    pub r#type: String
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetStatus {
    /// +k8s:maxLength=10
    pub phase: String
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gadget {
    pub type_meta: TypeMeta,
    /// +k8s:optional
    pub owner:     Option<String>,
    pub status:    GadgetStatus
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct GadgetStatus {
    pub note: String
}

/// Rule order and short-circuiting on one field.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checklist {
    pub type_meta: TypeMeta,
    /// +validateFalse={"flags":["NonNullable"],"msg":"A"}
    /// +validateFalse={"msg":"D"}
    /// +validateFalse={"flags":["ShortCircuit","NonNullable"],"msg":"C"}
    pub guarded:   Option<String>,
    /// +validateFalse={"flags":["NonNullable"],"msg":"A"}
    /// +validateFalse={"msg":"D"}
    pub ordered:   Option<String>,
    /// +validateFalse="after"
    pub after:     String
}
