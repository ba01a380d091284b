// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! End-to-end generation from Rust source to Rust source.

use std::collections::BTreeSet;

use declval_gen::{GenerateError, Generator, GeneratorConfig};

fn generate(source: &str) -> Result<String, GenerateError> {
    Generator::new(GeneratorConfig::new(["api"]))
        .load_str(source)?
        .generate()
}

fn parsed(code: &str) -> syn::File {
    syn::parse_file(code).unwrap_or_else(|err| panic!("invalid output: {err}\n{code}"))
}

fn defined_functions(file: &syn::File) -> BTreeSet<String> {
    file.items
        .iter()
        .filter_map(|item| match item {
            syn::Item::Fn(f) => Some(f.sig.ident.to_string()),
            _ => None
        })
        .collect()
}

/// Names `validate_*` called as local functions.
fn called_functions(code: &str) -> BTreeSet<String> {
    let mut calls = BTreeSet::new();
    for (start, _) in code.match_indices("validate_") {
        if code[..start].ends_with("::") || code[..start].ends_with("fn ") {
            continue;
        }
        let name: String = code[start..]
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect();
        if code[start + name.len()..].starts_with('(') {
            calls.insert(name);
        }
    }
    calls
}

const WIDGETS: &str = r#"
//! +k8s:validation-gen=type_meta

pub struct TypeMeta {
    pub kind: String,
}

#[serde(rename_all = "camelCase")]
pub struct Widget {
    pub type_meta: TypeMeta,
    /// +k8s:required
    /// +k8s:format=dns-label
    pub display_name: String,
    /// +k8s:maxLength=10
    pub note: Option<String>,
    pub spec: WidgetSpec,
    pub status: WidgetStatus,
}

pub struct WidgetSpec {
    /// +k8s:eachVal=+k8s:format=dns-label
    pub hosts: Vec<String>,
    /// +k8s:eachKey=+k8s:maxLength=5
    pub labels: BTreeMap<String, String>,
    pub parent: Option<Box<WidgetSpec>>,
}

pub struct WidgetStatus {
    /// +k8s:immutable
    pub observed: u64,
}
"#;

#[test]
fn output_is_valid_rust() {
    let code = generate(WIDGETS).unwrap();
    let file = parsed(&code);
    assert_eq!(
        defined_functions(&file),
        BTreeSet::from([
            "register_validations".to_string(),
            "validate_widget".to_string(),
            "validate_widget_spec".to_string(),
            "validate_widget_status".to_string(),
        ])
    );
    assert!(code.starts_with("// Code generated by declval-gen. DO NOT EDIT."));
    assert!(code.contains("use ::declval_core as declval;"));
}

#[test]
fn every_called_function_is_defined() {
    let code = generate(WIDGETS).unwrap();
    let defined = defined_functions(&parsed(&code));
    let called = called_functions(&code);
    assert!(!called.is_empty());
    for name in called {
        assert!(defined.contains(&name), "{name} called but not defined");
    }
}

#[test]
fn field_paths_use_serialized_names() {
    let code = generate(WIDGETS).unwrap();
    assert!(code.contains("&fld_path.child(\"displayName\")"));
    assert!(code.contains("&fld_path.index(i)"));
    assert!(code.contains("for key in obj.keys()"));
    assert!(code.contains("// field Widget.type_meta has no validation"));
}

#[test]
fn recursive_types_call_themselves() {
    let code = generate(WIDGETS).unwrap();
    let spec = code
        .split("pub fn validate_widget_spec(")
        .nth(1)
        .unwrap();
    assert!(spec.contains("obj.parent.as_deref()"));
    assert!(spec.contains("errs.extend(validate_widget_spec(op_ctx, obj, old_obj, fld_path));"));
}

#[test]
fn registration_dispatches_status() {
    let code = generate(WIDGETS).unwrap();
    assert!(code.contains("scheme.add_validation_func::<Widget>("));
    assert!(code.contains("return validate_widget(op_ctx, obj, old_obj, &declval::Path::root());"));
    assert!(code.contains("if matches!(subresources, [\"status\"])"));
    assert!(code.contains("return validate_widget_status(op_ctx, &obj.status"));
    assert!(code.contains("no validation found for {}, subresources: {:?}"));
}

#[test]
fn bucket_order_in_output() {
    let code = generate(
        r#"
        //! +k8s:validation-gen=*

        pub struct Ordered {
            /// +validateFalse={"flags":["NonNullable"],"msg":"msg-a"}
            /// +validateFalse={"msg":"msg-d"}
            /// +validateFalse={"flags":["ShortCircuit"],"msg":"msg-b"}
            /// +validateFalse={"flags":["ShortCircuit","NonNullable"],"msg":"msg-c"}
            pub value: Option<String>,
        }
        "#
    )
    .unwrap();
    parsed(&code);
    let at = |msg: &str| {
        code.find(&format!("\"{}\"", msg))
            .unwrap_or_else(|| panic!("{msg} missing"))
    };
    assert!(at("msg-b") < at("msg-c"));
    assert!(at("msg-c") < at("msg-d"));
    assert!(at("msg-d") < at("msg-a"));
    assert_eq!(code.matches("return errs;").count(), 2);
    assert_eq!(code.matches("if let Some(obj) = obj {").count(), 2);
}

#[test]
fn literal_arguments() {
    let code = generate(
        r#"
        //! +k8s:validation-gen=*

        pub struct Literals {
            /// +k8s:maxLength=63
            /// +validateFalse="\"quoted\" message"
            pub name: String,
        }
        "#
    )
    .unwrap();
    parsed(&code);
    assert!(code.contains("old_obj, 63));"));
    assert!(code.contains(r#"false, "\"quoted\" message")"#));
}

#[test]
fn union_membership_static() {
    let code = generate(
        r#"
        //! +k8s:validation-gen=*

        pub struct Circle {
            pub radius: u32,
        }

        /// +k8s:discriminatedUnion
        #[serde(rename_all = "camelCase")]
        pub struct Shape {
            /// +k8s:unionDiscriminator
            pub shape_kind: String,
            /// +k8s:unionMember="Round"
            pub circle: Option<Circle>,
            /// +k8s:unionMember
            pub big_square: Option<Circle>,
        }
        "#
    )
    .unwrap();
    parsed(&code);
    assert!(code.contains(
        "static UNION_MEMBERSHIP_FOR_SHAPE: declval::UnionMembership = \
         declval::UnionMembership::new(\"shapeKind\", &[(\"circle\", \"Round\"), (\"bigSquare\", \
         \"BigSquare\")]);"
    ));
    assert!(code.contains("AsRef::<str>::as_ref(&obj.shape_kind)"));
    assert!(code.contains(
        "&[declval::Presence::is_set(&obj.circle), declval::Presence::is_set(&obj.big_square)]"
    ));
}

#[test]
fn list_map_correlation() {
    let code = generate(
        r#"
        //! +k8s:validation-gen=members

        pub struct Member {
            pub name: String,
            /// +k8s:immutable
            pub role: String,
        }

        pub struct Pool {
            /// +k8s:listType=map
            /// +k8s:listMapKey=name
            pub members: Vec<Member>,
        }
        "#
    )
    .unwrap();
    parsed(&code);
    assert!(code.contains(
        "let old_list_map = declval::ListMap::new(old_obj.map(|o| o.as_slice()).unwrap_or(&[]), \
         |o: &Member| (o.name.clone(),));"
    ));
    assert!(code.contains("old_list_map.with_matching_key(val)"));
}

#[test]
fn alias_functions_flatten() {
    let code = generate(
        r#"
        //! +k8s:validation-gen=*

        /// +k8s:maxLength=8
        pub type Name = String;

        /// +k8s:eachVal=+k8s:format=dns-label
        pub type Names = Vec<Name>;

        pub struct Holder {
            pub name: Name,
            pub names: Names,
        }
        "#
    )
    .unwrap();
    let file = parsed(&code);
    let defined = defined_functions(&file);
    assert!(defined.contains("validate_name"));
    assert!(defined.contains("validate_names"));
    let names = code.split("pub fn validate_names(").nth(1).unwrap();
    assert!(names.contains("declval::validate::dns_label("));
    assert!(names.contains("errs.extend(validate_name(op_ctx, obj, old_obj, fld_path));"));
}

#[test]
fn keyword_fields_use_raw_identifiers() {
    let code = generate(
        r#"
        //! +k8s:validation-gen=*

        pub struct Rule {
            /// +k8s:maxLength=3
            pub r#type: String,
            /// +k8s:immutable
            pub r#match: String,
        }

        pub struct Policy {
            /// +k8s:listType=map
            /// +k8s:listMapKey=type
            pub rules: Vec<Rule>,
        }
        "#
    )
    .unwrap();
    parsed(&code);
    assert!(code.contains("&obj.r#type, old_obj.map(|o| &o.r#type), &fld_path.child(\"type\")"));
    assert!(code.contains("&fld_path.child(\"match\")"));
    assert!(code.contains("|o: &Rule| (o.r#type.clone(),)"));
}

#[test]
fn header_and_runtime_path() {
    let config = GeneratorConfig::new(["api"])
        .with_runtime_crate("crate::runtime")
        .with_header("// Copyright YEAR Widgets Inc.\n", 2031);
    let code = Generator::new(config)
        .load_str(
            r#"
            //! +k8s:validation-gen=*
            pub struct Widget {
                /// +k8s:required
                pub name: String,
            }
            "#
        )
        .unwrap()
        .generate()
        .unwrap();
    assert!(code.starts_with(
        "// Copyright 2031 Widgets Inc.\n\n// Code generated by declval-gen. DO NOT EDIT.\n"
    ));
    assert!(code.contains("use crate::runtime as declval;"));
}

#[test]
fn output_is_deterministic() {
    assert_eq!(generate(WIDGETS).unwrap(), generate(WIDGETS).unwrap());
}

#[test]
fn generation_errors() {
    let err = generate(
        r#"
        //! +k8s:validation-gen=*
        pub struct Bad {
            pub value: Option<Option<String>>,
        }
        "#
    )
    .unwrap_err();
    assert!(matches!(err, GenerateError::PointerToPointer(_)));

    let err = generate(
        r#"
        //! +k8s:validation-gen=*
        pub type Maybe = Option<String>;
        pub struct Bad {
            pub value: Maybe,
        }
        "#
    )
    .unwrap_err();
    assert!(matches!(err, GenerateError::AliasToPointer(_)));

    let err = generate("pub struct {").unwrap_err();
    assert!(matches!(err, GenerateError::Load(_)));

    let err = Generator::new(GeneratorConfig::new(["api"]))
        .load_file("does/not/exist.rs")
        .unwrap_err();
    assert!(matches!(err, GenerateError::Read { .. }));
}
