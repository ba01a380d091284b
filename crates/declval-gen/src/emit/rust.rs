// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Rust source backend.
//!
//! Generated code refers to the runtime crate through a single
//! `use <runtime> as declval;` import, so the runtime path is configurable
//! without touching the rest of the output.

use super::{
    STATUS_FIELD,
    ir::{
        Arg, Binding, Block, File, Function, ListMapKey, Registration, Scope, StatusDispatch,
        Stmt, UnionStatic, ValueForm, Via
    }
};
use crate::config::GeneratorConfig;

const GENERATED_MARKER: &str = "// Code generated by declval-gen. DO NOT EDIT.";
const INDENT: &str = "    ";

/// Line writer with indentation.
#[derive(Debug, Default)]
struct Writer {
    out:   String,
    depth: usize
}

impl Writer {
    fn line(&mut self, text: &str) {
        if text.is_empty() {
            self.out.push('\n');
            return;
        }
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn open(&mut self, text: &str) {
        self.line(text);
        self.depth += 1;
    }

    fn close(&mut self, text: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.line(text);
    }
}

/// Render `file` as Rust source.
pub fn render(file: &File, config: &GeneratorConfig) -> String {
    let mut w = Writer::default();
    if let Some(header) = &config.header {
        for line in header.lines() {
            w.line(line);
        }
        w.line("");
    }
    w.line(GENERATED_MARKER);
    w.line("");
    w.line(&format!("use {} as declval;", config.runtime_crate));

    for union in &file.unions {
        w.line("");
        union_static(&mut w, union);
    }

    w.line("");
    registrations(&mut w, &file.registrations);

    for function in &file.functions {
        w.line("");
        function_item(&mut w, function);
    }
    w.out
}

fn quoted(text: &str) -> String {
    proc_macro2::Literal::string(text).to_string()
}

/// Field name usable after `.`, keywords spelled as raw identifiers.
fn member(name: &str) -> String {
    if syn::parse_str::<syn::Ident>(name).is_ok() {
        name.to_string()
    } else {
        format!("r#{}", name)
    }
}

fn union_static(w: &mut Writer, union: &UnionStatic) {
    let members = union
        .members
        .iter()
        .map(|(member, value)| format!("({}, {})", quoted(member), quoted(value)))
        .collect::<Vec<_>>()
        .join(", ");
    w.line(&format!(
        "static {}: declval::UnionMembership = declval::UnionMembership::new({}, &[{}]);",
        union.name,
        quoted(&union.discriminator),
        members
    ));
}

fn registrations(w: &mut Writer, registrations: &[Registration]) {
    w.line("/// Registers validation of every root type with `scheme`.");
    w.open("pub fn register_validations(scheme: &mut declval::Scheme) {");
    for reg in registrations {
        w.open(&format!(
            "scheme.add_validation_func::<{}>(|op_ctx, obj, old_obj, subresources| {{",
            reg.ty
        ));
        w.open("if subresources.is_empty() {");
        w.line(&format!(
            "return {}(op_ctx, obj, old_obj, &declval::Path::root());",
            reg.function
        ));
        w.close("}");
        match &reg.status {
            Some(StatusDispatch::Function {
                field,
                function
            }) => {
                let field = member(field);
                w.open("if matches!(subresources, [\"status\"]) {");
                w.line(&format!(
                    "return {}(op_ctx, &obj.{}, old_obj.map(|o| &o.{}), &declval::Path::new({}));",
                    function,
                    field,
                    field,
                    quoted(STATUS_FIELD)
                ));
                w.close("}");
            }
            Some(StatusDispatch::NoValidation(ty)) => {
                w.open("if matches!(subresources, [\"status\"]) {");
                w.line(&format!("// type {} has no validation", ty));
                w.line("return declval::ErrorList::new();");
                w.close("}");
            }
            None => {}
        }
        w.line(&format!(
            "declval::ErrorList::from(declval::FieldError::internal(&declval::Path::root(), \
             format!(\"no validation found for {{}}, subresources: {{:?}}\", \
             ::std::any::type_name::<{}>(), subresources)))",
            reg.ty
        ));
        w.close("});");
    }
    w.close("}");
}

fn function_item(w: &mut Writer, function: &Function) {
    w.line("#[allow(unused_variables, unused_mut, clippy::redundant_closure_call)]");
    w.open(&format!(
        "pub fn {}(op_ctx: &declval::Context, obj: &{}, old_obj: Option<&{}>, fld_path: \
         &declval::Path) -> declval::ErrorList {{",
        function.name, function.ty, function.ty
    ));
    w.line("let mut errs = declval::ErrorList::new();");
    block(w, &function.body);
    w.line("errs");
    w.close("}");
}

fn block(w: &mut Writer, stmts: &Block) {
    for stmt in stmts {
        statement(w, stmt);
    }
}

fn arg(arg: &Arg) -> String {
    match arg {
        Arg::Literal(text) => text.clone(),
        Arg::Static(name) => format!("&{}", name),
        Arg::MemberStr(name) => format!("AsRef::<str>::as_ref(&obj.{})", member(name)),
        Arg::MemberPresence(members) => format!(
            "&[{}]",
            members
                .iter()
                .map(|m| format!("declval::Presence::is_set(&obj.{})", member(m)))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

fn statement(w: &mut Writer, stmt: &Stmt) {
    match stmt {
        Stmt::Comment(text) => w.line(&format!("// {}", text)),
        Stmt::Check {
            function,
            value,
            args,
            fatal
        } => {
            let value = match value {
                ValueForm::Pointer | ValueForm::Direct => "obj",
                ValueForm::WrapSome => "Some(obj)"
            };
            let mut call_args = vec![
                "op_ctx".to_string(),
                "fld_path".to_string(),
                value.to_string(),
                "old_obj".to_string(),
            ];
            call_args.extend(args.iter().map(arg));
            let call = format!("declval::{}({})", function, call_args.join(", "));
            if *fatal {
                w.open("{");
                w.line(&format!("let e = {};", call));
                w.open("if !e.is_empty() {");
                w.line("errs.extend(e);");
                w.line("return errs;");
                w.close("}");
                w.close("}");
            } else {
                w.line(&format!("errs.extend({});", call));
            }
        }
        Stmt::Guarded(body) => {
            w.open("if let Some(obj) = obj {");
            block(w, body);
            w.close("}");
        }
        Stmt::CallType {
            function
        } => w.line(&format!(
            "errs.extend({}(op_ctx, obj, old_obj, fld_path));",
            function
        )),
        Stmt::Scope(scope) => {
            let name = member(&scope.binding.name);
            let (value, old) = match scope.binding.via {
                Via::Plain => (
                    format!("&obj.{}", name),
                    format!("old_obj.map(|o| &o.{})", name)
                ),
                Via::Option => (
                    format!("obj.{}.as_ref()", name),
                    format!("old_obj.and_then(|o| o.{}.as_ref())", name)
                ),
                Via::Boxed => (
                    format!("obj.{}.as_deref()", name),
                    format!("old_obj.and_then(|o| o.{}.as_deref())", name)
                )
            };
            closure_call(
                w,
                scope,
                &format!(
                    "{}, {}, &fld_path.child({})",
                    value,
                    old,
                    quoted(&scope.binding.wire)
                )
            );
        }
        Stmt::ListLoop {
            list_map,
            elem
        } => {
            w.open("{");
            if let Some(ListMapKey {
                elem_type,
                fields
            }) = list_map
            {
                let key = fields
                    .iter()
                    .map(|f| format!("o.{}.clone(), ", member(f)))
                    .collect::<String>();
                w.line(&format!(
                    "let old_list_map = declval::ListMap::new(old_obj.map(|o| o.as_slice()).unwrap_or(&[]), |o: &{}| ({}));",
                    elem_type,
                    key.trim_end()
                ));
            }
            w.open("for (i, val) in obj.iter().enumerate() {");
            let value = element_access("val", elem.binding.via());
            let old = if elem.binding.correlated {
                "old_list_map.with_matching_key(val)"
            } else {
                "None"
            };
            closure_call(w, elem, &format!("{}, {}, &fld_path.index(i)", value, old));
            w.close("}");
            w.close("}");
        }
        Stmt::MapLoop {
            key,
            val
        } => {
            if val.is_some() {
                w.open("for (key, val) in obj.iter() {");
            } else {
                w.open("for key in obj.keys() {");
            }
            if let Some(key) = key {
                closure_call(w, key, "key, None, fld_path");
            }
            if let Some(val) = val {
                let via = val.binding.via();
                let old = match via {
                    Via::Plain => "old_obj.and_then(|o| o.get(key))".to_string(),
                    Via::Option => "old_obj.and_then(|o| o.get(key)).and_then(|v| v.as_ref())".to_string(),
                    Via::Boxed => "old_obj.and_then(|o| o.get(key)).and_then(|v| v.as_deref())".to_string()
                };
                closure_call(
                    w,
                    val,
                    &format!("{}, {}, &fld_path.key(key)", element_access("val", via), old)
                );
            }
            w.close("}");
        }
    }
}

fn element_access(var: &str, via: Via) -> String {
    match via {
        Via::Plain => var.to_string(),
        Via::Option => format!("{}.as_ref()", var),
        Via::Boxed => format!("{}.as_deref()", var)
    }
}

/// `errs.extend((|obj, old_obj, fld_path| { ... })(args));`
fn closure_call<B: Binding>(w: &mut Writer, scope: &Scope<B>, call_args: &str) {
    let param = if scope.is_pointer() {
        format!("Option<&{}>", scope.ty)
    } else {
        format!("&{}", scope.ty)
    };
    w.open(&format!(
        "errs.extend((|obj: {}, old_obj: Option<&{}>, fld_path: &declval::Path| -> declval::ErrorList {{",
        param, scope.ty
    ));
    w.line("let mut errs = declval::ErrorList::new();");
    block(w, &scope.body);
    w.line("errs");
    w.close(&format!("}})({}));", call_args));
}
