//! Renderer: document tree to C++ text
//!
//! The byte layout produced here is a wire-format contract with the
//! downstream C++ build; change it only in lockstep with that build.

use std::fmt::Write as _;

use super::ast::*;

const GENERATED_BANNER: &str = "// Generated by dialect-opgen. DO NOT EDIT.";

const HEADER_INCLUDES: &[&str] = &[
    "paddle/fluid/dialect/pd_interface.h",
    "paddle/fluid/dialect/utils.h",
    "paddle/ir/op_base.h",
];

const SOURCE_INCLUDES: &[&str] = &[
    "paddle/fluid/dialect/pd_attribute.h",
    "paddle/fluid/dialect/pd_type.h",
    "paddle/ir/builtin_attribute.h",
    "paddle/ir/builtin_type.h",
    "paddle/phi/core/enforce.h",
];

/// Continuation offset aligning with the open paren of PADDLE_ENFORCE_EQ.
const ENFORCE_CONT: usize = "PADDLE_ENFORCE_EQ(".len();

/// Indentation-aware text sink.
struct CppWriter {
    out: String,
    indent: usize,
}

impl CppWriter {
    fn new() -> Self {
        Self {
            out: String::new(),
            indent: 0,
        }
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.indent {
            self.out.push(' ');
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    /// Continuation line of a PADDLE_ENFORCE_EQ statement.
    fn enforce_cont(&mut self, text: &str) {
        for _ in 0..self.indent + ENFORCE_CONT {
            self.out.push(' ');
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn enforce_eq(&mut self, condition: &str, expected: &str, message: &str) {
        self.line(&format!("PADDLE_ENFORCE_EQ({condition}, {expected},"));
        self.enforce_cont(&format!(
            "phi::errors::PreconditionNotMet(\"{message}\"));"
        ));
    }

    fn indented(&mut self, f: impl FnOnce(&mut Self)) {
        self.indent += 2;
        f(self);
        self.indent -= 2;
    }

    fn finish(mut self) -> String {
        while self.out.ends_with('\n') {
            self.out.pop();
        }
        self.out
    }
}

/// Render the declaration artifact.
pub fn render_declaration(doc: &Document) -> String {
    let mut blocks = Vec::with_capacity(doc.decls.len() + 1);
    blocks.push(format!("#define GET_OP_LIST {}", doc.op_names.join(", ")));
    for decl in &doc.decls {
        blocks.push(render_class(decl));
    }
    let body = wrap_namespaces(blocks.join("\n\n"), &doc.namespaces);

    let mut out = String::new();
    let _ = writeln!(out, "{GENERATED_BANNER}");
    out.push('\n');
    out.push_str("#pragma once\n\n");
    for include in HEADER_INCLUDES {
        let _ = writeln!(out, "#include \"{include}\"");
    }
    out.push('\n');
    out.push_str(&body);
    out.push('\n');
    out
}

/// Render the definition artifact. `header_include` is embedded verbatim as
/// the include path of the declaration artifact.
pub fn render_definition(doc: &Document) -> String {
    let mut blocks = Vec::with_capacity(doc.defs.len());
    for def in &doc.defs {
        blocks.push(render_op_def(def));
    }
    let body = wrap_namespaces(blocks.join("\n\n"), &doc.namespaces);

    let mut out = String::new();
    let _ = writeln!(out, "{GENERATED_BANNER}");
    out.push('\n');
    let _ = writeln!(out, "#include \"{}\"", doc.header_include);
    out.push('\n');
    for include in SOURCE_INCLUDES {
        let _ = writeln!(out, "#include \"{include}\"");
    }
    out.push('\n');
    out.push_str(&body);
    out.push('\n');
    out
}

/// Wrap a block in nested namespace guards. The innermost operator text is
/// already assembled; namespaces are applied inside-out so they close in the
/// reverse of their declared order.
fn wrap_namespaces(body: String, namespaces: &[String]) -> String {
    let mut wrapped = body;
    for ns in namespaces.iter().rev() {
        wrapped = format!("namespace {ns} {{\n{wrapped}\n}}  // namespace {ns}");
    }
    wrapped
}

fn render_class(decl: &OpClassDecl) -> String {
    let mut w = CppWriter::new();

    let mut base_params = decl.class_name.clone();
    for iface in &decl.interfaces {
        base_params.push_str(", ");
        base_params.push_str(iface);
    }
    for tr in &decl.traits {
        base_params.push_str(", ");
        base_params.push_str(tr);
    }

    w.line(&format!(
        "class {} : public ir::Op<{}> {{",
        decl.class_name, base_params
    ));
    w.line(" public:");
    w.indented(|w| {
        w.line("using Op::Op;");
        w.line(&format!(
            "static const char *name() {{ return \"{}\"; }}",
            decl.dialect_op_name
        ));
        if decl.attributes_num == 0 {
            w.line("static const char **attributes_name;");
        } else {
            w.line(&format!(
                "static const char *attributes_name[{}];",
                decl.attributes_num
            ));
        }
        w.line(&format!(
            "static constexpr uint32_t attributes_num = {};",
            decl.attributes_num
        ));
        w.line("static OpInfoTuple GetOpInfo();");
        w.line(&format!("static void Build({});", build_signature(decl)));
        w.line(
            "void Verify(const std::vector<ir::OpResult> &inputs, \
             const std::vector<ir::OpResult> &outputs, \
             const ir::AttributeMap &attributes);",
        );
        if !decl.accessors.is_empty() {
            w.blank();
            for acc in &decl.accessors {
                w.line(&render_accessor(acc));
            }
        }
    });
    w.line("};");
    w.finish()
}

fn build_signature(decl: &OpClassDecl) -> String {
    let mut sig = String::from("ir::Builder &builder, ir::OperationArgument &argument");
    for param in &decl.build_params {
        let _ = write!(sig, ", {} {}", param.cpp_type, param.name);
        if let Some(default) = &param.default {
            let _ = write!(sig, " = {default}");
        }
    }
    sig
}

fn render_accessor(acc: &Accessor) -> String {
    match acc.kind {
        AccessorKind::Operand => format!(
            "ir::OpOperand {}() {{ return operation()->GetOperandByIndex({}); }}",
            acc.name, acc.index
        ),
        AccessorKind::Result => format!(
            "ir::OpResult {}() {{ return operation()->GetResultByIndex({}); }}",
            acc.name, acc.index
        ),
    }
}

fn render_op_def(def: &OpDef) -> String {
    let mut blocks = Vec::with_capacity(3);
    blocks.push(render_attribute_table(def));
    blocks.push(render_op_info(def));
    blocks.push(render_verify(def));
    blocks.join("\n\n")
}

fn render_attribute_table(def: &OpDef) -> String {
    if def.attribute_names.is_empty() {
        return format!("const char **{}::attributes_name = nullptr;", def.class_name);
    }
    let names = def
        .attribute_names
        .iter()
        .map(|n| format!("\"{n}\""))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "const char *{}::attributes_name[{}] = {{{}}};",
        def.class_name,
        def.attribute_names.len(),
        names
    )
}

fn render_op_info(def: &OpDef) -> String {
    let mut w = CppWriter::new();
    let info = &def.info;

    w.line(&format!("OpInfoTuple {}::GetOpInfo() {{", def.class_name));
    w.indented(|w| {
        render_info_vector(
            w,
            "paddle::dialect::OpInputInfo",
            "inputs",
            &info.inputs
                .iter()
                .map(|row| {
                    format!(
                        "paddle::dialect::OpInputInfo(\"{}\", \"{}\", {}, {})",
                        row.name, row.cpp_type, row.optional, row.no_need_buffer
                    )
                })
                .collect::<Vec<_>>(),
        );
        render_info_vector(
            w,
            "paddle::dialect::OpAttributeInfo",
            "attributes",
            &info.attributes
                .iter()
                .map(|row| {
                    format!(
                        "paddle::dialect::OpAttributeInfo(\"{}\", \"{}\", \"{}\")",
                        row.name, row.cpp_type, row.data_type
                    )
                })
                .collect::<Vec<_>>(),
        );
        render_info_vector(
            w,
            "paddle::dialect::OpOutputInfo",
            "outputs",
            &info.outputs
                .iter()
                .map(|row| {
                    format!(
                        "paddle::dialect::OpOutputInfo(\"{}\", \"{}\", {}, {})",
                        row.name, row.cpp_type, row.optional, row.intermediate
                    )
                })
                .collect::<Vec<_>>(),
        );
        let params = info
            .run_time
            .params
            .iter()
            .map(|p| format!("\"{p}\""))
            .collect::<Vec<_>>()
            .join(", ");
        w.line(&format!(
            "paddle::dialect::OpRunTimeInfo run_time_info = \
             paddle::dialect::OpRunTimeInfo(\"{}\", {{{}}});",
            info.run_time.func, params
        ));
        w.line("return std::make_tuple(inputs, attributes, outputs, run_time_info);");
    });
    w.line("}");
    w.finish()
}

fn render_info_vector(w: &mut CppWriter, cpp_type: &str, var: &str, rows: &[String]) {
    if rows.is_empty() {
        w.line(&format!("std::vector<{cpp_type}> {var} = {{}};"));
        return;
    }
    w.line(&format!("std::vector<{cpp_type}> {var} = {{"));
    w.indented(|w| {
        w.indented(|w| {
            for (i, row) in rows.iter().enumerate() {
                if i + 1 == rows.len() {
                    w.line(&format!("{row}}};"));
                } else {
                    w.line(&format!("{row},"));
                }
            }
        });
    });
}

fn render_verify(def: &OpDef) -> String {
    let mut w = CppWriter::new();
    let verify = &def.verify;

    let prefix = format!("void {}::Verify(", def.class_name);
    let align = " ".repeat(prefix.len());
    w.line(&format!("{prefix}const std::vector<ir::OpResult> &inputs,"));
    w.line(&format!("{align}const std::vector<ir::OpResult> &outputs,"));
    w.line(&format!("{align}const ir::AttributeMap &attributes) {{"));
    w.indented(|w| {
        w.line(&format!(
            "VLOG(4) << \"Start verifying inputs, outputs and attributes for: {}.\";",
            def.class_name
        ));
        w.blank();
        w.line("// Verify inputs type:");
        w.enforce_eq(
            "inputs.size()",
            &verify.input_checks.len().to_string(),
            &format!(
                "The size of inputs must be equal to {}.",
                verify.input_checks.len()
            ),
        );
        for check in &verify.input_checks {
            render_operand_check(w, check, "inputs", "input");
        }
        w.blank();
        w.line("// Verify outputs type:");
        w.enforce_eq(
            "outputs.size()",
            &verify.output_checks.len().to_string(),
            &format!(
                "The size of outputs must be equal to {}.",
                verify.output_checks.len()
            ),
        );
        for check in &verify.output_checks {
            render_operand_check(w, check, "outputs", "output");
        }
        w.blank();
        w.line("// Verify if attributes contain attribute name in attributes_name:");
        if verify.attribute_checks.is_empty() {
            w.line("// Attributes num is 0, not need to check attributes type.");
        }
        for check in &verify.attribute_checks {
            render_attribute_check(w, check);
        }
    });
    w.line("}");
    w.finish()
}

/// The four check variants: plain, list, optional, optional-list. A present
/// check on an optional slot is a precondition, not an error, so the optional
/// forms only run when the operand is non-null.
fn render_operand_check(w: &mut CppWriter, check: &OperandCheck, var: &str, noun: &str) {
    let message = format!("Type validation failed for the {}th {}.", check.index, noun);
    let emit_inner = |w: &mut CppWriter| {
        if check.list {
            w.enforce_eq(
                &format!(
                    "{var}[{}].type().isa<{}>()",
                    check.index,
                    crate::types::VECTOR_TYPE
                ),
                "true",
                &message,
            );
            w.line(&format!(
                "for (size_t i = 0; i < {var}[{}].type().dyn_cast<{}>().size(); i++) {{",
                check.index,
                crate::types::VECTOR_TYPE
            ));
            w.indented(|w| {
                w.enforce_eq(
                    &format!(
                        "{var}[{}].type().dyn_cast<{}>()[i].isa<{}>()",
                        check.index,
                        crate::types::VECTOR_TYPE,
                        check.cpp_type
                    ),
                    "true",
                    &message,
                );
            });
            w.line("}");
        } else {
            w.enforce_eq(
                &format!("{var}[{}].type().isa<{}>()", check.index, check.cpp_type),
                "true",
                &message,
            );
        }
    };

    if check.optional {
        w.line(&format!("if ({var}[{}]) {{", check.index));
        w.indented(emit_inner);
        w.line("}");
    } else {
        emit_inner(w);
    }
}

fn render_attribute_check(w: &mut CppWriter, check: &AttributeCheck) {
    let message = format!("Type of attribute: {} is not right.", check.name);
    match &check.element_type {
        None => {
            w.enforce_eq(
                &format!(
                    "attributes.count(\"{0}\") > 0 && attributes.at(\"{0}\").isa<{1}>()",
                    check.name, check.cpp_type
                ),
                "true",
                &message,
            );
        }
        Some(element_type) => {
            w.enforce_eq(
                &format!(
                    "attributes.count(\"{0}\") > 0 && attributes.at(\"{0}\").isa<{1}>()",
                    check.name,
                    crate::types::ARRAY_ATTRIBUTE
                ),
                "true",
                &message,
            );
            w.line(&format!(
                "for (size_t i = 0; i < attributes.at(\"{}\").dyn_cast<{}>().size(); i++) {{",
                check.name,
                crate::types::ARRAY_ATTRIBUTE
            ));
            w.indented(|w| {
                w.enforce_eq(
                    &format!(
                        "attributes.at(\"{}\").dyn_cast<{}>()[i].isa<{}>()",
                        check.name,
                        crate::types::ARRAY_ATTRIBUTE,
                        element_type
                    ),
                    "true",
                    &message,
                );
            });
            w.line("}");
        }
    }
}
