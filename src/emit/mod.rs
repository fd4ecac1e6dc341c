//! Artifact emission
//!
//! Lowers operator models into the structured C++ document tree and renders
//! the two artifacts. Emission is a pure function of (ordered model list,
//! dialect name, namespace list, header include path): byte-identical models
//! in, byte-identical text out.

pub mod ast;
mod render;

use crate::model::OperatorModel;

use ast::{
    Accessor, AccessorKind, AttrInfoRow, AttributeCheck, BuildParam, Document, InputInfoRow,
    OpClassDecl, OpDef, OpInfoFn, OperandCheck, OutputInfoRow, RunTimeInfoRow, VerifyFn,
};

/// The rendered declaration and definition texts.
#[derive(Clone, Debug)]
pub struct GeneratedArtifacts {
    pub declaration: String,
    pub definition: String,
}

/// Walks the operator model list and renders both artifacts.
pub struct Emitter {
    namespaces: Vec<String>,
    header_include: String,
}

impl Emitter {
    pub fn new() -> Self {
        Self {
            namespaces: Vec::new(),
            header_include: String::new(),
        }
    }

    /// Namespace guards wrapping the generated code, outermost first.
    pub fn with_namespaces(mut self, namespaces: Vec<String>) -> Self {
        self.namespaces = namespaces;
        self
    }

    /// Path text embedded as the definition artifact's include of the
    /// declaration artifact. Used only as literal text.
    pub fn with_header_include(mut self, include: impl Into<String>) -> Self {
        self.header_include = include.into();
        self
    }

    pub fn emit(&self, models: &[OperatorModel]) -> GeneratedArtifacts {
        let doc = Document {
            namespaces: self.namespaces.clone(),
            header_include: self.header_include.clone(),
            op_names: models.iter().map(|m| m.class_name.clone()).collect(),
            decls: models.iter().map(lower_decl).collect(),
            defs: models.iter().map(lower_def).collect(),
        };
        tracing::info!(ops = models.len(), "rendering operator definition artifacts");
        GeneratedArtifacts {
            declaration: render::render_declaration(&doc),
            definition: render::render_definition(&doc),
        }
    }
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new()
    }
}

fn lower_decl(model: &OperatorModel) -> OpClassDecl {
    let mut build_params = Vec::with_capacity(model.inputs.len() + model.attrs.len());
    for input in &model.inputs {
        build_params.push(BuildParam {
            cpp_type: input.kind.build_arg_type().to_string(),
            // Trailing underscore keeps the parameter from shadowing the
            // accessor of the same name.
            name: format!("{}_", input.name),
            default: None,
        });
    }
    for attr in &model.attrs {
        build_params.push(BuildParam {
            cpp_type: attr.build_arg_type.clone(),
            name: attr.name.clone(),
            default: attr.default_value.clone(),
        });
    }

    let mut accessors = Vec::with_capacity(model.inputs.len() + model.outputs.len());
    for (index, input) in model.inputs.iter().enumerate() {
        accessors.push(Accessor {
            name: input.name.clone(),
            index,
            kind: AccessorKind::Operand,
        });
    }
    for (index, output) in model.outputs.iter().enumerate() {
        accessors.push(Accessor {
            name: output.name.clone(),
            index,
            kind: AccessorKind::Result,
        });
    }

    OpClassDecl {
        class_name: model.class_name.clone(),
        dialect_op_name: model.dialect_op_name.clone(),
        interfaces: model.interfaces.iter().map(|s| s.to_string()).collect(),
        traits: model.traits.iter().map(|s| s.to_string()).collect(),
        attributes_num: model.attrs.len(),
        build_params,
        accessors,
    }
}

fn lower_def(model: &OperatorModel) -> OpDef {
    let info = OpInfoFn {
        inputs: model
            .inputs
            .iter()
            .map(|slot| InputInfoRow {
                name: slot.name.clone(),
                cpp_type: slot.kind.cpp_type().to_string(),
                optional: slot.optional,
                no_need_buffer: slot.no_need_buffer,
            })
            .collect(),
        attributes: model
            .attrs
            .iter()
            .map(|slot| AttrInfoRow {
                name: slot.name.clone(),
                cpp_type: slot.cpp_type.clone(),
                data_type: slot.data_type.clone().unwrap_or_default(),
            })
            .collect(),
        outputs: model
            .outputs
            .iter()
            .map(|slot| OutputInfoRow {
                name: slot.name.clone(),
                cpp_type: slot.kind.cpp_type().to_string(),
                optional: slot.optional,
                intermediate: slot.intermediate,
            })
            .collect(),
        run_time: RunTimeInfoRow {
            func: model
                .infer_meta
                .as_ref()
                .map(|im| im.func.clone())
                .unwrap_or_default(),
            params: model
                .infer_meta
                .as_ref()
                .map(|im| im.params.clone())
                .unwrap_or_default(),
        },
    };

    let verify = VerifyFn {
        input_checks: model
            .inputs
            .iter()
            .enumerate()
            .map(|(index, slot)| OperandCheck {
                index,
                optional: slot.optional,
                cpp_type: if slot.kind.is_list() {
                    slot.kind.element_type().to_string()
                } else {
                    slot.kind.cpp_type().to_string()
                },
                list: slot.kind.is_list(),
            })
            .collect(),
        output_checks: model
            .outputs
            .iter()
            .enumerate()
            .map(|(index, slot)| OperandCheck {
                index,
                optional: slot.optional,
                cpp_type: if slot.kind.is_list() {
                    slot.kind.element_type().to_string()
                } else {
                    slot.kind.cpp_type().to_string()
                },
                list: slot.kind.is_list(),
            })
            .collect(),
        attribute_checks: model
            .attrs
            .iter()
            .map(|slot| AttributeCheck {
                name: slot.name.clone(),
                cpp_type: slot.cpp_type.clone(),
                element_type: slot.kind.element_type().map(|t| t.to_string()),
            })
            .collect(),
    };

    OpDef {
        class_name: model.class_name.clone(),
        attribute_names: model.attrs.iter().map(|a| a.name.clone()).collect(),
        info,
        verify,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::build_models;
    use crate::schema::{AttrDef, InputDef, OpSchema, OutputDef};

    fn add_schema() -> OpSchema {
        OpSchema {
            name: "add".to_string(),
            inputs: vec![
                InputDef {
                    name: "x".to_string(),
                    typename: "Tensor".to_string(),
                    optional: false,
                    no_need_buffer: false,
                },
                InputDef {
                    name: "y".to_string(),
                    typename: "Tensor".to_string(),
                    optional: false,
                    no_need_buffer: false,
                },
            ],
            outputs: vec![OutputDef {
                name: "out".to_string(),
                typename: "Tensor".to_string(),
                optional: false,
                intermediate: false,
                size: None,
            }],
            attrs: Vec::new(),
            infer_meta: None,
            inplace: None,
        }
    }

    fn emit_add() -> GeneratedArtifacts {
        let models = build_models(&add_schema(), None, "pd").unwrap();
        Emitter::new()
            .with_namespaces(vec!["paddle".to_string(), "dialect".to_string()])
            .with_header_include("pd_op.h")
            .emit(&models)
    }

    #[test]
    fn declaration_contains_class_and_op_list() {
        let artifacts = emit_add();
        assert!(artifacts.declaration.contains("#pragma once"));
        assert!(artifacts.declaration.contains("#define GET_OP_LIST AddOp"));
        assert!(artifacts
            .declaration
            .contains("class AddOp : public ir::Op<AddOp, paddle::dialect::GetOpInfoInterface> {"));
        assert!(artifacts.declaration.contains("namespace paddle {"));
        assert!(artifacts.declaration.contains("}  // namespace paddle"));
    }

    #[test]
    fn definition_includes_header_by_given_path() {
        let artifacts = emit_add();
        assert!(artifacts.definition.contains("#include \"pd_op.h\""));
    }

    #[test]
    fn accessors_follow_slot_order() {
        let artifacts = emit_add();
        let decl = &artifacts.declaration;
        let x = decl.find("GetOperandByIndex(0)").unwrap();
        let y = decl.find("GetOperandByIndex(1)").unwrap();
        let out = decl.find("GetResultByIndex(0)").unwrap();
        assert!(x < y && y < out);
    }

    #[test]
    fn attribute_data_type_tag_lands_in_info_row() {
        let mut schema = add_schema();
        schema.attrs.push(AttrDef {
            name: "scale".to_string(),
            typename: "Scalar".to_string(),
            default_value: None,
            data_type: Some("float".to_string()),
        });
        let models = build_models(&schema, None, "pd").unwrap();
        let artifacts = Emitter::new().with_header_include("pd_op.h").emit(&models);
        assert!(artifacts.definition.contains(
            "paddle::dialect::OpAttributeInfo(\"scale\", \"paddle::dialect::ScalarAttribute\", \"float\")"
        ));
    }

    #[test]
    fn infer_meta_lands_in_run_time_info() {
        let mut schema = add_schema();
        schema.infer_meta = Some(crate::schema::InferMetaDef {
            func: Some("ElementwiseInferMeta".to_string()),
            param: Some(vec!["x".to_string(), "y".to_string()]),
        });
        let models = build_models(&schema, None, "pd").unwrap();
        let artifacts = Emitter::new().with_header_include("pd_op.h").emit(&models);
        assert!(artifacts.definition.contains(
            "paddle::dialect::OpRunTimeInfo(\"ElementwiseInferMeta\", {\"x\", \"y\"});"
        ));
    }

    #[test]
    fn emission_is_deterministic() {
        let a = emit_add();
        let b = emit_add();
        assert_eq!(a.declaration, b.declaration);
        assert_eq!(a.definition, b.definition);
    }
}
