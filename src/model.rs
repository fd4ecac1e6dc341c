//! Operator model construction
//!
//! Builds the canonical per-operator unit of work from a raw schema record:
//! resolved input/output/attribute slots, the inference-metadata mapping, and
//! the fixed capability-interface list. A record declaring an in-place
//! relationship yields two models, the base form and a trailing-underscore
//! variant. Models are constructed once, consumed once by the emitter, and
//! never mutated.

use crate::error::{OpGenError, Result};
use crate::schema::{CompatEntry, OpSchema};
use crate::types::{qualify_build_arg_type, AttrKind, OperandKind};

/// Capability interfaces every generated operator implements.
const OP_INTERFACES: &[&str] = &["paddle::dialect::GetOpInfoInterface"];

#[derive(Clone, Debug)]
pub struct InputSlot {
    pub name: String,
    pub kind: OperandKind,
    pub optional: bool,
    pub no_need_buffer: bool,
}

#[derive(Clone, Debug)]
pub struct OutputSlot {
    pub name: String,
    pub kind: OperandKind,
    pub optional: bool,
    pub intermediate: bool,
    /// Dynamic-size expression for list-typed outputs; retained as model
    /// metadata for infer-meta generation, not consumed by emission.
    pub size: Option<String>,
}

#[derive(Clone, Debug)]
pub struct AttrSlot {
    pub name: String,
    pub kind: AttrKind,
    /// Fully resolved C++ attribute type.
    pub cpp_type: String,
    /// Parameter type in the generated Build signature, already qualified.
    pub build_arg_type: String,
    /// Verbatim target-language literal.
    pub default_value: Option<String>,
    /// Runtime-datatype tag for polymorphic kinds.
    pub data_type: Option<String>,
}

#[derive(Clone, Debug)]
pub struct InferMeta {
    pub func: String,
    pub params: Vec<String>,
}

/// Canonical per-operator unit of work.
#[derive(Clone, Debug)]
pub struct OperatorModel {
    /// Exported operator name, e.g. `scale` or `scale_`.
    pub op_name: String,
    /// Generated C++ class name, e.g. `ScaleOp` or `Scale_Op`.
    pub class_name: String,
    /// Runtime operator name, e.g. `pd.scale_`.
    pub dialect_op_name: String,
    /// Fluid-era alias from the compatibility document, if any.
    pub legacy_name: Option<String>,
    pub inputs: Vec<InputSlot>,
    pub outputs: Vec<OutputSlot>,
    pub attrs: Vec<AttrSlot>,
    pub infer_meta: Option<InferMeta>,
    pub interfaces: Vec<&'static str>,
    /// Extension point, unused in the current form.
    pub traits: Vec<&'static str>,
    /// Input-to-output aliasing pairs on the in-place variant.
    pub inplace_pairs: Vec<(String, String)>,
}

/// Parallel-list form of a model's slots. `OperatorModel::from_parts`
/// enforces length parity before zipping; disagreement means the schema entry
/// is corrupt and the whole run must abort.
#[derive(Clone, Debug, Default)]
pub struct ModelParts {
    pub input_names: Vec<String>,
    pub input_kinds: Vec<OperandKind>,
    pub input_optionals: Vec<bool>,
    pub input_no_need_buffers: Vec<bool>,
    pub output_names: Vec<String>,
    pub output_kinds: Vec<OperandKind>,
    pub output_optionals: Vec<bool>,
    pub output_intermediates: Vec<bool>,
    pub output_sizes: Vec<Option<String>>,
    pub attr_names: Vec<String>,
    pub attr_kinds: Vec<AttrKind>,
    pub attr_build_arg_types: Vec<String>,
    pub attr_defaults: Vec<Option<String>>,
    pub attr_data_types: Vec<Option<String>>,
}

impl OperatorModel {
    /// Zip parallel slot lists into a model, failing on any length mismatch.
    /// Never truncates or pads.
    pub fn from_parts(
        op_name: &str,
        dialect_name: &str,
        legacy_name: Option<String>,
        parts: ModelParts,
        infer_meta: Option<InferMeta>,
        inplace_pairs: Vec<(String, String)>,
    ) -> Result<Self> {
        let mismatch = |what: &'static str| OpGenError::ListLengthMismatch {
            op: op_name.to_string(),
            what,
        };

        let n = parts.input_names.len();
        if parts.input_kinds.len() != n
            || parts.input_optionals.len() != n
            || parts.input_no_need_buffers.len() != n
        {
            return Err(mismatch("input"));
        }
        let n = parts.output_names.len();
        if parts.output_kinds.len() != n
            || parts.output_optionals.len() != n
            || parts.output_intermediates.len() != n
            || parts.output_sizes.len() != n
        {
            return Err(mismatch("output"));
        }
        let n = parts.attr_names.len();
        if parts.attr_kinds.len() != n
            || parts.attr_build_arg_types.len() != n
            || parts.attr_defaults.len() != n
            || parts.attr_data_types.len() != n
        {
            return Err(mismatch("attribute"));
        }

        let inputs = parts
            .input_names
            .into_iter()
            .zip(parts.input_kinds)
            .zip(parts.input_optionals)
            .zip(parts.input_no_need_buffers)
            .map(|(((name, kind), optional), no_need_buffer)| InputSlot {
                name,
                kind,
                optional,
                no_need_buffer,
            })
            .collect();
        let outputs = parts
            .output_names
            .into_iter()
            .zip(parts.output_kinds)
            .zip(parts.output_optionals)
            .zip(parts.output_intermediates)
            .zip(parts.output_sizes)
            .map(
                |((((name, kind), optional), intermediate), size)| OutputSlot {
                    name,
                    kind,
                    optional,
                    intermediate,
                    size,
                },
            )
            .collect();
        let attrs = parts
            .attr_names
            .into_iter()
            .zip(parts.attr_kinds)
            .zip(parts.attr_build_arg_types)
            .zip(parts.attr_defaults)
            .zip(parts.attr_data_types)
            .map(
                |((((name, kind), build_arg_type), default_value), data_type)| AttrSlot {
                    name,
                    cpp_type: kind.cpp_type().to_string(),
                    kind,
                    build_arg_type,
                    default_value,
                    data_type,
                },
            )
            .collect();

        Ok(Self {
            op_name: op_name.to_string(),
            class_name: class_name_of(op_name),
            dialect_op_name: format!("{dialect_name}.{op_name}"),
            legacy_name,
            inputs,
            outputs,
            attrs,
            infer_meta,
            interfaces: OP_INTERFACES.to_vec(),
            traits: Vec::new(),
            inplace_pairs,
        })
    }
}

/// Build the model(s) for one schema record.
///
/// An `inplace` block on a record whose name does not already end with the
/// in-place marker yields two models: the base form and the marked variant.
/// A record already carrying the marker yields exactly one model.
pub fn build_models(
    schema: &OpSchema,
    compat: Option<&CompatEntry>,
    dialect_name: &str,
) -> Result<Vec<OperatorModel>> {
    let legacy_name = compat.and_then(|c| c.names().1);
    let parts = resolve_parts(schema)?;
    let infer_meta = schema.infer_meta.as_ref().map(|im| InferMeta {
        func: im.func.clone().unwrap_or_default(),
        params: im.param.clone().unwrap_or_default(),
    });

    let base = OperatorModel::from_parts(
        &schema.name,
        dialect_name,
        legacy_name.clone(),
        parts.clone(),
        infer_meta.clone(),
        Vec::new(),
    )?;
    tracing::debug!(op = %schema.name, class = %base.class_name, "built operator model");

    let Some(raw_inplace) = schema.inplace.as_deref() else {
        return Ok(vec![base]);
    };
    if schema.name.ends_with('_') {
        return Ok(vec![base]);
    }

    let pairs = parse_inplace_pairs(&schema.name, raw_inplace)?;
    let inplace_name = format!("{}_", schema.name);
    let variant = OperatorModel::from_parts(
        &inplace_name,
        dialect_name,
        legacy_name,
        parts,
        infer_meta,
        pairs,
    )?;
    tracing::debug!(op = %inplace_name, class = %variant.class_name, "built in-place variant");
    Ok(vec![base, variant])
}

fn resolve_parts(schema: &OpSchema) -> Result<ModelParts> {
    let unsupported = |typename: &str| OpGenError::UnsupportedType {
        op: schema.name.clone(),
        typename: typename.to_string(),
    };

    let mut parts = ModelParts::default();
    for input in &schema.inputs {
        let kind =
            OperandKind::from_typename(&input.typename).ok_or_else(|| unsupported(&input.typename))?;
        parts.input_names.push(input.name.clone());
        parts.input_kinds.push(kind);
        parts.input_optionals.push(input.optional);
        parts.input_no_need_buffers.push(input.no_need_buffer);
    }
    for output in &schema.outputs {
        let kind = OperandKind::from_typename(&output.typename)
            .ok_or_else(|| unsupported(&output.typename))?;
        if output.size.is_some() && !kind.is_list() {
            return Err(OpGenError::SchemaParse {
                path: schema.name.clone(),
                message: format!(
                    "output '{}' carries a size expression but is not list-typed",
                    output.name
                ),
            });
        }
        parts.output_names.push(output.name.clone());
        parts.output_kinds.push(kind);
        parts.output_optionals.push(output.optional);
        parts.output_intermediates.push(output.intermediate);
        parts.output_sizes.push(output.size.clone());
    }
    for attr in &schema.attrs {
        let kind =
            AttrKind::from_typename(&attr.typename).ok_or_else(|| unsupported(&attr.typename))?;
        // Polymorphic kinds accept a richer runtime value: the declared
        // data_type tag retargets the build-argument type when present.
        let raw_build_arg = match (&attr.data_type, kind.is_polymorphic()) {
            (Some(tag), true) => tag.clone(),
            _ => kind.default_build_arg_type().to_string(),
        };
        parts.attr_names.push(attr.name.clone());
        parts.attr_kinds.push(kind);
        parts
            .attr_build_arg_types
            .push(qualify_build_arg_type(&raw_build_arg));
        parts.attr_defaults.push(attr.default_value.clone());
        parts.attr_data_types.push(attr.data_type.clone());
    }
    Ok(parts)
}

/// PascalCase class name with the `Op` suffix. A trailing in-place marker on
/// the operator name stays in front of the suffix: `scale_` -> `Scale_Op`.
fn class_name_of(op_name: &str) -> String {
    let (base, marker) = match op_name.strip_suffix('_') {
        Some(base) => (base, "_"),
        None => (op_name, ""),
    };
    let mut pascal = String::with_capacity(base.len());
    for part in base.split('_').filter(|p| !p.is_empty()) {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            pascal.extend(first.to_uppercase());
            pascal.push_str(chars.as_str());
        }
    }
    format!("{pascal}{marker}Op")
}

/// Parse an in-place expression such as `(x -> out), (y -> z)`.
fn parse_inplace_pairs(op_name: &str, raw: &str) -> Result<Vec<(String, String)>> {
    let mut pairs = Vec::new();
    for chunk in raw.split(')') {
        let chunk = chunk.trim().trim_start_matches(',').trim();
        let Some(chunk) = chunk.strip_prefix('(') else {
            if chunk.is_empty() {
                continue;
            }
            return Err(malformed_inplace(op_name, raw));
        };
        let Some((input, output)) = chunk.split_once("->") else {
            return Err(malformed_inplace(op_name, raw));
        };
        pairs.push((input.trim().to_string(), output.trim().to_string()));
    }
    if pairs.is_empty() {
        return Err(malformed_inplace(op_name, raw));
    }
    Ok(pairs)
}

fn malformed_inplace(op_name: &str, raw: &str) -> OpGenError {
    OpGenError::SchemaParse {
        path: op_name.to_string(),
        message: format!("malformed inplace expression '{raw}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{AttrDef, InputDef, OutputDef};

    fn tensor_input(name: &str) -> InputDef {
        InputDef {
            name: name.to_string(),
            typename: "Tensor".to_string(),
            optional: false,
            no_need_buffer: false,
        }
    }

    fn tensor_output(name: &str) -> OutputDef {
        OutputDef {
            name: name.to_string(),
            typename: "Tensor".to_string(),
            optional: false,
            intermediate: false,
            size: None,
        }
    }

    fn scale_schema() -> OpSchema {
        OpSchema {
            name: "scale".to_string(),
            inputs: vec![tensor_input("x")],
            outputs: vec![tensor_output("out")],
            attrs: vec![AttrDef {
                name: "scale".to_string(),
                typename: "Scalar".to_string(),
                default_value: Some("1.0".to_string()),
                data_type: Some("float".to_string()),
            }],
            infer_meta: None,
            inplace: Some("(x -> out)".to_string()),
        }
    }

    #[test]
    fn inplace_splits_into_two_models() {
        let models = build_models(&scale_schema(), None, "pd").unwrap();
        assert_eq!(models.len(), 2);
        assert_eq!(models[0].op_name, "scale");
        assert_eq!(models[0].class_name, "ScaleOp");
        assert_eq!(models[0].dialect_op_name, "pd.scale");
        assert!(models[0].inplace_pairs.is_empty());
        assert_eq!(models[1].op_name, "scale_");
        assert_eq!(models[1].class_name, "Scale_Op");
        assert_eq!(models[1].dialect_op_name, "pd.scale_");
        assert_eq!(
            models[1].inplace_pairs,
            vec![("x".to_string(), "out".to_string())]
        );
    }

    #[test]
    fn already_marked_name_yields_one_model() {
        let mut schema = scale_schema();
        schema.name = "scale_".to_string();
        let models = build_models(&schema, None, "pd").unwrap();
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].class_name, "Scale_Op");
    }

    #[test]
    fn no_inplace_yields_one_model() {
        let mut schema = scale_schema();
        schema.inplace = None;
        let models = build_models(&schema, None, "pd").unwrap();
        assert_eq!(models.len(), 1);
    }

    #[test]
    fn multi_word_names_are_pascal_cased() {
        assert_eq!(class_name_of("matmul_v2"), "MatmulV2Op");
        assert_eq!(class_name_of("add"), "AddOp");
        assert_eq!(class_name_of("scale_"), "Scale_Op");
    }

    #[test]
    fn unsupported_input_type_fails_hard() {
        let mut schema = scale_schema();
        schema.inputs[0].typename = "SelectedRows".to_string();
        let err = build_models(&schema, None, "pd").unwrap_err();
        match err {
            OpGenError::UnsupportedType { op, typename } => {
                assert_eq!(op, "scale");
                assert_eq!(typename, "SelectedRows");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unsupported_attr_type_fails_hard() {
        let mut schema = scale_schema();
        schema.attrs[0].typename = "complex128".to_string();
        let err = build_models(&schema, None, "pd").unwrap_err();
        assert!(matches!(err, OpGenError::UnsupportedType { .. }));
    }

    #[test]
    fn list_length_mismatch_fails_hard() {
        let mut parts = ModelParts::default();
        parts.input_names = vec!["x".to_string(), "y".to_string()];
        parts.input_kinds = vec![OperandKind::Tensor];
        parts.input_optionals = vec![false, false];
        parts.input_no_need_buffers = vec![false, false];
        let err = OperatorModel::from_parts("add", "pd", None, parts, None, Vec::new())
            .unwrap_err();
        assert!(matches!(
            err,
            OpGenError::ListLengthMismatch { what: "input", .. }
        ));
    }

    #[test]
    fn polymorphic_build_arg_uses_data_type_tag() {
        let models = build_models(&scale_schema(), None, "pd").unwrap();
        // data_type: float retargets the Scalar build argument.
        assert_eq!(models[0].attrs[0].build_arg_type, "float");
        assert_eq!(models[0].attrs[0].default_value.as_deref(), Some("1.0"));
    }

    #[test]
    fn polymorphic_build_arg_default_is_qualified() {
        let mut schema = scale_schema();
        schema.attrs[0].data_type = None;
        let models = build_models(&schema, None, "pd").unwrap();
        assert_eq!(models[0].attrs[0].build_arg_type, "const phi::Scalar&");
    }

    #[test]
    fn legacy_name_resolved_from_compat() {
        let compat = CompatEntry {
            op: "scale (scale_v1)".to_string(),
        };
        let models = build_models(&scale_schema(), Some(&compat), "pd").unwrap();
        assert_eq!(models[0].legacy_name.as_deref(), Some("scale_v1"));
        assert_eq!(models[1].legacy_name.as_deref(), Some("scale_v1"));
    }

    #[test]
    fn size_expression_requires_list_output() {
        let mut schema = scale_schema();
        schema.outputs[0].size = Some("x.size()".to_string());
        assert!(build_models(&schema, None, "pd").is_err());

        schema.outputs[0].typename = "Tensor[]".to_string();
        let models = build_models(&schema, None, "pd").unwrap();
        assert_eq!(models[0].outputs[0].size.as_deref(), Some("x.size()"));
    }

    #[test]
    fn interfaces_carry_op_info_capability() {
        let models = build_models(&scale_schema(), None, "pd").unwrap();
        assert_eq!(
            models[0].interfaces,
            vec!["paddle::dialect::GetOpInfoInterface"]
        );
        assert!(models[0].traits.is_empty());
    }
}
