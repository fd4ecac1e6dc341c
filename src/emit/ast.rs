//! Structured form of the generated C++ documents
//!
//! The emitter lowers operator models into these nodes and the renderer turns
//! them into text. Keeping the intermediate tree explicit means the exact
//! textual conventions live in one place (the renderer) instead of being
//! scattered through string substitutions.

/// Whether an accessor reads an operand or a result slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessorKind {
    Operand,
    Result,
}

/// One generated accessor. Accessor N always corresponds to operand/result
/// slot N in the runtime representation; the positional coupling is
/// load-bearing for every downstream consumer.
#[derive(Clone, Debug)]
pub struct Accessor {
    pub name: String,
    pub index: usize,
    pub kind: AccessorKind,
}

/// One parameter of the generated Build signature.
#[derive(Clone, Debug)]
pub struct BuildParam {
    pub cpp_type: String,
    pub name: String,
    pub default: Option<String>,
}

/// Class declaration block for one operator.
#[derive(Clone, Debug)]
pub struct OpClassDecl {
    pub class_name: String,
    pub dialect_op_name: String,
    pub interfaces: Vec<String>,
    pub traits: Vec<String>,
    pub attributes_num: usize,
    pub build_params: Vec<BuildParam>,
    pub accessors: Vec<Accessor>,
}

/// One row of the input-descriptor vector in GetOpInfo.
#[derive(Clone, Debug)]
pub struct InputInfoRow {
    pub name: String,
    pub cpp_type: String,
    pub optional: bool,
    pub no_need_buffer: bool,
}

/// One row of the output-descriptor vector in GetOpInfo.
#[derive(Clone, Debug)]
pub struct OutputInfoRow {
    pub name: String,
    pub cpp_type: String,
    pub optional: bool,
    pub intermediate: bool,
}

/// One row of the attribute-descriptor vector in GetOpInfo.
#[derive(Clone, Debug)]
pub struct AttrInfoRow {
    pub name: String,
    pub cpp_type: String,
    pub data_type: String,
}

/// Runtime-info row in GetOpInfo, from the schema's infer_meta block.
#[derive(Clone, Debug)]
pub struct RunTimeInfoRow {
    pub func: String,
    pub params: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct OpInfoFn {
    pub inputs: Vec<InputInfoRow>,
    pub attributes: Vec<AttrInfoRow>,
    pub outputs: Vec<OutputInfoRow>,
    pub run_time: RunTimeInfoRow,
}

/// Type check for one operand/result slot. The four rendered variants come
/// from the (optional, list) flags.
#[derive(Clone, Debug)]
pub struct OperandCheck {
    pub index: usize,
    pub optional: bool,
    /// Container element type for list slots, the slot type itself otherwise.
    pub cpp_type: String,
    pub list: bool,
}

/// Presence-and-type check for one attribute; list-typed attributes carry an
/// element type and get an additional per-element check.
#[derive(Clone, Debug)]
pub struct AttributeCheck {
    pub name: String,
    pub cpp_type: String,
    pub element_type: Option<String>,
}

#[derive(Clone, Debug)]
pub struct VerifyFn {
    pub input_checks: Vec<OperandCheck>,
    pub output_checks: Vec<OperandCheck>,
    pub attribute_checks: Vec<AttributeCheck>,
}

/// Definition block for one operator: attribute-name storage, op-info body,
/// verification body.
#[derive(Clone, Debug)]
pub struct OpDef {
    pub class_name: String,
    pub attribute_names: Vec<String>,
    pub info: OpInfoFn,
    pub verify: VerifyFn,
}

/// The whole pair of generated documents.
#[derive(Clone, Debug)]
pub struct Document {
    pub namespaces: Vec<String>,
    pub header_include: String,
    pub op_names: Vec<String>,
    pub decls: Vec<OpClassDecl>,
    pub defs: Vec<OpDef>,
}
