//! Name/type resolution tables
//!
//! Schema-level logical types are resolved exactly once, during model
//! construction, into the closed enums below. The emitter only ever consumes
//! the resolved kinds; it never re-inspects type-name strings. Extending the
//! generator to a new logical type means adding one row here.

/// C++ container type wrapping list-typed operands and results.
pub const VECTOR_TYPE: &str = "ir::VectorType";

/// C++ container attribute wrapping list-typed attribute values.
pub const ARRAY_ATTRIBUTE: &str = "ir::ArrayAttribute";

/// Logical type of an operator input or output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperandKind {
    Tensor,
    TensorList,
}

impl OperandKind {
    /// Resolve a schema-level typename. `None` means the typename is outside
    /// the supported set and model construction must fail.
    pub fn from_typename(raw: &str) -> Option<Self> {
        match raw {
            "Tensor" => Some(Self::Tensor),
            "Tensor[]" => Some(Self::TensorList),
            _ => None,
        }
    }

    pub fn is_list(self) -> bool {
        matches!(self, Self::TensorList)
    }

    /// Fully resolved C++ type name, as recorded in op-info descriptors.
    pub fn cpp_type(self) -> &'static str {
        match self {
            Self::Tensor => "paddle::dialect::DenseTensorType",
            Self::TensorList => "ir::VectorType<paddle::dialect::DenseTensorType>",
        }
    }

    /// C++ type every element of a list-typed operand must satisfy.
    pub fn element_type(self) -> &'static str {
        "paddle::dialect::DenseTensorType"
    }

    /// Parameter type in the generated Build signature.
    pub fn build_arg_type(self) -> &'static str {
        match self {
            Self::Tensor => "ir::OpResult",
            Self::TensorList => "const std::vector<ir::OpResult>&",
        }
    }
}

/// Logical type of an operator attribute.
///
/// One variant per supported schema typename. `Scalar` and `IntArray` are the
/// polymorphic kinds: their build-argument type may be retargeted by the
/// attribute's `data_type` tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttrKind {
    IntArray,
    Scalar,
    ScalarInt,
    ScalarInt64,
    ScalarFloat,
    ScalarDouble,
    ScalarArray,
    Int,
    Int32,
    Int64,
    Long,
    SizeT,
    Float,
    Double,
    Bool,
    Str,
    IntList,
    Int32List,
    Int64List,
    FloatList,
    DoubleList,
    BoolList,
    StrList,
    Place,
    DataLayout,
    DataType,
}

impl AttrKind {
    pub fn from_typename(raw: &str) -> Option<Self> {
        match raw {
            "IntArray" => Some(Self::IntArray),
            "Scalar" => Some(Self::Scalar),
            "Scalar(int)" => Some(Self::ScalarInt),
            "Scalar(int64_t)" => Some(Self::ScalarInt64),
            "Scalar(float)" => Some(Self::ScalarFloat),
            "Scalar(double)" => Some(Self::ScalarDouble),
            "Scalar[]" => Some(Self::ScalarArray),
            "int" => Some(Self::Int),
            "int32_t" => Some(Self::Int32),
            "int64_t" => Some(Self::Int64),
            "long" => Some(Self::Long),
            "size_t" => Some(Self::SizeT),
            "float" => Some(Self::Float),
            "double" => Some(Self::Double),
            "bool" => Some(Self::Bool),
            "str" => Some(Self::Str),
            "int[]" => Some(Self::IntList),
            "int32_t[]" => Some(Self::Int32List),
            "int64_t[]" => Some(Self::Int64List),
            "float[]" => Some(Self::FloatList),
            "double[]" => Some(Self::DoubleList),
            "bool[]" => Some(Self::BoolList),
            "str[]" => Some(Self::StrList),
            "Place" => Some(Self::Place),
            "DataLayout" => Some(Self::DataLayout),
            "DataType" => Some(Self::DataType),
            _ => None,
        }
    }

    /// Fully resolved C++ attribute type, used in the attribute declaration
    /// table and in per-attribute verification checks.
    pub fn cpp_type(self) -> &'static str {
        match self {
            Self::IntArray => "paddle::dialect::IntArrayAttribute",
            Self::Scalar => "paddle::dialect::ScalarAttribute",
            Self::ScalarInt => "ir::Int32_tAttribute",
            Self::ScalarInt64 => "ir::Int64_tAttribute",
            Self::ScalarFloat => "ir::FloatAttribute",
            Self::ScalarDouble => "ir::DoubleAttribute",
            Self::ScalarArray => "ir::ArrayAttribute<paddle::dialect::ScalarAttribute>",
            Self::Int => "ir::Int32_tAttribute",
            Self::Int32 => "ir::Int32_tAttribute",
            Self::Int64 => "ir::Int64_tAttribute",
            Self::Long => "ir::Int64_tAttribute",
            Self::SizeT => "ir::Int64_tAttribute",
            Self::Float => "ir::FloatAttribute",
            Self::Double => "ir::DoubleAttribute",
            Self::Bool => "ir::BoolAttribute",
            Self::Str => "ir::StrAttribute",
            Self::IntList => "ir::ArrayAttribute<ir::Int32_tAttribute>",
            Self::Int32List => "ir::ArrayAttribute<ir::Int32_tAttribute>",
            Self::Int64List => "ir::ArrayAttribute<ir::Int64_tAttribute>",
            Self::FloatList => "ir::ArrayAttribute<ir::FloatAttribute>",
            Self::DoubleList => "ir::ArrayAttribute<ir::DoubleAttribute>",
            Self::BoolList => "ir::ArrayAttribute<ir::BoolAttribute>",
            Self::StrList => "ir::ArrayAttribute<ir::StrAttribute>",
            Self::Place => "paddle::dialect::PlaceAttribute",
            Self::DataLayout => "paddle::dialect::DataLayoutAttribute",
            Self::DataType => "paddle::dialect::DataTypeAttribute",
        }
    }

    /// Default parameter type in the generated Build signature, before any
    /// `data_type` retargeting and qualification.
    pub fn default_build_arg_type(self) -> &'static str {
        match self {
            Self::IntArray => "const std::vector<int64_t>&",
            Self::Scalar => "const Scalar&",
            Self::ScalarInt => "int",
            Self::ScalarInt64 => "int64_t",
            Self::ScalarFloat => "float",
            Self::ScalarDouble => "double",
            Self::ScalarArray => "const std::vector<Scalar>&",
            Self::Int => "int",
            Self::Int32 => "int32_t",
            Self::Int64 => "int64_t",
            Self::Long => "long",
            Self::SizeT => "size_t",
            Self::Float => "float",
            Self::Double => "double",
            Self::Bool => "bool",
            Self::Str => "const std::string&",
            Self::IntList => "const std::vector<int>&",
            Self::Int32List => "const std::vector<int32_t>&",
            Self::Int64List => "const std::vector<int64_t>&",
            Self::FloatList => "const std::vector<float>&",
            Self::DoubleList => "const std::vector<double>&",
            Self::BoolList => "const std::vector<bool>&",
            Self::StrList => "const std::vector<std::string>&",
            Self::Place => "const Place&",
            Self::DataLayout => "DataLayout",
            Self::DataType => "DataType",
        }
    }

    /// Element attribute type for list-typed attributes; `None` for scalar
    /// kinds. Verification emits a per-element check exactly when this is
    /// `Some`.
    pub fn element_type(self) -> Option<&'static str> {
        match self {
            Self::ScalarArray => Some("paddle::dialect::ScalarAttribute"),
            Self::IntList | Self::Int32List => Some("ir::Int32_tAttribute"),
            Self::Int64List => Some("ir::Int64_tAttribute"),
            Self::FloatList => Some("ir::FloatAttribute"),
            Self::DoubleList => Some("ir::DoubleAttribute"),
            Self::BoolList => Some("ir::BoolAttribute"),
            Self::StrList => Some("ir::StrAttribute"),
            _ => None,
        }
    }

    /// Whether the build-argument type may be replaced by the attribute's
    /// `data_type` tag.
    pub fn is_polymorphic(self) -> bool {
        matches!(self, Self::IntArray | Self::Scalar)
    }
}

/// Rewrite bare polymorphic type names in a build-argument type to their
/// fully-qualified runtime forms. Applied unconditionally, whether the type
/// came from a `data_type` tag or from the table default.
pub fn qualify_build_arg_type(raw: &str) -> String {
    if raw.contains("phi::") {
        return raw.to_string();
    }
    raw.replace("IntArray", "phi::IntArray")
        .replace("Scalar", "phi::Scalar")
}
