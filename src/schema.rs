//! Schema loading
//!
//! Raw serde forms of the operator-schema and operator-compatibility YAML
//! documents, plus the loader that merges multiple schema documents into one
//! ordered record list. Records are immutable once parsed; the model builder
//! consumes them.

use serde::{Deserialize, Deserializer};
use std::fs;
use std::path::Path;

use crate::error::{OpGenError, Result};

/// One operator record, as written in the schema document.
#[derive(Clone, Debug, Deserialize)]
pub struct OpSchema {
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<InputDef>,
    #[serde(default)]
    pub outputs: Vec<OutputDef>,
    #[serde(default)]
    pub attrs: Vec<AttrDef>,
    #[serde(default)]
    pub infer_meta: Option<InferMetaDef>,
    #[serde(default)]
    pub inplace: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct InputDef {
    pub name: String,
    pub typename: String,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub no_need_buffer: bool,
}

/// Output record. `optional` and `intermediate` default to false when the
/// keys are absent; absence is not an error.
#[derive(Clone, Debug, Deserialize)]
pub struct OutputDef {
    pub name: String,
    pub typename: String,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub intermediate: bool,
    /// Dynamic-size expression, present only for list-typed outputs whose
    /// length is computed rather than fixed.
    #[serde(default)]
    pub size: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AttrDef {
    pub name: String,
    pub typename: String,
    /// Target-language literal expression, passed through verbatim.
    #[serde(default, deserialize_with = "de_literal")]
    pub default_value: Option<String>,
    /// Runtime-datatype tag for polymorphic kinds (Scalar, IntArray).
    #[serde(default)]
    pub data_type: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct InferMetaDef {
    #[serde(default)]
    pub func: Option<String>,
    #[serde(default)]
    pub param: Option<Vec<String>>,
}

/// One entry of the operator-compatibility document. The `op` key holds
/// either `phi_name` or `phi_name (fluid_name)`.
#[derive(Clone, Debug, Deserialize)]
pub struct CompatEntry {
    pub op: String,
}

impl CompatEntry {
    /// Split the `op` key into the phi name and the optional legacy name.
    pub fn names(&self) -> (String, Option<String>) {
        match self.op.split_once('(') {
            Some((phi, rest)) => (
                phi.trim().to_string(),
                Some(rest.trim().trim_end_matches(')').trim().to_string()),
            ),
            None => (self.op.trim().to_string(), None),
        }
    }
}

/// Load and merge operator-schema documents, preserving document order and
/// record order within each document. An empty document contributes nothing.
pub fn load_op_schemas<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<OpSchema>> {
    let mut records = Vec::new();
    for path in paths {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| OpGenError::SchemaParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let parsed: Option<Vec<OpSchema>> =
            serde_yaml::from_str(&text).map_err(|e| OpGenError::SchemaParse {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        if let Some(list) = parsed {
            tracing::debug!(path = %path.display(), records = list.len(), "loaded schema document");
            records.extend(list);
        }
    }
    Ok(records)
}

/// Load the operator-compatibility document.
pub fn load_compat(path: &Path) -> Result<Vec<CompatEntry>> {
    let text = fs::read_to_string(path).map_err(|e| OpGenError::SchemaParse {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let parsed: Option<Vec<CompatEntry>> =
        serde_yaml::from_str(&text).map_err(|e| OpGenError::SchemaParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
    Ok(parsed.unwrap_or_default())
}

/// Linear scan for the compatibility entry matching an operator's phi name.
/// First exact match wins. Both lists are small (hundreds of entries), so
/// O(records x entries) is acceptable.
pub fn find_compat<'a>(entries: &'a [CompatEntry], phi_name: &str) -> Option<&'a CompatEntry> {
    entries.iter().find(|e| e.names().0 == phi_name)
}

/// Accept any YAML scalar as a default-value literal and keep its textual
/// form. Schema authors write C++ literals (`1.0`, `false`, `{}`), which the
/// YAML parser may type as numbers or booleans.
fn de_literal<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_yaml::Value>::deserialize(deserializer)?;
    Ok(value.map(literal_text))
}

fn literal_text(value: serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_yaml(dir: &tempfile::TempDir, name: &str, text: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(text.as_bytes()).unwrap();
        path
    }

    #[test]
    fn merges_documents_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_yaml(
            &dir,
            "a.yaml",
            "- name: add\n  inputs: []\n  outputs: []\n  attrs: []\n",
        );
        let second = write_yaml(
            &dir,
            "b.yaml",
            "- name: scale\n  inputs: []\n  outputs: []\n  attrs: []\n",
        );

        let records = load_op_schemas(&[first, second]).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "add");
        assert_eq!(records[1].name, "scale");
    }

    #[test]
    fn empty_document_contributes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let empty = write_yaml(&dir, "empty.yaml", "");
        let records = load_op_schemas(&[empty]).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let bad = write_yaml(&dir, "bad.yaml", "- name: [unclosed\n");
        let err = load_op_schemas(&[bad]).unwrap_err();
        assert!(matches!(err, OpGenError::SchemaParse { .. }));
    }

    #[test]
    fn missing_document_is_a_parse_error() {
        let err = load_op_schemas(&[std::path::PathBuf::from("/nonexistent/ops.yaml")])
            .unwrap_err();
        assert!(matches!(err, OpGenError::SchemaParse { .. }));
    }

    #[test]
    fn output_flags_default_to_false() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_yaml(
            &dir,
            "ops.yaml",
            concat!(
                "- name: topk\n",
                "  inputs: []\n",
                "  outputs:\n",
                "    - {name: out, typename: Tensor}\n",
                "    - {name: indices, typename: Tensor, intermediate: true}\n",
                "  attrs: []\n",
            ),
        );
        let records = load_op_schemas(&[path]).unwrap();
        let outs = &records[0].outputs;
        assert!(!outs[0].optional);
        assert!(!outs[0].intermediate);
        assert!(outs[1].intermediate);
    }

    #[test]
    fn default_values_keep_their_textual_form() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_yaml(
            &dir,
            "ops.yaml",
            concat!(
                "- name: scale\n",
                "  inputs: []\n",
                "  outputs: []\n",
                "  attrs:\n",
                "    - {name: scale, typename: float, default_value: 1.0}\n",
                "    - {name: bias_after_scale, typename: bool, default_value: true}\n",
                "    - {name: shape, typename: \"int64_t[]\", default_value: \"{}\"}\n",
            ),
        );
        let records = load_op_schemas(&[path]).unwrap();
        let attrs = &records[0].attrs;
        assert_eq!(attrs[0].default_value.as_deref(), Some("1.0"));
        assert_eq!(attrs[1].default_value.as_deref(), Some("true"));
        assert_eq!(attrs[2].default_value.as_deref(), Some("{}"));
    }

    #[test]
    fn compat_entry_names() {
        let entry = CompatEntry {
            op: "matmul (matmul_v2)".to_string(),
        };
        let (phi, legacy) = entry.names();
        assert_eq!(phi, "matmul");
        assert_eq!(legacy.as_deref(), Some("matmul_v2"));

        let plain = CompatEntry {
            op: "abs".to_string(),
        };
        assert_eq!(plain.names(), ("abs".to_string(), None));
    }

    #[test]
    fn compat_lookup_first_match_wins() {
        let entries = vec![
            CompatEntry {
                op: "scale (scale_v1)".to_string(),
            },
            CompatEntry {
                op: "scale (scale_v2)".to_string(),
            },
        ];
        let hit = find_compat(&entries, "scale").unwrap();
        assert_eq!(hit.names().1.as_deref(), Some("scale_v1"));
        assert!(find_compat(&entries, "add").is_none());
    }
}
