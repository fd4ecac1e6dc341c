//! Operator-definition code generator for an IR dialect
//!
//! Reads declarative YAML operator schemas plus an operator-compatibility
//! document and synthesizes C++ operator classes: declarations, attribute
//! tables, build signatures, op-info introspection functions, and runtime
//! verification functions.
//!
//! # Architecture
//!
//! ```text
//! YAML schema documents + compat document
//!     ↓
//! 1. Load    → ordered raw records          (schema)
//! 2. Build   → one model per operator,
//!              two for in-place pairs       (model, types)
//! 3. Emit    → structured C++ document tree,
//!              rendered to two text blobs   (emit)
//! 4. Write   → delete stale artifacts,
//!              write fresh ones             (writer)
//! ```
//!
//! The pipeline is a single-pass, single-threaded batch transform: the same
//! inputs always produce byte-identical artifacts.
//!
//! # Example
//!
//! ```no_run
//! use dialect_opgen::{generate, GenerateOptions};
//!
//! let options = GenerateOptions {
//!     op_yaml_files: vec!["ops.yaml".into()],
//!     op_compat_yaml_file: "op_compat.yaml".into(),
//!     dialect_name: "pd".to_string(),
//!     namespaces: vec!["paddle".to_string(), "dialect".to_string()],
//!     op_def_h_file: "pd_op.h".into(),
//!     op_def_cc_file: "pd_op.cc".into(),
//! };
//! generate(&options)?;
//! # Ok::<(), dialect_opgen::OpGenError>(())
//! ```

pub mod emit;
pub mod error;
pub mod model;
pub mod schema;
pub mod types;
pub mod writer;

pub use emit::{Emitter, GeneratedArtifacts};
pub use error::{OpGenError, Result};
pub use model::{build_models, OperatorModel};

use std::path::PathBuf;

/// Everything one generation run needs.
#[derive(Clone, Debug)]
pub struct GenerateOptions {
    /// Operator schema documents, merged in this order.
    pub op_yaml_files: Vec<PathBuf>,
    /// Operator compatibility document (phi name -> legacy name).
    pub op_compat_yaml_file: PathBuf,
    /// Dialect prefix for runtime operator names (`pd` -> `pd.add`).
    pub dialect_name: String,
    /// Namespaces wrapping the generated code, outermost first.
    pub namespaces: Vec<String>,
    /// Output path of the declaration artifact.
    pub op_def_h_file: PathBuf,
    /// Output path of the definition artifact.
    pub op_def_cc_file: PathBuf,
}

/// Summary of a completed run.
#[derive(Clone, Copy, Debug)]
pub struct GenerateSummary {
    /// Number of operator models emitted (in-place variants included).
    pub op_count: usize,
}

/// Run the whole pipeline: load, build, emit, write.
pub fn generate(options: &GenerateOptions) -> Result<GenerateSummary> {
    let records = schema::load_op_schemas(&options.op_yaml_files)?;
    let compat = schema::load_compat(&options.op_compat_yaml_file)?;
    tracing::info!(
        records = records.len(),
        compat_entries = compat.len(),
        "loaded operator schemas"
    );

    let mut models = Vec::with_capacity(records.len());
    for record in &records {
        let entry = schema::find_compat(&compat, &record.name);
        models.extend(build_models(record, entry, &options.dialect_name)?);
    }

    let artifacts = Emitter::new()
        .with_namespaces(options.namespaces.clone())
        .with_header_include(options.op_def_h_file.display().to_string())
        .emit(&models);

    writer::write_artifacts(&options.op_def_h_file, &options.op_def_cc_file, &artifacts)?;

    Ok(GenerateSummary {
        op_count: models.len(),
    })
}
