//! Command-line argument parsing for dialect-opgen

use clap::Parser;
use std::path::PathBuf;

use dialect_opgen::GenerateOptions;

/// Generate C++ operator definitions for an IR dialect from YAML schemas
#[derive(Parser, Debug)]
#[command(name = "dialect-opgen")]
#[command(version, about = "Generate dialect operator definition files", long_about = None)]
pub struct Cli {
    /// Comma-separated operator schema YAML files, merged in order
    #[arg(long, value_name = "FILES")]
    pub op_yaml_files: String,

    /// Operator compatibility YAML file (phi name -> legacy name)
    #[arg(long, value_name = "FILE")]
    pub op_compat_yaml_file: PathBuf,

    /// Dialect prefix used in runtime operator names (e.g. "pd" -> "pd.add")
    #[arg(long, default_value = "pd")]
    pub dialect_name: String,

    /// Comma-separated namespaces wrapping the generated code, outermost first
    #[arg(long, value_name = "NAMESPACES")]
    pub namespaces: Option<String>,

    /// Output path of the declaration (.h) artifact
    #[arg(long, value_name = "FILE")]
    pub op_def_h_file: PathBuf,

    /// Output path of the definition (.cc) artifact
    #[arg(long, value_name = "FILE")]
    pub op_def_cc_file: PathBuf,

    /// Enable verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Initialize logging based on verbosity level
    pub fn init_logging(&self) {
        use tracing_subscriber::{fmt, EnvFilter};

        if self.quiet {
            return;
        }

        let level = match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

        fmt().with_env_filter(filter).with_target(false).init();
    }

    /// Split the comma-separated flags into generation options.
    pub fn into_options(self) -> GenerateOptions {
        GenerateOptions {
            op_yaml_files: split_list(&self.op_yaml_files)
                .into_iter()
                .map(PathBuf::from)
                .collect(),
            op_compat_yaml_file: self.op_compat_yaml_file,
            dialect_name: self.dialect_name,
            namespaces: self.namespaces.as_deref().map(split_list).unwrap_or_default(),
            op_def_h_file: self.op_def_h_file,
            op_def_cc_file: self.op_def_cc_file,
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
