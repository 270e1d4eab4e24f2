//! Schema command handler.

use crate::pipeline::{exit_codes, write_output, OutputTarget};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Which JSON Schema to print
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    /// The JSON output document
    Output,
    /// The YAML config file
    Config,
}

/// Generate a JSON Schema and write it to stdout or a file
pub fn run_schema(kind: SchemaKind, output: Option<PathBuf>) -> Result<i32> {
    let schema = match kind {
        SchemaKind::Output => crate::render::generate_output_schema(),
        SchemaKind::Config => crate::config::generate_json_schema(),
    }
    .context("failed to generate schema")?;

    write_output(&format!("{schema}\n"), &OutputTarget::from_option(output))?;
    Ok(exit_codes::SUCCESS)
}
