//! Document loading stage.

use super::PipelineError;
use crate::model::SbomDocument;
use anyhow::Result;
use std::path::Path;

/// Parse an SBOM file with context for error messages
pub fn parse_sbom_with_context(path: &Path) -> Result<SbomDocument> {
    tracing::info!("Parsing SBOM: {}", path.display());

    let doc = crate::parsers::parse_sbom(path).map_err(|e| PipelineError::ParseFailed {
        path: path.display().to_string(),
        source: e.into(),
    })?;

    tracing::info!("Parsed {} components", doc.component_count());
    Ok(doc)
}
