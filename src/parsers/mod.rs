//! SBOM document loading.
//!
//! Parsing is an external concern for the graph engine: this module only
//! turns CycloneDX JSON into the plain [`SbomDocument`] model the builder
//! consumes. It performs no validation beyond what deserialization requires.
//!
//! ```no_run
//! use sbom_graph::parsers::parse_sbom;
//! use std::path::Path;
//!
//! let doc = parse_sbom(Path::new("bom.cdx.json")).unwrap();
//! println!("{} components", doc.component_count());
//! ```

mod cyclonedx;
mod traits;

pub use cyclonedx::CycloneDxParser;
pub use traits::{ParseError, SbomParser};

use crate::error::{ErrorContext, Result, SbomGraphError};
use crate::model::SbomDocument;
use std::path::Path;

/// Maximum SBOM file size (512 MB), checked before reading to prevent OOM.
const MAX_SBOM_FILE_SIZE: u64 = 512 * 1024 * 1024;

/// Read and parse an SBOM file.
///
/// Read failures keep the path; parse failures carry it as context.
/// Returns a validation error if the file exceeds [`MAX_SBOM_FILE_SIZE`].
pub fn parse_sbom(path: &Path) -> Result<SbomDocument> {
    let metadata = std::fs::metadata(path).map_err(|e| SbomGraphError::io(path, e))?;
    if metadata.len() > MAX_SBOM_FILE_SIZE {
        return Err(SbomGraphError::validation(format!(
            "{} is {} MB, exceeding the {} MB limit",
            path.display(),
            metadata.len() / (1024 * 1024),
            MAX_SBOM_FILE_SIZE / (1024 * 1024),
        )));
    }
    let content = std::fs::read_to_string(path).map_err(|e| SbomGraphError::io(path, e))?;
    parse_sbom_str(&content).with_context(|| path.display().to_string())
}

/// Parse SBOM from string content
pub fn parse_sbom_str(content: &str) -> std::result::Result<SbomDocument, ParseError> {
    let parser = CycloneDxParser::new();
    if !parser.can_parse(content) {
        return Err(ParseError::UnknownFormat(
            "expected a CycloneDX JSON document".to_string(),
        ));
    }
    parser.parse_str(content)
}
