//! Pipeline orchestration for the view workflow.
//!
//! load → build → analyze → filter → render. Every stage runs to completion
//! before the next begins; output is rendered into memory and only then
//! handed to the sink, so a failure never leaves partial output behind.

mod output;
mod parse;
mod render_stage;

pub use output::{should_use_color, write_output, OutputTarget};
pub use parse::parse_sbom_with_context;
pub use render_stage::{render_document, validate_config, ViewOutcome};

/// Structured pipeline error types for better diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Configuration rejected before any input was read
    #[error("Invalid configuration: {errors}")]
    InvalidConfig { errors: String },

    /// Failed to read or parse an SBOM file
    #[error("Parse failed for {path}: {source}")]
    ParseFailed {
        path: String,
        source: anyhow::Error,
    },

    /// Rendering failed
    #[error("Render failed: {source}")]
    RenderFailed {
        #[source]
        source: anyhow::Error,
    },
}

/// Process exit codes
pub mod exit_codes {
    /// Success
    pub const SUCCESS: i32 = 0;
    /// An error occurred
    pub const ERROR: i32 = 1;
}
