//! Unified error types for sbom-graph.
//!
//! Structural problems in a document (dangling references, missing primary
//! component) are never errors; they are collected as warnings on the graph.
//! The errors here cover what aborts a run before any output is produced.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for sbom-graph operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SbomGraphError {
    /// Errors during document parsing
    #[error("Failed to parse SBOM: {context}")]
    Parse {
        context: String,
        #[source]
        source: ParseErrorKind,
    },

    /// Errors during rendering
    #[error("Rendering failed: {context}")]
    Render {
        context: String,
        #[source]
        source: RenderErrorKind,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Specific parse error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ParseErrorKind {
    #[error("Unknown SBOM format - expected CycloneDX markers")]
    UnknownFormat,

    #[error("Invalid JSON structure: {0}")]
    InvalidJson(String),

    #[error("Missing required field: {field} in {context}")]
    MissingField { field: String, context: String },
}

/// Specific render error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RenderErrorKind {
    #[error("Output write failed: {0}")]
    Write(String),

    #[error("JSON serialization failed: {0}")]
    JsonSerialization(String),
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for sbom-graph operations
pub type Result<T> = std::result::Result<T, SbomGraphError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl SbomGraphError {
    /// Create a parse error with context
    pub fn parse(context: impl Into<String>, source: ParseErrorKind) -> Self {
        Self::Parse {
            context: context.into(),
            source,
        }
    }

    /// Create a parse error for missing field
    pub fn missing_field(field: impl Into<String>, context: impl Into<String>) -> Self {
        Self::parse(
            "missing required field",
            ParseErrorKind::MissingField {
                field: field.into(),
                context: context.into(),
            },
        )
    }

    /// Create a render error with context
    pub fn render(context: impl Into<String>, source: RenderErrorKind) -> Self {
        Self::Render {
            context: context.into(),
            source,
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<crate::parsers::ParseError> for SbomGraphError {
    fn from(err: crate::parsers::ParseError) -> Self {
        use crate::parsers::ParseError;
        match err {
            ParseError::IoError(msg) => Self::Io {
                path: None,
                message: msg.clone(),
                source: std::io::Error::other(msg),
            },
            ParseError::JsonError(msg) => {
                Self::parse("CycloneDX JSON", ParseErrorKind::InvalidJson(msg))
            }
            ParseError::UnknownFormat(msg) => Self::parse(msg, ParseErrorKind::UnknownFormat),
            ParseError::MissingField(field) => Self::missing_field(field, "document"),
        }
    }
}

impl From<crate::render::RenderError> for SbomGraphError {
    fn from(err: crate::render::RenderError) -> Self {
        use crate::render::RenderError;
        match err {
            RenderError::Io(e) => Self::render("writing output", RenderErrorKind::Write(e.to_string())),
            RenderError::Serialization(msg) => {
                Self::render("JSON output", RenderErrorKind::JsonSerialization(msg))
            }
        }
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// The context string is prepended to any existing context, so nested calls
/// read outermost first: `"loading document: parsing metadata: ..."`.
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, evaluated only on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<SbomGraphError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
fn add_context_to_error(err: SbomGraphError, new_ctx: &str) -> SbomGraphError {
    match err {
        SbomGraphError::Parse {
            context: existing,
            source,
        } => SbomGraphError::Parse {
            context: chain_context(new_ctx, &existing),
            source,
        },
        SbomGraphError::Render {
            context: existing,
            source,
        } => SbomGraphError::Render {
            context: chain_context(new_ctx, &existing),
            source,
        },
        SbomGraphError::Io {
            path,
            message,
            source,
        } => SbomGraphError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        SbomGraphError::Validation(msg) => {
            SbomGraphError::Validation(chain_context(new_ctx, &msg))
        }
    }
}

/// Chain two context strings together.
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}
