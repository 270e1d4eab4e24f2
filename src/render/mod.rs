//! Output renderers for an analyzed graph.
//!
//! - Tree: nested text, primary component first, then islands
//! - Flat: one record per component, no nesting
//! - JSON: the complete graph as one structured document
//!
//! Renderers never mutate the graph and write to a caller-supplied sink.
//! The text renderers honor [`DisplayOptions`]; JSON output ignores them
//! and always contains every node.

mod flat;
mod json;
mod text;
mod tree;

pub use flat::FlatRenderer;
pub use json::{
    generate_output_schema, JsonComponent, JsonDependency, JsonDependencyRecord,
    JsonGraphDocument, JsonIsland, JsonRenderer,
};
pub use tree::TreeRenderer;

use crate::config::DisplayOptions;
use crate::graph::AnalyzedGraph;
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::io::Write;
use thiserror::Error;

/// Output format
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Nested tree text
    #[default]
    Tree,
    /// One line per component
    Flat,
    /// Complete structured JSON document
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tree => write!(f, "tree"),
            Self::Flat => write!(f, "flat"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Errors that can occur while rendering
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for RenderError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Trait for graph renderers
pub trait Renderer {
    /// Write the rendered graph to `writer`
    fn render(&self, graph: &AnalyzedGraph, writer: &mut dyn Write) -> Result<(), RenderError>;

    /// Render into a string
    fn render_to_string(&self, graph: &AnalyzedGraph) -> Result<String, RenderError> {
        let mut buf = Vec::new();
        self.render(graph, &mut buf)?;
        String::from_utf8(buf).map_err(|e| RenderError::Serialization(e.to_string()))
    }

    /// Get the format this renderer produces
    fn format(&self) -> OutputFormat;
}

/// Create a renderer for the given format
#[must_use]
pub fn create_renderer(
    format: OutputFormat,
    display: &DisplayOptions,
    use_color: bool,
) -> Box<dyn Renderer> {
    match format {
        OutputFormat::Tree => {
            let renderer = TreeRenderer::new(display.clone());
            if use_color {
                Box::new(renderer)
            } else {
                Box::new(renderer.no_color())
            }
        }
        OutputFormat::Flat => {
            let renderer = FlatRenderer::new(display.clone());
            if use_color {
                Box::new(renderer)
            } else {
                Box::new(renderer.no_color())
            }
        }
        OutputFormat::Json => Box::new(JsonRenderer::new()),
    }
}
