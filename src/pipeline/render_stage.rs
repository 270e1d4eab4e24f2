//! Graph construction, filtering and rendering stage.

use super::PipelineError;
use crate::config::{Validatable, ViewConfig};
use crate::error::ErrorContext;
use crate::filter::filter_graph;
use crate::graph::build_and_analyze;
use crate::model::SbomDocument;
use crate::render::create_renderer;
use crate::stats::GraphStatistics;
use anyhow::Result;

/// Result of rendering one document
#[derive(Debug, Clone)]
pub struct ViewOutcome {
    /// Complete rendered output
    pub output: String,
    /// Structural warnings collected while building the graph
    pub warnings: Vec<String>,
    /// Statistics over the rendered (possibly filtered) graph
    pub statistics: GraphStatistics,
}

/// Reject an invalid configuration before any input is read
pub fn validate_config(config: &ViewConfig) -> Result<(), PipelineError> {
    let errors = config.validate();
    if errors.is_empty() {
        return Ok(());
    }
    let errors = errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    Err(PipelineError::InvalidConfig { errors })
}

/// Build, analyze, filter and render a document into memory
pub fn render_document(
    doc: &SbomDocument,
    config: &ViewConfig,
    use_color: bool,
) -> Result<ViewOutcome, PipelineError> {
    let graph = build_and_analyze(doc);
    let filter = config.filter_config();
    let view = filter_graph(&graph, &filter);
    if view.len() != graph.len() {
        tracing::info!(
            "Filtered to {} components (removed {})",
            view.len(),
            graph.len() - view.len()
        );
    }

    let renderer = create_renderer(config.format, &config.display, use_color);
    let output = renderer
        .render_to_string(&view)
        .with_context(|| format!("{} output", config.format))
        .map_err(|e| PipelineError::RenderFailed { source: e.into() })?;
    tracing::debug!(bytes = output.len(), format = %config.format, "rendered");

    Ok(ViewOutcome {
        output,
        warnings: graph.warnings().to_vec(),
        statistics: GraphStatistics::from_graph(&view),
    })
}
