//! View command handler.
//!
//! Implements the `view` subcommand for rendering a single SBOM.

use crate::config::ViewConfig;
use crate::pipeline::{
    exit_codes, parse_sbom_with_context, render_document, should_use_color, validate_config,
    write_output, OutputTarget,
};
use anyhow::Result;
use std::path::Path;

/// Run the view command
#[allow(clippy::needless_pass_by_value)]
pub fn run_view(config: ViewConfig, sbom_path: &Path) -> Result<i32> {
    validate_config(&config)?;

    let doc = parse_sbom_with_context(sbom_path)?;

    let target = OutputTarget::from_option(config.output.clone());
    let use_color = should_use_color(config.no_color, &target);
    let outcome = render_document(&doc, &config, use_color)?;

    for warning in &outcome.warnings {
        tracing::warn!("{warning}");
    }

    write_output(&outcome.output, &target)?;
    Ok(exit_codes::SUCCESS)
}
