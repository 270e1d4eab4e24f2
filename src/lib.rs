//! **Consolidated component graphs for Software Bills of Materials.**
//!
//! `sbom-graph` reads a CycloneDX document and reconciles its loosely linked
//! sections (nested components, dependency pairs, vulnerabilities,
//! annotations and compositions) into one graph with a single node per
//! component. The graph is then analyzed for disconnected "islands" and
//! cycle-safe depths, optionally filtered, and rendered as a tree, a flat
//! table, or a complete JSON document.
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: the parsed document ([`SbomDocument`]) exactly as written.
//! - **[`parsers`]**: CycloneDX JSON loading.
//! - **[`graph`]**: [`GraphBuilder`] joins the document into a
//!   [`ComponentGraph`]; [`analyze`] runs the island and depth passes and
//!   yields an [`AnalyzedGraph`], the only type renderers accept.
//! - **[`filter`]**: reduces an analyzed graph by type and vulnerability
//!   predicates.
//! - **[`render`]**: tree, flat and JSON renderers.
//! - **[`stats`]**: summary counts over a graph.
//! - **[`config`]**: view options, validation and config-file discovery.
//!
//! ## Getting Started
//!
//! ```no_run
//! use sbom_graph::{analyze, create_renderer, parse_sbom, DisplayOptions, GraphBuilder, OutputFormat};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let doc = parse_sbom(Path::new("bom.cdx.json"))?;
//!     let graph = analyze(GraphBuilder::new().build(&doc));
//!
//!     for warning in graph.warnings() {
//!         eprintln!("warning: {warning}");
//!     }
//!
//!     let renderer = create_renderer(OutputFormat::Tree, &DisplayOptions::default(), false);
//!     renderer.render(&graph, &mut std::io::stdout())?;
//!     Ok(())
//! }
//! ```
//!
//! ### Filtering
//!
//! ```no_run
//! use sbom_graph::{build_and_analyze, filter_graph, parse_sbom, FilterConfig, Severity};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let graph = build_and_analyze(&parse_sbom(Path::new("bom.cdx.json"))?);
//!     let config = FilterConfig {
//!         min_severity: Some(Severity::High),
//!         ..Default::default()
//!     };
//!     let filtered = filter_graph(&graph, &config);
//!     println!("{} of {} components", filtered.len(), graph.len());
//!     Ok(())
//! }
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::too_many_lines,
    // Display toggles are plain bools
    clippy::struct_excessive_bools,
    clippy::unused_self,
    clippy::similar_names
)]

pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod graph;
pub mod model;
pub mod parsers;
pub mod pipeline;
pub mod render;
pub mod stats;

// Re-export main types for convenience
pub use config::{ConfigError, DisplayOptions, FilterOptions, Validatable, ViewConfig};
pub use error::{ErrorContext, Result, SbomGraphError};
pub use filter::{filter_graph, FilterConfig};
pub use graph::{
    analyze, build_and_analyze, AnalyzedGraph, ComponentGraph, EnrichedComponent, GraphBuilder,
    NodeId,
};
pub use model::{ComponentType, SbomDocument, Severity};
pub use parsers::{parse_sbom, parse_sbom_str, SbomParser};
pub use render::{create_renderer, OutputFormat, RenderError, Renderer};
pub use stats::GraphStatistics;
