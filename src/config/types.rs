//! Configuration types for the view command.

use crate::filter::FilterConfig;
use crate::model::Severity;
use crate::render::OutputFormat;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete configuration of one view invocation.
///
/// Loadable from a YAML config file; CLI flags are layered on top with
/// [`ViewConfig::merge`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ViewConfig {
    /// Output format
    pub format: OutputFormat,
    /// Output file path (None for stdout)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    /// Disable colored output
    pub no_color: bool,
    /// What the text renderers show
    pub display: DisplayOptions,
    /// Which components are kept
    pub filter: FilterOptions,
}

impl ViewConfig {
    /// Create a `ViewConfig` builder.
    pub fn builder() -> ViewConfigBuilder {
        ViewConfigBuilder::default()
    }

    /// Filter criteria derived from this configuration.
    ///
    /// Call after validation; an unrecognized severity name is ignored here.
    #[must_use]
    pub fn filter_config(&self) -> FilterConfig {
        FilterConfig {
            types: self.filter.types.clone(),
            min_severity: self
                .filter
                .min_severity
                .as_deref()
                .and_then(Severity::from_name),
            only_unresolved: self.filter.only_unresolved,
            max_depth: self.display.depth_limit(),
        }
    }
}

/// Display toggles and limits for the text renderers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DisplayOptions {
    /// Show dependency blocks and dependency subtrees
    pub show_dependencies: bool,
    /// Show vulnerability blocks
    pub show_vulnerabilities: bool,
    /// Show annotation blocks
    pub show_annotations: bool,
    /// Show composition blocks
    pub show_compositions: bool,
    /// Show property blocks
    pub show_properties: bool,
    /// Show hash blocks
    pub show_hashes: bool,
    /// Show license blocks
    pub show_licenses: bool,
    /// Maximum tree depth below a render root (0 = unlimited)
    pub max_depth: i64,
    /// Hide islands in text output
    pub collapse_islands: bool,
    /// Show every entry of every block and every island member
    pub verbose: bool,
    /// Render only the primary component's tree
    pub only_primary: bool,
    /// Suppress every detail block except licenses
    pub show_only_licenses: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            show_dependencies: true,
            show_vulnerabilities: true,
            show_annotations: false,
            show_compositions: false,
            show_properties: false,
            show_hashes: false,
            show_licenses: false,
            max_depth: 0,
            collapse_islands: false,
            verbose: false,
            only_primary: false,
            show_only_licenses: false,
        }
    }
}

impl DisplayOptions {
    /// Everything shown, verbose
    #[must_use]
    pub fn all() -> Self {
        Self {
            show_annotations: true,
            show_compositions: true,
            show_properties: true,
            show_hashes: true,
            show_licenses: true,
            verbose: true,
            ..Self::default()
        }
    }

    /// Depth limit, `None` when unlimited
    #[must_use]
    pub fn depth_limit(&self) -> Option<usize> {
        usize::try_from(self.max_depth).ok().filter(|&d| d > 0)
    }

    /// Whether islands are left out of text output
    #[must_use]
    pub const fn hides_islands(&self) -> bool {
        self.collapse_islands || self.only_primary
    }
}

/// Component selection criteria as configured
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct FilterOptions {
    /// Keep only these component types (case-insensitive)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,
    /// Keep only components with a vulnerability at or above this severity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_severity: Option<String>,
    /// Keep only components with an unresolved vulnerability
    pub only_unresolved: bool,
}

// ============================================================================
// Builder for ViewConfig
// ============================================================================

/// Builder for constructing `ViewConfig` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct ViewConfigBuilder {
    config: ViewConfig,
}

impl ViewConfigBuilder {
    /// Set the output format.
    pub const fn format(mut self, format: OutputFormat) -> Self {
        self.config.format = format;
        self
    }

    /// Set the output file.
    pub fn output(mut self, file: Option<PathBuf>) -> Self {
        self.config.output = file;
        self
    }

    /// Disable colored output.
    pub const fn no_color(mut self, no_color: bool) -> Self {
        self.config.no_color = no_color;
        self
    }

    /// Replace the display options.
    pub fn display(mut self, display: DisplayOptions) -> Self {
        self.config.display = display;
        self
    }

    /// Set the maximum render depth.
    pub const fn max_depth(mut self, depth: i64) -> Self {
        self.config.display.max_depth = depth;
        self
    }

    /// Hide islands in text output.
    pub const fn collapse_islands(mut self, collapse: bool) -> Self {
        self.config.display.collapse_islands = collapse;
        self
    }

    /// Keep only the given component types.
    pub fn types(mut self, types: Vec<String>) -> Self {
        self.config.filter.types = types;
        self
    }

    /// Keep only components with a vulnerability at or above this severity.
    pub fn min_severity(mut self, severity: Option<String>) -> Self {
        self.config.filter.min_severity = severity;
        self
    }

    /// Keep only components with an unresolved vulnerability.
    pub const fn only_unresolved(mut self, only: bool) -> Self {
        self.config.filter.only_unresolved = only;
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> ViewConfig {
        self.config
    }
}
