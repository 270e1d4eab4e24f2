//! Configuration for sbom-graph.
//!
//! - [`ViewConfig`]: every option of a view invocation, serde-loadable
//! - validation through [`Validatable`], run before any document is read
//! - YAML config file discovery and CLI merging ([`file`])
//!
//! # Configuration File
//!
//! Place a `.sbom-graph.yaml` file in your project root or
//! `~/.config/sbom-graph/`:
//!
//! ```yaml
//! format: tree
//! display:
//!   show_licenses: true
//!   max_depth: 3
//! filter:
//!   min_severity: high
//! ```

pub mod file;
mod types;
mod validation;

pub use file::{
    discover_config_file, generate_example_config, load_config_file, load_or_default,
    ConfigFileError, CONFIG_FILE_NAMES,
};
pub use types::{DisplayOptions, FilterOptions, ViewConfig, ViewConfigBuilder};
pub use validation::{ConfigError, Validatable};

/// Generate a JSON Schema for the config file format.
pub fn generate_json_schema() -> Result<String, serde_json::Error> {
    let schema = schemars::schema_for!(ViewConfig);
    serde_json::to_string_pretty(&schema)
}
