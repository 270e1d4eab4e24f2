//! Configuration file loading and discovery.
//!
//! Supports loading a [`ViewConfig`] from YAML with automatic discovery.

use super::types::{DisplayOptions, ViewConfig};
use crate::render::OutputFormat;
use std::path::{Path, PathBuf};

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Standard config file names to search for.
pub const CONFIG_FILE_NAMES: &[&str] =
    &[".sbom-graph.yaml", ".sbom-graph.yml", "sbom-graph.yaml"];

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. User config directory (~/.config/sbom-graph/)
/// 4. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        if path.exists() {
            return Some(path.to_path_buf());
        }
    }

    if let Some(path) = std::env::current_dir()
        .ok()
        .and_then(|cwd| find_config_in_dir(&cwd))
    {
        return Some(path);
    }

    if let Some(path) = dirs::config_dir().and_then(|dir| find_config_in_dir(&dir.join("sbom-graph")))
    {
        return Some(path);
    }

    dirs::home_dir().and_then(|home| find_config_in_dir(&home))
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug)]
pub enum ConfigFileError {
    /// File not found
    NotFound(PathBuf),
    /// IO error reading file
    Io(std::io::Error),
    /// YAML parsing error
    Parse(serde_yaml::Error),
}

impl std::fmt::Display for ConfigFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => {
                write!(f, "Config file not found: {}", path.display())
            }
            Self::Io(e) => write!(f, "Failed to read config file: {e}"),
            Self::Parse(e) => write!(f, "Failed to parse config file: {e}"),
        }
    }
}

impl std::error::Error for ConfigFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigFileError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_yaml::Error> for ConfigFileError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Parse(err)
    }
}

/// Load a `ViewConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<ViewConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: ViewConfig = serde_yaml::from_str(&content)?;
    Ok(config)
}

/// Load config from a discovered file, or return the default.
///
/// An explicit path that cannot be loaded is an error; a discovered file
/// that cannot be loaded is logged and skipped.
pub fn load_or_default(
    explicit_path: Option<&Path>,
) -> Result<(ViewConfig, Option<PathBuf>), ConfigFileError> {
    if let Some(path) = explicit_path {
        return load_config_file(path).map(|config| (config, Some(path.to_path_buf())));
    }

    Ok(discover_config_file(None).map_or_else(
        || (ViewConfig::default(), None),
        |path| match load_config_file(&path) {
            Ok(config) => {
                tracing::debug!("loaded config from {}", path.display());
                (config, Some(path))
            }
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (ViewConfig::default(), None)
            }
        },
    ))
}

// ============================================================================
// Configuration Merging
// ============================================================================

impl ViewConfig {
    /// Merge another config into this one, with `other` taking precedence
    /// wherever it differs from the defaults.
    ///
    /// Used to layer CLI arguments over file config.
    pub fn merge(&mut self, other: &Self) {
        if other.format != OutputFormat::default() {
            self.format = other.format;
        }
        if other.output.is_some() {
            self.output.clone_from(&other.output);
        }
        self.no_color |= other.no_color;

        let defaults = DisplayOptions::default();
        let (mine, theirs) = (&mut self.display, &other.display);
        macro_rules! take_if_set {
            ($($field:ident),* $(,)?) => {
                $(
                    if theirs.$field != defaults.$field {
                        mine.$field = theirs.$field;
                    }
                )*
            };
        }
        take_if_set!(
            show_dependencies,
            show_vulnerabilities,
            show_annotations,
            show_compositions,
            show_properties,
            show_hashes,
            show_licenses,
            max_depth,
            collapse_islands,
            verbose,
            only_primary,
            show_only_licenses,
        );

        if !other.filter.types.is_empty() {
            self.filter.types.clone_from(&other.filter.types);
        }
        if other.filter.min_severity.is_some() {
            self.filter.min_severity.clone_from(&other.filter.min_severity);
        }
        self.filter.only_unresolved |= other.filter.only_unresolved;
    }
}

/// Generate an example configuration file.
#[must_use]
pub fn generate_example_config() -> String {
    r"# sbom-graph configuration file
# Place this file as .sbom-graph.yaml in your project root or ~/.config/sbom-graph/

# Output format: tree, flat, json
format: tree

# Disable colored output
no_color: false

display:
  show_dependencies: true
  show_vulnerabilities: true
  show_licenses: false
  show_hashes: false
  show_annotations: false
  show_compositions: false
  show_properties: false
  # 0 = unlimited
  max_depth: 0
  collapse_islands: false
  verbose: false

filter:
  # Keep only these component types
  # types: [library, framework]
  # Minimum vulnerability severity: none, low, medium, high, critical
  # min_severity: high
  only_unresolved: false
"
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_in_dir() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(".sbom-graph.yaml");
        std::fs::write(&config_path, "format: flat\n").unwrap();

        assert_eq!(find_config_in_dir(tmp.path()), Some(config_path));
    }

    #[test]
    fn test_find_config_in_dir_not_found() {
        let tmp = TempDir::new().unwrap();
        assert!(find_config_in_dir(tmp.path()).is_none());
    }

    #[test]
    fn test_load_config_file() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.yaml");
        std::fs::write(
            &config_path,
            "format: json\ndisplay:\n  max_depth: 4\nfilter:\n  min_severity: high\n",
        )
        .unwrap();

        let config = load_config_file(&config_path).unwrap();
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.display.max_depth, 4);
        assert_eq!(config.filter.min_severity.as_deref(), Some("high"));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config_file(Path::new("/nonexistent/config.yaml"));
        assert!(matches!(result, Err(ConfigFileError::NotFound(_))));
    }

    #[test]
    fn test_load_unknown_format_fails() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.yaml");
        std::fs::write(&config_path, "format: xml\n").unwrap();
        assert!(matches!(
            load_config_file(&config_path),
            Err(ConfigFileError::Parse(_))
        ));
    }

    #[test]
    fn test_explicit_path_errors_propagate() {
        let result = load_or_default(Some(Path::new("/nonexistent/config.yaml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_config_merge() {
        let mut base: ViewConfig =
            serde_yaml::from_str("display:\n  show_licenses: true\n  max_depth: 5\n").unwrap();
        let mut cli = ViewConfig::default();
        cli.format = OutputFormat::Flat;
        cli.display.show_dependencies = false;
        cli.display.max_depth = 2;

        base.merge(&cli);
        assert_eq!(base.format, OutputFormat::Flat);
        assert!(base.display.show_licenses);
        assert!(!base.display.show_dependencies);
        assert_eq!(base.display.max_depth, 2);
    }

    #[test]
    fn test_generate_example_config_parses() {
        let config: ViewConfig = serde_yaml::from_str(&generate_example_config()).unwrap();
        assert_eq!(config, ViewConfig::default());
    }

    #[test]
    fn test_discover_explicit_path() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("custom.yaml");
        std::fs::write(&config_path, "").unwrap();
        assert_eq!(discover_config_file(Some(&config_path)), Some(config_path));
    }
}
