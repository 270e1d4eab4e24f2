//! Configuration validation.
//!
//! Validation runs before any document is read, so an invalid configuration
//! never produces partial output.

use super::types::{DisplayOptions, FilterOptions, ViewConfig};
use crate::model::Severity;

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

impl Validatable for ViewConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.display.validate());
        errors.extend(self.filter.validate());

        if let Some(parent) = self.output.as_deref().and_then(std::path::Path::parent) {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                errors.push(ConfigError {
                    field: "output".to_string(),
                    message: format!("Parent directory does not exist: {}", parent.display()),
                });
            }
        }
        errors
    }
}

impl Validatable for DisplayOptions {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.max_depth < 0 {
            errors.push(ConfigError {
                field: "display.max_depth".to_string(),
                message: format!("Must be 0 (unlimited) or positive, got {}", self.max_depth),
            });
        }
        errors
    }
}

impl Validatable for FilterOptions {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if let Some(severity) = &self.min_severity {
            if Severity::from_name(severity).is_none() {
                errors.push(ConfigError {
                    field: "filter.min_severity".to_string(),
                    message: format!(
                        "Invalid severity '{}'. Valid options: {}",
                        severity,
                        Severity::NAMES.join(", ")
                    ),
                });
            }
        }
        if self.types.iter().any(|t| t.trim().is_empty()) {
            errors.push(ConfigError {
                field: "filter.types".to_string(),
                message: "Component type names must not be empty".to_string(),
            });
        }
        errors
    }
}
