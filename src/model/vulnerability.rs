//! Vulnerability, severity and analysis-state types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Vulnerability severity, ordered from least to most severe.
///
/// `Unknown` covers missing or unrecognized severity strings. It ranks below
/// `None` so it never satisfies a minimum-severity threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Unknown,
    None,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Names accepted by [`Severity::from_name`]
    pub const NAMES: [&'static str; 5] = ["none", "low", "medium", "high", "critical"];

    /// Parse a recognized severity name (case-insensitive).
    ///
    /// Returns `None` for anything that is not one of [`Severity::NAMES`]
    /// (or the `info` alias for `none`).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "critical" => Some(Self::Critical),
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            "none" | "info" | "informational" => Some(Self::None),
            _ => None,
        }
    }

    /// Parse a severity string from a document, mapping unrecognized values to `Unknown`
    #[must_use]
    pub fn parse_lenient(name: &str) -> Self {
        Self::from_name(name).unwrap_or(Self::Unknown)
    }

    /// Derive a severity from a CVSS base score
    #[must_use]
    pub fn from_cvss(score: f32) -> Self {
        if score >= 9.0 {
            Self::Critical
        } else if score >= 7.0 {
            Self::High
        } else if score >= 4.0 {
            Self::Medium
        } else if score > 0.0 {
            Self::Low
        } else {
            Self::None
        }
    }

    /// Numeric rank: none=0, low=1, medium=2, high=3, critical=4, unknown=-1
    #[must_use]
    pub const fn rank(self) -> i8 {
        match self {
            Self::Unknown => -1,
            Self::None => 0,
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
            Self::Critical => 4,
        }
    }

    /// Check if this severity is at or above `minimum`
    #[must_use]
    pub const fn meets(self, minimum: Self) -> bool {
        self.rank() >= minimum.rank()
    }

    /// Lowercase label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::None => "none",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl PartialOrd for Severity {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Severity {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank().cmp(&other.rank())
    }
}

/// Severity rating attached to a vulnerability
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Rating {
    /// Severity string as written in the document
    pub severity: Option<String>,
    /// Numeric score (e.g. CVSS base score)
    pub score: Option<f32>,
    /// Scoring method (e.g. "CVSSv31")
    pub method: Option<String>,
    /// Vector string
    pub vector: Option<String>,
}

/// Impact analysis (VEX) attached to a vulnerability
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Analysis {
    /// Analysis state (e.g. `resolved`, `exploitable`, `in_triage`)
    pub state: Option<String>,
    /// Justification for a `not_affected` state
    pub justification: Option<String>,
    /// Free-form detail
    pub detail: Option<String>,
}

/// Analysis states that count as resolved
const RESOLVED_STATES: [&str; 4] = [
    "resolved",
    "resolved_with_pedigree",
    "false_positive",
    "not_affected",
];

/// A vulnerability as declared in the document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Vulnerability {
    /// Vulnerability identifier (CVE, GHSA, ...)
    pub id: String,
    /// Source database name
    pub source: Option<String>,
    /// Severity ratings
    pub ratings: Vec<Rating>,
    /// Description
    pub description: Option<String>,
    /// Impact analysis
    pub analysis: Option<Analysis>,
    /// References of the affected components
    pub affects: Vec<String>,
    /// Publication timestamp as written in the document
    pub published: Option<String>,
    /// Last update timestamp as written in the document
    pub updated: Option<String>,
}

impl Vulnerability {
    /// Create a vulnerability with just an identifier
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Effective severity.
    ///
    /// First rating with a severity string wins; otherwise the highest score
    /// is converted; otherwise `Unknown`.
    #[must_use]
    pub fn severity(&self) -> Severity {
        if let Some(named) = self.ratings.iter().find_map(|r| r.severity.as_deref()) {
            return Severity::parse_lenient(named);
        }
        self.ratings
            .iter()
            .filter_map(|r| r.score)
            .fold(None, |max: Option<f32>, s| Some(max.map_or(s, |m| m.max(s))))
            .map_or(Severity::Unknown, Severity::from_cvss)
    }

    /// Whether the analysis state marks this vulnerability as resolved
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.analysis
            .as_ref()
            .and_then(|a| a.state.as_deref())
            .is_some_and(|state| {
                let state = state.to_ascii_lowercase();
                RESOLVED_STATES.contains(&state.as_str())
            })
    }
}
