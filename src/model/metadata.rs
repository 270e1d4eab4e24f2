//! Metadata structures for SBOM documents and components.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// SBOM format type
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum SbomFormat {
    #[default]
    CycloneDx,
    Spdx,
}

impl std::fmt::Display for SbomFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CycloneDx => write!(f, "CycloneDX"),
            Self::Spdx => write!(f, "SPDX"),
        }
    }
}

/// Document-level metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DocumentMetadata {
    /// SBOM format type
    pub format: SbomFormat,
    /// Specification version (e.g., "1.5" for `CycloneDX`)
    pub spec_version: String,
    /// Serial number or document namespace
    pub serial_number: Option<String>,
    /// Document revision
    pub version: Option<u32>,
    /// Creation timestamp
    pub timestamp: Option<DateTime<Utc>>,
    /// Tools that produced the document
    pub tools: Vec<Tool>,
    /// Document authors
    pub authors: Vec<Contact>,
    /// Supplier of the described product
    pub supplier: Option<Organization>,
    /// Manufacturer of the described product
    pub manufacturer: Option<Organization>,
    /// Licenses that apply to the document itself
    pub licenses: Vec<String>,
}

impl DocumentMetadata {
    /// One-line description used as the header of text output
    #[must_use]
    pub fn headline(&self) -> String {
        let mut line = if self.spec_version.is_empty() {
            self.format.to_string()
        } else {
            format!("{} {}", self.format, self.spec_version)
        };
        if let Some(serial) = &self.serial_number {
            line.push_str(&format!(" ({serial})"));
        }
        line
    }
}

/// Tool that produced the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Tool {
    /// Tool vendor
    pub vendor: Option<String>,
    /// Tool name
    pub name: String,
    /// Tool version
    pub version: Option<String>,
}

impl std::fmt::Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.version {
            Some(v) => write!(f, "{} {v}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Organization/supplier information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Organization {
    /// Organization name
    pub name: String,
    /// Contact URLs
    pub urls: Vec<String>,
    /// Contact persons
    pub contacts: Vec<Contact>,
}

impl Organization {
    /// Create a new organization with just a name
    #[must_use]
    pub const fn new(name: String) -> Self {
        Self {
            name,
            urls: Vec::new(),
            contacts: Vec::new(),
        }
    }
}

/// Contact information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Contact {
    /// Contact name
    pub name: Option<String>,
    /// Email address
    pub email: Option<String>,
    /// Phone number
    pub phone: Option<String>,
}

/// Component type classification
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
#[non_exhaustive]
pub enum ComponentType {
    Application,
    Framework,
    #[default]
    Library,
    Container,
    Platform,
    OperatingSystem,
    Device,
    DeviceDriver,
    Firmware,
    File,
    MachineLearningModel,
    Data,
    Cryptographic,
    Other(String),
}

impl ComponentType {
    /// Parse a `CycloneDX` component type string (case-insensitive)
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "application" => Self::Application,
            "framework" => Self::Framework,
            "library" => Self::Library,
            "container" => Self::Container,
            "platform" => Self::Platform,
            "operating-system" => Self::OperatingSystem,
            "device" => Self::Device,
            "device-driver" => Self::DeviceDriver,
            "firmware" => Self::Firmware,
            "file" => Self::File,
            "machine-learning-model" => Self::MachineLearningModel,
            "data" => Self::Data,
            "cryptographic-asset" | "cryptographic" => Self::Cryptographic,
            _ => Self::Other(value.to_string()),
        }
    }

    /// Case-insensitive comparison against a type name given by the user
    #[must_use]
    pub fn matches_name(&self, name: &str) -> bool {
        self.to_string().eq_ignore_ascii_case(name.trim())
    }
}

impl std::fmt::Display for ComponentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Application => write!(f, "application"),
            Self::Framework => write!(f, "framework"),
            Self::Library => write!(f, "library"),
            Self::Container => write!(f, "container"),
            Self::Platform => write!(f, "platform"),
            Self::OperatingSystem => write!(f, "operating-system"),
            Self::Device => write!(f, "device"),
            Self::DeviceDriver => write!(f, "device-driver"),
            Self::Firmware => write!(f, "firmware"),
            Self::File => write!(f, "file"),
            Self::MachineLearningModel => write!(f, "machine-learning-model"),
            Self::Data => write!(f, "data"),
            Self::Cryptographic => write!(f, "cryptographic-asset"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

impl From<String> for ComponentType {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<ComponentType> for String {
    fn from(value: ComponentType) -> Self {
        value.to_string()
    }
}

impl JsonSchema for ComponentType {
    fn schema_name() -> String {
        "ComponentType".to_string()
    }

    fn json_schema(gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
        String::json_schema(gen)
    }
}

/// Cryptographic hash
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Hash {
    /// Hash algorithm as written in the document (e.g. "SHA-256")
    pub algorithm: String,
    /// Hash value (hex encoded)
    pub value: String,
}

impl Hash {
    /// Create a new hash
    #[must_use]
    pub const fn new(algorithm: String, value: String) -> Self {
        Self { algorithm, value }
    }
}

impl std::fmt::Display for Hash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.algorithm, self.value)
    }
}

/// Key-value property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Property {
    pub name: String,
    pub value: String,
}

impl std::fmt::Display for Property {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {}", self.name, self.value)
    }
}
