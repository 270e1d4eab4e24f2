//! Core SBOM document data structures.
//!
//! These types describe a document exactly as the producer declared it: nested
//! components, explicit dependency pairs and the cross-cutting vulnerability,
//! annotation and composition sections. They carry no derived state; the
//! [`crate::graph`] module builds the consolidated view from them.

use super::{ComponentType, DocumentMetadata, Hash, Property, Vulnerability};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parsed SBOM document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SbomDocument {
    /// Document-level metadata
    pub metadata: DocumentMetadata,
    /// Primary/root component (`CycloneDX` metadata.component)
    pub primary: Option<DocComponent>,
    /// Top-level components (each may nest further components)
    pub components: Vec<DocComponent>,
    /// Explicit dependency pairs
    pub dependencies: Vec<DependencyPair>,
    /// Vulnerabilities
    pub vulnerabilities: Vec<Vulnerability>,
    /// Annotations
    pub annotations: Vec<Annotation>,
    /// Compositions
    pub compositions: Vec<Composition>,
}

impl SbomDocument {
    /// Create an empty document with the given metadata
    #[must_use]
    pub fn new(metadata: DocumentMetadata) -> Self {
        Self {
            metadata,
            ..Default::default()
        }
    }

    /// Total number of components, including nested ones and the primary
    #[must_use]
    pub fn component_count(&self) -> usize {
        let nested: usize = self.components.iter().map(DocComponent::tree_size).sum();
        nested + self.primary.as_ref().map_or(0, DocComponent::tree_size)
    }

    /// Check whether the document has no components at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primary.is_none() && self.components.is_empty()
    }
}

/// Component as declared in the document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocComponent {
    /// Producer-assigned BOM reference
    pub bom_ref: Option<String>,
    /// Component type
    pub component_type: ComponentType,
    /// Component name
    pub name: String,
    /// Version string
    pub version: Option<String>,
    /// Package URL
    pub purl: Option<String>,
    /// CPE identifier
    pub cpe: Option<String>,
    /// Description
    pub description: Option<String>,
    /// Group/namespace (e.g., Maven groupId)
    pub group: Option<String>,
    /// Scope (required, optional, excluded)
    pub scope: Option<String>,
    /// Supplier name
    pub supplier: Option<String>,
    /// License identifiers or expressions
    pub licenses: Vec<String>,
    /// Cryptographic hashes
    pub hashes: Vec<Hash>,
    /// Key-value properties
    pub properties: Vec<Property>,
    /// Nested (assembly) components
    pub components: Vec<DocComponent>,
}

impl DocComponent {
    /// Create a component with a name and type
    #[must_use]
    pub fn new(name: impl Into<String>, component_type: ComponentType) -> Self {
        Self {
            name: name.into(),
            component_type,
            ..Default::default()
        }
    }

    /// Set the BOM reference
    #[must_use]
    pub fn with_bom_ref(mut self, bom_ref: impl Into<String>) -> Self {
        self.bom_ref = Some(bom_ref.into());
        self
    }

    /// Set the version
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set the PURL
    #[must_use]
    pub fn with_purl(mut self, purl: impl Into<String>) -> Self {
        self.purl = Some(purl.into());
        self
    }

    /// Append a nested component
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.components.push(child);
        self
    }

    /// Non-empty BOM reference, if any
    #[must_use]
    pub fn bom_ref(&self) -> Option<&str> {
        self.bom_ref.as_deref().filter(|r| !r.is_empty())
    }

    /// Number of components in this subtree, including self
    #[must_use]
    pub fn tree_size(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(comp) = stack.pop() {
            count += 1;
            stack.extend(comp.components.iter());
        }
        count
    }
}

/// Explicit dependency declaration: `reference` depends on each of `depends_on`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyPair {
    pub reference: String,
    pub depends_on: Vec<String>,
}

impl DependencyPair {
    /// Create a dependency pair
    #[must_use]
    pub fn new(reference: impl Into<String>, depends_on: Vec<String>) -> Self {
        Self {
            reference: reference.into(),
            depends_on,
        }
    }
}

/// Annotation/comment on one or more subjects
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Annotation {
    /// Annotation BOM reference
    pub bom_ref: Option<String>,
    /// References of the annotated subjects
    pub subjects: Vec<String>,
    /// Annotator name (person, organization, tool or component)
    pub annotator: String,
    /// Timestamp as written in the document
    pub timestamp: Option<String>,
    /// Annotation text
    pub text: String,
}

/// Completeness statement over a set of assemblies and dependencies
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Composition {
    /// Aggregate kind (complete, incomplete, unknown, ...)
    pub aggregate: String,
    /// References of the assemblies this composition describes
    pub assemblies: Vec<String>,
    /// References of the dependencies this composition describes
    pub dependencies: Vec<String>,
}
