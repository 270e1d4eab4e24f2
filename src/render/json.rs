//! JSON renderer.
//!
//! Converts the graph into a pointer-free document: parent, children and
//! dependency targets become primary keys. The document always holds every
//! node, whatever the display options say.

use super::{OutputFormat, RenderError, Renderer};
use crate::graph::AnalyzedGraph;
use crate::model::{
    Annotation, ComponentType, Composition, DocumentMetadata, Hash, Property, Vulnerability,
};
use crate::stats::GraphStatistics;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// The complete JSON output document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct JsonGraphDocument {
    pub metadata: DocumentMetadata,
    /// Primary key of the primary component
    pub primary: Option<String>,
    /// Every node in insertion order
    pub components: Vec<JsonComponent>,
    /// Declared dependency pairs as written in the document
    pub dependencies: Vec<JsonDependency>,
    /// Islands ordered by number, members as primary keys
    pub islands: Vec<JsonIsland>,
    /// Annotations that refer to no single component
    pub annotations: Vec<Annotation>,
    /// Compositions that refer to no single component
    pub compositions: Vec<Composition>,
    pub statistics: GraphStatistics,
    /// Structural warnings collected while building the graph
    pub warnings: Vec<String>,
}

/// One node of the graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct JsonComponent {
    /// Primary key (unique within the document)
    pub key: String,
    pub bom_ref: Option<String>,
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    pub name: String,
    pub version: Option<String>,
    pub purl: Option<String>,
    pub cpe: Option<String>,
    pub description: Option<String>,
    pub group: Option<String>,
    pub scope: Option<String>,
    pub supplier: Option<String>,
    pub licenses: Vec<String>,
    pub hashes: Vec<Hash>,
    pub properties: Vec<Property>,
    pub vulnerabilities: Vec<Vulnerability>,
    pub annotations: Vec<Annotation>,
    pub compositions: Vec<Composition>,
    /// Key of the assembly parent
    pub parent: Option<String>,
    /// Keys of the assembly children
    pub children: Vec<String>,
    pub dependencies: Vec<JsonDependencyRecord>,
    pub island_id: usize,
    pub resolved_dependency_count: usize,
    /// Height of the subtree below this node
    pub depth: usize,
    /// Number of assembly ancestors
    pub level: usize,
    /// Whether the node renders as a subtree when referenced as a dependency
    pub expandable: bool,
}

/// A dependency reference and the node it resolved to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct JsonDependencyRecord {
    /// Reference as written in the document
    #[serde(rename = "ref")]
    pub reference: String,
    /// Key of the resolved node, absent when unresolved
    pub target: Option<String>,
}

/// A declared dependency pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct JsonDependency {
    #[serde(rename = "ref")]
    pub reference: String,
    pub depends_on: Vec<String>,
}

/// An island and its members
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct JsonIsland {
    pub id: usize,
    pub members: Vec<String>,
}

impl JsonGraphDocument {
    /// Convert an analyzed graph.
    #[must_use]
    pub fn from_graph(graph: &AnalyzedGraph) -> Self {
        let key_of = |id| graph.node(id).key.clone();
        let depths = graph.depths();

        let components = graph
            .nodes()
            .map(|(id, node)| JsonComponent {
                key: node.key.clone(),
                bom_ref: node.bom_ref.clone(),
                component_type: node.component_type.clone(),
                name: node.name.clone(),
                version: node.version.clone(),
                purl: node.purl.clone(),
                cpe: node.cpe.clone(),
                description: node.description.clone(),
                group: node.group.clone(),
                scope: node.scope.clone(),
                supplier: node.supplier.clone(),
                licenses: node.licenses.clone(),
                hashes: node.hashes.clone(),
                properties: node.properties.clone(),
                vulnerabilities: node.vulnerabilities.clone(),
                annotations: node.annotations.clone(),
                compositions: node.compositions.clone(),
                parent: node.parent.map(key_of),
                children: node.children.iter().map(|&c| key_of(c)).collect(),
                dependencies: node
                    .dependencies
                    .iter()
                    .map(|d| JsonDependencyRecord {
                        reference: d.reference.clone(),
                        target: d.target.map(key_of),
                    })
                    .collect(),
                island_id: node.island_id,
                resolved_dependency_count: node.resolved_dependency_count,
                depth: depths.subtree_depth(id),
                level: depths.level(id),
                expandable: depths.is_expandable(id),
            })
            .collect();

        Self {
            metadata: graph.metadata().clone(),
            primary: graph.primary().map(key_of),
            components,
            dependencies: graph
                .adjacency()
                .iter()
                .map(|(reference, targets)| JsonDependency {
                    reference: reference.clone(),
                    depends_on: targets.clone(),
                })
                .collect(),
            islands: graph
                .islands()
                .iter()
                .map(|island| JsonIsland {
                    id: island.id,
                    members: island.members.iter().map(|&m| key_of(m)).collect(),
                })
                .collect(),
            annotations: graph.global_annotations().to_vec(),
            compositions: graph.global_compositions().to_vec(),
            statistics: GraphStatistics::from_graph(graph),
            warnings: graph.warnings().to_vec(),
        }
    }

    /// Look up a component by primary key
    #[must_use]
    pub fn component(&self, key: &str) -> Option<&JsonComponent> {
        self.components.iter().find(|c| c.key == key)
    }
}

/// JSON renderer
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonRenderer {
    compact: bool,
}

impl JsonRenderer {
    /// Create a renderer producing pretty-printed output
    #[must_use]
    pub const fn new() -> Self {
        Self { compact: false }
    }

    /// Produce single-line output
    #[must_use]
    pub const fn compact(mut self) -> Self {
        self.compact = true;
        self
    }
}

impl Renderer for JsonRenderer {
    fn render(&self, graph: &AnalyzedGraph, writer: &mut dyn Write) -> Result<(), RenderError> {
        let document = JsonGraphDocument::from_graph(graph);
        if self.compact {
            serde_json::to_writer(&mut *writer, &document)?;
        } else {
            serde_json::to_writer_pretty(&mut *writer, &document)?;
        }
        writeln!(writer)?;
        Ok(())
    }

    fn format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

/// Generate a JSON Schema for the JSON output document.
pub fn generate_output_schema() -> Result<String, serde_json::Error> {
    let schema = schemars::schema_for!(JsonGraphDocument);
    serde_json::to_string_pretty(&schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_and_analyze;
    use crate::model::{DependencyPair, DocComponent, SbomDocument};

    fn lib(name: &str) -> DocComponent {
        DocComponent::new(name, ComponentType::Library).with_bom_ref(name)
    }

    fn sample() -> SbomDocument {
        SbomDocument {
            primary: Some(lib("app").with_version("1.0").with_child(lib("a"))),
            components: vec![lib("orphan")],
            dependencies: vec![DependencyPair::new(
                "a",
                vec!["orphan".to_string(), "ghost".to_string()],
            )],
            ..Default::default()
        }
    }

    #[test]
    fn test_document_uses_keys_for_links() {
        let doc = JsonGraphDocument::from_graph(&build_and_analyze(&sample()));
        assert_eq!(doc.primary.as_deref(), Some("app"));
        assert_eq!(doc.component("app").unwrap().children, vec!["a"]);
        assert_eq!(doc.component("a").unwrap().parent.as_deref(), Some("app"));

        let deps = &doc.component("a").unwrap().dependencies;
        assert_eq!(deps[0].target.as_deref(), Some("orphan"));
        assert_eq!(deps[1].target, None);
        assert_eq!(doc.islands[0].members, vec!["orphan"]);
    }

    #[test]
    fn test_round_trip() {
        let doc = JsonGraphDocument::from_graph(&build_and_analyze(&sample()));
        let text = serde_json::to_string(&doc).unwrap();
        let back: JsonGraphDocument = serde_json::from_str(&text).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_render_writes_trailing_newline() {
        let out = JsonRenderer::new()
            .compact()
            .render_to_string(&build_and_analyze(&sample()))
            .unwrap();
        assert!(out.ends_with("}\n"));
        assert_eq!(out.lines().count(), 1);
        assert!(out.contains("\"type\":\"library\""));
    }

    #[test]
    fn test_schema_generation() {
        let schema = generate_output_schema().unwrap();
        assert!(schema.contains("JsonGraphDocument"));
        assert!(schema.contains("island_id"));
    }
}
