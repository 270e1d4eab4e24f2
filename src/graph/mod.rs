//! Consolidated component graph.
//!
//! A parsed [`SbomDocument`](crate::model::SbomDocument) scatters information
//! about a component across several sections: nesting, explicit dependency
//! pairs, vulnerabilities, annotations and compositions. This module joins
//! all of them into one node per component.
//!
//! # Storage
//!
//! Nodes live in a single insertion-ordered arena ([`IndexMap`]) keyed by
//! their primary key. Every link between nodes is a [`NodeId`] (the arena
//! index), so malformed input with cyclic references cannot create cyclic
//! ownership. Only the traversals need cycle guards.
//!
//! # Pipeline
//!
//! ```text
//! SbomDocument ──GraphBuilder──▶ ComponentGraph ──analyze()──▶ AnalyzedGraph
//!                                                 (islands, depths)
//! ```
//!
//! [`AnalyzedGraph`] is the only type renderers and statistics accept, so the
//! connectivity and depth passes are guaranteed to have run before any read.

mod builder;
mod component;
mod depth;
mod identity;
mod islands;

pub use builder::GraphBuilder;
pub use component::{DependencyRecord, EnrichedComponent};
pub use depth::{DepthCache, DepthCalculator};
pub use identity::{IdentityResolver, LookupStrategy};
pub use islands::ConnectivityAnalyzer;

use crate::model::{Annotation, Composition, DocumentMetadata};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Index of a node in its graph's arena.
///
/// Only meaningful for the graph that produced it; a filtered graph
/// renumbers its nodes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Arena index
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A group of components unreachable from the primary component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Island {
    /// Island number (always > 0)
    pub id: usize,
    /// Members in node order
    pub members: Vec<NodeId>,
}

impl Island {
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Consolidated graph of every component in a document
#[derive(Debug, Clone, Default)]
pub struct ComponentGraph {
    pub(crate) nodes: IndexMap<String, EnrichedComponent>,
    pub(crate) primary: Option<NodeId>,
    /// Declared dependency pairs, source reference to target references
    pub(crate) adjacency: IndexMap<String, Vec<String>>,
    pub(crate) by_purl: HashMap<String, NodeId>,
    pub(crate) by_cpe: HashMap<String, NodeId>,
    pub(crate) by_name_version: HashMap<String, NodeId>,
    pub(crate) by_name: HashMap<String, Vec<NodeId>>,
    pub(crate) islands: Vec<Island>,
    pub(crate) metadata: DocumentMetadata,
    pub(crate) global_annotations: Vec<Annotation>,
    pub(crate) global_compositions: Vec<Composition>,
    pub(crate) warnings: Vec<String>,
}

impl ComponentGraph {
    /// Create an empty graph for a document
    #[must_use]
    pub fn new(metadata: DocumentMetadata) -> Self {
        Self {
            metadata,
            ..Default::default()
        }
    }

    /// Number of nodes
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node by id.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this graph.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &EnrichedComponent {
        &self.nodes[id.0]
    }

    /// Node by id, `None` when out of range
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&EnrichedComponent> {
        self.nodes.get_index(id.0).map(|(_, node)| node)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut EnrichedComponent {
        &mut self.nodes[id.0]
    }

    /// Node id for an exact primary key
    #[must_use]
    pub fn id_of(&self, key: &str) -> Option<NodeId> {
        self.nodes.get_index_of(key).map(NodeId)
    }

    /// All node ids in insertion order
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// All nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &EnrichedComponent)> {
        self.nodes.values().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// The document's primary component, if declared
    #[must_use]
    pub const fn primary(&self) -> Option<NodeId> {
        self.primary
    }

    /// Declared dependency pairs keyed by source reference
    #[must_use]
    pub const fn adjacency(&self) -> &IndexMap<String, Vec<String>> {
        &self.adjacency
    }

    /// Islands ordered by island number
    #[must_use]
    pub fn islands(&self) -> &[Island] {
        &self.islands
    }

    /// Document metadata
    #[must_use]
    pub const fn metadata(&self) -> &DocumentMetadata {
        &self.metadata
    }

    /// Annotations that refer to no single component
    #[must_use]
    pub fn global_annotations(&self) -> &[Annotation] {
        &self.global_annotations
    }

    /// Compositions that refer to no single component
    #[must_use]
    pub fn global_compositions(&self) -> &[Composition] {
        &self.global_compositions
    }

    /// Structural warnings collected while building
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Resolver over this graph's identity indices
    #[must_use]
    pub const fn resolver(&self) -> IdentityResolver<'_> {
        IdentityResolver::new(self)
    }

    /// Resolve a reference through every identity fallback
    #[must_use]
    pub fn find(&self, reference: &str) -> Option<NodeId> {
        self.resolver().resolve(reference)
    }

    /// Insert a node under its key and register it in every fallback index.
    ///
    /// The caller guarantees the key is unused.
    pub(crate) fn insert_node(&mut self, node: EnrichedComponent) -> NodeId {
        let id = NodeId(self.nodes.len());
        if let Some(purl) = node.purl.as_deref().filter(|p| !p.is_empty()) {
            self.by_purl.entry(purl.to_string()).or_insert(id);
        }
        if let Some(cpe) = node.cpe.as_deref().filter(|c| !c.is_empty()) {
            self.by_cpe.entry(cpe.to_string()).or_insert(id);
        }
        if !node.name.is_empty() {
            if let Some(version) = node.version.as_deref().filter(|v| !v.is_empty()) {
                self.by_name_version
                    .entry(format!("{}@{version}", node.name))
                    .or_insert(id);
            }
            self.by_name.entry(node.name.clone()).or_default().push(id);
        }
        self.nodes.insert(node.key.clone(), node);
        id
    }

    pub(crate) fn warn(&mut self, message: String) {
        tracing::debug!("{message}");
        self.warnings.push(message);
    }
}

/// A graph whose connectivity and depth passes have both completed.
///
/// Dereferences to [`ComponentGraph`].
#[derive(Debug, Clone)]
pub struct AnalyzedGraph {
    graph: ComponentGraph,
    depths: DepthCache,
}

impl AnalyzedGraph {
    /// Pair a graph with its depth cache. Islands must already be assigned.
    pub(crate) const fn from_parts(graph: ComponentGraph, depths: DepthCache) -> Self {
        Self { graph, depths }
    }

    /// The underlying graph
    #[must_use]
    pub const fn graph(&self) -> &ComponentGraph {
        &self.graph
    }

    /// Precomputed depths and expandability
    #[must_use]
    pub const fn depths(&self) -> &DepthCache {
        &self.depths
    }
}

impl std::ops::Deref for AnalyzedGraph {
    type Target = ComponentGraph;

    fn deref(&self) -> &Self::Target {
        &self.graph
    }
}

/// Run the connectivity and depth passes, in that order, to completion.
#[must_use]
pub fn analyze(mut graph: ComponentGraph) -> AnalyzedGraph {
    ConnectivityAnalyzer::new().analyze(&mut graph);
    let depths = DepthCalculator::new().compute(&graph);
    tracing::info!(
        components = graph.len(),
        islands = graph.islands().len(),
        max_depth = depths.max_subtree_depth(),
        "graph analyzed"
    );
    AnalyzedGraph::from_parts(graph, depths)
}

/// Build and analyze a document in one step
#[must_use]
pub fn build_and_analyze(doc: &crate::model::SbomDocument) -> AnalyzedGraph {
    analyze(GraphBuilder::new().build(doc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ComponentType, DocComponent};

    fn insert(graph: &mut ComponentGraph, name: &str, version: Option<&str>) -> NodeId {
        let mut comp = DocComponent::new(name, ComponentType::Library);
        comp.version = version.map(str::to_string);
        graph.insert_node(EnrichedComponent::from_doc(name.to_string(), &comp))
    }

    #[test]
    fn test_insert_registers_fallback_indices() {
        let mut graph = ComponentGraph::default();
        let id = insert(&mut graph, "serde", Some("1.0"));
        assert_eq!(graph.id_of("serde"), Some(id));
        assert_eq!(graph.by_name_version.get("serde@1.0"), Some(&id));
        assert_eq!(graph.by_name.get("serde"), Some(&vec![id]));
        assert!(graph.by_purl.is_empty());
    }

    #[test]
    fn test_node_ids_follow_insertion_order() {
        let mut graph = ComponentGraph::default();
        let a = insert(&mut graph, "a", None);
        let b = insert(&mut graph, "b", None);
        assert_eq!(graph.node_ids().collect::<Vec<_>>(), vec![a, b]);
        assert_eq!(graph.node(b).name, "b");
        assert!(graph.get(NodeId::new(5)).is_none());
    }

    #[test]
    fn test_analyze_empty_graph() {
        let analyzed = analyze(ComponentGraph::default());
        assert!(analyzed.is_empty());
        assert!(analyzed.islands().is_empty());
        assert_eq!(analyzed.depths().max_subtree_depth(), 0);
    }
}
