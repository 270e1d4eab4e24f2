//! Component filtering over an analyzed graph.
//!
//! Filtering produces a subset graph. Island assignment is kept from the
//! unfiltered graph (a filtered view still shows where each component sat
//! in the full document); only the depth pass runs again, since removed
//! nodes change subtree heights.

use crate::graph::{
    AnalyzedGraph, ComponentGraph, DepthCalculator, DependencyRecord, EnrichedComponent, Island,
    NodeId,
};
use crate::model::Severity;
use std::borrow::Cow;

/// Component selection criteria
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterConfig {
    /// Keep only these component types (case-insensitive); empty keeps all
    pub types: Vec<String>,
    /// Keep only components with a vulnerability at or above this severity
    pub min_severity: Option<Severity>,
    /// Keep only components with an unresolved vulnerability
    pub only_unresolved: bool,
    /// Render depth limit. Carried for the renderers; never applied here
    /// because depth is relative to the render root.
    pub max_depth: Option<usize>,
}

impl FilterConfig {
    /// Whether any node-removing predicate is set
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.types.is_empty() || self.has_vulnerability_predicate()
    }

    fn has_vulnerability_predicate(&self) -> bool {
        self.only_unresolved || self.min_severity.is_some()
    }

    /// Whether a node passes every predicate
    #[must_use]
    pub fn matches(&self, node: &EnrichedComponent) -> bool {
        let type_ok = self.types.is_empty()
            || self
                .types
                .iter()
                .any(|t| node.component_type.matches_name(t));
        if !type_ok {
            return false;
        }
        if !self.has_vulnerability_predicate() {
            return true;
        }
        node.vulnerabilities.iter().any(|v| {
            let unresolved_ok = !self.only_unresolved || !v.is_resolved();
            let severity_ok = self
                .min_severity
                .map_or(true, |min| v.severity().meets(min));
            unresolved_ok && severity_ok
        })
    }
}

/// Apply a filter.
///
/// An inactive filter borrows the input unchanged; otherwise a new graph
/// holding only the matching nodes is returned.
#[must_use]
pub fn filter_graph<'a>(graph: &'a AnalyzedGraph, config: &FilterConfig) -> Cow<'a, AnalyzedGraph> {
    if !config.is_active() {
        return Cow::Borrowed(graph);
    }

    let kept: Vec<NodeId> = graph
        .nodes()
        .filter(|(_, node)| config.matches(node))
        .map(|(id, _)| id)
        .collect();
    tracing::debug!(kept = kept.len(), total = graph.len(), "filter applied");

    let subset = subset(graph, &kept);
    let depths = DepthCalculator::new().compute(&subset);
    Cow::Owned(AnalyzedGraph::from_parts(subset, depths))
}

/// Copy the given nodes into a new graph, remapping links and dropping
/// those that point outside the subset.
fn subset(source: &ComponentGraph, kept: &[NodeId]) -> ComponentGraph {
    let mut remap: Vec<Option<NodeId>> = vec![None; source.len()];
    for (new_index, old) in kept.iter().enumerate() {
        remap[old.index()] = Some(NodeId::new(new_index));
    }
    let map = |id: NodeId| remap[id.index()];

    let mut graph = ComponentGraph::new(source.metadata().clone());
    graph.adjacency = source.adjacency().clone();
    graph.global_annotations = source.global_annotations().to_vec();
    graph.global_compositions = source.global_compositions().to_vec();
    graph.warnings = source.warnings().to_vec();

    for &old in kept {
        let mut node = source.node(old).clone();
        node.parent = node.parent.and_then(map);
        node.children = node.children.iter().filter_map(|&c| map(c)).collect();
        node.dependencies = node
            .dependencies
            .into_iter()
            .filter_map(|record| match record.target {
                None => Some(record),
                Some(target) => map(target).map(|t| DependencyRecord {
                    reference: record.reference,
                    target: Some(t),
                }),
            })
            .collect();
        node.resolved_dependency_count =
            node.dependencies.iter().filter(|d| d.is_resolved()).count();
        graph.insert_node(node);
    }

    graph.primary = source.primary().and_then(map);
    graph.islands = source
        .islands()
        .iter()
        .map(|island| Island {
            id: island.id,
            members: island.members.iter().filter_map(|&m| map(m)).collect(),
        })
        .filter(|island| !island.is_empty())
        .collect();
    graph
}
