//! Graph construction from a parsed document.

use super::{ComponentGraph, DependencyRecord, EnrichedComponent, NodeId};
use crate::model::{DocComponent, SbomDocument};
use std::collections::{HashMap, HashSet};

/// Reference string to indices into one of the document's cross-cutting
/// sections, built in a single pass over that section.
type RefIndex<'d> = HashMap<&'d str, Vec<usize>>;

/// Pre-indexed cross-cutting sections of a document
struct CrossRefIndex<'d> {
    vulnerabilities: RefIndex<'d>,
    annotations: RefIndex<'d>,
    compositions: RefIndex<'d>,
}

impl<'d> CrossRefIndex<'d> {
    fn new(doc: &'d SbomDocument) -> Self {
        fn index<'a, T>(items: &'a [T], refs: impl Fn(&'a T) -> &'a [String]) -> RefIndex<'a> {
            let mut map: RefIndex<'a> = HashMap::new();
            for (i, item) in items.iter().enumerate() {
                for reference in refs(item) {
                    let entry = map.entry(reference.as_str()).or_default();
                    if entry.last() != Some(&i) {
                        entry.push(i);
                    }
                }
            }
            map
        }

        Self {
            vulnerabilities: index(&doc.vulnerabilities, |v| v.affects.as_slice()),
            annotations: index(&doc.annotations, |a| a.subjects.as_slice()),
            compositions: index(&doc.compositions, |c| c.assemblies.as_slice()),
        }
    }
}

/// Tracks which cross-cutting entries have been joined onto some node
#[derive(Default)]
struct JoinTracker<'d> {
    vulnerability_refs: HashSet<&'d str>,
    annotations: HashSet<usize>,
    compositions: HashSet<usize>,
}

/// Builds a [`ComponentGraph`] from a document.
///
/// Never fails: an empty document yields an empty graph, and structural
/// anomalies are recorded as warnings on the graph.
#[derive(Debug, Default, Clone, Copy)]
pub struct GraphBuilder;

impl GraphBuilder {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Build the graph. Connectivity and depth are not computed here; see
    /// [`crate::graph::analyze`].
    #[must_use]
    pub fn build(&self, doc: &SbomDocument) -> ComponentGraph {
        let index = CrossRefIndex::new(doc);
        let mut joined = JoinTracker::default();
        let mut graph = ComponentGraph::new(doc.metadata.clone());

        for comp in &doc.components {
            self.add_tree(&mut graph, doc, &index, &mut joined, comp, None);
        }

        match &doc.primary {
            Some(primary) => self.add_primary(&mut graph, doc, &index, &mut joined, primary),
            None => graph.warn("document declares no primary component".to_string()),
        }

        self.collect_globals(&mut graph, doc, &joined);
        self.warn_unmatched_vulnerabilities(&mut graph, doc, &joined);
        self.link_dependencies(&mut graph, doc);

        tracing::info!(
            components = graph.len(),
            warnings = graph.warnings().len(),
            "component graph built"
        );
        graph
    }

    /// Walk a component and its nested components depth-first (pre-order),
    /// attaching the top of the walk to `parent`.
    fn add_tree<'d>(
        &self,
        graph: &mut ComponentGraph,
        doc: &'d SbomDocument,
        index: &CrossRefIndex<'d>,
        joined: &mut JoinTracker<'d>,
        root: &DocComponent,
        parent: Option<NodeId>,
    ) {
        let mut stack: Vec<(&DocComponent, Option<NodeId>)> = vec![(root, parent)];
        while let Some((comp, parent)) = stack.pop() {
            let id = self.add_node(graph, doc, index, joined, comp, parent);
            stack.extend(comp.components.iter().rev().map(|child| (child, Some(id))));
        }
    }

    fn add_primary<'d>(
        &self,
        graph: &mut ComponentGraph,
        doc: &'d SbomDocument,
        index: &CrossRefIndex<'d>,
        joined: &mut JoinTracker<'d>,
        primary: &DocComponent,
    ) {
        let key = base_key(primary);
        let id = if let Some(existing) = graph.id_of(&key) {
            graph.warn(format!(
                "primary component '{key}' is also listed as a component; using the listed node"
            ));
            existing
        } else {
            self.add_node(graph, doc, index, joined, primary, None)
        };
        graph.primary = Some(id);

        for child in &primary.components {
            self.add_tree(graph, doc, index, joined, child, Some(id));
        }
    }

    /// Create one node, join cross-cutting data onto it, and link it to its
    /// assembly parent.
    fn add_node<'d>(
        &self,
        graph: &mut ComponentGraph,
        doc: &'d SbomDocument,
        index: &CrossRefIndex<'d>,
        joined: &mut JoinTracker<'d>,
        comp: &DocComponent,
        parent: Option<NodeId>,
    ) -> NodeId {
        let key = unique_key(graph, comp);
        let mut node = EnrichedComponent::from_doc(key, comp);
        node.parent = parent;
        self.enrich(&mut node, doc, index, joined);

        let id = graph.insert_node(node);
        if let Some(parent) = parent {
            graph.node_mut(parent).children.push(id);
        }
        id
    }

    /// Join pre-indexed vulnerabilities, annotations and compositions onto a
    /// node through each of its identity keys.
    fn enrich<'d>(
        &self,
        node: &mut EnrichedComponent,
        doc: &'d SbomDocument,
        index: &CrossRefIndex<'d>,
        joined: &mut JoinTracker<'d>,
    ) {
        let mut vulns = Vec::new();
        let mut annotations = Vec::new();
        let mut compositions = Vec::new();

        for key in node.identity_keys() {
            if let Some((matched, ids)) = index.vulnerabilities.get_key_value(key) {
                joined.vulnerability_refs.insert(*matched);
                push_unique(&mut vulns, ids);
            }
            if let Some(ids) = index.annotations.get(key) {
                push_unique(&mut annotations, ids);
            }
            if let Some(ids) = index.compositions.get(key) {
                push_unique(&mut compositions, ids);
            }
        }

        joined.annotations.extend(annotations.iter().copied());
        joined.compositions.extend(compositions.iter().copied());

        node.vulnerabilities = vulns
            .into_iter()
            .map(|i| doc.vulnerabilities[i].clone())
            .collect();
        node.annotations = annotations
            .into_iter()
            .map(|i| doc.annotations[i].clone())
            .collect();
        node.compositions = compositions
            .into_iter()
            .map(|i| doc.compositions[i].clone())
            .collect();
    }

    /// Annotations and compositions that matched no node become graph-level
    fn collect_globals(&self, graph: &mut ComponentGraph, doc: &SbomDocument, joined: &JoinTracker<'_>) {
        graph.global_annotations = doc
            .annotations
            .iter()
            .enumerate()
            .filter(|(i, _)| !joined.annotations.contains(i))
            .map(|(_, a)| a.clone())
            .collect();
        graph.global_compositions = doc
            .compositions
            .iter()
            .enumerate()
            .filter(|(i, _)| !joined.compositions.contains(i))
            .map(|(_, c)| c.clone())
            .collect();
    }

    fn warn_unmatched_vulnerabilities(
        &self,
        graph: &mut ComponentGraph,
        doc: &SbomDocument,
        joined: &JoinTracker<'_>,
    ) {
        let mut reported: HashSet<&str> = HashSet::new();
        for vuln in &doc.vulnerabilities {
            for reference in &vuln.affects {
                let reference = reference.as_str();
                if !joined.vulnerability_refs.contains(reference) && reported.insert(reference) {
                    graph.warn(format!(
                        "vulnerability {} affects '{reference}', which matches no component",
                        vuln.id
                    ));
                }
            }
        }
    }

    /// Fill the adjacency mapping and resolve every declared dependency
    fn link_dependencies(&self, graph: &mut ComponentGraph, doc: &SbomDocument) {
        for pair in &doc.dependencies {
            let targets = graph.adjacency.entry(pair.reference.clone()).or_default();
            for target in &pair.depends_on {
                if !targets.contains(target) {
                    targets.push(target.clone());
                }
            }
        }

        let mut unresolved = 0usize;
        for pair in &doc.dependencies {
            let Some(source) = graph.find(&pair.reference) else {
                graph.warn(format!(
                    "dependency source '{}' matches no component",
                    pair.reference
                ));
                continue;
            };

            let mut records = Vec::new();
            for target in &pair.depends_on {
                let known = graph
                    .node(source)
                    .dependencies
                    .iter()
                    .chain(records.iter())
                    .any(|r: &DependencyRecord| &r.reference == target);
                if known {
                    continue;
                }
                let resolved = graph.find(target);
                if resolved.is_none() {
                    unresolved += 1;
                    graph.warn(format!(
                        "dependency '{target}' of '{}' matches no component",
                        pair.reference
                    ));
                }
                records.push(DependencyRecord {
                    reference: target.clone(),
                    target: resolved,
                });
            }

            let node = graph.node_mut(source);
            node.resolved_dependency_count += records.iter().filter(|r| r.is_resolved()).count();
            node.dependencies.extend(records);
        }

        if unresolved > 0 {
            tracing::debug!(unresolved, "unresolved dependency references");
        }
    }
}

fn push_unique(into: &mut Vec<usize>, ids: &[usize]) {
    for &id in ids {
        if !into.contains(&id) {
            into.push(id);
        }
    }
}

/// bom-ref, else name, else a placeholder
fn base_key(comp: &DocComponent) -> String {
    comp.bom_ref()
        .or_else(|| Some(comp.name.as_str()).filter(|n| !n.is_empty()))
        .unwrap_or("unnamed")
        .to_string()
}

/// Base key, suffixed with `#2`, `#3`, ... when already in use
fn unique_key(graph: &mut ComponentGraph, comp: &DocComponent) -> String {
    let base = base_key(comp);
    if graph.id_of(&base).is_none() {
        return base;
    }
    let mut n = 2;
    let key = loop {
        let candidate = format!("{base}#{n}");
        if graph.id_of(&candidate).is_none() {
            break candidate;
        }
        n += 1;
    };
    graph.warn(format!("duplicate component key '{base}' stored as '{key}'"));
    key
}
