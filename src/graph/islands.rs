//! Island (disconnected subgraph) detection.

use super::{ComponentGraph, Island, NodeId};
use std::collections::VecDeque;

/// Partitions nodes into the primary's packaging tree (island 0) and
/// numbered islands.
///
/// Reachability from the primary follows assembly links only. Remaining
/// nodes are grouped through assembly and resolved dependency links, both
/// treated as undirected. Nodes are visited in insertion order, so island
/// numbering is reproducible: island 1 contains the earliest-inserted
/// unreached node, island 2 the earliest node not in island 1, and so on.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConnectivityAnalyzer;

impl ConnectivityAnalyzer {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Assign `island_id` on every node and populate the graph's island list
    pub fn analyze(&self, graph: &mut ComponentGraph) {
        let n = graph.len();
        let mut visited = vec![false; n];

        if let Some(primary) = graph.primary() {
            let reachable = bfs(primary, &mut visited, |id, out| {
                assembly_neighbors(graph, id, out);
            });
            for id in reachable {
                graph.node_mut(id).island_id = 0;
            }
        }

        let incoming = incoming_dependencies(graph);
        let mut islands = Vec::new();
        for start in 0..n {
            if visited[start] {
                continue;
            }
            let mut members = bfs(NodeId::new(start), &mut visited, |id, out| {
                assembly_neighbors(graph, id, out);
                out.extend(graph.node(id).resolved_dependencies());
                out.extend(incoming[id.index()].iter().copied());
            });
            members.sort_unstable();
            islands.push(Island {
                id: islands.len() + 1,
                members,
            });
        }

        for island in &islands {
            for &member in &island.members {
                graph.node_mut(member).island_id = island.id;
            }
        }
        tracing::debug!(islands = islands.len(), "connectivity analyzed");
        graph.islands = islands;
    }
}

/// Breadth-first traversal over unvisited nodes; returns the nodes reached
/// (including `start`) and marks them visited.
fn bfs<F>(start: NodeId, visited: &mut [bool], mut neighbors: F) -> Vec<NodeId>
where
    F: FnMut(NodeId, &mut Vec<NodeId>),
{
    let mut reached = Vec::new();
    let mut queue = VecDeque::from([start]);
    let mut scratch = Vec::new();
    visited[start.index()] = true;

    while let Some(id) = queue.pop_front() {
        reached.push(id);
        scratch.clear();
        neighbors(id, &mut scratch);
        for &next in &scratch {
            if !visited[next.index()] {
                visited[next.index()] = true;
                queue.push_back(next);
            }
        }
    }
    reached
}

fn assembly_neighbors(graph: &ComponentGraph, id: NodeId, out: &mut Vec<NodeId>) {
    let node = graph.node(id);
    out.extend(node.parent);
    out.extend(node.children.iter().copied());
}

/// Reverse of the resolved dependency relation
fn incoming_dependencies(graph: &ComponentGraph) -> Vec<Vec<NodeId>> {
    let mut incoming = vec![Vec::new(); graph.len()];
    for (id, node) in graph.nodes() {
        for target in node.resolved_dependencies() {
            incoming[target.index()].push(id);
        }
    }
    incoming
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;
    use crate::model::{ComponentType, DependencyPair, DocComponent, SbomDocument};

    fn lib(name: &str) -> DocComponent {
        DocComponent::new(name, ComponentType::Library).with_bom_ref(name)
    }

    fn analyzed(doc: &SbomDocument) -> ComponentGraph {
        let mut graph = GraphBuilder::new().build(doc);
        ConnectivityAnalyzer::new().analyze(&mut graph);
        graph
    }

    fn island_of(graph: &ComponentGraph, key: &str) -> usize {
        graph.node(graph.id_of(key).unwrap()).island_id
    }

    #[test]
    fn test_assembly_reachability_is_island_zero() {
        let doc = SbomDocument {
            primary: Some(lib("app").with_child(lib("a").with_child(lib("a1")))),
            components: vec![lib("orphan")],
            ..Default::default()
        };
        let graph = analyzed(&doc);
        assert_eq!(island_of(&graph, "app"), 0);
        assert_eq!(island_of(&graph, "a"), 0);
        assert_eq!(island_of(&graph, "a1"), 0);
        assert_eq!(island_of(&graph, "orphan"), 1);
        assert_eq!(graph.islands().len(), 1);
    }

    #[test]
    fn test_dependencies_do_not_reach_from_primary() {
        let mut doc = SbomDocument {
            primary: Some(lib("app")),
            components: vec![lib("dep")],
            ..Default::default()
        };
        doc.dependencies
            .push(DependencyPair::new("app", vec!["dep".to_string()]));
        let graph = analyzed(&doc);
        assert_eq!(island_of(&graph, "dep"), 1);
    }

    #[test]
    fn test_islands_joined_by_dependencies() {
        let mut doc = SbomDocument {
            primary: Some(lib("app")),
            components: vec![lib("x"), lib("y"), lib("z").with_child(lib("z1"))],
            ..Default::default()
        };
        // y -> x links x and y regardless of direction
        doc.dependencies
            .push(DependencyPair::new("y", vec!["x".to_string()]));
        let graph = analyzed(&doc);

        assert_eq!(island_of(&graph, "x"), 1);
        assert_eq!(island_of(&graph, "y"), 1);
        assert_eq!(island_of(&graph, "z"), 2);
        assert_eq!(island_of(&graph, "z1"), 2);
        let sizes: Vec<_> = graph.islands().iter().map(Island::len).collect();
        assert_eq!(sizes, vec![2, 2]);
    }

    #[test]
    fn test_no_primary_puts_everything_in_islands() {
        let doc = SbomDocument {
            components: vec![lib("a"), lib("b")],
            ..Default::default()
        };
        let graph = analyzed(&doc);
        assert_eq!(graph.islands().len(), 2);
        assert!(graph.nodes().all(|(_, n)| n.island_id > 0));
    }

    #[test]
    fn test_dependency_cycle_terminates() {
        let mut doc = SbomDocument {
            primary: Some(lib("app")),
            components: vec![lib("a"), lib("b")],
            ..Default::default()
        };
        doc.dependencies
            .push(DependencyPair::new("a", vec!["b".to_string()]));
        doc.dependencies
            .push(DependencyPair::new("b", vec!["a".to_string(), "b".to_string()]));
        let graph = analyzed(&doc);
        assert_eq!(graph.islands().len(), 1);
        assert_eq!(graph.islands()[0].members.len(), 2);
    }
}
