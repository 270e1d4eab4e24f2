//! Subtree depth, assembly level and expandability pre-pass.

use super::{ComponentGraph, NodeId};
use std::collections::{BTreeSet, VecDeque};

/// Results of the depth pre-pass, indexed by [`NodeId`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepthCache {
    subtree: Vec<usize>,
    level: Vec<usize>,
    expandable: Vec<bool>,
    circular: BTreeSet<(NodeId, NodeId)>,
}

impl DepthCache {
    /// Height of the subtree below a node: 0 for leaves, otherwise one more
    /// than the deepest assembly child or expandable dependency target.
    #[must_use]
    pub fn subtree_depth(&self, id: NodeId) -> usize {
        self.subtree.get(id.index()).copied().unwrap_or(0)
    }

    /// Number of assembly ancestors (0 for assembly roots)
    #[must_use]
    pub fn level(&self, id: NodeId) -> usize {
        self.level.get(id.index()).copied().unwrap_or(0)
    }

    /// Whether the node has assembly children or any resolved dependency.
    ///
    /// Expandable dependency targets render as nested subtrees; the others
    /// are listed inline.
    #[must_use]
    pub fn is_expandable(&self, id: NodeId) -> bool {
        self.expandable.get(id.index()).copied().unwrap_or(false)
    }

    /// Whether the edge `from -> to` closed a cycle during the pass
    #[must_use]
    pub fn is_circular_edge(&self, from: NodeId, to: NodeId) -> bool {
        self.circular.contains(&(from, to))
    }

    /// Edges cut by the cycle guard, in node order
    pub fn circular_edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.circular.iter().copied()
    }

    /// Largest subtree depth in the graph
    #[must_use]
    pub fn max_subtree_depth(&self) -> usize {
        self.subtree.iter().copied().max().unwrap_or(0)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnPath,
    Done,
}

struct Frame {
    node: NodeId,
    next: usize,
    best: usize,
}

/// Computes the [`DepthCache`] for a graph in one pass.
#[derive(Debug, Default, Clone, Copy)]
pub struct DepthCalculator;

impl DepthCalculator {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    #[must_use]
    pub fn compute(&self, graph: &ComponentGraph) -> DepthCache {
        let expandable: Vec<bool> = graph
            .nodes()
            .map(|(_, n)| !n.children.is_empty() || n.resolved_dependency_count > 0)
            .collect();
        let successors = contributing_successors(graph, &expandable);
        let (subtree, circular) = subtree_depths(&successors);
        let level = assembly_levels(graph);

        if !circular.is_empty() {
            tracing::debug!(edges = circular.len(), "cycle guard cut dependency edges");
        }
        DepthCache {
            subtree,
            level,
            expandable,
            circular,
        }
    }
}

/// Per node: assembly children, then expandable resolved dependency targets
fn contributing_successors(graph: &ComponentGraph, expandable: &[bool]) -> Vec<Vec<NodeId>> {
    graph
        .nodes()
        .map(|(_, node)| {
            let mut next = node.children.clone();
            next.extend(
                node.resolved_dependencies()
                    .filter(|t| expandable[t.index()]),
            );
            next
        })
        .collect()
}

/// Memoized iterative DFS. An edge into a node on the current path is a
/// back edge: it contributes nothing and is recorded as circular.
fn subtree_depths(successors: &[Vec<NodeId>]) -> (Vec<usize>, BTreeSet<(NodeId, NodeId)>) {
    let n = successors.len();
    let mut depth = vec![0usize; n];
    let mut mark = vec![Mark::Unvisited; n];
    let mut circular = BTreeSet::new();

    for root in 0..n {
        if mark[root] != Mark::Unvisited {
            continue;
        }
        mark[root] = Mark::OnPath;
        let mut stack = vec![Frame {
            node: NodeId::new(root),
            next: 0,
            best: 0,
        }];

        while let Some(frame) = stack.last_mut() {
            let node = frame.node;
            if let Some(&succ) = successors[node.index()].get(frame.next) {
                frame.next += 1;
                match mark[succ.index()] {
                    Mark::OnPath => {
                        circular.insert((node, succ));
                    }
                    Mark::Done => {
                        frame.best = frame.best.max(depth[succ.index()] + 1);
                    }
                    Mark::Unvisited => {
                        mark[succ.index()] = Mark::OnPath;
                        stack.push(Frame {
                            node: succ,
                            next: 0,
                            best: 0,
                        });
                    }
                }
                continue;
            }

            let best = frame.best;
            depth[node.index()] = best;
            mark[node.index()] = Mark::Done;
            stack.pop();
            if let Some(parent) = stack.last_mut() {
                parent.best = parent.best.max(best + 1);
            }
        }
    }
    (depth, circular)
}

/// Breadth-first over the assembly forest from every root
fn assembly_levels(graph: &ComponentGraph) -> Vec<usize> {
    let mut level = vec![0usize; graph.len()];
    let mut seen = vec![false; graph.len()];
    let mut queue: VecDeque<NodeId> = graph
        .nodes()
        .filter(|(_, n)| n.is_assembly_root())
        .map(|(id, _)| id)
        .collect();
    for id in &queue {
        seen[id.index()] = true;
    }

    while let Some(id) = queue.pop_front() {
        for &child in &graph.node(id).children {
            if !seen[child.index()] {
                seen[child.index()] = true;
                level[child.index()] = level[id.index()] + 1;
                queue.push_back(child);
            }
        }
    }
    level
}
