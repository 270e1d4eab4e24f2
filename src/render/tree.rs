//! Nested tree renderer.
//!
//! The main tree starts at the primary component (or at the first island
//! when there is none), followed by the remaining islands and a statistics
//! block. Traversal uses an explicit stack; the current render path doubles
//! as the cycle guard, so cyclic input prints a `↻` marker instead of
//! recursing.

use super::text::{
    ansi_color, detail_blocks, document_header, node_header, statistics_block, DependencyListing,
    ISLAND_LIMIT,
};
use super::{OutputFormat, RenderError, Renderer};
use crate::config::DisplayOptions;
use crate::graph::{AnalyzedGraph, Island, NodeId};
use std::collections::HashSet;
use std::io::Write;

/// Tree renderer for terminal output
pub struct TreeRenderer {
    display: DisplayOptions,
    colored: bool,
}

impl TreeRenderer {
    /// Create a tree renderer with colored output
    #[must_use]
    pub const fn new(display: DisplayOptions) -> Self {
        Self {
            display,
            colored: true,
        }
    }

    /// Disable colored output
    #[must_use]
    pub const fn no_color(mut self) -> Self {
        self.colored = false;
        self
    }
}

impl Renderer for TreeRenderer {
    fn render(&self, graph: &AnalyzedGraph, writer: &mut dyn Write) -> Result<(), RenderError> {
        let mut out = TreeWriter::new(graph, &self.display, self.colored);
        out.lines.extend(document_header(graph, self.colored));

        let promoted = out.main_tree();
        out.islands(promoted);

        out.lines.extend(statistics_block(graph, self.colored));
        for line in &out.lines {
            writeln!(writer, "{line}")?;
        }
        Ok(())
    }

    fn format(&self) -> OutputFormat {
        OutputFormat::Tree
    }
}

/// Position of a line relative to its siblings
#[derive(Clone, Copy)]
enum Branch {
    Root,
    Middle,
    Last,
}

impl Branch {
    const fn of(index: usize, count: usize) -> Self {
        if index + 1 == count {
            Self::Last
        } else {
            Self::Middle
        }
    }

    const fn connector(self) -> &'static str {
        match self {
            Self::Root => "",
            Self::Middle => "├── ",
            Self::Last => "└── ",
        }
    }

    const fn indent(self) -> &'static str {
        match self {
            Self::Root => "",
            Self::Middle => "│   ",
            Self::Last => "    ",
        }
    }
}

enum ItemKind {
    Node { id: NodeId, via_dependency: bool },
    Block { heading: String, entries: Vec<String> },
    Note(String),
}

struct Item {
    prefix: String,
    branch: Branch,
    depth: usize,
    kind: ItemKind,
}

struct TreeWriter<'a> {
    graph: &'a AnalyzedGraph,
    display: &'a DisplayOptions,
    colored: bool,
    lines: Vec<String>,
    /// Nodes already expanded somewhere in the output
    expanded: HashSet<NodeId>,
}

impl<'a> TreeWriter<'a> {
    fn new(graph: &'a AnalyzedGraph, display: &'a DisplayOptions, colored: bool) -> Self {
        Self {
            graph,
            display,
            colored,
            lines: Vec::new(),
            expanded: HashSet::new(),
        }
    }

    fn color(&self, text: &str, color: &str) -> String {
        ansi_color(text, color, self.colored)
    }

    /// Render the main tree; returns the id of the island promoted into it
    fn main_tree(&mut self) -> Option<usize> {
        let graph = self.graph;
        if graph.is_empty() {
            let note = self.color("(no components)", "dim");
            self.lines.push(note);
            return None;
        }

        if self.display.only_primary {
            match graph.primary() {
                Some(primary) => self.render_root(primary),
                None => {
                    let note = self.color("(no primary component)", "dim");
                    self.lines.push(note);
                }
            }
            return None;
        }

        // A primary nested inside a listed component renders under its
        // top-level ancestor, which leads the main tree.
        let lead = graph.primary().map(|primary| assembly_root(graph, primary));
        let mut roots: Vec<NodeId> = lead.into_iter().collect();
        roots.extend(
            graph
                .nodes()
                .filter(|(id, node)| {
                    node.island_id == 0 && node.parent.is_none() && Some(*id) != lead
                })
                .map(|(id, _)| id),
        );

        let mut promoted = None;
        if roots.is_empty() {
            if let Some(first) = graph.islands().first() {
                promoted = Some(first.id);
                roots = island_roots(graph, first);
            }
        }
        for root in roots {
            self.render_root(root);
        }
        promoted
    }

    fn islands(&mut self, promoted: Option<usize>) {
        let graph = self.graph;
        let remaining: Vec<&Island> = graph
            .islands()
            .iter()
            .filter(|island| Some(island.id) != promoted)
            .collect();
        if remaining.is_empty() {
            return;
        }

        if self.display.hides_islands() {
            let noun = if remaining.len() == 1 { "island" } else { "islands" };
            let note = self.color(&format!("{} {noun} hidden", remaining.len()), "dim");
            self.lines.push(String::new());
            self.lines.push(note);
            return;
        }

        for island in remaining {
            self.lines.push(String::new());
            let title = self.color(
                &format!("Island {} ({} components)", island.id, island.len()),
                "yellow",
            );
            self.lines.push(title);

            if island.len() > ISLAND_LIMIT && !self.display.verbose {
                for &member in &island.members[..ISLAND_LIMIT] {
                    let header = node_header(graph, member, self.colored);
                    self.lines.push(format!("{}{header}", Branch::Middle.connector()));
                }
                let more = self.color(
                    &format!("... and {} more", island.len() - ISLAND_LIMIT),
                    "dim",
                );
                self.lines.push(format!("{}{more}", Branch::Last.connector()));
            } else {
                for root in island_roots(graph, island) {
                    self.render_root(root);
                }
            }
        }
    }

    /// Depth-first rendering of one root, driven by an explicit stack
    fn render_root(&mut self, root: NodeId) {
        let mut path: Vec<NodeId> = Vec::new();
        let mut stack = vec![Item {
            prefix: String::new(),
            branch: Branch::Root,
            depth: 0,
            kind: ItemKind::Node {
                id: root,
                via_dependency: false,
            },
        }];

        while let Some(item) = stack.pop() {
            let lead = format!("{}{}", item.prefix, item.branch.connector());
            let child_prefix = format!("{}{}", item.prefix, item.branch.indent());
            match item.kind {
                ItemKind::Note(text) => self.lines.push(format!("{lead}{text}")),
                ItemKind::Block { heading, entries } => {
                    self.lines.push(format!("{lead}{heading}"));
                    let count = entries.len();
                    for (i, entry) in entries.into_iter().enumerate() {
                        let branch = Branch::of(i, count);
                        self.lines
                            .push(format!("{child_prefix}{}{entry}", branch.connector()));
                    }
                }
                ItemKind::Node { id, via_dependency } => {
                    path.truncate(item.depth);
                    let children = self.visit(id, via_dependency, &lead, &path, item.depth);
                    if children.is_empty() {
                        continue;
                    }
                    path.push(id);
                    let count = children.len();
                    // Reversed so the first child is popped first
                    for (i, kind) in children.into_iter().enumerate().rev() {
                        stack.push(Item {
                            prefix: child_prefix.clone(),
                            branch: Branch::of(i, count),
                            depth: item.depth + 1,
                            kind,
                        });
                    }
                }
            }
        }
    }

    /// Print a node's header line and return the items nested below it
    fn visit(
        &mut self,
        id: NodeId,
        via_dependency: bool,
        lead: &str,
        path: &[NodeId],
        depth: usize,
    ) -> Vec<ItemKind> {
        let graph = self.graph;
        let node = graph.node(id);
        let arrow = if via_dependency { "→ " } else { "" };

        if path.contains(&id) {
            let marker = self.color(
                &format!("↻ {} (circular reference)", node.display_name()),
                "yellow",
            );
            self.lines.push(format!("{lead}{marker}"));
            return Vec::new();
        }

        let header = node_header(graph, id, self.colored);
        if via_dependency && self.expanded.contains(&id) {
            let seen = self.color("(expanded above)", "dim");
            self.lines.push(format!("{lead}{arrow}{header} {seen}"));
            return Vec::new();
        }
        self.lines.push(format!("{lead}{arrow}{header}"));

        let mut items: Vec<ItemKind> = detail_blocks(
            graph,
            id,
            self.display,
            DependencyListing::InlineOnly,
            self.colored,
        )
        .into_iter()
        .map(|block| ItemKind::Block {
            heading: block.heading(self.colored),
            entries: block.visible_entries(self.display.verbose, self.colored),
        })
        .collect();

        let mut nested: Vec<ItemKind> = node
            .children
            .iter()
            .map(|&child| ItemKind::Node {
                id: child,
                via_dependency: false,
            })
            .collect();
        if self.display.show_dependencies && !self.display.show_only_licenses {
            nested.extend(
                node.resolved_dependencies()
                    .filter(|&target| graph.depths().is_expandable(target))
                    .map(|target| ItemKind::Node {
                        id: target,
                        via_dependency: true,
                    }),
            );
        }

        // A truncated node stays unexpanded so a shallower reference can
        // still print its subtree.
        match self.display.depth_limit() {
            Some(limit) if depth >= limit && !nested.is_empty() => {
                let note = self.color(
                    &format!("... {} more (max depth {limit} reached)", nested.len()),
                    "dim",
                );
                items.push(ItemKind::Note(note));
            }
            _ => {
                self.expanded.insert(id);
                items.extend(nested);
            }
        }
        items
    }
}

/// Topmost assembly ancestor of `id` (itself when it has no parent)
fn assembly_root(graph: &AnalyzedGraph, mut id: NodeId) -> NodeId {
    while let Some(parent) = graph.node(id).parent {
        id = parent;
    }
    id
}

/// Island members whose assembly parent lies outside the island
fn island_roots(graph: &AnalyzedGraph, island: &Island) -> Vec<NodeId> {
    island
        .members
        .iter()
        .copied()
        .filter(|&member| {
            graph
                .node(member)
                .parent
                .map_or(true, |p| graph.node(p).island_id != island.id)
        })
        .collect()
}
