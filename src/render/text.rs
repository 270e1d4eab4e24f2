//! Pieces shared by the tree and flat renderers.

use crate::config::DisplayOptions;
use crate::graph::{AnalyzedGraph, EnrichedComponent, NodeId};
use crate::model::Severity;
use crate::stats::GraphStatistics;

/// Entries shown per detail block before the "... and N more" line
pub(super) const DETAIL_LIMIT: usize = 5;

/// Islands with more members than this are abbreviated
pub(super) const ISLAND_LIMIT: usize = 10;

/// Apply ANSI color formatting if colored output is enabled.
pub(super) fn ansi_color(text: &str, color: &str, colored: bool) -> String {
    if colored {
        match color {
            "red" => format!("\x1b[31m{text}\x1b[0m"),
            "green" => format!("\x1b[32m{text}\x1b[0m"),
            "yellow" => format!("\x1b[33m{text}\x1b[0m"),
            "magenta" => format!("\x1b[35m{text}\x1b[0m"),
            "cyan" => format!("\x1b[36m{text}\x1b[0m"),
            "bold" => format!("\x1b[1m{text}\x1b[0m"),
            "dim" => format!("\x1b[2m{text}\x1b[0m"),
            _ => text.to_string(),
        }
    } else {
        text.to_string()
    }
}

pub(super) const fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "magenta",
        Severity::High => "red",
        Severity::Medium => "yellow",
        Severity::Low => "green",
        Severity::None | Severity::Unknown => "dim",
    }
}

/// A titled, capped list of entries under a component
pub(super) struct DetailBlock {
    pub title: &'static str,
    pub entries: Vec<String>,
}

impl DetailBlock {
    /// Entries to print: all of them when verbose, otherwise the first
    /// [`DETAIL_LIMIT`] followed by a summary of the rest.
    pub fn visible_entries(&self, verbose: bool, colored: bool) -> Vec<String> {
        if verbose || self.entries.len() <= DETAIL_LIMIT {
            return self.entries.clone();
        }
        let mut shown: Vec<String> = self.entries[..DETAIL_LIMIT].to_vec();
        let hidden = self.entries.len() - DETAIL_LIMIT;
        shown.push(ansi_color(&format!("... and {hidden} more"), "dim", colored));
        shown
    }

    pub fn heading(&self, colored: bool) -> String {
        format!(
            "{} ({})",
            ansi_color(self.title, "cyan", colored),
            self.entries.len()
        )
    }
}

/// Which dependencies the dependency block lists
#[derive(Clone, Copy, PartialEq, Eq)]
pub(super) enum DependencyListing {
    /// Every declared dependency
    All,
    /// Unresolved references and non-expandable targets only
    InlineOnly,
}

/// Detail blocks for a node in display order, empty blocks omitted
pub(super) fn detail_blocks(
    graph: &AnalyzedGraph,
    id: NodeId,
    display: &DisplayOptions,
    listing: DependencyListing,
    colored: bool,
) -> Vec<DetailBlock> {
    let node = graph.node(id);
    let only_licenses = display.show_only_licenses;
    let mut blocks = Vec::new();
    let mut push = |title: &'static str, entries: Vec<String>| {
        if !entries.is_empty() {
            blocks.push(DetailBlock { title, entries });
        }
    };

    if display.show_licenses || only_licenses {
        push("Licenses", node.licenses.clone());
    }
    if only_licenses {
        return blocks;
    }
    if display.show_hashes {
        push(
            "Hashes",
            node.hashes
                .iter()
                .map(|h| format!("{}: {}", h.algorithm, h.value))
                .collect(),
        );
    }
    if display.show_dependencies {
        push("Dependencies", dependency_entries(graph, node, listing, colored));
    }
    if display.show_vulnerabilities {
        push(
            "Vulnerabilities",
            node.vulnerabilities
                .iter()
                .map(|v| {
                    let severity = v.severity();
                    let mut entry = format!(
                        "{} {}",
                        v.id,
                        ansi_color(&format!("[{severity}]"), severity_color(severity), colored)
                    );
                    if v.is_resolved() {
                        entry.push_str(" (resolved)");
                    }
                    entry
                })
                .collect(),
        );
    }
    if display.show_annotations {
        push(
            "Annotations",
            node.annotations
                .iter()
                .map(|a| format!("{}: {}", a.annotator, a.text))
                .collect(),
        );
    }
    if display.show_compositions {
        push(
            "Compositions",
            node.compositions
                .iter()
                .map(|c| format!("aggregate: {}", c.aggregate))
                .collect(),
        );
    }
    if display.show_properties {
        push(
            "Properties",
            node.properties
                .iter()
                .map(|p| format!("{} = {}", p.name, p.value))
                .collect(),
        );
    }
    blocks
}

fn dependency_entries(
    graph: &AnalyzedGraph,
    node: &EnrichedComponent,
    listing: DependencyListing,
    colored: bool,
) -> Vec<String> {
    node.dependencies
        .iter()
        .filter_map(|record| match record.target {
            None => Some(ansi_color(
                &format!("{} (unresolved)", record.reference),
                "dim",
                colored,
            )),
            Some(target)
                if listing == DependencyListing::All || !graph.depths().is_expandable(target) =>
            {
                Some(graph.node(target).display_name())
            }
            Some(_) => None,
        })
        .collect()
}

/// `name@version [type]`, with a marker on the primary component
pub(super) fn node_header(graph: &AnalyzedGraph, id: NodeId, colored: bool) -> String {
    let node = graph.node(id);
    let mut header = format!(
        "{} [{}]",
        ansi_color(&node.display_name(), "bold", colored),
        node.component_type
    );
    if graph.primary() == Some(id) {
        header.push(' ');
        header.push_str(&ansi_color("(primary)", "green", colored));
    }
    header
}

/// Document headline plus producing tools and timestamp
pub(super) fn document_header(graph: &AnalyzedGraph, colored: bool) -> Vec<String> {
    let meta = graph.metadata();
    let mut lines = vec![ansi_color(&meta.headline(), "bold", colored)];
    if let Some(ts) = meta.timestamp {
        lines.push(format!("Created: {}", ts.format("%Y-%m-%d %H:%M:%S UTC")));
    }
    if !meta.tools.is_empty() {
        let tools: Vec<String> = meta
            .tools
            .iter()
            .map(|t| match &t.version {
                Some(v) => format!("{} {v}", t.name),
                None => t.name.clone(),
            })
            .collect();
        lines.push(format!("Tools: {}", tools.join(", ")));
    }
    lines.push(String::new());
    lines
}

/// Statistics block appended after every text rendering
pub(super) fn statistics_block(graph: &AnalyzedGraph, colored: bool) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        ansi_color("Statistics", "bold", colored),
        ansi_color(&"─".repeat(40), "dim", colored),
    ];
    lines.extend(GraphStatistics::from_graph(graph).summary_lines());
    lines
}
