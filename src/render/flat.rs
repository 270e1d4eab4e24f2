//! Flat renderer: one aligned record per component, no nesting.
//!
//! Order is the primary component first, then every other node in
//! insertion order.

use super::text::{
    ansi_color, detail_blocks, document_header, severity_color, statistics_block,
    DependencyListing,
};
use super::{OutputFormat, RenderError, Renderer};
use crate::config::DisplayOptions;
use crate::graph::{AnalyzedGraph, NodeId};
use std::io::Write;
use unicode_width::UnicodeWidthStr;

/// Flat renderer for terminal output
pub struct FlatRenderer {
    display: DisplayOptions,
    colored: bool,
}

impl FlatRenderer {
    /// Create a flat renderer with colored output
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

    fn color(&self, text: &str, color: &str) -> String {
        ansi_color(text, color, self.colored)
    }

    /// Nodes to list, plus the number of islands left out
    fn visible_nodes(&self, graph: &AnalyzedGraph) -> (Vec<NodeId>, usize) {
        let ordered: Vec<NodeId> = graph
            .primary()
            .into_iter()
            .chain(graph.node_ids().filter(|&id| Some(id) != graph.primary()))
            .collect();
        if !self.display.hides_islands() {
            return (ordered, 0);
        }

        let main_island = if ordered.iter().any(|&id| graph.node(id).island_id == 0)
            || self.display.only_primary
        {
            0
        } else {
            graph.islands().first().map_or(0, |island| island.id)
        };
        let hidden = graph
            .islands()
            .iter()
            .filter(|island| island.id != main_island)
            .count();
        let visible = ordered
            .into_iter()
            .filter(|&id| graph.node(id).island_id == main_island)
            .collect();
        (visible, hidden)
    }
}

/// Pad `text` with spaces to `width` display columns
fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(UnicodeWidthStr::width(text));
    format!("{text}{}", " ".repeat(fill))
}

fn column_width(rows: &[Row], header: &str, cell: fn(&Row) -> &str) -> usize {
    rows.iter()
        .map(|r| UnicodeWidthStr::width(cell(r)))
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(0)
}

struct Row {
    id: NodeId,
    name: String,
    kind: String,
    island: String,
    deps: String,
    vulns: String,
}

impl Renderer for FlatRenderer {
    fn render(&self, graph: &AnalyzedGraph, writer: &mut dyn Write) -> Result<(), RenderError> {
        let mut lines = document_header(graph, self.colored);
        let (visible, hidden) = self.visible_nodes(graph);

        let rows: Vec<Row> = visible
            .iter()
            .map(|&id| {
                let node = graph.node(id);
                let vulns = match node.max_severity() {
                    Some(max) => format!("{} (max {max})", node.vulnerabilities.len()),
                    None => "0".to_string(),
                };
                Row {
                    id,
                    name: node.display_name(),
                    kind: node.component_type.to_string(),
                    island: node.island_id.to_string(),
                    deps: format!(
                        "{}/{}",
                        node.resolved_dependency_count,
                        node.dependencies.len()
                    ),
                    vulns,
                }
            })
            .collect();

        let name_w = column_width(&rows, "COMPONENT", |r| r.name.as_str());
        let kind_w = column_width(&rows, "TYPE", |r| r.kind.as_str());
        let island_w = column_width(&rows, "ISLAND", |r| r.island.as_str());
        let deps_w = column_width(&rows, "DEPS", |r| r.deps.as_str());

        if rows.is_empty() {
            lines.push(self.color("(no components)", "dim"));
        } else {
            lines.push(self.color(
                &format!(
                    "  {} {} {} {} VULNS",
                    pad("COMPONENT", name_w),
                    pad("TYPE", kind_w),
                    pad("ISLAND", island_w),
                    pad("DEPS", deps_w)
                ),
                "bold",
            ));
        }

        for row in &rows {
            let node = graph.node(row.id);
            let marker = if graph.primary() == Some(row.id) {
                self.color("*", "green")
            } else {
                " ".to_string()
            };
            let vulns = match node.max_severity() {
                Some(max) => self.color(&row.vulns, severity_color(max)),
                None => row.vulns.clone(),
            };
            lines.push(format!(
                "{marker} {} {} {} {} {vulns}",
                pad(&row.name, name_w),
                pad(&row.kind, kind_w),
                pad(&row.island, island_w),
                pad(&row.deps, deps_w)
            ));

            for block in detail_blocks(
                graph,
                row.id,
                &self.display,
                DependencyListing::All,
                self.colored,
            ) {
                let entries = block.visible_entries(self.display.verbose, self.colored);
                lines.push(format!(
                    "    {}: {}",
                    block.heading(self.colored),
                    entries.join(", ")
                ));
            }
        }

        if hidden > 0 {
            let noun = if hidden == 1 { "island" } else { "islands" };
            lines.push(String::new());
            lines.push(self.color(&format!("{hidden} {noun} hidden"), "dim"));
        }

        lines.extend(statistics_block(graph, self.colored));
        for line in &lines {
            writeln!(writer, "{line}")?;
        }
        Ok(())
    }

    fn format(&self) -> OutputFormat {
        OutputFormat::Flat
    }
}
