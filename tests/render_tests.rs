//! Renderer tests over CycloneDX fixtures.

use sbom_graph::render::{FlatRenderer, JsonGraphDocument, JsonRenderer, TreeRenderer};
use sbom_graph::{
    build_and_analyze, create_renderer, parse_sbom, AnalyzedGraph, DisplayOptions, OutputFormat,
    Renderer,
};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn fixture_path(name: &str) -> PathBuf {
    Path::new(FIXTURES_DIR).join(name)
}

fn load(name: &str) -> AnalyzedGraph {
    let doc = parse_sbom(&fixture_path(name)).expect("fixture should parse");
    build_and_analyze(&doc)
}

fn tree(graph: &AnalyzedGraph, display: DisplayOptions) -> String {
    TreeRenderer::new(display)
        .no_color()
        .render_to_string(graph)
        .expect("tree renders")
}

fn flat(graph: &AnalyzedGraph, display: DisplayOptions) -> String {
    FlatRenderer::new(display)
        .no_color()
        .render_to_string(graph)
        .expect("flat renders")
}

fn collapsed() -> DisplayOptions {
    DisplayOptions {
        collapse_islands: true,
        ..Default::default()
    }
}

// ============================================================================
// Tree
// ============================================================================

mod tree_output {
    use super::*;

    #[test]
    fn self_edge_prints_one_circular_marker() {
        let output = tree(&load("self_edge.cdx.json"), DisplayOptions::default());

        assert!(output.contains("app@v1 [application] (primary)"));
        assert_eq!(output.matches("libA@v2 [library]").count(), 1);
        assert_eq!(output.matches("(circular reference)").count(), 1);
        assert!(output.contains("↻ libA@v2 (circular reference)"));
    }

    #[test]
    fn dependency_cycle_output_is_bounded() {
        let graph = load("cycle.cdx.json");

        let primary_only = tree(&graph, collapsed());
        assert_eq!(primary_only.matches("(circular reference)").count(), 1);

        let full = tree(&graph, DisplayOptions::all());
        assert!(full.contains("Island 1 (2 components)"));
        assert!(full.lines().count() < 80);
    }

    #[test]
    fn max_depth_truncates_with_note() {
        let display = DisplayOptions {
            max_depth: 1,
            ..Default::default()
        };
        let output = tree(&load("self_edge.cdx.json"), display);

        assert!(output.contains("libA@v2 [library]"));
        assert!(output.contains("(max depth 1 reached)"));
        assert!(!output.contains("(circular reference)"));
    }

    #[test]
    fn collapsed_islands_are_omitted() {
        let graph = load("orphan_island.cdx.json");

        let shown = tree(&graph, DisplayOptions::default());
        assert!(shown.contains("Island 1 (1 components)"));
        assert!(shown.contains("orphan@9.9.9"));

        let hidden = tree(&graph, collapsed());
        assert!(!hidden.contains("orphan"));
        assert!(hidden.contains("1 island hidden"));
    }

    #[test]
    fn statistics_block_is_last() {
        let output = tree(&load("severities.cdx.json"), DisplayOptions::default());
        let stats_at = output.find("Statistics").expect("statistics block present");
        assert!(output[..stats_at].contains("clean@1.0.0"));
        let components = output[stats_at..]
            .lines()
            .find(|line| line.starts_with("Components:"))
            .expect("component count line");
        assert!(components.trim_end().ends_with(" 5"));
    }

    #[test]
    fn vulnerability_block_shows_severity() {
        let output = tree(&load("severities.cdx.json"), DisplayOptions::default());
        assert!(output.contains("CVE-2024-0001"));
        assert!(output.contains("[critical]"));
    }
}

// ============================================================================
// Flat
// ============================================================================

mod flat_output {
    use super::*;

    #[test]
    fn one_row_per_component() {
        let output = flat(&load("severities.cdx.json"), DisplayOptions::default());
        for name in ["app@1.0.0", "crit@1.0.0", "hi@1.0.0", "med@1.0.0", "clean@1.0.0"] {
            assert_eq!(output.matches(name).count(), 1, "{name} listed once");
        }
    }

    #[test]
    fn collapsed_islands_are_omitted() {
        let graph = load("orphan_island.cdx.json");
        assert!(flat(&graph, DisplayOptions::default()).contains("orphan@9.9.9"));

        let hidden = flat(&graph, collapsed());
        assert!(!hidden.contains("orphan"));
        assert!(hidden.contains("core@0.3.0"));
    }

    #[test]
    fn primary_row_comes_first() {
        let output = flat(&load("orphan_island.cdx.json"), DisplayOptions::default());
        let app = output.find("app@1.0.0").expect("primary listed");
        let orphan = output.find("orphan@9.9.9").expect("orphan listed");
        assert!(app < orphan);
    }
}

// ============================================================================
// JSON
// ============================================================================

mod json_output {
    use super::*;

    fn document(graph: &AnalyzedGraph) -> JsonGraphDocument {
        let text = JsonRenderer::new()
            .render_to_string(graph)
            .expect("json renders");
        serde_json::from_str(&text).expect("output parses back")
    }

    #[test]
    fn round_trip_preserves_nodes_and_topology() {
        let graph = load("severities.cdx.json");
        let doc = document(&graph);
        assert_eq!(doc, JsonGraphDocument::from_graph(&graph));

        let keys: BTreeSet<&str> = doc.components.iter().map(|c| c.key.as_str()).collect();
        let expected: BTreeSet<&str> = graph.nodes().map(|(_, n)| n.key.as_str()).collect();
        assert_eq!(keys, expected);

        for (_, node) in graph.nodes() {
            let json = doc.component(&node.key).expect("component present");
            assert_eq!(json.name, node.name);
            assert_eq!(json.version, node.version);
            let children: Vec<&str> = node
                .children
                .iter()
                .map(|&c| graph.node(c).key.as_str())
                .collect();
            assert_eq!(json.children, children);
            assert_eq!(json.parent.as_deref(), node.parent.map(|p| graph.node(p).key.as_str()));
        }
    }

    #[test]
    fn json_ignores_island_collapsing() {
        let graph = load("orphan_island.cdx.json");
        let renderer = create_renderer(OutputFormat::Json, &collapsed(), false);
        let text = renderer.render_to_string(&graph).expect("json renders");
        let doc: JsonGraphDocument = serde_json::from_str(&text).expect("parses");

        let orphan = doc.component("orphan").expect("orphan kept");
        assert_eq!(orphan.island_id, 1);
        assert_eq!(doc.islands.len(), 1);
        assert_eq!(doc.islands[0].members, vec!["orphan".to_string()]);
    }

    #[test]
    fn self_edge_dependency_record_resolves() {
        let doc = document(&load("self_edge.cdx.json"));
        let lib = doc.component("libA").expect("libA");
        assert_eq!(lib.dependencies.len(), 1);
        assert_eq!(lib.dependencies[0].target.as_deref(), Some("libA"));
        assert_eq!(lib.depth, 0);
        assert_eq!(lib.level, 1);
        assert_eq!(doc.component("root").expect("root").depth, 1);
    }
}
