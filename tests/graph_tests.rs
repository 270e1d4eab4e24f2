//! Graph construction and analysis tests over CycloneDX fixtures.

use sbom_graph::{
    build_and_analyze, filter_graph, parse_sbom, parse_sbom_str, AnalyzedGraph, FilterConfig,
    GraphStatistics, Severity,
};
use std::path::{Path, PathBuf};

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn fixture_path(name: &str) -> PathBuf {
    Path::new(FIXTURES_DIR).join(name)
}

fn load(name: &str) -> AnalyzedGraph {
    let doc = parse_sbom(&fixture_path(name)).expect("fixture should parse");
    build_and_analyze(&doc)
}

fn names(graph: &AnalyzedGraph) -> Vec<String> {
    graph.nodes().map(|(_, node)| node.name.clone()).collect()
}

// ============================================================================
// Construction
// ============================================================================

mod construction {
    use super::*;

    #[test]
    fn self_edge_document_has_two_nodes() {
        let graph = load("self_edge.cdx.json");
        assert_eq!(graph.len(), 2);

        let root = graph.primary().expect("primary declared");
        let lib = graph.id_of("libA").expect("libA present");
        assert_eq!(graph.node(root).children, vec![lib]);
        assert_eq!(graph.node(lib).parent, Some(root));
        assert_eq!(graph.node(lib).resolved_dependency_count, 1);
        assert!(graph.islands().is_empty());
    }

    #[test]
    fn primary_is_inserted_last() {
        let graph = load("orphan_island.cdx.json");
        assert_eq!(names(&graph), vec!["orphan", "app", "core"]);
        assert_eq!(graph.primary(), graph.id_of("app"));
    }

    #[test]
    fn empty_document_yields_empty_graph() {
        let doc = parse_sbom_str(r#"{"bomFormat": "CycloneDX", "specVersion": "1.5"}"#)
            .expect("minimal document parses");
        let graph = build_and_analyze(&doc);
        assert!(graph.is_empty());
        assert!(graph.primary().is_none());
        assert!(graph.islands().is_empty());
        assert_eq!(GraphStatistics::from_graph(&graph).total_components, 0);
    }

    #[test]
    fn dangling_dependency_is_a_warning() {
        let doc = parse_sbom_str(
            r#"{
                "bomFormat": "CycloneDX",
                "specVersion": "1.5",
                "metadata": {"component": {"type": "application", "name": "app", "bom-ref": "app"}},
                "dependencies": [{"ref": "app", "dependsOn": ["ghost"]}]
            }"#,
        )
        .expect("document parses");
        let graph = build_and_analyze(&doc);

        let app = graph.node(graph.primary().expect("primary"));
        assert_eq!(app.dependencies.len(), 1);
        assert_eq!(app.resolved_dependency_count, 0);
        assert_eq!(app.unresolved_dependency_count(), 1);
        assert!(graph.warnings().iter().any(|w| w.contains("ghost")));
    }

    #[test]
    fn vulnerabilities_join_onto_components() {
        let graph = load("severities.cdx.json");
        let crit = graph.node(graph.id_of("crit").expect("crit"));
        assert_eq!(crit.vulnerabilities.len(), 1);
        assert_eq!(crit.max_severity(), Some(Severity::Critical));

        let clean = graph.node(graph.id_of("clean").expect("clean"));
        assert!(clean.vulnerabilities.is_empty());
        assert_eq!(clean.max_severity(), None);
    }

    #[test]
    fn fallback_lookup_finds_purl() {
        let graph = load("severities.cdx.json");
        assert_eq!(graph.find("pkg:cargo/crit@1.0.0"), graph.id_of("crit"));
        assert_eq!(graph.find("hi@1.0.0"), graph.id_of("hi"));
        assert_eq!(graph.find("unknown"), None);
    }
}

// ============================================================================
// Islands and depth
// ============================================================================

mod analysis {
    use super::*;

    #[test]
    fn self_edge_depths() {
        let graph = load("self_edge.cdx.json");
        let root = graph.primary().expect("primary");
        let lib = graph.id_of("libA").expect("libA");

        assert_eq!(graph.node(root).island_id, 0);
        assert_eq!(graph.node(lib).island_id, 0);
        assert_eq!(graph.depths().subtree_depth(root), 1);
        assert_eq!(graph.depths().subtree_depth(lib), 0);
        assert_eq!(graph.depths().level(root), 0);
        assert_eq!(graph.depths().level(lib), 1);
        assert!(graph.depths().is_circular_edge(lib, lib));
    }

    #[test]
    fn orphan_forms_single_island() {
        let graph = load("orphan_island.cdx.json");
        assert_eq!(graph.islands().len(), 1);

        let island = &graph.islands()[0];
        assert_eq!(island.id, 1);
        assert_eq!(island.members, vec![graph.id_of("orphan").expect("orphan")]);
        assert_eq!(graph.node(graph.id_of("core").expect("core")).island_id, 0);
    }

    #[test]
    fn dependency_cycle_outside_assembly_tree() {
        let graph = load("cycle.cdx.json");
        let a = graph.id_of("a").expect("a");
        let b = graph.id_of("b").expect("b");

        // Dependencies do not pull nodes into the primary's tree
        assert_eq!(graph.node(a).island_id, 1);
        assert_eq!(graph.node(b).island_id, 1);
        assert_eq!(graph.islands().len(), 1);
        assert!(graph.depths().circular_edges().count() >= 1);
        assert!(graph.depths().is_expandable(a));
        assert!(graph.depths().is_expandable(b));
    }

    #[test]
    fn assembly_levels_increase_by_one() {
        let graph = load("severities.cdx.json");
        let app = graph.primary().expect("primary");
        for &child in &graph.node(app).children {
            assert_eq!(
                graph.depths().level(child),
                graph.depths().level(app) + 1
            );
        }
    }
}

// ============================================================================
// Filtering and statistics
// ============================================================================

mod filtering {
    use super::*;

    #[test]
    fn min_severity_high_keeps_critical_and_high() {
        let graph = load("severities.cdx.json");
        let config = FilterConfig {
            min_severity: Some(Severity::High),
            ..Default::default()
        };
        let filtered = filter_graph(&graph, &config);
        assert_eq!(names(&filtered), vec!["crit", "hi"]);
    }

    #[test]
    fn only_unresolved_drops_resolved_vulnerability() {
        let graph = load("severities.cdx.json");
        let config = FilterConfig {
            only_unresolved: true,
            ..Default::default()
        };
        let filtered = filter_graph(&graph, &config);
        assert_eq!(names(&filtered), vec!["crit", "med"]);
    }

    #[test]
    fn type_filter_is_case_insensitive() {
        let graph = load("severities.cdx.json");
        let config = FilterConfig {
            types: vec!["FRAMEWORK".to_string()],
            ..Default::default()
        };
        assert_eq!(names(&filter_graph(&graph, &config)), vec!["med"]);
    }

    #[test]
    fn absent_type_yields_no_nodes() {
        let graph = load("severities.cdx.json");
        let config = FilterConfig {
            types: vec!["firmware".to_string()],
            ..Default::default()
        };
        assert!(filter_graph(&graph, &config).is_empty());
    }

    #[test]
    fn default_config_is_identity() {
        let graph = load("severities.cdx.json");
        let filtered = filter_graph(&graph, &FilterConfig::default());
        assert!(std::ptr::eq(&*filtered, &graph));
        assert_eq!(names(&filtered), names(&graph));
    }

    #[test]
    fn statistics_over_fixture() {
        let stats = GraphStatistics::from_graph(&load("severities.cdx.json"));
        assert_eq!(stats.total_components, 5);
        assert_eq!(stats.vulnerabilities.critical, 1);
        assert_eq!(stats.vulnerabilities.high, 1);
        assert_eq!(stats.vulnerabilities.medium, 1);
        assert_eq!(stats.vulnerabilities.total(), 3);
        assert_eq!(stats.unresolved_vulnerabilities, 2);
        assert_eq!(stats.islands, 0);
        assert_eq!(stats.max_depth, 1);
    }
}
