//! Property-based tests for graph analysis.
//!
//! Random documents with arbitrary (often cyclic) dependency edges must
//! always build, analyze and render without panicking, and the island and
//! depth invariants must hold for every one of them.

use proptest::prelude::*;
use sbom_graph::model::{ComponentType, DependencyPair, DocComponent, SbomDocument};
use sbom_graph::render::{JsonGraphDocument, JsonRenderer, TreeRenderer};
use sbom_graph::{build_and_analyze, filter_graph, DisplayOptions, FilterConfig, Renderer};
use std::collections::BTreeSet;

fn component(i: usize) -> DocComponent {
    DocComponent::new(format!("c{i}"), ComponentType::Library)
        .with_bom_ref(format!("c{i}"))
        .with_version("1.0.0")
}

/// `nested` components hang below the primary, the rest are top level.
/// Edge endpoints index into the components; `n` stands for the primary.
fn document(n: usize, nested: usize, edges: &[(usize, usize)]) -> SbomDocument {
    let nested = nested.min(n);
    let mut primary = DocComponent::new("app", ComponentType::Application).with_bom_ref("app");
    for i in 0..nested {
        primary = primary.with_child(component(i));
    }

    let name = |i: usize| {
        if i >= n {
            "app".to_string()
        } else {
            format!("c{i}")
        }
    };
    let dependencies = edges
        .iter()
        .map(|&(from, to)| DependencyPair::new(name(from % (n + 1)), vec![name(to % (n + 1))]))
        .collect();

    SbomDocument {
        primary: Some(primary),
        components: (nested..n).map(component).collect(),
        dependencies,
        ..Default::default()
    }
}

fn doc_strategy() -> impl Strategy<Value = SbomDocument> {
    (1usize..16)
        .prop_flat_map(|n| {
            (
                Just(n),
                0..=n,
                prop::collection::vec((0..=n, 0..=n), 0..40),
            )
        })
        .prop_map(|(n, nested, edges)| document(n, nested, &edges))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn islands_partition_unreached_nodes(doc in doc_strategy()) {
        let graph = build_and_analyze(&doc);
        let primary = graph.primary().expect("primary declared");

        // Assembly reachability from the primary
        let mut reached = BTreeSet::new();
        let mut stack = vec![primary];
        while let Some(id) = stack.pop() {
            if reached.insert(id) {
                stack.extend(graph.node(id).children.iter().copied());
            }
        }

        let mut seen = BTreeSet::new();
        let mut ids = BTreeSet::new();
        for island in graph.islands() {
            prop_assert!(island.id > 0);
            prop_assert!(ids.insert(island.id), "island ids are unique");
            for &member in &island.members {
                prop_assert!(seen.insert(member), "node in more than one island");
                prop_assert_eq!(graph.node(member).island_id, island.id);
            }
        }

        for (id, node) in graph.nodes() {
            if reached.contains(&id) {
                prop_assert_eq!(node.island_id, 0);
            } else {
                prop_assert!(node.island_id > 0);
                prop_assert!(seen.contains(&id));
            }
        }
    }

    #[test]
    fn assembly_levels_step_by_one(doc in doc_strategy()) {
        let graph = build_and_analyze(&doc);
        let depths = graph.depths();
        prop_assert_eq!(depths.level(graph.primary().expect("primary")), 0);
        for (id, node) in graph.nodes() {
            for &child in &node.children {
                prop_assert_eq!(depths.level(child), depths.level(id) + 1);
            }
        }
    }

    #[test]
    fn tree_output_is_bounded(doc in doc_strategy()) {
        let graph = build_and_analyze(&doc);
        let output = TreeRenderer::new(DisplayOptions::all())
            .no_color()
            .render_to_string(&graph)
            .expect("tree renders");
        let n = graph.len();
        prop_assert!(output.lines().count() <= 8 * (n + 1) * (n + 12) + 100);
    }

    #[test]
    fn json_is_complete_and_default_filter_is_identity(doc in doc_strategy()) {
        let graph = build_and_analyze(&doc);
        prop_assert_eq!(graph.len(), doc.component_count());

        let filtered = filter_graph(&graph, &FilterConfig::default());
        prop_assert!(std::ptr::eq(&*filtered, &graph));

        let text = JsonRenderer::new()
            .compact()
            .render_to_string(&graph)
            .expect("json renders");
        let json: JsonGraphDocument = serde_json::from_str(&text).expect("json parses");
        prop_assert_eq!(json.components.len(), graph.len());
    }
}
