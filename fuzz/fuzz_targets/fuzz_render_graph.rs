#![no_main]
use libfuzzer_sys::fuzz_target;
use sbom_graph::model::{ComponentType, DependencyPair, DocComponent, SbomDocument};
use sbom_graph::{DisplayOptions, OutputFormat};

/// Fuzz graph analysis and rendering with arbitrary dependency topologies.
///
/// Each byte pair becomes one dependency edge between a small fixed set of
/// components, so cycles, self edges and diamonds all appear quickly. Every
/// renderer must terminate on every input.
fuzz_target!(|data: &[u8]| {
    const COMPONENTS: usize = 12;
    let name = |b: u8| format!("c{}", usize::from(b) % COMPONENTS);

    let mut primary = DocComponent::new("app", ComponentType::Application).with_bom_ref("app");
    let split = data.first().map_or(0, |b| usize::from(*b) % COMPONENTS);
    for i in 0..split {
        primary = primary.with_child(
            DocComponent::new(format!("c{i}"), ComponentType::Library).with_bom_ref(format!("c{i}")),
        );
    }

    let doc = SbomDocument {
        primary: Some(primary),
        components: (split..COMPONENTS)
            .map(|i| {
                DocComponent::new(format!("c{i}"), ComponentType::Library)
                    .with_bom_ref(format!("c{i}"))
            })
            .collect(),
        dependencies: data
            .chunks_exact(2)
            .map(|pair| DependencyPair::new(name(pair[0]), vec![name(pair[1])]))
            .collect(),
        ..Default::default()
    };

    let graph = sbom_graph::build_and_analyze(&doc);
    let display = DisplayOptions {
        max_depth: i64::from(data.last().copied().unwrap_or(0) % 4),
        ..DisplayOptions::all()
    };
    for format in [OutputFormat::Tree, OutputFormat::Flat, OutputFormat::Json] {
        let renderer = sbom_graph::create_renderer(format, &display, false);
        let _ = renderer.render_to_string(&graph);
    }
});
