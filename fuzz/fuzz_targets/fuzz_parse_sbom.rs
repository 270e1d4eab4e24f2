#![no_main]
use libfuzzer_sys::fuzz_target;

/// Fuzz the CycloneDX JSON entry point.
///
/// Feeds arbitrary UTF-8 strings to `parse_sbom_str`; anything that parses
/// is also built and analyzed, since the graph passes run on untrusted
/// producer output.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(doc) = sbom_graph::parsers::parse_sbom_str(s) {
            let _ = sbom_graph::build_and_analyze(&doc);
        }
    }
});
