//! End-to-end tests for the view pipeline: config → parse → render → sink.

use sbom_graph::cli::run_view;
use sbom_graph::config::{load_config_file, load_or_default, DisplayOptions, ViewConfig};
use sbom_graph::pipeline::{exit_codes, parse_sbom_with_context, render_document, validate_config};
use sbom_graph::render::JsonGraphDocument;
use sbom_graph::OutputFormat;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn fixture_path(name: &str) -> PathBuf {
    Path::new(FIXTURES_DIR).join(name)
}

// ============================================================================
// Config validation
// ============================================================================

mod validation {
    use super::*;

    #[test]
    fn negative_max_depth_is_rejected() {
        let config = ViewConfig::builder().max_depth(-1).build();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("display.max_depth"));
    }

    #[test]
    fn unknown_severity_is_rejected() {
        let config = ViewConfig::builder()
            .min_severity(Some("severe".to_string()))
            .build();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&ViewConfig::default()).is_ok());
    }
}

// ============================================================================
// Rendering stage
// ============================================================================

mod rendering {
    use super::*;

    #[test]
    fn severity_filter_reaches_json_output() {
        let doc = parse_sbom_with_context(&fixture_path("severities.cdx.json")).unwrap();
        let config = ViewConfig::builder()
            .format(OutputFormat::Json)
            .min_severity(Some("high".to_string()))
            .build();

        let outcome = render_document(&doc, &config, false).unwrap();
        let json: JsonGraphDocument = serde_json::from_str(&outcome.output).unwrap();
        let names: Vec<&str> = json.components.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["crit", "hi"]);
        assert_eq!(outcome.statistics.total_components, 2);
        assert_eq!(json.statistics, outcome.statistics);
    }

    #[test]
    fn warnings_are_returned_not_rendered() {
        let doc = sbom_graph::parse_sbom_str(
            r#"{
                "bomFormat": "CycloneDX",
                "specVersion": "1.5",
                "components": [{"type": "library", "name": "lone", "bom-ref": "lone"}]
            }"#,
        )
        .unwrap();
        let outcome = render_document(&doc, &ViewConfig::default(), false).unwrap();

        assert!(outcome.warnings.iter().any(|w| w.contains("primary")));
        assert!(outcome.output.contains("lone [library]"));
    }

    #[test]
    fn tree_has_no_ansi_codes_without_color() {
        let doc = parse_sbom_with_context(&fixture_path("severities.cdx.json")).unwrap();
        let outcome = render_document(&doc, &ViewConfig::default(), false).unwrap();
        assert!(!outcome.output.contains('\x1b'));

        let colored = render_document(&doc, &ViewConfig::default(), true).unwrap();
        assert!(colored.output.contains('\x1b'));
    }
}

// ============================================================================
// Config files
// ============================================================================

mod config_files {
    use super::*;

    #[test]
    fn yaml_config_loads_and_merges_under_cli() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".sbom-graph.yaml");
        std::fs::write(
            &path,
            "format: flat\ndisplay:\n  show_licenses: true\n  max_depth: 3\nfilter:\n  min_severity: high\n",
        )
        .unwrap();

        let (mut config, loaded) = load_or_default(Some(&path)).unwrap();
        assert_eq!(loaded.as_deref(), Some(path.as_path()));
        assert_eq!(config.format, OutputFormat::Flat);
        assert!(config.display.show_licenses);
        assert_eq!(config.display.max_depth, 3);
        assert_eq!(config.filter.min_severity.as_deref(), Some("high"));

        let cli = ViewConfig::builder()
            .format(OutputFormat::Json)
            .display(DisplayOptions {
                max_depth: 5,
                ..Default::default()
            })
            .build();
        config.merge(&cli);

        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.display.max_depth, 5);
        assert!(config.display.show_licenses);
        assert_eq!(config.filter.min_severity.as_deref(), Some("high"));
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let tmp = TempDir::new().unwrap();
        assert!(load_config_file(&tmp.path().join("absent.yaml")).is_err());
        assert!(load_or_default(Some(&tmp.path().join("absent.yaml"))).is_err());
    }
}

// ============================================================================
// Full command
// ============================================================================

mod view_command {
    use super::*;

    #[test]
    fn collapsed_flat_output_to_file() {
        let tmp = TempDir::new().unwrap();
        let output = tmp.path().join("view.txt");
        let config = ViewConfig::builder()
            .format(OutputFormat::Flat)
            .collapse_islands(true)
            .no_color(true)
            .output(Some(output.clone()))
            .build();

        let code = run_view(config, &fixture_path("orphan_island.cdx.json")).unwrap();
        assert_eq!(code, exit_codes::SUCCESS);

        let text = std::fs::read_to_string(output).unwrap();
        assert!(text.contains("core@0.3.0"));
        assert!(!text.contains("orphan"));
        assert!(text.contains("Statistics"));
    }

    #[test]
    fn unparseable_input_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("broken.json");
        let output = tmp.path().join("view.txt");
        std::fs::write(&input, "{ not json").unwrap();

        let config = ViewConfig::builder().output(Some(output.clone())).build();
        assert!(run_view(config, &input).is_err());
        assert!(!output.exists());
    }
}
