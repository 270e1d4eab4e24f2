//! Summary statistics over an analyzed graph.
//!
//! Computed in one pass over the nodes using the depth cache that the
//! analysis pass already filled in.

use crate::graph::AnalyzedGraph;
use crate::model::Severity;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Vulnerability counts bucketed by severity.
///
/// A vulnerability attached to several components is counted once per
/// component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SeverityCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub none: usize,
    pub unknown: usize,
}

impl SeverityCounts {
    fn record(&mut self, severity: Severity) {
        let slot = match severity {
            Severity::Critical => &mut self.critical,
            Severity::High => &mut self.high,
            Severity::Medium => &mut self.medium,
            Severity::Low => &mut self.low,
            Severity::None => &mut self.none,
            Severity::Unknown => &mut self.unknown,
        };
        *slot += 1;
    }

    /// Sum over every bucket
    #[must_use]
    pub const fn total(&self) -> usize {
        self.critical + self.high + self.medium + self.low + self.none + self.unknown
    }

    /// Buckets from most to least severe, empty buckets included
    #[must_use]
    pub const fn buckets(&self) -> [(Severity, usize); 6] {
        [
            (Severity::Critical, self.critical),
            (Severity::High, self.high),
            (Severity::Medium, self.medium),
            (Severity::Low, self.low),
            (Severity::None, self.none),
            (Severity::Unknown, self.unknown),
        ]
    }
}

/// Summary counts for a graph
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GraphStatistics {
    pub total_components: usize,
    pub resolved_dependencies: usize,
    pub unresolved_dependencies: usize,
    pub vulnerabilities: SeverityCounts,
    /// Vulnerability attachments whose analysis state is not resolved
    pub unresolved_vulnerabilities: usize,
    /// Component-level plus global annotations
    pub annotations: usize,
    /// Component-level plus global compositions
    pub compositions: usize,
    pub islands: usize,
    /// Component count per type name, sorted by name
    pub component_types: BTreeMap<String, usize>,
    /// Largest subtree depth
    pub max_depth: usize,
    /// Edges cut by the cycle guard
    pub circular_references: usize,
}

impl GraphStatistics {
    /// Compute statistics for a graph.
    #[must_use]
    pub fn from_graph(graph: &AnalyzedGraph) -> Self {
        let mut stats = Self {
            total_components: graph.len(),
            annotations: graph.global_annotations().len(),
            compositions: graph.global_compositions().len(),
            islands: graph.islands().len(),
            max_depth: graph.depths().max_subtree_depth(),
            circular_references: graph.depths().circular_edges().count(),
            ..Self::default()
        };

        for (_, node) in graph.nodes() {
            stats.resolved_dependencies += node.resolved_dependency_count;
            stats.unresolved_dependencies += node.unresolved_dependency_count();
            stats.annotations += node.annotations.len();
            stats.compositions += node.compositions.len();
            *stats
                .component_types
                .entry(node.component_type.to_string())
                .or_insert(0) += 1;
            for vuln in &node.vulnerabilities {
                stats.vulnerabilities.record(vuln.severity());
                if !vuln.is_resolved() {
                    stats.unresolved_vulnerabilities += 1;
                }
            }
        }
        stats
    }

    /// Plain-text statistics block, one entry per line
    #[must_use]
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Components:             {}", self.total_components),
            format!(
                "Dependencies:           {} resolved, {} unresolved",
                self.resolved_dependencies, self.unresolved_dependencies
            ),
        ];

        let total = self.vulnerabilities.total();
        if total == 0 {
            lines.push("Vulnerabilities:        0".to_string());
        } else {
            let buckets: Vec<String> = self
                .vulnerabilities
                .buckets()
                .iter()
                .filter(|(_, count)| *count > 0)
                .map(|(severity, count)| format!("{count} {severity}"))
                .collect();
            lines.push(format!(
                "Vulnerabilities:        {total} ({}), {} unresolved",
                buckets.join(", "),
                self.unresolved_vulnerabilities
            ));
        }

        lines.push(format!("Annotations:            {}", self.annotations));
        lines.push(format!("Compositions:           {}", self.compositions));
        lines.push(format!("Islands:                {}", self.islands));
        lines.push(format!("Max depth:              {}", self.max_depth));
        if self.circular_references > 0 {
            lines.push(format!(
                "Circular references:    {}",
                self.circular_references
            ));
        }
        if !self.component_types.is_empty() {
            let types: Vec<String> = self
                .component_types
                .iter()
                .map(|(ty, count)| format!("{ty}: {count}"))
                .collect();
            lines.push(format!("Types:                  {}", types.join(", ")));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_and_analyze;
    use crate::model::{
        Analysis, Annotation, ComponentType, DependencyPair, DocComponent, Rating, SbomDocument,
        Vulnerability,
    };

    fn vuln(severity: Option<&str>, affects: &[&str]) -> Vulnerability {
        Vulnerability {
            id: "CVE-2024-1".to_string(),
            ratings: vec![Rating {
                severity: severity.map(str::to_string),
                ..Default::default()
            }],
            affects: affects.iter().map(|s| (*s).to_string()).collect(),
            ..Default::default()
        }
    }

    fn sample() -> SbomDocument {
        let lib = |name: &str| DocComponent::new(name, ComponentType::Library).with_bom_ref(name);
        SbomDocument {
            primary: Some(
                DocComponent::new("app", ComponentType::Application)
                    .with_bom_ref("app")
                    .with_child(lib("a"))
                    .with_child(lib("b")),
            ),
            components: vec![lib("orphan")],
            dependencies: vec![DependencyPair::new(
                "a",
                vec!["b".to_string(), "missing".to_string()],
            )],
            vulnerabilities: vec![
                vuln(Some("critical"), &["a", "b"]),
                vuln(Some("bogus"), &["orphan"]),
                Vulnerability {
                    analysis: Some(Analysis {
                        state: Some("not_affected".to_string()),
                        ..Default::default()
                    }),
                    ..vuln(Some("low"), &["b"])
                },
            ],
            annotations: vec![
                Annotation {
                    subjects: vec!["a".to_string()],
                    annotator: "tester".to_string(),
                    text: "checked".to_string(),
                    ..Default::default()
                },
                Annotation {
                    subjects: vec!["nowhere".to_string()],
                    annotator: "tester".to_string(),
                    text: "global".to_string(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_counts() {
        let stats = GraphStatistics::from_graph(&build_and_analyze(&sample()));
        assert_eq!(stats.total_components, 4);
        assert_eq!(stats.resolved_dependencies, 1);
        assert_eq!(stats.unresolved_dependencies, 1);
        assert_eq!(stats.vulnerabilities.critical, 2);
        assert_eq!(stats.vulnerabilities.low, 1);
        assert_eq!(stats.vulnerabilities.unknown, 1);
        assert_eq!(stats.vulnerabilities.total(), 4);
        assert_eq!(stats.unresolved_vulnerabilities, 3);
        assert_eq!(stats.annotations, 2);
        assert_eq!(stats.islands, 1);
        assert_eq!(stats.component_types.get("library"), Some(&3));
        assert_eq!(stats.component_types.get("application"), Some(&1));
        assert_eq!(stats.max_depth, 1);
    }

    #[test]
    fn test_empty_graph() {
        let stats = GraphStatistics::from_graph(&build_and_analyze(&SbomDocument::default()));
        assert_eq!(stats, GraphStatistics::default());
        assert!(stats.summary_lines()[0].ends_with('0'));
    }

    #[test]
    fn test_summary_lines_skip_empty_buckets() {
        let stats = GraphStatistics::from_graph(&build_and_analyze(&sample()));
        let vulns = stats
            .summary_lines()
            .into_iter()
            .find(|l| l.starts_with("Vulnerabilities"))
            .unwrap();
        assert!(vulns.contains("2 critical, 1 low, 1 unknown"));
        assert!(!vulns.contains("high"));
    }
}
