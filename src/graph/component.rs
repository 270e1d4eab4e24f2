//! Graph node type.

use super::NodeId;
use crate::model::{
    Annotation, ComponentType, Composition, DocComponent, Hash, Property, Severity, Vulnerability,
};

/// A dependency declared by the producer, resolved against the graph.
///
/// Dependency records are logical references only; they never affect the
/// assembly tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyRecord {
    /// Reference string exactly as declared
    pub reference: String,
    /// Resolved target, `None` when no node matches the reference
    pub target: Option<NodeId>,
}

impl DependencyRecord {
    /// Whether the reference resolved to a node
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.target.is_some()
    }
}

/// One component of the consolidated graph, with every cross-cutting
/// document section that refers to it joined in.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedComponent {
    /// Primary key in the graph (bom-ref, else name, possibly suffixed)
    pub key: String,
    /// Producer-assigned BOM reference
    pub bom_ref: Option<String>,
    pub component_type: ComponentType,
    pub name: String,
    pub version: Option<String>,
    pub purl: Option<String>,
    pub cpe: Option<String>,
    pub description: Option<String>,
    pub group: Option<String>,
    pub scope: Option<String>,
    pub supplier: Option<String>,
    pub licenses: Vec<String>,
    pub hashes: Vec<Hash>,
    pub properties: Vec<Property>,
    /// Vulnerabilities whose `affects` list names this component
    pub vulnerabilities: Vec<Vulnerability>,
    /// Annotations whose subjects include this component
    pub annotations: Vec<Annotation>,
    /// Compositions whose assemblies include this component
    pub compositions: Vec<Composition>,
    /// Assembly parent
    pub parent: Option<NodeId>,
    /// Assembly children, in document order
    pub children: Vec<NodeId>,
    /// Declared dependencies, in document order, deduplicated by reference
    pub dependencies: Vec<DependencyRecord>,
    /// 0 when reachable from the primary component, otherwise the island number
    pub island_id: usize,
    /// Number of dependency records that resolved to a node
    pub resolved_dependency_count: usize,
}

impl EnrichedComponent {
    /// Create a node from a document component. Links and joins start empty.
    #[must_use]
    pub fn from_doc(key: String, comp: &DocComponent) -> Self {
        Self {
            key,
            bom_ref: comp.bom_ref().map(str::to_string),
            component_type: comp.component_type.clone(),
            name: comp.name.clone(),
            version: comp.version.clone(),
            purl: comp.purl.clone(),
            cpe: comp.cpe.clone(),
            description: comp.description.clone(),
            group: comp.group.clone(),
            scope: comp.scope.clone(),
            supplier: comp.supplier.clone(),
            licenses: comp.licenses.clone(),
            hashes: comp.hashes.clone(),
            properties: comp.properties.clone(),
            vulnerabilities: Vec::new(),
            annotations: Vec::new(),
            compositions: Vec::new(),
            parent: None,
            children: Vec::new(),
            dependencies: Vec::new(),
            island_id: 0,
            resolved_dependency_count: 0,
        }
    }

    /// `name@version`, or just the name when there is no version
    #[must_use]
    pub fn display_name(&self) -> String {
        let name = if self.name.is_empty() {
            self.key.as_str()
        } else {
            self.name.as_str()
        };
        match &self.version {
            Some(v) if !v.is_empty() => format!("{name}@{v}"),
            _ => name.to_string(),
        }
    }

    /// Keys under which cross-cutting sections may reference this node:
    /// bom-ref, purl and primary key, without duplicates.
    pub fn identity_keys(&self) -> impl Iterator<Item = &str> {
        let bom_ref = self.bom_ref.as_deref();
        let purl = self.purl.as_deref().filter(|p| Some(*p) != bom_ref);
        let key = Some(self.key.as_str()).filter(|k| Some(*k) != bom_ref && Some(*k) != purl);
        bom_ref.into_iter().chain(purl).chain(key)
    }

    /// Resolved dependency targets, in declaration order
    pub fn resolved_dependencies(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.dependencies.iter().filter_map(|d| d.target)
    }

    /// Number of dependency references that did not resolve
    #[must_use]
    pub fn unresolved_dependency_count(&self) -> usize {
        self.dependencies.len() - self.resolved_dependency_count
    }

    /// Highest severity among attached vulnerabilities
    #[must_use]
    pub fn max_severity(&self) -> Option<Severity> {
        self.vulnerabilities.iter().map(Vulnerability::severity).max()
    }

    /// Whether this node is the root of an assembly tree
    #[must_use]
    pub const fn is_assembly_root(&self) -> bool {
        self.parent.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(name: &str) -> EnrichedComponent {
        EnrichedComponent::from_doc(
            name.to_string(),
            &DocComponent::new(name, ComponentType::Library),
        )
    }

    #[test]
    fn test_display_name() {
        let mut n = node("serde");
        assert_eq!(n.display_name(), "serde");
        n.version = Some("1.0.0".to_string());
        assert_eq!(n.display_name(), "serde@1.0.0");
    }

    #[test]
    fn test_identity_keys_are_deduplicated() {
        let mut n = node("lib");
        n.bom_ref = Some("lib".to_string());
        n.purl = Some("pkg:cargo/lib@1.0".to_string());
        let keys: Vec<_> = n.identity_keys().collect();
        assert_eq!(keys, vec!["lib", "pkg:cargo/lib@1.0"]);
    }

    #[test]
    fn test_unresolved_count() {
        let mut n = node("lib");
        n.dependencies = vec![
            DependencyRecord {
                reference: "a".to_string(),
                target: Some(NodeId::new(0)),
            },
            DependencyRecord {
                reference: "missing".to_string(),
                target: None,
            },
        ];
        n.resolved_dependency_count = 1;
        assert_eq!(n.unresolved_dependency_count(), 1);
        assert_eq!(n.resolved_dependencies().collect::<Vec<_>>(), vec![NodeId::new(0)]);
    }
}
