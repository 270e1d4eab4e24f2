//! Reference resolution through ordered identity fallbacks.
//!
//! Producers refer to components inconsistently: by bom-ref, by purl, by
//! CPE, or by bare name. A reference is looked up in each index in
//! [`LookupStrategy::ORDER`] and the first hit wins.

use super::{ComponentGraph, NodeId};

/// One identity index lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupStrategy {
    /// Exact primary key (bom-ref, else name)
    PrimaryKey,
    /// Package URL
    Purl,
    /// CPE identifier
    Cpe,
    /// `name@version`
    NameVersion,
    /// Bare name; the first component inserted with that name
    Name,
}

impl LookupStrategy {
    /// Resolution order, most specific first
    pub const ORDER: [Self; 5] = [
        Self::PrimaryKey,
        Self::Purl,
        Self::Cpe,
        Self::NameVersion,
        Self::Name,
    ];

    /// Look a reference up in this strategy's index
    #[must_use]
    pub fn lookup(self, graph: &ComponentGraph, reference: &str) -> Option<NodeId> {
        match self {
            Self::PrimaryKey => graph.id_of(reference),
            Self::Purl => graph.by_purl.get(reference).copied(),
            Self::Cpe => graph.by_cpe.get(reference).copied(),
            Self::NameVersion => graph.by_name_version.get(reference).copied(),
            Self::Name => graph
                .by_name
                .get(reference)
                .and_then(|ids| ids.first())
                .copied(),
        }
    }
}

impl std::fmt::Display for LookupStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PrimaryKey => write!(f, "key"),
            Self::Purl => write!(f, "purl"),
            Self::Cpe => write!(f, "cpe"),
            Self::NameVersion => write!(f, "name@version"),
            Self::Name => write!(f, "name"),
        }
    }
}

/// Resolves references against a graph's identity indices
#[derive(Debug, Clone, Copy)]
pub struct IdentityResolver<'g> {
    graph: &'g ComponentGraph,
}

impl<'g> IdentityResolver<'g> {
    /// Resolver using the full [`LookupStrategy::ORDER`]
    #[must_use]
    pub const fn new(graph: &'g ComponentGraph) -> Self {
        Self { graph }
    }

    /// Resolve a reference, stopping at the first strategy that matches
    #[must_use]
    pub fn resolve(&self, reference: &str) -> Option<NodeId> {
        self.resolve_with_strategy(reference).map(|(id, _)| id)
    }

    /// Resolve a reference and report which strategy matched
    #[must_use]
    pub fn resolve_with_strategy(&self, reference: &str) -> Option<(NodeId, LookupStrategy)> {
        if reference.is_empty() {
            return None;
        }
        LookupStrategy::ORDER
            .iter()
            .find_map(|s| s.lookup(self.graph, reference).map(|id| (id, *s)))
    }
}
