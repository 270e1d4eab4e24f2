//! Document model consumed by the graph engine.
//!
//! The parser produces an [`SbomDocument`]; the graph builder turns it into a
//! consolidated [`crate::graph::ComponentGraph`]. Nothing in this module is
//! derived or mutated after parsing.

mod metadata;
mod sbom;
mod vulnerability;

pub use metadata::*;
pub use sbom::*;
pub use vulnerability::*;
