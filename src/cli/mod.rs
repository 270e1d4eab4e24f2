//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by main.rs.
//! Each handler implements the business logic for a specific CLI subcommand.

mod schema;
mod view;

pub use schema::{run_schema, SchemaKind};
pub use view::run_view;

// Re-export config types used by handlers
pub use crate::config::ViewConfig;
