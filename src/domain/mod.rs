//! Domain layer - value objects, aggregates, and business rules.
//!
//! Organized by bounded concern:
//! - `foundation` - shared value objects (ids, timestamps)
//! - `catalog` - immutable course catalog and policy text
//! - `session` - per-user session aggregate and its mutable state
//! - `operations` - the closed, schema-validated operation surface
//! - `agents` - agent kinds and their instruction policies

pub mod agents;
pub mod catalog;
pub mod foundation;
pub mod operations;
pub mod session;
