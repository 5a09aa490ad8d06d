//! Shared type definitions for the Waymark location tracker.
//!
//! This crate holds the plain value types that cross crate boundaries:
//! rule sets, map placements, image references, and the persisted
//! section counters. Types flow downstream to `TypeScript` via `ts-rs`
//! for the tracker UI.
//!
//! # Modules
//!
//! - [`ids`] -- Stable integer handles for locations inside a tree
//! - [`rules`] -- [`RuleSet`] (OR of AND-clauses) and its inheritance merge
//! - [`structs`] -- Map placements, image sets, persisted section state

pub mod ids;
pub mod rules;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use ids::LocationHandle;
pub use rules::{Clause, RuleSet};
pub use structs::{ImageSet, MapLocation, SectionSave, TrackerSnapshot};
