//! Location model, rule inheritance, and section clearing state for Waymark.
//!
//! This crate turns pack JSON into a flat tree of resolved locations. Each
//! location inherits access and visibility rules from its enclosing node
//! (or from an explicitly named parent), and owns sections whose clearing
//! counters are driven by the tracker at runtime.
//!
//! # Modules
//!
//! - [`builder`] -- Depth-first construction of [`Location`]s from JSON,
//!   with rule and image inheritance.
//! - [`bridge`] -- Named property access to section state for scripted
//!   callers.
//! - [`diagnostics`] -- Non-fatal problems recorded while building.
//! - [`error`] -- Error types for lookups and state records.
//! - [`fields`] -- Lenient readers for loosely typed JSON fields.
//! - [`location`] -- [`Location`] and identifier derivation.
//! - [`parent`] -- Exact-then-suffix resolution of `parent` references.
//! - [`rules`] -- Parsing of rule fields into clauses.
//! - [`section`] -- [`Section`] and the [`SectionState`] counter machine.
//! - [`tree`] -- [`LocationTree`], the merged result of all fragments.

pub mod bridge;
pub mod builder;
pub mod diagnostics;
pub mod error;
pub mod fields;
pub mod location;
pub mod parent;
pub mod rules;
pub mod section;
pub mod tree;

// Re-export primary types at crate root.
pub use bridge::{PropertyBridge, PropertyValue, SectionProperty};
pub use builder::{BuildContext, BuildOutput, LocationBuilder, build_section};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use error::{BridgeError, WorldError};
pub use location::{Location, location_id};
pub use parent::{LocationLookup, ParentResolver};
pub use section::{ObserverId, Section, SectionChange, SectionState};
pub use tree::{LocationTree, Progress};
