//! Error types for the `waymark-world` crate.
//!
//! Building locations from pack data never fails: shape problems are
//! recorded as [`Diagnostic`](crate::diagnostics::Diagnostic)s instead.
//! The errors here cover lookups and state records handed in at runtime.

/// Errors that can occur during world-model operations.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// A location identifier did not match any location in the tree.
    #[error("location not found: {0}")]
    LocationNotFound(String),

    /// A section path did not match any section in the tree.
    #[error("section not found: {0}")]
    SectionNotFound(String),

    /// A section path had no `/` separating location and section name.
    #[error("malformed section path: {0}")]
    MalformedSectionPath(String),

    /// A persisted section record was not a JSON object.
    #[error("section state must be an object, got {kind}")]
    MalformedSectionState {
        /// JSON kind of the rejected value.
        kind: &'static str,
    },

    /// The tree ran out of handle space.
    #[error("location tree is full ({0} locations)")]
    TreeFull(usize),
}

/// Errors returned by the section property bridge.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BridgeError {
    /// No property with this name exists on a section.
    #[error("unknown section property: {0}")]
    UnknownProperty(String),

    /// The property exists but cannot be written.
    #[error("section property {0} is read-only")]
    ReadOnly(&'static str),

    /// The property exists but cannot be read.
    #[error("section property {0} is write-only")]
    WriteOnly(&'static str),

    /// The written value has the wrong type for the property.
    #[error("section property {property} expects {expected}")]
    WrongType {
        /// Property being written.
        property: &'static str,
        /// Description of the accepted value type.
        expected: &'static str,
    },
}
