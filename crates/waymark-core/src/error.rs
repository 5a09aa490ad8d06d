//! Error types for pack loading and state persistence.
//!
//! Shape problems inside a pack document are not errors; they come back as
//! [`Diagnostics`](waymark_world::Diagnostics). These enums cover the
//! boundary: files that cannot be read, text that is not JSON, and a tree
//! that cannot take more locations.

use std::path::PathBuf;

/// Errors that can occur while loading a location pack.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// A location document could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A location document is not valid JSON.
    #[error("failed to parse {path}: {source}")]
    Json {
        /// File that failed.
        path: PathBuf,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// The location tree rejected the document.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: waymark_world::WorldError,
    },
}

/// Errors that can occur while reading or writing a state snapshot.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// The snapshot file could not be read or written.
    #[error("state file {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The snapshot could not be encoded or decoded.
    #[error("state file {path} is not a valid snapshot: {source}")]
    Json {
        /// File that failed.
        path: PathBuf,
        /// The underlying JSON error.
        source: serde_json::Error,
    },
}
