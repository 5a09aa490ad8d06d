//! Error types for the tracker binary.
//!
//! [`TrackerError`] wraps every failure a command can hit, so `main` and
//! the command runner can propagate with `?`.

/// Top-level error for the tracker binary.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: waymark_core::ConfigError,
    },

    /// The location pack could not be loaded.
    #[error("pack error: {source}")]
    Load {
        /// The underlying load error.
        #[from]
        source: waymark_core::LoadError,
    },

    /// Saved state could not be read or written.
    #[error("state error: {source}")]
    State {
        /// The underlying state error.
        #[from]
        source: waymark_core::StateError,
    },

    /// A section path did not resolve.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: waymark_world::WorldError,
    },

    /// A bridge property write was rejected.
    #[error("property error: {source}")]
    Bridge {
        /// The underlying bridge error.
        #[from]
        source: waymark_world::BridgeError,
    },

    /// Writing command output failed.
    #[error("output error: {source}")]
    Output {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Encoding command output as JSON failed.
    #[error("json error: {source}")]
    Json {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}
