//! Tracker orchestration for Waymark: configuration, pack loading, and
//! persisted clearing state.
//!
//! This crate sits between the location model in `waymark-world` and the
//! `waymark-tracker` binary. It reads `waymark.yaml`, loads the configured
//! location documents into one [`LocationTree`](waymark_world::LocationTree),
//! and saves or restores every section counter as a single snapshot.
//!
//! # Modules
//!
//! - [`config`] -- YAML configuration with environment overrides
//! - [`error`] -- Load and state persistence errors
//! - [`pack`] -- Location documents on disk into a tree, in order
//! - [`state`] -- Snapshot capture, restore, and file I/O

pub mod config;
pub mod error;
pub mod pack;
pub mod state;

pub use config::{ConfigError, TrackerConfig};
pub use error::{LoadError, StateError};
pub use pack::{LoadedPack, PackLoader};
