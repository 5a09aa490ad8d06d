//! Plain records shared between the world model, the tracker, and the UI.
//!
//! Covers map placements, inherited image references, and the persisted
//! form of section clearing state.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// MapLocation
// ---------------------------------------------------------------------------

/// A pin for a location on one of the pack's maps.
///
/// Purely descriptive; coordinates are pixel offsets into the map image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MapLocation {
    /// Map identifier.
    pub map: String,
    /// Horizontal pixel coordinate.
    pub x: i32,
    /// Vertical pixel coordinate.
    pub y: i32,
}

// ---------------------------------------------------------------------------
// ImageSet
// ---------------------------------------------------------------------------

/// Image references used to draw a section's chest.
///
/// Every field inherits from the enclosing location when the pack leaves
/// it unset. An empty string means "no image".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ImageSet {
    /// Image shown while items remain (`chest_unopened_img`).
    pub closed: String,
    /// Image shown once everything is collected (`chest_opened_img`).
    pub opened: String,
    /// Background drawn behind the overlay (`overlay_background`).
    pub overlay_background: String,
}

// ---------------------------------------------------------------------------
// Persisted state
// ---------------------------------------------------------------------------

/// Persisted clearing state of one section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SectionSave {
    /// Number of items marked collected.
    pub cleared: i32,
}

/// Persisted clearing state of a whole tracker.
///
/// Keyed by location identifier; each entry lists the location's sections
/// in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TrackerSnapshot {
    /// Wall-clock time the snapshot was taken.
    pub saved_at: DateTime<Utc>,
    /// Section states per location identifier.
    pub locations: BTreeMap<String, Vec<SectionSave>>,
}

impl TrackerSnapshot {
    /// Create an empty snapshot stamped with the current time.
    pub fn now() -> Self {
        Self {
            saved_at: Utc::now(),
            locations: BTreeMap::new(),
        }
    }

    /// Return the total number of section records.
    pub fn section_count(&self) -> usize {
        self.locations.values().map(Vec::len).sum()
    }
}
