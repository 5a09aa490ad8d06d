//! The assembled set of locations loaded from one or more pack fragments.
//!
//! [`LocationTree`] stores locations in insertion order and indexes them by
//! identifier. Each location keeps the [`LocationHandle`] it received on
//! first insertion; later fragments that describe the same identifier are
//! merged into that slot (see [`Location::merge`]) rather than appended.

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, info};
use waymark_types::LocationHandle;

use crate::builder::{BuildContext, BuildOutput, LocationBuilder};
use crate::diagnostics::Diagnostics;
use crate::error::WorldError;
use crate::location::Location;
use crate::parent::{ID_MARKER, LocationLookup};
use crate::section::Section;

/// Aggregate clearing progress over a set of sections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    /// Number of sections counted.
    pub sections: usize,
    /// Sum of item counts.
    pub item_count: i64,
    /// Sum of cleared counters.
    pub cleared: i64,
}

impl Progress {
    /// Items not yet collected.
    pub const fn remaining(&self) -> i64 {
        self.item_count.saturating_sub(self.cleared)
    }

    fn add(&mut self, section: &Section) {
        self.sections = self.sections.saturating_add(1);
        self.item_count = self
            .item_count
            .saturating_add(i64::from(section.state().item_count()));
        self.cleared = self
            .cleared
            .saturating_add(i64::from(section.state().cleared()));
    }
}

/// All locations of a loaded pack, indexed by identifier.
#[derive(Debug, Clone, Default)]
pub struct LocationTree {
    locations: Vec<Location>,
    by_id: HashMap<String, LocationHandle>,
}

impl LocationTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct locations.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Whether the tree holds no locations.
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Add a location, merging it into an existing one with the same id.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::TreeFull`] if no handle is left for a new slot.
    pub fn insert(&mut self, location: Location) -> Result<LocationHandle, WorldError> {
        if let Some(&handle) = self.by_id.get(location.id()) {
            if let Some(existing) = self.locations.get_mut(handle.index()) {
                debug!(id = location.id(), %handle, "Merging duplicate location");
                existing.merge(&location);
            }
            return Ok(handle);
        }
        let handle = LocationHandle::from_index(self.locations.len())
            .ok_or(WorldError::TreeFull(self.locations.len()))?;
        self.by_id.insert(location.id().to_owned(), handle);
        self.locations.push(location);
        Ok(handle)
    }

    /// Insert every location of a build pass, in order.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::TreeFull`] if the tree runs out of handles.
    pub fn extend(
        &mut self,
        locations: impl IntoIterator<Item = Location>,
    ) -> Result<Vec<LocationHandle>, WorldError> {
        locations.into_iter().map(|loc| self.insert(loc)).collect()
    }

    /// Build a pack fragment against this tree and absorb it.
    ///
    /// Parent references in the fragment may name locations loaded by
    /// earlier fragments. Returns the build diagnostics.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::TreeFull`] if the tree runs out of handles.
    pub fn load_fragment(&mut self, node: &Value) -> Result<Diagnostics, WorldError> {
        let BuildOutput {
            locations,
            diagnostics,
        } = LocationBuilder::build(self, node, &BuildContext::root());
        let built = locations.len();
        let before = self.len();
        self.extend(locations)?;
        info!(
            built,
            added = self.len().saturating_sub(before),
            diagnostics = diagnostics.len(),
            "Loaded location fragment"
        );
        Ok(diagnostics)
    }

    /// Location behind a handle.
    pub fn get(&self, handle: LocationHandle) -> Option<&Location> {
        self.locations.get(handle.index())
    }

    /// Mutable location behind a handle.
    pub fn get_mut(&mut self, handle: LocationHandle) -> Option<&mut Location> {
        self.locations.get_mut(handle.index())
    }

    /// Handle of the location with this identifier.
    pub fn handle_of(&self, id: &str) -> Option<LocationHandle> {
        self.by_id.get(id).copied()
    }

    /// Location with this identifier.
    pub fn by_id(&self, id: &str) -> Option<&Location> {
        self.handle_of(id).and_then(|h| self.get(h))
    }

    /// Mutable location with this identifier.
    pub fn by_id_mut(&mut self, id: &str) -> Option<&mut Location> {
        let handle = self.handle_of(id)?;
        self.get_mut(handle)
    }

    /// Iterate over `(handle, location)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (LocationHandle, &Location)> {
        self.locations
            .iter()
            .enumerate()
            .filter_map(|(i, loc)| LocationHandle::from_index(i).map(|h| (h, loc)))
    }

    /// Look up a section by path `[@]<location id>/<section name>`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::MalformedSectionPath`] if the path has no `/`,
    /// [`WorldError::LocationNotFound`] or [`WorldError::SectionNotFound`]
    /// if nothing matches.
    pub fn find_section(&self, path: &str) -> Result<&Section, WorldError> {
        let (location_id, section_name) = split_section_path(path)?;
        self.by_id(location_id)
            .ok_or_else(|| WorldError::LocationNotFound(location_id.to_owned()))?
            .section(section_name)
            .ok_or_else(|| WorldError::SectionNotFound(path.to_owned()))
    }

    /// Mutable variant of [`find_section`](Self::find_section).
    ///
    /// # Errors
    ///
    /// Same as [`find_section`](Self::find_section).
    pub fn find_section_mut(&mut self, path: &str) -> Result<&mut Section, WorldError> {
        let (location_id, section_name) = split_section_path(path)?;
        self.by_id_mut(location_id)
            .ok_or_else(|| WorldError::LocationNotFound(location_id.to_owned()))?
            .section_mut(section_name)
            .ok_or_else(|| WorldError::SectionNotFound(path.to_owned()))
    }

    /// Clearing progress summed over every section in the tree.
    pub fn progress(&self) -> Progress {
        let mut progress = Progress::default();
        for section in self.locations.iter().flat_map(Location::sections) {
            progress.add(section);
        }
        progress
    }
}

impl LocationLookup for LocationTree {
    fn by_id(&self, id: &str) -> Option<&Location> {
        Self::by_id(self, id)
    }

    fn all(&self) -> &[Location] {
        &self.locations
    }
}

/// Split `[@]<location id>/<section name>` at the last `/`.
fn split_section_path(path: &str) -> Result<(&str, &str), WorldError> {
    path.strip_prefix(ID_MARKER)
        .unwrap_or(path)
        .rsplit_once('/')
        .ok_or_else(|| WorldError::MalformedSectionPath(path.to_owned()))
}
