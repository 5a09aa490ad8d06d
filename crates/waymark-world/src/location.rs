//! Fully-resolved locations.
//!
//! A [`Location`] is produced by the builder with its identifier, rule
//! sets, images, and sections already resolved against its ancestors.
//! Nothing about it changes afterwards except the clearing state held by
//! its sections.

use waymark_types::{ImageSet, MapLocation, RuleSet};

use crate::section::Section;

/// Join a parent path and a name into a location identifier.
///
/// Roots (empty parent path) are identified by their bare name.
pub fn location_id(parent_name: &str, name: &str) -> String {
    if parent_name.is_empty() {
        name.to_owned()
    } else {
        format!("{parent_name}/{name}")
    }
}

/// A named place in the tracked world.
#[derive(Debug, Clone)]
pub struct Location {
    name: String,
    parent_name: String,
    id: String,
    map_locations: Vec<MapLocation>,
    sections: Vec<Section>,
    access_rules: RuleSet,
    visibility_rules: RuleSet,
    images: ImageSet,
}

impl Location {
    /// Assemble a location; the identifier is derived from `parent_name`
    /// and `name`.
    pub fn new(
        name: String,
        parent_name: String,
        access_rules: RuleSet,
        visibility_rules: RuleSet,
        images: ImageSet,
    ) -> Self {
        let id = location_id(&parent_name, &name);
        Self {
            name,
            parent_name,
            id,
            map_locations: Vec::new(),
            sections: Vec::new(),
            access_rules,
            visibility_rules,
            images,
        }
    }

    /// Attach map pins.
    #[must_use]
    pub fn with_map_locations(mut self, map_locations: Vec<MapLocation>) -> Self {
        self.map_locations = map_locations;
        self
    }

    /// Attach sections.
    #[must_use]
    pub fn with_sections(mut self, sections: Vec<Section>) -> Self {
        self.sections = sections;
        self
    }

    /// Own name (last path component).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path of ancestor identifiers; empty for roots.
    pub fn parent_name(&self) -> &str {
        &self.parent_name
    }

    /// Path-derived identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Map pins in declaration order.
    pub fn map_locations(&self) -> &[MapLocation] {
        &self.map_locations
    }

    /// Sections in declaration order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Sections, for driving their clearing state.
    pub fn sections_mut(&mut self) -> &mut [Section] {
        &mut self.sections
    }

    /// First section with the given name.
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name() == name)
    }

    /// First section with the given name, mutably.
    pub fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.name() == name)
    }

    /// Effective access rules.
    pub const fn access_rules(&self) -> &RuleSet {
        &self.access_rules
    }

    /// Effective visibility rules.
    pub const fn visibility_rules(&self) -> &RuleSet {
        &self.visibility_rules
    }

    /// Image defaults handed down to sections and children.
    pub const fn images(&self) -> &ImageSet {
        &self.images
    }

    /// Absorb another fragment describing the same identifier.
    ///
    /// Map pins and sections of `other` are copied and appended. Sections
    /// are not deduplicated by name: both copies survive.
    pub fn merge(&mut self, other: &Self) {
        self.map_locations.extend(other.map_locations.iter().cloned());
        self.sections.extend(other.sections.iter().cloned());
    }
}
