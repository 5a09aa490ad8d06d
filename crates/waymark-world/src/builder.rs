//! Recursive construction of locations from pack JSON.
//!
//! The builder walks a pack document depth-first and emits a flat,
//! pre-ordered list of [`Location`]s: each node first, then its whole
//! subtree, then its next sibling. Children are never nested in the
//! output; they carry their path in `parent_name` and `id` instead.
//!
//! # Inheritance
//!
//! Every node receives a [`BuildContext`] from its caller holding the
//! rule sets, parent path, and image defaults in effect. A node's
//! `parent` reference, when it resolves, replaces the context's rule sets
//! (but not its path or images) as the base for merging. Sections merge
//! against their location's already-resolved rule sets.
//!
//! # Lookup scopes
//!
//! Parent references resolve against the tree passed to
//! [`LocationBuilder::new`] first and then against the locations emitted
//! so far by this builder, so a later node can name an earlier one.
//!
//! # Errors
//!
//! Building never fails. Malformed nodes and fields are skipped or
//! defaulted, with a [`Diagnostic`](crate::diagnostics::Diagnostic)
//! recorded for each, and the rest of the tree is still processed.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;
use waymark_types::{ImageSet, MapLocation, RuleSet};

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::fields::{self, Object};
use crate::location::Location;
use crate::parent::{LocationLookup, ParentResolver};
use crate::rules::{self, RuleKind};
use crate::section::{Section, SectionState};
use crate::tree::LocationTree;

// ---------------------------------------------------------------------------
// Inputs and outputs
// ---------------------------------------------------------------------------

/// Values a node inherits from its enclosing node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildContext {
    /// Inherited access rules.
    pub access_rules: RuleSet,
    /// Inherited visibility rules.
    pub visibility_rules: RuleSet,
    /// Identifier path of the enclosing node; empty at the top level.
    pub parent_name: String,
    /// Inherited image defaults.
    pub images: ImageSet,
}

impl BuildContext {
    /// Context for top-level nodes: no rules, no path, no images.
    pub fn root() -> Self {
        Self::default()
    }

    /// Context handed to the children of `location`.
    fn for_children(location: &Location) -> Self {
        Self {
            access_rules: location.access_rules().clone(),
            visibility_rules: location.visibility_rules().clone(),
            parent_name: location.id().to_owned(),
            images: location.images().clone(),
        }
    }
}

/// Result of a build pass.
#[derive(Debug, Clone, Default)]
pub struct BuildOutput {
    /// Every location built, depth-first pre-order.
    pub locations: Vec<Location>,
    /// Everything that was dropped or defaulted along the way.
    pub diagnostics: Diagnostics,
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Locations emitted so far, indexed by identifier (first occurrence).
#[derive(Default)]
struct Emitted {
    locations: Vec<Location>,
    by_id: HashMap<String, usize>,
}

impl Emitted {
    fn push(&mut self, location: Location) {
        let position = self.locations.len();
        self.by_id.entry(location.id().to_owned()).or_insert(position);
        self.locations.push(location);
    }
}

impl LocationLookup for Emitted {
    fn by_id(&self, id: &str) -> Option<&Location> {
        self.by_id.get(id).and_then(|&i| self.locations.get(i))
    }

    fn all(&self) -> &[Location] {
        &self.locations
    }
}

/// Turns pack nodes into flat lists of resolved locations.
pub struct LocationBuilder<'a> {
    lookup: &'a LocationTree,
    emitted: Emitted,
    diagnostics: Diagnostics,
}

impl<'a> LocationBuilder<'a> {
    /// Create a builder resolving parents against `lookup`.
    pub fn new(lookup: &'a LocationTree) -> Self {
        Self {
            lookup,
            emitted: Emitted::default(),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Build one node (object or array of nodes) in a single pass.
    pub fn build(lookup: &'a LocationTree, node: &Value, context: &BuildContext) -> BuildOutput {
        let mut builder = Self::new(lookup);
        builder.add(node, context);
        builder.finish()
    }

    /// Build a node and append its locations to the output.
    pub fn add(&mut self, node: &Value, context: &BuildContext) {
        match node {
            Value::Array(items) => {
                for item in items {
                    self.add(item, context);
                }
            }
            Value::Object(object) => self.add_object(object, context),
            other => self.diagnostics.push(
                DiagnosticKind::NotAnObject,
                &context.parent_name,
                format!("location is not an object: {}", fields::kind_name(other)),
            ),
        }
    }

    /// Consume the builder and return everything built.
    pub fn finish(self) -> BuildOutput {
        BuildOutput {
            locations: self.emitted.locations,
            diagnostics: self.diagnostics,
        }
    }

    fn add_object(&mut self, node: &Object, context: &BuildContext) {
        let diags = &mut self.diagnostics;
        let name = fields::string_field(node, "name", "", &context.parent_name, diags);
        let parent_ref = fields::string_field(node, "parent", "", &name, diags);

        let resolved_base = if parent_ref.is_empty() {
            None
        } else {
            let base = ParentResolver::new()
                .with_scope(self.lookup)
                .with_scope(&self.emitted)
                .resolve(&parent_ref)
                .map(|p| (p.access_rules().clone(), p.visibility_rules().clone()));
            if base.is_none() {
                self.diagnostics.push(
                    DiagnosticKind::UnresolvedParent {
                        reference: crate::parent::strip_marker(&parent_ref).to_owned(),
                    },
                    &name,
                    format!("did not find parent \"{}\"", parent_ref.escape_debug()),
                );
            }
            base
        };
        let (base_access, base_visibility) = match &resolved_base {
            Some((access, visibility)) => (access, visibility),
            None => (&context.access_rules, &context.visibility_rules),
        };

        let diags = &mut self.diagnostics;
        let access = rules::resolve(base_access, node, RuleKind::Access, &name, diags);
        let visibility = rules::resolve(base_visibility, node, RuleKind::Visibility, &name, diags);
        let images = read_images(node, &context.images, &name, diags);

        let map_locations = read_map_locations(node, &name, diags);
        let sections = read_sections(node, &access, &visibility, &images, &name, diags);

        let location = Location::new(
            name,
            context.parent_name.clone(),
            access,
            visibility,
            images,
        )
        .with_map_locations(map_locations)
        .with_sections(sections);

        debug!(
            id = location.id(),
            sections = location.sections().len(),
            access_clauses = location.access_rules().len(),
            "Built location"
        );

        let child_context = BuildContext::for_children(&location);
        let id = location.id().to_owned();
        self.emitted.push(location);

        match fields::present(node, "children") {
            None => {}
            Some(children @ Value::Array(_)) => self.add(children, &child_context),
            Some(other) => self.diagnostics.push(
                DiagnosticKind::InvalidField { field: "children" },
                &id,
                format!("bad children: {}", fields::kind_name(other)),
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Field readers
// ---------------------------------------------------------------------------

fn read_images(
    node: &Object,
    inherited: &ImageSet,
    subject: &str,
    diags: &mut Diagnostics,
) -> ImageSet {
    ImageSet {
        closed: fields::string_field(node, "chest_unopened_img", &inherited.closed, subject, diags),
        opened: fields::string_field(node, "chest_opened_img", &inherited.opened, subject, diags),
        overlay_background: fields::string_field(
            node,
            "overlay_background",
            &inherited.overlay_background,
            subject,
            diags,
        ),
    }
}

fn read_map_locations(node: &Object, subject: &str, diags: &mut Diagnostics) -> Vec<MapLocation> {
    let Some(entries) = object_list(node, "map_locations", subject, diags) else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(|entry| {
            if let Value::Object(pin) = entry {
                Some(MapLocation {
                    map: fields::string_field(pin, "map", "", subject, diags),
                    x: fields::int_field(pin, "x", 0, subject, diags),
                    y: fields::int_field(pin, "y", 0, subject, diags),
                })
            } else {
                diags.push(
                    DiagnosticKind::BadMapLocation,
                    subject,
                    format!("bad map location: {}", fields::kind_name(entry)),
                );
                None
            }
        })
        .collect()
}

fn read_sections(
    node: &Object,
    access: &RuleSet,
    visibility: &RuleSet,
    images: &ImageSet,
    subject: &str,
    diags: &mut Diagnostics,
) -> Vec<Section> {
    let Some(entries) = object_list(node, "sections", subject, diags) else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(|entry| {
            if let Value::Object(section) = entry {
                Some(build_section(
                    section, access, visibility, images, subject, diags,
                ))
            } else {
                diags.push(
                    DiagnosticKind::BadSection,
                    subject,
                    format!("bad section: {}", fields::kind_name(entry)),
                );
                None
            }
        })
        .collect()
}

/// Read an array field; anything else but `null` is a diagnostic.
fn object_list<'n>(
    node: &'n Object,
    field: &'static str,
    subject: &str,
    diags: &mut Diagnostics,
) -> Option<&'n Vec<Value>> {
    match fields::present(node, field)? {
        Value::Array(entries) => Some(entries),
        other => {
            diags.push(
                DiagnosticKind::InvalidField { field },
                subject,
                format!("invalid {field}: {}", fields::kind_name(other)),
            );
            None
        }
    }
}

/// Build one section against its location's resolved rules and images.
///
/// Sections have no children and no `parent` reference of their own.
/// `location` names the owning location in diagnostics about the section
/// name itself.
pub fn build_section(
    node: &Object,
    location_access: &RuleSet,
    location_visibility: &RuleSet,
    location_images: &ImageSet,
    location: &str,
    diags: &mut Diagnostics,
) -> Section {
    let name = fields::string_field(node, "name", "", location, diags);
    let clear_as_group = fields::bool_field(node, "clear_as_group", false, &name, diags);
    let images = read_images(node, location_images, &name, diags);

    let hosted_items =
        fields::split_tokens(&fields::string_field(node, "hosted_item", "", &name, diags));
    let default_count = i32::from(hosted_items.is_empty());
    let item_count = fields::int_field(node, "item_count", default_count, &name, diags);

    let access = rules::resolve(location_access, node, RuleKind::Access, &name, diags);
    let visibility = rules::resolve(location_visibility, node, RuleKind::Visibility, &name, diags);

    Section::new(
        name,
        hosted_items,
        images,
        access,
        visibility,
        SectionState::new(item_count, clear_as_group),
    )
}
