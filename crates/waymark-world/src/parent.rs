//! Resolution of `parent` references against already-built locations.
//!
//! A reference may start with [`ID_MARKER`] (`@`), which is stripped.
//! Resolution order:
//!
//! 1. Exact identifier match, searching each scope in order.
//! 2. Suffix match: the first location (scopes in order, locations in
//!    insertion order) whose identifier is strictly longer than the
//!    reference and ends with it.
//!
//! An unresolved reference is not an error here; the builder records a
//! diagnostic and keeps the inherited rule context.

use crate::location::Location;

/// Marker meaning "match by identifier".
pub const ID_MARKER: char = '@';

/// A collection of locations that parent references can resolve against.
pub trait LocationLookup {
    /// First location with exactly this identifier.
    fn by_id(&self, id: &str) -> Option<&Location>;

    /// All locations in insertion order.
    fn all(&self) -> &[Location];
}

/// Strip the optional [`ID_MARKER`] from a reference.
pub fn strip_marker(reference: &str) -> &str {
    reference.strip_prefix(ID_MARKER).unwrap_or(reference)
}

/// Exact-then-suffix resolver over one or more lookup scopes.
#[derive(Default)]
pub struct ParentResolver<'a> {
    scopes: Vec<&'a dyn LocationLookup>,
}

impl<'a> ParentResolver<'a> {
    /// Create a resolver with no scopes.
    pub const fn new() -> Self {
        Self { scopes: Vec::new() }
    }

    /// Add a scope searched after the ones already added.
    #[must_use]
    pub fn with_scope(mut self, scope: &'a dyn LocationLookup) -> Self {
        self.scopes.push(scope);
        self
    }

    /// Resolve a parent reference.
    ///
    /// Returns `None` for an empty reference (after marker stripping) or
    /// when nothing matches.
    pub fn resolve(&self, reference: &str) -> Option<&'a Location> {
        let wanted = strip_marker(reference);
        if wanted.is_empty() {
            return None;
        }
        self.exact(wanted).or_else(|| self.suffix(wanted))
    }

    fn exact(&self, wanted: &str) -> Option<&'a Location> {
        self.scopes.iter().copied().find_map(|scope| scope.by_id(wanted))
    }

    fn suffix(&self, wanted: &str) -> Option<&'a Location> {
        self.scopes.iter().copied().find_map(|scope| {
            scope
                .all()
                .iter()
                .find(|loc| loc.id().len() > wanted.len() && loc.id().ends_with(wanted))
        })
    }
}

impl LocationLookup for Vec<Location> {
    fn by_id(&self, id: &str) -> Option<&Location> {
        self.iter().find(|loc| loc.id() == id)
    }

    fn all(&self) -> &[Location] {
        self
    }
}
