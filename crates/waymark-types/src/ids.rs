//! Stable handles for entities stored in a location tree.
//!
//! A [`LocationHandle`] is the position a location received when it was
//! appended to its tree. Handles never move: the tree only appends, and
//! duplicate identifiers merge into the existing slot instead of creating
//! a new one.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Position of a location inside its owning tree.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub struct LocationHandle(pub u32);

impl LocationHandle {
    /// Build a handle from a slot index.
    ///
    /// Returns `None` if the index does not fit in a `u32`.
    pub fn from_index(index: usize) -> Option<Self> {
        u32::try_from(index).ok().map(Self)
    }

    /// Return the slot index this handle points to.
    pub fn index(self) -> usize {
        usize::try_from(self.0).unwrap_or(usize::MAX)
    }
}

impl core::fmt::Display for LocationHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_round_trips_index() {
        let handle = LocationHandle::from_index(7);
        assert_eq!(handle, Some(LocationHandle(7)));
        assert_eq!(handle.map(LocationHandle::index), Some(7));
    }

    #[test]
    fn handle_display() {
        assert_eq!(LocationHandle(3).to_string(), "#3");
    }
}
