//! Whole-tracker clearing state: capture, restore, and file persistence.
//!
//! A [`TrackerSnapshot`] lists, per location identifier, the saved counter
//! of every section in declaration order. Restoring applies records
//! positionally through [`SectionState::load`](waymark_world::SectionState::load),
//! so observers fire exactly as they would for a manual load.

use std::path::Path;

use tracing::{debug, info};
use waymark_types::TrackerSnapshot;
use waymark_world::{DiagnosticKind, Diagnostics, LocationTree};

use crate::error::StateError;

/// Record the counter of every section in `tree`.
pub fn capture(tree: &LocationTree) -> TrackerSnapshot {
    let mut snapshot = TrackerSnapshot::now();
    for (_, location) in tree.iter() {
        let saves = location.sections().iter().map(|s| s.state().save()).collect();
        snapshot.locations.insert(location.id().to_owned(), saves);
    }
    debug!(
        locations = snapshot.locations.len(),
        sections = snapshot.section_count(),
        "Captured tracker state"
    );
    snapshot
}

/// Apply a snapshot to `tree`.
///
/// Unknown location identifiers and section count mismatches are recorded
/// as [`DiagnosticKind::StateMismatch`]; for a count mismatch the records
/// that line up are still applied.
pub fn restore(tree: &mut LocationTree, snapshot: &TrackerSnapshot) -> Diagnostics {
    let mut diagnostics = Diagnostics::new();
    let mut applied = 0_usize;
    for (id, saves) in &snapshot.locations {
        let Some(location) = tree.by_id_mut(id) else {
            diagnostics.push(
                DiagnosticKind::StateMismatch,
                id,
                "saved location is not in the pack",
            );
            continue;
        };
        let sections = location.sections_mut();
        if sections.len() != saves.len() {
            diagnostics.push(
                DiagnosticKind::StateMismatch,
                id,
                format!(
                    "saved {} sections, pack has {}",
                    saves.len(),
                    sections.len()
                ),
            );
        }
        for (section, save) in sections.iter_mut().zip(saves) {
            section.state_mut().load(*save);
            applied = applied.saturating_add(1);
        }
    }
    info!(
        sections = applied,
        mismatches = diagnostics.len(),
        saved_at = %snapshot.saved_at,
        "Restored tracker state"
    );
    diagnostics
}

/// Read a snapshot from a JSON file.
///
/// # Errors
///
/// Returns [`StateError::Io`] if the file cannot be read and
/// [`StateError::Json`] if it does not hold a snapshot.
pub fn read_snapshot(path: &Path) -> Result<TrackerSnapshot, StateError> {
    let contents = std::fs::read_to_string(path).map_err(|source| StateError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| StateError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a snapshot if the file exists.
///
/// # Errors
///
/// Same as [`read_snapshot`], except that a missing file is `Ok(None)`.
pub fn read_snapshot_if_exists(path: &Path) -> Result<Option<TrackerSnapshot>, StateError> {
    if path.exists() {
        read_snapshot(path).map(Some)
    } else {
        debug!(path = %path.display(), "No saved state");
        Ok(None)
    }
}

/// Write a snapshot as pretty-printed JSON.
///
/// The file is written next to its destination and renamed into place.
///
/// # Errors
///
/// Returns [`StateError::Json`] if encoding fails and [`StateError::Io`]
/// if the file cannot be written.
pub fn write_snapshot(path: &Path, snapshot: &TrackerSnapshot) -> Result<(), StateError> {
    let json = serde_json::to_string_pretty(snapshot).map_err(|source| StateError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let staging = path.with_extension("tmp");
    let io_err = |source: std::io::Error| StateError::Io {
        path: path.to_path_buf(),
        source,
    };
    std::fs::write(&staging, json).map_err(io_err)?;
    std::fs::rename(&staging, path).map_err(io_err)?;
    info!(path = %path.display(), sections = snapshot.section_count(), "Saved tracker state");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use waymark_types::SectionSave;

    use super::*;

    fn tree() -> LocationTree {
        let mut tree = LocationTree::new();
        tree.load_fragment(&json!({
            "name": "Cave",
            "sections": [{ "name": "A", "item_count": 2 }, { "name": "B", "item_count": 3 }],
            "children": [{ "name": "Pool", "sections": [{ "name": "C" }] }]
        }))
        .unwrap();
        tree
    }

    #[test]
    fn capture_lists_sections_in_order() {
        let mut tree = tree();
        tree.find_section_mut("Cave/B").unwrap().state_mut().clear_item(false);

        let snapshot = capture(&tree);
        assert_eq!(
            snapshot.locations.get("Cave"),
            Some(&vec![SectionSave { cleared: 0 }, SectionSave { cleared: 1 }])
        );
        assert_eq!(
            snapshot.locations.get("Cave/Pool"),
            Some(&vec![SectionSave { cleared: 0 }])
        );
        assert_eq!(snapshot.section_count(), 3);
    }

    #[test]
    fn restore_applies_positionally() {
        let mut source = tree();
        source.find_section_mut("Cave/A").unwrap().state_mut().clear_item(true);
        source.find_section_mut("Cave/Pool/C").unwrap().state_mut().clear_item(false);
        let snapshot = capture(&source);

        let mut target = tree();
        let diagnostics = restore(&mut target, &snapshot);

        assert!(diagnostics.is_empty());
        assert_eq!(target.find_section("Cave/A").unwrap().state().cleared(), 2);
        assert_eq!(target.find_section("Cave/B").unwrap().state().cleared(), 0);
        assert_eq!(target.find_section("Cave/Pool/C").unwrap().state().cleared(), 1);
    }

    #[test]
    fn restore_reports_mismatches_and_applies_what_lines_up() {
        let mut snapshot = TrackerSnapshot::now();
        snapshot
            .locations
            .insert("Cave".to_owned(), vec![SectionSave { cleared: 1 }]);
        snapshot
            .locations
            .insert("Lost".to_owned(), vec![SectionSave { cleared: 1 }]);

        let mut tree = tree();
        let diagnostics = restore(&mut tree, &snapshot);

        assert_eq!(
            diagnostics.count_where(|k| matches!(k, DiagnosticKind::StateMismatch)),
            2
        );
        assert_eq!(tree.find_section("Cave/A").unwrap().state().cleared(), 1);
        assert_eq!(tree.find_section("Cave/B").unwrap().state().cleared(), 0);
    }

    #[test]
    fn missing_snapshot_file_is_none() {
        let result = read_snapshot_if_exists(Path::new("/nonexistent/waymark/save.json"));
        assert!(matches!(result, Ok(None)));
    }
}
