//! Integration tests for loading packs and persisting state through real
//! files in a temporary directory.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::path::{Path, PathBuf};

use serde_json::json;
use waymark_core::config::PackConfig;
use waymark_core::{LoadError, PackLoader, StateError, state};
use waymark_world::DiagnosticKind;

fn write_json(dir: &Path, name: &str, value: &serde_json::Value) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    path
}

fn two_document_pack(dir: &Path) -> PackConfig {
    write_json(
        dir,
        "overworld.json",
        &json!([{
            "name": "Overworld",
            "access_rules": ["boots"],
            "children": [
                { "name": "Village", "sections": [{ "name": "Well", "item_count": 2 }] },
                { "name": "Tower", "sections": [{ "name": "Top", "clear_as_group": true, "item_count": 3 }] }
            ]
        }]),
    );
    write_json(
        dir,
        "extras.json",
        &json!([
            { "name": "Overworld", "children": [{ "name": "Village", "sections": [{ "name": "Shop", "hosted_item": "bow" }] }] },
            { "name": "Crypt", "parent": "@Tower", "access_rules": "torch", "sections": [{ "name": "Coffin" }] },
            { "name": "Broken", "sections": "oops" }
        ]),
    );
    PackConfig {
        root: dir.to_path_buf(),
        locations: vec![PathBuf::from("overworld.json"), PathBuf::from("extras.json")],
    }
}

#[test]
fn documents_load_in_order_into_one_tree() {
    let dir = tempfile::tempdir().unwrap();
    let pack = PackLoader::from_config(&two_document_pack(dir.path()))
        .load()
        .unwrap();

    let tree = &pack.tree;
    assert_eq!(tree.len(), 5);
    assert_eq!(tree.by_id("Overworld/Village").unwrap().sections().len(), 2);

    let crypt = tree.by_id("Crypt").unwrap();
    assert_eq!(crypt.access_rules().len(), 1);
    assert_eq!(
        crypt.access_rules().clauses()[0].tokens(),
        &["boots".to_owned(), "torch".to_owned()]
    );

    assert_eq!(
        pack.diagnostics
            .count_where(|k| matches!(k, DiagnosticKind::InvalidField { field } if *field == "sections")),
        1
    );
}

#[test]
fn invalid_json_reports_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = PackLoader::new(vec![path.clone()]).load().unwrap_err();
    assert!(matches!(err, LoadError::Json { path: ref p, .. } if *p == path));
}

#[test]
fn snapshot_survives_a_round_trip_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let config = two_document_pack(dir.path());
    let save_file = dir.path().join("save.json");

    let mut first = PackLoader::from_config(&config).load().unwrap();
    first
        .tree
        .find_section_mut("Overworld/Tower/Top")
        .unwrap()
        .state_mut()
        .clear_item(false);
    first
        .tree
        .find_section_mut("@Overworld/Village/Well")
        .unwrap()
        .state_mut()
        .clear_item(false);
    state::write_snapshot(&save_file, &state::capture(&first.tree)).unwrap();

    let mut second = PackLoader::from_config(&config).load().unwrap();
    let snapshot = state::read_snapshot_if_exists(&save_file).unwrap().unwrap();
    let mismatches = state::restore(&mut second.tree, &snapshot);

    assert!(mismatches.is_empty());
    assert_eq!(second.tree.progress(), first.tree.progress());
    assert_eq!(
        second.tree.find_section("Overworld/Tower/Top").unwrap().state().cleared(),
        3
    );
    assert!(!dir.path().join("save.tmp").exists());
}

#[test]
fn corrupt_snapshot_is_a_state_error() {
    let dir = tempfile::tempdir().unwrap();
    let save_file = dir.path().join("save.json");
    std::fs::write(&save_file, "[1, 2, 3]").unwrap();

    assert!(matches!(
        state::read_snapshot(&save_file),
        Err(StateError::Json { .. })
    ));
}

#[test]
fn demo_pack_loads_cleanly() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/classic");
    if !root.exists() {
        return;
    }
    let config = PackConfig {
        root,
        locations: vec![PathBuf::from("overworld.json"), PathBuf::from("dungeons.json")],
    };
    let pack = PackLoader::from_config(&config).load().unwrap();

    assert!(pack.diagnostics.is_empty());
    assert_eq!(pack.tree.by_id("Overworld/Village").unwrap().sections().len(), 3);
    let crypt = pack.tree.by_id("Crypt").unwrap();
    assert_eq!(crypt.images().closed, "");
    assert_eq!(crypt.images().overlay_background, "images/crypt_bg.png");
    assert_eq!(crypt.access_rules().len(), 2);
}
