//! Loading location documents from disk into a [`LocationTree`].
//!
//! A pack lists its location documents in order. Each one is parsed as
//! JSON and fed through the builder as a fragment of the same tree, so
//! later documents can name parents defined by earlier ones and can add
//! sections or map pins to locations declared before.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::info;
use waymark_world::{Diagnostics, LocationTree};

use crate::config::PackConfig;
use crate::error::LoadError;

/// A fully loaded pack.
#[derive(Debug, Default)]
pub struct LoadedPack {
    /// Every location from every document.
    pub tree: LocationTree,
    /// Everything dropped or defaulted across all documents.
    pub diagnostics: Diagnostics,
}

/// Loads the documents named by a [`PackConfig`].
#[derive(Debug, Clone)]
pub struct PackLoader {
    files: Vec<PathBuf>,
}

impl PackLoader {
    /// Loader for an explicit list of documents.
    pub const fn new(files: Vec<PathBuf>) -> Self {
        Self { files }
    }

    /// Loader for the documents a configuration names.
    pub fn from_config(config: &PackConfig) -> Self {
        Self::new(config.location_paths())
    }

    /// Documents in load order.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Load every document, in order, into a fresh tree.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Io`] or [`LoadError::Json`] for the first
    /// document that cannot be read or parsed.
    pub fn load(&self) -> Result<LoadedPack, LoadError> {
        let mut pack = LoadedPack::default();
        for path in &self.files {
            let mut diagnostics = load_document(&mut pack.tree, path)?;
            pack.diagnostics.append(&mut diagnostics);
        }
        info!(
            documents = self.files.len(),
            locations = pack.tree.len(),
            diagnostics = pack.diagnostics.len(),
            "Pack loaded"
        );
        Ok(pack)
    }
}

/// Parse one JSON document and merge it into `tree`.
///
/// # Errors
///
/// Returns [`LoadError::Io`] if the file cannot be read and
/// [`LoadError::Json`] if it is not valid JSON.
pub fn load_document(tree: &mut LocationTree, path: &Path) -> Result<Diagnostics, LoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let document: Value = serde_json::from_str(&contents).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "Loading location document");
    Ok(tree.load_fragment(&document)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_names_the_path() {
        let loader = PackLoader::new(vec![PathBuf::from("/nonexistent/waymark/locations.json")]);
        let err = loader.load().unwrap_err();
        assert!(matches!(err, LoadError::Io { ref path, .. } if path.ends_with("locations.json")));
    }

    #[test]
    fn empty_loader_yields_empty_tree() {
        let pack = PackLoader::new(Vec::new()).load().unwrap();
        assert!(pack.tree.is_empty());
        assert!(pack.diagnostics.is_empty());
    }

    #[test]
    fn loader_resolves_paths_against_root() {
        let config = PackConfig {
            root: PathBuf::from("pack"),
            locations: vec![PathBuf::from("a.json"), PathBuf::from("b.json")],
        };
        let loader = PackLoader::from_config(&config);
        assert_eq!(
            loader.files(),
            &[PathBuf::from("pack/a.json"), PathBuf::from("pack/b.json")]
        );
    }
}
