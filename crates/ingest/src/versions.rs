//! Content-version tracking for ingested sources.
//!
//! Persists a flat JSON mapping from source filename to content hash.
//! The mapping is the sole source of truth for skip decisions: a source
//! whose recorded hash equals its freshly computed hash is not re-chunked,
//! re-embedded, or re-upserted.

use airguide_core::{AppError, AppResult};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Persistent filename -> content hash store.
pub struct ContentVersionStore {
    path: PathBuf,
}

impl ContentVersionStore {
    /// Create a store backed by the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the mapping. A missing file means nothing was ingested yet.
    pub fn load(&self) -> AppResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let contents = fs::read_to_string(&self.path).map_err(|e| {
            AppError::Ingest(format!("Failed to read metadata {:?}: {}", self.path, e))
        })?;

        let mapping: BTreeMap<String, String> = serde_json::from_str(&contents).map_err(|e| {
            AppError::Ingest(format!("Failed to parse metadata {:?}: {}", self.path, e))
        })?;

        tracing::debug!("Loaded {} metadata entries", mapping.len());
        Ok(mapping)
    }

    /// Persist the full mapping, replacing any previous content.
    ///
    /// Writes to a sibling temp file and renames over the target so a
    /// partial write can never leave a mix of old and new entries.
    pub fn save(&self, mapping: &BTreeMap<String, String>) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    AppError::Ingest(format!("Failed to create metadata directory: {}", e))
                })?;
            }
        }

        let json = serde_json::to_string_pretty(mapping)?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json).map_err(|e| {
            AppError::Ingest(format!("Failed to write metadata {:?}: {}", tmp_path, e))
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|e| {
            AppError::Ingest(format!("Failed to replace metadata {:?}: {}", self.path, e))
        })?;

        tracing::debug!("Saved {} metadata entries to {:?}", mapping.len(), self.path);
        Ok(())
    }
}

/// Compute the content hash of a file: SHA-256 over the raw bytes,
/// lowercase hex.
pub fn hash_file(path: &Path) -> AppResult<String> {
    let bytes = fs::read(path)
        .map_err(|e| AppError::Ingest(format!("Failed to read {:?}: {}", path, e)))?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = ContentVersionStore::new(temp.path().join("meta.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp = TempDir::new().unwrap();
        let store = ContentVersionStore::new(temp.path().join("meta.json"));

        let mut mapping = BTreeMap::new();
        mapping.insert("manual.pdf".to_string(), "aa11".to_string());
        mapping.insert("guide.txt".to_string(), "bb22".to_string());

        store.save(&mapping).unwrap();
        assert_eq!(store.load().unwrap(), mapping);
    }

    #[test]
    fn test_save_replaces_whole_mapping() {
        let temp = TempDir::new().unwrap();
        let store = ContentVersionStore::new(temp.path().join("meta.json"));

        let mut first = BTreeMap::new();
        first.insert("old.pdf".to_string(), "aa".to_string());
        store.save(&first).unwrap();

        let mut second = BTreeMap::new();
        second.insert("new.pdf".to_string(), "bb".to_string());
        store.save(&second).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(!loaded.contains_key("old.pdf"));
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let temp = TempDir::new().unwrap();
        let store = ContentVersionStore::new(temp.path().join("meta.json"));
        store.save(&BTreeMap::new()).unwrap();

        let entries: Vec<_> = fs::read_dir(temp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("meta.json")]);
    }

    #[test]
    fn test_hash_file_stable_and_content_sensitive() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("doc.txt");

        fs::write(&path, b"heat pump manual").unwrap();
        let h1 = hash_file(&path).unwrap();
        let h2 = hash_file(&path).unwrap();
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 64);

        // A single changed byte changes the hash.
        fs::write(&path, b"heat pump manuaL").unwrap();
        let h3 = hash_file(&path).unwrap();
        assert_ne!(h1, h3);
    }

    #[test]
    fn test_hash_missing_file_errors() {
        assert!(hash_file(Path::new("/nonexistent/never.pdf")).is_err());
    }
}
