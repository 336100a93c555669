//! Source document declarations.
//!
//! Sources are declared in a `sources.yaml` manifest in the docs
//! directory (title and optional origin URL per file), or discovered by
//! scanning the directory when no manifest exists.

use airguide_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::extract;

/// A source document declared for ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSource {
    /// Human-readable title, used in citations
    pub title: String,

    /// Public origin of the document, when it has one
    #[serde(rename = "originUrl", skip_serializing_if = "Option::is_none")]
    pub origin_url: Option<String>,

    /// Path to the document file
    #[serde(rename = "filePath")]
    pub file_path: PathBuf,
}

impl DocumentSource {
    /// Filename used as the metadata key for this source.
    pub fn filename(&self) -> String {
        self.file_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.file_path.to_string_lossy().to_string())
    }
}

/// Manifest file structure.
#[derive(Debug, Deserialize)]
struct Manifest {
    sources: Vec<ManifestEntry>,
}

#[derive(Debug, Deserialize)]
struct ManifestEntry {
    title: String,
    #[serde(rename = "originUrl")]
    origin_url: Option<String>,
    file: PathBuf,
}

/// Load the source listing for a docs directory.
///
/// Reads `sources.yaml` when present; otherwise scans the directory for
/// supported document types, using each file stem as its title.
pub fn load_sources(docs_dir: &Path) -> AppResult<Vec<DocumentSource>> {
    let manifest_path = docs_dir.join("sources.yaml");

    if manifest_path.exists() {
        let contents = std::fs::read_to_string(&manifest_path).map_err(|e| {
            AppError::Ingest(format!("Failed to read manifest {:?}: {}", manifest_path, e))
        })?;

        let manifest: Manifest = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Ingest(format!("Failed to parse manifest {:?}: {}", manifest_path, e))
        })?;

        let sources = manifest
            .sources
            .into_iter()
            .map(|entry| DocumentSource {
                title: entry.title,
                origin_url: entry.origin_url,
                // Manifest paths are relative to the docs directory.
                file_path: if entry.file.is_absolute() {
                    entry.file
                } else {
                    docs_dir.join(entry.file)
                },
            })
            .collect::<Vec<_>>();

        tracing::info!("Loaded {} sources from manifest", sources.len());
        return Ok(sources);
    }

    let mut sources = Vec::new();
    for entry in WalkDir::new(docs_dir)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path.is_file() && extract::is_supported(path) {
            let title = path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| "untitled".to_string());

            sources.push(DocumentSource {
                title,
                origin_url: None,
                file_path: path.to_path_buf(),
            });
        }
    }

    sources.sort_by(|a, b| a.file_path.cmp(&b.file_path));
    tracing::info!("Discovered {} sources in {:?}", sources.len(), docs_dir);
    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_discover_without_manifest() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("pump_basics.txt"), "text").unwrap();
        fs::write(temp.path().join("duct_design.md"), "text").unwrap();
        fs::write(temp.path().join("ignored.docx"), "text").unwrap();

        let sources = load_sources(temp.path()).unwrap();
        assert_eq!(sources.len(), 2);
        assert!(sources.iter().any(|s| s.title == "pump_basics"));
        assert!(sources.iter().all(|s| s.origin_url.is_none()));
    }

    #[test]
    fn test_manifest_takes_precedence() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("stray.txt"), "text").unwrap();
        fs::write(
            temp.path().join("sources.yaml"),
            "sources:\n  - title: Heat Pump Basics\n    originUrl: https://example.com/hp.pdf\n    file: hp.pdf\n",
        )
        .unwrap();

        let sources = load_sources(temp.path()).unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].title, "Heat Pump Basics");
        assert_eq!(
            sources[0].origin_url.as_deref(),
            Some("https://example.com/hp.pdf")
        );
        assert_eq!(sources[0].file_path, temp.path().join("hp.pdf"));
    }

    #[test]
    fn test_filename() {
        let source = DocumentSource {
            title: "T".to_string(),
            origin_url: None,
            file_path: PathBuf::from("/docs/sources/manual.pdf"),
        };
        assert_eq!(source.filename(), "manual.pdf");
    }
}
