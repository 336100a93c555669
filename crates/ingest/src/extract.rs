//! Text extraction collaborator boundary.
//!
//! Raw documents become plain text here. PDF parsing is delegated to the
//! `pdf-extract` crate; its internals are outside this design. Plain-text
//! and markdown sources are read directly.

use airguide_core::{AppError, AppResult};
use std::fs;
use std::path::Path;

/// Extract plain text from a source document based on its extension.
pub fn extract_text(path: &Path) -> AppResult<String> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => {
            let bytes = fs::read(path)
                .map_err(|e| AppError::Ingest(format!("Failed to read {:?}: {}", path, e)))?;
            pdf_extract::extract_text_from_mem(&bytes)
                .map_err(|e| AppError::Ingest(format!("PDF extraction failed for {:?}: {}", path, e)))
        }
        "txt" | "md" => fs::read_to_string(path)
            .map_err(|e| AppError::Ingest(format!("Failed to read {:?}: {}", path, e))),
        other => Err(AppError::Ingest(format!(
            "Unsupported document type '.{}' for {:?}",
            other, path
        ))),
    }
}

/// Whether a file extension is one the extractor understands.
pub fn is_supported(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase()).as_deref(),
        Some("pdf") | Some("txt") | Some("md")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_plain_text_extraction() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("guide.txt");
        fs::write(&path, "Heat pumps move heat.").unwrap();

        let text = extract_text(&path).unwrap();
        assert_eq!(text, "Heat pumps move heat.");
    }

    #[test]
    fn test_markdown_extraction() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("notes.md");
        fs::write(&path, "# Sizing\n\nRule of thumb.").unwrap();

        let text = extract_text(&path).unwrap();
        assert!(text.contains("Rule of thumb."));
    }

    #[test]
    fn test_unsupported_extension() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("data.docx");
        fs::write(&path, "x").unwrap();

        assert!(extract_text(&path).is_err());
    }

    #[test]
    fn test_is_supported() {
        assert!(is_supported(Path::new("a.pdf")));
        assert!(is_supported(Path::new("a.TXT")));
        assert!(is_supported(Path::new("a.md")));
        assert!(!is_supported(Path::new("a.docx")));
        assert!(!is_supported(Path::new("noext")));
    }

    #[test]
    fn test_missing_file_errors() {
        assert!(extract_text(Path::new("/nonexistent/manual.txt")).is_err());
    }
}
