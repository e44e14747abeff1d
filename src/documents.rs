/// PDF document listing
///
/// Enumerates the configured documents directory. Clients request the
/// listing over the WebSocket ("pdf" command) and fetch individual files
/// over HTTP; both paths only ever expose names this enumeration yielded.
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// List the PDF files in a directory, sorted by name
pub fn list_documents(dir: &Path) -> Result<Vec<String>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read documents directory: {}", dir.display()))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| "Failed to read directory entry")?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.to_lowercase().ends_with(".pdf") {
            names.push(name);
        }
    }

    names.sort();
    Ok(names)
}

/// Check whether a named document exists in the directory
///
/// Matching against the enumeration (instead of probing the path) refuses
/// traversal outside the directory.
pub fn has_document(dir: &Path, name: &str) -> bool {
    list_documents(dir)
        .map(|names| names.iter().any(|n| n == name))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    #[test]
    fn test_lists_only_pdfs_sorted() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("b.pdf")).unwrap();
        File::create(dir.path().join("a.PDF")).unwrap();
        File::create(dir.path().join("notes.txt")).unwrap();

        let names = list_documents(dir.path()).unwrap();
        assert_eq!(names, vec!["a.PDF".to_string(), "b.pdf".to_string()]);
    }

    #[test]
    fn test_missing_directory_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(list_documents(&missing).is_err());
    }

    #[test]
    fn test_has_document() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("plan.pdf")).unwrap();

        assert!(has_document(dir.path(), "plan.pdf"));
        assert!(!has_document(dir.path(), "other.pdf"));
        assert!(!has_document(dir.path(), "../plan.pdf"));
    }
}
