use serde::{Deserialize, Serialize};
use std::fs::Metadata;
use std::path::Path;

use crate::error::AppError;
use crate::services::{format_service, mime_service};

/// One filesystem object as seen by a listing. Entries are value types:
/// size enrichment and renames produce new entries, never in-place edits.
///
/// Invariant: `is_directory` implies `mime_type` and `extension` are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
    pub path: String,
    pub name: String,
    pub is_directory: bool,
    /// Directories report 0 until a size-enrichment pass replaces the entry.
    pub size_bytes: u64,
    /// Filesystem mtime, epoch milliseconds.
    pub modified_at: i64,
    pub mime_type: Option<String>,
    pub extension: Option<String>,
    pub is_image: bool,
}

impl FileEntry {
    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let metadata = std::fs::metadata(path)?;
        Ok(Self::from_metadata(path, &metadata))
    }

    pub fn from_metadata(path: &Path, metadata: &Metadata) -> Self {
        let is_directory = metadata.is_dir();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let extension = if is_directory {
            None
        } else {
            path.extension()
                .map(|e| e.to_string_lossy().to_lowercase())
        };

        let mime_type = if is_directory {
            None
        } else {
            mime_service::mime_for_path(path)
        };

        let is_image = mime_type
            .as_deref()
            .is_some_and(|m| m.starts_with("image/"))
            || extension
                .as_deref()
                .is_some_and(mime_service::is_raster_image);

        Self {
            path: path.to_string_lossy().to_string(),
            name,
            is_directory,
            size_bytes: if is_directory { 0 } else { metadata.len() },
            modified_at: metadata
                .modified()
                .ok()
                .map(|t| chrono::DateTime::<chrono::Utc>::from(t).timestamp_millis())
                .unwrap_or(0),
            mime_type,
            extension,
            is_image,
        }
    }

    pub fn size_display(&self) -> String {
        format_service::format_size(self.size_bytes)
    }

    pub fn modified_display(&self) -> String {
        format_service::format_date(self.modified_at)
    }

    pub fn with_size(&self, size_bytes: u64) -> Self {
        Self {
            size_bytes,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn file_entry_populates_metadata() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("photo.JPG");
        fs::write(&path, b"fake image bytes").unwrap();

        let entry = FileEntry::from_path(&path).unwrap();

        assert_eq!(entry.name, "photo.JPG");
        assert!(!entry.is_directory);
        assert_eq!(entry.size_bytes, 16);
        assert_eq!(entry.extension.as_deref(), Some("jpg"));
        assert_eq!(entry.mime_type.as_deref(), Some("image/jpeg"));
        assert!(entry.is_image);
        assert!(entry.modified_at > 0);
    }

    #[test]
    fn directory_entry_has_no_mime_or_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reports.v2");
        fs::create_dir(&path).unwrap();

        let entry = FileEntry::from_path(&path).unwrap();

        assert!(entry.is_directory);
        assert_eq!(entry.size_bytes, 0);
        assert!(entry.mime_type.is_none());
        assert!(entry.extension.is_none());
        assert!(!entry.is_image);
    }

    #[test]
    fn with_size_replaces_only_the_size() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sub");
        fs::create_dir(&path).unwrap();

        let entry = FileEntry::from_path(&path).unwrap();
        let enriched = entry.with_size(4096);

        assert_eq!(enriched.size_bytes, 4096);
        assert_eq!(enriched.path, entry.path);
        assert_eq!(enriched.modified_at, entry.modified_at);
    }

    #[test]
    fn extensionless_file_is_not_an_image() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("README");
        fs::write(&path, b"hello").unwrap();

        let entry = FileEntry::from_path(&path).unwrap();
        assert!(entry.mime_type.is_none());
        assert!(!entry.is_image);
    }
}
