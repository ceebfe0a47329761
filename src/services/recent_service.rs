use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::models::file_entry::FileEntry;
use crate::services::mime_service;

/// Most-recently-modified files under a root, with keyset pagination.
///
/// This is a filesystem-backed stand-in for a platform media index: only
/// files with a recognizable MIME type are indexed, existence is re-checked
/// before a row is returned (the index view can lag deletes), and pages are
/// cut strictly before the caller's timestamp cursor. Callers should stop
/// paging once a returned page is shorter than `page_size`.
pub struct RecentFiles {
    root: PathBuf,
}

impl RecentFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// One page of recent files, newest first. With a cursor, only files
    /// strictly older than `last_timestamp` (epoch millis) are returned;
    /// without one, the newest page. Read path: failures degrade to empty.
    pub fn fetch(&self, last_timestamp: Option<i64>, page_size: usize) -> Vec<FileEntry> {
        let mut files: Vec<FileEntry> = WalkDir::new(&self.root)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    debug!("recent scan skipping entry: {err}");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| mime_service::mime_for_path(entry.path()).is_some())
            .filter(|entry| entry.path().exists())
            .filter_map(|entry| {
                let metadata = entry.metadata().ok()?;
                Some(FileEntry::from_metadata(entry.path(), &metadata))
            })
            .filter(|file| match last_timestamp {
                Some(cursor) => file.modified_at < cursor,
                None => true,
            })
            .collect();

        files.sort_by(|a, b| b.modified_at.cmp(&a.modified_at));
        files.truncate(page_size);
        files
    }

    /// Newest `limit` files; the home-screen convenience form of `fetch`.
    pub fn latest(&self, limit: usize) -> Vec<FileEntry> {
        self.fetch(None, limit)
    }

    pub async fn fetch_page(&self, last_timestamp: Option<i64>, page_size: usize) -> Vec<FileEntry> {
        let index = Self::new(self.root.clone());
        tokio::task::spawn_blocking(move || index.fetch(last_timestamp, page_size))
            .await
            .unwrap_or_default()
    }
}

/// Fixed-folder variant: the first `limit` files of one directory, newest
/// first, no recursion and no pagination.
pub fn recent_in_directory(dir: &Path, limit: usize) -> Vec<FileEntry> {
    let read_dir = match std::fs::read_dir(dir) {
        Ok(read_dir) => read_dir,
        Err(err) => {
            debug!("recent scan of {} failed: {err}", dir.display());
            return Vec::new();
        }
    };

    let mut files: Vec<FileEntry> = read_dir
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let metadata = entry.metadata().ok()?;
            metadata
                .is_file()
                .then(|| FileEntry::from_metadata(&entry.path(), &metadata))
        })
        .collect();

    files.sort_by(|a, b| b.modified_at.cmp(&a.modified_at));
    files.truncate(limit);
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::thread::sleep;
    use std::time::Duration;
    use tempfile::tempdir;

    fn write_spaced(dir: &Path, names: &[&str]) {
        for name in names {
            fs::write(dir.join(name), b"x").unwrap();
            sleep(Duration::from_millis(20));
        }
    }

    #[test]
    fn newest_page_first_without_a_cursor() {
        let dir = tempdir().unwrap();
        write_spaced(dir.path(), &["a.txt", "b.txt", "c.txt"]);

        let page = RecentFiles::new(dir.path()).fetch(None, 2);

        assert_eq!(page.len(), 2);
        assert_eq!(page[0].name, "c.txt");
        assert_eq!(page[1].name, "b.txt");
    }

    #[test]
    fn cursor_pages_are_strictly_older() {
        let dir = tempdir().unwrap();
        write_spaced(dir.path(), &["a.txt", "b.txt", "c.txt"]);

        let index = RecentFiles::new(dir.path());
        let first = index.fetch(None, 2);
        let cursor = first.last().unwrap().modified_at;
        let second = index.fetch(Some(cursor), 2);

        assert_eq!(second.len(), 1, "short page signals the end");
        assert_eq!(second[0].name, "a.txt");
        assert!(second[0].modified_at < cursor);
    }

    #[test]
    fn files_without_a_recognizable_type_are_not_indexed() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("noext"), b"x").unwrap();
        fs::write(dir.path().join("doc.txt"), b"x").unwrap();

        let page = RecentFiles::new(dir.path()).fetch(None, 10);

        assert_eq!(page.len(), 1);
        assert_eq!(page[0].name, "doc.txt");
    }

    #[test]
    fn recursion_covers_subdirectories() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("deep.txt"), b"x").unwrap();

        let page = RecentFiles::new(dir.path()).fetch(None, 10);
        assert!(page.iter().any(|f| f.name == "deep.txt"));
        assert!(page.iter().all(|f| !f.is_directory));
    }

    #[test]
    fn missing_root_degrades_to_empty() {
        let page = RecentFiles::new("/no/such/root/77aa").fetch(None, 10);
        assert!(page.is_empty());
    }

    #[test]
    fn fixed_folder_scan_ignores_directories_and_caps_the_count() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        write_spaced(dir.path(), &["one.txt", "two.txt", "three.txt"]);

        let recents = recent_in_directory(dir.path(), 2);

        assert_eq!(recents.len(), 2);
        assert_eq!(recents[0].name, "three.txt");
        assert!(recents.iter().all(|f| !f.is_directory));
    }

    #[tokio::test]
    async fn async_page_matches_sync_fetch() {
        let dir = tempdir().unwrap();
        write_spaced(dir.path(), &["a.txt", "b.txt"]);

        let index = RecentFiles::new(dir.path());
        let sync_page = index.fetch(None, 10);
        let async_page = index.fetch_page(None, 10).await;

        assert_eq!(sync_page, async_page);
    }
}
