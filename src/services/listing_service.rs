use std::path::Path;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::models::file_entry::FileEntry;
use crate::services::walk_service;
use crate::session::LoadToken;

/// Immediate children of `path`, newest first. A missing path or a failed
/// read yields an empty listing rather than an error: browsing stays
/// responsive even when individual directories are unreadable, at the
/// acknowledged cost of hiding the failure from the caller.
pub fn list_dir(path: &Path) -> Vec<FileEntry> {
    if !path.exists() {
        return Vec::new();
    }

    let read_dir = match std::fs::read_dir(path) {
        Ok(read_dir) => read_dir,
        Err(err) => {
            warn!("listing {} failed: {err}", path.display());
            return Vec::new();
        }
    };

    let mut entries = Vec::new();
    for entry in read_dir {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                debug!("skipping entry in {}: {err}", path.display());
                continue;
            }
        };
        match entry.metadata() {
            Ok(metadata) => entries.push(FileEntry::from_metadata(&entry.path(), &metadata)),
            Err(err) => debug!("skipping {}: {err}", entry.path().display()),
        }
    }

    entries.sort_by(|a, b| b.modified_at.cmp(&a.modified_at));
    entries
}

/// Directory children only, for destination picking. Unlike `list_dir` this
/// propagates failures: a picker that silently shows nothing is worse than
/// one that reports why.
pub fn list_subdirectories(path: &Path) -> Result<Vec<FileEntry>, AppError> {
    if !path.is_dir() {
        return Err(AppError::NotFound(format!(
            "not a directory: {}",
            path.display()
        )));
    }

    let mut entries = Vec::new();
    for entry in std::fs::read_dir(path)? {
        let entry = entry?;
        let metadata = entry.metadata()?;
        if metadata.is_dir() {
            entries.push(FileEntry::from_metadata(&entry.path(), &metadata));
        }
    }

    entries.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    Ok(entries)
}

/// Size-enrichment pass: one blocking walk per directory child, all in
/// parallel, joined before anything is merged back. Each walk polls `token`
/// so a superseded navigation stops burning I/O mid-tree. The input entries
/// are replaced, not mutated.
pub async fn enrich_directory_sizes(entries: Vec<FileEntry>, token: LoadToken) -> Vec<FileEntry> {
    let mut handles = Vec::new();
    for entry in entries.iter().filter(|e| e.is_directory) {
        let path = entry.path.clone();
        let token = token.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            let size = walk_service::directory_size_with_cancel(Path::new(&path), &|| {
                token.is_cancelled()
            });
            (path, size)
        }));
    }

    let mut sizes = std::collections::HashMap::new();
    for handle in handles {
        match handle.await {
            Ok((path, size)) => {
                sizes.insert(path, size);
            }
            Err(err) => debug!("size task failed: {err}"),
        }
    }

    entries
        .into_iter()
        .map(|entry| match sizes.get(&entry.path) {
            Some(&size) if entry.is_directory => entry.with_size(size),
            _ => entry,
        })
        .collect()
}
