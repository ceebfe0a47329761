use directories::UserDirs;
use std::path::{Path, PathBuf};

use crate::models::storage::StorageCategory;
use crate::services::walk_service;

/// Home-screen storage roots. Categories whose directory the platform does
/// not provide are simply absent.
pub fn storage_categories() -> Vec<StorageCategory> {
    let Some(user_dirs) = UserDirs::new() else {
        return Vec::new();
    };

    let mut categories = Vec::new();
    let mut push = |name: &str, dir: Option<&Path>| {
        if let Some(dir) = dir {
            categories.push(StorageCategory::new(name, dir.to_string_lossy()));
        }
    };

    push("Downloads", user_dirs.download_dir());
    push("Images", user_dirs.picture_dir());
    push("Videos", user_dirs.video_dir());
    push("Music", user_dirs.audio_dir());
    push("Documents", user_dirs.document_dir());
    push("Home", Some(user_dirs.home_dir()));
    categories
}

/// Fill in each category's size concurrently, one walk per root, and return
/// the enriched list once all walks finish.
pub async fn categories_with_sizes(categories: Vec<StorageCategory>) -> Vec<StorageCategory> {
    let mut handles = Vec::new();
    for category in &categories {
        let path = PathBuf::from(&category.path);
        handles.push(tokio::task::spawn_blocking(move || {
            walk_service::directory_size_display(&path)
        }));
    }

    let mut enriched = Vec::with_capacity(categories.len());
    for (category, handle) in categories.into_iter().zip(handles) {
        let size_display = handle.await.ok();
        enriched.push(StorageCategory {
            size_display,
            ..category
        });
    }
    enriched
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn size_pass_fills_every_category() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("f.bin"), vec![0u8; 1024]).unwrap();

        let categories = vec![
            StorageCategory::new("Scratch", dir.path().to_string_lossy()),
            StorageCategory::new("Ghost", "/no/such/root/77aa"),
        ];
        let enriched = categories_with_sizes(categories).await;

        assert_eq!(enriched[0].size_display.as_deref(), Some("1.0 KB"));
        // Missing roots size to zero rather than erroring.
        assert_eq!(enriched[1].size_display.as_deref(), Some("0 B"));
    }
}
