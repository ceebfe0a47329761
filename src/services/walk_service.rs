use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::services::format_service;

/// Recursive sum of file lengths under `path`. Missing, unreadable, or
/// non-directory paths yield 0 so a slow or broken subtree never takes the
/// browsing UI down with it. Symlinks are not followed, so a symlinked
/// directory cycle cannot make the walk diverge.
pub fn directory_size(path: &Path) -> u64 {
    directory_size_with_cancel(path, &|| false)
}

/// Same walk, but polls `cancelled` once per visited entry and aborts early.
/// The partial sum returned after cancellation is meant to be discarded.
pub fn directory_size_with_cancel(path: &Path, cancelled: &dyn Fn() -> bool) -> u64 {
    if !path.is_dir() {
        return 0;
    }

    let mut total = 0u64;
    for entry in WalkDir::new(path).into_iter() {
        if cancelled() {
            break;
        }
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                debug!("skipping unreadable entry under {}: {err}", path.display());
                continue;
            }
        };
        if entry.file_type().is_file() {
            total += entry.metadata().map(|m| m.len()).unwrap_or(0);
        }
    }
    total
}

/// Human-readable directory size, the shape the presentation layer shows.
pub fn directory_size_display(path: &Path) -> String {
    format_service::format_size(directory_size(path))
}

pub async fn directory_size_display_async(path: PathBuf) -> String {
    tokio::task::spawn_blocking(move || directory_size_display(&path))
        .await
        .unwrap_or_else(|_| format_service::format_size(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn empty_directory_is_zero() {
        let dir = tempdir().unwrap();
        assert_eq!(directory_size(dir.path()), 0);
    }

    #[test]
    fn missing_path_is_zero() {
        assert_eq!(directory_size(Path::new("/no/such/path/9f2c")), 0);
    }

    #[test]
    fn file_path_is_zero() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("f.bin");
        fs::write(&file, b"0123456789").unwrap();
        assert_eq!(directory_size(&file), 0);
    }

    #[test]
    fn empty_subdirectories_do_not_count() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("data.bin"), b"0123456789").unwrap();
        fs::create_dir(dir.path().join("empty")).unwrap();

        assert_eq!(directory_size(dir.path()), 10);
    }

    #[test]
    fn nested_files_are_summed() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), b"12345").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("b.txt"), b"1234567").unwrap();

        assert_eq!(directory_size(dir.path()), 12);
    }

    #[test]
    fn cancellation_aborts_the_walk() {
        let dir = tempdir().unwrap();
        for i in 0..10 {
            fs::write(dir.path().join(format!("f{i}.bin")), b"xxxx").unwrap();
        }

        assert_eq!(directory_size_with_cancel(dir.path(), &|| true), 0);
    }

    #[test]
    fn display_uses_human_units() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("big.bin"), vec![0u8; 2048]).unwrap();
        assert_eq!(directory_size_display(dir.path()), "2.0 KB");
    }

    #[tokio::test]
    async fn async_display_matches_sync() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("x.bin"), b"abc").unwrap();

        let via_task = directory_size_display_async(dir.path().to_path_buf()).await;
        assert_eq!(via_task, directory_size_display(dir.path()));
    }
}
