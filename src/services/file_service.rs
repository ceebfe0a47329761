use std::fs;
use std::path::Path;
use tracing::warn;

use crate::error::AppError;
use crate::models::file_entry::FileEntry;
use crate::models::outcome::OperationOutcome;
use crate::services::format_service;
use crate::services::space_service::{DiskSpace, SpaceProbe};
use crate::services::walk_service;

const INVALID_NAME_CHARS: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Copy, move, rename, delete, and create-folder with classified outcomes.
/// Synchronous at this layer; the browsing session runs these through
/// `spawn_blocking`. The free-space probe is injected so the move storage
/// check is testable.
pub struct FileOps {
    space: Box<dyn SpaceProbe>,
}

impl Default for FileOps {
    fn default() -> Self {
        Self::new()
    }
}

impl FileOps {
    pub fn new() -> Self {
        Self::with_space_probe(Box::new(DiskSpace))
    }

    pub fn with_space_probe(space: Box<dyn SpaceProbe>) -> Self {
        Self { space }
    }

    /// Copy `source` into `dest_dir` under its own name. No overwrite, no
    /// merge: an existing entry at the target name is a conflict.
    pub fn copy(&self, source: &str, dest_dir: &str) -> OperationOutcome {
        copy_inner(source, dest_dir).into()
    }

    /// Move `source` into `dest_dir`: validate, check free space, try an
    /// atomic rename, and only then fall back to copy-then-delete. The
    /// fallback can end in `PartialSuccess` when the copy lands but the
    /// source delete fails; data is never silently duplicated.
    pub fn move_to(&self, source: &str, dest_dir: &str) -> OperationOutcome {
        let src = Path::new(source);
        let dest = Path::new(dest_dir);

        if !src.exists() {
            return fail(AppError::NotFound(format!("source not found: {source}")));
        }
        if !dest.is_dir() {
            return fail(AppError::NotFound(format!(
                "destination directory not found: {dest_dir}"
            )));
        }
        let Some(file_name) = src.file_name() else {
            return fail(AppError::InvalidState(format!(
                "cannot resolve source name: {source}"
            )));
        };
        let target = dest.join(file_name);
        if target.exists() {
            return fail(AppError::AlreadyExists(format!(
                "already exists at destination: {}",
                target.display()
            )));
        }
        if let Some(parent) = src.parent() {
            if !is_writable(parent) {
                return fail(AppError::PermissionDenied(
                    "no write permission in source directory".to_string(),
                ));
            }
        }
        if !is_writable(dest) {
            return fail(AppError::PermissionDenied(
                "no write permission in destination directory".to_string(),
            ));
        }

        let needed = if src.is_dir() {
            walk_service::directory_size(src)
        } else {
            src.metadata().map(|m| m.len()).unwrap_or(0)
        };
        if let Some(available) = self.space.available_space(dest) {
            if needed > available {
                return fail(AppError::Io(format!(
                    "insufficient storage: need {}, available {}",
                    format_service::format_size(needed),
                    format_service::format_size(available)
                )));
            }
        }

        // Fast path: same-volume rename is atomic and O(1).
        if fs::rename(src, &target).is_ok() {
            return OperationOutcome::success("moved successfully");
        }

        move_by_copy(src, &target)
    }

    /// Delete a file, or a directory tree recursively.
    pub fn delete(&self, path: &str) -> OperationOutcome {
        delete_inner(path).into()
    }

    pub fn rename(&self, path: &str, new_name: &str) -> OperationOutcome {
        self.rename_entry(path, new_name)
            .map(|_| "renamed successfully".to_string())
            .into()
    }

    /// Rename in place and return the entry at its new path, so callers
    /// never have to reassemble the path themselves.
    pub fn rename_entry(&self, path: &str, new_name: &str) -> Result<FileEntry, AppError> {
        validate_name(new_name)?;

        let old = Path::new(path);
        if !old.exists() {
            return Err(AppError::NotFound(format!("file not found: {path}")));
        }
        let parent = old
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| {
                AppError::InvalidState(format!("cannot resolve parent directory of {path}"))
            })?;

        // Renaming to the current name is a no-op, not a conflict.
        if old.file_name().and_then(|n| n.to_str()) == Some(new_name) {
            return FileEntry::from_path(old);
        }

        let target = parent.join(new_name);
        if target.exists() {
            return Err(AppError::AlreadyExists(format!(
                "a file named {new_name} already exists"
            )));
        }

        fs::rename(old, &target)?;
        FileEntry::from_path(&target)
    }

    pub fn create_folder(&self, parent_dir: &str, name: &str) -> OperationOutcome {
        create_folder_inner(parent_dir, name).into()
    }
}

fn fail(error: AppError) -> OperationOutcome {
    OperationOutcome::Failure { error }
}

fn copy_inner(source: &str, dest_dir: &str) -> Result<String, AppError> {
    let src = Path::new(source);
    if !src.exists() {
        return Err(AppError::NotFound(format!("source not found: {source}")));
    }
    let dest = Path::new(dest_dir);
    if !dest.is_dir() {
        return Err(AppError::NotFound(format!(
            "destination is not a directory: {dest_dir}"
        )));
    }
    let file_name = src
        .file_name()
        .ok_or_else(|| AppError::InvalidState(format!("cannot resolve source name: {source}")))?;
    let target = dest.join(file_name);
    if target.exists() {
        return Err(AppError::AlreadyExists(format!(
            "already exists: {}",
            target.display()
        )));
    }

    if src.is_dir() {
        copy_dir_recursive(src, &target)?;
    } else {
        fs::copy(src, &target)?;
    }
    Ok("copied successfully".to_string())
}

fn copy_dir_recursive(src: &Path, dest: &Path) -> Result<(), AppError> {
    fs::create_dir_all(dest)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let dest_child = dest.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_recursive(&entry.path(), &dest_child)?;
        } else {
            fs::copy(entry.path(), &dest_child)?;
        }
    }
    Ok(())
}

fn move_by_copy(source: &Path, target: &Path) -> OperationOutcome {
    move_by_copy_with(source, target, remove_any)
}

fn move_by_copy_with<F>(source: &Path, target: &Path, delete_source: F) -> OperationOutcome
where
    F: FnOnce(&Path) -> Result<(), AppError>,
{
    let copied = if source.is_dir() {
        copy_dir_recursive(source, target)
    } else {
        fs::copy(source, target).map(|_| ()).map_err(AppError::from)
    };

    if let Err(error) = copied {
        cleanup_partial_target(target);
        return OperationOutcome::Failure { error };
    }

    match delete_source(source) {
        Ok(()) => OperationOutcome::success("moved successfully"),
        Err(err) => OperationOutcome::PartialSuccess {
            message: format!(
                "copied to {} but failed to delete the original at {}; \
                 manual cleanup may be required ({err})",
                target.display(),
                source.display()
            ),
            destination: target.display().to_string(),
            source: source.display().to_string(),
        },
    }
}

// Best effort: a failure here is logged and the copy error stays the outcome.
fn cleanup_partial_target(target: &Path) {
    if !target.exists() {
        return;
    }
    let removed = if target.is_dir() {
        fs::remove_dir_all(target)
    } else {
        fs::remove_file(target)
    };
    if let Err(err) = removed {
        warn!(
            "failed to clean up partial copy at {}: {err}",
            target.display()
        );
    }
}

fn remove_any(path: &Path) -> Result<(), AppError> {
    if path.is_dir() {
        fs::remove_dir_all(path)?;
    } else {
        fs::remove_file(path)?;
    }
    Ok(())
}

fn delete_inner(path: &str) -> Result<String, AppError> {
    let target = Path::new(path);
    if !target.exists() {
        return Err(AppError::NotFound(format!("file not found: {path}")));
    }
    remove_any(target)?;
    Ok("deleted successfully".to_string())
}

fn create_folder_inner(parent_dir: &str, name: &str) -> Result<String, AppError> {
    let name = name.trim();
    validate_name(name)?;

    let parent = Path::new(parent_dir);
    if !parent.is_dir() {
        return Err(AppError::NotFound(format!(
            "parent directory not found: {parent_dir}"
        )));
    }
    let target = parent.join(name);
    if target.exists() {
        return Err(AppError::AlreadyExists(format!(
            "folder already exists: {}",
            target.display()
        )));
    }

    fs::create_dir(&target)?;
    Ok("folder created successfully".to_string())
}

fn validate_name(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::InvalidName("name cannot be empty".to_string()));
    }
    if name.chars().any(|c| INVALID_NAME_CHARS.contains(&c)) {
        return Err(AppError::InvalidName(
            r#"name cannot contain any of / \ : * ? " < > |"#.to_string(),
        ));
    }
    Ok(())
}

// Mode-bit check, same answer the platform gives a non-privileged user.
fn is_writable(path: &Path) -> bool {
    path.metadata()
        .map(|m| !m.permissions().readonly())
        .unwrap_or(false)
}
