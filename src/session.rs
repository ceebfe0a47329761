use serde::Serialize;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tracing::warn;

use crate::error::AppError;
use crate::models::file_entry::FileEntry;
use crate::models::outcome::OperationOutcome;
use crate::scope_path;
use crate::services::file_service::FileOps;
use crate::services::listing_service;

/// Snapshot of one browsing screen: where it is, what it shows, and any
/// pending one-shot notification.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BrowsingState {
    pub current_path: String,
    pub entries: Vec<FileEntry>,
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub success_message: Option<String>,
}

/// Cancellation token for one load. Minted per `navigate`; a later navigate
/// bumps the shared generation, after which every check on the older token
/// reports cancelled. Cooperative only: long walks poll it and stop early.
#[derive(Clone)]
pub struct LoadToken {
    generation: Arc<AtomicU64>,
    issued: u64,
}

impl LoadToken {
    pub fn is_cancelled(&self) -> bool {
        self.generation.load(Ordering::SeqCst) != self.issued
    }

    /// A token that is never superseded, for loads run outside a session.
    pub fn detached() -> Self {
        Self {
            generation: Arc::new(AtomicU64::new(0)),
            issued: 0,
        }
    }
}

/// One browsing screen's engine. Owns the current path, drives two-phase
/// listing loads (fast unenriched publish, then directory sizes), and runs
/// mutating operations off-thread, re-listing on success. Construct one per
/// active screen; there is no ambient global.
pub struct BrowsingSession {
    state: RwLock<BrowsingState>,
    generation: Arc<AtomicU64>,
    ops: Arc<FileOps>,
}

impl BrowsingSession {
    pub fn new(ops: FileOps) -> Self {
        Self {
            state: RwLock::new(BrowsingState::default()),
            generation: Arc::new(AtomicU64::new(0)),
            ops: Arc::new(ops),
        }
    }

    pub fn snapshot(&self) -> BrowsingState {
        self.state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Return and clear both pending messages. Clearing is the contract:
    /// a notification must not redisplay on the next unrelated state change.
    pub fn take_messages(&self) -> (Option<String>, Option<String>) {
        let mut state = self.write_state();
        (state.success_message.take(), state.error_message.take())
    }

    /// Load `path` in two phases. Phase 1 publishes the plain listing as
    /// soon as it is read; phase 2 publishes it again with directory sizes
    /// filled in. A navigate that has been superseded publishes nothing.
    pub async fn navigate(&self, path: &str) {
        let path = scope_path::normalize(path);
        let token = self.begin_load(&path);

        let list_path = path.clone();
        let entries = match tokio::task::spawn_blocking(move || {
            listing_service::list_dir(Path::new(&list_path))
        })
        .await
        {
            Ok(entries) => entries,
            Err(err) => {
                warn!("listing task for {path} failed: {err}");
                Vec::new()
            }
        };

        let phase1 = entries.clone();
        let published = self.publish_if_current(&token, |state| {
            state.entries = phase1;
            state.is_loading = false;
        });
        if !published {
            return;
        }

        let enriched = listing_service::enrich_directory_sizes(entries, token.clone()).await;
        self.publish_if_current(&token, |state| {
            state.entries = enriched;
        });
    }

    pub async fn refresh(&self) {
        let current = self.snapshot().current_path;
        if !current.is_empty() {
            self.navigate(&current).await;
        }
    }

    pub async fn copy(&self, source: &str, dest_dir: &str) -> OperationOutcome {
        let ops = Arc::clone(&self.ops);
        let (source, dest_dir) = (source.to_string(), dest_dir.to_string());
        let outcome = run_op(move || ops.copy(&source, &dest_dir)).await;
        self.finish_operation(outcome).await
    }

    pub async fn move_to(&self, source: &str, dest_dir: &str) -> OperationOutcome {
        let ops = Arc::clone(&self.ops);
        let (source, dest_dir) = (source.to_string(), dest_dir.to_string());
        let outcome = run_op(move || ops.move_to(&source, &dest_dir)).await;
        self.finish_operation(outcome).await
    }

    pub async fn delete(&self, path: &str) -> OperationOutcome {
        let ops = Arc::clone(&self.ops);
        let path = path.to_string();
        let outcome = run_op(move || ops.delete(&path)).await;
        self.finish_operation(outcome).await
    }

    pub async fn rename(&self, path: &str, new_name: &str) -> OperationOutcome {
        let ops = Arc::clone(&self.ops);
        let (path, new_name) = (path.to_string(), new_name.to_string());
        let outcome = run_op(move || ops.rename(&path, &new_name)).await;
        self.finish_operation(outcome).await
    }

    pub async fn create_folder(&self, parent_dir: &str, name: &str) -> OperationOutcome {
        let ops = Arc::clone(&self.ops);
        let (parent_dir, name) = (parent_dir.to_string(), name.to_string());
        let outcome = run_op(move || ops.create_folder(&parent_dir, &name)).await;
        self.finish_operation(outcome).await
    }

    // Generation bump and current-path write happen under one lock
    // acquisition, so the newest path always belongs to the newest token.
    fn begin_load(&self, path: &str) -> LoadToken {
        let mut state = self.write_state();
        let issued = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        state.current_path = path.to_string();
        state.is_loading = true;
        state.error_message = None;
        LoadToken {
            generation: Arc::clone(&self.generation),
            issued,
        }
    }

    // The token check happens under the state lock: once a newer navigate
    // has minted its token, a stale load can no longer slip a write in.
    fn publish_if_current<F>(&self, token: &LoadToken, apply: F) -> bool
    where
        F: FnOnce(&mut BrowsingState),
    {
        let mut state = self.write_state();
        if token.is_cancelled() {
            return false;
        }
        apply(&mut state);
        true
    }

    // Messages are stored after the refresh: begin_load clears the error
    // slot, and a partial-success notice must survive its own re-list.
    async fn finish_operation(&self, outcome: OperationOutcome) -> OperationOutcome {
        match &outcome {
            OperationOutcome::Success { message } => {
                self.refresh().await;
                let mut state = self.write_state();
                state.success_message = Some(message.clone());
                state.error_message = None;
            }
            // The filesystem did change, so re-list; but the message goes to
            // the error slot because the user has cleanup to do.
            OperationOutcome::PartialSuccess { message, .. } => {
                self.refresh().await;
                let mut state = self.write_state();
                state.error_message = Some(message.clone());
                state.success_message = None;
            }
            OperationOutcome::Failure { error } => {
                let mut state = self.write_state();
                state.error_message = Some(error.to_string());
                state.success_message = None;
            }
        }
        outcome
    }

    fn write_state(&self) -> std::sync::RwLockWriteGuard<'_, BrowsingState> {
        self.state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

async fn run_op<F>(op: F) -> OperationOutcome
where
    F: FnOnce() -> OperationOutcome + Send + 'static,
{
    tokio::task::spawn_blocking(op)
        .await
        .unwrap_or_else(|err| OperationOutcome::Failure {
            error: AppError::Unknown(err.to_string()),
        })
}
