//! Post-export cleanup.
//!
//! TRADE-OFFS
//! ==========
//! Deletes are best-effort and not atomic. Each populated slot gets exactly
//! one delete request, all issued together and joined; a failed delete
//! never stops the others. The session is reset afterwards no matter how
//! many deletes failed, so a partial failure can orphan files in the
//! store. The report lists the orphans.

use futures::future::join_all;
use tracing::{info, warn};

use crate::session::{Event, SessionState, transition};
use crate::store::{FileStore, StoreError};

/// One delete that did not go through.
#[derive(Debug)]
pub struct FailedDelete {
    pub category: &'static str,
    pub key: String,
    pub error: StoreError,
}

#[derive(Debug, Default)]
pub struct CleanupReport {
    pub attempted: usize,
    pub failed: Vec<FailedDelete>,
}

impl CleanupReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    #[must_use]
    pub fn deleted(&self) -> usize {
        self.attempted - self.failed.len()
    }

    /// The user-facing error for this report, if anything failed.
    #[must_use]
    pub fn partial_failure(&self) -> Option<CleanupPartialFailure> {
        if self.is_clean() {
            return None;
        }
        Some(CleanupPartialFailure {
            attempted: self.attempted,
            failed_keys: self.failed.iter().map(|f| f.key.clone()).collect(),
        })
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{} of {attempted} images could not be deleted", .failed_keys.len())]
pub struct CleanupPartialFailure {
    pub attempted: usize,
    pub failed_keys: Vec<String>,
}

impl crate::error::ErrorCode for CleanupPartialFailure {
    fn error_code(&self) -> &'static str {
        "E_CLEANUP_PARTIAL_FAILURE"
    }
}

/// Delete every stored image in `state`, then reset `state` to variant
/// selection with an empty slot map.
pub async fn cleanup_after_export(store: &dyn FileStore, state: &mut SessionState) -> CleanupReport {
    if state.slots.is_empty() {
        *state = transition(std::mem::take(state), Event::ExportCleanedUp);
        return CleanupReport::default();
    }

    let deletes = state
        .slots
        .records()
        .map(|(category, record)| async move { (category.name, record.key.clone(), store.delete(&record.key).await) });
    let results = join_all(deletes).await;

    let mut report = CleanupReport { attempted: results.len(), failed: Vec::new() };
    for (category, key, result) in results {
        if let Err(error) = result {
            let failed = FailedDelete { category, key, error };
            warn!(
                error = %failed.error,
                category = failed.category,
                key = %failed.key,
                "post-export delete failed; file left in store"
            );
            report.failed.push(failed);
        }
    }

    *state = transition(std::mem::take(state), Event::ExportCleanedUp);
    info!(
        attempted = report.attempted,
        deleted = report.deleted(),
        failed = report.failed.len(),
        "post-export cleanup finished"
    );
    report
}

#[cfg(test)]
#[path = "cleanup_test.rs"]
mod tests;
