//! In-memory test history storage backing the host-side functions.
//!
//! Records are kept per run; case details and screenshots live with their
//! parent run so deleting a run removes its children.

pub mod screenshots;
pub mod test_runs;

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::models::{TestCaseDetail, TestRun};

pub use screenshots::{NewScreenshot, StoredScreenshot};
pub use test_runs::{NewTestCase, NewTestRun};

/// Timestamp layout used for `created_at` fields.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format a timestamp the way the host reports it.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// A run together with everything that belongs to it.
#[derive(Debug, Clone)]
pub(crate) struct StoredRun {
    pub run: TestRun,
    pub created: DateTime<Utc>,
    pub output: String,
    pub details: Vec<TestCaseDetail>,
    pub screenshots: Vec<StoredScreenshot>,
}

#[derive(Debug, Default)]
pub(crate) struct StoreState {
    pub runs: BTreeMap<i64, StoredRun>,
    pub last_run_id: i64,
    pub last_case_id: i64,
    pub last_screenshot_id: i64,
}

/// Shared handle to the history records.
#[derive(Clone, Default)]
pub struct HistoryStore {
    state: Arc<RwLock<StoreState>>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored runs.
    pub async fn run_count(&self) -> usize {
        self.state.read().await.runs.len()
    }
}

impl std::fmt::Debug for HistoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryStore").finish_non_exhaustive()
    }
}
