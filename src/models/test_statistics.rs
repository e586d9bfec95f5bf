//! Aggregate counters and acknowledgement payloads returned by the host.

use serde::{Deserialize, Serialize};

/// Run counters for one project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestStatistics {
    pub total_runs: i64,
    pub passed_runs: i64,
    pub failed_runs: i64,
    /// Number of distinct test names
    pub unique_tests: i64,
}

/// Acknowledgement for an AI analysis update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateAck {
    pub success: bool,
}

/// Result of deleting old runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupReport {
    pub deleted: u64,
    pub success: bool,
}
