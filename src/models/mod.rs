//! Domain models for test history records.
//!
//! These are snapshots produced by the host. The client only transports them.

pub mod screenshot;
pub mod test_case;
pub mod test_run;
pub mod test_statistics;

// Re-export commonly used types
pub use screenshot::Screenshot;
pub use test_case::{CaseStatus, TestCaseDetail};
pub use test_run::{RunStatus, TestRun, TestRunDetail, TestType};
pub use test_statistics::{CleanupReport, TestStatistics, UpdateAck};

/// Number of runs returned by a history query when no limit is given.
pub const DEFAULT_HISTORY_LIMIT: u32 = 50;
