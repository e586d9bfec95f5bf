//! Test run model representing one completed test execution.

use serde::{Deserialize, Serialize};

use super::{Screenshot, TestCaseDetail};

/// Kind of test suite that produced a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestType {
    Unit,
    Ui,
}

impl TestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unit => "unit",
            Self::Ui => "ui",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "unit" => Some(Self::Unit),
            "ui" => Some(Self::Ui),
            _ => None,
        }
    }
}

impl std::fmt::Display for TestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Overall outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Passed,
    Failed,
    /// The runner itself failed before producing results
    Error,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Error => "error",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "passed" => Some(Self::Passed),
            "failed" => Some(Self::Failed),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One completed test execution record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestRun {
    pub id: i64,
    /// Project the tests were run against
    pub project_path: String,
    pub test_name: String,
    pub test_type: TestType,
    pub status: RunStatus,
    pub total: i64,
    pub passed: i64,
    pub failed: i64,
    pub skipped: i64,
    /// Human readable duration as reported by the runner (e.g. "1.52s")
    pub duration: String,
    /// AI analysis report, once one has been generated
    #[serde(default)]
    pub ai_analysis: Option<String>,
    pub created_at: String,
}

impl TestRun {
    /// Share of executed cases that passed, in percent.
    ///
    /// Returns `None` when no case was executed.
    pub fn pass_rate(&self) -> Option<f64> {
        let executed = self.total - self.skipped;
        if executed <= 0 {
            return None;
        }
        Some(self.passed as f64 * 100.0 / executed as f64)
    }
}

/// Test run with its console output, case details and screenshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestRunDetail {
    #[serde(flatten)]
    pub run: TestRun,
    #[serde(default)]
    pub output: String,
    #[serde(default)]
    pub details: Vec<TestCaseDetail>,
    #[serde(default)]
    pub screenshots: Vec<Screenshot>,
}

impl TestRunDetail {
    /// Case details that did not pass.
    pub fn failed_cases(&self) -> impl Iterator<Item = &TestCaseDetail> {
        self.details.iter().filter(|d| d.status.is_failure())
    }
}
