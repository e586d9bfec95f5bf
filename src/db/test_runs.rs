//! Queries over stored test runs.

use std::collections::HashSet;

use chrono::{DateTime, TimeDelta, Utc};

use crate::models::{
    CaseStatus, RunStatus, TestCaseDetail, TestRun, TestRunDetail, TestStatistics, TestType,
};

use super::{HistoryStore, NewScreenshot, StoredRun, StoredScreenshot, format_timestamp};

/// Run to record, as produced by a test runner.
#[derive(Debug, Clone)]
pub struct NewTestRun {
    pub project_path: String,
    pub test_name: String,
    pub test_type: TestType,
    pub status: RunStatus,
    pub total: i64,
    pub passed: i64,
    pub failed: i64,
    pub skipped: i64,
    pub duration: String,
    pub output: String,
    /// Analysis produced alongside the run, if any
    pub ai_analysis: Option<String>,
    pub cases: Vec<NewTestCase>,
    pub screenshots: Vec<NewScreenshot>,
}

/// Case result to attach to a new run.
#[derive(Debug, Clone)]
pub struct NewTestCase {
    pub case_name: String,
    pub status: CaseStatus,
    pub message: Option<String>,
}

impl HistoryStore {
    /// Record a run created now. Returns the new run ID.
    pub async fn record_run(&self, run: NewTestRun) -> i64 {
        self.insert_run(run, Utc::now()).await
    }

    /// Record a run with an explicit creation time. Returns the new run ID.
    pub async fn insert_run(&self, new_run: NewTestRun, created: DateTime<Utc>) -> i64 {
        let mut state = self.state.write().await;

        state.last_run_id += 1;
        let run_id = state.last_run_id;

        let mut details = Vec::with_capacity(new_run.cases.len());
        for case in new_run.cases {
            state.last_case_id += 1;
            details.push(TestCaseDetail {
                id: state.last_case_id,
                run_id,
                case_name: case.case_name,
                status: case.status,
                message: case.message,
            });
        }

        let mut screenshots = Vec::with_capacity(new_run.screenshots.len());
        for shot in new_run.screenshots {
            state.last_screenshot_id += 1;
            screenshots.push(StoredScreenshot {
                id: state.last_screenshot_id,
                run_id,
                step_number: shot.step_number,
                step_name: shot.step_name,
                image: shot.image,
                created_at: created,
            });
        }
        screenshots.sort_by_key(|s| (s.step_number, s.id));

        let run = TestRun {
            id: run_id,
            project_path: new_run.project_path,
            test_name: new_run.test_name,
            test_type: new_run.test_type,
            status: new_run.status,
            total: new_run.total,
            passed: new_run.passed,
            failed: new_run.failed,
            skipped: new_run.skipped,
            duration: new_run.duration,
            ai_analysis: new_run.ai_analysis,
            created_at: format_timestamp(created),
        };

        state.runs.insert(
            run_id,
            StoredRun {
                run,
                created,
                output: new_run.output,
                details,
                screenshots,
            },
        );

        run_id
    }

    /// Most recent runs for a project, newest first.
    pub async fn list_runs(&self, project_path: &str, limit: usize) -> Vec<TestRun> {
        let state = self.state.read().await;

        let mut runs: Vec<&StoredRun> = state
            .runs
            .values()
            .filter(|r| r.run.project_path == project_path)
            .collect();
        runs.sort_by(|a, b| b.created.cmp(&a.created).then(b.run.id.cmp(&a.run.id)));

        runs.into_iter().take(limit).map(|r| r.run.clone()).collect()
    }

    /// Run with case details and screenshots.
    pub async fn get_run_detail(&self, run_id: i64) -> Option<TestRunDetail> {
        let state = self.state.read().await;
        let stored = state.runs.get(&run_id)?;

        Some(TestRunDetail {
            run: stored.run.clone(),
            output: stored.output.clone(),
            details: stored.details.clone(),
            screenshots: stored.screenshots.iter().map(|s| s.to_model()).collect(),
        })
    }

    /// Replace the AI analysis of a run. Returns false when the run does not exist.
    pub async fn update_ai_analysis(&self, run_id: i64, analysis: &str) -> bool {
        let mut state = self.state.write().await;
        match state.runs.get_mut(&run_id) {
            Some(stored) => {
                stored.run.ai_analysis = Some(analysis.to_string());
                true
            }
            None => false,
        }
    }

    /// Run counters for a project. Runs that errored count as failed.
    pub async fn statistics(&self, project_path: &str) -> TestStatistics {
        let state = self.state.read().await;

        let mut stats = TestStatistics::default();
        let mut names = HashSet::new();
        for stored in state.runs.values() {
            let run = &stored.run;
            if run.project_path != project_path {
                continue;
            }
            stats.total_runs += 1;
            match run.status {
                RunStatus::Passed => stats.passed_runs += 1,
                RunStatus::Failed | RunStatus::Error => stats.failed_runs += 1,
            }
            names.insert(run.test_name.as_str());
        }
        stats.unique_tests = names.len() as i64;

        stats
    }

    /// Delete runs created before `cutoff`. Returns how many were removed.
    pub async fn delete_created_before(&self, cutoff: DateTime<Utc>) -> u64 {
        let mut state = self.state.write().await;
        let before = state.runs.len();
        state.runs.retain(|_, r| r.created >= cutoff);
        (before - state.runs.len()) as u64
    }

    /// Delete runs older than `days` days.
    ///
    /// A period reaching past the earliest representable date deletes nothing.
    pub async fn delete_older_than(&self, days: u32) -> u64 {
        let cutoff = TimeDelta::try_days(i64::from(days))
            .and_then(|age| Utc::now().checked_sub_signed(age))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        self.delete_created_before(cutoff).await
    }
}
