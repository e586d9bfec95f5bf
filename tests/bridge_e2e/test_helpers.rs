//! Shared test helpers for bridge E2E tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use test_history_bridge::bridge::{FunctionTable, HostBridge, RemoteResult};
use test_history_bridge::config::Config;
use test_history_bridge::db::{HistoryStore, NewScreenshot, NewTestCase, NewTestRun};
use test_history_bridge::models::{CaseStatus, RunStatus, TestType};
use test_history_bridge::services::{HistoryHost, TestHistoryClient};

/// Project path used by seeded runs.
pub const TEST_PROJECT: &str = "/work/diagramscene_ultima";

/// Bridge wrapper counting every call that reaches the host.
pub struct CountingBridge {
    inner: FunctionTable,
    pub methods_calls: AtomicUsize,
    pub invoke_calls: AtomicUsize,
}

impl CountingBridge {
    pub fn new(inner: FunctionTable) -> Arc<Self> {
        Arc::new(CountingBridge {
            inner,
            methods_calls: AtomicUsize::new(0),
            invoke_calls: AtomicUsize::new(0),
        })
    }

    pub fn invocations(&self) -> usize {
        self.invoke_calls.load(Ordering::SeqCst)
    }

    pub fn lookups(&self) -> usize {
        self.methods_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl HostBridge for CountingBridge {
    async fn methods(&self) -> Vec<String> {
        self.methods_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.methods().await
    }

    async fn invoke(&self, method: &str, args: Vec<Value>) -> RemoteResult<Value> {
        self.invoke_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.invoke(method, args).await
    }
}

/// Build a run for `TEST_PROJECT`.
pub fn sample_run(name: &str, status: RunStatus) -> NewTestRun {
    let (passed, failed) = match status {
        RunStatus::Passed => (2, 0),
        _ => (1, 1),
    };
    NewTestRun {
        project_path: TEST_PROJECT.to_string(),
        test_name: name.to_string(),
        test_type: TestType::Ui,
        status,
        total: 2,
        passed,
        failed,
        skipped: 0,
        duration: "3.20s".to_string(),
        output: format!("running {name}\n2 tests collected"),
        ai_analysis: None,
        cases: vec![
            NewTestCase {
                case_name: "test_add_item".to_string(),
                status: CaseStatus::Pass,
                message: None,
            },
            NewTestCase {
                case_name: "test_connect_arrow".to_string(),
                status: if failed > 0 {
                    CaseStatus::Fail
                } else {
                    CaseStatus::Pass
                },
                message: (failed > 0).then(|| "arrow endpoints not updated".to_string()),
            },
        ],
        screenshots: vec![
            NewScreenshot {
                step_number: 1,
                step_name: "open scene".to_string(),
                image: b"\x89PNG-step1".to_vec(),
            },
            NewScreenshot {
                step_number: 2,
                step_name: "connect items".to_string(),
                image: b"\x89PNG-step2".to_vec(),
            },
        ],
    }
}

/// Host with a fresh store.
pub fn create_test_host() -> HistoryHost {
    HistoryHost::new(HistoryStore::new())
}

/// Seed a run with an explicit creation time.
pub async fn seed_run_at(
    host: &HistoryHost,
    name: &str,
    status: RunStatus,
    at: DateTime<Utc>,
) -> i64 {
    host.store().insert_run(sample_run(name, status), at).await
}

/// Connect a client to `host` through a counting bridge.
pub async fn connect_client(host: &HistoryHost) -> (TestHistoryClient, Arc<CountingBridge>) {
    let bridge = CountingBridge::new(host.clone().into_table());
    let client = TestHistoryClient::connect(Some(bridge.clone()), &Config::default())
        .await
        .expect("Failed to connect to in-process host");
    (client, bridge)
}
