//! Host-side implementation of the test history functions.
//!
//! Registers `get_test_history`, `get_test_detail`, `update_test_ai_analysis`,
//! `get_test_statistics` and `cleanup_old_tests` on a [`FunctionTable`],
//! backed by a [`HistoryStore`].

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::bridge::{FunctionTable, RemoteError, RemoteMethod, RemoteResult};
use crate::config::Config;
use crate::db::HistoryStore;
use crate::models::{CleanupReport, DEFAULT_HISTORY_LIMIT, UpdateAck};

/// Serves the history functions out of a store.
#[derive(Debug, Clone, Default)]
pub struct HistoryHost {
    store: HistoryStore,
}

impl HistoryHost {
    pub fn new(store: HistoryStore) -> Self {
        HistoryHost { store }
    }

    pub fn store(&self) -> &HistoryStore {
        &self.store
    }

    /// Register every history function on `table`.
    pub fn register(&self, table: &mut FunctionTable) {
        for method in RemoteMethod::ALL {
            let host = self.clone();
            table.register(method.as_str(), move |args| {
                let host = host.clone();
                async move { host.dispatch(method, args).await }
            });
        }
    }

    /// Build a table exposing only the history functions.
    pub fn into_table(self) -> FunctionTable {
        let mut table = FunctionTable::new();
        self.register(&mut table);
        table
    }

    /// Delete runs past the configured retention period.
    pub async fn cleanup_expired(&self, config: &Config) -> u64 {
        let deleted = self.store.delete_older_than(config.retention_days).await;
        info!(
            "Retention cleanup removed {} test runs (retention: {} days)",
            deleted, config.retention_days
        );
        deleted
    }

    async fn dispatch(&self, method: RemoteMethod, args: Vec<Value>) -> RemoteResult<Value> {
        match method {
            RemoteMethod::GetTestHistory => {
                let project_path = str_arg(method, &args, 0, "project_path")?;
                let limit = match args.get(1) {
                    None | Some(Value::Null) => u64::from(DEFAULT_HISTORY_LIMIT),
                    Some(_) => u64_arg(method, &args, 1, "limit")?,
                };
                let limit = usize::try_from(limit).unwrap_or(usize::MAX);
                to_value(self.store.list_runs(project_path, limit).await)
            }
            RemoteMethod::GetTestDetail => {
                let run_id = i64_arg(method, &args, 0, "run_id")?;
                match self.store.get_run_detail(run_id).await {
                    Some(detail) => to_value(detail),
                    None => Err(RemoteError::new(format!("Test run {} not found", run_id))
                        .with_data(serde_json::json!({ "run_id": run_id }))),
                }
            }
            RemoteMethod::UpdateTestAiAnalysis => {
                let run_id = i64_arg(method, &args, 0, "run_id")?;
                let analysis = str_arg(method, &args, 1, "analysis")?;
                let success = self.store.update_ai_analysis(run_id, analysis).await;
                if !success {
                    warn!("AI analysis update for unknown run {}", run_id);
                }
                to_value(UpdateAck { success })
            }
            RemoteMethod::GetTestStatistics => {
                let project_path = str_arg(method, &args, 0, "project_path")?;
                to_value(self.store.statistics(project_path).await)
            }
            RemoteMethod::CleanupOldTests => {
                let days = u64_arg(method, &args, 0, "days")?;
                let days = u32::try_from(days).map_err(|_| {
                    invalid_argument(method, "days", "must fit in 32 bits")
                })?;
                let deleted = self.store.delete_older_than(days).await;
                info!("Cleanup removed {} test runs older than {} days", deleted, days);
                to_value(CleanupReport {
                    deleted,
                    success: true,
                })
            }
        }
    }
}

fn to_value<T: Serialize>(value: T) -> RemoteResult<Value> {
    serde_json::to_value(value)
        .map_err(|e| RemoteError::new(format!("Failed to serialize result: {}", e)))
}

fn invalid_argument(method: RemoteMethod, name: &str, reason: &str) -> RemoteError {
    RemoteError::new(format!("{}: argument '{}' {}", method, name, reason))
}

fn arg<'a>(
    method: RemoteMethod,
    args: &'a [Value],
    index: usize,
    name: &str,
) -> RemoteResult<&'a Value> {
    args.get(index)
        .ok_or_else(|| invalid_argument(method, name, "is missing"))
}

fn str_arg<'a>(
    method: RemoteMethod,
    args: &'a [Value],
    index: usize,
    name: &str,
) -> RemoteResult<&'a str> {
    arg(method, args, index, name)?
        .as_str()
        .ok_or_else(|| invalid_argument(method, name, "must be a string"))
}

fn i64_arg(method: RemoteMethod, args: &[Value], index: usize, name: &str) -> RemoteResult<i64> {
    arg(method, args, index, name)?
        .as_i64()
        .ok_or_else(|| invalid_argument(method, name, "must be an integer"))
}

fn u64_arg(method: RemoteMethod, args: &[Value], index: usize, name: &str) -> RemoteResult<u64> {
    arg(method, args, index, name)?
        .as_u64()
        .ok_or_else(|| invalid_argument(method, name, "must be a non-negative integer"))
}
