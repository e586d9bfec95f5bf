//! Typed client for the host's test history functions.
//!
//! The client is handed a bridge once, negotiates which functions the host
//! exposes, and then forwards each front-door call to exactly one remote
//! function. Nothing is cached or retried; remote rejections are returned
//! as-is.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::bridge::{HostBridge, RemoteMethod};
use crate::config::Config;
use crate::error::{BridgeError, BridgeResult};
use crate::models::{CleanupReport, TestRun, TestRunDetail, TestStatistics, UpdateAck};

/// Client for the five test history functions.
#[derive(Clone)]
pub struct TestHistoryClient {
    bridge: Arc<dyn HostBridge>,
    capabilities: Arc<HashSet<RemoteMethod>>,
    call_timeout: Option<Duration>,
    history_limit: u32,
}

impl TestHistoryClient {
    /// Connect to the host bridge.
    ///
    /// Fails with [`BridgeError::BridgeNotReady`] when no bridge is given,
    /// before anything is asked of the host. Otherwise the host's function
    /// table is read once; methods it does not expose fail later with
    /// [`BridgeError::MethodNotFound`].
    pub async fn connect(
        bridge: Option<Arc<dyn HostBridge>>,
        config: &Config,
    ) -> BridgeResult<Self> {
        let bridge = bridge.ok_or(BridgeError::BridgeNotReady)?;

        let advertised = bridge.methods().await;
        let capabilities: HashSet<RemoteMethod> = advertised
            .iter()
            .filter_map(|name| RemoteMethod::parse(name))
            .collect();

        let missing: Vec<&str> = RemoteMethod::ALL
            .iter()
            .filter(|m| !capabilities.contains(*m))
            .map(|m| m.as_str())
            .collect();
        if !missing.is_empty() {
            warn!("Host bridge does not expose: {}", missing.join(", "));
        }

        debug!(
            "Connected to host bridge ({} of {} history functions available)",
            capabilities.len(),
            RemoteMethod::ALL.len()
        );

        Ok(TestHistoryClient {
            bridge,
            capabilities: Arc::new(capabilities),
            call_timeout: config.call_timeout,
            history_limit: config.history_limit,
        })
    }

    /// Whether the host exposes `method`.
    pub fn supports(&self, method: RemoteMethod) -> bool {
        self.capabilities.contains(&method)
    }

    /// Methods the host exposes, in declaration order.
    pub fn capabilities(&self) -> Vec<RemoteMethod> {
        RemoteMethod::ALL
            .into_iter()
            .filter(|m| self.supports(*m))
            .collect()
    }

    /// Call a remote function and decode its resolved value as `T`.
    pub async fn call<T>(&self, method: RemoteMethod, args: Vec<Value>) -> BridgeResult<T>
    where
        T: DeserializeOwned,
    {
        if !self.supports(method) {
            return Err(BridgeError::MethodNotFound(method.as_str().to_string()));
        }

        debug!("Calling {} with {} args", method, args.len());

        let pending = self.bridge.invoke(method.as_str(), args);
        let value = match self.call_timeout {
            Some(after) => match tokio::time::timeout(after, pending).await {
                Ok(result) => result?,
                Err(_) => {
                    warn!("Remote call {} timed out after {:?}", method, after);
                    return Err(BridgeError::Timeout {
                        method: method.as_str().to_string(),
                        after,
                    });
                }
            },
            None => pending.await?,
        };

        serde_json::from_value(value).map_err(|source| BridgeError::Decode {
            method: method.as_str().to_string(),
            source,
        })
    }

    /// Fetch the most recent runs for a project, newest first.
    ///
    /// `limit` defaults to the configured history limit (50).
    pub async fn get_test_history(
        &self,
        project_path: &str,
        limit: Option<u32>,
    ) -> BridgeResult<Vec<TestRun>> {
        let limit = limit.unwrap_or(self.history_limit);
        let method = RemoteMethod::GetTestHistory;
        self.call(method, vec![arg(method, project_path)?, arg(method, limit)?])
            .await
    }

    /// Fetch one run with its case details and screenshots.
    pub async fn get_test_detail(&self, run_id: i64) -> BridgeResult<TestRunDetail> {
        let method = RemoteMethod::GetTestDetail;
        self.call(method, vec![arg(method, run_id)?]).await
    }

    /// Store an AI analysis report on a run.
    pub async fn update_test_ai_analysis(
        &self,
        run_id: i64,
        analysis: &str,
    ) -> BridgeResult<UpdateAck> {
        let method = RemoteMethod::UpdateTestAiAnalysis;
        self.call(method, vec![arg(method, run_id)?, arg(method, analysis)?])
            .await
    }

    /// Fetch run counters for a project.
    pub async fn get_test_statistics(&self, project_path: &str) -> BridgeResult<TestStatistics> {
        let method = RemoteMethod::GetTestStatistics;
        self.call(method, vec![arg(method, project_path)?]).await
    }

    /// Delete runs older than `days` days.
    pub async fn cleanup_old_tests(&self, days: u32) -> BridgeResult<CleanupReport> {
        let method = RemoteMethod::CleanupOldTests;
        self.call(method, vec![arg(method, days)?]).await
    }
}

impl std::fmt::Debug for TestHistoryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestHistoryClient")
            .field("capabilities", &self.capabilities())
            .field("call_timeout", &self.call_timeout)
            .field("history_limit", &self.history_limit)
            .finish()
    }
}

fn arg<T: Serialize>(method: RemoteMethod, value: T) -> BridgeResult<Value> {
    serde_json::to_value(value).map_err(|source| BridgeError::Encode {
        method: method.as_str().to_string(),
        source,
    })
}
