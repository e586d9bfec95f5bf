//! Host bridge contract.
//!
//! The host exposes a table of asynchronous functions keyed by name. This
//! module defines the seam the client talks through: the fixed set of
//! methods it knows about, the trait a bridge implements, and the opaque
//! error a host uses to reject a call.

pub mod function_table;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use function_table::FunctionTable;

/// Remote functions called by the history client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteMethod {
    GetTestHistory,
    GetTestDetail,
    UpdateTestAiAnalysis,
    GetTestStatistics,
    CleanupOldTests,
}

impl RemoteMethod {
    /// Every method, in declaration order.
    pub const ALL: [RemoteMethod; 5] = [
        Self::GetTestHistory,
        Self::GetTestDetail,
        Self::UpdateTestAiAnalysis,
        Self::GetTestStatistics,
        Self::CleanupOldTests,
    ];

    /// Name of the function in the host's table.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GetTestHistory => "get_test_history",
            Self::GetTestDetail => "get_test_detail",
            Self::UpdateTestAiAnalysis => "update_test_ai_analysis",
            Self::GetTestStatistics => "get_test_statistics",
            Self::CleanupOldTests => "cleanup_old_tests",
        }
    }

    /// Parse from the host's function name.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == s)
    }
}

impl std::fmt::Display for RemoteMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Rejection raised by a host function.
///
/// The client never inspects or rewrites it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct RemoteError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RemoteError {
    pub fn new(message: impl Into<String>) -> Self {
        RemoteError {
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Convenience type alias for Results produced by host functions.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// A host-provided table of asynchronous functions.
#[async_trait]
pub trait HostBridge: Send + Sync {
    /// Names of the functions the host currently exposes.
    async fn methods(&self) -> Vec<String>;

    /// Invoke one function with positional arguments.
    async fn invoke(&self, method: &str, args: Vec<Value>) -> RemoteResult<Value>;
}
