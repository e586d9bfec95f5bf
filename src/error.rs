//! Error types for the host bridge client.
//!
//! Uses thiserror for ergonomic error handling with automatic Display implementations.

use std::time::Duration;

use crate::bridge::RemoteError;

/// Errors surfaced by remote calls through the host bridge.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// No host bridge was supplied when the client was connected
    #[error("Host bridge is not ready")]
    BridgeNotReady,

    /// The host does not expose the requested function
    #[error("Remote method not found: {0}")]
    MethodNotFound(String),

    /// The remote function rejected the call
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// The remote call did not settle within the configured timeout
    #[error("Remote call {method} timed out after {after:?}")]
    Timeout { method: String, after: Duration },

    /// An argument could not be converted to JSON
    #[error("Failed to encode arguments for {method}: {source}")]
    Encode {
        method: String,
        #[source]
        source: serde_json::Error,
    },

    /// The resolved value did not match the expected shape
    #[error("Failed to decode result of {method}: {source}")]
    Decode {
        method: String,
        #[source]
        source: serde_json::Error,
    },
}

impl BridgeError {
    /// Name of the remote method involved, when the error concerns one.
    pub fn method(&self) -> Option<&str> {
        match self {
            Self::MethodNotFound(method)
            | Self::Timeout { method, .. }
            | Self::Encode { method, .. }
            | Self::Decode { method, .. } => Some(method.as_str()),
            Self::BridgeNotReady | Self::Remote(_) => None,
        }
    }
}

/// Convenience type alias for Results with BridgeError.
pub type BridgeResult<T> = Result<T, BridgeError>;
