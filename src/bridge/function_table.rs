//! In-process host function table.
//!
//! Maps function names to async handlers and serves them through the
//! [`HostBridge`] trait, the same way a desktop host exposes its `api`
//! namespace to the UI.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::BoxFuture;
use serde_json::Value;
use tracing::debug;

use super::{HostBridge, RemoteError, RemoteResult};

type Handler = Arc<dyn Fn(Vec<Value>) -> BoxFuture<'static, RemoteResult<Value>> + Send + Sync>;

/// Name to handler table implementing [`HostBridge`].
#[derive(Clone, Default)]
pub struct FunctionTable {
    handlers: HashMap<String, Handler>,
}

impl FunctionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under `name`, replacing any previous one.
    pub fn register<F, Fut>(&mut self, name: impl Into<String>, handler: F)
    where
        F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = RemoteResult<Value>> + Send + 'static,
    {
        let handler: Handler = Arc::new(move |args| {
            Box::pin(handler(args)) as BoxFuture<'static, RemoteResult<Value>>
        });
        self.handlers.insert(name.into(), handler);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for FunctionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionTable")
            .field("functions", &self.names())
            .finish()
    }
}

#[async_trait]
impl HostBridge for FunctionTable {
    async fn methods(&self) -> Vec<String> {
        self.names()
    }

    async fn invoke(&self, method: &str, args: Vec<Value>) -> RemoteResult<Value> {
        let handler = self
            .handlers
            .get(method)
            .cloned()
            .ok_or_else(|| RemoteError::new(format!("No such function: {}", method)))?;

        debug!("Host function {} invoked with {} args", method, args.len());
        handler(args).await
    }
}
