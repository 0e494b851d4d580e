// SPDX-License-Identifier: Apache-2.0

//! Execution logging interceptor.
//!
//! [`ExecutionLogger::log`] wraps an operation, times it, and hands a
//! [`ToolExecution`] record to an [`AuditSink`] after the operation returns.
//! The interceptor is transparent on the success/failure path: the caller
//! sees the operation's own result, and audit persistence never delays or
//! fails the primary operation.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::warn;

use crate::error::Result;
use crate::storage::{ExecutionStore, ToolExecution};

/// Destination for execution records.
///
/// `record` must not block the caller. The production sink persists on a
/// detached task; tests inject a synchronous collector.
pub trait AuditSink: Send + Sync {
    /// Accept one execution record for eventual persistence.
    fn record(&self, exec: ToolExecution);
}

/// Production sink: persists each record on a detached tokio task.
///
/// The task deliberately outlives the request that produced the record - a
/// cancelled or timed-out caller must not prevent the audit record from
/// being written. Persistence failure is logged and swallowed.
pub struct SpawnedAuditSink {
    store: Arc<dyn ExecutionStore>,
}

impl SpawnedAuditSink {
    /// Create a sink writing to `store`.
    #[must_use]
    pub fn new(store: Arc<dyn ExecutionStore>) -> Self {
        Self { store }
    }
}

impl AuditSink for SpawnedAuditSink {
    fn record(&self, exec: ToolExecution) {
        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            if let Err(error) = store.create(&exec).await {
                warn!(%error, tool = %exec.tool_name, "failed to persist execution record");
            }
        });
    }
}

/// Wraps operation handlers with execution logging.
#[derive(Clone)]
pub struct ExecutionLogger {
    sink: Arc<dyn AuditSink>,
    session_id: String,
}

impl ExecutionLogger {
    /// Create a logger recording against `session_id`.
    #[must_use]
    pub fn new(sink: Arc<dyn AuditSink>, session_id: impl Into<String>) -> Self {
        Self {
            sink,
            session_id: session_id.into(),
        }
    }

    /// Run `op`, then record exactly one execution for it.
    ///
    /// Input and output serialization is best-effort: a value that cannot be
    /// serialized degrades to an empty string and never aborts the call. The
    /// operation's result is propagated unchanged.
    #[allow(clippy::cast_possible_truncation)]
    pub async fn log<I, T, F, Fut>(&self, tool_name: &str, input: &I, op: F) -> Result<T>
    where
        I: Serialize + ?Sized,
        T: Serialize,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let start = Instant::now();
        let input_json = serde_json::to_string(input).unwrap_or_default();

        let result = op().await;

        let mut exec = ToolExecution::pending(&self.session_id, tool_name);
        exec.input_json = input_json;
        exec.duration_ms = start.elapsed().as_millis() as i64;
        match &result {
            Ok(value) => {
                exec.success = true;
                exec.output_json = serde_json::to_string(value).unwrap_or_default();
            }
            Err(error) => {
                exec.success = false;
                exec.error_message = error.to_string();
            }
        }

        self.sink.record(exec);
        result
    }
}
