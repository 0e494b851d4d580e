// SPDX-License-Identifier: Apache-2.0

//! Execution ledger contract and record model.
//!
//! Every handled operation leaves exactly one [`ToolExecution`] behind. The
//! ledger is append-only: records are never updated in place, and removal is
//! soft deletion so identifiers stay stable.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

mod sqlite;

pub use sqlite::SqliteStore;

/// One completed (or failed) operation invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolExecution {
    /// Ledger-assigned identifier. 0 until the record is created.
    #[serde(default)]
    pub id: i64,
    /// When the ledger created the record.
    pub created_at: DateTime<Utc>,
    /// Soft-deletion timestamp; a set value excludes the record from reads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    /// Opaque session identifier, empty if none.
    #[serde(default)]
    pub session_id: String,
    /// Name of the operation that ran.
    pub tool_name: String,
    /// Serialized request input.
    #[serde(default)]
    pub input_json: String,
    /// Serialized result, empty on failure.
    #[serde(default)]
    pub output_json: String,
    /// Failure text, empty on success.
    #[serde(default)]
    pub error_message: String,
    /// Wall time of the invocation in milliseconds.
    pub duration_ms: i64,
    /// Whether the invocation succeeded. Always equals
    /// `error_message.is_empty()`.
    pub success: bool,
}

/// Append-only, soft-deletable store of execution records.
///
/// Any backend satisfying this contract can sit behind the logging
/// interceptor and the history operation without either noticing.
#[async_trait]
pub trait ExecutionStore: Send + Sync {
    /// Persist a record, assigning its identifier and creation timestamp.
    /// Returns the assigned identifier.
    async fn create(&self, exec: &ToolExecution) -> Result<i64>;

    /// Fetch one live record by identifier.
    async fn get(&self, id: i64) -> Result<ToolExecution>;

    /// List live records ordered by creation time descending (ties broken by
    /// identifier descending), plus the total live-record count regardless
    /// of `limit`/`offset`. A `limit` of 0 means no limit.
    async fn list(&self, limit: usize, offset: usize) -> Result<(Vec<ToolExecution>, u64)>;

    /// List live records for one session, newest first.
    async fn list_by_session(&self, session_id: &str) -> Result<Vec<ToolExecution>>;

    /// List live records for one tool, newest first. A `limit` of 0 means no
    /// limit.
    async fn list_by_tool(&self, tool_name: &str, limit: usize) -> Result<Vec<ToolExecution>>;

    /// Mark one record deleted, excluding it from all subsequent reads. The
    /// identifier is never reused.
    async fn soft_delete(&self, id: i64) -> Result<()>;

    /// Mark every extant record deleted in one logical operation.
    async fn soft_delete_all(&self) -> Result<()>;
}

impl ToolExecution {
    /// A record shell for an invocation that has not been persisted yet.
    #[must_use]
    pub fn pending(session_id: &str, tool_name: &str) -> Self {
        Self {
            id: 0,
            created_at: Utc::now(),
            deleted_at: None,
            session_id: session_id.to_string(),
            tool_name: tool_name.to_string(),
            input_json: String::new(),
            output_json: String::new(),
            error_message: String::new(),
            duration_ms: 0,
            success: false,
        }
    }
}
