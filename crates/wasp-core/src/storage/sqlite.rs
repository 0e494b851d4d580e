// SPDX-License-Identifier: Apache-2.0

//! SQLite backend for the execution ledger.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use tokio::sync::Mutex;

use super::{ExecutionStore, ToolExecution};
use crate::error::{Result, WaspError};

const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS tool_executions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    created_at TEXT NOT NULL,
    deleted_at TEXT,
    session_id TEXT NOT NULL DEFAULT '',
    tool_name TEXT NOT NULL,
    input_json TEXT NOT NULL DEFAULT '',
    output_json TEXT NOT NULL DEFAULT '',
    error_message TEXT NOT NULL DEFAULT '',
    duration_ms INTEGER NOT NULL DEFAULT 0,
    success INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_tool_executions_session ON tool_executions(session_id);
CREATE INDEX IF NOT EXISTS idx_tool_executions_tool ON tool_executions(tool_name);
CREATE INDEX IF NOT EXISTS idx_tool_executions_deleted ON tool_executions(deleted_at);
";

/// SQLite-backed execution ledger.
///
/// The connection lives behind an async mutex so one handle can be shared by
/// concurrent orchestration runs and the detached audit tasks.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and bootstrap the schema.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory database. Used by tests and throwaway sessions.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

fn timestamp(dt: DateTime<Utc>) -> String {
    // Fixed-width fractional seconds keep lexicographic and chronological
    // order identical.
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(text: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default()
}

fn row_to_execution(row: &Row<'_>) -> rusqlite::Result<ToolExecution> {
    let created_at: String = row.get("created_at")?;
    let deleted_at: Option<String> = row.get("deleted_at")?;
    Ok(ToolExecution {
        id: row.get("id")?,
        created_at: parse_timestamp(&created_at),
        deleted_at: deleted_at.as_deref().map(parse_timestamp),
        session_id: row.get("session_id")?,
        tool_name: row.get("tool_name")?,
        input_json: row.get("input_json")?,
        output_json: row.get("output_json")?,
        error_message: row.get("error_message")?,
        duration_ms: row.get("duration_ms")?,
        success: row.get("success")?,
    })
}

#[async_trait]
impl ExecutionStore for SqliteStore {
    async fn create(&self, exec: &ToolExecution) -> Result<i64> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO tool_executions (
                created_at, session_id, tool_name, input_json,
                output_json, error_message, duration_ms, success
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                timestamp(Utc::now()),
                exec.session_id,
                exec.tool_name,
                exec.input_json,
                exec.output_json,
                exec.error_message,
                exec.duration_ms,
                exec.success,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    async fn get(&self, id: i64) -> Result<ToolExecution> {
        let conn = self.conn.lock().await;
        conn.query_row(
            "SELECT * FROM tool_executions WHERE id = ?1 AND deleted_at IS NULL",
            params![id],
            row_to_execution,
        )
        .optional()?
        .ok_or(WaspError::NotFound { id })
    }

    async fn list(&self, limit: usize, offset: usize) -> Result<(Vec<ToolExecution>, u64)> {
        let conn = self.conn.lock().await;

        let total: u64 = conn.query_row(
            "SELECT COUNT(*) FROM tool_executions WHERE deleted_at IS NULL",
            [],
            |row| row.get(0),
        )?;

        let limit = if limit == 0 { -1 } else { limit as i64 };
        let mut stmt = conn.prepare(
            "SELECT * FROM tool_executions WHERE deleted_at IS NULL
             ORDER BY created_at DESC, id DESC LIMIT ?1 OFFSET ?2",
        )?;
        let executions = stmt
            .query_map(params![limit, offset as i64], row_to_execution)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((executions, total))
    }

    async fn list_by_session(&self, session_id: &str) -> Result<Vec<ToolExecution>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT * FROM tool_executions
             WHERE session_id = ?1 AND deleted_at IS NULL
             ORDER BY created_at DESC, id DESC",
        )?;
        let executions = stmt
            .query_map(params![session_id], row_to_execution)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(executions)
    }

    async fn list_by_tool(&self, tool_name: &str, limit: usize) -> Result<Vec<ToolExecution>> {
        let conn = self.conn.lock().await;
        let limit = if limit == 0 { -1 } else { limit as i64 };
        let mut stmt = conn.prepare(
            "SELECT * FROM tool_executions
             WHERE tool_name = ?1 AND deleted_at IS NULL
             ORDER BY created_at DESC, id DESC LIMIT ?2",
        )?;
        let executions = stmt
            .query_map(params![tool_name, limit], row_to_execution)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(executions)
    }

    async fn soft_delete(&self, id: i64) -> Result<()> {
        let conn = self.conn.lock().await;
        let changed = conn.execute(
            "UPDATE tool_executions SET deleted_at = ?1 WHERE id = ?2 AND deleted_at IS NULL",
            params![timestamp(Utc::now()), id],
        )?;
        if changed == 0 {
            return Err(WaspError::NotFound { id });
        }
        Ok(())
    }

    async fn soft_delete_all(&self) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "UPDATE tool_executions SET deleted_at = ?1 WHERE deleted_at IS NULL",
            params![timestamp(Utc::now())],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(tool_name: &str, session_id: &str) -> ToolExecution {
        let mut exec = ToolExecution::pending(session_id, tool_name);
        exec.input_json = r#"{"host":"localhost"}"#.to_string();
        exec.success = true;
        exec
    }

    #[tokio::test]
    async fn create_assigns_sequential_ids() {
        let store = SqliteStore::open_in_memory().unwrap();
        let first = store.create(&record("nikto", "")).await.unwrap();
        let second = store.create(&record("nikto", "")).await.unwrap();
        assert!(second > first);
    }

    #[tokio::test]
    async fn create_then_get_roundtrip() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut exec = record("wapiti", "session-1");
        exec.duration_ms = 1500;
        exec.output_json = r#""report text""#.to_string();

        let id = store.create(&exec).await.unwrap();
        let fetched = store.get(id).await.unwrap();

        assert_eq!(fetched.id, id);
        assert_eq!(fetched.tool_name, "wapiti");
        assert_eq!(fetched.session_id, "session-1");
        assert_eq!(fetched.duration_ms, 1500);
        assert!(fetched.success);
        assert!(fetched.deleted_at.is_none());
    }

    #[tokio::test]
    async fn get_unknown_id_is_not_found() {
        let store = SqliteStore::open_in_memory().unwrap();
        let err = store.get(999).await.unwrap_err();
        assert!(matches!(err, WaspError::NotFound { id: 999 }));
    }

    #[tokio::test]
    async fn list_orders_newest_first() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut ids = Vec::new();
        for i in 0..5 {
            ids.push(store.create(&record(&format!("tool-{i}"), "")).await.unwrap());
        }

        let (executions, total) = store.list(0, 0).await.unwrap();
        assert_eq!(total, 5);
        let listed: Vec<i64> = executions.iter().map(|e| e.id).collect();
        let mut expected = ids.clone();
        expected.reverse();
        assert_eq!(listed, expected);
    }

    #[tokio::test]
    async fn list_total_ignores_limit_and_offset() {
        let store = SqliteStore::open_in_memory().unwrap();
        for _ in 0..4 {
            store.create(&record("nikto", "")).await.unwrap();
        }

        let (executions, total) = store.list(2, 1).await.unwrap();
        assert_eq!(executions.len(), 2);
        assert_eq!(total, 4);
    }

    #[tokio::test]
    async fn list_by_session_filters() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.create(&record("nikto", "session-a")).await.unwrap();
        store.create(&record("wapiti", "session-b")).await.unwrap();
        store.create(&record("nuclei", "session-a")).await.unwrap();

        let executions = store.list_by_session("session-a").await.unwrap();
        assert_eq!(executions.len(), 2);
        assert!(executions.iter().all(|e| e.session_id == "session-a"));
    }

    #[tokio::test]
    async fn list_by_tool_honors_limit() {
        let store = SqliteStore::open_in_memory().unwrap();
        for _ in 0..3 {
            store.create(&record("nikto", "")).await.unwrap();
        }
        store.create(&record("wapiti", "")).await.unwrap();

        let executions = store.list_by_tool("nikto", 2).await.unwrap();
        assert_eq!(executions.len(), 2);
        assert!(executions.iter().all(|e| e.tool_name == "nikto"));
    }

    #[tokio::test]
    async fn soft_delete_excludes_from_reads() {
        let store = SqliteStore::open_in_memory().unwrap();
        let id = store.create(&record("nikto", "")).await.unwrap();
        store.create(&record("wapiti", "")).await.unwrap();

        store.soft_delete(id).await.unwrap();

        assert!(matches!(
            store.get(id).await.unwrap_err(),
            WaspError::NotFound { .. }
        ));
        let (executions, total) = store.list(0, 0).await.unwrap();
        assert_eq!(total, 1);
        assert!(executions.iter().all(|e| e.id != id));
    }

    #[tokio::test]
    async fn soft_delete_twice_errors() {
        let store = SqliteStore::open_in_memory().unwrap();
        let id = store.create(&record("nikto", "")).await.unwrap();
        store.soft_delete(id).await.unwrap();
        assert!(store.soft_delete(id).await.is_err());
    }

    #[tokio::test]
    async fn soft_delete_all_empties_reads() {
        let store = SqliteStore::open_in_memory().unwrap();
        for _ in 0..3 {
            store.create(&record("nikto", "")).await.unwrap();
        }

        store.soft_delete_all().await.unwrap();

        let (executions, total) = store.list(0, 0).await.unwrap();
        assert!(executions.is_empty());
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_soft_delete_all() {
        let store = SqliteStore::open_in_memory().unwrap();
        let first = store.create(&record("nikto", "")).await.unwrap();
        store.soft_delete_all().await.unwrap();
        let next = store.create(&record("nikto", "")).await.unwrap();
        assert!(next > first);
    }

    #[tokio::test]
    async fn open_creates_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("wasp.db");
        let store = SqliteStore::open(&path).unwrap();
        store.create(&record("nikto", "")).await.unwrap();
        assert!(path.exists());
    }
}
