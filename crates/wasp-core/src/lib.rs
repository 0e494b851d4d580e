// SPDX-License-Identifier: Apache-2.0

#![warn(missing_docs)]

//! # Wasp Core
//!
//! Core library for Wasp - parallel web application security scanning.
//!
//! This crate provides reusable components for:
//! - Scanner adapters around external tools (nikto, wapiti, nuclei)
//! - Concurrent fan-out/fan-in scan orchestration with merged reporting
//! - Bounded pagination over large scanner output
//! - Execution auditing with a detached persistence sink
//! - A durable, queryable execution ledger (SQLite)
//! - Configuration management
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use wasp_core::{FullScan, NiktoScanner, ScanTarget, Scanner, WapitiScanner};
//!
//! # async fn example() -> wasp_core::Result<()> {
//! let scanners: Vec<Arc<dyn Scanner>> = vec![
//!     Arc::new(NiktoScanner::new()),
//!     Arc::new(WapitiScanner::new()),
//! ];
//!
//! let orchestrator = FullScan::new(scanners)?;
//! let report = orchestrator.run(&ScanTarget::new("localhost", 8080, None)).await?;
//! println!("{report}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`scanner`] - Scanner capability trait and adapters
//! - [`orchestrator`] - Parallel scan orchestration and report merging
//! - [`pagination`] - Bounded line windows over text blobs
//! - [`audit`] - Execution logging interceptor and audit sink
//! - [`storage`] - Execution ledger contract and SQLite backend
//! - [`config`] - Configuration loading and paths
//! - [`error`] - Error types

// ============================================================================
// Error Handling
// ============================================================================

pub use error::{Result, WaspError};

// ============================================================================
// Configuration
// ============================================================================

pub use config::{
    AppConfig, ScanConfig, StorageConfig, config_dir, config_file_path, data_dir, load_config,
};

// ============================================================================
// Scan Targets
// ============================================================================

pub use target::{DEFAULT_HOST, DEFAULT_PORT, ScanTarget, validate_host};

// ============================================================================
// Scanners
// ============================================================================

pub use scanner::{NiktoScanner, NucleiScanner, ScanOutcome, Scanner, WapitiScanner};

// ============================================================================
// Orchestration
// ============================================================================

pub use orchestrator::{FullScan, ScannerRun, merge_report};

// ============================================================================
// Pagination
// ============================================================================

pub use pagination::{
    DEFAULT_MAX_LINES, MAX_ALLOWED_LINES, PageWindow, paginate, validate_max_lines,
};

// ============================================================================
// Execution Auditing
// ============================================================================

pub use audit::{AuditSink, ExecutionLogger, SpawnedAuditSink};

// ============================================================================
// Execution Ledger
// ============================================================================

pub use storage::{ExecutionStore, SqliteStore, ToolExecution};

// ============================================================================
// Modules
// ============================================================================

pub mod audit;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod pagination;
pub mod scanner;
pub mod storage;
pub mod target;
