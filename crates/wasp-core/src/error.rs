// SPDX-License-Identifier: Apache-2.0

//! Error types for Wasp.
//!
//! Uses `thiserror` for deriving `std::error::Error` implementations.
//! Binary entry points should use `anyhow::Result` for top-level error handling.

use thiserror::Error;

/// Errors that can occur during Wasp operations.
#[derive(Error, Debug)]
pub enum WaspError {
    /// Malformed request input (bad host, out-of-range limit, missing id).
    /// Surfaced before any scan is attempted.
    #[error("validation error: {message}")]
    Validation {
        /// What was wrong with the input.
        message: String,
    },

    /// No scanner binaries were found on the host, so an aggregate scan
    /// cannot run at all.
    #[error("no scanner binaries available")]
    NoScannersAvailable,

    /// A single-scanner operation was invoked but its backing binary is
    /// missing from the PATH.
    #[error("{name} binary not found")]
    ScannerUnavailable {
        /// Scanner identity.
        name: String,
    },

    /// An individual scanner's process launch, execution, or report read
    /// failed. Fatal for single-scanner operations; recorded per-scanner in
    /// aggregate runs.
    #[error("{scanner} scan failed: {message}")]
    Scan {
        /// Scanner identity.
        scanner: String,
        /// Failure description, including any partial output.
        message: String,
    },

    /// Execution record lookup miss (unknown or soft-deleted id).
    #[error("execution {id} not found")]
    NotFound {
        /// Requested record identifier.
        id: i64,
    },

    /// Ledger storage error from the SQLite backend.
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// Filesystem error (temp report files, database directory creation).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for WaspError {
    fn from(err: config::ConfigError) -> Self {
        WaspError::Validation {
            message: err.to_string(),
        }
    }
}

/// Convenience Result type for Wasp operations.
pub type Result<T> = std::result::Result<T, WaspError>;
