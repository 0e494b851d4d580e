// SPDX-License-Identifier: Apache-2.0

//! Wapiti web application vulnerability scanner adapter.
//!
//! Wapiti writes its findings to a report file rather than stdout, so the
//! adapter points it at a temporary path and reads the report back after the
//! run. If the report cannot be read, the command output stands in for it.

use async_trait::async_trait;
use tracing::{info, warn};

use super::{ScanOutcome, Scanner, binary_on_path, run_combined};
use crate::target::ScanTarget;

const BINARY_NAME: &str = "wapiti";

/// Adapter around the `wapiti` web application vulnerability scanner.
#[derive(Debug, Default, Clone, Copy)]
pub struct WapitiScanner;

impl WapitiScanner {
    /// Create a new wapiti adapter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn build_args(target: &ScanTarget, report_path: &str) -> Vec<String> {
        let mut args = vec![
            "-u".to_string(),
            target.url(),
            "-f".to_string(),
            "txt".to_string(),
            "-o".to_string(),
            report_path.to_string(),
            "--flush-session".to_string(),
        ];
        if let Some(vhost) = &target.vhost {
            args.push("-H".to_string());
            args.push(format!("Host: {vhost}"));
        }
        args
    }
}

#[async_trait]
impl Scanner for WapitiScanner {
    fn name(&self) -> &str {
        BINARY_NAME
    }

    fn is_available(&self) -> bool {
        binary_on_path(BINARY_NAME)
    }

    async fn scan(&self, target: &ScanTarget) -> ScanOutcome {
        info!("Running wapiti scan on {}", target.url());

        let report_file = match tempfile::Builder::new()
            .prefix("wapiti-report-")
            .suffix(".txt")
            .tempfile()
        {
            Ok(file) => file,
            Err(e) => {
                return ScanOutcome::failed(
                    String::new(),
                    format!("failed to create temp file: {e}"),
                );
            }
        };
        let report_path = report_file.path().to_string_lossy().into_owned();

        let outcome = run_combined(BINARY_NAME, &Self::build_args(target, &report_path)).await;
        if outcome.error.is_some() {
            return outcome;
        }

        // The report file carries the findings; command output is noise.
        match tokio::fs::read_to_string(&report_path).await {
            Ok(report) => ScanOutcome::ok(report),
            Err(e) => {
                warn!(error = %e, "Failed to read report file, using command output");
                outcome
            }
        }
    }
}
