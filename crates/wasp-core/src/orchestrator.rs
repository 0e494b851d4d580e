// SPDX-License-Identifier: Apache-2.0

//! Parallel scan orchestration.
//!
//! Fans one scan request out to every available scanner concurrently,
//! collects per-scanner timing and failure, and merges everything into a
//! single report. A scanner failing never aborts its siblings; the run as a
//! whole only fails when no scanner is available to begin with.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::{Result, WaspError};
use crate::scanner::{ScanOutcome, Scanner};
use crate::target::ScanTarget;

const REPORT_LINE_WIDTH: usize = 79;

/// Result of one scanner within an orchestrated run.
#[derive(Debug, Clone)]
pub struct ScannerRun {
    /// Scanner identity.
    pub name: String,
    /// Raw scanner output, possibly empty.
    pub output: String,
    /// Wall time the scanner took.
    pub duration: Duration,
    /// Failure description, `None` on success.
    pub error: Option<String>,
}

/// Orchestrator for aggregate scans across every available scanner.
pub struct FullScan {
    scanners: Vec<Arc<dyn Scanner>>,
    timeout: Option<Duration>,
}

impl FullScan {
    /// Build an orchestrator from a scanner set, retaining only the scanners
    /// whose binaries are present on this host.
    ///
    /// # Errors
    ///
    /// Returns [`WaspError::NoScannersAvailable`] when the filtered set is
    /// empty; an aggregate scan with nothing to run is refused up front
    /// rather than producing an empty report.
    pub fn new(scanners: Vec<Arc<dyn Scanner>>) -> Result<Self> {
        let mut available = Vec::with_capacity(scanners.len());
        for scanner in scanners {
            if scanner.is_available() {
                debug!("scanner {} is available", scanner.name());
                available.push(scanner);
            } else {
                warn!("scanner {} not available, will be skipped", scanner.name());
            }
        }

        if available.is_empty() {
            return Err(WaspError::NoScannersAvailable);
        }

        Ok(Self {
            scanners: available,
            timeout: None,
        })
    }

    /// Apply a per-scanner timeout. Zero disables it.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }

    /// Number of scanners that will take part in a run.
    #[must_use]
    pub fn scanner_count(&self) -> usize {
        self.scanners.len()
    }

    /// Run every scanner against `target` and merge the results into one
    /// report.
    pub async fn run(&self, target: &ScanTarget) -> Result<String> {
        if self.scanners.is_empty() {
            return Err(WaspError::NoScannersAvailable);
        }

        info!(
            "Starting full scan on {} with {} scanners",
            target.url(),
            self.scanners.len()
        );

        let runs = self.run_parallel(target).await;
        Ok(merge_report(&target.url(), Utc::now(), &runs))
    }

    /// Fan out one task per scanner and collect results in completion order.
    ///
    /// The channel is sized to the scanner count and each task owns a sender
    /// clone, so the receive loop drains until every task has reported -
    /// results are waited for, never dropped.
    async fn run_parallel(&self, target: &ScanTarget) -> Vec<ScannerRun> {
        let (tx, mut rx) = mpsc::channel(self.scanners.len());

        for scanner in &self.scanners {
            let scanner = Arc::clone(scanner);
            let target = target.clone();
            let timeout = self.timeout;
            let tx = tx.clone();

            tokio::spawn(async move {
                let start = Instant::now();
                let outcome = scan_bounded(scanner.as_ref(), &target, timeout).await;

                let run = ScannerRun {
                    name: scanner.name().to_string(),
                    output: outcome.output,
                    duration: start.elapsed(),
                    error: outcome.error,
                };
                // Receiver only closes after draining every task.
                let _ = tx.send(run).await;
            });
        }
        drop(tx);

        let mut runs = Vec::with_capacity(self.scanners.len());
        while let Some(run) = rx.recv().await {
            match &run.error {
                Some(error) => warn!(%error, "{} scan failed", run.name),
                None => info!(duration = ?run.duration, "{} scan completed", run.name),
            }
            runs.push(run);
        }

        runs
    }
}

/// Run one scan, converting timeout expiry into the scanner's own failure so
/// a slow scanner still contributes a result record.
async fn scan_bounded(
    scanner: &dyn Scanner,
    target: &ScanTarget,
    timeout: Option<Duration>,
) -> ScanOutcome {
    match timeout {
        Some(limit) => match tokio::time::timeout(limit, scanner.scan(target)).await {
            Ok(outcome) => outcome,
            Err(_) => ScanOutcome::failed(
                String::new(),
                format!("scan cancelled after {}s timeout", limit.as_secs()),
            ),
        },
        None => scanner.scan(target).await,
    }
}

/// Merge scanner runs into a unified report.
///
/// Section order follows the order of `runs` (completion order for an
/// orchestrated scan). The generation timestamp is a parameter so the same
/// input always yields the same report text.
#[must_use]
pub fn merge_report(target_url: &str, generated_at: DateTime<Utc>, runs: &[ScannerRun]) -> String {
    let separator = "=".repeat(REPORT_LINE_WIDTH);
    let dash_line = "-".repeat(REPORT_LINE_WIDTH);

    let mut report = String::new();
    report.push_str(&format!("{separator}\n"));
    report.push_str("                    FULL SECURITY SCAN REPORT\n");
    report.push_str(&format!("{separator}\n"));
    report.push_str(&format!("Target: {target_url}\n"));
    report.push_str(&format!(
        "Date: {}\n",
        generated_at.format("%a, %d %b %Y %H:%M:%S UTC")
    ));
    report.push_str(&format!("{separator}\n\n"));

    report.push_str("SCAN SUMMARY\n");
    report.push_str(&format!("{dash_line}\n"));

    let mut total_duration = Duration::ZERO;
    let mut success_count = 0;
    let mut fail_count = 0;

    for run in runs {
        total_duration += run.duration;
        let status = if run.error.is_some() {
            fail_count += 1;
            "FAILED"
        } else {
            success_count += 1;
            "SUCCESS"
        };
        report.push_str(&format!(
            "  {:<10}: {} ({:.2}s)\n",
            run.name,
            status,
            run.duration.as_secs_f64()
        ));
    }

    report.push_str(&format!(
        "\nTotal scanners: {} | Successful: {success_count} | Failed: {fail_count}\n",
        runs.len()
    ));
    report.push_str(&format!(
        "Total scan time: {:.2}s\n\n",
        total_duration.as_secs_f64()
    ));

    for run in runs {
        report.push_str(&format!("{separator}\n"));
        report.push_str(&format!(
            "                    {} RESULTS\n",
            run.name.to_uppercase()
        ));
        report.push_str(&format!("{separator}\n\n"));

        if let Some(error) = &run.error {
            report.push_str(&format!("ERROR: {error}\n\n"));
            if !run.output.is_empty() {
                report.push_str("Output:\n");
                report.push_str(&run.output);
                report.push('\n');
            }
        } else {
            report.push_str(run.output.trim());
            report.push('\n');
        }
        report.push('\n');
    }

    report.push_str(&format!("{separator}\n"));
    report.push_str("                    END OF REPORT\n");
    report.push_str(&format!("{separator}\n"));

    report
}
