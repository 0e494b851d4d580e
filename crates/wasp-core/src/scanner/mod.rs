// SPDX-License-Identifier: Apache-2.0

//! Scanner capability contract and adapters for external scanning tools.
//!
//! Each adapter wraps one external binary behind the [`Scanner`] trait so the
//! orchestrator can treat heterogeneous tools uniformly: a stable identity,
//! a side-effect-free availability probe, and a scan operation that reports
//! failure through [`ScanOutcome`] instead of panicking.

use async_trait::async_trait;

use crate::target::ScanTarget;

mod nikto;
mod nuclei;
mod wapiti;

pub use nikto::NiktoScanner;
pub use nuclei::NucleiScanner;
pub use wapiti::WapitiScanner;

/// Result of one scanner invocation.
///
/// `output` and `error` may both be populated: a failed scan still carries
/// whatever partial text the tool produced. Callers must not assume a set
/// `error` implies an empty `output`.
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    /// Raw tool output, possibly empty.
    pub output: String,
    /// Failure description, `None` on success.
    pub error: Option<String>,
}

impl ScanOutcome {
    /// A successful outcome carrying the tool's output.
    #[must_use]
    pub fn ok(output: String) -> Self {
        Self {
            output,
            error: None,
        }
    }

    /// A failed outcome carrying the failure text and any partial output.
    #[must_use]
    pub fn failed(output: String, error: impl Into<String>) -> Self {
        Self {
            output,
            error: Some(error.into()),
        }
    }
}

/// Contract every external scanning tool adapter implements.
#[async_trait]
pub trait Scanner: Send + Sync {
    /// Stable, human-readable name used for logging, report sectioning, and
    /// the execution ledger's tool name.
    fn name(&self) -> &str;

    /// Whether the backing binary is resolvable on the PATH.
    ///
    /// Side-effect free; safe to call repeatedly and concurrently.
    fn is_available(&self) -> bool;

    /// Run the external tool against `target`.
    ///
    /// Never panics: launch failures, non-zero exits, and report read errors
    /// all land in [`ScanOutcome::error`] with partial text in
    /// [`ScanOutcome::output`]. Cancellation is dropping the returned future;
    /// child processes are spawned with `kill_on_drop` so an abandoned scan
    /// does not leak its process.
    async fn scan(&self, target: &ScanTarget) -> ScanOutcome;
}

/// Availability probe shared by the adapters.
pub(crate) fn binary_on_path(binary: &str) -> bool {
    which::which(binary).is_ok()
}

/// Run `binary` with `args`, capturing stdout and stderr as one text blob.
///
/// Returns the combined output and, for launch failures or non-zero exits,
/// a failure description.
pub(crate) async fn run_combined(binary: &str, args: &[String]) -> ScanOutcome {
    let output = match tokio::process::Command::new(binary)
        .args(args)
        .kill_on_drop(true)
        .output()
        .await
    {
        Ok(output) => output,
        Err(e) => {
            return ScanOutcome::failed(
                String::new(),
                format!("failed to execute {binary}: {e}"),
            );
        }
    };

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));

    if output.status.success() {
        ScanOutcome::ok(combined)
    } else {
        ScanOutcome::failed(
            combined,
            format!("failed to execute {binary}: {}", output.status),
        )
    }
}
