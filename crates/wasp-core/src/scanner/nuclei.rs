// SPDX-License-Identifier: Apache-2.0

//! Nuclei template-based scanner adapter.

use async_trait::async_trait;
use tracing::info;

use super::{ScanOutcome, Scanner, binary_on_path, run_combined};
use crate::target::ScanTarget;

const BINARY_NAME: &str = "nuclei";

/// Adapter around the `nuclei` template-based vulnerability scanner.
#[derive(Debug, Default, Clone, Copy)]
pub struct NucleiScanner;

impl NucleiScanner {
    /// Create a new nuclei adapter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn build_args(target: &ScanTarget) -> Vec<String> {
        let mut args = vec![
            "-u".to_string(),
            target.url(),
            "-nc".to_string(),
            "-silent".to_string(),
        ];
        if let Some(vhost) = &target.vhost {
            args.push("-H".to_string());
            args.push(format!("Host: {vhost}"));
        }
        args
    }
}

#[async_trait]
impl Scanner for NucleiScanner {
    fn name(&self) -> &str {
        BINARY_NAME
    }

    fn is_available(&self) -> bool {
        binary_on_path(BINARY_NAME)
    }

    async fn scan(&self, target: &ScanTarget) -> ScanOutcome {
        info!("Running nuclei scan on {}", target.url());
        run_combined(BINARY_NAME, &Self::build_args(target)).await
    }
}
