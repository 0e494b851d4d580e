// SPDX-License-Identifier: Apache-2.0

//! Nikto web server scanner adapter.

use async_trait::async_trait;
use tracing::info;

use super::{ScanOutcome, Scanner, binary_on_path, run_combined};
use crate::target::ScanTarget;

const BINARY_NAME: &str = "nikto";

/// Adapter around the `nikto` open source web server scanner.
#[derive(Debug, Default, Clone, Copy)]
pub struct NiktoScanner;

impl NiktoScanner {
    /// Create a new nikto adapter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn build_args(target: &ScanTarget) -> Vec<String> {
        let mut args = vec![
            "-host".to_string(),
            target.host.clone(),
            "-port".to_string(),
            target.port.to_string(),
        ];
        if let Some(vhost) = &target.vhost {
            args.push("-vhost".to_string());
            args.push(vhost.clone());
        }
        args
    }
}

#[async_trait]
impl Scanner for NiktoScanner {
    fn name(&self) -> &str {
        BINARY_NAME
    }

    fn is_available(&self) -> bool {
        binary_on_path(BINARY_NAME)
    }

    async fn scan(&self, target: &ScanTarget) -> ScanOutcome {
        info!("Running nikto scan on {}", target.url());
        run_combined(BINARY_NAME, &Self::build_args(target)).await
    }
}
