// SPDX-License-Identifier: Apache-2.0

//! MCP server implementation exposing scanner tools and execution history.

use std::sync::Arc;
use std::time::Duration;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    schemars::JsonSchema,
    tool, tool_handler, tool_router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::error::wasp_error_to_mcp;
use wasp_core::{
    AuditSink, ExecutionLogger, ExecutionStore, FullScan, NiktoScanner, NucleiScanner, ScanTarget,
    Scanner, SpawnedAuditSink, WapitiScanner, WaspError, paginate, validate_host,
    validate_max_lines,
};

/// Page size for history listings when the request does not set one.
const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Cap on the history listing page size.
const MAX_HISTORY_LIMIT: usize = 100;

// ---------------------------------------------------------------------------
// Tool parameter structs
// ---------------------------------------------------------------------------

/// Parameters shared by every scanner operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ScanParams {
    /// Hostname or IP address to scan.
    #[serde(default)]
    #[schemars(description = "Hostname or IP address to scan (default: localhost)")]
    pub host: String,
    /// TCP port to scan. 0 applies the default.
    #[serde(default)]
    #[schemars(description = "TCP port to scan (default: 80)")]
    pub port: u16,
    /// Virtual host header override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Virtual host header override")]
    pub vhost: Option<String>,
    /// Maximum output lines to return. 0 applies the default of 200.
    #[serde(default)]
    #[schemars(description = "Maximum output lines to return (default: 200, cap: 100000)")]
    pub max_lines: usize,
    /// Line offset the output window starts at.
    #[serde(default)]
    #[schemars(description = "Line offset to start the output window at")]
    pub offset: usize,
}

/// History operation selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum HistoryAction {
    /// Paginated listing of execution records.
    List,
    /// Fetch one record by id.
    Get,
    /// Soft-delete one record by id.
    Delete,
    /// Soft-delete every record.
    Clear,
}

/// Parameters for browsing and managing execution history.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HistoryParams {
    /// Action to perform.
    #[schemars(description = "Action to perform: list, get, delete, or clear")]
    pub action: HistoryAction,
    /// Execution record id, required for get and delete.
    #[serde(default)]
    #[schemars(description = "Execution id (required for get and delete)")]
    pub id: i64,
    /// Page size for list.
    #[serde(default)]
    #[schemars(description = "Page size for list (default: 10, max: 100)")]
    pub limit: usize,
    /// Page offset for list.
    #[serde(default)]
    #[schemars(description = "Page offset for list")]
    pub offset: usize,
}

// ---------------------------------------------------------------------------
// Server struct
// ---------------------------------------------------------------------------

/// MCP server exposing wasp-core scanning and history functionality.
#[derive(Clone)]
pub struct WaspServer {
    tool_router: ToolRouter<Self>,
    orchestrator: Option<Arc<FullScan>>,
    store: Arc<dyn ExecutionStore>,
    logger: ExecutionLogger,
}

// ---------------------------------------------------------------------------
// Tools (generates Self::tool_router())
// ---------------------------------------------------------------------------

#[tool_router]
impl WaspServer {
    /// Create a server over the default scanner set (nikto, wapiti, nuclei).
    #[must_use]
    pub fn new(store: Arc<dyn ExecutionStore>, scan_timeout: Duration) -> Self {
        let scanners: Vec<Arc<dyn Scanner>> = vec![
            Arc::new(NiktoScanner::new()),
            Arc::new(WapitiScanner::new()),
            Arc::new(NucleiScanner::new()),
        ];
        Self::with_scanners(store, scanners, scan_timeout)
    }

    /// Create a server over an explicit scanner set.
    ///
    /// The aggregate scan orchestrator is built once here, filtering the set
    /// to available scanners; `full_scan` refuses to run when none remain.
    /// Each server instance carries its own opaque session identifier.
    #[must_use]
    pub fn with_scanners(
        store: Arc<dyn ExecutionStore>,
        scanners: Vec<Arc<dyn Scanner>>,
        scan_timeout: Duration,
    ) -> Self {
        let orchestrator = match FullScan::new(scanners) {
            Ok(orchestrator) => Some(Arc::new(orchestrator.with_timeout(scan_timeout))),
            Err(error) => {
                tracing::warn!(%error, "full_scan will refuse to run");
                None
            }
        };

        let sink: Arc<dyn AuditSink> = Arc::new(SpawnedAuditSink::new(Arc::clone(&store)));
        let logger = ExecutionLogger::new(sink, Uuid::new_v4().to_string());

        Self {
            tool_router: Self::tool_router(),
            orchestrator,
            store,
            logger,
        }
    }

    #[tool(
        name = "nikto",
        description = "Nikto is an open source web server scanner.",
        annotations(read_only_hint = true, open_world_hint = true)
    )]
    async fn nikto(
        &self,
        Parameters(params): Parameters<ScanParams>,
    ) -> Result<CallToolResult, McpError> {
        self.scan_tool(&NiktoScanner::new(), "output", &params).await
    }

    #[tool(
        name = "wapiti",
        description = "Wapiti is a web application vulnerability scanner.",
        annotations(read_only_hint = true, open_world_hint = true)
    )]
    async fn wapiti(
        &self,
        Parameters(params): Parameters<ScanParams>,
    ) -> Result<CallToolResult, McpError> {
        self.scan_tool(&WapitiScanner::new(), "report", &params).await
    }

    #[tool(
        name = "nuclei",
        description = "Nuclei is a fast template-based vulnerability scanner.",
        annotations(read_only_hint = true, open_world_hint = true)
    )]
    async fn nuclei(
        &self,
        Parameters(params): Parameters<ScanParams>,
    ) -> Result<CallToolResult, McpError> {
        self.scan_tool(&NucleiScanner::new(), "output", &params).await
    }

    #[tool(
        name = "full_scan",
        description = "Performs a comprehensive security scan using all available scanners in parallel and merges results.",
        annotations(read_only_hint = true, open_world_hint = true)
    )]
    async fn full_scan(
        &self,
        Parameters(params): Parameters<ScanParams>,
    ) -> Result<CallToolResult, McpError> {
        let text = self
            .logger
            .log("full_scan", &params, || self.run_full_scan(&params))
            .await
            .map_err(|e| wasp_error_to_mcp(&e))?;

        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(
        name = "history",
        description = "Browse and manage tool execution history. Actions: list (paginated), get (by ID), delete (by ID), clear (all).",
        annotations(destructive_hint = true)
    )]
    async fn history(
        &self,
        Parameters(params): Parameters<HistoryParams>,
    ) -> Result<CallToolResult, McpError> {
        let text = self
            .logger
            .log("history", &params, || self.run_history(&params))
            .await
            .map_err(|e| wasp_error_to_mcp(&e))?;

        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

// ---------------------------------------------------------------------------
// Handler internals
// ---------------------------------------------------------------------------

impl WaspServer {
    /// Wrap one single-scanner operation with execution logging.
    async fn scan_tool(
        &self,
        scanner: &dyn Scanner,
        noun: &str,
        params: &ScanParams,
    ) -> Result<CallToolResult, McpError> {
        let text = self
            .logger
            .log(scanner.name(), params, || {
                self.run_single_scan(scanner, noun, params)
            })
            .await
            .map_err(|e| wasp_error_to_mcp(&e))?;

        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Run one scanner against the requested target.
    async fn run_single_scan(
        &self,
        scanner: &dyn Scanner,
        noun: &str,
        params: &ScanParams,
    ) -> wasp_core::Result<String> {
        validate_scan_params(params)?;
        if !scanner.is_available() {
            return Err(WaspError::ScannerUnavailable {
                name: scanner.name().to_string(),
            });
        }

        let target = ScanTarget::new(&params.host, params.port, params.vhost.clone());
        let outcome = scanner.scan(&target).await;
        if let Some(error) = outcome.error {
            return Err(WaspError::Scan {
                scanner: scanner.name().to_string(),
                message: format!("{error}\nOutput: {}", outcome.output),
            });
        }

        Ok(format_scan_output(
            scanner.name(),
            noun,
            &target,
            &outcome.output,
            params.max_lines,
            params.offset,
        ))
    }

    /// Run an aggregate scan across every available scanner.
    async fn run_full_scan(&self, params: &ScanParams) -> wasp_core::Result<String> {
        validate_scan_params(params)?;
        let orchestrator = self
            .orchestrator
            .as_ref()
            .ok_or(WaspError::NoScannersAvailable)?;

        let target = ScanTarget::new(&params.host, params.port, params.vhost.clone());
        let report = orchestrator.run(&target).await?;
        Ok(paginate(&report, params.max_lines, params.offset).render())
    }

    /// Dispatch one history action against the execution ledger.
    async fn run_history(&self, params: &HistoryParams) -> wasp_core::Result<String> {
        match params.action {
            HistoryAction::List => {
                if params.limit > MAX_HISTORY_LIMIT {
                    return Err(WaspError::Validation {
                        message: format!(
                            "limit {} exceeds maximum of {MAX_HISTORY_LIMIT}",
                            params.limit
                        ),
                    });
                }
                let limit = if params.limit == 0 {
                    DEFAULT_HISTORY_LIMIT
                } else {
                    params.limit
                };
                let (executions, total) = self.store.list(limit, params.offset).await?;
                Ok(serde_json::to_string_pretty(&json!({
                    "total": total,
                    "limit": limit,
                    "offset": params.offset,
                    "executions": executions,
                }))
                .unwrap_or_default())
            }
            HistoryAction::Get => {
                if params.id == 0 {
                    return Err(WaspError::Validation {
                        message: "id is required for get action".to_string(),
                    });
                }
                let exec = self.store.get(params.id).await?;
                Ok(serde_json::to_string_pretty(&exec).unwrap_or_default())
            }
            HistoryAction::Delete => {
                if params.id == 0 {
                    return Err(WaspError::Validation {
                        message: "id is required for delete action".to_string(),
                    });
                }
                self.store.soft_delete(params.id).await?;
                Ok(format!("Execution {} deleted successfully", params.id))
            }
            HistoryAction::Clear => {
                self.store.soft_delete_all().await?;
                Ok("All execution history cleared".to_string())
            }
        }
    }
}

/// Validate the shared scan parameters before any scan is attempted.
fn validate_scan_params(params: &ScanParams) -> wasp_core::Result<()> {
    validate_host(&params.host)?;
    validate_max_lines(params.max_lines)?;
    Ok(())
}

/// Assemble a single-scanner response: a one-line header, the pagination
/// banner when the view is partial, then the windowed output.
fn format_scan_output(
    name: &str,
    noun: &str,
    target: &ScanTarget,
    output: &str,
    max_lines: usize,
    offset: usize,
) -> String {
    let window = paginate(output, max_lines, offset);

    let mut text = format!("{name} {noun} for {}:\n", target.url());
    if let Some(banner) = window.banner() {
        text.push_str(&banner);
        text.push('\n');
    }
    text.push('\n');
    text.push_str(window.text.trim());
    text
}

// ---------------------------------------------------------------------------
// ServerHandler
// ---------------------------------------------------------------------------

#[tool_handler]
impl ServerHandler for WaspServer {
    fn get_info(&self) -> ServerInfo {
        let mut info = ServerInfo::default();
        info.protocol_version = ProtocolVersion::V_2024_11_05;
        info.capabilities = ServerCapabilities::builder().enable_tools().build();
        info.server_info = Implementation::from_build_env();
        info.instructions = Some(
            "Wasp MCP server for web application security scanning. \
             Tools: nikto, wapiti, nuclei, full_scan, history. \
             full_scan runs every available scanner in parallel against one \
             target and merges the results; history browses the execution \
             ledger. Large outputs are paginated via max_lines and offset."
                .to_string(),
        );
        info
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
