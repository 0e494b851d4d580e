// SPDX-License-Identifier: Apache-2.0

//! MCP server exposing parallel web application security scanning.
//!
//! This crate wraps wasp-core scanners, orchestration, and the execution
//! ledger as MCP tools. It uses the RMCP Rust SDK with stdio transport for
//! integration with MCP-compatible clients, plus a streamable-HTTP transport
//! for networked deployments.

mod error;
mod server;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

pub use server::{HistoryAction, HistoryParams, ScanParams, WaspServer};
use wasp_core::{AppConfig, ExecutionStore, SqliteStore};

/// Open the execution ledger named by `config`.
fn open_store(config: &AppConfig) -> anyhow::Result<Arc<dyn ExecutionStore>> {
    let store = SqliteStore::open(&config.storage.database_path).with_context(|| {
        format!(
            "failed to open database at {}",
            config.storage.database_path.display()
        )
    })?;
    tracing::info!(
        "Database initialized at {}",
        config.storage.database_path.display()
    );
    Ok(Arc::new(store))
}

/// Run the MCP server over stdio transport.
///
/// Serves the MCP protocol over stdin/stdout for exactly one session.
pub async fn run_stdio(config: &AppConfig) -> anyhow::Result<()> {
    use rmcp::{ServiceExt, transport::stdio};

    tracing::info!("Starting wasp MCP server (stdio)");

    let store = open_store(config)?;
    let server = WaspServer::new(store, Duration::from_secs(config.scan.timeout_seconds));
    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("Server error: {:?}", e);
    })?;

    service.waiting().await?;
    Ok(())
}

/// Run the MCP server over HTTP transport.
///
/// Starts an HTTP server on the specified host and port, serving the MCP
/// protocol at the /mcp endpoint. Each MCP session gets its own server
/// instance (and so its own session identifier in the execution ledger).
/// Gracefully shuts down on Ctrl+C.
pub async fn run_http(config: &AppConfig, host: &str, port: u16) -> anyhow::Result<()> {
    use axum::Router;
    use rmcp::transport::streamable_http_server::{
        StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
    };
    use std::net::SocketAddr;
    use tokio::net::TcpListener;

    tracing::info!("Starting wasp MCP HTTP server on {}:{}", host, port);

    // One store, shared by every session's server instance.
    let store = open_store(config)?;
    let scan_timeout = Duration::from_secs(config.scan.timeout_seconds);

    let session_manager = Arc::new(LocalSessionManager::default());
    let http_config = StreamableHttpServerConfig::default();

    let service = StreamableHttpService::new(
        move || {
            let server = WaspServer::new(Arc::clone(&store), scan_timeout);
            Ok(server)
        },
        session_manager,
        http_config,
    );

    let router = Router::new().nest_service("/mcp", service);

    let addr: SocketAddr = format_bind_addr(host, port).parse()?;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("HTTP server listening on {}", addr);
    tracing::info!("MCP endpoint available at: http://{}/mcp", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to install Ctrl+C handler");
            tracing::info!("Received Ctrl+C, shutting down gracefully");
        })
        .await?;

    Ok(())
}

/// Format a bindable address, bracketing IPv6 hosts.
fn format_bind_addr(host: &str, port: u16) -> String {
    if host.contains(':') {
        // IPv6 address - needs brackets
        format!("[{host}]:{port}")
    } else {
        // IPv4 address or hostname
        format!("{host}:{port}")
    }
}

/// Split a `HOST:PORT` argument into its parts.
///
/// Accepts bracketed IPv6 (`[::1]:8989`) and plain `host:port` forms.
pub fn parse_bind_addr(addr: &str) -> anyhow::Result<(String, u16)> {
    let (host, port) = if let Some(rest) = addr.strip_prefix('[') {
        // [v6]:port
        let (host, rest) = rest
            .split_once("]:")
            .with_context(|| format!("invalid bind address: {addr}"))?;
        (host.to_string(), rest)
    } else {
        let (host, port) = addr
            .rsplit_once(':')
            .with_context(|| format!("invalid bind address: {addr}"))?;
        (host.to_string(), port)
    };

    let port: u16 = port
        .parse()
        .with_context(|| format!("invalid port in bind address: {addr}"))?;
    Ok((host, port))
}
