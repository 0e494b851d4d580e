// SPDX-License-Identifier: Apache-2.0

//! Binary entry point for the wasp MCP server.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Web application security scanner MCP server.
#[derive(Debug, Parser)]
#[command(name = "wasp-mcp", version, about)]
struct Cli {
    /// Serve MCP over HTTP at HOST:PORT instead of stdio.
    #[arg(long, value_name = "HOST:PORT")]
    http: Option<String>,

    /// SQLite database file path (overrides config).
    #[arg(long, value_name = "PATH")]
    db: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(long)]
    debug: bool,
}

/// Initialize the logging subsystem.
///
/// Logs go to stderr so the stdio transport keeps stdout for the protocol.
/// The `RUST_LOG` environment variable overrides the default filter.
fn init_logging(debug: bool) {
    let fmt_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    let default_filter = if debug {
        "wasp_core=debug,wasp_mcp=debug"
    } else {
        "wasp_core=info,wasp_mcp=info"
    };
    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .expect("valid default filter directives");

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let mut config = wasp_core::load_config()?;
    if let Some(db) = cli.db {
        config.storage.database_path = db;
    }

    match cli.http {
        Some(addr) => {
            let (host, port) = wasp_mcp::parse_bind_addr(&addr)?;
            wasp_mcp::run_http(&config, &host, port).await
        }
        None => wasp_mcp::run_stdio(&config).await,
    }
}
