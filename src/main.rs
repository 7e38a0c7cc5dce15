// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of usd-mcp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! usd-mcp CLI entrypoint.
//!
//! Serves MCP over stdio by default. With `--http-port` it serves streamable HTTP at
//! `http://<bind>:<port>/mcp` instead. Logs always go to stderr.

use std::error::Error;
use std::io;
use std::net::IpAddr;
use std::num::NonZeroUsize;
use std::sync::Arc;

use axum::Router;
use clap::{Parser, ValueEnum};
use rmcp::transport::{
    streamable_http_server::session::local::LocalSessionManager, StreamableHttpServerConfig,
    StreamableHttpService,
};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use usd_mcp::mcp::UsdMcp;

const DEFAULT_LOG_FILTER: &str = "usd_mcp=info";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
enum LogFormat {
    #[default]
    Text,
    Json,
}

/// MCP server for inspecting USD scene files.
#[derive(Debug, Parser)]
#[command(name = "usd-mcp", version, about)]
struct Cli {
    /// Serve streamable HTTP on this port instead of stdio (0 picks a free port).
    #[arg(long, env = "USD_MCP_HTTP_PORT")]
    http_port: Option<u16>,

    /// Address the HTTP server binds to.
    #[arg(long, env = "USD_MCP_BIND", default_value = "127.0.0.1")]
    bind: IpAddr,

    /// Keep at most this many stages cached, evicting the least recently used.
    #[arg(long, env = "USD_MCP_CACHE_CAPACITY")]
    cache_capacity: Option<NonZeroUsize>,

    /// Log line format on stderr.
    #[arg(long, env = "USD_MCP_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => {
            registry.with(tracing_subscriber::fmt::layer().with_writer(io::stderr)).init();
        }
        LogFormat::Json => {
            registry.with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr)).init();
        }
    }
}

async fn serve_http(mcp: UsdMcp, bind: IpAddr, port: u16) -> Result<(), Box<dyn Error>> {
    let listener = tokio::net::TcpListener::bind((bind, port)).await?;
    let local_addr = listener.local_addr()?;

    let config =
        StreamableHttpServerConfig { stateful_mode: true, ..StreamableHttpServerConfig::default() };
    let shutdown_token = config.cancellation_token.clone();

    let session_manager = Arc::new(LocalSessionManager::default());
    let mcp_service = StreamableHttpService::new(move || Ok(mcp.clone()), session_manager, config);
    let router = Router::new().nest_service("/mcp", mcp_service);

    info!(url = %format!("http://{local_addr}/mcp"), "serving MCP over streamable HTTP");

    let ctrl_c_token = shutdown_token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutting down");
        }
        ctrl_c_token.cancel();
    });

    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown_token.cancelled().await })
        .await?;
    Ok(())
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mcp = UsdMcp::with_capacity(cli.cache_capacity);
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;

    match cli.http_port {
        Some(port) => runtime.block_on(serve_http(mcp, cli.bind, port)),
        None => runtime.block_on(mcp.serve_stdio()).map_err(Into::into),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    if let Err(err) = run(cli) {
        error!(error = %err, "fatal");
        eprintln!("usd-mcp: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, LogFormat};
    use clap::Parser;

    #[test]
    fn defaults_to_stdio_and_text_logs() {
        let cli = Cli::try_parse_from(["usd-mcp"]).expect("parse");
        assert_eq!(cli.http_port, None);
        assert_eq!(cli.bind.to_string(), "127.0.0.1");
        assert_eq!(cli.cache_capacity, None);
        assert_eq!(cli.log_format, LogFormat::Text);
    }

    #[test]
    fn parses_http_and_cache_flags() {
        let cli = Cli::try_parse_from([
            "usd-mcp",
            "--http-port",
            "0",
            "--bind",
            "0.0.0.0",
            "--cache-capacity",
            "16",
            "--log-format",
            "json",
        ])
        .expect("parse");
        assert_eq!(cli.http_port, Some(0));
        assert_eq!(cli.bind.to_string(), "0.0.0.0");
        assert_eq!(cli.cache_capacity.map(|capacity| capacity.get()), Some(16));
        assert_eq!(cli.log_format, LogFormat::Json);
    }

    #[test]
    fn rejects_zero_capacity_and_bad_port() {
        Cli::try_parse_from(["usd-mcp", "--cache-capacity", "0"]).unwrap_err();
        Cli::try_parse_from(["usd-mcp", "--http-port", "70000"]).unwrap_err();
        Cli::try_parse_from(["usd-mcp", "--log-format", "yaml"]).unwrap_err();
    }
}
