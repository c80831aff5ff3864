// Standalone MCP server binary

use anyhow::Result;
use clap::Parser;
use litmus_mcp::server::McpServer;
use litmus_mcp::tools::litmus_tools;
use litmus_mcp::ServerConfig;
use litmus_sdk::LitmusClient;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing; stdout carries the protocol, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = ServerConfig::parse();

    tracing::info!("LitmusChaos MCP Server starting...");
    tracing::info!("Chaos Center endpoint: {}", config.endpoint);
    tracing::info!("Project: {}", config.project_id);
    if config.access_token.as_deref().unwrap_or_default().is_empty() {
        tracing::warn!("No access token configured; requests will be unauthenticated");
    }

    let client = LitmusClient::from_config(config.client_config())?;
    let registry = litmus_tools(Arc::new(client), &config.tool_defaults());

    tracing::info!("Registered {} tools", registry.len());

    let server = McpServer::new(registry);

    tokio::select! {
        result = server.start() => result?,
        _ = shutdown_signal() => {
            tracing::info!("Received shutdown signal, shutting down");
            // A pending stdin read would otherwise hold the runtime open
            std::process::exit(0);
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
