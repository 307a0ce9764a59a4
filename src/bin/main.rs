use clap::Parser;
use finpilot_mcp::{
    api::start_server,
    cli::{Cli, TransportMode},
    config::{Settings, ENV_API_KEY, ENV_JWT_TOKEN},
    gateway::GatewayClient,
    mcp::{McpHandler, McpStdioServer},
    tools::create_default_registry,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // stdout carries the protocol in stdio mode, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let mut settings = Settings::from_env();
    settings.apply_overrides(cli.api_gateway_url.clone(), cli.environment);

    if let Err(e) = settings.require_credentials() {
        eprintln!("ERROR: {}", e);
        eprintln!();
        eprintln!("Example:");
        eprintln!("  export {}=your-api-key-here", ENV_API_KEY);
        eprintln!("  (or {}=your-token)", ENV_JWT_TOKEN);
        eprintln!("  finpilot-mcp --mode stdio");
        std::process::exit(1);
    }

    let client = Arc::new(GatewayClient::new(&settings)?);
    let registry = Arc::new(create_default_registry(client.clone()));
    let handler = McpHandler::new(registry, settings.has_credentials());

    info!(
        gateway = %client.base_url(),
        environment = %settings.environment,
        mode = ?cli.mode,
        "FinPilot MCP server starting"
    );

    match cli.mode {
        TransportMode::Stdio => {
            McpStdioServer::new(handler).run().await?;
        }
        TransportMode::Http => {
            if cli.reload {
                warn!("--reload is not supported and will be ignored");
            }
            start_server(handler, &cli.host, cli.port).await?;
        }
    }

    Ok(())
}
