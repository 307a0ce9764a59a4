//! Command line interface
//!
//! Only non-secret settings can be given as arguments. Credentials come from
//! `FINPILOT_API_KEY` / `FINPILOT_JWT_TOKEN`.

use crate::config::Environment;
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TransportMode {
    /// Line-delimited JSON-RPC on stdin/stdout (for desktop assistants)
    #[default]
    Stdio,
    /// JSON-RPC over HTTP (for testing and development)
    Http,
}

#[derive(Debug, Parser)]
#[command(name = "finpilot-mcp")]
#[command(about = "FinPilot MCP Server - AI Financial Co-Pilot")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(after_help = "Security:
  API keys and tokens are read from the environment only.
  Set FINPILOT_API_KEY or FINPILOT_JWT_TOKEN before starting the server.")]
pub struct Cli {
    /// Transport mode
    #[arg(long, value_enum, default_value_t = TransportMode::Stdio)]
    pub mode: TransportMode,

    /// Override the API gateway URL
    #[arg(long)]
    pub api_gateway_url: Option<String>,

    /// Deployment environment
    #[arg(long, value_enum)]
    pub environment: Option<Environment>,

    /// HTTP server host
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// HTTP server port
    #[arg(long, default_value_t = 8002)]
    pub port: u16,

    /// Auto-reload on code changes (accepted for compatibility; has no effect)
    #[arg(long)]
    pub reload: bool,
}
