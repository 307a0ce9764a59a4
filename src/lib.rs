//! FinPilot MCP Server
//!
//! Exposes the FinPilot API gateway to AI assistants over the Model Context
//! Protocol:
//! - Credit report analysis and credit health
//! - Portfolio analysis
//! - Loan optimization
//! - Financial planning
//!
//! All financial logic runs on the gateway. This crate maps tool calls to
//! gateway requests and normalizes every failure into a uniform envelope.
//!
//! FLOW:
//! TOOL CALL → GATEWAY REQUEST → CLASSIFY → ENVELOPE

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod gateway;
pub mod mcp;
pub mod models;
pub mod tools;

pub use error::Result;

// Re-export common types
pub use config::{Environment, Settings};
pub use error::{FinPilotError, GatewayError};
pub use gateway::{GatewayClient, GatewayOperation, TimeoutClass};
pub use models::*;
pub use tools::{create_default_registry, Tool, ToolRegistry};
