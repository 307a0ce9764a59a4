//! Model Context Protocol surface: JSON-RPC types, dispatch and stdio transport

pub mod error;
pub mod handler;
pub mod prompts;
pub mod protocol;
pub mod resources;
pub mod server;

pub use error::McpError;
pub use handler::McpHandler;
pub use server::McpStdioServer;
