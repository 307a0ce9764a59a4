//! MCP Stdio Server
//!
//! Reads line-delimited JSON-RPC messages and writes one response line per
//! request. Requests are handled concurrently; a single writer serializes the
//! output so lines never interleave.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::mcp::error::McpError;
use crate::mcp::handler::McpHandler;
use crate::mcp::protocol::JsonRpcResponse;
use crate::Result;

pub struct McpStdioServer {
    handler: McpHandler,
}

impl McpStdioServer {
    pub fn new(handler: McpHandler) -> Self {
        Self { handler }
    }

    /// Serve on the process stdin/stdout until EOF.
    pub async fn run(&self) -> Result<()> {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.serve(stdin, stdout).await
    }

    /// Serve on arbitrary streams. Returns after EOF once every in-flight
    /// request has been answered.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!("Starting MCP stdio server");

        let (tx, mut rx) = mpsc::unbounded_channel::<JsonRpcResponse>();

        let read_loop = async move {
            let mut reader = reader;
            let mut buf = Vec::new();
            loop {
                buf.clear();
                if reader.read_until(b'\n', &mut buf).await? == 0 {
                    break;
                }

                let line = match String::from_utf8(std::mem::take(&mut buf)) {
                    Ok(line) => line,
                    Err(e) => {
                        warn!(error = %e, "Input line is not valid UTF-8");
                        let error = McpError::ParseError(e.to_string());
                        let _ = tx.send(JsonRpcResponse::failure(None, error.into()));
                        continue;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }
                debug!(bytes = line.len(), "Received input line");

                let handler = self.handler.clone();
                let tx = tx.clone();
                tokio::spawn(async move {
                    if let Some(response) = handler.handle_message(line.trim_end()).await {
                        // The receiver only disappears if the writer failed.
                        let _ = tx.send(response);
                    }
                });
            }
            info!("MCP stdio server input closed (EOF received)");
            Ok::<(), crate::error::FinPilotError>(())
        };

        let write_loop = async {
            while let Some(response) = rx.recv().await {
                let mut line = serde_json::to_vec(&response)?;
                line.push(b'\n');
                writer.write_all(&line).await?;
                writer.flush().await?;
            }
            Ok::<(), crate::error::FinPilotError>(())
        };

        let (read_result, write_result) = tokio::join!(read_loop, write_loop);
        read_result?;
        write_result?;

        info!("MCP stdio server shutting down");
        Ok(())
    }
}
