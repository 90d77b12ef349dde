// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Sandbox runtime: dials the host bridge and serves dispatch over a
//! document until the connection drops.
//!
//! Reconnection lives here, on the sandbox side — the bridge simply treats
//! whichever connection arrives next as authoritative.

use std::fmt;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::dispatch::dispatch;
use crate::model::Document;
use crate::protocol::{Command, ResponseFrame};

#[derive(Debug)]
pub enum SandboxError {
    Connect { url: String, source: tokio_tungstenite::tungstenite::Error },
}

impl fmt::Display for SandboxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect { url, source } => {
                write!(f, "cannot connect to host bridge at {url}: {source}")
            }
        }
    }
}

impl std::error::Error for SandboxError {}

/// Serves the query engine over one WebSocket connection at a time.
pub struct SandboxRuntime {
    document: Document,
}

impl SandboxRuntime {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Connect once and serve until the connection closes.
    pub async fn run(&mut self, url: &str) -> Result<(), SandboxError> {
        let (socket, _) = connect_async(url)
            .await
            .map_err(|source| SandboxError::Connect { url: url.to_owned(), source })?;
        tracing::info!(url, "connected to host bridge");
        self.serve(socket).await;
        Ok(())
    }

    /// Reconnect loop: serve, and on any disconnect or connect failure retry
    /// after `retry_delay`. Runs until the task is dropped.
    pub async fn run_with_reconnect(&mut self, url: &str, retry_delay: Duration) {
        loop {
            if let Err(err) = self.run(url).await {
                tracing::warn!(error = %err, "sandbox connect failed");
            }
            tokio::time::sleep(retry_delay).await;
        }
    }

    async fn serve(&mut self, mut socket: WebSocketStream<MaybeTlsStream<TcpStream>>) {
        while let Some(message) = socket.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    let Some(response) = self.handle_text(&text) else {
                        continue;
                    };
                    let text =
                        serde_json::to_string(&response).expect("serialize response frame");
                    if socket.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(err) => {
                    tracing::debug!(error = %err, "host connection read error");
                    break;
                }
            }
        }
        tracing::info!("host connection closed");
    }

    /// Dispatch one command frame. Handler failures become structured error
    /// responses; frames that are not commands are dropped with a warning
    /// (there is no id to answer to).
    fn handle_text(&mut self, text: &str) -> Option<ResponseFrame> {
        let command: Command = match serde_json::from_str(text) {
            Ok(command) => command,
            Err(err) => {
                tracing::warn!(error = %err, "dropping malformed command frame");
                return None;
            }
        };
        let response = match dispatch(&mut self.document, &command.method, command.params) {
            Ok(result) => ResponseFrame::ok(command.id, result),
            Err(error) => ResponseFrame::err(command.id, error.code, error.message),
        };
        Some(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::demo_document;
    use serde_json::json;

    #[test]
    fn malformed_frames_produce_no_response() {
        let mut runtime = SandboxRuntime::new(demo_document());
        assert!(runtime.handle_text("{oops").is_none());
        assert!(runtime.handle_text("{\"no_id\": true}").is_none());
    }

    #[test]
    fn commands_produce_correlated_responses() {
        let mut runtime = SandboxRuntime::new(demo_document());
        let response = runtime
            .handle_text(r#"{"id":"7","method":"get_pages"}"#)
            .expect("response");
        assert_eq!(response.id, "7");
        assert_eq!(response.kind, "response");
        let result = response.result.expect("result");
        assert_eq!(result["pages"][0]["name"], json!("Landing"));
    }

    #[test]
    fn handler_failures_become_error_responses() {
        let mut runtime = SandboxRuntime::new(demo_document());
        let response = runtime
            .handle_text(r#"{"id":"8","method":"get_node","params":{"node_id":"9:9"}}"#)
            .expect("response");
        assert_eq!(response.id, "8");
        let error = response.error.expect("error");
        assert_eq!(error.code, "not_found");
        assert!(response.result.is_none());
    }

    #[test]
    fn unknown_methods_become_error_responses() {
        let mut runtime = SandboxRuntime::new(demo_document());
        let response =
            runtime.handle_text(r#"{"id":"9","method":"emit_chaos"}"#).expect("response");
        assert_eq!(response.error.expect("error").code, "unknown_method");
    }
}
