// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Proteus CLI entrypoint.
//!
//! Host mode (default) owns the channel listener the sandbox dials into and
//! serves MCP over streamable HTTP at `http://127.0.0.1:<port>/mcp`; `--mcp`
//! serves MCP over stdio instead. Sandbox mode (`--sandbox`) loads a scene
//! document and keeps a connection to the host's channel port.

use std::error::Error;
use std::time::Duration;

use axum::Router;
use rmcp::transport::{
    streamable_http_server::session::local::LocalSessionManager, StreamableHttpServerConfig,
    StreamableHttpService,
};
use tracing_subscriber::EnvFilter;

use proteus::bridge::{Bridge, DEFAULT_CHANNEL_PORT};
use proteus::mcp::ProteusMcp;
use proteus::sandbox::SandboxRuntime;

const DEFAULT_MCP_HTTP_PORT: u16 = 27445;
const SANDBOX_RETRY_DELAY: Duration = Duration::from_secs(2);

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--mcp-http-port <port>] [--channel-port <port>]\n  {program} --mcp [--channel-port <port>]\n  {program} --sandbox <doc.json> [--channel-port <port>]\n  {program} --sandbox --demo [--channel-port <port>]\n\nHost mode (default) listens for the scene sandbox on 127.0.0.1:<channel-port>\n(default {DEFAULT_CHANNEL_PORT}) and serves MCP over streamable HTTP at\n`http://127.0.0.1:<port>/mcp` (default {DEFAULT_MCP_HTTP_PORT}); --mcp serves MCP over stdio instead.\n\nSandbox mode loads a scene document from JSON (--demo uses the built-in demo\ndocument) and keeps a connection to the host's channel port, reconnecting on\ndrops."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    mcp: bool,
    sandbox: bool,
    demo: bool,
    document_path: Option<String>,
    mcp_http_port: Option<u16>,
    channel_port: Option<u16>,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--mcp" => {
                if options.mcp {
                    return Err(());
                }
                options.mcp = true;
            }
            "--sandbox" => {
                if options.sandbox {
                    return Err(());
                }
                options.sandbox = true;
            }
            "--demo" => {
                if options.demo {
                    return Err(());
                }
                options.demo = true;
            }
            "--mcp-http-port" => {
                if options.mcp_http_port.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                options.mcp_http_port = Some(raw.parse().map_err(|_| ())?);
            }
            "--channel-port" => {
                if options.channel_port.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                options.channel_port = Some(raw.parse().map_err(|_| ())?);
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.document_path.is_some() {
                    return Err(());
                }
                options.document_path = Some(arg);
            }
        }
    }

    if options.demo && !options.sandbox {
        return Err(());
    }
    if options.document_path.is_some() && !options.sandbox {
        return Err(());
    }
    if options.sandbox && (options.mcp || options.mcp_http_port.is_some()) {
        return Err(());
    }
    if options.sandbox && options.demo == options.document_path.is_some() {
        // Exactly one source: --demo or a document path.
        return Err(());
    }
    if options.mcp && options.mcp_http_port.is_some() {
        return Err(());
    }

    Ok(options)
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_writer(std::io::stderr)
            .init();

        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "proteus".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        let channel_port = options.channel_port.unwrap_or(DEFAULT_CHANNEL_PORT);
        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;

        if options.sandbox {
            let document = if options.demo {
                proteus::model::fixtures::demo_document()
            } else {
                let path = options.document_path.expect("validated by parse_options");
                let raw = std::fs::read_to_string(&path)?;
                serde_json::from_str(&raw)
                    .map_err(|err| format!("cannot parse scene document '{path}': {err}"))?
            };

            runtime.block_on(async move {
                let mut sandbox = SandboxRuntime::new(document);
                let url = format!("ws://127.0.0.1:{channel_port}");
                sandbox.run_with_reconnect(&url, SANDBOX_RETRY_DELAY).await;
            });
            return Ok(());
        }

        let bridge = Bridge::new();
        let mcp = ProteusMcp::new(bridge.clone());

        runtime.block_on(async move {
            let channel_listener =
                tokio::net::TcpListener::bind(("127.0.0.1", channel_port)).await?;
            let _ = tokio::spawn(bridge.clone().listen(channel_listener));

            if options.mcp {
                mcp.serve_stdio().await?;
                return Ok::<(), Box<dyn Error>>(());
            }

            let mcp_http_port = options.mcp_http_port.unwrap_or(DEFAULT_MCP_HTTP_PORT);
            let listener = tokio::net::TcpListener::bind(("127.0.0.1", mcp_http_port)).await?;

            let config = StreamableHttpServerConfig {
                stateful_mode: true,
                ..StreamableHttpServerConfig::default()
            };
            let session_manager = std::sync::Arc::new(LocalSessionManager::default());
            let mcp_service = {
                let mcp = mcp.clone();
                StreamableHttpService::new(move || Ok(mcp.clone()), session_manager, config)
            };

            let router = Router::new().nest_service("/mcp", mcp_service);
            tracing::info!(
                mcp_http_port,
                channel_port,
                "host ready; waiting for the scene sandbox"
            );
            axum::serve(listener, router).await?;
            Ok::<(), Box<dyn Error>>(())
        })?;

        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("proteus: {err}");
        std::process::exit(1);
    }
}
