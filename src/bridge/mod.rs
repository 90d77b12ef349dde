// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Correlation bridge to the scene sandbox.
//!
//! Owns at most one live WebSocket connection (single-tenant, newest wins)
//! and multiplexes concurrent logical requests over it. Every outbound
//! command gets a monotonically assigned correlation id and a pending entry;
//! the entry is removed by exactly one of three terminal events — matching
//! response, timeout, or disconnect. Responses may arrive in any order;
//! correctness rests solely on id matching.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{accept_async, WebSocketStream};

use crate::protocol::{Command, ResponseFrame, RESPONSE_FRAME_TYPE};

/// Well-known loopback port the sandbox dials into.
pub const DEFAULT_CHANNEL_PORT: u16 = 27446;

/// Deadline applied to every logical request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq)]
pub enum BridgeError {
    /// No live connection at the moment `send` was attempted.
    NotConnected,
    /// The deadline elapsed with no matching response.
    Timeout { timeout: Duration },
    /// The connection dropped (or was evicted) while the request was pending.
    Disconnected,
    /// The sandbox answered with a structured error.
    Remote { code: String, message: String },
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConnected => f.write_str("no live connection to the scene sandbox"),
            Self::Timeout { timeout } => {
                write!(f, "sandbox did not respond within {timeout:?}")
            }
            Self::Disconnected => f.write_str("sandbox disconnected before responding"),
            Self::Remote { code, message } => write!(f, "{code}: {message}"),
        }
    }
}

impl std::error::Error for BridgeError {}

struct PendingRequest {
    tx: oneshot::Sender<Result<Value, BridgeError>>,
}

struct Connection {
    generation: u64,
    outbound: mpsc::UnboundedSender<Message>,
    reader: JoinHandle<()>,
    writer: JoinHandle<()>,
}

struct BridgeState {
    connection: Option<Connection>,
    pending: BTreeMap<u64, PendingRequest>,
    next_correlation_id: u64,
    next_generation: u64,
}

struct BridgeInner {
    request_timeout: Duration,
    state: Mutex<BridgeState>,
}

/// The host side of the duplex channel.
#[derive(Clone)]
pub struct Bridge {
    inner: Arc<BridgeInner>,
}

impl Bridge {
    pub fn new() -> Self {
        Self::with_request_timeout(DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_request_timeout(request_timeout: Duration) -> Self {
        Self {
            inner: Arc::new(BridgeInner {
                request_timeout,
                state: Mutex::new(BridgeState {
                    connection: None,
                    pending: BTreeMap::new(),
                    next_correlation_id: 1,
                    next_generation: 0,
                }),
            }),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.inner.lock_state().connection.is_some()
    }

    /// Number of requests still awaiting a terminal event.
    pub fn pending_count(&self) -> usize {
        self.inner.lock_state().pending.len()
    }

    /// Issue one logical request and await its terminal event.
    ///
    /// Fails immediately with [`BridgeError::NotConnected`] when no peer is
    /// live — no pending entry is created in that case.
    pub async fn send(&self, method: &str, params: Option<Value>) -> Result<Value, BridgeError> {
        let (id, mut rx) = {
            let mut state = self.inner.lock_state();
            let Some(connection) = state.connection.as_ref() else {
                return Err(BridgeError::NotConnected);
            };
            let outbound = connection.outbound.clone();

            let id = state.next_correlation_id;
            state.next_correlation_id += 1;

            let command =
                Command { id: id.to_string(), method: method.to_owned(), params };
            let text = serde_json::to_string(&command).expect("serialize command frame");

            let (tx, rx) = oneshot::channel();
            let _ = state.pending.insert(id, PendingRequest { tx });
            if outbound.send(Message::Text(text.into())).is_err() {
                let _ = state.pending.remove(&id);
                return Err(BridgeError::Disconnected);
            }
            (id, rx)
        };

        tokio::select! {
            outcome = &mut rx => match outcome {
                Ok(outcome) => outcome,
                Err(_) => Err(BridgeError::Disconnected),
            },
            () = tokio::time::sleep(self.inner.request_timeout) => {
                let removed = self.inner.lock_state().pending.remove(&id).is_some();
                if removed {
                    Err(BridgeError::Timeout { timeout: self.inner.request_timeout })
                } else {
                    // The resolver won the race under the lock; the value is
                    // already in the channel.
                    match rx.try_recv() {
                        Ok(outcome) => outcome,
                        Err(_) => Err(BridgeError::Disconnected),
                    }
                }
            }
        }
    }

    /// Perform the WebSocket handshake and install the connection as the
    /// authoritative one, forcibly evicting any previous peer.
    pub async fn accept(
        &self,
        stream: TcpStream,
    ) -> Result<(), tokio_tungstenite::tungstenite::Error> {
        let peer = stream.peer_addr().ok();
        let ws = accept_async(stream).await?;
        let (sink, read) = ws.split();
        let (out_tx, out_rx) = mpsc::unbounded_channel();

        let generation = {
            let mut state = self.inner.lock_state();
            state.next_generation += 1;
            state.next_generation
        };

        let reader = tokio::spawn(read_loop(Arc::clone(&self.inner), generation, read));
        let writer = tokio::spawn(write_loop(Arc::clone(&self.inner), generation, sink, out_rx));

        let mut state = self.inner.lock_state();
        if let Some(previous) = state.connection.take() {
            tracing::info!(
                evicted_generation = previous.generation,
                "replacing live sandbox connection, rejecting its pending requests"
            );
            reject_all(&mut state.pending);
            previous.reader.abort();
            previous.writer.abort();
        }
        state.connection = Some(Connection { generation, outbound: out_tx, reader, writer });
        drop(state);

        tracing::info!(?peer, generation, "sandbox connected");
        Ok(())
    }

    /// Accept loop over a bound listener; runs until the listener fails.
    pub async fn listen(self, listener: TcpListener) {
        loop {
            match listener.accept().await {
                Ok((stream, addr)) => {
                    if let Err(err) = self.accept(stream).await {
                        tracing::warn!(%addr, error = %err, "websocket handshake failed");
                    }
                }
                Err(err) => {
                    tracing::warn!(error = %err, "channel accept failed");
                    tokio::time::sleep(Duration::from_millis(100)).await;
                }
            }
        }
    }
}

impl Default for Bridge {
    fn default() -> Self {
        Self::new()
    }
}

impl BridgeInner {
    fn lock_state(&self) -> MutexGuard<'_, BridgeState> {
        self.state.lock().expect("bridge state lock")
    }

    /// Resolve or reject the pending entry a response frame correlates to.
    /// Stray, duplicate, and malformed frames are dropped without effect.
    fn handle_frame(&self, generation: u64, text: &str) {
        let frame: ResponseFrame = match serde_json::from_str(text) {
            Ok(frame) => frame,
            Err(err) => {
                tracing::debug!(error = %err, "dropping unparseable frame");
                return;
            }
        };
        if frame.kind != RESPONSE_FRAME_TYPE {
            tracing::debug!(kind = %frame.kind, "dropping non-response frame");
            return;
        }
        let Ok(id) = frame.id.parse::<u64>() else {
            tracing::debug!(id = %frame.id, "dropping frame with malformed correlation id");
            return;
        };

        let mut state = self.lock_state();
        if current_generation(&state) != Some(generation) {
            return;
        }
        let Some(pending) = state.pending.remove(&id) else {
            tracing::debug!(id, "dropping stray or duplicate response");
            return;
        };
        let outcome = match frame.error {
            Some(error) => Err(BridgeError::Remote { code: error.code, message: error.message }),
            None => Ok(frame.result.unwrap_or(Value::Null)),
        };
        // Sent while holding the lock so a racing timeout observes either the
        // entry or the delivered value, never neither.
        let _ = pending.tx.send(outcome);
    }

    /// Tear down the current connection if it still is the one that ended,
    /// rejecting everything pending against it.
    fn handle_disconnect(&self, generation: u64) {
        let mut state = self.lock_state();
        if current_generation(&state) != Some(generation) {
            return;
        }
        state.connection = None;
        reject_all(&mut state.pending);
        tracing::info!(generation, "sandbox connection closed");
    }
}

fn current_generation(state: &BridgeState) -> Option<u64> {
    state.connection.as_ref().map(|connection| connection.generation)
}

fn reject_all(pending: &mut BTreeMap<u64, PendingRequest>) {
    for (_, request) in std::mem::take(pending) {
        let _ = request.tx.send(Err(BridgeError::Disconnected));
    }
}

async fn read_loop(
    inner: Arc<BridgeInner>,
    generation: u64,
    mut read: SplitStream<WebSocketStream<TcpStream>>,
) {
    while let Some(message) = read.next().await {
        match message {
            Ok(Message::Text(text)) => inner.handle_frame(generation, &text),
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(err) => {
                tracing::debug!(error = %err, "sandbox connection read error");
                break;
            }
        }
    }
    inner.handle_disconnect(generation);
}

async fn write_loop(
    inner: Arc<BridgeInner>,
    generation: u64,
    mut sink: SplitSink<WebSocketStream<TcpStream>, Message>,
    mut out_rx: mpsc::UnboundedReceiver<Message>,
) {
    while let Some(message) = out_rx.recv().await {
        if sink.send(message).await.is_err() {
            break;
        }
    }
    inner.handle_disconnect(generation);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ErrorBody;
    use futures::{SinkExt, StreamExt};
    use serde_json::json;

    type PeerSocket = WebSocketStream<tokio_tungstenite::MaybeTlsStream<TcpStream>>;

    async fn start_bridge(timeout: Duration) -> (Bridge, u16) {
        let bridge = Bridge::with_request_timeout(timeout);
        let listener = TcpListener::bind(("127.0.0.1", 0)).await.expect("bind listener");
        let port = listener.local_addr().expect("local addr").port();
        let accept_bridge = bridge.clone();
        let _ = tokio::spawn(accept_bridge.listen(listener));
        (bridge, port)
    }

    async fn connect_peer(port: u16) -> PeerSocket {
        let (socket, _) = tokio_tungstenite::connect_async(format!("ws://127.0.0.1:{port}"))
            .await
            .expect("peer connect");
        socket
    }

    async fn wait_connected(bridge: &Bridge) {
        for _ in 0..100 {
            if bridge.is_connected() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("bridge never observed the connection");
    }

    async fn next_command(peer: &mut PeerSocket) -> Command {
        loop {
            let message = peer.next().await.expect("peer stream open").expect("peer read");
            if let Message::Text(text) = message {
                return serde_json::from_str(&text).expect("command frame");
            }
        }
    }

    async fn reply_ok(peer: &mut PeerSocket, id: &str, result: Value) {
        let frame = ResponseFrame::ok(id, result);
        let text = serde_json::to_string(&frame).expect("serialize response");
        peer.send(Message::Text(text.into())).await.expect("peer send");
    }

    #[tokio::test]
    async fn send_without_connection_fails_without_a_pending_entry() {
        let bridge = Bridge::new();
        let err = bridge.send("get_pages", None).await.unwrap_err();
        assert_eq!(err, BridgeError::NotConnected);
        assert_eq!(bridge.pending_count(), 0);
    }

    #[tokio::test]
    async fn response_resolves_the_matching_request() {
        let (bridge, port) = start_bridge(Duration::from_secs(5)).await;
        let mut peer = connect_peer(port).await;
        wait_connected(&bridge).await;

        let sender = bridge.clone();
        let request =
            tokio::spawn(async move { sender.send("get_pages", Some(json!({}))).await });

        let command = next_command(&mut peer).await;
        assert_eq!(command.method, "get_pages");
        reply_ok(&mut peer, &command.id, json!({ "pages": [] })).await;

        let result = request.await.expect("join").expect("send ok");
        assert_eq!(result, json!({ "pages": [] }));
        assert_eq!(bridge.pending_count(), 0);
    }

    #[tokio::test]
    async fn error_responses_reject_with_remote_error() {
        let (bridge, port) = start_bridge(Duration::from_secs(5)).await;
        let mut peer = connect_peer(port).await;
        wait_connected(&bridge).await;

        let sender = bridge.clone();
        let request = tokio::spawn(async move { sender.send("get_node", None).await });

        let command = next_command(&mut peer).await;
        let frame = ResponseFrame {
            id: command.id,
            kind: RESPONSE_FRAME_TYPE.to_owned(),
            result: None,
            error: Some(ErrorBody {
                code: "not_found".to_owned(),
                message: "no node with id '9:9'".to_owned(),
            }),
        };
        let text = serde_json::to_string(&frame).expect("serialize");
        peer.send(Message::Text(text.into())).await.expect("peer send");

        let err = request.await.expect("join").unwrap_err();
        assert_eq!(
            err,
            BridgeError::Remote {
                code: "not_found".to_owned(),
                message: "no node with id '9:9'".to_owned(),
            }
        );
        assert_eq!(bridge.pending_count(), 0);
    }

    #[tokio::test]
    async fn out_of_order_responses_resolve_by_correlation_id() {
        let (bridge, port) = start_bridge(Duration::from_secs(5)).await;
        let mut peer = connect_peer(port).await;
        wait_connected(&bridge).await;

        let first_sender = bridge.clone();
        let first = tokio::spawn(async move { first_sender.send("get_pages", None).await });
        let first_command = next_command(&mut peer).await;

        let second_sender = bridge.clone();
        let second = tokio::spawn(async move { second_sender.send("get_styles", None).await });
        let second_command = next_command(&mut peer).await;

        let first_id: u64 = first_command.id.parse().expect("numeric id");
        let second_id: u64 = second_command.id.parse().expect("numeric id");
        assert!(second_id > first_id, "correlation ids must be monotonic");

        // Answer in reverse order of sending.
        reply_ok(&mut peer, &second_command.id, json!("styles")).await;
        reply_ok(&mut peer, &first_command.id, json!("pages")).await;

        assert_eq!(second.await.expect("join").expect("ok"), json!("styles"));
        assert_eq!(first.await.expect("join").expect("ok"), json!("pages"));
        assert_eq!(bridge.pending_count(), 0);
    }

    #[tokio::test]
    async fn stray_and_duplicate_frames_are_dropped_silently() {
        let (bridge, port) = start_bridge(Duration::from_secs(5)).await;
        let mut peer = connect_peer(port).await;
        wait_connected(&bridge).await;

        // Stray response with an id nobody is waiting for.
        reply_ok(&mut peer, "424242", json!("ghost")).await;
        // Garbage frame.
        peer.send(Message::Text("{not json".to_owned().into())).await.expect("peer send");

        let sender = bridge.clone();
        let request = tokio::spawn(async move { sender.send("get_pages", None).await });
        let command = next_command(&mut peer).await;
        reply_ok(&mut peer, &command.id, json!("real")).await;
        // Duplicate of an already-resolved id.
        reply_ok(&mut peer, &command.id, json!("echo")).await;

        assert_eq!(request.await.expect("join").expect("ok"), json!("real"));
        assert_eq!(bridge.pending_count(), 0);
        assert!(bridge.is_connected());
    }

    #[tokio::test]
    async fn timeout_rejects_and_removes_the_entry() {
        let (bridge, port) = start_bridge(Duration::from_millis(50)).await;
        let mut peer = connect_peer(port).await;
        wait_connected(&bridge).await;

        let sender = bridge.clone();
        let request = tokio::spawn(async move { sender.send("get_pages", None).await });
        let _command = next_command(&mut peer).await;

        let err = request.await.expect("join").unwrap_err();
        assert_eq!(err, BridgeError::Timeout { timeout: Duration::from_millis(50) });
        assert_eq!(bridge.pending_count(), 0);
    }

    #[tokio::test]
    async fn peer_disconnect_rejects_everything_pending() {
        let (bridge, port) = start_bridge(Duration::from_secs(5)).await;
        let mut peer = connect_peer(port).await;
        wait_connected(&bridge).await;

        let sender = bridge.clone();
        let request = tokio::spawn(async move { sender.send("get_pages", None).await });
        let _command = next_command(&mut peer).await;
        assert_eq!(bridge.pending_count(), 1);

        peer.close(None).await.expect("peer close");

        let err = request.await.expect("join").unwrap_err();
        assert_eq!(err, BridgeError::Disconnected);
        assert_eq!(bridge.pending_count(), 0);

        for _ in 0..100 {
            if !bridge.is_connected() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(!bridge.is_connected());
    }

    #[tokio::test]
    async fn a_newer_connection_evicts_the_older_one() {
        let (bridge, port) = start_bridge(Duration::from_secs(5)).await;
        let mut first_peer = connect_peer(port).await;
        wait_connected(&bridge).await;

        let sender = bridge.clone();
        let stale = tokio::spawn(async move { sender.send("get_pages", None).await });
        let _command = next_command(&mut first_peer).await;
        assert_eq!(bridge.pending_count(), 1);

        let mut second_peer = connect_peer(port).await;
        let err = stale.await.expect("join").unwrap_err();
        assert_eq!(err, BridgeError::Disconnected);
        assert_eq!(bridge.pending_count(), 0);

        // The replacement connection is authoritative and serves requests.
        let sender = bridge.clone();
        let fresh = tokio::spawn(async move { sender.send("get_styles", None).await });
        let command = next_command(&mut second_peer).await;
        assert_eq!(command.method, "get_styles");
        reply_ok(&mut second_peer, &command.id, json!("fresh")).await;
        assert_eq!(fresh.await.expect("join").expect("ok"), json!("fresh"));
    }

    #[tokio::test]
    async fn non_text_frames_are_ignored() {
        let (bridge, port) = start_bridge(Duration::from_secs(5)).await;
        let mut peer = connect_peer(port).await;
        wait_connected(&bridge).await;

        peer.send(Message::Binary(vec![1, 2, 3].into())).await.expect("peer send");

        let sender = bridge.clone();
        let request = tokio::spawn(async move { sender.send("get_pages", None).await });
        let command = next_command(&mut peer).await;
        reply_ok(&mut peer, &command.id, json!("still fine")).await;
        assert_eq!(request.await.expect("join").expect("ok"), json!("still fine"));
    }
}
