// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2026 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! A WebSocket client which keeps its connection alive.
//!
//! [`WebSocketClient::connect`] opens the connection and spawns a controller task which
//! owns the socket. The controller forwards every received frame to the message handler, writes
//! queued outbound frames, sends heartbeats and, when the connection drops, reconnects with
//! exponential backoff. After each successful reconnection the handler receives a text frame
//! holding [`RECONNECTED`] so adapters can restore their subscriptions.

use std::{
    str::FromStr,
    sync::{
        Arc,
        atomic::{AtomicU8, Ordering},
    },
    time::Duration,
};

use bytes::Bytes;
use futures_util::{SinkExt, StreamExt};
use tokio::{net::TcpStream, sync::mpsc, task::JoinHandle, time::Interval};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{
        Message,
        client::IntoClientRequest,
        http::{HeaderName, HeaderValue},
    },
};

use super::{config::WebSocketConfig, types::MessageHandler};
use crate::{RECONNECTED, backoff::ExponentialBackoff, mode::ConnectionMode};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

const DISCONNECT_TIMEOUT_SECS: u64 = 5;

/// Errors returned by [`WebSocketClient`].
#[derive(Debug, thiserror::Error)]
pub enum WebSocketClientError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Connection timed out after {0}ms")]
    Timeout(u64),

    #[error("Client is not active (mode: {0})")]
    NotActive(ConnectionMode),

    #[error("Send failed: {0}")]
    Send(String),
}

#[derive(Debug)]
enum WriterCommand {
    Send(Message),
    Close,
}

enum SessionEnd {
    Requested,
    Dropped,
}

/// A WebSocket client with a background controller task.
#[derive(Debug)]
pub struct WebSocketClient {
    url: String,
    writer_tx: mpsc::UnboundedSender<WriterCommand>,
    connection_mode: Arc<AtomicU8>,
    task_handle: JoinHandle<()>,
}

impl WebSocketClient {
    /// Connects to `config.url` and spawns the controller task.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The URL or a header is invalid.
    /// - The initial connection fails or times out.
    pub async fn connect(
        config: WebSocketConfig,
        handler: MessageHandler,
    ) -> Result<Self, WebSocketClientError> {
        let backoff = ExponentialBackoff::new(
            Duration::from_millis(config.reconnect_delay_initial_ms()),
            Duration::from_millis(config.reconnect_delay_max_ms()),
            config.reconnect_backoff_factor(),
            config.reconnect_jitter_ms(),
        )
        .map_err(|e| WebSocketClientError::InvalidRequest(e.to_string()))?;

        tracing::debug!("Connecting WebSocket to {}", config.url);
        let stream = open_stream(&config).await?;

        let connection_mode = Arc::new(AtomicU8::new(ConnectionMode::Active.as_u8()));
        let (writer_tx, writer_rx) = mpsc::unbounded_channel();

        let url = config.url.clone();
        let controller = WebSocketController {
            config,
            handler,
            writer_rx,
            connection_mode: connection_mode.clone(),
            backoff,
        };
        let task_handle = tokio::spawn(controller.run(stream));

        Ok(Self {
            url,
            writer_tx,
            connection_mode,
            task_handle,
        })
    }

    /// Returns the URL this client connects to.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the shared connection mode atomic.
    #[must_use]
    pub fn connection_mode_atomic(&self) -> Arc<AtomicU8> {
        self.connection_mode.clone()
    }

    /// Returns the current connection mode.
    #[must_use]
    pub fn connection_mode(&self) -> ConnectionMode {
        ConnectionMode::from_atomic(&self.connection_mode)
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.connection_mode().is_active()
    }

    #[must_use]
    pub fn is_reconnecting(&self) -> bool {
        self.connection_mode().is_reconnect()
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.connection_mode().is_closed()
    }

    /// Queues a text frame for sending.
    ///
    /// # Errors
    ///
    /// Returns an error if the client is not active or the controller has stopped.
    pub async fn send_text(&self, text: String) -> Result<(), WebSocketClientError> {
        self.send(Message::Text(text.into()))
    }

    /// Queues a pong frame for sending.
    ///
    /// # Errors
    ///
    /// Returns an error if the client is not active or the controller has stopped.
    pub async fn send_pong(&self, data: Vec<u8>) -> Result<(), WebSocketClientError> {
        self.send(Message::Pong(Bytes::from(data)))
    }

    fn send(&self, msg: Message) -> Result<(), WebSocketClientError> {
        let mode = self.connection_mode();
        if !mode.is_active() {
            return Err(WebSocketClientError::NotActive(mode));
        }
        self.writer_tx
            .send(WriterCommand::Send(msg))
            .map_err(|e| WebSocketClientError::Send(e.to_string()))
    }

    /// Closes the connection and waits for the controller task to finish.
    pub async fn disconnect(&self) {
        if self.is_closed() {
            return;
        }

        tracing::debug!("Disconnecting WebSocket from {}", self.url);
        self.connection_mode
            .store(ConnectionMode::Disconnect.as_u8(), Ordering::SeqCst);
        let _ = self.writer_tx.send(WriterCommand::Close);

        let closed = tokio::time::timeout(Duration::from_secs(DISCONNECT_TIMEOUT_SECS), async {
            while !self.is_closed() {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await;

        if closed.is_err() {
            tracing::warn!("Timed out waiting for WebSocket controller, aborting task");
            self.task_handle.abort();
            self.connection_mode
                .store(ConnectionMode::Closed.as_u8(), Ordering::SeqCst);
        }
    }
}

struct WebSocketController {
    config: WebSocketConfig,
    handler: MessageHandler,
    writer_rx: mpsc::UnboundedReceiver<WriterCommand>,
    connection_mode: Arc<AtomicU8>,
    backoff: ExponentialBackoff,
}

impl WebSocketController {
    fn mode(&self) -> ConnectionMode {
        ConnectionMode::from_atomic(&self.connection_mode)
    }

    fn set_mode(&self, mode: ConnectionMode) {
        self.connection_mode.store(mode.as_u8(), Ordering::SeqCst);
    }

    async fn run(mut self, mut stream: WsStream) {
        loop {
            let end = self.run_session(stream).await;

            if matches!(end, SessionEnd::Requested) || self.mode().is_disconnect() {
                self.set_mode(ConnectionMode::Closed);
                tracing::debug!("WebSocket controller stopped for {}", self.config.url);
                return;
            }

            tracing::warn!("WebSocket connection to {} dropped", self.config.url);
            self.set_mode(ConnectionMode::Reconnect);

            match self.reconnect().await {
                Some(new_stream) => {
                    stream = new_stream;
                    self.set_mode(ConnectionMode::Active);
                    (self.handler)(Message::Text(RECONNECTED.into()));
                }
                None => {
                    self.set_mode(ConnectionMode::Closed);
                    (self.handler)(Message::Close(None));
                    return;
                }
            }
        }
    }

    async fn run_session(&mut self, stream: WsStream) -> SessionEnd {
        let (mut write, mut read) = stream.split();

        let mut heartbeat = self.config.heartbeat.map(|secs| {
            let period = Duration::from_secs(secs.max(1));
            tokio::time::interval_at(tokio::time::Instant::now() + period, period)
        });

        loop {
            tokio::select! {
                msg = read.next() => match msg {
                    Some(Ok(Message::Close(frame))) => {
                        tracing::debug!("Received close frame: {frame:?}");
                        return SessionEnd::Dropped;
                    }
                    Some(Ok(msg)) => (self.handler)(msg),
                    Some(Err(e)) => {
                        tracing::warn!("WebSocket read error: {e}");
                        return SessionEnd::Dropped;
                    }
                    None => return SessionEnd::Dropped,
                },
                cmd = self.writer_rx.recv() => match cmd {
                    Some(WriterCommand::Send(msg)) => {
                        if let Err(e) = write.send(msg).await {
                            tracing::warn!("WebSocket write error: {e}");
                            return SessionEnd::Dropped;
                        }
                    }
                    Some(WriterCommand::Close) | None => {
                        let _ = write.send(Message::Close(None)).await;
                        let _ = write.close().await;
                        return SessionEnd::Requested;
                    }
                },
                () = next_heartbeat(&mut heartbeat) => {
                    let msg = match &self.config.heartbeat_msg {
                        Some(text) => Message::Text(text.clone().into()),
                        None => Message::Ping(Bytes::new()),
                    };
                    if let Err(e) = write.send(msg).await {
                        tracing::warn!("WebSocket heartbeat failed: {e}");
                        return SessionEnd::Dropped;
                    }
                }
            }
        }
    }

    async fn reconnect(&mut self) -> Option<WsStream> {
        let mut attempts: u32 = 0;

        loop {
            if let Some(max_attempts) = self.config.reconnect_max_attempts
                && attempts >= max_attempts
            {
                tracing::error!(
                    "Giving up on {} after {attempts} reconnection attempts",
                    self.config.url
                );
                return None;
            }

            let delay = self.backoff.next_duration();
            tracing::debug!("Reconnecting to {} in {delay:?}", self.config.url);

            let sleep = tokio::time::sleep(delay);
            tokio::pin!(sleep);
            loop {
                tokio::select! {
                    () = &mut sleep => break,
                    cmd = self.writer_rx.recv() => match cmd {
                        Some(WriterCommand::Send(_)) => {
                            tracing::warn!("Dropping outbound message while reconnecting");
                        }
                        Some(WriterCommand::Close) | None => return None,
                    },
                }
            }

            if self.mode().is_disconnect() {
                return None;
            }

            attempts += 1;
            match open_stream(&self.config).await {
                Ok(stream) => {
                    self.backoff.reset();
                    tracing::info!("Reconnected to {}", self.config.url);
                    return Some(stream);
                }
                Err(e) => tracing::warn!("Reconnection attempt {attempts} failed: {e}"),
            }
        }
    }
}

async fn next_heartbeat(interval: &mut Option<Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

async fn open_stream(config: &WebSocketConfig) -> Result<WsStream, WebSocketClientError> {
    let mut request = config
        .url
        .as_str()
        .into_client_request()
        .map_err(|e| WebSocketClientError::InvalidRequest(e.to_string()))?;

    for (key, value) in &config.headers {
        let name = HeaderName::from_str(key)
            .map_err(|e| WebSocketClientError::InvalidRequest(format!("{key}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| WebSocketClientError::InvalidRequest(format!("{key}: {e}")))?;
        request.headers_mut().insert(name, value);
    }

    let timeout_ms = config.reconnect_timeout_ms();
    match tokio::time::timeout(Duration::from_millis(timeout_ms), connect_async(request)).await {
        Ok(Ok((stream, _response))) => Ok(stream),
        Ok(Err(e)) => Err(WebSocketClientError::Connect(e.to_string())),
        Err(_) => Err(WebSocketClientError::Timeout(timeout_ms)),
    }
}
