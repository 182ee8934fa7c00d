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

//! WebSocket message handler for the Backendless realtime API.
//!
//! The handler runs in a dedicated Tokio task as the I/O boundary between the client
//! orchestrator and the network layer. It exclusively owns the `WebSocketClient` and
//! processes commands from the client via an unbounded channel.

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use backendless_network::websocket::WebSocketClient;
use serde::Serialize;
use tokio_tungstenite::tungstenite::Message;

use super::{
    error::{BackendlessWsError, BackendlessWsResult},
    messages::{
        RtFrame, RtMethodRequest, RtSubscriptionRequest, RtUnsubscribeRequest, RtWsMessage,
        parse_raw_message,
    },
};
use crate::common::enums::RtEvent;

const STOP_SIGNAL_POLL_MS: u64 = 100;

/// Commands sent from the client to the handler.
#[allow(missing_debug_implementations)]
pub enum HandlerCommand {
    /// Set the active WebSocket client.
    SetClient(WebSocketClient),
    /// Disconnect the WebSocket.
    Disconnect,
    /// Open a subscription.
    Subscribe(RtSubscriptionRequest),
    /// Close a subscription.
    Unsubscribe { id: String },
    /// Invoke a method.
    Invoke(RtMethodRequest),
}

/// Backendless realtime feed handler.
///
/// Runs in a dedicated Tokio task, processing commands and raw WebSocket messages.
#[allow(missing_debug_implementations)]
pub struct RtFeedHandler {
    signal: Arc<AtomicBool>,
    inner: Option<WebSocketClient>,
    cmd_rx: tokio::sync::mpsc::UnboundedReceiver<HandlerCommand>,
    raw_rx: tokio::sync::mpsc::UnboundedReceiver<Message>,
}

impl RtFeedHandler {
    /// Creates a new feed handler.
    #[must_use]
    pub fn new(
        signal: Arc<AtomicBool>,
        cmd_rx: tokio::sync::mpsc::UnboundedReceiver<HandlerCommand>,
        raw_rx: tokio::sync::mpsc::UnboundedReceiver<Message>,
    ) -> Self {
        Self {
            signal,
            inner: None,
            cmd_rx,
            raw_rx,
        }
    }

    /// Sends a frame over the WebSocket.
    async fn send_frame<T: Serialize>(&self, event: RtEvent, data: &T) -> BackendlessWsResult<()> {
        let Some(client) = &self.inner else {
            return Err(BackendlessWsError::NotConnected);
        };

        let payload = serde_json::to_string(&RtFrame { event, data })?;
        tracing::trace!("Sending {payload}");

        client
            .send_text(payload)
            .await
            .map_err(|e| BackendlessWsError::Send(e.to_string()))
    }

    /// Processes a command from the client.
    ///
    /// Returns a message for the client when the command failed in a way it must observe.
    async fn process_command(&mut self, cmd: HandlerCommand) -> Option<RtWsMessage> {
        match cmd {
            HandlerCommand::SetClient(client) => {
                tracing::debug!("Setting WebSocket client");
                self.inner = Some(client);
            }
            HandlerCommand::Disconnect => {
                tracing::debug!("Disconnecting WebSocket");
                if let Some(client) = self.inner.take() {
                    client.disconnect().await;
                }
            }
            HandlerCommand::Subscribe(request) => {
                tracing::debug!("Subscribing {} ({})", request.name, request.id);
                if let Err(e) = self.send_frame(RtEvent::SubOn, &request).await {
                    tracing::error!("Subscribe failed: {e}");
                }
            }
            HandlerCommand::Unsubscribe { id } => {
                tracing::debug!("Unsubscribing {id}");
                let request = RtUnsubscribeRequest { id };
                if let Err(e) = self.send_frame(RtEvent::SubOff, &request).await {
                    tracing::error!("Unsubscribe failed: {e}");
                }
            }
            HandlerCommand::Invoke(request) => {
                tracing::debug!("Invoking {} ({})", request.name, request.id);
                if let Err(e) = self.send_frame(RtEvent::MetReq, &request).await {
                    tracing::error!("Invoke failed: {e}");
                    return Some(RtWsMessage::MethodSendFailed {
                        id: request.id,
                        error: e.to_string(),
                    });
                }
            }
        }
        None
    }

    /// Processes a raw text frame.
    fn process_raw_message(&self, text: &str) -> Option<RtWsMessage> {
        match parse_raw_message(text) {
            Ok(RtWsMessage::Reconnected) => {
                tracing::info!("Received reconnection signal");
                Some(RtWsMessage::Reconnected)
            }
            Ok(msg) => Some(msg),
            Err(e) => {
                tracing::warn!("Failed to parse message: {e}");
                None
            }
        }
    }

    /// Main message processing loop.
    ///
    /// Returns `None` when the handler should stop.
    pub async fn next(&mut self) -> Option<RtWsMessage> {
        loop {
            tokio::select! {
                Some(cmd) = self.cmd_rx.recv() => {
                    if let Some(msg) = self.process_command(cmd).await {
                        return Some(msg);
                    }
                }
                Some(msg) = self.raw_rx.recv() => {
                    match msg {
                        Message::Text(text) => {
                            if let Some(msg) = self.process_raw_message(&text) {
                                return Some(msg);
                            }
                        }
                        Message::Ping(data) => {
                            if let Some(client) = &self.inner {
                                let _ = client.send_pong(data.to_vec()).await;
                            }
                        }
                        Message::Close(_) => {
                            tracing::info!("Realtime connection closed");
                            self.inner = None;
                            return Some(RtWsMessage::Closed);
                        }
                        _ => {}
                    }
                }
                () = tokio::time::sleep(Duration::from_millis(STOP_SIGNAL_POLL_MS)) => {
                    if self.signal.load(Ordering::Relaxed) {
                        tracing::debug!("Stop signal received");
                        if let Some(client) = self.inner.take() {
                            client.disconnect().await;
                        }
                        return None;
                    }
                }
            }
        }
    }
}
