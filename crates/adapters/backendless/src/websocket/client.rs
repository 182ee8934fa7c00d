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

//! Realtime WebSocket client for Backendless.
//!
//! A single connection per application multiplexes every channel subscription and method call.
//! Subscriptions opened before the connection exists are queued and sent once it is established,
//! and all open subscriptions are restored after the transport reconnects. When the transport
//! gives up reconnecting, every subscription is dropped and its sink receives a transport fault.

use std::{
    fmt::Debug,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicU8, AtomicU64, Ordering},
    },
    time::Duration,
};

use arc_swap::ArcSwap;
use backendless_network::{
    http::USER_AGENT,
    mode::ConnectionMode,
    websocket::{WebSocketClient, WebSocketConfig, channel_message_handler},
};
use dashmap::DashMap;
use serde_json::{Map, Value};
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use super::{
    error::{BackendlessWsError, BackendlessWsResult},
    handler::{HandlerCommand, RtFeedHandler},
    messages::{RtMethodRequest, RtSubscriptionRequest, RtSubscriptionResult, RtWsMessage},
};
use crate::{
    common::{
        consts::{BACKENDLESS_USER_AGENT, DEFAULT_RT_CONNECT_TIMEOUT_SECS, DEFAULT_RT_METHOD_TIMEOUT_SECS},
        enums::{RtMethodName, RtSubscriptionName},
        urls::build_rt_url,
    },
    config::BackendlessConfig,
    error::Fault,
};

const DISCONNECT_TIMEOUT_SECS: u64 = 5;

/// Callback receiving every result of a subscription.
///
/// An `Err` result means the server rejected or closed the subscription, it receives no further
/// results afterwards.
pub type SubscriptionSink = Arc<dyn Fn(Result<Value, Fault>) + Send + Sync>;

#[derive(Clone)]
struct SubscriptionEntry {
    request: RtSubscriptionRequest,
    sink: SubscriptionSink,
}

type PendingMethods = DashMap<String, oneshot::Sender<Result<Value, Fault>>>;

/// WebSocket client for the Backendless realtime API.
///
/// Cloning the client yields a handle to the same connection.
#[derive(Clone)]
pub struct BackendlessRtClient {
    url: String,
    heartbeat: Option<u64>,
    method_timeout: Duration,
    connect_timeout: Duration,
    reconnect_delay_initial_ms: Option<u64>,
    reconnect_delay_max_ms: Option<u64>,
    reconnect_max_attempts: Option<u32>,
    signal: Arc<AtomicBool>,
    shutdown: Arc<AtomicBool>,
    connection_mode: Arc<ArcSwap<AtomicU8>>,
    cmd_tx: Arc<Mutex<Option<mpsc::UnboundedSender<HandlerCommand>>>>,
    subscriptions: Arc<DashMap<String, SubscriptionEntry>>,
    waiting: Arc<Mutex<Vec<String>>>,
    pending_methods: Arc<PendingMethods>,
    connect_lock: Arc<tokio::sync::Mutex<()>>,
    connect_attempts: Arc<AtomicU64>,
    task_handle: Arc<Mutex<Option<tokio::task::JoinHandle<()>>>>,
}

impl Debug for BackendlessRtClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The query string carries the API key
        let endpoint = self.url.split('?').next().unwrap_or_default();
        f.debug_struct(stringify!(BackendlessRtClient))
            .field("url", &endpoint)
            .field("connection_mode", &self.connection_mode())
            .field("subscriptions", &self.subscriptions.len())
            .field("shutdown", &self.is_shutdown())
            .finish_non_exhaustive()
    }
}

impl BackendlessRtClient {
    /// Creates a new [`BackendlessRtClient`] instance for the realtime server at `rt_base_url`.
    ///
    /// The client does not connect until [`Self::connect`] is called or a method is invoked.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration has no application credentials.
    pub fn new(rt_base_url: &str, config: &BackendlessConfig) -> BackendlessWsResult<Self> {
        let credential = config
            .credential()
            .map_err(|e| BackendlessWsError::ClientError(e.to_string()))?;
        let client_id = Uuid::new_v4().to_string();
        let url = build_rt_url(
            rt_base_url,
            credential.app_id(),
            credential.api_key(),
            &client_id,
        );

        Ok(Self {
            url,
            heartbeat: config.heartbeat_interval_secs,
            method_timeout: Duration::from_secs(
                config
                    .rt_method_timeout_secs
                    .unwrap_or(DEFAULT_RT_METHOD_TIMEOUT_SECS),
            ),
            connect_timeout: Duration::from_secs(
                config
                    .rt_connect_timeout_secs
                    .unwrap_or(DEFAULT_RT_CONNECT_TIMEOUT_SECS),
            ),
            reconnect_delay_initial_ms: config.reconnect_delay_initial_ms,
            reconnect_delay_max_ms: config.reconnect_delay_max_ms,
            reconnect_max_attempts: config.reconnect_max_attempts,
            signal: Arc::new(AtomicBool::new(false)),
            shutdown: Arc::new(AtomicBool::new(false)),
            connection_mode: Arc::new(ArcSwap::from_pointee(AtomicU8::new(
                ConnectionMode::Closed.as_u8(),
            ))),
            cmd_tx: Arc::new(Mutex::new(None)),
            subscriptions: Arc::new(DashMap::new()),
            waiting: Arc::new(Mutex::new(Vec::new())),
            pending_methods: Arc::new(DashMap::new()),
            connect_lock: Arc::new(tokio::sync::Mutex::new(())),
            connect_attempts: Arc::new(AtomicU64::new(0)),
            task_handle: Arc::new(Mutex::new(None)),
        })
    }

    /// Returns the current connection mode.
    #[must_use]
    pub fn connection_mode(&self) -> ConnectionMode {
        ConnectionMode::from_atomic(&self.connection_mode.load())
    }

    /// Returns `true` if the WebSocket is connected.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.connection_mode().is_active()
    }

    /// Returns `true` if [`Self::close`] was called.
    #[must_use]
    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }

    /// Returns how many times a new connection was opened.
    #[must_use]
    pub fn connection_attempts(&self) -> u64 {
        self.connect_attempts.load(Ordering::Relaxed)
    }

    /// Returns the timeout waiting for a channel connection to be confirmed.
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Returns the number of open subscriptions, including queued ones.
    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Connects to the realtime server.
    ///
    /// Does nothing while a connection is active or reconnecting, so concurrent callers share a
    /// single connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the client is shut down or the connection cannot be established.
    ///
    /// # Panics
    ///
    /// Panics if an internal lock is poisoned.
    pub async fn connect(&self) -> BackendlessWsResult<()> {
        if self.is_shutdown() {
            return Err(BackendlessWsError::Shutdown);
        }

        let _guard = self.connect_lock.lock().await;

        let mode = self.connection_mode();
        if mode.is_active() || mode.is_reconnect() {
            return Ok(());
        }

        self.connect_attempts.fetch_add(1, Ordering::Relaxed);
        self.signal.store(false, Ordering::Relaxed);

        let (message_handler, raw_rx) = channel_message_handler();

        let config = WebSocketConfig {
            url: self.url.clone(),
            headers: vec![(USER_AGENT.to_string(), BACKENDLESS_USER_AGENT.to_string())],
            heartbeat: self.heartbeat,
            heartbeat_msg: None,
            reconnect_timeout_ms: Some(self.connect_timeout.as_millis() as u64),
            reconnect_delay_initial_ms: self.reconnect_delay_initial_ms,
            reconnect_delay_max_ms: self.reconnect_delay_max_ms,
            reconnect_backoff_factor: None,
            reconnect_jitter_ms: None,
            reconnect_max_attempts: self.reconnect_max_attempts,
        };

        tracing::info!("Connecting to Backendless realtime server");

        let ws_client =
            tokio::time::timeout(self.connect_timeout, WebSocketClient::connect(config, message_handler))
                .await
                .map_err(|_| {
                    BackendlessWsError::Timeout(format!(
                        "Connection not established after {:?}",
                        self.connect_timeout
                    ))
                })?
                .map_err(|e| BackendlessWsError::Transport(e.to_string()))?;

        self.connection_mode
            .store(ws_client.connection_mode_atomic());

        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let mut handler = RtFeedHandler::new(self.signal.clone(), cmd_rx, raw_rx);

        if cmd_tx.send(HandlerCommand::SetClient(ws_client)).is_err() {
            return Err(BackendlessWsError::NotConnected);
        }

        let subscriptions = self.subscriptions.clone();
        let pending_methods = self.pending_methods.clone();
        let waiting = self.waiting.clone();
        let cmd_slot = self.cmd_tx.clone();
        let task_cmd_tx = cmd_tx.clone();

        let task_handle = tokio::spawn(async move {
            loop {
                match handler.next().await {
                    Some(RtWsMessage::SubscriptionResult(result)) => {
                        route_subscription_result(&subscriptions, result);
                    }
                    Some(RtWsMessage::MethodResult(result)) => {
                        if let Some((_, tx)) = pending_methods.remove(&result.id) {
                            let _ = tx.send(result.into_result());
                        } else {
                            tracing::debug!("Method result for unknown request {}", result.id);
                        }
                    }
                    Some(RtWsMessage::MethodSendFailed { id, error }) => {
                        if let Some((_, tx)) = pending_methods.remove(&id) {
                            let _ = tx.send(Err(Fault::transport(error)));
                        }
                    }
                    Some(RtWsMessage::Reconnected) => {
                        tracing::info!("Reconnected, restoring {} subscription(s)", subscriptions.len());

                        let requests: Vec<RtSubscriptionRequest> = subscriptions
                            .iter()
                            .map(|entry| entry.request.clone())
                            .collect();
                        for request in requests {
                            let _ = task_cmd_tx.send(HandlerCommand::Subscribe(request));
                        }

                        // SAFETY: Lock poisoning indicates a panic in another thread, which is fatal
                        waiting.lock().expect("Lock poisoned").clear();
                    }
                    Some(RtWsMessage::Closed) => {
                        tracing::warn!("Realtime connection closed, failing open subscriptions");
                        fail_pending_methods(&pending_methods, "Connection closed");

                        // SAFETY: Lock poisoning indicates a panic in another thread, which is fatal
                        cmd_slot.lock().expect("Lock poisoned").take();
                        fail_subscriptions(&subscriptions, &waiting, "Realtime connection closed");
                        break;
                    }
                    None => {
                        tracing::debug!("Realtime handler stopped");
                        break;
                    }
                }
            }
        });

        {
            // SAFETY: Lock poisoning indicates a panic in another thread, which is fatal
            let mut slot = self.cmd_tx.lock().expect("Lock poisoned");
            *slot = Some(cmd_tx);
            flush_waiting(slot.as_ref(), &self.subscriptions, &self.waiting);
        }

        // SAFETY: Lock poisoning indicates a panic in another thread, which is fatal
        let previous = self
            .task_handle
            .lock()
            .expect("Lock poisoned")
            .replace(task_handle);
        if let Some(previous) = previous {
            previous.abort();
        }

        tracing::info!("Connected to Backendless realtime server");
        Ok(())
    }

    /// Opens a subscription, returning its id.
    ///
    /// While disconnected the subscription is queued and sent on the next connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the client is shut down.
    ///
    /// # Panics
    ///
    /// Panics if an internal lock is poisoned.
    pub fn subscribe(
        &self,
        name: RtSubscriptionName,
        options: Map<String, Value>,
        sink: SubscriptionSink,
    ) -> BackendlessWsResult<String> {
        if self.is_shutdown() {
            return Err(BackendlessWsError::Shutdown);
        }

        let id = Uuid::new_v4().to_string();
        let request = RtSubscriptionRequest {
            id: id.clone(),
            name,
            options,
        };

        self.subscriptions.insert(
            id.clone(),
            SubscriptionEntry {
                request: request.clone(),
                sink,
            },
        );

        // SAFETY: Lock poisoning indicates a panic in another thread, which is fatal
        let slot = self.cmd_tx.lock().expect("Lock poisoned");
        let sent = slot
            .as_ref()
            .is_some_and(|tx| tx.send(HandlerCommand::Subscribe(request)).is_ok());

        if !sent {
            tracing::debug!("Queueing {name} subscription {id} until connected");
            // SAFETY: Lock poisoning indicates a panic in another thread, which is fatal
            self.waiting.lock().expect("Lock poisoned").push(id.clone());
        }

        Ok(id)
    }

    /// Closes a subscription, the sink receives no further results.
    ///
    /// Returns `false` if the subscription was unknown.
    ///
    /// # Panics
    ///
    /// Panics if an internal lock is poisoned.
    pub fn unsubscribe(&self, id: &str) -> bool {
        if self.subscriptions.remove(id).is_none() {
            return false;
        }

        // SAFETY: Lock poisoning indicates a panic in another thread, which is fatal
        let slot = self.cmd_tx.lock().expect("Lock poisoned");

        // SAFETY: Lock poisoning indicates a panic in another thread, which is fatal
        let mut waiting = self.waiting.lock().expect("Lock poisoned");
        let was_waiting = waiting.iter().any(|waiting_id| waiting_id == id);
        waiting.retain(|waiting_id| waiting_id != id);

        if !was_waiting && let Some(tx) = slot.as_ref() {
            let _ = tx.send(HandlerCommand::Unsubscribe { id: id.to_string() });
        }

        true
    }

    /// Sends every queued subscription if the client is connected.
    ///
    /// # Panics
    ///
    /// Panics if an internal lock is poisoned.
    pub fn subscribe_for_waiting(&self) {
        // SAFETY: Lock poisoning indicates a panic in another thread, which is fatal
        let slot = self.cmd_tx.lock().expect("Lock poisoned");
        flush_waiting(slot.as_ref(), &self.subscriptions, &self.waiting);
    }

    /// Invokes a realtime method and waits for its result.
    ///
    /// Connects first when needed.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The client is shut down or cannot connect.
    /// - The server answers with an error.
    /// - No result arrives within the method timeout.
    ///
    /// # Panics
    ///
    /// Panics if an internal lock is poisoned.
    pub async fn invoke(
        &self,
        method: RtMethodName,
        options: Map<String, Value>,
    ) -> BackendlessWsResult<Value> {
        self.connect().await?;

        let id = Uuid::new_v4().to_string();
        let (tx, rx) = oneshot::channel();
        self.pending_methods.insert(id.clone(), tx);

        let request = RtMethodRequest {
            id: id.clone(),
            name: method,
            options,
        };

        let sent = {
            // SAFETY: Lock poisoning indicates a panic in another thread, which is fatal
            let slot = self.cmd_tx.lock().expect("Lock poisoned");
            slot.as_ref()
                .is_some_and(|cmd_tx| cmd_tx.send(HandlerCommand::Invoke(request)).is_ok())
        };

        if !sent {
            self.pending_methods.remove(&id);
            return Err(BackendlessWsError::NotConnected);
        }

        match tokio::time::timeout(self.method_timeout, rx).await {
            Ok(Ok(result)) => result.map_err(BackendlessWsError::Fault),
            Ok(Err(_)) => Err(BackendlessWsError::Transport(
                "Method result channel closed".to_string(),
            )),
            Err(_) => {
                self.pending_methods.remove(&id);
                Err(BackendlessWsError::Timeout(format!(
                    "No result for {method} after {:?}",
                    self.method_timeout
                )))
            }
        }
    }

    /// Disconnects from the server.
    ///
    /// Open subscriptions are kept and queued for the next connection. Pending method calls fail.
    ///
    /// # Panics
    ///
    /// Panics if an internal lock is poisoned.
    pub async fn disconnect(&self) {
        tracing::info!("Disconnecting from Backendless realtime server");

        {
            // SAFETY: Lock poisoning indicates a panic in another thread, which is fatal
            let mut slot = self.cmd_tx.lock().expect("Lock poisoned");
            if let Some(tx) = slot.take() {
                let _ = tx.send(HandlerCommand::Disconnect);
            }
            queue_all(&self.subscriptions, &self.waiting);
        }

        self.signal.store(true, Ordering::Relaxed);
        fail_pending_methods(&self.pending_methods, "Client disconnected");

        // SAFETY: Lock poisoning indicates a panic in another thread, which is fatal
        let task_handle = self.task_handle.lock().expect("Lock poisoned").take();
        if let Some(handle) = task_handle {
            let timeout = Duration::from_secs(DISCONNECT_TIMEOUT_SECS);
            if tokio::time::timeout(timeout, handle).await.is_err() {
                tracing::warn!("Timeout waiting for realtime task to finish");
            }
        }

        self.connection_mode
            .store(Arc::new(AtomicU8::new(ConnectionMode::Closed.as_u8())));
    }

    /// Disconnects and shuts the client down, dropping every subscription.
    ///
    /// # Panics
    ///
    /// Panics if an internal lock is poisoned.
    pub async fn close(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
        self.disconnect().await;
        self.subscriptions.clear();
        // SAFETY: Lock poisoning indicates a panic in another thread, which is fatal
        self.waiting.lock().expect("Lock poisoned").clear();
    }
}

fn route_subscription_result(
    subscriptions: &DashMap<String, SubscriptionEntry>,
    result: RtSubscriptionResult,
) {
    let id = result.id.clone();
    let result = result.into_result();

    // Sinks may call back into the client, so no map reference is held while they run
    let sink = if result.is_err() {
        subscriptions.remove(&id).map(|(_, entry)| entry.sink)
    } else {
        subscriptions.get(&id).map(|entry| entry.sink.clone())
    };

    match sink {
        Some(sink) => sink(result),
        None => tracing::debug!("Result for unknown subscription {id}"),
    }
}

fn flush_waiting(
    cmd_tx: Option<&mpsc::UnboundedSender<HandlerCommand>>,
    subscriptions: &DashMap<String, SubscriptionEntry>,
    waiting: &Mutex<Vec<String>>,
) {
    let Some(cmd_tx) = cmd_tx else {
        return;
    };

    // SAFETY: Lock poisoning indicates a panic in another thread, which is fatal
    let ids: Vec<String> = waiting.lock().expect("Lock poisoned").drain(..).collect();
    for id in ids {
        let Some(request) = subscriptions.get(&id).map(|entry| entry.request.clone()) else {
            continue;
        };
        if cmd_tx.send(HandlerCommand::Subscribe(request)).is_err() {
            tracing::error!("Failed to send queued subscription {id}");
        }
    }
}

fn queue_all(subscriptions: &DashMap<String, SubscriptionEntry>, waiting: &Mutex<Vec<String>>) {
    // SAFETY: Lock poisoning indicates a panic in another thread, which is fatal
    let mut waiting = waiting.lock().expect("Lock poisoned");
    waiting.clear();
    waiting.extend(subscriptions.iter().map(|entry| entry.key().clone()));
}

/// Drops every subscription, handing `reason` to its sink as a transport fault.
fn fail_subscriptions(
    subscriptions: &DashMap<String, SubscriptionEntry>,
    waiting: &Mutex<Vec<String>>,
    reason: &str,
) {
    // SAFETY: Lock poisoning indicates a panic in another thread, which is fatal
    waiting.lock().expect("Lock poisoned").clear();

    let ids: Vec<String> = subscriptions
        .iter()
        .map(|entry| entry.key().clone())
        .collect();
    let sinks: Vec<SubscriptionSink> = ids
        .iter()
        .filter_map(|id| subscriptions.remove(id).map(|(_, entry)| entry.sink))
        .collect();

    for sink in sinks {
        sink(Err(Fault::transport(reason)));
    }
}

fn fail_pending_methods(pending_methods: &PendingMethods, reason: &str) {
    let ids: Vec<String> = pending_methods
        .iter()
        .map(|entry| entry.key().clone())
        .collect();
    for id in ids {
        if let Some((_, tx)) = pending_methods.remove(&id) {
            let _ = tx.send(Err(Fault::transport(reason)));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn client() -> BackendlessRtClient {
        let config = BackendlessConfig::with_credentials("app", "secret-api-key");
        BackendlessRtClient::new("http://127.0.0.1:1", &config).unwrap()
    }

    fn counting_sink() -> (SubscriptionSink, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        let sink: SubscriptionSink = Arc::new(move |_| {
            count_clone.fetch_add(1, Ordering::Relaxed);
        });
        (sink, count)
    }

    #[rstest]
    fn test_new_requires_credentials() {
        let result = BackendlessRtClient::new("http://127.0.0.1:1", &BackendlessConfig::new());
        assert!(matches!(result, Err(BackendlessWsError::ClientError(_))));
    }

    #[rstest]
    fn test_debug_hides_api_key() {
        let client = client();
        let debug = format!("{client:?}");

        assert!(debug.contains("ws://127.0.0.1:1/app"));
        assert!(!debug.contains("secret-api-key"));
    }

    #[rstest]
    fn test_initial_state() {
        let client = client();

        assert!(!client.is_active());
        assert!(client.connection_mode().is_closed());
        assert_eq!(client.connection_attempts(), 0);
    }

    #[rstest]
    fn test_subscribe_while_disconnected_is_queued() {
        let client = client();
        let (sink, _) = counting_sink();

        let id = client
            .subscribe(RtSubscriptionName::PubSubConnect, Map::new(), sink)
            .unwrap();

        assert_eq!(client.subscription_count(), 1);
        assert_eq!(*client.waiting.lock().unwrap(), vec![id.clone()]);

        assert!(client.unsubscribe(&id));
        assert!(!client.unsubscribe(&id));
        assert!(client.waiting.lock().unwrap().is_empty());
        assert_eq!(client.subscription_count(), 0);
    }

    #[rstest]
    fn test_route_subscription_result() {
        let client = client();
        let (sink, count) = counting_sink();
        let id = client
            .subscribe(RtSubscriptionName::PubSubMessages, Map::new(), sink)
            .unwrap();

        let data: RtSubscriptionResult =
            serde_json::from_value(json!({"id": id, "data": {"message": "hi"}})).unwrap();
        route_subscription_result(&client.subscriptions, data);
        assert_eq!(count.load(Ordering::Relaxed), 1);
        assert_eq!(client.subscription_count(), 1);

        let error: RtSubscriptionResult = serde_json::from_value(
            json!({"id": id, "error": {"code": 5000, "message": "not allowed"}}),
        )
        .unwrap();
        route_subscription_result(&client.subscriptions, error);
        assert_eq!(count.load(Ordering::Relaxed), 2);
        assert_eq!(client.subscription_count(), 0);
    }

    #[rstest]
    fn test_lost_connection_fails_every_subscription() {
        let client = client();
        let faults = Arc::new(Mutex::new(Vec::new()));
        let faults_clone = faults.clone();
        let sink: SubscriptionSink = Arc::new(move |result: Result<Value, Fault>| {
            faults_clone.lock().unwrap().push(result.unwrap_err());
        });
        client
            .subscribe(RtSubscriptionName::PubSubConnect, Map::new(), sink.clone())
            .unwrap();
        client
            .subscribe(RtSubscriptionName::PubSubMessages, Map::new(), sink)
            .unwrap();

        fail_subscriptions(&client.subscriptions, &client.waiting, "closed");

        let faults = faults.lock().unwrap();
        assert_eq!(faults.len(), 2);
        assert!(faults.iter().all(|fault| fault.kind == crate::error::FaultKind::Transport));
        assert_eq!(client.subscription_count(), 0);
        assert!(client.waiting.lock().unwrap().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn test_closed_client_rejects_calls() {
        let client = client();
        client.close().await;

        assert!(client.is_shutdown());
        assert!(matches!(
            client.connect().await,
            Err(BackendlessWsError::Shutdown)
        ));
        assert!(matches!(
            client.invoke(RtMethodName::PubSubCommand, Map::new()).await,
            Err(BackendlessWsError::Shutdown)
        ));
        let (sink, _) = counting_sink();
        assert!(matches!(
            client.subscribe(RtSubscriptionName::PubSubConnect, Map::new(), sink),
            Err(BackendlessWsError::Shutdown)
        ));
    }

    #[rstest]
    #[tokio::test]
    async fn test_connect_failure_is_transport_error() {
        let mut config = BackendlessConfig::with_credentials("app", "key");
        config.rt_connect_timeout_secs = Some(2);
        let client = BackendlessRtClient::new("http://127.0.0.1:1", &config).unwrap();

        let err = client.connect().await.unwrap_err();

        assert!(matches!(
            err,
            BackendlessWsError::Transport(_) | BackendlessWsError::Timeout(_)
        ));
        assert!(!client.is_active());
    }
}
