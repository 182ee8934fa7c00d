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

//! Integration tests for Backendless realtime channels using a mock Axum server.

use std::{
    net::SocketAddr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{
    Router,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use backendless_network::testing::wait_until_async;
use backendless_sdk::{
    BackendlessClient, Fault, FaultKind,
    config::BackendlessConfig,
    geofence::LocationCapability,
    messaging::{CommandObject, UserStatus},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::sync::broadcast;

const APP_ID: &str = "test-app";
const API_KEY: &str = "test-key";
const FORBIDDEN_CHANNEL: &str = "forbidden";

// ------------------------------------------------------------------------------------------------
// Test Server State
// ------------------------------------------------------------------------------------------------

#[derive(Clone, Debug)]
struct MessageSubscription {
    connection: usize,
    id: String,
    selector: Option<String>,
}

#[derive(Clone)]
struct TestServerState {
    connection_count: Arc<AtomicUsize>,
    connect_subscriptions: Arc<AtomicUsize>,
    message_subscriptions: Arc<tokio::sync::Mutex<Vec<MessageSubscription>>>,
    unsubscriptions: Arc<tokio::sync::Mutex<Vec<String>>>,
    commands: Arc<tokio::sync::Mutex<Vec<Value>>>,
    delivered_messages: Arc<AtomicUsize>,
    disconnect_trigger: Arc<AtomicBool>,
    close_channels_trigger: Arc<AtomicBool>,
    refuse_upgrades: Arc<AtomicBool>,
    ignore_unsubscribe: Arc<AtomicBool>,
    publish_tx: broadcast::Sender<(Value, Option<String>)>,
}

impl TestServerState {
    fn new() -> Self {
        let (publish_tx, _) = broadcast::channel(64);
        Self {
            connection_count: Arc::new(AtomicUsize::new(0)),
            connect_subscriptions: Arc::new(AtomicUsize::new(0)),
            message_subscriptions: Arc::new(tokio::sync::Mutex::new(Vec::new())),
            unsubscriptions: Arc::new(tokio::sync::Mutex::new(Vec::new())),
            commands: Arc::new(tokio::sync::Mutex::new(Vec::new())),
            delivered_messages: Arc::new(AtomicUsize::new(0)),
            disconnect_trigger: Arc::new(AtomicBool::new(false)),
            close_channels_trigger: Arc::new(AtomicBool::new(false)),
            refuse_upgrades: Arc::new(AtomicBool::new(false)),
            ignore_unsubscribe: Arc::new(AtomicBool::new(false)),
            publish_tx,
        }
    }

    fn publish(&self, message: Value, selector: Option<&str>) {
        let _ = self
            .publish_tx
            .send((message, selector.map(ToString::to_string)));
    }

    async fn message_subscription_count(&self, connection: Option<usize>) -> usize {
        self.message_subscriptions
            .lock()
            .await
            .iter()
            .filter(|sub| connection.is_none_or(|c| sub.connection == c))
            .count()
    }
}

// ------------------------------------------------------------------------------------------------
// Mock WebSocket Handler
// ------------------------------------------------------------------------------------------------

async fn handle_ws_upgrade(
    ws: WebSocketUpgrade,
    State(state): State<TestServerState>,
) -> Response {
    if state.refuse_upgrades.load(Ordering::SeqCst) {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn send_frame(socket: &mut WebSocket, event: &str, data: Value) -> bool {
    let frame = json!({"event": event, "data": data});
    socket
        .send(Message::Text(frame.to_string().into()))
        .await
        .is_ok()
}

async fn handle_socket(mut socket: WebSocket, state: TestServerState) {
    let connection = state.connection_count.fetch_add(1, Ordering::SeqCst) + 1;
    let mut publish_rx = state.publish_tx.subscribe();
    let mut message_subs: Vec<(String, Option<String>)> = Vec::new();
    let mut command_subs: Vec<String> = Vec::new();
    let mut connect_subs: Vec<String> = Vec::new();
    let mut check = tokio::time::interval(Duration::from_millis(20));

    loop {
        tokio::select! {
            message = socket.recv() => {
                let Some(Ok(message)) = message else { break };
                let Message::Text(text) = message else { continue };
                let Ok(frame) = serde_json::from_str::<Value>(text.as_str()) else { continue };

                let event = frame["event"].as_str().unwrap_or_default().to_string();
                let data = frame["data"].clone();
                let id = data["id"].as_str().unwrap_or_default().to_string();
                let name = data["name"].as_str().unwrap_or_default().to_string();
                let options = data["options"].clone();

                match (event.as_str(), name.as_str()) {
                    ("SUB_ON", "PUB_SUB_CONNECT") => {
                        state.connect_subscriptions.fetch_add(1, Ordering::SeqCst);
                        let response = if options["channel"] == FORBIDDEN_CHANNEL {
                            json!({"id": id, "error": {"code": 403, "message": "Channel not allowed"}})
                        } else {
                            connect_subs.push(id.clone());
                            json!({"id": id, "data": {"connected": true}})
                        };
                        send_frame(&mut socket, "SUB_RES", response).await;
                    }
                    ("SUB_ON", "PUB_SUB_MESSAGES") => {
                        let selector = options["selector"].as_str().map(ToString::to_string);
                        message_subs.push((id.clone(), selector.clone()));
                        state.message_subscriptions.lock().await.push(MessageSubscription {
                            connection,
                            id,
                            selector,
                        });
                    }
                    ("SUB_ON", "PUB_SUB_COMMANDS") => command_subs.push(id),
                    ("SUB_ON", "PUB_SUB_USERS") => {
                        let status = json!({
                            "id": id,
                            "data": {"status": "LISTING", "data": [{"connectionId": "c1", "userId": "u1"}]},
                        });
                        send_frame(&mut socket, "SUB_RES", status).await;
                    }
                    ("SUB_OFF", _) if state.ignore_unsubscribe.load(Ordering::SeqCst) => {
                        state.unsubscriptions.lock().await.push(id);
                    }
                    ("SUB_OFF", _) => {
                        connect_subs.retain(|sub_id| sub_id != &id);
                        message_subs.retain(|(sub_id, _)| sub_id != &id);
                        command_subs.retain(|sub_id| sub_id != &id);
                        state.message_subscriptions.lock().await.retain(|sub| sub.id != id);
                        state.unsubscriptions.lock().await.push(id);
                    }
                    ("MET_REQ", "PUB_SUB_COMMAND") => {
                        state.commands.lock().await.push(options.clone());
                        let response = if options["type"] == "fail" {
                            json!({"id": id, "error": {"code": 5010, "message": "Command rejected"}})
                        } else {
                            json!({"id": id, "result": null})
                        };
                        send_frame(&mut socket, "MET_RES", response).await;

                        for sub_id in command_subs.clone() {
                            let command = json!({
                                "id": sub_id,
                                "data": {
                                    "type": options["type"],
                                    "connectionId": "c1",
                                    "data": options.get("data").cloned().unwrap_or(Value::Null),
                                },
                            });
                            send_frame(&mut socket, "SUB_RES", command).await;
                        }
                    }
                    _ => {}
                }
            }
            published = publish_rx.recv() => {
                let Ok((message, selector)) = published else { continue };
                for (sub_id, sub_selector) in message_subs.clone() {
                    if sub_selector.is_some() && sub_selector != selector {
                        continue;
                    }
                    let info = json!({
                        "id": sub_id,
                        "data": {
                            "messageId": "m1",
                            "publisherId": "server",
                            "timestamp": 1_700_000_000_000_i64,
                            "headers": {},
                            "message": message,
                        },
                    });
                    if send_frame(&mut socket, "SUB_RES", info).await {
                        state.delivered_messages.fetch_add(1, Ordering::SeqCst);
                    }
                }
            }
            _ = check.tick() => {
                if state.close_channels_trigger.swap(false, Ordering::SeqCst) {
                    for sub_id in connect_subs.drain(..) {
                        let error = json!({"id": sub_id, "error": {"code": 5001, "message": "Channel closed"}});
                        send_frame(&mut socket, "SUB_RES", error).await;
                    }
                }
                if state.disconnect_trigger.swap(false, Ordering::SeqCst) {
                    // Drop the connection without a close handshake
                    state.message_subscriptions.lock().await.retain(|sub| sub.connection != connection);
                    break;
                }
            }
        }
    }
}

async fn start_ws_server(state: TestServerState) -> SocketAddr {
    let router = Router::new()
        .route(&format!("/{APP_ID}"), get(handle_ws_upgrade))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test server");
    let addr = listener.local_addr().expect("Failed to get local addr");

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Test server failed");
    });

    addr
}

async fn setup() -> (TestServerState, BackendlessClient) {
    setup_with(|_| {}).await
}

async fn setup_with<F>(configure: F) -> (TestServerState, BackendlessClient)
where
    F: FnOnce(&mut BackendlessConfig),
{
    let state = TestServerState::new();
    let addr = start_ws_server(state.clone()).await;

    let mut config = BackendlessConfig::with_credentials(APP_ID, API_KEY);
    config.base_url_http = Some("http://127.0.0.1:1".to_string());
    config.base_url_rt = Some(format!("ws://{addr}"));
    config.rt_connect_timeout_secs = Some(5);
    config.rt_method_timeout_secs = Some(5);
    config.heartbeat_interval_secs = None;
    config.reconnect_delay_initial_ms = Some(50);
    config.reconnect_delay_max_ms = Some(100);
    configure(&mut config);

    let client = BackendlessClient::new(config, LocationCapability::Unavailable).unwrap();
    (state, client)
}

fn collector<T: Send + 'static>() -> (Arc<Mutex<Vec<T>>>, impl Fn(T) + Send + Sync + 'static) {
    let received = Arc::new(Mutex::new(Vec::new()));
    let received_clone = received.clone();
    (received, move |item: T| {
        received_clone.lock().unwrap().push(item);
    })
}

async fn wait_for_len<T>(received: &Arc<Mutex<Vec<T>>>, len: usize) {
    wait_until_async(
        || {
            let received = received.clone();
            async move { received.lock().unwrap().len() >= len }
        },
        Duration::from_secs(5),
    )
    .await;
}

async fn wait_for_message_subscriptions(state: &TestServerState, connection: Option<usize>, count: usize) {
    wait_until_async(
        || {
            let state = state.clone();
            async move { state.message_subscription_count(connection).await == count }
        },
        Duration::from_secs(5),
    )
    .await;
}

// ------------------------------------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------------------------------------

#[tokio::test]
async fn test_join_twice_opens_single_connection() {
    let (state, client) = setup().await;
    let mut channel = client.channel("chat").await.unwrap();

    channel.join().await.unwrap();
    channel.join().await.unwrap();

    assert!(channel.is_joined());
    assert_eq!(state.connection_count.load(Ordering::SeqCst), 1);
    assert_eq!(state.connect_subscriptions.load(Ordering::SeqCst), 1);

    client.close().await;
}

#[tokio::test]
async fn test_channels_share_connection() {
    let (state, client) = setup().await;
    let mut chat = client.channel("chat").await.unwrap();
    let mut news = client.channel("news").await.unwrap();

    chat.join().await.unwrap();
    news.join().await.unwrap();

    assert_eq!(state.connection_count.load(Ordering::SeqCst), 1);
    assert_eq!(state.connect_subscriptions.load(Ordering::SeqCst), 2);

    client.close().await;
}

#[tokio::test]
async fn test_connect_listener_notified_on_join() {
    let (_, client) = setup().await;
    let mut channel = client.channel("chat").await.unwrap();
    let (events, push) = collector::<Result<(), Fault>>();
    channel.add_connect_listener(push).unwrap();

    channel.join().await.unwrap();

    wait_for_len(&events, 1).await;
    assert!(events.lock().unwrap()[0].is_ok());

    client.close().await;
}

#[tokio::test]
async fn test_connect_error_reaches_connect_listener() {
    let (_, client) = setup().await;
    let mut channel = client.channel(FORBIDDEN_CHANNEL).await.unwrap();
    let (events, push) = collector::<Result<(), Fault>>();
    channel.add_connect_listener(push).unwrap();

    let fault = channel.join().await.unwrap_err();

    assert_eq!(fault.kind, FaultKind::Server);
    assert_eq!(fault.code, 403);
    assert!(!channel.is_joined());
    let events = events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].as_ref().unwrap_err().message, "Channel not allowed");
    drop(events);

    client.close().await;
}

#[tokio::test]
async fn test_selector_routing() {
    let (state, client) = setup().await;
    let mut channel = client.channel("chat").await.unwrap();
    let (all, push_all) = collector::<Result<String, Fault>>();
    let (selected, push_selected) = collector::<Result<String, Fault>>();

    // Registered before joining, subscribed once the channel connects
    channel.add_string_message_listener(push_all).unwrap();
    channel
        .add_string_message_listener_with_selector("a", push_selected)
        .unwrap();
    channel.join().await.unwrap();
    wait_for_message_subscriptions(&state, None, 2).await;

    state.publish(json!("for a"), Some("a"));
    wait_for_len(&selected, 1).await;
    wait_for_len(&all, 1).await;

    state.publish(json!("for everyone"), None);
    wait_for_len(&all, 2).await;

    let all: Vec<String> = all.lock().unwrap().iter().cloned().map(Result::unwrap).collect();
    assert_eq!(all, vec!["for a", "for everyone"]);
    let selected = selected.lock().unwrap();
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].as_deref().unwrap(), "for a");
    drop(selected);

    client.close().await;
}

#[derive(Debug, Deserialize, PartialEq)]
struct ChatMessage {
    text: String,
}

#[tokio::test]
async fn test_object_listener_deserializes_body() {
    let (state, client) = setup().await;
    let mut channel = client.channel("chat").await.unwrap();
    let (received, push) = collector::<Result<ChatMessage, Fault>>();
    channel.join().await.unwrap();

    channel.add_object_message_listener(push).unwrap();
    wait_for_message_subscriptions(&state, None, 1).await;

    state.publish(json!({"text": "hi"}), None);
    state.publish(json!(42), None);
    wait_for_len(&received, 2).await;

    let received = received.lock().unwrap();
    assert_eq!(received[0].as_ref().unwrap(), &ChatMessage { text: "hi".to_string() });
    assert_eq!(received[1].as_ref().unwrap_err().kind, FaultKind::Parse);
    drop(received);

    client.close().await;
}

#[tokio::test]
async fn test_leave_stops_delivery() {
    let (state, client) = setup().await;
    let mut channel = client.channel("chat").await.unwrap();
    channel.join().await.unwrap();
    let (received, push) = collector::<Result<String, Fault>>();
    let subscription = channel.add_string_message_listener(push).unwrap();
    wait_for_message_subscriptions(&state, None, 1).await;

    state.publish(json!("before"), None);
    wait_for_len(&received, 1).await;

    channel.leave();
    assert!(!channel.is_joined());
    assert!(!subscription.is_active());

    wait_until_async(
        || {
            let state = state.clone();
            async move { state.unsubscriptions.lock().await.len() >= 2 }
        },
        Duration::from_secs(5),
    )
    .await;

    state.publish(json!("after"), None);
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert_eq!(received.lock().unwrap().len(), 1);

    client.close().await;
}

#[tokio::test]
async fn test_cancelled_subscription_stops_delivery() {
    let (state, client) = setup().await;
    let mut channel = client.channel("chat").await.unwrap();
    channel.join().await.unwrap();
    let (kept, push_kept) = collector::<Result<String, Fault>>();
    let (cancelled, push_cancelled) = collector::<Result<String, Fault>>();
    channel.add_string_message_listener(push_kept).unwrap();
    let subscription = channel.add_string_message_listener(push_cancelled).unwrap();
    wait_for_message_subscriptions(&state, None, 1).await;

    subscription.cancel();
    state.publish(json!("hello"), None);
    wait_for_len(&kept, 1).await;
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert!(cancelled.lock().unwrap().is_empty());
    // The partition keeps its server subscription while listeners remain
    assert_eq!(state.message_subscription_count(None).await, 1);

    client.close().await;
}

#[tokio::test]
async fn test_send_command_acknowledged() {
    let (state, client) = setup().await;
    let mut channel = client.channel("chat").await.unwrap();
    channel.join().await.unwrap();
    let (commands, push) = collector::<Result<CommandObject, Fault>>();
    channel.add_command_listener(push).unwrap();

    // Wait until the command subscription reached the server
    tokio::time::sleep(Duration::from_millis(100)).await;
    channel
        .send_command("typing", &json!({"on": true}))
        .await
        .unwrap();

    let sent = state.commands.lock().await.clone();
    assert_eq!(
        sent,
        vec![json!({"channel": "chat", "type": "typing", "data": {"on": true}})]
    );

    wait_for_len(&commands, 1).await;
    let commands = commands.lock().unwrap();
    let command = commands[0].as_ref().unwrap();
    assert_eq!(command.command_type, "typing");
    assert_eq!(command.data, json!({"on": true}));
    drop(commands);

    client.close().await;
}

#[tokio::test]
async fn test_send_command_without_join() {
    let (state, client) = setup().await;
    let channel = client.channel("chat").await.unwrap();

    channel.send_command("ping", &()).await.unwrap();

    assert!(!channel.is_joined());
    let sent = state.commands.lock().await.clone();
    assert_eq!(sent, vec![json!({"channel": "chat", "type": "ping"})]);

    client.close().await;
}

#[tokio::test]
async fn test_send_command_rejected() {
    let (_, client) = setup().await;
    let channel = client.channel("chat").await.unwrap();

    let fault = channel.send_command("fail", &json!("x")).await.unwrap_err();

    assert_eq!(fault.kind, FaultKind::Server);
    assert_eq!(fault.code, 5010);
    assert_eq!(fault.message, "Command rejected");

    client.close().await;
}

#[tokio::test]
async fn test_user_status_listener() {
    let (_, client) = setup().await;
    let mut channel = client.channel("chat").await.unwrap();
    let (statuses, push) = collector::<Result<UserStatus, Fault>>();
    channel.add_user_status_listener(push).unwrap();

    channel.join().await.unwrap();
    wait_for_len(&statuses, 1).await;

    let statuses = statuses.lock().unwrap();
    let status = statuses[0].as_ref().unwrap();
    assert_eq!(status.status.to_string(), "LISTING");
    assert_eq!(status.data[0].user_id.as_deref(), Some("u1"));
    drop(statuses);

    client.close().await;
}

#[tokio::test]
async fn test_reconnect_restores_subscriptions() {
    let (state, client) = setup().await;
    let mut channel = client.channel("chat").await.unwrap();
    let (connects, push_connect) = collector::<Result<(), Fault>>();
    let (received, push) = collector::<Result<String, Fault>>();
    channel.add_connect_listener(push_connect).unwrap();
    channel.add_string_message_listener(push).unwrap();
    channel.join().await.unwrap();
    wait_for_message_subscriptions(&state, Some(1), 1).await;

    state.disconnect_trigger.store(true, Ordering::SeqCst);

    wait_until_async(
        || {
            let state = state.clone();
            async move { state.connection_count.load(Ordering::SeqCst) >= 2 }
        },
        Duration::from_secs(5),
    )
    .await;
    wait_for_message_subscriptions(&state, Some(2), 1).await;

    state.publish(json!("after reconnect"), None);
    wait_for_len(&received, 1).await;
    wait_for_len(&connects, 2).await;

    assert_eq!(state.connect_subscriptions.load(Ordering::SeqCst), 2);
    assert_eq!(
        received.lock().unwrap()[0].as_deref().unwrap(),
        "after reconnect"
    );
    let rt_client = client.rt_client().await.unwrap();
    assert_eq!(rt_client.connection_attempts(), 1);
    assert!(channel.is_joined());

    client.close().await;
}

#[tokio::test]
async fn test_messages_in_flight_after_leave_are_discarded() {
    let (state, client) = setup().await;
    let mut channel = client.channel("chat").await.unwrap();
    channel.join().await.unwrap();
    let (received, push) = collector::<Result<String, Fault>>();
    channel.add_string_message_listener(push).unwrap();
    wait_for_message_subscriptions(&state, None, 1).await;

    // The server keeps publishing to the subscription after the client left
    state.ignore_unsubscribe.store(true, Ordering::SeqCst);
    channel.leave();
    state.publish(json!("late"), None);

    wait_until_async(
        || {
            let state = state.clone();
            async move { state.delivered_messages.load(Ordering::SeqCst) == 1 }
        },
        Duration::from_secs(5),
    )
    .await;
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert!(received.lock().unwrap().is_empty());
    assert!(!channel.is_joined());

    client.close().await;
}

#[tokio::test]
async fn test_server_closing_channel_allows_rejoin() {
    let (state, client) = setup().await;
    let mut channel = client.channel("chat").await.unwrap();
    let (connects, push_connect) = collector::<Result<(), Fault>>();
    channel.add_connect_listener(push_connect).unwrap();
    channel.join().await.unwrap();

    state.close_channels_trigger.store(true, Ordering::SeqCst);
    wait_for_len(&connects, 2).await;

    assert_eq!(connects.lock().unwrap()[1].as_ref().unwrap_err().code, 5001);
    assert!(!channel.is_joined());

    channel.join().await.unwrap();

    assert!(channel.is_joined());
    assert_eq!(state.connect_subscriptions.load(Ordering::SeqCst), 2);
    assert_eq!(state.connection_count.load(Ordering::SeqCst), 1);

    client.close().await;
}

#[tokio::test]
async fn test_transport_giving_up_leaves_channel_and_allows_rejoin() {
    let (state, client) = setup_with(|config| config.reconnect_max_attempts = Some(2)).await;
    let mut channel = client.channel("chat").await.unwrap();
    let (connects, push_connect) = collector::<Result<(), Fault>>();
    let (received, push) = collector::<Result<String, Fault>>();
    channel.add_connect_listener(push_connect).unwrap();
    channel.add_string_message_listener(push).unwrap();
    channel.join().await.unwrap();
    wait_for_message_subscriptions(&state, Some(1), 1).await;

    state.refuse_upgrades.store(true, Ordering::SeqCst);
    state.disconnect_trigger.store(true, Ordering::SeqCst);
    wait_for_len(&connects, 2).await;

    let rt_client = client.rt_client().await.unwrap();
    {
        let connects = connects.lock().unwrap();
        assert_eq!(connects[1].as_ref().unwrap_err().kind, FaultKind::Transport);
    }
    assert!(!channel.is_joined());
    assert!(!rt_client.is_active());
    wait_for_len(&received, 1).await;
    assert!(received.lock().unwrap()[0].is_err());

    state.refuse_upgrades.store(false, Ordering::SeqCst);
    channel.join().await.unwrap();
    wait_for_message_subscriptions(&state, Some(2), 1).await;

    assert!(channel.is_joined());
    assert!(rt_client.is_active());
    assert_eq!(rt_client.connection_attempts(), 2);
    assert_eq!(state.connection_count.load(Ordering::SeqCst), 2);

    state.publish(json!("after rejoin"), None);
    wait_for_len(&received, 2).await;
    assert_eq!(received.lock().unwrap()[1].as_deref().unwrap(), "after rejoin");
    assert_eq!(connects.lock().unwrap().len(), 3);

    client.close().await;
}
