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

//! Per-channel binding to the realtime transport.
//!
//! [`RtMessaging`] owns the listener registry of one channel and maps its listener groups onto
//! server subscriptions: one connect subscription, one message subscription per selector, one
//! command subscription and one user status subscription. Listener groups are subscribed on the
//! server only while they have listeners and the channel is connected.

use std::{
    cell::Cell,
    fmt::Debug,
    sync::{
        Arc, Mutex, PoisonError, RwLock,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
};

use ahash::AHashMap;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use tokio::sync::oneshot;

use super::{
    models::{CommandObject, PublishMessageInfo, UserStatus},
    subscription::{ListenerKind, RtSubscription},
};
use crate::{
    common::enums::RtSubscriptionName,
    error::Fault,
    websocket::{BackendlessRtClient, BackendlessWsResult, SubscriptionSink},
};

/// Listener callback receiving either a payload or the fault of its subscription.
pub type RtHandler<T> = Arc<dyn Fn(Result<T, Fault>) + Send + Sync>;

struct Listener<T> {
    id: u64,
    active: Arc<AtomicBool>,
    handler: RtHandler<T>,
}

impl<T> Clone for Listener<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            active: self.active.clone(),
            handler: self.handler.clone(),
        }
    }
}

impl<T> Listener<T> {
    fn deactivate(&self) {
        self.active.store(false, Ordering::Relaxed);
    }
}

struct Partition<T> {
    subscription_id: Option<String>,
    listeners: Vec<Listener<T>>,
}

impl<T> Default for Partition<T> {
    fn default() -> Self {
        Self {
            subscription_id: None,
            listeners: Vec::new(),
        }
    }
}

impl<T> Partition<T> {
    fn active_listeners(&self) -> Vec<Listener<T>> {
        self.listeners
            .iter()
            .filter(|listener| listener.active.load(Ordering::Relaxed))
            .cloned()
            .collect()
    }

    fn remove(&mut self, id: u64) {
        self.listeners.retain(|listener| {
            if listener.id == id {
                listener.deactivate();
                false
            } else {
                true
            }
        });
    }

    fn clear(&mut self) {
        for listener in self.listeners.drain(..) {
            listener.deactivate();
        }
    }

    fn needs_subscription(&self) -> bool {
        self.subscription_id.is_none() && !self.listeners.is_empty()
    }
}

#[derive(Default)]
struct ListenerRegistry {
    connect: Vec<Listener<()>>,
    messages: AHashMap<Option<String>, Partition<PublishMessageInfo>>,
    commands: Partition<CommandObject>,
    user_status: Partition<UserStatus>,
}

thread_local! {
    // Listener invocations running on the current thread
    static DELIVERY_DEPTH: Cell<usize> = const { Cell::new(0) };
}

struct DeliveryScope;

impl DeliveryScope {
    fn enter() -> Self {
        DELIVERY_DEPTH.set(DELIVERY_DEPTH.get() + 1);
        Self
    }

    fn is_nested() -> bool {
        DELIVERY_DEPTH.get() > 0
    }
}

impl Drop for DeliveryScope {
    fn drop(&mut self) {
        DELIVERY_DEPTH.set(DELIVERY_DEPTH.get().saturating_sub(1));
    }
}

fn parse_payload<T: DeserializeOwned>(result: Result<Value, Fault>) -> Result<T, Fault> {
    result.and_then(|value| {
        serde_json::from_value(value).map_err(|e| Fault::parse(format!("Invalid payload: {e}")))
    })
}

/// State shared between a channel binding, its subscription sinks and its listener handles.
pub(crate) struct MessagingShared {
    channel: String,
    rt_client: BackendlessRtClient,
    registry: Mutex<ListenerRegistry>,
    connected: AtomicBool,
    connect_subscription: Mutex<Option<String>>,
    next_listener_id: AtomicU64,
    // Held for reading while listeners run, taken for writing to wait them out
    delivery: RwLock<()>,
}

impl MessagingShared {
    fn deliver<T: Clone>(&self, listeners: Vec<Listener<T>>, result: &Result<T, Fault>) {
        // Nested deliveries run under the outer read guard
        let _gate = (!DeliveryScope::is_nested())
            .then(|| self.delivery.read().unwrap_or_else(PoisonError::into_inner));
        let _scope = DeliveryScope::enter();

        for listener in listeners {
            // Removed while earlier listeners ran
            if listener.active.load(Ordering::Relaxed) {
                (listener.handler)(result.clone());
            }
        }
    }

    /// Blocks until listener invocations running on other threads have returned.
    ///
    /// Returns immediately when called from within a listener.
    fn wait_for_deliveries(&self) {
        if DeliveryScope::is_nested() {
            return;
        }
        drop(self.delivery.write().unwrap_or_else(PoisonError::into_inner));
    }

    fn channel_options(&self, selector: Option<&str>) -> Map<String, Value> {
        let mut options = Map::new();
        options.insert("channel".to_string(), json!(self.channel));
        if let Some(selector) = selector {
            options.insert("selector".to_string(), json!(selector));
        }
        options
    }

    fn next_listener(&self) -> (u64, Arc<AtomicBool>) {
        let id = self.next_listener_id.fetch_add(1, Ordering::Relaxed);
        (id, Arc::new(AtomicBool::new(true)))
    }

    fn lock_registry(&self) -> std::sync::MutexGuard<'_, ListenerRegistry> {
        // SAFETY: Lock poisoning indicates a panic in another thread, which is fatal
        self.registry.lock().expect("Lock poisoned")
    }

    fn on_connect_result(&self, result: Result<(), Fault>) {
        if let Err(fault) = &result {
            tracing::warn!("Channel {} connection failed: {fault}", self.channel);
            self.connected.store(false, Ordering::Relaxed);
            // SAFETY: Lock poisoning indicates a panic in another thread, which is fatal
            self.connect_subscription
                .lock()
                .expect("Lock poisoned")
                .take();
        } else {
            tracing::debug!("Channel {} connected", self.channel);
        }

        let listeners = self.lock_registry().connect.clone();
        self.deliver(listeners, &result);
    }

    fn dispatch<T, F>(&self, result: Result<Value, Fault>, select: F)
    where
        T: Clone + DeserializeOwned,
        F: FnOnce(&mut ListenerRegistry) -> Option<&mut Partition<T>>,
    {
        // Server errors close the subscription
        let rejected = result.is_err();
        let result = parse_payload::<T>(result);

        let listeners = {
            let mut registry = self.lock_registry();
            let Some(partition) = select(&mut *registry) else {
                return;
            };
            if rejected {
                partition.subscription_id = None;
            }
            partition.active_listeners()
        };

        if let Err(fault) = &result {
            tracing::warn!("Channel {} delivery failed: {fault}", self.channel);
        }
        self.deliver(listeners, &result);
    }

    pub(crate) fn remove_listener(&self, kind: &ListenerKind, id: u64) {
        let mut registry = self.lock_registry();
        let subscription_id = match kind {
            ListenerKind::Connect => {
                registry.connect.retain(|listener| listener.id != id);
                None
            }
            ListenerKind::Message { selector } => {
                let Some(partition) = registry.messages.get_mut(selector) else {
                    return;
                };
                partition.remove(id);
                if partition.listeners.is_empty() {
                    registry
                        .messages
                        .remove(selector)
                        .and_then(|partition| partition.subscription_id)
                } else {
                    None
                }
            }
            ListenerKind::Command => take_if_empty(&mut registry.commands, id),
            ListenerKind::UserStatus => take_if_empty(&mut registry.user_status, id),
        };
        drop(registry);

        if let Some(subscription_id) = subscription_id {
            self.rt_client.unsubscribe(&subscription_id);
        }
    }
}

fn take_if_empty<T>(partition: &mut Partition<T>, id: u64) -> Option<String> {
    partition.remove(id);
    if partition.listeners.is_empty() {
        partition.subscription_id.take()
    } else {
        None
    }
}

/// Realtime binding of a single channel.
///
/// Created without network activity, [`RtMessaging::connect`] opens the channel on the shared
/// realtime connection.
#[derive(Clone)]
pub struct RtMessaging {
    shared: Arc<MessagingShared>,
}

impl Debug for RtMessaging {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(stringify!(RtMessaging))
            .field("channel", &self.shared.channel)
            .field("connected", &self.is_connected())
            .finish_non_exhaustive()
    }
}

impl RtMessaging {
    /// Creates a new [`RtMessaging`] instance for `channel`.
    #[must_use]
    pub fn new(channel: impl Into<String>, rt_client: BackendlessRtClient) -> Self {
        Self {
            shared: Arc::new(MessagingShared {
                channel: channel.into(),
                rt_client,
                registry: Mutex::new(ListenerRegistry::default()),
                connected: AtomicBool::new(false),
                connect_subscription: Mutex::new(None),
                next_listener_id: AtomicU64::new(1),
                delivery: RwLock::new(()),
            }),
        }
    }

    /// Returns the channel name.
    #[must_use]
    pub fn channel(&self) -> &str {
        &self.shared.channel
    }

    /// Returns `true` once the server confirmed the channel connection.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.shared.connected.load(Ordering::Relaxed)
    }

    /// Returns `true` if the binding can no longer register listeners.
    #[must_use]
    pub fn is_shutdown(&self) -> bool {
        self.shared.rt_client.is_shutdown()
    }

    /// Connects the channel and waits for the server to confirm it.
    ///
    /// On success the connect listeners are notified and listener groups registered while
    /// disconnected are subscribed. On failure the fault is handed to every connect listener.
    ///
    /// # Errors
    ///
    /// Returns a fault if the realtime connection cannot be established, the server rejects the
    /// channel or no confirmation arrives within the connect timeout.
    ///
    /// # Panics
    ///
    /// Panics if an internal lock is poisoned.
    pub async fn connect(&self) -> Result<(), Fault> {
        if self.is_connected() {
            return Ok(());
        }

        if let Err(e) = self.shared.rt_client.connect().await {
            let fault = e.fault();
            self.process_connect_errors(&fault);
            return Err(fault);
        }

        let (tx, rx) = oneshot::channel::<Result<(), Fault>>();
        let first_result = Mutex::new(Some(tx));
        let weak = Arc::downgrade(&self.shared);

        let sink: SubscriptionSink = Arc::new(move |result: Result<Value, Fault>| {
            let result = result.map(|_| ());
            // SAFETY: Lock poisoning indicates a panic in another thread, which is fatal
            if let Some(tx) = first_result.lock().expect("Lock poisoned").take() {
                let _ = tx.send(result);
                return;
            }
            // Results after the first one follow a resubscription on reconnect
            if let Some(shared) = weak.upgrade() {
                shared.on_connect_result(result);
            }
        });

        let subscription_id = self
            .shared
            .rt_client
            .subscribe(
                RtSubscriptionName::PubSubConnect,
                self.shared.channel_options(None),
                sink,
            )
            .map_err(|e| e.fault())?;

        // SAFETY: Lock poisoning indicates a panic in another thread, which is fatal
        *self
            .shared
            .connect_subscription
            .lock()
            .expect("Lock poisoned") = Some(subscription_id.clone());

        let timeout = self.shared.rt_client.connect_timeout();
        let outcome = match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(Fault::transport("Channel connection dropped")),
            Err(_) => Err(Fault::transport(format!(
                "Channel {} not confirmed after {timeout:?}",
                self.shared.channel
            ))),
        };

        match outcome {
            Ok(()) => {
                tracing::info!("Joined channel {}", self.shared.channel);
                self.shared.connected.store(true, Ordering::Relaxed);
                self.process_connect_subscriptions();
                self.subscribe_for_waiting();
                Ok(())
            }
            Err(fault) => {
                // SAFETY: Lock poisoning indicates a panic in another thread, which is fatal
                self.shared
                    .connect_subscription
                    .lock()
                    .expect("Lock poisoned")
                    .take();
                self.shared.rt_client.unsubscribe(&subscription_id);
                self.process_connect_errors(&fault);
                Err(fault)
            }
        }
    }

    /// Notifies every connect listener of a successful connection.
    pub fn process_connect_subscriptions(&self) {
        let listeners = self.shared.lock_registry().connect.clone();
        self.shared.deliver(listeners, &Ok(()));
    }

    /// Hands `fault` to every connect listener.
    pub fn process_connect_errors(&self, fault: &Fault) {
        let listeners = self.shared.lock_registry().connect.clone();
        self.shared.deliver(listeners, &Err(fault.clone()));
    }

    /// Subscribes every listener group that has listeners but no server subscription.
    ///
    /// Does nothing until the channel is connected.
    pub fn subscribe_for_waiting(&self) {
        if !self.is_connected() {
            return;
        }

        let mut registry = self.shared.lock_registry();

        for (selector, partition) in &mut registry.messages {
            if partition.needs_subscription() {
                let kind = ListenerKind::Message {
                    selector: selector.clone(),
                };
                partition.subscription_id = self.open_subscription(&kind);
            }
        }
        if registry.commands.needs_subscription() {
            registry.commands.subscription_id = self.open_subscription(&ListenerKind::Command);
        }
        if registry.user_status.needs_subscription() {
            registry.user_status.subscription_id =
                self.open_subscription(&ListenerKind::UserStatus);
        }
    }

    /// Closes every server subscription of the channel.
    ///
    /// Listeners stay registered and are subscribed again on the next [`Self::connect`]. The
    /// shared realtime connection stays open for other channels.
    ///
    /// # Panics
    ///
    /// Panics if an internal lock is poisoned.
    pub fn disconnect(&self) {
        self.shared.connected.store(false, Ordering::Relaxed);

        let mut subscription_ids = Vec::new();

        // SAFETY: Lock poisoning indicates a panic in another thread, which is fatal
        if let Some(id) = self
            .shared
            .connect_subscription
            .lock()
            .expect("Lock poisoned")
            .take()
        {
            subscription_ids.push(id);
        }

        {
            let mut registry = self.shared.lock_registry();
            subscription_ids.extend(
                registry
                    .messages
                    .values_mut()
                    .filter_map(|partition| partition.subscription_id.take()),
            );
            subscription_ids.extend(registry.commands.subscription_id.take());
            subscription_ids.extend(registry.user_status.subscription_id.take());
        }

        for id in subscription_ids {
            self.shared.rt_client.unsubscribe(&id);
        }

        tracing::info!("Left channel {}", self.shared.channel);
    }

    fn open_subscription(&self, kind: &ListenerKind) -> Option<String> {
        let weak = Arc::downgrade(&self.shared);

        let result = match kind {
            ListenerKind::Connect => return None,
            ListenerKind::Message { selector } => {
                let key = selector.clone();
                let sink: SubscriptionSink = Arc::new(move |result: Result<Value, Fault>| {
                    if let Some(shared) = weak.upgrade() {
                        shared.dispatch::<PublishMessageInfo, _>(result, |registry| {
                            registry.messages.get_mut(&key)
                        });
                    }
                });
                self.subscribe(
                    RtSubscriptionName::PubSubMessages,
                    selector.as_deref(),
                    sink,
                )
            }
            ListenerKind::Command => {
                let sink: SubscriptionSink = Arc::new(move |result: Result<Value, Fault>| {
                    if let Some(shared) = weak.upgrade() {
                        shared.dispatch::<CommandObject, _>(result, |registry| {
                            Some(&mut registry.commands)
                        });
                    }
                });
                self.subscribe(RtSubscriptionName::PubSubCommands, None, sink)
            }
            ListenerKind::UserStatus => {
                let sink: SubscriptionSink = Arc::new(move |result: Result<Value, Fault>| {
                    if let Some(shared) = weak.upgrade() {
                        shared.dispatch::<UserStatus, _>(result, |registry| {
                            Some(&mut registry.user_status)
                        });
                    }
                });
                self.subscribe(RtSubscriptionName::PubSubUsers, None, sink)
            }
        };

        match result {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::error!("Subscribe failed: {e}");
                None
            }
        }
    }

    fn subscribe(
        &self,
        name: RtSubscriptionName,
        selector: Option<&str>,
        sink: SubscriptionSink,
    ) -> BackendlessWsResult<String> {
        let options = self.shared.channel_options(selector);
        self.shared.rt_client.subscribe(name, options, sink)
    }

    fn add_partition_listener<T, F>(
        &self,
        kind: ListenerKind,
        handler: RtHandler<T>,
        select: F,
    ) -> Option<RtSubscription>
    where
        F: FnOnce(&mut ListenerRegistry) -> &mut Partition<T>,
    {
        if self.is_shutdown() {
            return None;
        }

        let (id, active) = self.shared.next_listener();
        let mut registry = self.shared.lock_registry();
        let partition = select(&mut *registry);
        partition.listeners.push(Listener {
            id,
            active: active.clone(),
            handler,
        });

        if partition.subscription_id.is_none() && self.is_connected() {
            tracing::debug!("Subscribing {kind:?} on channel {}", self.shared.channel);
            match self.open_subscription(&kind) {
                Some(subscription_id) => partition.subscription_id = Some(subscription_id),
                None => {
                    partition.listeners.pop();
                    return None;
                }
            }
        }
        drop(registry);

        Some(RtSubscription::new(
            Arc::downgrade(&self.shared),
            kind,
            id,
            active,
        ))
    }

    /// Registers a listener for the channel connection state.
    #[must_use]
    pub fn add_connect_listener(&self, handler: RtHandler<()>) -> Option<RtSubscription> {
        if self.is_shutdown() {
            return None;
        }

        let (id, active) = self.shared.next_listener();
        self.shared.lock_registry().connect.push(Listener {
            id,
            active: active.clone(),
            handler,
        });

        Some(RtSubscription::new(
            Arc::downgrade(&self.shared),
            ListenerKind::Connect,
            id,
            active,
        ))
    }

    /// Registers a message listener, restricted to `selector` when given.
    #[must_use]
    pub fn add_message_listener(
        &self,
        selector: Option<&str>,
        handler: RtHandler<PublishMessageInfo>,
    ) -> Option<RtSubscription> {
        let key = selector.map(ToString::to_string);
        let kind = ListenerKind::Message {
            selector: key.clone(),
        };
        self.add_partition_listener(kind, handler, move |registry| {
            registry.messages.entry(key).or_default()
        })
    }

    /// Registers a command listener.
    #[must_use]
    pub fn add_command_listener(&self, handler: RtHandler<CommandObject>) -> Option<RtSubscription> {
        self.add_partition_listener(ListenerKind::Command, handler, |registry| {
            &mut registry.commands
        })
    }

    /// Registers a user status listener.
    #[must_use]
    pub fn add_user_status_listener(
        &self,
        handler: RtHandler<UserStatus>,
    ) -> Option<RtSubscription> {
        self.add_partition_listener(ListenerKind::UserStatus, handler, |registry| {
            &mut registry.user_status
        })
    }

    /// Removes every connect listener.
    pub fn remove_connect_listeners(&self) {
        let mut registry = self.shared.lock_registry();
        for listener in registry.connect.drain(..) {
            listener.deactivate();
        }
    }

    /// Removes the message listeners of `selector`, or all message listeners when `None`.
    pub fn remove_message_listeners(&self, selector: Option<&str>) {
        let subscription_ids: Vec<String> = {
            let mut registry = self.shared.lock_registry();
            let removed: Vec<Partition<PublishMessageInfo>> = match selector {
                Some(selector) => registry
                    .messages
                    .remove(&Some(selector.to_string()))
                    .into_iter()
                    .collect(),
                None => registry.messages.drain().map(|(_, partition)| partition).collect(),
            };
            removed
                .into_iter()
                .filter_map(|mut partition| {
                    partition.clear();
                    partition.subscription_id
                })
                .collect()
        };

        for id in subscription_ids {
            self.shared.rt_client.unsubscribe(&id);
        }
    }

    /// Removes every command listener.
    pub fn remove_command_listeners(&self) {
        let id = {
            let mut registry = self.shared.lock_registry();
            registry.commands.clear();
            registry.commands.subscription_id.take()
        };
        if let Some(id) = id {
            self.shared.rt_client.unsubscribe(&id);
        }
    }

    /// Removes every user status listener.
    pub fn remove_user_status_listeners(&self) {
        let id = {
            let mut registry = self.shared.lock_registry();
            registry.user_status.clear();
            registry.user_status.subscription_id.take()
        };
        if let Some(id) = id {
            self.shared.rt_client.unsubscribe(&id);
        }
    }

    /// Removes every listener of the channel.
    ///
    /// Waits for listeners already running on other threads, no listener of the channel runs
    /// once this returns. A listener calling this only stops the listeners after it.
    pub fn remove_all_listeners(&self) {
        self.remove_connect_listeners();
        self.remove_message_listeners(None);
        self.remove_command_listeners();
        self.remove_user_status_listeners();
        self.shared.wait_for_deliveries();
    }

    #[cfg(test)]
    pub(crate) fn listener_count(&self) -> usize {
        let registry = self.shared.lock_registry();
        registry.connect.len()
            + registry
                .messages
                .values()
                .map(|partition| partition.listeners.len())
                .sum::<usize>()
            + registry.commands.listeners.len()
            + registry.user_status.listeners.len()
    }
}
