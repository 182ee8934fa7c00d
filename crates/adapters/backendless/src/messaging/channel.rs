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

//! Named publish/subscribe channel.

use std::sync::{Arc, OnceLock};

use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value, json};

use super::{
    models::{CommandObject, PublishMessageInfo, UserStatus},
    rt_messaging::{RtHandler, RtMessaging},
    subscription::RtSubscription,
};
use crate::{common::enums::RtMethodName, error::Fault, websocket::BackendlessRtClient};

/// A named realtime channel.
///
/// A channel starts out not joined and without a transport binding. The binding is created on
/// first use, [`Channel::join`] connects it and [`Channel::leave`] releases it.
#[derive(Debug)]
pub struct Channel {
    name: String,
    rt_client: BackendlessRtClient,
    binding: OnceLock<RtMessaging>,
    joined: bool,
}

impl Channel {
    /// Creates a new [`Channel`] instance, no connection is opened.
    #[must_use]
    pub fn new(name: impl Into<String>, rt_client: BackendlessRtClient) -> Self {
        Self {
            name: name.into(),
            rt_client,
            binding: OnceLock::new(),
            joined: false,
        }
    }

    /// Returns the channel name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` if the channel is joined.
    ///
    /// A joined channel falls back to not joined when the server closes the channel or the
    /// realtime transport gives up reconnecting.
    #[must_use]
    pub fn is_joined(&self) -> bool {
        self.joined && self.binding.get().is_some_and(RtMessaging::is_connected)
    }

    #[cfg(test)]
    pub(crate) fn has_binding(&self) -> bool {
        self.binding.get().is_some()
    }

    fn ensure_binding(&self) -> &RtMessaging {
        self.binding.get_or_init(|| {
            tracing::debug!("Creating realtime binding for channel {}", self.name);
            RtMessaging::new(self.name.clone(), self.rt_client.clone())
        })
    }

    /// Joins the channel.
    ///
    /// Joining an already joined channel does nothing. A channel whose connection was lost is
    /// connected again. On failure the fault is also handed to every connect listener and the
    /// channel stays not joined.
    ///
    /// # Errors
    ///
    /// Returns a fault if the connection cannot be established or the server rejects the channel.
    pub async fn join(&mut self) -> Result<(), Fault> {
        if self.is_joined() {
            return Ok(());
        }

        let binding = self.ensure_binding().clone();
        binding.connect().await?;
        self.joined = true;
        Ok(())
    }

    /// Leaves the channel.
    ///
    /// Every listener is removed before the binding disconnects, none fires afterwards.
    pub fn leave(&mut self) {
        self.joined = false;

        if let Some(binding) = self.binding.get() {
            binding.remove_all_listeners();
            binding.disconnect();
        }
    }

    /// Registers a listener notified when the channel connects or fails to connect.
    ///
    /// The listener is notified right away if the channel is already joined.
    pub fn add_connect_listener<F>(&self, handler: F) -> Option<RtSubscription>
    where
        F: Fn(Result<(), Fault>) + Send + Sync + 'static,
    {
        let handler: RtHandler<()> = Arc::new(handler);
        let subscription = self.ensure_binding().add_connect_listener(handler.clone())?;
        if self.is_joined() {
            handler(Ok(()));
        }
        Some(subscription)
    }

    /// Registers a listener receiving message bodies as text.
    pub fn add_string_message_listener<F>(&self, handler: F) -> Option<RtSubscription>
    where
        F: Fn(Result<String, Fault>) + Send + Sync + 'static,
    {
        self.add_string_listener(None, handler)
    }

    /// Registers a listener receiving message bodies published for `selector` as text.
    pub fn add_string_message_listener_with_selector<F>(
        &self,
        selector: &str,
        handler: F,
    ) -> Option<RtSubscription>
    where
        F: Fn(Result<String, Fault>) + Send + Sync + 'static,
    {
        self.add_string_listener(Some(selector), handler)
    }

    /// Registers a listener receiving message bodies deserialized into `T`.
    ///
    /// Bodies that do not deserialize are delivered as parse faults.
    pub fn add_object_message_listener<T, F>(&self, handler: F) -> Option<RtSubscription>
    where
        T: DeserializeOwned + 'static,
        F: Fn(Result<T, Fault>) + Send + Sync + 'static,
    {
        self.add_object_listener(None, handler)
    }

    /// Registers a listener receiving message bodies published for `selector`, deserialized
    /// into `T`.
    pub fn add_object_message_listener_with_selector<T, F>(
        &self,
        selector: &str,
        handler: F,
    ) -> Option<RtSubscription>
    where
        T: DeserializeOwned + 'static,
        F: Fn(Result<T, Fault>) + Send + Sync + 'static,
    {
        self.add_object_listener(Some(selector), handler)
    }

    /// Registers a listener receiving full message details.
    pub fn add_message_listener<F>(&self, handler: F) -> Option<RtSubscription>
    where
        F: Fn(Result<PublishMessageInfo, Fault>) + Send + Sync + 'static,
    {
        self.ensure_binding()
            .add_message_listener(None, Arc::new(handler))
    }

    /// Registers a listener receiving full details of messages published for `selector`.
    pub fn add_message_listener_with_selector<F>(
        &self,
        selector: &str,
        handler: F,
    ) -> Option<RtSubscription>
    where
        F: Fn(Result<PublishMessageInfo, Fault>) + Send + Sync + 'static,
    {
        self.ensure_binding()
            .add_message_listener(Some(selector), Arc::new(handler))
    }

    /// Registers a listener receiving commands sent to the channel.
    pub fn add_command_listener<F>(&self, handler: F) -> Option<RtSubscription>
    where
        F: Fn(Result<CommandObject, Fault>) + Send + Sync + 'static,
    {
        self.ensure_binding().add_command_listener(Arc::new(handler))
    }

    /// Registers a listener receiving presence updates.
    pub fn add_user_status_listener<F>(&self, handler: F) -> Option<RtSubscription>
    where
        F: Fn(Result<UserStatus, Fault>) + Send + Sync + 'static,
    {
        self.ensure_binding()
            .add_user_status_listener(Arc::new(handler))
    }

    fn add_string_listener<F>(&self, selector: Option<&str>, handler: F) -> Option<RtSubscription>
    where
        F: Fn(Result<String, Fault>) + Send + Sync + 'static,
    {
        let handler: RtHandler<PublishMessageInfo> =
            Arc::new(move |result: Result<PublishMessageInfo, Fault>| {
                handler(result.map(|info| info.message_as_string()));
            });
        self.ensure_binding().add_message_listener(selector, handler)
    }

    fn add_object_listener<T, F>(&self, selector: Option<&str>, handler: F) -> Option<RtSubscription>
    where
        T: DeserializeOwned + 'static,
        F: Fn(Result<T, Fault>) + Send + Sync + 'static,
    {
        let handler: RtHandler<PublishMessageInfo> =
            Arc::new(move |result: Result<PublishMessageInfo, Fault>| {
                handler(result.and_then(|info| {
                    serde_json::from_value(info.message)
                        .map_err(|e| Fault::parse(format!("Invalid message body: {e}")))
                }));
            });
        self.ensure_binding().add_message_listener(selector, handler)
    }

    /// Removes every connect listener.
    pub fn remove_connect_listeners(&self) {
        if let Some(binding) = self.binding.get() {
            binding.remove_connect_listeners();
        }
    }

    /// Removes the message listeners of `selector`, or every message listener when `None`.
    pub fn remove_message_listeners(&self, selector: Option<&str>) {
        if let Some(binding) = self.binding.get() {
            binding.remove_message_listeners(selector);
        }
    }

    /// Removes every command listener.
    pub fn remove_command_listeners(&self) {
        if let Some(binding) = self.binding.get() {
            binding.remove_command_listeners();
        }
    }

    /// Removes every user status listener.
    pub fn remove_user_status_listeners(&self) {
        if let Some(binding) = self.binding.get() {
            binding.remove_user_status_listeners();
        }
    }

    /// Removes every listener of the channel.
    pub fn remove_all_listeners(&self) {
        if let Some(binding) = self.binding.get() {
            binding.remove_all_listeners();
        }
    }

    /// Sends a command to every connection on the channel.
    ///
    /// Resolves once the server acknowledged the command. The channel does not need to be
    /// joined, the realtime connection is opened when needed.
    ///
    /// # Errors
    ///
    /// Returns a fault if:
    /// - The channel name is empty.
    /// - `data` cannot be serialized.
    /// - The command cannot be delivered or the server rejects it.
    pub async fn send_command<T>(&self, command_type: &str, data: &T) -> Result<(), Fault>
    where
        T: Serialize + ?Sized,
    {
        if self.name.is_empty() {
            return Err(Fault::local("Channel name must not be empty"));
        }

        let data = serde_json::to_value(data)
            .map_err(|e| Fault::parse(format!("Failed to serialize command data: {e}")))?;

        let mut options = Map::new();
        options.insert("channel".to_string(), json!(self.name));
        options.insert("type".to_string(), json!(command_type));
        if !data.is_null() {
            options.insert("data".to_string(), data);
        }

        tracing::debug!("Sending {command_type} command to channel {}", self.name);

        self.rt_client
            .invoke(RtMethodName::PubSubCommand, options)
            .await
            .map(|_: Value| ())
            .map_err(|e| e.fault())
    }
}
