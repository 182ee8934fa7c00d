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

//! Payloads delivered to channel listeners.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::common::{enums::UserStatusKind, parse::deserialize_null_default};

/// A message published to a channel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishMessageInfo {
    #[serde(default)]
    pub message_id: Option<String>,
    #[serde(default)]
    pub publisher_id: Option<String>,
    /// Publication time in milliseconds since the Unix epoch.
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub headers: Map<String, Value>,
    #[serde(default)]
    pub subtopic: Option<String>,
    #[serde(default)]
    pub message: Value,
}

impl PublishMessageInfo {
    /// Returns the message body as text.
    ///
    /// String bodies are returned unquoted, other values as JSON.
    #[must_use]
    pub fn message_as_string(&self) -> String {
        match &self.message {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        }
    }
}

/// A command sent to a channel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandObject {
    #[serde(rename = "type")]
    pub command_type: String,
    #[serde(default)]
    pub connection_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub data: Value,
}

/// A connection taking part in a presence update.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatusEntry {
    #[serde(default)]
    pub connection_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Presence update of users on a channel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStatus {
    pub status: UserStatusKind,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub data: Vec<UserStatusEntry>,
}
