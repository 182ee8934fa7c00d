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

//! Data structures for Backendless realtime frames.
//!
//! Every frame is a JSON object `{"event": <RtEvent>, "data": {...}}`. Subscriptions and method
//! invocations carry a client generated id which the server echoes in its results.

use backendless_network::RECONNECTED;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::{BackendlessWsError, BackendlessWsResult};
use crate::{
    common::{
        enums::{RtEvent, RtMethodName, RtSubscriptionName},
        parse::deserialize_fault_code,
    },
    error::Fault,
};

/// Envelope of every realtime frame.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RtFrame<T> {
    pub event: RtEvent,
    pub data: T,
}

/// Payload of a `SUB_ON` frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RtSubscriptionRequest {
    pub id: String,
    pub name: RtSubscriptionName,
    #[serde(default)]
    pub options: Map<String, Value>,
}

/// Payload of a `SUB_OFF` frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RtUnsubscribeRequest {
    pub id: String,
}

/// Payload of a `MET_REQ` frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RtMethodRequest {
    pub id: String,
    pub name: RtMethodName,
    #[serde(default)]
    pub options: Map<String, Value>,
}

/// Error carried by a subscription or method result.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RtError {
    #[serde(default, deserialize_with = "deserialize_fault_code")]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: String,
}

impl From<RtError> for Fault {
    fn from(error: RtError) -> Self {
        Self::server(error.code.unwrap_or_default(), error.message)
    }
}

/// Payload of a `SUB_RES` frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RtSubscriptionResult {
    pub id: String,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub error: Option<RtError>,
}

impl RtSubscriptionResult {
    /// Returns the data, or the fault when the result carries an error.
    ///
    /// # Errors
    ///
    /// Returns the fault carried by the result.
    pub fn into_result(self) -> Result<Value, Fault> {
        match self.error {
            Some(error) => Err(error.into()),
            None => Ok(self.data.unwrap_or(Value::Null)),
        }
    }
}

/// Payload of a `MET_RES` frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RtMethodResult {
    pub id: String,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<RtError>,
}

impl RtMethodResult {
    /// Returns the result, or the fault when the result carries an error.
    ///
    /// # Errors
    ///
    /// Returns the fault carried by the result.
    pub fn into_result(self) -> Result<Value, Fault> {
        match self.error {
            Some(error) => Err(error.into()),
            None => Ok(self.result.unwrap_or(Value::Null)),
        }
    }
}

/// Messages passed from the feed handler to the client task.
#[derive(Clone, Debug)]
pub enum RtWsMessage {
    SubscriptionResult(RtSubscriptionResult),
    MethodResult(RtMethodResult),
    /// A method request could not be written to the socket.
    MethodSendFailed { id: String, error: String },
    /// The connection was re-established, subscriptions must be restored.
    Reconnected,
    /// The connection was lost and will not be re-established.
    Closed,
}

/// Parses a raw text frame into an [`RtWsMessage`].
///
/// # Errors
///
/// Returns an error if JSON parsing fails or the frame is not a server result.
pub fn parse_raw_message(text: &str) -> BackendlessWsResult<RtWsMessage> {
    if text == RECONNECTED {
        return Ok(RtWsMessage::Reconnected);
    }

    let frame: RtFrame<Value> = serde_json::from_str(text)?;

    match frame.event {
        RtEvent::SubRes => Ok(RtWsMessage::SubscriptionResult(serde_json::from_value(
            frame.data,
        )?)),
        RtEvent::MetRes => Ok(RtWsMessage::MethodResult(serde_json::from_value(
            frame.data,
        )?)),
        other => Err(BackendlessWsError::ClientError(format!(
            "Unexpected {other} frame from server"
        ))),
    }
}
