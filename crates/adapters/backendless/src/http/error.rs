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

//! Error structures and enumerations for the Backendless HTTP integration.

use backendless_network::http::HttpClientError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{common::parse::deserialize_fault_code, error::Fault};

/// Represents the JSON structure of a fault envelope returned by the Backendless API.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct BackendlessErrorResponse {
    /// Fault code, `faultCode` is accepted as an alias.
    #[serde(default, alias = "faultCode", deserialize_with = "deserialize_fault_code")]
    pub code: Option<i64>,
    /// A human-readable explanation of the fault.
    #[serde(default)]
    pub message: Option<String>,
}

/// A typed error enumeration for the Backendless HTTP client.
#[derive(Debug, Clone, Error)]
pub enum BackendlessHttpError {
    /// Fault returned by the backend (envelope or non-success status).
    #[error("{0}")]
    Fault(Fault),
    /// A precondition failed before any request was sent.
    #[error("Precondition failed: {0}")]
    Precondition(String),
    /// Failure during JSON serialization/deserialization.
    #[error("JSON error: {0}")]
    JsonError(String),
    /// The response was valid JSON but could not be adapted.
    #[error("Parse error: {0}")]
    ParseError(String),
    /// Request was canceled, typically due to shutdown.
    #[error("Request canceled: {0}")]
    Canceled(String),
    /// Generic network error.
    #[error("Network error: {0}")]
    NetworkError(String),
}

impl BackendlessHttpError {
    /// Converts the error into the [`Fault`] surfaced to callers.
    #[must_use]
    pub fn fault(&self) -> Fault {
        match self {
            Self::Fault(fault) => fault.clone(),
            Self::Precondition(msg) => Fault::local(msg.clone()),
            Self::JsonError(msg) | Self::ParseError(msg) => Fault::parse(msg.clone()),
            Self::Canceled(msg) | Self::NetworkError(msg) => Fault::transport(msg.clone()),
        }
    }
}

impl From<HttpClientError> for BackendlessHttpError {
    fn from(error: HttpClientError) -> Self {
        Self::NetworkError(error.to_string())
    }
}

impl From<serde_json::Error> for BackendlessHttpError {
    fn from(error: serde_json::Error) -> Self {
        Self::JsonError(error.to_string())
    }
}

impl From<Fault> for BackendlessHttpError {
    fn from(fault: Fault) -> Self {
        Self::Fault(fault)
    }
}

impl From<BackendlessErrorResponse> for BackendlessHttpError {
    fn from(error: BackendlessErrorResponse) -> Self {
        Self::Fault(Fault::server(
            error.code.unwrap_or_default(),
            error.message.unwrap_or_else(|| "Unknown error".to_string()),
        ))
    }
}

impl From<BackendlessHttpError> for Fault {
    fn from(error: BackendlessHttpError) -> Self {
        error.fault()
    }
}
