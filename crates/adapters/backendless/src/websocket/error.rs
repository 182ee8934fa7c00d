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

//! Backendless realtime client error types.

use thiserror::Error;

use crate::error::Fault;

/// Error types for the Backendless realtime client.
#[derive(Debug, Clone, Error)]
pub enum BackendlessWsError {
    /// Client is not connected.
    #[error("Not connected")]
    NotConnected,
    /// Client was closed and cannot be used again.
    #[error("Client is shut down")]
    Shutdown,
    /// Transport-level error during WebSocket communication.
    #[error("Transport error: {0}")]
    Transport(String),
    /// Failed to send message over WebSocket.
    #[error("Send error: {0}")]
    Send(String),
    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(String),
    /// Generic client error, such as missing configuration.
    #[error("Client error: {0}")]
    ClientError(String),
    /// Fault returned by the backend for a subscription or method.
    #[error("{0}")]
    Fault(Fault),
    /// Request timeout.
    #[error("Timeout: {0}")]
    Timeout(String),
}

impl BackendlessWsError {
    /// Converts the error into the [`Fault`] surfaced to callers.
    #[must_use]
    pub fn fault(&self) -> Fault {
        match self {
            Self::Fault(fault) => fault.clone(),
            Self::Json(msg) => Fault::parse(msg.clone()),
            Self::ClientError(msg) => Fault::local(msg.clone()),
            Self::NotConnected | Self::Shutdown => Fault::transport(self.to_string()),
            Self::Transport(msg) | Self::Send(msg) | Self::Timeout(msg) => {
                Fault::transport(msg.clone())
            }
        }
    }
}

impl From<serde_json::Error> for BackendlessWsError {
    fn from(error: serde_json::Error) -> Self {
        Self::Json(error.to_string())
    }
}

impl From<Fault> for BackendlessWsError {
    fn from(fault: Fault) -> Self {
        Self::Fault(fault)
    }
}

impl From<BackendlessWsError> for Fault {
    fn from(error: BackendlessWsError) -> Self {
        error.fault()
    }
}

/// Result type alias for Backendless realtime operations.
pub type BackendlessWsResult<T> = Result<T, BackendlessWsError>;

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::error::FaultKind;

    #[rstest]
    #[case(BackendlessWsError::NotConnected, FaultKind::Transport)]
    #[case(BackendlessWsError::Shutdown, FaultKind::Transport)]
    #[case(BackendlessWsError::Timeout("x".to_string()), FaultKind::Transport)]
    #[case(BackendlessWsError::Json("x".to_string()), FaultKind::Parse)]
    #[case(BackendlessWsError::ClientError("x".to_string()), FaultKind::Local)]
    fn test_error_fault_kind(#[case] error: BackendlessWsError, #[case] kind: FaultKind) {
        assert_eq!(error.fault().kind, kind);
    }

    #[rstest]
    fn test_server_fault_passes_through() {
        let fault = Fault::server(5000, "Channel not found");
        assert_eq!(BackendlessWsError::from(fault.clone()).fault(), fault);
    }
}
