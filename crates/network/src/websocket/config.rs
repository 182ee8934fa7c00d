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

//! Configuration for WebSocket client connections.
//!
//! # Reconnection Strategy
//!
//! The default configuration uses unlimited reconnection attempts (`reconnect_max_attempts: None`).
//! A realtime backend can be unreachable for a while and still recover, and exponential backoff
//! bounds the cost of waiting for it. Use `Some(n)` for tests or short-lived tools.

use std::fmt::Debug;

/// Default timeout (milliseconds) for a single reconnection attempt.
pub const DEFAULT_RECONNECT_TIMEOUT_MS: u64 = 10_000;
/// Default initial reconnection delay (milliseconds).
pub const DEFAULT_RECONNECT_DELAY_INITIAL_MS: u64 = 2_000;
/// Default maximum reconnection delay (milliseconds).
pub const DEFAULT_RECONNECT_DELAY_MAX_MS: u64 = 30_000;
/// Default exponential backoff factor.
pub const DEFAULT_RECONNECT_BACKOFF_FACTOR: f64 = 1.5;
/// Default maximum jitter (milliseconds).
pub const DEFAULT_RECONNECT_JITTER_MS: u64 = 100;

/// Configuration for WebSocket client connections.
///
/// This struct contains only static configuration settings. The message handler is passed
/// separately to [`crate::websocket::WebSocketClient::connect`], which spawns a controller task
/// that reads frames, forwards them to the handler and re-establishes dropped connections.
#[derive(Clone, Debug)]
pub struct WebSocketConfig {
    /// The URL to connect to.
    pub url: String,
    /// The default headers.
    pub headers: Vec<(String, String)>,
    /// The optional heartbeat interval (seconds).
    pub heartbeat: Option<u64>,
    /// The optional heartbeat message, a ping frame is sent when `None`.
    pub heartbeat_msg: Option<String>,
    /// The timeout (milliseconds) for reconnection attempts.
    pub reconnect_timeout_ms: Option<u64>,
    /// The initial reconnection delay (milliseconds) for reconnects.
    pub reconnect_delay_initial_ms: Option<u64>,
    /// The maximum reconnect delay (milliseconds) for exponential backoff.
    pub reconnect_delay_max_ms: Option<u64>,
    /// The exponential backoff factor for reconnection delays.
    pub reconnect_backoff_factor: Option<f64>,
    /// The maximum jitter (milliseconds) added to reconnection delays.
    pub reconnect_jitter_ms: Option<u64>,
    /// The maximum number of reconnection attempts before giving up.
    /// - `None`: Unlimited reconnection attempts (default).
    /// - `Some(n)`: After n failed attempts, transition to CLOSED state.
    pub reconnect_max_attempts: Option<u32>,
}

impl WebSocketConfig {
    /// Creates a new [`WebSocketConfig`] for `url` with default reconnection settings.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
            heartbeat: None,
            heartbeat_msg: None,
            reconnect_timeout_ms: None,
            reconnect_delay_initial_ms: None,
            reconnect_delay_max_ms: None,
            reconnect_backoff_factor: None,
            reconnect_jitter_ms: None,
            reconnect_max_attempts: None,
        }
    }

    #[must_use]
    pub fn reconnect_timeout_ms(&self) -> u64 {
        self.reconnect_timeout_ms
            .unwrap_or(DEFAULT_RECONNECT_TIMEOUT_MS)
    }

    #[must_use]
    pub fn reconnect_delay_initial_ms(&self) -> u64 {
        self.reconnect_delay_initial_ms
            .unwrap_or(DEFAULT_RECONNECT_DELAY_INITIAL_MS)
    }

    #[must_use]
    pub fn reconnect_delay_max_ms(&self) -> u64 {
        self.reconnect_delay_max_ms
            .unwrap_or(DEFAULT_RECONNECT_DELAY_MAX_MS)
            .max(self.reconnect_delay_initial_ms())
    }

    #[must_use]
    pub fn reconnect_backoff_factor(&self) -> f64 {
        self.reconnect_backoff_factor
            .unwrap_or(DEFAULT_RECONNECT_BACKOFF_FACTOR)
    }

    #[must_use]
    pub fn reconnect_jitter_ms(&self) -> u64 {
        self.reconnect_jitter_ms
            .unwrap_or(DEFAULT_RECONNECT_JITTER_MS)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_defaults() {
        let config = WebSocketConfig::new("ws://localhost:1234");

        assert_eq!(config.url, "ws://localhost:1234");
        assert_eq!(config.reconnect_timeout_ms(), DEFAULT_RECONNECT_TIMEOUT_MS);
        assert_eq!(
            config.reconnect_delay_initial_ms(),
            DEFAULT_RECONNECT_DELAY_INITIAL_MS
        );
        assert_eq!(config.reconnect_delay_max_ms(), DEFAULT_RECONNECT_DELAY_MAX_MS);
        assert!(config.reconnect_max_attempts.is_none());
    }

    #[rstest]
    fn test_max_delay_never_below_initial() {
        let mut config = WebSocketConfig::new("ws://localhost:1234");
        config.reconnect_delay_initial_ms = Some(5_000);
        config.reconnect_delay_max_ms = Some(1_000);

        assert_eq!(config.reconnect_delay_max_ms(), 5_000);
    }
}
