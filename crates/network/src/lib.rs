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

//! Network primitives for the Backendless SDK.
//!
//! The `backendless-network` crate provides:
//!
//! - A thin HTTP client over `reqwest` with per-request timeouts and typed errors.
//! - A WebSocket client over `tokio-tungstenite` with heartbeats and automatic reconnection.
//! - Connection mode tracking shared between the client and its controller task.
//! - Exponential backoff with jitter for reconnection delays.

#![warn(rustc::all)]
#![deny(unsafe_code)]
#![deny(nonstandard_style)]
#![deny(missing_debug_implementations)]
#![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod backoff;
pub mod http;
pub mod mode;
pub mod testing;
pub mod websocket;

/// Text message emitted to the message handler after a successful reconnection.
///
/// Adapters compare incoming text frames against this marker to trigger resubscription.
pub const RECONNECTED: &str = "__RECONNECTED__";
