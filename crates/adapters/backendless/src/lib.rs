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

//! Rust client SDK for the [Backendless](https://backendless.com) geolocation and realtime
//! messaging APIs.
//!
//! The `backendless-sdk` crate provides:
//!
//! - **Geo REST client**: save, remove and query geo points, clusters, categories and geofences.
//! - **Response adapter**: turns heterogeneous JSON responses into typed results, telling points
//!   from clusters and successes from faults.
//! - **Realtime transport**: a WebSocket client multiplexing subscriptions and method calls over
//!   a single connection, with automatic reconnection and resubscription.
//! - **Channels**: named publish/subscribe topics with join/leave lifecycle and typed listeners.
//! - **Geofence monitor**: local enter/stay/exit detection over a pluggable location provider.
//!
//! # Documentation
//!
//! - Geolocation API: <https://backendless.com/docs/rest/geo_overview.html>
//! - Publish/subscribe messaging: <https://backendless.com/docs/rest/pubsub_overview.html>

#![warn(rustc::all)]
#![deny(unsafe_code)]
#![deny(nonstandard_style)]
#![deny(missing_debug_implementations)]
#![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod client;
pub mod common;
pub mod config;
pub mod error;
pub mod geo;
pub mod geofence;
pub mod http;
pub mod messaging;
pub mod websocket;

pub use client::BackendlessClient;
pub use config::BackendlessConfig;
pub use error::{Fault, FaultKind};
