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

//! Core constants shared across the Backendless SDK components.

pub const BACKENDLESS: &str = "BACKENDLESS";

// HTTP endpoints
pub const BACKENDLESS_HTTP_URL: &str = "https://api.backendless.com";
pub const BACKENDLESS_EU_HTTP_URL: &str = "https://eu-api.backendless.com";

pub const BACKENDLESS_USER_AGENT: &str = concat!("backendless-sdk-rust/", env!("CARGO_PKG_VERSION"));

// Environment variables
pub const BACKENDLESS_APP_ID_ENV: &str = "BACKENDLESS_APP_ID";
pub const BACKENDLESS_API_KEY_ENV: &str = "BACKENDLESS_API_KEY";
pub const BACKENDLESS_BASE_URL_ENV: &str = "BACKENDLESS_BASE_URL";
pub const BACKENDLESS_RT_URL_ENV: &str = "BACKENDLESS_RT_URL";

// Response structural markers
pub const TOTAL_POINTS_KEY: &str = "totalPoints";
pub const GEOPOINT_KEY: &str = "geopoint";

// Geo query defaults
pub const DEFAULT_PAGE_SIZE: u32 = 100;
pub const DEFAULT_OFFSET: u32 = 0;
pub const DEFAULT_DEGREE_PER_PIXEL: f64 = 0.0;
pub const DEFAULT_CLUSTER_GRID_SIZE: u32 = 100;

/// Fault code used for failures raised by the SDK before any request is sent.
pub const LOCAL_FAULT_CODE: i64 = 0;

// Realtime
pub const RT_LOOKUP_ENDPOINT: &str = "rt/lookup";
pub const DEFAULT_RT_METHOD_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_RT_CONNECT_TIMEOUT_SECS: u64 = 10;

// Geofence monitoring
pub const GEOFENCE_STAY_CHECK_INTERVAL_MS: u64 = 1_000;
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;
