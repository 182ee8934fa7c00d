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

//! URL helpers for the Backendless REST and realtime endpoints.

/// Returns the full REST URL for `endpoint`: `{base_url}/{app_id}/{api_key}/{endpoint}`.
#[must_use]
pub fn build_rest_url(base_url: &str, app_id: &str, api_key: &str, endpoint: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let endpoint = endpoint.trim_start_matches('/');
    format!("{base}/{app_id}/{api_key}/{endpoint}")
}

/// Returns the realtime WebSocket URL for an application.
///
/// `http` schemes are mapped to their WebSocket counterparts, `ws`/`wss` URLs are used as given.
#[must_use]
pub fn build_rt_url(rt_url: &str, app_id: &str, api_key: &str, client_id: &str) -> String {
    let base = rt_url.trim_end_matches('/');
    let base = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        base.to_string()
    };

    format!(
        "{base}/{app_id}?apiKey={}&clientId={}",
        urlencoding::encode(api_key),
        urlencoding::encode(client_id),
    )
}
