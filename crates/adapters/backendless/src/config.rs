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

//! Configuration structures for the Backendless SDK.

use crate::common::{
    consts::{
        BACKENDLESS_API_KEY_ENV, BACKENDLESS_APP_ID_ENV, BACKENDLESS_BASE_URL_ENV,
        BACKENDLESS_HTTP_URL, BACKENDLESS_RT_URL_ENV, DEFAULT_RT_CONNECT_TIMEOUT_SECS,
        DEFAULT_RT_METHOD_TIMEOUT_SECS,
    },
    credential::Credential,
};

/// Configuration for the Backendless clients.
#[derive(Clone, Debug)]
pub struct BackendlessConfig {
    /// The application id.
    pub app_id: Option<String>,
    /// The REST API key of the application.
    pub api_key: Option<String>,
    /// Optional override for the REST base URL.
    pub base_url_http: Option<String>,
    /// Optional realtime URL, looked up through the REST API when unset.
    pub base_url_rt: Option<String>,
    /// Optional HTTP proxy URL.
    pub http_proxy_url: Option<String>,
    /// Optional REST timeout in seconds.
    pub http_timeout_secs: Option<u64>,
    /// Optional timeout (seconds) waiting for a realtime method result.
    pub rt_method_timeout_secs: Option<u64>,
    /// Optional timeout (seconds) waiting for a channel connection to be confirmed.
    pub rt_connect_timeout_secs: Option<u64>,
    /// Optional heartbeat interval (seconds) for the realtime connection.
    pub heartbeat_interval_secs: Option<u64>,
    /// Optional initial reconnection delay in milliseconds.
    pub reconnect_delay_initial_ms: Option<u64>,
    /// Optional maximum reconnection delay in milliseconds.
    pub reconnect_delay_max_ms: Option<u64>,
    /// Optional maximum number of reconnection attempts (unlimited when `None`).
    pub reconnect_max_attempts: Option<u32>,
}

impl Default for BackendlessConfig {
    fn default() -> Self {
        Self {
            app_id: None,
            api_key: None,
            base_url_http: None,
            base_url_rt: None,
            http_proxy_url: None,
            http_timeout_secs: Some(60),
            rt_method_timeout_secs: Some(DEFAULT_RT_METHOD_TIMEOUT_SECS),
            rt_connect_timeout_secs: Some(DEFAULT_RT_CONNECT_TIMEOUT_SECS),
            heartbeat_interval_secs: Some(30),
            reconnect_delay_initial_ms: Some(2_000),
            reconnect_delay_max_ms: Some(30_000),
            reconnect_max_attempts: None,
        }
    }
}

impl BackendlessConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration for the given application credentials.
    #[must_use]
    pub fn with_credentials(app_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            app_id: Some(app_id.into()),
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    /// Creates a configuration from the `BACKENDLESS_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `BACKENDLESS_APP_ID` or `BACKENDLESS_API_KEY` is not set.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates a configuration reading variables through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns an error if the application id or API key is missing.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let app_id = get(BACKENDLESS_APP_ID_ENV)
            .ok_or_else(|| anyhow::anyhow!("Missing environment variable: {BACKENDLESS_APP_ID_ENV}"))?;
        let api_key = get(BACKENDLESS_API_KEY_ENV).ok_or_else(|| {
            anyhow::anyhow!("Missing environment variable: {BACKENDLESS_API_KEY_ENV}")
        })?;

        Ok(Self {
            app_id: Some(app_id),
            api_key: Some(api_key),
            base_url_http: get(BACKENDLESS_BASE_URL_ENV),
            base_url_rt: get(BACKENDLESS_RT_URL_ENV),
            ..Self::default()
        })
    }

    /// Returns `true` if both the application id and API key are available.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.app_id.is_some() && self.api_key.is_some()
    }

    /// Returns the application credential.
    ///
    /// # Errors
    ///
    /// Returns an error if the application id or API key is missing.
    pub fn credential(&self) -> anyhow::Result<Credential> {
        match (&self.app_id, &self.api_key) {
            (Some(app_id), Some(api_key)) => Ok(Credential::new(app_id, api_key)),
            _ => anyhow::bail!("Both app_id and api_key must be configured"),
        }
    }

    /// Returns the REST base URL, considering overrides.
    #[must_use]
    pub fn http_base_url(&self) -> String {
        self.base_url_http
            .clone()
            .unwrap_or_else(|| BACKENDLESS_HTTP_URL.to_string())
    }

    /// Returns the configured realtime URL, if any.
    #[must_use]
    pub fn rt_url(&self) -> Option<String> {
        self.base_url_rt.clone()
    }
}
