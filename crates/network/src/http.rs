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

//! A thin asynchronous HTTP client over `reqwest`.
//!
//! The client carries default headers and a default timeout. Each request may override the
//! timeout and add headers. Responses are returned in full so adapters can classify the status
//! and body themselves.

use std::{collections::HashMap, str::FromStr, time::Duration};

use bytes::Bytes;
pub use reqwest::Method;
use reqwest::{
    StatusCode,
    header::{HeaderMap, HeaderName, HeaderValue},
};

/// The `User-Agent` header name.
pub const USER_AGENT: &str = "User-Agent";

/// Default request timeout (seconds) when none is configured.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// An HTTP status code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HttpStatus {
    inner: StatusCode,
}

impl HttpStatus {
    /// Creates a new [`HttpStatus`] instance.
    #[must_use]
    pub const fn new(code: StatusCode) -> Self {
        Self { inner: code }
    }

    /// Returns the status code as a `u16`.
    #[must_use]
    pub const fn as_u16(&self) -> u16 {
        self.inner.as_u16()
    }

    /// Returns `true` for a 2xx status.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.inner.is_success()
    }

    /// Returns `true` for a 4xx status.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.inner.is_client_error()
    }

    /// Returns `true` for a 5xx status.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.inner.is_server_error()
    }
}

impl TryFrom<u16> for HttpStatus {
    type Error = anyhow::Error;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        Ok(Self::new(StatusCode::from_u16(code)?))
    }
}

impl std::fmt::Display for HttpStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

/// A complete HTTP response.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The response status.
    pub status: HttpStatus,
    /// The response headers (lower case names).
    pub headers: HashMap<String, String>,
    /// The raw response body.
    pub body: Bytes,
}

/// Errors returned by [`HttpClient`].
#[derive(thiserror::Error, Debug)]
pub enum HttpClientError {
    #[error("HTTP error occurred: {0}")]
    Error(String),

    #[error("HTTP request timed out: {0}")]
    TimeoutError(String),

    #[error("Invalid proxy configuration: {0}")]
    InvalidProxy(String),

    #[error("Failed to build HTTP client: {0}")]
    ClientBuildError(String),
}

impl From<reqwest::Error> for HttpClientError {
    fn from(source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::TimeoutError(source.to_string())
        } else {
            Self::Error(source.to_string())
        }
    }
}

/// An asynchronous HTTP client with default headers and timeout.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: reqwest::Client,
    default_headers: HashMap<String, String>,
    timeout: Duration,
}

impl HttpClient {
    /// Creates a new [`HttpClient`] instance.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The proxy URL is invalid.
    /// - The underlying client cannot be built.
    pub fn new(
        default_headers: HashMap<String, String>,
        timeout_secs: Option<u64>,
        proxy_url: Option<String>,
    ) -> Result<Self, HttpClientError> {
        let mut builder = reqwest::Client::builder();

        if let Some(proxy_url) = proxy_url {
            let proxy = reqwest::Proxy::all(&proxy_url)
                .map_err(|e| HttpClientError::InvalidProxy(format!("{proxy_url}: {e}")))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| HttpClientError::ClientBuildError(e.to_string()))?;

        Ok(Self {
            client,
            default_headers,
            timeout: Duration::from_secs(timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        })
    }

    /// Sends an HTTP request and returns the full response.
    ///
    /// Headers given here are merged over the default headers.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A header name or value is invalid.
    /// - The request fails or times out.
    /// - The response body cannot be read.
    pub async fn request(
        &self,
        method: Method,
        url: String,
        headers: Option<HashMap<String, String>>,
        body: Option<Vec<u8>>,
        timeout_secs: Option<u64>,
    ) -> Result<HttpResponse, HttpClientError> {
        let mut merged = self.default_headers.clone();
        if let Some(headers) = headers {
            merged.extend(headers);
        }
        let header_map = to_header_map(&merged)?;

        let timeout = timeout_secs.map_or(self.timeout, Duration::from_secs);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .headers(header_map)
            .timeout(timeout);

        if let Some(body) = body {
            request = request.body(body);
        }

        tracing::trace!("{method} {url}");

        let response = request.send().await?;
        let status = HttpStatus::new(response.status());
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }

    /// Sends a `GET` request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails (see [`HttpClient::request`]).
    pub async fn get(
        &self,
        url: String,
        headers: Option<HashMap<String, String>>,
        timeout_secs: Option<u64>,
    ) -> Result<HttpResponse, HttpClientError> {
        self.request(Method::GET, url, headers, None, timeout_secs)
            .await
    }
}

fn to_header_map(headers: &HashMap<String, String>) -> Result<HeaderMap, HttpClientError> {
    let mut header_map = HeaderMap::with_capacity(headers.len());
    for (key, value) in headers {
        let name = HeaderName::from_str(key)
            .map_err(|e| HttpClientError::Error(format!("Invalid header name '{key}': {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| HttpClientError::Error(format!("Invalid header value for '{key}': {e}")))?;
        header_map.insert(name, value);
    }
    Ok(header_map)
}
