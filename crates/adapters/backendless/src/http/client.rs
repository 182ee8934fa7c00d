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

//! Provides the HTTP client integration for the Backendless geo REST API.

use std::{collections::HashMap, fmt::Debug, sync::Arc};

use backendless_network::http::{HttpClient, HttpResponse, Method, USER_AGENT};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;

use super::{
    error::BackendlessHttpError,
    models::{
        BackendlessGeoCategory, BackendlessGeoPoint, DeleteCategoryResponse, FenceActionRequest,
        FenceActionResponse, GeoPointCreateResponse, SaveGeoPointRequest,
    },
    parse::{
        classify_response, parse_count, parse_geo_category, parse_geo_fences, parse_geo_point,
        parse_geo_results, parse_rt_lookup,
    },
    query::{
        GEO_CATEGORIES_ENDPOINT, GEO_COUNT_ENDPOINT, GEO_POINTS_ENDPOINT,
        GEO_RELATIVE_POINTS_ENDPOINT, build_cluster_points_endpoint, build_fence_action_endpoint,
        build_fence_points_endpoint, build_geo_fences_endpoint, build_query_endpoint,
    },
};
use crate::{
    common::{
        consts::{BACKENDLESS_HTTP_URL, BACKENDLESS_USER_AGENT, RT_LOOKUP_ENDPOINT},
        credential::Credential,
        enums::FenceAction,
        urls::build_rest_url,
    },
    config::BackendlessConfig,
    geo::{GeoCategory, GeoCluster, GeoFence, GeoPoint, GeoQuery, GeoResult},
};

/// Raw HTTP client for low-level Backendless geo API operations.
///
/// This client handles request/response operations with the Backendless API,
/// returning wire models. It does not adapt them into SDK domain types.
pub struct BackendlessRawHttpClient {
    base_url: String,
    credential: Credential,
    client: HttpClient,
    cancellation_token: CancellationToken,
}

impl Debug for BackendlessRawHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(stringify!(BackendlessRawHttpClient))
            .field("base_url", &self.base_url)
            .field("app_id", &self.credential.app_id())
            .field("api_key", &self.credential.masked_api_key())
            .finish()
    }
}

impl BackendlessRawHttpClient {
    /// Creates a new [`BackendlessRawHttpClient`] instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(
        credential: Credential,
        base_url: Option<String>,
        timeout_secs: Option<u64>,
        proxy_url: Option<String>,
    ) -> Result<Self, BackendlessHttpError> {
        Ok(Self {
            base_url: base_url.unwrap_or_else(|| BACKENDLESS_HTTP_URL.to_string()),
            credential,
            client: HttpClient::new(Self::default_headers(), timeout_secs, proxy_url).map_err(
                |e| BackendlessHttpError::NetworkError(format!("Failed to create HTTP client: {e}")),
            )?,
            cancellation_token: CancellationToken::new(),
        })
    }

    /// Creates a new [`BackendlessRawHttpClient`] from a [`BackendlessConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if credentials are missing or the HTTP client cannot be created.
    pub fn from_config(config: &BackendlessConfig) -> Result<Self, BackendlessHttpError> {
        let credential = config
            .credential()
            .map_err(|e| BackendlessHttpError::Precondition(e.to_string()))?;
        Self::new(
            credential,
            Some(config.http_base_url()),
            config.http_timeout_secs,
            config.http_proxy_url.clone(),
        )
    }

    /// Returns the base URL for this client.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the application id used for requests.
    #[must_use]
    pub fn app_id(&self) -> &str {
        self.credential.app_id()
    }

    /// Cancel all pending HTTP requests.
    pub fn cancel_all_requests(&self) {
        self.cancellation_token.cancel();
    }

    /// Get the cancellation token for this client.
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation_token
    }

    fn default_headers() -> HashMap<String, String> {
        HashMap::from([
            (USER_AGENT.to_string(), BACKENDLESS_USER_AGENT.to_string()),
            ("Accept".to_string(), "application/json".to_string()),
        ])
    }

    fn url(&self, endpoint: &str) -> String {
        build_rest_url(
            &self.base_url,
            self.credential.app_id(),
            self.credential.api_key(),
            endpoint,
        )
    }

    /// Sends a request and classifies the response, returning it when it is not a fault.
    async fn send_raw<B: Serialize>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<HttpResponse, BackendlessHttpError> {
        let url = self.url(endpoint);

        let mut headers = HashMap::new();
        let body = match body {
            Some(body) => {
                headers.insert("Content-Type".to_string(), "application/json".to_string());
                Some(serde_json::to_vec(body)?)
            }
            None => None,
        };

        tracing::debug!("{method} {endpoint}");

        let response = tokio::select! {
            biased;
            () = self.cancellation_token.cancelled() => {
                return Err(BackendlessHttpError::Canceled(
                    "Client shutting down".to_string(),
                ));
            }
            response = self.client.request(method, url, Some(headers), body, None) => response?,
        };

        classify_response(response.status.as_u16(), &response.body)?;
        Ok(response)
    }

    async fn send_request<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<T, BackendlessHttpError> {
        let response = self.send_raw(method, endpoint, body).await?;
        serde_json::from_slice(&response.body).map_err(|e| {
            BackendlessHttpError::JsonError(format!(
                "Failed to deserialize response: {e}\nBody: {}",
                String::from_utf8_lossy(&response.body)
            ))
        })
    }

    /// Creates a geo point.
    ///
    /// # Endpoint
    /// `POST geo/points`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    pub async fn create_geo_point(
        &self,
        request: &SaveGeoPointRequest,
    ) -> Result<BackendlessGeoPoint, BackendlessHttpError> {
        let response: GeoPointCreateResponse = self
            .send_request(Method::POST, GEO_POINTS_ENDPOINT, Some(request))
            .await?;
        Ok(response.geopoint)
    }

    /// Updates an existing geo point.
    ///
    /// # Endpoint
    /// `PUT geo/points/{object_id}`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    pub async fn update_geo_point(
        &self,
        object_id: &str,
        request: &SaveGeoPointRequest,
    ) -> Result<BackendlessGeoPoint, BackendlessHttpError> {
        let endpoint = format!("{GEO_POINTS_ENDPOINT}/{}", urlencoding::encode(object_id));
        self.send_request(Method::PUT, &endpoint, Some(request)).await
    }

    /// Deletes a geo point.
    ///
    /// # Endpoint
    /// `DELETE geo/points/{object_id}`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend returns a fault.
    pub async fn delete_geo_point(&self, object_id: &str) -> Result<(), BackendlessHttpError> {
        let endpoint = format!("{GEO_POINTS_ENDPOINT}/{}", urlencoding::encode(object_id));
        self.send_raw::<()>(Method::DELETE, &endpoint, None).await?;
        Ok(())
    }

    /// Fetches the metadata of a geo point.
    ///
    /// # Endpoint
    /// `GET geo/points/{object_id}/metadata`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    pub async fn get_geo_point_metadata(
        &self,
        object_id: &str,
    ) -> Result<Map<String, Value>, BackendlessHttpError> {
        let endpoint = format!(
            "{GEO_POINTS_ENDPOINT}/{}/metadata",
            urlencoding::encode(object_id)
        );
        self.send_request::<_, ()>(Method::GET, &endpoint, None).await
    }

    /// Fetches the raw elements of a point listing endpoint.
    ///
    /// # Endpoint
    /// `GET {endpoint}`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a JSON array.
    pub async fn get_geo_point_values(
        &self,
        endpoint: &str,
    ) -> Result<Vec<Value>, BackendlessHttpError> {
        self.send_request::<_, ()>(Method::GET, endpoint, None).await
    }

    /// Counts the points matched by an endpoint.
    ///
    /// # Endpoint
    /// `GET geo/count`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not an integer.
    pub async fn get_points_count(&self, endpoint: &str) -> Result<u64, BackendlessHttpError> {
        let response = self.send_raw::<()>(Method::GET, endpoint, None).await?;
        parse_count(&response.body)
            .map_err(|e| BackendlessHttpError::ParseError(format!("{e:#}")))
    }

    /// Creates a geo category.
    ///
    /// # Endpoint
    /// `PUT geo/categories/{name}`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    pub async fn add_category(
        &self,
        name: &str,
    ) -> Result<BackendlessGeoCategory, BackendlessHttpError> {
        let endpoint = format!("{GEO_CATEGORIES_ENDPOINT}/{}", urlencoding::encode(name));
        self.send_request::<_, ()>(Method::PUT, &endpoint, None).await
    }

    /// Deletes a geo category.
    ///
    /// # Endpoint
    /// `DELETE geo/categories/{name}`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    pub async fn delete_category(&self, name: &str) -> Result<bool, BackendlessHttpError> {
        let endpoint = format!("{GEO_CATEGORIES_ENDPOINT}/{}", urlencoding::encode(name));
        let response: DeleteCategoryResponse = self
            .send_request::<_, ()>(Method::DELETE, &endpoint, None)
            .await?;
        Ok(response.result)
    }

    /// Fetches all geo categories.
    ///
    /// # Endpoint
    /// `GET geo/categories`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    pub async fn get_categories(&self) -> Result<Vec<BackendlessGeoCategory>, BackendlessHttpError> {
        self.send_request::<_, ()>(Method::GET, GEO_CATEGORIES_ENDPOINT, None)
            .await
    }

    /// Runs a server-side fence action.
    ///
    /// With a position the action runs for that position only and the result is `1`. Without
    /// one it runs for every point inside the fence and the result is the number of points.
    ///
    /// # Endpoint
    /// `POST geo/fence/{action}?geoFence={fence_name}`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend returns a fault.
    pub async fn run_fence_action(
        &self,
        action: FenceAction,
        fence_name: &str,
        position: Option<&FenceActionRequest>,
    ) -> Result<i64, BackendlessHttpError> {
        let endpoint = build_fence_action_endpoint(action, fence_name);
        let response = self.send_raw(Method::POST, &endpoint, position).await?;

        if position.is_some() {
            return Ok(1);
        }

        if response.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(0);
        }

        let result: FenceActionResponse = serde_json::from_slice(&response.body)?;
        Ok(result.total_objects.unwrap_or_default())
    }

    /// Fetches the raw geofence definitions, optionally filtered by name.
    ///
    /// # Endpoint
    /// `GET geo/fences[?geoFence={fence_name}]`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a JSON array.
    pub async fn get_geo_fences(
        &self,
        fence_name: Option<&str>,
    ) -> Result<Vec<Value>, BackendlessHttpError> {
        let endpoint = build_geo_fences_endpoint(fence_name);
        self.send_request::<_, ()>(Method::GET, &endpoint, None).await
    }

    /// Looks up the realtime server URL for the application.
    ///
    /// # Endpoint
    /// `GET rt/lookup`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is empty.
    pub async fn rt_lookup(&self) -> Result<String, BackendlessHttpError> {
        let response = self
            .send_raw::<()>(Method::GET, RT_LOOKUP_ENDPOINT, None)
            .await?;
        parse_rt_lookup(&response.body)
            .map_err(|e| BackendlessHttpError::ParseError(format!("{e:#}")))
    }
}

/// Provides a higher-level HTTP client for the Backendless geo REST API.
///
/// This client wraps the underlying [`BackendlessRawHttpClient`] and adapts every response
/// into SDK domain types.
#[derive(Clone, Debug)]
pub struct GeoHttpClient {
    pub(crate) inner: Arc<BackendlessRawHttpClient>,
}

impl GeoHttpClient {
    /// Creates a new [`GeoHttpClient`] from a [`BackendlessConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if credentials are missing or the HTTP client cannot be created.
    pub fn new(config: &BackendlessConfig) -> Result<Self, BackendlessHttpError> {
        Ok(Self::from_raw(BackendlessRawHttpClient::from_config(config)?))
    }

    /// Wraps an existing raw client.
    #[must_use]
    pub fn from_raw(raw: BackendlessRawHttpClient) -> Self {
        Self {
            inner: Arc::new(raw),
        }
    }

    /// Returns a reference to the underlying raw client.
    #[must_use]
    pub fn raw(&self) -> &BackendlessRawHttpClient {
        &self.inner
    }

    /// Cancel all pending HTTP requests.
    pub fn cancel_all_requests(&self) {
        self.inner.cancel_all_requests();
    }

    /// Saves a geo point, creating it when it has no object id and updating it otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    pub async fn save_geo_point(&self, point: &GeoPoint) -> Result<GeoPoint, BackendlessHttpError> {
        let request = SaveGeoPointRequest::from(point);
        let wire = match &point.object_id {
            Some(object_id) => self.inner.update_geo_point(object_id, &request).await?,
            None => self.inner.create_geo_point(&request).await?,
        };
        Ok(parse_geo_point(wire))
    }

    /// Removes a persisted geo point.
    ///
    /// # Errors
    ///
    /// Returns a local fault if the point has no object id, otherwise an error if the request
    /// fails.
    pub async fn remove_geo_point(&self, point: &GeoPoint) -> Result<(), BackendlessHttpError> {
        let object_id = point
            .object_id
            .as_deref()
            .ok_or_else(|| BackendlessHttpError::Precondition("geoPoint not found".to_string()))?;
        self.inner.delete_geo_point(object_id).await
    }

    /// Loads the metadata of a persisted geo point, returning the point with it attached.
    ///
    /// # Errors
    ///
    /// Returns a local fault if the point has no object id, otherwise an error if the request
    /// fails.
    pub async fn load_metadata(&self, point: &GeoPoint) -> Result<GeoPoint, BackendlessHttpError> {
        let object_id = point
            .object_id
            .as_deref()
            .ok_or_else(|| BackendlessHttpError::Precondition("geoPoint not found".to_string()))?;
        let metadata = self.inner.get_geo_point_metadata(object_id).await?;

        let mut point = point.clone();
        point.metadata = metadata;
        Ok(point)
    }

    async fn get_results(
        &self,
        endpoint: &str,
        query: Option<&GeoQuery>,
    ) -> Result<Vec<GeoResult>, BackendlessHttpError> {
        let values = self.inner.get_geo_point_values(endpoint).await?;
        Ok(parse_geo_results(values, query))
    }

    /// Fetches the points (and clusters) matched by `query`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is not an array.
    pub async fn get_points(
        &self,
        query: Option<&GeoQuery>,
    ) -> Result<Vec<GeoResult>, BackendlessHttpError> {
        let endpoint = build_query_endpoint(GEO_POINTS_ENDPOINT, query);
        self.get_results(&endpoint, query).await
    }

    /// Finds points relative to the metadata given in `query`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is not an array.
    pub async fn relative_find(
        &self,
        query: &GeoQuery,
    ) -> Result<Vec<GeoResult>, BackendlessHttpError> {
        let endpoint = build_query_endpoint(GEO_RELATIVE_POINTS_ENDPOINT, Some(query));
        self.get_results(&endpoint, Some(query)).await
    }

    /// Fetches the points inside the named fence.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is not an array.
    pub async fn get_fence_points(
        &self,
        fence_name: &str,
        query: Option<&GeoQuery>,
    ) -> Result<Vec<GeoResult>, BackendlessHttpError> {
        let endpoint = build_fence_points_endpoint(fence_name, query);
        self.get_results(&endpoint, query).await
    }

    /// Fetches the points aggregated by a cluster.
    ///
    /// # Errors
    ///
    /// Returns a local fault if the cluster has no object id or query, otherwise an error if
    /// the request fails.
    pub async fn get_cluster_points(
        &self,
        cluster: &GeoCluster,
    ) -> Result<Vec<GeoResult>, BackendlessHttpError> {
        let endpoint = build_cluster_points_endpoint(cluster)
            .map_err(|fault| BackendlessHttpError::Precondition(fault.message))?;
        self.get_results(&endpoint, cluster.query.as_ref()).await
    }

    /// Counts the points matched by `query`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not an integer.
    pub async fn get_points_count(
        &self,
        query: Option<&GeoQuery>,
    ) -> Result<u64, BackendlessHttpError> {
        let endpoint = build_query_endpoint(GEO_COUNT_ENDPOINT, query);
        self.inner.get_points_count(&endpoint).await
    }

    /// Creates a geo category.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    pub async fn add_category(&self, name: &str) -> Result<GeoCategory, BackendlessHttpError> {
        Ok(parse_geo_category(self.inner.add_category(name).await?))
    }

    /// Deletes a geo category, returning whether it existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    pub async fn delete_category(&self, name: &str) -> Result<bool, BackendlessHttpError> {
        self.inner.delete_category(name).await
    }

    /// Fetches all geo categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    pub async fn get_categories(&self) -> Result<Vec<GeoCategory>, BackendlessHttpError> {
        let categories = self.inner.get_categories().await?;
        Ok(categories.into_iter().map(parse_geo_category).collect())
    }

    /// Runs a server-side fence action, reporting `point` when given.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend returns a fault.
    pub async fn run_fence_action(
        &self,
        action: FenceAction,
        fence_name: &str,
        point: Option<&GeoPoint>,
    ) -> Result<i64, BackendlessHttpError> {
        let position = point.map(FenceActionRequest::from);
        self.inner
            .run_fence_action(action, fence_name, position.as_ref())
            .await
    }

    /// Runs the enter action of a fence.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend returns a fault.
    pub async fn run_on_enter_action(
        &self,
        fence_name: &str,
        point: Option<&GeoPoint>,
    ) -> Result<i64, BackendlessHttpError> {
        self.run_fence_action(FenceAction::OnEnter, fence_name, point)
            .await
    }

    /// Runs the stay action of a fence.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend returns a fault.
    pub async fn run_on_stay_action(
        &self,
        fence_name: &str,
        point: Option<&GeoPoint>,
    ) -> Result<i64, BackendlessHttpError> {
        self.run_fence_action(FenceAction::OnStay, fence_name, point)
            .await
    }

    /// Runs the exit action of a fence.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend returns a fault.
    pub async fn run_on_exit_action(
        &self,
        fence_name: &str,
        point: Option<&GeoPoint>,
    ) -> Result<i64, BackendlessHttpError> {
        self.run_fence_action(FenceAction::OnExit, fence_name, point)
            .await
    }

    /// Fetches geofences, optionally filtered by name, skipping malformed definitions.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is not an array.
    pub async fn get_geo_fences(
        &self,
        fence_name: Option<&str>,
    ) -> Result<Vec<GeoFence>, BackendlessHttpError> {
        let values = self.inner.get_geo_fences(fence_name).await?;
        Ok(parse_geo_fences(values))
    }

    /// Looks up the realtime server URL for the application.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is empty.
    pub async fn rt_lookup(&self) -> Result<String, BackendlessHttpError> {
        self.inner.rt_lookup().await
    }
}
