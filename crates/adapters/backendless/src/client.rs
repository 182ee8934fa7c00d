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

//! Application level client bundling the geo, realtime and geofencing services.

use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::{
    config::BackendlessConfig,
    error::Fault,
    geo::point::GeoPoint,
    geofence::{GeofenceCallback, GeofenceMonitor, LocationCapability, ServerCallback},
    http::{client::GeoHttpClient, error::BackendlessHttpError},
    messaging::Channel,
    websocket::BackendlessRtClient,
};

/// Client for one Backendless application.
///
/// The realtime connection is created on first use and shared by every channel.
#[derive(Clone, Debug)]
pub struct BackendlessClient {
    config: BackendlessConfig,
    geo: GeoHttpClient,
    rt: Arc<OnceCell<BackendlessRtClient>>,
    geofence: GeofenceMonitor,
}

impl BackendlessClient {
    /// Creates a new [`BackendlessClient`] instance.
    ///
    /// `location` selects the location provider used for geofence monitoring.
    ///
    /// # Errors
    ///
    /// Returns an error if credentials are missing or the HTTP client cannot be created.
    pub fn new(
        config: BackendlessConfig,
        location: LocationCapability,
    ) -> Result<Self, BackendlessHttpError> {
        let geo = GeoHttpClient::new(&config)?;
        Ok(Self {
            config,
            geo,
            rt: Arc::new(OnceCell::new()),
            geofence: GeofenceMonitor::new(location),
        })
    }

    #[must_use]
    pub fn config(&self) -> &BackendlessConfig {
        &self.config
    }

    /// Returns the geo REST client.
    #[must_use]
    pub fn geo(&self) -> &GeoHttpClient {
        &self.geo
    }

    /// Returns the local geofence monitor.
    #[must_use]
    pub fn geofence_monitor(&self) -> &GeofenceMonitor {
        &self.geofence
    }

    /// Returns the shared realtime client.
    ///
    /// The realtime URL is taken from the configuration, or looked up through the REST API on
    /// first use.
    ///
    /// # Errors
    ///
    /// Returns a fault if the lookup fails.
    pub async fn rt_client(&self) -> Result<BackendlessRtClient, Fault> {
        self.rt
            .get_or_try_init(|| async {
                let rt_url = match self.config.rt_url() {
                    Some(url) => url,
                    None => {
                        tracing::debug!("Looking up realtime server URL");
                        self.geo.rt_lookup().await.map_err(|e| e.fault())?
                    }
                };
                BackendlessRtClient::new(&rt_url, &self.config).map_err(|e| e.fault())
            })
            .await
            .cloned()
    }

    /// Returns a handle to the named channel, not yet joined.
    ///
    /// # Errors
    ///
    /// Returns a fault if the realtime client cannot be created.
    pub async fn channel(&self, name: impl Into<String>) -> Result<Channel, Fault> {
        let rt_client = self.rt_client().await?;
        Ok(Channel::new(name, rt_client))
    }

    /// Fetches the server defined geofences, all of them or only `fence_name`, and starts
    /// monitoring them locally.
    ///
    /// # Errors
    ///
    /// Returns a fault if:
    /// - Location services are unavailable.
    /// - The fences cannot be fetched, or the named fence does not exist.
    /// - A fetched fence is already monitored.
    pub async fn start_geofence_monitoring(
        &self,
        fence_name: Option<&str>,
        callback: Arc<dyn GeofenceCallback>,
    ) -> Result<(), Fault> {
        if !self.geofence.is_location_available() {
            return Err(Fault::local("Location services are unavailable"));
        }

        let fences = self
            .geo
            .get_geo_fences(fence_name)
            .await
            .map_err(|e| e.fault())?;

        if let Some(name) = fence_name
            && fences.is_empty()
        {
            return Err(Fault::local(format!("Geofence '{name}' does not exist")));
        }

        tracing::info!("Starting monitoring of {} geofence(s)", fences.len());
        self.geofence.add_fences(fences, callback)?;
        self.geofence.start()
    }

    /// Starts monitoring like [`Self::start_geofence_monitoring`], reporting every transition
    /// of `point` to the backend.
    ///
    /// # Errors
    ///
    /// Returns a fault under the same conditions as [`Self::start_geofence_monitoring`].
    pub async fn start_geofence_monitoring_with_point(
        &self,
        fence_name: Option<&str>,
        point: GeoPoint,
    ) -> Result<(), Fault> {
        let callback = Arc::new(ServerCallback::new(self.geo.clone(), point));
        self.start_geofence_monitoring(fence_name, callback).await
    }

    /// Stops monitoring `fence_name`, or every fence when `None`.
    ///
    /// Location tracking stops once no fences remain.
    pub fn stop_geofence_monitoring(&self, fence_name: Option<&str>) {
        match fence_name {
            Some(name) => {
                if !self.geofence.remove_fence(name) {
                    tracing::debug!("Geofence '{name}' was not monitored");
                }
            }
            None => self.geofence.remove_all(),
        }
    }

    /// Stops monitoring, cancels pending requests and closes the realtime connection.
    pub async fn close(&self) {
        self.geofence.remove_all();
        self.geo.cancel_all_requests();
        if let Some(rt_client) = self.rt.get() {
            rt_client.close().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::{error::FaultKind, geofence::ClientCallback};

    fn config() -> BackendlessConfig {
        let mut config = BackendlessConfig::with_credentials("app", "key");
        config.base_url_http = Some("http://127.0.0.1:1".to_string());
        config
    }

    #[rstest]
    fn test_new_requires_credentials() {
        let result = BackendlessClient::new(BackendlessConfig::new(), LocationCapability::Unavailable);
        assert!(result.is_err());
    }

    #[rstest]
    #[tokio::test]
    async fn test_rt_client_uses_configured_url() {
        let mut config = config();
        config.base_url_rt = Some("http://127.0.0.1:2".to_string());
        let client = BackendlessClient::new(config, LocationCapability::Unavailable).unwrap();

        let rt_client = client.rt_client().await.unwrap();
        let channel = client.channel("chat").await.unwrap();

        assert!(format!("{rt_client:?}").contains("ws://127.0.0.1:2/app"));
        assert_eq!(channel.name(), "chat");
        assert!(!channel.is_joined());
    }

    #[rstest]
    #[tokio::test]
    async fn test_geofence_monitoring_without_location_is_local_fault() {
        let client = BackendlessClient::new(config(), LocationCapability::Unavailable).unwrap();
        let callback = Arc::new(ClientCallback::new(|_| {}));

        let fault = client
            .start_geofence_monitoring(None, callback)
            .await
            .unwrap_err();

        assert_eq!(fault.kind, FaultKind::Local);
        assert!(!client.geofence_monitor().is_monitoring());
    }

    #[rstest]
    #[tokio::test]
    async fn test_rt_lookup_failure_is_transport_fault() {
        let client = BackendlessClient::new(config(), LocationCapability::Unavailable).unwrap();

        let fault = client.rt_client().await.unwrap_err();

        assert_eq!(fault.kind, FaultKind::Transport);
    }
}
