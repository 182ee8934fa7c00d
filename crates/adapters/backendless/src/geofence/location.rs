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

//! Location capability consumed by the geofence monitor.

use std::{fmt::Debug, pin::Pin, sync::Arc};

use futures_util::Stream;
use tokio::sync::broadcast;

use crate::geo::point::GeoCoordinate;

const LOCATION_CHANNEL_CAPACITY: usize = 64;

/// A stream of device location updates.
pub type LocationStream = Pin<Box<dyn Stream<Item = GeoCoordinate> + Send>>;

/// A source of device location updates.
pub trait LocationProvider: Send + Sync + Debug {
    /// Returns a new stream of location updates.
    fn subscribe(&self) -> LocationStream;
}

/// Location support selected when the client is created.
#[derive(Clone, Debug, Default)]
pub enum LocationCapability {
    Available(Arc<dyn LocationProvider>),
    /// No location services, geofence monitoring cannot be started.
    #[default]
    Unavailable,
}

impl LocationCapability {
    /// Wraps `provider` as an available capability.
    #[must_use]
    pub fn available(provider: impl LocationProvider + 'static) -> Self {
        Self::Available(Arc::new(provider))
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
}

/// A [`LocationProvider`] fed by the application through [`ChannelLocationProvider::push`].
#[derive(Clone, Debug)]
pub struct ChannelLocationProvider {
    tx: broadcast::Sender<GeoCoordinate>,
}

impl Default for ChannelLocationProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelLocationProvider {
    /// Creates a new [`ChannelLocationProvider`] instance.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(LOCATION_CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Publishes a location update to every subscriber.
    ///
    /// Returns the number of subscribers which received the update.
    pub fn push(&self, coordinate: GeoCoordinate) -> usize {
        self.tx.send(coordinate).unwrap_or(0)
    }
}

impl LocationProvider for ChannelLocationProvider {
    fn subscribe(&self) -> LocationStream {
        let mut rx = self.tx.subscribe();

        Box::pin(async_stream::stream! {
            loop {
                match rx.recv().await {
                    Ok(coordinate) => yield coordinate,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!("Location stream lagged, skipped {skipped} updates");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}
