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

//! Geo points, clusters and the result type of point queries.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::query::GeoQuery;

/// A latitude/longitude pair in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoCoordinate {
    /// Creates a new [`GeoCoordinate`] instance.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A geolocated point stored by the backend.
///
/// `object_id` is `None` until the point has been persisted, saving a point without an id
/// creates it while saving a point with an id updates it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeoPoint {
    pub object_id: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub categories: BTreeSet<String>,
    pub metadata: Map<String, Value>,
    /// Distance from the query centre, only set by relative searches.
    pub distance: Option<f64>,
}

impl GeoPoint {
    /// Creates a new unsaved [`GeoPoint`] at the given position.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_object_id(mut self, object_id: impl Into<String>) -> Self {
        self.object_id = Some(object_id.into());
        self
    }

    #[must_use]
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Returns the position of the point.
    #[must_use]
    pub fn coordinate(&self) -> GeoCoordinate {
        GeoCoordinate::new(self.latitude, self.longitude)
    }

    /// Returns `true` once the point has a backend identity.
    #[must_use]
    pub fn is_persisted(&self) -> bool {
        self.object_id.is_some()
    }
}

/// An aggregation of points within a map tile.
#[derive(Clone, Debug, PartialEq)]
pub struct GeoCluster {
    /// Position, id and categories of the cluster.
    pub point: GeoPoint,
    /// Number of points aggregated by the cluster.
    pub total_points: u64,
    /// The query which produced the cluster, needed to load its points.
    pub query: Option<GeoQuery>,
}

/// A single element of a point query result.
#[derive(Clone, Debug, PartialEq)]
pub enum GeoResult {
    Point(GeoPoint),
    Cluster(GeoCluster),
}

impl GeoResult {
    /// Returns the underlying point (the cluster position for clusters).
    #[must_use]
    pub fn point(&self) -> &GeoPoint {
        match self {
            Self::Point(point) => point,
            Self::Cluster(cluster) => &cluster.point,
        }
    }

    #[must_use]
    pub fn is_cluster(&self) -> bool {
        matches!(self, Self::Cluster(_))
    }

    #[must_use]
    pub fn as_cluster(&self) -> Option<&GeoCluster> {
        match self {
            Self::Cluster(cluster) => Some(cluster),
            Self::Point(_) => None,
        }
    }
}
