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

//! Data transfer objects for (de)serializing Backendless geo API payloads.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    common::parse::deserialize_null_default,
    geo::point::{GeoCoordinate, GeoPoint},
};

/// A geo point or cluster as returned by the geo endpoints.
///
/// Clusters are recognised by the presence of `totalPoints`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendlessGeoPoint {
    #[serde(default)]
    pub object_id: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub categories: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub metadata: Map<String, Value>,
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_points: Option<u64>,
}

/// Request body for `POST geo/points` and `PUT geo/points/{id}`.
#[derive(Clone, Debug, Serialize)]
pub struct SaveGeoPointRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub categories: Vec<String>,
    pub metadata: Map<String, Value>,
}

impl From<&GeoPoint> for SaveGeoPointRequest {
    fn from(point: &GeoPoint) -> Self {
        Self {
            latitude: point.latitude,
            longitude: point.longitude,
            categories: point.categories.iter().cloned().collect(),
            metadata: point.metadata.clone(),
        }
    }
}

/// Response payload returned by `POST geo/points`.
#[derive(Clone, Debug, Deserialize)]
pub struct GeoPointCreateResponse {
    pub geopoint: BackendlessGeoPoint,
}

/// Request body for `POST geo/fence/{action}` reporting the current position.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct FenceActionRequest {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<&GeoPoint> for FenceActionRequest {
    fn from(point: &GeoPoint) -> Self {
        Self {
            latitude: point.latitude,
            longitude: point.longitude,
        }
    }
}

/// Response payload of a fence action without a point body.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FenceActionResponse {
    #[serde(default)]
    pub total_objects: Option<i64>,
}

/// A geo category with the number of points it holds.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendlessGeoCategory {
    #[serde(default)]
    pub object_id: Option<String>,
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub size: u64,
}

/// Response payload returned by `DELETE geo/categories/{name}`.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct DeleteCategoryResponse {
    pub result: bool,
}

/// A geofence definition as returned by `GET geo/fences`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendlessGeoFence {
    #[serde(default)]
    pub object_id: Option<String>,
    pub geofence_name: String,
    /// Geometry name, `CIRCLE`, `RECT` or `SHAPE`.
    #[serde(rename = "type")]
    pub fence_type: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub nodes: Vec<GeoCoordinate>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub on_stay_duration: u64,
    #[serde(default, rename = "qualCriteria")]
    pub qualifying_criteria: Option<String>,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::common::testing::load_test_json;

    #[rstest]
    fn test_deserialize_geo_point_with_nulls() {
        let json = r#"{"objectId":"A1","latitude":1.5,"longitude":-2.5,"categories":null,"metadata":null}"#;
        let point: BackendlessGeoPoint = serde_json::from_str(json).unwrap();

        assert_eq!(point.object_id.as_deref(), Some("A1"));
        assert!(point.categories.is_empty());
        assert!(point.metadata.is_empty());
        assert!(point.total_points.is_none());
    }

    #[rstest]
    fn test_deserialize_create_response() {
        let json = load_test_json("http_save_geo_point.json");
        let response: GeoPointCreateResponse = serde_json::from_str(&json).unwrap();

        assert_eq!(response.geopoint.object_id.as_deref(), Some("abc"));
        assert_eq!(response.geopoint.latitude, 10.0);
    }

    #[rstest]
    fn test_deserialize_geo_fences() {
        let json = load_test_json("http_get_geo_fences.json");
        let fences: Vec<Value> = serde_json::from_str(&json).unwrap();
        let fence: BackendlessGeoFence = serde_json::from_value(fences[0].clone()).unwrap();

        assert_eq!(fence.geofence_name, "office");
        assert_eq!(fence.fence_type, "CIRCLE");
        assert_eq!(fence.nodes.len(), 2);
        assert_eq!(fence.on_stay_duration, 5);
    }

    #[rstest]
    fn test_serialize_save_request() {
        let point = GeoPoint::new(10.0, 20.0)
            .with_categories(["b", "a"])
            .with_metadata("city", "Dallas");
        let body = serde_json::to_value(SaveGeoPointRequest::from(&point)).unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "latitude": 10.0,
                "longitude": 20.0,
                "categories": ["a", "b"],
                "metadata": {"city": "Dallas"},
            })
        );
    }
}
