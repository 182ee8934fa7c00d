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

//! Response adapter turning raw Backendless HTTP responses into SDK domain types.
//!
//! Discrimination relies on structural markers only: a fault envelope is recognised by its
//! `code`/`faultCode` and `message` keys, a cluster by its `totalPoints` key.

use std::str::FromStr;

use anyhow::Context;
use serde_json::Value;

use super::{
    error::BackendlessErrorResponse,
    models::{BackendlessGeoCategory, BackendlessGeoFence, BackendlessGeoPoint},
};
use crate::{
    common::{consts::TOTAL_POINTS_KEY, enums::GeoFenceType},
    error::Fault,
    geo::{GeoCategory, GeoCluster, GeoFence, GeoPoint, GeoQuery, GeoResult},
};

const FAULT_ENVELOPE_KEYS: [&str; 4] = ["code", "faultCode", "message", "errorData"];

/// Classifies a raw response as success or fault.
///
/// Non-success statuses are always faults, using the envelope when the body holds one and
/// the status code otherwise. A success status carries a fault only when the body is exactly
/// a fault envelope.
///
/// # Errors
///
/// Returns the [`Fault`] carried by the response.
pub fn classify_response(status: u16, body: &[u8]) -> Result<(), Fault> {
    let value = serde_json::from_slice::<Value>(body).ok();

    if !(200..300).contains(&status) {
        let envelope = value
            .and_then(|v| serde_json::from_value::<BackendlessErrorResponse>(v).ok())
            .unwrap_or(BackendlessErrorResponse {
                code: None,
                message: None,
            });
        let message = envelope.message.unwrap_or_else(|| {
            let text = String::from_utf8_lossy(body).trim().to_string();
            if text.is_empty() {
                format!("HTTP status {status}")
            } else {
                text
            }
        });
        return Err(Fault::server(
            envelope.code.unwrap_or(i64::from(status)),
            message,
        ));
    }

    match value {
        Some(value) => match fault_from_envelope(&value) {
            Some(fault) => Err(fault),
            None => Ok(()),
        },
        None => Ok(()),
    }
}

/// Returns the fault held by `value` if it is a fault envelope.
#[must_use]
pub fn fault_from_envelope(value: &Value) -> Option<Fault> {
    let map = value.as_object()?;

    if map.is_empty() || !map.keys().all(|k| FAULT_ENVELOPE_KEYS.contains(&k.as_str())) {
        return None;
    }

    if !map.contains_key("message") || !(map.contains_key("code") || map.contains_key("faultCode"))
    {
        return None;
    }

    let envelope: BackendlessErrorResponse = serde_json::from_value(value.clone()).ok()?;
    Some(Fault::server(
        envelope.code.unwrap_or_default(),
        envelope.message.unwrap_or_default(),
    ))
}

/// Converts a wire geo point into a [`GeoPoint`], ignoring any cluster marker.
#[must_use]
pub fn parse_geo_point(wire: BackendlessGeoPoint) -> GeoPoint {
    GeoPoint {
        object_id: wire.object_id,
        latitude: wire.latitude,
        longitude: wire.longitude,
        categories: wire.categories.into_iter().collect(),
        metadata: wire.metadata,
        distance: wire.distance,
    }
}

/// Converts a wire geo point into a [`GeoCluster`] produced by `query`.
#[must_use]
pub fn parse_geo_cluster(wire: BackendlessGeoPoint, query: Option<&GeoQuery>) -> GeoCluster {
    let total_points = wire.total_points.unwrap_or_default();
    GeoCluster {
        point: parse_geo_point(wire),
        total_points,
        query: query.cloned(),
    }
}

/// Adapts a single element of a point query response.
///
/// # Errors
///
/// Returns an error if the element is not a valid geo point.
pub fn parse_geo_result(value: Value, query: Option<&GeoQuery>) -> anyhow::Result<GeoResult> {
    let is_cluster = value
        .as_object()
        .is_some_and(|map| map.contains_key(TOTAL_POINTS_KEY));
    let wire: BackendlessGeoPoint =
        serde_json::from_value(value).context("Failed to adapt geo point")?;

    if is_cluster {
        Ok(GeoResult::Cluster(parse_geo_cluster(wire, query)))
    } else {
        Ok(GeoResult::Point(parse_geo_point(wire)))
    }
}

/// Adapts every element of a point query response, preserving server order.
///
/// Elements which fail to adapt are skipped.
#[must_use]
pub fn parse_geo_results(values: Vec<Value>, query: Option<&GeoQuery>) -> Vec<GeoResult> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match parse_geo_result(value, query) {
            Ok(result) => Some(result),
            Err(e) => {
                tracing::warn!("Skipping geo point at index {index}: {e:#}");
                None
            }
        })
        .collect()
}

/// Converts a wire geofence into a [`GeoFence`].
///
/// # Errors
///
/// Returns an error if the fence type is unknown or there are too few nodes for it.
pub fn parse_geo_fence(wire: BackendlessGeoFence) -> anyhow::Result<GeoFence> {
    let fence_type = GeoFenceType::from_str(&wire.fence_type)
        .with_context(|| format!("Unknown geofence type '{}'", wire.fence_type))?;

    let min_nodes = GeoFence::min_nodes(fence_type);
    if wire.nodes.len() < min_nodes {
        anyhow::bail!(
            "Geofence '{}' of type {fence_type} needs {min_nodes} nodes, was {}",
            wire.geofence_name,
            wire.nodes.len()
        );
    }

    Ok(GeoFence {
        object_id: wire.object_id,
        name: wire.geofence_name,
        fence_type,
        nodes: wire.nodes,
        on_stay_duration: wire.on_stay_duration,
        qualifying_criteria: wire.qualifying_criteria,
    })
}

/// Adapts every element of a geofence listing, skipping malformed elements.
#[must_use]
pub fn parse_geo_fences(values: Vec<Value>) -> Vec<GeoFence> {
    values
        .into_iter()
        .filter_map(|value| {
            let result = serde_json::from_value::<BackendlessGeoFence>(value)
                .context("Failed to adapt geofence")
                .and_then(parse_geo_fence);
            match result {
                Ok(fence) => Some(fence),
                Err(e) => {
                    tracing::warn!("Skipping geofence: {e:#}");
                    None
                }
            }
        })
        .collect()
}

/// Converts a wire category into a [`GeoCategory`].
#[must_use]
pub fn parse_geo_category(wire: BackendlessGeoCategory) -> GeoCategory {
    GeoCategory {
        object_id: wire.object_id,
        name: wire.name,
        size: wire.size,
    }
}

/// Parses a count response, a bare integer body.
///
/// # Errors
///
/// Returns an error if the body is not a non-negative integer.
pub fn parse_count(body: &[u8]) -> anyhow::Result<u64> {
    let value: Value = serde_json::from_slice(body).context("Failed to parse count body")?;
    match &value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .with_context(|| format!("Invalid count {n}")),
        Value::String(s) => s
            .trim()
            .parse::<u64>()
            .with_context(|| format!("Invalid count '{s}'")),
        other => anyhow::bail!("Invalid count {other}"),
    }
}

/// Parses the realtime lookup response, a JSON string or plain text URL.
///
/// # Errors
///
/// Returns an error if the body is empty.
pub fn parse_rt_lookup(body: &[u8]) -> anyhow::Result<String> {
    let url = match serde_json::from_slice::<Value>(body) {
        Ok(Value::String(url)) => url,
        _ => String::from_utf8_lossy(body).trim().to_string(),
    };

    if url.is_empty() {
        anyhow::bail!("Empty realtime lookup response");
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;
    use tracing_test::traced_test;

    use super::*;
    use crate::{common::testing::load_test_json, error::FaultKind};

    #[rstest]
    fn test_mixed_points_and_clusters_keep_order() {
        let values = vec![
            json!({"totalPoints": 5, "latitude": 1, "longitude": 2}),
            json!({"latitude": 3, "longitude": 4}),
        ];
        let query = GeoQuery::builder().degree_per_pixel(0.5).build().unwrap();

        let results = parse_geo_results(values, Some(&query));

        assert_eq!(results.len(), 2);
        let cluster = results[0].as_cluster().expect("first element is a cluster");
        assert_eq!(cluster.total_points, 5);
        assert_eq!(cluster.point.latitude, 1.0);
        assert_eq!(cluster.query.as_ref(), Some(&query));
        assert!(!results[1].is_cluster());
        assert_eq!(results[1].point().latitude, 3.0);
        assert_eq!(results[1].point().longitude, 4.0);
    }

    #[rstest]
    fn test_malformed_points_are_skipped() {
        let json = load_test_json("http_get_points_mixed.json");
        let values: Vec<Value> = serde_json::from_str(&json).unwrap();

        let results = parse_geo_results(values, None);

        let ids: Vec<_> = results
            .iter()
            .map(|r| r.point().object_id.clone().unwrap())
            .collect();
        assert_eq!(ids, vec!["C1", "P2", "P3"]);
        assert_eq!(results[2].point().distance, Some(1234.5));
        assert!(results[2].point().categories.is_empty());
    }

    #[rstest]
    fn test_null_total_points_still_cluster() {
        let result =
            parse_geo_result(json!({"totalPoints": null, "latitude": 1, "longitude": 2}), None)
                .unwrap();
        assert_eq!(result.as_cluster().map(|c| c.total_points), Some(0));
    }

    #[rstest]
    fn test_geo_fences_skip_malformed() {
        let json = load_test_json("http_get_geo_fences.json");
        let values: Vec<Value> = serde_json::from_str(&json).unwrap();

        let fences = parse_geo_fences(values);

        let names: Vec<_> = fences.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["office", "campus"]);
        assert_eq!(fences[0].fence_type, GeoFenceType::Circle);
        assert_eq!(fences[0].on_stay_duration, 5);
        assert_eq!(fences[1].fence_type, GeoFenceType::Rect);
    }

    #[rstest]
    #[traced_test]
    fn test_skipped_geo_fence_is_logged() {
        let values = vec![json!({"geofenceName": "broken", "type": "TRIANGLE", "nodes": []})];

        assert!(parse_geo_fences(values).is_empty());
        assert!(logs_contain("Skipping geofence"));
    }

    #[rstest]
    #[case(400, br#"{"code":3064,"message":"Geo category not found"}"#.as_slice(), 3064, "Geo category not found")]
    #[case(500, br#"{"faultCode":"1000","message":"Boom"}"#.as_slice(), 1000, "Boom")]
    #[case(404, b"".as_slice(), 404, "HTTP status 404")]
    #[case(502, b"Bad Gateway".as_slice(), 502, "Bad Gateway")]
    fn test_classify_error_status(
        #[case] status: u16,
        #[case] body: &[u8],
        #[case] code: i64,
        #[case] message: &str,
    ) {
        let fault = classify_response(status, body).unwrap_err();
        assert_eq!(fault.kind, FaultKind::Server);
        assert_eq!(fault.code, code);
        assert_eq!(fault.message, message);
    }

    #[rstest]
    fn test_classify_fault_envelope_with_success_status() {
        let body = load_test_json("http_fault.json");
        let fault = classify_response(200, body.as_bytes()).unwrap_err();
        assert_eq!(fault, Fault::server(3064, "Geo category not found"));
    }

    #[rstest]
    #[case(b"".as_slice())]
    #[case(b"42".as_slice())]
    #[case(br#"{"result":true}"#.as_slice())]
    #[case(br#"{"message":"hello","latitude":1}"#.as_slice())]
    #[case(br#"{"code":1,"latitude":1,"message":"x"}"#.as_slice())]
    #[case(br#"[{"code":1,"message":"x"}]"#.as_slice())]
    fn test_classify_success(#[case] body: &[u8]) {
        assert!(classify_response(200, body).is_ok());
    }

    #[rstest]
    #[case(b"42".as_slice(), 42)]
    #[case(b"0".as_slice(), 0)]
    #[case(br#""17""#.as_slice(), 17)]
    fn test_parse_count(#[case] body: &[u8], #[case] expected: u64) {
        assert_eq!(parse_count(body).unwrap(), expected);
    }

    #[rstest]
    #[case(b"-1".as_slice())]
    #[case(b"{}".as_slice())]
    #[case(b"".as_slice())]
    fn test_parse_count_invalid(#[case] body: &[u8]) {
        assert!(parse_count(body).is_err());
    }

    #[rstest]
    #[case(br#""wss://rt.example.com""#.as_slice(), "wss://rt.example.com")]
    #[case(b"https://rt.example.com\n".as_slice(), "https://rt.example.com")]
    fn test_parse_rt_lookup(#[case] body: &[u8], #[case] expected: &str) {
        assert_eq!(parse_rt_lookup(body).unwrap(), expected);
    }

    #[rstest]
    fn test_parse_rt_lookup_empty() {
        assert!(parse_rt_lookup(b"  ").is_err());
    }
}
