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

//! Translation of [`GeoQuery`] values into Backendless REST endpoints.

use serde_json::Value;

use crate::{
    common::enums::FenceAction,
    error::Fault,
    geo::{GeoCluster, GeoQuery},
};

pub const GEO_POINTS_ENDPOINT: &str = "geo/points";
pub const GEO_RELATIVE_POINTS_ENDPOINT: &str = "geo/relative/points";
pub const GEO_COUNT_ENDPOINT: &str = "geo/count";
pub const GEO_CATEGORIES_ENDPOINT: &str = "geo/categories";
pub const GEO_FENCES_ENDPOINT: &str = "geo/fences";
const GEO_RECT_ENDPOINT: &str = "geo/rect";

/// Appends `key=value` to `endpoint`, choosing the separator from the endpoint's current shape.
///
/// `value` must already be percent-encoded.
fn push_param(endpoint: &mut String, key: &str, value: &str) {
    if !endpoint.ends_with('?') && !endpoint.ends_with('&') {
        endpoint.push(if endpoint.contains('?') { '&' } else { '?' });
    }
    endpoint.push_str(key);
    endpoint.push('=');
    endpoint.push_str(value);
}

fn encode_categories<S: AsRef<str>>(categories: &[S]) -> String {
    let names: Vec<&str> = categories.iter().map(AsRef::as_ref).collect();
    urlencoding::encode(&names.join(",")).into_owned()
}

/// Builds the endpoint for a geo query against `base_endpoint`.
///
/// Without a query the base endpoint is returned unchanged. A bounding rectangle replaces the
/// base endpoint with a rectangle search.
#[must_use]
pub fn build_query_endpoint(base_endpoint: &str, query: Option<&GeoQuery>) -> String {
    let Some(query) = query else {
        return base_endpoint.to_string();
    };

    let mut endpoint = match &query.rect {
        Some(rect) => {
            let mut endpoint = GEO_RECT_ENDPOINT.to_string();
            push_param(&mut endpoint, "nwlat", &rect.north_west.latitude.to_string());
            push_param(&mut endpoint, "nwlon", &rect.north_west.longitude.to_string());
            push_param(&mut endpoint, "selat", &rect.south_east.latitude.to_string());
            push_param(&mut endpoint, "selon", &rect.south_east.longitude.to_string());
            endpoint
        }
        None => base_endpoint.to_string(),
    };

    if let Some(categories) = &query.categories
        && !categories.is_empty()
    {
        push_param(&mut endpoint, "categories", &encode_categories(categories));
    }

    if let Some(where_clause) = &query.where_clause
        && !where_clause.is_empty()
    {
        push_param(&mut endpoint, "where", &urlencoding::encode(where_clause));
    }

    if let Some(metadata) = &query.metadata
        && !metadata.is_empty()
    {
        let json = Value::Object(metadata.clone()).to_string();
        push_param(&mut endpoint, "metadata", &urlencoding::encode(&json));
    }

    push_param(&mut endpoint, "pagesize", &query.page_size.to_string());
    push_param(&mut endpoint, "offset", &query.offset.to_string());
    push_param(
        &mut endpoint,
        "includemetadata",
        &query.include_metadata.to_string(),
    );
    push_param(&mut endpoint, "dpp", &query.degree_per_pixel.to_string());
    push_param(
        &mut endpoint,
        "clusterGridSize",
        &query.cluster_grid_size.to_string(),
    );

    endpoint
}

/// Builds the endpoint listing the points of a fence.
#[must_use]
pub fn build_fence_points_endpoint(fence_name: &str, query: Option<&GeoQuery>) -> String {
    let mut base = GEO_POINTS_ENDPOINT.to_string();
    push_param(&mut base, "geoFence", &urlencoding::encode(fence_name));
    build_query_endpoint(&base, query)
}

/// Builds the endpoint listing the points aggregated by `cluster`.
///
/// # Errors
///
/// Returns a local fault if the cluster has no object id or no producing query.
pub fn build_cluster_points_endpoint(cluster: &GeoCluster) -> Result<String, Fault> {
    let object_id = cluster
        .point
        .object_id
        .as_deref()
        .ok_or_else(|| Fault::local("geoCluster has no objectId"))?;
    let query = cluster
        .query
        .as_ref()
        .ok_or_else(|| Fault::local("geoCluster has no geoQuery"))?;

    let categories: Vec<&str> = cluster.point.categories.iter().map(String::as_str).collect();

    let mut endpoint = format!("geo/clusters/{}/points", urlencoding::encode(object_id));
    push_param(&mut endpoint, "lat", &cluster.point.latitude.to_string());
    push_param(&mut endpoint, "lon", &cluster.point.longitude.to_string());
    push_param(&mut endpoint, "categories", &encode_categories(&categories));
    push_param(&mut endpoint, "dpp", &query.degree_per_pixel.to_string());
    push_param(
        &mut endpoint,
        "clusterGridSize",
        &query.cluster_grid_size.to_string(),
    );
    Ok(endpoint)
}

/// Builds the endpoint running a server-side fence action.
#[must_use]
pub fn build_fence_action_endpoint(action: FenceAction, fence_name: &str) -> String {
    let mut endpoint = format!("geo/fence/{action}");
    push_param(&mut endpoint, "geoFence", &urlencoding::encode(fence_name));
    endpoint
}

/// Builds the endpoint listing geofences, optionally filtered by name.
#[must_use]
pub fn build_geo_fences_endpoint(fence_name: Option<&str>) -> String {
    let mut endpoint = GEO_FENCES_ENDPOINT.to_string();
    if let Some(name) = fence_name {
        push_param(&mut endpoint, "geoFence", &urlencoding::encode(name));
    }
    endpoint
}
