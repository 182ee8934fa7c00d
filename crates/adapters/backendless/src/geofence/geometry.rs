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

//! Containment tests for geofence geometries.

use crate::{common::consts::EARTH_RADIUS_METERS, geo::point::GeoCoordinate};

/// Returns the great-circle distance between two coordinates in meters (haversine formula).
#[must_use]
pub fn haversine_distance_m(a: GeoCoordinate, b: GeoCoordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = lat2 - lat1;
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_METERS * h.sqrt().min(1.0).asin()
}

/// Returns `true` if `point` is no farther from `center` than `edge` is.
#[must_use]
pub fn is_point_in_circle(point: GeoCoordinate, center: GeoCoordinate, edge: GeoCoordinate) -> bool {
    haversine_distance_m(center, point) <= haversine_distance_m(center, edge)
}

/// Returns `true` if `point` lies within the rectangle spanned by the two corners.
///
/// Rectangles whose west edge lies east of their east edge wrap across the antimeridian.
#[must_use]
pub fn is_point_in_rect(
    point: GeoCoordinate,
    north_west: GeoCoordinate,
    south_east: GeoCoordinate,
) -> bool {
    if point.latitude > north_west.latitude || point.latitude < south_east.latitude {
        return false;
    }

    if north_west.longitude <= south_east.longitude {
        point.longitude >= north_west.longitude && point.longitude <= south_east.longitude
    } else {
        point.longitude >= north_west.longitude || point.longitude <= south_east.longitude
    }
}

/// Returns `true` if `point` lies inside the polygon through `nodes` (ray casting).
///
/// Polygons with fewer than three nodes contain nothing.
#[must_use]
pub fn is_point_in_shape(point: GeoCoordinate, nodes: &[GeoCoordinate]) -> bool {
    if nodes.len() < 3 {
        return false;
    }

    let (x, y) = (point.longitude, point.latitude);
    let mut inside = false;
    let mut j = nodes.len() - 1;

    for i in 0..nodes.len() {
        let (xi, yi) = (nodes[i].longitude, nodes[i].latitude);
        let (xj, yj) = (nodes[j].longitude, nodes[j].latitude);

        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }

    inside
}
