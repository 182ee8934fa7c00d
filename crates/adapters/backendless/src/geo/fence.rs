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

//! Server-defined geofences.

use super::point::GeoCoordinate;
use crate::{
    common::enums::GeoFenceType,
    geofence::geometry::{is_point_in_circle, is_point_in_rect, is_point_in_shape},
};

/// A geographic boundary defined on the backend.
#[derive(Clone, Debug, PartialEq)]
pub struct GeoFence {
    pub object_id: Option<String>,
    pub name: String,
    pub fence_type: GeoFenceType,
    /// Boundary nodes, their meaning depends on `fence_type`.
    pub nodes: Vec<GeoCoordinate>,
    /// Dwell time (seconds) after which the stay action fires, `0` disables it.
    pub on_stay_duration: u64,
    pub qualifying_criteria: Option<String>,
}

impl GeoFence {
    /// Returns `true` if `coordinate` lies within the fence.
    ///
    /// Fences without enough nodes for their type contain nothing.
    #[must_use]
    pub fn contains(&self, coordinate: GeoCoordinate) -> bool {
        match self.fence_type {
            GeoFenceType::Circle => match self.nodes.as_slice() {
                [center, edge, ..] => is_point_in_circle(coordinate, *center, *edge),
                _ => false,
            },
            GeoFenceType::Rect => match self.nodes.as_slice() {
                [north_west, south_east, ..] => {
                    is_point_in_rect(coordinate, *north_west, *south_east)
                }
                _ => false,
            },
            GeoFenceType::Shape => is_point_in_shape(coordinate, &self.nodes),
        }
    }

    /// Returns the minimum number of nodes a fence of this type needs.
    #[must_use]
    pub const fn min_nodes(fence_type: GeoFenceType) -> usize {
        match fence_type {
            GeoFenceType::Circle | GeoFenceType::Rect => 2,
            GeoFenceType::Shape => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn fence(fence_type: GeoFenceType, nodes: Vec<GeoCoordinate>) -> GeoFence {
        GeoFence {
            object_id: None,
            name: "test".to_string(),
            fence_type,
            nodes,
            on_stay_duration: 0,
            qualifying_criteria: None,
        }
    }

    #[rstest]
    #[case(GeoCoordinate::new(0.0005, 0.0005), true)]
    #[case(GeoCoordinate::new(0.01, 0.01), false)]
    fn test_circle_contains(#[case] point: GeoCoordinate, #[case] expected: bool) {
        let circle = fence(
            GeoFenceType::Circle,
            vec![GeoCoordinate::new(0.0, 0.0), GeoCoordinate::new(0.0, 0.001)],
        );
        assert_eq!(circle.contains(point), expected);
    }

    #[rstest]
    #[case(GeoCoordinate::new(5.0, 5.0), true)]
    #[case(GeoCoordinate::new(15.0, 5.0), false)]
    #[case(GeoCoordinate::new(5.0, -1.0), false)]
    fn test_rect_contains(#[case] point: GeoCoordinate, #[case] expected: bool) {
        let rect = fence(
            GeoFenceType::Rect,
            vec![GeoCoordinate::new(10.0, 0.0), GeoCoordinate::new(0.0, 10.0)],
        );
        assert_eq!(rect.contains(point), expected);
    }

    #[rstest]
    fn test_degenerate_fence_contains_nothing() {
        let circle = fence(GeoFenceType::Circle, vec![GeoCoordinate::new(0.0, 0.0)]);
        assert!(!circle.contains(GeoCoordinate::new(0.0, 0.0)));
    }
}
