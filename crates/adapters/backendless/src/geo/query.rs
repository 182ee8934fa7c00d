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

//! Geo query definition.

use derive_builder::Builder;
use serde_json::{Map, Value};

use super::point::GeoCoordinate;
use crate::common::consts::{
    DEFAULT_CLUSTER_GRID_SIZE, DEFAULT_DEGREE_PER_PIXEL, DEFAULT_OFFSET, DEFAULT_PAGE_SIZE,
};

/// A bounding rectangle given by its north-west and south-east corners.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoRect {
    pub north_west: GeoCoordinate,
    pub south_east: GeoCoordinate,
}

impl GeoRect {
    /// Creates a new [`GeoRect`] instance.
    #[must_use]
    pub const fn new(north_west: GeoCoordinate, south_east: GeoCoordinate) -> Self {
        Self {
            north_west,
            south_east,
        }
    }
}

/// Search criteria for point, count and fence point queries.
///
/// Clustering is enabled by a positive `degree_per_pixel`.
#[derive(Clone, Debug, PartialEq, Builder)]
#[builder(setter(into, strip_option), default)]
#[builder(derive(Debug))]
pub struct GeoQuery {
    /// Bounding rectangle, replaces the endpoint with a rectangle search.
    pub rect: Option<GeoRect>,
    pub categories: Option<Vec<String>>,
    pub where_clause: Option<String>,
    pub metadata: Option<Map<String, Value>>,
    pub page_size: u32,
    pub offset: u32,
    pub include_metadata: bool,
    pub degree_per_pixel: f64,
    pub cluster_grid_size: u32,
}

impl Default for GeoQuery {
    fn default() -> Self {
        Self {
            rect: None,
            categories: None,
            where_clause: None,
            metadata: None,
            page_size: DEFAULT_PAGE_SIZE,
            offset: DEFAULT_OFFSET,
            include_metadata: true,
            degree_per_pixel: DEFAULT_DEGREE_PER_PIXEL,
            cluster_grid_size: DEFAULT_CLUSTER_GRID_SIZE,
        }
    }
}

impl GeoQuery {
    /// Creates a new builder for [`GeoQuery`].
    #[must_use]
    pub fn builder() -> GeoQueryBuilder {
        GeoQueryBuilder::default()
    }

    /// Returns `true` if the query asks the backend for clusters.
    #[must_use]
    pub fn is_clustered(&self) -> bool {
        self.degree_per_pixel > 0.0
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_defaults() {
        let query = GeoQuery::default();

        assert_eq!(query.page_size, 100);
        assert_eq!(query.offset, 0);
        assert!(query.include_metadata);
        assert_eq!(query.degree_per_pixel, 0.0);
        assert_eq!(query.cluster_grid_size, 100);
        assert!(!query.is_clustered());
    }

    #[rstest]
    fn test_builder_keeps_defaults_for_unset_fields() {
        let query = GeoQuery::builder()
            .categories(vec!["taxi".to_string()])
            .page_size(20u32)
            .build()
            .unwrap();

        assert_eq!(query.categories, Some(vec!["taxi".to_string()]));
        assert_eq!(query.page_size, 20);
        assert!(query.include_metadata);
        assert_eq!(query.cluster_grid_size, 100);
    }

    #[rstest]
    fn test_builder_rect_and_clustering() {
        let rect = GeoRect::new(GeoCoordinate::new(10.0, -10.0), GeoCoordinate::new(-10.0, 10.0));
        let query = GeoQuery::builder()
            .rect(rect)
            .degree_per_pixel(0.5)
            .build()
            .unwrap();

        assert_eq!(query.rect, Some(rect));
        assert!(query.is_clustered());
    }
}
