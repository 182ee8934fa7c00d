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

//! Example binary exercising the Backendless geo REST API.
//!
//! Saves a geo point, queries it back (as points and as clusters), lists categories and
//! geofences, then removes the point again.
//!
//! # Environment Variables
//!
//! - `BACKENDLESS_APP_ID`: The application id (required).
//! - `BACKENDLESS_API_KEY`: The REST API key of the application (required).
//! - `BACKENDLESS_BASE_URL`: Optional REST base URL override.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p backendless-sdk --bin backendless-geo-http
//! ```

use backendless_sdk::{
    config::BackendlessConfig,
    geo::{point::GeoPoint, query::GeoQuery},
    http::client::GeoHttpClient,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = BackendlessConfig::from_env()?;
    let client = GeoHttpClient::new(&config)?;

    let point = GeoPoint::new(51.5072, -0.1276)
        .with_categories(["demo"])
        .with_metadata("city", "London");

    tracing::info!("Saving geo point...");
    let saved = client.save_geo_point(&point).await?;
    tracing::info!("Saved {saved:?}");

    let query = GeoQuery::builder()
        .categories(vec!["demo".to_string()])
        .page_size(10u32)
        .build()?;

    let results = client.get_points(Some(&query)).await?;
    tracing::info!("Found {} point(s)", results.len());
    for result in &results {
        tracing::info!("{result:?}");
    }

    let clustered = GeoQuery::builder()
        .categories(vec!["demo".to_string()])
        .degree_per_pixel(0.5)
        .build()?;
    let clusters = client.get_points(Some(&clustered)).await?;
    tracing::info!(
        "Clustered query returned {} result(s), {} cluster(s)",
        clusters.len(),
        clusters.iter().filter(|result| result.is_cluster()).count()
    );

    let count = client.get_points_count(Some(&query)).await?;
    tracing::info!("Point count: {count}");

    for category in client.get_categories().await? {
        tracing::info!("Category {} ({} points)", category.name, category.size);
    }

    for fence in client.get_geo_fences(None).await? {
        tracing::info!("Geofence {} ({}, {} nodes)", fence.name, fence.fence_type, fence.nodes.len());
    }

    client.remove_geo_point(&saved).await?;
    tracing::info!("Removed geo point");

    Ok(())
}
