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

//! Example binary joining a Backendless realtime channel.
//!
//! Prints every message, command and presence update received on the channel and sends a
//! greeting command after joining.
//!
//! # Environment Variables
//!
//! - `BACKENDLESS_APP_ID`: The application id (required).
//! - `BACKENDLESS_API_KEY`: The REST API key of the application (required).
//! - `BACKENDLESS_RT_URL`: Optional realtime URL, looked up through the REST API when unset.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p backendless-sdk --bin backendless-rt-channel -- <channel>
//! ```

use backendless_sdk::{BackendlessClient, config::BackendlessConfig, geofence::LocationCapability};
use serde_json::json;
use tokio::signal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let channel_name = std::env::args().nth(1).unwrap_or_else(|| "default".to_string());

    let config = BackendlessConfig::from_env()?;
    let client = BackendlessClient::new(config, LocationCapability::Unavailable)?;

    let mut channel = client.channel(channel_name.as_str()).await?;

    let _connect = channel.add_connect_listener(|result| match result {
        Ok(()) => tracing::info!("Channel connected"),
        Err(fault) => tracing::error!("Channel connection failed: {fault}"),
    });
    let _messages = channel.add_message_listener(|result| match result {
        Ok(info) => tracing::info!("Message from {:?}: {}", info.publisher_id, info.message_as_string()),
        Err(fault) => tracing::error!("Message subscription failed: {fault}"),
    });
    let _commands = channel.add_command_listener(|result| match result {
        Ok(command) => tracing::info!("Command {}: {}", command.command_type, command.data),
        Err(fault) => tracing::error!("Command subscription failed: {fault}"),
    });
    let _users = channel.add_user_status_listener(|result| match result {
        Ok(status) => tracing::info!("Users {}: {:?}", status.status, status.data),
        Err(fault) => tracing::error!("User status subscription failed: {fault}"),
    });

    tracing::info!("Joining channel {channel_name}...");
    channel.join().await?;

    channel
        .send_command("greeting", &json!({"text": "hello"}))
        .await?;
    tracing::info!("Sent greeting command");

    tracing::info!("Listening on channel {channel_name}... Press Ctrl+C to exit");
    signal::ctrl_c().await?;

    tracing::info!("Received SIGINT, leaving channel...");
    channel.leave();
    client.close().await;

    Ok(())
}
