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

//! Callbacks invoked when a monitored fence is entered, stayed in or exited.

use std::{fmt::Debug, sync::Arc};

use crate::{
    common::enums::FenceAction,
    geo::{GeoCoordinate, GeoPoint},
    http::client::GeoHttpClient,
};

/// A fence transition detected by the monitor.
#[derive(Clone, Debug, PartialEq)]
pub struct GeofenceEvent {
    pub action: FenceAction,
    pub fence_name: String,
    pub fence_id: Option<String>,
    /// Device location which triggered the transition.
    pub location: GeoCoordinate,
}

/// Receives fence transitions from a [`crate::geofence::GeofenceMonitor`].
///
/// Callbacks run on the monitoring task and must not block.
pub trait GeofenceCallback: Send + Sync + Debug {
    fn on_enter(&self, event: &GeofenceEvent);

    fn on_stay(&self, event: &GeofenceEvent);

    fn on_exit(&self, event: &GeofenceEvent);

    /// Routes `event` to the handler for its action.
    fn dispatch(&self, event: &GeofenceEvent) {
        match event.action {
            FenceAction::OnEnter => self.on_enter(event),
            FenceAction::OnStay => self.on_stay(event),
            FenceAction::OnExit => self.on_exit(event),
        }
    }
}

type EventHandler = Arc<dyn Fn(&GeofenceEvent) + Send + Sync>;

/// Forwards every transition to application code.
#[derive(Clone)]
pub struct ClientCallback {
    handler: EventHandler,
}

impl Debug for ClientCallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(stringify!(ClientCallback)).finish_non_exhaustive()
    }
}

impl ClientCallback {
    /// Creates a new [`ClientCallback`] instance.
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&GeofenceEvent) + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(handler),
        }
    }
}

impl GeofenceCallback for ClientCallback {
    fn on_enter(&self, event: &GeofenceEvent) {
        (self.handler)(event);
    }

    fn on_stay(&self, event: &GeofenceEvent) {
        (self.handler)(event);
    }

    fn on_exit(&self, event: &GeofenceEvent) {
        (self.handler)(event);
    }
}

/// Reports every transition to the backend, which runs the action configured for the fence.
///
/// The reported point is `point` moved to the location of the transition.
#[derive(Clone, Debug)]
pub struct ServerCallback {
    client: GeoHttpClient,
    point: GeoPoint,
}

impl ServerCallback {
    /// Creates a new [`ServerCallback`] instance.
    #[must_use]
    pub fn new(client: GeoHttpClient, point: GeoPoint) -> Self {
        Self { client, point }
    }

    fn report(&self, event: &GeofenceEvent) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(
                "Cannot report {} for geofence '{}' outside a Tokio runtime",
                event.action,
                event.fence_name
            );
            return;
        };

        let client = self.client.clone();
        let mut point = self.point.clone();
        point.latitude = event.location.latitude;
        point.longitude = event.location.longitude;
        let action = event.action;
        let fence_name = event.fence_name.clone();

        handle.spawn(async move {
            match client
                .run_fence_action(action, &fence_name, Some(&point))
                .await
            {
                Ok(_) => tracing::debug!("Reported {action} for geofence '{fence_name}'"),
                Err(e) => {
                    tracing::error!("Failed to report {action} for geofence '{fence_name}': {e}");
                }
            }
        });
    }
}

impl GeofenceCallback for ServerCallback {
    fn on_enter(&self, event: &GeofenceEvent) {
        self.report(event);
    }

    fn on_stay(&self, event: &GeofenceEvent) {
        self.report(event);
    }

    fn on_exit(&self, event: &GeofenceEvent) {
        self.report(event);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use rstest::rstest;

    use super::*;

    fn event(action: FenceAction) -> GeofenceEvent {
        GeofenceEvent {
            action,
            fence_name: "office".to_string(),
            fence_id: Some("F1".to_string()),
            location: GeoCoordinate::new(1.0, 2.0),
        }
    }

    #[rstest]
    fn test_client_callback_receives_every_action() {
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = received.clone();
        let callback = ClientCallback::new(move |event| sink.lock().unwrap().push(event.action));

        callback.dispatch(&event(FenceAction::OnEnter));
        callback.dispatch(&event(FenceAction::OnStay));
        callback.dispatch(&event(FenceAction::OnExit));

        assert_eq!(
            *received.lock().unwrap(),
            vec![FenceAction::OnEnter, FenceAction::OnStay, FenceAction::OnExit]
        );
    }
}
