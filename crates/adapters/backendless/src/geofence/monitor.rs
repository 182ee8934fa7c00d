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

//! Local geofence monitor tracking the device location against server-defined fences.

use std::{
    fmt::Debug,
    sync::{Arc, Mutex, MutexGuard, Weak},
    time::{Duration, Instant},
};

use ahash::{AHashMap, AHashSet};
use futures_util::StreamExt;
use tokio::task::JoinHandle;

use super::{
    callback::{GeofenceCallback, GeofenceEvent},
    location::LocationCapability,
};
use crate::{
    common::{consts::GEOFENCE_STAY_CHECK_INTERVAL_MS, enums::FenceAction},
    error::Fault,
    geo::{GeoCoordinate, GeoFence},
};

/// Position of the device relative to a monitored fence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FenceState {
    Outside,
    Inside {
        entered_at: Instant,
        /// Whether the stay callback already fired during this visit.
        stay_fired: bool,
    },
}

struct MonitoredFence {
    fence: GeoFence,
    callback: Arc<dyn GeofenceCallback>,
    state: FenceState,
}

impl MonitoredFence {
    fn event(&self, action: FenceAction, location: GeoCoordinate) -> GeofenceEvent {
        GeofenceEvent {
            action,
            fence_name: self.fence.name.clone(),
            fence_id: self.fence.object_id.clone(),
            location,
        }
    }

    fn stay_due(&self, now: Instant) -> bool {
        match self.state {
            FenceState::Inside {
                entered_at,
                stay_fired: false,
            } if self.fence.on_stay_duration > 0 => {
                now.saturating_duration_since(entered_at)
                    >= Duration::from_secs(self.fence.on_stay_duration)
            }
            _ => false,
        }
    }

    fn mark_stay_fired(&mut self) {
        if let FenceState::Inside { stay_fired, .. } = &mut self.state {
            *stay_fired = true;
        }
    }
}

#[derive(Default)]
struct MonitorState {
    fences: AHashMap<String, MonitoredFence>,
    last_location: Option<GeoCoordinate>,
    task: Option<JoinHandle<()>>,
}

struct MonitorInner {
    capability: LocationCapability,
    state: Mutex<MonitorState>,
}

type PendingEvents = Vec<(Arc<dyn GeofenceCallback>, GeofenceEvent)>;

impl MonitorInner {
    fn lock(&self) -> MutexGuard<'_, MonitorState> {
        // SAFETY: Lock poisoning indicates a panic in another thread, which is fatal
        self.state.lock().expect("Lock poisoned")
    }

    fn process_location(&self, location: GeoCoordinate, now: Instant) -> Vec<GeofenceEvent> {
        let mut pending: PendingEvents = Vec::new();
        {
            let mut state = self.lock();
            state.last_location = Some(location);

            for monitored in state.fences.values_mut() {
                let inside = monitored.fence.contains(location);
                match (monitored.state, inside) {
                    (FenceState::Outside, true) => {
                        monitored.state = FenceState::Inside {
                            entered_at: now,
                            stay_fired: false,
                        };
                        pending.push((
                            monitored.callback.clone(),
                            monitored.event(FenceAction::OnEnter, location),
                        ));
                    }
                    (FenceState::Inside { .. }, false) => {
                        monitored.state = FenceState::Outside;
                        pending.push((
                            monitored.callback.clone(),
                            monitored.event(FenceAction::OnExit, location),
                        ));
                    }
                    (FenceState::Inside { .. }, true) if monitored.stay_due(now) => {
                        monitored.mark_stay_fired();
                        pending.push((
                            monitored.callback.clone(),
                            monitored.event(FenceAction::OnStay, location),
                        ));
                    }
                    _ => {}
                }
            }
        }
        Self::dispatch(pending)
    }

    fn check_stays(&self, now: Instant) -> Vec<GeofenceEvent> {
        let mut pending: PendingEvents = Vec::new();
        {
            let mut state = self.lock();
            let Some(location) = state.last_location else {
                return Vec::new();
            };

            for monitored in state.fences.values_mut() {
                if monitored.stay_due(now) {
                    monitored.mark_stay_fired();
                    pending.push((
                        monitored.callback.clone(),
                        monitored.event(FenceAction::OnStay, location),
                    ));
                }
            }
        }
        Self::dispatch(pending)
    }

    // Callbacks run after the lock is released so they may call back into the monitor
    fn dispatch(mut pending: PendingEvents) -> Vec<GeofenceEvent> {
        pending.sort_by(|a, b| a.1.fence_name.cmp(&b.1.fence_name));
        pending
            .into_iter()
            .map(|(callback, event)| {
                callback.dispatch(&event);
                event
            })
            .collect()
    }
}

/// Tracks device location updates against a set of geofences and fires transition callbacks.
///
/// Every fence starts [`FenceState::Outside`]. Entering fires `on_enter`, remaining inside for
/// at least the fence's `on_stay_duration` (when positive) fires `on_stay` once per visit and
/// leaving fires `on_exit`.
#[derive(Clone)]
pub struct GeofenceMonitor {
    inner: Arc<MonitorInner>,
}

impl Debug for GeofenceMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(stringify!(GeofenceMonitor))
            .field("capability", &self.inner.capability)
            .field("fences", &self.monitored_fences())
            .field("is_tracking", &self.is_tracking())
            .finish()
    }
}

impl GeofenceMonitor {
    /// Creates a new [`GeofenceMonitor`] instance.
    #[must_use]
    pub fn new(capability: LocationCapability) -> Self {
        Self {
            inner: Arc::new(MonitorInner {
                capability,
                state: Mutex::new(MonitorState::default()),
            }),
        }
    }

    /// Starts monitoring a single fence.
    ///
    /// # Errors
    ///
    /// Returns a local fault if a fence with the same name is already monitored.
    pub fn add_fence(
        &self,
        fence: GeoFence,
        callback: Arc<dyn GeofenceCallback>,
    ) -> Result<(), Fault> {
        self.add_fences(vec![fence], callback)
    }

    /// Starts monitoring `fences`, all reporting to `callback`.
    ///
    /// The batch is rejected as a whole if any fence is already monitored or appears twice.
    ///
    /// # Errors
    ///
    /// Returns a local fault naming the first duplicate fence.
    pub fn add_fences(
        &self,
        fences: Vec<GeoFence>,
        callback: Arc<dyn GeofenceCallback>,
    ) -> Result<(), Fault> {
        let mut state = self.inner.lock();

        let mut names = AHashSet::with_capacity(fences.len());
        for fence in &fences {
            if state.fences.contains_key(&fence.name) || !names.insert(fence.name.as_str()) {
                return Err(Fault::local(format!(
                    "Geofence '{}' is already monitored",
                    fence.name
                )));
            }
        }

        for fence in fences {
            tracing::debug!("Monitoring geofence '{}'", fence.name);
            state.fences.insert(
                fence.name.clone(),
                MonitoredFence {
                    fence,
                    callback: callback.clone(),
                    state: FenceState::Outside,
                },
            );
        }
        Ok(())
    }

    /// Stops monitoring the named fence, returning whether it was monitored.
    ///
    /// Location tracking stops once no fences remain.
    pub fn remove_fence(&self, name: &str) -> bool {
        let (removed, now_empty) = {
            let mut state = self.inner.lock();
            let removed = state.fences.remove(name).is_some();
            (removed, state.fences.is_empty())
        };

        if removed {
            tracing::debug!("Stopped monitoring geofence '{name}'");
        }
        if now_empty {
            self.stop();
        }
        removed
    }

    /// Stops monitoring every fence and stops location tracking.
    pub fn remove_all(&self) {
        self.inner.lock().fences.clear();
        self.stop();
    }

    /// Returns `true` if at least one fence is monitored.
    #[must_use]
    pub fn is_monitoring(&self) -> bool {
        !self.inner.lock().fences.is_empty()
    }

    /// Returns `true` if a location provider is available.
    #[must_use]
    pub fn is_location_available(&self) -> bool {
        self.inner.capability.is_available()
    }

    /// Returns `true` if the location tracking task is running.
    #[must_use]
    pub fn is_tracking(&self) -> bool {
        self.inner
            .lock()
            .task
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Returns the names of the monitored fences, sorted.
    #[must_use]
    pub fn monitored_fences(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.lock().fences.keys().cloned().collect();
        names.sort();
        names
    }

    /// Returns the current state of the named fence.
    #[must_use]
    pub fn fence_state(&self, name: &str) -> Option<FenceState> {
        self.inner.lock().fences.get(name).map(|m| m.state)
    }

    /// Starts tracking location updates from the configured provider.
    ///
    /// Does nothing if tracking is already running.
    ///
    /// # Errors
    ///
    /// Returns a local fault if location services are unavailable.
    pub fn start(&self) -> Result<(), Fault> {
        let LocationCapability::Available(provider) = &self.inner.capability else {
            return Err(Fault::local("Location services are unavailable"));
        };

        let mut state = self.inner.lock();
        if state.task.as_ref().is_some_and(|task| !task.is_finished()) {
            return Ok(());
        }

        let mut locations = provider.subscribe();
        let weak: Weak<MonitorInner> = Arc::downgrade(&self.inner);

        state.task = Some(tokio::spawn(async move {
            let mut stay_check =
                tokio::time::interval(Duration::from_millis(GEOFENCE_STAY_CHECK_INTERVAL_MS));

            loop {
                tokio::select! {
                    location = locations.next() => {
                        let Some(location) = location else {
                            tracing::debug!("Location stream ended");
                            break;
                        };
                        let Some(inner) = weak.upgrade() else { break };
                        inner.process_location(location, Instant::now());
                    }
                    _ = stay_check.tick() => {
                        let Some(inner) = weak.upgrade() else { break };
                        inner.check_stays(Instant::now());
                    }
                }
            }
        }));

        tracing::info!("Geofence monitoring started");
        Ok(())
    }

    /// Stops location tracking, keeping the monitored fences.
    pub fn stop(&self) {
        if let Some(task) = self.inner.lock().task.take() {
            task.abort();
            tracing::info!("Geofence monitoring stopped");
        }
    }

    /// Evaluates a location update at `now`, firing and returning the resulting transitions.
    pub fn process_location(&self, location: GeoCoordinate, now: Instant) -> Vec<GeofenceEvent> {
        self.inner.process_location(location, now)
    }

    /// Fires and returns stay transitions which became due by `now` at the last known location.
    pub fn check_stays(&self, now: Instant) -> Vec<GeofenceEvent> {
        self.inner.check_stays(now)
    }
}

#[cfg(test)]
mod tests {
    use backendless_network::testing::wait_until_async;
    use rstest::rstest;

    use super::*;
    use crate::{
        common::enums::GeoFenceType,
        geofence::{callback::ClientCallback, location::ChannelLocationProvider},
    };

    fn circle(name: &str, on_stay_duration: u64) -> GeoFence {
        GeoFence {
            object_id: Some(format!("{name}-id")),
            name: name.to_string(),
            fence_type: GeoFenceType::Circle,
            nodes: vec![GeoCoordinate::new(0.0, 0.0), GeoCoordinate::new(0.0, 0.01)],
            on_stay_duration,
            qualifying_criteria: None,
        }
    }

    fn recording_callback() -> (Arc<dyn GeofenceCallback>, Arc<Mutex<Vec<GeofenceEvent>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let callback = ClientCallback::new(move |event| sink.lock().unwrap().push(event.clone()));
        (Arc::new(callback), events)
    }

    const INSIDE: GeoCoordinate = GeoCoordinate::new(0.001, 0.001);
    const OUTSIDE: GeoCoordinate = GeoCoordinate::new(1.0, 1.0);

    #[rstest]
    fn test_scripted_track_fires_enter_stay_exit() {
        let monitor = GeofenceMonitor::new(LocationCapability::Unavailable);
        let (callback, events) = recording_callback();
        monitor.add_fence(circle("office", 5), callback).unwrap();

        let t0 = Instant::now();
        assert!(monitor.process_location(OUTSIDE, t0).is_empty());
        monitor.process_location(INSIDE, t0 + Duration::from_secs(1));
        monitor.process_location(INSIDE, t0 + Duration::from_secs(3));
        monitor.process_location(INSIDE, t0 + Duration::from_secs(7));
        monitor.process_location(INSIDE, t0 + Duration::from_secs(9));
        monitor.process_location(OUTSIDE, t0 + Duration::from_secs(10));

        let actions: Vec<_> = events.lock().unwrap().iter().map(|e| e.action).collect();
        assert_eq!(
            actions,
            vec![FenceAction::OnEnter, FenceAction::OnStay, FenceAction::OnExit]
        );
        assert_eq!(events.lock().unwrap()[0].fence_id.as_deref(), Some("office-id"));
        assert_eq!(monitor.fence_state("office"), Some(FenceState::Outside));
    }

    #[rstest]
    fn test_stay_fires_once_per_visit() {
        let monitor = GeofenceMonitor::new(LocationCapability::Unavailable);
        let (callback, events) = recording_callback();
        monitor.add_fence(circle("office", 2), callback).unwrap();

        let t0 = Instant::now();
        monitor.process_location(INSIDE, t0);
        monitor.check_stays(t0 + Duration::from_secs(3));
        monitor.check_stays(t0 + Duration::from_secs(4));
        monitor.process_location(OUTSIDE, t0 + Duration::from_secs(5));
        monitor.process_location(INSIDE, t0 + Duration::from_secs(6));
        monitor.check_stays(t0 + Duration::from_secs(9));

        let actions: Vec<_> = events.lock().unwrap().iter().map(|e| e.action).collect();
        assert_eq!(
            actions,
            vec![
                FenceAction::OnEnter,
                FenceAction::OnStay,
                FenceAction::OnExit,
                FenceAction::OnEnter,
                FenceAction::OnStay,
            ]
        );
    }

    #[rstest]
    fn test_zero_stay_duration_never_fires_stay() {
        let monitor = GeofenceMonitor::new(LocationCapability::Unavailable);
        let (callback, events) = recording_callback();
        monitor.add_fence(circle("office", 0), callback).unwrap();

        let t0 = Instant::now();
        monitor.process_location(INSIDE, t0);
        monitor.check_stays(t0 + Duration::from_secs(3600));

        assert_eq!(events.lock().unwrap().len(), 1);
    }

    #[rstest]
    fn test_duplicate_fence_is_local_fault() {
        let monitor = GeofenceMonitor::new(LocationCapability::Unavailable);
        let (callback, _) = recording_callback();
        monitor.add_fence(circle("office", 0), callback.clone()).unwrap();

        let fault = monitor
            .add_fences(vec![circle("campus", 0), circle("office", 0)], callback)
            .unwrap_err();

        assert!(fault.is_local());
        assert_eq!(monitor.monitored_fences(), vec!["office".to_string()]);
    }

    #[rstest]
    fn test_duplicate_within_batch_is_rejected() {
        let monitor = GeofenceMonitor::new(LocationCapability::Unavailable);
        let (callback, _) = recording_callback();

        let result = monitor.add_fences(vec![circle("a", 0), circle("a", 0)], callback);

        assert!(result.is_err());
        assert!(!monitor.is_monitoring());
    }

    #[rstest]
    fn test_start_without_location_services_is_local_fault() {
        let monitor = GeofenceMonitor::new(LocationCapability::Unavailable);
        assert!(monitor.start().unwrap_err().is_local());
    }

    #[rstest]
    fn test_removed_fence_no_longer_fires() {
        let monitor = GeofenceMonitor::new(LocationCapability::Unavailable);
        let (callback, events) = recording_callback();
        monitor
            .add_fences(vec![circle("a", 0), circle("b", 0)], callback)
            .unwrap();

        assert!(monitor.remove_fence("a"));
        assert!(!monitor.remove_fence("a"));
        monitor.process_location(INSIDE, Instant::now());

        let names: Vec<_> = events
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.fence_name.clone())
            .collect();
        assert_eq!(names, vec!["b".to_string()]);
    }

    #[rstest]
    #[tokio::test]
    async fn test_tracking_task_consumes_provider() {
        let provider = ChannelLocationProvider::new();
        let monitor = GeofenceMonitor::new(LocationCapability::available(provider.clone()));
        let (callback, events) = recording_callback();
        monitor.add_fence(circle("office", 0), callback).unwrap();

        monitor.start().unwrap();
        assert!(monitor.is_tracking());

        wait_until_async(
            || {
                let provider = provider.clone();
                let events = events.clone();
                async move {
                    provider.push(INSIDE);
                    !events.lock().unwrap().is_empty()
                }
            },
            Duration::from_secs(5),
        )
        .await;

        assert_eq!(events.lock().unwrap()[0].action, FenceAction::OnEnter);

        assert!(monitor.remove_fence("office"));
        assert!(!monitor.is_tracking());
    }
}
