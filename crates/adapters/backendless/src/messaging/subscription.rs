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

//! Cancellation handle for channel listeners.

use std::{
    fmt::Debug,
    sync::{
        Arc, Weak,
        atomic::{AtomicBool, Ordering},
    },
};

use super::rt_messaging::MessagingShared;

/// The listener group a registration belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    Connect,
    Message { selector: Option<String> },
    Command,
    UserStatus,
}

/// A live listener registration.
///
/// Holds only a weak reference to the channel's listener registry, dropping the handle does not
/// remove the listener, [`RtSubscription::cancel`] does.
pub struct RtSubscription {
    registry: Weak<MessagingShared>,
    kind: ListenerKind,
    id: u64,
    active: Arc<AtomicBool>,
}

impl Debug for RtSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(stringify!(RtSubscription))
            .field("kind", &self.kind)
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

impl RtSubscription {
    pub(crate) fn new(
        registry: Weak<MessagingShared>,
        kind: ListenerKind,
        id: u64,
        active: Arc<AtomicBool>,
    ) -> Self {
        Self {
            registry,
            kind,
            id,
            active,
        }
    }

    /// Returns the listener group of this registration.
    #[must_use]
    pub fn kind(&self) -> &ListenerKind {
        &self.kind
    }

    /// Returns `true` until the listener is cancelled or removed from its channel.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }

    /// Removes the listener, it is not invoked afterwards.
    ///
    /// Cancelling twice or after the channel is gone is a no-op.
    pub fn cancel(&self) {
        if !self.active.swap(false, Ordering::Relaxed) {
            return;
        }
        if let Some(registry) = self.registry.upgrade() {
            registry.remove_listener(&self.kind, self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_cancel_without_registry() {
        let active = Arc::new(AtomicBool::new(true));
        let subscription = RtSubscription::new(Weak::new(), ListenerKind::Command, 1, active.clone());

        assert!(subscription.is_active());
        subscription.cancel();
        assert!(!subscription.is_active());
        assert!(!active.load(Ordering::Relaxed));

        subscription.cancel();
        assert_eq!(subscription.kind(), &ListenerKind::Command);
    }
}
