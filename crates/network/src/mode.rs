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

//! Connection mode shared between a network client and its controller task.

use std::{
    fmt::Display,
    sync::atomic::{AtomicU8, Ordering},
};

/// The state of a network connection.
///
/// Stored as a `u8` inside an [`AtomicU8`] so it can be read without locking from any task.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConnectionMode {
    /// The connection is open and healthy.
    Active = 0,
    /// The connection dropped and the controller is re-establishing it.
    Reconnect = 1,
    /// A disconnect was requested and is in progress.
    Disconnect = 2,
    /// The connection is closed and will not be re-established.
    Closed = 3,
}

impl ConnectionMode {
    /// Converts the mode into its `u8` representation.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Converts a `u8` into a connection mode.
    ///
    /// Unknown values map to [`ConnectionMode::Closed`].
    #[must_use]
    pub const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Active,
            1 => Self::Reconnect,
            2 => Self::Disconnect,
            _ => Self::Closed,
        }
    }

    /// Loads the mode from an atomic.
    #[must_use]
    pub fn from_atomic(value: &AtomicU8) -> Self {
        Self::from_u8(value.load(Ordering::SeqCst))
    }

    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    #[must_use]
    pub const fn is_reconnect(self) -> bool {
        matches!(self, Self::Reconnect)
    }

    #[must_use]
    pub const fn is_disconnect(self) -> bool {
        matches!(self, Self::Disconnect)
    }

    #[must_use]
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl Display for ConnectionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Active => "ACTIVE",
            Self::Reconnect => "RECONNECT",
            Self::Disconnect => "DISCONNECT",
            Self::Closed => "CLOSED",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(ConnectionMode::Active)]
    #[case(ConnectionMode::Reconnect)]
    #[case(ConnectionMode::Disconnect)]
    #[case(ConnectionMode::Closed)]
    fn test_u8_conversion(#[case] mode: ConnectionMode) {
        assert_eq!(ConnectionMode::from_u8(mode.as_u8()), mode);
    }

    #[rstest]
    fn test_unknown_value_is_closed() {
        assert_eq!(ConnectionMode::from_u8(42), ConnectionMode::Closed);
    }

    #[rstest]
    fn test_from_atomic() {
        let atomic = AtomicU8::new(ConnectionMode::Reconnect.as_u8());
        assert!(ConnectionMode::from_atomic(&atomic).is_reconnect());
    }
}
