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

//! The fault type every SDK operation resolves to on failure.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

use crate::common::consts::LOCAL_FAULT_CODE;

/// Origin of a [`Fault`].
#[derive(
    Clone, Copy, Debug, Display, Eq, PartialEq, Hash, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum FaultKind {
    /// Error envelope or non-success status returned by the backend.
    Server,
    /// Precondition checked by the SDK before any request was sent.
    Local,
    /// Connection, timeout or cancellation failure.
    Transport,
    /// A response which could not be adapted into the expected type.
    Parse,
}

/// A structured error carrying the backend fault code and message.
///
/// Faults are surfaced as-is and never retried by the SDK.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
#[error("{kind} fault {code}: {message}")]
pub struct Fault {
    pub kind: FaultKind,
    pub code: i64,
    pub message: String,
}

impl Fault {
    /// Creates a new [`Fault`] instance.
    #[must_use]
    pub fn new(kind: FaultKind, code: i64, message: impl Into<String>) -> Self {
        Self {
            kind,
            code,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn server(code: i64, message: impl Into<String>) -> Self {
        Self::new(FaultKind::Server, code, message)
    }

    #[must_use]
    pub fn local(message: impl Into<String>) -> Self {
        Self::new(FaultKind::Local, LOCAL_FAULT_CODE, message)
    }

    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(FaultKind::Transport, LOCAL_FAULT_CODE, message)
    }

    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(FaultKind::Parse, LOCAL_FAULT_CODE, message)
    }

    #[must_use]
    pub fn is_server(&self) -> bool {
        self.kind == FaultKind::Server
    }

    #[must_use]
    pub fn is_local(&self) -> bool {
        self.kind == FaultKind::Local
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_fault_display() {
        let fault = Fault::server(3064, "Geo category not found");
        assert_eq!(fault.to_string(), "SERVER fault 3064: Geo category not found");
    }

    #[rstest]
    fn test_local_fault_uses_local_code() {
        let fault = Fault::local("geoPoint not found");

        assert!(fault.is_local());
        assert_eq!(fault.code, LOCAL_FAULT_CODE);
        assert_eq!(fault.message, "geoPoint not found");
    }

    #[rstest]
    #[case(Fault::transport("x"), FaultKind::Transport)]
    #[case(Fault::parse("x"), FaultKind::Parse)]
    #[case(Fault::server(1, "x"), FaultKind::Server)]
    fn test_fault_kinds(#[case] fault: Fault, #[case] kind: FaultKind) {
        assert_eq!(fault.kind, kind);
    }
}
