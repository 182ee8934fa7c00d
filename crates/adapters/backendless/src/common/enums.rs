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

//! Enumerations that model Backendless string enums across HTTP and realtime payloads.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Event names of realtime frames.
#[derive(
    Clone,
    Copy,
    Debug,
    Display,
    Eq,
    PartialEq,
    Hash,
    AsRefStr,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RtEvent {
    /// Client request to open a subscription.
    SubOn,
    /// Client request to close a subscription.
    SubOff,
    /// Server result (data or error) for a subscription.
    SubRes,
    /// Client method invocation.
    MetReq,
    /// Server result for a method invocation.
    MetRes,
}

/// Realtime subscription names used by channels.
#[derive(
    Clone,
    Copy,
    Debug,
    Display,
    Eq,
    PartialEq,
    Hash,
    AsRefStr,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RtSubscriptionName {
    /// Connection to a channel.
    PubSubConnect,
    /// Messages published to a channel.
    PubSubMessages,
    /// Commands sent to a channel.
    PubSubCommands,
    /// Presence updates of users on a channel.
    PubSubUsers,
}

/// Realtime method names.
#[derive(
    Clone,
    Copy,
    Debug,
    Display,
    Eq,
    PartialEq,
    Hash,
    AsRefStr,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RtMethodName {
    /// Sends a command to every connection on a channel.
    PubSubCommand,
}

/// Geometry of a geofence.
#[derive(
    Clone,
    Copy,
    Debug,
    Display,
    Eq,
    PartialEq,
    Hash,
    AsRefStr,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum GeoFenceType {
    /// First node is the centre, second node lies on the circumference.
    Circle,
    /// First node is the north-west corner, second node the south-east corner.
    Rect,
    /// Polygon through all nodes.
    Shape,
}

/// Server-side geofence actions.
#[derive(
    Clone,
    Copy,
    Debug,
    Display,
    Eq,
    PartialEq,
    Hash,
    AsRefStr,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FenceAction {
    OnEnter,
    OnStay,
    OnExit,
}

/// Presence status carried by user status updates.
#[derive(
    Clone,
    Copy,
    Debug,
    Display,
    Eq,
    PartialEq,
    Hash,
    AsRefStr,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatusKind {
    Connected,
    Disconnected,
    Listing,
    #[serde(rename = "USERUPDATE")]
    #[strum(serialize = "USERUPDATE")]
    UserUpdate,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(RtEvent::SubOn, "SUB_ON")]
    #[case(RtEvent::SubOff, "SUB_OFF")]
    #[case(RtEvent::SubRes, "SUB_RES")]
    #[case(RtEvent::MetReq, "MET_REQ")]
    #[case(RtEvent::MetRes, "MET_RES")]
    fn test_rt_event_wire_names(#[case] event: RtEvent, #[case] expected: &str) {
        assert_eq!(event.to_string(), expected);
        assert_eq!(
            serde_json::to_string(&event).unwrap(),
            format!("\"{expected}\"")
        );
        assert_eq!(RtEvent::from_str(expected).unwrap(), event);
    }

    #[rstest]
    #[case(RtSubscriptionName::PubSubConnect, "PUB_SUB_CONNECT")]
    #[case(RtSubscriptionName::PubSubMessages, "PUB_SUB_MESSAGES")]
    #[case(RtSubscriptionName::PubSubCommands, "PUB_SUB_COMMANDS")]
    #[case(RtSubscriptionName::PubSubUsers, "PUB_SUB_USERS")]
    fn test_subscription_names(#[case] name: RtSubscriptionName, #[case] expected: &str) {
        assert_eq!(name.as_ref(), expected);
    }

    #[rstest]
    fn test_method_name() {
        assert_eq!(RtMethodName::PubSubCommand.to_string(), "PUB_SUB_COMMAND");
    }

    #[rstest]
    #[case(FenceAction::OnEnter, "onenter")]
    #[case(FenceAction::OnStay, "onstay")]
    #[case(FenceAction::OnExit, "onexit")]
    fn test_fence_action_path_segment(#[case] action: FenceAction, #[case] expected: &str) {
        assert_eq!(action.as_ref(), expected);
    }

    #[rstest]
    fn test_user_status_kind_deserialization() {
        let kind: UserStatusKind = serde_json::from_str("\"USERUPDATE\"").unwrap();
        assert_eq!(kind, UserStatusKind::UserUpdate);

        let kind: UserStatusKind = serde_json::from_str("\"CONNECTED\"").unwrap();
        assert_eq!(kind, UserStatusKind::Connected);
    }

    #[rstest]
    fn test_geofence_type_deserialization() {
        let kind: GeoFenceType = serde_json::from_str("\"SHAPE\"").unwrap();
        assert_eq!(kind, GeoFenceType::Shape);
    }
}
