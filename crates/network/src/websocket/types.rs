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

//! Handler types for WebSocket clients.

use std::sync::Arc;

use tokio_tungstenite::tungstenite::Message;

/// Callback invoked by the controller task for every frame received (and for the
/// [`crate::RECONNECTED`] marker after a reconnection).
pub type MessageHandler = Arc<dyn Fn(Message) + Send + Sync>;

/// Creates a [`MessageHandler`] that forwards every frame into an unbounded channel.
///
/// Returns the handler and the receiving end of the channel.
#[must_use]
pub fn channel_message_handler() -> (
    MessageHandler,
    tokio::sync::mpsc::UnboundedReceiver<Message>,
) {
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    let handler: MessageHandler = Arc::new(move |msg: Message| {
        if let Err(e) = tx.send(msg) {
            tracing::debug!("Failed to forward message, receiver dropped: {e}");
        }
    });
    (handler, rx)
}
