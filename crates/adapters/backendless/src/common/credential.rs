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

//! Backendless application credential storage.

use core::fmt::Debug;

use zeroize::ZeroizeOnDrop;

/// Application credentials sent with every Backendless request.
///
/// Backendless identifies the caller by an application id and an API key, both of which are part
/// of every REST URL and of the realtime handshake.
#[derive(Clone, ZeroizeOnDrop)]
pub struct Credential {
    app_id: Box<str>,
    api_key: Box<str>,
}

impl Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(stringify!(Credential))
            .field("app_id", &self.app_id)
            .field("api_key", &self.masked_api_key())
            .finish()
    }
}

impl Credential {
    /// Creates a new [`Credential`] instance from the application id and API key.
    #[must_use]
    pub fn new(app_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into().into_boxed_str(),
            api_key: api_key.into().into_boxed_str(),
        }
    }

    /// Returns the application id.
    #[must_use]
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Returns the API key.
    ///
    /// The key should never be logged, use [`Credential::masked_api_key`] instead.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Returns a masked version of the API key for logging purposes.
    ///
    /// Shows first 4 and last 4 characters with ellipsis in between.
    /// For keys shorter than 8 characters, shows asterisks only.
    #[must_use]
    pub fn masked_api_key(&self) -> String {
        let key = self.api_key.as_ref();
        let len = key.len();

        if len <= 8 {
            "*".repeat(len)
        } else {
            format!("{}...{}", &key[..4], &key[len - 4..])
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const APP_ID: &str = "A1B2C3D4-0000-1111-2222-333344445555";
    const API_KEY: &str = "F00DBABE-AAAA-BBBB-CCCC-DDDDEEEEFFFF";

    #[rstest]
    fn test_credential_creation() {
        let credential = Credential::new(APP_ID, API_KEY);

        assert_eq!(credential.app_id(), APP_ID);
        assert_eq!(credential.api_key(), API_KEY);
    }

    #[rstest]
    fn test_masked_api_key() {
        let credential = Credential::new(APP_ID, API_KEY);

        assert_eq!(credential.masked_api_key(), "F00D...FFFF");
    }

    #[rstest]
    fn test_masked_api_key_short() {
        let credential = Credential::new(APP_ID, "short");

        assert_eq!(credential.masked_api_key(), "*****");
    }

    #[rstest]
    fn test_debug_does_not_leak_key() {
        let credential = Credential::new(APP_ID, API_KEY);
        let debug_string = format!("{credential:?}");

        assert!(!debug_string.contains(API_KEY));
        assert!(debug_string.contains("F00D..."));
        assert!(debug_string.contains(APP_ID));
    }
}
