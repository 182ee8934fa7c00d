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

//! Serde helpers shared by the wire models.

use serde::{Deserialize, Deserializer, de::Error};

/// Deserializes a fault code that may arrive as a JSON number or a numeric string.
///
/// Non-numeric strings map to `0`.
///
/// # Errors
///
/// Returns an error if the value is neither a number, a string nor null.
pub fn deserialize_fault_code<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid fault code {n}"))),
        Some(serde_json::Value::String(s)) => Ok(Some(s.trim().parse::<i64>().unwrap_or(0))),
        Some(other) => Err(D::Error::custom(format!("invalid fault code {other}"))),
    }
}

/// Deserializes `null` as the type's default value.
///
/// # Errors
///
/// Returns an error if the non-null value cannot be deserialized as `T`.
pub fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Envelope {
        #[serde(default, deserialize_with = "deserialize_fault_code")]
        code: Option<i64>,
        #[serde(default, deserialize_with = "deserialize_null_default")]
        tags: Vec<String>,
    }

    #[rstest]
    #[case(r#"{"code": 3064}"#, Some(3064))]
    #[case(r#"{"code": "3064"}"#, Some(3064))]
    #[case(r#"{"code": "Server.Processing"}"#, Some(0))]
    #[case(r#"{"code": null}"#, None)]
    #[case(r#"{}"#, None)]
    fn test_deserialize_fault_code(#[case] json: &str, #[case] expected: Option<i64>) {
        let envelope: Envelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.code, expected);
    }

    #[rstest]
    fn test_null_default() {
        let envelope: Envelope = serde_json::from_str(r#"{"tags": null}"#).unwrap();
        assert!(envelope.tags.is_empty());
    }
}
