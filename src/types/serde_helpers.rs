//! Custom serde helpers for the loosely-typed payloads Havona returns.
//!
//! The platform's REST handlers are not always consistent about empty values:
//! a missing wallet may arrive as `""`, a missing list as `null`, and some
//! numeric fields as free text. These modules smooth that over.

use serde::{Deserialize, Deserializer};

/// Helper for empty strings that should be deserialized as None.
///
/// # Example
///
/// ```rust
/// use serde::Deserialize;
/// use havona_client::types::serde_helpers::empty_string_as_none;
///
/// #[derive(Deserialize, Debug)]
/// struct Response {
///     #[serde(deserialize_with = "empty_string_as_none::deserialize", default)]
///     wallet: Option<String>,
/// }
///
/// let json = r#"{"wallet":""}"#;
/// let response: Response = serde_json::from_str(json).unwrap();
/// assert!(response.wallet.is_none());
///
/// let json = r#"{"wallet":"0xabc"}"#;
/// let response: Response = serde_json::from_str(json).unwrap();
/// assert_eq!(response.wallet.unwrap(), "0xabc");
/// ```
pub mod empty_string_as_none {
    use super::*;

    /// Deserialize a string, returning None if empty.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = Option::<String>::deserialize(deserializer)?;
        Ok(s.filter(|s| !s.is_empty()))
    }
}

/// Deserialize to `None` instead of failing on invalid/unexpected data.
///
/// # Example
///
/// ```rust
/// use serde::Deserialize;
/// use havona_client::types::serde_helpers::default_on_error;
///
/// #[derive(Deserialize, Debug)]
/// struct Response {
///     #[serde(deserialize_with = "default_on_error::deserialize", default)]
///     score: Option<f64>,
/// }
///
/// let json = r#"{"score":"n/a"}"#;
/// let response: Response = serde_json::from_str(json).unwrap();
/// assert!(response.score.is_none());
/// ```
pub mod default_on_error {
    use super::*;

    /// Deserialize a value, returning None if deserialization fails.
    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Ok(T::deserialize(deserializer).ok())
    }
}

/// Deserialize `null` as the type's default value.
///
/// # Example
///
/// ```rust
/// use serde::Deserialize;
/// use havona_client::types::serde_helpers::null_as_default;
///
/// #[derive(Deserialize, Debug)]
/// struct Response {
///     #[serde(deserialize_with = "null_as_default::deserialize", default)]
///     agents: Vec<String>,
/// }
///
/// let json = r#"{"agents":null}"#;
/// let response: Response = serde_json::from_str(json).unwrap();
/// assert!(response.agents.is_empty());
/// ```
pub mod null_as_default {
    use super::*;

    /// Deserialize a value, mapping `null` to `T::default()`.
    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: Deserialize<'de> + Default,
        D: Deserializer<'de>,
    {
        Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
    }
}
