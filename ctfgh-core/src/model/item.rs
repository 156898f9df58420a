use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of a listed item, normalized to its string form.
///
/// Numeric ids and repository full names share one key type so that a
/// selection made against `42` matches a row whose id arrives as `"42"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemKey(String);

impl ItemKey {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for ItemKey {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for ItemKey {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl From<String> for ItemKey {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

/// Anything that can be shown as a selectable row
pub trait Listed {
    /// Identity used by the selection set
    fn key(&self) -> ItemKey;

    /// Text shown in the list and matched by the search filter
    fn display_name(&self) -> &str;

    /// Case-insensitive substring match. `needle` must already be lowercase.
    fn matches(&self, needle: &str) -> bool {
        needle.is_empty() || self.display_name().to_lowercase().contains(needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_and_string_keys_are_equal() {
        assert_eq!(ItemKey::from(42), ItemKey::from("42"));
        assert_ne!(ItemKey::from(42), ItemKey::from("042"));
    }

    #[test]
    fn test_key_serializes_as_plain_string() {
        let json = serde_json::to_string(&ItemKey::from(7)).unwrap();
        assert_eq!(json, "\"7\"");
    }
}
