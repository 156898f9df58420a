use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

use super::item::{ItemKey, Listed};

/// A repository visible to the GitHub app installation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRepo {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    pub full_name: String,
}

impl Listed for RemoteRepo {
    /// Remote repos are selected by full name, which is what the operator sees
    fn key(&self) -> ItemKey {
        ItemKey::new(self.full_name.clone())
    }

    fn display_name(&self) -> &str {
        &self.full_name
    }
}

/// A repository persisted by the plugin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedRepo {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub last_synced_at: Option<String>,
    /// Set once the repository has been imported at least once
    #[serde(default)]
    pub selected: bool,
}

impl SavedRepo {
    /// Label of the per-row import action
    pub fn import_label(&self) -> &'static str {
        if self.selected { "Update" } else { "Import" }
    }

    pub fn last_synced_display(&self) -> String {
        match &self.last_synced_at {
            Some(ts) => format!("{ts} UTC"),
            None => "-".to_string(),
        }
    }
}

impl Listed for SavedRepo {
    fn key(&self) -> ItemKey {
        ItemKey::from(self.id)
    }

    fn display_name(&self) -> &str {
        &self.full_name
    }
}

/// What the server does with challenges that disappeared from the repository
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeleteMode {
    /// Leave orphaned challenges untouched
    #[default]
    Keep,
    /// Forget the sync record, keep the challenge
    SyncOnly,
    /// Delete the challenge and its sync record
    Full,
}

impl DeleteMode {
    pub fn label(&self) -> &'static str {
        match self {
            DeleteMode::Keep => "keep",
            DeleteMode::SyncOnly => "sync_only",
            DeleteMode::Full => "full",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            DeleteMode::Keep => DeleteMode::SyncOnly,
            DeleteMode::SyncOnly => DeleteMode::Full,
            DeleteMode::Full => DeleteMode::Keep,
        }
    }
}

impl fmt::Display for DeleteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DeleteMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keep" | "false" | "none" => Ok(DeleteMode::Keep),
            "sync_only" | "sync-only" => Ok(DeleteMode::SyncOnly),
            "full" => Ok(DeleteMode::Full),
            other => Err(format!(
                "unknown delete mode '{other}' (expected keep, sync_only or full)"
            )),
        }
    }
}

/// The plugin expects `false` when nothing should be deleted
impl Serialize for DeleteMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DeleteMode::Keep => serializer.serialize_bool(false),
            DeleteMode::SyncOnly => serializer.serialize_str("sync_only"),
            DeleteMode::Full => serializer.serialize_str("full"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_mode_wire_format() {
        assert_eq!(serde_json::to_string(&DeleteMode::Keep).unwrap(), "false");
        assert_eq!(
            serde_json::to_string(&DeleteMode::SyncOnly).unwrap(),
            "\"sync_only\""
        );
        assert_eq!(serde_json::to_string(&DeleteMode::Full).unwrap(), "\"full\"");
    }

    #[test]
    fn test_delete_mode_parse_and_cycle() {
        assert_eq!("full".parse::<DeleteMode>().unwrap(), DeleteMode::Full);
        assert_eq!("Sync-Only".parse::<DeleteMode>().unwrap(), DeleteMode::SyncOnly);
        assert!("everything".parse::<DeleteMode>().is_err());
        assert_eq!(DeleteMode::Full.next(), DeleteMode::Keep);
    }

    #[test]
    fn test_saved_repo_from_plugin_json() {
        let repo: SavedRepo = serde_json::from_str(
            r#"{"id": 3, "name": "b", "full_name": "a/b", "selected": true, "last_synced_at": null}"#,
        )
        .unwrap();
        assert_eq!(repo.key(), ItemKey::from("3"));
        assert_eq!(repo.import_label(), "Update");
        assert_eq!(repo.last_synced_display(), "-");
    }

    #[test]
    fn test_remote_repo_keyed_by_full_name() {
        let repo = RemoteRepo {
            id: 9,
            name: "c".to_string(),
            full_name: "a/c".to_string(),
        };
        assert_eq!(repo.key(), ItemKey::from("a/c"));
        assert!(repo.matches("a/"));
        assert!(!repo.matches("zzz"));
    }
}
