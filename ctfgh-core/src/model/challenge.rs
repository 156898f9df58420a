use serde::{Deserialize, Serialize};

use super::item::{ItemKey, Listed};

/// A challenge as listed by the plugin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: u64,
    pub name: String,
    /// Whether the challenge is tracked by a GitHub import
    #[serde(default)]
    pub imported: bool,
}

impl Listed for Challenge {
    fn key(&self) -> ItemKey {
        ItemKey::from(self.id)
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}
