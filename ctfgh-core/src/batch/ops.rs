//! Batch operations backed by the plugin client.

use std::path::PathBuf;
use std::sync::Arc;

use super::outcome::{BatchKind, ItemReport};
use super::runner::BatchOperation;
use crate::client::{SyncClient, numeric_id};
use crate::error::Result;
use crate::model::{DeleteMode, ItemKey};

/// Import each saved repository with a fixed delete mode
pub struct ImportRepos {
    client: Arc<SyncClient>,
    delete_mode: DeleteMode,
}

impl ImportRepos {
    pub fn new(client: Arc<SyncClient>, delete_mode: DeleteMode) -> Self {
        Self {
            client,
            delete_mode,
        }
    }
}

impl BatchOperation for ImportRepos {
    fn kind(&self) -> BatchKind {
        BatchKind::Import
    }

    fn apply(&mut self, key: &ItemKey) -> Result<ItemReport> {
        let id = numeric_id(key)?;
        Ok(self.client.import_repo(id, self.delete_mode)?.into())
    }
}

/// Remove saved repositories
pub struct DeleteRepos {
    client: Arc<SyncClient>,
}

impl DeleteRepos {
    pub fn new(client: Arc<SyncClient>) -> Self {
        Self { client }
    }
}

impl BatchOperation for DeleteRepos {
    fn kind(&self) -> BatchKind {
        BatchKind::Delete
    }

    fn apply(&mut self, key: &ItemKey) -> Result<ItemReport> {
        let id = numeric_id(key)?;
        let message = self.client.delete_repo(id)?;
        Ok(ItemReport::message(message))
    }
}

/// Download each challenge as JSON into `dir`
pub struct ExportChallenges {
    client: Arc<SyncClient>,
    dir: PathBuf,
}

impl ExportChallenges {
    pub fn new(client: Arc<SyncClient>, dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            dir: dir.into(),
        }
    }
}

impl BatchOperation for ExportChallenges {
    fn kind(&self) -> BatchKind {
        BatchKind::Export
    }

    fn apply(&mut self, key: &ItemKey) -> Result<ItemReport> {
        let id = numeric_id(key)?;
        let path = self.client.download_challenge(id)?.save_into(&self.dir)?;
        Ok(ItemReport::message(format!("saved {}", path.display())))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;
    use crate::batch::{BatchPlan, run_batch};
    use crate::client::ClientConfig;

    fn client(server: &MockServer) -> Arc<SyncClient> {
        Arc::new(
            SyncClient::new(ClientConfig {
                base_url: server.base_url(),
                session: Some("abc".to_string()),
                csrf_token: Some("tok".to_string()),
                timeout: Duration::from_secs(5),
            })
            .unwrap(),
        )
    }

    fn plan(kind: BatchKind, ids: &[u64]) -> BatchPlan {
        BatchPlan::new(kind, ids.iter().map(|&id| (ItemKey::from(id), format!("org/r{id}"))))
    }

    #[test]
    fn test_import_with_one_rejected_repo_refreshes_once() {
        let server = MockServer::start();
        let first = server.mock(|when, then| {
            when.method(POST)
                .path("/plugins/github_backup/repos/1/import")
                .json_body(json!({"delete_mode": "full"}));
            then.status(200)
                .json_body(json!({"success": true, "message": "imported", "errors": []}));
        });
        let second = server.mock(|when, then| {
            when.method(POST).path("/plugins/github_backup/repos/2/import");
            then.status(200)
                .json_body(json!({"success": false, "message": "boom"}));
        });
        let saved = server.mock(|when, then| {
            when.method(GET).path("/plugins/github_backup/repos/saved");
            then.status(200).json_body(json!({"success": true, "repos": []}));
        });
        let challenges = server.mock(|when, then| {
            when.method(GET).path("/plugins/github_backup/challenges");
            then.status(200)
                .json_body(json!({"success": true, "challenges": []}));
        });

        let client = client(&server);
        let mut op = ImportRepos::new(Arc::clone(&client), DeleteMode::Full);
        let refresh_client = Arc::clone(&client);
        let summary = run_batch(
            &plan(BatchKind::Import, &[1, 2]),
            &mut op,
            move || {
                refresh_client.list_saved_repos().unwrap();
                refresh_client.list_challenges().unwrap();
            },
            |_| {},
        );

        first.assert();
        second.assert();
        saved.assert_calls(1);
        challenges.assert_calls(1);
        assert!(summary.outcomes[0].success);
        assert!(!summary.outcomes[1].success);
        assert_eq!(summary.outcomes[1].message, "boom");
    }

    #[test]
    fn test_delete_reports_server_message() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(DELETE)
                .path("/plugins/github_backup/repos/5")
                .header("CSRF-Token", "tok");
            then.status(200)
                .json_body(json!({"success": true, "message": "Repository deleted"}));
        });

        let mut op = DeleteRepos::new(client(&server));
        let report = op.apply(&ItemKey::from(5)).unwrap();
        assert_eq!(report.message, "Repository deleted");
    }

    #[test]
    fn test_export_writes_challenge_files() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/plugins/github_backup/challenge/7/download");
            then.status(200)
                .header("Content-Disposition", "attachment; filename=challenge_web.json")
                .body(r#"{"name":"web"}"#);
        });
        let dir = tempfile::tempdir().unwrap();

        let mut op = ExportChallenges::new(client(&server), dir.path());
        let report = op.apply(&ItemKey::from(7)).unwrap();

        let written = std::fs::read_to_string(dir.path().join("challenge_web.json")).unwrap();
        assert_eq!(written, r#"{"name":"web"}"#);
        assert!(report.message.starts_with("saved "));
    }

    #[test]
    fn test_non_numeric_key_fails_without_request() {
        let server = MockServer::start();
        let mut op = DeleteRepos::new(client(&server));
        assert!(op.apply(&ItemKey::from("org/repo")).is_err());
    }
}
