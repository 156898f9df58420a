use std::time::Duration;

use httpmock::prelude::*;
use serde_json::json;

use super::*;

fn client_for(server: &MockServer, csrf: Option<&str>) -> SyncClient {
    SyncClient::new(ClientConfig {
        base_url: server.base_url(),
        session: Some("abc".to_string()),
        csrf_token: csrf.map(str::to_string),
        timeout: Duration::from_secs(5),
    })
    .expect("client")
}

#[test]
fn test_rejects_non_http_urls() {
    let err = SyncClient::new(ClientConfig {
        base_url: "ftp://ctf.example.org".to_string(),
        ..ClientConfig::default()
    });
    assert!(matches!(err, Err(CtfghError::InvalidUrl(_))));

    let err = SyncClient::new(ClientConfig {
        base_url: "not a url".to_string(),
        ..ClientConfig::default()
    });
    assert!(matches!(err, Err(CtfghError::InvalidUrl(_))));
}

#[test]
fn test_list_remote_repos_sends_session_cookie() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/plugins/github_backup/repos")
            .header("Cookie", "session=abc");
        then.status(200).json_body(json!({
            "success": true,
            "repos": [
                {"id": 1, "name": "b", "full_name": "a/b"},
                {"id": 2, "name": "c", "full_name": "a/c"}
            ]
        }));
    });

    let repos = client_for(&server, Some("tok")).list_remote_repos().unwrap();
    mock.assert();
    assert_eq!(repos.len(), 2);
    assert_eq!(repos[1].full_name, "a/c");
}

#[test]
fn test_list_remote_repos_unauthenticated() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/plugins/github_backup/repos");
        then.status(401)
            .json_body(json!({"success": false, "message": "Installation ID not found"}));
    });

    let err = client_for(&server, Some("tok")).list_remote_repos().unwrap_err();
    assert!(matches!(err, CtfghError::Unauthenticated));
}

#[test]
fn test_server_error_is_github_copy_only_for_repo_listing() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/plugins/github_backup/repos");
        then.status(500)
            .json_body(json!({"success": false, "message": "connection reset"}));
    });
    server.mock(|when, then| {
        when.method(POST).path("/plugins/github_backup/repos/4/import");
        then.status(500)
            .json_body(json!({"success": false, "message": "Unexpected error: bad yaml"}));
    });

    let client = client_for(&server, Some("tok"));
    let err = client.list_remote_repos().unwrap_err();
    assert!(matches!(err, CtfghError::ServerUnavailable));

    let err = client.import_repo(4, DeleteMode::Keep).unwrap_err();
    assert_eq!(err.to_string(), "Unexpected error: bad yaml (HTTP 500)");
}

#[test]
fn test_save_selection_posts_repos_with_csrf_header() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/plugins/github_backup/repos/selection")
            .header("CSRF-Token", "tok")
            .json_body(json!({"repos": [{"id": 1, "name": "b", "full_name": "a/b"}]}));
        then.status(200)
            .json_body(json!({"success": true, "message": "Repositories saved correctly"}));
    });

    let repos = vec![RemoteRepo {
        id: 1,
        name: "b".to_string(),
        full_name: "a/b".to_string(),
    }];
    let message = client_for(&server, Some("tok")).save_selection(&repos).unwrap();
    mock.assert();
    assert_eq!(message, "Repositories saved correctly");
}

#[test]
fn test_csrf_nonce_is_scraped_once_when_not_configured() {
    let server = MockServer::start();
    let page = server.mock(|when, then| {
        when.method(GET).path("/admin/plugins/github_backup");
        then.status(200)
            .body(r#"<script>var init = {'csrfNonce': "scraped",};</script>"#);
    });
    let first = server.mock(|when, then| {
        when.method(DELETE)
            .path("/plugins/github_backup/repos/1")
            .header("CSRF-Token", "scraped");
        then.status(200)
            .json_body(json!({"success": true, "message": "deleted"}));
    });
    let second = server.mock(|when, then| {
        when.method(DELETE)
            .path("/plugins/github_backup/repos/2")
            .header("CSRF-Token", "scraped");
        then.status(200)
            .json_body(json!({"success": true, "message": "deleted"}));
    });

    let client = client_for(&server, None);
    client.delete_repo(1).unwrap();
    client.delete_repo(2).unwrap();
    page.assert_calls(1);
    first.assert();
    second.assert();
}

#[test]
fn test_missing_nonce_fails_before_mutating() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/admin/plugins/github_backup");
        then.status(200).body("<html>login</html>");
    });
    let delete = server.mock(|when, then| {
        when.method(DELETE).path("/plugins/github_backup/repos/1");
        then.status(200).json_body(json!({"success": true}));
    });

    let err = client_for(&server, None).delete_repo(1).unwrap_err();
    assert!(matches!(err, CtfghError::MissingCsrfToken));
    delete.assert_calls(0);
}

#[test]
fn test_import_sends_delete_mode_and_returns_file_errors() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/plugins/github_backup/repos/4/import")
            .json_body(json!({"delete_mode": "sync_only"}));
        then.status(200).json_body(json!({
            "success": true,
            "message": "1 challenges imported, 0 challenges updated, 0 already existing, 0 deleted",
            "errors": [{"file": "challenges/bad.json", "error": "missing name"}]
        }));
    });

    let report = client_for(&server, Some("tok"))
        .import_repo(4, DeleteMode::SyncOnly)
        .unwrap();
    mock.assert();
    assert!(report.message.starts_with("1 challenges imported"));
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].file, "challenges/bad.json");
}

#[test]
fn test_import_keep_mode_sends_false() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/plugins/github_backup/repos/4/import")
            .json_body(json!({"delete_mode": false}));
        then.status(200).json_body(json!({"success": true, "message": "ok", "errors": []}));
    });

    client_for(&server, Some("tok"))
        .import_repo(4, DeleteMode::Keep)
        .unwrap();
    mock.assert();
}

#[test]
fn test_delete_not_found_surfaces_message() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(DELETE).path("/plugins/github_backup/repos/9");
        then.status(404)
            .json_body(json!({"success": false, "message": "Repository not found"}));
    });

    let err = client_for(&server, Some("tok")).delete_repo(9).unwrap_err();
    assert_eq!(err.to_string(), "Repository not found (HTTP 404)");
}

#[test]
fn test_list_challenges() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/plugins/github_backup/challenges");
        then.status(200).json_body(json!({
            "success": true,
            "challenges": [{"id": 3, "name": "knock", "imported": true}]
        }));
    });

    let challenges = client_for(&server, Some("tok")).list_challenges().unwrap();
    assert_eq!(
        challenges,
        vec![Challenge {
            id: 3,
            name: "knock".to_string(),
            imported: true
        }]
    );
}

#[test]
fn test_download_uses_content_disposition() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/plugins/github_backup/challenge/3/download");
        then.status(200)
            .header("Content-Disposition", r#"attachment; filename="challenge_knock.json""#)
            .body("{}");
    });

    let download = client_for(&server, Some("tok")).download_challenge(3).unwrap();
    assert_eq!(download.filename, "challenge_knock.json");
    assert_eq!(download.bytes, b"{}");
}

#[test]
fn test_download_falls_back_to_default_name() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/plugins/github_backup/challenge/8/download");
        then.status(200).body("{}");
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/plugins/github_backup/challenges/download/example");
        then.status(200).body("{}");
    });

    let client = client_for(&server, Some("tok"));
    assert_eq!(client.download_challenge(8).unwrap().filename, "challenge_8.json");
    assert_eq!(client.download_example().unwrap().filename, EXAMPLE_FILENAME);
}

#[test]
fn test_download_archive_posts_ids() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/plugins/github_backup/challenges/download")
            .header("CSRF-Token", "tok")
            .json_body(json!({"challenge_ids": [1, 5]}));
        then.status(200).body(vec![0x50, 0x4b, 0x03, 0x04]);
    });

    let download = client_for(&server, Some("tok")).download_archive(&[1, 5]).unwrap();
    mock.assert();
    assert_eq!(download.filename, ARCHIVE_FILENAME);
    assert_eq!(download.bytes.len(), 4);
}

#[test]
fn test_download_error_status() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/plugins/github_backup/challenge/2/download");
        then.status(400)
            .json_body(json!({"success": false, "message": "Challenge not found"}));
    });

    let err = client_for(&server, Some("tok")).download_challenge(2).unwrap_err();
    assert!(matches!(err, CtfghError::Api { status: 400, .. }));
}

#[test]
fn test_link_installation() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET)
            .path("/plugins/github_backup/installations")
            .header("CSRF-Token", "tok");
        then.status(200)
            .json_body(json!({"success": true, "message": "Installation ID saved correctly."}));
    });

    let message = client_for(&server, Some("tok")).link_installation().unwrap();
    assert_eq!(message, "Installation ID saved correctly.");
}

#[test]
fn test_numeric_id() {
    assert_eq!(numeric_id(&ItemKey::from(12)).unwrap(), 12);
    assert!(matches!(
        numeric_id(&ItemKey::from("a/b")),
        Err(CtfghError::InvalidKey(_))
    ));
}
