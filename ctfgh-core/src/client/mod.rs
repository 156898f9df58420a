//! Blocking REST client for the plugin's HTTP surface.
//!
//! Every request replays the admin session cookie. Mutating requests also
//! carry the `CSRF-Token` header. JSON replies are checked for
//! `success: true` before their payload is trusted.

mod download;
mod envelope;

use std::sync::Mutex;
use std::time::Duration;

use reqwest::Method;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{CONTENT_DISPOSITION, COOKIE};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

pub use download::{Download, filename_from_disposition};
pub use envelope::{extract_csrf_nonce, parse_envelope, status_error};

use crate::error::{CtfghError, Result};
use crate::model::{Challenge, DeleteMode, ImportReport, ItemKey, RemoteRepo, SavedRepo};

pub const PLUGIN_PREFIX: &str = "/plugins/github_backup";
pub const ADMIN_PAGE: &str = "/admin/plugins/github_backup";
pub const CSRF_HEADER: &str = "CSRF-Token";

pub const EXAMPLE_FILENAME: &str = "challenge_example.json";
pub const ARCHIVE_FILENAME: &str = "challenges_export.zip";

/// Connection settings
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// CTFd root URL, e.g. `https://ctf.example.org`
    pub base_url: String,
    /// Value of the CTFd `session` cookie, or a full `name=value` pair
    pub session: Option<String>,
    /// Anti-forgery nonce; scraped from the admin page when absent
    pub csrf_token: Option<String>,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            session: None,
            csrf_token: None,
            timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, serde::Deserialize)]
struct RemoteReposBody {
    #[serde(default)]
    repos: Vec<RemoteRepo>,
}

#[derive(Debug, serde::Deserialize)]
struct SavedReposBody {
    #[serde(default)]
    repos: Vec<SavedRepo>,
}

#[derive(Debug, serde::Deserialize)]
struct ChallengesBody {
    #[serde(default)]
    challenges: Vec<Challenge>,
}

#[derive(Debug, serde::Deserialize)]
struct MessageBody {
    #[serde(default)]
    message: String,
}

#[derive(Serialize)]
struct SelectionBody<'a> {
    repos: &'a [RemoteRepo],
}

#[derive(Serialize)]
struct ImportBody {
    delete_mode: DeleteMode,
}

#[derive(Serialize)]
struct ArchiveBody<'a> {
    challenge_ids: &'a [u64],
}

/// Client for the GitHub backup plugin
pub struct SyncClient {
    http: Client,
    base_url: String,
    cookie: Option<String>,
    csrf_token: Mutex<Option<String>>,
}

impl SyncClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let parsed = reqwest::Url::parse(&config.base_url)
            .map_err(|e| CtfghError::InvalidUrl(format!("{}: {e}", config.base_url)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(CtfghError::InvalidUrl(config.base_url));
        }

        let http = Client::builder().timeout(config.timeout).build()?;
        let cookie = config.session.map(|s| {
            if s.contains('=') {
                s
            } else {
                format!("session={s}")
            }
        });

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cookie,
            csrf_token: Mutex::new(config.csrf_token),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self.http.request(method, self.url(path));
        if let Some(cookie) = &self.cookie {
            builder = builder.header(COOKIE, cookie);
        }
        builder
    }

    fn mutating(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let token = self.csrf_token()?;
        Ok(self.request(method, path).header(CSRF_HEADER, token))
    }

    /// Configured token, or the one found on the admin page
    pub fn csrf_token(&self) -> Result<String> {
        if let Ok(guard) = self.csrf_token.lock()
            && let Some(token) = guard.as_ref()
        {
            return Ok(token.clone());
        }
        let token = self.fetch_csrf_nonce()?;
        if let Ok(mut guard) = self.csrf_token.lock() {
            *guard = Some(token.clone());
        }
        Ok(token)
    }

    /// Scrape `csrfNonce` from the admin plugin page
    pub fn fetch_csrf_nonce(&self) -> Result<String> {
        let response = self.send(Method::GET, ADMIN_PAGE, self.request(Method::GET, ADMIN_PAGE))?;
        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(status_error(status.as_u16(), &body));
        }
        extract_csrf_nonce(&body).ok_or(CtfghError::MissingCsrfToken)
    }

    fn send(&self, method: Method, path: &str, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send()?;
        debug!(%method, path, status = response.status().as_u16(), "plugin request");
        Ok(response)
    }

    fn json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        builder: RequestBuilder,
    ) -> Result<T> {
        let response = self.send(method, path, builder)?;
        let status = response.status().as_u16();
        let body = response.text()?;
        parse_envelope(status, &body)
    }

    fn download(
        &self,
        method: Method,
        path: &str,
        builder: RequestBuilder,
        fallback: &str,
    ) -> Result<Download> {
        let response = self.send(method, path, builder)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(status_error(status.as_u16(), &body));
        }
        let disposition = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes()?.to_vec();
        Ok(Download {
            filename: filename_from_disposition(disposition.as_deref(), fallback),
            bytes,
        })
    }

    /// Complete the GitHub app installation link
    pub fn link_installation(&self) -> Result<String> {
        let path = format!("{PLUGIN_PREFIX}/installations");
        let builder = self.mutating(Method::GET, &path)?;
        let body: MessageBody = self.json(Method::GET, &path, builder)?;
        info!("GitHub installation linked");
        Ok(body.message)
    }

    /// Repositories visible to the installation.
    ///
    /// A 500 here means the plugin could not reach GitHub.
    pub fn list_remote_repos(&self) -> Result<Vec<RemoteRepo>> {
        let path = format!("{PLUGIN_PREFIX}/repos");
        let body: RemoteReposBody = self
            .json(Method::GET, &path, self.request(Method::GET, &path))
            .map_err(|e| match e {
                CtfghError::Api { status: 500, .. } => CtfghError::ServerUnavailable,
                other => other,
            })?;
        Ok(body.repos)
    }

    /// Persist the chosen repositories
    pub fn save_selection(&self, repos: &[RemoteRepo]) -> Result<String> {
        let path = format!("{PLUGIN_PREFIX}/repos/selection");
        let builder = self
            .mutating(Method::POST, &path)?
            .json(&SelectionBody { repos });
        let body: MessageBody = self.json(Method::POST, &path, builder)?;
        info!(count = repos.len(), "repository selection saved");
        Ok(body.message)
    }

    pub fn list_saved_repos(&self) -> Result<Vec<SavedRepo>> {
        let path = format!("{PLUGIN_PREFIX}/repos/saved");
        let body: SavedReposBody =
            self.json(Method::GET, &path, self.request(Method::GET, &path))?;
        Ok(body.repos)
    }

    pub fn delete_repo(&self, id: u64) -> Result<String> {
        let path = format!("{PLUGIN_PREFIX}/repos/{id}");
        let builder = self.mutating(Method::DELETE, &path)?;
        let body: MessageBody = self.json(Method::DELETE, &path, builder)?;
        Ok(body.message)
    }

    /// Import challenges from a saved repository
    pub fn import_repo(&self, id: u64, delete_mode: DeleteMode) -> Result<ImportReport> {
        let path = format!("{PLUGIN_PREFIX}/repos/{id}/import");
        let builder = self
            .mutating(Method::POST, &path)?
            .json(&ImportBody { delete_mode });
        self.json(Method::POST, &path, builder)
    }

    pub fn list_challenges(&self) -> Result<Vec<Challenge>> {
        let path = format!("{PLUGIN_PREFIX}/challenges");
        let body: ChallengesBody =
            self.json(Method::GET, &path, self.request(Method::GET, &path))?;
        Ok(body.challenges)
    }

    /// One challenge as JSON
    pub fn download_challenge(&self, id: u64) -> Result<Download> {
        let path = format!("{PLUGIN_PREFIX}/challenge/{id}/download");
        let fallback = format!("challenge_{id}.json");
        self.download(
            Method::GET,
            &path,
            self.request(Method::GET, &path),
            &fallback,
        )
    }

    /// The challenge JSON template
    pub fn download_example(&self) -> Result<Download> {
        let path = format!("{PLUGIN_PREFIX}/challenges/download/example");
        self.download(
            Method::GET,
            &path,
            self.request(Method::GET, &path),
            EXAMPLE_FILENAME,
        )
    }

    /// Several challenges as one ZIP archive
    pub fn download_archive(&self, challenge_ids: &[u64]) -> Result<Download> {
        let path = format!("{PLUGIN_PREFIX}/challenges/download");
        let builder = self
            .mutating(Method::POST, &path)?
            .json(&ArchiveBody { challenge_ids });
        self.download(Method::POST, &path, builder, ARCHIVE_FILENAME)
    }
}

/// Numeric id behind a key
pub fn numeric_id(key: &ItemKey) -> Result<u64> {
    key.as_str()
        .parse()
        .map_err(|_| CtfghError::InvalidKey(key.to_string()))
}

#[cfg(test)]
mod tests;
