use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ctfgh_core::{ClientConfig, DeleteMode};
use serde::{Deserialize, Serialize};

pub const DEFAULT_REMOTE_PAGE: usize = 10;
pub const DEFAULT_SAVED_PAGE: usize = 4;
pub const DEFAULT_CHALLENGES_PAGE: usize = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// On-disk TOML configuration.
/// Every field is optional so partial files merge cleanly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub server: Option<ServerConfig>,
    pub pages: Option<PagesConfig>,
    pub import: Option<ImportConfig>,
    pub export: Option<ExportConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub url: Option<String>,
    pub session: Option<String>,
    pub csrf_token: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PagesConfig {
    pub remote_repos: Option<usize>,
    pub saved_repos: Option<usize>,
    pub challenges: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportConfig {
    pub delete_mode: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportConfig {
    pub download_dir: Option<String>,
}

/// `<config_dir>/ctfgh/config.toml`
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("ctfgh").join("config.toml"))
}

/// Platform config overlaid by `./.ctfgh.toml`, or only `explicit` when given
pub fn load_config(explicit: Option<&Path>) -> color_eyre::Result<ConfigFile> {
    if let Some(path) = explicit {
        let content = std::fs::read_to_string(path)?;
        return Ok(toml::from_str(&content)?);
    }

    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".ctfgh.toml"));

    Ok(match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    })
}

/// `None` when the file is missing or does not parse
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config file");
            None
        }
    }
}

fn pick<S, T: Clone>(
    overlay: &Option<S>,
    base: &Option<S>,
    field: impl Fn(&S) -> &Option<T>,
) -> Option<T> {
    overlay
        .as_ref()
        .and_then(|s| field(s).clone())
        .or_else(|| base.as_ref().and_then(|s| field(s).clone()))
}

/// Merge two configs: `overlay` values take precedence over `base`
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        server: Some(ServerConfig {
            url: pick(&overlay.server, &base.server, |s| &s.url),
            session: pick(&overlay.server, &base.server, |s| &s.session),
            csrf_token: pick(&overlay.server, &base.server, |s| &s.csrf_token),
            timeout_secs: pick(&overlay.server, &base.server, |s| &s.timeout_secs),
        }),
        pages: Some(PagesConfig {
            remote_repos: pick(&overlay.pages, &base.pages, |p| &p.remote_repos),
            saved_repos: pick(&overlay.pages, &base.pages, |p| &p.saved_repos),
            challenges: pick(&overlay.pages, &base.pages, |p| &p.challenges),
        }),
        import: Some(ImportConfig {
            delete_mode: pick(&overlay.import, &base.import, |i| &i.delete_mode),
        }),
        export: Some(ExportConfig {
            download_dir: pick(&overlay.export, &base.export, |e| &e.download_dir),
        }),
    }
}

/// Values from the command line and environment; `None` falls through to the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub url: Option<String>,
    pub session: Option<String>,
    pub csrf_token: Option<String>,
    pub timeout_secs: Option<u64>,
    pub delete_mode: Option<DeleteMode>,
    pub download_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSizes {
    pub remote_repos: NonZeroUsize,
    pub saved_repos: NonZeroUsize,
    pub challenges: NonZeroUsize,
}

/// Fully resolved settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub client: ClientConfig,
    pub pages: PageSizes,
    pub delete_mode: DeleteMode,
    pub download_dir: PathBuf,
}

fn page_size(value: Option<usize>, default: usize) -> NonZeroUsize {
    value
        .and_then(NonZeroUsize::new)
        .or_else(|| NonZeroUsize::new(default))
        .unwrap_or(NonZeroUsize::MIN)
}

impl Settings {
    /// Flag or environment, then config file, then default
    pub fn resolve(overrides: Overrides, file: ConfigFile) -> color_eyre::Result<Self> {
        let server = file.server.unwrap_or_default();
        let pages = file.pages.unwrap_or_default();
        let import = file.import.unwrap_or_default();
        let export = file.export.unwrap_or_default();

        let delete_mode = match overrides.delete_mode {
            Some(mode) => mode,
            None => match import.delete_mode.as_deref() {
                Some(raw) => raw
                    .parse::<DeleteMode>()
                    .map_err(|e| color_eyre::eyre::eyre!("[import] delete_mode: {e}"))?,
                None => DeleteMode::default(),
            },
        };

        let download_dir = overrides
            .download_dir
            .or_else(|| export.download_dir.map(PathBuf::from))
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        let defaults = ClientConfig::default();
        let timeout_secs = overrides
            .timeout_secs
            .or(server.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            client: ClientConfig {
                base_url: overrides.url.or(server.url).unwrap_or(defaults.base_url),
                session: overrides.session.or(server.session),
                csrf_token: overrides.csrf_token.or(server.csrf_token),
                timeout: Duration::from_secs(timeout_secs),
            },
            pages: PageSizes {
                remote_repos: page_size(pages.remote_repos, DEFAULT_REMOTE_PAGE),
                saved_repos: page_size(pages.saved_repos, DEFAULT_SAVED_PAGE),
                challenges: page_size(pages.challenges, DEFAULT_CHALLENGES_PAGE),
            },
            delete_mode,
            download_dir,
        })
    }
}
