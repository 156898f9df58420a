use thiserror::Error;

#[derive(Error, Debug)]
pub enum CtfghError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error(
        "User not authenticated with GitHub. Please install the app or make sure you have the necessary permissions."
    )]
    Unauthenticated,

    #[error(
        "An unexpected error occurred while attempting to connect to GitHub. Please check the GitHub App settings and your Internet connection."
    )]
    ServerUnavailable,

    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },

    #[error("{0}")]
    Rejected(String),

    #[error("Invalid response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    #[error("No CSRF token configured and none found on the admin page")]
    MissingCsrfToken,

    #[error("Not a numeric id: {0}")]
    InvalidKey(String),
}

pub type Result<T> = std::result::Result<T, CtfghError>;
