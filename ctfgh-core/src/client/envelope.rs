use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{CtfghError, Result};

const DEFAULT_API_ERROR: &str = "Unexpected error communicating with the API.";
const DEFAULT_REJECTED: &str = "The API did not respond successfully.";

#[derive(Debug, Deserialize)]
struct Status {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<serde_json::Value>,
}

/// Message text from a JSON body, if any
fn message_of(value: Option<serde_json::Value>) -> Option<String> {
    match value? {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s),
        serde_json::Value::Null | serde_json::Value::String(_) => None,
        other => Some(other.to_string()),
    }
}

/// Error for a non-2xx reply. 401 gets an operator-friendly variant.
pub fn status_error(status: u16, body: &str) -> CtfghError {
    match status {
        401 => CtfghError::Unauthenticated,
        _ => {
            let message = serde_json::from_str::<Status>(body)
                .ok()
                .and_then(|s| message_of(s.message))
                .unwrap_or_else(|| DEFAULT_API_ERROR.to_string());
            CtfghError::Api { status, message }
        }
    }
}

/// Check status and `success` flag, then decode the payload
pub fn parse_envelope<T: DeserializeOwned>(status: u16, body: &str) -> Result<T> {
    if !(200..300).contains(&status) {
        return Err(status_error(status, body));
    }

    let value: serde_json::Value = serde_json::from_str(body)?;
    let envelope = Status::deserialize(&value)?;
    if !envelope.success {
        let message = message_of(envelope.message).unwrap_or_else(|| DEFAULT_REJECTED.to_string());
        return Err(CtfghError::Rejected(message));
    }
    Ok(T::deserialize(value)?)
}

/// Find the `csrfNonce` value CTFd embeds in every admin page
pub fn extract_csrf_nonce(html: &str) -> Option<String> {
    let after_key = &html[html.find("csrfNonce")? + "csrfNonce".len()..];
    let open = after_key.find('"')?;
    // Only accept a value on the same assignment, not some later string.
    if after_key[..open].contains([',', ';', '\n']) {
        return None;
    }
    let rest = &after_key[open + 1..];
    let close = rest.find('"')?;
    let nonce = &rest[..close];
    (!nonce.is_empty()).then(|| nonce.to_string())
}
