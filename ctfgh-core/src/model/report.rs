use serde::{Deserialize, Serialize};

/// A per-file problem reported by the server during an import
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileError {
    pub file: String,
    pub error: String,
}

/// Body of a successful import response
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ImportReport {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub errors: Vec<FileError>,
}
