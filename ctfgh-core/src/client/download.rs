use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Result;

/// A binary response and the filename it should be saved under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Download {
    /// Write into `dir`, keeping only the final component of the filename
    pub fn save_into(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let name = Path::new(&self.filename)
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "download.bin".into());
        let path = dir.join(name);
        fs::write(&path, &self.bytes)?;
        info!(path = %path.display(), bytes = self.bytes.len(), "download saved");
        Ok(path)
    }
}

/// Server-suggested filename from a `Content-Disposition` header
pub fn filename_from_disposition(header: Option<&str>, fallback: &str) -> String {
    header
        .and_then(|h| h.split_once("filename="))
        .map(|(_, rest)| rest.split(';').next().unwrap_or_default())
        .map(|name| name.trim().replace('"', ""))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}
