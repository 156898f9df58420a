use std::fmt;

use crate::model::{FileError, ImportReport, ItemKey};

/// Kind of per-item remote operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchKind {
    Import,
    Delete,
    Export,
}

impl BatchKind {
    pub fn label(&self) -> &'static str {
        match self {
            BatchKind::Import => "Import",
            BatchKind::Delete => "Delete",
            BatchKind::Export => "Export",
        }
    }

    /// Shown next to the row while its request is in flight
    pub fn progress_label(&self) -> &'static str {
        match self {
            BatchKind::Import => "Importing...",
            BatchKind::Delete => "Deleting...",
            BatchKind::Export => "Exporting...",
        }
    }
}

impl fmt::Display for BatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What a successful item operation reports back
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemReport {
    pub message: String,
    pub errors: Vec<FileError>,
}

impl ItemReport {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            errors: Vec::new(),
        }
    }
}

impl From<ImportReport> for ItemReport {
    fn from(report: ImportReport) -> Self {
        Self {
            message: report.message,
            errors: report.errors,
        }
    }
}

/// Result of one item in a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemOutcome {
    pub key: ItemKey,
    pub label: String,
    pub success: bool,
    pub message: String,
    pub errors: Vec<FileError>,
}

/// Every outcome of a finished batch, in execution order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub kind: BatchKind,
    pub outcomes: Vec<ItemOutcome>,
}

impl BatchSummary {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.success).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(|o| !o.success)
    }

    pub fn headline(&self) -> String {
        format!(
            "{}: {} succeeded, {} failed",
            self.kind,
            self.succeeded(),
            self.failed()
        )
    }

    /// Text report, one block per item with its file errors indented
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for outcome in &self.outcomes {
            let mark = if outcome.success { "ok" } else { "FAILED" };
            lines.push(format!("[{mark}] {}: {}", outcome.label, outcome.message));
            for err in &outcome.errors {
                lines.push(format!("    - {}: {}", err.file, err.error));
            }
        }
        lines
    }
}
