pub mod batch;
pub mod client;
pub mod error;
pub mod listing;
pub mod model;
pub mod paginate;
pub mod selection;

pub use batch::ops::{DeleteRepos, ExportChallenges, ImportRepos};
pub use batch::{
    BatchController, BatchKind, BatchMessage, BatchOperation, BatchPhase, BatchPlan,
    BatchProgress, BatchSummary, BusyFlag, BusyPermit, ItemOutcome, ItemReport, PlanItem,
    run_batch,
};
pub use client::{ClientConfig, Download, SyncClient, filename_from_disposition, numeric_id};
pub use error::{CtfghError, Result};
pub use listing::{ListState, ListView, Row};
pub use model::{
    Challenge, DeleteMode, FileError, ImportReport, ItemKey, Listed, RemoteRepo, SavedRepo,
};
pub use paginate::{Page, PageCursor, paginate, total_pages};
pub use selection::SelectionSet;
