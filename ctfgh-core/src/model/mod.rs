mod challenge;
mod item;
mod repo;
mod report;

pub use challenge::Challenge;
pub use item::{ItemKey, Listed};
pub use repo::{DeleteMode, RemoteRepo, SavedRepo};
pub use report::{FileError, ImportReport};
