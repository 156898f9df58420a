mod action;
mod state;
mod worker;

pub use action::Action;
pub use state::{AppMode, AppState, LoadState, Notice, PendingConfirm, ViewMode};
pub use worker::Worker;
