mod controller;
mod guard;
pub mod ops;
mod outcome;
mod runner;

pub use controller::{BatchController, BatchPhase, BatchProgress};
pub use guard::{BusyFlag, BusyPermit};
pub use outcome::{BatchKind, BatchSummary, ItemOutcome, ItemReport};
pub use runner::{BatchMessage, BatchOperation, BatchPlan, PlanItem, run_batch};
