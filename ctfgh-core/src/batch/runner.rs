use tracing::{info, warn};

use super::outcome::{BatchKind, BatchSummary, ItemOutcome, ItemReport};
use crate::error::Result;
use crate::model::ItemKey;

/// A remote operation applied to one item at a time
pub trait BatchOperation: Send {
    fn kind(&self) -> BatchKind;

    fn apply(&mut self, key: &ItemKey) -> Result<ItemReport>;
}

/// One item of a plan: its key and the label shown to the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanItem {
    pub key: ItemKey,
    pub label: String,
}

/// The items a batch will visit, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPlan {
    pub kind: BatchKind,
    pub items: Vec<PlanItem>,
}

impl BatchPlan {
    pub fn new<I>(kind: BatchKind, items: I) -> Self
    where
        I: IntoIterator<Item = (ItemKey, String)>,
    {
        Self {
            kind,
            items: items
                .into_iter()
                .map(|(key, label)| PlanItem { key, label })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.label.as_str())
    }
}

/// Progress reported while a batch runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchMessage {
    /// Request for item `index` (0-based) is about to be sent
    ItemStarted { index: usize, key: ItemKey },
    /// Item finished, successfully or not
    ItemFinished(ItemOutcome),
    /// All items done, dependent collections are being re-fetched
    Refreshing,
    /// Batch over, flag released
    Completed(BatchSummary),
}

/// Apply `op` to every item of `plan`, strictly one after another.
///
/// A failing item is recorded and the loop moves on. `refresh` runs exactly
/// once after the last item. `Completed` is left to the caller so it can
/// release its busy permit first.
pub fn run_batch<O, R, N>(plan: &BatchPlan, op: &mut O, refresh: R, mut notify: N) -> BatchSummary
where
    O: BatchOperation + ?Sized,
    R: FnOnce(),
    N: FnMut(BatchMessage),
{
    info!(kind = %plan.kind, items = plan.len(), "batch started");
    let mut outcomes = Vec::with_capacity(plan.len());

    for (index, item) in plan.items.iter().enumerate() {
        notify(BatchMessage::ItemStarted {
            index,
            key: item.key.clone(),
        });

        let outcome = match op.apply(&item.key) {
            Ok(report) => ItemOutcome {
                key: item.key.clone(),
                label: item.label.clone(),
                success: true,
                message: report.message,
                errors: report.errors,
            },
            Err(e) => {
                warn!(kind = %plan.kind, key = %item.key, error = %e, "batch item failed");
                ItemOutcome {
                    key: item.key.clone(),
                    label: item.label.clone(),
                    success: false,
                    message: e.to_string(),
                    errors: Vec::new(),
                }
            }
        };

        notify(BatchMessage::ItemFinished(outcome.clone()));
        outcomes.push(outcome);
    }

    notify(BatchMessage::Refreshing);
    refresh();

    let summary = BatchSummary {
        kind: plan.kind,
        outcomes,
    };
    info!(kind = %plan.kind, ok = summary.succeeded(), failed = summary.failed(), "batch finished");
    summary
}
