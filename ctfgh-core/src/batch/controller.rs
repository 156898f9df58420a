use crossbeam_channel::{Receiver, TryRecvError};
use tracing::{debug, warn};

use super::guard::BusyFlag;
use super::outcome::{BatchKind, BatchSummary};
use super::runner::{BatchMessage, BatchOperation, BatchPlan, run_batch};
use crate::model::ItemKey;

type RefreshFn = Box<dyn FnOnce() + Send>;

/// Where the controller is in the batch lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchPhase {
    Idle,
    /// Waiting for the operator to accept or decline
    Confirming,
    /// Item `index` (1-based) of `total` is in flight
    Running { index: usize, total: usize },
    /// Re-fetching dependent collections
    Refreshing,
}

/// Live counters for the progress overlay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchProgress {
    pub kind: BatchKind,
    pub total: usize,
    pub completed: usize,
    pub failed: usize,
    /// Key of the item whose request is in flight
    pub in_flight: Option<ItemKey>,
}

struct Pending {
    plan: BatchPlan,
    op: Box<dyn BatchOperation>,
    refresh: RefreshFn,
}

/// Drives `Idle -> Confirming -> Running -> Refreshing -> Idle`.
///
/// The batch itself runs on a worker thread; the UI thread calls
/// [`BatchController::poll`] once per frame.
pub struct BatchController {
    busy: BusyFlag,
    phase: BatchPhase,
    pending: Option<Pending>,
    receiver: Option<Receiver<BatchMessage>>,
    progress: Option<BatchProgress>,
}

impl BatchController {
    pub fn new(busy: BusyFlag) -> Self {
        Self {
            busy,
            phase: BatchPhase::Idle,
            pending: None,
            receiver: None,
            progress: None,
        }
    }

    pub fn phase(&self) -> BatchPhase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == BatchPhase::Idle
    }

    /// Plan waiting for confirmation
    pub fn pending_plan(&self) -> Option<&BatchPlan> {
        self.pending.as_ref().map(|p| &p.plan)
    }

    pub fn progress(&self) -> Option<&BatchProgress> {
        self.progress.as_ref()
    }

    pub fn in_flight(&self) -> Option<&ItemKey> {
        self.progress.as_ref().and_then(|p| p.in_flight.as_ref())
    }

    /// Ask for confirmation of a batch.
    ///
    /// Silently ignored (returns `false`) when another operation holds the
    /// busy flag, when a batch is already pending or running, or when the
    /// plan is empty.
    pub fn request<O, R>(&mut self, plan: BatchPlan, op: O, refresh: R) -> bool
    where
        O: BatchOperation + 'static,
        R: FnOnce() + Send + 'static,
    {
        if !self.is_idle() || self.busy.is_busy() || plan.is_empty() {
            debug!(kind = %plan.kind, "batch request ignored");
            return false;
        }
        self.pending = Some(Pending {
            plan,
            op: Box::new(op),
            refresh: Box::new(refresh),
        });
        self.phase = BatchPhase::Confirming;
        true
    }

    /// Operator declined: drop the plan without touching anything
    pub fn decline(&mut self) {
        if self.phase == BatchPhase::Confirming {
            self.pending = None;
            self.phase = BatchPhase::Idle;
        }
    }

    /// Operator accepted: start the batch on a worker thread
    pub fn confirm(&mut self) -> bool {
        if self.phase != BatchPhase::Confirming {
            return false;
        }
        let Some(Pending {
            plan,
            mut op,
            refresh,
        }) = self.pending.take()
        else {
            self.phase = BatchPhase::Idle;
            return false;
        };
        let Some(permit) = self.busy.try_acquire() else {
            debug!(kind = %plan.kind, "busy, batch dropped");
            self.phase = BatchPhase::Idle;
            return false;
        };

        let (tx, rx) = crossbeam_channel::unbounded();
        self.progress = Some(BatchProgress {
            kind: plan.kind,
            total: plan.len(),
            completed: 0,
            failed: 0,
            in_flight: None,
        });
        self.phase = BatchPhase::Running {
            index: 0,
            total: plan.len(),
        };
        self.receiver = Some(rx);

        std::thread::spawn(move || {
            let summary = run_batch(&plan, op.as_mut(), refresh, |msg| {
                let _ = tx.send(msg);
            });
            drop(permit);
            let _ = tx.send(BatchMessage::Completed(summary));
        });
        true
    }

    /// Drain worker messages. Returns the summary once, when the batch ends.
    pub fn poll(&mut self) -> Option<BatchSummary> {
        let rx = self.receiver.clone()?;
        loop {
            match rx.try_recv() {
                Ok(msg) => {
                    if let Some(summary) = self.apply(msg) {
                        return Some(summary);
                    }
                }
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Disconnected) => {
                    warn!("batch worker exited without a summary");
                    self.finish();
                    return None;
                }
            }
        }
    }

    fn apply(&mut self, msg: BatchMessage) -> Option<BatchSummary> {
        match msg {
            BatchMessage::ItemStarted { index, key } => {
                if let Some(progress) = &mut self.progress {
                    progress.in_flight = Some(key);
                    self.phase = BatchPhase::Running {
                        index: index + 1,
                        total: progress.total,
                    };
                }
                None
            }
            BatchMessage::ItemFinished(outcome) => {
                if let Some(progress) = &mut self.progress {
                    progress.completed += 1;
                    if !outcome.success {
                        progress.failed += 1;
                    }
                    progress.in_flight = None;
                }
                None
            }
            BatchMessage::Refreshing => {
                self.phase = BatchPhase::Refreshing;
                None
            }
            BatchMessage::Completed(summary) => {
                self.finish();
                Some(summary)
            }
        }
    }

    fn finish(&mut self) {
        self.receiver = None;
        self.progress = None;
        self.phase = BatchPhase::Idle;
    }
}
