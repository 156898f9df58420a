use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Process-wide "an operation is running" flag.
///
/// Cloning shares the flag. Only one [`BusyPermit`] can exist at a time.
#[derive(Debug, Clone, Default)]
pub struct BusyFlag {
    busy: Arc<AtomicBool>,
}

impl BusyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the flag, or `None` when something else holds it
    pub fn try_acquire(&self) -> Option<BusyPermit> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyPermit {
                busy: Arc::clone(&self.busy),
            })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Releases the flag on drop
#[derive(Debug)]
pub struct BusyPermit {
    busy: Arc<AtomicBool>,
}

impl Drop for BusyPermit {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
