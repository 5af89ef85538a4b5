use std::{
    sync::{Mutex, PoisonError},
    time::Duration,
};

use log::{info, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompletionState {
    pub completed: usize,
    /// `None` until jobs are dispatched.
    pub total: Option<usize>,
}

impl CompletionState {
    pub fn is_complete(&self) -> bool {
        matches!(self.total, Some(total) if self.completed >= total)
    }
}

/// `(completed, total)` job counters behind their own lock.
#[derive(Debug, Default)]
pub struct Completion {
    state: Mutex<CompletionState>,
}

impl Completion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixes the number of jobs for this pass. Only the first call counts.
    pub fn fix_total(&self, total: usize) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let current = state.total;
        match current {
            Some(fixed) => warn!("Job total already fixed at {}, ignoring {}", fixed, total),
            None => state.total = Some(total),
        }
    }

    /// Counts one received result. Results beyond the total, or arriving
    /// before dispatch, are not counted.
    pub fn record(&self) -> CompletionState {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let (completed, total) = (state.completed, state.total);
        match total {
            Some(total) if completed < total => state.completed = completed + 1,
            total => warn!(
                "Unexpected result ({} completed, total {:?}), not counted",
                completed, total
            ),
        }
        *state
    }

    pub fn snapshot(&self) -> CompletionState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Polls every `interval` until all jobs are done. There is no timeout:
    /// a job whose worker vanished keeps this pending forever.
    pub async fn wait(&self, interval: Duration) {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            if self.snapshot().is_complete() {
                info!("All jobs completed");
                return;
            }
        }
    }
}
