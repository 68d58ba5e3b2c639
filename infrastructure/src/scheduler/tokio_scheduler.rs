//! Tokio-backed implementation of the `Scheduler` port
//!
//! Each callback gets its own task that races `tokio::time::sleep` against a
//! [`CancellationToken`]. The shared [`TimerCell`] decides the winner, so a
//! cancel that lands while the sleep completes either stops the callback or
//! reports that it already fired, never both.

use sleepvote_application::{ScheduledTask, Scheduler, TimerCell, TimerHandle, TimerState};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Scheduler that spawns onto a Tokio runtime
///
/// Holds a runtime [`Handle`], so `after` may be called from any thread,
/// including plain threads outside the runtime.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    runtime: Handle,
}

impl TokioScheduler {
    pub fn new(runtime: Handle) -> Self {
        Self { runtime }
    }

    /// Scheduler on the runtime of the calling task
    ///
    /// Returns `None` outside a Tokio runtime.
    pub fn current() -> Option<Self> {
        Handle::try_current().ok().map(Self::new)
    }
}

struct TokioTimerHandle {
    cell: TimerCell,
    token: CancellationToken,
}

impl TimerHandle for TokioTimerHandle {
    fn cancel(&self) {
        if self.cell.try_cancel() {
            self.token.cancel();
        }
    }

    fn state(&self) -> TimerState {
        self.cell.state()
    }
}

impl Scheduler for TokioScheduler {
    fn after(&self, delay: Duration, task: ScheduledTask) -> Box<dyn TimerHandle> {
        let cell = TimerCell::new();
        let token = CancellationToken::new();

        let task_cell = cell.clone();
        let task_token = token.clone();
        self.runtime.spawn(async move {
            tokio::select! {
                biased;
                _ = task_token.cancelled() => {
                    trace!("Timer cancelled");
                }
                _ = tokio::time::sleep(delay) => {
                    if task_cell.try_fire() {
                        task();
                    }
                }
            }
        });

        Box::new(TokioTimerHandle { cell, token })
    }
}
