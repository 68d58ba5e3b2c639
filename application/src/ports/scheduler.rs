//! Scheduler port
//!
//! One-shot delayed callbacks with cancellable handles. The coordinator uses
//! it for the vote timeout, for ending a vote early outside the ballot
//! handler, and for the delayed night skip.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Callback run by the scheduler
pub type ScheduledTask = Box<dyn FnOnce() + Send + 'static>;

/// Lifecycle of a scheduled callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    /// Waiting for its delay to elapse
    Pending,
    /// The callback has been started
    Fired,
    /// Cancelled before it fired
    Cancelled,
}

/// Handle to a pending callback
///
/// Cancelling a handle that already fired or was already cancelled is a
/// no-op.
pub trait TimerHandle: Send + Sync {
    fn cancel(&self);

    fn state(&self) -> TimerState;

    fn is_pending(&self) -> bool {
        self.state() == TimerState::Pending
    }
}

/// Runs callbacks once after a delay
///
/// Implementations must never run the callback inline from `after`, even
/// for a zero delay: callers may hold state that the callback touches.
pub trait Scheduler: Send + Sync {
    fn after(&self, delay: Duration, task: ScheduledTask) -> Box<dyn TimerHandle>;

    /// Run `task` on the scheduler's normal execution context as soon as possible
    fn soon(&self, task: ScheduledTask) -> Box<dyn TimerHandle> {
        self.after(Duration::ZERO, task)
    }
}

/// Shared `Pending | Fired | Cancelled` cell for scheduler implementations
///
/// The transition out of `Pending` happens exactly once under the mutex, so
/// a racing fire and cancel agree on who won.
#[derive(Debug, Clone)]
pub struct TimerCell {
    state: Arc<Mutex<TimerState>>,
}

impl TimerCell {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(TimerState::Pending)),
        }
    }

    pub fn state(&self) -> TimerState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Move `Pending -> Fired`; returns false if the timer was cancelled
    pub fn try_fire(&self) -> bool {
        self.transition(TimerState::Fired)
    }

    /// Move `Pending -> Cancelled`; returns false if it already fired or was cancelled
    pub fn try_cancel(&self) -> bool {
        self.transition(TimerState::Cancelled)
    }

    fn transition(&self, to: TimerState) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if *state == TimerState::Pending {
            *state = to;
            true
        } else {
            false
        }
    }
}

impl Default for TimerCell {
    fn default() -> Self {
        Self::new()
    }
}
