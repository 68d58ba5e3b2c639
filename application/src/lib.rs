//! Application layer for sleepvote
//!
//! This crate contains the vote coordinator, host use cases and port definitions.
//! It depends only on the domain layer.

pub mod ports;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use ports::{
    clock::{Clock, SystemClock},
    eligibility::EligibilitySource,
    notifier::OutcomeNotifier,
    partition_registry::{PartitionRegistry, PartitionSnapshot},
    scheduler::{ScheduledTask, Scheduler, TimerCell, TimerHandle, TimerState},
    settings::{SettingsError, VoteSettings},
};
pub use use_cases::handle_command::{CommandReply, HandleCommandError, HandleCommandUseCase};
pub use use_cases::sleep_events::{BedEnterAction, SleepEventHandler};
pub use use_cases::vote_coordinator::{
    OUTCOME_APPLY_DELAY, VoteCoordinator, VoteCoordinatorDeps, VoteStatus,
};
