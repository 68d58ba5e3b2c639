//! Domain layer for sleepvote
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Sleep Vote
//!
//! Players in a world vote on whether to skip the night:
//!
//! - **Session**: the running vote, with a roster frozen at start
//! - **Threshold**: yes-percentage needed to pass (0 = any participation)
//! - **Outcome**: pass/fail plus the yes-percentage, announced at the end
//!
//! ## World
//!
//! Dimension, game mode and time of day describe when a vote makes sense
//! and who may take part.

pub mod command;
pub mod core;
pub mod vote;
pub mod world;

// Re-export commonly used types
pub use command::SleepCommand;
pub use core::{
    error::DomainError,
    id::{ParticipantId, PartitionId},
};
pub use vote::{PassThreshold, SessionId, VoteOutcome, VoteSession, VoteTally, yes_percentage};
pub use world::{Dimension, GameMode, TimeOfDay};
