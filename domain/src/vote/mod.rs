//! Sleep vote domain
//!
//! Core concepts of a timed group decision inside one world.
//!
//! # Lifecycle
//!
//! ```text
//!            start             all voted / timeout
//!   IDLE ───────────▶ VOTING ──────────────────────▶ IDLE
//!                                     │ passed
//!                                     ▼
//!                                  ENABLED ──(outcome applied)──▶ IDLE
//! ```
//!
//! - [`VoteSession`]: frozen roster plus ballots of the running vote
//! - [`VoteTally`]: counted ballots
//! - [`PassThreshold`]: yes-percentage needed to pass
//! - [`VoteOutcome`]: the decision announced when a vote ends

pub mod outcome;
pub mod session;
pub mod threshold;

pub use outcome::{VoteOutcome, VoteTally};
pub use session::{SessionId, VoteSession};
pub use threshold::{PassThreshold, yes_percentage};
