//! Infrastructure layer for sleepvote
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: configuration file loading, the Tokio
//! scheduler and the in-memory simulated server.

pub mod config;
pub mod scheduler;
pub mod worlds;

// Re-export commonly used types
pub use config::{ConfigLoader, ConfigValidationError, FileConfig, FileVoteSettings};
pub use scheduler::TokioScheduler;
pub use worlds::{InMemoryWorlds, PlayerState, WorldState, WorldsError};
