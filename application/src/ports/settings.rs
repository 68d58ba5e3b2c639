//! Vote settings port
//!
//! Persisted configuration consumed by the coordinator and the host layer.

use sleepvote_domain::{PartitionId, PassThreshold};
use std::time::Duration;
use thiserror::Error;

/// Errors raised while persisting settings
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to write settings to {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize settings: {0}")]
    Serialize(String),
}

/// Vote configuration
///
/// The threshold is already clamped to `0..=100` by the time it reaches the
/// coordinator. Toggle methods use interior mutability so one shared
/// instance can be flipped by admin commands while votes are running.
pub trait VoteSettings: Send + Sync {
    /// Minimum time between the end of one vote and the start of the next
    fn revote_cooldown(&self) -> Duration;

    /// How long a vote stays open
    fn vote_duration(&self) -> Duration;

    fn pass_threshold(&self) -> PassThreshold;

    /// Whether voting is enabled in a partition (unlisted partitions are enabled)
    fn is_partition_enabled(&self, partition: &PartitionId) -> bool;

    /// Flip a partition's flag, returning the new value
    fn toggle_partition(&self, partition: &PartitionId) -> bool;

    /// Set the flag of every listed partition, and every previously known one
    fn set_all_partitions(&self, enabled: bool, partitions: &[PartitionId]);

    /// Write the current settings back to their backing store
    fn persist(&self) -> Result<(), SettingsError>;
}
