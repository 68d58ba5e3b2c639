//! Eligibility port
//!
//! Answers "who may vote in this world right now".

use sleepvote_domain::{ParticipantId, PartitionId};

/// Source of the players eligible to vote in a partition
///
/// Implementations return players present in the partition and in a
/// qualifying game mode. Pure query, no side effects.
pub trait EligibilitySource: Send + Sync {
    fn eligible_participants(&self, partition: &PartitionId) -> Vec<ParticipantId>;
}
