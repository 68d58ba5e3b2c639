//! Outcome notification port
//!
//! Defines how the coordinator talks to players. Rendering (language,
//! colours, clickable buttons) is entirely up to the implementation.

use sleepvote_domain::{ParticipantId, PartitionId, VoteOutcome};

/// Callback for vote events
///
/// Implementations live in the presentation layer. Every method is called
/// without any coordinator lock held.
pub trait OutcomeNotifier: Send + Sync {
    /// Ask a participant to vote in the running vote
    fn prompt_vote(&self, participant: &ParticipantId, partition: &PartitionId);

    /// Tell a participant how a vote ended
    fn announce_result(
        &self,
        participant: &ParticipantId,
        outcome: &VoteOutcome,
        partition: &PartitionId,
    );

    /// Skip the night in the partition and tell everyone there
    fn apply_outcome(&self, partition: &PartitionId);
}
