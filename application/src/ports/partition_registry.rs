//! Partition registry port
//!
//! Resolves worlds and the players currently in them.

use sleepvote_domain::{Dimension, ParticipantId, PartitionId, TimeOfDay};

/// Read-only view of a live partition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionSnapshot {
    pub dimension: Dimension,
    pub time: TimeOfDay,
}

impl PartitionSnapshot {
    pub fn new(dimension: Dimension, time: TimeOfDay) -> Self {
        Self { dimension, time }
    }

    /// Whether a player entering a bed here may trigger a vote
    pub fn is_sleepable_night(&self) -> bool {
        self.dimension.has_day_cycle() && self.time.is_night()
    }
}

/// Registry of live partitions and their occupants
pub trait PartitionRegistry: Send + Sync {
    /// Resolve a partition, `None` if it is not loaded
    fn resolve(&self, partition: &PartitionId) -> Option<PartitionSnapshot>;

    /// Every participant currently in the partition, eligible or not
    fn occupants(&self, partition: &PartitionId) -> Vec<ParticipantId>;

    /// The partition a participant is currently in
    fn partition_of(&self, participant: &ParticipantId) -> Option<PartitionId>;

    /// All live partitions
    fn partitions(&self) -> Vec<PartitionId>;
}
