//! Vote session state
//!
//! A [`VoteSession`] is the live state of one in-progress vote in one
//! partition: the roster frozen at start and the ballots cast so far.

use super::outcome::VoteTally;
use crate::core::id::{ParticipantId, PartitionId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Process-unique number of a session
///
/// Timers carry the id of the session they were armed for, so a callback
/// that fires late never ends a newer session of the same partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(u64);

impl SessionId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One in-progress vote
///
/// The roster is frozen at creation: players who join later cannot make the
/// vote complete early, and players who leave still count as outstanding.
/// Ballots are accepted from anyone, roster or not, and re-voting
/// overwrites. Every ballot counts toward the tally.
///
/// # Example
///
/// ```
/// use sleepvote_domain::vote::{SessionId, VoteSession};
///
/// let mut session = VoteSession::new(SessionId::new(1), "world", ["alex", "steve"]);
/// session.cast("alex", true);
/// assert!(!session.all_voted());
/// session.cast("steve", false);
/// assert!(session.all_voted());
/// assert_eq!(session.tally().yes_votes, 1);
/// ```
#[derive(Debug, Clone)]
pub struct VoteSession {
    id: SessionId,
    partition: PartitionId,
    roster: HashSet<ParticipantId>,
    ballots: HashMap<ParticipantId, bool>,
}

impl VoteSession {
    pub fn new<P: Into<ParticipantId>>(
        id: SessionId,
        partition: impl Into<PartitionId>,
        roster: impl IntoIterator<Item = P>,
    ) -> Self {
        Self {
            id,
            partition: partition.into(),
            roster: roster.into_iter().map(Into::into).collect(),
            ballots: HashMap::new(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn partition(&self) -> &PartitionId {
        &self.partition
    }

    pub fn roster(&self) -> &HashSet<ParticipantId> {
        &self.roster
    }

    pub fn is_on_roster(&self, participant: &ParticipantId) -> bool {
        self.roster.contains(participant)
    }

    /// Record a ballot, overwriting any earlier one from the same participant
    ///
    /// Returns the previous choice if this was a re-vote.
    pub fn cast(&mut self, participant: impl Into<ParticipantId>, yes: bool) -> Option<bool> {
        self.ballots.insert(participant.into(), yes)
    }

    /// Whether every roster member has cast a ballot
    ///
    /// Always false for an empty roster. Ballots from outside the roster
    /// never help complete the vote.
    pub fn all_voted(&self) -> bool {
        !self.roster.is_empty() && self.roster.iter().all(|p| self.ballots.contains_key(p))
    }

    /// Roster members who have not voted yet
    pub fn outstanding(&self) -> impl Iterator<Item = &ParticipantId> {
        self.roster.iter().filter(|p| !self.ballots.contains_key(*p))
    }

    pub fn ballots_cast(&self) -> usize {
        self.ballots.len()
    }

    /// Count every ballot, including those from outside the roster
    pub fn tally(&self) -> VoteTally {
        VoteTally::from_choices(self.ballots.values().copied())
    }
}
