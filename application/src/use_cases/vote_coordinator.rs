//! Vote coordinator
//!
//! Orchestrates sleep votes: at most one session per world, ballots, early
//! completion, the timeout, the pass/fail decision and the one-shot
//! "skip the night" flag.
//!
//! # Concurrency
//!
//! Every method is synchronous and safe to call from any thread. State
//! lives in three maps, each behind its own mutex:
//!
//! | Map | Key | Value |
//! |-----|-----|-------|
//! | `sessions` | world | running session + its timeout handle |
//! | `cooldowns` | world | when the last vote ended (ms) |
//! | `outcomes` | world | one-shot enabled flag + last yes-percentage |
//!
//! Locks are always taken in the order `sessions` -> `cooldowns`, and no lock
//! is held while calling a collaborator. The cooldown is written in the same
//! critical section that removes the session, so nobody can observe "no
//! session" and "no cooldown" while a vote is being tallied.

use crate::ports::clock::{Clock, SystemClock};
use crate::ports::eligibility::EligibilitySource;
use crate::ports::notifier::OutcomeNotifier;
use crate::ports::partition_registry::PartitionRegistry;
use crate::ports::scheduler::{ScheduledTask, Scheduler, TimerHandle};
use crate::ports::settings::VoteSettings;
use sleepvote_domain::{ParticipantId, PartitionId, SessionId, VoteOutcome, VoteSession};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tracing::{debug, info};

/// Delay between consuming the enabled flag and skipping the night
///
/// Gives the player time to actually get into bed (20 ticks on the host).
pub const OUTCOME_APPLY_DELAY: Duration = Duration::from_secs(1);

/// Collaborators injected into the coordinator
pub struct VoteCoordinatorDeps {
    pub eligibility: Arc<dyn EligibilitySource>,
    pub registry: Arc<dyn PartitionRegistry>,
    pub scheduler: Arc<dyn Scheduler>,
    pub settings: Arc<dyn VoteSettings>,
    pub notifier: Arc<dyn OutcomeNotifier>,
}

/// Snapshot of one running vote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteStatus {
    pub partition: PartitionId,
    pub session: SessionId,
    pub roster_size: usize,
    pub ballots_cast: usize,
    pub yes_votes: usize,
}

/// A session together with the timer that ends it
struct ActiveSession {
    session: VoteSession,
    timeout: Option<Box<dyn TimerHandle>>,
}

impl ActiveSession {
    fn cancel_timeout(&self) {
        if let Some(timeout) = &self.timeout {
            timeout.cancel();
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct OutcomeRecord {
    enabled: bool,
    last_yes_percentage: f64,
}

/// The vote engine
///
/// Construct once per process with [`VoteCoordinator::new`] and share the
/// returned `Arc`. Timer callbacks hold only a weak reference, so dropping
/// the last `Arc` turns every pending callback into a no-op.
pub struct VoteCoordinator {
    me: Weak<VoteCoordinator>,
    eligibility: Arc<dyn EligibilitySource>,
    registry: Arc<dyn PartitionRegistry>,
    scheduler: Arc<dyn Scheduler>,
    settings: Arc<dyn VoteSettings>,
    notifier: Arc<dyn OutcomeNotifier>,
    clock: Arc<dyn Clock>,
    next_session: AtomicU64,
    sessions: Mutex<HashMap<PartitionId, ActiveSession>>,
    cooldowns: Mutex<HashMap<PartitionId, u64>>,
    outcomes: Mutex<HashMap<PartitionId, OutcomeRecord>>,
}

impl VoteCoordinator {
    /// Create a coordinator using the system clock
    pub fn new(deps: VoteCoordinatorDeps) -> Arc<Self> {
        Self::with_clock(deps, Arc::new(SystemClock))
    }

    /// Create a coordinator with an explicit clock
    pub fn with_clock(deps: VoteCoordinatorDeps, clock: Arc<dyn Clock>) -> Arc<Self> {
        Arc::new_cyclic(|me| Self {
            me: me.clone(),
            eligibility: deps.eligibility,
            registry: deps.registry,
            scheduler: deps.scheduler,
            settings: deps.settings,
            notifier: deps.notifier,
            clock,
            next_session: AtomicU64::new(1),
            sessions: Mutex::new(HashMap::new()),
            cooldowns: Mutex::new(HashMap::new()),
            outcomes: Mutex::new(HashMap::new()),
        })
    }

    // ==================== Queries ====================

    pub fn has_active_vote(&self, partition: &PartitionId) -> bool {
        lock(&self.sessions).contains_key(partition)
    }

    /// Whether the last vote passed and its outcome has not been applied yet
    pub fn is_sleep_enabled(&self, partition: &PartitionId) -> bool {
        lock(&self.outcomes)
            .get(partition)
            .is_some_and(|record| record.enabled)
    }

    /// Yes-percentage of the last finished vote, `0.0` if there was none
    pub fn last_vote_yes_percentage(&self, partition: &PartitionId) -> f64 {
        lock(&self.outcomes)
            .get(partition)
            .map(|record| record.last_yes_percentage)
            .unwrap_or(0.0)
    }

    /// When the last vote in `partition` ended (ms since the epoch)
    pub fn last_vote_ended_at(&self, partition: &PartitionId) -> Option<u64> {
        lock(&self.cooldowns).get(partition).copied()
    }

    /// False while a vote runs or the revote cooldown has not elapsed
    pub fn can_start_vote(&self, partition: &PartitionId) -> bool {
        if self.has_active_vote(partition) {
            return false;
        }
        self.cooldown_elapsed(partition)
    }

    /// Players who would be on the roster if a vote started now
    pub fn eligible_participants(&self, partition: &PartitionId) -> Vec<ParticipantId> {
        self.eligibility.eligible_participants(partition)
    }

    /// Status of every running vote, sorted by world
    pub fn active_votes(&self) -> Vec<VoteStatus> {
        let mut statuses: Vec<VoteStatus> = lock(&self.sessions)
            .iter()
            .map(|(partition, active)| VoteStatus {
                partition: partition.clone(),
                session: active.session.id(),
                roster_size: active.session.roster().len(),
                ballots_cast: active.session.ballots_cast(),
                yes_votes: active.session.tally().yes_votes,
            })
            .collect();
        statuses.sort_by(|a, b| a.partition.cmp(&b.partition));
        statuses
    }

    // ==================== Vote lifecycle ====================

    /// Start a vote in `partition`
    ///
    /// Returns false without side effects when a vote is already running,
    /// the cooldown has not elapsed, the world is not loaded or nobody is
    /// eligible. On success exactly one session and one timeout exist, and
    /// every player in the world has been prompted.
    pub fn start_vote(&self, partition: &PartitionId) -> bool {
        if !self.can_start_vote(partition) {
            debug!(%partition, "Vote not started: active vote or cooldown");
            return false;
        }

        if self.registry.resolve(partition).is_none() {
            debug!(%partition, "Vote not started: world not loaded");
            return false;
        }

        let roster = self.eligibility.eligible_participants(partition);
        if roster.is_empty() {
            debug!(%partition, "Vote not started: no eligible players");
            return false;
        }

        let id = SessionId::new(self.next_session.fetch_add(1, Ordering::Relaxed));
        let roster_size = roster.len();
        let now = self.clock.now_millis();
        let cooldown = self.cooldown_millis();
        {
            let mut sessions = lock(&self.sessions);
            // A concurrent vote may have started and ended since the check above
            if !cooldown_open(&lock(&self.cooldowns), partition, now, cooldown) {
                return false;
            }
            match sessions.entry(partition.clone()) {
                Entry::Occupied(_) => {
                    debug!(%partition, "Vote not started: lost race to another start");
                    return false;
                }
                Entry::Vacant(slot) => {
                    slot.insert(ActiveSession {
                        session: VoteSession::new(id, partition.clone(), roster),
                        timeout: None,
                    });
                }
            }
        }

        let duration = self.settings.vote_duration();
        let timeout = self
            .scheduler
            .after(duration, self.end_session_task(partition.clone(), id));
        self.attach_timeout(partition, id, timeout);

        info!(
            %partition,
            session = %id,
            roster = roster_size,
            duration_secs = duration.as_secs(),
            "Vote started"
        );

        for occupant in self.registry.occupants(partition) {
            self.notifier.prompt_vote(&occupant, partition);
        }

        true
    }

    /// Cast or overwrite a ballot in the participant's current world
    ///
    /// Returns false only when no vote is running there. Ballots from
    /// players outside the roster are accepted and counted, but only roster
    /// members can complete the vote early.
    pub fn vote(&self, participant: &ParticipantId, yes: bool) -> bool {
        let Some(partition) = self.registry.partition_of(participant) else {
            debug!(%participant, "Ballot rejected: player is in no world");
            return false;
        };

        let completed = {
            let mut sessions = lock(&self.sessions);
            let Some(active) = sessions.get_mut(&partition) else {
                debug!(%participant, %partition, "Ballot rejected: no active vote");
                return false;
            };

            active.session.cast(participant.clone(), yes);
            debug!(
                %participant,
                %partition,
                yes,
                on_roster = active.session.is_on_roster(participant),
                "Ballot recorded"
            );

            if active.session.all_voted() {
                Some((active.session.id(), active.timeout.take()))
            } else {
                None
            }
        };

        if let Some((id, timeout)) = completed {
            if let Some(timeout) = timeout {
                timeout.cancel();
            }
            debug!(%partition, session = %id, "All eligible players voted, ending early");
            self.scheduler
                .soon(self.end_session_task(partition.clone(), id));
        }

        true
    }

    /// End the vote in `partition`, whatever session is running
    ///
    /// Returns `None` if no vote was running. Safe to call concurrently with
    /// the timeout: only the first caller sees the session.
    pub fn end_vote(&self, partition: &PartitionId) -> Option<VoteOutcome> {
        self.end_session(partition, None)
    }

    /// Drop the running vote without deciding it
    ///
    /// Cooldown and outcome records are left alone. Returns whether a vote
    /// was running.
    pub fn clear_vote(&self, partition: &PartitionId) -> bool {
        let removed = lock(&self.sessions).remove(partition);
        match removed {
            Some(active) => {
                active.cancel_timeout();
                info!(%partition, session = %active.session.id(), "Vote cleared");
                true
            }
            None => false,
        }
    }

    /// Drop every running vote and every pending night skip
    ///
    /// Cooldowns and last yes-percentages survive, so disabling and
    /// re-enabling voting does not open a new vote window early.
    pub fn clear_all(&self) {
        let drained: Vec<(PartitionId, ActiveSession)> = lock(&self.sessions).drain().collect();
        for (partition, active) in &drained {
            active.cancel_timeout();
            debug!(%partition, session = %active.session.id(), "Vote cleared");
        }
        for record in lock(&self.outcomes).values_mut() {
            record.enabled = false;
        }
        info!(cleared = drained.len(), "All votes cleared");
    }

    /// Consume the enabled flag of the participant's world
    ///
    /// If the last vote there passed and has not been applied yet, reset the
    /// flag and schedule the night skip after [`OUTCOME_APPLY_DELAY`].
    /// Returns whether the skip was scheduled.
    pub fn handle_outcome_apply(&self, participant: &ParticipantId) -> bool {
        let Some(partition) = self.registry.partition_of(participant) else {
            return false;
        };

        let consumed = match lock(&self.outcomes).get_mut(&partition) {
            Some(record) if record.enabled => {
                record.enabled = false;
                true
            }
            _ => false,
        };

        if !consumed {
            return false;
        }

        info!(%partition, %participant, "Skipping the night");
        let notifier = Arc::clone(&self.notifier);
        // Nothing cancels the skip once scheduled, so the handle is not kept
        let _ = self.scheduler.after(
            OUTCOME_APPLY_DELAY,
            Box::new(move || notifier.apply_outcome(&partition)),
        );
        true
    }

    // ==================== Internals ====================

    fn cooldown_elapsed(&self, partition: &PartitionId) -> bool {
        let now = self.clock.now_millis();
        let cooldown = self.cooldown_millis();
        cooldown_open(&lock(&self.cooldowns), partition, now, cooldown)
    }

    fn cooldown_millis(&self) -> u64 {
        self.settings.revote_cooldown().as_millis() as u64
    }

    /// Store the timeout on the session it was armed for
    ///
    /// If that session is already gone the timer is cancelled instead.
    fn attach_timeout(
        &self,
        partition: &PartitionId,
        id: SessionId,
        timeout: Box<dyn TimerHandle>,
    ) {
        let stale = {
            let mut sessions = lock(&self.sessions);
            match sessions.get_mut(partition) {
                Some(active) if active.session.id() == id => {
                    active.timeout = Some(timeout);
                    None
                }
                _ => Some(timeout),
            }
        };
        if let Some(timeout) = stale {
            timeout.cancel();
        }
    }

    fn end_session_task(&self, partition: PartitionId, id: SessionId) -> ScheduledTask {
        let me = self.me.clone();
        Box::new(move || {
            if let Some(coordinator) = me.upgrade() {
                coordinator.end_session(&partition, Some(id));
            }
        })
    }

    /// Remove and decide a session
    ///
    /// With `expected` set, only that session is ended; a newer session of
    /// the same world is left running.
    fn end_session(
        &self,
        partition: &PartitionId,
        expected: Option<SessionId>,
    ) -> Option<VoteOutcome> {
        let ended_at = self.clock.now_millis();
        let active = {
            let mut sessions = lock(&self.sessions);
            let matches = sessions
                .get(partition)
                .is_some_and(|active| expected.is_none_or(|id| active.session.id() == id));
            if !matches {
                return None;
            }
            let active = sessions.remove(partition)?;
            lock(&self.cooldowns).insert(partition.clone(), ended_at);
            active
        };

        let outcome = active.session.tally().decide(self.settings.pass_threshold());
        lock(&self.outcomes).insert(
            partition.clone(),
            OutcomeRecord {
                enabled: outcome.passed,
                last_yes_percentage: outcome.yes_percentage,
            },
        );

        info!(
            %partition,
            session = %active.session.id(),
            passed = outcome.passed,
            yes = outcome.tally.yes_votes,
            total = outcome.tally.total_votes(),
            ballots = %outcome.tally.summary(),
            "Vote ended: {}",
            outcome
        );

        for occupant in self.registry.occupants(partition) {
            self.notifier.announce_result(&occupant, &outcome, partition);
        }

        active.cancel_timeout();
        Some(outcome)
    }
}

/// Whether more than `cooldown` ms passed since the world's last vote ended
fn cooldown_open(
    cooldowns: &HashMap<PartitionId, u64>,
    partition: &PartitionId,
    now: u64,
    cooldown: u64,
) -> bool {
    cooldowns
        .get(partition)
        .is_none_or(|last| now.saturating_sub(*last) > cooldown)
}

/// Lock a map, recovering the data if a panicking thread poisoned it
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
