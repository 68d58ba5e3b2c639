//! Fake collaborators for use case tests
//!
//! - [`ManualScheduler`]: virtual time, callbacks run only when advanced
//! - [`FakeWorlds`]: worlds and players in memory
//! - [`FakeSettings`]: mutable settings that count `persist` calls
//! - [`RecordingNotifier`]: records every notification

use crate::ports::clock::Clock;
use crate::ports::eligibility::EligibilitySource;
use crate::ports::notifier::OutcomeNotifier;
use crate::ports::partition_registry::{PartitionRegistry, PartitionSnapshot};
use crate::ports::scheduler::{ScheduledTask, Scheduler, TimerCell, TimerHandle, TimerState};
use crate::ports::settings::{SettingsError, VoteSettings};
use crate::use_cases::vote_coordinator::{VoteCoordinator, VoteCoordinatorDeps};
use sleepvote_domain::{
    Dimension, GameMode, ParticipantId, PartitionId, PassThreshold, TimeOfDay, VoteOutcome,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ==================== Scheduler ====================

struct PendingTask {
    due: u64,
    seq: u64,
    cell: TimerCell,
    task: ScheduledTask,
}

struct ManualInner {
    now: u64,
    next_seq: u64,
    queue: Vec<PendingTask>,
}

/// Scheduler and clock driven by [`ManualScheduler::advance`]
pub struct ManualScheduler {
    inner: Mutex<ManualInner>,
}

struct ManualHandle(TimerCell);

impl TimerHandle for ManualHandle {
    fn cancel(&self) {
        self.0.try_cancel();
    }

    fn state(&self) -> TimerState {
        self.0.state()
    }
}

impl ManualScheduler {
    pub const START_MILLIS: u64 = 1_700_000_000_000;

    pub fn new() -> Self {
        Self {
            inner: Mutex::new(ManualInner {
                now: Self::START_MILLIS,
                next_seq: 0,
                queue: Vec::new(),
            }),
        }
    }

    /// Move virtual time forward, running every callback that falls due
    ///
    /// Callbacks run in due order without the scheduler lock held, so they
    /// may schedule more work; anything due within the window runs too.
    pub fn advance(&self, by: Duration) {
        let target = self.inner.lock().unwrap().now + by.as_millis() as u64;
        loop {
            let next = {
                let mut inner = self.inner.lock().unwrap();
                let earliest = inner
                    .queue
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due <= target)
                    .min_by_key(|(_, t)| (t.due, t.seq))
                    .map(|(i, _)| i);
                earliest.map(|i| {
                    let task = inner.queue.remove(i);
                    inner.now = inner.now.max(task.due);
                    task
                })
            };
            let Some(pending) = next else { break };
            if pending.cell.try_fire() {
                (pending.task)();
            }
        }
        self.inner.lock().unwrap().now = target;
    }

    /// Run callbacks that are already due
    pub fn run_due(&self) {
        self.advance(Duration::ZERO);
    }

    /// Number of callbacks still waiting to fire
    pub fn pending(&self) -> usize {
        self.inner
            .lock()
            .unwrap()
            .queue
            .iter()
            .filter(|t| t.cell.state() == TimerState::Pending)
            .count()
    }
}

impl Scheduler for ManualScheduler {
    fn after(&self, delay: Duration, task: ScheduledTask) -> Box<dyn TimerHandle> {
        let cell = TimerCell::new();
        let mut inner = self.inner.lock().unwrap();
        let seq = inner.next_seq;
        inner.next_seq += 1;
        let due = inner.now + delay.as_millis() as u64;
        inner.queue.push(PendingTask {
            due,
            seq,
            cell: cell.clone(),
            task,
        });
        Box::new(ManualHandle(cell))
    }
}

impl Clock for ManualScheduler {
    fn now_millis(&self) -> u64 {
        self.inner.lock().unwrap().now
    }
}

// ==================== Worlds ====================

#[derive(Default)]
struct WorldsInner {
    worlds: BTreeMap<PartitionId, PartitionSnapshot>,
    players: BTreeMap<ParticipantId, (PartitionId, GameMode)>,
}

/// In-memory worlds for tests
#[derive(Default)]
pub struct FakeWorlds {
    inner: Mutex<WorldsInner>,
}

impl FakeWorlds {
    pub const NIGHT: TimeOfDay = TimeOfDay::new(13_000);

    /// Add an overworld at night
    pub fn add_world(&self, name: &str) {
        self.add_world_with(name, PartitionSnapshot::new(Dimension::Overworld, Self::NIGHT));
    }

    pub fn add_world_with(&self, name: &str, snapshot: PartitionSnapshot) {
        self.inner
            .lock()
            .unwrap()
            .worlds
            .insert(PartitionId::new(name), snapshot);
    }

    /// Add a player, or move an existing one
    pub fn add_player(&self, name: &str, world: &str, mode: GameMode) {
        self.inner
            .lock()
            .unwrap()
            .players
            .insert(ParticipantId::new(name), (PartitionId::new(world), mode));
    }

    pub fn remove_player(&self, name: &str) {
        self.inner
            .lock()
            .unwrap()
            .players
            .remove(&ParticipantId::new(name));
    }
}

impl EligibilitySource for FakeWorlds {
    fn eligible_participants(&self, partition: &PartitionId) -> Vec<ParticipantId> {
        self.inner
            .lock()
            .unwrap()
            .players
            .iter()
            .filter(|(_, (world, mode))| world == partition && mode.is_eligible())
            .map(|(player, _)| player.clone())
            .collect()
    }
}

impl PartitionRegistry for FakeWorlds {
    fn resolve(&self, partition: &PartitionId) -> Option<PartitionSnapshot> {
        self.inner.lock().unwrap().worlds.get(partition).copied()
    }

    fn occupants(&self, partition: &PartitionId) -> Vec<ParticipantId> {
        self.inner
            .lock()
            .unwrap()
            .players
            .iter()
            .filter(|(_, (world, _))| world == partition)
            .map(|(player, _)| player.clone())
            .collect()
    }

    fn partition_of(&self, participant: &ParticipantId) -> Option<PartitionId> {
        self.inner
            .lock()
            .unwrap()
            .players
            .get(participant)
            .map(|(world, _)| world.clone())
    }

    fn partitions(&self) -> Vec<PartitionId> {
        self.inner.lock().unwrap().worlds.keys().cloned().collect()
    }
}

// ==================== Settings ====================

/// Settings with the plugin defaults: 60s cooldown, 30s votes, 50% threshold
pub struct FakeSettings {
    cooldown: Mutex<Duration>,
    duration: Mutex<Duration>,
    threshold: Mutex<PassThreshold>,
    toggles: Mutex<HashMap<PartitionId, bool>>,
    persisted: AtomicUsize,
}

impl Default for FakeSettings {
    fn default() -> Self {
        Self {
            cooldown: Mutex::new(Duration::from_secs(60)),
            duration: Mutex::new(Duration::from_secs(30)),
            threshold: Mutex::new(PassThreshold::new(50)),
            toggles: Mutex::new(HashMap::new()),
            persisted: AtomicUsize::new(0),
        }
    }
}

impl FakeSettings {
    pub fn set_threshold(&self, percent: i64) {
        *self.threshold.lock().unwrap() = PassThreshold::new(percent);
    }

    pub fn set_cooldown(&self, cooldown: Duration) {
        *self.cooldown.lock().unwrap() = cooldown;
    }

    pub fn set_enabled(&self, partition: &str, enabled: bool) {
        self.toggles
            .lock()
            .unwrap()
            .insert(PartitionId::new(partition), enabled);
    }

    pub fn persist_count(&self) -> usize {
        self.persisted.load(Ordering::SeqCst)
    }
}

impl VoteSettings for FakeSettings {
    fn revote_cooldown(&self) -> Duration {
        *self.cooldown.lock().unwrap()
    }

    fn vote_duration(&self) -> Duration {
        *self.duration.lock().unwrap()
    }

    fn pass_threshold(&self) -> PassThreshold {
        *self.threshold.lock().unwrap()
    }

    fn is_partition_enabled(&self, partition: &PartitionId) -> bool {
        self.toggles
            .lock()
            .unwrap()
            .get(partition)
            .copied()
            .unwrap_or(true)
    }

    fn toggle_partition(&self, partition: &PartitionId) -> bool {
        let mut toggles = self.toggles.lock().unwrap();
        let enabled = !toggles.get(partition).copied().unwrap_or(true);
        toggles.insert(partition.clone(), enabled);
        enabled
    }

    fn set_all_partitions(&self, enabled: bool, partitions: &[PartitionId]) {
        let mut toggles = self.toggles.lock().unwrap();
        for partition in partitions {
            toggles.insert(partition.clone(), enabled);
        }
        for value in toggles.values_mut() {
            *value = enabled;
        }
    }

    fn persist(&self) -> Result<(), SettingsError> {
        self.persisted.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ==================== Notifier ====================

#[derive(Debug, Clone, PartialEq)]
pub enum NotifierEvent {
    Prompt(ParticipantId, PartitionId),
    Result(ParticipantId, VoteOutcome, PartitionId),
    Applied(PartitionId),
}

#[derive(Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<NotifierEvent>>,
}

impl RecordingNotifier {
    pub fn events(&self) -> Vec<NotifierEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn prompts(&self) -> Vec<ParticipantId> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                NotifierEvent::Prompt(participant, _) => Some(participant),
                _ => None,
            })
            .collect()
    }

    pub fn results(&self) -> Vec<VoteOutcome> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                NotifierEvent::Result(_, outcome, _) => Some(outcome),
                _ => None,
            })
            .collect()
    }
}

impl OutcomeNotifier for RecordingNotifier {
    fn prompt_vote(&self, participant: &ParticipantId, partition: &PartitionId) {
        self.events
            .lock()
            .unwrap()
            .push(NotifierEvent::Prompt(participant.clone(), partition.clone()));
    }

    fn announce_result(
        &self,
        participant: &ParticipantId,
        outcome: &VoteOutcome,
        partition: &PartitionId,
    ) {
        self.events.lock().unwrap().push(NotifierEvent::Result(
            participant.clone(),
            *outcome,
            partition.clone(),
        ));
    }

    fn apply_outcome(&self, partition: &PartitionId) {
        self.events
            .lock()
            .unwrap()
            .push(NotifierEvent::Applied(partition.clone()));
    }
}

// ==================== Harness ====================

/// A coordinator wired to fakes, with one empty night-time world "world"
pub struct Harness {
    pub coordinator: Arc<VoteCoordinator>,
    pub scheduler: Arc<ManualScheduler>,
    pub worlds: Arc<FakeWorlds>,
    pub settings: Arc<FakeSettings>,
    pub notifier: Arc<RecordingNotifier>,
}

impl Harness {
    pub fn new() -> Self {
        let scheduler = Arc::new(ManualScheduler::new());
        let worlds = Arc::new(FakeWorlds::default());
        let settings = Arc::new(FakeSettings::default());
        let notifier = Arc::new(RecordingNotifier::default());
        worlds.add_world("world");

        let coordinator = VoteCoordinator::with_clock(
            VoteCoordinatorDeps {
                eligibility: worlds.clone(),
                registry: worlds.clone(),
                scheduler: scheduler.clone(),
                settings: settings.clone(),
                notifier: notifier.clone(),
            },
            scheduler.clone(),
        );

        Self {
            coordinator,
            scheduler,
            worlds,
            settings,
            notifier,
        }
    }

    /// Harness with survival players in "world"
    pub fn with_survivors(names: &[&str]) -> Self {
        let harness = Self::new();
        for name in names {
            harness.worlds.add_player(name, "world", GameMode::Survival);
        }
        harness
    }
}
