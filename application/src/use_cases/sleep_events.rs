//! Sleep event handling
//!
//! Turns host events (a player entering a bed, a player joining) into
//! coordinator calls.

use crate::ports::notifier::OutcomeNotifier;
use crate::ports::partition_registry::PartitionRegistry;
use crate::ports::settings::VoteSettings;
use crate::use_cases::vote_coordinator::VoteCoordinator;
use sleepvote_domain::ParticipantId;
use std::sync::Arc;
use tracing::debug;

/// What a bed-enter event led to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BedEnterAction {
    /// Not night, not the overworld, voting disabled, or nothing to do
    Ignored,
    VoteStarted,
    /// A vote was wanted but the coordinator refused (usually the cooldown)
    VoteRejected,
    /// A passed vote was consumed and the night skip scheduled
    OutcomeApplied,
}

/// Host listener for sleep-related events
pub struct SleepEventHandler {
    coordinator: Arc<VoteCoordinator>,
    registry: Arc<dyn PartitionRegistry>,
    settings: Arc<dyn VoteSettings>,
    notifier: Arc<dyn OutcomeNotifier>,
}

impl SleepEventHandler {
    pub fn new(
        coordinator: Arc<VoteCoordinator>,
        registry: Arc<dyn PartitionRegistry>,
        settings: Arc<dyn VoteSettings>,
        notifier: Arc<dyn OutcomeNotifier>,
    ) -> Self {
        Self {
            coordinator,
            registry,
            settings,
            notifier,
        }
    }

    /// A player got into a bed
    pub fn on_bed_enter(&self, participant: &ParticipantId) -> BedEnterAction {
        let Some(partition) = self.registry.partition_of(participant) else {
            return BedEnterAction::Ignored;
        };
        let Some(snapshot) = self.registry.resolve(&partition) else {
            return BedEnterAction::Ignored;
        };
        if !snapshot.is_sleepable_night() || !self.settings.is_partition_enabled(&partition) {
            debug!(%participant, %partition, time = %snapshot.time, "Bed enter ignored");
            return BedEnterAction::Ignored;
        }

        if self.coordinator.is_sleep_enabled(&partition) {
            return self.apply(participant);
        }
        if self.coordinator.has_active_vote(&partition) {
            return BedEnterAction::Ignored;
        }

        if self.coordinator.eligible_participants(&partition).len() > 1 {
            if self.coordinator.start_vote(&partition) {
                BedEnterAction::VoteStarted
            } else {
                BedEnterAction::VoteRejected
            }
        } else {
            // a lone sleeper is left to the host's own sleep rules
            self.apply(participant)
        }
    }

    /// A player joined; re-prompt them if their world is voting
    ///
    /// Returns whether a prompt was sent.
    pub fn on_join(&self, participant: &ParticipantId) -> bool {
        let Some(partition) = self.registry.partition_of(participant) else {
            return false;
        };
        if !self.coordinator.has_active_vote(&partition) {
            return false;
        }
        self.notifier.prompt_vote(participant, &partition);
        true
    }

    fn apply(&self, participant: &ParticipantId) -> BedEnterAction {
        if self.coordinator.handle_outcome_apply(participant) {
            BedEnterAction::OutcomeApplied
        } else {
            BedEnterAction::Ignored
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::partition_registry::PartitionSnapshot;
    use crate::test_support::{Harness, NotifierEvent};
    use crate::use_cases::vote_coordinator::OUTCOME_APPLY_DELAY;
    use sleepvote_domain::{Dimension, GameMode, PartitionId, TimeOfDay};

    fn handler(h: &Harness) -> SleepEventHandler {
        SleepEventHandler::new(
            Arc::clone(&h.coordinator),
            h.worlds.clone(),
            h.settings.clone(),
            h.notifier.clone(),
        )
    }

    fn p(name: &str) -> ParticipantId {
        ParticipantId::new(name)
    }

    #[test]
    fn test_bed_enter_starts_vote_with_two_sleepers() {
        let h = Harness::with_survivors(&["alex", "steve"]);
        let events = handler(&h);

        assert_eq!(events.on_bed_enter(&p("alex")), BedEnterAction::VoteStarted);
        assert!(h.coordinator.has_active_vote(&PartitionId::new("world")));
        // a second sleeper does not restart anything
        assert_eq!(events.on_bed_enter(&p("steve")), BedEnterAction::Ignored);
    }

    #[test]
    fn test_bed_enter_outside_night_is_ignored() {
        let h = Harness::with_survivors(&["alex", "steve"]);
        h.worlds.add_world_with(
            "world",
            PartitionSnapshot::new(Dimension::Overworld, TimeOfDay::MORNING),
        );

        assert_eq!(handler(&h).on_bed_enter(&p("alex")), BedEnterAction::Ignored);
        assert!(h.notifier.events().is_empty());
    }

    #[test]
    fn test_bed_enter_in_nether_is_ignored() {
        let h = Harness::new();
        h.worlds.add_world_with(
            "world_nether",
            PartitionSnapshot::new(Dimension::Nether, TimeOfDay::new(13_000)),
        );
        h.worlds.add_player("alex", "world_nether", GameMode::Survival);
        h.worlds.add_player("steve", "world_nether", GameMode::Survival);

        assert_eq!(handler(&h).on_bed_enter(&p("alex")), BedEnterAction::Ignored);
    }

    #[test]
    fn test_bed_enter_in_disabled_world_is_ignored() {
        let h = Harness::with_survivors(&["alex", "steve"]);
        h.settings.set_enabled("world", false);

        assert_eq!(handler(&h).on_bed_enter(&p("alex")), BedEnterAction::Ignored);
        assert!(!h.coordinator.has_active_vote(&PartitionId::new("world")));
    }

    #[test]
    fn test_lone_sleeper_does_not_start_vote() {
        let h = Harness::with_survivors(&["alex"]);
        h.worlds.add_player("cam", "world", GameMode::Creative);

        assert_eq!(handler(&h).on_bed_enter(&p("alex")), BedEnterAction::Ignored);
        assert!(!h.coordinator.has_active_vote(&PartitionId::new("world")));
    }

    #[test]
    fn test_bed_enter_during_cooldown_is_rejected() {
        let h = Harness::with_survivors(&["alex", "steve"]);
        let events = handler(&h);
        events.on_bed_enter(&p("alex"));
        h.coordinator.vote(&p("alex"), false);
        h.coordinator.vote(&p("steve"), false);
        h.scheduler.run_due();

        assert_eq!(events.on_bed_enter(&p("alex")), BedEnterAction::VoteRejected);
    }

    #[test]
    fn test_bed_enter_after_pass_applies_outcome() {
        let h = Harness::with_survivors(&["alex", "steve"]);
        let events = handler(&h);
        events.on_bed_enter(&p("alex"));
        h.coordinator.vote(&p("alex"), true);
        h.coordinator.vote(&p("steve"), true);
        h.scheduler.run_due();

        assert_eq!(events.on_bed_enter(&p("steve")), BedEnterAction::OutcomeApplied);
        h.scheduler.advance(OUTCOME_APPLY_DELAY);
        assert!(
            h.notifier
                .events()
                .contains(&NotifierEvent::Applied(PartitionId::new("world")))
        );
    }

    #[test]
    fn test_join_during_vote_reprompts() {
        let h = Harness::with_survivors(&["alex", "steve"]);
        let events = handler(&h);
        assert!(!events.on_join(&p("alex")));

        events.on_bed_enter(&p("alex"));
        h.worlds.add_player("sam", "world", GameMode::Survival);
        assert!(events.on_join(&p("sam")));
        assert_eq!(h.notifier.prompts().last(), Some(&p("sam")));
    }
}
