//! Snapshot of the simulated server for the `status` command

use serde::Serialize;
use sleepvote_application::{VoteCoordinator, VoteSettings};
use sleepvote_domain::{Dimension, GameMode, ParticipantId, PartitionId};
use sleepvote_infrastructure::InMemoryWorlds;

#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub worlds: Vec<WorldReport>,
    pub players: Vec<PlayerReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorldReport {
    pub name: PartitionId,
    pub dimension: Dimension,
    pub time: u64,
    pub night: bool,
    pub storm: bool,
    pub thunder: bool,
    /// Voting enabled in settings
    pub enabled: bool,
    /// A passed vote is waiting for someone to sleep
    pub sleep_enabled: bool,
    pub last_yes_percentage: f64,
    pub vote: Option<VoteReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VoteReport {
    pub session: u64,
    pub roster: usize,
    pub ballots: usize,
    pub yes: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerReport {
    pub name: ParticipantId,
    pub world: PartitionId,
    pub mode: GameMode,
}

impl StatusReport {
    pub fn collect(
        worlds: &InMemoryWorlds,
        coordinator: &VoteCoordinator,
        settings: &dyn VoteSettings,
    ) -> Self {
        let votes = coordinator.active_votes();
        let world_reports = worlds
            .worlds()
            .into_iter()
            .map(|(name, state)| {
                let vote = votes
                    .iter()
                    .find(|status| status.partition == name)
                    .map(|status| VoteReport {
                        session: status.session.value(),
                        roster: status.roster_size,
                        ballots: status.ballots_cast,
                        yes: status.yes_votes,
                    });
                WorldReport {
                    dimension: state.dimension,
                    time: state.time.ticks(),
                    night: state.time.is_night(),
                    storm: state.storm,
                    thunder: state.thunder,
                    enabled: settings.is_partition_enabled(&name),
                    sleep_enabled: coordinator.is_sleep_enabled(&name),
                    last_yes_percentage: coordinator.last_vote_yes_percentage(&name),
                    vote,
                    name,
                }
            })
            .collect();

        let players = worlds
            .players()
            .into_iter()
            .map(|(name, state)| PlayerReport {
                name,
                world: state.world,
                mode: state.mode,
            })
            .collect();

        Self {
            worlds: world_reports,
            players,
        }
    }
}
