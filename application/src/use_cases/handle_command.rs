//! Handle `/sleepmanager` commands
//!
//! Executes a parsed [`SleepCommand`] on behalf of a player and reports what
//! happened as a [`CommandReply`]. Wording is left to the presentation layer.

use crate::ports::partition_registry::PartitionRegistry;
use crate::ports::settings::{SettingsError, VoteSettings};
use crate::use_cases::vote_coordinator::VoteCoordinator;
use sleepvote_domain::{ParticipantId, PartitionId, SleepCommand};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors that can occur while executing a command
#[derive(Error, Debug)]
pub enum HandleCommandError {
    #[error("Toggle applied but could not be saved: {0}")]
    Persist(#[from] SettingsError),
}

/// Result of a command, to be rendered for the sender
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandReply {
    Version(&'static str),
    Help,
    /// The sender is not in any world
    NotInWorld,
    WorldDisabled(PartitionId),
    RevoteCooldown(PartitionId),
    VoteStarted(PartitionId),
    /// Allowed to start, but the coordinator refused (no eligible players)
    VoteNotStarted(PartitionId),
    Voted { yes: bool },
    NoActiveVote,
    WorldNotFound(PartitionId),
    WorldToggled { partition: PartitionId, enabled: bool },
    AllToggled { enabled: bool },
}

/// Use case for player and admin commands
pub struct HandleCommandUseCase {
    coordinator: Arc<VoteCoordinator>,
    registry: Arc<dyn PartitionRegistry>,
    settings: Arc<dyn VoteSettings>,
}

impl HandleCommandUseCase {
    pub fn new(
        coordinator: Arc<VoteCoordinator>,
        registry: Arc<dyn PartitionRegistry>,
        settings: Arc<dyn VoteSettings>,
    ) -> Self {
        Self {
            coordinator,
            registry,
            settings,
        }
    }

    pub fn execute(
        &self,
        sender: &ParticipantId,
        command: SleepCommand,
    ) -> Result<CommandReply, HandleCommandError> {
        let reply = match command {
            SleepCommand::Version => CommandReply::Version(env!("CARGO_PKG_VERSION")),
            SleepCommand::Help => CommandReply::Help,
            SleepCommand::Revote => self.revote(sender),
            SleepCommand::Yes => self.vote(sender, true),
            SleepCommand::No => self.vote(sender, false),
            SleepCommand::Toggle(Some(partition)) => self.toggle(partition)?,
            SleepCommand::Toggle(None) => self.toggle_all()?,
        };
        Ok(reply)
    }

    fn revote(&self, sender: &ParticipantId) -> CommandReply {
        let Some(partition) = self.registry.partition_of(sender) else {
            return CommandReply::NotInWorld;
        };
        if !self.settings.is_partition_enabled(&partition) {
            return CommandReply::WorldDisabled(partition);
        }
        if !self.coordinator.can_start_vote(&partition) {
            return CommandReply::RevoteCooldown(partition);
        }
        if self.coordinator.start_vote(&partition) {
            CommandReply::VoteStarted(partition)
        } else {
            CommandReply::VoteNotStarted(partition)
        }
    }

    fn vote(&self, sender: &ParticipantId, yes: bool) -> CommandReply {
        if self.coordinator.vote(sender, yes) {
            CommandReply::Voted { yes }
        } else {
            CommandReply::NoActiveVote
        }
    }

    fn toggle(&self, partition: PartitionId) -> Result<CommandReply, HandleCommandError> {
        if self.registry.resolve(&partition).is_none() {
            return Ok(CommandReply::WorldNotFound(partition));
        }

        let enabled = self.settings.toggle_partition(&partition);
        if !enabled {
            self.coordinator.clear_vote(&partition);
        }
        info!(%partition, enabled, "World voting toggled");
        self.settings.persist()?;

        Ok(CommandReply::WorldToggled { partition, enabled })
    }

    fn toggle_all(&self) -> Result<CommandReply, HandleCommandError> {
        let partitions = self.registry.partitions();
        let all_enabled = partitions
            .iter()
            .all(|partition| self.settings.is_partition_enabled(partition));

        let enabled = !all_enabled;
        self.settings.set_all_partitions(enabled, &partitions);
        if !enabled {
            self.coordinator.clear_all();
        }
        info!(worlds = partitions.len(), enabled, "Voting toggled in every world");
        self.settings.persist()?;

        Ok(CommandReply::AllToggled { enabled })
    }
}
