//! In-memory world and player registry
//!
//! Stands in for a game server: worlds with a dimension, a clock and
//! weather, and players with a location and game mode. Implements the
//! application's `EligibilitySource` and `PartitionRegistry` ports.

use serde::Serialize;
use sleepvote_application::{EligibilitySource, PartitionRegistry, PartitionSnapshot};
use sleepvote_domain::{Dimension, GameMode, ParticipantId, PartitionId, TimeOfDay};
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorldsError {
    #[error("World not found: {0}")]
    UnknownWorld(PartitionId),

    #[error("World already exists: {0}")]
    WorldExists(PartitionId),

    #[error("Player not online: {0}")]
    UnknownPlayer(ParticipantId),
}

/// State of one world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WorldState {
    pub dimension: Dimension,
    pub time: TimeOfDay,
    pub storm: bool,
    pub thunder: bool,
}

impl WorldState {
    pub fn new(dimension: Dimension) -> Self {
        Self {
            dimension,
            time: TimeOfDay::MORNING,
            storm: false,
            thunder: false,
        }
    }
}

/// State of one online player
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerState {
    pub world: PartitionId,
    pub mode: GameMode,
}

#[derive(Default)]
struct Registry {
    worlds: BTreeMap<PartitionId, WorldState>,
    players: BTreeMap<ParticipantId, PlayerState>,
}

/// Worlds and players of a simulated server
#[derive(Default)]
pub struct InMemoryWorlds {
    inner: RwLock<Registry>,
}

impl InMemoryWorlds {
    pub fn new() -> Self {
        Self::default()
    }

    /// The three worlds a fresh server starts with
    pub fn with_default_worlds() -> Self {
        let worlds = Self::new();
        for (name, dimension) in [
            ("world", Dimension::Overworld),
            ("world_nether", Dimension::Nether),
            ("world_the_end", Dimension::End),
        ] {
            // names are distinct, so this cannot fail
            let _ = worlds.add_world(name, dimension);
        }
        worlds
    }

    pub fn add_world(&self, name: &str, dimension: Dimension) -> Result<(), WorldsError> {
        let id = PartitionId::new(name);
        let mut inner = self.write();
        if inner.worlds.contains_key(&id) {
            return Err(WorldsError::WorldExists(id));
        }
        debug!(world = %id, ?dimension, "World created");
        inner.worlds.insert(id, WorldState::new(dimension));
        Ok(())
    }

    pub fn world(&self, name: &PartitionId) -> Option<WorldState> {
        self.read().worlds.get(name).copied()
    }

    pub fn worlds(&self) -> Vec<(PartitionId, WorldState)> {
        self.read()
            .worlds
            .iter()
            .map(|(id, state)| (id.clone(), *state))
            .collect()
    }

    pub fn set_time(&self, world: &PartitionId, time: TimeOfDay) -> Result<(), WorldsError> {
        self.update_world(world, |state| state.time = time)
    }

    pub fn set_weather(
        &self,
        world: &PartitionId,
        storm: bool,
        thunder: bool,
    ) -> Result<(), WorldsError> {
        self.update_world(world, |state| {
            state.storm = storm;
            state.thunder = thunder;
        })
    }

    /// Set the time to morning and clear the weather
    pub fn skip_to_morning(&self, world: &PartitionId) -> Result<(), WorldsError> {
        self.update_world(world, |state| {
            state.time = TimeOfDay::MORNING;
            state.storm = false;
            state.thunder = false;
        })
    }

    /// Put a player into a world, moving them if already online
    pub fn join(
        &self,
        player: &ParticipantId,
        world: &PartitionId,
        mode: GameMode,
    ) -> Result<(), WorldsError> {
        let mut inner = self.write();
        if !inner.worlds.contains_key(world) {
            return Err(WorldsError::UnknownWorld(world.clone()));
        }
        inner.players.insert(
            player.clone(),
            PlayerState {
                world: world.clone(),
                mode,
            },
        );
        Ok(())
    }

    pub fn leave(&self, player: &ParticipantId) -> Result<(), WorldsError> {
        self.write()
            .players
            .remove(player)
            .map(|_| ())
            .ok_or_else(|| WorldsError::UnknownPlayer(player.clone()))
    }

    pub fn set_game_mode(&self, player: &ParticipantId, mode: GameMode) -> Result<(), WorldsError> {
        let mut inner = self.write();
        let state = inner
            .players
            .get_mut(player)
            .ok_or_else(|| WorldsError::UnknownPlayer(player.clone()))?;
        state.mode = mode;
        Ok(())
    }

    pub fn player(&self, player: &ParticipantId) -> Option<PlayerState> {
        self.read().players.get(player).cloned()
    }

    pub fn players(&self) -> Vec<(ParticipantId, PlayerState)> {
        self.read()
            .players
            .iter()
            .map(|(id, state)| (id.clone(), state.clone()))
            .collect()
    }

    fn update_world(
        &self,
        world: &PartitionId,
        update: impl FnOnce(&mut WorldState),
    ) -> Result<(), WorldsError> {
        let mut inner = self.write();
        let state = inner
            .worlds
            .get_mut(world)
            .ok_or_else(|| WorldsError::UnknownWorld(world.clone()))?;
        update(state);
        Ok(())
    }

    fn players_in<'a>(
        inner: &'a Registry,
        world: &'a PartitionId,
    ) -> impl Iterator<Item = (&'a ParticipantId, &'a PlayerState)> + 'a {
        inner
            .players
            .iter()
            .filter(move |(_, state)| &state.world == world)
    }

    fn read(&self) -> RwLockReadGuard<'_, Registry> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Registry> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl EligibilitySource for InMemoryWorlds {
    fn eligible_participants(&self, partition: &PartitionId) -> Vec<ParticipantId> {
        let inner = self.read();
        Self::players_in(&inner, partition)
            .filter(|(_, state)| state.mode.is_eligible())
            .map(|(id, _)| id.clone())
            .collect()
    }
}

impl PartitionRegistry for InMemoryWorlds {
    fn resolve(&self, partition: &PartitionId) -> Option<PartitionSnapshot> {
        self.world(partition)
            .map(|state| PartitionSnapshot::new(state.dimension, state.time))
    }

    fn occupants(&self, partition: &PartitionId) -> Vec<ParticipantId> {
        let inner = self.read();
        Self::players_in(&inner, partition)
            .map(|(id, _)| id.clone())
            .collect()
    }

    fn partition_of(&self, participant: &ParticipantId) -> Option<PartitionId> {
        self.player(participant).map(|state| state.world)
    }

    fn partitions(&self) -> Vec<PartitionId> {
        self.read().worlds.keys().cloned().collect()
    }
}
