//! Simulated host worlds

mod in_memory;

pub use in_memory::{InMemoryWorlds, PlayerState, WorldState, WorldsError};
