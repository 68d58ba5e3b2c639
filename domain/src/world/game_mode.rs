use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Player game mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    #[default]
    Survival,
    Creative,
    Adventure,
    Spectator,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Survival => "survival",
            GameMode::Creative => "creative",
            GameMode::Adventure => "adventure",
            GameMode::Spectator => "spectator",
        }
    }

    /// Whether a player in this mode is on the voting roster
    pub fn is_eligible(&self) -> bool {
        matches!(self, GameMode::Survival | GameMode::Adventure)
    }
}

impl std::fmt::Display for GameMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for GameMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "survival" | "s" => Ok(GameMode::Survival),
            "creative" | "c" => Ok(GameMode::Creative),
            "adventure" | "a" => Ok(GameMode::Adventure),
            "spectator" | "sp" => Ok(GameMode::Spectator),
            _ => Err(DomainError::UnknownGameMode(s.to_string())),
        }
    }
}
