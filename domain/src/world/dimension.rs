use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Kind of world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    #[default]
    Overworld,
    Nether,
    End,
}

impl Dimension {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Overworld => "overworld",
            Dimension::Nether => "nether",
            Dimension::End => "end",
        }
    }

    /// Whether sleeping can skip the night here
    pub fn has_day_cycle(&self) -> bool {
        matches!(self, Dimension::Overworld)
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Dimension {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "overworld" | "normal" => Ok(Dimension::Overworld),
            "nether" => Ok(Dimension::Nether),
            "end" | "the_end" => Ok(Dimension::End),
            _ => Err(DomainError::UnknownDimension(s.to_string())),
        }
    }
}
