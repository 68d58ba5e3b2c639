use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Time of day in ticks (0 to 23999)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeOfDay(u64);

impl TimeOfDay {
    pub const TICKS_PER_DAY: u64 = 24_000;
    pub const TICKS_PER_SECOND: u64 = 20;
    pub const MORNING: TimeOfDay = TimeOfDay(0);

    /// Ticks during which players may enter a bed
    pub const NIGHT: RangeInclusive<u64> = 12_541..=23_458;

    /// Create a time of day, wrapping full days
    pub const fn new(ticks: u64) -> Self {
        Self(ticks % Self::TICKS_PER_DAY)
    }

    pub fn ticks(&self) -> u64 {
        self.0
    }

    pub fn is_night(&self) -> bool {
        Self::NIGHT.contains(&self.0)
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.0, if self.is_night() { "night" } else { "day" })
    }
}
