//! Pass threshold for sleep votes
//!
//! This module defines the rule used to determine whether a vote passes.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Minimum yes-percentage (0-100) a vote needs to pass
///
/// A threshold of `0` is special: any participation at all passes the vote,
/// regardless of how the ballots went. Every other threshold requires at
/// least one ballot and a yes-percentage greater than or equal to it.
///
/// # Example
///
/// ```
/// use sleepvote_domain::vote::PassThreshold;
///
/// let threshold = PassThreshold::new(50);
/// assert!(threshold.is_met(1, 2));   // 50% >= 50%
/// assert!(!threshold.is_met(1, 3));  // 33% < 50%
///
/// let any = PassThreshold::new(0);
/// assert!(any.is_met(0, 1));         // somebody voted
/// assert!(!any.is_met(0, 0));        // nobody voted
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "u8")]
pub struct PassThreshold(u8);

impl PassThreshold {
    pub const MAX: u8 = 100;

    /// Create a threshold, clamping to `0..=100`
    pub fn new(percent: i64) -> Self {
        Self(percent.clamp(0, Self::MAX as i64) as u8)
    }

    /// Create a threshold, reporting whether clamping was needed
    ///
    /// Returns the clamped threshold and `true` if `percent` was outside the
    /// valid range. Config loaders use this to warn about bad values.
    pub fn clamped(percent: i64) -> (Self, bool) {
        let threshold = Self::new(percent);
        (threshold, threshold.0 as i64 != percent)
    }

    pub fn percent(&self) -> u8 {
        self.0
    }

    /// Whether any participation passes the vote
    pub fn is_any_participation(&self) -> bool {
        self.0 == 0
    }

    /// Check if the threshold is met given yes votes and total votes
    pub fn is_met(&self, yes_votes: usize, total_votes: usize) -> bool {
        if total_votes == 0 {
            return false;
        }
        if self.is_any_participation() {
            return true;
        }
        yes_percentage(yes_votes, total_votes) >= self.0 as f64
    }

    /// Get a human-readable description of this threshold
    pub fn description(&self) -> String {
        if self.is_any_participation() {
            "any participation".to_string()
        } else {
            format!("at least {}% yes", self.0)
        }
    }
}

impl Default for PassThreshold {
    fn default() -> Self {
        Self(50)
    }
}

impl From<i64> for PassThreshold {
    fn from(percent: i64) -> Self {
        Self::new(percent)
    }
}

impl From<PassThreshold> for u8 {
    fn from(threshold: PassThreshold) -> Self {
        threshold.0
    }
}

impl std::fmt::Display for PassThreshold {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl std::str::FromStr for PassThreshold {
    type Err = DomainError;

    /// Parses `"50"` or `"50%"`, clamping out-of-range numbers.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let num_str = s.trim().trim_end_matches('%');
        let percent: i64 = num_str
            .parse()
            .map_err(|_| DomainError::InvalidThreshold(s.to_string()))?;
        Ok(Self::new(percent))
    }
}

/// Percentage of yes votes, `0.0` when nobody voted
pub fn yes_percentage(yes_votes: usize, total_votes: usize) -> f64 {
    if total_votes == 0 {
        0.0
    } else {
        yes_votes as f64 * 100.0 / total_votes as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_threshold() {
        let threshold = PassThreshold::new(50);

        assert!(threshold.is_met(2, 3));
        assert!(!threshold.is_met(1, 3));
        // exactly at the threshold passes
        assert!(threshold.is_met(1, 2));
        assert!(threshold.is_met(2, 4));
    }

    #[test]
    fn test_zero_threshold_needs_participation() {
        let threshold = PassThreshold::new(0);

        assert!(threshold.is_met(0, 3));
        assert!(threshold.is_met(3, 3));
        assert!(!threshold.is_met(0, 0));
    }

    #[test]
    fn test_full_threshold() {
        let threshold = PassThreshold::new(100);

        assert!(!threshold.is_met(2, 3));
        assert!(threshold.is_met(3, 3));
    }

    #[test]
    fn test_zero_total() {
        for percent in [0, 1, 50, 100] {
            assert!(!PassThreshold::new(percent).is_met(0, 0));
        }
    }

    #[test]
    fn test_clamping() {
        assert_eq!(PassThreshold::new(-5).percent(), 0);
        assert_eq!(PassThreshold::new(150).percent(), 100);

        assert_eq!(PassThreshold::clamped(75), (PassThreshold::new(75), false));
        assert_eq!(PassThreshold::clamped(101), (PassThreshold::new(100), true));
        assert_eq!(PassThreshold::clamped(-1), (PassThreshold::new(0), true));
    }

    #[test]
    fn test_parse_threshold() {
        assert_eq!("75".parse::<PassThreshold>().ok(), Some(PassThreshold::new(75)));
        assert_eq!("80%".parse::<PassThreshold>().ok(), Some(PassThreshold::new(80)));
        assert_eq!("250".parse::<PassThreshold>().ok(), Some(PassThreshold::new(100)));
        assert!("half".parse::<PassThreshold>().is_err());
    }

    #[test]
    fn test_yes_percentage() {
        assert_eq!(yes_percentage(0, 0), 0.0);
        assert_eq!(yes_percentage(1, 2), 50.0);
        assert!((yes_percentage(2, 3) - 66.666).abs() < 0.01);
    }

    #[test]
    fn test_display() {
        assert_eq!(PassThreshold::new(0).to_string(), "any participation");
        assert_eq!(PassThreshold::new(60).to_string(), "at least 60% yes");
    }

    #[test]
    fn test_default() {
        assert_eq!(PassThreshold::default().percent(), 50);
    }
}
