//! Vote tally and outcome
//!
//! A [`VoteTally`] counts the ballots of one session. Applying a
//! [`PassThreshold`] to it yields the [`VoteOutcome`] announced to players.

use super::threshold::{PassThreshold, yes_percentage};
use serde::{Deserialize, Serialize};

/// Counted ballots of a single session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    /// Number of yes ballots
    pub yes_votes: usize,
    /// Number of no ballots
    pub no_votes: usize,
}

impl VoteTally {
    pub fn new(yes_votes: usize, no_votes: usize) -> Self {
        Self { yes_votes, no_votes }
    }

    /// Count a sequence of yes/no choices
    pub fn from_choices(choices: impl IntoIterator<Item = bool>) -> Self {
        choices.into_iter().fold(Self::default(), |mut tally, yes| {
            if yes {
                tally.yes_votes += 1;
            } else {
                tally.no_votes += 1;
            }
            tally
        })
    }

    pub fn total_votes(&self) -> usize {
        self.yes_votes + self.no_votes
    }

    /// Percentage of yes ballots (0.0 to 100.0)
    pub fn yes_percentage(&self) -> f64 {
        yes_percentage(self.yes_votes, self.total_votes())
    }

    /// Decide the outcome under `threshold`
    pub fn decide(&self, threshold: PassThreshold) -> VoteOutcome {
        VoteOutcome {
            passed: threshold.is_met(self.yes_votes, self.total_votes()),
            yes_percentage: self.yes_percentage(),
            tally: *self,
            threshold,
        }
    }

    /// Generate a visual vote summary (e.g., "[●●○]")
    pub fn summary(&self) -> String {
        let mut summary = String::from("[");
        summary.extend(std::iter::repeat_n('●', self.yes_votes));
        summary.extend(std::iter::repeat_n('○', self.no_votes));
        summary.push(']');
        summary
    }
}

/// Result of a finished vote
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoteOutcome {
    /// Whether the vote passed
    pub passed: bool,
    /// Percentage of yes ballots, `0.0` when nobody voted
    pub yes_percentage: f64,
    /// The ballots the decision was based on
    pub tally: VoteTally,
    /// The threshold in force when the vote ended
    pub threshold: PassThreshold,
}

impl std::fmt::Display for VoteOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({:.0}% yes, {})",
            if self.passed { "Passed" } else { "Failed" },
            self.yes_percentage,
            self.threshold
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_from_choices() {
        let tally = VoteTally::from_choices([true, true, false]);
        assert_eq!(tally.yes_votes, 2);
        assert_eq!(tally.no_votes, 1);
        assert_eq!(tally.total_votes(), 3);
    }

    #[test]
    fn test_two_of_three_passes_at_half() {
        let outcome = VoteTally::new(2, 1).decide(PassThreshold::new(50));
        assert!(outcome.passed);
        assert!((outcome.yes_percentage - 66.67).abs() < 0.01);
    }

    #[test]
    fn test_one_of_three_fails_at_half() {
        let outcome = VoteTally::new(1, 2).decide(PassThreshold::new(50));
        assert!(!outcome.passed);
    }

    #[test]
    fn test_zero_threshold_passes_on_all_no() {
        let outcome = VoteTally::new(0, 4).decide(PassThreshold::new(0));
        assert!(outcome.passed);
        assert_eq!(outcome.yes_percentage, 0.0);
    }

    #[test]
    fn test_empty_tally_fails() {
        let outcome = VoteTally::default().decide(PassThreshold::new(0));
        assert!(!outcome.passed);
        assert_eq!(outcome.yes_percentage, 0.0);
    }

    #[test]
    fn test_summary() {
        assert_eq!(VoteTally::new(2, 1).summary(), "[●●○]");
        assert_eq!(VoteTally::default().summary(), "[]");
    }

    #[test]
    fn test_display() {
        let outcome = VoteTally::new(1, 1).decide(PassThreshold::new(50));
        assert_eq!(outcome.to_string(), "Passed (50% yes, at least 50% yes)");
    }
}
