//! Player command vocabulary
//!
//! The `/sleepmanager` command and its subcommands, parsed from the words
//! following the command name.

use crate::core::error::DomainError;
use crate::core::id::PartitionId;

/// A parsed `/sleepmanager` subcommand
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SleepCommand {
    /// Show the version
    Version,
    /// Start a new vote in the sender's world
    Revote,
    /// Vote yes in the sender's world
    Yes,
    /// Vote no in the sender's world
    No,
    /// Toggle voting for one world, or for every world when `None`
    Toggle(Option<PartitionId>),
    /// Show the command list
    Help,
}

impl SleepCommand {
    pub const NAMES: [&'static str; 5] = ["version", "revote", "yes", "no", "toggle"];

    /// Parse the words after the command name
    ///
    /// No words at all means help. Unknown subcommands are an error so the
    /// caller can decide whether to show help or complain.
    pub fn parse_args<S: AsRef<str>>(args: &[S]) -> Result<Self, DomainError> {
        let Some(first) = args.first() else {
            return Ok(SleepCommand::Help);
        };

        match first.as_ref().to_lowercase().as_str() {
            "version" => Ok(SleepCommand::Version),
            "revote" => Ok(SleepCommand::Revote),
            "yes" => Ok(SleepCommand::Yes),
            "no" => Ok(SleepCommand::No),
            "toggle" => Ok(SleepCommand::Toggle(
                args.get(1).map(|w| PartitionId::new(w.as_ref())),
            )),
            "help" => Ok(SleepCommand::Help),
            other => Err(DomainError::UnknownCommand(other.to_string())),
        }
    }

    /// Subcommand names starting with `partial`, for tab completion
    pub fn completions(partial: &str) -> Vec<&'static str> {
        let partial = partial.to_lowercase();
        Self::NAMES
            .iter()
            .copied()
            .filter(|name| name.starts_with(&partial))
            .collect()
    }
}

impl std::str::FromStr for SleepCommand {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let args: Vec<&str> = s.split_whitespace().collect();
        Self::parse_args(&args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!("yes".parse::<SleepCommand>().ok(), Some(SleepCommand::Yes));
        assert_eq!("NO".parse::<SleepCommand>().ok(), Some(SleepCommand::No));
        assert_eq!("revote".parse::<SleepCommand>().ok(), Some(SleepCommand::Revote));
        assert_eq!("version".parse::<SleepCommand>().ok(), Some(SleepCommand::Version));
        assert_eq!("".parse::<SleepCommand>().ok(), Some(SleepCommand::Help));
    }

    #[test]
    fn test_parse_toggle() {
        assert_eq!(
            "toggle".parse::<SleepCommand>().ok(),
            Some(SleepCommand::Toggle(None))
        );
        assert_eq!(
            "toggle world_nether".parse::<SleepCommand>().ok(),
            Some(SleepCommand::Toggle(Some(PartitionId::new("world_nether"))))
        );
    }

    #[test]
    fn test_unknown_command() {
        let err = "fly".parse::<SleepCommand>().unwrap_err();
        assert!(err.is_command_error());
    }

    #[test]
    fn test_completions() {
        assert_eq!(SleepCommand::completions("v"), vec!["version"]);
        assert_eq!(SleepCommand::completions(""), SleepCommand::NAMES.to_vec());
        assert!(SleepCommand::completions("x").is_empty());
    }
}
