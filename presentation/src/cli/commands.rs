//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for sleepvote
#[derive(Parser, Debug)]
#[command(name = "sleepvote")]
#[command(author, version, about = "Sleep vote coordinator - players vote to skip the night")]
#[command(long_about = r#"
sleepvote runs the sleep-vote engine against a simulated server.

When a player enters a bed at night and more than one player could vote,
everyone in the world is asked whether to skip the night. A vote ends when
every eligible player has voted or when the time limit runs out; if the
yes-percentage reaches the threshold, the next player to sleep skips the
night for the whole world.

Configuration files are loaded from (in priority order):
1. --config <path>        Explicit config file
2. ./sleepvote.toml       Project-level config
3. ~/.config/sleepvote/config.toml   Global config

Example:
  sleepvote
  sleepvote -v --config ./server.toml
  sleepvote --script demo.txt
"#)]
pub struct Cli {
    /// Run simulator commands from a file instead of the interactive prompt
    #[arg(short, long, value_name = "PATH")]
    pub script: Option<PathBuf>,

    /// Print `status` output as JSON
    #[arg(long)]
    pub json: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Also write logs to this directory (one file per day)
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading and saving of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::parse_from(["sleepvote", "-vv", "--no-config", "--script", "demo.txt"]);
        assert_eq!(cli.verbose, 2);
        assert!(cli.no_config);
        assert_eq!(cli.script, Some(PathBuf::from("demo.txt")));
        assert!(!cli.show_config);
    }
}
