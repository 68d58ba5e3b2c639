//! Console output formatting for the simulator

use crate::output::status::StatusReport;
use colored::Colorize;
use sleepvote_application::{BedEnterAction, CommandReply};

/// Formats simulator output for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the server status as a table-like listing
    pub fn format_status(report: &StatusReport) -> String {
        let mut output = String::new();
        output.push_str(&Self::header("Server Status"));
        output.push('\n');

        output.push_str(&Self::section_header("Worlds"));
        for world in &report.worlds {
            let phase = if world.night {
                "night".blue()
            } else {
                "day".yellow()
            };
            let voting = if world.enabled {
                "voting on".green()
            } else {
                "voting off".red()
            };
            output.push_str(&format!(
                "  {} ({}) t={} {} {}",
                world.name.as_str().bold(),
                world.dimension,
                world.time,
                phase,
                voting
            ));
            if world.storm {
                output.push_str(&format!(" {}", "storm".dimmed()));
            }
            if world.thunder {
                output.push_str(&format!(" {}", "thunder".dimmed()));
            }
            output.push('\n');

            if let Some(vote) = &world.vote {
                output.push_str(&format!(
                    "    {} #{}: {}/{} voted, {} yes\n",
                    "vote".cyan().bold(),
                    vote.session,
                    vote.ballots,
                    vote.roster,
                    vote.yes
                ));
            } else if world.sleep_enabled {
                output.push_str(&format!(
                    "    {} ({:.0}% yes), waiting for a sleeper\n",
                    "vote passed".green(),
                    world.last_yes_percentage
                ));
            }
        }

        output.push_str(&Self::section_header("Players"));
        if report.players.is_empty() {
            output.push_str(&format!("  {}\n", "(none online)".dimmed()));
        }
        for player in &report.players {
            output.push_str(&format!(
                "  {} in {} [{}]\n",
                player.name.as_str().bold(),
                player.world,
                player.mode
            ));
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format the server status as JSON
    pub fn format_status_json(report: &StatusReport) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
    }

    /// Colour a rendered command reply by whether it succeeded
    pub fn format_reply(reply: &CommandReply, text: &str) -> String {
        match reply {
            CommandReply::Help | CommandReply::Version(_) => text.to_string(),
            CommandReply::VoteStarted(_)
            | CommandReply::Voted { .. }
            | CommandReply::WorldToggled { .. }
            | CommandReply::AllToggled { .. } => text.green().to_string(),
            _ => text.red().to_string(),
        }
    }

    pub fn format_bed_action(action: BedEnterAction) -> String {
        match action {
            BedEnterAction::Ignored => "nothing happens".dimmed().to_string(),
            BedEnterAction::VoteStarted => "a sleep vote starts".green().to_string(),
            BedEnterAction::VoteRejected => "a vote cannot start yet".yellow().to_string(),
            BedEnterAction::OutcomeApplied => "the night will be skipped".cyan().to_string(),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(50);
        format!("{}\n{:^50}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(30))
    }

    fn footer() -> String {
        format!("{}\n", "=".repeat(50).cyan())
    }
}
