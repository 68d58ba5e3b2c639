//! Player-facing message catalogue
//!
//! English is built in. Other languages are read from
//! `<lang_dir>/<language>.toml`, where keys may be nested tables or dotted
//! strings; missing keys fall back to English.
//!
//! ```toml
//! [vote]
//! prompt = "Skip the night in {world}?"
//! passed = "Vote passed in {world} ({yes_percent}% yes)"
//! ```

use sleepvote_application::CommandReply;
use sleepvote_domain::{PartitionId, VoteOutcome};
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

const ENGLISH: &[(&str, &str)] = &[
    ("vote.prompt", "Vote to skip the night in {world}: "),
    ("vote.yes_button", "[Yes]"),
    ("vote.no_button", "[No]"),
    ("vote.passed", "Vote passed in {world} with {yes_percent}% yes. Sleep to skip the night!"),
    ("vote.failed", "Vote failed in {world} with {yes_percent}% yes."),
    ("vote.no_active_vote", "There is no active vote in your world."),
    ("vote.voted_yes", "You voted yes."),
    ("vote.voted_no", "You voted no."),
    ("sleep.night_skipped", "The night has been skipped."),
    ("command.world_disabled", "Sleep voting is disabled in this world."),
    ("command.revote_cooldown", "Please wait before starting another vote."),
    ("command.vote_started", "Started a sleep vote in {world}."),
    ("command.vote_not_started", "Could not start a vote in {world}: nobody can vote."),
    ("command.not_in_world", "This command can only be used by players."),
    ("command.world_not_found", "World '{world}' not found."),
    ("command.world_toggled", "Sleep voting for world '{world}' is now {state}."),
    ("command.all_toggled", "Sleep voting for all worlds is now {state}."),
    ("command.version", "Sleep Manager version: {version}"),
    ("state.enabled", "enabled"),
    ("state.disabled", "disabled"),
];

const HELP: &[(&str, &str)] = &[
    ("version", "Show plugin version"),
    ("revote", "Start a new sleep vote"),
    ("yes", "Vote yes to skip the night"),
    ("no", "Vote no to skip the night"),
    ("toggle [world]", "Toggle sleep voting for a world"),
];

/// Message templates for one language
#[derive(Debug, Clone)]
pub struct Messages {
    templates: HashMap<String, String>,
}

impl Default for Messages {
    fn default() -> Self {
        Self::english()
    }
}

impl Messages {
    pub fn english() -> Self {
        Self {
            templates: ENGLISH
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
        }
    }

    /// Load `language`, falling back to English for anything missing
    pub fn load(language: &str, lang_dir: Option<&Path>) -> Self {
        let mut messages = Self::english();
        if language == "en" {
            return messages;
        }

        let Some(path) = lang_dir.map(|dir| dir.join(format!("{language}.toml"))) else {
            warn!("Language {} not found, defaulting to English", language);
            return messages;
        };

        match std::fs::read_to_string(&path) {
            Ok(content) => {
                if let Err(e) = messages.merge_toml(&content) {
                    warn!(path = %path.display(), "Invalid language file: {}", e);
                }
            }
            Err(_) => warn!("Language {} not found, defaulting to English", language),
        }
        messages
    }

    /// Overlay templates from a TOML document
    pub fn merge_toml(&mut self, content: &str) -> Result<(), toml::de::Error> {
        let table: toml::Table = toml::from_str(content)?;
        flatten("", &table, &mut self.templates);
        Ok(())
    }

    /// The raw template for `key`
    pub fn get(&self, key: &str) -> String {
        self.templates
            .get(key)
            .cloned()
            .unwrap_or_else(|| format!("Missing translation for: {key}"))
    }

    pub fn prompt(&self, partition: &PartitionId) -> String {
        self.with_world("vote.prompt", partition)
    }

    pub fn result(&self, outcome: &VoteOutcome, partition: &PartitionId) -> String {
        let key = if outcome.passed {
            "vote.passed"
        } else {
            "vote.failed"
        };
        self.get(key)
            .replace("{world}", partition.as_str())
            .replace("{yes_percent}", &format!("{:.0}", outcome.yes_percentage))
    }

    /// Render a command reply for its sender
    pub fn reply(&self, reply: &CommandReply) -> String {
        match reply {
            CommandReply::Version(version) => {
                self.get("command.version").replace("{version}", version)
            }
            CommandReply::Help => self.help(),
            CommandReply::NotInWorld => self.get("command.not_in_world"),
            CommandReply::WorldDisabled(_) => self.get("command.world_disabled"),
            CommandReply::RevoteCooldown(_) => self.get("command.revote_cooldown"),
            CommandReply::VoteStarted(world) => self.with_world("command.vote_started", world),
            CommandReply::VoteNotStarted(world) => {
                self.with_world("command.vote_not_started", world)
            }
            CommandReply::Voted { yes: true } => self.get("vote.voted_yes"),
            CommandReply::Voted { yes: false } => self.get("vote.voted_no"),
            CommandReply::NoActiveVote => self.get("vote.no_active_vote"),
            CommandReply::WorldNotFound(world) => self.with_world("command.world_not_found", world),
            CommandReply::WorldToggled { partition, enabled } => self
                .with_world("command.world_toggled", partition)
                .replace("{state}", &self.state(*enabled)),
            CommandReply::AllToggled { enabled } => self
                .get("command.all_toggled")
                .replace("{state}", &self.state(*enabled)),
        }
    }

    pub fn help(&self) -> String {
        let mut lines = vec!["===== Sleep Manager Commands =====".to_string()];
        for (usage, description) in HELP {
            lines.push(format!("/sleepmanager {usage} - {description}"));
        }
        lines.join("\n")
    }

    fn with_world(&self, key: &str, world: &PartitionId) -> String {
        self.get(key).replace("{world}", world.as_str())
    }

    fn state(&self, enabled: bool) -> String {
        self.get(if enabled {
            "state.enabled"
        } else {
            "state.disabled"
        })
    }
}

fn flatten(prefix: &str, table: &toml::Table, out: &mut HashMap<String, String>) {
    for (key, value) in table {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            toml::Value::Table(inner) => flatten(&path, inner, out),
            toml::Value::String(text) => {
                out.insert(path, text.clone());
            }
            other => {
                out.insert(path, other.to_string());
            }
        }
    }
}
