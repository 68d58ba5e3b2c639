//! REPL (Read-Eval-Print Loop) driving a simulated server
//!
//! Lines are simulator commands (`world`, `join`, `sleep`, ...) or player
//! commands issued with `as <player> <subcommand>`, which go through the
//! same use cases a real server plugin would call.

use crate::ConsoleFormatter;
use crate::output::messages::Messages;
use crate::output::status::StatusReport;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use sleepvote_application::{
    HandleCommandError, HandleCommandUseCase, OutcomeNotifier, SleepEventHandler,
    VoteCoordinator, VoteSettings,
};
use sleepvote_domain::{
    Dimension, DomainError, GameMode, ParticipantId, PartitionId, SleepCommand, TimeOfDay,
};
use sleepvote_infrastructure::{InMemoryWorlds, WorldsError};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

const HELP: &str = "\
Simulator commands:
  world <name> [overworld|nether|end]   Create a world
  join <player> <world> [mode]          Bring a player online (default survival)
  leave <player>                        Take a player offline
  mode <player> <mode>                  Change a player's game mode
  time <world> <ticks|day|night>        Set a world's time of day
  sleep <player>                        The player gets into bed
  as <player> <command> [args]          Run /sleepmanager as a player
  wait <seconds>                        Let time pass
  status [json]                         Show worlds, players and votes
  help                                  Show this help
  quit                                  Exit";

/// Errors that can occur while executing a simulator line
#[derive(Error, Debug)]
pub enum SimulatorError {
    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Unknown simulator command: {0} (type 'help')")]
    UnknownCommand(String),

    #[error(transparent)]
    Worlds(#[from] WorldsError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Command(#[from] HandleCommandError),
}

/// What the REPL should do after a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Output(String),
    Quit,
}

/// Interactive simulator REPL
pub struct SimulatorRepl {
    worlds: Arc<InMemoryWorlds>,
    coordinator: Arc<VoteCoordinator>,
    settings: Arc<dyn VoteSettings>,
    events: SleepEventHandler,
    commands: HandleCommandUseCase,
    messages: Arc<Messages>,
    json_status: bool,
}

impl SimulatorRepl {
    pub fn new(
        worlds: Arc<InMemoryWorlds>,
        coordinator: Arc<VoteCoordinator>,
        settings: Arc<dyn VoteSettings>,
        notifier: Arc<dyn OutcomeNotifier>,
        messages: Arc<Messages>,
    ) -> Self {
        let events = SleepEventHandler::new(
            Arc::clone(&coordinator),
            worlds.clone(),
            Arc::clone(&settings),
            notifier,
        );
        let commands = HandleCommandUseCase::new(
            Arc::clone(&coordinator),
            worlds.clone(),
            Arc::clone(&settings),
        );
        Self {
            worlds,
            coordinator,
            settings,
            events,
            commands,
            messages,
            json_status: false,
        }
    }

    /// Print `status` as JSON by default
    pub fn with_json_status(mut self, json: bool) -> Self {
        self.json_status = json;
        self
    }

    /// Run the interactive REPL
    pub async fn run(&self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        let history_path = dirs::data_dir().map(|p| p.join("sleepvote").join("history.txt"));
        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome();

        loop {
            match rl.readline("sleepvote> ") {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(line);
                    if self.run_line(line).await {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(ref path) = history_path {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    /// Run every line of a script, echoing each one
    ///
    /// Blank lines and lines starting with `#` are skipped. Stops early on
    /// `quit`.
    pub async fn run_script(&self, script: &str) {
        for line in script.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            println!("{} {}", "sleepvote>".dimmed(), line);
            if self.run_line(line).await {
                break;
            }
        }
    }

    /// Execute a line and print the result. Returns true if should exit.
    async fn run_line(&self, line: &str) -> bool {
        match self.execute(line).await {
            Ok(Step::Output(text)) => {
                if !text.is_empty() {
                    println!("{}", text);
                }
                false
            }
            Ok(Step::Quit) => {
                println!("Bye!");
                true
            }
            Err(e) => {
                eprintln!("{}", e.to_string().red());
                false
            }
        }
    }

    /// Execute one simulator line
    pub async fn execute(&self, line: &str) -> Result<Step, SimulatorError> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&command, args)) = words.split_first() else {
            return Ok(Step::Output(String::new()));
        };
        debug!(command, ?args, "Simulator command");

        let output = match command.to_lowercase().as_str() {
            "quit" | "exit" | "q" => return Ok(Step::Quit),
            "help" | "?" => HELP.to_string(),
            "world" => self.create_world(args)?,
            "join" => self.join(args)?,
            "leave" => {
                let [player] = args else {
                    return Err(SimulatorError::Usage("leave <player>"));
                };
                self.worlds.leave(&ParticipantId::new(*player))?;
                format!("{player} left the game")
            }
            "mode" => {
                let [player, mode] = args else {
                    return Err(SimulatorError::Usage("mode <player> <mode>"));
                };
                let mode: GameMode = mode.parse()?;
                self.worlds.set_game_mode(&ParticipantId::new(*player), mode)?;
                format!("{player} is now in {mode} mode")
            }
            "time" => self.set_time(args)?,
            "sleep" => {
                let [player] = args else {
                    return Err(SimulatorError::Usage("sleep <player>"));
                };
                let action = self.events.on_bed_enter(&ParticipantId::new(*player));
                format!(
                    "{player} gets into bed: {}",
                    ConsoleFormatter::format_bed_action(action)
                )
            }
            "as" => self.run_as(args)?,
            "wait" => {
                let [seconds] = args else {
                    return Err(SimulatorError::Usage("wait <seconds>"));
                };
                let delay = seconds
                    .parse::<f64>()
                    .ok()
                    .and_then(|secs| Duration::try_from_secs_f64(secs.max(0.0)).ok())
                    .ok_or(SimulatorError::Usage("wait <seconds>"))?;
                tokio::time::sleep(delay).await;
                String::new()
            }
            "status" => {
                let report =
                    StatusReport::collect(&self.worlds, &self.coordinator, self.settings.as_ref());
                let json = self.json_status || args.first() == Some(&"json");
                if json {
                    ConsoleFormatter::format_status_json(&report)
                } else {
                    ConsoleFormatter::format_status(&report)
                }
            }
            other => return Err(SimulatorError::UnknownCommand(other.to_string())),
        };

        Ok(Step::Output(output))
    }

    fn create_world(&self, args: &[&str]) -> Result<String, SimulatorError> {
        let (name, dimension) = match args {
            [name] => (*name, Dimension::Overworld),
            [name, dimension] => (*name, dimension.parse::<Dimension>()?),
            _ => return Err(SimulatorError::Usage("world <name> [overworld|nether|end]")),
        };
        self.worlds.add_world(name, dimension)?;
        Ok(format!("Created world {name} ({dimension})"))
    }

    fn join(&self, args: &[&str]) -> Result<String, SimulatorError> {
        let (player, world, mode) = match args {
            [player, world] => (*player, *world, GameMode::Survival),
            [player, world, mode] => (*player, *world, mode.parse::<GameMode>()?),
            _ => return Err(SimulatorError::Usage("join <player> <world> [mode]")),
        };
        let participant = ParticipantId::new(player);
        self.worlds
            .join(&participant, &PartitionId::new(world), mode)?;
        self.events.on_join(&participant);
        Ok(format!("{player} joined {world} in {mode} mode"))
    }

    fn set_time(&self, args: &[&str]) -> Result<String, SimulatorError> {
        let [world, time] = args else {
            return Err(SimulatorError::Usage("time <world> <ticks|day|night>"));
        };
        let time = match *time {
            "day" => TimeOfDay::new(1_000),
            "night" => TimeOfDay::new(13_000),
            "midnight" => TimeOfDay::new(18_000),
            ticks => TimeOfDay::new(
                ticks
                    .parse()
                    .map_err(|_| SimulatorError::Usage("time <world> <ticks|day|night>"))?,
            ),
        };
        self.worlds.set_time(&PartitionId::new(*world), time)?;
        Ok(format!("Time in {world} is now {time}"))
    }

    fn run_as(&self, args: &[&str]) -> Result<String, SimulatorError> {
        let Some((player, rest)) = args.split_first() else {
            return Err(SimulatorError::Usage("as <player> <command> [args]"));
        };
        let rest = match rest.first() {
            Some(&"/sleepmanager") | Some(&"sleepmanager") => &rest[1..],
            _ => rest,
        };

        // unknown subcommands get the command list, like the in-game command
        let command = SleepCommand::parse_args(rest).unwrap_or_else(|e| {
            debug!(%player, error = %e, "Unrecognised command, showing help");
            SleepCommand::Help
        });
        let reply = self
            .commands
            .execute(&ParticipantId::new(*player), command)?;
        let text = self.messages.reply(&reply);
        Ok(format!(
            "{} {}",
            format!("[{player}]").dimmed(),
            ConsoleFormatter::format_reply(&reply, &text)
        ))
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│         Sleep Vote - Server Simulator       │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!(
            "Worlds: {}",
            self.worlds
                .worlds()
                .iter()
                .map(|(name, _)| name.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
        println!();
        println!("{}", HELP);
        println!();
    }
}
