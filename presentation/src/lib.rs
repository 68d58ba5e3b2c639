//! Presentation layer for sleepvote
//!
//! This crate contains CLI definitions, message rendering, the console
//! notifier and the interactive server simulator.

pub mod cli;
pub mod output;
pub mod simulator;

// Re-export commonly used types
pub use cli::commands::Cli;
pub use output::console::ConsoleFormatter;
pub use output::messages::Messages;
pub use output::notifier::ConsoleNotifier;
pub use output::status::StatusReport;
pub use simulator::{SimulatorError, SimulatorRepl, Step};
