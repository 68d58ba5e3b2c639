//! Interactive server simulator

mod repl;

pub use repl::{SimulatorError, SimulatorRepl, Step};
