//! World value objects
//!
//! The host describes its worlds and players with these types. Only the
//! overworld has a day/night cycle worth voting on, and only players in
//! survival or adventure mode are eligible to vote.

pub mod dimension;
pub mod game_mode;
pub mod time;

pub use dimension::Dimension;
pub use game_mode::GameMode;
pub use time::TimeOfDay;
