//! Configuration file loading for sleepvote
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. Project root: `./sleepvote.toml` or `./.sleepvote.toml`
//! 3. XDG config: `$XDG_CONFIG_HOME/sleepvote/config.toml`
//! 4. Default values
//!
//! [`FileVoteSettings`] wraps the merged result and implements the
//! application's `VoteSettings` port, writing toggles back on `persist`.

mod file_config;
mod loader;
mod settings;

pub use file_config::{ConfigValidationError, FileConfig};
pub use loader::ConfigLoader;
pub use settings::FileVoteSettings;
