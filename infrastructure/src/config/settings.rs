//! File-backed vote settings

use super::file_config::FileConfig;
use sleepvote_application::{SettingsError, VoteSettings};
use sleepvote_domain::{PartitionId, PassThreshold};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use tracing::{debug, warn};

/// [`VoteSettings`] backed by a [`FileConfig`]
///
/// The threshold is clamped once at construction, with a warning for
/// out-of-range values. World toggles live behind an `RwLock` and are
/// written back as TOML by [`persist`](VoteSettings::persist). Without a
/// path (`--no-config`) persisting is a no-op.
pub struct FileVoteSettings {
    config: RwLock<FileConfig>,
    path: Option<PathBuf>,
}

impl FileVoteSettings {
    pub fn new(mut config: FileConfig, path: Option<PathBuf>) -> Self {
        for issue in config.validate() {
            warn!("Config: {}", issue);
        }

        let (threshold, clamped) = PassThreshold::clamped(config.vote_percentage_threshold);
        if clamped {
            config.vote_percentage_threshold = threshold.percent() as i64;
        }

        Self {
            config: RwLock::new(config),
            path,
        }
    }

    /// Settings that are never written anywhere
    pub fn in_memory(config: FileConfig) -> Self {
        Self::new(config, None)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn language(&self) -> String {
        self.read().language.clone()
    }

    /// Copy of the current configuration
    pub fn snapshot(&self) -> FileConfig {
        self.read().clone()
    }

    fn read(&self) -> RwLockReadGuard<'_, FileConfig> {
        self.config.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, FileConfig> {
        self.config.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl VoteSettings for FileVoteSettings {
    fn revote_cooldown(&self) -> Duration {
        self.read().revote_cooldown()
    }

    fn vote_duration(&self) -> Duration {
        self.read().vote_time_limit()
    }

    fn pass_threshold(&self) -> PassThreshold {
        self.read().threshold()
    }

    fn is_partition_enabled(&self, partition: &PartitionId) -> bool {
        self.read().is_world_enabled(partition)
    }

    fn toggle_partition(&self, partition: &PartitionId) -> bool {
        let mut config = self.write();
        let enabled = !config.is_world_enabled(partition);
        config.worlds.insert(partition.to_string(), enabled);
        enabled
    }

    fn set_all_partitions(&self, enabled: bool, partitions: &[PartitionId]) {
        let mut config = self.write();
        for partition in partitions {
            config.worlds.insert(partition.to_string(), enabled);
        }
        for value in config.worlds.values_mut() {
            *value = enabled;
        }
    }

    fn persist(&self) -> Result<(), SettingsError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let content = toml::to_string_pretty(&*self.read())
            .map_err(|e| SettingsError::Serialize(e.to_string()))?;

        let io_error = |source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        };
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        std::fs::write(path, content).map_err(io_error)?;

        debug!(path = %path.display(), "Settings saved");
        Ok(())
    }
}
