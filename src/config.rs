use crate::{WipeError, WipeResult};
use ::config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Runtime settings for the session manager and CLI
///
/// Layered: built-in defaults, then a TOML file, then `SHRED_*`
/// environment variables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ShredConfig {
    /// Delay between instrumented passes of a per-file session
    pub pass_delay_ms: u64,
    /// Delay between the simulated passes of a wipe-all session
    pub wipe_all_pass_delay_ms: u64,
    /// Sessions allowed to run at once; the rest wait for a slot
    pub max_concurrent_sessions: usize,
    /// Status polling interval used by `wait` and the CLI
    pub poll_interval_ms: u64,
}

impl Default for ShredConfig {
    fn default() -> Self {
        Self {
            pass_delay_ms: 1000,
            wipe_all_pass_delay_ms: 2000,
            max_concurrent_sessions: num_cpus::get().max(1),
            poll_interval_ms: 250,
        }
    }
}

impl ShredConfig {
    pub const ENV_PREFIX: &'static str = "SHRED";

    /// Load settings. An explicit file must exist; the default file is optional.
    pub fn load(explicit: Option<&Path>) -> WipeResult<Self> {
        let mut builder = Config::builder();

        match explicit {
            Some(path) => {
                builder = builder.add_source(File::from(path).required(true));
            }
            None => {
                if let Some(path) = Self::default_path() {
                    builder = builder.add_source(File::from(path.as_path()).required(false));
                }
            }
        }

        let config: ShredConfig = builder
            .add_source(Environment::with_prefix(Self::ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        tracing::debug!(?config, "Configuration loaded");
        Ok(config)
    }

    /// `config.toml` in the platform config directory
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "sayonara", "shred").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn validate(&self) -> WipeResult<()> {
        if self.max_concurrent_sessions == 0 {
            return Err(WipeError::Config(
                "max_concurrent_sessions must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn pass_delay(&self) -> Duration {
        Duration::from_millis(self.pass_delay_ms)
    }

    pub fn wipe_all_pass_delay(&self) -> Duration {
        Duration::from_millis(self.wipe_all_pass_delay_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
