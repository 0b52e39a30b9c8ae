//! Runtime configuration
//!
//! Loaded from `ile.toml` in the working directory (or the file given with
//! `--config`), then overridden by `ILE_`-prefixed environment variables,
//! e.g. `ILE_TIMEOUT_MS=500`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use ile_application::MAX_PASSES;

/// Settings for the `ile` binary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// JSON store snapshot to read tables, images and auto-replies from.
    #[serde(default)]
    pub data_file: Option<PathBuf>,
    /// Overall expansion deadline in milliseconds; 0 disables it.
    pub timeout_ms: u64,
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Per-string pass cap, at most 100.
    pub max_passes: usize,
}

impl Settings {
    /// Loads settings from the optional file and the environment.
    ///
    /// # Errors
    /// Returns an error if an explicit file is missing or a value has the
    /// wrong type.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let file = match explicit {
            Some(path) => File::from(path).required(true),
            None => File::with_name("ile").required(false),
        };
        Self::from_sources(file, Environment::with_prefix("ILE").try_parsing(true))
    }

    fn from_sources(file: File<config::FileSourceFile, config::FileFormat>, env: Environment) -> Result<Self> {
        let mut settings: Self = Config::builder()
            .set_default("timeout_ms", 3000_i64)?
            .set_default("log_filter", "info")?
            .set_default("max_passes", i64::try_from(MAX_PASSES)?)?
            .add_source(file)
            .add_source(env)
            .build()
            .context("read configuration")?
            .try_deserialize()
            .context("parse configuration")?;
        settings.max_passes = settings.max_passes.min(MAX_PASSES);
        Ok(settings)
    }

    /// The expansion deadline, if any.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        if self.timeout_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.timeout_ms))
        }
    }
}
