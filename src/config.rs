// src/config.rs

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{Result, TraceError};
use crate::export::DEFAULT_OUTPUT;
use crate::stats::Granularity;

pub const CONFIG_ENV: &str = "MXTRACE_CONFIG";
pub const OUTPUT_ENV: &str = "MXTRACE_OUTPUT";
pub const GRANULARITY_ENV: &str = "MXTRACE_GRANULARITY";

/// Run settings. Priority: CLI flags > environment > config file > defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    pub output: PathBuf,
    pub granularity: Granularity,
    /// Rows shown in the "top error codes" section.
    pub top_codes: usize,
    /// Rows shown in the "frequent messages" section.
    pub top_messages: usize,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
            granularity: Granularity::Hourly,
            top_codes: 10,
            top_messages: 20,
        }
    }
}

impl TraceConfig {
    /// Loads `explicit` if given, else the file named by `MXTRACE_CONFIG`,
    /// else defaults; then applies environment overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        Self::load_with(explicit, |key| std::env::var(key).ok())
    }

    /// `load` with a custom environment lookup.
    pub fn load_with<F>(explicit: Option<&Path>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| lookup(CONFIG_ENV).map(PathBuf::from));

        let mut config = match path {
            Some(path) => {
                info!("Loading configuration from: {}", path.display());
                Self::from_file(&path)?
            }
            None => {
                debug!("No config file given, using defaults");
                Self::default()
            }
        };

        config.apply_env(lookup)?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| TraceError::io(path, e))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Overrides fields from environment-style lookups.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(output) = lookup(OUTPUT_ENV) {
            self.output = PathBuf::from(output);
        }
        if let Some(granularity) = lookup(GRANULARITY_ENV) {
            self.granularity = granularity.parse()?;
        }
        Ok(())
    }
}
