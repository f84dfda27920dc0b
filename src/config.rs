//! TOML configuration for the `signstat` binary
//!
//! ```toml
//! [context]
//! aggregation = "max"
//!
//! [paths]
//! seal_contexts = "data/ivs/features/seal_contexts.json"
//! ```

use crate::context::Aggregation;
use crate::seal::DEFAULT_SEAL_CONTEXT_PATH;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub context: ContextConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContextConfig {
    /// Unrecognized names fall back to `mean`
    #[serde(default)]
    pub aggregation: Aggregation,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathsConfig {
    #[serde(default = "default_seal_contexts")]
    pub seal_contexts: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            seal_contexts: default_seal_contexts(),
        }
    }
}

fn default_seal_contexts() -> PathBuf {
    PathBuf::from(DEFAULT_SEAL_CONTEXT_PATH)
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or is not valid configuration.
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read config file: {}", path.as_ref().display())
        })?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.as_ref().display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Configuration from `path`, or defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_toml(path),
            None => Ok(Self::default()),
        }
    }
}
