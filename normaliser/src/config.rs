//! Run and application configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::partition::{validate_chunk_count, RemainderPolicy};
use crate::transform::TransformKind;

/// Parameters of a single normalisation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NormaliseConfig {
    /// Number of chunks, and so of worker threads and barrier parties.
    pub chunk_count: usize,
    pub remainder: RemainderPolicy,
    pub transform: TransformKind,
}

impl Default for NormaliseConfig {
    fn default() -> Self {
        Self {
            chunk_count: 2,
            remainder: RemainderPolicy::default(),
            transform: TransformKind::default(),
        }
    }
}

impl NormaliseConfig {
    pub fn new(chunk_count: usize) -> Self {
        Self {
            chunk_count,
            ..Default::default()
        }
    }

    /// Builder method to set the remainder policy.
    pub fn remainder(mut self, remainder: RemainderPolicy) -> Self {
        self.remainder = remainder;
        self
    }

    /// Builder method to set the transform.
    pub fn transform(mut self, transform: TransformKind) -> Self {
        self.transform = transform;
        self
    }

    /// Checks the chunk count against a grid of `height` rows.
    pub fn validate(&self, height: usize) -> Result<()> {
        validate_chunk_count(height, self.chunk_count)
    }
}

/// Settings of the `normaliser` binary, read from an optional TOML file.
///
/// ```toml
/// output = "output.png"
/// log_level = "debug"
/// chunk_count = 4
/// remainder = "extend-last"
/// transform = "channel-permutation"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub output: PathBuf,
    pub log_level: String,
    pub log_dir: PathBuf,
    /// When absent the binary asks for a chunk count interactively.
    pub chunk_count: Option<usize>,
    pub remainder: RemainderPolicy,
    pub transform: TransformKind,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("output.png"),
            log_level: "info".to_string(),
            log_dir: PathBuf::from("logs"),
            chunk_count: None,
            remainder: RemainderPolicy::default(),
            transform: TransformKind::default(),
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn normalise_config(&self, chunk_count: usize) -> NormaliseConfig {
        NormaliseConfig::new(chunk_count)
            .remainder(self.remainder)
            .transform(self.transform)
    }
}
