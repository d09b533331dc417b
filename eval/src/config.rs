//! Reviewer configuration merging.
//!
//! Applies command-line overrides on top of the `review.toml` configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use reviewer::io::config::{ReviewerConfig, load_config};

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub data_dir: Option<PathBuf>,
    pub concurrency: Option<usize>,
}

/// Load the config file (defaults when missing) and apply overrides.
pub fn load(path: &Path, overrides: &Overrides) -> Result<ReviewerConfig> {
    let base = load_config(path).context("load config")?;
    apply_overrides(base, overrides)
}

/// Apply command-line overrides to the base config.
pub fn apply_overrides(mut base: ReviewerConfig, overrides: &Overrides) -> Result<ReviewerConfig> {
    if let Some(data_dir) = &overrides.data_dir {
        base.data_dir = data_dir.clone();
    }
    if let Some(concurrency) = overrides.concurrency {
        base.concurrency = concurrency;
    }
    base.validate()?;
    Ok(base)
}
