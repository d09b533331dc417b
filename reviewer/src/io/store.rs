//! Read access to task and simulation files, persistence of reviews.
//!
//! Layout under the data directory:
//!
//! ```text
//! tau2/domains/{domain}/tasks.json   task definitions
//! simulations/{name}                 simulation runs
//! reviews/{name}                     review records (JSON array)
//! reviews_readable/{name}.txt        readable review report
//! ```

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::core::domain::Domain;
use crate::core::types::{ReviewRecord, Simulation, SimulationRun, Task};

/// Paths of every file the pipeline reads or writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub root: PathBuf,
}

impl DataPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn tasks(&self, domain: Domain) -> PathBuf {
        self.root
            .join("tau2")
            .join("domains")
            .join(domain.as_str())
            .join("tasks.json")
    }

    pub fn simulations(&self, name: &str) -> PathBuf {
        self.root.join("simulations").join(name)
    }

    pub fn reviews(&self, name: &str) -> PathBuf {
        self.root.join("reviews").join(name)
    }

    pub fn readable(&self, name: &str) -> PathBuf {
        self.root
            .join("reviews_readable")
            .join(format!("{name}.txt"))
    }
}

/// Check that a run name is a plain file name.
pub fn validate_run_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        bail!("run name must be non-empty");
    }
    if name.contains('/') || name.contains('\\') {
        bail!("run name must not contain path separators");
    }
    if name.contains("..") {
        bail!("run name must not contain '..'");
    }
    Ok(())
}

pub fn load_tasks(paths: &DataPaths, domain: Domain) -> Result<Vec<Task>> {
    read_json(&paths.tasks(domain))
}

pub fn load_simulations(paths: &DataPaths, name: &str) -> Result<Vec<Simulation>> {
    validate_run_name(name)?;
    let run: SimulationRun = read_json(&paths.simulations(name))?;
    Ok(run.simulations)
}

pub fn load_reviews(paths: &DataPaths, name: &str) -> Result<Vec<ReviewRecord>> {
    validate_run_name(name)?;
    read_json(&paths.reviews(name))
}

/// Atomically write the review file for a run, creating parent directories.
#[instrument(skip_all, fields(run = %name, records = records.len()))]
pub fn write_reviews(paths: &DataPaths, name: &str, records: &[ReviewRecord]) -> Result<PathBuf> {
    validate_run_name(name)?;
    let path = paths.reviews(name);
    write_json(&path, records)?;
    debug!(path = %path.display(), "reviews written");
    Ok(path)
}

pub fn write_readable(paths: &DataPaths, name: &str, text: &str) -> Result<PathBuf> {
    validate_run_name(name)?;
    let path = paths.readable(name);
    write_atomic(&path, text)?;
    Ok(path)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parse {}", path.display()))
}

/// Serialize `value` to pretty-printed JSON with trailing newline.
fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut payload = serde_json::to_string_pretty(value).context("serialize json")?;
    payload.push('\n');
    write_atomic(path, &payload)
}

/// Temp file + rename, so readers never see a partial file.
fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let mut tmp_name = OsString::from(path.as_os_str());
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);
    fs::write(&tmp_path, contents).with_context(|| format!("write {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace {}", path.display()))?;
    Ok(())
}
