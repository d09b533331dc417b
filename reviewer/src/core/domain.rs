//! Benchmark domains and run-name parsing.

use std::fmt;
use std::str::FromStr;

use anyhow::{Result, bail};

/// Customer-service domain a task set belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Domain {
    Airline,
    Retail,
    Telecom,
}

impl Domain {
    pub const ALL: [Domain; 3] = [Domain::Airline, Domain::Retail, Domain::Telecom];

    pub fn as_str(self) -> &'static str {
        match self {
            Domain::Airline => "airline",
            Domain::Retail => "retail",
            Domain::Telecom => "telecom",
        }
    }

    /// Domain encoded in a run name: the prefix before the first `-`.
    ///
    /// `airline-gpt4.1-mini.json` belongs to [`Domain::Airline`].
    pub fn from_run_name(name: &str) -> Result<Self> {
        let prefix = name.split('-').next().unwrap_or_default();
        prefix.parse()
    }
}

impl FromStr for Domain {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "airline" => Ok(Domain::Airline),
            "retail" => Ok(Domain::Retail),
            "telecom" => Ok(Domain::Telecom),
            other => bail!("unknown domain {other:?} (expected airline, retail or telecom)"),
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
