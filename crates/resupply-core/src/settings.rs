//! Tunable patch values
//!
//! All numeric rewrites performed by the patch engine are driven by these
//! settings. The defaults match the values the tool has always shipped with;
//! a JSON file can override any subset of them.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Numeric constants applied by the patch engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Factor applied to `{radius` values
    pub radius_multiplier: i64,
    /// Replacement for `{resupplyPeriod` values
    pub resupply_period: i64,
    /// Replacement for `{regenerationPeriod` values
    pub regeneration_period: i64,
    /// Factor applied to `{limit` values
    pub limit_multiplier: i64,
    /// Value to use when the limit is "%supply" instead of an integer
    pub limit_fallback: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            radius_multiplier: 4,
            resupply_period: 1,
            regeneration_period: 1,
            limit_multiplier: 10,
            limit_fallback: 2500,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file; missing keys keep their defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| Error::FileRead {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(Error::Json)
    }

    /// Save the settings to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
