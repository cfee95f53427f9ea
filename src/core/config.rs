//! Optional workspace configuration at `.hermit/config.toml`.
//!
//! Absent file means defaults. A malformed file is an error here; callers
//! decide whether that is fatal (the doctor reports it as an issue, the
//! CLI warns and falls back to defaults).

use crate::core::error::HermitError;
use crate::core::store::CONFIG_FILE;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkspaceConfig {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub doctor: DoctorConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Force color on/off; unset defers to the terminal and NO_COLOR.
    pub color: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DoctorConfig {
    /// Append a journal line to `.hermit/doctor.events.jsonl` per scan.
    #[serde(default = "default_journal")]
    pub journal: bool,
}

impl Default for DoctorConfig {
    fn default() -> Self {
        DoctorConfig {
            journal: default_journal(),
        }
    }
}

fn default_journal() -> bool {
    true
}

pub fn load_config(root: &Path) -> Result<WorkspaceConfig, HermitError> {
    let path = root.join(CONFIG_FILE);
    if !path.is_file() {
        return Ok(WorkspaceConfig::default());
    }
    let content = std::fs::read_to_string(&path)?;
    toml::from_str(&content)
        .map_err(|e| HermitError::ValidationError(format!("invalid {}: {}", CONFIG_FILE, e)))
}
