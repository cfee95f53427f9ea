//! Workspace handle and well-known paths.
//!
//! A `Workspace` is the root directory all hermit operations are confined
//! to. Durable state lives under `<root>/.hermit/`: the onboarding
//! snapshot, the optional config file, and the doctor scan journal.

use crate::core::error::HermitError;
use std::path::{Path, PathBuf};

pub const HERMIT_DIR: &str = ".hermit";
pub const STATE_FILE: &str = ".hermit/onboarding.json";
pub const CONFIG_FILE: &str = ".hermit/config.toml";
pub const JOURNAL_FILE: &str = ".hermit/doctor.events.jsonl";

/// Handle for a hermit-managed workspace.
#[derive(Debug, Clone)]
pub struct Workspace {
    /// Absolute path to the workspace root directory
    pub root: PathBuf,
}

impl Workspace {
    pub fn new(root: PathBuf) -> Self {
        Workspace { root }
    }

    pub fn hermit_dir(&self) -> PathBuf {
        self.root.join(HERMIT_DIR)
    }

    pub fn state_path(&self) -> PathBuf {
        self.root.join(STATE_FILE)
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    pub fn journal_path(&self) -> PathBuf {
        self.root.join(JOURNAL_FILE)
    }
}

/// Locate the workspace root by walking up from `start_dir` until a
/// `.hermit` directory is found.
pub fn find_workspace_root(start_dir: &Path) -> Result<PathBuf, HermitError> {
    let mut current_dir = PathBuf::from(start_dir);
    loop {
        if current_dir.join(HERMIT_DIR).exists() {
            return Ok(current_dir);
        }
        if !current_dir.pop() {
            return Err(HermitError::NotFound(
                "'.hermit' directory not found in current or parent directories. Run `hermit init` first.".to_string(),
            ));
        }
    }
}
