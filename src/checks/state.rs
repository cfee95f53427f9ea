//! Onboarding-state integrity check.
//!
//! An absent state file is healthy (the tracker starts fresh). A present
//! but unparseable one is reported with a manual fix: the repair path is
//! the tracker's own recover-on-load, never a rewrite from here that could
//! silently discard recorded progress.

use crate::checks::{Check, HealthIssue};
use crate::core::error::HermitError;
use crate::core::store::STATE_FILE;
use crate::onboarding;
use std::path::Path;

pub struct StateCheck;

impl Check for StateCheck {
    fn name(&self) -> &'static str {
        "state"
    }

    fn run(&self, root: &Path) -> Result<Vec<HealthIssue>, HermitError> {
        let path = root.join(STATE_FILE);
        if !path.is_file() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&path)
            .map_err(|e| HermitError::CheckFailed(format!("cannot read {}: {}", STATE_FILE, e)))?;
        match onboarding::parse_state_content(&content) {
            Ok(_) => Ok(Vec::new()),
            Err(e) => Ok(vec![HealthIssue::manual(format!(
                "onboarding state is unreadable ({}); the next `hermit onboard status` reinitializes it",
                e
            ))]),
        }
    }
}
