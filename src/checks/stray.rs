//! Stray top-level entry check.
//!
//! Anything at the workspace root that is neither a dotfile nor part of
//! the managed layout is clutter the layout exists to prevent. Moving it
//! is a judgement call, so the issue carries no stored repair.

use crate::checks::{Check, HealthIssue};
use crate::core::error::HermitError;
use crate::core::layout::is_layout_entry;
use std::path::Path;

pub struct StrayCheck;

impl Check for StrayCheck {
    fn name(&self) -> &'static str {
        "stray"
    }

    fn run(&self, root: &Path) -> Result<Vec<HealthIssue>, HermitError> {
        let mut names: Vec<String> = Vec::new();
        for entry in std::fs::read_dir(root)
            .map_err(|e| HermitError::CheckFailed(format!("cannot list workspace root: {}", e)))?
        {
            let entry =
                entry.map_err(|e| HermitError::CheckFailed(format!("cannot list entry: {}", e)))?;
            let name = entry.file_name().to_string_lossy().to_string();
            if !is_layout_entry(&name) {
                names.push(name);
            }
        }
        // read_dir order is platform-dependent; reports must not be.
        names.sort();
        Ok(names
            .into_iter()
            .map(|name| {
                HealthIssue::manual(format!(
                    "stray entry at workspace root: {} (move it into an area or 00-09_SYSTEM/00_inbox)",
                    name
                ))
            })
            .collect())
    }
}
