//! Seed-file check.

use crate::checks::{Check, FixAction, HealthIssue};
use crate::core::error::HermitError;
use crate::core::layout::SEED_FILES;
use std::path::{Path, PathBuf};

pub struct SeedCheck;

impl Check for SeedCheck {
    fn name(&self) -> &'static str {
        "seeds"
    }

    fn run(&self, root: &Path) -> Result<Vec<HealthIssue>, HermitError> {
        let mut issues = Vec::new();
        for (rel_path, template) in SEED_FILES {
            let path = root.join(rel_path);
            let missing = !path.is_file();
            let empty = !missing
                && std::fs::metadata(&path).map(|m| m.len() == 0).unwrap_or(false);
            if !missing && !empty {
                continue;
            }
            let what = if missing { "missing" } else { "empty" };
            issues.push(HealthIssue::fixable(
                format!("seed file {}: {}", what, rel_path),
                FixAction::WriteTemplate {
                    path: PathBuf::from(*rel_path),
                    template: (*template).to_string(),
                },
                format!("restore {} from embedded template", rel_path),
            ));
        }
        Ok(issues)
    }
}
