//! Config-file validity check.

use crate::checks::{Check, HealthIssue};
use crate::core::config::load_config;
use crate::core::error::HermitError;
use std::path::Path;

pub struct ConfigCheck;

impl Check for ConfigCheck {
    fn name(&self) -> &'static str {
        "config"
    }

    fn run(&self, root: &Path) -> Result<Vec<HealthIssue>, HermitError> {
        match load_config(root) {
            Ok(_) => Ok(Vec::new()),
            Err(e) => Ok(vec![HealthIssue::manual(e.to_string())]),
        }
    }
}
