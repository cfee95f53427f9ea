//! Required-directory check.

use crate::checks::{Check, FixAction, HealthIssue};
use crate::core::error::HermitError;
use crate::core::layout::REQUIRED_DIRS;
use std::path::{Path, PathBuf};

pub struct LayoutCheck;

impl Check for LayoutCheck {
    fn name(&self) -> &'static str {
        "layout"
    }

    fn run(&self, root: &Path) -> Result<Vec<HealthIssue>, HermitError> {
        let mut issues = Vec::new();
        for dir in REQUIRED_DIRS {
            let path = root.join(dir);
            if path.is_dir() {
                continue;
            }
            if path.exists() {
                // A file squatting on a directory name cannot be repaired
                // without destroying data.
                issues.push(HealthIssue::manual(format!(
                    "layout path is not a directory: {}",
                    dir
                )));
            } else {
                issues.push(HealthIssue::fixable(
                    format!("required directory missing: {}", dir),
                    FixAction::CreateDir {
                        path: PathBuf::from(dir),
                    },
                    format!("create {}/", dir),
                ));
            }
        }
        Ok(issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_dirs_produce_fixable_issues() {
        let tmp = tempdir().unwrap();
        let issues = LayoutCheck.run(tmp.path()).unwrap();
        assert_eq!(issues.len(), REQUIRED_DIRS.len());
        assert!(issues.iter().all(|i| i.fix.is_some()));
    }

    #[test]
    fn complete_layout_is_clean() {
        let tmp = tempdir().unwrap();
        for dir in REQUIRED_DIRS {
            std::fs::create_dir_all(tmp.path().join(dir)).unwrap();
        }
        assert!(LayoutCheck.run(tmp.path()).unwrap().is_empty());
    }

    #[test]
    fn file_on_dir_name_needs_manual_fix() {
        let tmp = tempdir().unwrap();
        for dir in REQUIRED_DIRS {
            std::fs::create_dir_all(tmp.path().join(dir)).unwrap();
        }
        std::fs::remove_dir_all(tmp.path().join("90-99_ARCHIVE")).unwrap();
        std::fs::write(tmp.path().join("90-99_ARCHIVE"), "not a dir").unwrap();

        let issues = LayoutCheck.run(tmp.path()).unwrap();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].fix.is_none());
        assert!(issues[0].description.contains("not a directory"));
    }
}
