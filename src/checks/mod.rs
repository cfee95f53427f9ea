//! Doctor: workspace health checks and repairs.
//!
//! A check is any unit implementing [`Check`]. The engine runs a fixed
//! registry of checks in registration order and isolates per-check
//! failures: one broken check never hides the diagnostics of the others.
//! Repairs are plain data ([`FixAction`]) interpreted by a small executor;
//! applying them requires explicit operator confirmation and goes through
//! the filesystem gateway like every other mutation.

pub mod config;
pub mod layout;
pub mod seeds;
pub mod state;
pub mod stray;

use crate::core::config::WorkspaceConfig;
use crate::core::error::HermitError;
use crate::core::output::{ItemStatus, Presenter};
use crate::core::store::{JOURNAL_FILE, Workspace};
use crate::core::{assets, gateway, time};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const MANUAL_FIX: &str = "Manual fix required";

/// A single detected problem, optionally with an associated repair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthIssue {
    pub description: String,
    pub fix: Option<FixAction>,
    pub fix_description: String,
}

impl HealthIssue {
    pub fn manual(description: impl Into<String>) -> Self {
        HealthIssue {
            description: description.into(),
            fix: None,
            fix_description: MANUAL_FIX.to_string(),
        }
    }

    pub fn fixable(
        description: impl Into<String>,
        fix: FixAction,
        fix_description: impl Into<String>,
    ) -> Self {
        HealthIssue {
            description: description.into(),
            fix: Some(fix),
            fix_description: fix_description.into(),
        }
    }
}

/// Repair strategies as data, so issues stay serializable and testable
/// without executable closures.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FixAction {
    CreateDir { path: PathBuf },
    WriteTemplate { path: PathBuf, template: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixOutcome {
    /// The repair ran.
    Applied,
    /// The target already carries the template content.
    Unchanged,
    /// The issue has no stored repair.
    ManualRequired,
}

/// Capability contract for a health check. Checks must be side-effect-free
/// except through the fix actions they return.
pub trait Check {
    fn name(&self) -> &'static str;
    fn run(&self, root: &Path) -> Result<Vec<HealthIssue>, HermitError>;
}

/// Ordered output of one full engine run.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub issues: Vec<HealthIssue>,
    pub checks_run: usize,
    pub failed_checks: usize,
}

/// Ordered registry of checks, fixed at construction.
pub struct CheckRegistry {
    checks: Vec<Box<dyn Check>>,
}

impl CheckRegistry {
    pub fn new(checks: Vec<Box<dyn Check>>) -> Self {
        CheckRegistry { checks }
    }

    /// Invoke each check in registration order. A check that fails
    /// internally is converted into a synthetic issue (no fix action) and
    /// the scan continues with the next check.
    pub fn run_all(&self, root: &Path) -> CheckReport {
        let mut issues = Vec::new();
        let mut failed_checks = 0;

        for check in &self.checks {
            match check.run(root) {
                Ok(mut found) => issues.append(&mut found),
                Err(e) => {
                    failed_checks += 1;
                    issues.push(HealthIssue::manual(format!(
                        "check '{}' failed internally: {}",
                        check.name(),
                        e
                    )));
                }
            }
        }

        CheckReport {
            issues,
            checks_run: self.checks.len(),
            failed_checks,
        }
    }
}

/// The built-in checks, in their fixed registration order.
pub fn default_registry() -> CheckRegistry {
    CheckRegistry::new(vec![
        Box::new(layout::LayoutCheck),
        Box::new(seeds::SeedCheck),
        Box::new(state::StateCheck),
        Box::new(config::ConfigCheck),
        Box::new(stray::StrayCheck),
    ])
}

/// Execute an issue's stored repair. Fix application is never automatic;
/// callers invoke this only after explicit confirmation.
pub fn apply_fix(root: &Path, issue: &HealthIssue) -> Result<FixOutcome, HermitError> {
    let Some(fix) = &issue.fix else {
        return Ok(FixOutcome::ManualRequired);
    };

    match fix {
        FixAction::CreateDir { path } => {
            gateway::ensure_dir(root, path)?;
            Ok(FixOutcome::Applied)
        }
        FixAction::WriteTemplate { path, template } => {
            let content = assets::get_template(template).ok_or_else(|| {
                HermitError::NotFound(format!("embedded template missing: {}", template))
            })?;
            if let Ok(existing) = gateway::read_to_string(root, path)
                && assets::content_checksum(&existing) == assets::content_checksum(content)
            {
                return Ok(FixOutcome::Unchanged);
            }
            gateway::write_atomic(root, path, content)?;
            Ok(FixOutcome::Applied)
        }
    }
}

// ===== Doctor CLI =====

#[derive(Parser, Debug)]
#[clap(name = "doctor", about = "Diagnose and repair the workspace")]
pub struct DoctorCli {
    #[clap(subcommand)]
    pub command: DoctorCommand,
}

#[derive(Subcommand, Debug)]
pub enum DoctorCommand {
    /// Run all workspace checks
    Check {
        /// Output format: 'text' or 'json'
        #[clap(long, default_value = "text")]
        format: String,
        /// Apply stored repairs (asks per issue unless --yes)
        #[clap(long)]
        fix: bool,
        /// Assume yes for every repair confirmation
        #[clap(long)]
        yes: bool,
    },
}

pub fn run_doctor_cli(
    workspace: &Workspace,
    config: &WorkspaceConfig,
    presenter: &dyn Presenter,
    cli: DoctorCli,
) -> Result<(), HermitError> {
    match cli.command {
        DoctorCommand::Check { format, fix, yes } => {
            let registry = default_registry();
            let mut report = registry.run_all(&workspace.root);

            if config.doctor.journal {
                journal_scan(workspace, &report)?;
            }

            if fix && !report.issues.is_empty() {
                apply_fixes(workspace, presenter, &report.issues, yes)?;
                report = registry.run_all(&workspace.root);
            }

            if format == "json" {
                presenter.line(
                    &serde_json::to_string_pretty(&report)
                        .map_err(|e| HermitError::ValidationError(e.to_string()))?,
                );
            } else {
                render_report(presenter, &report);
            }

            if !report.issues.is_empty() {
                return Err(HermitError::ValidationError(format!(
                    "doctor: {} issue(s) found",
                    report.issues.len()
                )));
            }
            Ok(())
        }
    }
}

fn render_report(presenter: &dyn Presenter, report: &CheckReport) {
    presenter.section("Workspace health");
    if report.issues.is_empty() {
        presenter.item(
            ItemStatus::Pass,
            &format!("all {} checks passed", report.checks_run),
        );
        return;
    }
    for issue in &report.issues {
        presenter.item(ItemStatus::Fail, &issue.description);
        presenter.line(&format!("        fix: {}", issue.fix_description));
    }
    presenter.line("");
    presenter.line(&format!(
        "{} issue(s) across {} checks ({} check failure(s))",
        report.issues.len(),
        report.checks_run,
        report.failed_checks
    ));
}

fn apply_fixes(
    workspace: &Workspace,
    presenter: &dyn Presenter,
    issues: &[HealthIssue],
    assume_yes: bool,
) -> Result<(), HermitError> {
    presenter.section("Repairs");
    for issue in issues {
        if issue.fix.is_none() {
            presenter.item(
                ItemStatus::Skipped,
                &format!("{} ({})", issue.description, issue.fix_description),
            );
            continue;
        }
        if !assume_yes && !confirm(&format!("{}: {}?", issue.description, issue.fix_description)) {
            presenter.item(ItemStatus::Skipped, &issue.description);
            continue;
        }
        match apply_fix(&workspace.root, issue)? {
            FixOutcome::Applied => presenter.item(ItemStatus::Fixed, &issue.fix_description),
            FixOutcome::Unchanged => presenter.item(
                ItemStatus::Skipped,
                &format!("{} (already up to date)", issue.fix_description),
            ),
            FixOutcome::ManualRequired => {
                presenter.item(ItemStatus::Skipped, &issue.description)
            }
        }
    }
    Ok(())
}

fn confirm(prompt: &str) -> bool {
    use std::io::Write;
    print!("{} [y/N] ", prompt);
    let _ = std::io::stdout().flush();
    let mut answer = String::new();
    if std::io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim(), "y" | "Y" | "yes")
}

fn journal_scan(workspace: &Workspace, report: &CheckReport) -> Result<(), HermitError> {
    let event = serde_json::json!({
        "ts": time::now_epoch_z(),
        "event_id": time::new_event_id(),
        "type": "doctor.run",
        "issues": report.issues.len(),
        "checks_run": report.checks_run,
        "failed_checks": report.failed_checks,
    });
    gateway::append_line(
        &workspace.root,
        Path::new(JOURNAL_FILE),
        &serde_json::to_string(&event)
            .map_err(|e| HermitError::ValidationError(e.to_string()))?,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    struct PassingCheck(&'static str, usize);

    impl Check for PassingCheck {
        fn name(&self) -> &'static str {
            self.0
        }
        fn run(&self, _root: &Path) -> Result<Vec<HealthIssue>, HermitError> {
            Ok((0..self.1)
                .map(|i| HealthIssue::manual(format!("{} issue {}", self.0, i)))
                .collect())
        }
    }

    struct BrokenCheck;

    impl Check for BrokenCheck {
        fn name(&self) -> &'static str {
            "broken"
        }
        fn run(&self, _root: &Path) -> Result<Vec<HealthIssue>, HermitError> {
            Err(HermitError::CheckFailed("boom".to_string()))
        }
    }

    #[test]
    fn broken_check_is_isolated() {
        let tmp = tempdir().unwrap();
        let registry = CheckRegistry::new(vec![
            Box::new(PassingCheck("first", 1)),
            Box::new(BrokenCheck),
            Box::new(PassingCheck("second", 1)),
        ]);
        let report = registry.run_all(tmp.path());

        assert_eq!(report.checks_run, 3);
        assert_eq!(report.failed_checks, 1);
        assert_eq!(report.issues.len(), 3);
        assert_eq!(report.issues[0].description, "first issue 0");
        assert!(report.issues[1].description.contains("'broken' failed internally"));
        assert!(report.issues[1].fix.is_none());
        assert_eq!(report.issues[2].description, "second issue 0");
    }

    #[test]
    fn issue_order_follows_registration_then_emission() {
        let tmp = tempdir().unwrap();
        let registry = CheckRegistry::new(vec![
            Box::new(PassingCheck("a", 2)),
            Box::new(PassingCheck("b", 1)),
        ]);
        let descriptions: Vec<String> = registry
            .run_all(tmp.path())
            .issues
            .into_iter()
            .map(|i| i.description)
            .collect();
        assert_eq!(descriptions, vec!["a issue 0", "a issue 1", "b issue 0"]);
    }

    #[test]
    fn apply_fix_without_action_is_manual() {
        let tmp = tempdir().unwrap();
        let issue = HealthIssue::manual("nothing stored");
        assert_eq!(
            apply_fix(tmp.path(), &issue).unwrap(),
            FixOutcome::ManualRequired
        );
    }

    #[test]
    fn fix_action_serializes_as_tagged_variant() {
        let fix = FixAction::CreateDir {
            path: PathBuf::from("10-19_PROJECTS"),
        };
        let json = serde_json::to_value(&fix).unwrap();
        assert_eq!(json["kind"], "create_dir");
        assert_eq!(json["path"], "10-19_PROJECTS");
    }
}
