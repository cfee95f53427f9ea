//! Onboarding progress tracker.
//!
//! A persisted checklist over the workspace layout. Each item carries a
//! declarative detection rule evaluated against the workspace; items move
//! one way, pending → completed, and a later failure of the rule never
//! takes recorded progress back. The full state is one JSON snapshot
//! written atomically through the gateway.

use crate::core::error::HermitError;
use crate::core::gateway;
use crate::core::output::{ItemStatus, Presenter};
use crate::core::store::{STATE_FILE, Workspace};
use crate::core::time;
use clap::{Parser, Subcommand};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const STATE_VERSION: u32 = 1;

/// Declarative detection predicate, evaluated by a small interpreter so
/// that detection logic is data: serializable and independently testable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DetectionRule {
    PathExists { path: PathBuf },
    FileContains { path: PathBuf, needle: String },
    FileMatches { path: PathBuf, pattern: String },
    DirNotEmpty { path: PathBuf },
}

impl DetectionRule {
    /// Whether the rule currently holds. Probe failures (unreadable file,
    /// invalid pattern, escaping path) count as "does not hold"; a
    /// misfiring probe must never abort a refresh.
    pub fn evaluate(&self, root: &Path) -> bool {
        match self {
            DetectionRule::PathExists { path } => gateway::assert_safe_path(root, path)
                .map(|p| p.exists())
                .unwrap_or(false),
            DetectionRule::FileContains { path, needle } => gateway::read_to_string(root, path)
                .map(|content| content.contains(needle))
                .unwrap_or(false),
            DetectionRule::FileMatches { path, pattern } => {
                let Ok(re) = Regex::new(pattern) else {
                    return false;
                };
                gateway::read_to_string(root, path)
                    .map(|content| re.is_match(&content))
                    .unwrap_or(false)
            }
            DetectionRule::DirNotEmpty { path } => gateway::assert_safe_path(root, path)
                .ok()
                .and_then(|p| std::fs::read_dir(p).ok())
                .map(|mut entries| entries.next().is_some())
                .unwrap_or(false),
        }
    }
}

/// One checklist entry. `completed` is monotonic; `completed_at` is set
/// exactly once, at the transition.
#[derive(Debug, Clone)]
pub struct OnboardingItem {
    pub id: String,
    pub description: String,
    pub rule: DetectionRule,
    pub completed: bool,
    pub completed_at: Option<String>,
}

/// Ordered checklist plus schema version; the sole unit of persistence.
#[derive(Debug, Clone)]
pub struct OnboardingState {
    pub version: u32,
    pub items: Vec<OnboardingItem>,
}

/// On-disk schema. Detection rules live in the built-in catalog, not in
/// the file; only progress is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedState {
    pub version: u32,
    pub items: Vec<PersistedItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedItem {
    pub id: String,
    pub description: String,
    pub completed: bool,
    pub completed_at: Option<String>,
}

/// Result of loading state from disk.
pub struct StateLoad {
    pub state: OnboardingState,
    /// Warning text when a corrupt snapshot was replaced by a fresh one.
    pub recovered: Option<String>,
}

/// The built-in checklist, in evaluation order.
pub fn default_items() -> Vec<OnboardingItem> {
    let catalog: Vec<(&str, &str, DetectionRule)> = vec![
        (
            "workspace-initialized",
            "Initialize hermit in the workspace",
            DetectionRule::PathExists {
                path: PathBuf::from(".hermit"),
            },
        ),
        (
            "layout-created",
            "Create the numbered area layout",
            DetectionRule::PathExists {
                path: PathBuf::from("30-39_OPERATIONS/30_ai/31_ai_local/context"),
            },
        ),
        (
            "inbox-seeded",
            "Seed the inbox with its README",
            DetectionRule::PathExists {
                path: PathBuf::from("00-09_SYSTEM/00_inbox/README.md"),
            },
        ),
        (
            "workspace-owned",
            "Put your name in WORKSPACE.md",
            DetectionRule::FileMatches {
                path: PathBuf::from("WORKSPACE.md"),
                pattern: r"(?m)^owner:\s*[^(\s].*$".to_string(),
            },
        ),
        (
            "first-project",
            "Start your first project under 10-19_PROJECTS",
            DetectionRule::DirNotEmpty {
                path: PathBuf::from("10-19_PROJECTS"),
            },
        ),
        (
            "context-primed",
            "Add a `##` section about this workspace to the AI context file",
            DetectionRule::FileContains {
                path: PathBuf::from("30-39_OPERATIONS/30_ai/31_ai_local/context/CONTEXT.md"),
                needle: "## ".to_string(),
            },
        ),
    ];

    catalog
        .into_iter()
        .map(|(id, description, rule)| OnboardingItem {
            id: id.to_string(),
            description: description.to_string(),
            rule,
            completed: false,
            completed_at: None,
        })
        .collect()
}

fn fresh_state() -> OnboardingState {
    OnboardingState {
        version: STATE_VERSION,
        items: default_items(),
    }
}

/// Parse and validate persisted state content. Used both by `load` and by
/// the doctor's state check.
pub fn parse_state_content(content: &str) -> Result<PersistedState, HermitError> {
    let persisted: PersistedState = serde_json::from_str(content)
        .map_err(|e| HermitError::CorruptState(e.to_string()))?;
    if persisted.version != STATE_VERSION {
        return Err(HermitError::CorruptState(format!(
            "unsupported state version {} (expected {})",
            persisted.version, STATE_VERSION
        )));
    }
    Ok(persisted)
}

/// Read persisted state. Absent → fresh state, no warning. Unreadable or
/// malformed → fresh state plus a recovery warning; never fatal. Records
/// merge with the built-in catalog by id, in catalog order; ids the
/// catalog no longer knows are dropped.
pub fn load(root: &Path) -> StateLoad {
    let path = root.join(STATE_FILE);
    if !path.is_file() {
        return StateLoad {
            state: fresh_state(),
            recovered: None,
        };
    }

    let parsed = std::fs::read_to_string(&path)
        .map_err(|e| HermitError::CorruptState(e.to_string()))
        .and_then(|content| parse_state_content(&content));

    match parsed {
        Ok(persisted) => {
            let mut state = fresh_state();
            for item in &mut state.items {
                if let Some(record) = persisted.items.iter().find(|r| r.id == item.id)
                    && record.completed
                {
                    item.completed = true;
                    item.completed_at = record.completed_at.clone();
                }
            }
            StateLoad {
                state,
                recovered: None,
            }
        }
        Err(e) => StateLoad {
            state: fresh_state(),
            recovered: Some(format!(
                "onboarding state was unreadable and has been reinitialized ({})",
                e
            )),
        },
    }
}

/// Evaluate detection for every still-pending item, in item order, and
/// complete the ones whose rule currently holds. Completed items are never
/// re-evaluated. Returns the number of transitions.
pub fn refresh(state: &mut OnboardingState, root: &Path) -> usize {
    let mut transitions = 0;
    for item in &mut state.items {
        if item.completed {
            continue;
        }
        if item.rule.evaluate(root) {
            item.completed = true;
            item.completed_at = Some(time::now_epoch_z());
            transitions += 1;
        }
    }
    transitions
}

/// Serialize the full state and write it atomically: the on-disk snapshot
/// is always either the previous complete state or the new complete state.
pub fn persist(state: &OnboardingState, root: &Path) -> Result<(), HermitError> {
    let persisted = PersistedState {
        version: state.version,
        items: state
            .items
            .iter()
            .map(|item| PersistedItem {
                id: item.id.clone(),
                description: item.description.clone(),
                completed: item.completed,
                completed_at: item.completed_at.clone(),
            })
            .collect(),
    };
    let json = serde_json::to_string_pretty(&persisted)
        .map_err(|e| HermitError::ValidationError(e.to_string()))?;
    gateway::write_atomic(root, Path::new(STATE_FILE), &json)
}

/// Completed fraction in `[0, 1]`; an empty checklist is 0, not an error.
pub fn progress_fraction(state: &OnboardingState) -> f64 {
    if state.items.is_empty() {
        return 0.0;
    }
    let completed = state.items.iter().filter(|i| i.completed).count();
    completed as f64 / state.items.len() as f64
}

// ===== Onboard CLI =====

#[derive(Parser, Debug)]
#[clap(name = "onboard", about = "Track onboarding progress")]
pub struct OnboardCli {
    #[clap(subcommand)]
    pub command: OnboardCommand,
}

#[derive(Subcommand, Debug)]
pub enum OnboardCommand {
    /// Refresh detection and show the checklist
    Status {
        /// Output format: 'text' or 'json'
        #[clap(long, default_value = "text")]
        format: String,
    },
}

pub fn run_onboard_cli(
    workspace: &Workspace,
    presenter: &dyn Presenter,
    cli: OnboardCli,
) -> Result<(), HermitError> {
    match cli.command {
        OnboardCommand::Status { format } => {
            let StateLoad {
                mut state,
                recovered,
            } = load(&workspace.root);
            if let Some(warning) = &recovered {
                presenter.warn(warning);
            }
            refresh(&mut state, &workspace.root);
            persist(&state, &workspace.root)?;

            if format == "json" {
                let completed = state.items.iter().filter(|i| i.completed).count();
                let report = serde_json::json!({
                    "version": state.version,
                    "progress": progress_fraction(&state),
                    "completed": completed,
                    "total": state.items.len(),
                    "items": state.items.iter().map(|item| serde_json::json!({
                        "id": item.id,
                        "description": item.description,
                        "completed": item.completed,
                        "completed_at": item.completed_at,
                    })).collect::<Vec<_>>(),
                });
                presenter.line(
                    &serde_json::to_string_pretty(&report)
                        .map_err(|e| HermitError::ValidationError(e.to_string()))?,
                );
            } else {
                render_status(presenter, &state);
            }
            Ok(())
        }
    }
}

fn render_status(presenter: &dyn Presenter, state: &OnboardingState) {
    presenter.section("Onboarding progress");
    for item in &state.items {
        let status = if item.completed {
            ItemStatus::Pass
        } else {
            ItemStatus::Info
        };
        presenter.item(status, &item.description);
    }
    let completed = state.items.iter().filter(|i| i.completed).count();
    presenter.line("");
    presenter.line(&format!(
        "{}/{} complete ({:.0}%)",
        completed,
        state.items.len(),
        progress_fraction(state) * 100.0
    ));
}
