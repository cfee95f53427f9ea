//! The enforced workspace layout.
//!
//! Hermit manages a Johnny-Decimal-style directory tree: numbered areas at
//! the root, an inbox for uncategorized material, and a dedicated context
//! directory for local AI tooling. The tables here are the single source
//! of truth consumed by scaffolding, the doctor checks, and the onboarding
//! catalog.

/// Directories that must exist in a healthy workspace, in scaffold order.
pub const REQUIRED_DIRS: &[&str] = &[
    "00-09_SYSTEM/00_inbox",
    "10-19_PROJECTS",
    "20-29_AREAS",
    "30-39_OPERATIONS/30_ai/31_ai_local/context",
    "90-99_ARCHIVE",
];

/// Seed files: workspace-relative path and the embedded template that
/// provides its initial content.
pub const SEED_FILES: &[(&str, &str)] = &[
    ("WORKSPACE.md", "WORKSPACE.md"),
    ("00-09_SYSTEM/00_inbox/README.md", "INBOX.md"),
    (
        "30-39_OPERATIONS/30_ai/31_ai_local/context/CONTEXT.md",
        "CONTEXT.md",
    ),
    ("90-99_ARCHIVE/README.md", "ARCHIVE.md"),
];

/// Top-level names that legitimately live at the workspace root besides
/// the numbered areas.
pub const ROOT_ALLOWLIST: &[&str] = &["WORKSPACE.md"];

/// Whether a top-level entry name belongs to the managed layout.
pub fn is_layout_entry(name: &str) -> bool {
    if name.starts_with('.') {
        return true;
    }
    if ROOT_ALLOWLIST.contains(&name) {
        return true;
    }
    REQUIRED_DIRS
        .iter()
        .any(|dir| dir.split('/').next() == Some(name))
}
