//! Workspace scaffolding for `hermit init`.
//!
//! Creates the managed layout and seed files through the gateway.
//! Scaffolding is idempotent: existing directories are left alone and
//! existing files are never overwritten without `--force`.

use crate::core::assets;
use crate::core::error::HermitError;
use crate::core::gateway;
use crate::core::layout::{REQUIRED_DIRS, SEED_FILES};
use crate::core::output::Presenter;
use crate::core::store::HERMIT_DIR;
use std::path::{Path, PathBuf};

/// Scaffolding operation configuration.
pub struct ScaffoldOptions {
    /// Target directory (the workspace root to create or repair)
    pub target_dir: PathBuf,
    /// Overwrite existing seed files
    pub force: bool,
    /// Preview mode: log actions without writing
    pub dry_run: bool,
}

fn scaffold_file(
    opts: &ScaffoldOptions,
    presenter: &dyn Presenter,
    rel_path: &str,
    content: &str,
) -> Result<(), HermitError> {
    let dest = opts.target_dir.join(rel_path);

    if dest.exists() && !opts.force {
        presenter.line(&format!(
            "  exists: {} (pass --force to overwrite)",
            rel_path
        ));
        return Ok(());
    }

    if opts.dry_run {
        presenter.line(&format!("  would-write: {}", rel_path));
        return Ok(());
    }

    gateway::write_atomic(&opts.target_dir, Path::new(rel_path), content)?;
    presenter.line(&format!("  wrote: {}", rel_path));
    Ok(())
}

/// Create the layout directories, the `.hermit` state directory, and the
/// seed files.
pub fn scaffold_workspace(
    opts: &ScaffoldOptions,
    presenter: &dyn Presenter,
) -> Result<(), HermitError> {
    presenter.line(&format!(
        "Scaffolding workspace layout into {}",
        opts.target_dir.display()
    ));

    for rel in REQUIRED_DIRS.iter().chain([HERMIT_DIR].iter()) {
        let dest = opts.target_dir.join(rel);
        if opts.dry_run {
            if !dest.is_dir() {
                presenter.line(&format!("  would-create: {}/", rel));
            }
            continue;
        }
        let existed = dest.is_dir();
        gateway::ensure_dir(&opts.target_dir, Path::new(rel))?;
        if !existed {
            presenter.line(&format!("  created: {}/", rel));
        }
    }

    for (rel_path, template) in SEED_FILES {
        let content = assets::get_template(template).ok_or_else(|| {
            HermitError::NotFound(format!("embedded template missing: {}", template))
        })?;
        scaffold_file(opts, presenter, rel_path, content)?;
    }

    Ok(())
}
