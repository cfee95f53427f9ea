//! Safe filesystem gateway: path containment and crash-resistant writes.
//!
//! Every mutation in the system funnels through this module so that
//! path-escape and partial-write bugs are eliminated in one place:
//! - `assert_safe_path` resolves symlinks and rejects anything that leaves
//!   the workspace root
//! - `ensure_dir` is idempotent directory creation
//! - `write_atomic` is temp-file + fsync + rename, all-or-nothing
//!
//! Collaborators (scaffold, doctor, onboarding tracker) must not bypass
//! these operations for workspace I/O.

use crate::core::error::HermitError;
use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use ulid::Ulid;

/// Resolve `path` (absolute, or relative to `root`) to an absolute,
/// symlink-resolved form and verify it is equal to or a descendant of
/// `root`. Fails with `HermitError::PathEscape` otherwise; never silently
/// corrects the path.
pub fn assert_safe_path(root: &Path, path: &Path) -> Result<PathBuf, HermitError> {
    let canonical_root = fs::canonicalize(root)?;
    let candidate = if path.is_absolute() {
        path.to_path_buf()
    } else {
        canonical_root.join(path)
    };

    // Walk the candidate component by component. Symlinks are resolved the
    // moment they are encountered so that a later `..` pops a component of
    // the link *target*, not of the link name.
    let mut resolved = PathBuf::new();
    for component in candidate.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => {
                resolved.push(component.as_os_str());
            }
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            Component::Normal(name) => {
                resolved.push(name);
                let is_symlink = fs::symlink_metadata(&resolved)
                    .map(|m| m.file_type().is_symlink())
                    .unwrap_or(false);
                if is_symlink {
                    resolved = fs::canonicalize(&resolved)?;
                }
            }
        }
    }

    if resolved == canonical_root || resolved.starts_with(&canonical_root) {
        Ok(resolved)
    } else {
        Err(HermitError::PathEscape(path.to_path_buf()))
    }
}

/// Create all missing directory components along `relative` under `root`
/// and return the absolute path. Idempotent: a second call with identical
/// arguments succeeds with no side effect. Components created before an
/// I/O failure remain; the error is surfaced.
pub fn ensure_dir(root: &Path, relative: &Path) -> Result<PathBuf, HermitError> {
    let target = assert_safe_path(root, relative)?;
    fs::create_dir_all(&target)?;
    Ok(target)
}

/// Write `content` to `relative` under `root` atomically: the bytes go to
/// a temporary file in the target's directory, are flushed and fsynced,
/// then renamed onto the target in a single filesystem operation. Readers
/// never observe a partial target. A trailing newline is appended if
/// absent. On failure the temporary file is discarded and the previous
/// target content (or absence) is left intact.
pub fn write_atomic(root: &Path, relative: &Path, content: &str) -> Result<(), HermitError> {
    let target = assert_safe_path(root, relative)?;
    let parent = target
        .parent()
        .ok_or_else(|| HermitError::ValidationError(format!(
            "write target has no parent directory: {}",
            target.display()
        )))?
        .to_path_buf();
    fs::create_dir_all(&parent)?;

    let file_name = target
        .file_name()
        .ok_or_else(|| HermitError::ValidationError(format!(
            "write target has no file name: {}",
            target.display()
        )))?
        .to_string_lossy()
        .to_string();

    let mut data = content.to_string();
    if !data.ends_with('\n') {
        data.push('\n');
    }

    let tmp = parent.join(format!(".{}.{}.tmp", file_name, Ulid::new()));
    let commit = (|| -> Result<(), std::io::Error> {
        let mut f = fs::File::create(&tmp)?;
        f.write_all(data.as_bytes())?;
        f.sync_all()?;
        drop(f);
        fs::rename(&tmp, &target)
    })();

    if let Err(e) = commit {
        let _ = fs::remove_file(&tmp);
        return Err(HermitError::IoError(e));
    }
    Ok(())
}

/// Path-checked read used by checks and detection rules.
pub fn read_to_string(root: &Path, relative: &Path) -> Result<String, HermitError> {
    let target = assert_safe_path(root, relative)?;
    Ok(fs::read_to_string(&target)?)
}

/// Path-checked single-write line append for event journals. Not a
/// snapshot write: the line (newline-terminated) is appended in one write
/// call to a file created on demand.
pub fn append_line(root: &Path, relative: &Path, line: &str) -> Result<(), HermitError> {
    let target = assert_safe_path(root, relative)?;
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut f = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&target)?;
    writeln!(f, "{}", line.trim_end_matches('\n'))?;
    Ok(())
}
