use hermit::core::assets;
use hermit::core::error::HermitError;
use hermit::core::gateway;
use hermit::core::layout::{REQUIRED_DIRS, SEED_FILES};
use hermit::core::output::PlainPresenter;
use hermit::core::scaffold::{ScaffoldOptions, scaffold_workspace};
use hermit::core::store::{Workspace, find_workspace_root};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

#[test]
fn traversal_segments_resolving_outside_root_fail() {
    let tmp = tempdir().expect("tempdir");

    for escape in [
        "../outside.txt",
        "a/../../outside.txt",
        "a/b/../../../outside",
        "..",
    ] {
        let result = gateway::assert_safe_path(tmp.path(), Path::new(escape));
        assert!(
            matches!(result, Err(HermitError::PathEscape(_))),
            "expected escape for {}",
            escape
        );
    }
}

#[test]
fn descendant_paths_resolve_inside_root() {
    let tmp = tempdir().expect("tempdir");
    let canonical_root = fs::canonicalize(tmp.path()).expect("canonicalize");

    for inside in ["a.txt", "a/b/c.txt", "a/./b.txt", "a/b/../c.txt", "."] {
        let resolved =
            gateway::assert_safe_path(tmp.path(), Path::new(inside)).expect("should resolve");
        assert!(
            resolved == canonical_root || resolved.starts_with(&canonical_root),
            "resolved outside root for {}: {}",
            inside,
            resolved.display()
        );
    }
}

#[cfg(unix)]
#[test]
fn symlink_pointing_outside_root_is_rejected() {
    let outside = tempdir().expect("outside tempdir");
    let tmp = tempdir().expect("tempdir");
    std::os::unix::fs::symlink(outside.path(), tmp.path().join("link")).expect("symlink");

    let result = gateway::assert_safe_path(tmp.path(), Path::new("link/file.txt"));
    assert!(matches!(result, Err(HermitError::PathEscape(_))));
}

#[cfg(unix)]
#[test]
fn symlink_staying_inside_root_is_accepted() {
    let tmp = tempdir().expect("tempdir");
    fs::create_dir_all(tmp.path().join("real")).expect("mkdir");
    std::os::unix::fs::symlink(tmp.path().join("real"), tmp.path().join("alias"))
        .expect("symlink");

    let resolved =
        gateway::assert_safe_path(tmp.path(), Path::new("alias/file.txt")).expect("resolve");
    assert!(resolved.ends_with("real/file.txt"));
}

#[test]
fn ensure_dir_creates_nested_layout_and_is_idempotent() {
    let tmp = tempdir().expect("tempdir");

    let created = gateway::ensure_dir(
        tmp.path(),
        Path::new("30-39_OPERATIONS/30_ai/31_ai_local/context"),
    )
    .expect("ensure_dir");
    assert!(created.is_dir());
    assert!(tmp.path().join("30-39_OPERATIONS").is_dir());
    assert!(tmp.path().join("30-39_OPERATIONS/30_ai").is_dir());
    assert!(tmp.path().join("30-39_OPERATIONS/30_ai/31_ai_local").is_dir());
    assert!(
        tmp.path()
            .join("30-39_OPERATIONS/30_ai/31_ai_local/context")
            .is_dir()
    );

    let again = gateway::ensure_dir(
        tmp.path(),
        Path::new("30-39_OPERATIONS/30_ai/31_ai_local/context"),
    )
    .expect("second ensure_dir");
    assert_eq!(created, again);
}

#[test]
fn write_atomic_writes_exact_content_with_newline() {
    let tmp = tempdir().expect("tempdir");

    gateway::write_atomic(tmp.path(), Path::new("a/b.txt"), "hello world").expect("write");
    let content = fs::read_to_string(tmp.path().join("a/b.txt")).expect("read");
    assert_eq!(content, "hello world\n");

    // Already-terminated content is not double-terminated.
    gateway::write_atomic(tmp.path(), Path::new("a/b.txt"), "hello again\n").expect("rewrite");
    let content = fs::read_to_string(tmp.path().join("a/b.txt")).expect("read");
    assert_eq!(content, "hello again\n");
}

#[test]
fn write_atomic_leaves_no_temporary_files_behind() {
    let tmp = tempdir().expect("tempdir");
    gateway::write_atomic(tmp.path(), Path::new("a/b.txt"), "content").expect("write");

    let entries: Vec<String> = fs::read_dir(tmp.path().join("a"))
        .expect("read_dir")
        .map(|e| e.expect("entry").file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(entries, vec!["b.txt".to_string()]);
}

#[test]
fn failed_rename_leaves_previous_state_intact() {
    let tmp = tempdir().expect("tempdir");

    // A non-empty directory squatting on the target path makes the final
    // rename fail after the temp file was written and synced.
    fs::create_dir_all(tmp.path().join("a/b.txt")).expect("mkdir");
    fs::write(tmp.path().join("a/b.txt/keep.md"), "kept\n").expect("seed");

    let result = gateway::write_atomic(tmp.path(), Path::new("a/b.txt"), "new content");
    assert!(result.is_err());

    // Previous state is fully intact and the temp file was discarded.
    assert!(tmp.path().join("a/b.txt").is_dir());
    let kept = fs::read_to_string(tmp.path().join("a/b.txt/keep.md")).expect("read");
    assert_eq!(kept, "kept\n");
    let leftovers: Vec<String> = fs::read_dir(tmp.path().join("a"))
        .expect("read_dir")
        .map(|e| e.expect("entry").file_name().to_string_lossy().to_string())
        .filter(|name| name.ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty(), "temp files left behind: {:?}", leftovers);
}

#[test]
fn write_atomic_rejects_escaping_targets() {
    let tmp = tempdir().expect("tempdir");
    let result = gateway::write_atomic(tmp.path(), Path::new("../evil.txt"), "nope");
    assert!(matches!(result, Err(HermitError::PathEscape(_))));
}

#[test]
fn append_line_accumulates_newline_terminated_lines() {
    let tmp = tempdir().expect("tempdir");
    gateway::append_line(tmp.path(), Path::new(".hermit/doctor.events.jsonl"), "{\"a\":1}")
        .expect("append");
    gateway::append_line(tmp.path(), Path::new(".hermit/doctor.events.jsonl"), "{\"a\":2}")
        .expect("append");

    let content =
        fs::read_to_string(tmp.path().join(".hermit/doctor.events.jsonl")).expect("read");
    assert_eq!(content, "{\"a\":1}\n{\"a\":2}\n");
}

#[test]
fn workspace_paths_hang_off_root() {
    let tmp = tempdir().expect("tempdir");
    let workspace = Workspace::new(tmp.path().to_path_buf());
    assert_eq!(workspace.state_path(), tmp.path().join(".hermit/onboarding.json"));
    assert_eq!(workspace.config_path(), tmp.path().join(".hermit/config.toml"));
    assert_eq!(
        workspace.journal_path(),
        tmp.path().join(".hermit/doctor.events.jsonl")
    );
}

#[test]
fn workspace_root_discovery_from_nested_dir() {
    let tmp = tempdir().expect("tempdir");
    fs::create_dir_all(tmp.path().join(".hermit")).expect("mkdir");
    let nested = tmp.path().join("20-29_AREAS/admin");
    fs::create_dir_all(&nested).expect("mkdir");

    assert_eq!(find_workspace_root(&nested).expect("find"), tmp.path());
}

#[test]
fn scaffold_then_rescaffold_is_stable() {
    let tmp = tempdir().expect("tempdir");
    let opts = ScaffoldOptions {
        target_dir: tmp.path().to_path_buf(),
        force: false,
        dry_run: false,
    };

    scaffold_workspace(&opts, &PlainPresenter).expect("first scaffold");
    for dir in REQUIRED_DIRS {
        assert!(tmp.path().join(dir).is_dir(), "missing {}", dir);
    }
    for (file, template) in SEED_FILES {
        let on_disk = fs::read_to_string(tmp.path().join(file)).expect("seed readable");
        let embedded = assets::get_template(template).expect("template");
        assert_eq!(
            assets::content_checksum(&on_disk),
            assets::content_checksum(embedded),
            "seed {} differs from template",
            file
        );
    }

    // Second run must not touch personalized files.
    fs::write(tmp.path().join("WORKSPACE.md"), "owner: casey\n").expect("personalize");
    scaffold_workspace(&opts, &PlainPresenter).expect("second scaffold");
    assert_eq!(
        fs::read_to_string(tmp.path().join("WORKSPACE.md")).expect("read"),
        "owner: casey\n"
    );
}
