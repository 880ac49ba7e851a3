//! Runs the `architecture-lint` binary end to end.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use rstest::rstest;
use tempfile::TempDir;

fn run_lint(portal_dir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_architecture-lint"))
        .arg(portal_dir)
        .output()
        .expect("lint binary should run")
}

fn portal_with(file: &str, contents: &str) -> TempDir {
    let root = tempfile::tempdir().expect("tempdir");
    let path = root.path().join("src").join(file);
    fs::create_dir_all(path.parent().expect("parent")).expect("create dirs");
    fs::write(&path, contents).expect("write source");
    root
}

#[rstest]
fn accepts_the_workspace_portal_crate() {
    let portal = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../portal");
    let output = run_lint(&portal);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[rstest]
fn reports_violations_and_fails() {
    let portal = portal_with("domain/user.rs", "use reqwest::Client; fn f(_c: Client) {}");
    let output = run_lint(portal.path());
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("domain/user.rs: domain module must not depend on external crate `reqwest`"),
        "stderr: {stderr}"
    );
}
