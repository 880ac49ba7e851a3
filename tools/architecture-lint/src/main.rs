//! Runs the architecture lint over `portal/src`.
//!
//! Pass the portal crate directory as the only argument, or run from
//! anywhere inside the workspace and let the lint find it.

use std::env;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn main() -> ExitCode {
    let Some(portal_dir) = portal_dir() else {
        report("no portal crate found; pass its directory as the first argument");
        return ExitCode::FAILURE;
    };
    match architecture_lint::lint_portal_sources(&portal_dir) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(err);
            ExitCode::FAILURE
        }
    }
}

fn report(message: impl std::fmt::Display) {
    // Nothing useful to do if stderr is gone.
    let _ = writeln!(io::stderr().lock(), "{message}");
}

fn portal_dir() -> Option<PathBuf> {
    if let Some(explicit) = env::args_os().nth(1) {
        return Some(PathBuf::from(explicit));
    }
    let starts = [
        env::var_os("CARGO_WORKSPACE_DIR").map(PathBuf::from),
        env::current_dir().ok(),
        Some(PathBuf::from(env!("CARGO_MANIFEST_DIR"))),
    ];
    starts
        .into_iter()
        .flatten()
        .find_map(|start| find_portal(&start))
}

fn find_portal(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join("portal"))
        .find(|candidate| candidate.join("src").join("lib.rs").is_file())
}
