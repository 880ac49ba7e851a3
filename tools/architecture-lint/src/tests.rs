//! Unit tests for the architecture lint.

use std::path::PathBuf;

use rstest::fixture;
use rstest::rstest;

use super::*;

#[derive(Clone, Copy)]
struct LintSingle;

impl LintSingle {
    fn lint(self, file: &str, contents: &str) -> Result<(), ArchitectureLintError> {
        lint_sources(&[LintSource {
            file: PathBuf::from(file),
            contents: contents.to_owned(),
        }])
    }
}

#[fixture]
fn lint_single() -> LintSingle {
    LintSingle
}

#[rstest]
#[case(
    "outbound/http/client.rs",
    "use crate::domain::SessionCell; fn build(config: Config) { let _ = config.timeout; }",
    true
)]
#[case(
    "outbound/http/client.rs",
    "use crate::config::PortalSettings; fn build() {}",
    false
)]
#[case(
    "outbound/http/client.rs",
    "use portal::app::Portal; fn build() {}",
    false
)]
#[case(
    "outbound/feedback.rs",
    "use clap::Parser; fn build() {}",
    false
)]
#[case(
    "domain/user.rs",
    "use crate::outbound::http::ApiClient; fn thing() { let _ = 1; }",
    false
)]
#[case(
    "domain/session/mod.rs",
    "use outbound::http; fn thing() { let _ = 1; }",
    false
)]
#[case(
    "domain/error.rs",
    "fn convert(error: reqwest::Error) -> String { error.to_string() }",
    false
)]
#[case(
    "domain/ports/credential_store.rs",
    "use cap_std::fs::Dir; fn thing() {}",
    false
)]
#[case(
    "domain/auth.rs",
    "use std::{fmt::*, sync::{Arc, Mutex as Lock}}; use zeroize::{Zeroizing, {reqwest_like::Client}};",
    true
)]
#[case(
    "domain/auth.rs",
    "use std::{fmt, sync::{Arc, atomic::*}}; use {tracing::debug, reqwest::{self as http}};",
    false
)]
#[case(
    "domain/sequence.rs",
    "use tracing::debug; fn thing() { debug!(\"ok\"); }",
    true
)]
fn detects_boundary_violations(
    lint_single: LintSingle,
    #[case] file: &str,
    #[case] contents: &str,
    #[case] ok: bool,
) {
    let result = lint_single.lint(file, contents);
    assert_eq!(result.is_ok(), ok, "result: {result:?}");
}

#[rstest]
#[case(
    "domain/session/mod.rs",
    "fn f(s: S) { s.store.persist(&c); s.cell.establish(c, u); }",
    true,
)]
#[case("domain/session/cell.rs", "fn f(s: S) { s.revoke(); }", true)]
#[case(
    "outbound/http/unauthorized.rs",
    "fn f(s: S) { s.cell.revoke_if_current(&c); s.store.erase(); }",
    true,
)]
#[case("outbound/http/unauthorized.rs", "fn f(s: S) { s.cell.revoke(); }", false)]
#[case("outbound/http/client.rs", "fn f(s: S) { s.store.erase(); }", false)]
#[case("outbound/http/client.rs", "fn f(s: S) { s.cell.adopt_user(&c, u); }", false)]
#[case("domain/payment.rs", "fn f(s: S) { s.store.persist(&c); }", false)]
#[case(
    "outbound/credential_store.rs",
    "fn f() {} #[cfg(test)] mod tests { fn t(s: S) { s.persist(&c); s.erase(); } }",
    true
)]
#[case("domain/user/tests.rs", "fn t(s: S) { s.cell.establish(c, u); }", true)]
fn restricts_session_writes(
    lint_single: LintSingle,
    #[case] file: &str,
    #[case] contents: &str,
    #[case] ok: bool,
) {
    let result = lint_single.lint(file, contents);
    assert_eq!(result.is_ok(), ok, "result: {result:?}");
}

#[rstest]
fn reports_the_offending_method(lint_single: LintSingle) {
    let err = lint_single
        .lint("outbound/http/client.rs", "fn f(s: S) { s.cell.mark_ready(); }")
        .expect_err("write outside the session manager");
    let ArchitectureLintError::Violations(violations) = err else {
        panic!("expected violations, got {err:?}");
    };
    assert_eq!(
        violations,
        vec![Violation {
            file: PathBuf::from("outbound/http/client.rs"),
            message: "only the session manager may call `mark_ready`".to_owned(),
        }]
    );
}

#[rstest]
fn rejects_files_outside_known_layers(lint_single: LintSingle) {
    let err = lint_single
        .lint("main.rs", "fn main() {}")
        .expect_err("unknown layer");
    assert!(matches!(err, ArchitectureLintError::Parse { .. }));
}
