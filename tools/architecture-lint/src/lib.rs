//! Repo-local architectural lint for the portal client.
//!
//! The portal crate is split into a `domain` (session manager, value types,
//! ports) and `outbound` adapters (HTTP client, credential file, tracing
//! feedback). This crate provides a lightweight lint that:
//!
//! - forbids `domain` code from depending on adapters, the composition root,
//!   or transport and shell crates
//! - forbids `outbound` adapters from reading settings or the composition
//!   root directly
//! - restricts who may change session state: the credential store and the
//!   session cell are written from `domain/session` only, except that the
//!   HTTP rejection handler may erase the credential and revoke the session
//!   it was presented with
//!
//! The lint is executed by `make lint` via `cargo run -p architecture-lint`.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use syn::visit::Visit;

/// Methods that change the session cell or the persisted credential.
const SESSION_WRITES: [&str; 8] = [
    "adopt_user",
    "attach_credential",
    "erase",
    "establish",
    "mark_ready",
    "persist",
    "revoke",
    "revoke_if_current",
];

/// The only session writes the HTTP rejection handler performs.
const REJECTION_HANDLER: &str = "outbound/http/unauthorized.rs";
const REJECTION_HANDLER_WRITES: [&str; 2] = ["erase", "revoke_if_current"];

/// A single boundary violation discovered by the linter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File path relative to `portal/src`.
    pub file: PathBuf,
    /// Human-readable description of the violated rule.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file.display(), self.message)
    }
}

/// Failure modes returned by the architecture lint.
#[derive(Debug)]
pub enum ArchitectureLintError {
    /// Filesystem traversal or reading failed.
    Io(io::Error),
    /// Rust source parsing failed.
    Parse { file: PathBuf, message: String },
    /// One or more boundary violations were found.
    Violations(Vec<Violation>),
}

impl fmt::Display for ArchitectureLintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "I/O error while linting architecture: {err}"),
            Self::Parse { file, message } => write!(
                f,
                "Failed to parse Rust source while linting architecture ({}): {message}",
                file.display()
            ),
            Self::Violations(violations) => {
                writeln!(f, "Architecture boundary violations:")?;
                for violation in violations {
                    writeln!(f, "- {violation}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ArchitectureLintError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ArchitectureLintError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// Lint the portal crate sources on disk.
///
/// `portal_dir` must be the `portal/` directory at the repository root.
pub fn lint_portal_sources(portal_dir: &Path) -> Result<(), ArchitectureLintError> {
    let src_dir = portal_dir.join("src");
    let sources = collect_lint_sources(&src_dir)?;
    lint_sources(&sources)
}

/// Lint the provided Rust sources. Intended for unit and behaviour tests.
pub fn lint_sources(sources: &[LintSource]) -> Result<(), ArchitectureLintError> {
    let mut violations = Vec::new();

    for source in sources {
        let layer = ModuleLayer::infer_from_path(&source.file).ok_or_else(|| {
            ArchitectureLintError::Parse {
                file: source.file.clone(),
                message: "unable to infer module layer from file path".to_owned(),
            }
        })?;
        let parsed =
            syn::parse_file(&source.contents).map_err(|err| ArchitectureLintError::Parse {
                file: source.file.clone(),
                message: err.to_string(),
            })?;
        violations.extend(lint_parsed_source(&source.file, layer, &parsed));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ArchitectureLintError::Violations(violations))
    }
}

/// A Rust source file to be linted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintSource {
    /// Path relative to `portal/src`.
    pub file: PathBuf,
    pub contents: String,
}

/// The architectural "layer" inferred from a file path under `portal/src`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModuleLayer {
    Domain,
    Outbound,
}

impl ModuleLayer {
    fn infer_from_path(relative_path: &Path) -> Option<Self> {
        let first = relative_path
            .components()
            .next()?
            .as_os_str()
            .to_string_lossy();
        match first.as_ref() {
            "domain" => Some(Self::Domain),
            "outbound" => Some(Self::Outbound),
            _ => None,
        }
    }

    fn forbidden_module_roots(self) -> BTreeSet<&'static str> {
        match self {
            Self::Domain => BTreeSet::from(["app", "config", "outbound", "telemetry"]),
            Self::Outbound => BTreeSet::from(["app", "config"]),
        }
    }

    fn forbidden_crate_roots(self) -> BTreeSet<&'static str> {
        match self {
            Self::Domain => BTreeSet::from([
                "cap_std",
                "clap",
                "color_eyre",
                "ortho_config",
                "reqwest",
                "tracing_subscriber",
                "wiremock",
            ]),
            Self::Outbound => BTreeSet::from(["clap", "color_eyre", "ortho_config"]),
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Outbound => "outbound",
        }
    }
}

fn lint_parsed_source(file: &Path, layer: ModuleLayer, parsed: &syn::File) -> Vec<Violation> {
    let forbidden_modules = layer.forbidden_module_roots();
    let forbidden_crates = layer.forbidden_crate_roots();
    let layer_name = layer.name();

    let mut collector = PathCollector::default();
    collector.visit_file(parsed);

    let mut messages = BTreeSet::new();
    for segments in &collector.paths {
        if let Some(root) = forbidden_internal_module_root(segments, &forbidden_modules) {
            messages.insert(format!(
                "{layer_name} module must not depend on crate::{root}"
            ));
        }

        if let Some(root) = forbidden_external_crate_root(segments, &forbidden_crates) {
            messages.insert(format!(
                "{layer_name} module must not depend on external crate `{root}`"
            ));
        }
    }

    if !is_test_file(file) {
        let allowed = allowed_session_writes(file);
        let mut writes = SessionWriteCollector::default();
        writes.visit_file(parsed);
        for method in writes.methods {
            if !allowed.contains(method.as_str()) {
                messages.insert(format!(
                    "only the session manager may call `{method}`"
                ));
            }
        }
    }

    messages
        .into_iter()
        .map(|message| Violation {
            file: file.to_path_buf(),
            message,
        })
        .collect()
}

fn allowed_session_writes(file: &Path) -> BTreeSet<&'static str> {
    if file.starts_with("domain/session") {
        return SESSION_WRITES.into_iter().collect();
    }
    if file == Path::new(REJECTION_HANDLER) {
        return REJECTION_HANDLER_WRITES.into_iter().collect();
    }
    BTreeSet::new()
}

fn is_test_file(file: &Path) -> bool {
    file.file_stem().and_then(|stem| stem.to_str()) == Some("tests")
}

fn forbidden_internal_module_root(
    segments: &[String],
    forbidden_roots: &BTreeSet<&'static str>,
) -> Option<&'static str> {
    let root = internal_module_root(segments)?;
    forbidden_roots.get(root).copied()
}

fn forbidden_external_crate_root(
    segments: &[String],
    forbidden_roots: &BTreeSet<&'static str>,
) -> Option<&'static str> {
    let root = external_crate_root(segments)?;
    forbidden_roots.get(root).copied()
}

fn is_relative_module_segment(segment: &str) -> bool {
    matches!(segment, "crate" | "self" | "super")
}

fn internal_module_root(segments: &[String]) -> Option<&str> {
    let first = segments.first()?.as_str();
    // A lone `config` is a local binding, not the module.
    if segments.len() > 1 && matches!(first, "app" | "config" | "domain" | "outbound" | "telemetry")
    {
        return Some(first);
    }
    let start_index = match first {
        "crate" | "self" | "super" => segments
            .iter()
            .position(|segment| !is_relative_module_segment(segment.as_str()))?,
        "portal" => 1,
        _ => return None,
    };
    segments.get(start_index).map(|segment| segment.as_str())
}

fn external_crate_root(segments: &[String]) -> Option<&str> {
    let root = segments.first()?.as_str();
    if is_relative_module_segment(root) || root == "portal" {
        return None;
    }
    Some(root)
}

fn is_cfg_test(attrs: &[syn::Attribute]) -> bool {
    attrs.iter().any(|attr| {
        attr.path().is_ident("cfg")
            && matches!(&attr.meta, syn::Meta::List(list) if list.tokens.to_string() == "test")
    })
}

/// Every path named in a file, including each leaf of a `use` tree.
#[derive(Default)]
struct PathCollector {
    paths: BTreeSet<Vec<String>>,
}

impl<'ast> Visit<'ast> for PathCollector {
    fn visit_path(&mut self, node: &'ast syn::Path) {
        let segments: Vec<String> = node
            .segments
            .iter()
            .map(|segment| segment.ident.to_string())
            .collect();
        if !segments.is_empty() {
            self.paths.insert(segments);
        }
        syn::visit::visit_path(self, node);
    }

    fn visit_item_use(&mut self, node: &'ast syn::ItemUse) {
        self.paths.extend(flatten_use_tree(&node.tree));
    }
}

/// Expand `use a::{b, c::*}` into `[a, b]` and `[a, c, *]`.
fn flatten_use_tree(tree: &syn::UseTree) -> Vec<Vec<String>> {
    let mut leaves = Vec::new();
    let mut pending = vec![(Vec::new(), tree)];
    while let Some((mut prefix, node)) = pending.pop() {
        match node {
            syn::UseTree::Path(path) => {
                prefix.push(path.ident.to_string());
                pending.push((prefix, &path.tree));
            }
            syn::UseTree::Name(name) => {
                prefix.push(name.ident.to_string());
                leaves.push(prefix);
            }
            syn::UseTree::Rename(rename) => {
                prefix.push(rename.ident.to_string());
                leaves.push(prefix);
            }
            syn::UseTree::Glob(_) => {
                prefix.push("*".to_owned());
                leaves.push(prefix);
            }
            syn::UseTree::Group(group) => {
                pending.extend(group.items.iter().map(|item| (prefix.clone(), item)));
            }
        }
    }
    leaves
}

/// Collects session-writing method calls outside `#[cfg(test)]` modules.
#[derive(Default)]
struct SessionWriteCollector {
    methods: BTreeSet<String>,
}

impl<'ast> Visit<'ast> for SessionWriteCollector {
    fn visit_item_mod(&mut self, node: &'ast syn::ItemMod) {
        if is_cfg_test(&node.attrs) {
            return;
        }
        syn::visit::visit_item_mod(self, node);
    }

    fn visit_expr_method_call(&mut self, node: &'ast syn::ExprMethodCall) {
        let method = node.method.to_string();
        if SESSION_WRITES.contains(&method.as_str()) {
            self.methods.insert(method);
        }
        syn::visit::visit_expr_method_call(self, node);
    }
}

/// Read every `.rs` file under the linted layers, sorted by path.
fn collect_lint_sources(src_dir: &Path) -> Result<Vec<LintSource>, ArchitectureLintError> {
    let mut pending: Vec<PathBuf> = ["domain", "outbound"]
        .into_iter()
        .map(|layer| src_dir.join(layer))
        .filter(|dir| dir.is_dir())
        .collect();
    let mut files = Vec::new();
    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
            } else if path.extension().is_some_and(|ext| ext == "rs") {
                files.push(path);
            }
        }
    }
    files.sort();

    files
        .into_iter()
        .map(|path| {
            let file = path
                .strip_prefix(src_dir)
                .map_err(|err| ArchitectureLintError::Parse {
                    file: path.clone(),
                    message: err.to_string(),
                })?
                .to_path_buf();
            let contents = fs::read_to_string(&path)?;
            Ok(LintSource { file, contents })
        })
        .collect()
}

#[cfg(test)]
mod tests;
