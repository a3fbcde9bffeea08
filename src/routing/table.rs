//! Route table definitions and construction-time validation.
//!
//! # Responsibilities
//! - Describe routes as plain data (`RouteEntry`, `RouteKind`)
//! - Enforce table invariants once, when the table is built
//! - Expose the ordered entries to the matcher
//!
//! # Design Decisions
//! - A `RouteTable` can only exist in validated form
//! - Validation reports every issue, not just the first
//! - Catch-all (`**`) must be present exactly once and last

use std::fmt;

use serde::Serialize;

use crate::modules::{LoaderRef, ModuleKey};

/// Path of the catch-all entry.
pub const CATCH_ALL: &str = "**";

/// What happens when an entry matches.
#[derive(Debug, Clone)]
pub enum RouteKind {
    /// Re-resolve against `target`. Targets starting with `/` are absolute,
    /// anything else is relative to the table's base path.
    Redirect { target: String, exact: bool },
    /// Load a feature module on demand and hand it the remaining sub-path.
    LazyModule(LoaderRef),
    /// Leaf view inside a feature module. Always matches the full remaining path.
    Page { component: String },
}

/// One routable path segment.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    pub path: String,
    pub kind: RouteKind,
}

impl RouteEntry {
    pub fn redirect(path: impl Into<String>, target: impl Into<String>, exact: bool) -> Self {
        Self {
            path: path.into(),
            kind: RouteKind::Redirect {
                target: target.into(),
                exact,
            },
        }
    }

    pub fn lazy(path: impl Into<String>, loader: LoaderRef) -> Self {
        Self {
            path: path.into(),
            kind: RouteKind::LazyModule(loader),
        }
    }

    pub fn page(path: impl Into<String>, component: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: RouteKind::Page {
                component: component.into(),
            },
        }
    }

    /// Catch-all redirect. Must be the last entry of a table.
    pub fn fallback(target: impl Into<String>) -> Self {
        Self::redirect(CATCH_ALL, target, false)
    }

    pub fn is_catch_all(&self) -> bool {
        self.path == CATCH_ALL
    }

    /// Whether the entry's segments must equal the whole path.
    pub fn is_exact(&self) -> bool {
        match &self.kind {
            RouteKind::Redirect { exact, .. } => *exact,
            RouteKind::LazyModule(_) => false,
            RouteKind::Page { .. } => true,
        }
    }

    pub fn describe(&self) -> RouteDescription {
        let (kind, target) = match &self.kind {
            RouteKind::Redirect { target, .. } => ("redirect", target.clone()),
            RouteKind::LazyModule(loader) => ("lazy_module", loader.key().to_string()),
            RouteKind::Page { component } => ("page", component.clone()),
        };
        RouteDescription {
            path: self.path.clone(),
            kind,
            target,
            exact: self.is_exact(),
        }
    }
}

/// Serializable summary of an entry, used by the CLI.
#[derive(Debug, Clone, Serialize)]
pub struct RouteDescription {
    pub path: String,
    pub kind: &'static str,
    pub target: String,
    pub exact: bool,
}

/// A single invariant violation found while building a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableIssue {
    DuplicatePath(String),
    MissingCatchAll,
    MultipleCatchAll(usize),
    CatchAllNotLast { index: usize },
    ExactCatchAll,
    EmptyRedirectTarget(String),
    EmptyModulePath(String),
}

impl fmt::Display for TableIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableIssue::DuplicatePath(path) => write!(f, "duplicate path '{}'", path),
            TableIssue::MissingCatchAll => write!(f, "no catch-all ('**') entry"),
            TableIssue::MultipleCatchAll(n) => write!(f, "{} catch-all entries, expected one", n),
            TableIssue::CatchAllNotLast { index } => {
                write!(f, "catch-all at position {} is not the last entry", index)
            }
            TableIssue::ExactCatchAll => write!(f, "catch-all entry cannot be exact"),
            TableIssue::EmptyModulePath(module) => {
                write!(f, "module '{}' is mounted on an empty path", module)
            }
            TableIssue::EmptyRedirectTarget(path) => {
                write!(f, "redirect '{}' has an empty target", path)
            }
        }
    }
}

/// Error returned when a route table violates its invariants.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TableError {
    #[error("invalid route table: {}", join_issues(.0))]
    Invalid(Vec<TableIssue>),
}

impl TableError {
    pub fn issues(&self) -> &[TableIssue] {
        match self {
            TableError::Invalid(issues) => issues,
        }
    }
}

fn join_issues(issues: &[TableIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Ordered, validated sequence of routes.
#[derive(Debug, Clone)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
    nested: bool,
}

impl RouteTable {
    /// Build the root table of the application.
    pub fn new(entries: Vec<RouteEntry>) -> Result<Self, TableError> {
        Self::build(entries, false)
    }

    /// Build a table owned by a feature module. Relative redirects to `""`
    /// are allowed here since they point back at the module's own base path.
    pub fn nested(entries: Vec<RouteEntry>) -> Result<Self, TableError> {
        Self::build(entries, true)
    }

    fn build(entries: Vec<RouteEntry>, nested: bool) -> Result<Self, TableError> {
        let issues = validate_entries(&entries, nested);
        if issues.is_empty() {
            Ok(Self { entries, nested })
        } else {
            Err(TableError::Invalid(issues))
        }
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn is_nested(&self) -> bool {
        self.nested
    }

    /// Keys of every module this table can load directly.
    pub fn module_keys(&self) -> Vec<ModuleKey> {
        self.entries
            .iter()
            .filter_map(|e| match &e.kind {
                RouteKind::LazyModule(loader) => Some(loader.key().clone()),
                _ => None,
            })
            .collect()
    }

    pub fn describe(&self) -> Vec<RouteDescription> {
        self.entries.iter().map(RouteEntry::describe).collect()
    }
}

fn validate_entries(entries: &[RouteEntry], nested: bool) -> Vec<TableIssue> {
    let mut issues = Vec::new();
    let mut seen = std::collections::HashSet::new();

    for entry in entries {
        if !seen.insert(entry.path.as_str()) {
            issues.push(TableIssue::DuplicatePath(entry.path.clone()));
        }
        // A module must consume a segment, otherwise nested tables can mount
        // each other without ever shortening the path.
        if let RouteKind::LazyModule(loader) = &entry.kind {
            if entry.path.split('/').all(str::is_empty) {
                issues.push(TableIssue::EmptyModulePath(loader.key().to_string()));
            }
        }
        if let RouteKind::Redirect { target, exact } = &entry.kind {
            if entry.is_catch_all() && *exact {
                issues.push(TableIssue::ExactCatchAll);
            }
            if target.is_empty() && !nested {
                issues.push(TableIssue::EmptyRedirectTarget(entry.path.clone()));
            }
        }
    }

    let catch_alls: Vec<usize> = entries
        .iter()
        .enumerate()
        .filter(|(_, e)| e.is_catch_all())
        .map(|(i, _)| i)
        .collect();

    match catch_alls.as_slice() {
        [] => issues.push(TableIssue::MissingCatchAll),
        [index] => {
            if *index + 1 != entries.len() {
                issues.push(TableIssue::CatchAllNotLast { index: *index });
            }
        }
        many => issues.push(TableIssue::MultipleCatchAll(many.len())),
    }

    issues
}
