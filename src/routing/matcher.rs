//! Route matching logic.
//!
//! # Responsibilities
//! - Normalize request paths into segments
//! - Match a path against a single entry (exact or prefix)
//! - Scan a table in declared order, catch-all last
//!
//! # Design Decisions
//! - Matching is segment-wise: `/leadsX` does not match `leads`
//! - Path matching is case-sensitive
//! - Empty segments are ignored, so `/`, `` and `//` are the same path
//! - No regex to guarantee O(n) matching

use crate::routing::table::{RouteEntry, RouteTable};

/// A request path split into its non-empty segments.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestPath {
    segments: Vec<String>,
}

impl RequestPath {
    pub fn parse(path: &str) -> Self {
        Self {
            segments: split_segments(path),
        }
    }

    pub fn from_segments(segments: Vec<String>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Path without the first `n` segments.
    pub fn skip(&self, n: usize) -> RequestPath {
        Self {
            segments: self.segments.iter().skip(n).cloned().collect(),
        }
    }

    /// Path made of the first `n` segments.
    pub fn take(&self, n: usize) -> RequestPath {
        Self {
            segments: self.segments.iter().take(n).cloned().collect(),
        }
    }

    pub fn join(&self, other: &RequestPath) -> RequestPath {
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().cloned());
        Self { segments }
    }

    /// Remaining sub-path form: `""` for no segments, `"/a/b"` otherwise.
    pub fn to_sub_path(&self) -> String {
        self.segments
            .iter()
            .map(|s| format!("/{}", s))
            .collect()
    }

    /// Absolute URL form: `"/"` for the root.
    pub fn to_url(&self) -> String {
        if self.segments.is_empty() {
            "/".to_string()
        } else {
            self.to_sub_path()
        }
    }
}

fn split_segments(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Result of matching a path against a table.
#[derive(Debug)]
pub struct PathMatch<'a> {
    pub entry: &'a RouteEntry,
    /// Number of path segments consumed by the entry.
    pub consumed: usize,
    /// Segments left for the matched target to resolve.
    pub remaining: RequestPath,
}

/// Match a single non-catch-all entry. Returns the number of consumed segments.
pub fn match_entry(entry: &RouteEntry, path: &RequestPath) -> Option<usize> {
    if entry.is_catch_all() {
        return None;
    }

    let expected = split_segments(&entry.path);
    let actual = path.segments();
    if actual.len() < expected.len() {
        return None;
    }
    if !expected.iter().zip(actual).all(|(e, a)| e == a) {
        return None;
    }
    if entry.is_exact() && actual.len() != expected.len() {
        return None;
    }
    Some(expected.len())
}

/// Linear scan in declared order. The catch-all is only considered once every
/// other entry has failed to match.
pub fn match_table<'a>(table: &'a RouteTable, path: &RequestPath) -> Option<PathMatch<'a>> {
    let entries = table.entries();

    let direct = entries.iter().find_map(|entry| {
        match_entry(entry, path).map(|consumed| PathMatch {
            entry,
            consumed,
            remaining: path.skip(consumed),
        })
    });

    direct.or_else(|| {
        entries.iter().find(|e| e.is_catch_all()).map(|entry| PathMatch {
            entry,
            consumed: 0,
            remaining: path.clone(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RouteTable {
        RouteTable::new(vec![
            RouteEntry::redirect("", "/dashboard", true),
            RouteEntry::page("dashboard", "DashboardPage"),
            RouteEntry::redirect("old/reports", "/reports", false),
            RouteEntry::page("reports", "ReportsPage"),
            RouteEntry::fallback("/dashboard"),
        ])
        .unwrap()
    }

    #[test]
    fn test_request_path_normalization() {
        assert!(RequestPath::parse("").is_root());
        assert!(RequestPath::parse("/").is_root());
        assert!(RequestPath::parse("//").is_root());
        assert_eq!(RequestPath::parse("/leads//123/").segments(), &["leads", "123"]);
        assert_eq!(RequestPath::parse("leads/123").to_sub_path(), "/leads/123");
        assert_eq!(RequestPath::parse("").to_sub_path(), "");
        assert_eq!(RequestPath::parse("").to_url(), "/");
    }

    #[test]
    fn test_root_matches_only_when_full() {
        let table = table();
        let m = match_table(&table, &RequestPath::parse("")).unwrap();
        assert_eq!(m.entry.path, "");

        // Root redirect is exact, so a non-empty path skips it
        let m = match_table(&table, &RequestPath::parse("/reports")).unwrap();
        assert_eq!(m.entry.path, "reports");
    }

    #[test]
    fn test_prefix_match_keeps_remaining() {
        let table = table();
        let m = match_table(&table, &RequestPath::parse("/old/reports/monthly")).unwrap();
        assert_eq!(m.entry.path, "old/reports");
        assert_eq!(m.consumed, 2);
        assert_eq!(m.remaining.to_sub_path(), "/monthly");
    }

    #[test]
    fn test_segment_boundary() {
        let table = table();
        let m = match_table(&table, &RequestPath::parse("/dashboardX")).unwrap();
        assert!(m.entry.is_catch_all());
    }

    #[test]
    fn test_page_requires_full_match() {
        let table = table();
        let m = match_table(&table, &RequestPath::parse("/dashboard/extra")).unwrap();
        assert!(m.entry.is_catch_all());
        assert_eq!(m.remaining.to_sub_path(), "/dashboard/extra");
    }

    #[test]
    fn test_case_sensitive() {
        let table = table();
        let m = match_table(&table, &RequestPath::parse("/Reports")).unwrap();
        assert!(m.entry.is_catch_all());
    }
}
