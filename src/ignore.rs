//! Ignore set shared by the whole pipeline.

use std::collections::HashSet;

/// Repositories that are never deletion candidates, on top of whatever the
/// operator configures. Matched against the bare repository name.
const PROTECTED_ENTRIES: [&str; 3] = [".github", "package-template", "repo-template"];

/// Case-insensitive ignore predicate over repository and package names.
///
/// Built once per run and read-only afterwards. The repository currently
/// running the sweep is always a member, so a sweep can never delete itself.
#[derive(Debug, Clone)]
pub struct IgnoreFilter {
    entries: HashSet<String>,
    current_repo: Option<String>,
}

impl IgnoreFilter {
    /// Build the filter from operator-supplied entries plus the built-in
    /// protected entries and the currently-running repository.
    pub fn new(entries: impl IntoIterator<Item = String>, current_repo: Option<&str>) -> Self {
        let mut set: HashSet<String> = entries
            .into_iter()
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();

        for entry in PROTECTED_ENTRIES {
            set.insert(entry.to_string());
        }

        let current_repo = current_repo.map(|r| r.trim().to_lowercase()).filter(|r| !r.is_empty());
        if let Some(ref current) = current_repo {
            set.insert(current.clone());
        }

        Self {
            entries: set,
            current_repo,
        }
    }

    /// Exact case-insensitive membership test.
    pub fn is_ignored(&self, name: &str) -> bool {
        self.entries.contains(&name.to_lowercase())
    }

    /// Whether a repository is exempt, by its full `org/name` or by its bare
    /// name (built-in entries are org-agnostic).
    pub fn ignores_repo(&self, full_name: &str) -> bool {
        if self.is_ignored(full_name) {
            return true;
        }
        match full_name.rsplit('/').next() {
            Some(name) if name != full_name => self.is_ignored(name),
            _ => false,
        }
    }

    /// Whether a declared package name is exempt.
    pub fn ignores_package(&self, package: &str) -> bool {
        self.is_ignored(package)
    }

    /// Whether a repository is the one running this sweep. Redundant with
    /// set membership, kept as an explicit second line of defense.
    pub fn is_self(&self, full_name: &str) -> bool {
        self.current_repo
            .as_deref()
            .is_some_and(|current| current == full_name.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter_with(entries: &[&str], current: Option<&str>) -> IgnoreFilter {
        IgnoreFilter::new(entries.iter().map(|s| s.to_string()), current)
    }

    #[test]
    fn test_case_insensitive_match() {
        let filter = filter_with(&["Acme/Legacy"], None);
        assert!(filter.ignores_repo("acme/legacy"));
        assert!(filter.ignores_repo("ACME/LEGACY"));
        assert!(!filter.ignores_repo("acme/other"));
    }

    #[test]
    fn test_current_repo_always_member() {
        let filter = filter_with(&[], Some("acme/sweeper"));
        assert!(filter.ignores_repo("acme/sweeper"));
        assert!(filter.is_self("Acme/Sweeper"));
        assert!(!filter.is_self("acme/other"));
    }

    #[test]
    fn test_protected_entries_match_bare_name() {
        let filter = filter_with(&[], None);
        assert!(filter.ignores_repo("acme/.github"));
        assert!(filter.ignores_repo("other-org/repo-template"));
        assert!(!filter.ignores_repo("acme/real-project"));
    }

    #[test]
    fn test_package_names_match_exactly() {
        let filter = filter_with(&["foo"], None);
        assert!(filter.ignores_package("foo"));
        assert!(filter.ignores_package("FOO"));
        assert!(!filter.ignores_package("foo-bar"));
    }

    #[test]
    fn test_blank_entries_dropped() {
        let filter = filter_with(&["", "  "], Some("  "));
        assert!(!filter.ignores_package(""));
        assert!(!filter.is_self(""));
    }
}
