use once_cell::sync::Lazy;
use regex::Regex;
use crate::types::CommitRecord;

/// Automation accounts: GitHub-style `[bot]` names and bot noreply addresses.
static BOT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\[bot\]|<[^>]*bot[^>]*@[^>]*noreply[^>]*>").expect("bot regex")
});

/// Drops commits whose author identity matches an exclusion pattern.
/// Identities are never rewritten, only filtered.
#[derive(Debug, Default)]
pub struct AuthorFilter {
    patterns: Vec<Regex>,
    exclude_bots: bool,
}

impl AuthorFilter {
    pub fn new(patterns: &[String], exclude_bots: bool) -> Result<Self, String> {
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(p).map_err(|e| format!("Invalid author pattern \"{p}\": {e}")))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(AuthorFilter { patterns, exclude_bots })
    }

    pub fn is_active(&self) -> bool {
        self.exclude_bots || !self.patterns.is_empty()
    }

    pub fn excludes(&self, identity: &str) -> bool {
        (self.exclude_bots && BOT_PATTERN.is_match(identity))
            || self.patterns.iter().any(|re| re.is_match(identity))
    }

    pub fn apply(&self, commits: Vec<CommitRecord>) -> Vec<CommitRecord> {
        if !self.is_active() {
            return commits;
        }
        commits.into_iter().filter(|c| !self.excludes(&c.identity())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::test_support::commit_with_delay;

    fn commits(authors: &[&str]) -> Vec<CommitRecord> {
        authors.iter()
            .map(|a| commit_with_delay(a, "2024-01-01T10:00:00+00:00", 0))
            .collect()
    }

    #[test]
    fn test_inactive_filter_keeps_everything() {
        let filter = AuthorFilter::default();
        assert!(!filter.is_active());
        let kept = filter.apply(commits(&["dependabot[bot] <bot@example.com>", "Ann <ann@example.com>"]));
        assert_eq!(kept.len(), 2, "No patterns and bots allowed: nothing filtered");
    }

    #[test]
    fn test_excludes_bots() {
        let filter = AuthorFilter::new(&[], true).expect("valid");
        let kept = filter.apply(commits(&[
            "dependabot[bot] <49699333+dependabot[bot]@users.noreply.github.com>",
            "Renovate Bot <renovate-bot@users.noreply.github.com>",
            "Ann <ann@example.com>",
            "Abbott Lee <abbott@example.com>",
        ]));
        let names: Vec<_> = kept.iter().map(|c| c.author_name.as_str()).collect();
        assert_eq!(names, vec!["Ann", "Abbott Lee"], "Only automation accounts should be dropped");
    }

    #[test]
    fn test_custom_patterns() {
        let filter = AuthorFilter::new(&["@build\\.internal>$".to_string()], false).expect("valid");
        assert!(filter.excludes("Jenkins <ci@build.internal>"));
        assert!(!filter.excludes("Ann <ann@example.com>"));
        assert!(!filter.excludes("dependabot[bot] <x@example.com>"), "Bots kept unless exclude_bots");
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let err = AuthorFilter::new(&["(unclosed".to_string()], false).unwrap_err();
        assert!(err.contains("(unclosed"), "Error should name the pattern: {err}");
    }
}
