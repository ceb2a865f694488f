use crate::types::{AuthorStat, TopAuthorRow};

pub const TOP_AUTHORS: usize = 10;

/// Ranks authors by commit count (desc), then identity (asc), keeping `limit`.
pub fn top_authors(stats: &[AuthorStat], limit: usize) -> Vec<TopAuthorRow> {
    let mut ranked: Vec<&AuthorStat> = stats.iter().collect();
    ranked.sort_by(|a, b| {
        b.commit_count
            .cmp(&a.commit_count)
            .then_with(|| a.identity.cmp(&b.identity))
    });

    ranked
        .into_iter()
        .take(limit)
        .map(|s| TopAuthorRow {
            author: s.identity.clone(),
            commits: s.commit_count,
            ci_within_8h_percent: s.ci_within_8h_percent,
            daily_integration_rate_percent: s.daily_integration_rate_percent,
            max_day_gap: s.max_day_gap,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DelayBucket, IntegrationBand};

    fn stat(identity: &str, commits: usize) -> AuthorStat {
        AuthorStat {
            identity: identity.to_string(),
            commit_count: commits,
            ci_within_8h_percent: 100.0,
            daily_integration_rate_percent: 100.0,
            max_day_gap: 0,
            dominant_bucket: DelayBucket::UnderOneHour,
            integration_band: IntegrationBand::High,
        }
    }

    #[test]
    fn test_sorted_by_commits_then_identity() {
        let stats = vec![
            stat("Cara <c@example.com>", 3),
            stat("Bob <b@example.com>", 3),
            stat("Alice <a@example.com>", 4),
            stat("Drew <d@example.com>", 1),
        ];
        let names: Vec<_> = top_authors(&stats, TOP_AUTHORS).into_iter().map(|r| r.author).collect();
        assert_eq!(names, vec![
            "Alice <a@example.com>",
            "Bob <b@example.com>",
            "Cara <c@example.com>",
            "Drew <d@example.com>",
        ]);
    }

    #[test]
    fn test_truncates_to_limit() {
        let stats: Vec<_> = (0..15).map(|i| stat(&format!("Dev{i:02} <d{i}@example.com>"), 15 - i)).collect();
        let top = top_authors(&stats, TOP_AUTHORS);
        assert_eq!(top.len(), 10);
        assert_eq!(top[0].commits, 15);
        assert_eq!(top[9].commits, 6);
    }

    #[test]
    fn test_fewer_authors_than_limit() {
        let stats = vec![stat("Solo <s@example.com>", 2)];
        assert_eq!(top_authors(&stats, TOP_AUTHORS).len(), 1);
        assert!(top_authors(&[], TOP_AUTHORS).is_empty());
    }

    #[test]
    fn test_fields_copied_unchanged() {
        let mut s = stat("Evan <e@example.com>", 2);
        s.ci_within_8h_percent = 50.0;
        s.daily_integration_rate_percent = 0.0;
        s.max_day_gap = 4;
        let row = &top_authors(&[s], TOP_AUTHORS)[0];
        assert_eq!(row.ci_within_8h_percent, 50.0);
        assert_eq!(row.daily_integration_rate_percent, 0.0);
        assert_eq!(row.max_day_gap, 4);
    }
}
