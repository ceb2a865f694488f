use crate::analyzers::delay::classify;
use crate::analyzers::percent;
use crate::types::{CommitRecord, DelayBucket, OverallBucketRow};

/// Histogram of all commits over the four delay buckets.
/// Always returns four rows in bucket order, even for empty input.
pub fn overall_buckets(commits: &[CommitRecord]) -> Vec<OverallBucketRow> {
    let mut counts = [0usize; 4];
    for commit in commits {
        counts[classify(commit).index()] += 1;
    }

    let total = commits.len();
    DelayBucket::ALL
        .iter()
        .map(|&bucket| OverallBucketRow {
            bucket,
            count: counts[bucket.index()],
            percent: percent(counts[bucket.index()], total),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::test_support::commit_with_delay;

    #[test]
    fn test_even_spread_across_buckets() {
        let delays = [10, 50, 90, 200, 300, 420, 600, 3000];
        let commits: Vec<_> = delays
            .iter()
            .map(|&m| commit_with_delay("Dev <dev@example.com>", "2024-01-01T10:00:00+00:00", m))
            .collect();
        let rows = overall_buckets(&commits);
        let expected: Vec<(DelayBucket, usize, f64)> = DelayBucket::ALL.iter().map(|&b| (b, 2, 25.0)).collect();
        let actual: Vec<(DelayBucket, usize, f64)> = rows.iter().map(|r| (r.bucket, r.count, r.percent)).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_empty_input_reports_four_zero_rows() {
        let rows = overall_buckets(&[]);
        assert_eq!(rows.len(), 4, "All four buckets must always be present");
        for (row, bucket) in rows.iter().zip(DelayBucket::ALL) {
            assert_eq!(row.bucket, bucket);
            assert_eq!(row.count, 0);
            assert_eq!(row.percent, 0.0);
        }
    }

    #[test]
    fn test_thirds_round_to_one_decimal() {
        let commits = vec![
            commit_with_delay("A <a@example.com>", "2024-01-01T10:00:00+00:00", 30),
            commit_with_delay("B <b@example.com>", "2024-01-01T09:00:00+00:00", 240),
            commit_with_delay("A <a@example.com>", "2024-01-01T08:00:00+00:00", 60 * 26),
        ];
        let rows = overall_buckets(&commits);
        let percents: Vec<f64> = rows.iter().map(|r| r.percent).collect();
        assert_eq!(percents, vec![33.3, 0.0, 33.3, 33.3]);
    }
}
