use std::collections::BTreeMap;
use crate::types::{AuthorStat, ClusterDetailRow, ClusterSummaryRow, DelayBucket, IntegrationBand};

/// Every author annotated with its cluster key, sorted by identity.
pub fn cluster_details(stats: &[AuthorStat]) -> Vec<ClusterDetailRow> {
    let mut rows: Vec<ClusterDetailRow> = stats
        .iter()
        .map(|s| ClusterDetailRow {
            dominant_delay_bucket: s.dominant_bucket,
            daily_integration_band: s.integration_band,
            author: s.identity.clone(),
            commits: s.commit_count,
            daily_integration_rate_percent: s.daily_integration_rate_percent,
            max_day_gap: s.max_day_gap,
        })
        .collect();
    rows.sort_by(|a, b| a.author.cmp(&b.author));
    rows
}

/// One row per occupied (dominant bucket, band) pair. The enums' declaration
/// order is the display order, so the BTreeMap iterates already sorted.
pub fn cluster_summary(stats: &[AuthorStat]) -> Vec<ClusterSummaryRow> {
    // (authors, commits)
    let mut clusters: BTreeMap<(DelayBucket, IntegrationBand), (usize, usize)> = BTreeMap::new();

    for s in stats {
        let entry = clusters.entry((s.dominant_bucket, s.integration_band)).or_insert((0, 0));
        entry.0 += 1;
        entry.1 += s.commit_count;
    }

    clusters
        .into_iter()
        .map(|((bucket, band), (authors, commits))| ClusterSummaryRow {
            dominant_delay_bucket: bucket,
            daily_integration_band: band,
            authors,
            commits,
        })
        .collect()
}
