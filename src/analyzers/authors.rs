use std::collections::{BTreeSet, HashMap};
use chrono::{NaiveDate, Utc};
use crate::analyzers::delay::classify;
use crate::analyzers::percent;
use crate::types::{AuthorStat, CommitRecord, DelayBucket, IntegrationBand};

const BAND_HIGH:     f64 = 70.0;
const BAND_MODERATE: f64 = 50.0;
const BAND_LOW:      f64 = 30.0;

/// A gap of at most this many days counts as "integrated daily".
const DAILY_GAP_MAX: i64 = 1;

#[derive(Default)]
struct AuthorAccumulator {
    commit_count:  usize,
    bucket_counts: [usize; 4],
    active_days:   BTreeSet<NaiveDate>,
}

/// Groups commits by exact author identity and derives per-author metrics.
/// Output is sorted by identity so repeated runs are identical.
pub fn analyze_authors(commits: &[CommitRecord]) -> Vec<AuthorStat> {
    let mut by_author: HashMap<String, AuthorAccumulator> = HashMap::new();

    for commit in commits {
        let acc = by_author.entry(commit.identity()).or_default();
        acc.commit_count += 1;
        acc.bucket_counts[classify(commit).index()] += 1;
        acc.active_days.insert(commit.commit_time.with_timezone(&Utc).date_naive());
    }

    let mut stats: Vec<AuthorStat> = by_author
        .into_iter()
        .map(|(identity, acc)| {
            let within_8h = acc.commit_count - acc.bucket_counts[DelayBucket::OverEightHours.index()];
            let gaps = day_gaps(&acc.active_days);
            let rate = daily_integration_rate(&gaps);

            AuthorStat {
                identity,
                commit_count: acc.commit_count,
                ci_within_8h_percent: percent(within_8h, acc.commit_count),
                daily_integration_rate_percent: rate,
                max_day_gap: gaps.iter().copied().max().unwrap_or(0),
                dominant_bucket: dominant_bucket(&acc.bucket_counts),
                integration_band: integration_band(rate),
            }
        })
        .collect();

    stats.sort_by(|a, b| a.identity.cmp(&b.identity));
    stats
}

/// Whole-day differences between consecutive distinct active days.
/// Empty when the author was active on fewer than two days.
pub fn day_gaps(days: &BTreeSet<NaiveDate>) -> Vec<i64> {
    days.iter()
        .zip(days.iter().skip(1))
        .map(|(prev, next)| (*next - *prev).num_days())
        .collect()
}

/// Share of gaps of at most one day. A single active day scores 100.
pub fn daily_integration_rate(gaps: &[i64]) -> f64 {
    if gaps.is_empty() {
        return 100.0;
    }
    let daily = gaps.iter().filter(|&&g| g <= DAILY_GAP_MAX).count();
    percent(daily, gaps.len())
}

/// Highest count wins; on a tie the earlier bucket in display order wins.
pub fn dominant_bucket(counts: &[usize; 4]) -> DelayBucket {
    let mut best = DelayBucket::ALL[0];
    for bucket in DelayBucket::ALL {
        if counts[bucket.index()] > counts[best.index()] {
            best = bucket;
        }
    }
    best
}

pub fn integration_band(rate: f64) -> IntegrationBand {
    if rate >= BAND_HIGH { IntegrationBand::High }
    else if rate >= BAND_MODERATE { IntegrationBand::Moderate }
    else if rate >= BAND_LOW { IntegrationBand::Low }
    else { IntegrationBand::Rare }
}
