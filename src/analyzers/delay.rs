use crate::types::{CommitRecord, DelayBucket};

const MS_PER_HOUR: f64 = 3_600_000.0;

/// Signed hours between authoring and committing. Negative when the commit
/// timestamp precedes the author timestamp (rebases, clock skew).
pub fn delay_hours(commit: &CommitRecord) -> f64 {
    (commit.commit_time - commit.author_time).num_milliseconds() as f64 / MS_PER_HOUR
}

/// First match wins: <1, <4, <8, everything else.
pub fn bucket_for_delay(hours: f64) -> DelayBucket {
    if hours < 1.0 {
        DelayBucket::UnderOneHour
    } else if hours < 4.0 {
        DelayBucket::OneToFourHours
    } else if hours < 8.0 {
        DelayBucket::FourToEightHours
    } else {
        DelayBucket::OverEightHours
    }
}

pub fn classify(commit: &CommitRecord) -> DelayBucket {
    bucket_for_delay(delay_hours(commit))
}
