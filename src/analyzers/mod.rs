pub mod authors;
pub mod buckets;
pub mod clusters;
pub mod delay;
pub mod top_authors;

/// `count / total` as a percentage with one decimal, rounded half away from
/// zero on the per-mille value. A zero total yields 0.
pub fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    ((count as f64 / total as f64) * 1000.0).round() / 10.0
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::types::CommitRecord;
    use chrono::{DateTime, Duration};

    /// `author` is `"Name <email>"`; the commit lands `delay_minutes` after `authored`.
    pub fn commit_with_delay(author: &str, authored: &str, delay_minutes: i64) -> CommitRecord {
        let (name, email) = author
            .split_once(" <")
            .map(|(n, e)| (n, e.trim_end_matches('>')))
            .unwrap_or((author, ""));
        let author_time = DateTime::parse_from_rfc3339(authored).expect("valid fixture timestamp");
        CommitRecord {
            hash: format!("{:x}", author_time.timestamp()),
            author_name: name.to_string(),
            author_email: email.to_string(),
            author_time,
            commit_time: author_time + Duration::minutes(delay_minutes),
        }
    }
}
