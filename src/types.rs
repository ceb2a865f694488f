use chrono::{DateTime, FixedOffset};
use serde::Serialize;

// ─── Core Git Data ────────────────────────────────────────────────────────────

/// One commit as handed over by the log source. Never mutated after parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitRecord {
    pub hash: String,
    pub author_name: String,
    pub author_email: String,
    pub author_time: DateTime<FixedOffset>,
    pub commit_time: DateTime<FixedOffset>,
}

impl CommitRecord {
    /// `"<name> <<email>>"`, compared byte for byte. No case folding or trimming.
    pub fn identity(&self) -> String {
        format!("{} <{}>", self.author_name, self.author_email)
    }
}

// ─── Delay Buckets ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum DelayBucket {
    #[serde(rename = "<1h")]
    UnderOneHour,
    #[serde(rename = "1-4h")]
    OneToFourHours,
    #[serde(rename = "4-8h")]
    FourToEightHours,
    #[serde(rename = ">8h")]
    OverEightHours,
}

impl DelayBucket {
    /// Fixed display and tie-break order.
    pub const ALL: [DelayBucket; 4] = [
        DelayBucket::UnderOneHour,
        DelayBucket::OneToFourHours,
        DelayBucket::FourToEightHours,
        DelayBucket::OverEightHours,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            DelayBucket::UnderOneHour     => "<1h",
            DelayBucket::OneToFourHours   => "1-4h",
            DelayBucket::FourToEightHours => "4-8h",
            DelayBucket::OverEightHours   => ">8h",
        }
    }
}

impl std::fmt::Display for DelayBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ─── Integration Bands ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum IntegrationBand {
    #[serde(rename = ">=70%")]
    High,
    #[serde(rename = "50-69%")]
    Moderate,
    #[serde(rename = "30-49%")]
    Low,
    #[serde(rename = "<30%")]
    Rare,
}

impl IntegrationBand {
    pub fn label(self) -> &'static str {
        match self {
            IntegrationBand::High     => ">=70%",
            IntegrationBand::Moderate => "50-69%",
            IntegrationBand::Low      => "30-49%",
            IntegrationBand::Rare     => "<30%",
        }
    }
}

impl std::fmt::Display for IntegrationBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ─── Analyzer Outputs ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct AuthorStat {
    pub identity: String,
    pub commit_count: usize,
    pub ci_within_8h_percent: f64,
    pub daily_integration_rate_percent: f64,
    pub max_day_gap: i64,
    pub dominant_bucket: DelayBucket,
    pub integration_band: IntegrationBand,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverallBucketRow {
    pub bucket: DelayBucket,
    pub count: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopAuthorRow {
    pub author: String,
    pub commits: usize,
    pub ci_within_8h_percent: f64,
    pub daily_integration_rate_percent: f64,
    pub max_day_gap: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterDetailRow {
    pub dominant_delay_bucket: DelayBucket,
    pub daily_integration_band: IntegrationBand,
    pub author: String,
    pub commits: usize,
    pub daily_integration_rate_percent: f64,
    pub max_day_gap: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterSummaryRow {
    pub dominant_delay_bucket: DelayBucket,
    pub daily_integration_band: IntegrationBand,
    pub authors: usize,
    pub commits: usize,
}

/// The four derived tables, in report order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisTables {
    pub overall_buckets: Vec<OverallBucketRow>,
    pub top10_authors: Vec<TopAuthorRow>,
    pub cluster_summary: Vec<ClusterSummaryRow>,
    pub cluster_details: Vec<ClusterDetailRow>,
}

// ─── Report ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    pub repo_path: String,
    pub branch: String,
    pub since: String,
    pub commit_count: usize,
    pub author_count: usize,
    pub analyzed_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub meta: ReportMeta,
    #[serde(flatten)]
    pub tables: AnalysisTables,
    pub issues: Vec<String>,
}
