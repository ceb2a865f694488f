use crate::analyzers;
use crate::analyzers::top_authors::TOP_AUTHORS;
use crate::types::{AnalysisTables, CommitRecord};
use tracing::debug;

/// Runs every analyzer over the same immutable commit slice.
///
/// The histogram and the author table are independent, as are the ranking
/// and the clustering built on the author table, so each pair runs under
/// `rayon::join`. Output is identical to a sequential run.
pub fn analyze(commits: &[CommitRecord]) -> AnalysisTables {
    let (overall_buckets, authors) = rayon::join(
        || analyzers::buckets::overall_buckets(commits),
        || analyzers::authors::analyze_authors(commits),
    );
    debug!(commits = commits.len(), authors = authors.len(), "aggregated authors");

    let (top10_authors, (cluster_summary, cluster_details)) = rayon::join(
        || analyzers::top_authors::top_authors(&authors, TOP_AUTHORS),
        || rayon::join(
            || analyzers::clusters::cluster_summary(&authors),
            || analyzers::clusters::cluster_details(&authors),
        ),
    );

    AnalysisTables {
        overall_buckets,
        top10_authors,
        cluster_summary,
        cluster_details,
    }
}
