use thiserror::Error;

/// Which of a commit's two timestamps failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampField {
    Author,
    Commit,
}

impl std::fmt::Display for TimestampField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimestampField::Author => write!(f, "author"),
            TimestampField::Commit => write!(f, "commit"),
        }
    }
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// `record` is the 1-based position of the record in the log.
    #[error("invalid {field} timestamp {value:?} on record {record} (commit {hash})")]
    InvalidTimestamp {
        record: usize,
        hash: String,
        field: TimestampField,
        value: String,
    },

    #[error("malformed git log record {record}: {line:?}")]
    MalformedRecord { record: usize, line: String },

    #[error("failed to run git: {0}")]
    GitSpawn(#[source] std::io::Error),

    #[error("failed reading git output: {0}")]
    GitRead(#[source] std::io::Error),
}
