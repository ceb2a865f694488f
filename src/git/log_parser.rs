use crate::error::{AnalysisError, TimestampField};
use crate::types::CommitRecord;
use chrono::{DateTime, FixedOffset};
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread;
use tracing::{debug, warn};

/// hash | author name | author email | author date | committer date
const LOG_FORMAT: &str = "--pretty=format:%H|%an|%ae|%aI|%cI";

/// Layout produced by `git log --date=iso`, accepted alongside strict ISO-8601.
const GIT_ISO_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// Commit records read from the log source plus any non-fatal problems.
#[derive(Debug, Default)]
pub struct LogOutcome {
    pub commits: Vec<CommitRecord>,
    pub issues: Vec<String>,
}

/// Streams `git log <branch>` and parses every line into a [`CommitRecord`].
///
/// Output is consumed line by line so there is no buffer ceiling. If git
/// exits non-zero the records read so far are kept and the failure is
/// reported as an issue. A bad timestamp aborts the whole read.
pub fn parse_log(cwd: &Path, branch: &str, since: &str) -> Result<LogOutcome, AnalysisError> {
    let mut args: Vec<String> = vec!["log".into(), branch.into(), LOG_FORMAT.into()];

    if !since.is_empty() {
        args.push(format!("--since={since}"));
    }
    args.push("--".into());

    debug!(repo = %cwd.display(), ?args, "spawning git");

    let mut child = Command::new("git")
        .args(&args)
        .current_dir(cwd)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(AnalysisError::GitSpawn)?;

    let stdout = child.stdout.take().ok_or_else(|| {
        AnalysisError::GitSpawn(std::io::Error::other("failed to capture git stdout"))
    })?;
    let stderr = child.stderr.take().ok_or_else(|| {
        AnalysisError::GitSpawn(std::io::Error::other("failed to capture git stderr"))
    })?;

    let stderr_reader = thread::spawn(move || read_stderr(stderr));

    let commits = match read_log(BufReader::new(stdout)) {
        Ok(c) => c,
        Err(e) => {
            abort(&mut child);
            let _ = stderr_reader.join();
            return Err(e);
        }
    };

    let status = child.wait().map_err(AnalysisError::GitRead)?;
    let stderr_text = stderr_reader.join().unwrap_or_default();

    let mut issues = Vec::new();
    if !status.success() {
        let msg = format!("git log failed: {}", stderr_text.trim());
        warn!(status = ?status.code(), kept = commits.len(), "{msg}");
        issues.push(msg);
    }

    debug!(commits = commits.len(), "git log read");
    Ok(LogOutcome { commits, issues })
}

/// Whole stderr stream, lossily decoded so a failure message is never lost.
fn read_stderr<R: Read>(stderr: R) -> String {
    let mut raw = Vec::new();
    if let Err(e) = BufReader::new(stderr).read_to_end(&mut raw) {
        warn!(error = %e, "could not read git stderr");
    }
    String::from_utf8_lossy(&raw).into_owned()
}

fn abort(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

/// Parses log lines in the `LOG_FORMAT` layout from any buffered reader.
/// Blank lines are skipped and do not count as records. Bytes that are not
/// UTF-8 (old Latin-1 author names) are decoded lossily.
pub fn read_log<R: BufRead>(mut reader: R) -> Result<Vec<CommitRecord>, AnalysisError> {
    let mut commits = Vec::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).map_err(AnalysisError::GitRead)? == 0 {
            break;
        }
        let text = String::from_utf8_lossy(&buf);
        let line = text.trim_end_matches(['\n', '\r']);
        if line.trim().is_empty() {
            continue;
        }
        commits.push(parse_record(commits.len() + 1, line)?);
    }
    Ok(commits)
}

/// Splits one log line. The hash is the first field and the last three are
/// email and both timestamps; whatever lies between is the author name, so
/// names containing `|` are kept intact.
pub fn parse_record(record: usize, line: &str) -> Result<CommitRecord, AnalysisError> {
    let malformed = || AnalysisError::MalformedRecord { record, line: line.to_string() };

    let (hash, rest) = line.split_once('|').ok_or_else(malformed)?;
    let mut tail = rest.rsplitn(4, '|');
    let (Some(commit_raw), Some(author_raw), Some(email), Some(name)) =
        (tail.next(), tail.next(), tail.next(), tail.next())
    else {
        return Err(malformed());
    };

    let invalid = |field: TimestampField, value: &str| AnalysisError::InvalidTimestamp {
        record,
        hash: hash.to_string(),
        field,
        value: value.to_string(),
    };

    let author_time = parse_timestamp(author_raw).ok_or_else(|| invalid(TimestampField::Author, author_raw))?;
    let commit_time = parse_timestamp(commit_raw).ok_or_else(|| invalid(TimestampField::Commit, commit_raw))?;

    Ok(CommitRecord {
        hash: hash.to_string(),
        author_name: name.to_string(),
        author_email: email.to_string(),
        author_time,
        commit_time,
    })
}

/// Accepts `2024-01-01T10:00:00+00:00` and `2024-01-01 10:00:00 +0000`.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, GIT_ISO_FORMAT))
        .ok()
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parses_strict_iso_line() {
        let c = parse_record(1, "abc123|Alice Example|alice@example.com|2024-01-01T10:00:00+00:00|2024-01-01T10:30:00+00:00")
            .expect("line should parse");
        assert_eq!(c.hash, "abc123");
        assert_eq!(c.author_name, "Alice Example");
        assert_eq!(c.author_email, "alice@example.com");
        assert_eq!((c.commit_time - c.author_time).num_minutes(), 30);
    }

    #[test]
    fn test_parses_git_iso_layout_with_offsets() {
        let c = parse_record(1, "h|Bob|bob@example.com|2024-01-01 09:00:00 +0200|2024-01-01 13:00:00 +0000")
            .expect("git --date=iso layout should parse");
        // 09:00+02:00 is 07:00Z, so the delay is six hours
        assert_eq!((c.commit_time - c.author_time).num_hours(), 6);
    }

    #[test]
    fn test_author_name_with_pipe_survives() {
        let c = parse_record(1, "h|Team | Ops|ops@example.com|2024-01-01T10:00:00Z|2024-01-01T10:00:00Z")
            .expect("pipe in name should parse");
        assert_eq!(c.author_name, "Team | Ops");
        assert_eq!(c.identity(), "Team | Ops <ops@example.com>");
    }

    #[test]
    fn test_invalid_author_timestamp_identifies_record() {
        let err = parse_record(7, "deadbeef|Eve|eve@example.com|yesterday|2024-01-01T10:00:00Z")
            .expect_err("unparsable timestamp must fail");
        match err {
            AnalysisError::InvalidTimestamp { record, hash, field, value } => {
                assert_eq!(record, 7);
                assert_eq!(hash, "deadbeef");
                assert_eq!(field, TimestampField::Author);
                assert_eq!(value, "yesterday");
            }
            other => panic!("expected InvalidTimestamp, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_commit_timestamp_is_reported_as_commit_field() {
        let err = parse_record(1, "h|Eve|eve@example.com|2024-01-01T10:00:00Z|2024-13-45T99:00:00Z")
            .expect_err("out-of-range timestamp must fail");
        assert!(
            matches!(err, AnalysisError::InvalidTimestamp { field: TimestampField::Commit, .. }),
            "Commit timestamp should be named: {err}"
        );
    }

    #[test]
    fn test_too_few_fields_is_malformed() {
        let err = parse_record(3, "h|Eve|2024-01-01T10:00:00Z").expect_err("short line must fail");
        assert!(matches!(err, AnalysisError::MalformedRecord { record: 3, .. }), "got {err}");
    }

    #[test]
    fn test_read_log_skips_blank_lines_and_numbers_records() {
        let text = "\
h1|Alice Example|alice@example.com|2024-01-01 10:00:00 +0000|2024-01-01 10:30:00 +0000

h2|Bob Example|bob@example.com|2024-01-01 09:00:00 +0000|2024-01-01 13:00:00 +0000\r
h3|Alice Example|alice@example.com|2024-01-01 08:00:00 +0000|bogus
";
        let err = read_log(Cursor::new(text)).expect_err("third record is invalid");
        assert!(
            matches!(err, AnalysisError::InvalidTimestamp { record: 3, .. }),
            "Blank lines must not shift record numbers: {err}"
        );

        let ok = read_log(Cursor::new(&text[..text.rfind("h3").unwrap()])).expect("first two parse");
        assert_eq!(ok.len(), 2);
        assert_eq!(ok[1].hash, "h2");
    }

    #[test]
    fn test_read_log_decodes_latin1_name_lossily() {
        let bytes: &[u8] = b"h1|Jos\xe9 Ruiz|jose@example.com|2024-01-01T10:00:00+00:00|2024-01-01T10:30:00+00:00\n";
        let commits = read_log(Cursor::new(bytes)).expect("non-UTF-8 name must not abort the read");
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].author_name, "Jos\u{FFFD} Ruiz");
        assert_eq!(commits[0].author_email, "jose@example.com");
    }

    #[test]
    fn test_stderr_with_invalid_utf8_keeps_message() {
        let raw: &[u8] = b"fatal: bad revision 'caf\xe9'\n";
        let text = read_stderr(Cursor::new(raw));
        assert!(text.starts_with("fatal: bad revision 'caf"), "message must survive: {text:?}");
        assert!(text.contains('\u{FFFD}'));
    }

    #[test]
    fn test_read_log_last_line_without_newline() {
        let commits = read_log(Cursor::new("h1|Ann|ann@example.com|2024-01-01T10:00:00Z|2024-01-01T10:05:00Z"))
            .expect("final line without newline parses");
        assert_eq!(commits.len(), 1);
    }

    #[test]
    fn test_read_log_empty_input() {
        let commits = read_log(Cursor::new("")).expect("empty input is fine");
        assert!(commits.is_empty());
    }

    // ── git fixture tests ─────────────────────────────────────────────────────

    fn git_available() -> bool {
        Command::new("git")
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn git(dir: &Path, args: &[&str], envs: &[(&str, &str)]) {
        let status = Command::new("git")
            .args(["-c", "commit.gpgsign=false"])
            .args(args)
            .envs(envs.iter().copied())
            .current_dir(dir)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .expect("git should run");
        assert!(status.success(), "git {args:?} failed");
    }

    fn commit_at(dir: &Path, name: &str, email: &str, authored: &str, committed: &str) {
        git(
            dir,
            &["commit", "--allow-empty", "-m", "change"],
            &[
                ("GIT_AUTHOR_NAME", name),
                ("GIT_AUTHOR_EMAIL", email),
                ("GIT_AUTHOR_DATE", authored),
                ("GIT_COMMITTER_NAME", "CI Bot"),
                ("GIT_COMMITTER_EMAIL", "ci@example.com"),
                ("GIT_COMMITTER_DATE", committed),
            ],
        );
    }

    #[test]
    fn test_parse_log_reads_fixture_repo() {
        if !git_available() {
            eprintln!("Skipping: git not available");
            return;
        }
        let tmp = tempfile::tempdir().expect("tempdir");
        let dir = tmp.path();
        git(dir, &["init", "-q"], &[]);
        commit_at(dir, "Nora Fast", "nora@example.com", "2024-01-01T10:00:00+00:00", "2024-01-01T10:20:00+00:00");
        commit_at(dir, "Pia Slow", "pia@example.com", "2024-01-02T08:00:00+00:00", "2024-01-03T09:00:00+00:00");

        let outcome = parse_log(dir, "HEAD", "").expect("git log should succeed");
        assert!(outcome.issues.is_empty(), "No issues expected: {:?}", outcome.issues);
        assert_eq!(outcome.commits.len(), 2);

        // git log lists newest first
        assert_eq!(outcome.commits[0].identity(), "Pia Slow <pia@example.com>");
        assert_eq!(outcome.commits[1].identity(), "Nora Fast <nora@example.com>");
        let delay = outcome.commits[1].commit_time - outcome.commits[1].author_time;
        assert_eq!(delay.num_minutes(), 20, "Committer date must come from GIT_COMMITTER_DATE");
    }

    #[test]
    fn test_parse_log_unknown_branch_becomes_issue() {
        if !git_available() {
            eprintln!("Skipping: git not available");
            return;
        }
        let tmp = tempfile::tempdir().expect("tempdir");
        git(tmp.path(), &["init", "-q"], &[]);

        let outcome = parse_log(tmp.path(), "no-such-branch", "").expect("failure is not fatal");
        assert!(outcome.commits.is_empty());
        assert!(
            outcome.issues.iter().any(|i| i.contains("git log failed")),
            "Failure should be reported as an issue: {:?}",
            outcome.issues
        );
    }
}
