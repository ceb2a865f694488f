mod types;
mod error;
mod git;
mod analyzers;
mod engine;
mod filters;
mod config;
mod reporters;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use types::*;

const DEFAULT_BRANCH: &str = "HEAD";
const DEFAULT_HTML_NAME: &str = "is-this-ci-report.html";

#[derive(Parser, Debug)]
#[command(
    name = "is-this-ci",
    about = "⏱ Measure how continuously a team integrates, from git history",
    version,
    long_about = "Reads a branch's commit log and reports how long work sits between\n\
                  authoring and committing, how often each author integrates day to\n\
                  day, and how authors cluster by those two habits."
)]
struct Args {
    /// Path to the git repository (defaults to the current directory).
    #[arg(value_name = "REPO")]
    repo_path: Option<PathBuf>,

    /// Branch or revision to analyze, e.g. "origin/main" [default: HEAD]
    #[arg(long)]
    branch: Option<String>,

    /// Leave empty (default) to include all history, or e.g. "6 months ago", "2024-01-01"
    #[arg(long)]
    since: Option<String>,

    /// Output format: terminal, json, html
    #[arg(long)]
    format: Option<String>,

    /// Output file. For --format html, defaults to ~/Desktop/is-this-ci-report.html
    #[arg(long)]
    output: Option<PathBuf>,

    /// Read pre-captured `git log --pretty=format:%H|%an|%ae|%aI|%cI` output instead of running git.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Path to a .is-this-ci.yml config file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print an annotated config template (or write it to PATH) and exit.
    #[arg(long, value_name = "PATH", num_args = 0..=1)]
    generate_config: Option<Option<PathBuf>>,

    /// Leave out automation accounts such as "dependabot[bot]".
    #[arg(long)]
    exclude_bots: bool,

    /// Increase diagnostic output (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Effective run settings after merging the config file under the CLI flags.
#[derive(Debug)]
struct Settings {
    repo_path: PathBuf,
    branch: String,
    since: String,
    format: String,
    output: Option<PathBuf>,
    filter: filters::AuthorFilter,
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Some(target) = &args.generate_config {
        if let Err(e) = config::print_template(target.as_deref()) {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
        if let Some(path) = target {
            eprintln!("✓ Config template written to {}", path.display());
        }
        return;
    }

    let result = resolve_settings(&args).and_then(|settings| run_analysis(&settings, args.log_file.as_deref()));
    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn resolve_settings(args: &Args) -> Result<Settings, String> {
    let cfg = match &args.config {
        Some(path) => {
            let cfg = config::load_config(path)?;
            info!(path = %path.display(), "loaded config");
            cfg
        }
        None => config::CiConfig::default(),
    };

    let repo_path = match &args.repo_path {
        Some(p) => p.clone(),
        None => std::env::current_dir().map_err(|e| format!("Failed to get current directory: {e}"))?,
    };
    if args.log_file.is_none() && !repo_path.exists() {
        return Err(format!("path does not exist: {}", repo_path.display()));
    }

    let format = args.format.clone()
        .or_else(|| cfg.format.clone())
        .unwrap_or_else(|| "terminal".to_string());
    if !matches!(format.as_str(), "terminal" | "json" | "html") {
        return Err(format!("Unknown format \"{format}\". Expected one of: terminal, json, html"));
    }

    let branch = args.branch.clone()
        .or_else(|| cfg.branch.clone())
        .unwrap_or_else(|| DEFAULT_BRANCH.to_string());
    config::check_branch(&branch)?;

    let output = args.output.clone().or_else(|| cfg.output.as_ref().map(PathBuf::from));

    Ok(Settings {
        output: default_output(&format, output),
        since: args.since.clone().or_else(|| cfg.since.clone()).unwrap_or_default(),
        filter: cfg.author_filter(args.exclude_bots)?,
        repo_path,
        branch,
        format,
    })
}

/// HTML always lands in a file; other formats only when asked.
fn default_output(format: &str, output: Option<PathBuf>) -> Option<PathBuf> {
    match format {
        "html" => Some(output.unwrap_or_else(|| {
            dirs::desktop_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(DEFAULT_HTML_NAME)
        })),
        _ => output,
    }
}

// ── Analysis pipeline ──────────────────────────────────────────────────────────

fn run_analysis(settings: &Settings, log_file: Option<&Path>) -> Result<(), String> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .map_err(|e| e.to_string())?
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.enable_steady_tick(Duration::from_millis(80));

    let total_start = Instant::now();
    let mut step_start = Instant::now();

    pb.set_message("[1/3] Reading commit log...");
    let outcome = match read_commits(settings, log_file) {
        Ok(o) => o,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };
    let read_count = outcome.commits.len();
    let commits = settings.filter.apply(outcome.commits);
    if settings.filter.is_active() {
        info!(kept = commits.len(), dropped = read_count - commits.len(), "author filter applied");
    }
    let t1 = fmt_dur(step_start.elapsed()); step_start = Instant::now();
    pb.println(format!("  ✓ [1/3] Reading commit log                    {t1}"));

    pb.set_message("[2/3] Analyzing integration habits...");
    let tables = engine::analyze(&commits);
    let t2 = fmt_dur(step_start.elapsed()); step_start = Instant::now();
    pb.println(format!("  ✓ [2/3] Analyzing integration habits          {t2}"));

    let report = Report {
        meta: ReportMeta {
            repo_path:    settings.repo_path.display().to_string(),
            branch:       settings.branch.clone(),
            since:        if settings.since.is_empty() { "all history".to_string() } else { settings.since.clone() },
            commit_count: commits.len(),
            author_count: tables.cluster_details.len(),
            analyzed_at:  chrono::Utc::now().to_rfc3339(),
        },
        tables,
        issues: outcome.issues,
    };

    pb.set_message("[3/3] Rendering report...");
    let rendered = render(&report, &settings.format, settings.output.as_deref());
    let t3 = fmt_dur(step_start.elapsed());
    pb.finish_and_clear();
    rendered?;

    debug!(render = %t3, "report rendered");
    eprintln!("✔ {} commits, {} authors — ⏱ {}{}",
        report.meta.commit_count,
        report.meta.author_count,
        fmt_dur(total_start.elapsed()),
        if report.issues.is_empty() { String::new() } else {
            format!(" — ⚠ {} issue(s)", report.issues.len())
        }
    );
    Ok(())
}

fn read_commits(settings: &Settings, log_file: Option<&Path>) -> Result<git::log_parser::LogOutcome, String> {
    match log_file {
        Some(path) => {
            let file = File::open(path)
                .map_err(|e| format!("Cannot read log file '{}': {e}", path.display()))?;
            let commits = git::log_parser::read_log(BufReader::new(file)).map_err(|e| e.to_string())?;
            info!(path = %path.display(), commits = commits.len(), "read captured log");
            Ok(git::log_parser::LogOutcome { commits, issues: Vec::new() })
        }
        None => git::log_parser::parse_log(&settings.repo_path, &settings.branch, &settings.since)
            .map_err(|e| e.to_string()),
    }
}

fn render(report: &Report, format: &str, output: Option<&Path>) -> Result<(), String> {
    match format {
        "json" => reporters::json::report_json(report, output),
        "html" => {
            let path = output.ok_or("output path required for html")?;
            reporters::html::report_html(report, path)
        }
        _ => {
            reporters::terminal::report_terminal(report);
            Ok(())
        }
    }
}

// ── Duration formatting ────────────────────────────────────────────────────────

fn fmt_dur(d: Duration) -> String {
    let ms = d.as_millis();
    if ms >= 1000 { format!("{:.1}s", d.as_secs_f64()) } else { format!("{ms}ms") }
}
