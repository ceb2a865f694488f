use colored::Colorize;
use comfy_table::{Table, Cell, Color, Attribute, CellAlignment, presets::UTF8_FULL};
use crate::types::*;

pub fn report_terminal(report: &Report) {
    let tables = &report.tables;
    eprintln!();
    println!(
        "{} — {} since \"{}\" ({} commits, {} authors)",
        "⏱ is-this-ci".cyan().bold(),
        report.meta.branch.bright_black(),
        report.meta.since.bright_black(),
        report.meta.commit_count.to_string().bright_black(),
        report.meta.author_count.to_string().bright_black(),
    );
    println!();

    print_section("Overall Buckets", "delay between authoring and committing, all commits");
    println!("{}", overall_table(&tables.overall_buckets));

    print_section("Top 10 Authors", "by commit volume");
    if tables.top10_authors.is_empty() {
        println!("{}", "  No authors found.".yellow());
    } else {
        println!("{}", top_authors_table(&tables.top10_authors));
    }

    print_section("Cluster Summary", "authors grouped by dominant delay and daily integration band");
    if tables.cluster_summary.is_empty() {
        println!("{}", "  No clusters.".yellow());
    } else {
        println!("{}", cluster_summary_table(&tables.cluster_summary));
    }

    print_section("Cluster Details", "one row per author");
    if tables.cluster_details.is_empty() {
        println!("{}", "  No authors found.".yellow());
    } else {
        println!("{}", cluster_details_table(&tables.cluster_details));
    }

    // ── Recommendations ────────────────────────────────────────────────────
    let recs = build_recommendations(&tables.cluster_details);
    if !recs.is_empty() {
        println!();
        println!("{}", "💡 Recommendations:".cyan());
        for rec in &recs {
            println!("    {} {}", "•".white(), rec);
        }
    }

    // ── Issues ─────────────────────────────────────────────────────────────
    if !report.issues.is_empty() {
        println!();
        println!("{}", "⚠️  Issues while reading history (results may be partial):".yellow().bold());
        for issue in &report.issues {
            println!("    {} {}", "•".yellow(), issue.bright_black());
        }
    }

    println!();
}

fn print_section(title: &str, subtitle: &str) {
    println!();
    println!("{} {}", title.bold(), format!("— {subtitle}").bright_black());
}

// ─── Tables ───────────────────────────────────────────────────────────────────

fn overall_table(rows: &[OverallBucketRow]) -> Table {
    let mut table = new_table(vec!["BUCKET", "COMMITS", "PERCENT", ""]);
    for r in rows {
        table.add_row(vec![
            bucket_cell(r.bucket),
            num_cell(r.count.to_string()),
            num_cell(format!("{:.1}%", r.percent)),
            bar_cell(r.percent),
        ]);
    }
    table
}

fn top_authors_table(rows: &[TopAuthorRow]) -> Table {
    let mut table = new_table(vec!["RANK", "AUTHOR", "COMMITS", "≤8H", "DAILY", "MAX GAP"]);
    for (i, r) in rows.iter().enumerate() {
        table.add_row(vec![
            Cell::new(format!("{:3}", i + 1)),
            Cell::new(truncate(&r.author, 48)),
            num_cell(r.commits.to_string()),
            num_cell(format!("{:.1}%", r.ci_within_8h_percent)),
            rate_cell(r.daily_integration_rate_percent),
            gap_cell(r.max_day_gap),
        ]);
    }
    table
}

fn cluster_summary_table(rows: &[ClusterSummaryRow]) -> Table {
    let mut table = new_table(vec!["DOMINANT DELAY", "DAILY BAND", "AUTHORS", "COMMITS"]);
    for r in rows {
        table.add_row(vec![
            bucket_cell(r.dominant_delay_bucket),
            band_cell(r.daily_integration_band),
            num_cell(r.authors.to_string()),
            num_cell(r.commits.to_string()),
        ]);
    }
    table
}

fn cluster_details_table(rows: &[ClusterDetailRow]) -> Table {
    let mut table = new_table(vec!["AUTHOR", "DOMINANT DELAY", "DAILY BAND", "COMMITS", "DAILY", "MAX GAP"]);
    for r in rows {
        table.add_row(vec![
            Cell::new(truncate(&r.author, 48)),
            bucket_cell(r.dominant_delay_bucket),
            band_cell(r.daily_integration_band),
            num_cell(r.commits.to_string()),
            rate_cell(r.daily_integration_rate_percent),
            gap_cell(r.max_day_gap),
        ]);
    }
    table
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(header);
    table
}

// ─── Cell builders ────────────────────────────────────────────────────────────
// Plain text plus native cell colors, so comfy-table measures visible widths.

fn num_cell(text: String) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

fn bucket_cell(bucket: DelayBucket) -> Cell {
    let cell = Cell::new(bucket.label());
    match bucket {
        DelayBucket::UnderOneHour     => cell.fg(Color::Green).add_attribute(Attribute::Bold),
        DelayBucket::OneToFourHours   => cell.fg(Color::Green),
        DelayBucket::FourToEightHours => cell.fg(Color::Yellow),
        DelayBucket::OverEightHours   => cell.fg(Color::Red),
    }
}

fn band_cell(band: IntegrationBand) -> Cell {
    let cell = Cell::new(band.label());
    match band {
        IntegrationBand::High     => cell.fg(Color::Green),
        IntegrationBand::Moderate => cell,
        IntegrationBand::Low      => cell.fg(Color::Yellow),
        IntegrationBand::Rare     => cell.fg(Color::Red),
    }
}

fn rate_cell(rate: f64) -> Cell {
    let cell = num_cell(format!("{rate:.1}%"));
    match rate {
        r if r >= 70.0 => cell.fg(Color::Green),
        r if r < 30.0  => cell.fg(Color::Red),
        _              => cell,
    }
}

fn gap_cell(days: i64) -> Cell {
    let cell = num_cell(format!("{days}d"));
    if days > 7 { cell.fg(Color::Yellow) } else { cell.fg(Color::DarkGrey) }
}

/// 5-char block bar for a 0–100 percentage.
fn bar_cell(percent: f64) -> Cell {
    let s = percent.round().clamp(0.0, 100.0) as usize;
    let parts = ["", "▏", "▎", "▍", "▌", "▋", "▊", "▉", "█"];
    let filled  = s / 20;
    let rem     = s % 20;
    let partial = parts[(rem * 8 / 20).min(8)];
    let bar = "█".repeat(filled) + partial;
    Cell::new(format!("{bar:<5}")).fg(Color::Cyan)
}

// ─── Other helpers ────────────────────────────────────────────────────────────

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max { return s.to_string(); }
    let head: String = s.chars().take(max - 1).collect();
    format!("{head}…")
}

fn build_recommendations(details: &[ClusterDetailRow]) -> Vec<String> {
    let mut ranked: Vec<&ClusterDetailRow> = details.iter().collect();
    ranked.sort_by(|a, b| b.commits.cmp(&a.commits).then_with(|| a.author.cmp(&b.author)));

    let mut recs = Vec::new();
    for r in ranked.into_iter().filter(|r| r.commits >= 2) {
        if r.dominant_delay_bucket == DelayBucket::OverEightHours {
            recs.push(format!(
                "{} usually lands work more than 8h after authoring it — consider smaller, more frequent merges",
                r.author.yellow()
            ));
        }
        if r.daily_integration_band == IntegrationBand::Rare {
            recs.push(format!(
                "{} integrates daily on only {:.1}% of active-day gaps (longest gap {} days)",
                r.author.yellow(), r.daily_integration_rate_percent, r.max_day_gap
            ));
        }
        if recs.len() >= 6 { break; }
    }
    recs
}
