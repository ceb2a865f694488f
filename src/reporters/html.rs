use crate::types::Report;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Static description of one report table: ids, tooltips, column glossary,
/// and which columns drive its bar chart.
struct TableDef {
    id: &'static str,
    title: &'static str,
    tooltip: &'static str,
    columns: &'static [(&'static str, &'static str)],
    chart_label: &'static str,
    chart_value: &'static str,
}

const TABLES: [TableDef; 4] = [
    TableDef {
        id: "overall_buckets",
        title: "Overall Buckets",
        tooltip: "Delay buckets across all commits",
        columns: &[
            ("bucket", "Fixed bins <1h, 1-4h, 4-8h, >8h of (commit date − author date) per commit"),
            ("count", "Number of commits whose delay falls into the bucket"),
            ("percent", "count / total commits × 100, one decimal"),
        ],
        chart_label: "bucket",
        chart_value: "count",
    },
    TableDef {
        id: "top10_authors",
        title: "Top 10 Authors",
        tooltip: "Top authors by commit volume",
        columns: &[
            ("author", "Author identity \"name <email>\", matched exactly"),
            ("commits", "Number of commits with this author identity"),
            ("ci_within_8h_percent", "(commits with delay < 8h) / commits × 100"),
            ("daily_integration_rate_percent", "Share of gaps between consecutive distinct commit days (UTC) that are at most one day"),
            ("max_day_gap", "Longest gap in days between consecutive distinct commit days"),
        ],
        chart_label: "author",
        chart_value: "commits",
    },
    TableDef {
        id: "cluster_summary",
        title: "Cluster Summary",
        tooltip: "Cluster rollups by delay and daily integration",
        columns: &[
            ("dominant_delay_bucket", "Most common delay bucket of the authors in the cluster"),
            ("daily_integration_band", "Band of the daily integration rate: >=70%, 50-69%, 30-49%, <30%"),
            ("authors", "Number of authors sharing this dominant bucket and band"),
            ("commits", "Sum of the commit counts of those authors"),
        ],
        chart_label: "dominant_delay_bucket",
        chart_value: "commits",
    },
    TableDef {
        id: "cluster_details",
        title: "Cluster Details",
        tooltip: "Per-author cluster metrics and assignment",
        columns: &[
            ("dominant_delay_bucket", "Most frequent delay bucket in the author's commits (ties go to the faster bucket)"),
            ("daily_integration_band", "Band of the author's daily integration rate"),
            ("author", "Author identity \"name <email>\", matched exactly"),
            ("commits", "Number of commits with this author identity"),
            ("daily_integration_rate_percent", "Same calculation as in Top 10 Authors"),
            ("max_day_gap", "Longest gap in days between consecutive distinct commit days"),
        ],
        chart_label: "author",
        chart_value: "commits",
    },
];

pub fn report_html(report: &Report, output_file: &Path) -> Result<(), String> {
    let html = build_html(report)?;
    fs::write(output_file, &html)
        .map_err(|e| format!("Failed to write {}: {e}", output_file.display()))?;
    eprintln!("✓ HTML report written to {}", output_file.display());
    Ok(())
}

fn build_html(report: &Report) -> Result<String, String> {
    let data = serde_json::to_value(&report.tables)
        .map_err(|e| format!("JSON serialization failed: {e}"))?;

    let mut sections = String::new();
    for table in &TABLES {
        let rows = data.get(table.id).and_then(Value::as_array).map(Vec::as_slice).unwrap_or(&[]);
        sections.push_str(&render_section(table, rows)?);
    }

    let nav: String = TABLES
        .iter()
        .map(|t| (t.id, t.title))
        .chain([("glossary", "Glossary"), ("issues", "Issues")])
        .map(|(id, title)| format!("<a href=\"#section-{id}\" data-nav=\"{id}\">{}</a>", esc(title)))
        .collect();

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8"><meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Is This CI Report — {branch}</title>
  <style>
    *,*::before,*::after{{box-sizing:border-box;margin:0;padding:0}}
    body{{font-family:Georgia,'Times New Roman',serif;background:#f6f4ef;color:#212121;font-size:14px;line-height:1.5}}
    header{{padding:2rem 1.5rem .5rem}} h1{{font-size:2rem}}
    h2{{font-size:1.35rem;color:#2f5d50;margin-bottom:.75rem}}
    .meta{{color:#6b6b6b;font-size:.8rem;margin-top:.4rem}} .meta span{{margin-right:1.25rem}}
    nav{{position:sticky;top:0;background:#f6f4ef;border-bottom:1px solid #d9d2c3;padding:.6rem 1.5rem;z-index:1}}
    nav a{{color:#2f5d50;margin-right:1rem;text-decoration:none;font-weight:600}}
    .report-section{{padding:1.5rem;border-top:1px solid #d9d2c3}}
    .glossary-icon{{cursor:help;color:#6b8f71;font-size:.9rem}}
    table{{width:100%;border-collapse:collapse;margin-bottom:1rem}}
    th,td{{padding:.5rem .6rem;border-bottom:1px solid #d9d2c3;text-align:left}}
    th{{font-weight:600;color:#2f5d50;cursor:help}}
    td.num{{text-align:right;font-variant-numeric:tabular-nums}}
    .chart{{display:grid;grid-template-columns:minmax(6rem,18rem) 1fr;gap:.3rem .75rem;align-items:center;max-width:56rem}}
    .chart .label{{font-size:.8rem;color:#444;overflow:hidden;text-overflow:ellipsis;white-space:nowrap}}
    .chart .bar{{height:1rem;background:#6b8f71;border-radius:2px;min-width:2px}}
    .chart .bar span{{display:inline-block;margin-left:calc(100% + .4rem);font-size:.75rem;color:#6b6b6b}}
    dl dt{{font-weight:600;margin-top:.6rem;font-family:ui-monospace,monospace}} dl dd{{margin-left:1rem;color:#444}}
    .issues li{{color:#9c3b2a;margin-left:1.25rem}} .empty{{color:#6b6b6b;font-style:italic}}
  </style>
</head>
<body>
  <header>
    <h1>Is This CI Report</h1>
    <p class="meta">
      <span>Repo: <strong>{repo}</strong></span>
      <span>Branch: <strong>{branch}</strong></span>
      <span>Since: <strong>{since}</strong></span>
      <span>Commits: <strong>{commits}</strong></span>
      <span>Authors: <strong>{authors}</strong></span>
      <span>Generated: <strong>{analyzed_at}</strong></span>
    </p>
  </header>
  <nav>{nav}</nav>
{sections}
{glossary}
{issues}
</body>
</html>
"#,
        repo = esc(&report.meta.repo_path),
        branch = esc(&report.meta.branch),
        since = esc(&report.meta.since),
        commits = report.meta.commit_count,
        authors = report.meta.author_count,
        analyzed_at = esc(&report.meta.analyzed_at),
        nav = nav,
        sections = sections,
        glossary = render_glossary(),
        issues = render_issues(&report.issues),
    ))
}

fn render_section(table: &TableDef, rows: &[Value]) -> Result<String, String> {
    let header: String = table
        .columns
        .iter()
        .map(|(col, tip)| format!("<th data-column=\"{col}\" title=\"{}\">{col}</th>", esc(tip)))
        .collect();

    let body: String = if rows.is_empty() {
        format!("<tr><td class=\"empty\" colspan=\"{}\">No data</td></tr>", table.columns.len())
    } else {
        rows.iter()
            .map(|row| {
                let cells: String = table
                    .columns
                    .iter()
                    .map(|(col, _)| {
                        let v = row.get(*col).unwrap_or(&Value::Null);
                        let class = if v.is_number() { " class=\"num\"" } else { "" };
                        format!("<td{class}>{}</td>", esc(&cell_text(v)))
                    })
                    .collect();
                format!("<tr>{cells}</tr>")
            })
            .collect()
    };

    let raw = serde_json::to_string(rows).map_err(|e| format!("JSON serialization failed: {e}"))?;

    Ok(format!(
        r#"  <section class="report-section" id="section-{id}">
    <h2>{title} <span class="glossary-icon" data-glossary="{id}" title="{tooltip}">ⓘ</span></h2>
    <table data-table="{id}" title="{tooltip}">
      <thead><tr>{header}</tr></thead>
      <tbody>{body}</tbody>
    </table>
    {chart}
    <script type="application/json" id="table-data-{id}">{data}</script>
  </section>
"#,
        id = table.id,
        title = esc(table.title),
        tooltip = esc(table.tooltip),
        header = header,
        body = body,
        chart = render_chart(table, rows),
        data = safe_json(&raw),
    ))
}

/// Horizontal CSS bars of `chart_value`, scaled to the largest row.
fn render_chart(table: &TableDef, rows: &[Value]) -> String {
    let values: Vec<(String, f64)> = rows
        .iter()
        .map(|row| {
            let label = cell_text(row.get(table.chart_label).unwrap_or(&Value::Null));
            let value = row.get(table.chart_value).and_then(Value::as_f64).unwrap_or(0.0);
            (label, value)
        })
        .collect();
    let max = values.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);
    if max <= 0.0 {
        return format!("<div class=\"chart\" data-chart-id=\"{}\"></div>", table.id);
    }

    let bars: String = values
        .iter()
        .map(|(label, value)| {
            let width = value / max * 100.0;
            format!(
                "<div class=\"label\" title=\"{l}\">{l}</div><div class=\"bar\" style=\"width:{width:.1}%\"><span>{value}</span></div>",
                l = esc(label),
            )
        })
        .collect();
    format!("<div class=\"chart\" data-chart-id=\"{}\">{bars}</div>", table.id)
}

fn render_glossary() -> String {
    let entries: String = TABLES
        .iter()
        .map(|table| {
            let cols: String = table
                .columns
                .iter()
                .map(|(col, tip)| format!("<dt>{}.{col}</dt><dd>{}</dd>", table.id, esc(tip)))
                .collect();
            format!("<h3>{}</h3><p>{}</p><dl>{cols}</dl>", esc(table.title), esc(table.tooltip))
        })
        .collect();
    format!("  <section class=\"report-section\" id=\"section-glossary\">\n    <h2>Glossary</h2>\n    {entries}\n  </section>")
}

fn render_issues(issues: &[String]) -> String {
    let body = if issues.is_empty() {
        "<p class=\"empty\">No issues.</p>".to_string()
    } else {
        let items: String = issues.iter().map(|i| format!("<li>{}</li>", esc(i))).collect();
        format!("<ul class=\"issues\">{items}</ul>")
    };
    format!("  <section class=\"report-section\" id=\"section-issues\">\n    <h2>Issues</h2>\n    {body}\n  </section>")
}

fn cell_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn esc(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Keeps embedded JSON from closing its `<script>` element.
fn safe_json(s: &str) -> String {
    s.replace('<', "\\u003c")
}
