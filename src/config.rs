use serde::Deserialize;
use std::path::Path;
use crate::filters::AuthorFilter;

/// All settings that can be placed in a .is-this-ci.yml config file.
/// Every field is optional — omitted fields fall back to CLI defaults.
/// CLI flags always take precedence over values set here.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CiConfig {
    // Analysis defaults (overridden by the corresponding CLI flag)
    pub branch: Option<String>,
    pub since: Option<String>,
    pub format: Option<String>,
    pub output: Option<String>,

    // Author filtering
    pub exclude_authors: Option<Vec<String>>,
    pub exclude_bots: Option<bool>,
}

impl CiConfig {
    /// Builds the author filter; `force_bots` comes from `--exclude-bots`.
    pub fn author_filter(&self, force_bots: bool) -> Result<AuthorFilter, String> {
        AuthorFilter::new(
            self.exclude_authors.as_deref().unwrap_or_default(),
            force_bots || self.exclude_bots.unwrap_or(false),
        )
    }

    /// Validates semantic constraints that serde cannot enforce.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(fmt) = &self.format {
            match fmt.as_str() {
                "terminal" | "json" | "html" => {}
                other => {
                    return Err(format!(
                        "Invalid 'format' value: \"{other}\". \
                         Expected one of: \"terminal\", \"json\", \"html\""
                    ))
                }
            }
        }

        if let Some(branch) = &self.branch {
            check_branch(branch)?;
        }

        self.author_filter(false)
            .map(|_| ())
            .map_err(|e| format!("Invalid 'exclude_authors': {e}"))
    }
}

/// A branch must be non-empty and must not start with `-`, which git would
/// read as an option.
pub fn check_branch(branch: &str) -> Result<(), String> {
    if branch.trim().is_empty() {
        return Err("Invalid 'branch' value: empty. Omit the field to analyze HEAD".to_string());
    }
    if branch.starts_with('-') {
        return Err(format!("Invalid 'branch' value: \"{branch}\" must not start with '-'"));
    }
    Ok(())
}

/// Reads, parses, and validates a YAML config file from `path`.
pub fn load_config(path: &Path) -> Result<CiConfig, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Cannot read config file '{}': {e}", path.display()))?;
    let cfg: CiConfig = serde_yaml::from_str(&content)
        .map_err(|e| format!("Invalid config file '{}': {e}", path.display()))?;
    cfg.validate()
        .map_err(|e| format!("Config file '{}': {e}", path.display()))?;
    Ok(cfg)
}

/// Annotated YAML template — printed by `--generate-config`.
pub static TEMPLATE: &str = r#"# is-this-ci configuration file
# Generated by: is-this-ci --generate-config
#
# All settings are optional. Omit any field to use the built-in default.
# CLI flags always take precedence over values in this file.
# Save this file as .is-this-ci.yml in your repository root, then run:
#
#   is-this-ci --config .is-this-ci.yml [path]

# ── Analysis scope ─────────────────────────────────────────────────────────────

# Branch or revision whose history is analyzed, e.g. "origin/main".
# branch: "HEAD"

# Only consider commits since this date. Leave empty (or omit) for all history.
# Accepts any git date format: "6 months ago", "2024-01-01"
# since: ""

# ── Output ─────────────────────────────────────────────────────────────────────

# Output format: terminal, json, html
# format: "terminal"

# Output file path. For HTML, defaults to ~/Desktop/is-this-ci-report.html
# output: "is-this-ci-report.json"

# ── Author filtering ───────────────────────────────────────────────────────────
# Patterns are regular expressions matched against "Name <email>".
# Matching commits are left out of every table.

# exclude_authors:
#   - "@build\\.internal>$"
#   - "^Release Robot "

# Drop automation accounts such as "dependabot[bot]".
# exclude_bots: false
"#;

/// Prints the config template to stdout, or writes it to `output_path` if given.
pub fn print_template(output_path: Option<&Path>) -> Result<(), String> {
    match output_path {
        Some(path) => std::fs::write(path, TEMPLATE)
            .map_err(|e| format!("Cannot write config template to '{}': {e}", path.display())),
        None => {
            print!("{TEMPLATE}");
            Ok(())
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
