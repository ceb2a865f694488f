use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use crate::types::Report;

/// Outputs the report as JSON. Writes to a file if given, otherwise stdout.
pub fn report_json(report: &Report, output_file: Option<&Path>) -> Result<(), String> {
    match output_file {
        Some(path) => {
            let file = File::create(path)
                .map_err(|e| format!("Failed to open {} for writing: {e}", path.display()))?;
            write_json(report, BufWriter::new(file))
                .map_err(|e| format!("Failed to write {}: {e}", path.display()))?;
            eprintln!("✓ JSON report written to {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            write_json(report, BufWriter::new(stdout.lock()))
                .map_err(|e| format!("Failed to write stdout: {e}"))?;
        }
    }
    Ok(())
}

fn write_json<W: Write>(report: &Report, mut writer: W) -> Result<(), String> {
    serde_json::to_writer_pretty(&mut writer, report)
        .map_err(|e| format!("JSON serialization failed: {e}"))?;
    writer.write_all(b"\n").map_err(|e| e.to_string())?;
    writer.flush().map_err(|e| e.to_string())
}
