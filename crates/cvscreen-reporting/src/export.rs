use std::io::Write;
use std::path::Path;

use cvscreen_core::{ScreenStats, ScreeningRecord};

use crate::types::ExportFormat;

/// Export records to the given path in the requested format.
pub fn export_results(
    records: &[ScreeningRecord],
    stats: &ScreenStats,
    format: ExportFormat,
    path: &Path,
) -> Result<(), String> {
    let content = match format {
        ExportFormat::Csv => export_csv(records),
        ExportFormat::Json => export_json(records, stats)?,
        ExportFormat::Text => export_text(records, stats),
    };

    let mut file =
        std::fs::File::create(path).map_err(|e| format!("Failed to create file: {}", e))?;
    file.write_all(content.as_bytes())
        .map_err(|e| format!("Failed to write: {}", e))?;
    Ok(())
}

/// Quote a CSV field if it contains a separator, quote, or line break.
fn csv_escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// UTF-8 CSV with a header row and no index column.
pub fn export_csv(records: &[ScreeningRecord]) -> String {
    let mut out = String::from("file,predicted_class,relevance_prob,comment\n");
    for record in records {
        out.push_str(&format!(
            "{},{},{},{}\n",
            csv_escape(&record.file),
            record.predicted_class,
            record.relevance_prob,
            csv_escape(&record.comment),
        ));
    }
    out
}

#[derive(serde::Serialize)]
struct JsonReport<'a> {
    results: &'a [ScreeningRecord],
    stats: JsonStats,
}

#[derive(serde::Serialize)]
struct JsonStats {
    total: usize,
    screened: usize,
    recommended: usize,
    not_recommended: usize,
    empty: usize,
    failed: usize,
}

pub fn export_json(records: &[ScreeningRecord], stats: &ScreenStats) -> Result<String, String> {
    let report = JsonReport {
        results: records,
        stats: JsonStats {
            total: stats.total,
            screened: stats.screened,
            recommended: stats.recommended,
            not_recommended: stats.not_recommended,
            empty: stats.empty,
            failed: stats.failed,
        },
    };
    serde_json::to_string_pretty(&report).map_err(|e| format!("Failed to serialize: {}", e))
}

/// Plain-text table plus a one-line summary.
pub fn export_text(records: &[ScreeningRecord], stats: &ScreenStats) -> String {
    let mut out = String::new();

    let file_width = records
        .iter()
        .map(|r| r.file.chars().count())
        .chain(std::iter::once("file".len()))
        .max()
        .unwrap_or(4);

    out.push_str(&format!(
        "{:<width$}  {:>5}  {:>9}  comment\n",
        "file",
        "class",
        "relevance",
        width = file_width
    ));
    for record in records {
        out.push_str(&format!(
            "{:<width$}  {:>5}  {:>9.4}  {}\n",
            record.file,
            record.predicted_class,
            record.relevance_prob,
            record.comment,
            width = file_width
        ));
    }

    out.push_str(&format!(
        "\n{} of {} screened ({} recommended, {} not recommended, {} empty, {} failed)\n",
        stats.screened,
        stats.total,
        stats.recommended,
        stats.not_recommended,
        stats.empty,
        stats.failed,
    ));
    out
}
