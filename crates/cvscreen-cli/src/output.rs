use std::io::Write;

use cvscreen_core::{ProgressEvent, ScreenStats, ScreeningRecord};
use owo_colors::OwoColorize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Render a progress event as a display line. Returns `None` for events
/// that are not shown (per-file start).
pub fn format_event(event: &ProgressEvent, color: ColorMode) -> Option<String> {
    match event {
        ProgressEvent::Extracting { .. } => None,
        ProgressEvent::Record {
            index,
            total,
            record,
        } => {
            let verdict = if record.predicted_class == 1 {
                if color.enabled() {
                    "RECOMMENDED".green().to_string()
                } else {
                    "RECOMMENDED".to_string()
                }
            } else if color.enabled() {
                "NOT RECOMMENDED".red().to_string()
            } else {
                "NOT RECOMMENDED".to_string()
            };
            Some(format!(
                "[{}/{}] {} -> {} (p={:.2})",
                index + 1,
                total,
                record.file,
                verdict,
                record.relevance_prob
            ))
        }
        ProgressEvent::Warning {
            index,
            total,
            file,
            message,
        } => {
            let line = format!("[{}/{}] {}: {}", index + 1, total, file, message);
            if color.enabled() {
                Some(format!("{} {}", "WARNING:".yellow(), line))
            } else {
                Some(format!("WARNING: {}", line))
            }
        }
        ProgressEvent::Failed {
            index,
            total,
            file,
            message,
        } => {
            let line = format!("[{}/{}] {}: {}", index + 1, total, file, message);
            if color.enabled() {
                Some(format!("{} {}", "ERROR:".red(), line))
            } else {
                Some(format!("ERROR: {}", line))
            }
        }
    }
}

/// Print each record with its comment.
pub fn print_records(
    w: &mut dyn Write,
    records: &[ScreeningRecord],
    color: ColorMode,
) -> std::io::Result<()> {
    for record in records {
        let verdict = if record.predicted_class == 1 {
            "RECOMMENDED"
        } else {
            "NOT RECOMMENDED"
        };
        if color.enabled() {
            let verdict = if record.predicted_class == 1 {
                verdict.green().to_string()
            } else {
                verdict.red().to_string()
            };
            writeln!(
                w,
                "{} -> {} (p={:.2})",
                record.file.bold(),
                verdict,
                record.relevance_prob
            )?;
            writeln!(w, "  {}", record.comment.dimmed())?;
        } else {
            writeln!(
                w,
                "{} -> {} (p={:.2})",
                record.file, verdict, record.relevance_prob
            )?;
            writeln!(w, "  {}", record.comment)?;
        }
    }
    Ok(())
}

/// Print the end-of-batch summary line.
pub fn print_summary(
    w: &mut dyn Write,
    stats: &ScreenStats,
    color: ColorMode,
) -> std::io::Result<()> {
    writeln!(w)?;
    let line = format!(
        "Screened {} of {} files: {} recommended, {} not recommended",
        stats.screened, stats.total, stats.recommended, stats.not_recommended
    );
    if color.enabled() {
        writeln!(w, "{}", line.bold())?;
    } else {
        writeln!(w, "{}", line)?;
    }

    let skipped = stats.empty + stats.failed;
    if skipped > 0 {
        let detail = format!("({} without text, {} failed)", stats.empty, stats.failed);
        if color.enabled() {
            writeln!(w, "{}", detail.dimmed())?;
        } else {
            writeln!(w, "{}", detail)?;
        }
    }
    Ok(())
}
