// src/utils/line_debug.rs
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::extractors::diagnostics::{Diagnostics, SkipReason};
use crate::utils::error::AppError;

/// Renders the source text with one marker column per line: `~` for
/// classifier noise, `!` for dropped data lines. Empty lines and lines that
/// fed a record carry no marker.
pub fn render_line_annotations(text: &str, diagnostics: &Diagnostics) -> String {
    let skipped: HashMap<usize, SkipReason> = diagnostics
        .skipped
        .iter()
        .map(|s| (s.line_number, s.reason))
        .collect();

    let mut out = format!(
        "# mode: {}  lines: {}  skipped: {}  dropped data lines: {}\n",
        diagnostics.mode,
        diagnostics.line_count,
        diagnostics.skipped.len(),
        diagnostics.dropped_data_lines()
    );

    for (index, line) in text.lines().enumerate() {
        let number = index + 1;
        let (marker, reason) = match skipped.get(&number) {
            Some(reason) if matches!(reason, SkipReason::Noise(_)) => ('~', reason.to_string()),
            Some(reason) => ('!', reason.to_string()),
            None => (' ', String::new()),
        };
        out.push_str(&format!("{:>5} {} {:<26}| {}\n", number, marker, reason, line));
    }
    out
}

/// Writes the annotated line dump of one document to a file
pub fn save_line_annotations(text: &str, diagnostics: &Diagnostics, filename: &Path) -> Result<(), AppError> {
    let mut file = File::create(filename)?;
    file.write_all(render_line_annotations(text, diagnostics).as_bytes())?;

    tracing::info!("Saved line annotations to {}", filename.display());
    Ok(())
}
