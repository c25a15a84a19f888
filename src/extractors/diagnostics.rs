// src/extractors/diagnostics.rs
use serde::Serialize;

use crate::extractors::classifier::LineClass;

/// Which of the two extraction modes produced the rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ExtractionMode {
    /// One field per line, reassembled into fixed 11-field records.
    Columnar,
    /// Each line is a record, parsed by the fallback strategies.
    PerLine,
}

impl std::fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractionMode::Columnar => write!(f, "columnar"),
            ExtractionMode::PerLine => write!(f, "per-line"),
        }
    }
}

/// A trimmed, non-empty input line and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    /// 1-based line number in the source text.
    pub number: usize,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "class")]
pub enum SkipReason {
    /// Discarded by the line classifier.
    Noise(LineClass),
    /// No per-line strategy recognized the line.
    NoStrategyMatched,
    /// A strategy produced a candidate that failed validation.
    Rejected,
    /// A columnar record was cut short by a header or the end of input.
    IncompleteRecord,
    /// A complete columnar record whose fields did not validate.
    InvalidRecord,
    /// Columnar mode: a data-looking line outside any anchored record.
    OutsideRecord,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Noise(class) => write!(f, "noise:{:?}", class),
            SkipReason::NoStrategyMatched => write!(f, "no-match"),
            SkipReason::Rejected => write!(f, "rejected"),
            SkipReason::IncompleteRecord => write!(f, "incomplete"),
            SkipReason::InvalidRecord => write!(f, "invalid"),
            SkipReason::OutsideRecord => write!(f, "outside-record"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedLine {
    pub line_number: usize,
    pub text: String,
    pub reason: SkipReason,
}

impl SkippedLine {
    pub fn new(line: &RawLine, reason: SkipReason) -> Self {
        Self { line_number: line.number, text: line.text.clone(), reason }
    }
}

/// What the engine dropped while producing a result. Kept beside the result
/// rather than inside it, so the result's wire shape stays fixed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    pub mode: ExtractionMode,
    pub line_count: usize,
    pub skipped: Vec<SkippedLine>,
}

impl Diagnostics {
    /// Skipped lines that looked like data rather than noise.
    pub fn dropped_data_lines(&self) -> usize {
        self.skipped
            .iter()
            .filter(|s| !matches!(s.reason, SkipReason::Noise(_)))
            .count()
    }
}
