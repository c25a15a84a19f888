// src/extractors/columnar.rs
use crate::extractors::classifier::{is_period_anchor, LineClassifier, LineContext};
use crate::extractors::diagnostics::{RawLine, SkipReason, SkippedLine};
use crate::extractors::strategies::parse_quantity;
use crate::extractors::validator;
use crate::report::models::{CandidateRecord, ValidatedRecord};

// --- Constants ---
// Field positions within one record window:
// [0]=Period, [1]=DistCode, [2]=District, [3]=ProjCode, [4]=Project,
// [5]=SectorCode, [6]=Sector, [7]=FacilityCode, [8]=Facility, [9]=A, [10]=B
pub const RECORD_WIDTH: usize = 11;
const SECTOR_FIELD: usize = 6;
const FACILITY_FIELD: usize = 8;
const QUANTITY_A_FIELD: usize = 9;
const QUANTITY_B_FIELD: usize = 10;

#[derive(Debug, Default)]
pub struct ColumnarOutcome {
    pub records: Vec<ValidatedRecord>,
    pub skipped: Vec<SkippedLine>,
}

/// Reassembles records from text where every table cell landed on its own
/// line. Each record opens at a `MM/YYYY` period line and spans exactly
/// [`RECORD_WIDTH`] lines.
pub struct ColumnarReconstructor<'a> {
    classifier: &'a LineClassifier,
}

impl<'a> ColumnarReconstructor<'a> {
    pub fn new(classifier: &'a LineClassifier) -> Self {
        Self { classifier }
    }

    pub fn reconstruct(&self, lines: &[RawLine]) -> ColumnarOutcome {
        let mut outcome = ColumnarOutcome::default();
        let mut buffer: Vec<&RawLine> = Vec::with_capacity(RECORD_WIDTH);

        for line in lines {
            if buffer.is_empty() {
                // Seeking: only a period line opens a record
                if is_period_anchor(&line.text) {
                    buffer.push(line);
                } else {
                    let class = self.classifier.classify(&line.text, LineContext::Standalone);
                    let reason = if class.is_noise() { SkipReason::Noise(class) } else { SkipReason::OutsideRecord };
                    outcome.skipped.push(SkippedLine::new(line, reason));
                }
                continue;
            }

            // A missing cell shortens the window; the next anchor still opens a new record
            if is_period_anchor(&line.text) {
                tracing::trace!(
                    "Anchor at line {} cut a record short after {} fields",
                    line.number,
                    buffer.len()
                );
                drop_partial(&mut buffer, &mut outcome.skipped);
                buffer.push(line);
                continue;
            }

            let class = self.classifier.classify(&line.text, LineContext::RecordField);
            if class.is_noise() {
                tracing::trace!(
                    "Header at line {} interrupted a record after {} fields",
                    line.number,
                    buffer.len()
                );
                drop_partial(&mut buffer, &mut outcome.skipped);
                outcome.skipped.push(SkippedLine::new(line, SkipReason::Noise(class)));
                continue;
            }

            buffer.push(line);
            if buffer.len() == RECORD_WIDTH {
                match interpret(&buffer).and_then(validator::validate) {
                    Some(record) => outcome.records.push(record),
                    None => {
                        tracing::debug!("Discarding invalid columnar record at line {}", buffer[0].number);
                        drop_buffer(&mut buffer, &mut outcome.skipped, SkipReason::InvalidRecord);
                    }
                }
                buffer.clear();
            }
        }

        drop_partial(&mut buffer, &mut outcome.skipped);

        tracing::debug!(
            "Columnar reconstruction yielded {} records from {} lines",
            outcome.records.len(),
            lines.len()
        );
        outcome
    }
}

fn drop_partial(buffer: &mut Vec<&RawLine>, skipped: &mut Vec<SkippedLine>) {
    drop_buffer(buffer, skipped, SkipReason::IncompleteRecord);
}

/// Every line of a discarded window is reported, not just its anchor.
fn drop_buffer(buffer: &mut Vec<&RawLine>, skipped: &mut Vec<SkippedLine>, reason: SkipReason) {
    skipped.extend(buffer.drain(..).map(|line| SkippedLine::new(line, reason)));
}

/// Reads the fixed positions of a full window. Decimals are kept as-is.
fn interpret(fields: &[&RawLine]) -> Option<CandidateRecord> {
    if fields.len() < RECORD_WIDTH {
        return None;
    }
    let quantity_a = parse_quantity(&fields[QUANTITY_A_FIELD].text)?;
    let quantity_b = parse_quantity(&fields[QUANTITY_B_FIELD].text)?;
    Some(CandidateRecord::new(
        &fields[SECTOR_FIELD].text,
        &fields[FACILITY_FIELD].text,
        quantity_a,
        quantity_b,
    ))
}
