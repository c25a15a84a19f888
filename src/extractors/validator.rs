// src/extractors/validator.rs
use crate::report::models::{CandidateRecord, ValidatedRecord};

const MIN_NAME_CHARS: usize = 2;

/// Accepts a candidate iff both names have at least two characters after
/// trimming and both quantities are finite and non-negative. Rejection is
/// silent; callers decide what to do with the line.
pub fn validate(candidate: CandidateRecord) -> Option<ValidatedRecord> {
    if !is_valid(&candidate) {
        tracing::trace!("Rejected candidate row: {:?}", candidate);
        return None;
    }
    Some(ValidatedRecord::new_unchecked(candidate))
}

pub fn is_valid(candidate: &CandidateRecord) -> bool {
    valid_name(&candidate.sector_name)
        && valid_name(&candidate.facility_name)
        && valid_quantity(candidate.quantity_a)
        && valid_quantity(candidate.quantity_b)
}

fn valid_name(name: &str) -> bool {
    name.trim().chars().count() >= MIN_NAME_CHARS
}

fn valid_quantity(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}
