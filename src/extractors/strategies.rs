// src/extractors/strategies.rs

// --- Imports ---
use once_cell::sync::Lazy;
use regex::Regex;

use crate::extractors::classifier::is_period_anchor;
use crate::report::models::CandidateRecord;

// --- Constants ---
const MIN_TRAILING_TOKENS: usize = 4;
const MIN_GAP_COLUMNS: usize = 4;
// Full administrative row: period, district code/name, project code/name,
// sector code/name, facility code/name, then the two quantities
const ADMIN_COLUMNS: usize = 11;
const ADMIN_SECTOR: usize = 6;
const ADMIN_FACILITY: usize = 8;
const ADMIN_QUANTITY_A: usize = 9;
const ADMIN_QUANTITY_B: usize = 10;

// --- Regex Patterns (Lazy Static) ---
// Greedy name so that the last two whitespace tokens become the quantities
static TRAILING_PAIR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<name>.*\S)\s+(?P<a>\S+)\s+(?P<b>\S+)$")
        .expect("Failed to compile TRAILING_PAIR_RE")
});

static DECIMAL_PAIR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<name>.+?)\s+(?P<a>[\d.]+)\s+(?P<b>[\d.]+)\s*$")
        .expect("Failed to compile DECIMAL_PAIR_RE")
});

// Explicit boundaries inside a name part: a comma, a tab, or a wide gap
static NAME_BOUNDARY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s{2,}|\t|,").expect("Failed to compile NAME_BOUNDARY_RE")
});

static COLUMN_GAP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s*\t\s*|\s{2,}").expect("Failed to compile COLUMN_GAP_RE")
});

// Plain unsigned decimal: `12`, `12.5`, `12.`, `.5`
static QUANTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\d+\.?\d*|\.\d+)$").expect("Failed to compile QUANTITY_RE")
});

/// Parses a non-negative, finite quantity. Signs, exponents and words such
/// as `inf` are rejected.
pub fn parse_quantity(token: &str) -> Option<f64> {
    let token = token.trim();
    if !QUANTITY_RE.is_match(token) {
        return None;
    }
    token.parse::<f64>().ok().filter(|v| v.is_finite() && *v >= 0.0)
}

/// Fallback strategies report whole units.
fn parse_rounded(token: &str) -> Option<f64> {
    parse_quantity(token).map(f64::round)
}

/// Splits a name part on explicit boundaries. Returns `(sector, facility)`
/// when there are at least two segments.
fn split_on_boundaries(name: &str) -> Option<(String, String)> {
    let segments: Vec<&str> = NAME_BOUNDARY_RE
        .split(name)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    match segments.split_first() {
        Some((sector, rest)) if !rest.is_empty() => Some((sector.to_string(), rest.join(" "))),
        _ => None,
    }
}

fn starts_with_period(name: &str) -> bool {
    name.split_whitespace().next().is_some_and(is_period_anchor)
}

/// One way of turning a single line into a candidate record.
pub trait ExtractionStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Returns `None` when the line does not have this strategy's shape.
    fn try_extract(&self, line: &str) -> Option<CandidateRecord>;
}

/// `<sector/facility text> <quantityA> <quantityB>` with no reliable
/// delimiter beyond whitespace.
#[derive(Debug, Default, Clone, Copy)]
pub struct TrailingNumbersStrategy;

impl ExtractionStrategy for TrailingNumbersStrategy {
    fn name(&self) -> &'static str {
        "trailing-numbers"
    }

    fn try_extract(&self, line: &str) -> Option<CandidateRecord> {
        let caps = TRAILING_PAIR_RE.captures(line.trim())?;
        let name = caps.name("name")?.as_str();

        if starts_with_period(name) {
            return None;
        }
        if name.split_whitespace().count() + 2 < MIN_TRAILING_TOKENS {
            return None;
        }

        let quantity_b = parse_rounded(caps.name("b")?.as_str())?;
        let quantity_a = parse_rounded(caps.name("a")?.as_str())?;

        let (sector, facility) = split_on_boundaries(name).or_else(|| {
            let mut tokens = name.split_whitespace();
            let sector = tokens.next()?;
            let facility = tokens.collect::<Vec<_>>().join(" ");
            Some((sector.to_string(), facility))
        })?;

        Some(CandidateRecord::new(&sector, &facility, quantity_a, quantity_b))
    }
}

/// `<name-part> <num> <num>` where the name part carries comma or wide-gap
/// boundaries between sector and facility.
#[derive(Debug, Default, Clone, Copy)]
pub struct DelimiterPatternStrategy;

impl ExtractionStrategy for DelimiterPatternStrategy {
    fn name(&self) -> &'static str {
        "delimiter-pattern"
    }

    fn try_extract(&self, line: &str) -> Option<CandidateRecord> {
        let caps = DECIMAL_PAIR_RE.captures(line.trim())?;
        let name = caps.name("name")?.as_str().trim();

        if starts_with_period(name) {
            return None;
        }

        let quantity_a = parse_rounded(caps.name("a")?.as_str())?;
        let quantity_b = parse_rounded(caps.name("b")?.as_str())?;
        let (sector, facility) = split_on_boundaries(name)?;

        Some(CandidateRecord::new(&sector, &facility, quantity_a, quantity_b))
    }
}

/// Tab or wide-gap delimited columns, either the full 11-column
/// administrative row or a short `sector | facility... | a | b` row.
#[derive(Debug, Default, Clone, Copy)]
pub struct WideGapStrategy;

impl ExtractionStrategy for WideGapStrategy {
    fn name(&self) -> &'static str {
        "wide-gap"
    }

    fn try_extract(&self, line: &str) -> Option<CandidateRecord> {
        let columns: Vec<&str> = COLUMN_GAP_RE
            .split(line.trim())
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .collect();

        if columns.len() >= ADMIN_COLUMNS {
            let quantity_a = parse_rounded(columns[ADMIN_QUANTITY_A])?;
            let quantity_b = parse_rounded(columns[ADMIN_QUANTITY_B])?;
            return Some(CandidateRecord::new(
                columns[ADMIN_SECTOR],
                columns[ADMIN_FACILITY],
                quantity_a,
                quantity_b,
            ));
        }

        if columns.len() < MIN_GAP_COLUMNS {
            return None;
        }
        let (quantities, names) = columns.split_at(columns.len() - 2);
        let quantity_a = parse_rounded(quantities[0])?;
        let quantity_b = parse_rounded(quantities[1])?;
        let (sector, facility) = names.split_first()?;

        Some(CandidateRecord::new(sector, &facility.join(" "), quantity_a, quantity_b))
    }
}

/// The per-line strategies in priority order.
pub fn default_strategies() -> Vec<Box<dyn ExtractionStrategy>> {
    vec![
        Box::new(TrailingNumbersStrategy),
        Box::new(DelimiterPatternStrategy),
        Box::new(WideGapStrategy),
    ]
}
