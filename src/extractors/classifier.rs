// src/extractors/classifier.rs

// --- Imports ---
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::config::ParserConfig;

// --- Regex Patterns (Lazy Static) ---
// Rows of `=`, `-` and `*` used as rules between table sections
static DECORATIVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[=\-*\s]+$").expect("Failed to compile DECORATIVE_RE")
});

// A lone number, typically a facility or district code on its own line
static BARE_NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d+(?:\.\d+)?$").expect("Failed to compile BARE_NUMBER_RE")
});

// Reporting period that opens every administrative record, e.g. `03/2024`
static PERIOD_ANCHOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{2}/\d{4}$").expect("Failed to compile PERIOD_ANCHOR_RE")
});

// Words that may follow a header keyword inside a column label
const LABEL_SUFFIXES: &[&str] = &["name", "code", "number", "no"];

/// Is this token a `MM/YYYY` reporting period?
pub fn is_period_anchor(token: &str) -> bool {
    PERIOD_ANCHOR_RE.is_match(token.trim())
}

/// Where a line sits relative to the record being assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineContext {
    /// The line must carry a record on its own, or no columnar record is open.
    Standalone,
    /// The line is one field of an open columnar record.
    RecordField,
}

/// Outcome of classifying one trimmed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LineClass {
    Data,
    Decorative,
    TooShort,
    Metadata,
    BareNumber,
    ColumnHeader,
}

impl LineClass {
    pub fn is_noise(self) -> bool {
        self != LineClass::Data
    }
}

/// Decides whether a line is noise (separators, metadata, column headers) or
/// a candidate data fragment. Pure; built once from a [`ParserConfig`].
#[derive(Debug, Clone)]
pub struct LineClassifier {
    min_line_length: usize,
    metadata_keywords: Vec<String>,
    header_keywords: Vec<(String, u32)>,
    header_threshold: u32,
    // longest first so greedy prefix stripping prefers "district" over "dist..."
    label_vocabulary: Vec<String>,
}

impl LineClassifier {
    pub fn new(config: &ParserConfig) -> Self {
        let header_keywords: Vec<(String, u32)> = config
            .header_keywords
            .iter()
            .map(|(k, w)| (k.trim().to_lowercase(), *w))
            .collect();

        let mut label_vocabulary: Vec<String> = header_keywords
            .iter()
            .map(|(k, _)| k.clone())
            .chain(LABEL_SUFFIXES.iter().map(|s| s.to_string()))
            .filter(|w| w.chars().all(char::is_alphanumeric))
            .collect();
        label_vocabulary.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        label_vocabulary.dedup();

        Self {
            min_line_length: config.min_line_length,
            metadata_keywords: config
                .metadata_keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .collect(),
            header_keywords,
            header_threshold: config.header_threshold,
            label_vocabulary,
        }
    }

    /// Boolean form of [`LineClassifier::classify`]: true means discard.
    pub fn is_header_line(&self, line: &str, context: LineContext) -> bool {
        self.classify(line, context).is_noise()
    }

    /// Applies the noise rules in order; the first match wins.
    pub fn classify(&self, line: &str, context: LineContext) -> LineClass {
        let line = line.trim();
        let lower = line.to_lowercase();

        if line.is_empty() || DECORATIVE_RE.is_match(line) {
            return LineClass::Decorative;
        }
        if context == LineContext::Standalone && line.chars().count() < self.min_line_length {
            return LineClass::TooShort;
        }
        if self.metadata_keywords.iter().any(|k| lower.contains(k.as_str())) {
            return LineClass::Metadata;
        }
        if context == LineContext::Standalone && BARE_NUMBER_RE.is_match(line) {
            return LineClass::BareNumber;
        }
        if self.header_weight(&lower) >= self.header_threshold {
            return LineClass::ColumnHeader;
        }
        if self.is_column_label(&lower) {
            return LineClass::ColumnHeader;
        }
        LineClass::Data
    }

    fn header_weight(&self, lower: &str) -> u32 {
        self.header_keywords
            .iter()
            .filter(|(k, _)| lower.contains(k.as_str()))
            .map(|(_, w)| *w)
            .sum()
    }

    /// True when every word of the line is label vocabulary, e.g. `Sector Name`,
    /// `SectorName`, `MurukuluIndent` or `AWC Code`.
    fn is_column_label(&self, lower: &str) -> bool {
        let normalized: String = lower
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { ' ' })
            .collect();
        let mut words = normalized.split_whitespace().peekable();
        if words.peek().is_none() {
            return false;
        }
        words.all(|word| self.is_label_word(word))
    }

    fn is_label_word(&self, word: &str) -> bool {
        let mut rest = word;
        while !rest.is_empty() {
            match self.label_vocabulary.iter().find(|v| rest.starts_with(v.as_str())) {
                Some(v) => rest = &rest[v.len()..],
                None => return false,
            }
        }
        true
    }
}
