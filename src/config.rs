// src/config.rs
use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::utils::error::{AppError, ExtractError};

const DEFAULT_MIN_LINE_LENGTH: usize = 3;
const DEFAULT_HEADER_THRESHOLD: u32 = 4;

const DEFAULT_METADATA_KEYWORDS: &[&str] = &[
    "department",
    "government",
    "contact",
    "agency",
    "month & year",
    "indent number",
    "supplying agency",
    "commodity",
];

const DEFAULT_HEADER_KEYWORDS: &[&str] = &[
    "month",
    "year",
    "district",
    "code",
    "project",
    "sector",
    "awc",
    "facility",
    "indent",
    "murukulu",
    "balamrutham",
];

/// Tunables for line classification and report labelling.
///
/// Every field has a default, so a config file only needs the keys it changes:
///
/// ```json
/// { "headerThreshold": 3, "headerKeywords": { "sector": 2, "awc": 2 } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParserConfig {
    /// Standalone lines shorter than this (in characters) are noise.
    pub min_line_length: usize,
    /// Case-insensitive substrings that mark a line as document metadata.
    pub metadata_keywords: Vec<String>,
    /// Column-header vocabulary and the weight each hit contributes.
    pub header_keywords: BTreeMap<String, u32>,
    /// A line whose keyword weight reaches this value is a header row.
    pub header_threshold: u32,
    pub labels: ReportLabels,
}

/// Human-facing names used when projecting results into a spreadsheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportLabels {
    pub title: String,
    pub quantity_a: String,
    pub quantity_b: String,
}

impl Default for ReportLabels {
    fn default() -> Self {
        Self {
            title: "Indent Report".to_string(),
            quantity_a: "Murukulu Indent".to_string(),
            quantity_b: "Balamrutham Indent".to_string(),
        }
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            min_line_length: DEFAULT_MIN_LINE_LENGTH,
            metadata_keywords: DEFAULT_METADATA_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            header_keywords: DEFAULT_HEADER_KEYWORDS
                .iter()
                .map(|k| (k.to_string(), 1))
                .collect(),
            header_threshold: DEFAULT_HEADER_THRESHOLD,
            labels: ReportLabels::default(),
        }
    }
}

impl ParserConfig {
    /// Loads a config from a JSON file; missing keys fall back to defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config: ParserConfig = serde_json::from_str(&raw).map_err(|e| {
            AppError::Config(format!("Invalid parser config '{}': {}", path.display(), e))
        })?;
        config.validate()?;
        tracing::info!("Loaded parser config from {}", path.display());
        Ok(config)
    }

    /// Rejects settings under which classification would be meaningless.
    pub fn validate(&self) -> Result<(), ExtractError> {
        if self.min_line_length == 0 {
            return Err(ExtractError::InvalidConfig(
                "minLineLength must be at least 1".to_string(),
            ));
        }
        if self.header_threshold == 0 {
            return Err(ExtractError::InvalidConfig(
                "headerThreshold must be at least 1, otherwise every line is a header".to_string(),
            ));
        }
        if let Some(blank) = self
            .header_keywords
            .keys()
            .chain(self.metadata_keywords.iter())
            .find(|k| k.trim().is_empty())
        {
            return Err(ExtractError::InvalidConfig(format!(
                "keywords must not be blank (found {:?})",
                blank
            )));
        }
        Ok(())
    }
}
