// src/storage/mod.rs
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::ReportLabels;
use crate::extractors::diagnostics::Diagnostics;
use crate::report::models::ExtractionResult;
use crate::report::sheet;
use crate::utils::error::StorageError;

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    /// Directory holding every output for one document: /base_dir/stem/
    pub fn document_dir(&self, stem: &str) -> Result<PathBuf, StorageError> {
        let target_dir = self.base_dir.join(stem);
        if !target_dir.exists() {
            fs::create_dir_all(&target_dir).map_err(StorageError::IoError)?;
        }
        Ok(target_dir)
    }

    /// Saves the result exactly as it goes over the wire.
    pub fn save_result(&self, stem: &str, result: &ExtractionResult) -> Result<PathBuf, StorageError> {
        let file_path = self.document_dir(stem)?.join(format!("{}_report.json", stem));

        let json = serde_json::to_string_pretty(result)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        fs::write(&file_path, json).map_err(StorageError::IoError)?;

        tracing::info!("Saved result to {}", file_path.display());
        Ok(file_path)
    }

    /// Saves the spreadsheet projection of the result as CSV.
    pub fn save_sheet(
        &self,
        stem: &str,
        result: &ExtractionResult,
        labels: &ReportLabels,
    ) -> Result<PathBuf, StorageError> {
        let file_path = self.document_dir(stem)?.join(format!("{}_report.csv", stem));

        let rows = sheet::to_rows(result, labels);
        let file = fs::File::create(&file_path).map_err(StorageError::IoError)?;
        sheet::write_csv(&rows, file)?;

        tracing::info!("Saved spreadsheet ({} rows) to {}", rows.len(), file_path.display());
        Ok(file_path)
    }

    /// Saves metadata about the extraction in JSON format
    pub fn save_metadata(
        &self,
        stem: &str,
        document_name: &str,
        result: &ExtractionResult,
        diagnostics: &Diagnostics,
    ) -> Result<PathBuf, StorageError> {
        let file_path = self.document_dir(stem)?.join(format!("{}_meta.json", stem));

        let metadata = serde_json::json!({
            "document": document_name,
            "success": result.success,
            "mode": diagnostics.mode,
            "lineCount": diagnostics.line_count,
            "skippedLines": diagnostics.skipped.len(),
            "droppedDataLines": diagnostics.dropped_data_lines(),
            "rowCount": result.row_count,
            "sectorCount": result.sectors.len(),
            "extractionTimestamp": chrono::Utc::now().to_rfc3339(),
        });

        let metadata_str = serde_json::to_string_pretty(&metadata)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        fs::write(&file_path, metadata_str).map_err(StorageError::IoError)?;

        tracing::info!("Saved metadata to {}", file_path.display());
        Ok(file_path)
    }

    /// Path for debug artifacts of one document: /base_dir/stem/debug/
    pub fn debug_dir(&self, stem: &str) -> Result<PathBuf, StorageError> {
        let dir = self.document_dir(stem)?.join("debug");
        fs::create_dir_all(&dir).map_err(StorageError::IoError)?;
        Ok(dir)
    }
}

/// Output stems for one run, in input order. Stems shared by several inputs
/// get the 1-based input position appended so no two documents write to the
/// same directory.
pub fn unique_stems(stems: &[String]) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for stem in stems {
        *counts.entry(stem.as_str()).or_default() += 1;
    }

    let mut taken: HashSet<String> = stems
        .iter()
        .filter(|stem| counts[stem.as_str()] == 1)
        .cloned()
        .collect();

    stems
        .iter()
        .enumerate()
        .map(|(index, stem)| {
            if counts[stem.as_str()] == 1 {
                return stem.clone();
            }
            let mut candidate = format!("{}_{}", stem, index + 1);
            while taken.contains(&candidate) {
                candidate.push('_');
            }
            taken.insert(candidate.clone());
            candidate
        })
        .collect()
}
