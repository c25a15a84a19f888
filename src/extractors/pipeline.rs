// src/extractors/pipeline.rs
use crate::config::ParserConfig;
use crate::extractors::classifier::{LineClassifier, LineContext};
use crate::extractors::columnar::ColumnarReconstructor;
use crate::extractors::diagnostics::{Diagnostics, ExtractionMode, RawLine, SkipReason, SkippedLine};
use crate::extractors::strategies::{default_strategies, ExtractionStrategy};
use crate::extractors::validator;
use crate::report::aggregator::Aggregator;
use crate::report::models::{ExtractionResult, Report, ValidatedRecord};
use crate::utils::error::{ExtractError, SourceError};

/// Splits text into trimmed, non-empty lines, remembering line numbers.
pub fn split_lines(text: &str) -> Vec<RawLine> {
    text.lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let trimmed = line.trim();
            (!trimmed.is_empty()).then(|| RawLine { number: index + 1, text: trimmed.to_string() })
        })
        .collect()
}

/// Extracts with the default configuration. Never fails: problems are
/// reported through `success` and `message`.
pub fn parse_report(text: &str) -> ExtractionResult {
    match ReportExtractor::new(ParserConfig::default()) {
        Ok(extractor) => extractor.extract(text),
        Err(e) => ExtractionResult::failure(format!("Error processing report text: {}", e)),
    }
}

/// Turns the text of one document into an aggregated result.
///
/// Holds only configuration, so one instance can serve any number of
/// documents, concurrently if needed; every call gets its own aggregator.
pub struct ReportExtractor {
    config: ParserConfig,
    classifier: LineClassifier,
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl ReportExtractor {
    pub fn new(config: ParserConfig) -> Result<Self, ExtractError> {
        config.validate()?;
        let classifier = LineClassifier::new(&config);
        Ok(Self { config, classifier, strategies: default_strategies() })
    }

    /// Replaces the per-line strategies; order is priority order.
    pub fn with_strategies(mut self, strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        self.strategies = strategies;
        self
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn classifier(&self) -> &LineClassifier {
        &self.classifier
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn extract(&self, text: &str) -> ExtractionResult {
        self.extract_with_diagnostics(text).0
    }

    /// Feeds the outcome of an upstream text extraction through the engine;
    /// an upstream failure becomes the failure result.
    pub fn extract_document(&self, text: Result<String, SourceError>) -> ExtractionResult {
        match text {
            Ok(text) => self.extract(&text),
            Err(e) => {
                tracing::warn!("Document text unavailable: {}", e);
                ExtractionResult::failure(format!("Error reading document: {}", e))
            }
        }
    }

    /// Like [`ReportExtractor::extract`], also returning what was dropped.
    pub fn extract_with_diagnostics(&self, text: &str) -> (ExtractionResult, Diagnostics) {
        let lines = split_lines(text);
        let (records, mode, skipped) = self.collect_records(&lines);

        let mut diagnostics = Diagnostics { mode, line_count: lines.len(), skipped };
        diagnostics.skipped.sort_by_key(|s| s.line_number);

        let result = match aggregate(records) {
            Ok(report) => {
                let message = summary_message(&report, mode, lines.len());
                tracing::info!("{} ({} lines dropped)", message, diagnostics.dropped_data_lines());
                ExtractionResult::from_report(report, message)
            }
            Err(e) => {
                tracing::error!("Extraction failed: {}", e);
                ExtractionResult::failure(format!("Error processing report text: {}", e))
            }
        };
        (result, diagnostics)
    }

    /// The two-phase mode decision: try columnar reconstruction, and only if
    /// it yields nothing parse line by line. Never both for one text.
    fn collect_records(&self, lines: &[RawLine]) -> (Vec<ValidatedRecord>, ExtractionMode, Vec<SkippedLine>) {
        let columnar = ColumnarReconstructor::new(&self.classifier).reconstruct(lines);
        if !columnar.records.is_empty() {
            tracing::debug!("Using columnar layout ({} records)", columnar.records.len());
            return (columnar.records, ExtractionMode::Columnar, columnar.skipped);
        }

        tracing::debug!("No columnar records found; falling back to per-line strategies");
        let (records, skipped) = self.extract_per_line(lines);
        (records, ExtractionMode::PerLine, skipped)
    }

    fn extract_per_line(&self, lines: &[RawLine]) -> (Vec<ValidatedRecord>, Vec<SkippedLine>) {
        let mut records = Vec::new();
        let mut skipped = Vec::new();

        for line in lines {
            let class = self.classifier.classify(&line.text, LineContext::Standalone);
            if class.is_noise() {
                skipped.push(SkippedLine::new(line, SkipReason::Noise(class)));
                continue;
            }

            let candidate = self.strategies.iter().find_map(|strategy| {
                let candidate = strategy.try_extract(&line.text)?;
                tracing::trace!("Line {} matched by {}", line.number, strategy.name());
                Some(candidate)
            });

            match candidate.map(validator::validate) {
                Some(Some(record)) => records.push(record),
                Some(None) => skipped.push(SkippedLine::new(line, SkipReason::Rejected)),
                None => skipped.push(SkippedLine::new(line, SkipReason::NoStrategyMatched)),
            }
        }

        (records, skipped)
    }
}

fn aggregate(records: Vec<ValidatedRecord>) -> Result<Report, ExtractError> {
    let mut aggregator = Aggregator::new();
    for record in records {
        aggregator.push(record);
    }
    aggregator.finish()
}

fn summary_message(report: &Report, mode: ExtractionMode, line_count: usize) -> String {
    if report.row_count == 0 {
        format!("No rows recognized in {} lines of text; the layout may be unsupported", line_count)
    } else {
        format!("Successfully parsed {} rows ({} layout)", report.row_count, mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::models::CandidateRecord;

    #[test]
    fn split_lines_trims_and_numbers() {
        let lines = split_lines("  first \n\n\t\nsecond\r\n");
        assert_eq!(
            lines,
            vec![
                RawLine { number: 1, text: "first".to_string() },
                RawLine { number: 4, text: "second".to_string() },
            ]
        );
    }

    #[test]
    fn wide_gap_scenario() {
        let result = parse_report("Sector A   Facility X   10   20\nSector A   Facility Y   5   5");
        assert!(result.success);
        assert_eq!(result.sectors.len(), 1);
        let sector = &result.sectors[0];
        assert_eq!(sector.sector_name, "Sector A");
        assert_eq!(sector.breakdown.len(), 2);
        assert_eq!(sector.total_quantity_a, 15.0);
        assert_eq!(sector.total_quantity_b, 25.0);
        assert_eq!(result.grand_totals.total_items, 40.0);
        assert_eq!(result.message, "Successfully parsed 2 rows (per-line layout)");
    }

    #[test]
    fn noise_only_input_is_an_empty_success() {
        let result = parse_report("-----\nSector AWC Murukulu Balamrutham");
        assert!(result.success);
        assert!(result.sectors.is_empty());
        assert_eq!(result.row_count, 0);
        assert!(result.message.starts_with("No rows recognized in 2 lines"));
    }

    #[test]
    fn empty_input_is_an_empty_success() {
        let result = parse_report("");
        assert!(result.success);
        assert_eq!(result.row_count, 0);
    }

    #[test]
    fn columnar_mode_excludes_per_line_parsing() {
        // The trailing row would parse per-line, but columnar records win.
        let text = "03/2024\n01\nDistX\n01\nProjY\n01\nSector B\n0012345\nFacility Z\n12.5\n7.0\nSector C   Facility W   1   1";
        let extractor = ReportExtractor::new(ParserConfig::default()).unwrap();
        let (result, diagnostics) = extractor.extract_with_diagnostics(text);
        assert_eq!(diagnostics.mode, ExtractionMode::Columnar);
        assert_eq!(result.row_count, 1);
        assert_eq!(result.sectors[0].sector_name, "Sector B");
        assert_eq!(diagnostics.skipped.len(), 1);
        assert_eq!(diagnostics.skipped[0].line_number, 12);
        assert_eq!(diagnostics.skipped[0].reason, SkipReason::OutsideRecord);
        assert_eq!(diagnostics.dropped_data_lines(), 1);
    }

    #[test]
    fn diagnostics_record_dropped_lines() {
        let text = "Department of Welfare\nSector A   Facility X   10   20\nSector A Facility X -5 10\nA   B   1   2";
        let extractor = ReportExtractor::new(ParserConfig::default()).unwrap();
        let (result, diagnostics) = extractor.extract_with_diagnostics(text);
        assert_eq!(result.row_count, 1);
        assert_eq!(diagnostics.mode, ExtractionMode::PerLine);
        assert_eq!(diagnostics.line_count, 4);

        let reasons: Vec<(usize, SkipReason)> =
            diagnostics.skipped.iter().map(|s| (s.line_number, s.reason)).collect();
        assert_eq!(reasons[0].0, 1);
        assert!(matches!(reasons[0].1, SkipReason::Noise(_)));
        assert_eq!(reasons[1], (3, SkipReason::NoStrategyMatched));
        assert_eq!(reasons[2], (4, SkipReason::Rejected));
        assert_eq!(diagnostics.dropped_data_lines(), 2);
    }

    #[test]
    fn failed_source_becomes_failure_result() {
        let extractor = ReportExtractor::new(ParserConfig::default()).unwrap();
        let result = extractor.extract_document(Err(SourceError::PdfText("bad xref".to_string())));
        assert!(!result.success);
        assert!(result.message.contains("bad xref"));
        assert!(result.sectors.is_empty());
        assert_eq!(result.grand_totals.total_items, 0.0);
    }

    #[test]
    fn non_finite_totals_become_failure_result() {
        let big = format!("{}", f64::MAX);
        let text = format!("Sector A   Facility X   {big}   1\nSector A   Facility Y   {big}   1");
        let result = parse_report(&text);
        assert!(!result.success);
        assert!(result.message.starts_with("Error processing report text"));
    }

    #[test]
    fn invalid_config_is_refused() {
        let config = ParserConfig { min_line_length: 0, ..ParserConfig::default() };
        assert!(ReportExtractor::new(config).is_err());
    }

    struct EverythingIsFacility;

    impl ExtractionStrategy for EverythingIsFacility {
        fn name(&self) -> &'static str {
            "everything"
        }

        fn try_extract(&self, line: &str) -> Option<CandidateRecord> {
            Some(CandidateRecord::new("Catch All", line, 1.0, 1.0))
        }
    }

    #[test]
    fn strategy_list_is_configurable() {
        let extractor = ReportExtractor::new(ParserConfig::default())
            .unwrap()
            .with_strategies(vec![Box::new(EverythingIsFacility)]);
        assert_eq!(extractor.strategy_names(), vec!["everything"]);
        let result = extractor.extract("Sector A   Facility X   10   20\nanything else");
        assert_eq!(result.row_count, 2);
        assert_eq!(result.sectors[0].sector_name, "Catch All");
    }
}
