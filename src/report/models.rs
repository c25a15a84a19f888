// src/report/models.rs
use serde::{Deserialize, Serialize};

/// A row recovered by one extraction strategy, not yet validated.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateRecord {
    pub sector_name: String,
    pub facility_name: String,
    pub quantity_a: f64,
    pub quantity_b: f64,
}

impl CandidateRecord {
    pub fn new(sector_name: &str, facility_name: &str, quantity_a: f64, quantity_b: f64) -> Self {
        Self {
            sector_name: sector_name.trim().to_string(),
            facility_name: facility_name.trim().to_string(),
            quantity_a,
            quantity_b,
        }
    }
}

/// A candidate that passed the row validator. Only `extractors::validator`
/// can construct one.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRecord(CandidateRecord);

impl ValidatedRecord {
    pub(crate) fn new_unchecked(record: CandidateRecord) -> Self {
        Self(record)
    }

    pub fn record(&self) -> &CandidateRecord {
        &self.0
    }

    pub fn into_inner(self) -> CandidateRecord {
        self.0
    }
}

/// One facility line inside a sector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownEntry {
    pub facility_name: String,
    pub quantity_a: f64,
    pub quantity_b: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorAggregate {
    pub sector_name: String,
    pub total_quantity_a: f64,
    pub total_quantity_b: f64,
    /// Entries in the order their rows were encountered.
    pub breakdown: Vec<BreakdownEntry>,
}

impl SectorAggregate {
    pub fn new(sector_name: &str) -> Self {
        Self {
            sector_name: sector_name.to_string(),
            total_quantity_a: 0.0,
            total_quantity_b: 0.0,
            breakdown: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrandTotals {
    pub total_quantity_a: f64,
    pub total_quantity_b: f64,
    pub total_items: f64,
}

impl GrandTotals {
    pub fn new(total_quantity_a: f64, total_quantity_b: f64) -> Self {
        Self {
            total_quantity_a,
            total_quantity_b,
            total_items: total_quantity_a + total_quantity_b,
        }
    }
}

/// Aggregated rows of one document, before they are wrapped in a result.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub sectors: Vec<SectorAggregate>,
    pub grand_totals: GrandTotals,
    pub row_count: usize,
}

/// What the engine hands back for one document. Serialized verbatim as the
/// JSON response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub sectors: Vec<SectorAggregate>,
    pub grand_totals: GrandTotals,
    pub row_count: usize,
    pub success: bool,
    pub message: String,
}

impl ExtractionResult {
    pub fn from_report(report: Report, message: String) -> Self {
        Self {
            sectors: report.sectors,
            grand_totals: report.grand_totals,
            row_count: report.row_count,
            success: true,
            message,
        }
    }

    /// The zeroed shape returned whenever extraction could not complete.
    pub fn failure(message: String) -> Self {
        Self {
            sectors: Vec::new(),
            grand_totals: GrandTotals::default(),
            row_count: 0,
            success: false,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_are_camel_case() {
        let result = ExtractionResult {
            sectors: vec![SectorAggregate {
                sector_name: "Sector A".to_string(),
                total_quantity_a: 15.0,
                total_quantity_b: 25.0,
                breakdown: vec![BreakdownEntry {
                    facility_name: "Facility X".to_string(),
                    quantity_a: 15.0,
                    quantity_b: 25.0,
                }],
            }],
            grand_totals: GrandTotals::new(15.0, 25.0),
            row_count: 1,
            success: true,
            message: "ok".to_string(),
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["grandTotals"]["totalItems"], 40.0);
        assert_eq!(json["grandTotals"]["totalQuantityA"], 15.0);
        assert_eq!(json["rowCount"], 1);
        assert_eq!(json["sectors"][0]["sectorName"], "Sector A");
        assert_eq!(json["sectors"][0]["breakdown"][0]["facilityName"], "Facility X");
        assert_eq!(json["sectors"][0]["breakdown"][0]["quantityB"], 25.0);
    }

    #[test]
    fn failure_is_zeroed() {
        let result = ExtractionResult::failure("boom".to_string());
        assert!(!result.success);
        assert!(result.sectors.is_empty());
        assert_eq!(result.grand_totals, GrandTotals::default());
        assert_eq!(result.grand_totals.total_items, 0.0);
        assert_eq!(result.message, "boom");
    }

    #[test]
    fn candidate_names_are_trimmed() {
        let record = CandidateRecord::new("  Sector A ", "Facility X\t", 1.0, 2.0);
        assert_eq!(record.sector_name, "Sector A");
        assert_eq!(record.facility_name, "Facility X");
    }
}
