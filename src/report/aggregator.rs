// src/report/aggregator.rs
use std::collections::BTreeMap;

use crate::report::models::{BreakdownEntry, GrandTotals, Report, SectorAggregate, ValidatedRecord};
use crate::utils::error::ExtractError;

/// Groups validated rows by exact sector name and accumulates totals.
///
/// One aggregator belongs to one extraction call; nothing is shared between
/// documents.
#[derive(Debug, Default)]
pub struct Aggregator {
    // BTreeMap keeps sectors in ordinal (byte-wise) name order
    sectors: BTreeMap<String, SectorAggregate>,
    row_count: usize,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ValidatedRecord) {
        let record = record.into_inner();
        let sector = self
            .sectors
            .entry(record.sector_name.clone())
            .or_insert_with(|| SectorAggregate::new(&record.sector_name));

        sector.total_quantity_a += record.quantity_a;
        sector.total_quantity_b += record.quantity_b;
        sector.breakdown.push(BreakdownEntry {
            facility_name: record.facility_name,
            quantity_a: record.quantity_a,
            quantity_b: record.quantity_b,
        });
        self.row_count += 1;
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Derives grand totals from the sector totals and emits the sorted report.
    pub fn finish(self) -> Result<Report, ExtractError> {
        let sectors: Vec<SectorAggregate> = self.sectors.into_values().collect();

        let (total_a, total_b) = sectors.iter().fold((0.0, 0.0), |(a, b), sector| {
            (a + sector.total_quantity_a, b + sector.total_quantity_b)
        });

        if let Some(sector) = sectors
            .iter()
            .find(|s| !s.total_quantity_a.is_finite() || !s.total_quantity_b.is_finite())
        {
            return Err(ExtractError::NonFiniteTotal(format!("sector '{}'", sector.sector_name)));
        }
        let grand_totals = GrandTotals::new(total_a, total_b);
        if !grand_totals.total_items.is_finite() {
            return Err(ExtractError::NonFiniteTotal("grand totals".to_string()));
        }

        tracing::debug!(
            "Aggregated {} rows into {} sectors (A={}, B={})",
            self.row_count,
            sectors.len(),
            grand_totals.total_quantity_a,
            grand_totals.total_quantity_b
        );

        Ok(Report { sectors, grand_totals, row_count: self.row_count })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::models::CandidateRecord;

    fn validated(sector: &str, facility: &str, a: f64, b: f64) -> ValidatedRecord {
        ValidatedRecord::new_unchecked(CandidateRecord::new(sector, facility, a, b))
    }

    #[test]
    fn groups_by_sector_and_keeps_encounter_order() {
        let mut agg = Aggregator::new();
        agg.push(validated("Sector B", "Zeta", 1.0, 2.0));
        agg.push(validated("Sector A", "Facility Y", 5.0, 5.0));
        agg.push(validated("Sector B", "Alpha", 3.0, 4.0));
        let report = agg.finish().unwrap();

        let names: Vec<&str> = report.sectors.iter().map(|s| s.sector_name.as_str()).collect();
        assert_eq!(names, vec!["Sector A", "Sector B"]);

        let b = &report.sectors[1];
        assert_eq!(b.breakdown[0].facility_name, "Zeta");
        assert_eq!(b.breakdown[1].facility_name, "Alpha");
        assert_eq!(b.total_quantity_a, 4.0);
        assert_eq!(b.total_quantity_b, 6.0);

        assert_eq!(report.row_count, 3);
        assert_eq!(report.grand_totals.total_quantity_a, 9.0);
        assert_eq!(report.grand_totals.total_quantity_b, 11.0);
        assert_eq!(report.grand_totals.total_items, 20.0);
    }

    #[test]
    fn sector_keys_are_exact_match() {
        let mut agg = Aggregator::new();
        agg.push(validated("Sector A", "One", 1.0, 1.0));
        agg.push(validated("sector a", "Two", 1.0, 1.0));
        agg.push(validated("Sector  A", "Three", 1.0, 1.0));
        let report = agg.finish().unwrap();
        assert_eq!(report.sectors.len(), 3);
        // ordinal comparison puts upper case first
        assert_eq!(report.sectors[0].sector_name, "Sector  A");
        assert_eq!(report.sectors[2].sector_name, "sector a");
    }

    #[test]
    fn empty_aggregator_yields_zeroed_report() {
        let report = Aggregator::new().finish().unwrap();
        assert!(report.sectors.is_empty());
        assert_eq!(report.row_count, 0);
        assert_eq!(report.grand_totals, GrandTotals::default());
    }

    #[test]
    fn overflowing_totals_are_an_error() {
        let mut agg = Aggregator::new();
        agg.push(validated("Sector A", "One", f64::MAX, 1.0));
        agg.push(validated("Sector A", "Two", f64::MAX, 1.0));
        assert!(matches!(agg.finish(), Err(ExtractError::NonFiniteTotal(_))));
    }
}
