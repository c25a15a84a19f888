// src/report/mod.rs
pub mod aggregator;
pub mod models;
pub mod sheet;

pub use aggregator::Aggregator;
pub use models::{
    BreakdownEntry, CandidateRecord, ExtractionResult, GrandTotals, Report, SectorAggregate,
    ValidatedRecord,
};
