// src/lib.rs
//! Recovers sector/facility indent rows from the plain text of semi-tabular
//! PDF reports and aggregates them into per-sector and grand totals.
//!
//! The engine ([`extractors`]) only ever sees text. Getting that text out of
//! a file, stdin or a URL lives in [`source`]; writing results lives in
//! [`storage`].

pub mod config;
pub mod extractors;
pub mod report;
pub mod source;
pub mod storage;
pub mod utils;

pub use config::ParserConfig;
pub use extractors::{parse_report, ReportExtractor};
pub use report::ExtractionResult;
