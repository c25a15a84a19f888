// src/extractors/mod.rs
pub mod classifier;
pub mod columnar;
pub mod diagnostics;
pub mod pipeline;
pub mod strategies;
pub mod validator;

// Re-export key extraction types for convenience
pub use classifier::{LineClass, LineClassifier, LineContext};
pub use columnar::ColumnarReconstructor;
pub use diagnostics::{Diagnostics, ExtractionMode, RawLine, SkipReason, SkippedLine};
pub use pipeline::{parse_report, split_lines, ReportExtractor};
pub use strategies::{
    default_strategies,
    DelimiterPatternStrategy,
    ExtractionStrategy,
    TrailingNumbersStrategy,
    WideGapStrategy,
};
