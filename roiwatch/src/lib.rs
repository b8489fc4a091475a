// roiwatch/src/lib.rs
//
// Actual and projected ROI for a scored binary classifier, one batch at a time.

pub mod config;
pub mod engine;
pub mod error;
pub mod eval;
pub mod loader;
pub mod records;

pub use config::{BaselineRates, Convention, CostTable, FieldMap, FormulaKind, RoiConfig};
pub use error::{ConfigError, RoiError};
pub use eval::{OutcomeCounts, OutcomeValues, ProjectionStatus, RoiEvaluator, Summary};
pub use records::{Class, ClassifiedRecord, Outcome, Record};
