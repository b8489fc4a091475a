// roiwatch/src/error.rs
//
// Error taxonomy for batch evaluation.
//
//   InvalidRecord  a row carries a malformed label / score / amount.
//                  The whole batch is rejected; nothing is coerced.
//   Configuration  the deployment config cannot evaluate this batch
//                  (missing cost entry, bad field names, unusable rates).
//   Overflow       a contribution or total left the finite f64 range.
//
// "No baseline rates" is deliberately absent here: it is a valid deployment
// shape and surfaces as ProjectionStatus::MissingBaseline on the Summary.

use crate::records::Outcome;

pub type Result<T> = std::result::Result<T, RoiError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RoiError {
    #[error("invalid record #{index}: field `{field}` {reason}")]
    InvalidRecord {
        index:  usize,
        field:  String,
        reason: String,
    },

    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("ROI overflow: {context} is not a finite number")]
    Overflow { context: String },
}

impl RoiError {
    pub fn invalid_record(index: usize, field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRecord { index, field: field.into(), reason: reason.into() }
    }

    pub fn is_invalid_record(&self) -> bool {
        matches!(self, Self::InvalidRecord { .. })
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("cost table has no entry for outcome {outcome}")]
    MissingCost { outcome: Outcome },

    #[error("cost for outcome {outcome} is not a finite number")]
    NonFiniteCost { outcome: Outcome },

    #[error("{role} field name is empty")]
    MissingFieldName { role: &'static str },

    #[error("field name `{name}` is mapped to more than one role")]
    DuplicateFieldName { name: String },

    #[error("baseline rate {rate}={value} is outside [0, 1]")]
    RateOutOfRange { rate: &'static str, value: f64 },

    #[error("projection formula `{formula}` needs baseline rate {missing}")]
    IncompleteRates { formula: &'static str, missing: &'static str },

    #[error("unknown projection formula `{name}`")]
    UnknownFormula { name: String },

    #[error("cannot parse configuration: {reason}")]
    Parse { reason: String },

    #[error("cannot read configuration {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("cannot serialize configuration: {reason}")]
    Serialize { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_wrap_into_roi_error() {
        let err: RoiError = ConfigError::MissingCost { outcome: Outcome::Fn }.into();
        assert!(err.is_configuration());
        assert!(!err.is_invalid_record());
        assert_eq!(
            err.to_string(),
            "configuration error: cost table has no entry for outcome FN"
        );
    }

    #[test]
    fn overflow_is_neither_record_nor_configuration() {
        let err = RoiError::Overflow { context: "actual ROI total".into() };
        assert!(!err.is_configuration());
        assert!(!err.is_invalid_record());
        assert_eq!(err.to_string(), "ROI overflow: actual ROI total is not a finite number");
    }

    #[test]
    fn invalid_record_message_names_row_and_field() {
        let err = RoiError::invalid_record(3, "label_value", "must be 0 or 1, got 2");
        assert!(err.is_invalid_record());
        assert_eq!(
            err.to_string(),
            "invalid record #3: field `label_value` must be 0 or 1, got 2"
        );
    }
}
