// roiwatch/src/records.rs
//
// Record-level domain types flowing through roiwatch.
//
// A batch arrives as tabular rows (JSON objects). The configured FieldMap
// names which columns carry amount / label / score; everything else in the
// row is ignored. Rows become validated Records, Records become
// ClassifiedRecords. Nothing is mutated in place.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::FieldMap;
use crate::error::{Result, RoiError};

// ── Binary class value ────────────────────────────────────────────────────────

/// A label or score value. Only 0 and 1 are representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Class {
    Zero,
    One,
}

impl Class {
    pub fn as_u8(self) -> u8 {
        match self {
            Self::Zero => 0,
            Self::One  => 1,
        }
    }

    /// Parse a JSON value that must be numerically 0 or 1.
    /// `1`, `1.0`, `0` and `0.0` are accepted; booleans and strings are not.
    pub fn from_json(v: &Value) -> std::result::Result<Self, String> {
        let n = match v {
            Value::Number(n) => n.as_f64().ok_or_else(|| format!("is not a usable number: {}", n))?,
            Value::Null      => return Err("is null".into()),
            other            => return Err(format!("must be 0 or 1, got {}", other)),
        };
        if n == 0.0 {
            Ok(Self::Zero)
        } else if n == 1.0 {
            Ok(Self::One)
        } else {
            Err(format!("must be 0 or 1, got {}", n))
        }
    }
}

impl TryFrom<u8> for Class {
    type Error = String;

    fn try_from(v: u8) -> std::result::Result<Self, Self::Error> {
        match v {
            0 => Ok(Self::Zero),
            1 => Ok(Self::One),
            n => Err(format!("must be 0 or 1, got {}", n)),
        }
    }
}

// ── Outcome buckets ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Outcome {
    #[serde(rename = "TP", alias = "tp")]
    Tp,
    #[serde(rename = "FP", alias = "fp")]
    Fp,
    #[serde(rename = "TN", alias = "tn")]
    Tn,
    #[serde(rename = "FN", alias = "fn")]
    Fn,
}

impl Outcome {
    pub const ALL: [Outcome; 4] = [Outcome::Tp, Outcome::Fp, Outcome::Tn, Outcome::Fn];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tp => "TP",
            Self::Fp => "FP",
            Self::Tn => "TN",
            Self::Fn => "FN",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Records ───────────────────────────────────────────────────────────────────

/// One labeled, scored observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub amount: f64,
    pub label:  Class,
    pub score:  Class,
}

impl Record {
    /// Build a record from raw numbers, rejecting anything outside the domain.
    /// `index` is only used to locate the offending row in the error.
    pub fn new(index: usize, amount: f64, label: u8, score: u8) -> Result<Self> {
        let amount = check_amount(index, "amount", amount)?;
        let label  = Class::try_from(label).map_err(|r| RoiError::invalid_record(index, "label", r))?;
        let score  = Class::try_from(score).map_err(|r| RoiError::invalid_record(index, "score", r))?;
        Ok(Self { amount, label, score })
    }

    /// Extract the configured columns from one tabular row.
    pub fn from_row(index: usize, row: &Map<String, Value>, fields: &FieldMap) -> Result<Self> {
        let amount = match field(index, row, &fields.amount_field)? {
            Value::Number(n) => n.as_f64().ok_or_else(|| {
                RoiError::invalid_record(index, &fields.amount_field, format!("is not a usable number: {}", n))
            })?,
            other => {
                return Err(RoiError::invalid_record(
                    index,
                    &fields.amount_field,
                    format!("must be a number, got {}", other),
                ))
            }
        };
        let amount = check_amount(index, &fields.amount_field, amount)?;

        let label = Class::from_json(field(index, row, &fields.label_field)?)
            .map_err(|r| RoiError::invalid_record(index, &fields.label_field, r))?;
        let score = Class::from_json(field(index, row, &fields.score_field)?)
            .map_err(|r| RoiError::invalid_record(index, &fields.score_field, r))?;

        Ok(Self { amount, label, score })
    }
}

fn field<'a>(index: usize, row: &'a Map<String, Value>, name: &str) -> Result<&'a Value> {
    row.get(name)
        .ok_or_else(|| RoiError::invalid_record(index, name, "is missing from the row"))
}

fn check_amount(index: usize, name: &str, amount: f64) -> Result<f64> {
    if !amount.is_finite() {
        return Err(RoiError::invalid_record(index, name, format!("must be finite, got {}", amount)));
    }
    if amount < 0.0 {
        return Err(RoiError::invalid_record(index, name, format!("must be non-negative, got {}", amount)));
    }
    Ok(amount)
}

/// Convert an ordered row sequence into a batch. The first invalid row
/// rejects the whole batch.
pub fn from_rows(rows: &[Map<String, Value>], fields: &FieldMap) -> Result<Vec<Record>> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| Record::from_row(i, row, fields))
        .collect()
}

/// A record annotated with its outcome bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassifiedRecord {
    pub record:  Record,
    pub outcome: Outcome,
}
