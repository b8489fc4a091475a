// roiwatch/src/config.rs
//
// Deployment configuration: loaded once, validated once, then shared
// read-only by every batch evaluation. There is no process-global state:
// callers hold a RoiConfig and pass it by reference.
//
// File format (JSON):
//   {
//     "amount_field": "credit_amount",
//     "label_field":  "label_value",
//     "score_field":  "score",
//     "convention":   "A",
//     "cost_table":   { "TP": 1.5, "FP": -2, "TN": 2, "FN": -1.5 },
//     "baseline_rates":     { "TPR": 0.53125, "TNR": 0.8772 },   // optional
//     "projection_formula": "offset"                              // optional
//   }

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::records::{Class, Outcome};

// ── Field mapping ─────────────────────────────────────────────────────────────

/// Column names of the three fields the core reads from each row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMap {
    pub amount_field: String,
    pub label_field:  String,
    pub score_field:  String,
}

impl FieldMap {
    fn validate(&self) -> Result<(), ConfigError> {
        let roles = [
            ("amount", &self.amount_field),
            ("label", &self.label_field),
            ("score", &self.score_field),
        ];
        for (role, name) in roles {
            if name.trim().is_empty() {
                return Err(ConfigError::MissingFieldName { role });
            }
        }
        if self.amount_field == self.label_field || self.amount_field == self.score_field {
            return Err(ConfigError::DuplicateFieldName { name: self.amount_field.clone() });
        }
        if self.label_field == self.score_field {
            return Err(ConfigError::DuplicateFieldName { name: self.label_field.clone() });
        }
        Ok(())
    }
}

// ── Polarity convention ───────────────────────────────────────────────────────

/// Which label value denotes the positive class. Domain-specific; there is
/// no default and it is never inferred from data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Convention {
    /// Positive class labeled 1.
    #[serde(rename = "A", alias = "a", alias = "positive_one")]
    A,
    /// Positive class labeled 0.
    #[serde(rename = "B", alias = "b", alias = "positive_zero")]
    B,
}

impl Convention {
    pub fn positive_class(self) -> Class {
        match self {
            Self::A => Class::One,
            Self::B => Class::Zero,
        }
    }
}

impl FromStr for Convention {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" | "a" | "positive_one"  => Ok(Self::A),
            "B" | "b" | "positive_zero" => Ok(Self::B),
            other => Err(format!("unknown convention `{}` (expected A or B)", other)),
        }
    }
}

impl std::fmt::Display for Convention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::B => write!(f, "B"),
        }
    }
}

// ── Cost table ────────────────────────────────────────────────────────────────

/// Signed monetary multiplier per outcome bucket. Entries may be omitted;
/// a lookup for an absent entry is a configuration error, never zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CostTable(BTreeMap<Outcome, f64>);

impl CostTable {
    pub fn new(tp: f64, fp: f64, tn: f64, fn_: f64) -> Self {
        Self(
            [(Outcome::Tp, tp), (Outcome::Fp, fp), (Outcome::Tn, tn), (Outcome::Fn, fn_)]
                .into_iter()
                .collect(),
        )
    }

    pub fn with(mut self, outcome: Outcome, cost: f64) -> Self {
        self.0.insert(outcome, cost);
        self
    }

    pub fn without(mut self, outcome: Outcome) -> Self {
        self.0.remove(&outcome);
        self
    }

    pub fn get(&self, outcome: Outcome) -> Result<f64, ConfigError> {
        self.0.get(&outcome).copied().ok_or(ConfigError::MissingCost { outcome })
    }

    pub fn iter(&self) -> impl Iterator<Item = (Outcome, f64)> + '_ {
        self.0.iter().map(|(o, c)| (*o, *c))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (outcome, cost) in self.iter() {
            if !cost.is_finite() {
                return Err(ConfigError::NonFiniteCost { outcome });
            }
        }
        Ok(())
    }
}

// ── Baseline rates ────────────────────────────────────────────────────────────

/// Classifier behaviour measured on reference data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaselineRates {
    #[serde(rename = "TPR", alias = "tpr")]
    pub tpr: f64,
    #[serde(rename = "TNR", alias = "tnr")]
    pub tnr: f64,
    #[serde(rename = "FPR", alias = "fpr", default, skip_serializing_if = "Option::is_none")]
    pub fpr: Option<f64>,
    #[serde(rename = "FNR", alias = "fnr", default, skip_serializing_if = "Option::is_none")]
    pub fnr: Option<f64>,
}

impl BaselineRates {
    pub fn new(tpr: f64, tnr: f64) -> Self {
        Self { tpr, tnr, fpr: None, fnr: None }
    }

    pub fn with_error_rates(mut self, fpr: f64, fnr: f64) -> Self {
        self.fpr = Some(fpr);
        self.fnr = Some(fnr);
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let rates = [
            ("TPR", Some(self.tpr)),
            ("TNR", Some(self.tnr)),
            ("FPR", self.fpr),
            ("FNR", self.fnr),
        ];
        for (rate, value) in rates {
            if let Some(value) = value {
                // NaN fails the range check too
                if !(0.0..=1.0).contains(&value) {
                    return Err(ConfigError::RateOutOfRange { rate, value });
                }
            }
        }
        Ok(())
    }
}

// ── Projection formula selector ───────────────────────────────────────────────

/// Built-in projection blending rules. See engine::projected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormulaKind {
    ExpectedValue,
    Offset,
    FullRates,
}

impl FormulaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ExpectedValue => "expected_value",
            Self::Offset        => "offset",
            Self::FullRates     => "full_rates",
        }
    }
}

impl FromStr for FormulaKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "expected_value" => Ok(Self::ExpectedValue),
            "offset"         => Ok(Self::Offset),
            "full_rates"     => Ok(Self::FullRates),
            other => Err(ConfigError::UnknownFormula { name: other.to_string() }),
        }
    }
}

// ── Top-level config ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoiConfig {
    #[serde(flatten)]
    pub fields:             FieldMap,
    pub convention:         Convention,
    pub cost_table:         CostTable,
    pub baseline_rates:     Option<BaselineRates>,
    pub projection_formula: Option<FormulaKind>,
}

/// On-disk shape. The formula stays a string here so an unknown name maps
/// to ConfigError::UnknownFormula instead of a generic parse failure.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(flatten)]
    fields:             FieldMap,
    convention:         Convention,
    cost_table:         CostTable,
    #[serde(default)]
    baseline_rates:     Option<BaselineRates>,
    #[serde(default)]
    projection_formula: Option<String>,
}

impl RoiConfig {
    pub fn new(fields: FieldMap, convention: Convention, cost_table: CostTable) -> Self {
        Self { fields, convention, cost_table, baseline_rates: None, projection_formula: None }
    }

    pub fn with_baseline(mut self, rates: BaselineRates) -> Self {
        self.baseline_rates = Some(rates);
        self
    }

    pub fn with_formula(mut self, formula: FormulaKind) -> Self {
        self.projection_formula = Some(formula);
        self
    }

    /// Reference credit-risk deployment: positive class labeled 1, baseline
    /// rates measured on the training holdout.
    pub fn credit_example() -> Self {
        Self::new(
            FieldMap {
                amount_field: "credit_amount".into(),
                label_field:  "label_value".into(),
                score_field:  "score".into(),
            },
            Convention::A,
            CostTable::new(1.5, -2.0, 2.0, -1.5),
        )
        .with_baseline(BaselineRates::new(0.53125, 0.8772321428571429))
        .with_formula(FormulaKind::Offset)
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile =
            serde_json::from_str(s).map_err(|e| ConfigError::Parse { reason: e.to_string() })?;
        let projection_formula = file
            .projection_formula
            .as_deref()
            .map(FormulaKind::from_str)
            .transpose()?;
        let cfg = Self {
            fields:         file.fields,
            convention:     file.convention,
            cost_table:     file.cost_table,
            baseline_rates: file.baseline_rates,
            projection_formula,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path:   path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.fields.validate()?;
        self.cost_table.validate()?;
        if let Some(rates) = &self.baseline_rates {
            rates.validate()?;
            if self.projection_formula == Some(FormulaKind::FullRates) {
                if rates.fpr.is_none() {
                    return Err(ConfigError::IncompleteRates { formula: "full_rates", missing: "FPR" });
                }
                if rates.fnr.is_none() {
                    return Err(ConfigError::IncompleteRates { formula: "full_rates", missing: "FNR" });
                }
            }
        }
        Ok(())
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Serialize { reason: e.to_string() })
    }
}
