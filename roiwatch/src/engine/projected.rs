// roiwatch/src/engine/projected.rs
//
// Projected ROI: what the batch would earn in expectation given only the
// model's predictions and its baseline confusion rates. Actual labels are
// never read here.
//
// Per record: amount × m(prediction), where m is the deployment's blending
// rule. A predicted positive can only end up TP or FP, a predicted negative
// TN or FN, so every rule mixes within those pairs. Built-in rules:
//
//   expected_value   pos: TPR·TP + (1−TPR)·FP      neg: TNR·TN + (1−TNR)·FN
//   offset           pos: TPR·TP + (1 − TPR·FP)    neg: TNR·TN + (1 − TNR·FN)
//   full_rates       pos: TPR·TP + FPR·FP          neg: TNR·TN + FNR·FN
//
// `offset` reproduces the figures existing credit-risk dashboards were
// built on. Custom rules plug in through ProjectionFormula.

use crate::config::{BaselineRates, Convention, CostTable, FormulaKind};
use crate::error::{ConfigError, RoiError};
use crate::records::{Outcome, Record};

use super::classifier::{predicted, Prediction};
use super::sum::{finite, round2, CompensatedSum};

pub trait ProjectionFormula: Send + Sync {
    fn name(&self) -> &str;

    /// Expected cost multiplier for one record with the given prediction.
    fn expected_multiplier(
        &self,
        prediction: Prediction,
        rates:      &BaselineRates,
        costs:      &CostTable,
    ) -> Result<f64, ConfigError>;
}

// ── Built-in rules ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
pub struct ExpectedValue;

impl ProjectionFormula for ExpectedValue {
    fn name(&self) -> &str { FormulaKind::ExpectedValue.as_str() }

    fn expected_multiplier(&self, prediction: Prediction, rates: &BaselineRates, costs: &CostTable) -> Result<f64, ConfigError> {
        Ok(match prediction {
            Prediction::Positive => rates.tpr * costs.get(Outcome::Tp)? + (1.0 - rates.tpr) * costs.get(Outcome::Fp)?,
            Prediction::Negative => rates.tnr * costs.get(Outcome::Tn)? + (1.0 - rates.tnr) * costs.get(Outcome::Fn)?,
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Offset;

impl ProjectionFormula for Offset {
    fn name(&self) -> &str { FormulaKind::Offset.as_str() }

    fn expected_multiplier(&self, prediction: Prediction, rates: &BaselineRates, costs: &CostTable) -> Result<f64, ConfigError> {
        Ok(match prediction {
            Prediction::Positive => rates.tpr * costs.get(Outcome::Tp)? + (1.0 - rates.tpr * costs.get(Outcome::Fp)?),
            Prediction::Negative => rates.tnr * costs.get(Outcome::Tn)? + (1.0 - rates.tnr * costs.get(Outcome::Fn)?),
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FullRates;

impl ProjectionFormula for FullRates {
    fn name(&self) -> &str { FormulaKind::FullRates.as_str() }

    fn expected_multiplier(&self, prediction: Prediction, rates: &BaselineRates, costs: &CostTable) -> Result<f64, ConfigError> {
        let missing = |rate| ConfigError::IncompleteRates { formula: "full_rates", missing: rate };
        Ok(match prediction {
            Prediction::Positive => {
                let fpr = rates.fpr.ok_or_else(|| missing("FPR"))?;
                rates.tpr * costs.get(Outcome::Tp)? + fpr * costs.get(Outcome::Fp)?
            }
            Prediction::Negative => {
                let fnr = rates.fnr.ok_or_else(|| missing("FNR"))?;
                rates.tnr * costs.get(Outcome::Tn)? + fnr * costs.get(Outcome::Fn)?
            }
        })
    }
}

pub fn builtin(kind: FormulaKind) -> Box<dyn ProjectionFormula> {
    match kind {
        FormulaKind::ExpectedValue => Box::new(ExpectedValue),
        FormulaKind::Offset        => Box::new(Offset),
        FormulaKind::FullRates     => Box::new(FullRates),
    }
}

// ── Aggregation ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedRoi {
    pub raw:     f64,
    pub rounded: f64,
}

pub fn projected_roi(
    records:    &[Record],
    convention: Convention,
    rates:      &BaselineRates,
    costs:      &CostTable,
    formula:    &dyn ProjectionFormula,
) -> Result<ProjectedRoi, RoiError> {
    // Multipliers depend only on the prediction; resolve each class once,
    // and only if it occurs (a missing FN cost must not fail an all-positive batch).
    let mut positive: Option<f64> = None;
    let mut negative: Option<f64> = None;
    let mut total = CompensatedSum::new();

    for (i, record) in records.iter().enumerate() {
        let prediction = predicted(record, convention);
        let slot = match prediction {
            Prediction::Positive => &mut positive,
            Prediction::Negative => &mut negative,
        };
        let m = match *slot {
            Some(m) => m,
            None => {
                let m = formula.expected_multiplier(prediction, rates, costs)?;
                *slot = Some(m);
                m
            }
        };
        total.add(finite(record.amount * m, || format!("projected contribution of record #{i}"))?);
    }

    let raw = finite(total.value(), || "projected ROI total".to_string())?;
    Ok(ProjectedRoi { raw, rounded: round2(raw) })
}
