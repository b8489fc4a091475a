// roiwatch/src/eval/mod.rs
//
// Batch evaluation: classify every record, then fold the classified batch
// into one Summary.
//
//   rows ──► Record::from_row ──► classify_batch ──► actual_roi
//                                        │
//                                        └──────────► projected_roi (optional)
//
// The evaluator only borrows the deployment config, so one RoiConfig can
// back any number of evaluators on any number of threads.

pub mod report;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::config::{Convention, RoiConfig};
use crate::engine::{actual, classifier, projected};
use crate::engine::projected::ProjectionFormula;
use crate::error::Result;
use crate::records::{self, ClassifiedRecord, Outcome, Record};

// ── Confusion counts ──────────────────────────────────────────────────────────

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OutcomeCounts {
    pub tp:  u64,
    pub fp:  u64,
    pub tn:  u64,
    #[serde(rename = "fn")]
    pub fn_: u64,
}

impl OutcomeCounts {
    pub fn from_classified(classified: &[ClassifiedRecord]) -> Self {
        let mut counts = Self::default();
        for c in classified {
            counts.record(c.outcome);
        }
        counts
    }

    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Tp => self.tp  += 1,
            Outcome::Fp => self.fp  += 1,
            Outcome::Tn => self.tn  += 1,
            Outcome::Fn => self.fn_ += 1,
        }
    }

    pub fn get(&self, outcome: Outcome) -> u64 {
        match outcome {
            Outcome::Tp => self.tp,
            Outcome::Fp => self.fp,
            Outcome::Tn => self.tn,
            Outcome::Fn => self.fn_,
        }
    }

    pub fn total(&self) -> u64 { self.tp + self.fp + self.tn + self.fn_ }

    pub fn precision(&self) -> f64 {
        let denom = self.tp + self.fp;
        if denom == 0 { 1.0 } else { self.tp as f64 / denom as f64 }
    }

    /// Observed true-positive rate.
    pub fn recall(&self) -> f64 {
        let denom = self.tp + self.fn_;
        if denom == 0 { 0.0 } else { self.tp as f64 / denom as f64 }
    }

    /// Observed true-negative rate.
    pub fn specificity(&self) -> f64 {
        let denom = self.tn + self.fp;
        if denom == 0 { 0.0 } else { self.tn as f64 / denom as f64 }
    }

    pub fn f1(&self) -> f64 {
        let p = self.precision();
        let r = self.recall();
        if p + r == 0.0 { 0.0 } else { 2.0 * p * r / (p + r) }
    }

    pub fn fpr(&self) -> f64 {
        let denom = self.fp + self.tn;
        if denom == 0 { 0.0 } else { self.fp as f64 / denom as f64 }
    }

    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 { 0.0 } else { (self.tp + self.tn) as f64 / total as f64 }
    }
}

// ── Per-bucket money ──────────────────────────────────────────────────────────

/// Rounded ROI contribution of each outcome bucket.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct OutcomeValues {
    pub tp:  f64,
    pub fp:  f64,
    pub tn:  f64,
    #[serde(rename = "fn")]
    pub fn_: f64,
}

impl OutcomeValues {
    pub fn get(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::Tp => self.tp,
            Outcome::Fp => self.fp,
            Outcome::Tn => self.tn,
            Outcome::Fn => self.fn_,
        }
    }

    pub fn set(&mut self, outcome: Outcome, value: f64) {
        match outcome {
            Outcome::Tp => self.tp  = value,
            Outcome::Fp => self.fp  = value,
            Outcome::Tn => self.tn  = value,
            Outcome::Fn => self.fn_ = value,
        }
    }
}

// ── Summary ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionStatus {
    Computed,
    /// No baseline rates configured; projected ROI is undefined.
    MissingBaseline,
    /// Baseline present but the deployment defines no projection formula.
    NoFormula,
}

impl std::fmt::Display for ProjectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Computed        => write!(f, "computed"),
            Self::MissingBaseline => write!(f, "missing_baseline"),
            Self::NoFormula       => write!(f, "no_formula"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub actual_roi:         f64,
    pub actual_roi_raw:     f64,
    /// `None` means undefined, which is not the same as zero.
    pub projected_roi:      Option<f64>,
    pub projection_status:  ProjectionStatus,
    pub projection_formula: Option<String>,
    pub amount_field:       String,
    pub convention:         Convention,
    pub n_records:          usize,
    pub outcome_counts:     OutcomeCounts,
    pub outcome_values:     OutcomeValues,
    pub evaluated_at:       DateTime<Utc>,
}

// ── Evaluator ─────────────────────────────────────────────────────────────────

pub struct RoiEvaluator<'a> {
    config:  &'a RoiConfig,
    formula: Option<Box<dyn ProjectionFormula>>,
}

impl<'a> RoiEvaluator<'a> {
    /// Evaluator using the config's built-in projection formula, if any.
    pub fn new(config: &'a RoiConfig) -> Self {
        Self { config, formula: config.projection_formula.map(projected::builtin) }
    }

    /// Evaluator with a custom projection rule, overriding the config's.
    pub fn with_formula(config: &'a RoiConfig, formula: Box<dyn ProjectionFormula>) -> Self {
        Self { config, formula: Some(formula) }
    }

    pub fn config(&self) -> &RoiConfig { self.config }

    /// Validate raw rows against the configured field map, then evaluate.
    pub fn evaluate_rows(&self, rows: &[Map<String, Value>]) -> Result<Summary> {
        let batch = records::from_rows(rows, &self.config.fields)?;
        self.evaluate(&batch)
    }

    pub fn evaluate(&self, batch: &[Record]) -> Result<Summary> {
        let cfg = self.config;

        let classified = classifier::classify_batch(batch, cfg.convention);
        let counts     = OutcomeCounts::from_classified(&classified);
        debug!(
            "Classified {} records (convention {}): tp={} fp={} tn={} fn={}",
            batch.len(), cfg.convention, counts.tp, counts.fp, counts.tn, counts.fn_
        );

        let actual = actual::actual_roi(&classified, &cfg.cost_table)?;

        let (projected_roi, projection_status, projection_formula) =
            match (&cfg.baseline_rates, &self.formula) {
                (None, _) => {
                    debug!("No baseline rates configured, projected ROI undefined");
                    (None, ProjectionStatus::MissingBaseline, None)
                }
                (Some(_), None) => {
                    debug!("No projection formula configured, projected ROI undefined");
                    (None, ProjectionStatus::NoFormula, None)
                }
                (Some(rates), Some(formula)) => {
                    let p = projected::projected_roi(
                        batch, cfg.convention, rates, &cfg.cost_table, &**formula,
                    )?;
                    (Some(p.rounded), ProjectionStatus::Computed, Some(formula.name().to_string()))
                }
            };

        let summary = Summary {
            actual_roi:         actual.rounded,
            actual_roi_raw:     actual.raw,
            projected_roi,
            projection_status,
            projection_formula,
            amount_field:       cfg.fields.amount_field.clone(),
            convention:         cfg.convention,
            n_records:          batch.len(),
            outcome_counts:     counts,
            outcome_values:     actual.per_outcome,
            evaluated_at:       Utc::now(),
        };

        info!(
            "ROI batch: records={} actual={:.2} projected={}",
            summary.n_records,
            summary.actual_roi,
            summary.projected_roi.map(|p| format!("{:.2}", p)).unwrap_or_else(|| "null".into()),
        );
        Ok(summary)
    }
}
