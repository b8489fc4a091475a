// roiwatch/src/engine/actual.rs
//
// Actual ROI: Σ amount × cost[outcome] over the classified batch,
// rounded to cents. Per-bucket contributions are summed alongside so the
// report can show where the money went.

use crate::config::CostTable;
use crate::error::Result;
use crate::eval::OutcomeValues;
use crate::records::{ClassifiedRecord, Outcome};

use super::sum::{finite, round2, CompensatedSum};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActualRoi {
    /// Unrounded compensated sum. Use this when combining batches.
    pub raw:         f64,
    pub rounded:     f64,
    pub per_outcome: OutcomeValues,
}

pub fn actual_roi(classified: &[ClassifiedRecord], costs: &CostTable) -> Result<ActualRoi> {
    let mut total   = CompensatedSum::new();
    let mut buckets = [CompensatedSum::new(); 4];

    for (i, c) in classified.iter().enumerate() {
        let contribution = finite(c.record.amount * costs.get(c.outcome)?, || {
            format!("actual contribution of record #{i}")
        })?;
        total.add(contribution);
        buckets[bucket_index(c.outcome)].add(contribution);
    }

    let mut per_outcome = OutcomeValues::default();
    for outcome in Outcome::ALL {
        let value = finite(buckets[bucket_index(outcome)].value(), || {
            format!("actual {outcome} bucket total")
        })?;
        per_outcome.set(outcome, round2(value));
    }

    let raw = finite(total.value(), || "actual ROI total".to_string())?;
    Ok(ActualRoi { raw, rounded: round2(raw), per_outcome })
}

fn bucket_index(outcome: Outcome) -> usize {
    match outcome {
        Outcome::Tp => 0,
        Outcome::Fp => 1,
        Outcome::Tn => 2,
        Outcome::Fn => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Convention;
    use crate::engine::classifier::classify_batch;
    use crate::error::{ConfigError, RoiError};
    use crate::records::Record;

    fn batch(rows: &[(f64, u8, u8)], convention: Convention) -> Vec<ClassifiedRecord> {
        let records: Vec<Record> = rows
            .iter()
            .enumerate()
            .map(|(i, &(a, l, s))| Record::new(i, a, l, s).unwrap())
            .collect();
        classify_batch(&records, convention)
    }

    #[test]
    fn sums_amount_times_cost() {
        let costs = CostTable::new(1.5, -2.0, 2.0, -1.5);
        let c = batch(&[(100.0, 1, 1), (50.0, 0, 0), (200.0, 0, 1)], Convention::A);
        let roi = actual_roi(&c, &costs).unwrap();
        assert_eq!(roi.rounded, -150.0);
        assert_eq!(roi.per_outcome.get(Outcome::Tp), 150.0);
        assert_eq!(roi.per_outcome.get(Outcome::Tn), 100.0);
        assert_eq!(roi.per_outcome.get(Outcome::Fp), -400.0);
        assert_eq!(roi.per_outcome.get(Outcome::Fn), 0.0);
    }

    #[test]
    fn empty_batch_is_zero() {
        let roi = actual_roi(&[], &CostTable::default()).unwrap();
        assert_eq!(roi.rounded, 0.0);
        assert_eq!(roi.raw, 0.0);
    }

    #[test]
    fn missing_cost_for_present_outcome_fails() {
        let costs = CostTable::new(1.0, 1.0, 1.0, 1.0).without(Outcome::Fn);
        let c = batch(&[(10.0, 1, 1), (10.0, 1, 0)], Convention::A);
        assert_eq!(
            actual_roi(&c, &costs).unwrap_err(),
            RoiError::from(ConfigError::MissingCost { outcome: Outcome::Fn })
        );
    }

    #[test]
    fn missing_cost_for_absent_outcome_is_fine() {
        let costs = CostTable::new(1.0, 1.0, 1.0, 1.0).without(Outcome::Fn);
        let c = batch(&[(10.0, 1, 1)], Convention::A);
        assert_eq!(actual_roi(&c, &costs).unwrap().rounded, 10.0);
    }

    #[test]
    fn zero_amount_still_needs_its_cost_entry() {
        let costs = CostTable::new(1.0, 1.0, 1.0, 1.0).without(Outcome::Tp);
        let c = batch(&[(0.0, 1, 1)], Convention::A);
        assert!(actual_roi(&c, &costs).is_err());
    }

    #[test]
    fn rounding_is_pinned_half_away_from_zero() {
        let costs = CostTable::new(0.125, -0.125, 1.0, 1.0);
        let up = batch(&[(1.0, 1, 1)], Convention::A);
        assert_eq!(actual_roi(&up, &costs).unwrap().rounded, 0.13);
        let down = batch(&[(1.0, 0, 1)], Convention::A);
        assert_eq!(actual_roi(&down, &costs).unwrap().rounded, -0.13);
    }

    #[test]
    fn rounds_the_stored_sum_not_its_decimal_spelling() {
        let costs = CostTable::new(1.0, 1.0, 1.0, 1.0);
        let c = batch(&[(1.115, 1, 1)], Convention::A);
        assert_eq!(actual_roi(&c, &costs).unwrap().rounded, 1.11);
    }

    #[test]
    fn overflowing_contribution_is_an_error() {
        let costs = CostTable::new(1.5, 1.0, 1.0, 1.0);
        let c = batch(&[(1e308, 1, 1)], Convention::A);
        assert_eq!(
            actual_roi(&c, &costs).unwrap_err(),
            RoiError::Overflow { context: "actual contribution of record #0".into() }
        );
    }

    #[test]
    fn overflowing_total_is_an_error() {
        let costs = CostTable::new(1.0, 1.0, 1.0, 1.0);
        let c = batch(&[(1e308, 1, 1), (1e308, 1, 1)], Convention::A);
        let err = actual_roi(&c, &costs).unwrap_err();
        assert!(matches!(err, RoiError::Overflow { .. }), "{err}");
    }

    #[test]
    fn overflowing_bucket_is_an_error_even_if_total_cancels() {
        let costs = CostTable::new(1.0, -1.0, 1.0, 1.0);
        let c = batch(&[(1e308, 1, 1), (1e308, 0, 1), (1e308, 1, 1)], Convention::A);
        assert_eq!(
            actual_roi(&c, &costs).unwrap_err(),
            RoiError::Overflow { context: "actual TP bucket total".into() }
        );
    }

    #[test]
    fn large_finite_totals_are_kept_as_numbers() {
        let costs = CostTable::new(1.5, 1.0, 1.0, 1.0);
        let c = batch(&[(1e307, 1, 1)], Convention::A);
        let roi = actual_roi(&c, &costs).unwrap();
        assert!(roi.rounded.is_finite());
        assert_eq!(roi.rounded, roi.raw);
    }
}
