// Golden batches with hand-checked ROI figures.

use roiwatch::{
    BaselineRates, Convention, CostTable, FieldMap, FormulaKind, Outcome, ProjectionStatus,
    Record, RoiConfig, RoiEvaluator,
};
use roiwatch::engine::classify_batch;

fn fields() -> FieldMap {
    FieldMap {
        amount_field: "amount".into(),
        label_field:  "label".into(),
        score_field:  "score".into(),
    }
}

fn batch(rows: &[(f64, u8, u8)]) -> Vec<Record> {
    rows.iter()
        .enumerate()
        .map(|(i, &(a, l, s))| Record::new(i, a, l, s).unwrap())
        .collect()
}

#[test]
fn scenario_convention_a() {
    let cfg = RoiConfig::new(fields(), Convention::A, CostTable::new(1.5, -2.0, 2.0, -1.5));
    let records = batch(&[(100.0, 1, 1), (50.0, 0, 0), (200.0, 0, 1)]);

    let outcomes: Vec<Outcome> = classify_batch(&records, cfg.convention)
        .into_iter()
        .map(|c| c.outcome)
        .collect();
    assert_eq!(outcomes, vec![Outcome::Tp, Outcome::Tn, Outcome::Fp]);

    let s = RoiEvaluator::new(&cfg).evaluate(&records).unwrap();
    assert_eq!(s.actual_roi, -150.0);
    assert_eq!(s.projected_roi, None);
    assert_eq!(s.projection_status, ProjectionStatus::MissingBaseline);
}

#[test]
fn scenario_convention_b() {
    let cfg = RoiConfig::new(fields(), Convention::B, CostTable::new(2.0, -1.5, 1.5, -2.0));
    let records = batch(&[(1000.0, 0, 0), (500.0, 1, 0)]);

    let outcomes: Vec<Outcome> = classify_batch(&records, cfg.convention)
        .into_iter()
        .map(|c| c.outcome)
        .collect();
    // label 1 is the negative class here, predicted positive → false positive
    assert_eq!(outcomes, vec![Outcome::Tp, Outcome::Fp]);

    let s = RoiEvaluator::new(&cfg).evaluate(&records).unwrap();
    assert_eq!(s.actual_roi, 1250.0);
    assert_eq!(s.outcome_counts.tp, 1);
    assert_eq!(s.outcome_counts.fp, 1);
}

#[test]
fn same_rows_flip_meaning_under_the_other_convention() {
    let costs   = CostTable::new(2.0, -1.5, 1.5, -2.0);
    let records = batch(&[(1000.0, 0, 0), (500.0, 1, 0)]);
    let a = RoiConfig::new(fields(), Convention::A, costs);
    let s = RoiEvaluator::new(&a).evaluate(&records).unwrap();
    // TN + FN under A: 1000×1.5 + 500×(−2)
    assert_eq!(s.actual_roi, 500.0);
}

#[test]
fn credit_reference_projection() {
    let cfg = RoiConfig::credit_example();
    let records = batch(&[(100.0, 1, 1), (50.0, 0, 0), (200.0, 0, 1)]);
    let s = RoiEvaluator::new(&cfg).evaluate(&records).unwrap();

    let tpr = 0.53125;
    let tnr = 0.8772321428571429;
    let pos = tpr * 1.5 + (1.0 - tpr * -2.0);
    let neg = tnr * 2.0 + (1.0 - tnr * -1.5);
    let expected = ((300.0 * pos + 50.0 * neg) * 100.0_f64).round() / 100.0;

    assert_eq!(s.actual_roi, -150.0);
    assert_eq!(s.projected_roi, Some(expected));
    assert_eq!(s.projection_status, ProjectionStatus::Computed);
    assert_eq!(s.projection_formula.as_deref(), Some("offset"));
}

#[test]
fn expected_value_projection_on_balanced_rates() {
    let cfg = RoiConfig::new(fields(), Convention::A, CostTable::new(1.0, -1.0, 1.0, -1.0))
        .with_baseline(BaselineRates::new(0.75, 0.5))
        .with_formula(FormulaKind::ExpectedValue);
    // positive: 0.75 − 0.25 = 0.5   negative: 0.5 − 0.5 = 0
    let records = batch(&[(100.0, 0, 1), (80.0, 1, 0)]);
    let s = RoiEvaluator::new(&cfg).evaluate(&records).unwrap();
    assert_eq!(s.projected_roi, Some(50.0));
    assert_eq!(s.actual_roi, -180.0);
}

#[test]
fn empty_batch_never_errors() {
    let with_projection = RoiConfig::credit_example();
    let s = RoiEvaluator::new(&with_projection).evaluate(&[]).unwrap();
    assert_eq!((s.actual_roi, s.projected_roi), (0.0, Some(0.0)));

    let without = RoiConfig::new(fields(), Convention::A, CostTable::default());
    let s = RoiEvaluator::new(&without).evaluate(&[]).unwrap();
    assert_eq!((s.actual_roi, s.projected_roi), (0.0, None));
}
