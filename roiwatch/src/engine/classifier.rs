// roiwatch/src/engine/classifier.rs
//
// Outcome classifier: (label, score, convention) → TP / FP / TN / FN.
//
// Polarity is a deployment constant:
//   Convention A  positive = 1   (1,1)→TP  (0,0)→TN  label<score→FP  label>score→FN
//   Convention B  positive = 0   (0,0)→TP  (1,1)→TN  label<score→FN  label>score→FP
//
// Classification is a pure per-record map. Each input produces a new
// ClassifiedRecord; no other record is consulted.

use crate::config::Convention;
use crate::records::{ClassifiedRecord, Outcome, Record};

/// The model's predicted class relative to the active convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Prediction {
    Positive,
    Negative,
}

pub fn predicted(record: &Record, convention: Convention) -> Prediction {
    if record.score == convention.positive_class() {
        Prediction::Positive
    } else {
        Prediction::Negative
    }
}

pub fn classify(record: &Record, convention: Convention) -> Outcome {
    let is_positive = record.label == convention.positive_class();
    match (predicted(record, convention), is_positive) {
        (Prediction::Positive, true)  => Outcome::Tp,
        (Prediction::Positive, false) => Outcome::Fp,
        (Prediction::Negative, true)  => Outcome::Fn,
        (Prediction::Negative, false) => Outcome::Tn,
    }
}

pub fn classify_batch(records: &[Record], convention: Convention) -> Vec<ClassifiedRecord> {
    records
        .iter()
        .map(|r| ClassifiedRecord { record: *r, outcome: classify(r, convention) })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(label: u8, score: u8) -> Record {
        Record::new(0, 1.0, label, score).unwrap()
    }

    #[test]
    fn convention_a_truth_table() {
        let c = Convention::A;
        assert_eq!(classify(&rec(1, 1), c), Outcome::Tp);
        assert_eq!(classify(&rec(0, 0), c), Outcome::Tn);
        assert_eq!(classify(&rec(0, 1), c), Outcome::Fp);
        assert_eq!(classify(&rec(1, 0), c), Outcome::Fn);
    }

    #[test]
    fn convention_b_truth_table() {
        let c = Convention::B;
        assert_eq!(classify(&rec(0, 0), c), Outcome::Tp);
        assert_eq!(classify(&rec(1, 1), c), Outcome::Tn);
        assert_eq!(classify(&rec(0, 1), c), Outcome::Fn);
        assert_eq!(classify(&rec(1, 0), c), Outcome::Fp);
    }

    #[test]
    fn every_record_gets_its_own_outcome() {
        // Mixed batch: the last row must not leak its outcome to earlier rows.
        let batch = [rec(1, 1), rec(0, 0), rec(0, 1), rec(1, 0)];
        let outcomes: Vec<Outcome> = classify_batch(&batch, Convention::A)
            .iter()
            .map(|c| c.outcome)
            .collect();
        assert_eq!(outcomes, vec![Outcome::Tp, Outcome::Tn, Outcome::Fp, Outcome::Fn]);
    }

    #[test]
    fn classify_batch_keeps_records_unchanged() {
        let batch = [Record::new(0, 42.5, 1, 0).unwrap()];
        let out = classify_batch(&batch, Convention::B);
        assert_eq!(out[0].record, batch[0]);
        assert_eq!(out[0].outcome, Outcome::Fp);
    }

    #[test]
    fn prediction_follows_convention() {
        assert_eq!(predicted(&rec(0, 1), Convention::A), Prediction::Positive);
        assert_eq!(predicted(&rec(0, 1), Convention::B), Prediction::Negative);
    }
}
