// roiwatch/src/engine/sum.rs
//
// Neumaier compensated summation + money rounding.
//
// The compensation term carries the low-order bits each addition drops.
// Rounding works on the exact binary value of the sum: 1.115 is stored as
// 1.11499999999999999..., so it rounds to 1.11.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{Result, RoiError};

/// At and above 2^52 every f64 is an integer, so there are no cents to round.
const NO_FRACTION: f64 = 4_503_599_627_370_496.0;

#[derive(Debug, Default, Clone, Copy)]
pub struct CompensatedSum {
    sum:          f64,
    compensation: f64,
}

impl CompensatedSum {
    pub fn new() -> Self { Self::default() }

    pub fn add(&mut self, x: f64) {
        let t = self.sum + x;
        if self.sum.abs() >= x.abs() {
            self.compensation += (self.sum - t) + x;
        } else {
            self.compensation += (x - t) + self.sum;
        }
        self.sum = t;
    }

    /// Compensated total. NaN or infinite once the running sum has overflowed.
    pub fn value(&self) -> f64 { self.sum + self.compensation }
}

impl FromIterator<f64> for CompensatedSum {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut s = Self::new();
        for x in iter {
            s.add(x);
        }
        s
    }
}

/// Pass `value` through, or fail with `Overflow` naming what overflowed.
pub fn finite(value: f64, context: impl FnOnce() -> String) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(RoiError::Overflow { context: context() })
    }
}

/// Round to 2 decimals, half away from zero. `-0.0` comes back as `0.0`.
pub fn round2(x: f64) -> f64 {
    if !x.is_finite() || x.abs() >= NO_FRACTION {
        return x;
    }
    // Below half a cent in magnitude, including every subnormal.
    if x.abs() < 0.005 {
        return 0.0;
    }
    let Some(exact) = Decimal::from_f64_retain(x) else {
        return x;
    };
    let r = exact
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(x);
    if r == 0.0 { 0.0 } else { r }
}
