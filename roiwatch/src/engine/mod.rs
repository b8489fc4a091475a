pub mod actual;
pub mod classifier;
pub mod projected;
pub mod sum;

pub use classifier::{classify, classify_batch, predicted, Prediction};
pub use projected::{ExpectedValue, FullRates, Offset, ProjectionFormula};
