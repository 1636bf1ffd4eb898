//! Type definitions shared by the form and the model gateway

pub mod outcome;
pub mod record;

pub use outcome::{Outcome, PredictionOutcome};
pub use record::FeatureRecord;
