//! Typed errors for the recoverable paths: prediction and form input.
//!
//! Startup failures (config, model artifact) go through `anyhow` instead,
//! since nothing can recover from them.

use thiserror::Error;

/// Errors raised while running a single prediction.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PredictError {
    /// The record lacks a field the model was trained on.
    #[error("missing feature '{0}' expected by the model")]
    MissingField(String),

    /// The record carries a field the model does not know.
    #[error("unexpected feature '{0}' not in the model schema")]
    UnexpectedField(String),

    /// A field value is NaN or infinite.
    #[error("feature '{0}' is not a finite number")]
    NonNumeric(String),

    /// The model produced no output values.
    #[error("model returned no output")]
    EmptyOutput,

    /// The model produced NaN or an infinity.
    #[error("model returned a non-finite value ({0})")]
    NonFinite(f64),

    /// Runtime failure inside the inference backend.
    #[error("inference failed: {0}")]
    Inference(String),
}

impl From<ort::Error> for PredictError {
    fn from(e: ort::Error) -> Self {
        PredictError::Inference(e.to_string())
    }
}

/// Errors raised when editing form inputs.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FormError {
    #[error("unknown field '{field}' (expected one of: {expected})")]
    UnknownField { field: String, expected: String },

    #[error("'{0}' is not a number")]
    NotANumber(String),
}
