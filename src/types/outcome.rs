//! Result of one predict trigger

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::schema::SchemaKind;

/// Prefix of the success message.
pub const SUCCESS_PREFIX: &str = "Estimated House Price: ";
/// Prefix of the error banner.
pub const ERROR_PREFIX: &str = "Error making prediction: ";

/// What the user sees after pressing predict: a price or an error, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    Estimated {
        /// Value as emitted by the model
        raw: f64,
        /// Value after the output scale was applied
        value: f64,
        /// Formatted currency string
        display: String,
    },
    Failed {
        /// Underlying failure text, verbatim
        reason: String,
    },
}

/// Outcome stamped with when and against which schema it was produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionOutcome {
    #[serde(flatten)]
    pub outcome: Outcome,

    pub schema: SchemaKind,

    pub timestamp: DateTime<Utc>,
}

impl PredictionOutcome {
    pub fn estimated(schema: SchemaKind, raw: f64, value: f64, display: String) -> Self {
        Self {
            outcome: Outcome::Estimated {
                raw,
                value,
                display,
            },
            schema,
            timestamp: Utc::now(),
        }
    }

    pub fn failed(schema: SchemaKind, reason: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Failed {
                reason: reason.into(),
            },
            schema,
            timestamp: Utc::now(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Estimated { .. })
    }

    /// Displayed value, if the prediction succeeded
    pub fn value(&self) -> Option<f64> {
        match &self.outcome {
            Outcome::Estimated { value, .. } => Some(*value),
            Outcome::Failed { .. } => None,
        }
    }

    /// The single line shown to the user.
    pub fn message(&self) -> String {
        match &self.outcome {
            Outcome::Estimated { display, .. } => format!("{}{}", SUCCESS_PREFIX, display),
            Outcome::Failed { reason } => format!("{}{}", ERROR_PREFIX, reason),
        }
    }
}
