//! Form-to-prediction adapter.
//!
//! `FormState` holds one clamped value per schema field. `Adapter` turns
//! the form into a `FeatureRecord`, calls the predictor once and renders
//! the result as a currency string or an error message.

use crate::config::OutputScale;
use crate::error::FormError;
use crate::format::format_currency;
use crate::models::inference::{ensure_finite, Predictor};
use crate::schema::{Schema, SchemaKind};
use crate::types::outcome::PredictionOutcome;
use crate::types::record::FeatureRecord;
use tracing::{debug, info, warn};

/// Current input values, one per schema field.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    schema: Schema,
    values: Vec<f64>,
}

impl FormState {
    /// Form with every field at its default.
    pub fn new(schema: Schema) -> Self {
        let values = schema.fields().iter().map(|f| f.default).collect();
        Self { schema, values }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Values in schema order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.schema.index_of(key).map(|i| self.values[i])
    }

    /// Set a field, clamping to its bounds. Returns the effective value.
    pub fn set(&mut self, key: &str, value: f64) -> Result<f64, FormError> {
        let index = self
            .schema
            .index_of(key)
            .ok_or_else(|| FormError::UnknownField {
                field: key.to_string(),
                expected: self.schema.keys().join(", "),
            })?;

        if value.is_nan() {
            return Err(FormError::NotANumber(value.to_string()));
        }

        let field = &self.schema.fields()[index];
        let effective = field.clamp(value);
        if effective != value {
            debug!(field = %key, requested = value, effective = effective, "Input clamped");
        }
        self.values[index] = effective;
        Ok(effective)
    }

    /// Parse `raw` and set it.
    pub fn set_str(&mut self, key: &str, raw: &str) -> Result<f64, FormError> {
        let value: f64 = raw
            .trim()
            .parse()
            .map_err(|_| FormError::NotANumber(raw.trim().to_string()))?;
        self.set(key, value)
    }

    /// Restore every field to its default.
    pub fn reset(&mut self) {
        for (value, field) in self.values.iter_mut().zip(self.schema.fields()) {
            *value = field.default;
        }
    }

    /// Assemble the record for one prediction. Keys equal the schema, in order.
    pub fn build_record(&self) -> FeatureRecord {
        FeatureRecord::from_pairs(
            self.schema
                .fields()
                .iter()
                .zip(&self.values)
                .map(|(field, &value)| (field.key, value)),
        )
    }

    /// Render the form as a table of fields and current values.
    pub fn render(&self) -> String {
        let mut out = String::from("House features\n");
        for (field, &value) in self.schema.fields().iter().zip(&self.values) {
            out.push_str(&format!(
                "  {:<20} {:<26} {:>12}   [{} .. {}]\n",
                field.key,
                field.label,
                field.display_value(value),
                field.display_bound(field.min),
                field.display_bound(field.max),
            ));
        }
        out
    }
}

/// Runs one prediction per trigger and formats the outcome.
pub struct Adapter<'a, P: Predictor + ?Sized> {
    predictor: &'a P,
    output_scale: OutputScale,
}

impl<'a, P: Predictor + ?Sized> Adapter<'a, P> {
    pub fn new(predictor: &'a P, output_scale: OutputScale) -> Self {
        Self {
            predictor,
            output_scale,
        }
    }

    pub fn output_scale(&self) -> OutputScale {
        self.output_scale
    }

    /// Build a record from `form` and predict.
    pub fn predict(&self, form: &FormState) -> PredictionOutcome {
        let record = form.build_record();
        self.predict_record(form.schema().kind, &record)
    }

    /// Predict an already assembled record.
    ///
    /// Failures are caught here and carried in the outcome, never retried.
    pub fn predict_record(&self, schema: SchemaKind, record: &FeatureRecord) -> PredictionOutcome {
        let result = self
            .predictor
            .predict(record)
            .and_then(|raw| ensure_finite(self.output_scale.apply(raw)).map(|value| (raw, value)));

        match result {
            Ok((raw, value)) => {
                let display = format_currency(value);
                info!(
                    schema = %schema,
                    raw = raw,
                    value = value,
                    "Prediction succeeded"
                );
                PredictionOutcome::estimated(schema, raw, value, display)
            }
            Err(e) => {
                warn!(schema = %schema, error = %e, "Prediction failed");
                PredictionOutcome::failed(schema, e.to_string())
            }
        }
    }
}
