//! Single-row regression inference

use crate::error::PredictError;
use crate::models::loader::LoadedModel;
use crate::schema::Schema;
use crate::types::record::FeatureRecord;
use anyhow::Result;
use ort::session::SessionInputValue;
use ort::value::{DynValue, Tensor};
use std::sync::Mutex;
use tracing::debug;

/// Anything that turns one feature record into one scalar.
pub trait Predictor {
    fn predict(&self, record: &FeatureRecord) -> Result<f64, PredictError>;
}

impl<P: Predictor + ?Sized> Predictor for Box<P> {
    fn predict(&self, record: &FeatureRecord) -> Result<f64, PredictError> {
        (**self).predict(record)
    }
}

/// How the graph expects its features.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputLayout {
    /// One `[1, n]` float tensor, columns in schema order
    Matrix,
    /// One `[1, 1]` tensor per named column
    Columns,
}

/// Predictor backed by an ONNX Runtime session
pub struct OnnxPredictor {
    /// `Session::run` needs `&mut`
    model: Mutex<LoadedModel>,
    schema: Schema,
    layout: InputLayout,
}

impl OnnxPredictor {
    /// Wrap a loaded model, checking that its inputs fit `schema`
    pub fn new(model: LoadedModel, schema: Schema) -> Result<Self> {
        let layout = Self::detect_layout(&model.input_names, &schema)?;

        debug!(model = %model.name, layout = ?layout, schema = %schema.kind, "ONNX predictor ready");

        Ok(Self {
            model: Mutex::new(model),
            schema,
            layout,
        })
    }

    fn detect_layout(input_names: &[String], schema: &Schema) -> Result<InputLayout> {
        if input_names.len() == 1 {
            return Ok(InputLayout::Matrix);
        }

        if let Some(missing) = schema
            .keys()
            .into_iter()
            .find(|key| !input_names.iter().any(|n| n == key))
        {
            anyhow::bail!(
                "Model inputs {:?} do not match the {} schema (no input named '{}')",
                input_names,
                schema.kind,
                missing
            );
        }

        Ok(InputLayout::Columns)
    }

    /// Pull the first numeric value out of a model output
    fn first_value(output: &DynValue) -> Result<f64, PredictError> {
        if let Ok((_, data)) = output.try_extract_tensor::<f32>() {
            return data.first().map(|&v| v as f64).ok_or(PredictError::EmptyOutput);
        }

        if let Ok((_, data)) = output.try_extract_tensor::<f64>() {
            return data.first().copied().ok_or(PredictError::EmptyOutput);
        }

        Err(PredictError::Inference(
            "model output is not a floating-point tensor".to_string(),
        ))
    }
}

/// Reject NaN and infinities coming out of a model or a rescale.
pub fn ensure_finite(value: f64) -> Result<f64, PredictError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(PredictError::NonFinite(value))
    }
}

impl Predictor for OnnxPredictor {
    fn predict(&self, record: &FeatureRecord) -> Result<f64, PredictError> {
        let keys = self.schema.keys();
        record.validate_against(&keys)?;

        let mut guard = self
            .model
            .lock()
            .map_err(|e| PredictError::Inference(format!("Lock error: {}", e)))?;
        let LoadedModel {
            name,
            session,
            input_names,
            output_name,
        } = &mut *guard;

        let outputs = match self.layout {
            InputLayout::Matrix => {
                let values = record.ordered_values(&keys)?;
                let shape = vec![1_i64, values.len() as i64];
                let tensor = Tensor::from_array((shape, values))?;
                session.run(ort::inputs![&input_names[0] => tensor])?
            }
            InputLayout::Columns => {
                let mut inputs: Vec<(String, SessionInputValue<'static>)> =
                    Vec::with_capacity(keys.len());
                for (key, value) in record.iter() {
                    let tensor = Tensor::from_array((vec![1_i64, 1], vec![value as f32]))?;
                    inputs.push((key.to_string(), tensor.into()));
                }
                session.run(inputs)?
            }
        };

        let output = outputs
            .get(output_name.as_str())
            .ok_or_else(|| PredictError::Inference(format!("output '{}' missing", output_name)))?;
        let value = Self::first_value(output)?;

        debug!(model = %name, value = value, "Inference complete");

        ensure_finite(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_input_is_matrix_layout() {
        let layout =
            OnnxPredictor::detect_layout(&["float_input".to_string()], &Schema::census()).unwrap();
        assert_eq!(layout, InputLayout::Matrix);
    }

    #[test]
    fn test_named_inputs_are_column_layout() {
        let names: Vec<String> = Schema::sklearn()
            .keys()
            .iter()
            .rev()
            .map(|k| k.to_string())
            .collect();
        let layout = OnnxPredictor::detect_layout(&names, &Schema::sklearn()).unwrap();
        assert_eq!(layout, InputLayout::Columns);
    }

    #[test]
    fn test_mismatched_named_inputs_rejected() {
        let names: Vec<String> = Schema::census().keys().iter().map(|k| k.to_string()).collect();
        let err = OnnxPredictor::detect_layout(&names, &Schema::sklearn()).unwrap_err();
        assert!(err.to_string().contains("MedInc"));
    }

    #[test]
    fn test_first_value_from_f32_tensor() {
        let output = Tensor::from_array((vec![1_i64, 1], vec![2.0_f32])).unwrap().into_dyn();
        assert_eq!(OnnxPredictor::first_value(&output), Ok(2.0));
    }

    #[test]
    fn test_first_value_falls_back_to_f64() {
        let output = Tensor::from_array((vec![1_i64, 1], vec![3.25_f64])).unwrap().into_dyn();
        assert_eq!(OnnxPredictor::first_value(&output), Ok(3.25));
    }

    #[test]
    fn test_first_value_empty_output() {
        let output = Tensor::from_array((vec![1_i64, 0], Vec::<f32>::new())).unwrap().into_dyn();
        assert_eq!(OnnxPredictor::first_value(&output), Err(PredictError::EmptyOutput));
    }

    #[test]
    fn test_first_value_rejects_integer_output() {
        let output = Tensor::from_array((vec![1_i64, 1], vec![7_i64])).unwrap().into_dyn();
        assert!(matches!(
            OnnxPredictor::first_value(&output),
            Err(PredictError::Inference(_))
        ));
    }

    #[test]
    fn test_ensure_finite() {
        assert_eq!(ensure_finite(2.5), Ok(2.5));
        assert!(matches!(ensure_finite(f64::NAN), Err(PredictError::NonFinite(_))));
        assert_eq!(
            ensure_finite(f64::INFINITY),
            Err(PredictError::NonFinite(f64::INFINITY))
        );
    }
}
