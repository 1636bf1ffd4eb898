//! Feature record handed to the model

use crate::error::PredictError;
use serde::{Deserialize, Serialize};

/// One row of named numeric features.
///
/// Built fresh for every prediction and never mutated once handed to a
/// predictor. Insertion order is kept, but lookups go by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    fields: Vec<(String, f64)>,
}

impl FeatureRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from `(name, value)` pairs. A repeated name keeps the last value.
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let mut record = Self::new();
        for (key, value) in pairs {
            record.insert(key, value);
        }
        record
    }

    /// Insert or replace a field
    pub fn insert(&mut self, key: impl Into<String>, value: f64) {
        let key = key.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Check that the field set equals `expected` and every value is finite.
    pub fn validate_against(&self, expected: &[&str]) -> Result<(), PredictError> {
        for key in expected {
            if self.get(key).is_none() {
                return Err(PredictError::MissingField((*key).to_string()));
            }
        }

        for (key, value) in self.iter() {
            if !expected.contains(&key) {
                return Err(PredictError::UnexpectedField(key.to_string()));
            }
            if !value.is_finite() {
                return Err(PredictError::NonNumeric(key.to_string()));
            }
        }

        Ok(())
    }

    /// Values laid out in `order`, as `f32` for tensor input.
    pub fn ordered_values(&self, order: &[&str]) -> Result<Vec<f32>, PredictError> {
        order
            .iter()
            .map(|key| {
                self.get(key)
                    .map(|v| v as f32)
                    .ok_or_else(|| PredictError::MissingField((*key).to_string()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_existing() {
        let mut record = FeatureRecord::from_pairs([("a", 1.0), ("b", 2.0)]);
        record.insert("a", 5.0);

        assert_eq!(record.len(), 2);
        assert_eq!(record.get("a"), Some(5.0));
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_validate_missing_field() {
        let record = FeatureRecord::from_pairs([("a", 1.0)]);
        let err = record.validate_against(&["a", "b"]).unwrap_err();
        assert_eq!(err, PredictError::MissingField("b".to_string()));
    }

    #[test]
    fn test_validate_unexpected_field() {
        let record = FeatureRecord::from_pairs([("a", 1.0), ("b", 2.0), ("c", 3.0)]);
        let err = record.validate_against(&["a", "b"]).unwrap_err();
        assert_eq!(err, PredictError::UnexpectedField("c".to_string()));
    }

    #[test]
    fn test_validate_non_finite() {
        let record = FeatureRecord::from_pairs([("a", f64::NAN)]);
        let err = record.validate_against(&["a"]).unwrap_err();
        assert_eq!(err, PredictError::NonNumeric("a".to_string()));
    }

    #[test]
    fn test_ordered_values_ignore_insertion_order() {
        let record = FeatureRecord::from_pairs([("b", 2.0), ("a", 1.0)]);
        assert_eq!(record.ordered_values(&["a", "b"]).unwrap(), vec![1.0, 2.0]);
    }
}
