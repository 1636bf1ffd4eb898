//! Declarative field tables for the supported model schemas.
//!
//! Each schema lists its fields in the exact order the model was trained
//! with. The bounds are UI bounds only: they drive clamping in the form,
//! they say nothing about which values the model accepts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a field's value is presented and stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Continuous value, shown with two decimals.
    Decimal,
    /// Whole number, rounded after clamping.
    Integer,
}

/// One bounded numeric input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldDescriptor {
    /// Name the model was trained with.
    pub key: &'static str,
    /// Human-readable label.
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub kind: FieldKind,
}

impl FieldDescriptor {
    const fn new(
        key: &'static str,
        label: &'static str,
        min: f64,
        max: f64,
        default: f64,
        kind: FieldKind,
    ) -> Self {
        Self {
            key,
            label,
            min,
            max,
            default,
            kind,
        }
    }

    /// Force `value` into `[min, max]`, rounding integer fields.
    ///
    /// NaN must be rejected by the caller; `f64::clamp` would pass it through.
    pub fn clamp(&self, value: f64) -> f64 {
        let clamped = value.clamp(self.min, self.max);
        match self.kind {
            FieldKind::Decimal => clamped,
            FieldKind::Integer => clamped.round(),
        }
    }

    /// Render a value the way the form shows it.
    pub fn display_value(&self, value: f64) -> String {
        match self.kind {
            FieldKind::Decimal => format!("{:.2}", value),
            FieldKind::Integer => format!("{:.0}", value),
        }
    }

    /// Render a bound at full precision, so `0.4999` is not shown as `0.50`.
    pub fn display_bound(&self, bound: f64) -> String {
        format!("{}", bound)
    }
}

/// Column naming convention of the deployed model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaKind {
    /// Raw census column names (`longitude`, `median_income`, ...).
    #[default]
    Census,
    /// scikit-learn `fetch_california_housing` names (`MedInc`, ...).
    Sklearn,
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaKind::Census => write!(f, "census"),
            SchemaKind::Sklearn => write!(f, "sklearn"),
        }
    }
}

const CENSUS_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("longitude", "Longitude", -124.35, -114.31, -120.0, FieldKind::Decimal),
    FieldDescriptor::new("latitude", "Latitude", 32.54, 42.01, 34.0, FieldKind::Decimal),
    FieldDescriptor::new("housing_median_age", "Housing Median Age", 1.0, 52.0, 20.0, FieldKind::Integer),
    FieldDescriptor::new("total_rooms", "Total Rooms", 2.0, 10000.0, 1000.0, FieldKind::Integer),
    FieldDescriptor::new("total_bedrooms", "Total Bedrooms", 1.0, 5000.0, 500.0, FieldKind::Integer),
    FieldDescriptor::new("population", "Population", 3.0, 10000.0, 1500.0, FieldKind::Integer),
    FieldDescriptor::new("households", "Households", 1.0, 5000.0, 500.0, FieldKind::Integer),
    FieldDescriptor::new("median_income", "Median Income (10k USD)", 0.0, 20.0, 5.0, FieldKind::Decimal),
];

const SKLEARN_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("MedInc", "Median Income (10k USD)", 0.4999, 15.0001, 3.87, FieldKind::Decimal),
    FieldDescriptor::new("HouseAge", "House Age", 1.0, 52.0, 29.0, FieldKind::Integer),
    FieldDescriptor::new("AveRooms", "Average Rooms", 0.8462, 141.9091, 5.43, FieldKind::Decimal),
    FieldDescriptor::new("AveBedrms", "Average Bedrooms", 0.3333, 34.0667, 1.10, FieldKind::Decimal),
    FieldDescriptor::new("Population", "Population", 3.0, 35682.0, 1425.0, FieldKind::Integer),
    FieldDescriptor::new("AveOccup", "Average Occupancy", 0.6923, 1243.3333, 3.07, FieldKind::Decimal),
    FieldDescriptor::new("Latitude", "Latitude", 32.54, 41.95, 35.63, FieldKind::Decimal),
    FieldDescriptor::new("Longitude", "Longitude", -124.35, -114.31, -119.57, FieldKind::Decimal),
];

/// A complete field table plus the default axes for the scatter panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Schema {
    pub kind: SchemaKind,
    fields: &'static [FieldDescriptor],
    scatter_axes: (&'static str, &'static str),
}

impl Schema {
    pub fn census() -> Self {
        Self {
            kind: SchemaKind::Census,
            fields: CENSUS_FIELDS,
            scatter_axes: ("median_income", "total_rooms"),
        }
    }

    pub fn sklearn() -> Self {
        Self {
            kind: SchemaKind::Sklearn,
            fields: SKLEARN_FIELDS,
            scatter_axes: ("MedInc", "AveRooms"),
        }
    }

    pub fn for_kind(kind: SchemaKind) -> Self {
        match kind {
            SchemaKind::Census => Self::census(),
            SchemaKind::Sklearn => Self::sklearn(),
        }
    }

    /// Fields in model order.
    pub fn fields(&self) -> &'static [FieldDescriptor] {
        self.fields
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Field names in model order.
    pub fn keys(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.key).collect()
    }

    /// Position of `key` in the table.
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.key == key)
    }

    pub fn field(&self, key: &str) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn scatter_axes(&self) -> (&'static str, &'static str) {
        self.scatter_axes
    }

    /// Render the descriptor table.
    pub fn describe(&self) -> String {
        let mut out = format!("Schema: {}\n", self.kind);
        out.push_str(&format!(
            "  {:<20} {:<26} {:>12} {:>12} {:>12}\n",
            "key", "label", "min", "max", "default"
        ));
        for field in self.fields {
            out.push_str(&format!(
                "  {:<20} {:<26} {:>12} {:>12} {:>12}\n",
                field.key,
                field.label,
                field.display_bound(field.min),
                field.display_bound(field.max),
                field.display_bound(field.default),
            ));
        }
        out
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::census()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_census_keys_in_training_order() {
        let schema = Schema::census();
        assert_eq!(
            schema.keys(),
            vec![
                "longitude",
                "latitude",
                "housing_median_age",
                "total_rooms",
                "total_bedrooms",
                "population",
                "households",
                "median_income",
            ]
        );
    }

    #[test]
    fn test_sklearn_keys() {
        let schema = Schema::sklearn();
        assert_eq!(schema.field_count(), 8);
        assert_eq!(schema.index_of("MedInc"), Some(0));
        assert_eq!(schema.index_of("Longitude"), Some(7));
        assert!(schema.field("median_income").is_none());
    }

    #[test]
    fn test_defaults_within_bounds() {
        for schema in [Schema::census(), Schema::sklearn()] {
            for field in schema.fields() {
                assert!(field.min <= field.default && field.default <= field.max, "{}", field.key);
                assert_eq!(field.clamp(field.default), field.default, "{}", field.key);
            }
        }
    }

    #[test]
    fn test_clamp_law() {
        let schema = Schema::census();
        for field in schema.fields() {
            for v in [field.min - 1000.0, field.max + 1000.0, f64::INFINITY, f64::NEG_INFINITY] {
                let effective = field.clamp(v);
                assert_eq!(effective, field.min.max(v.min(field.max)), "{}", field.key);
                assert_eq!(field.clamp(effective), effective, "{}", field.key);
            }
        }
    }

    #[test]
    fn test_integer_fields_round() {
        let field = Schema::census().field("total_rooms").copied().unwrap();
        assert_eq!(field.clamp(1234.6), 1235.0);
        assert_eq!(field.display_value(1235.0), "1235");
    }

    #[test]
    fn test_bounds_keep_full_precision() {
        let schema = Schema::sklearn();
        let med_inc = schema.field("MedInc").copied().unwrap();
        assert_eq!(med_inc.display_bound(med_inc.min), "0.4999");
        assert_eq!(med_inc.display_bound(med_inc.max), "15.0001");

        let described = schema.describe();
        assert!(described.contains("0.4999"));
        assert!(described.contains("1243.3333"));
        assert!(Schema::census().describe().contains("10000"));
    }

    #[test]
    fn test_schema_kind_serde() {
        let kind: SchemaKind = serde_json::from_str("\"sklearn\"").unwrap();
        assert_eq!(kind, SchemaKind::Sklearn);
        assert_eq!(Schema::for_kind(kind).kind, SchemaKind::Sklearn);
        assert_eq!(SchemaKind::Census.to_string(), "census");
    }
}
