//! House Price Predictor Library
//!
//! A terminal form that collects bounded house features, feeds them to a
//! pre-trained regression model exported to ONNX, and renders the
//! estimated price.

pub mod cli;
pub mod config;
pub mod error;
pub mod form;
pub mod format;
pub mod metrics;
pub mod models;
pub mod panels;
pub mod repl;
pub mod schema;
pub mod types;

pub use config::{AppConfig, OutputScale};
pub use error::{FormError, PredictError};
pub use form::{Adapter, FormState};
pub use format::format_currency;
pub use models::{ModelGateway, Predictor};
pub use schema::{FieldDescriptor, Schema, SchemaKind};
pub use types::{FeatureRecord, PredictionOutcome};
