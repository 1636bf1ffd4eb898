//! Configuration management for the house price predictor

use crate::schema::SchemaKind;
use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::Path;

/// Default location of the config file, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

/// Unit the model emits its prediction in
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputScale {
    /// Model predicts in multiples of $100,000 (census KNN pipeline)
    HundredThousands,
    /// Model predicts plain dollars
    Dollars,
}

impl OutputScale {
    /// Factor applied to the raw prediction
    pub fn factor(&self) -> f64 {
        match self {
            OutputScale::HundredThousands => 100_000.0,
            OutputScale::Dollars => 1.0,
        }
    }

    /// Convert a raw model output to dollars
    pub fn apply(&self, raw: f64) -> f64 {
        raw * self.factor()
    }
}

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub model: ModelConfig,
    #[serde(default)]
    pub panel: PanelConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Model artifact configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Path to the ONNX artifact
    #[serde(default = "default_model_path")]
    pub path: String,
    /// Column naming the artifact was trained with
    #[serde(default)]
    pub schema: SchemaKind,
    /// Unit of the model output. Required: every deployed model states its convention.
    pub output_scale: OutputScale,
    /// Number of threads for ONNX inference (default: 1)
    #[serde(default = "default_intra_threads")]
    pub intra_threads: usize,
}

fn default_model_path() -> String {
    "california_knn_pipeline.onnx".to_string()
}

fn default_intra_threads() -> usize {
    1
}

/// Illustrative panel configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Example root-mean-square error shown in the metrics panel
    pub rmse: f64,
    /// Example coefficient of determination shown in the metrics panel
    pub r2: f64,
    /// Rows in the synthetic sample behind the correlation and scatter panels
    pub sample_rows: usize,
    /// Seed for the synthetic sample
    pub seed: u64,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            rmse: 0.55,
            r2: 0.72,
            sample_rows: 25,
            seed: 42,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default file, falling back to built-in defaults
    pub fn load() -> Result<Self> {
        if Path::new(DEFAULT_CONFIG_PATH).exists() {
            Self::load_from_path(DEFAULT_CONFIG_PATH)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig {
                path: default_model_path(),
                schema: SchemaKind::Census,
                output_scale: OutputScale::HundredThousands,
                intra_threads: 1,
            },
            panel: PanelConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
