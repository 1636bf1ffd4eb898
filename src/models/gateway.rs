//! Process-wide, load-once handle to the deployed model.

use crate::config::{ModelConfig, OutputScale};
use crate::error::PredictError;
use crate::models::inference::{OnnxPredictor, Predictor};
use crate::models::loader::ModelLoader;
use crate::schema::Schema;
use crate::types::record::FeatureRecord;
use anyhow::Result;
use std::sync::OnceLock;
use tracing::{debug, info};

static GATEWAY: ModelCache<ModelGateway> = ModelCache::new();

/// A cell that runs its loader at most once.
///
/// The first successful `get_or_load` stores the value; every later call
/// returns it without running the loader. A failed load leaves the cell
/// empty.
pub struct ModelCache<T> {
    cell: OnceLock<T>,
}

impl<T> ModelCache<T> {
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    pub fn get_or_load<F>(&self, load: F) -> Result<&T>
    where
        F: FnOnce() -> Result<T>,
    {
        if let Some(value) = self.cell.get() {
            debug!("Reusing cached model");
            return Ok(value);
        }

        let value = load()?;
        Ok(self.cell.get_or_init(|| value))
    }
}

impl<T> Default for ModelCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// The cached predictor together with the conventions it was deployed with.
pub struct ModelGateway {
    predictor: Box<dyn Predictor + Send + Sync>,
    schema: Schema,
    output_scale: OutputScale,
    source: String,
}

impl ModelGateway {
    /// Process-wide gateway, opened from `config` on first call.
    ///
    /// Later calls ignore `config` and return the instance opened first.
    pub fn load(config: &ModelConfig) -> Result<&'static ModelGateway> {
        GATEWAY.get_or_load(|| Self::open(config))
    }

    /// Open the ONNX artifact named in `config`. Not cached.
    pub fn open(config: &ModelConfig) -> Result<Self> {
        let schema = Schema::for_kind(config.schema);
        let loader = ModelLoader::with_threads(config.intra_threads);
        let model = loader.load_model(&config.path)?;
        let predictor = OnnxPredictor::new(model, schema)?;

        info!(
            path = %config.path,
            schema = %schema.kind,
            output_scale = ?config.output_scale,
            "Model gateway ready"
        );

        Ok(Self::from_predictor(
            predictor,
            schema,
            config.output_scale,
            config.path.clone(),
        ))
    }

    /// Wrap an arbitrary predictor
    pub fn from_predictor<P>(
        predictor: P,
        schema: Schema,
        output_scale: OutputScale,
        source: impl Into<String>,
    ) -> Self
    where
        P: Predictor + Send + Sync + 'static,
    {
        Self {
            predictor: Box::new(predictor),
            schema,
            output_scale,
            source: source.into(),
        }
    }

    pub fn schema(&self) -> Schema {
        self.schema
    }

    pub fn output_scale(&self) -> OutputScale {
        self.output_scale
    }

    /// Where the model came from
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl Predictor for ModelGateway {
    fn predict(&self, record: &FeatureRecord) -> Result<f64, PredictError> {
        self.predictor.predict(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Constant(f64);

    impl Predictor for Constant {
        fn predict(&self, _record: &FeatureRecord) -> Result<f64, PredictError> {
            Ok(self.0)
        }
    }

    #[test]
    fn test_cache_loads_once() {
        let cache: ModelCache<u32> = ModelCache::new();
        let loads = Cell::new(0);

        let first = cache
            .get_or_load(|| {
                loads.set(loads.get() + 1);
                Ok(7)
            })
            .unwrap();
        let second = cache
            .get_or_load(|| {
                loads.set(loads.get() + 1);
                Ok(99)
            })
            .unwrap();

        assert_eq!(*first, 7);
        assert_eq!(*second, 7);
        assert_eq!(loads.get(), 1);
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_cache_failed_load_stays_empty() {
        let cache: ModelCache<u32> = ModelCache::new();

        assert!(cache.get_or_load(|| anyhow::bail!("corrupt artifact")).is_err());
        assert!(!cache.is_loaded());

        assert_eq!(*cache.get_or_load(|| Ok(3)).unwrap(), 3);
        assert!(cache.is_loaded());
    }

    #[test]
    fn test_gateway_delegates_to_predictor() {
        let gateway = ModelGateway::from_predictor(
            Constant(2.0),
            Schema::census(),
            OutputScale::HundredThousands,
            "stub",
        );

        assert_eq!(gateway.predict(&FeatureRecord::new()).unwrap(), 2.0);
        assert_eq!(gateway.schema().kind, crate::schema::SchemaKind::Census);
        assert_eq!(gateway.output_scale(), OutputScale::HundredThousands);
        assert_eq!(gateway.source(), "stub");
    }

    #[test]
    fn test_open_missing_artifact_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = ModelConfig {
            path: dir.path().join("absent.onnx").display().to_string(),
            schema: crate::schema::SchemaKind::Census,
            output_scale: OutputScale::HundredThousands,
            intra_threads: 1,
        };

        assert!(ModelGateway::open(&config).is_err());
    }
}
