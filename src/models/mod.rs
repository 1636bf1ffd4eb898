//! Model gateway: loading and running the pre-trained regressor

pub mod gateway;
pub mod inference;
pub mod loader;

pub use gateway::{ModelCache, ModelGateway};
pub use inference::{OnnxPredictor, Predictor};
pub use loader::ModelLoader;
