pub mod config;
pub mod data;

pub use config::{ClusterConfig, OcrBackend, PipelineConfig};
pub use data::*;
