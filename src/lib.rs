pub mod batch;
pub mod config;
pub mod constants;
pub mod error;
pub mod input;
pub mod output;
pub mod processing;
pub mod spectral;
pub mod wav;
pub mod worker;

#[cfg(feature = "simulation")]
pub mod simulation;

pub use batch::{Batch, NoiseEstimate};
pub use config::{AppConfig, EstimatorConfig, NoiseFloorConfig, OutputTransform};
pub use error::{ConfigurationError, EstimatorError, QueueError, Result};
pub use processing::NoiseEstimator;
pub use wav::save_wav;
