//! Configuration for the welchfloor estimator.
//!
//! Everything has a built-in default; a TOML file can override any subset:
//!
//! ```toml
//! [estimator]
//! seg_length = 256
//! tail_fraction = 0.1
//! scale_factor = 1.0
//! transform = { kind = "sqrt-half" }
//!
//! [worker]
//! workers = 4
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    AMPLITUDE_TAIL_FRACTION, BAND_POWER_SAMPLE_RATE, BAND_POWER_SCALE, BAND_POWER_TAIL_FRACTION,
    DEFAULT_POLL_INTERVAL_MS, DEFAULT_QUEUE_CAPACITY, DEFAULT_SEG_LENGTH,
};
use crate::error::{ConfigurationError, EstimatorError, Result};

/// Final transform applied to the tail average before scaling
///
/// Both original estimator flavors share everything up to this step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum OutputTransform {
    /// `sqrt(x / 2)`: amplitude-domain noise floor
    SqrtHalf,
    /// `x * bandwidth`: power-domain band level
    Linear {
        /// One-sided bandwidth in Hz (half the sample rate)
        bandwidth: f64,
    },
}

impl OutputTransform {
    /// Map a tail-averaged power density to the estimate domain.
    pub fn apply(&self, tail_average: f64) -> f64 {
        match *self {
            OutputTransform::SqrtHalf => (tail_average / 2.0).sqrt(),
            OutputTransform::Linear { bandwidth } => tail_average * bandwidth,
        }
    }
}

/// Output transform selector for the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TransformKind {
    SqrtHalf,
    Linear,
}

/// Built-in estimator flavors
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Preset {
    /// Amplitude noise floor: 10% tail, `sqrt(x/2)`
    Amplitude,
    /// Calibrated band power: 20% tail, linear in bandwidth
    BandPower,
}

/// Parameters of the tail-averaging noise floor extractor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseFloorConfig {
    /// Fraction of the highest-frequency bins to average, in (0, 1]
    pub tail_fraction: f64,
    /// Linear scale applied after the transform
    pub scale_factor: f64,
    /// Final transform of the tail average
    pub transform: OutputTransform,
}

impl NoiseFloorConfig {
    /// Amplitude-domain noise floor with unit scale.
    pub fn amplitude() -> Self {
        Self {
            tail_fraction: AMPLITUDE_TAIL_FRACTION,
            scale_factor: 1.0,
            transform: OutputTransform::SqrtHalf,
        }
    }

    /// Power-domain band level, calibrated at 1970 Hz.
    ///
    /// The half-rate is taken with integer division (985 Hz), matching the
    /// calibration constant.
    pub fn band_power() -> Self {
        Self {
            tail_fraction: BAND_POWER_TAIL_FRACTION,
            scale_factor: BAND_POWER_SCALE,
            transform: OutputTransform::Linear {
                bandwidth: (BAND_POWER_SAMPLE_RATE / 2) as f64,
            },
        }
    }

    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Amplitude => Self::amplitude(),
            Preset::BandPower => Self::band_power(),
        }
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigurationError> {
        if !(self.tail_fraction > 0.0 && self.tail_fraction <= 1.0) {
            return Err(ConfigurationError::InvalidTailFraction(self.tail_fraction));
        }
        if !self.scale_factor.is_finite() || self.scale_factor < 0.0 {
            return Err(ConfigurationError::InvalidScaleFactor(self.scale_factor));
        }
        if let OutputTransform::Linear { bandwidth } = self.transform
            && !(bandwidth.is_finite() && bandwidth > 0.0)
        {
            return Err(ConfigurationError::InvalidBandwidth(bandwidth));
        }
        Ok(())
    }
}

impl Default for NoiseFloorConfig {
    fn default() -> Self {
        Self::amplitude()
    }
}

/// System-wide configuration
///
/// # Example
/// ```
/// use welchfloor::config::AppConfig;
///
/// let config = AppConfig::from_toml_str("[worker]\nworkers = 2\n").unwrap();
/// assert_eq!(config.worker.workers, 2);
/// assert_eq!(config.estimator.seg_length, 256);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Per-worker estimation pipeline
    pub estimator: EstimatorConfig,
    /// Pool and queue parameters
    pub worker: WorkerConfig,
}

/// Per-worker estimation pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Samples per segment (FFT length), at least 2
    pub seg_length: usize,
    /// Optional window weights; `None` selects Hamming
    pub window: Option<Vec<f64>>,
    /// Fraction of the spectrum tail used for the estimate
    pub tail_fraction: f64,
    /// Linear output scale
    pub scale_factor: f64,
    /// Output transform
    pub transform: OutputTransform,
}

/// Worker pool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Number of worker threads
    pub workers: usize,
    /// Bound on the batch queue and on the estimate queue
    pub queue_capacity: usize,
    /// Longest a blocked queue operation waits before re-checking shutdown
    pub poll_interval_ms: u64,
}

impl EstimatorConfig {
    pub fn noise_floor(&self) -> NoiseFloorConfig {
        NoiseFloorConfig {
            tail_fraction: self.tail_fraction,
            scale_factor: self.scale_factor,
            transform: self.transform,
        }
    }

    pub fn set_noise_floor(&mut self, noise: NoiseFloorConfig) {
        self.tail_fraction = noise.tail_fraction;
        self.scale_factor = noise.scale_factor;
        self.transform = noise.transform;
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigurationError> {
        if self.seg_length < 2 {
            return Err(ConfigurationError::InvalidSegmentLength(self.seg_length));
        }
        self.noise_floor().validate()
    }
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        let noise = NoiseFloorConfig::default();
        Self {
            seg_length: DEFAULT_SEG_LENGTH,
            window: None,
            tail_fraction: noise.tail_fraction,
            scale_factor: noise.scale_factor,
            transform: noise.transform,
        }
    }
}

impl WorkerConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigurationError> {
        if self.workers == 0 {
            return Err(ConfigurationError::NoWorkers);
        }
        if self.queue_capacity == 0 {
            return Err(ConfigurationError::ZeroQueueCapacity);
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigurationError::ZeroPollInterval);
        }
        Ok(())
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| ConfigurationError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigurationError> {
        self.estimator.validate()?;
        self.worker.validate()
    }
}

/// Read window weights from a text file, separated by whitespace or commas.
pub fn read_window_file<P: AsRef<Path>>(path: P) -> Result<Vec<f64>> {
    let text = std::fs::read_to_string(path.as_ref())?;
    text.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .map(|token| {
            token.parse::<f64>().map_err(|_| {
                EstimatorError::from(ConfigurationError::Parse(format!(
                    "invalid window weight: {}",
                    token
                )))
            })
        })
        .collect()
}
