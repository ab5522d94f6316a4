use thiserror::Error;

/// Invalid estimator or worker parameters, detected before any worker runs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("Segment length must be at least 2, got {0}")]
    InvalidSegmentLength(usize),

    #[error("Window has zero energy; periodogram scale is undefined")]
    ZeroEnergyWindow,

    #[error("Window weights must be finite and non-negative (index {index}: {value})")]
    InvalidWindow { index: usize, value: f64 },

    #[error("Tail fraction must be in (0, 1], got {0}")]
    InvalidTailFraction(f64),

    #[error("Scale factor must be finite and non-negative, got {0}")]
    InvalidScaleFactor(f64),

    #[error("Bandwidth must be finite and positive, got {0}")]
    InvalidBandwidth(f64),

    #[error("Worker count must be at least 1")]
    NoWorkers,

    #[error("Queue capacity must be at least 1")]
    ZeroQueueCapacity,

    #[error("Queue poll interval must be at least 1 ms")]
    ZeroPollInterval,

    #[error("Channel count must be at least 1")]
    NoChannels,

    #[error("Invalid configuration file: {0}")]
    Parse(String),
}

#[derive(Error, Debug)]
pub enum EstimatorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigurationError),

    #[error("Segment {index} has {actual} samples, expected {expected}")]
    SegmentLengthMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Batch contains no segments")]
    EmptyBatch,

    #[error("FFT failed: {0}")]
    Fft(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
}

/// Why a queue operation returned without completing.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    #[error("Queue operation cancelled by shutdown")]
    Cancelled,

    #[error("Queue disconnected")]
    Disconnected,
}

pub type Result<T> = std::result::Result<T, EstimatorError>;
