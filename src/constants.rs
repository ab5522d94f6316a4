//! Numeric constants for the estimation pipeline
//!
//! Defaults for the window, the two estimator presets and the worker pool.

/// Hamming window constant term.
pub const HAMMING_ALPHA: f64 = 0.54;

/// Hamming window cosine coefficient.
pub const HAMMING_BETA: f64 = 0.46;

/// Fraction of the spectrum (highest bins) averaged by the amplitude preset.
pub const AMPLITUDE_TAIL_FRACTION: f64 = 0.1;

/// Fraction of the spectrum (highest bins) averaged by the band-power preset.
pub const BAND_POWER_TAIL_FRACTION: f64 = 0.2;

/// Calibration factor applied by the band-power preset.
pub const BAND_POWER_SCALE: f64 = 225.438;

/// Sample rate in Hz the band-power preset was calibrated at.
pub const BAND_POWER_SAMPLE_RATE: u32 = 1970;

/// Default analysis segment length in samples.
pub const DEFAULT_SEG_LENGTH: usize = 256;

/// Default bound on both the batch and the estimate queues.
pub const DEFAULT_QUEUE_CAPACITY: usize = 16;

/// Upper bound on how long a blocked queue operation waits before
/// re-checking the shutdown token.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;
