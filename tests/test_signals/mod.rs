#![allow(dead_code)]

use welchfloor::config::{EstimatorConfig, NoiseFloorConfig};
use welchfloor::{Batch, NoiseEstimator};

pub fn rectangular_config(seg_length: usize) -> EstimatorConfig {
    EstimatorConfig {
        seg_length,
        window: Some(vec![1.0; seg_length]),
        ..EstimatorConfig::default()
    }
}

pub fn hamming_config(seg_length: usize, noise: NoiseFloorConfig) -> EstimatorConfig {
    let mut config = EstimatorConfig {
        seg_length,
        window: None,
        ..EstimatorConfig::default()
    };
    config.set_noise_floor(noise);
    config
}

/// Run one batch through a fresh estimator, returning (periodogram, estimate).
pub fn run_batch(config: &EstimatorConfig, segments: Vec<Vec<f64>>) -> (Vec<f64>, f64) {
    let mut estimator = NoiseEstimator::new(config).unwrap();
    let estimate = estimator.process(&Batch::new(0, segments)).unwrap();
    (estimator.periodogram().to_vec(), estimate.value)
}

/// Mean square of the signal after removing its mean.
pub fn demeaned_power(signal: &[f64]) -> f64 {
    let mean = signal.iter().sum::<f64>() / signal.len() as f64;
    signal.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / signal.len() as f64
}
