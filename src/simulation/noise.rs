use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

/// Additive white Gaussian noise parameters
#[derive(Clone, Debug)]
pub struct NoiseConfig {
    pub seed: u64,
    /// Standard deviation of the noise
    pub std_dev: f64,
}

impl NoiseConfig {
    pub fn new(seed: u64, std_dev: f64) -> Self {
        Self { seed, std_dev }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Zero-mean Gaussian noise, reproducible from the seed.
pub fn white_noise(num_samples: usize, config: &NoiseConfig) -> Vec<f64> {
    let Ok(normal) = Normal::new(0.0, config.std_dev) else {
        return vec![0.0; num_samples];
    };
    if config.std_dev == 0.0 {
        return vec![0.0; num_samples];
    }

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

    (0..num_samples).map(|_| normal.sample(&mut rng)).collect()
}

pub fn add_white_noise(signal: &mut [f64], config: &NoiseConfig) {
    let noise = white_noise(signal.len(), config);
    for (sample, n) in signal.iter_mut().zip(noise) {
        *sample += n;
    }
}

pub fn signal_power(signal: &[f64]) -> f64 {
    if signal.is_empty() {
        return 0.0;
    }
    signal.iter().map(|&x| x * x).sum::<f64>() / signal.len() as f64
}
