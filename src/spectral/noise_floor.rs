use crate::config::NoiseFloorConfig;
use crate::error::Result;

/// Reduces an averaged periodogram to a single noise estimate
///
/// The highest-frequency `tail_fraction` of the bins is assumed to hold
/// only noise. Their mean goes through the configured
/// [`OutputTransform`](crate::config::OutputTransform)
/// and is multiplied by `scale_factor`.
#[derive(Debug, Clone, Copy)]
pub struct NoiseFloorExtractor {
    config: NoiseFloorConfig,
}

impl NoiseFloorExtractor {
    pub fn new(config: NoiseFloorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Number of tail bins averaged for a spectrum of `spectrum_length` bins.
    ///
    /// Zero means the spectrum is too short for the fraction and only the
    /// last bin is used.
    pub fn tail_length(&self, spectrum_length: usize) -> usize {
        (spectrum_length as f64 * self.config.tail_fraction) as usize
    }

    /// Mean of the periodogram tail, before transform and scaling.
    pub fn tail_average(&self, periodogram: &[f64]) -> f64 {
        let Some(&last) = periodogram.last() else {
            return 0.0;
        };

        let tail_length = self.tail_length(periodogram.len());
        if tail_length == 0 {
            return last;
        }

        let tail = &periodogram[periodogram.len() - tail_length..];
        tail.iter().sum::<f64>() / tail_length as f64
    }

    pub fn extract(&self, periodogram: &[f64]) -> f64 {
        let tail_average = self.tail_average(periodogram);
        self.config.scale_factor * self.config.transform.apply(tail_average)
    }

    pub fn config(&self) -> &NoiseFloorConfig {
        &self.config
    }
}
