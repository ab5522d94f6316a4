use crate::batch::{Batch, NoiseEstimate};
use crate::config::EstimatorConfig;
use crate::error::Result;
use crate::spectral::{NoiseFloorExtractor, PeriodogramEstimator, Window, WindowSource};

/// The per-worker estimation pipeline: periodogram then noise floor
///
/// Owns its window, FFT plan and periodogram buffer; nothing here is shared
/// between workers.
pub struct NoiseEstimator {
    periodogram: PeriodogramEstimator,
    extractor: NoiseFloorExtractor,
}

impl NoiseEstimator {
    pub fn new(config: &EstimatorConfig) -> Result<Self> {
        let window = Window::resolve(config.window.clone(), config.seg_length)?;
        let extractor = NoiseFloorExtractor::new(config.noise_floor())?;

        Ok(Self {
            periodogram: PeriodogramEstimator::new(window),
            extractor,
        })
    }

    pub fn process(&mut self, batch: &Batch) -> Result<NoiseEstimate> {
        let periodogram = self.periodogram.estimate(&batch.segments)?;
        let value = self.extractor.extract(periodogram);

        Ok(NoiseEstimate {
            sequence: batch.sequence,
            value,
        })
    }

    /// Periodogram of the last processed batch.
    pub fn periodogram(&self) -> &[f64] {
        self.periodogram.periodogram()
    }

    pub fn window_source(&self) -> WindowSource {
        self.periodogram.window().source()
    }

    pub fn seg_length(&self) -> usize {
        self.periodogram.seg_length()
    }
}
