use std::sync::Arc;

use num_complex::Complex;
use realfft::{RealFftPlanner, RealToComplex};

use super::unpack::{spectrum_length, unpack_power};
use super::window::Window;
use crate::error::{EstimatorError, Result};

/// Averaged one-sided periodogram over the segments of a batch
///
/// Each segment is demeaned, windowed, transformed with a forward real FFT
/// and unpacked into scaled power; the per-segment spectra are averaged
/// bin by bin. All buffers and the FFT plan are allocated once and reused,
/// so repeated calls do not allocate.
pub struct PeriodogramEstimator {
    seg_length: usize,
    window: Window,
    scale: f64,
    fft: Arc<dyn RealToComplex<f64>>,
    signal: Vec<f64>,
    spectrum: Vec<Complex<f64>>,
    scratch: Vec<Complex<f64>>,
    power: Vec<f64>,
    periodogram: Vec<f64>,
}

impl PeriodogramEstimator {
    /// Create an estimator for segments the length of `window`.
    pub fn new(window: Window) -> Self {
        let seg_length = window.len();
        let scale = window.scale();

        let mut planner = RealFftPlanner::<f64>::new();
        let fft = planner.plan_fft_forward(seg_length);
        let signal = fft.make_input_vec();
        let spectrum = fft.make_output_vec();
        let scratch = fft.make_scratch_vec();

        let bins = spectrum_length(seg_length);

        Self {
            seg_length,
            window,
            scale,
            fft,
            signal,
            spectrum,
            scratch,
            power: vec![0.0; bins],
            periodogram: vec![0.0; bins],
        }
    }

    /// Compute the averaged periodogram of `segments`.
    ///
    /// Every segment must hold exactly `seg_length` samples; the check is done
    /// before any work so a rejected batch leaves the previous result intact.
    pub fn estimate(&mut self, segments: &[Vec<f64>]) -> Result<&[f64]> {
        if segments.is_empty() {
            return Err(EstimatorError::EmptyBatch);
        }
        if let Some((index, segment)) = segments
            .iter()
            .enumerate()
            .find(|(_, s)| s.len() != self.seg_length)
        {
            return Err(EstimatorError::SegmentLengthMismatch {
                index,
                expected: self.seg_length,
                actual: segment.len(),
            });
        }

        self.periodogram.fill(0.0);
        let frames = segments.len() as f64;

        for segment in segments {
            self.prepare_signal(segment);

            self.fft
                .process_with_scratch(&mut self.signal, &mut self.spectrum, &mut self.scratch)
                .map_err(|e| EstimatorError::Fft(e.to_string()))?;

            unpack_power(&self.spectrum, self.seg_length, self.scale, &mut self.power);

            for (acc, &p) in self.periodogram.iter_mut().zip(self.power.iter()) {
                *acc += p / frames;
            }
        }

        Ok(&self.periodogram)
    }

    /// Demean `segment` and apply the window into the FFT input buffer.
    fn prepare_signal(&mut self, segment: &[f64]) {
        let mean = segment.iter().sum::<f64>() / self.seg_length as f64;

        for ((out, &x), &w) in self
            .signal
            .iter_mut()
            .zip(segment.iter())
            .zip(self.window.weights().iter())
        {
            *out = (x - mean) * w;
        }
    }

    /// Result of the last successful [`estimate`](Self::estimate).
    pub fn periodogram(&self) -> &[f64] {
        &self.periodogram
    }

    pub fn seg_length(&self) -> usize {
        self.seg_length
    }

    pub fn spectrum_length(&self) -> usize {
        self.periodogram.len()
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }
}
