use std::f64::consts::PI;

use crate::constants::{HAMMING_ALPHA, HAMMING_BETA};
use crate::error::{ConfigurationError, Result};

/// Where a worker's window weights came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowSource {
    /// No window was supplied; Hamming was generated
    Hamming,
    /// The supplied window matched the segment length and is used as-is
    Supplied,
    /// The supplied window had the wrong length and was replaced by all ones
    RectangularFallback,
}

/// Tapering weights applied to every segment before the FFT
///
/// Fixed for the lifetime of an estimator. Construction guarantees the
/// length equals the segment length and the energy is non-zero, so
/// [`Window::scale`] is always finite.
#[derive(Debug, Clone)]
pub struct Window {
    weights: Vec<f64>,
    source: WindowSource,
}

impl Window {
    /// Resolve the window for `seg_length`-sample segments.
    ///
    /// A supplied window of the wrong length degrades to a rectangular
    /// window rather than failing; check [`Window::source`] to detect it.
    pub fn resolve(requested: Option<Vec<f64>>, seg_length: usize) -> Result<Self> {
        if seg_length < 2 {
            return Err(ConfigurationError::InvalidSegmentLength(seg_length).into());
        }

        let window = match requested {
            None => Self {
                weights: hamming(seg_length),
                source: WindowSource::Hamming,
            },
            Some(weights) if weights.len() == seg_length => Self {
                weights,
                source: WindowSource::Supplied,
            },
            Some(weights) => {
                log::warn!(
                    "Window has {} weights but segments have {} samples; using rectangular window",
                    weights.len(),
                    seg_length
                );
                Self::rectangular(seg_length)
            }
        };

        if let Some((index, &value)) = window
            .weights
            .iter()
            .enumerate()
            .find(|&(_, w)| !w.is_finite() || *w < 0.0)
        {
            return Err(ConfigurationError::InvalidWindow { index, value }.into());
        }

        if window.energy() <= 0.0 {
            return Err(ConfigurationError::ZeroEnergyWindow.into());
        }

        Ok(window)
    }

    fn rectangular(seg_length: usize) -> Self {
        Self {
            weights: vec![1.0; seg_length],
            source: WindowSource::RectangularFallback,
        }
    }

    /// Sum of squared weights.
    pub fn energy(&self) -> f64 {
        self.weights.iter().map(|w| w * w).sum()
    }

    /// Density normalization for the periodogram: `1 / Σ w²`.
    ///
    /// The sample rate is left out; it cancels once the noise floor is
    /// computed from the periodogram.
    pub fn scale(&self) -> f64 {
        1.0 / self.energy()
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn source(&self) -> WindowSource {
        self.source
    }
}

/// Symmetric Hamming window of length `n`.
///
/// Lengths below 2 have no taper and come back as all ones.
pub(crate) fn hamming(n: usize) -> Vec<f64> {
    if n < 2 {
        return vec![1.0; n];
    }
    let denom = (n - 1) as f64;
    (0..n)
        .map(|i| HAMMING_ALPHA - HAMMING_BETA * (2.0 * PI * i as f64 / denom).cos())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EstimatorError;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_default_is_hamming() {
        let window = Window::resolve(None, 8).unwrap();
        assert_eq!(window.source(), WindowSource::Hamming);
        assert_eq!(window.len(), 8);
        // Endpoints 0.08, symmetric
        assert_abs_diff_eq!(window.weights()[0], 0.08, epsilon = 1e-12);
        assert_abs_diff_eq!(window.weights()[7], 0.08, epsilon = 1e-12);
        for i in 0..4 {
            assert_abs_diff_eq!(window.weights()[i], window.weights()[7 - i], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_hamming_peak_for_odd_length() {
        let w = hamming(9);
        assert_abs_diff_eq!(w[4], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_hamming_degenerate_lengths() {
        assert!(hamming(0).is_empty());
        assert_eq!(hamming(1), vec![1.0]);
    }

    #[test]
    fn test_supplied_window_used_unchanged() {
        let weights = vec![0.5, 1.0, 1.0, 0.5];
        let window = Window::resolve(Some(weights.clone()), 4).unwrap();
        assert_eq!(window.source(), WindowSource::Supplied);
        assert_eq!(window.weights(), weights.as_slice());
    }

    #[test]
    fn test_wrong_length_falls_back_to_rectangular() {
        let window = Window::resolve(Some(vec![0.5; 3]), 6).unwrap();
        assert_eq!(window.source(), WindowSource::RectangularFallback);
        assert_eq!(window.weights(), &[1.0; 6]);
        assert_abs_diff_eq!(window.scale(), 1.0 / 6.0, epsilon = 1e-15);
    }

    #[test]
    fn test_scale_is_inverse_energy() {
        let window = Window::resolve(Some(vec![1.0, 2.0, 2.0]), 3).unwrap();
        assert_abs_diff_eq!(window.scale(), 1.0 / 9.0, epsilon = 1e-15);
    }

    #[test]
    fn test_rejects_short_segments() {
        for n in [0, 1] {
            assert!(matches!(
                Window::resolve(None, n),
                Err(EstimatorError::Config(
                    ConfigurationError::InvalidSegmentLength(_)
                ))
            ));
        }
    }

    #[test]
    fn test_rejects_zero_energy_window() {
        assert!(matches!(
            Window::resolve(Some(vec![0.0; 4]), 4),
            Err(EstimatorError::Config(ConfigurationError::ZeroEnergyWindow))
        ));
    }

    #[test]
    fn test_rejects_negative_weights() {
        assert!(matches!(
            Window::resolve(Some(vec![1.0, -0.5, 1.0]), 3),
            Err(EstimatorError::Config(ConfigurationError::InvalidWindow {
                index: 1,
                ..
            }))
        ));
    }
}
