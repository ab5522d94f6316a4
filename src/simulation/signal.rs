use std::f64::consts::PI;

/// Generate `num_samples` of `amplitude * sin(2π f t + phase)`.
pub fn sine(
    num_samples: usize,
    sample_rate: f64,
    freq_hz: f64,
    amplitude: f64,
    phase: f64,
) -> Vec<f64> {
    (0..num_samples)
        .map(|i| {
            let t = i as f64 / sample_rate;
            amplitude * (2.0 * PI * freq_hz * t + phase).sin()
        })
        .collect()
}

/// Interleave equal-length channels into `[c0, c1, ..., c0, c1, ...]`.
///
/// Output length follows the shortest channel.
pub fn interleave(channels: &[Vec<f64>]) -> Vec<f64> {
    let frames = channels.iter().map(Vec::len).min().unwrap_or(0);
    let mut samples = Vec::with_capacity(frames * channels.len());

    for i in 0..frames {
        for channel in channels {
            samples.push(channel[i]);
        }
    }

    samples
}

pub fn to_f32(samples: &[f64]) -> Vec<f32> {
    samples.iter().map(|&s| s as f32).collect()
}
