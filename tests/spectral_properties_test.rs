mod test_signals;

use approx::assert_relative_eq;
use welchfloor::config::NoiseFloorConfig;
use welchfloor::simulation::{NoiseConfig, add_white_noise, sine, white_noise};

use test_signals::{demeaned_power, hamming_config, rectangular_config, run_batch};

fn assert_energy_conserved(seg_length: usize, signal: Vec<f64>) {
    let expected = demeaned_power(&signal);
    let (periodogram, _) = run_batch(&rectangular_config(seg_length), vec![signal]);

    assert_eq!(periodogram.len(), seg_length / 2 + 1);
    // Rectangular scale is 1/N, so weighting the sum by it again gives the mean square
    let total = periodogram.iter().sum::<f64>() / seg_length as f64;
    assert_relative_eq!(total, expected, max_relative = 1e-9);
}

#[test]
fn test_energy_conservation_single_tone() {
    for seg_length in [8, 9, 64, 65, 256, 257] {
        // Non-integer cycle count spreads energy over many bins
        let signal = sine(seg_length, seg_length as f64, 3.3, 1.7, 0.4);
        assert_energy_conserved(seg_length, signal);
    }
}

#[test]
fn test_energy_conservation_even_and_odd_parity() {
    for seg_length in [8, 9] {
        let signal = sine(seg_length, seg_length as f64, 2.0, 1.0, 0.3);
        assert_energy_conserved(seg_length, signal);
    }
}

#[test]
fn test_energy_conservation_top_bin() {
    for seg_length in [8, 9, 16, 17] {
        let signal: Vec<f64> = (0..seg_length)
            .map(|i| if i % 2 == 0 { 1.0 } else { -1.0 })
            .collect();
        assert_energy_conserved(seg_length, signal);
    }
}

#[test]
fn test_energy_conservation_noise() {
    for seg_length in [128, 129] {
        let signal = white_noise(seg_length, &NoiseConfig::new(11, 0.3));
        assert_energy_conserved(seg_length, signal);
    }
}

#[test]
fn test_dc_removed_from_constant_signal() {
    for offset in [-3.0, 0.5, 1e4] {
        for seg_length in [8, 9, 64] {
            let config = hamming_config(seg_length, NoiseFloorConfig::amplitude());
            let (periodogram, estimate) = run_batch(&config, vec![vec![offset; seg_length]]);
            assert!(periodogram[0].abs() < 1e-18, "DC bin {}", periodogram[0]);
            assert!(estimate.abs() < 1e-9);
        }
    }
}

#[test]
fn test_dc_removed_from_offset_tone() {
    let seg_length = 64;
    let signal: Vec<f64> = sine(seg_length, seg_length as f64, 4.0, 1.0, 0.0)
        .into_iter()
        .map(|x| x + 2.5)
        .collect();
    let (periodogram, _) = run_batch(&rectangular_config(seg_length), vec![signal]);
    assert!(periodogram[0] < 1e-20, "DC bin {}", periodogram[0]);
    assert!(periodogram[4] > 1.0);
}

#[test]
fn test_averaging_identical_frames_is_idempotent() {
    let seg_length = 32;
    let config = hamming_config(seg_length, NoiseFloorConfig::amplitude());
    let mut segment = sine(seg_length, 100.0, 7.0, 0.8, 0.0);
    add_white_noise(&mut segment, &NoiseConfig::new(3, 0.05));

    let (single, single_est) = run_batch(&config, vec![segment.clone()]);
    let (averaged, averaged_est) = run_batch(&config, vec![segment; 4]);

    for (a, b) in single.iter().zip(averaged.iter()) {
        assert_relative_eq!(*a, *b, max_relative = 1e-12, epsilon = 1e-15);
    }
    assert_relative_eq!(single_est, averaged_est, max_relative = 1e-12);
}

#[test]
fn test_wrong_length_window_matches_rectangular() {
    let seg_length = 16;
    let signal = white_noise(seg_length, &NoiseConfig::new(5, 1.0));

    let mut fallback = rectangular_config(seg_length);
    fallback.window = Some(vec![0.3; seg_length + 3]);

    let (expected, _) = run_batch(&rectangular_config(seg_length), vec![signal.clone()]);
    let (actual, _) = run_batch(&fallback, vec![signal]);

    assert_eq!(expected, actual);
}

#[test]
fn test_tail_monotonic_in_noise_power() {
    let seg_length = 256;
    // Integer cycle count keeps the tone out of the tail
    let tone = sine(seg_length, seg_length as f64, 4.0, 1.0, 0.0);
    let noise = white_noise(seg_length, &NoiseConfig::new(9, 1.0));

    for noise_floor in [NoiseFloorConfig::amplitude(), NoiseFloorConfig::band_power()] {
        let config = hamming_config(seg_length, noise_floor);
        let mut previous = -1.0;

        for level in [0.0, 0.01, 0.05, 0.1, 0.5, 1.0] {
            let signal: Vec<f64> = tone
                .iter()
                .zip(noise.iter())
                .map(|(t, n)| t + level * n)
                .collect();
            let (_, estimate) = run_batch(&config, vec![signal]);
            assert!(
                estimate > previous,
                "estimate {} at noise level {} not above {}",
                estimate,
                level,
                previous
            );
            previous = estimate;
        }
    }
}

#[test]
fn test_all_zero_batch_scenario() {
    for scale_factor in [0.0, 1.0, 225.438, 1e9] {
        for noise_floor in [NoiseFloorConfig::amplitude(), NoiseFloorConfig::band_power()] {
            let noise_floor = NoiseFloorConfig {
                scale_factor,
                ..noise_floor
            };
            let config = hamming_config(8, noise_floor);
            let (periodogram, estimate) = run_batch(&config, vec![vec![0.0; 8]; 4]);

            assert!(periodogram.iter().all(|&p| p == 0.0));
            assert_eq!(estimate, 0.0);
        }
    }
}

#[test]
fn test_white_noise_amplitude_estimate_recovers_std_dev() {
    let seg_length = 256;
    let std_dev = 0.1;
    let config = hamming_config(seg_length, NoiseFloorConfig::amplitude());

    let estimates: Vec<f64> = (0..40)
        .map(|seed| {
            let segments = (0..2)
                .map(|ch| white_noise(seg_length, &NoiseConfig::new(seed * 2 + ch, std_dev)))
                .collect();
            run_batch(&config, segments).1
        })
        .collect();

    let mean = estimates.iter().sum::<f64>() / estimates.len() as f64;
    assert_relative_eq!(mean, std_dev, max_relative = 0.1);
}

#[test]
fn test_short_spectrum_uses_last_bin() {
    // 4 samples give 3 bins; 10% of 3 bins rounds down to none
    let mut config = rectangular_config(4);
    config.set_noise_floor(NoiseFloorConfig::amplitude());

    let (periodogram, estimate) = run_batch(&config, vec![vec![1.0, -1.0, 1.0, -1.0]]);

    assert_eq!(periodogram.len(), 3);
    assert!(periodogram[2] > 0.0);
    assert_relative_eq!(estimate, (periodogram[2] / 2.0).sqrt(), max_relative = 1e-12);
}
