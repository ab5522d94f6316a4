use num_complex::Complex;

/// Number of one-sided bins for a real signal of `seg_length` samples.
pub fn spectrum_length(seg_length: usize) -> usize {
    seg_length / 2 + 1
}

/// Convert the half-spectrum of a real FFT into scaled one-sided power
///
/// `spectrum` holds bins `0..=seg_length/2` of the forward transform of a
/// length-`seg_length` real signal; `power` receives the same number of bins.
///
/// Energy from the mirrored negative frequencies is folded in by doubling
/// every bin that has a mirror:
/// - DC never has one.
/// - For even lengths the top bin is Nyquist, real-only and unmirrored.
/// - For odd lengths the top bin is an ordinary positive frequency with an
///   imaginary part, and is doubled like the interior.
///
/// Every bin is then multiplied by `scale`.
pub fn unpack_power(spectrum: &[Complex<f64>], seg_length: usize, scale: f64, power: &mut [f64]) {
    let len = spectrum_length(seg_length);
    debug_assert_eq!(spectrum.len(), len);
    debug_assert_eq!(power.len(), len);

    let top = len - 1;
    let even = seg_length % 2 == 0;

    for (i, (bin, out)) in spectrum.iter().zip(power.iter_mut()).enumerate() {
        let p = if i == 0 || (i == top && even) {
            bin.re * bin.re
        } else {
            2.0 * bin.norm_sqr()
        };
        *out = p * scale;
    }
}
