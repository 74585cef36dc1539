//! Analytic-Signal Envelope — instantaneous amplitude of a real sequence
//!
//! Converts a real sequence to its analytic signal through a spectral
//! Hilbert transform and returns the magnitude. The envelope traces the
//! instantaneous amplitude of an oscillating sequence, which makes it a
//! robust smoother for peak-magnitude curves: ripples between peaks are
//! bridged while the peak heights are preserved.
//!
//! The analytic signal is formed in the frequency domain by keeping DC (and
//! the Nyquist bin for even lengths), doubling the positive frequencies and
//! zeroing the negative ones, then transforming back.
//!
//! ## Example
//!
//! ```rust
//! use seisfk_core::envelope::envelope;
//!
//! // A full-period cosine has a flat envelope of its amplitude.
//! let n = 64;
//! let x: Vec<f64> = (0..n)
//!     .map(|i| (2.0 * std::f64::consts::PI * 4.0 * i as f64 / n as f64).cos())
//!     .collect();
//! for e in envelope(&x) {
//!     assert!((e - 1.0).abs() < 1e-9);
//! }
//! ```

use num_complex::Complex64;
use rustfft::FftPlanner;

/// Analytic signal of a real sequence: `re` is the input, `im` its Hilbert
/// transform. Returns the input unchanged (as complex) for lengths 0 and 1,
/// where no quadrature component exists.
pub fn analytic_signal(data: &[f64]) -> Vec<Complex64> {
    let n = data.len();
    let mut buf: Vec<Complex64> = data.iter().map(|&x| Complex64::new(x, 0.0)).collect();
    if n < 2 {
        return buf;
    }

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(n);
    let ifft = planner.plan_fft_inverse(n);

    fft.process(&mut buf);

    let half = n / 2;
    if n % 2 == 0 {
        // keep DC and Nyquist, double strictly positive frequencies
        for v in buf[1..half].iter_mut() {
            *v *= 2.0;
        }
        for v in buf[half + 1..].iter_mut() {
            *v = Complex64::new(0.0, 0.0);
        }
    } else {
        for v in buf[1..=half].iter_mut() {
            *v *= 2.0;
        }
        for v in buf[half + 1..].iter_mut() {
            *v = Complex64::new(0.0, 0.0);
        }
    }

    ifft.process(&mut buf);
    let scale = 1.0 / n as f64;
    for v in buf.iter_mut() {
        *v *= scale;
    }
    buf
}

/// Envelope of a real sequence: magnitude of its analytic signal.
pub fn envelope(data: &[f64]) -> Vec<f64> {
    analytic_signal(data).iter().map(|c| c.norm()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_empty_and_single() {
        assert!(envelope(&[]).is_empty());
        let e = envelope(&[-3.0]);
        assert_eq!(e.len(), 1);
        assert_relative_eq!(e[0], 3.0, epsilon = 1e-15);
    }

    #[test]
    fn test_cosine_envelope_is_flat() {
        let n = 128;
        let x: Vec<f64> = (0..n)
            .map(|i| 2.5 * (2.0 * PI * 8.0 * i as f64 / n as f64).cos())
            .collect();
        for e in envelope(&x) {
            assert_relative_eq!(e, 2.5, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_sine_envelope_is_flat_odd_length() {
        let n = 125;
        let x: Vec<f64> = (0..n)
            .map(|i| (2.0 * PI * 5.0 * i as f64 / n as f64).sin())
            .collect();
        for e in envelope(&x) {
            assert_relative_eq!(e, 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_real_part_is_input() {
        let x = vec![0.3, -1.2, 4.0, 0.0, 2.2, -0.7];
        let a = analytic_signal(&x);
        for (xi, ai) in x.iter().zip(a.iter()) {
            assert_relative_eq!(*xi, ai.re, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_envelope_bounds_signal() {
        let x = vec![0.0, 1.0, 3.0, 7.0, 3.0, 1.0, 0.0];
        let e = envelope(&x);
        for (xi, ei) in x.iter().zip(e.iter()) {
            assert!(*ei >= xi.abs() - 1e-12);
        }
    }

    #[test]
    fn test_dc_sequence() {
        // the Hilbert transform of a constant is zero
        let e = envelope(&[2.0; 16]);
        for v in e {
            assert_relative_eq!(v, 2.0, epsilon = 1e-12);
        }
    }
}
