//! Slope Scan — dip-energy distribution across candidate slownesses
//!
//! Scans a range of candidate slopes against an f-k grid and stacks, per
//! slope, the energy that a linear trend of that slope would place on the
//! zero-wavenumber row. The resulting magnitude-versus-slope distribution
//! peaks at the dips actually present in the data; a two-stage,
//! envelope-refined peak extraction turns it into a short list of dominant
//! dip directions, ready to feed into a dip-selection mask.
//!
//! ## Processing chain
//!
//! ```text
//! f-k grid ──► per-slope column alignment ──► |row 0| stack ──► magnitude
//!              distribution ──► peak picking ──► envelope-thresholded
//!              re-pick over the picks ──► dominant dips
//! ```
//!
//! Each slope hypothesis works on its own copy of the grid columns, so scans
//! never mutate caller data and hypotheses are independent of one another.
//! With the `parallel` feature enabled, hypotheses fan out across a rayon
//! pool and the results are merged back in scan order before the
//! (inherently sequential) peak extraction.
//!
//! ## Example
//!
//! ```rust
//! use seisfk_core::slope_scan::{slope_distribution, SlopeScanSpec};
//! use seisfk_core::peak_picker::PeakPolicy;
//! use seisfk_core::types::FkArray;
//! use num_complex::Complex64;
//!
//! // a flat grid has a flat distribution and therefore no peaks
//! let mut fk = FkArray::zeros(8, 16).unwrap();
//! for row in fk.data.iter_mut() {
//!     for v in row.iter_mut() {
//!         *v = Complex64::new(1.0, 0.0);
//!     }
//! }
//! let spec = SlopeScanSpec::new(-2.0, 2.0, 0.5).unwrap();
//! let dist = slope_distribution(&fk, &spec, PeakPolicy::All, 0.0).unwrap();
//! assert_eq!(dist.magnitudes.len(), 9);
//! assert!(dist.peaks.is_empty());
//! ```

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::circular_shift::roll;
use crate::envelope::envelope;
use crate::peak_picker::{find_peaks, Peak, PeakPolicy};
use crate::types::{FkArray, FkError, FkResult};

/// An inclusive, evenly spaced slope scan range.
///
/// The axis runs from `pmin` to `pmax` with `floor(|pmax - pmin| / pdelta) + 1`
/// samples (both endpoints exact). Validation happens here so the scan
/// itself is total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlopeScanSpec {
    pmin: f64,
    pmax: f64,
    pdelta: f64,
}

impl SlopeScanSpec {
    /// Validate and build a scan range.
    ///
    /// Rejects non-finite bounds, `pdelta <= 0`, `pmax <= pmin`, and ranges
    /// whose axis would hold fewer than 3 samples, too few for interior
    /// peak comparison.
    pub fn new(pmin: f64, pmax: f64, pdelta: f64) -> FkResult<Self> {
        if !pmin.is_finite() || !pmax.is_finite() || !pdelta.is_finite() {
            return Err(FkError::InvalidSlopeRange(format!(
                "scan bounds must be finite, got [{pmin}, {pmax}] step {pdelta}"
            )));
        }
        if pdelta <= 0.0 {
            return Err(FkError::InvalidSlopeRange(format!(
                "pdelta must be positive, got {pdelta}"
            )));
        }
        if pmax <= pmin {
            return Err(FkError::InvalidSlopeRange(format!(
                "pmax ({pmax}) must exceed pmin ({pmin})"
            )));
        }
        let spec = Self { pmin, pmax, pdelta };
        let n = spec.num_samples();
        if n < 3 {
            return Err(FkError::InvalidSlopeRange(format!(
                "scan axis has {n} samples; at least 3 are needed for interior peak comparison"
            )));
        }
        Ok(spec)
    }

    /// Lower bound of the scan range.
    pub fn pmin(&self) -> f64 {
        self.pmin
    }

    /// Upper bound of the scan range.
    pub fn pmax(&self) -> f64 {
        self.pmax
    }

    /// Requested scan step.
    pub fn pdelta(&self) -> f64 {
        self.pdelta
    }

    /// Number of samples on the scan axis.
    pub fn num_samples(&self) -> usize {
        ((self.pmax - self.pmin).abs() / self.pdelta).floor() as usize + 1
    }

    /// The scan axis: `num_samples` slopes from `pmin` to `pmax` inclusive.
    pub fn axis(&self) -> Vec<f64> {
        let n = self.num_samples();
        let step = (self.pmax - self.pmin) / (n - 1) as f64;
        (0..n).map(|i| self.pmin + step * i as f64).collect()
    }
}

/// Result of a slope scan: the magnitude distribution over the scan axis and
/// the refined dominant-dip peaks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlopeDistribution {
    /// Scan axis (one slope per sample).
    pub slopes: Vec<f64>,
    /// Mean stacked amplitude per slope hypothesis.
    pub magnitudes: Vec<f64>,
    /// Refined peaks, in scan order. May be empty.
    pub peaks: Vec<Peak>,
}

/// Shift every frequency column of the grid so that a linear trend of the
/// given dimensionless slope lands on wavenumber row 0.
///
/// Column `f` is circularly shifted by `floor(f * m * slope_norm)` rows.
/// Returns a new grid; the input is untouched.
pub fn align_to_slope(fk: &FkArray, slope: f64) -> FkArray {
    let p = slope * fk.slope_norm();
    let (nk, nf) = fk.shape();
    let mut data = vec![vec![Complex64::new(0.0, 0.0); nf]; nk];
    for f in 0..nf {
        let shift = (p * f as f64).floor() as i64;
        let rolled = roll(&fk.column(f), shift);
        for k in 0..nk {
            data[k][f] = rolled[k];
        }
    }
    FkArray {
        num_wavenumbers: nk,
        num_frequencies: nf,
        data,
    }
}

/// Mean amplitude landing on wavenumber row 0 when the grid is aligned to
/// `slope`. This is one sample of the slope-magnitude distribution.
fn stacked_magnitude(fk: &FkArray, slope: f64) -> f64 {
    let aligned = align_to_slope(fk, slope);
    let row0 = &aligned.data[0];
    row0.iter().map(|c| c.norm()).sum::<f64>() / row0.len() as f64
}

/// Scan the grid across the slope range and extract the dominant dips.
///
/// Stage 1 stacks the mean zero-wavenumber amplitude per scan slope. Stage 2
/// picks the significant local maxima of that distribution under `policy`.
/// Stage 3 re-picks over the stage-2 picks with a numeric threshold of
/// `mean(envelope of pick magnitudes) - delta_threshold`, bridging ripples
/// between neighboring picks. Empty pick sets at either stage are valid
/// outcomes and short-circuit the remaining stages.
pub fn slope_distribution(
    fk: &FkArray,
    scan: &SlopeScanSpec,
    policy: PeakPolicy,
    delta_threshold: f64,
) -> FkResult<SlopeDistribution> {
    let slopes = scan.axis();
    tracing::debug!(
        nk = fk.num_wavenumbers,
        nf = fk.num_frequencies,
        samples = slopes.len(),
        "scanning slope distribution"
    );

    #[cfg(feature = "parallel")]
    let magnitudes: Vec<f64> = {
        use rayon::prelude::*;
        slopes.par_iter().map(|&m| stacked_magnitude(fk, m)).collect()
    };
    #[cfg(not(feature = "parallel"))]
    let magnitudes: Vec<f64> = slopes.iter().map(|&m| stacked_magnitude(fk, m)).collect();

    let first = find_peaks(&magnitudes, &slopes, policy)?;

    let peaks = if first.is_empty() {
        Vec::new()
    } else {
        let mags: Vec<f64> = first.iter().map(|p| p.magnitude).collect();
        let positions: Vec<f64> = first.iter().map(|p| p.position).collect();
        let env = envelope(&mags);
        let env_mean = env.iter().sum::<f64>() / env.len() as f64;
        find_peaks(
            &mags,
            &positions,
            PeakPolicy::Threshold(env_mean - delta_threshold),
        )?
    };

    Ok(SlopeDistribution {
        slopes,
        magnitudes,
        peaks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use num_complex::Complex64;

    /// Grid with a single exact linear trend of dimensionless slope `m0`:
    /// unit amplitude on the cell each column maps onto row 0 under
    /// alignment to `m0`, zero elsewhere.
    fn single_trend(nk: usize, nf: usize, m0: f64) -> FkArray {
        let mut fk = FkArray::zeros(nk, nf).unwrap();
        let p0 = m0 * fk.slope_norm();
        for f in 0..nf {
            let shift = (p0 * f as f64).floor() as i64;
            let k = (-shift).rem_euclid(nk as i64) as usize;
            fk.data[k][f] = Complex64::new(1.0, 0.0);
        }
        fk
    }

    #[test]
    fn test_spec_rejects_bad_ranges() {
        assert!(SlopeScanSpec::new(0.0, 1.0, 0.0).is_err());
        assert!(SlopeScanSpec::new(0.0, 1.0, -0.5).is_err());
        assert!(SlopeScanSpec::new(1.0, 1.0, 0.1).is_err());
        assert!(SlopeScanSpec::new(2.0, 1.0, 0.1).is_err());
        assert!(SlopeScanSpec::new(f64::NAN, 1.0, 0.1).is_err());
        // only two samples fit
        assert!(SlopeScanSpec::new(0.0, 1.0, 0.6).is_err());
    }

    #[test]
    fn test_axis_is_inclusive_and_even() {
        let spec = SlopeScanSpec::new(-3.0, 3.0, 0.25).unwrap();
        let axis = spec.axis();
        assert_eq!(axis.len(), 25);
        assert_relative_eq!(axis[0], -3.0, epsilon = 1e-12);
        assert_relative_eq!(axis[24], 3.0, epsilon = 1e-12);
        for w in axis.windows(2) {
            assert_relative_eq!(w[1] - w[0], 0.25, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_align_to_slope_flattens_trend() {
        let fk = single_trend(20, 40, 2.0);
        let aligned = align_to_slope(&fk, 2.0);
        for f in 0..40 {
            assert_eq!(aligned.data[0][f], Complex64::new(1.0, 0.0), "column {f}");
        }
    }

    #[test]
    fn test_align_to_slope_preserves_input() {
        let fk = single_trend(10, 12, 1.0);
        let copy = fk.clone();
        let _ = align_to_slope(&fk, -1.5);
        assert_eq!(fk, copy);
    }

    #[test]
    fn test_single_trend_recovers_slope() {
        let m0 = 2.0;
        let fk = single_trend(20, 40, m0);
        let spec = SlopeScanSpec::new(-3.0, 3.0, 0.25).unwrap();
        let dist = slope_distribution(&fk, &spec, PeakPolicy::All, 0.0).unwrap();

        let mut best = 0;
        for (i, &m) in dist.magnitudes.iter().enumerate() {
            if m > dist.magnitudes[best] {
                best = i;
            }
        }
        assert!(
            (dist.slopes[best] - m0).abs() <= 0.25 + 1e-12,
            "global maximum at {} is more than one step from {m0}",
            dist.slopes[best]
        );
        // the exact hypothesis stacks the full unit amplitude
        assert_relative_eq!(dist.magnitudes[best], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_peaks_are_drawn_from_the_distribution() {
        let fk = single_trend(20, 40, 2.0);
        let spec = SlopeScanSpec::new(-3.0, 3.0, 0.25).unwrap();
        let dist = slope_distribution(&fk, &spec, PeakPolicy::All, 0.0).unwrap();
        for p in &dist.peaks {
            let i = dist
                .slopes
                .iter()
                .position(|&s| (s - p.position).abs() < 1e-12)
                .expect("peak position lies on the scan axis");
            assert_relative_eq!(dist.magnitudes[i], p.magnitude, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_unreachable_threshold_yields_empty_peaks() {
        let fk = single_trend(16, 32, 1.0);
        let spec = SlopeScanSpec::new(-2.0, 2.0, 0.25).unwrap();
        let dist =
            slope_distribution(&fk, &spec, PeakPolicy::Threshold(1e6), 0.0).unwrap();
        assert_eq!(dist.magnitudes.len(), 17);
        assert!(dist.peaks.is_empty());
    }

    #[test]
    fn test_flat_grid_has_flat_distribution() {
        let mut fk = FkArray::zeros(8, 16).unwrap();
        for row in fk.data.iter_mut() {
            for v in row.iter_mut() {
                *v = Complex64::new(0.5, -0.5);
            }
        }
        let spec = SlopeScanSpec::new(-1.0, 1.0, 0.25).unwrap();
        let dist = slope_distribution(&fk, &spec, PeakPolicy::All, 0.0).unwrap();
        let want = Complex64::new(0.5, -0.5).norm();
        for &m in &dist.magnitudes {
            assert_relative_eq!(m, want, epsilon = 1e-12);
        }
        assert!(dist.peaks.is_empty());
    }

    #[test]
    fn test_delta_threshold_loosens_refinement() {
        // an extreme delta_threshold drives the stage-3 threshold far below
        // every pick, so refinement reduces to plain interior comparison
        let fk = single_trend(20, 40, 2.0);
        let spec = SlopeScanSpec::new(-3.0, 3.0, 0.25).unwrap();
        let tight = slope_distribution(&fk, &spec, PeakPolicy::All, 0.0).unwrap();
        let loose = slope_distribution(&fk, &spec, PeakPolicy::All, 1e9).unwrap();
        assert!(loose.peaks.len() >= tight.peaks.len());
    }
}
