//! Dip Mask — binary dip-selection masks in the f-k plane
//!
//! Builds a `{0, 1}` mask over an f-k grid that selects the linear trends
//! corresponding to a set of target slopes. Each slope contributes one
//! wrapped diagonal line of marked cells; a zero slope additionally marks
//! the horizontal trend rows at the top and bottom of the wavenumber axis.
//! The union of the lines is thickened along the wavenumber axis with a
//! boxcar kernel whose length equals the number of slopes, so small errors
//! in the picked dips still fall inside the mask.
//!
//! Multiplying the mask elementwise against the f-k grid isolates the
//! selected dips; multiplying with its complement removes them.
//!
//! ```text
//!  k ┌─────────────────┐     slope m ──► one marked cell per
//!    │ 1 . . . . . . 1 │                 frequency column, wrapping
//!    │ . 1 1 . . . 1 . │                 periodically in k
//!    │ . . . 1 1 . . . │
//!    └─────────────────┘ f
//! ```
//!
//! ## Example
//!
//! ```rust
//! use seisfk_core::dip_mask::make_mask;
//!
//! // zero dip on a 5-row grid marks rows 0, 1 and 4
//! let mask = make_mask(5, 8, &[0.0]).unwrap();
//! for f in 0..8 {
//!     assert_eq!(mask.data[0][f], 1.0);
//!     assert_eq!(mask.data[1][f], 1.0);
//!     assert_eq!(mask.data[4][f], 1.0);
//!     assert_eq!(mask.data[2][f], 0.0);
//!     assert_eq!(mask.data[3][f], 0.0);
//! }
//! ```

use crate::types::{slope_norm, FkArray, FkError, FkResult};

/// A binary dip-selection mask over an f-k grid.
///
/// Every cell is exactly `0.0` or `1.0`; `data` is indexed `data[k][f]` like
/// the grid it masks.
#[derive(Debug, Clone, PartialEq)]
pub struct DipMask {
    /// Number of wavenumber rows (Nk).
    pub num_wavenumbers: usize,
    /// Number of frequency columns (Nf).
    pub num_frequencies: usize,
    /// Mask values, indexed `data[k][f]`, each 0 or 1.
    pub data: Vec<Vec<f64>>,
}

impl DipMask {
    /// Multiply the mask elementwise against an f-k grid, returning the
    /// muted copy.
    pub fn apply(&self, fk: &FkArray) -> FkResult<FkArray> {
        if fk.shape() != (self.num_wavenumbers, self.num_frequencies) {
            return Err(FkError::InvalidShape(format!(
                "mask shape {}x{} does not match grid shape {}x{}",
                self.num_wavenumbers,
                self.num_frequencies,
                fk.num_wavenumbers,
                fk.num_frequencies
            )));
        }
        let data = fk
            .data
            .iter()
            .zip(self.data.iter())
            .map(|(grid_row, mask_row)| {
                grid_row
                    .iter()
                    .zip(mask_row.iter())
                    .map(|(&v, &m)| v * m)
                    .collect()
            })
            .collect();
        Ok(FkArray {
            num_wavenumbers: self.num_wavenumbers,
            num_frequencies: self.num_frequencies,
            data,
        })
    }
}

/// Build the dip-selection mask for a `nk x nf` grid and a set of target
/// slopes.
///
/// Slopes are dimensionless; each is normalized by [`slope_norm`] before
/// cells are placed, so masks line up with slope-scan results on the same
/// grid shape. The slope set also fixes the widening kernel length, which is
/// why it must be non-empty; beyond that, the output is invariant under
/// reordering of the set.
pub fn make_mask(nk: usize, nf: usize, slopes: &[f64]) -> FkResult<DipMask> {
    if nk < 2 || nf == 0 {
        return Err(FkError::InvalidShape(format!(
            "mask grid must have at least 2 wavenumber rows and 1 frequency column, got {nk}x{nf}"
        )));
    }
    if slopes.is_empty() {
        return Err(FkError::InvalidSlopeRange(
            "slope set is empty; widening kernel would have zero length".into(),
        ));
    }
    tracing::debug!(nk, nf, num_slopes = slopes.len(), "building dip mask");

    let pnorm = slope_norm(nk, nf);

    // union of per-slope contributions; each contribution is a fresh array,
    // so no state leaks between slope hypotheses
    let mut raw = vec![vec![0.0f64; nf]; nk];
    for &m in slopes {
        let line = dip_line(nk, nf, m * pnorm);
        for (raw_row, line_row) in raw.iter_mut().zip(line.iter()) {
            for (r, l) in raw_row.iter_mut().zip(line_row.iter()) {
                if *l > *r {
                    *r = *l;
                }
            }
        }
    }

    // widen each frequency column along the wavenumber axis, then binarize
    let width = slopes.len();
    let mut data = vec![vec![0.0f64; nf]; nk];
    for f in 0..nf {
        let column: Vec<f64> = (0..nk).map(|k| raw[k][f]).collect();
        let widened = boxcar_same(&column, width);
        for k in 0..nk {
            data[k][f] = if widened[k] != 0.0 { 1.0 } else { 0.0 };
        }
    }

    Ok(DipMask {
        num_wavenumbers: nk,
        num_frequencies: nf,
        data,
    })
}

/// Raw mask contribution of a single normalized slope `p`: for every
/// frequency column `f` the cell at wavenumber `(-floor(f * p)) mod nk`,
/// the trace of the anchor row under a shift of `floor(f * p)` and back.
/// A zero slope additionally marks rows 0, 1 and `nk - 1`, the horizontal
/// trend and its periodic image.
fn dip_line(nk: usize, nf: usize, p: f64) -> Vec<Vec<f64>> {
    let mut line = vec![vec![0.0f64; nf]; nk];
    if p == 0.0 {
        for f in 0..nf {
            line[0][f] = 1.0;
            line[1][f] = 1.0;
            line[nk - 1][f] = 1.0;
        }
    }
    for f in 0..nf {
        let shift = (p * f as f64).floor() as i64;
        let k = (-shift).rem_euclid(nk as i64) as usize;
        line[k][f] = 1.0;
    }
    line
}

/// Convolve `column` with a boxcar of `width` ones, keeping the central
/// `column.len()` samples of the full convolution (offset `(width - 1) / 2`).
/// Non-circular: the kernel does not wrap past the column ends.
fn boxcar_same(column: &[f64], width: usize) -> Vec<f64> {
    let n = column.len();
    let offset = (width - 1) / 2;
    let mut out = vec![0.0f64; n];
    for (i, o) in out.iter_mut().enumerate() {
        let t = i + offset;
        let lo = t.saturating_sub(width - 1);
        let hi = t.min(n - 1);
        let mut acc = 0.0;
        for v in &column[lo..=hi] {
            acc += v;
        }
        *o = acc;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FkArray;
    use num_complex::Complex64;

    #[test]
    fn test_zero_slope_mask_rows() {
        let mask = make_mask(5, 12, &[0.0]).unwrap();
        for f in 0..12 {
            for k in 0..5 {
                let want = if k == 0 || k == 1 || k == 4 { 1.0 } else { 0.0 };
                assert_eq!(mask.data[k][f], want, "cell ({k},{f})");
            }
        }
    }

    #[test]
    fn test_mask_is_binary() {
        let mask = make_mask(16, 32, &[1.5, -0.75, 0.0]).unwrap();
        for row in &mask.data {
            for &v in row {
                assert!(v == 0.0 || v == 1.0, "non-binary cell {v}");
            }
        }
    }

    #[test]
    fn test_single_slope_marks_one_cell_per_column() {
        let nk = 12;
        let nf = 24;
        let m = 1.5;
        let mask = make_mask(nk, nf, &[m]).unwrap();
        let p = m * slope_norm(nk, nf);
        for f in 0..nf {
            let shift = (p * f as f64).floor() as i64;
            let want_k = (-shift).rem_euclid(nk as i64) as usize;
            let ones: Vec<usize> = (0..nk).filter(|&k| mask.data[k][f] == 1.0).collect();
            assert_eq!(ones, vec![want_k], "column {f}");
        }
    }

    #[test]
    fn test_slope_order_invariance() {
        let a = make_mask(10, 20, &[1.0, -2.0, 0.5]).unwrap();
        let b = make_mask(10, 20, &[0.5, 1.0, -2.0]).unwrap();
        let c = make_mask(10, 20, &[-2.0, 0.5, 1.0]).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn test_widening_with_repeated_zero_slope() {
        // two slopes -> boxcar of length 2 smears each marked cell one row
        // down: rows {0, 1, 4} widen to {0, 1, 2, 4} on a 5-row grid
        let mask = make_mask(5, 6, &[0.0, 0.0]).unwrap();
        for f in 0..6 {
            for k in 0..5 {
                let want = if k == 3 { 0.0 } else { 1.0 };
                assert_eq!(mask.data[k][f], want, "cell ({k},{f})");
            }
        }
    }

    #[test]
    fn test_empty_slope_set_rejected() {
        match make_mask(8, 8, &[]) {
            Err(FkError::InvalidSlopeRange(_)) => {}
            other => panic!("expected InvalidSlopeRange, got {other:?}"),
        }
    }

    #[test]
    fn test_degenerate_shape_rejected() {
        assert!(make_mask(1, 8, &[0.0]).is_err());
        assert!(make_mask(8, 0, &[0.0]).is_err());
    }

    #[test]
    fn test_apply_mutes_unselected_cells() {
        let nk = 5;
        let nf = 4;
        let mut fk = FkArray::zeros(nk, nf).unwrap();
        for k in 0..nk {
            for f in 0..nf {
                fk.data[k][f] = Complex64::new(1.0 + k as f64, f as f64);
            }
        }
        let mask = make_mask(nk, nf, &[0.0]).unwrap();
        let muted = mask.apply(&fk).unwrap();
        for k in 0..nk {
            for f in 0..nf {
                let want = if k == 0 || k == 1 || k == 4 {
                    fk.data[k][f]
                } else {
                    Complex64::new(0.0, 0.0)
                };
                assert_eq!(muted.data[k][f], want, "cell ({k},{f})");
            }
        }
    }

    #[test]
    fn test_apply_shape_mismatch_rejected() {
        let fk = FkArray::zeros(6, 4).unwrap();
        let mask = make_mask(5, 4, &[0.0]).unwrap();
        match mask.apply(&fk) {
            Err(FkError::InvalidShape(_)) => {}
            other => panic!("expected InvalidShape, got {other:?}"),
        }
    }

    #[test]
    fn test_rebinarization_is_idempotent() {
        let mask = make_mask(9, 18, &[2.0, -1.0]).unwrap();
        let rebinarized: Vec<Vec<f64>> = mask
            .data
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&v| if v != 0.0 { 1.0 } else { 0.0 })
                    .collect()
            })
            .collect();
        assert_eq!(mask.data, rebinarized);
    }
}
