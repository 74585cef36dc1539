//! Separable 2-D Inverse-DFT Operator — sparse matrix form
//!
//! Expresses the 2-D inverse discrete Fourier transform of an `ny x nx` grid
//! as an explicit linear operator on the flattened grid. Reconstruction and
//! inversion pipelines that model forward and inverse transforms as matrices
//! (sparsity-promoting interpolation, least-squares dip modeling) consume
//! this operator instead of calling a transform routine.
//!
//! The operator is the product of two per-axis factors, each scattering a
//! 1-D inverse-transform basis across the flattened grid:
//!
//! ```text
//! flattened grid ──► [ spatial-axis inverse ] ──► [ frequency-axis inverse ] ──► samples
//!                      block-diagonal rows          stride-nx scattered rows
//! ```
//!
//! Each basis is the forward FFT of an identity matrix, zero-padded to twice
//! the next power of two and conjugated; the padding damps the circular
//! wraparound when the operator is used for interpolation onto irregular
//! grids. Both factors and the product stay in compressed sparse column
//! form.
//!
//! ## Example
//!
//! ```rust
//! use seisfk_core::ifft2_operator::ifft2_operator;
//!
//! let op = ifft2_operator(4, 4).unwrap();
//! assert_eq!(op.rows(), 16);
//! assert_eq!(op.cols(), 16);
//! ```

use num_complex::Complex64;
use rustfft::FftPlanner;

use crate::sparse::CscMatrix;
use crate::types::{FkError, FkResult};

/// Build the sparse separable 2-D inverse-DFT operator for an `nx`-station,
/// `ny`-sample grid.
///
/// The result is square with dimension `nx * ny`; applying it to a grid
/// flattened sample-major (`grid[c * nx + d]` for sample `c`, station `d`)
/// performs the inverse transform along the station axis composed with the
/// inverse transform along the sample axis. Deterministic for a given
/// `(nx, ny)`.
pub fn ifft2_operator(nx: usize, ny: usize) -> FkResult<CscMatrix> {
    if nx == 0 || ny == 0 {
        return Err(FkError::InvalidShape(format!(
            "operator dimensions must be positive, got {nx}x{ny}"
        )));
    }
    let n = nx * ny;
    let pad_x = padded_length(nx);
    let pad_y = padded_length(ny);
    tracing::debug!(nx, ny, pad_x, pad_y, "building separable inverse-DFT operator");

    let basis_x = idft_basis(nx, pad_x);
    let basis_y = idft_basis(ny, pad_y);

    // Spatial-axis factor: row (i, j) carries basis row j across the
    // contiguous column block of sample i.
    let mut entries = Vec::with_capacity(n * nx);
    for i in 0..ny {
        for j in 0..nx {
            let row = i * nx + j;
            for d in 0..nx {
                entries.push((row, i * nx + d, basis_x[j][d]));
            }
        }
    }
    let factor_x = CscMatrix::from_coo(n, n, entries);

    // Sample-axis factor: row (i, j) scatters basis row i with stride nx,
    // offset by the station index j.
    let mut entries = Vec::with_capacity(n * ny);
    for i in 0..ny {
        for j in 0..nx {
            let row = i * nx + j;
            for c in 0..ny {
                entries.push((row, j + c * nx, basis_y[i][c]));
            }
        }
    }
    let factor_y = CscMatrix::from_coo(n, n, entries);

    Ok(factor_y.matmul(&factor_x))
}

/// Transform length used for the padded bases: one doubling beyond the next
/// power of two, so `4 -> 8`, `5 -> 16`, `1 -> 2`.
fn padded_length(n: usize) -> usize {
    let mut p = 1usize;
    while p < n {
        p *= 2;
    }
    p * 2
}

/// Inverse-transform basis realized as the conjugated forward FFT of the
/// `n x n` identity, each row zero-padded to `padded` before transforming.
fn idft_basis(n: usize, padded: usize) -> Vec<Vec<Complex64>> {
    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(padded);
    let mut rows = Vec::with_capacity(n);
    for j in 0..n {
        let mut buf = vec![Complex64::new(0.0, 0.0); padded];
        buf[j] = Complex64::new(1.0, 0.0);
        fft.process(&mut buf);
        for v in buf.iter_mut() {
            *v = v.conj();
        }
        rows.push(buf);
    }
    rows
}
