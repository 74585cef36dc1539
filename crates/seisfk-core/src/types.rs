//! Core types for f-k domain processing
//!
//! This module defines the fundamental types used throughout the library:
//! the complex-valued frequency-wavenumber grid produced by a 2-D transform
//! of an array recording, and the error taxonomy shared by all operations.
//!
//! ## The f-k grid
//!
//! An array of seismometers records the same wavefront at different times
//! depending on its apparent velocity across the array. A 2-D Fourier
//! transform of the record section maps each linear moveout to a straight
//! line through the origin of the frequency-wavenumber plane:
//!
//! ```text
//!  k (wavenumber, rows)
//!  ^        .·´   steep line  = slow arrival
//!  |     .·´
//!  |  .·´ _____   shallow line = fast arrival
//!  |.·´.--
//!  +------------------> f (frequency, columns)
//! ```
//!
//! Rows index apparent wavenumber (`num_wavenumbers`, Nk), columns index
//! temporal frequency (`num_frequencies`, Nf). All slope handling in this
//! crate is normalized by [`slope_norm`], which accounts for the periodicity
//! of the transform (only half the wavenumber range is independent).

use num_complex::Complex64;

/// Type alias for complex numbers using f64 precision.
pub type Complex = Complex64;

/// Result type for f-k operations.
pub type FkResult<T> = Result<T, FkError>;

/// Errors raised at the API boundary of f-k operations.
///
/// Validation happens before any computation starts; an empty peak set is a
/// valid outcome, never an error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FkError {
    /// Array is empty, non-rectangular, or dimensions do not line up.
    #[error("invalid array shape: {0}")]
    InvalidShape(String),

    /// Slope scan range or slope set cannot produce a usable axis.
    #[error("invalid slope range: {0}")]
    InvalidSlopeRange(String),

    /// Peak-picking policy keyword was not recognized.
    #[error("invalid peak-picking policy: {0:?}")]
    InvalidPolicy(String),
}

/// Slope normalization factor for a grid of `nk` wavenumber rows and `nf`
/// frequency columns.
///
/// A dimensionless slope `m` maps to the grid-cell slope `p = m * slope_norm`.
/// The factor 1/2 accounts for the periodicity of the f-k transform: only
/// half of the wavenumber range carries independent information.
///
/// This is the single source of truth for the normalization; the mask
/// builder and the slope scanner both go through it so that masks built from
/// scan results line up cell-for-cell.
pub fn slope_norm(nk: usize, nf: usize) -> f64 {
    0.5 * nk as f64 / nf as f64
}

/// A complex-valued f-k grid.
///
/// Data is indexed `data[k][f]` with `k` the wavenumber row and `f` the
/// frequency column. The grid is rectangular by construction; use
/// [`FkArray::from_rows`] to validate external data.
#[derive(Debug, Clone, PartialEq)]
pub struct FkArray {
    /// Number of wavenumber rows (Nk).
    pub num_wavenumbers: usize,
    /// Number of frequency columns (Nf).
    pub num_frequencies: usize,
    /// Grid values, indexed `data[k][f]`.
    pub data: Vec<Vec<Complex64>>,
}

impl FkArray {
    /// Create a zero-filled grid.
    pub fn zeros(nk: usize, nf: usize) -> FkResult<Self> {
        if nk == 0 || nf == 0 {
            return Err(FkError::InvalidShape(format!(
                "grid dimensions must be positive, got {nk}x{nf}"
            )));
        }
        Ok(Self {
            num_wavenumbers: nk,
            num_frequencies: nf,
            data: vec![vec![Complex64::new(0.0, 0.0); nf]; nk],
        })
    }

    /// Build a grid from row vectors, validating that it is rectangular and
    /// non-empty.
    pub fn from_rows(rows: Vec<Vec<Complex64>>) -> FkResult<Self> {
        if rows.is_empty() || rows[0].is_empty() {
            return Err(FkError::InvalidShape(
                "grid must have at least one row and one column".into(),
            ));
        }
        let nf = rows[0].len();
        if let Some(bad) = rows.iter().position(|r| r.len() != nf) {
            return Err(FkError::InvalidShape(format!(
                "row {bad} has {} columns, expected {nf}",
                rows[bad].len()
            )));
        }
        Ok(Self {
            num_wavenumbers: rows.len(),
            num_frequencies: nf,
            data: rows,
        })
    }

    /// Grid shape as `(num_wavenumbers, num_frequencies)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.num_wavenumbers, self.num_frequencies)
    }

    /// Copy of frequency column `f` (one value per wavenumber row).
    ///
    /// # Panics
    ///
    /// Panics if `f >= num_frequencies`.
    pub fn column(&self, f: usize) -> Vec<Complex64> {
        self.data.iter().map(|row| row[f]).collect()
    }

    /// Slope normalization factor for this grid's shape. See [`slope_norm`].
    pub fn slope_norm(&self) -> f64 {
        slope_norm(self.num_wavenumbers, self.num_frequencies)
    }
}
