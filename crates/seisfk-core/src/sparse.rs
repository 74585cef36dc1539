//! Sparse Complex Matrix — compressed sparse column storage
//!
//! CSC (Compressed Sparse Column) format for complex matrices. The format
//! stores, per column, the row indices and values of its non-zero entries:
//!
//! - `col_ptr`: column pointers where `col_ptr[c]` is the start index in
//!   `row_indices`/`values` for column `c` (`col_ptr` has length `cols + 1`)
//! - `row_indices`: row index of each non-zero, ascending within a column
//! - `values`: value of each non-zero
//!
//! Column-major storage makes matrix products cheap to form column by
//! column, which is how the separable inverse-transform operator is
//! assembled from its two per-axis factors.
//!
//! ## Example
//!
//! ```rust
//! use num_complex::Complex64;
//! use seisfk_core::sparse::CscMatrix;
//!
//! // [ 1  0 ]
//! // [ 2i 3 ]
//! let m = CscMatrix::from_coo(2, 2, vec![
//!     (0, 0, Complex64::new(1.0, 0.0)),
//!     (1, 0, Complex64::new(0.0, 2.0)),
//!     (1, 1, Complex64::new(3.0, 0.0)),
//! ]);
//! assert_eq!(m.nnz(), 3);
//! let y = m.matvec(&[Complex64::new(1.0, 0.0), Complex64::new(1.0, 0.0)]);
//! assert_eq!(y[1], Complex64::new(3.0, 2.0));
//! ```

use num_complex::Complex64;

/// A complex matrix in compressed sparse column form.
#[derive(Debug, Clone, PartialEq)]
pub struct CscMatrix {
    rows: usize,
    cols: usize,
    col_ptr: Vec<usize>,
    row_indices: Vec<usize>,
    values: Vec<Complex64>,
}

impl CscMatrix {
    /// Build a CSC matrix from coordinate-format `(row, col, value)` entries.
    ///
    /// Entries may arrive in any order; duplicates at the same coordinate are
    /// summed.
    ///
    /// # Panics
    ///
    /// Panics if any entry lies outside the `rows x cols` bounds.
    pub fn from_coo<I>(rows: usize, cols: usize, entries: I) -> Self
    where
        I: IntoIterator<Item = (usize, usize, Complex64)>,
    {
        let mut sorted: Vec<_> = entries.into_iter().collect();
        for &(r, c, _) in &sorted {
            assert!(r < rows, "row index {r} out of bounds (rows={rows})");
            assert!(c < cols, "column index {c} out of bounds (cols={cols})");
        }
        sorted.sort_by_key(|&(r, c, _)| (c, r));

        // col_ptr[c + 1] first counts column c, then a prefix sum turns the
        // counts into absolute offsets
        let mut col_ptr = vec![0usize; cols + 1];
        let mut row_indices = Vec::with_capacity(sorted.len());
        let mut values: Vec<Complex64> = Vec::with_capacity(sorted.len());

        let mut last: Option<(usize, usize)> = None;
        for (r, c, v) in sorted {
            if last == Some((c, r)) {
                // duplicates are adjacent after sorting; fold them together
                *values.last_mut().expect("duplicate follows a stored entry") += v;
            } else {
                row_indices.push(r);
                values.push(v);
                col_ptr[c + 1] += 1;
                last = Some((c, r));
            }
        }
        for c in 1..=cols {
            col_ptr[c] += col_ptr[c - 1];
        }
        Self {
            rows,
            cols,
            col_ptr,
            row_indices,
            values,
        }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Value at `(row, col)`, zero if not stored.
    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        let lo = self.col_ptr[col];
        let hi = self.col_ptr[col + 1];
        match self.row_indices[lo..hi].binary_search(&row) {
            Ok(i) => self.values[lo + i],
            Err(_) => Complex64::new(0.0, 0.0),
        }
    }

    /// Matrix-vector product `y = A x`.
    ///
    /// # Panics
    ///
    /// Panics if `x.len() != self.cols()`.
    pub fn matvec(&self, x: &[Complex64]) -> Vec<Complex64> {
        assert_eq!(x.len(), self.cols, "vector length must match column count");
        let mut y = vec![Complex64::new(0.0, 0.0); self.rows];
        for c in 0..self.cols {
            let xc = x[c];
            for idx in self.col_ptr[c]..self.col_ptr[c + 1] {
                y[self.row_indices[idx]] += self.values[idx] * xc;
            }
        }
        y
    }

    /// Sparse matrix product `C = A B`, formed column by column with a dense
    /// accumulator over the rows of `A`.
    ///
    /// # Panics
    ///
    /// Panics if `self.cols() != rhs.rows()`.
    pub fn matmul(&self, rhs: &CscMatrix) -> CscMatrix {
        assert_eq!(
            self.cols, rhs.rows,
            "inner dimensions must agree for matrix product"
        );
        let mut col_ptr = vec![0usize; rhs.cols + 1];
        let mut row_indices = Vec::new();
        let mut values = Vec::new();

        let mut acc = vec![Complex64::new(0.0, 0.0); self.rows];
        let mut marked = vec![false; self.rows];
        let mut touched: Vec<usize> = Vec::new();

        for c in 0..rhs.cols {
            for idx in rhs.col_ptr[c]..rhs.col_ptr[c + 1] {
                let k = rhs.row_indices[idx];
                let bv = rhs.values[idx];
                for aidx in self.col_ptr[k]..self.col_ptr[k + 1] {
                    let r = self.row_indices[aidx];
                    if !marked[r] {
                        marked[r] = true;
                        touched.push(r);
                    }
                    acc[r] += self.values[aidx] * bv;
                }
            }
            touched.sort_unstable();
            for &r in &touched {
                row_indices.push(r);
                values.push(acc[r]);
                acc[r] = Complex64::new(0.0, 0.0);
                marked[r] = false;
            }
            col_ptr[c + 1] = row_indices.len();
            touched.clear();
        }

        CscMatrix {
            rows: self.rows,
            cols: rhs.cols,
            col_ptr,
            row_indices,
            values,
        }
    }

    /// Expand to a dense row-major matrix. Intended for small operators and
    /// verification; memory is `rows * cols`.
    pub fn to_dense(&self) -> Vec<Vec<Complex64>> {
        let mut dense = vec![vec![Complex64::new(0.0, 0.0); self.cols]; self.rows];
        for c in 0..self.cols {
            for idx in self.col_ptr[c]..self.col_ptr[c + 1] {
                dense[self.row_indices[idx]][c] = self.values[idx];
            }
        }
        dense
    }
}
