//! # Seismic Array f-k DSP Core
//!
//! This crate provides the core Digital Signal Processing (DSP) algorithms
//! for dip analysis of seismic array recordings in the frequency-wavenumber
//! (f-k) domain.
//!
//! ## Overview
//!
//! A linear arrival crossing a seismometer array maps to a straight line of
//! energy in the f-k plane whose slope encodes the apparent slowness. This
//! library detects those lines, characterizes their slopes, and builds the
//! binary masks used to isolate or remove them:
//!
//! - **Slope scanning**: stack energy along candidate dips and extract the
//!   dominant slopes with a two-stage, envelope-refined peak picker
//! - **Dip masking**: turn a slope set into a `{0, 1}` selection mask over
//!   the f-k grid, widened to tolerate picking error
//! - **Operator building**: express the separable 2-D inverse DFT as an
//!   explicit sparse linear operator for reconstruction pipelines
//!
//! ## Signal flow
//!
//! ```text
//! record section ──[2-D FFT]──► f-k grid ──► slope_distribution ──► dominant dips
//!                                  │                                     │
//!                                  ▼                                     ▼
//!                             muted grid ◄──────[apply]────────── make_mask
//! ```
//!
//! The 2-D transform itself, stream I/O, and visualization live outside this
//! crate; everything here operates on in-memory grids.
//!
//! ## Example
//!
//! ```rust
//! use num_complex::Complex64;
//! use seisfk_core::{make_mask, slope_distribution, FkArray, PeakPolicy, SlopeScanSpec};
//!
//! // toy grid with a single dipping trend
//! let mut fk = FkArray::zeros(16, 32).unwrap();
//! let p = 1.0 * fk.slope_norm();
//! for f in 0..32 {
//!     let k = (-((p * f as f64).floor() as i64)).rem_euclid(16) as usize;
//!     fk.data[k][f] = Complex64::new(1.0, 0.0);
//! }
//!
//! // scan for dominant dips, then mask them
//! let spec = SlopeScanSpec::new(-2.0, 2.0, 0.25).unwrap();
//! let dist = slope_distribution(&fk, &spec, PeakPolicy::All, 0.0).unwrap();
//! let slopes: Vec<f64> = if dist.peaks.is_empty() {
//!     vec![1.0]
//! } else {
//!     dist.peaks.iter().map(|p| p.position).collect()
//! };
//! let mask = make_mask(16, 32, &slopes).unwrap();
//! let isolated = mask.apply(&fk).unwrap();
//! assert_eq!(isolated.shape(), fk.shape());
//! ```

pub mod circular_shift;
pub mod dip_mask;
pub mod envelope;
pub mod ifft2_operator;
pub mod peak_picker;
pub mod slope_scan;
pub mod sparse;
pub mod types;

// Re-export main types
pub use dip_mask::{make_mask, DipMask};
pub use ifft2_operator::ifft2_operator;
pub use peak_picker::{find_peaks, Peak, PeakPolicy};
pub use slope_scan::{align_to_slope, slope_distribution, SlopeDistribution, SlopeScanSpec};
pub use sparse::CscMatrix;
pub use types::{slope_norm, Complex, FkArray, FkError, FkResult};
