//! Peak Picking — multi-policy extraction of dominant local maxima
//!
//! Scans a magnitude sequence for interior samples that exceed both
//! neighbors, then filters the candidates by a selectable significance
//! policy. Used to turn a slope-magnitude distribution into a short list of
//! dominant dip directions, and reused in a second, threshold-driven pass to
//! refine that list.
//!
//! ## Policies
//!
//! - [`PeakPolicy::All`] -- keep every interior local maximum.
//! - [`PeakPolicy::MeanOfDistribution`] -- keep maxima above the mean of the
//!   whole sequence (keyword `"mod"`).
//! - [`PeakPolicy::MeanOfPeaks`] -- `"mod"` picking followed by a second cut
//!   at the mean of the picked magnitudes (keyword `"mop"`).
//! - [`PeakPolicy::Threshold`] -- keep maxima above a fixed value.
//!
//! ## Example
//!
//! ```rust
//! use seisfk_core::peak_picker::{find_peaks, PeakPolicy};
//!
//! let data = [0.0, 1.0, 3.0, 7.0, 3.0, 1.0, 0.0];
//! let axis = [-3.0, -2.0, -1.0, 0.0, 1.0, 2.0, 3.0];
//! let peaks = find_peaks(&data, &axis, PeakPolicy::All).unwrap();
//! assert_eq!(peaks.len(), 1);
//! assert_eq!(peaks[0].position, 0.0);
//! assert_eq!(peaks[0].magnitude, 7.0);
//! ```

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::types::{FkError, FkResult};

/// Significance condition applied to interior local maxima.
///
/// Dispatch happens once per call, not per sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PeakPolicy {
    /// Keep every interior local maximum.
    All,
    /// Keep maxima exceeding the mean of the whole distribution.
    MeanOfDistribution,
    /// Mean-of-distribution picking, then keep only picks exceeding the mean
    /// of the picked magnitudes.
    MeanOfPeaks,
    /// Keep maxima exceeding a fixed threshold.
    Threshold(f64),
}

impl FromStr for PeakPolicy {
    type Err = FkError;

    /// Accepts `"mod"`/`"mop"` in any letter case, `"none"` or the empty
    /// string for [`PeakPolicy::All`], or a numeric literal for a fixed
    /// threshold.
    fn from_str(s: &str) -> FkResult<Self> {
        let t = s.trim();
        if t.is_empty() || t.eq_ignore_ascii_case("none") {
            return Ok(PeakPolicy::All);
        }
        if t.eq_ignore_ascii_case("mod") {
            return Ok(PeakPolicy::MeanOfDistribution);
        }
        if t.eq_ignore_ascii_case("mop") {
            return Ok(PeakPolicy::MeanOfPeaks);
        }
        if let Ok(v) = t.parse::<f64>() {
            return Ok(PeakPolicy::Threshold(v));
        }
        Err(FkError::InvalidPolicy(t.to_string()))
    }
}

/// A picked peak: its position on the scan axis and its magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peak {
    /// Position on the axis the data was sampled over.
    pub position: f64,
    /// Magnitude of the sample at that position.
    pub magnitude: f64,
}

/// Find the significant interior local maxima of `data`, reporting their
/// positions on `axis`.
///
/// A sample qualifies when it strictly exceeds both direct neighbors and
/// satisfies the policy condition; the first and last sample never qualify.
/// Results keep axis order. Sequences shorter than 3 samples have no
/// interior and yield an empty set, a valid outcome rather than an error.
pub fn find_peaks(data: &[f64], axis: &[f64], policy: PeakPolicy) -> FkResult<Vec<Peak>> {
    if axis.len() != data.len() {
        return Err(FkError::InvalidShape(format!(
            "axis length {} does not match data length {}",
            axis.len(),
            data.len()
        )));
    }
    if data.len() < 3 {
        return Ok(Vec::new());
    }

    let stage_threshold = match policy {
        PeakPolicy::All => None,
        PeakPolicy::Threshold(t) => Some(t),
        PeakPolicy::MeanOfDistribution | PeakPolicy::MeanOfPeaks => Some(mean(data)),
    };

    let mut peaks = Vec::new();
    for k in 1..data.len() - 1 {
        if data[k] > data[k - 1] && data[k] > data[k + 1] {
            if let Some(t) = stage_threshold {
                if data[k] <= t {
                    continue;
                }
            }
            peaks.push(Peak {
                position: axis[k],
                magnitude: data[k],
            });
        }
    }

    if matches!(policy, PeakPolicy::MeanOfPeaks) && !peaks.is_empty() {
        let pick_mean =
            peaks.iter().map(|p| p.magnitude).sum::<f64>() / peaks.len() as f64;
        peaks.retain(|p| p.magnitude > pick_mean);
    }

    Ok(peaks)
}

fn mean(data: &[f64]) -> f64 {
    data.iter().sum::<f64>() / data.len() as f64
}
