//! Elasticity constraints applied to a DTW alignment.

use std::ops::RangeInclusive;

use crate::error::ConstraintError;

/// Constraints on the DTW warping window and step pattern.
///
/// | Field | Effect |
/// |---|---|
/// | `band_fraction` | Sakoe-Chiba radius as a fraction of the longer trajectory |
/// | `max_local_distance` | Cells whose local distance exceeds this are infeasible |
/// | `max_step` | Maximum run of consecutive non-diagonal moves along a path |
/// | `max_length_diff` | Length ratio above which an alignment is flagged low-confidence |
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignmentConstraints {
    band_fraction: f64,
    max_local_distance: f64,
    max_step: usize,
    max_length_diff: f64,
}

impl AlignmentConstraints {
    /// Create a validated constraint set.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`ConstraintError::InvalidBandFraction`] | `band_fraction` outside `[0, 1]` |
    /// | [`ConstraintError::InvalidMaxLocalDistance`] | `max_local_distance` not positive and finite |
    /// | [`ConstraintError::InvalidMaxStep`] | `max_step` is zero |
    /// | [`ConstraintError::InvalidMaxLengthDiff`] | `max_length_diff` outside `[0, 1]` |
    pub fn new(
        band_fraction: f64,
        max_local_distance: f64,
        max_step: usize,
        max_length_diff: f64,
    ) -> Result<Self, ConstraintError> {
        if !(0.0..=1.0).contains(&band_fraction) {
            return Err(ConstraintError::InvalidBandFraction { value: band_fraction });
        }
        if !(max_local_distance.is_finite() && max_local_distance > 0.0) {
            return Err(ConstraintError::InvalidMaxLocalDistance {
                value: max_local_distance,
            });
        }
        if max_step == 0 {
            return Err(ConstraintError::InvalidMaxStep { value: max_step });
        }
        if !(0.0..=1.0).contains(&max_length_diff) {
            return Err(ConstraintError::InvalidMaxLengthDiff {
                value: max_length_diff,
            });
        }
        Ok(Self {
            band_fraction,
            max_local_distance,
            max_step,
            max_length_diff,
        })
    }

    /// Constraints that admit every cell and every step pattern.
    ///
    /// Alignments under these constraints are never length-flagged.
    #[must_use]
    pub fn unconstrained() -> Self {
        Self {
            band_fraction: 1.0,
            max_local_distance: f64::INFINITY,
            max_step: usize::MAX,
            max_length_diff: 1.0,
        }
    }

    /// Return the band fraction.
    #[must_use]
    pub fn band_fraction(&self) -> f64 {
        self.band_fraction
    }

    /// Return the local-distance cap.
    #[must_use]
    pub fn max_local_distance(&self) -> f64 {
        self.max_local_distance
    }

    /// Return the cap on consecutive non-diagonal moves.
    #[must_use]
    pub fn max_step(&self) -> usize {
        self.max_step
    }

    /// Return the length-difference ratio threshold.
    #[must_use]
    pub fn max_length_diff(&self) -> f64 {
        self.max_length_diff
    }

    /// Return the Sakoe-Chiba radius for trajectories of lengths `n1` and `n2`.
    ///
    /// The radius is `floor(band_fraction * max(n1, n2))`, widened to at least
    /// `|n1 - n2|` so the final cell always lies inside the band.
    #[must_use]
    pub fn radius(&self, n1: usize, n2: usize) -> usize {
        let longest = n1.max(n2);
        let band = (self.band_fraction * longest as f64).floor() as usize;
        band.max(n1.abs_diff(n2))
    }

    /// Return the admissible column range (1-based grid indices) for grid row `i`.
    ///
    /// Row `i` admits `j` with `|i - j| <= radius`, intersected with `[1, n_cols]`.
    #[must_use]
    pub fn column_range(&self, i: usize, n_cols: usize, radius: usize) -> RangeInclusive<usize> {
        let start = i.saturating_sub(radius).max(1);
        let end = i.saturating_add(radius).min(n_cols);
        start..=end
    }

    /// Return true if the length ratio of `n1` and `n2` exceeds `max_length_diff`.
    #[must_use]
    pub fn exceeds_length_diff(&self, n1: usize, n2: usize) -> bool {
        length_ratio(n1, n2) > self.max_length_diff
    }
}

impl Default for AlignmentConstraints {
    fn default() -> Self {
        Self::unconstrained()
    }
}

/// Relative length difference `|n1 - n2| / max(n1, n2)`; zero when both are empty.
#[must_use]
pub(crate) fn length_ratio(n1: usize, n2: usize) -> f64 {
    let longest = n1.max(n2);
    if longest == 0 {
        return 0.0;
    }
    n1.abs_diff(n2) as f64 / longest as f64
}
