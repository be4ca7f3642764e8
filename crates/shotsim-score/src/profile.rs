//! Per-feature-class alignment constraints and distance-to-similarity conversion.

use shotsim_dtw::{AlignmentConstraints, DtwDistance};
use shotsim_features::FeatureClass;

use crate::error::ConfigError;
use crate::similarity::Similarity;

/// Maps a normalized DTW distance onto a similarity score.
///
/// `similarity = clamp(100 - (normalized / max_expected_dist) * 100 * scaling_factor, 0, 100)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityConversion {
    max_expected_dist: f64,
    scaling_factor: f64,
}

impl SimilarityConversion {
    /// Create a validated conversion.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`ConfigError::InvalidProfile`] | `max_expected_dist` not positive and finite, or `scaling_factor` negative or non-finite |
    pub fn new(
        class: FeatureClass,
        max_expected_dist: f64,
        scaling_factor: f64,
    ) -> Result<Self, ConfigError> {
        if !(max_expected_dist.is_finite() && max_expected_dist > 0.0) {
            return Err(ConfigError::InvalidProfile {
                class: class.to_string(),
                reason: format!("max_expected_dist must be positive and finite, got {max_expected_dist}"),
            });
        }
        if !(scaling_factor.is_finite() && scaling_factor >= 0.0) {
            return Err(ConfigError::InvalidProfile {
                class: class.to_string(),
                reason: format!("scaling_factor must be non-negative and finite, got {scaling_factor}"),
            });
        }
        Ok(Self {
            max_expected_dist,
            scaling_factor,
        })
    }

    /// Return the distance at which an unscaled score would reach zero.
    #[must_use]
    pub fn max_expected_dist(&self) -> f64 {
        self.max_expected_dist
    }

    /// Return the penalty multiplier.
    #[must_use]
    pub fn scaling_factor(&self) -> f64 {
        self.scaling_factor
    }

    /// Convert a normalized distance. Returns `None` if it is not finite.
    #[must_use]
    pub fn similarity(&self, normalized: DtwDistance) -> Option<Similarity> {
        let d = normalized.value();
        if !d.is_finite() {
            return None;
        }
        Similarity::new(100.0 - (d / self.max_expected_dist) * 100.0 * self.scaling_factor)
    }
}

/// Everything needed to align and score one feature class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureClassProfile {
    constraints: AlignmentConstraints,
    conversion: SimilarityConversion,
}

impl FeatureClassProfile {
    /// Validate raw profile values for `class`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`ConfigError::InvalidProfile`] | Any constraint or conversion value is out of range |
    pub fn new(
        class: FeatureClass,
        band_fraction: f64,
        max_local_distance: f64,
        max_step: usize,
        max_length_diff: f64,
        max_expected_dist: f64,
        scaling_factor: f64,
    ) -> Result<Self, ConfigError> {
        let constraints =
            AlignmentConstraints::new(band_fraction, max_local_distance, max_step, max_length_diff)
                .map_err(|e| ConfigError::InvalidProfile {
                    class: class.to_string(),
                    reason: e.to_string(),
                })?;
        let conversion = SimilarityConversion::new(class, max_expected_dist, scaling_factor)?;
        Ok(Self {
            constraints,
            conversion,
        })
    }

    /// Return the DTW constraints.
    #[must_use]
    pub fn constraints(&self) -> AlignmentConstraints {
        self.constraints
    }

    /// Return the similarity conversion.
    #[must_use]
    pub fn conversion(&self) -> SimilarityConversion {
        self.conversion
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shotsim_dtw::Dtw;

    fn conversion(max: f64, scale: f64) -> SimilarityConversion {
        SimilarityConversion::new(FeatureClass::Kinematics, max, scale).unwrap()
    }

    fn distance(value: f64) -> DtwDistance {
        // Build a distance through the aligner: one-sample trajectories cost |a - b|.
        Dtw::unconstrained()
            .align_samples(&[0.0], &[value])
            .unwrap()
            .normalized_distance()
    }

    #[test]
    fn zero_distance_is_perfect() {
        let s = conversion(40.0, 1.5).similarity(distance(0.0)).unwrap();
        assert_eq!(s, Similarity::MAX);
    }

    #[test]
    fn linear_penalty() {
        // 100 - (10 / 40) * 100 * 1.5 = 62.5
        let s = conversion(40.0, 1.5).similarity(distance(10.0)).unwrap();
        assert!((s.value() - 62.5).abs() < 1e-10);
    }

    #[test]
    fn large_distance_clamps_to_zero() {
        let s = conversion(0.4, 1.8).similarity(distance(5.0)).unwrap();
        assert_eq!(s, Similarity::MIN);
    }

    #[test]
    fn rejects_zero_max_expected_dist() {
        let result = SimilarityConversion::new(FeatureClass::Timing, 0.0, 1.0);
        assert!(matches!(result, Err(ConfigError::InvalidProfile { .. })));
    }

    #[test]
    fn constraint_errors_name_the_class() {
        let result = FeatureClassProfile::new(FeatureClass::Stability, 2.0, 1.5, 3, 0.5, 1.5, 1.0);
        match result {
            Err(ConfigError::InvalidProfile { class, reason }) => {
                assert_eq!(class, "stability");
                assert!(reason.contains("band_fraction"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
