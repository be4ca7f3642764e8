//! Error types for trajectory validation, interpolation, and DTW alignment.

/// Errors from trajectory validation and DTW alignment.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DtwError {
    /// Returned when an empty slice is provided as a trajectory.
    #[error("trajectory must be non-empty")]
    EmptySeries,

    /// Returned when a trajectory contains NaN, infinity, or negative infinity.
    #[error("trajectory contains non-finite value at index {index}")]
    NonFiniteValue {
        /// Position of the first non-finite sample found.
        index: usize,
    },

    /// Returned when the band, local-distance, and step caps leave no
    /// admissible path from `(0, 0)` to `(n1 - 1, n2 - 1)`.
    #[error("no feasible alignment path for lengths {n1} x {n2} under the configured constraints")]
    NoFeasiblePath {
        /// Length of the first trajectory.
        n1: usize,
        /// Length of the second trajectory.
        n2: usize,
    },

    /// Returned when a warping path references an index outside a trajectory.
    #[error("path step ({a}, {b}) is out of bounds for lengths {len_a} x {len_b}")]
    PathOutOfBounds {
        /// Index into the first trajectory.
        a: usize,
        /// Index into the second trajectory.
        b: usize,
        /// Length of the first trajectory.
        len_a: usize,
        /// Length of the second trajectory.
        len_b: usize,
    },
}

/// Errors from gap interpolation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InterpolateError {
    /// Returned when every sample of a non-empty trajectory is missing.
    #[error("all {len} samples are missing; nothing to interpolate from")]
    NoValidSamples {
        /// Number of samples in the trajectory.
        len: usize,
    },

    /// Returned when the two axes of a planar trajectory differ in length.
    #[error("planar axes differ in length: x has {x_len}, y has {y_len}")]
    AxisLengthMismatch {
        /// Number of x samples.
        x_len: usize,
        /// Number of y samples.
        y_len: usize,
    },
}

/// Errors from alignment constraint validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConstraintError {
    /// Returned when the band fraction is outside `[0, 1]` or non-finite.
    #[error("band_fraction must be in [0, 1], got {value}")]
    InvalidBandFraction {
        /// The invalid band fraction.
        value: f64,
    },

    /// Returned when the local-distance cap is not a positive finite number.
    #[error("max_local_distance must be positive and finite, got {value}")]
    InvalidMaxLocalDistance {
        /// The invalid cap.
        value: f64,
    },

    /// Returned when the step cap is zero.
    #[error("max_step must be at least 1, got {value}")]
    InvalidMaxStep {
        /// The invalid cap.
        value: usize,
    },

    /// Returned when the length-difference ratio is outside `[0, 1]` or non-finite.
    #[error("max_length_diff must be in [0, 1], got {value}")]
    InvalidMaxLengthDiff {
        /// The invalid ratio.
        value: f64,
    },
}
