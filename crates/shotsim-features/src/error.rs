//! Error and unavailability types for shotsim-features.

use std::fmt;

/// Which of the two compared motions a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// The motion being evaluated.
    Subject,
    /// The motion it is compared against.
    Reference,
}

impl Side {
    /// Return the lowercase side name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Subject => "subject",
            Self::Reference => "reference",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a name does not match any member of a taxonomy enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} \"{name}\"")]
pub struct TaxonomyError {
    /// Which taxonomy was being parsed ("feature group", "subfeature", ...).
    pub kind: &'static str,
    /// The unrecognised name.
    pub name: String,
}

/// Reason a subfeature was excluded from aggregation.
///
/// Every exclusion carries one of these so coverage accounting never drops a
/// subfeature silently.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Unavailability {
    /// The trajectory had zero frames on one side.
    #[error("{side} trajectory is empty")]
    EmptyTrajectory {
        /// Side that produced no samples.
        side: Side,
    },

    /// Every sample of the trajectory was missing on one side.
    #[error("{side} trajectory has no valid samples")]
    NoValidSamples {
        /// Side whose samples were all missing.
        side: Side,
    },

    /// A prepared trajectory was rejected by the aligner.
    #[error("trajectory rejected by the aligner: {reason}")]
    InvalidTrajectory {
        /// Aligner error message.
        reason: String,
    },

    /// The alignment constraints left the end cell unreachable.
    #[error("no feasible alignment path under the class constraints")]
    NoFeasiblePath,

    /// The normalized distance was NaN or infinite.
    #[error("normalized distance is not finite")]
    NonFiniteDistance,

    /// The subfeature has no meaning in this scope (timing inside a phase window).
    #[error("not applicable in this scope")]
    NotApplicable,
}

impl Unavailability {
    /// Return a stable snake_case tag for reports.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EmptyTrajectory { .. } => "empty_trajectory",
            Self::NoValidSamples { .. } => "no_valid_samples",
            Self::InvalidTrajectory { .. } => "invalid_trajectory",
            Self::NoFeasiblePath => "no_feasible_path",
            Self::NonFiniteDistance => "non_finite_distance",
            Self::NotApplicable => "not_applicable",
        }
    }
}
