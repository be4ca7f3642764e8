//! DTW distance newtype wrapper.

use std::cmp::Ordering;
use std::fmt;

/// A non-negative accumulated DTW cost.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct DtwDistance(f64);

impl DtwDistance {
    /// Zero distance, the cost of aligning a trajectory with itself.
    pub const ZERO: Self = Self(0.0);

    pub(crate) fn new(value: f64) -> Self {
        Self(value)
    }

    /// Return the raw distance value.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Divide by the longer trajectory length, making costs comparable
    /// across motions of different durations.
    #[must_use]
    pub fn normalized_by(self, longest: usize) -> Self {
        if longest == 0 {
            return self;
        }
        Self(self.0 / longest as f64)
    }

    /// Total ordering comparison using [`f64::total_cmp`].
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for DtwDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.0)
    }
}
