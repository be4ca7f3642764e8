//! Similarity score newtype.

use std::cmp::Ordering;
use std::fmt;

/// A similarity score in `[0, 100]`; higher is more similar.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Similarity(f64);

impl Similarity {
    /// Perfect similarity.
    pub const MAX: Self = Self(100.0);

    /// No similarity.
    pub const MIN: Self = Self(0.0);

    /// Create a score, clamping into `[0, 100]`. Returns `None` for NaN.
    #[must_use]
    pub fn new(value: f64) -> Option<Self> {
        if value.is_nan() {
            return None;
        }
        Some(Self(value.clamp(0.0, 100.0)))
    }

    /// Return the raw score.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Total ordering comparison using [`f64::total_cmp`].
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for Similarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_into_range() {
        assert_eq!(Similarity::new(130.0), Some(Similarity::MAX));
        assert_eq!(Similarity::new(-4.0), Some(Similarity::MIN));
    }

    #[test]
    fn nan_is_rejected() {
        assert_eq!(Similarity::new(f64::NAN), None);
    }

    #[test]
    fn display_format() {
        let s = Similarity::new(72.5).unwrap();
        assert_eq!(format!("{s}"), "72.500000");
    }

    #[test]
    fn total_cmp_ordering() {
        let a = Similarity::new(10.0).unwrap();
        let b = Similarity::new(20.0).unwrap();
        assert_eq!(a.total_cmp(&b), Ordering::Less);
    }
}
