//! Trajectory types with validation guarantees.

use std::fmt;
use std::ops::Index;

use crate::error::DtwError;

/// A point in the normalized image plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2 {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point2 {
    /// Create a new point.
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A per-frame sample that DTW can compare.
///
/// The sample type selects the aligner mode: `f64` aligns in scalar mode
/// (absolute difference), [`Point2`] aligns in planar mode (Euclidean distance).
pub trait Sample: Copy + fmt::Debug + Send + Sync {
    /// Local distance between two samples. Must be non-negative and symmetric.
    fn local_distance(&self, other: &Self) -> f64;

    /// Return true if every component of the sample is finite.
    fn is_finite(&self) -> bool;
}

impl Sample for f64 {
    fn local_distance(&self, other: &Self) -> f64 {
        (self - other).abs()
    }

    fn is_finite(&self) -> bool {
        f64::is_finite(*self)
    }
}

impl Sample for Point2 {
    fn local_distance(&self, other: &Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Owned, validated trajectory. Guaranteed non-empty with all finite samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory<T>(Vec<T>);

/// A trajectory of scalar samples (angles, heights, ratios).
pub type ScalarTrajectory = Trajectory<f64>;

/// A trajectory of 2D points (ball or joint positions).
pub type PlanarTrajectory = Trajectory<Point2>;

impl<T: Sample> Trajectory<T> {
    /// Create a new trajectory, validating that it is non-empty and all samples are finite.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::EmptySeries`] | `samples` is empty |
    /// | [`DtwError::NonFiniteValue`] | Any sample has a NaN or infinite component |
    pub fn new(samples: Vec<T>) -> Result<Self, DtwError> {
        if samples.is_empty() {
            return Err(DtwError::EmptySeries);
        }
        if let Some(index) = samples.iter().position(|s| !s.is_finite()) {
            return Err(DtwError::NonFiniteValue { index });
        }
        Ok(Self(samples))
    }

    /// Return the samples as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.0
    }

    /// Return the number of frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return true if the trajectory has no frames.
    ///
    /// A [`Trajectory`] constructed via [`Trajectory::new`] is always non-empty,
    /// so this always returns `false` for valid instances. Provided to satisfy
    /// the `len_without_is_empty` convention.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume and return the inner vector.
    #[must_use]
    pub fn into_inner(self) -> Vec<T> {
        self.0
    }
}

impl PlanarTrajectory {
    /// Build a planar trajectory from separate x and y axes.
    ///
    /// # Errors
    ///
    /// Same as [`Trajectory::new`]. Axes of different lengths are truncated to
    /// the shorter one before validation.
    pub fn from_axes(xs: &[f64], ys: &[f64]) -> Result<Self, DtwError> {
        let points = xs.iter().zip(ys).map(|(&x, &y)| Point2::new(x, y)).collect();
        Self::new(points)
    }
}

impl<T> Index<usize> for Trajectory<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<T> AsRef<[T]> for Trajectory<T> {
    fn as_ref(&self) -> &[T] {
        &self.0
    }
}

impl<T: Sample> TryFrom<Vec<T>> for Trajectory<T> {
    type Error = DtwError;

    fn try_from(samples: Vec<T>) -> Result<Self, Self::Error> {
        Self::new(samples)
    }
}
