//! Warping path types for DTW alignment.

/// A single step in a DTW warping path, mapping frame `a` of the first
/// trajectory to frame `b` of the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarpingStep {
    /// Frame index in the first trajectory.
    pub a: usize,
    /// Frame index in the second trajectory.
    pub b: usize,
}

impl WarpingStep {
    /// Return true if `next` follows `self` by one diagonal, vertical, or
    /// horizontal move.
    #[must_use]
    pub fn precedes(&self, next: &WarpingStep) -> bool {
        let da = next.a.checked_sub(self.a);
        let db = next.b.checked_sub(self.b);
        matches!((da, db), (Some(1), Some(1)) | (Some(1), Some(0)) | (Some(0), Some(1)))
    }

    /// Return true if the move from `self` to `next` is not diagonal.
    #[must_use]
    pub fn is_off_diagonal_to(&self, next: &WarpingStep) -> bool {
        next.a == self.a || next.b == self.b
    }
}

/// An ordered sequence of warping steps from `(0, 0)` to `(n1 - 1, n2 - 1)`.
#[derive(Debug, Clone, PartialEq)]
pub struct WarpingPath(Vec<WarpingStep>);

impl WarpingPath {
    pub(crate) fn new(steps: Vec<WarpingStep>) -> Self {
        Self(steps)
    }

    /// Return the warping steps as a slice.
    #[must_use]
    pub fn steps(&self) -> &[WarpingStep] {
        &self.0
    }

    /// Return the number of steps in the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return true if the path contains no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Return the longest run of consecutive non-diagonal moves.
    #[must_use]
    pub fn longest_off_diagonal_run(&self) -> usize {
        let mut longest = 0;
        let mut run = 0;
        for pair in self.0.windows(2) {
            if pair[0].is_off_diagonal_to(&pair[1]) {
                run += 1;
                longest = longest.max(run);
            } else {
                run = 0;
            }
        }
        longest
    }
}

impl<'a> IntoIterator for &'a WarpingPath {
    type Item = &'a WarpingStep;
    type IntoIter = std::slice::Iter<'a, WarpingStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
