//! Index pairing of two trajectories along a warping path.

use crate::error::DtwError;
use crate::path::WarpingPath;

/// Two equal-length sequences, element `k` of each matched by step `k` of a path.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedPair<T> {
    /// Samples of the first trajectory, repeated where the path warps.
    pub subject: Vec<T>,
    /// Samples of the second trajectory, repeated where the path warps.
    pub reference: Vec<T>,
}

impl<T> AlignedPair<T> {
    /// Return the number of paired samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subject.len()
    }

    /// Return true if no samples were paired.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subject.is_empty()
    }

    /// Iterate over `(subject, reference)` sample pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&T, &T)> {
        self.subject.iter().zip(&self.reference)
    }
}

/// Build `(a[i], b[j])` for every step `(i, j)` of `path`.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`DtwError::PathOutOfBounds`] | A step indexes past the end of `a` or `b` |
pub fn pair_along_path<T: Copy>(
    a: &[T],
    b: &[T],
    path: &WarpingPath,
) -> Result<AlignedPair<T>, DtwError> {
    let mut subject = Vec::with_capacity(path.len());
    let mut reference = Vec::with_capacity(path.len());
    for step in path {
        match (a.get(step.a), b.get(step.b)) {
            (Some(&x), Some(&y)) => {
                subject.push(x);
                reference.push(y);
            }
            _ => {
                return Err(DtwError::PathOutOfBounds {
                    a: step.a,
                    b: step.b,
                    len_a: a.len(),
                    len_b: b.len(),
                });
            }
        }
    }
    Ok(AlignedPair { subject, reference })
}
