//! Constrained DTW alignment.

use tracing::{debug, instrument};

use crate::constraint::{AlignmentConstraints, length_ratio};
use crate::distance::DtwDistance;
use crate::error::DtwError;
use crate::path::{WarpingPath, WarpingStep};
use crate::series::{Sample, Trajectory};

/// Predecessor move recorded for each filled cell during the forward pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Move {
    Diagonal,
    Up,
    Left,
}

/// Outcome of aligning two trajectories.
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    distance: DtwDistance,
    normalized: DtwDistance,
    path: WarpingPath,
    length_ratio: f64,
    length_flagged: bool,
}

impl Alignment {
    /// Return the raw accumulated cost at the end cell.
    #[must_use]
    pub fn distance(&self) -> DtwDistance {
        self.distance
    }

    /// Return the raw cost divided by the longer trajectory length.
    #[must_use]
    pub fn normalized_distance(&self) -> DtwDistance {
        self.normalized
    }

    /// Return the optimal warping path.
    #[must_use]
    pub fn path(&self) -> &WarpingPath {
        &self.path
    }

    /// Return `|n1 - n2| / max(n1, n2)`.
    #[must_use]
    pub fn length_ratio(&self) -> f64 {
        self.length_ratio
    }

    /// Return true if the length ratio exceeded the class's `max_length_diff`.
    ///
    /// A flagged alignment is still valid; callers lower their confidence in it.
    #[must_use]
    pub fn is_length_flagged(&self) -> bool {
        self.length_flagged
    }

    /// Consume the alignment and return its path.
    #[must_use]
    pub fn into_path(self) -> WarpingPath {
        self.path
    }
}

/// Immutable DTW configuration. Thread-safe and copyable.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Dtw {
    constraints: AlignmentConstraints,
}

impl Dtw {
    /// Create an aligner enforcing `constraints`.
    #[must_use]
    pub fn new(constraints: AlignmentConstraints) -> Self {
        Self { constraints }
    }

    /// Create an aligner that admits every cell and step pattern.
    #[must_use]
    pub fn unconstrained() -> Self {
        Self {
            constraints: AlignmentConstraints::unconstrained(),
        }
    }

    /// Return the constraint configuration.
    #[must_use]
    pub fn constraints(&self) -> AlignmentConstraints {
        self.constraints
    }

    /// Align two validated trajectories and return cost, path and length flag.
    ///
    /// The sample type selects the mode: scalar trajectories use absolute
    /// difference, planar trajectories use Euclidean distance. Allocates the
    /// full `(n1 + 1) x (n2 + 1)` accumulated-cost grid, with `max_step + 1`
    /// run layers per cell when the step cap can bind; cells outside the band
    /// are never filled.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::NoFeasiblePath`] | The band, local-distance and step caps leave the end cell unreachable |
    #[instrument(skip(self, a, b), fields(n1 = a.len(), n2 = b.len()))]
    pub fn align<T: Sample>(
        &self,
        a: &Trajectory<T>,
        b: &Trajectory<T>,
    ) -> Result<Alignment, DtwError> {
        let (n1, n2) = (a.len(), b.len());
        let (raw, steps) = self
            .fill_and_trace(a.as_slice(), b.as_slice())
            .ok_or(DtwError::NoFeasiblePath { n1, n2 })?;

        let distance = DtwDistance::new(raw);
        let ratio = length_ratio(n1, n2);
        let alignment = Alignment {
            distance,
            normalized: distance.normalized_by(n1.max(n2)),
            path: WarpingPath::new(steps),
            length_ratio: ratio,
            length_flagged: self.constraints.exceeds_length_diff(n1, n2),
        };
        debug!(
            raw = %alignment.distance,
            normalized = %alignment.normalized,
            path_len = alignment.path.len(),
            length_flagged = alignment.length_flagged,
            "aligned"
        );
        Ok(alignment)
    }

    /// Validate two raw sample slices and align them.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::EmptySeries`] | Either slice is empty |
    /// | [`DtwError::NonFiniteValue`] | Either slice has a non-finite sample |
    /// | [`DtwError::NoFeasiblePath`] | As for [`align`][Dtw::align] |
    pub fn align_samples<T: Sample>(&self, a: &[T], b: &[T]) -> Result<Alignment, DtwError> {
        let a = Trajectory::new(a.to_vec())?;
        let b = Trajectory::new(b.to_vec())?;
        self.align(&a, &b)
    }

    /// Forward fill with predecessor tags, then traceback from `(n1, n2)`.
    ///
    /// Grid cell `(i, j)` covers frames `a[i - 1]` and `b[j - 1]`; row and
    /// column 0 hold only the zero-cost origin. When the step cap can bind,
    /// every cell carries one layer per run length `r` in `0..=max_step`:
    /// layer `r` holds the cheapest cost of reaching the cell with exactly `r`
    /// consecutive non-diagonal moves. A diagonal move lands in layer 0 from
    /// any layer; up and left moves go from layer `r - 1` to layer `r`. A cap
    /// of `n1 + n2` or more never binds and collapses to a single layer.
    ///
    /// Ties prefer diagonal, then up, then left, then the lowest run layer.
    ///
    /// Returns `None` when the end cell is unreachable.
    fn fill_and_trace<T: Sample>(&self, a: &[T], b: &[T]) -> Option<(f64, Vec<WarpingStep>)> {
        let n1 = a.len();
        let n2 = b.len();
        let width = n2 + 1;
        let max_step = self.constraints.max_step();
        let layers = if max_step < n1 + n2 { max_step + 1 } else { 1 };
        let idx = |i: usize, j: usize, r: usize| (i * width + j) * layers + r;

        let cells = (n1 + 1) * width * layers;
        let mut cost = vec![f64::INFINITY; cells];
        let mut moves: Vec<Option<(Move, usize)>> = vec![None; cells];
        cost[idx(0, 0, 0)] = 0.0;

        let radius = self.constraints.radius(n1, n2);
        let max_local = self.constraints.max_local_distance();

        for i in 1..=n1 {
            for j in self.constraints.column_range(i, n2, radius) {
                let local = a[i - 1].local_distance(&b[j - 1]);
                if local > max_local {
                    continue;
                }

                let diagonal = cheapest_layer(&cost[idx(i - 1, j - 1, 0)..idx(i - 1, j, 0)]);
                for r in 0..layers {
                    let mut best: Option<(f64, Move, usize)> = None;
                    if r == 0
                        && let Some((prev, from)) = diagonal
                    {
                        keep_cheaper(&mut best, prev, Move::Diagonal, from);
                    }
                    let from = if layers == 1 { Some(0) } else { r.checked_sub(1) };
                    if let Some(from) = from {
                        keep_cheaper(&mut best, cost[idx(i - 1, j, from)], Move::Up, from);
                        keep_cheaper(&mut best, cost[idx(i, j - 1, from)], Move::Left, from);
                    }

                    if let Some((prev, mv, from)) = best {
                        let here = idx(i, j, r);
                        cost[here] = local + prev;
                        moves[here] = Some((mv, from));
                    }
                }
            }
        }

        let end = idx(n1, n2, 0);
        let (raw, mut r) = cheapest_layer(&cost[end..end + layers])?;

        let mut steps = Vec::with_capacity(n1 + n2);
        let (mut i, mut j) = (n1, n2);
        while i > 0 || j > 0 {
            steps.push(WarpingStep { a: i - 1, b: j - 1 });
            let (mv, from) = moves[idx(i, j, r)]?;
            match mv {
                Move::Diagonal => {
                    i -= 1;
                    j -= 1;
                }
                Move::Up => i -= 1,
                Move::Left => j -= 1,
            }
            r = from;
        }
        steps.reverse();

        Some((raw, steps))
    }
}

/// Return the lowest finite cost in a cell's run layers and its layer.
fn cheapest_layer(layers: &[f64]) -> Option<(f64, usize)> {
    let mut best: Option<(f64, usize)> = None;
    for (r, &c) in layers.iter().enumerate() {
        if c.is_finite() && best.is_none_or(|(b, _)| c < b) {
            best = Some((c, r));
        }
    }
    best
}

/// Replace `best` only when `prev` is finite and strictly cheaper.
fn keep_cheaper(best: &mut Option<(f64, Move, usize)>, prev: f64, mv: Move, from: usize) {
    if prev.is_finite() && best.is_none_or(|(c, _, _)| prev < c) {
        *best = Some((prev, mv, from));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::{PlanarTrajectory, Point2, ScalarTrajectory};

    fn scalar(values: &[f64]) -> ScalarTrajectory {
        ScalarTrajectory::new(values.to_vec()).unwrap()
    }

    fn pairs(path: &WarpingPath) -> Vec<(usize, usize)> {
        path.steps().iter().map(|s| (s.a, s.b)).collect()
    }

    #[test]
    fn repeated_value_is_absorbed_by_warping() {
        let a = scalar(&[10.0, 20.0, 30.0]);
        let b = scalar(&[10.0, 20.0, 20.0, 30.0]);
        let alignment = Dtw::unconstrained().align(&a, &b).unwrap();
        assert_eq!(alignment.distance().value(), 0.0);
        assert_eq!(alignment.normalized_distance().value(), 0.0);
        assert_eq!(pairs(alignment.path()), vec![(0, 0), (1, 1), (1, 2), (2, 3)]);
    }

    #[test]
    fn self_alignment_is_diagonal_with_zero_cost() {
        let a = scalar(&[3.0, 1.0, 4.0, 1.0, 5.0, 9.0]);
        let alignment = Dtw::unconstrained().align(&a, &a).unwrap();
        assert_eq!(alignment.distance().value(), 0.0);
        let expected: Vec<(usize, usize)> = (0..6).map(|k| (k, k)).collect();
        assert_eq!(pairs(alignment.path()), expected);
    }

    #[test]
    fn constant_self_alignment_prefers_diagonal_on_ties() {
        let a = scalar(&[1.0, 1.0, 1.0]);
        let alignment = Dtw::unconstrained().align(&a, &a).unwrap();
        assert_eq!(pairs(alignment.path()), vec![(0, 0), (1, 1), (2, 2)]);
    }

    #[test]
    fn single_points() {
        let alignment = Dtw::unconstrained()
            .align(&scalar(&[1.0]), &scalar(&[5.0]))
            .unwrap();
        assert_eq!(alignment.distance().value(), 4.0);
        assert_eq!(pairs(alignment.path()), vec![(0, 0)]);
    }

    #[test]
    fn zero_band_forces_diagonal() {
        let constraints = AlignmentConstraints::new(0.0, 100.0, 5, 0.5).unwrap();
        let alignment = Dtw::new(constraints)
            .align(&scalar(&[1.0, 2.0, 3.0]), &scalar(&[3.0, 2.0, 1.0]))
            .unwrap();
        // |1-3| + |2-2| + |3-1|
        assert!((alignment.distance().value() - 4.0).abs() < 1e-10);
        assert_eq!(pairs(alignment.path()), vec![(0, 0), (1, 1), (2, 2)]);
    }

    #[test]
    fn band_never_beats_unconstrained() {
        let a = scalar(&[0.0, 0.0, 5.0, 5.0, 0.0, 0.0]);
        let b = scalar(&[5.0, 5.0, 0.0, 0.0, 0.0, 5.0]);
        let free = Dtw::unconstrained().align(&a, &b).unwrap();
        let constraints = AlignmentConstraints::new(0.2, 100.0, 10, 1.0).unwrap();
        let banded = Dtw::new(constraints).align(&a, &b).unwrap();
        assert!(banded.distance().value() >= free.distance().value() - 1e-10);
        for step in banded.path() {
            // radius = floor(0.2 * 6) = 1
            assert!(step.a.abs_diff(step.b) <= 1);
        }
    }

    #[test]
    fn step_cap_below_required_run_is_infeasible() {
        let a = scalar(&[1.0, 1.0, 1.0, 1.0]);
        let b = scalar(&[1.0]);
        let constraints = AlignmentConstraints::new(0.0, 10.0, 2, 1.0).unwrap();
        let result = Dtw::new(constraints).align(&a, &b);
        assert_eq!(result, Err(DtwError::NoFeasiblePath { n1: 4, n2: 1 }));
    }

    #[test]
    fn step_cap_at_required_run_is_feasible() {
        let a = scalar(&[1.0, 1.0, 1.0, 1.0]);
        let b = scalar(&[1.0]);
        let constraints = AlignmentConstraints::new(0.0, 10.0, 3, 1.0).unwrap();
        let alignment = Dtw::new(constraints).align(&a, &b).unwrap();
        assert_eq!(pairs(alignment.path()), vec![(0, 0), (1, 0), (2, 0), (3, 0)]);
    }

    #[test]
    fn step_cap_bounds_every_run_in_path() {
        let a = scalar(&[0.0, 0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 3.0]);
        let b = scalar(&[0.0, 1.0, 2.0, 3.0, 3.0, 3.0, 3.0, 3.0]);
        let constraints = AlignmentConstraints::new(1.0, 100.0, 1, 1.0).unwrap();
        let alignment = Dtw::new(constraints).align(&a, &b).unwrap();
        assert!(alignment.path().longest_off_diagonal_run() <= 1);
    }

    #[test]
    fn step_cap_finds_path_behind_a_cheaper_capped_run() {
        // The cheapest way into several cells ends a run the cap forbids
        // extending; the only feasible path goes through a dearer predecessor.
        let a = scalar(&[3.0, 0.0, 1.0, 0.0]);
        let b = scalar(&[2.0, 1.0, 2.0, 1.0, 2.0, 2.0, 2.0]);
        let constraints = AlignmentConstraints::new(1.0, 100.0, 1, 1.0).unwrap();
        let alignment = Dtw::new(constraints).align(&a, &b).unwrap();
        assert!((alignment.distance().value() - 9.0).abs() < 1e-10);
        assert!(alignment.path().longest_off_diagonal_run() <= 1);
        assert_eq!(alignment.path().steps().last().map(|s| (s.a, s.b)), Some((3, 6)));
    }

    #[test]
    fn step_cap_keeps_the_exact_optimum() {
        let a = scalar(&[1.0, 2.0, 2.0, 4.0, 3.0, 2.0]);
        let b = scalar(&[2.0, 4.0, 3.0, 2.0, 0.0, 1.0, 0.0]);
        let constraints = AlignmentConstraints::new(1.0, 100.0, 1, 1.0).unwrap();
        let alignment = Dtw::new(constraints).align(&a, &b).unwrap();
        assert!((alignment.distance().value() - 11.0).abs() < 1e-10);
        assert!(alignment.path().longest_off_diagonal_run() <= 1);

        // The path's own cost reproduces the reported distance.
        let (av, bv) = (a.as_slice(), b.as_slice());
        let along: f64 = alignment
            .path()
            .steps()
            .iter()
            .map(|s| (av[s.a] - bv[s.b]).abs())
            .sum();
        assert!((along - 11.0).abs() < 1e-10);
    }

    #[test]
    fn loose_step_cap_matches_unconstrained() {
        let a = scalar(&[0.0, 5.0, 5.0, 5.0, 5.0, 1.0]);
        let b = scalar(&[0.0, 5.0, 1.0]);
        let loose = AlignmentConstraints::new(1.0, f64::MAX, 8, 1.0).unwrap();
        let capped = Dtw::new(loose).align(&a, &b).unwrap();
        let free = Dtw::unconstrained().align(&a, &b).unwrap();
        assert_eq!(capped.distance(), free.distance());
        assert_eq!(pairs(capped.path()), pairs(free.path()));
    }

    #[test]
    fn local_cap_makes_far_cells_infeasible() {
        let constraints = AlignmentConstraints::new(1.0, 5.0, 5, 1.0).unwrap();
        let result = Dtw::new(constraints).align(&scalar(&[0.0, 0.0]), &scalar(&[0.0, 10.0]));
        assert_eq!(result, Err(DtwError::NoFeasiblePath { n1: 2, n2: 2 }));
    }

    #[test]
    fn local_cap_admits_close_cells() {
        let constraints = AlignmentConstraints::new(1.0, 0.5, 5, 1.0).unwrap();
        let a = scalar(&[0.0, 1.0, 0.0]);
        let alignment = Dtw::new(constraints).align(&a, &a).unwrap();
        assert_eq!(alignment.distance().value(), 0.0);
    }

    #[test]
    fn planar_mode_uses_euclidean_distance() {
        let a = PlanarTrajectory::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
        ])
        .unwrap();
        let b = PlanarTrajectory::new(vec![
            Point2::new(3.0, 4.0),
            Point2::new(4.0, 4.0),
            Point2::new(5.0, 4.0),
        ])
        .unwrap();
        let alignment = Dtw::unconstrained().align(&a, &b).unwrap();
        // Every diagonal cell costs 5; any warp would cost more.
        assert!((alignment.distance().value() - 15.0).abs() < 1e-10);
        assert!((alignment.normalized_distance().value() - 5.0).abs() < 1e-10);
    }

    #[test]
    fn length_ratio_at_threshold_is_not_flagged() {
        let constraints = AlignmentConstraints::new(0.35, 100.0, 5, 0.2).unwrap();
        let a = scalar(&(0..10).map(f64::from).collect::<Vec<_>>());
        let b = scalar(&(0..8).map(f64::from).collect::<Vec<_>>());
        let alignment = Dtw::new(constraints).align(&a, &b).unwrap();
        assert!((alignment.length_ratio() - 0.2).abs() < 1e-10);
        assert!(!alignment.is_length_flagged());
    }

    #[test]
    fn length_ratio_above_threshold_is_flagged() {
        let constraints = AlignmentConstraints::new(0.35, 100.0, 5, 0.2).unwrap();
        let a = scalar(&(0..10).map(f64::from).collect::<Vec<_>>());
        let b = scalar(&(0..7).map(f64::from).collect::<Vec<_>>());
        let alignment = Dtw::new(constraints).align(&a, &b).unwrap();
        assert!(alignment.is_length_flagged());
    }

    #[test]
    fn align_samples_rejects_empty() {
        let result = Dtw::unconstrained().align_samples::<f64>(&[], &[1.0]);
        assert_eq!(result, Err(DtwError::EmptySeries));
    }

    #[test]
    fn align_samples_rejects_non_finite() {
        let result = Dtw::unconstrained().align_samples(&[1.0], &[1.0, f64::INFINITY]);
        assert_eq!(result, Err(DtwError::NonFiniteValue { index: 1 }));
    }
}
