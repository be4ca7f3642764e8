//! Accuracy regression tests for shotsim-dtw.
//!
//! Hardcoded reference costs catch regressions in the accumulated-cost fill;
//! seeded random trajectories check structural invariants of every path and
//! compare constrained costs against an exhaustive path search.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use shotsim_dtw::{
    AlignmentConstraints, Dtw, DtwError, PlanarTrajectory, Point2, ScalarTrajectory,
    interpolate_missing, pair_along_path,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn ts(values: Vec<f64>) -> ScalarTrajectory {
    ScalarTrajectory::new(values).expect("valid test trajectory")
}

fn random_trajectory(rng: &mut ChaCha8Rng, len: usize) -> ScalarTrajectory {
    ts((0..len).map(|_| rng.gen_range(-50.0..50.0)).collect())
}

fn assert_path_well_formed(path: &shotsim_dtw::WarpingPath, n1: usize, n2: usize) {
    let steps = path.steps();
    assert_eq!(steps.first().map(|s| (s.a, s.b)), Some((0, 0)), "path must start at origin");
    assert_eq!(
        steps.last().map(|s| (s.a, s.b)),
        Some((n1 - 1, n2 - 1)),
        "path must end at ({}, {})",
        n1 - 1,
        n2 - 1
    );
    for pair in steps.windows(2) {
        assert!(
            pair[0].precedes(&pair[1]),
            "illegal move {:?} -> {:?}",
            pair[0],
            pair[1]
        );
    }
}

// ---------------------------------------------------------------------------
// a) scalar_costs_match_known_values
// ---------------------------------------------------------------------------

/// Raw costs for hand-checked scalar pairs under the unconstrained aligner.
#[test]
fn scalar_costs_match_known_values() {
    let pairs: Vec<(ScalarTrajectory, ScalarTrajectory)> = vec![
        (ts(vec![0.0, 0.0, 0.0]), ts(vec![1.0, 1.0, 1.0])),           // constant offset
        (ts(vec![0.0, 1.0, 0.0]), ts(vec![0.0, 0.0, 0.0])),           // single peak
        (ts(vec![1.0, 2.0, 3.0, 4.0]), ts(vec![1.0, 2.0, 3.0, 4.0])), // identical
        (ts(vec![1.0]), ts(vec![5.0])),                                // single point
        (ts(vec![10.0, 20.0, 30.0]), ts(vec![10.0, 20.0, 20.0, 30.0])), // repeated frame
        (ts(vec![0.0, 0.0, 1.0]), ts(vec![1.0, 0.0, 0.0])),           // shifted peak
    ];

    let expected: Vec<f64> = vec![
        3.0, // three diagonal cells of cost 1
        1.0, // the peak must be matched somewhere
        0.0, // identical
        4.0, // |1 - 5|
        0.0, // the repeated frame warps for free
        2.0, // both peaks pay against a zero
    ];

    let dtw = Dtw::unconstrained();
    for (i, ((a, b), &exp)) in pairs.iter().zip(expected.iter()).enumerate() {
        let dist = dtw.align(a, b).expect("unconstrained is feasible").distance().value();
        assert!(
            (dist - exp).abs() < 1e-10,
            "pair {i}: got {dist:.15}, expected {exp:.15}"
        );
    }
}

// ---------------------------------------------------------------------------
// b) normalized_distance_divides_by_longer_length
// ---------------------------------------------------------------------------

#[test]
fn normalized_distance_divides_by_longer_length() {
    let a = ts(vec![0.0, 0.0, 0.0]);
    let b = ts(vec![1.0, 1.0, 1.0, 1.0, 1.0, 1.0]);
    let alignment = Dtw::unconstrained().align(&a, &b).unwrap();
    // Six cells of cost 1 at minimum, over max(3, 6) = 6
    assert!((alignment.distance().value() - 6.0).abs() < 1e-10);
    assert!((alignment.normalized_distance().value() - 1.0).abs() < 1e-10);
}

// ---------------------------------------------------------------------------
// c) planar_cost_matches_known_value
// ---------------------------------------------------------------------------

#[test]
fn planar_cost_matches_known_value() {
    let a = PlanarTrajectory::from_axes(&[0.0, 0.0], &[0.0, 1.0]).unwrap();
    let b = PlanarTrajectory::new(vec![Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)]).unwrap();
    let alignment = Dtw::unconstrained().align(&a, &b).unwrap();
    assert!((alignment.distance().value() - 1.0).abs() < 1e-10);
}

// ---------------------------------------------------------------------------
// d) random_paths_are_well_formed
// ---------------------------------------------------------------------------

/// Every returned path starts at the origin, ends at the last cell and moves
/// by one in either or both indices.
#[test]
fn random_paths_are_well_formed() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let dtw = Dtw::unconstrained();
    for _ in 0..50 {
        let n1 = rng.gen_range(1..40);
        let n2 = rng.gen_range(1..40);
        let a = random_trajectory(&mut rng, n1);
        let b = random_trajectory(&mut rng, n2);
        let alignment = dtw.align(&a, &b).unwrap();
        assert_path_well_formed(alignment.path(), n1, n2);
    }
}

// ---------------------------------------------------------------------------
// e) random_constrained_paths_respect_constraints
// ---------------------------------------------------------------------------

/// Feasible constrained alignments stay within the band, never exceed the step
/// cap, and cost at least as much as the unconstrained alignment.
#[test]
fn random_constrained_paths_respect_constraints() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let constraints = AlignmentConstraints::new(0.15, 90.0, 2, 0.2).unwrap();
    let constrained = Dtw::new(constraints);
    let free = Dtw::unconstrained();

    let mut feasible = 0;
    for _ in 0..50 {
        let n1 = rng.gen_range(5..40);
        let n2 = rng.gen_range(5..40);
        let a = random_trajectory(&mut rng, n1);
        let b = random_trajectory(&mut rng, n2);
        match constrained.align(&a, &b) {
            Ok(alignment) => {
                feasible += 1;
                assert_path_well_formed(alignment.path(), n1, n2);
                let radius = constraints.radius(n1, n2);
                for step in alignment.path() {
                    assert!(step.a.abs_diff(step.b) <= radius, "step outside band");
                }
                assert!(alignment.path().longest_off_diagonal_run() <= 2);
                let unconstrained = free.align(&a, &b).unwrap();
                assert!(
                    alignment.distance().value() >= unconstrained.distance().value() - 1e-10
                );
            }
            Err(DtwError::NoFeasiblePath { n1: e1, n2: e2 }) => {
                assert_eq!((e1, e2), (n1, n2));
            }
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert!(feasible > 0, "no random pair was feasible");
}

// ---------------------------------------------------------------------------
// f) constrained_costs_match_exhaustive_search
// ---------------------------------------------------------------------------

/// Limits applied by the exhaustive search, mirroring `AlignmentConstraints`.
struct Limits {
    radius: usize,
    max_local: f64,
    max_step: usize,
}

/// Cheapest cost over every monotone path from `(0, 0)` to the last cell that
/// stays in the band, skips over-cap cells and never runs past `max_step`.
fn exhaustive_cost(a: &[f64], b: &[f64], limits: &Limits) -> Option<f64> {
    fn walk(
        a: &[f64],
        b: &[f64],
        (i, j): (usize, usize),
        run: usize,
        acc: f64,
        limits: &Limits,
        best: &mut Option<f64>,
    ) {
        let local = (a[i] - b[j]).abs();
        if i.abs_diff(j) > limits.radius || local > limits.max_local || run > limits.max_step {
            return;
        }
        let acc = acc + local;
        if i + 1 == a.len() && j + 1 == b.len() {
            if best.is_none_or(|c| acc < c) {
                *best = Some(acc);
            }
            return;
        }
        if i + 1 < a.len() && j + 1 < b.len() {
            walk(a, b, (i + 1, j + 1), 0, acc, limits, best);
        }
        if i + 1 < a.len() {
            walk(a, b, (i + 1, j), run + 1, acc, limits, best);
        }
        if j + 1 < b.len() {
            walk(a, b, (i, j + 1), run + 1, acc, limits, best);
        }
    }

    let mut best = None;
    walk(a, b, (0, 0), 0, 0.0, limits, &mut best);
    best
}

/// Band, local and step caps together: the aligner reports a path exactly when
/// one exists, and its cost is the true constrained minimum.
#[test]
fn constrained_costs_match_exhaustive_search() {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let bands = [0.0, 0.34, 0.5, 1.0];
    let local_caps = [3.0, 6.0, 100.0];

    let (mut feasible, mut infeasible) = (0, 0);
    for case in 0..400 {
        let n1 = rng.gen_range(1..=6);
        let n2 = rng.gen_range(1..=6);
        let a: Vec<f64> = (0..n1).map(|_| f64::from(rng.gen_range(0..10u8))).collect();
        let b: Vec<f64> = (0..n2).map(|_| f64::from(rng.gen_range(0..10u8))).collect();
        let band = bands[rng.gen_range(0..bands.len())];
        let max_local = local_caps[rng.gen_range(0..local_caps.len())];
        let max_step = rng.gen_range(1..=3);

        let constraints = AlignmentConstraints::new(band, max_local, max_step, 1.0).unwrap();
        let limits = Limits {
            radius: constraints.radius(n1, n2),
            max_local,
            max_step,
        };
        let expected = exhaustive_cost(&a, &b, &limits);

        match (Dtw::new(constraints).align(&ts(a.clone()), &ts(b.clone())), expected) {
            (Ok(alignment), Some(exp)) => {
                feasible += 1;
                let got = alignment.distance().value();
                assert!(
                    (got - exp).abs() < 1e-10,
                    "case {case}: a={a:?} b={b:?} band={band} local={max_local} \
                     step={max_step}: got {got}, expected {exp}"
                );
                assert_path_well_formed(alignment.path(), n1, n2);
                assert!(alignment.path().longest_off_diagonal_run() <= max_step);
                let along: f64 = alignment
                    .path()
                    .steps()
                    .iter()
                    .map(|s| (a[s.a] - b[s.b]).abs())
                    .sum();
                assert!((along - exp).abs() < 1e-10, "case {case}: path cost {along}");
            }
            (Err(DtwError::NoFeasiblePath { .. }), None) => infeasible += 1,
            (got, exp) => panic!(
                "case {case}: a={a:?} b={b:?} band={band} local={max_local} \
                 step={max_step}: got {got:?}, expected {exp:?}"
            ),
        }
    }
    assert!(feasible > 0 && infeasible > 0, "{feasible} feasible, {infeasible} infeasible");
}

// ---------------------------------------------------------------------------
// g) self_alignment_is_zero_for_random_trajectories
// ---------------------------------------------------------------------------

#[test]
fn self_alignment_is_zero_for_random_trajectories() {
    let mut rng = ChaCha8Rng::seed_from_u64(1234);
    let constraints = AlignmentConstraints::new(0.1, 1.0, 1, 0.2).unwrap();
    for _ in 0..20 {
        let n = rng.gen_range(1..60);
        let a = random_trajectory(&mut rng, n);
        let alignment = Dtw::new(constraints).align(&a, &a).unwrap();
        assert_eq!(alignment.distance().value(), 0.0);
        assert!(alignment.path().steps().iter().all(|s| s.a == s.b));
        assert!(!alignment.is_length_flagged());
    }
}

// ---------------------------------------------------------------------------
// h) interpolate_then_align_then_pair
// ---------------------------------------------------------------------------

/// Gap-filled trajectories flow through alignment and pairing unchanged.
#[test]
fn interpolate_then_align_then_pair() {
    let subject = interpolate_missing(&[Some(0.0), None, Some(2.0), Some(3.0)]).unwrap();
    let reference = interpolate_missing(&[Some(0.0), Some(1.0), None, Some(3.0)]).unwrap();

    let a = ts(subject.clone());
    let b = ts(reference.clone());
    let alignment = Dtw::unconstrained().align(&a, &b).unwrap();
    assert_eq!(alignment.distance().value(), 0.0);

    let paired = pair_along_path(&subject, &reference, alignment.path()).unwrap();
    assert_eq!(paired.subject, paired.reference);
}
