//! Criterion benchmarks for shotsim-score: full comparison and ranking of
//! synthetic shots under the reference configuration.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use shotsim_features::{BallPosition, FrameSample, Hand, Keypoint, MotionSequence, Phase};
use shotsim_score::{Comparator, ScoringConfig};

const LABELS: [Phase; 5] = [
    Phase::SetUp,
    Phase::Loading,
    Phase::Rising,
    Phase::Release,
    Phase::FollowThrough,
];

fn make_shot(rng: &mut ChaCha8Rng, n: usize) -> MotionSequence {
    let arc = rng.gen_range(0.6..1.2);
    let frames = (0..n)
        .map(|i| {
            let t = i as f64 / (n - 1) as f64;
            let jitter = |rng: &mut ChaCha8Rng| rng.gen_range(-0.005..0.005);
            let kp = |x: f64, y: f64| Keypoint::new(x, y, 0.9);
            FrameSample::new(i as u64, LABELS[(t * 4.0).round() as usize])
                .with_keypoint("nose", kp(0.5, 0.1 + jitter(rng)))
                .with_keypoint("right_shoulder", kp(0.6, 0.25))
                .with_keypoint("left_shoulder", kp(0.4, 0.26))
                .with_keypoint("right_elbow", kp(0.65, 0.4 - 0.2 * arc * t + jitter(rng)))
                .with_keypoint("right_wrist", kp(0.62, 0.35 - 0.3 * arc * t + jitter(rng)))
                .with_keypoint("right_hip", kp(0.58, 0.55))
                .with_keypoint("left_hip", kp(0.42, 0.55))
                .with_keypoint("right_knee", kp(0.6, 0.72 - 0.02 * t))
                .with_keypoint("left_knee", kp(0.4, 0.72))
                .with_keypoint("right_ankle", kp(0.6, 0.9))
                .with_keypoint("left_ankle", kp(0.4, 0.9))
                .with_ball(BallPosition::new(0.63, 0.3 - 0.3 * arc * t + jitter(rng)))
        })
        .collect();
    MotionSequence::new(Hand::Right, frames)
}

fn bench_compare(c: &mut Criterion) {
    let config = ScoringConfig::reference().unwrap();
    let comparator = Comparator::new(&config);
    let mut rng = ChaCha8Rng::seed_from_u64(11);

    let mut group = c.benchmark_group("compare");
    for &len in &[30usize, 60, 120] {
        let subject = make_shot(&mut rng, len);
        let reference = make_shot(&mut rng, len + len / 10);
        group.bench_with_input(
            BenchmarkId::from_parameter(len),
            &(subject, reference),
            |bencher, (s, r)| bencher.iter(|| comparator.compare(s, r)),
        );
    }
    group.finish();
}

fn bench_rank(c: &mut Criterion) {
    let config = ScoringConfig::reference().unwrap();
    let comparator = Comparator::new(&config);
    let mut rng = ChaCha8Rng::seed_from_u64(12);
    let subject = make_shot(&mut rng, 60);
    let references: Vec<_> = (0..8).map(|_| make_shot(&mut rng, 60)).collect();

    c.bench_function("rank_8_references_60_frames", |bencher| {
        bencher.iter(|| comparator.rank(&subject, &references));
    });
}

criterion_group!(benches, bench_compare, bench_rank);
criterion_main!(benches);
