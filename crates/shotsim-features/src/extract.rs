//! Subfeature trajectory extraction and preparation for alignment.

use shotsim_dtw::{
    InterpolateError, PlanarTrajectory, Point2, ScalarTrajectory, interpolate_missing,
    interpolate_planar,
};
use tracing::{debug, instrument};

use crate::error::{Side, Unavailability};
use crate::frame::{FrameSample, Hand, Joint, MotionSequence};
use crate::geometry::{angle_from_vertical, line_tilt, midpoint, vertex_angle};
use crate::taxonomy::Subfeature;

/// A subfeature trajectory as measured, with gaps where detection failed.
#[derive(Debug, Clone, PartialEq)]
pub enum RawTrajectory {
    /// One optional value per sample.
    Scalar(Vec<Option<f64>>),
    /// One optional coordinate per axis per sample.
    Planar {
        /// Horizontal coordinates.
        xs: Vec<Option<f64>>,
        /// Vertical coordinates.
        ys: Vec<Option<f64>>,
    },
}

impl RawTrajectory {
    /// Return the number of samples, missing or not.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Scalar(values) => values.len(),
            Self::Planar { xs, .. } => xs.len(),
        }
    }

    /// Return true if the trajectory has no samples at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn planar(points: impl Iterator<Item = Option<Point2>>) -> Self {
        let (xs, ys) = points.map(|p| (p.map(|p| p.x), p.map(|p| p.y))).unzip();
        Self::Planar { xs, ys }
    }
}

/// Gap-filled, validated trajectories for both motions, ready for DTW.
#[derive(Debug, Clone, PartialEq)]
pub enum PreparedPair {
    /// Scalar subfeature.
    Scalar {
        /// Subject trajectory.
        subject: ScalarTrajectory,
        /// Reference trajectory.
        reference: ScalarTrajectory,
    },
    /// Planar subfeature.
    Planar {
        /// Subject trajectory.
        subject: PlanarTrajectory,
        /// Reference trajectory.
        reference: PlanarTrajectory,
    },
}

impl PreparedPair {
    /// Return `(subject length, reference length)`.
    #[must_use]
    pub fn lens(&self) -> (usize, usize) {
        match self {
            Self::Scalar { subject, reference } => (subject.len(), reference.len()),
            Self::Planar { subject, reference } => (subject.len(), reference.len()),
        }
    }
}

/// Turns motions into per-subfeature trajectories.
///
/// Paired joints are read on each motion's own dominant side, so a left- and
/// a right-handed shooter compare shooting arm to shooting arm.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureExtractor;

impl FeatureExtractor {
    /// Create an extractor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Measure one subfeature over a motion, leaving gaps unfilled.
    #[must_use]
    pub fn raw(&self, motion: &MotionSequence, subfeature: Subfeature) -> RawTrajectory {
        let hand = motion.dominant_hand();
        let frames = motion.frames();
        let per_frame = |f: fn(&FrameSample, Hand) -> Option<f64>| {
            RawTrajectory::Scalar(frames.iter().map(|frame| f(frame, hand)).collect())
        };
        let joint_track = |joint: Joint| {
            RawTrajectory::planar(frames.iter().map(|frame| frame.joint(joint, hand)))
        };

        match subfeature {
            Subfeature::BallTrajectory => {
                RawTrajectory::planar(frames.iter().map(|f| f.ball().map(|b| b.position())))
            }
            Subfeature::WristTrajectory => joint_track(Joint::Wrist),
            Subfeature::ShoulderTrajectory => joint_track(Joint::Shoulder),
            Subfeature::ElbowTrajectory => joint_track(Joint::Elbow),
            Subfeature::BallWristDistance => per_frame(ball_wrist_distance),
            Subfeature::ElbowAngles => per_frame(elbow_angle),
            Subfeature::KneeAngles => per_frame(knee_angle),
            Subfeature::HipTrajectory => per_frame(hip_height),
            Subfeature::StanceStability => per_frame(stance_width),
            Subfeature::ShoulderTilt => per_frame(shoulder_tilt),
            Subfeature::TorsoAngle => per_frame(torso_angle),
            Subfeature::HeadStability => per_frame(head_height),
            Subfeature::PhaseDurations => {
                RawTrajectory::Scalar(phase_durations(frames).into_iter().map(Some).collect())
            }
            Subfeature::TransitionTiming => {
                RawTrajectory::Scalar(transition_timing(frames).into_iter().map(Some).collect())
            }
        }
    }

    /// Measure a subfeature on both motions and gap-fill each side independently.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`Unavailability::EmptyTrajectory`] | A side produced zero samples |
    /// | [`Unavailability::NoValidSamples`] | Every sample on a side is missing |
    #[instrument(skip(self, subject, reference, subfeature), fields(subfeature = %subfeature))]
    pub fn prepare(
        &self,
        subject: &MotionSequence,
        reference: &MotionSequence,
        subfeature: Subfeature,
    ) -> Result<PreparedPair, Unavailability> {
        let raw_subject = self.raw(subject, subfeature);
        let raw_reference = self.raw(reference, subfeature);

        let pair = match (raw_subject, raw_reference) {
            (RawTrajectory::Scalar(s), RawTrajectory::Scalar(r)) => PreparedPair::Scalar {
                subject: fill_scalar(&s, Side::Subject)?,
                reference: fill_scalar(&r, Side::Reference)?,
            },
            (RawTrajectory::Planar { xs: sx, ys: sy }, RawTrajectory::Planar { xs: rx, ys: ry }) => {
                PreparedPair::Planar {
                    subject: fill_planar(&sx, &sy, Side::Subject)?,
                    reference: fill_planar(&rx, &ry, Side::Reference)?,
                }
            }
            // Both sides are measured with the same subfeature, so kinds always agree.
            _ => return Err(Unavailability::NotApplicable),
        };

        let (n1, n2) = pair.lens();
        debug!(n1, n2, "prepared trajectories");
        Ok(pair)
    }
}

fn fill_scalar(raw: &[Option<f64>], side: Side) -> Result<ScalarTrajectory, Unavailability> {
    if raw.is_empty() {
        return Err(Unavailability::EmptyTrajectory { side });
    }
    let filled = interpolate_missing(raw).map_err(|e| unavailable(e, side))?;
    ScalarTrajectory::new(filled).map_err(|_| Unavailability::NoValidSamples { side })
}

fn fill_planar(
    xs: &[Option<f64>],
    ys: &[Option<f64>],
    side: Side,
) -> Result<PlanarTrajectory, Unavailability> {
    if xs.is_empty() {
        return Err(Unavailability::EmptyTrajectory { side });
    }
    let filled = interpolate_planar(xs, ys).map_err(|e| unavailable(e, side))?;
    PlanarTrajectory::new(filled).map_err(|_| Unavailability::NoValidSamples { side })
}

fn unavailable(err: InterpolateError, side: Side) -> Unavailability {
    match err {
        InterpolateError::NoValidSamples { .. } | InterpolateError::AxisLengthMismatch { .. } => {
            Unavailability::NoValidSamples { side }
        }
    }
}

fn ball_wrist_distance(frame: &FrameSample, hand: Hand) -> Option<f64> {
    let ball = frame.ball()?.position();
    let wrist = frame.joint(Joint::Wrist, hand)?;
    Some((ball.x - wrist.x).hypot(ball.y - wrist.y))
}

fn elbow_angle(frame: &FrameSample, hand: Hand) -> Option<f64> {
    vertex_angle(
        frame.joint(Joint::Shoulder, hand)?,
        frame.joint(Joint::Elbow, hand)?,
        frame.joint(Joint::Wrist, hand)?,
    )
}

fn knee_angle(frame: &FrameSample, hand: Hand) -> Option<f64> {
    vertex_angle(
        frame.joint(Joint::Hip, hand)?,
        frame.joint(Joint::Knee, hand)?,
        frame.joint(Joint::Ankle, hand)?,
    )
}

fn hip_height(frame: &FrameSample, _: Hand) -> Option<f64> {
    let left = frame.joint(Joint::Hip, Hand::Left)?;
    let right = frame.joint(Joint::Hip, Hand::Right)?;
    Some((left.y + right.y) / 2.0)
}

fn stance_width(frame: &FrameSample, _: Hand) -> Option<f64> {
    let left = frame.joint(Joint::Ankle, Hand::Left)?;
    let right = frame.joint(Joint::Ankle, Hand::Right)?;
    Some((left.x - right.x).abs())
}

fn shoulder_tilt(frame: &FrameSample, _: Hand) -> Option<f64> {
    line_tilt(
        frame.joint(Joint::Shoulder, Hand::Left)?,
        frame.joint(Joint::Shoulder, Hand::Right)?,
    )
}

fn torso_angle(frame: &FrameSample, _: Hand) -> Option<f64> {
    let hips = midpoint(
        frame.joint(Joint::Hip, Hand::Left)?,
        frame.joint(Joint::Hip, Hand::Right)?,
    );
    let shoulders = midpoint(
        frame.joint(Joint::Shoulder, Hand::Left)?,
        frame.joint(Joint::Shoulder, Hand::Right)?,
    );
    angle_from_vertical(hips, shoulders)
}

fn head_height(frame: &FrameSample, _: Hand) -> Option<f64> {
    frame.keypoint("nose").map(|k| k.y)
}

/// Length of each run of identical phase labels as a fraction of all frames.
fn phase_durations(frames: &[FrameSample]) -> Vec<f64> {
    let total = frames.len() as f64;
    let mut durations = Vec::new();
    let mut run = 0usize;
    for (k, frame) in frames.iter().enumerate() {
        run += 1;
        let run_ends = frames.get(k + 1).is_none_or(|next| next.phase() != frame.phase());
        if run_ends {
            durations.push(run as f64 / total);
            run = 0;
        }
    }
    durations
}

/// Relative position `k / n` of every frame whose label differs from the previous one.
fn transition_timing(frames: &[FrameSample]) -> Vec<f64> {
    let total = frames.len() as f64;
    frames
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| pair[0].phase() != pair[1].phase())
        .map(|(k, _)| (k + 1) as f64 / total)
        .collect()
}
