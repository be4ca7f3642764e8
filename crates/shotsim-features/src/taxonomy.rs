//! Names of everything that gets compared and weighted.
//!
//! Feature groups contain subfeatures; each subfeature belongs to one feature
//! class, and the class selects the DTW constraints and similarity conversion
//! used for it. Scoring phases are the windows over which phase scores run.

use std::fmt;
use std::str::FromStr;

use crate::error::TaxonomyError;

/// Generate `as_str`, `index`, `Display` and `FromStr` from a name table.
macro_rules! named_enum {
    ($ty:ident, $kind:literal, { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            /// Return the canonical name used in configuration and reports.
            #[must_use]
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }

            /// Return the position of this member in declaration order.
            #[must_use]
            pub fn index(&self) -> usize {
                *self as usize
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = TaxonomyError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(Self::$variant),)+
                    _ => Err(TaxonomyError { kind: $kind, name: s.to_string() }),
                }
            }
        }
    };
}

/// One of the five biomechanical aspects of a shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeatureGroup {
    BallWristTrajectory,
    ShootingArmKinematics,
    LowerBodyStability,
    PhaseTimingPatterns,
    BodyAlignment,
}

named_enum!(FeatureGroup, "feature group", {
    BallWristTrajectory => "ball_wrist_trajectory",
    ShootingArmKinematics => "shooting_arm_kinematics",
    LowerBodyStability => "lower_body_stability",
    PhaseTimingPatterns => "phase_timing_patterns",
    BodyAlignment => "body_alignment",
});

impl FeatureGroup {
    /// Every feature group, in report order.
    pub const ALL: [FeatureGroup; 5] = [
        FeatureGroup::BallWristTrajectory,
        FeatureGroup::ShootingArmKinematics,
        FeatureGroup::LowerBodyStability,
        FeatureGroup::PhaseTimingPatterns,
        FeatureGroup::BodyAlignment,
    ];

    /// Return the subfeatures declared for this group.
    ///
    /// `wrist_trajectory` is declared by both the ball-wrist and the
    /// shooting-arm groups and is scored independently in each.
    #[must_use]
    pub fn subfeatures(&self) -> &'static [Subfeature] {
        use Subfeature::*;
        match self {
            Self::BallWristTrajectory => &[BallTrajectory, WristTrajectory, BallWristDistance],
            Self::ShootingArmKinematics => &[
                ElbowAngles,
                ShoulderTrajectory,
                ElbowTrajectory,
                WristTrajectory,
            ],
            Self::LowerBodyStability => &[HipTrajectory, KneeAngles, StanceStability],
            Self::PhaseTimingPatterns => &[PhaseDurations, TransitionTiming],
            Self::BodyAlignment => &[ShoulderTilt, TorsoAngle, HeadStability],
        }
    }

    /// Return every declared `(group, subfeature)` pair.
    pub fn declared_pairs() -> impl Iterator<Item = (FeatureGroup, Subfeature)> {
        Self::ALL
            .into_iter()
            .flat_map(|g| g.subfeatures().iter().map(move |&s| (g, s)))
    }
}

/// Whether a subfeature is a scalar or a 2D-point trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleKind {
    Scalar,
    Planar,
}

/// A named per-frame measurement compared between two motions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Subfeature {
    BallTrajectory,
    WristTrajectory,
    BallWristDistance,
    ElbowAngles,
    ShoulderTrajectory,
    ElbowTrajectory,
    HipTrajectory,
    KneeAngles,
    StanceStability,
    PhaseDurations,
    TransitionTiming,
    ShoulderTilt,
    TorsoAngle,
    HeadStability,
}

named_enum!(Subfeature, "subfeature", {
    BallTrajectory => "ball_trajectory",
    WristTrajectory => "wrist_trajectory",
    BallWristDistance => "ball_wrist_distance",
    ElbowAngles => "elbow_angles",
    ShoulderTrajectory => "shoulder_trajectory",
    ElbowTrajectory => "elbow_trajectory",
    HipTrajectory => "hip_trajectory",
    KneeAngles => "knee_angles",
    StanceStability => "stance_stability",
    PhaseDurations => "phase_durations",
    TransitionTiming => "transition_timing",
    ShoulderTilt => "shoulder_tilt",
    TorsoAngle => "torso_angle",
    HeadStability => "head_stability",
});

impl Subfeature {
    /// Return the feature class whose constraints and conversion apply.
    #[must_use]
    pub fn feature_class(&self) -> FeatureClass {
        match self {
            Self::BallTrajectory
            | Self::WristTrajectory
            | Self::ShoulderTrajectory
            | Self::ElbowTrajectory => FeatureClass::Trajectory2d,
            Self::BallWristDistance => FeatureClass::BallWristSpecial,
            Self::ElbowAngles | Self::KneeAngles | Self::ShoulderTilt | Self::TorsoAngle => {
                FeatureClass::Kinematics
            }
            Self::HipTrajectory | Self::StanceStability | Self::HeadStability => {
                FeatureClass::Stability
            }
            Self::PhaseDurations | Self::TransitionTiming => FeatureClass::Timing,
        }
    }

    /// Return whether the trajectory holds scalars or points.
    #[must_use]
    pub fn sample_kind(&self) -> SampleKind {
        match self.feature_class() {
            FeatureClass::Trajectory2d => SampleKind::Planar,
            _ => SampleKind::Scalar,
        }
    }

    /// Return true for subfeatures derived from the phase segmentation itself.
    ///
    /// These describe the whole motion and have no meaning inside a single
    /// phase window.
    #[must_use]
    pub fn is_timing(&self) -> bool {
        self.feature_class() == FeatureClass::Timing
    }
}

/// A constraint and conversion profile shared by similar subfeatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeatureClass {
    Trajectory2d,
    BallWristSpecial,
    Kinematics,
    Stability,
    Timing,
}

named_enum!(FeatureClass, "feature class", {
    Trajectory2d => "trajectory_2d",
    BallWristSpecial => "ball_wrist_special",
    Kinematics => "kinematics",
    Stability => "stability",
    Timing => "timing",
});

impl FeatureClass {
    /// Every feature class.
    pub const ALL: [FeatureClass; 5] = [
        FeatureClass::Trajectory2d,
        FeatureClass::BallWristSpecial,
        FeatureClass::Kinematics,
        FeatureClass::Stability,
        FeatureClass::Timing,
    ];
}

/// A scoring window over the shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScoringPhase {
    Setup,
    Loading,
    Rising,
    Release,
    FollowThrough,
}

named_enum!(ScoringPhase, "scoring phase", {
    Setup => "Setup",
    Loading => "Loading",
    Rising => "Rising",
    Release => "Release",
    FollowThrough => "Follow-through",
});

impl ScoringPhase {
    /// Every scoring phase, in shot order.
    pub const ALL: [ScoringPhase; 5] = [
        ScoringPhase::Setup,
        ScoringPhase::Loading,
        ScoringPhase::Rising,
        ScoringPhase::Release,
        ScoringPhase::FollowThrough,
    ];
}
