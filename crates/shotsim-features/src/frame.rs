//! Per-frame motion model.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use shotsim_dtw::Point2;

use crate::error::TaxonomyError;
use crate::taxonomy::ScoringPhase;

/// A detected body keypoint in normalized image coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keypoint {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
    /// Detector confidence in `[0, 1]`.
    pub confidence: f64,
}

impl Keypoint {
    /// Create a keypoint.
    #[must_use]
    pub fn new(x: f64, y: f64, confidence: f64) -> Self {
        Self { x, y, confidence }
    }

    /// Return the keypoint position.
    #[must_use]
    pub fn position(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }
}

/// Detected ball center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallPosition {
    /// Horizontal center coordinate.
    pub center_x: f64,
    /// Vertical center coordinate.
    pub center_y: f64,
}

impl BallPosition {
    /// Create a ball position.
    #[must_use]
    pub fn new(center_x: f64, center_y: f64) -> Self {
        Self { center_x, center_y }
    }

    /// Return the ball center.
    #[must_use]
    pub fn position(&self) -> Point2 {
        Point2::new(self.center_x, self.center_y)
    }
}

/// The shooter's dominant hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Hand {
    /// Left-handed shooter.
    Left,
    /// Right-handed shooter.
    #[default]
    Right,
}

impl Hand {
    /// Return `"left"` or `"right"`.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl FromStr for Hand {
    type Err = TaxonomyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            _ => Err(TaxonomyError {
                kind: "hand",
                name: s.to_string(),
            }),
        }
    }
}

/// A paired body joint, resolved to a keypoint name by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Joint {
    Shoulder,
    Elbow,
    Wrist,
    Hip,
    Knee,
    Ankle,
}

impl Joint {
    /// Return the keypoint name of this joint on the given side.
    #[must_use]
    pub fn keypoint_name(self, side: Hand) -> &'static str {
        match (side, self) {
            (Hand::Left, Self::Shoulder) => "left_shoulder",
            (Hand::Left, Self::Elbow) => "left_elbow",
            (Hand::Left, Self::Wrist) => "left_wrist",
            (Hand::Left, Self::Hip) => "left_hip",
            (Hand::Left, Self::Knee) => "left_knee",
            (Hand::Left, Self::Ankle) => "left_ankle",
            (Hand::Right, Self::Shoulder) => "right_shoulder",
            (Hand::Right, Self::Elbow) => "right_elbow",
            (Hand::Right, Self::Wrist) => "right_wrist",
            (Hand::Right, Self::Hip) => "right_hip",
            (Hand::Right, Self::Knee) => "right_knee",
            (Hand::Right, Self::Ankle) => "right_ankle",
        }
    }
}

/// Phase label produced by the upstream phase segmenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    General,
    SetUp,
    Loading,
    LoadingRising,
    Rising,
    Release,
    FollowThrough,
}

impl Phase {
    /// Every phase label, in shot order.
    pub const ALL: [Phase; 7] = [
        Phase::General,
        Phase::SetUp,
        Phase::Loading,
        Phase::LoadingRising,
        Phase::Rising,
        Phase::Release,
        Phase::FollowThrough,
    ];

    /// Return the label as it appears in motion files.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "General",
            Self::SetUp => "Set-up",
            Self::Loading => "Loading",
            Self::LoadingRising => "Loading-Rising",
            Self::Rising => "Rising",
            Self::Release => "Release",
            Self::FollowThrough => "Follow-through",
        }
    }

    /// Return true if frames with this label belong to the scoring window.
    ///
    /// `Loading-Rising` frames count toward both the loading and the rising
    /// windows; `General` frames belong to no window.
    #[must_use]
    pub fn in_window(&self, window: ScoringPhase) -> bool {
        matches!(
            (window, self),
            (ScoringPhase::Setup, Self::SetUp)
                | (ScoringPhase::Loading, Self::Loading | Self::LoadingRising)
                | (ScoringPhase::Rising, Self::Rising | Self::LoadingRising)
                | (ScoringPhase::Release, Self::Release)
                | (ScoringPhase::FollowThrough, Self::FollowThrough)
        )
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = TaxonomyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| TaxonomyError {
                kind: "phase",
                name: s.to_string(),
            })
    }
}

/// One frame of a shooting motion.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSample {
    index: u64,
    phase: Phase,
    keypoints: HashMap<String, Keypoint>,
    ball: Option<BallPosition>,
}

impl FrameSample {
    /// Create a frame with no keypoints and no ball.
    #[must_use]
    pub fn new(index: u64, phase: Phase) -> Self {
        Self {
            index,
            phase,
            keypoints: HashMap::new(),
            ball: None,
        }
    }

    /// Add or replace a keypoint.
    #[must_use]
    pub fn with_keypoint(mut self, name: impl Into<String>, keypoint: Keypoint) -> Self {
        self.keypoints.insert(name.into(), keypoint);
        self
    }

    /// Set the ball position.
    #[must_use]
    pub fn with_ball(mut self, ball: BallPosition) -> Self {
        self.ball = Some(ball);
        self
    }

    /// Return the source frame index.
    #[must_use]
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Return the phase label.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Return the keypoint with the given name, if detected.
    #[must_use]
    pub fn keypoint(&self, name: &str) -> Option<&Keypoint> {
        self.keypoints.get(name)
    }

    /// Return the position of a paired joint on the given side, if detected.
    #[must_use]
    pub fn joint(&self, joint: Joint, side: Hand) -> Option<Point2> {
        self.keypoint(joint.keypoint_name(side)).map(Keypoint::position)
    }

    /// Return all detected keypoints.
    #[must_use]
    pub fn keypoints(&self) -> &HashMap<String, Keypoint> {
        &self.keypoints
    }

    /// Return the ball position, if detected.
    #[must_use]
    pub fn ball(&self) -> Option<BallPosition> {
        self.ball
    }
}

/// A complete shooting motion: dominant hand plus ordered frames.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionSequence {
    dominant_hand: Hand,
    frames: Vec<FrameSample>,
}

impl MotionSequence {
    /// Create a motion from frames already in index order.
    #[must_use]
    pub fn new(dominant_hand: Hand, frames: Vec<FrameSample>) -> Self {
        Self {
            dominant_hand,
            frames,
        }
    }

    /// Return the dominant hand.
    #[must_use]
    pub fn dominant_hand(&self) -> Hand {
        self.dominant_hand
    }

    /// Return the frames.
    #[must_use]
    pub fn frames(&self) -> &[FrameSample] {
        &self.frames
    }

    /// Return the number of frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Return true if the motion has no frames.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Return the sub-motion of frames whose label falls in `window`.
    ///
    /// Returns `None` when no frame does.
    #[must_use]
    pub fn window(&self, window: ScoringPhase) -> Option<MotionSequence> {
        let frames: Vec<FrameSample> = self
            .frames
            .iter()
            .filter(|f| f.phase.in_window(window))
            .cloned()
            .collect();
        if frames.is_empty() {
            return None;
        }
        Some(Self::new(self.dominant_hand, frames))
    }
}
