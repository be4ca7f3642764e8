//! JSON motion reader with full input validation.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use shotsim_features::{BallPosition, FrameSample, Hand, Keypoint, MotionSequence, Phase};
use tracing::{debug, info, instrument, warn};

use crate::IoError;

/// Reads one shooting motion from a JSON file.
///
/// Expected format:
///
/// ```json
/// {
///   "metadata": { "dominant_hand": "right" },
///   "frames": [
///     { "index": 0, "phase": "Set-up",
///       "keypoints": { "right_wrist": { "x": 0.6, "y": 0.3, "confidence": 0.9 } },
///       "ball": { "center_x": 0.62, "center_y": 0.28 } }
///   ]
/// }
/// ```
///
/// `metadata` or its `dominant_hand` may be omitted, in which case the shooter
/// is assumed right-handed and a warning is logged.
/// `ball` may be `null` or absent. A keypoint name repeated within one frame
/// keeps its last value.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::JsonParse`] | Malformed JSON or wrong document shape |
/// | [`IoError::EmptySequence`] | Zero frames |
/// | [`IoError::NonMonotonicFrameIndex`] | Frame indices not strictly increasing |
/// | [`IoError::NonFiniteCoordinate`] | A keypoint or ball value is NaN or infinite |
/// | [`IoError::UnknownLabel`] | Unknown phase label or dominant hand |
pub struct MotionReader {
    path: PathBuf,
}

impl MotionReader {
    /// Create a new reader for the given JSON file path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Read and validate the file, returning a [`MotionSequence`].
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<MotionSequence, IoError> {
        let file = File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;
        let raw: RawMotion =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| IoError::JsonParse {
                path: self.path.clone(),
                source: e,
            })?;
        debug!(n_frames = raw.frames.len(), "parsed motion document");

        let motion = self.validate(raw)?;
        info!(
            n_frames = motion.len(),
            dominant_hand = motion.dominant_hand().as_str(),
            "motion loaded"
        );
        Ok(motion)
    }

    fn validate(&self, raw: RawMotion) -> Result<MotionSequence, IoError> {
        if raw.frames.is_empty() {
            return Err(IoError::EmptySequence {
                path: self.path.clone(),
            });
        }

        let hand = match raw.metadata.and_then(|meta| meta.dominant_hand) {
            Some(name) => name
                .parse::<Hand>()
                .map_err(|e| self.unknown("dominant_hand", e.name))?,
            None => {
                warn!(path = %self.path.display(), "dominant_hand missing, assuming right");
                Hand::default()
            }
        };

        let mut frames = Vec::with_capacity(raw.frames.len());
        let mut previous: Option<u64> = None;
        for (position, raw_frame) in raw.frames.into_iter().enumerate() {
            if let Some(previous) = previous
                && raw_frame.index <= previous
            {
                return Err(IoError::NonMonotonicFrameIndex {
                    path: self.path.clone(),
                    position,
                    previous,
                    index: raw_frame.index,
                });
            }
            previous = Some(raw_frame.index);
            frames.push(self.frame(raw_frame)?);
        }

        Ok(MotionSequence::new(hand, frames))
    }

    fn frame(&self, raw: RawFrame) -> Result<FrameSample, IoError> {
        let phase = raw
            .phase
            .parse::<Phase>()
            .map_err(|e| self.unknown("phase", e.name))?;
        let mut frame = FrameSample::new(raw.index, phase);

        for (name, kp) in raw.keypoints {
            if !(kp.x.is_finite() && kp.y.is_finite() && kp.confidence.is_finite()) {
                return Err(self.non_finite(raw.index, name));
            }
            frame = frame.with_keypoint(name, Keypoint::new(kp.x, kp.y, kp.confidence));
        }

        if let Some(ball) = raw.ball {
            if !(ball.center_x.is_finite() && ball.center_y.is_finite()) {
                return Err(self.non_finite(raw.index, "ball".to_string()));
            }
            frame = frame.with_ball(BallPosition::new(ball.center_x, ball.center_y));
        }
        Ok(frame)
    }

    fn unknown(&self, kind: &'static str, value: String) -> IoError {
        IoError::UnknownLabel {
            path: self.path.clone(),
            kind,
            value,
        }
    }

    fn non_finite(&self, frame: u64, field: String) -> IoError {
        IoError::NonFiniteCoordinate {
            path: self.path.clone(),
            frame,
            field,
        }
    }
}

// --- Raw document structs ---

#[derive(Deserialize)]
struct RawMotion {
    #[serde(default)]
    metadata: Option<RawMetadata>,
    frames: Vec<RawFrame>,
}

#[derive(Deserialize)]
struct RawMetadata {
    #[serde(default)]
    dominant_hand: Option<String>,
}

#[derive(Deserialize)]
struct RawFrame {
    index: u64,
    phase: String,
    #[serde(default)]
    keypoints: HashMap<String, RawKeypoint>,
    #[serde(default)]
    ball: Option<RawBall>,
}

#[derive(Deserialize)]
struct RawKeypoint {
    x: f64,
    y: f64,
    confidence: f64,
}

#[derive(Deserialize)]
struct RawBall {
    center_x: f64,
    center_y: f64,
}
