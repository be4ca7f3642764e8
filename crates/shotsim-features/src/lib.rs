//! Subfeature trajectory extraction for basketball shooting motions.
//!
//! Pure library with zero I/O. Holds the per-frame motion model (keypoints,
//! ball position, phase labels, dominant hand), the feature taxonomy that
//! names every comparable subfeature, joint geometry, and the extractor that
//! turns two motions into interpolated trajectory pairs ready for DTW.

mod error;
mod extract;
mod frame;
mod geometry;
mod taxonomy;

pub use error::{Side, TaxonomyError, Unavailability};
pub use extract::{FeatureExtractor, PreparedPair, RawTrajectory};
pub use frame::{BallPosition, FrameSample, Hand, Joint, Keypoint, MotionSequence, Phase};
pub use geometry::{angle_from_vertical, line_tilt, midpoint, vertex_angle};
pub use taxonomy::{FeatureClass, FeatureGroup, SampleKind, ScoringPhase, Subfeature};
