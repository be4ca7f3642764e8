//! Constrained DTW alignment for motion trajectories.
//!
//! Pure math library with zero I/O. Provides gap interpolation for trajectories
//! with missing samples, validated scalar and planar trajectories, DTW
//! alignment under a Sakoe-Chiba band with local-distance and step caps,
//! warping path extraction, and index pairing of aligned sequences.

mod constraint;
mod distance;
mod dtw;
mod error;
mod interpolate;
mod pairing;
mod path;
mod series;

pub use constraint::AlignmentConstraints;
pub use distance::DtwDistance;
pub use dtw::{Alignment, Dtw};
pub use error::{ConstraintError, DtwError, InterpolateError};
pub use interpolate::{interpolate_missing, interpolate_planar};
pub use pairing::{AlignedPair, pair_along_path};
pub use path::{WarpingPath, WarpingStep};
pub use series::{PlanarTrajectory, Point2, Sample, ScalarTrajectory, Trajectory};
