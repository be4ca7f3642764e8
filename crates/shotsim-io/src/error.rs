//! I/O error types for shotsim-io.

use std::path::PathBuf;

use shotsim_dtw::DtwError;
use shotsim_score::ConfigError;

/// Errors from reading motions and configuration, and writing results.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when the input file does not exist or is unreadable.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when a JSON document is malformed or has the wrong shape.
    #[error("JSON parse error in {path}")]
    JsonParse {
        /// Path to the JSON file.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// Returned when a motion file contains zero frames.
    #[error("motion in {path} has no frames")]
    EmptySequence {
        /// Path to the motion file.
        path: PathBuf,
    },

    /// Returned when a frame index does not exceed the previous one.
    #[error("frame index {index} at position {position} in {path} does not follow {previous}")]
    NonMonotonicFrameIndex {
        /// Path to the motion file.
        path: PathBuf,
        /// Zero-based position of the offending frame.
        position: usize,
        /// Index of the previous frame.
        previous: u64,
        /// Index of the offending frame.
        index: u64,
    },

    /// Returned when a keypoint or ball coordinate is NaN or infinite.
    #[error("non-finite coordinate for {field} in frame {frame} of {path}")]
    NonFiniteCoordinate {
        /// Path to the motion file.
        path: PathBuf,
        /// Index of the frame.
        frame: u64,
        /// Keypoint name, or `ball`.
        field: String,
    },

    /// Returned when a phase label or dominant hand is not recognised.
    #[error("unknown {kind} \"{value}\" in {path}")]
    UnknownLabel {
        /// Path to the motion file.
        path: PathBuf,
        /// What was being parsed (`phase` or `dominant_hand`).
        kind: &'static str,
        /// The unrecognised value.
        value: String,
    },

    /// Returned when a configuration file fails validation.
    #[error("invalid scoring configuration in {path}")]
    Config {
        /// Path to the configuration file.
        path: PathBuf,
        /// The validation failure.
        source: ConfigError,
    },

    /// Returned when the comparison name contains characters outside `[a-zA-Z0-9_-]`.
    #[error("invalid comparison name \"{name}\": must match [a-zA-Z0-9_-]+")]
    InvalidComparisonName {
        /// The invalid name.
        name: String,
    },

    /// Returned when the output directory cannot be created.
    #[error("cannot create output directory {path}")]
    OutputDirCreate {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when a result file cannot be written.
    #[error("cannot write file {path}")]
    WriteFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when a result cannot be serialized to JSON.
    #[error("cannot serialize result for {path}")]
    Serialize {
        /// Path the artifact was destined for.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// Returned when the alignment CSV cannot be written.
    #[error("CSV write error in {path}")]
    Csv {
        /// Path to the CSV file.
        path: PathBuf,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// Returned when a stored path does not fit its trajectories.
    #[error("alignment of {subfeature} does not fit its trajectories")]
    Pairing {
        /// Subfeature whose path failed to pair.
        subfeature: String,
        /// Underlying pairing error.
        source: DtwError,
    },
}
