//! Error types for shotsim-score.

/// Errors from configuration validation. All are fatal at load time.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Returned when a weight table does not sum to 1.0 within tolerance.
    #[error("weights in {table} sum to {sum}, expected 1.0")]
    WeightSum {
        /// Name of the weight table.
        table: String,
        /// Actual sum of the weights.
        sum: f64,
    },

    /// Returned when a weight is negative or non-finite.
    #[error("weight for \"{key}\" in {table} must be non-negative and finite, got {value}")]
    InvalidWeight {
        /// Name of the weight table.
        table: String,
        /// Key whose weight is invalid.
        key: String,
        /// The invalid weight.
        value: f64,
    },

    /// Returned when a table contains a key outside its declared set.
    #[error("unknown key \"{key}\" in {table}")]
    UnknownKey {
        /// Name of the table.
        table: String,
        /// The unexpected key.
        key: String,
    },

    /// Returned when a declared key is absent from a table.
    #[error("missing key \"{key}\" in {table}")]
    MissingKey {
        /// Name of the table.
        table: String,
        /// The absent key.
        key: String,
    },

    /// Returned when a feature class has no constraint profile.
    #[error("no profile for feature class \"{class}\"")]
    MissingProfile {
        /// The feature class lacking a profile.
        class: String,
    },

    /// Returned when a profile has an out-of-range constraint or conversion value.
    #[error("invalid profile for feature class \"{class}\": {reason}")]
    InvalidProfile {
        /// The feature class of the profile.
        class: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Returned when the grade table has no entries.
    #[error("grade table must have at least one entry")]
    EmptyGradeTable,

    /// Returned when grade thresholds are non-finite or not strictly descending.
    #[error("grade \"{grade}\" threshold {threshold} must be finite and below the previous threshold")]
    GradeOrder {
        /// The offending grade label.
        grade: String,
        /// Its threshold.
        threshold: f64,
    },

    /// Returned when confidence thresholds are outside `[0, 1]` or not ordered high >= medium >= low.
    #[error("confidence thresholds must satisfy 1 >= high >= medium >= low >= 0, got high={high}, medium={medium}, low={low}")]
    InvalidConfidence {
        /// High threshold.
        high: f64,
        /// Medium threshold.
        medium: f64,
        /// Low threshold.
        low: f64,
    },
}

/// Errors from comparing motions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompareError {
    /// Returned when no subfeature could be scored, so no overall score exists.
    #[error("no subfeature could be compared ({declared} declared, all unavailable)")]
    NoAvailableSubfeatures {
        /// Number of declared `(group, subfeature)` pairs.
        declared: usize,
    },

    /// Returned when ranking is asked to choose among zero references.
    #[error("at least one reference motion is required")]
    NoReferences,
}
