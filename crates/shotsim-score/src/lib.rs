//! Similarity scoring, grading and ranking of shooting motions.
//!
//! Pure library with zero I/O. A validated [`ScoringConfig`] carries the
//! per-class alignment profiles and the weight, grade and confidence tables.
//! A [`Comparator`] aligns every declared subfeature of two motions, converts
//! distances to similarities and aggregates them into group, overall and
//! per-phase scores.

mod compare;
mod confidence;
mod config;
mod error;
mod grade;
mod profile;
mod result;
mod scorer;
mod similarity;
mod weights;

pub use compare::Comparator;
pub use confidence::{ConfidenceLevel, ConfidenceThresholds};
pub use config::ScoringConfig;
pub use error::{CompareError, ConfigError};
pub use grade::{GradeTable, GradeThreshold};
pub use profile::{FeatureClassProfile, SimilarityConversion};
pub use result::{
    ComparisonResult, GroupScore, PhaseScore, Ranking, SubfeatureOutcome, SubfeatureScore,
};
pub use scorer::Scorer;
pub use similarity::Similarity;
pub use weights::{WEIGHT_SUM_TOLERANCE, WeightTable, WeightedScore};
