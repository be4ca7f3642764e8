//! Result types for motion comparison and ranking.

use shotsim_dtw::Alignment;
use shotsim_features::{
    FeatureClass, FeatureGroup, PreparedPair, ScoringPhase, Subfeature, Unavailability,
};

use crate::confidence::ConfidenceLevel;
use crate::error::CompareError;
use crate::similarity::Similarity;
use crate::weights::WeightedScore;

/// A subfeature that was aligned and scored.
#[derive(Debug, Clone, PartialEq)]
pub struct SubfeatureScore {
    /// Feature class whose profile was applied.
    pub class: FeatureClass,
    /// DTW outcome: distances, path and length flag.
    pub alignment: Alignment,
    /// Similarity derived from the normalized distance.
    pub similarity: Similarity,
    /// The gap-filled trajectories that were aligned.
    pub trajectories: PreparedPair,
}

/// The fate of one declared `(group, subfeature)` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct SubfeatureOutcome {
    /// Declaring group.
    pub group: FeatureGroup,
    /// The subfeature.
    pub subfeature: Subfeature,
    /// The score, or why none could be computed.
    pub status: Result<SubfeatureScore, Unavailability>,
}

impl SubfeatureOutcome {
    /// Return the similarity if the subfeature was scored.
    #[must_use]
    pub fn similarity(&self) -> Option<Similarity> {
        self.status.as_ref().ok().map(|s| s.similarity)
    }

    /// Return true if the subfeature was scored.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.status.is_ok()
    }
}

/// Aggregated score of one feature group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupScore {
    /// The group.
    pub group: FeatureGroup,
    /// Renormalized mean of its available subfeatures, if any.
    pub score: Option<WeightedScore>,
}

/// Scores restricted to one phase window.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseScore {
    /// The phase window.
    pub phase: ScoringPhase,
    /// Group-weighted score inside the window. `None` if the phase is absent
    /// from either motion or nothing inside it could be scored.
    pub score: Option<WeightedScore>,
    /// Per-group scores inside the window; empty if the phase is absent.
    pub groups: Vec<GroupScore>,
}

/// Everything computed when comparing a subject motion to one reference.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonResult {
    /// Whole-motion outcome of every declared `(group, subfeature)` pair.
    pub subfeatures: Vec<SubfeatureOutcome>,
    /// Whole-motion score of every feature group.
    pub groups: Vec<GroupScore>,
    /// Group-weighted score over the whole motion.
    pub overall: WeightedScore,
    /// Per-phase-window scores, in shot order.
    pub phases: Vec<PhaseScore>,
    /// Phase-weighted combination of the phase scores, if any phase scored.
    pub phase_weighted: Option<WeightedScore>,
    /// Letter grade of the overall score.
    pub grade: String,
    /// Confidence from subfeature availability and length flags.
    pub confidence: ConfidenceLevel,
    /// Number of scored `(group, subfeature)` pairs.
    ///
    /// Counted per pair, not per distinct subfeature: `wrist_trajectory` is
    /// declared by two groups and counts twice.
    pub available: usize,
    /// Number of declared `(group, subfeature)` pairs, 15 for the fixed
    /// taxonomy of 14 distinct subfeatures.
    pub declared: usize,
    /// True if any scored subfeature had a length-flagged alignment.
    pub length_flagged: bool,
}

impl ComparisonResult {
    /// Return the fraction of declared `(group, subfeature)` pairs that were
    /// scored. A subfeature declared by two groups weighs twice.
    #[must_use]
    pub fn available_fraction(&self) -> f64 {
        if self.declared == 0 {
            return 0.0;
        }
        self.available as f64 / self.declared as f64
    }

    /// Return the whole-motion score of `group`.
    #[must_use]
    pub fn group(&self, group: FeatureGroup) -> Option<&GroupScore> {
        self.groups.iter().find(|g| g.group == group)
    }

    /// Return the whole-motion outcome of `subfeature` as declared by `group`.
    #[must_use]
    pub fn subfeature(
        &self,
        group: FeatureGroup,
        subfeature: Subfeature,
    ) -> Option<&SubfeatureOutcome> {
        self.subfeatures
            .iter()
            .find(|o| o.group == group && o.subfeature == subfeature)
    }

    /// Return the score of a phase window.
    #[must_use]
    pub fn phase(&self, phase: ScoringPhase) -> Option<&PhaseScore> {
        self.phases.iter().find(|p| p.phase == phase)
    }
}

/// Comparison of one subject against several references.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    /// One result per reference, in input order.
    pub entries: Vec<Result<ComparisonResult, CompareError>>,
    /// Index of the reference with the highest overall score, ties to the
    /// earliest. `None` if no comparison succeeded.
    pub best: Option<usize>,
}

impl Ranking {
    /// Return the best comparison, if any succeeded.
    #[must_use]
    pub fn best_result(&self) -> Option<&ComparisonResult> {
        self.best
            .and_then(|i| self.entries.get(i))
            .and_then(|r| r.as_ref().ok())
    }
}
