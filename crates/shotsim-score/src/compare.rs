//! Whole-motion and per-phase comparison, and ranking against several references.

use rayon::prelude::*;
use shotsim_features::{MotionSequence, ScoringPhase};
use tracing::{info, instrument, warn};

use crate::config::ScoringConfig;
use crate::error::CompareError;
use crate::result::{ComparisonResult, PhaseScore, Ranking};
use crate::scorer::{Scope, Scorer};

/// Compares shooting motions under one shared configuration.
///
/// Holds only a shared reference, so one comparator can be used from many
/// threads at once.
#[derive(Debug, Clone, Copy)]
pub struct Comparator<'a> {
    config: &'a ScoringConfig,
}

impl<'a> Comparator<'a> {
    /// Create a comparator over `config`.
    #[must_use]
    pub fn new(config: &'a ScoringConfig) -> Self {
        Self { config }
    }

    /// Return the configuration.
    #[must_use]
    pub fn config(&self) -> &'a ScoringConfig {
        self.config
    }

    /// Compare `subject` against `reference`.
    ///
    /// Every declared subfeature is aligned over the whole motions, then
    /// again inside each phase window present in both motions. Unavailable
    /// subfeatures are recorded and excluded; weights are renormalized over
    /// what remains.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`CompareError::NoAvailableSubfeatures`] | No subfeature could be scored over the whole motions |
    #[instrument(skip(self, subject, reference), fields(n1 = subject.len(), n2 = reference.len()))]
    pub fn compare(
        &self,
        subject: &MotionSequence,
        reference: &MotionSequence,
    ) -> Result<ComparisonResult, CompareError> {
        let scorer = Scorer::new(self.config);
        let whole = scorer.score_scope(subject, reference, Scope::Whole);

        let declared = whole.outcomes.len();
        let available = whole.outcomes.iter().filter(|o| o.is_available()).count();
        let overall = match whole.overall {
            Some(overall) if available > 0 => overall,
            _ => return Err(CompareError::NoAvailableSubfeatures { declared }),
        };

        let phases: Vec<PhaseScore> = ScoringPhase::ALL
            .into_iter()
            .map(|phase| match (subject.window(phase), reference.window(phase)) {
                (Some(s), Some(r)) => {
                    let window = scorer.score_scope(&s, &r, Scope::Window);
                    PhaseScore {
                        phase,
                        score: window.overall,
                        groups: window.groups,
                    }
                }
                _ => PhaseScore {
                    phase,
                    score: None,
                    groups: Vec::new(),
                },
            })
            .collect();
        let phase_weighted = self
            .config
            .phase_weights()
            .weighted_mean(phases.iter().map(|p| (p.phase, p.score.map(|w| w.score))));

        let length_flagged = whole
            .outcomes
            .iter()
            .filter_map(|o| o.status.as_ref().ok())
            .any(|s| s.alignment.is_length_flagged());
        let fraction = available as f64 / declared as f64;
        let confidence = self.config.confidence().level(fraction, length_flagged);
        let grade = self.config.grades().grade(overall.score).to_string();

        info!(
            overall = %overall.score,
            coverage = overall.weight_coverage,
            %grade,
            %confidence,
            available,
            declared,
            length_flagged,
            "comparison complete"
        );

        Ok(ComparisonResult {
            subfeatures: whole.outcomes,
            groups: whole.groups,
            overall,
            phases,
            phase_weighted,
            grade,
            confidence,
            available,
            declared,
            length_flagged,
        })
    }

    /// Compare `subject` against every reference in parallel and pick the
    /// reference with the highest overall score.
    ///
    /// Ties go to the earliest reference. A reference whose comparison fails
    /// keeps its error in the ranking and is never chosen.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`CompareError::NoReferences`] | `references` is empty |
    #[instrument(skip(self, subject, references), fields(n_references = references.len()))]
    pub fn rank(
        &self,
        subject: &MotionSequence,
        references: &[MotionSequence],
    ) -> Result<Ranking, CompareError> {
        if references.is_empty() {
            return Err(CompareError::NoReferences);
        }

        let entries: Vec<Result<ComparisonResult, CompareError>> = references
            .par_iter()
            .map(|reference| self.compare(subject, reference))
            .collect();

        let mut best: Option<(usize, &ComparisonResult)> = None;
        for (idx, entry) in entries.iter().enumerate() {
            let Ok(result) = entry else {
                continue;
            };
            let better = best.is_none_or(|(_, prev)| {
                result.overall.score.total_cmp(&prev.overall.score).is_gt()
            });
            if better {
                best = Some((idx, result));
            }
        }
        let best = best.map(|(idx, _)| idx);

        let n_failed = entries.iter().filter(|e| e.is_err()).count();
        if n_failed > 0 {
            warn!(n_failed, "some references could not be compared");
        }
        info!(best = ?best, n_ok = entries.len() - n_failed, "ranking complete");

        Ok(Ranking { entries, best })
    }
}
