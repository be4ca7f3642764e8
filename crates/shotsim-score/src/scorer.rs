//! Per-subfeature alignment and scoring, and aggregation into group scores.

use std::collections::BTreeMap;

use shotsim_dtw::{Alignment, Dtw, DtwError};
use shotsim_features::{
    FeatureExtractor, FeatureGroup, MotionSequence, PreparedPair, Subfeature, Unavailability,
};
use tracing::{debug, warn};

use crate::config::ScoringConfig;
use crate::result::{GroupScore, SubfeatureOutcome, SubfeatureScore};
use crate::weights::WeightedScore;

/// What part of the motions a scoring pass covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scope {
    /// Every frame. All subfeatures apply.
    Whole,
    /// One phase window. Timing subfeatures do not apply.
    Window,
}

/// Outcomes and aggregates of one scoring pass.
#[derive(Debug, Clone)]
pub(crate) struct ScopeScores {
    pub(crate) outcomes: Vec<SubfeatureOutcome>,
    pub(crate) groups: Vec<GroupScore>,
    pub(crate) overall: Option<WeightedScore>,
}

/// Aligns and scores subfeatures under a [`ScoringConfig`].
#[derive(Debug, Clone, Copy)]
pub struct Scorer<'a> {
    config: &'a ScoringConfig,
    extractor: FeatureExtractor,
}

impl<'a> Scorer<'a> {
    /// Create a scorer reading profiles and weights from `config`.
    #[must_use]
    pub fn new(config: &'a ScoringConfig) -> Self {
        Self {
            config,
            extractor: FeatureExtractor::new(),
        }
    }

    /// Extract, align and score one subfeature.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`Unavailability::EmptyTrajectory`] | A side produced zero samples |
    /// | [`Unavailability::NoValidSamples`] | A side has no detected sample |
    /// | [`Unavailability::NoFeasiblePath`] | The class constraints admit no path |
    /// | [`Unavailability::InvalidTrajectory`] | The aligner rejected a trajectory |
    /// | [`Unavailability::NonFiniteDistance`] | The normalized distance is NaN or infinite |
    pub fn score_subfeature(
        &self,
        subject: &MotionSequence,
        reference: &MotionSequence,
        subfeature: Subfeature,
    ) -> Result<SubfeatureScore, Unavailability> {
        let class = subfeature.feature_class();
        let profile = self.config.profile(class);
        let trajectories = self.extractor.prepare(subject, reference, subfeature)?;

        let dtw = Dtw::new(profile.constraints());
        let alignment = align_pair(&dtw, &trajectories).map_err(unavailable)?;
        let similarity = profile
            .conversion()
            .similarity(alignment.normalized_distance())
            .ok_or(Unavailability::NonFiniteDistance)?;

        debug!(
            %subfeature,
            %class,
            normalized = %alignment.normalized_distance(),
            %similarity,
            "subfeature scored"
        );
        if alignment.is_length_flagged() {
            warn!(
                %subfeature,
                length_ratio = alignment.length_ratio(),
                max_length_diff = profile.constraints().max_length_diff(),
                "trajectory lengths differ beyond the class limit"
            );
        }

        Ok(SubfeatureScore {
            class,
            alignment,
            similarity,
            trajectories,
        })
    }

    /// Score every declared subfeature in `scope`, then aggregate by group
    /// and overall.
    ///
    /// A subfeature declared by several groups is aligned once.
    pub(crate) fn score_scope(
        &self,
        subject: &MotionSequence,
        reference: &MotionSequence,
        scope: Scope,
    ) -> ScopeScores {
        let mut cache: BTreeMap<Subfeature, Result<SubfeatureScore, Unavailability>> =
            BTreeMap::new();
        let mut outcomes = Vec::new();

        for (group, subfeature) in FeatureGroup::declared_pairs() {
            let status = cache
                .entry(subfeature)
                .or_insert_with(|| {
                    let status = if scope == Scope::Window && subfeature.is_timing() {
                        Err(Unavailability::NotApplicable)
                    } else {
                        self.score_subfeature(subject, reference, subfeature)
                    };
                    match &status {
                        Err(Unavailability::NotApplicable) | Ok(_) => {}
                        Err(reason) => {
                            warn!(
                                %subfeature,
                                kind = reason.kind(),
                                %reason,
                                "subfeature unavailable"
                            );
                        }
                    }
                    status
                })
                .clone();
            outcomes.push(SubfeatureOutcome {
                group,
                subfeature,
                status,
            });
        }

        let groups: Vec<GroupScore> = FeatureGroup::ALL
            .into_iter()
            .map(|group| {
                let scores = outcomes
                    .iter()
                    .filter(|o| o.group == group)
                    .map(|o| (o.subfeature, o.similarity()));
                GroupScore {
                    group,
                    score: self.config.subfeature_weights(group).weighted_mean(scores),
                }
            })
            .collect();

        let overall = self
            .config
            .group_weights()
            .weighted_mean(groups.iter().map(|g| (g.group, g.score.map(|w| w.score))));

        ScopeScores {
            outcomes,
            groups,
            overall,
        }
    }
}

fn align_pair(dtw: &Dtw, pair: &PreparedPair) -> Result<Alignment, DtwError> {
    match pair {
        PreparedPair::Scalar { subject, reference } => dtw.align(subject, reference),
        PreparedPair::Planar { subject, reference } => dtw.align(subject, reference),
    }
}

fn unavailable(err: DtwError) -> Unavailability {
    match err {
        DtwError::NoFeasiblePath { .. } => Unavailability::NoFeasiblePath,
        other => Unavailability::InvalidTrajectory {
            reason: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shotsim_features::{FrameSample, Hand, Keypoint, Phase};

    fn kp(x: f64, y: f64) -> Keypoint {
        Keypoint::new(x, y, 0.9)
    }

    /// A right-handed arm raising the wrist over `n` frames.
    fn arm_motion(n: usize, lift: f64) -> MotionSequence {
        let frames = (0..n)
            .map(|k| {
                let t = k as f64 / n as f64;
                FrameSample::new(k as u64, Phase::Rising)
                    .with_keypoint("right_shoulder", kp(0.5, 0.4))
                    .with_keypoint("right_elbow", kp(0.55, 0.3))
                    .with_keypoint("right_wrist", kp(0.55, 0.25 - lift * t))
            })
            .collect();
        MotionSequence::new(Hand::Right, frames)
    }

    #[test]
    fn identical_motions_score_perfectly() {
        let config = ScoringConfig::reference().unwrap();
        let motion = arm_motion(12, 0.2);
        let score = Scorer::new(&config)
            .score_subfeature(&motion, &motion, Subfeature::WristTrajectory)
            .unwrap();
        assert_eq!(score.similarity.value(), 100.0);
        assert_eq!(score.alignment.normalized_distance().value(), 0.0);
        assert!(!score.alignment.is_length_flagged());
    }

    #[test]
    fn missing_ball_is_unavailable() {
        let config = ScoringConfig::reference().unwrap();
        let motion = arm_motion(6, 0.2);
        let result =
            Scorer::new(&config).score_subfeature(&motion, &motion, Subfeature::BallTrajectory);
        assert!(matches!(result, Err(Unavailability::NoValidSamples { .. })));
    }

    #[test]
    fn shared_subfeature_is_scored_in_both_groups() {
        let config = ScoringConfig::reference().unwrap();
        let motion = arm_motion(8, 0.1);
        let scores = Scorer::new(&config).score_scope(&motion, &motion, Scope::Whole);
        let wrist: Vec<_> = scores
            .outcomes
            .iter()
            .filter(|o| o.subfeature == Subfeature::WristTrajectory)
            .collect();
        assert_eq!(wrist.len(), 2);
        assert_eq!(wrist[0].status, wrist[1].status);
        assert_ne!(wrist[0].group, wrist[1].group);
    }

    #[test]
    fn timing_is_not_applicable_in_a_window() {
        let config = ScoringConfig::reference().unwrap();
        let motion = arm_motion(8, 0.1);
        let scores = Scorer::new(&config).score_scope(&motion, &motion, Scope::Window);
        let timing = scores
            .groups
            .iter()
            .find(|g| g.group == FeatureGroup::PhaseTimingPatterns)
            .unwrap();
        assert_eq!(timing.score, None);
        assert!(
            scores
                .outcomes
                .iter()
                .filter(|o| o.subfeature.is_timing())
                .all(|o| o.status == Err(Unavailability::NotApplicable))
        );
    }

    #[test]
    fn groups_renormalize_over_available_subfeatures() {
        let config = ScoringConfig::reference().unwrap();
        let motion = arm_motion(8, 0.1);
        let scores = Scorer::new(&config).score_scope(&motion, &motion, Scope::Whole);
        let ball_wrist = scores.groups[FeatureGroup::BallWristTrajectory.index()];
        let score = ball_wrist.score.unwrap();
        // Only wrist_trajectory (0.35) is available without a ball.
        assert!((score.weight_coverage - 0.35).abs() < 1e-10);
        assert_eq!(score.score.value(), 100.0);
    }

    #[test]
    fn infeasible_path_maps_to_unavailability() {
        assert_eq!(
            unavailable(DtwError::NoFeasiblePath { n1: 3, n2: 9 }),
            Unavailability::NoFeasiblePath
        );
        assert!(matches!(
            unavailable(DtwError::EmptySeries),
            Unavailability::InvalidTrajectory { .. }
        ));
    }
}
