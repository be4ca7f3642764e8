//! Immutable scoring configuration shared by every comparison.

use std::collections::BTreeMap;

use shotsim_features::{FeatureClass, FeatureGroup, ScoringPhase, Subfeature};

use crate::confidence::ConfidenceThresholds;
use crate::error::ConfigError;
use crate::grade::{GradeTable, GradeThreshold};
use crate::profile::FeatureClassProfile;
use crate::weights::WeightTable;

/// Profiles, weight tables, grades and confidence thresholds.
///
/// Constructed once, validated, then shared by reference across concurrent
/// comparisons. Every feature class has a profile and every feature group
/// has a subfeature weight table.
///
/// # Reference values
///
/// [`ScoringConfig::reference`] carries the tuned constants:
///
/// | Class | Band | Max local | Max step | Max len diff | Max expected | Scaling |
/// |---|---|---|---|---|---|---|
/// | `trajectory_2d` | 0.35 | 4.0 | 5 | 0.5 | 8.0 | 0.4 |
/// | `ball_wrist_special` | 0.1 | 1.0 | 1 | 0.2 | 1.5 | 1.5 |
/// | `kinematics` | 0.15 | 90.0 | 1 | 0.2 | 40.0 | 1.5 |
/// | `stability` | 0.3 | 1.5 | 3 | 0.5 | 1.5 | 1.0 |
/// | `timing` | 0.15 | 0.5 | 1 | 0.2 | 0.4 | 1.8 |
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    profiles: Vec<FeatureClassProfile>,
    subfeature_weights: Vec<WeightTable<Subfeature>>,
    group_weights: WeightTable<FeatureGroup>,
    phase_weights: WeightTable<ScoringPhase>,
    grades: GradeTable,
    confidence: ConfidenceThresholds,
}

impl ScoringConfig {
    /// Assemble a configuration from validated parts.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`ConfigError::MissingProfile`] | A feature class has no profile |
    /// | [`ConfigError::MissingKey`] | A feature group has no subfeature weight table |
    pub fn new(
        mut profiles: BTreeMap<FeatureClass, FeatureClassProfile>,
        mut subfeature_weights: BTreeMap<FeatureGroup, WeightTable<Subfeature>>,
        group_weights: WeightTable<FeatureGroup>,
        phase_weights: WeightTable<ScoringPhase>,
        grades: GradeTable,
        confidence: ConfidenceThresholds,
    ) -> Result<Self, ConfigError> {
        let profiles = FeatureClass::ALL
            .iter()
            .map(|class| {
                profiles.remove(class).ok_or_else(|| ConfigError::MissingProfile {
                    class: class.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let subfeature_weights = FeatureGroup::ALL
            .iter()
            .map(|group| {
                subfeature_weights
                    .remove(group)
                    .ok_or_else(|| ConfigError::MissingKey {
                        table: "subfeature_weights".to_string(),
                        key: group.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            profiles,
            subfeature_weights,
            group_weights,
            phase_weights,
            grades,
            confidence,
        })
    }

    /// Build the reference configuration.
    ///
    /// # Errors
    ///
    /// Never in practice; the constants pass validation. Returned rather than
    /// unwrapped so a future edit to the table fails loudly at the call site.
    pub fn reference() -> Result<Self, ConfigError> {
        use FeatureClass::*;

        let profile_rows: [(FeatureClass, f64, f64, usize, f64, f64, f64); 5] = [
            (Trajectory2d, 0.35, 4.0, 5, 0.5, 8.0, 0.4),
            (BallWristSpecial, 0.1, 1.0, 1, 0.2, 1.5, 1.5),
            (Kinematics, 0.15, 90.0, 1, 0.2, 40.0, 1.5),
            (Stability, 0.3, 1.5, 3, 0.5, 1.5, 1.0),
            (Timing, 0.15, 0.5, 1, 0.2, 0.4, 1.8),
        ];
        let mut profiles = BTreeMap::new();
        for (class, band, local, step, len_diff, expected, scaling) in profile_rows {
            let profile =
                FeatureClassProfile::new(class, band, local, step, len_diff, expected, scaling)?;
            profiles.insert(class, profile);
        }

        let mut subfeature_weights = BTreeMap::new();
        for group in FeatureGroup::ALL {
            let weights: &[f64] = match group {
                FeatureGroup::BallWristTrajectory => &[0.4, 0.35, 0.25],
                FeatureGroup::ShootingArmKinematics => &[0.35, 0.25, 0.25, 0.15],
                FeatureGroup::LowerBodyStability => &[0.4, 0.35, 0.25],
                FeatureGroup::PhaseTimingPatterns => &[0.6, 0.4],
                FeatureGroup::BodyAlignment => &[0.4, 0.35, 0.25],
            };
            let declared = group.subfeatures();
            let table = WeightTable::new(
                group.as_str(),
                declared.iter().copied().zip(weights.iter().copied()),
                declared,
            )?;
            subfeature_weights.insert(group, table);
        }

        let group_weights = WeightTable::new(
            "feature_group_weights",
            FeatureGroup::ALL.into_iter().zip([0.30, 0.25, 0.15, 0.15, 0.15]),
            &FeatureGroup::ALL,
        )?;
        let phase_weights = WeightTable::new(
            "phase_weights",
            ScoringPhase::ALL.into_iter().zip([0.10, 0.20, 0.25, 0.35, 0.10]),
            &ScoringPhase::ALL,
        )?;

        let grade_rows = [
            ("A+", 95.0),
            ("A", 90.0),
            ("A-", 85.0),
            ("B+", 80.0),
            ("B", 75.0),
            ("B-", 70.0),
            ("C+", 65.0),
            ("C", 60.0),
            ("C-", 55.0),
            ("D+", 50.0),
            ("D", 45.0),
            ("D-", 40.0),
            ("F+", 35.0),
            ("F", 30.0),
            ("F-", 25.0),
        ];
        let grades = GradeTable::new(
            grade_rows
                .iter()
                .map(|&(grade, threshold)| GradeThreshold {
                    grade: grade.to_string(),
                    threshold,
                })
                .collect(),
        )?;

        Self::new(
            profiles,
            subfeature_weights,
            group_weights,
            phase_weights,
            grades,
            ConfidenceThresholds::new(0.85, 0.70, 0.50)?,
        )
    }

    /// Replace the profile of one feature class.
    #[must_use]
    pub fn with_profile(mut self, class: FeatureClass, profile: FeatureClassProfile) -> Self {
        self.profiles[class.index()] = profile;
        self
    }

    /// Replace the feature-group weight table.
    #[must_use]
    pub fn with_group_weights(mut self, weights: WeightTable<FeatureGroup>) -> Self {
        self.group_weights = weights;
        self
    }

    /// Replace the phase weight table.
    #[must_use]
    pub fn with_phase_weights(mut self, weights: WeightTable<ScoringPhase>) -> Self {
        self.phase_weights = weights;
        self
    }

    /// Replace the confidence thresholds.
    #[must_use]
    pub fn with_confidence(mut self, confidence: ConfidenceThresholds) -> Self {
        self.confidence = confidence;
        self
    }

    /// Return the profile of a feature class.
    #[must_use]
    pub fn profile(&self, class: FeatureClass) -> &FeatureClassProfile {
        &self.profiles[class.index()]
    }

    /// Return the subfeature weight table of a feature group.
    #[must_use]
    pub fn subfeature_weights(&self, group: FeatureGroup) -> &WeightTable<Subfeature> {
        &self.subfeature_weights[group.index()]
    }

    /// Return the feature-group weight table.
    #[must_use]
    pub fn group_weights(&self) -> &WeightTable<FeatureGroup> {
        &self.group_weights
    }

    /// Return the phase weight table.
    #[must_use]
    pub fn phase_weights(&self) -> &WeightTable<ScoringPhase> {
        &self.phase_weights
    }

    /// Return the grade table.
    #[must_use]
    pub fn grades(&self) -> &GradeTable {
        &self.grades
    }

    /// Return the confidence thresholds.
    #[must_use]
    pub fn confidence(&self) -> &ConfidenceThresholds {
        &self.confidence
    }
}
