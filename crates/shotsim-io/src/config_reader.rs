//! JSON scoring configuration reader.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use shotsim_features::{FeatureClass, FeatureGroup, ScoringPhase};
use shotsim_score::{
    ConfidenceThresholds, ConfigError, FeatureClassProfile, GradeTable, GradeThreshold,
    ScoringConfig, WeightTable,
};
use tracing::{info, instrument};

use crate::IoError;

/// Reads and validates a [`ScoringConfig`] from a JSON file.
///
/// Every field is required and unknown fields are rejected; nothing is
/// silently defaulted. A key repeated within one JSON object keeps its last
/// value.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::JsonParse`] | Malformed JSON, missing or unknown field |
/// | [`IoError::Config`] | Any table fails validation |
pub struct ConfigReader {
    path: PathBuf,
}

impl ConfigReader {
    /// Create a new reader for the given JSON file path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Read and validate the configuration.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<ScoringConfig, IoError> {
        let file = File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;
        let raw: RawConfig =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| IoError::JsonParse {
                path: self.path.clone(),
                source: e,
            })?;
        let config = raw.into_config().map_err(|e| IoError::Config {
            path: self.path.clone(),
            source: e,
        })?;
        info!(n_grades = config.grades().entries().len(), "scoring configuration loaded");
        Ok(config)
    }
}

// --- Raw document structs ---

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    profiles: BTreeMap<String, RawProfile>,
    subfeature_weights: BTreeMap<String, BTreeMap<String, f64>>,
    feature_group_weights: BTreeMap<String, f64>,
    phase_weights: BTreeMap<String, f64>,
    grades: Vec<RawGrade>,
    confidence: RawConfidence,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawProfile {
    band_fraction: f64,
    max_local_distance: f64,
    max_step: usize,
    max_length_diff: f64,
    max_expected_dist: f64,
    scaling_factor: f64,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawGrade {
    grade: String,
    threshold: f64,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfidence {
    high: f64,
    medium: f64,
    low: f64,
}

impl RawConfig {
    fn into_config(self) -> Result<ScoringConfig, ConfigError> {
        let mut profiles = BTreeMap::new();
        for (name, p) in self.profiles {
            let class = name
                .parse::<FeatureClass>()
                .map_err(|_| unknown("profiles", &name))?;
            let profile = FeatureClassProfile::new(
                class,
                p.band_fraction,
                p.max_local_distance,
                p.max_step,
                p.max_length_diff,
                p.max_expected_dist,
                p.scaling_factor,
            )?;
            profiles.insert(class, profile);
        }

        let mut subfeature_weights = BTreeMap::new();
        for (name, entries) in self.subfeature_weights {
            let group = name
                .parse::<FeatureGroup>()
                .map_err(|_| unknown("subfeature_weights", &name))?;
            let table = WeightTable::from_names(group.as_str(), entries, group.subfeatures())?;
            subfeature_weights.insert(group, table);
        }

        let group_weights = WeightTable::from_names(
            "feature_group_weights",
            self.feature_group_weights,
            &FeatureGroup::ALL,
        )?;
        let phase_weights =
            WeightTable::from_names("phase_weights", self.phase_weights, &ScoringPhase::ALL)?;

        let grades = GradeTable::new(
            self.grades
                .into_iter()
                .map(|g| GradeThreshold {
                    grade: g.grade,
                    threshold: g.threshold,
                })
                .collect(),
        )?;
        let confidence = ConfidenceThresholds::new(
            self.confidence.high,
            self.confidence.medium,
            self.confidence.low,
        )?;

        ScoringConfig::new(
            profiles,
            subfeature_weights,
            group_weights,
            phase_weights,
            grades,
            confidence,
        )
    }
}

fn unknown(table: &str, key: &str) -> ConfigError {
    ConfigError::UnknownKey {
        table: table.to_string(),
        key: key.to_string(),
    }
}
