//! JSON and CSV result writer for comparisons and rankings.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use shotsim_dtw::{WarpingPath, pair_along_path};
use shotsim_features::{PreparedPair, Subfeature};
use shotsim_score::{ComparisonResult, GroupScore, Ranking, WeightedScore};
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::ComparisonName;

/// Writes comparison and ranking results to JSON and CSV files.
///
/// Creates the output directory on construction if it does not exist.
/// Output files are named `{name}_comparison.json`,
/// `{name}_alignments.csv` and `{name}_ranking.json`.
pub struct ResultWriter {
    output_dir: PathBuf,
    name: ComparisonName,
}

impl ResultWriter {
    /// Create a new writer targeting the given directory and comparison name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the directory cannot be created.
    #[instrument(skip_all, fields(dir = %output_dir.display(), name = %name))]
    pub fn new(output_dir: &Path, name: ComparisonName) -> Result<Self, IoError> {
        fs::create_dir_all(output_dir).map_err(|e| IoError::OutputDirCreate {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
        debug!("output directory ready");
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            name,
        })
    }

    fn target(&self, suffix: &str) -> PathBuf {
        self.output_dir.join(format!("{}_{suffix}", self.name.as_str()))
    }

    /// Write a comparison to `{name}_comparison.json` and return its path.
    ///
    /// With `include_paths`, every scored subfeature also carries its warping
    /// path as `[subject_index, reference_index]` pairs.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::Serialize`] | The artifact cannot be encoded |
    /// | [`IoError::WriteFile`] | The file cannot be written |
    #[instrument(skip_all)]
    pub fn write_comparison(
        &self,
        result: &ComparisonResult,
        include_paths: bool,
    ) -> Result<PathBuf, IoError> {
        let path = self.target("comparison.json");
        let artifact = ComparisonArtifact::new(self.name.as_str(), result, include_paths);
        write_json(&path, &artifact)?;
        info!(path = %path.display(), "comparison written");
        Ok(path)
    }

    /// Write the aligned sample pairs of every scored subfeature to
    /// `{name}_alignments.csv` and return its path.
    ///
    /// A subfeature declared by several groups is written once. Indices are
    /// positions within the aligned trajectories. Scalar subfeatures leave the
    /// `y` columns empty.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::Csv`] | The file cannot be created or written |
    /// | [`IoError::Pairing`] | A stored path does not fit its trajectories |
    #[instrument(skip_all)]
    pub fn write_alignments(&self, result: &ComparisonResult) -> Result<PathBuf, IoError> {
        let path = self.target("alignments.csv");
        let csv_err = |e| IoError::Csv {
            path: path.clone(),
            source: e,
        };
        let mut wtr = csv::Writer::from_path(&path).map_err(csv_err)?;

        let mut seen = BTreeSet::new();
        let mut n_rows = 0usize;
        for outcome in &result.subfeatures {
            let Ok(score) = &outcome.status else {
                continue;
            };
            if !seen.insert(outcome.subfeature) {
                continue;
            }
            let rows = alignment_rows(
                outcome.subfeature,
                &score.trajectories,
                score.alignment.path(),
            )?;
            for row in &rows {
                wtr.serialize(row).map_err(csv_err)?;
            }
            n_rows += rows.len();
        }
        wtr.flush().map_err(|e| IoError::WriteFile {
            path: path.clone(),
            source: e,
        })?;

        info!(path = %path.display(), n_subfeatures = seen.len(), n_rows, "alignments written");
        Ok(path)
    }

    /// Write a ranking to `{name}_ranking.json` and return its path.
    ///
    /// `references` names each reference in ranking order; entries beyond
    /// its length are named by position.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::Serialize`] | The artifact cannot be encoded |
    /// | [`IoError::WriteFile`] | The file cannot be written |
    #[instrument(skip_all, fields(n_references = ranking.entries.len()))]
    pub fn write_ranking(
        &self,
        ranking: &Ranking,
        references: &[String],
    ) -> Result<PathBuf, IoError> {
        let path = self.target("ranking.json");
        let entries = ranking
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let reference = references
                    .get(i)
                    .cloned()
                    .unwrap_or_else(|| format!("reference_{i}"));
                match entry {
                    Ok(result) => RankingEntry {
                        reference,
                        overall: Some(result.overall.score.value()),
                        grade: Some(result.grade.as_str()),
                        confidence: Some(result.confidence.as_str()),
                        error: None,
                    },
                    Err(e) => RankingEntry {
                        reference,
                        overall: None,
                        grade: None,
                        confidence: None,
                        error: Some(e.to_string()),
                    },
                }
            })
            .collect();

        let artifact = RankingArtifact {
            name: self.name.as_str(),
            best: ranking.best,
            best_reference: ranking
                .best
                .map(|i| references.get(i).cloned().unwrap_or_else(|| format!("reference_{i}"))),
            entries,
        };
        write_json(&path, &artifact)?;
        info!(path = %path.display(), "ranking written");
        Ok(path)
    }
}

fn write_json<T: Serialize>(path: &Path, artifact: &T) -> Result<(), IoError> {
    let json = serde_json::to_string_pretty(artifact).map_err(|e| IoError::Serialize {
        path: path.to_path_buf(),
        source: e,
    })?;
    fs::write(path, json).map_err(|e| IoError::WriteFile {
        path: path.to_path_buf(),
        source: e,
    })
}

fn alignment_rows(
    subfeature: Subfeature,
    trajectories: &PreparedPair,
    path: &WarpingPath,
) -> Result<Vec<AlignmentRow>, IoError> {
    let pairing_err = |e| IoError::Pairing {
        subfeature: subfeature.to_string(),
        source: e,
    };
    let rows = match trajectories {
        PreparedPair::Scalar { subject, reference } => {
            let pair = pair_along_path(subject.as_slice(), reference.as_slice(), path)
                .map_err(pairing_err)?;
            path.steps()
                .iter()
                .zip(pair.iter())
                .enumerate()
                .map(|(step, (s, (&a, &b)))| AlignmentRow {
                    subfeature: subfeature.as_str(),
                    step,
                    subject_index: s.a,
                    reference_index: s.b,
                    subject_x: a,
                    subject_y: None,
                    reference_x: b,
                    reference_y: None,
                })
                .collect()
        }
        PreparedPair::Planar { subject, reference } => {
            let pair = pair_along_path(subject.as_slice(), reference.as_slice(), path)
                .map_err(pairing_err)?;
            path.steps()
                .iter()
                .zip(pair.iter())
                .enumerate()
                .map(|(step, (s, (a, b)))| AlignmentRow {
                    subfeature: subfeature.as_str(),
                    step,
                    subject_index: s.a,
                    reference_index: s.b,
                    subject_x: a.x,
                    subject_y: Some(a.y),
                    reference_x: b.x,
                    reference_y: Some(b.y),
                })
                .collect()
        }
    };
    Ok(rows)
}

// --- Shadow structs for JSON and CSV serialization ---

#[derive(Serialize)]
struct ComparisonArtifact<'a> {
    name: &'a str,
    overall: f64,
    weight_coverage: f64,
    phase_weighted: Option<f64>,
    grade: &'a str,
    confidence: &'a str,
    available: usize,
    declared: usize,
    length_flagged: bool,
    groups: Vec<GroupEntry>,
    phases: Vec<PhaseEntry>,
    subfeatures: Vec<SubfeatureEntry>,
}

#[derive(Serialize)]
struct GroupEntry {
    group: &'static str,
    score: Option<f64>,
    weight_coverage: Option<f64>,
}

#[derive(Serialize)]
struct PhaseEntry {
    phase: &'static str,
    score: Option<f64>,
    weight_coverage: Option<f64>,
    groups: Vec<GroupEntry>,
}

#[derive(Serialize)]
struct SubfeatureEntry {
    group: &'static str,
    subfeature: &'static str,
    feature_class: &'static str,
    available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    similarity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw_distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    normalized_distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    length_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    length_flagged: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<Vec<[usize; 2]>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    unavailable: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

#[derive(Serialize)]
struct RankingArtifact<'a> {
    name: &'a str,
    best: Option<usize>,
    best_reference: Option<String>,
    entries: Vec<RankingEntry<'a>>,
}

#[derive(Serialize)]
struct RankingEntry<'a> {
    reference: String,
    overall: Option<f64>,
    grade: Option<&'a str>,
    confidence: Option<&'static str>,
    error: Option<String>,
}

#[derive(Serialize)]
struct AlignmentRow {
    subfeature: &'static str,
    step: usize,
    subject_index: usize,
    reference_index: usize,
    subject_x: f64,
    subject_y: Option<f64>,
    reference_x: f64,
    reference_y: Option<f64>,
}

fn group_entries(groups: &[GroupScore]) -> Vec<GroupEntry> {
    groups
        .iter()
        .map(|g| GroupEntry {
            group: g.group.as_str(),
            score: g.score.map(|s| s.score.value()),
            weight_coverage: g.score.map(|s| s.weight_coverage),
        })
        .collect()
}

fn split(score: Option<WeightedScore>) -> (Option<f64>, Option<f64>) {
    (
        score.map(|s| s.score.value()),
        score.map(|s| s.weight_coverage),
    )
}

impl<'a> ComparisonArtifact<'a> {
    fn new(name: &'a str, result: &'a ComparisonResult, include_paths: bool) -> Self {
        let phases = result
            .phases
            .iter()
            .map(|p| {
                let (score, weight_coverage) = split(p.score);
                PhaseEntry {
                    phase: p.phase.as_str(),
                    score,
                    weight_coverage,
                    groups: group_entries(&p.groups),
                }
            })
            .collect();

        let subfeatures = result
            .subfeatures
            .iter()
            .map(|o| {
                let mut entry = SubfeatureEntry {
                    group: o.group.as_str(),
                    subfeature: o.subfeature.as_str(),
                    feature_class: o.subfeature.feature_class().as_str(),
                    available: o.is_available(),
                    similarity: None,
                    raw_distance: None,
                    normalized_distance: None,
                    length_ratio: None,
                    length_flagged: None,
                    path: None,
                    unavailable: None,
                    reason: None,
                };
                match &o.status {
                    Ok(score) => {
                        let alignment = &score.alignment;
                        entry.similarity = Some(score.similarity.value());
                        entry.raw_distance = Some(alignment.distance().value());
                        entry.normalized_distance = Some(alignment.normalized_distance().value());
                        entry.length_ratio = Some(alignment.length_ratio());
                        entry.length_flagged = Some(alignment.is_length_flagged());
                        if include_paths {
                            entry.path =
                                Some(alignment.path().steps().iter().map(|s| [s.a, s.b]).collect());
                        }
                    }
                    Err(reason) => {
                        entry.unavailable = Some(reason.kind());
                        entry.reason = Some(reason.to_string());
                    }
                }
                entry
            })
            .collect();

        let (phase_weighted, _) = split(result.phase_weighted);
        Self {
            name,
            overall: result.overall.score.value(),
            weight_coverage: result.overall.weight_coverage,
            phase_weighted,
            grade: &result.grade,
            confidence: result.confidence.as_str(),
            available: result.available,
            declared: result.declared,
            length_flagged: result.length_flagged,
            groups: group_entries(&result.groups),
            phases,
            subfeatures,
        }
    }
}
