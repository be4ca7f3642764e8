//! Letter grades from similarity thresholds.

use crate::error::ConfigError;
use crate::similarity::Similarity;

/// A grade label and the minimum score that earns it.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeThreshold {
    /// Grade label, e.g. `"B+"`.
    pub grade: String,
    /// Minimum score for the grade.
    pub threshold: f64,
}

/// Grade thresholds in strictly descending order.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeTable(Vec<GradeThreshold>);

impl GradeTable {
    /// Validate a grade table.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`ConfigError::EmptyGradeTable`] | `entries` is empty |
    /// | [`ConfigError::GradeOrder`] | A threshold is non-finite or not below its predecessor |
    pub fn new(entries: Vec<GradeThreshold>) -> Result<Self, ConfigError> {
        if entries.is_empty() {
            return Err(ConfigError::EmptyGradeTable);
        }
        let mut previous = f64::INFINITY;
        for entry in &entries {
            if !entry.threshold.is_finite() || entry.threshold >= previous {
                return Err(ConfigError::GradeOrder {
                    grade: entry.grade.clone(),
                    threshold: entry.threshold,
                });
            }
            previous = entry.threshold;
        }
        Ok(Self(entries))
    }

    /// Return the entries, highest threshold first.
    #[must_use]
    pub fn entries(&self) -> &[GradeThreshold] {
        &self.0
    }

    /// Return the grade of the highest threshold not above `score`.
    ///
    /// Scores below every threshold receive the lowest grade.
    #[must_use]
    pub fn grade(&self, score: Similarity) -> &str {
        self.0
            .iter()
            .find(|e| score.value() >= e.threshold)
            .or_else(|| self.0.last())
            .map_or("", |e| e.grade.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(grade: &str, threshold: f64) -> GradeThreshold {
        GradeThreshold {
            grade: grade.to_string(),
            threshold,
        }
    }

    fn table() -> GradeTable {
        GradeTable::new(vec![entry("A", 90.0), entry("B", 75.0), entry("C", 60.0)]).unwrap()
    }

    fn score(v: f64) -> Similarity {
        Similarity::new(v).unwrap()
    }

    #[test]
    fn threshold_is_inclusive() {
        assert_eq!(table().grade(score(75.0)), "B");
    }

    #[test]
    fn between_thresholds_takes_lower() {
        assert_eq!(table().grade(score(89.99)), "B");
    }

    #[test]
    fn top_score_takes_top_grade() {
        assert_eq!(table().grade(score(100.0)), "A");
    }

    #[test]
    fn below_lowest_takes_lowest() {
        assert_eq!(table().grade(score(12.0)), "C");
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(GradeTable::new(Vec::new()), Err(ConfigError::EmptyGradeTable));
    }

    #[test]
    fn rejects_ascending_thresholds() {
        let result = GradeTable::new(vec![entry("A", 90.0), entry("B", 95.0)]);
        assert!(matches!(result, Err(ConfigError::GradeOrder { grade, .. }) if grade == "B"));
    }

    #[test]
    fn rejects_duplicate_thresholds() {
        let result = GradeTable::new(vec![entry("A", 90.0), entry("A-", 90.0)]);
        assert!(matches!(result, Err(ConfigError::GradeOrder { .. })));
    }
}
