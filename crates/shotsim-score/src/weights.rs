//! Validated weight tables and renormalizing weighted means.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::similarity::Similarity;

/// Tolerance on the sum of a weight table.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// A weighted mean over the available entries of a table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedScore {
    /// Mean of the available scores, weighted and renormalized.
    pub score: Similarity,
    /// Sum of the weights of the entries that had a score.
    pub weight_coverage: f64,
}

/// A name-to-weight table whose keys are exactly a declared set.
///
/// Weights are non-negative, finite, and sum to 1.0 within
/// [`WEIGHT_SUM_TOLERANCE`].
#[derive(Debug, Clone, PartialEq)]
pub struct WeightTable<K: Ord> {
    name: String,
    weights: BTreeMap<K, f64>,
}

impl<K: Copy + Ord + Display> WeightTable<K> {
    /// Validate typed entries against the declared key set.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`ConfigError::InvalidWeight`] | A weight is negative, NaN or infinite |
    /// | [`ConfigError::UnknownKey`] | A key is not in `declared` |
    /// | [`ConfigError::MissingKey`] | A declared key has no entry |
    /// | [`ConfigError::WeightSum`] | Weights do not sum to 1.0 |
    pub fn new(
        name: impl Into<String>,
        entries: impl IntoIterator<Item = (K, f64)>,
        declared: &[K],
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        let mut weights = BTreeMap::new();
        for (key, value) in entries {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::InvalidWeight {
                    table: name,
                    key: key.to_string(),
                    value,
                });
            }
            if !declared.contains(&key) {
                return Err(ConfigError::UnknownKey {
                    table: name,
                    key: key.to_string(),
                });
            }
            weights.insert(key, value);
        }
        if let Some(missing) = declared.iter().find(|k| !weights.contains_key(*k)) {
            return Err(ConfigError::MissingKey {
                table: name,
                key: missing.to_string(),
            });
        }
        let sum: f64 = weights.values().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::WeightSum { table: name, sum });
        }
        Ok(Self { name, weights })
    }

    /// Return the table name used in error messages.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the weight of `key`, or zero if it is not in the table.
    #[must_use]
    pub fn weight(&self, key: K) -> f64 {
        self.weights.get(&key).copied().unwrap_or(0.0)
    }

    /// Iterate over `(key, weight)` in key order.
    pub fn iter(&self) -> impl Iterator<Item = (K, f64)> + '_ {
        self.weights.iter().map(|(&k, &w)| (k, w))
    }

    /// Weighted mean of the scores that are present, renormalized by the
    /// weight of those entries.
    ///
    /// Returns `None` when no entry with positive weight has a score.
    #[must_use]
    pub fn weighted_mean(
        &self,
        scores: impl IntoIterator<Item = (K, Option<Similarity>)>,
    ) -> Option<WeightedScore> {
        let mut total = 0.0;
        let mut coverage = 0.0;
        for (key, score) in scores {
            if let Some(score) = score {
                let w = self.weight(key);
                total += w * score.value();
                coverage += w;
            }
        }
        if coverage <= 0.0 {
            return None;
        }
        Some(WeightedScore {
            score: Similarity::new(total / coverage)?,
            weight_coverage: coverage,
        })
    }
}

impl<K: Copy + Ord + Display + FromStr> WeightTable<K> {
    /// Parse string keys, then validate as in [`WeightTable::new`].
    ///
    /// # Errors
    ///
    /// As for [`WeightTable::new`]; a key that does not parse is
    /// [`ConfigError::UnknownKey`].
    pub fn from_names(
        name: impl Into<String>,
        entries: impl IntoIterator<Item = (String, f64)>,
        declared: &[K],
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        let mut typed = Vec::new();
        for (key, value) in entries {
            match key.parse::<K>() {
                Ok(k) => typed.push((k, value)),
                Err(_) => return Err(ConfigError::UnknownKey { table: name, key }),
            }
        }
        Self::new(name, typed, declared)
    }
}
