//! Confidence in a comparison, from subfeature availability.

use std::fmt;

use crate::error::ConfigError;

/// How much of the comparison could actually be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConfidenceLevel {
    Insufficient,
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    /// Return the lowercase level name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Insufficient => "insufficient",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Return the next level down; `Insufficient` stays put.
    #[must_use]
    pub fn downgraded(self) -> Self {
        match self {
            Self::High => Self::Medium,
            Self::Medium => Self::Low,
            Self::Low | Self::Insufficient => Self::Insufficient,
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimum available fraction for each confidence level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceThresholds {
    high: f64,
    medium: f64,
    low: f64,
}

impl ConfidenceThresholds {
    /// Validate thresholds.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`ConfigError::InvalidConfidence`] | Not `1 >= high >= medium >= low >= 0` |
    pub fn new(high: f64, medium: f64, low: f64) -> Result<Self, ConfigError> {
        let ordered = (0.0..=1.0).contains(&low)
            && (0.0..=1.0).contains(&medium)
            && (0.0..=1.0).contains(&high)
            && high >= medium
            && medium >= low;
        if !ordered {
            return Err(ConfigError::InvalidConfidence { high, medium, low });
        }
        Ok(Self { high, medium, low })
    }

    /// Return the high threshold.
    #[must_use]
    pub fn high(&self) -> f64 {
        self.high
    }

    /// Return the medium threshold.
    #[must_use]
    pub fn medium(&self) -> f64 {
        self.medium
    }

    /// Return the low threshold.
    #[must_use]
    pub fn low(&self) -> f64 {
        self.low
    }

    /// Map the fraction of available subfeatures to a level.
    ///
    /// A length-flagged alignment among the available subfeatures lowers
    /// the result by one level.
    #[must_use]
    pub fn level(&self, available_fraction: f64, length_flagged: bool) -> ConfidenceLevel {
        let level = if available_fraction >= self.high {
            ConfidenceLevel::High
        } else if available_fraction >= self.medium {
            ConfidenceLevel::Medium
        } else if available_fraction >= self.low {
            ConfidenceLevel::Low
        } else {
            ConfidenceLevel::Insufficient
        };
        if length_flagged {
            level.downgraded()
        } else {
            level
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thresholds() -> ConfidenceThresholds {
        ConfidenceThresholds::new(0.85, 0.70, 0.50).unwrap()
    }

    #[test]
    fn full_availability_is_high() {
        assert_eq!(thresholds().level(1.0, false), ConfidenceLevel::High);
    }

    #[test]
    fn thresholds_are_inclusive() {
        assert_eq!(thresholds().level(0.70, false), ConfidenceLevel::Medium);
        assert_eq!(thresholds().level(0.50, false), ConfidenceLevel::Low);
    }

    #[test]
    fn below_low_is_insufficient() {
        assert_eq!(thresholds().level(0.2, false), ConfidenceLevel::Insufficient);
    }

    #[test]
    fn length_flag_downgrades_one_level() {
        assert_eq!(thresholds().level(1.0, true), ConfidenceLevel::Medium);
        assert_eq!(thresholds().level(0.1, true), ConfidenceLevel::Insufficient);
    }

    #[test]
    fn rejects_inverted_thresholds() {
        let result = ConfidenceThresholds::new(0.5, 0.7, 0.3);
        assert!(matches!(result, Err(ConfigError::InvalidConfidence { .. })));
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(ConfidenceThresholds::new(1.2, 0.7, 0.5).is_err());
        assert!(ConfidenceThresholds::new(0.9, 0.7, f64::NAN).is_err());
    }
}
