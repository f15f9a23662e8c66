//! Level and recommendation classification.
//!
//! Everything here is a pure function of the overall confidence and one
//! [`ConfidenceThresholds`] value. The scorer derives `should_auto_accept` from
//! the same thresholds, so the two cannot disagree.

use crate::core::config::ConfidenceThresholds;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete confidence level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

/// What the capture pipeline should do with the recognized text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Reject,
    Review,
    Accept,
}

impl ConfidenceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn requires_review(&self) -> bool {
        *self != Self::High
    }

    pub fn recommendation(&self) -> Recommendation {
        match self {
            Self::High => Recommendation::Accept,
            Self::Medium => Recommendation::Review,
            Self::Low => Recommendation::Reject,
        }
    }

    /// Message shown to the user next to the recognized citation number.
    pub fn message(&self) -> &'static str {
        match self {
            Self::High => "High confidence - looks correct",
            Self::Medium => "Medium confidence - please verify",
            Self::Low => "Low confidence - please check and edit",
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reject => "reject",
            Self::Review => "review",
            Self::Accept => "accept",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ConfidenceThresholds {
    pub fn level_for(&self, overall: f64) -> ConfidenceLevel {
        if overall >= self.high {
            ConfidenceLevel::High
        } else if overall >= self.medium {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }

    pub fn recommendation_for(&self, overall: f64) -> Recommendation {
        self.level_for(overall).recommendation()
    }

    pub fn meets_auto_accept(&self, overall: f64) -> bool {
        overall >= self.high
    }

    pub fn requires_review(&self, overall: f64) -> bool {
        !self.meets_auto_accept(overall)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level_boundaries() {
        let thresholds = ConfidenceThresholds::default();
        assert_eq!(thresholds.level_for(0.85), ConfidenceLevel::High);
        assert_eq!(thresholds.level_for(1.0), ConfidenceLevel::High);
        assert_eq!(thresholds.level_for(0.8499), ConfidenceLevel::Medium);
        assert_eq!(thresholds.level_for(0.60), ConfidenceLevel::Medium);
        assert_eq!(thresholds.level_for(0.5999), ConfidenceLevel::Low);
        assert_eq!(thresholds.level_for(0.0), ConfidenceLevel::Low);
    }

    #[test]
    fn test_recommendations() {
        let thresholds = ConfidenceThresholds::default();
        assert_eq!(thresholds.recommendation_for(0.9), Recommendation::Accept);
        assert_eq!(thresholds.recommendation_for(0.7), Recommendation::Review);
        assert_eq!(thresholds.recommendation_for(0.2), Recommendation::Reject);
    }

    #[test]
    fn test_auto_accept_agrees_with_level_everywhere() {
        let thresholds = ConfidenceThresholds::default();
        for step in 0..=10_000 {
            let overall = step as f64 / 10_000.0;
            assert_eq!(
                thresholds.meets_auto_accept(overall),
                thresholds.level_for(overall) == ConfidenceLevel::High,
                "disagreement at {}",
                overall
            );
            assert_eq!(
                thresholds.requires_review(overall),
                thresholds.level_for(overall).requires_review()
            );
        }
    }

    #[test]
    fn test_retuned_thresholds() {
        let thresholds = ConfidenceThresholds { high: 0.95, medium: 0.5 };
        assert_eq!(thresholds.level_for(0.9), ConfidenceLevel::Medium);
        assert!(!thresholds.meets_auto_accept(0.9));
        assert_eq!(thresholds.level_for(0.55), ConfidenceLevel::Medium);
    }

    #[test]
    fn test_messages() {
        assert_eq!(ConfidenceLevel::High.message(), "High confidence - looks correct");
        assert_eq!(ConfidenceLevel::Medium.message(), "Medium confidence - please verify");
        assert_eq!(ConfidenceLevel::Low.message(), "Low confidence - please check and edit");
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&ConfidenceLevel::Medium).unwrap(), "\"medium\"");
        assert_eq!(serde_json::to_string(&Recommendation::Reject).unwrap(), "\"reject\"");
        assert_eq!(ConfidenceLevel::Low.to_string(), "low");
        assert_eq!(Recommendation::Accept.to_string(), "accept");
    }
}
