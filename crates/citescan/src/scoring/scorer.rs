use super::components::{
    LengthRange, NEUTRAL_COMPLETENESS, calculate_consistency, calculate_pattern, calculate_vision,
    completeness_for_range, validate_confidences,
};
use super::fallback::FallbackAdvisor;
use super::result::{ComponentKind, ComponentScores, ConfidenceResult};
use crate::city::{CityMatch, CityPatternTable, CityTable};
use crate::core::config::ScoringConfig;
use crate::text::OcrText;
use crate::{CitescanError, Result};
use serde::Serialize;

/// Scores OCR results.
///
/// Holds the scoring configuration so every entry point classifies with the
/// same thresholds. All entry points normalize their inputs into
/// [`ComponentScores`] and go through [`ConfidenceScorer::score_components`].
///
/// The scorer is immutable and `Send + Sync`; share one across threads.
///
/// # Example
///
/// ```rust
/// use citescan::{ConfidenceScorer, ConfidenceLevel, OcrText};
///
/// # fn main() -> citescan::Result<()> {
/// let scorer = ConfidenceScorer::default();
/// let text = OcrText::from("1234567890");
/// let result = scorer.score(&text, &[0.9, 0.92, 0.88], 1, 8, 12)?;
///
/// assert_eq!(result.level(), ConfidenceLevel::High);
/// assert!(result.should_auto_accept());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfidenceScorer {
    config: ScoringConfig,
}

/// Result of scoring text whose city was detected from its citation pattern.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectedScore {
    pub city: Option<CityMatch>,
    pub result: ConfidenceResult,
}

impl ConfidenceScorer {
    /// Create a scorer, validating the configuration first.
    ///
    /// # Errors
    ///
    /// `CitescanError::Validation` if the thresholds are out of range or unordered.
    pub fn new(config: ScoringConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Fallback advisor using this scorer's fallback configuration.
    pub fn advisor(&self) -> FallbackAdvisor {
        FallbackAdvisor::new(self.config.fallback)
    }

    /// Weight, sum and classify already-computed component scores.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if any score is non-finite or outside `[0.0, 1.0]`.
    /// `OutOfMemory` if the result can't be allocated.
    pub fn score_components(&self, scores: ComponentScores) -> Result<ConfidenceResult> {
        for kind in ComponentKind::ALL {
            let value = scores.get(kind);
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(CitescanError::invalid_argument(format!(
                    "{} score {} is outside [0.0, 1.0]",
                    kind.name(),
                    value
                )));
            }
        }

        let result = ConfidenceResult::assemble(scores, &self.config.thresholds)?;
        tracing::debug!(
            overall = result.overall_confidence(),
            level = %result.level(),
            auto_accept = result.should_auto_accept(),
            "Scored OCR result"
        );
        Ok(result)
    }

    /// Full form: raw text, per-observation confidences, pattern priority and
    /// the expected length range.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a priority outside `0..=4`, a negative length bound,
    /// or a confidence that is non-finite or outside `[0.0, 1.0]`.
    pub fn score(
        &self,
        text: &OcrText,
        confidences: &[f64],
        pattern_priority: i32,
        target_min: i32,
        target_max: i32,
    ) -> Result<ConfidenceResult> {
        let outcome = LengthRange::new(target_min, target_max)
            .and_then(|range| self.score_with_range(text, confidences, pattern_priority, range));
        log_rejection(outcome)
    }

    fn score_with_range(
        &self,
        text: &OcrText,
        confidences: &[f64],
        pattern_priority: i32,
        range: LengthRange,
    ) -> Result<ConfidenceResult> {
        validate_confidences(confidences)?;

        self.score_components(ComponentScores {
            vision: calculate_vision(confidences),
            pattern_match: calculate_pattern(pattern_priority)?,
            text_completeness: completeness_for_range(text.byte_len(), range),
            consistency: calculate_consistency(confidences),
        })
    }

    /// Simplified form for callers that only have an average confidence.
    ///
    /// Without per-observation data consistency is taken as perfect, and without
    /// a target range completeness is neutral.
    pub fn score_simple(&self, average_confidence: f64, pattern_priority: i32) -> Result<ConfidenceResult> {
        let outcome = validate_confidences(&[average_confidence]).and_then(|()| {
            self.score_components(ComponentScores {
                vision: average_confidence,
                pattern_match: calculate_pattern(pattern_priority)?,
                text_completeness: NEUTRAL_COMPLETENESS,
                consistency: 1.0,
            })
        });
        log_rejection(outcome)
    }

    /// City-driven form: priority and length range come from the city table.
    ///
    /// An unknown or absent city scores as "no pattern match" with an unknown
    /// length range; that alone is not an error.
    pub fn score_for_city(
        &self,
        text: &OcrText,
        confidences: &[f64],
        city_id: Option<&str>,
        table: &dyn CityPatternTable,
    ) -> Result<ConfidenceResult> {
        let entry = city_id.and_then(|id| {
            let entry = table.lookup(id);
            if entry.is_none() {
                tracing::debug!("Unknown city id '{}', scoring without pattern match", id);
            }
            entry
        });

        let (priority, range) = match entry {
            Some(entry) => (entry.priority, entry.length),
            None => (0, LengthRange::UNKNOWN),
        };

        log_rejection(self.score_with_range(text, confidences, priority, range))
    }

    /// Detect the city from the text's citation pattern, then score for that city.
    ///
    /// When a pattern matches, completeness is judged on the matched citation
    /// number rather than the raw text. An optional hint is tried first.
    pub fn score_detected(
        &self,
        text: &OcrText,
        confidences: &[f64],
        table: &CityTable,
        city_hint: Option<&str>,
    ) -> Result<DetectedScore> {
        let city = match city_hint {
            Some(hint) => table.match_with_hint(text, hint),
            None => table.match_text(text),
        };

        let result = match &city {
            Some(found) => {
                let citation = OcrText::from(found.citation_number.as_str());
                self.score_for_city(&citation, confidences, Some(&found.city_id), table)?
            }
            None => self.score_for_city(text, confidences, None, table)?,
        };

        Ok(DetectedScore { city, result })
    }
}

fn log_rejection<T>(outcome: Result<T>) -> Result<T> {
    outcome.inspect_err(|err| {
        if err.is_invalid_argument() {
            tracing::warn!("Skipping confidence scoring: {}", err);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::CityPatternEntry;
    use crate::core::config::ConfidenceThresholds;
    use crate::scoring::classifier::{ConfidenceLevel, Recommendation};

    struct FixedTable;

    impl CityPatternTable for FixedTable {
        fn lookup(&self, city_id: &str) -> Option<CityPatternEntry> {
            (city_id == "test-city").then_some(CityPatternEntry {
                length: LengthRange { min: 8, max: 12 },
                priority: 2,
            })
        }
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = ScoringConfig {
            thresholds: ConfidenceThresholds { high: 0.5, medium: 0.9 },
            ..Default::default()
        };
        assert!(matches!(
            ConfidenceScorer::new(config).unwrap_err(),
            CitescanError::Validation { .. }
        ));
    }

    #[test]
    fn test_score_full_form() {
        let scorer = ConfidenceScorer::default();
        let result = scorer
            .score(&OcrText::from("1234567890"), &[0.9, 0.92, 0.88], 1, 8, 12)
            .unwrap();

        assert!((result.component_score(ComponentKind::Vision) - 0.9).abs() < 1e-9);
        assert_eq!(result.component_score(ComponentKind::PatternMatch), 1.0);
        assert_eq!(result.component_score(ComponentKind::TextCompleteness), 1.0);
        assert!(result.component_score(ComponentKind::Consistency) > 0.9);
        assert_eq!(result.level(), ConfidenceLevel::High);
    }

    #[test]
    fn test_score_rejects_bad_inputs() {
        let scorer = ConfidenceScorer::default();
        let text = OcrText::from("1234567890");

        assert!(scorer.score(&text, &[0.9], 5, 8, 12).unwrap_err().is_invalid_argument());
        assert!(scorer.score(&text, &[0.9], -1, 8, 12).unwrap_err().is_invalid_argument());
        assert!(scorer.score(&text, &[0.9], 1, -8, 12).unwrap_err().is_invalid_argument());
        assert!(scorer.score(&text, &[1.1], 1, 8, 12).unwrap_err().is_invalid_argument());
        assert!(scorer.score(&text, &[f64::NAN], 1, 8, 12).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_score_unordered_range_is_neutral() {
        let scorer = ConfidenceScorer::default();
        let result = scorer.score(&OcrText::from("123"), &[0.8], 3, 12, 8).unwrap();
        assert_eq!(result.component_score(ComponentKind::TextCompleteness), 0.5);
    }

    #[test]
    fn test_score_simple() {
        let scorer = ConfidenceScorer::default();
        let result = scorer.score_simple(0.8, 2).unwrap();

        assert_eq!(result.component_score(ComponentKind::Vision), 0.8);
        assert_eq!(result.component_score(ComponentKind::PatternMatch), 0.85);
        assert_eq!(result.component_score(ComponentKind::TextCompleteness), 0.5);
        assert_eq!(result.component_score(ComponentKind::Consistency), 1.0);
        // 0.32 + 0.255 + 0.1 + 0.1
        assert!((result.overall_confidence() - 0.775).abs() < 1e-9);
        assert_eq!(result.recommendation(), Recommendation::Review);
    }

    #[test]
    fn test_score_simple_rejects_bad_average() {
        let scorer = ConfidenceScorer::default();
        assert!(scorer.score_simple(1.5, 1).unwrap_err().is_invalid_argument());
        assert!(scorer.score_simple(f64::NAN, 1).is_err());
        assert!(scorer.score_simple(0.5, 9).is_err());
    }

    #[test]
    fn test_score_simple_agrees_with_components() {
        let scorer = ConfidenceScorer::default();
        let simple = scorer.score_simple(0.7, 3).unwrap();
        let canonical = scorer
            .score_components(ComponentScores {
                vision: 0.7,
                pattern_match: 0.70,
                text_completeness: 0.5,
                consistency: 1.0,
            })
            .unwrap();
        assert_eq!(simple, canonical);
    }

    #[test]
    fn test_score_for_city_known() {
        let scorer = ConfidenceScorer::default();
        let text = OcrText::from("1234567890");
        let by_city = scorer
            .score_for_city(&text, &[0.9, 0.8], Some("test-city"), &FixedTable)
            .unwrap();
        let full = scorer.score(&text, &[0.9, 0.8], 2, 8, 12).unwrap();
        assert_eq!(by_city, full);
    }

    #[test]
    fn test_score_for_city_unknown_or_absent() {
        let scorer = ConfidenceScorer::default();
        let text = OcrText::from("1234567890");

        for city in [Some("nowhere"), None] {
            let result = scorer.score_for_city(&text, &[0.9], city, &FixedTable).unwrap();
            assert_eq!(result.component_score(ComponentKind::PatternMatch), 0.0);
            assert_eq!(result.component_score(ComponentKind::TextCompleteness), 0.5);
        }
    }

    #[test]
    fn test_score_detected_uses_matched_citation() {
        let scorer = ConfidenceScorer::default();
        let detected = scorer
            .score_detected(&OcrText::from("sfmta 9123 4567"), &[0.95, 0.94], CityTable::builtin(), None)
            .unwrap();

        let city = detected.city.unwrap();
        assert_eq!(city.city_id, "us-ca-san_francisco");
        assert_eq!(detected.result.component_score(ComponentKind::PatternMatch), 1.0);
        assert_eq!(detected.result.component_score(ComponentKind::TextCompleteness), 1.0);
        assert!(detected.result.should_auto_accept());
    }

    #[test]
    fn test_score_detected_no_match() {
        let scorer = ConfidenceScorer::default();
        let detected = scorer
            .score_detected(&OcrText::from("--"), &[0.9], CityTable::builtin(), None)
            .unwrap();

        assert!(detected.city.is_none());
        assert_eq!(detected.result.component_score(ComponentKind::PatternMatch), 0.0);
    }

    #[test]
    fn test_retuned_thresholds_flow_into_results() {
        let scorer = ConfidenceScorer::new(ScoringConfig {
            thresholds: ConfidenceThresholds { high: 0.99, medium: 0.85 },
            ..Default::default()
        })
        .unwrap();

        let result = scorer.score_simple(1.0, 1).unwrap();
        // 0.4 + 0.3 + 0.1 + 0.1
        assert_eq!(result.level(), ConfidenceLevel::Medium);
        assert!(!result.should_auto_accept());
    }

    #[test]
    fn test_scorer_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ConfidenceScorer>();
    }
}
