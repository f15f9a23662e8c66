use super::classifier::{ConfidenceLevel, Recommendation};
use super::components::{CONSISTENCY_WEIGHT, PATTERN_MATCH_WEIGHT, TEXT_COMPLETENESS_WEIGHT, VISION_WEIGHT};
use crate::Result;
use crate::core::config::ConfidenceThresholds;
use serde::{Deserialize, Serialize};

/// The four scoring dimensions, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    Vision,
    PatternMatch,
    TextCompleteness,
    Consistency,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 4] = [
        ComponentKind::Vision,
        ComponentKind::PatternMatch,
        ComponentKind::TextCompleteness,
        ComponentKind::Consistency,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Vision => "vision",
            Self::PatternMatch => "pattern_match",
            Self::TextCompleteness => "text_completeness",
            Self::Consistency => "consistency",
        }
    }

    pub fn weight(&self) -> f64 {
        match self {
            Self::Vision => VISION_WEIGHT,
            Self::PatternMatch => PATTERN_MATCH_WEIGHT,
            Self::TextCompleteness => TEXT_COMPLETENESS_WEIGHT,
            Self::Consistency => CONSISTENCY_WEIGHT,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

/// One named scoring dimension.
///
/// The weighted score is computed from the score at construction and can't be
/// set on its own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceComponent {
    #[serde(rename = "name")]
    kind: ComponentKind,
    score: f64,
    weight: f64,
    weighted_score: f64,
}

impl ConfidenceComponent {
    pub fn new(kind: ComponentKind, score: f64) -> Self {
        let weight = kind.weight();
        Self {
            kind,
            score,
            weight,
            weighted_score: score * weight,
        }
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn weighted_score(&self) -> f64 {
        self.weighted_score
    }
}

/// Raw component scores, before weighting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComponentScores {
    pub vision: f64,
    pub pattern_match: f64,
    pub text_completeness: f64,
    pub consistency: f64,
}

impl ComponentScores {
    pub fn get(&self, kind: ComponentKind) -> f64 {
        match kind {
            ComponentKind::Vision => self.vision,
            ComponentKind::PatternMatch => self.pattern_match,
            ComponentKind::TextCompleteness => self.text_completeness,
            ComponentKind::Consistency => self.consistency,
        }
    }
}

/// Outcome of one scoring call.
///
/// An immutable snapshot: level, recommendation and auto-accept are derived
/// from the overall confidence when the result is built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfidenceResult {
    overall_confidence: f64,
    level: ConfidenceLevel,
    components: Vec<ConfidenceComponent>,
    recommendation: Recommendation,
    should_auto_accept: bool,
}

impl ConfidenceResult {
    /// Weight, sum and classify. The only place a result is constructed.
    pub(crate) fn assemble(scores: ComponentScores, thresholds: &ConfidenceThresholds) -> Result<Self> {
        let mut components = Vec::new();
        components.try_reserve_exact(ComponentKind::ALL.len())?;
        components.extend(
            ComponentKind::ALL
                .iter()
                .map(|&kind| ConfidenceComponent::new(kind, scores.get(kind))),
        );

        let overall_confidence = components
            .iter()
            .map(ConfidenceComponent::weighted_score)
            .sum::<f64>()
            .clamp(0.0, 1.0);

        let level = thresholds.level_for(overall_confidence);

        Ok(Self {
            overall_confidence,
            level,
            components,
            recommendation: level.recommendation(),
            should_auto_accept: thresholds.meets_auto_accept(overall_confidence),
        })
    }

    pub fn overall_confidence(&self) -> f64 {
        self.overall_confidence
    }

    pub fn level(&self) -> ConfidenceLevel {
        self.level
    }

    /// Components in order: vision, pattern match, text completeness, consistency.
    pub fn components(&self) -> &[ConfidenceComponent] {
        &self.components
    }

    pub fn recommendation(&self) -> Recommendation {
        self.recommendation
    }

    pub fn should_auto_accept(&self) -> bool {
        self.should_auto_accept
    }

    pub fn component(&self, kind: ComponentKind) -> Option<&ConfidenceComponent> {
        self.components.iter().find(|c| c.kind == kind)
    }

    pub fn component_by_name(&self, name: &str) -> Option<&ConfidenceComponent> {
        ComponentKind::from_name(name).and_then(|kind| self.component(kind))
    }

    /// Score of one component; every result carries all four.
    pub fn component_score(&self, kind: ComponentKind) -> f64 {
        self.component(kind).map(ConfidenceComponent::score).unwrap_or(0.0)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
