//! Telemetry snapshot of a scoring call.
//!
//! The telemetry layer batches and uploads these; this crate only builds them.

use crate::Result;
use crate::scoring::{ConfidenceLevel, ConfidenceResult, FallbackAdvisor, PreprocessOptions, Recommendation};
use serde::Serialize;

/// What telemetry records about one scored capture.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreTelemetry {
    pub overall_confidence: f64,
    pub level: ConfidenceLevel,
    pub recommendation: Recommendation,
    pub auto_accepted: bool,
    pub fallback_suggested: bool,
    pub suggested_preprocessing: PreprocessOptions,
}

impl ScoreTelemetry {
    pub fn from_result(result: &ConfidenceResult, advisor: &FallbackAdvisor) -> Self {
        Self {
            overall_confidence: result.overall_confidence(),
            level: result.level(),
            recommendation: result.recommendation(),
            auto_accepted: result.should_auto_accept(),
            fallback_suggested: advisor.should_use_fallback(result),
            suggested_preprocessing: advisor.suggest_preprocessing(result),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
