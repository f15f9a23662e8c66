//! citescan - OCR confidence scoring for parking citation capture
//!
//! Given the text an OCR pass recognized, the per-observation recognition
//! confidences and how specific the matched citation pattern is, citescan
//! produces an overall quality score, a confidence level, an
//! accept/review/reject recommendation and suggested preprocessing for a retry.
//!
//! # Quick Start
//!
//! ```rust
//! use citescan::{CityTable, ConfidenceScorer, OcrText, Recommendation};
//!
//! # fn main() -> citescan::Result<()> {
//! let scorer = ConfidenceScorer::default();
//! let text = OcrText::from("SFMTA91234567");
//!
//! let result = scorer.score_for_city(&text, &[0.95, 0.94], Some("us-ca-san_francisco"), CityTable::builtin())?;
//! assert_eq!(result.recommendation(), Recommendation::Accept);
//!
//! let advisor = scorer.advisor();
//! if advisor.should_use_fallback(&result) {
//!     println!("retry with {}", advisor.suggest_preprocessing(&result));
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **Scoring** (`scoring`): component calculators, aggregation, classification, fallback advice
//! - **City patterns** (`city`): per-city citation regex, priority and expected length
//! - **Text** (`text`): immutable OCR text buffer and normalization
//! - **Core** (`core`): configuration loading (TOML, YAML, JSON)
//! - **Telemetry** (`telemetry`): serializable snapshot of a scoring call
//!
//! Scoring is pure: no shared mutable state, no I/O, safe to call from any thread.

#![deny(unsafe_code)]

pub mod city;
pub mod core;
pub mod error;
pub mod scoring;
pub mod telemetry;
pub mod text;

pub use error::{CitescanError, Result};

pub use city::{CityMatch, CityPattern, CityPatternEntry, CityPatternTable, CityTable};
pub use core::config::{ConfidenceThresholds, FallbackConfig, ScoringConfig};
pub use scoring::{
    ComponentKind, ComponentScores, ConfidenceComponent, ConfidenceLevel, ConfidenceResult, ConfidenceScorer,
    DetectedScore, FallbackAdvisor, LengthRange, PreprocessOptions, Recommendation,
};
pub use telemetry::ScoreTelemetry;
pub use text::OcrText;
