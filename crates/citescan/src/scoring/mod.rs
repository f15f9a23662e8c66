//! Confidence scoring engine.
//!
//! Four component calculators feed a weighted aggregate, which is classified into
//! a level and recommendation and then inspected by the fallback advisor:
//!
//! - **components**: vision average, pattern specificity, text completeness,
//!   observation consistency (weights 0.40 / 0.30 / 0.20 / 0.10)
//! - **scorer**: the canonical weighting function and its entry points
//!   (full, simplified, city-driven, pattern-detected)
//! - **classifier**: thresholds to level, recommendation and auto-accept
//! - **fallback**: re-capture decision and preprocessing bitmask
//!
//! Scoring has no shared mutable state and does no I/O.
pub mod classifier;
pub mod components;
pub mod fallback;
pub mod result;
pub mod scorer;

pub use classifier::{ConfidenceLevel, Recommendation};
pub use components::{
    LengthRange, calculate_completeness, calculate_consistency, calculate_pattern, calculate_vision,
    validate_confidences,
};
pub use fallback::{FallbackAdvisor, PreprocessOptions};
pub use result::{ComponentKind, ComponentScores, ConfidenceComponent, ConfidenceResult};
pub use scorer::{ConfidenceScorer, DetectedScore};
