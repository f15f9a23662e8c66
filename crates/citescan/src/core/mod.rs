//! Core plumbing shared by the scoring engine and its callers.

pub mod config;

pub use config::{ConfidenceThresholds, FallbackConfig, ScoringConfig};
