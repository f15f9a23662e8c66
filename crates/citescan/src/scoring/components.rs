//! The four component calculators.
//!
//! Each turns one input dimension into a score in `[0.0, 1.0]`. They are pure and
//! independent; the scorer combines them with the fixed weights below.

use crate::{CitescanError, Result};
use serde::{Deserialize, Serialize};

pub const VISION_WEIGHT: f64 = 0.40;
pub const PATTERN_MATCH_WEIGHT: f64 = 0.30;
pub const TEXT_COMPLETENESS_WEIGHT: f64 = 0.20;
pub const CONSISTENCY_WEIGHT: f64 = 0.10;

/// Completeness score when the expected length range is unknown.
pub const NEUTRAL_COMPLETENESS: f64 = 0.5;

/// Standard deviation at which consistency reaches 0.0.
///
/// 0.3 is what observations split between "very sure" and "very unsure" produce.
pub const CONSISTENCY_NORMALIZATION: f64 = 0.3;

/// Smallest distance over which completeness decays from 1.0 to 0.0.
///
/// Exact-length patterns (`[10, 10]`) would otherwise drop to 0.0 one character out.
pub const MIN_FALLOFF_WIDTH: f64 = 4.0;

/// Highest valid pattern priority.
pub const MAX_PATTERN_PRIORITY: i32 = 4;

/// Standard deviations below this are rounding noise; the observations agree.
pub const CONSISTENCY_EPSILON: f64 = 1e-12;

/// Inclusive expected text-length range for a citation pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthRange {
    pub min: i32,
    pub max: i32,
}

impl LengthRange {
    /// "Can't judge completeness" range, scored neutrally.
    pub const UNKNOWN: Self = Self { min: 0, max: 0 };

    /// Build a range, rejecting negative bounds.
    ///
    /// Unordered bounds (`min > max`) are accepted and treated as unknown.
    pub fn new(min: i32, max: i32) -> Result<Self> {
        if min < 0 || max < 0 {
            return Err(CitescanError::invalid_argument(format!(
                "length range bounds must be non-negative, got [{}, {}]",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    pub fn is_known(&self) -> bool {
        self.min <= self.max && self.max > 0
    }

    pub fn contains(&self, length: usize) -> bool {
        let length = i64::try_from(length).unwrap_or(i64::MAX);
        (self.min as i64..=self.max as i64).contains(&length)
    }
}

impl Default for LengthRange {
    fn default() -> Self {
        Self::UNKNOWN
    }
}

/// Check a confidence sequence satisfies the calculators' precondition.
///
/// Every value must be finite and within `[0.0, 1.0]`. Values are never clamped.
pub fn validate_confidences(confidences: &[f64]) -> Result<()> {
    if let Some((index, value)) = confidences
        .iter()
        .enumerate()
        .find(|(_, v)| !v.is_finite() || !(0.0..=1.0).contains(*v))
    {
        return Err(CitescanError::invalid_argument(format!(
            "observation confidence #{} is {}, expected a value within [0.0, 1.0]",
            index, value
        )));
    }
    Ok(())
}

/// Mean of the per-observation confidences. Empty input means no signal: 0.0.
///
/// Precondition: values are within `[0.0, 1.0]` (see [`validate_confidences`]).
pub fn calculate_vision(confidences: &[f64]) -> f64 {
    if confidences.is_empty() {
        return 0.0;
    }
    confidences.iter().sum::<f64>() / confidences.len() as f64
}

/// Score for the specificity of the matched citation pattern.
///
/// # Errors
///
/// `InvalidArgument` for anything outside `0..=4`.
pub fn calculate_pattern(priority: i32) -> Result<f64> {
    match priority {
        0 => Ok(0.0),
        1 => Ok(1.0),
        2 => Ok(0.85),
        3 => Ok(0.70),
        4 => Ok(0.50),
        _ => Err(CitescanError::invalid_argument(format!(
            "pattern priority {} is outside 0..={}",
            priority, MAX_PATTERN_PRIORITY
        ))),
    }
}

/// Score for how well the text length fits the expected range.
///
/// Unknown range (`min > max`, or both zero) scores [`NEUTRAL_COMPLETENESS`].
/// Inside the range scores 1.0. Outside, the score falls linearly with the
/// distance to the nearest bound over `max(max - min, MIN_FALLOFF_WIDTH)`
/// characters, floored at 0.0. Empty text outside the range is always 0.0.
///
/// # Errors
///
/// `InvalidArgument` if either bound is negative.
pub fn calculate_completeness(text_length: usize, target_min: i32, target_max: i32) -> Result<f64> {
    let range = LengthRange::new(target_min, target_max)?;
    Ok(completeness_for_range(text_length, range))
}

pub(crate) fn completeness_for_range(text_length: usize, range: LengthRange) -> f64 {
    if !range.is_known() {
        return NEUTRAL_COMPLETENESS;
    }
    if range.contains(text_length) {
        return 1.0;
    }
    if text_length == 0 {
        return 0.0;
    }

    let length = text_length as f64;
    let (min, max) = (range.min as f64, range.max as f64);
    let distance = if length < min { min - length } else { length - max };
    let falloff = (max - min).max(MIN_FALLOFF_WIDTH);

    (1.0 - distance / falloff).max(0.0)
}

/// Agreement between observations, from their population standard deviation.
///
/// Zero or one observation has nothing to disagree with and scores 1.0, as do
/// identical observations (spread below [`CONSISTENCY_EPSILON`]).
///
/// Precondition: values are within `[0.0, 1.0]` (see [`validate_confidences`]).
pub fn calculate_consistency(confidences: &[f64]) -> f64 {
    if confidences.len() <= 1 {
        return 1.0;
    }

    let count = confidences.len() as f64;
    let mean = confidences.iter().sum::<f64>() / count;
    let variance = confidences.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / count;
    let std_dev = variance.sqrt();
    if std_dev < CONSISTENCY_EPSILON {
        return 1.0;
    }

    (1.0 - (std_dev / CONSISTENCY_NORMALIZATION).min(1.0)).max(0.0)
}
