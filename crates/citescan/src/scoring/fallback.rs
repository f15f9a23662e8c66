//! Fallback advice: when to re-capture and which preprocessing to try.
//!
//! The capture pipeline reads [`FallbackAdvisor::should_use_fallback`] and
//! [`FallbackAdvisor::suggest_preprocessing`] after scoring to decide whether to
//! run OCR again on an enhanced image.

use super::classifier::ConfidenceLevel;
use super::result::{ComponentKind, ConfidenceResult};
use crate::core::config::FallbackConfig;
use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Bitmask of image preprocessing operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PreprocessOptions(u32);

impl PreprocessOptions {
    pub const NONE: Self = Self(0);
    pub const ENHANCE_CONTRAST: Self = Self(0x01);
    pub const REDUCE_NOISE: Self = Self(0x02);
    pub const BINARIZE: Self = Self(0x04);
    pub const CORRECT_PERSPECTIVE: Self = Self(0x08);

    const NAMED: [(Self, &'static str); 4] = [
        (Self::ENHANCE_CONTRAST, "enhance_contrast"),
        (Self::REDUCE_NOISE, "reduce_noise"),
        (Self::BINARIZE, "binarize"),
        (Self::CORRECT_PERSPECTIVE, "correct_perspective"),
    ];

    pub const fn bits(&self) -> u32 {
        self.0
    }

    /// Build from raw bits, dropping unknown ones.
    pub const fn from_bits_truncate(bits: u32) -> Self {
        Self(bits & 0x0F)
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Names of the set flags, in bit order.
    pub fn names(&self) -> Vec<&'static str> {
        Self::NAMED
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect()
    }
}

impl BitOr for PreprocessOptions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for PreprocessOptions {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for PreprocessOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        f.write_str(&self.names().join("|"))
    }
}

impl Serialize for PreprocessOptions {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.names())
    }
}

/// Decides fallback and preprocessing from a scored result.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FallbackAdvisor {
    config: FallbackConfig,
}

impl FallbackAdvisor {
    pub fn new(config: FallbackConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FallbackConfig {
        &self.config
    }

    /// Low results always fall back. Medium results fall back when the
    /// observations also disagree (consistency below the stricter threshold).
    pub fn should_use_fallback(&self, result: &ConfidenceResult) -> bool {
        match result.level() {
            ConfidenceLevel::Low => true,
            ConfidenceLevel::Medium => {
                result.component_score(ComponentKind::Consistency) < self.config.consistency_threshold
            }
            ConfidenceLevel::High => false,
        }
    }

    /// Preprocessing to try on the next capture, with no history.
    pub fn suggest_preprocessing(&self, result: &ConfidenceResult) -> PreprocessOptions {
        self.suggest_preprocessing_after(result, PreprocessOptions::NONE)
    }

    /// Preprocessing to try given what the previous attempt already applied.
    ///
    /// Weak vision after a contrast-enhanced attempt adds perspective correction.
    pub fn suggest_preprocessing_after(
        &self,
        result: &ConfidenceResult,
        previous: PreprocessOptions,
    ) -> PreprocessOptions {
        let is_weak = |kind| result.component_score(kind) < self.config.weak_component_threshold;
        let mut options = PreprocessOptions::NONE;

        if is_weak(ComponentKind::Vision) {
            options |= PreprocessOptions::ENHANCE_CONTRAST | PreprocessOptions::REDUCE_NOISE;
            if previous.contains(PreprocessOptions::ENHANCE_CONTRAST) {
                options |= PreprocessOptions::CORRECT_PERSPECTIVE;
            }
        }

        if is_weak(ComponentKind::PatternMatch) || is_weak(ComponentKind::TextCompleteness) {
            options |= PreprocessOptions::BINARIZE;
        }

        options
    }
}
