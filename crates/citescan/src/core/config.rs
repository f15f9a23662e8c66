//! Configuration loading and management.
//!
//! Scoring thresholds are tunable per deployment. They live in one
//! `ScoringConfig` value handed to the scorer, so the classifier and the
//! auto-accept check always read the same numbers. Component weights are not
//! configurable; see [`crate::scoring::components`].

use crate::{CitescanError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the file `ScoringConfig::discover` looks for.
pub const CONFIG_FILE_NAME: &str = "citescan.toml";

/// Main scoring configuration.
///
/// # Example
///
/// ```rust
/// use citescan::core::config::ScoringConfig;
///
/// let config = ScoringConfig::default();
/// assert_eq!(config.thresholds.high, 0.85);
/// assert_eq!(config.thresholds.medium, 0.60);
///
/// // let config = ScoringConfig::from_toml_file("citescan.toml")?;
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Level boundaries on the overall confidence
    #[serde(default)]
    pub thresholds: ConfidenceThresholds,

    /// Fallback advisor tuning
    #[serde(default)]
    pub fallback: FallbackConfig,
}

/// Level boundaries.
///
/// `overall >= high` is High (and auto-accepted), `overall >= medium` is Medium,
/// anything lower is Low.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceThresholds {
    #[serde(default = "default_high_threshold")]
    pub high: f64,

    #[serde(default = "default_medium_threshold")]
    pub medium: f64,
}

/// Fallback advisor configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FallbackConfig {
    /// A Medium result whose consistency score falls below this also triggers fallback
    #[serde(default = "default_consistency_threshold")]
    pub consistency_threshold: f64,

    /// Component scores below this count as weak when suggesting preprocessing
    #[serde(default = "default_weak_component_threshold")]
    pub weak_component_threshold: f64,
}

fn default_high_threshold() -> f64 {
    0.85
}
fn default_medium_threshold() -> f64 {
    0.60
}
fn default_consistency_threshold() -> f64 {
    0.5
}
fn default_weak_component_threshold() -> f64 {
    0.5
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self {
            high: default_high_threshold(),
            medium: default_medium_threshold(),
        }
    }
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            consistency_threshold: default_consistency_threshold(),
            weak_component_threshold: default_weak_component_threshold(),
        }
    }
}

fn check_unit_interval(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(CitescanError::validation(format!(
            "{} must be within [0.0, 1.0], got {}",
            name, value
        )));
    }
    Ok(())
}

impl ConfidenceThresholds {
    pub fn validate(&self) -> Result<()> {
        check_unit_interval("thresholds.high", self.high)?;
        check_unit_interval("thresholds.medium", self.medium)?;
        if self.medium > self.high {
            return Err(CitescanError::validation(format!(
                "thresholds.medium ({}) must not exceed thresholds.high ({})",
                self.medium, self.high
            )));
        }
        Ok(())
    }
}

impl FallbackConfig {
    pub fn validate(&self) -> Result<()> {
        check_unit_interval("fallback.consistency_threshold", self.consistency_threshold)?;
        check_unit_interval("fallback.weak_component_threshold", self.weak_component_threshold)
    }
}

impl ScoringConfig {
    /// Check every threshold is a finite value in `[0.0, 1.0]` and levels are ordered.
    ///
    /// # Errors
    ///
    /// Returns `CitescanError::Validation` naming the offending field.
    pub fn validate(&self) -> Result<()> {
        self.thresholds.validate()?;
        self.fallback.validate()
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `CitescanError::Validation` if the file can't be read, is invalid
    /// TOML, or holds out-of-range thresholds.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_config(path.as_ref())?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| CitescanError::validation(format!("Invalid TOML in {}: {}", path.as_ref().display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_config(path.as_ref())?;
        let config: Self = serde_yaml_ng::from_str(&content)
            .map_err(|e| CitescanError::validation(format!("Invalid YAML in {}: {}", path.as_ref().display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_config(path.as_ref())?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| CitescanError::validation(format!("Invalid JSON in {}: {}", path.as_ref().display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file, picking the format by extension (`.toml`, `.yaml`/`.yml`, `.json`).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_file(path),
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(CitescanError::validation(format!(
                "Unsupported config file extension: {}",
                path.display()
            ))),
        }
    }

    /// Discover `citescan.toml` in the current directory or its parents.
    ///
    /// # Returns
    ///
    /// - `Some(config)` if found
    /// - `None` if no config file found
    pub fn discover() -> Result<Option<Self>> {
        let mut current = std::env::current_dir().map_err(CitescanError::Io)?;

        loop {
            let candidate = current.join(CONFIG_FILE_NAME);
            if candidate.exists() {
                tracing::debug!("Using scoring config {}", candidate.display());
                return Ok(Some(Self::from_toml_file(candidate)?));
            }

            if let Some(parent) = current.parent() {
                current = parent.to_path_buf();
            } else {
                break;
            }
        }

        Ok(None)
    }
}

pub(crate) fn read_config(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| CitescanError::validation(format!("Failed to read config file {}: {}", path.display(), e)))
}
