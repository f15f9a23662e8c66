//! City citation patterns.
//!
//! Each city has a citation-number regex, a pattern priority (1 = most specific,
//! 4 = least) and the expected citation length. The scorer only needs
//! [`CityPatternTable::lookup`]; [`CityTable`] also matches OCR text against the
//! patterns to find which city a citation belongs to.
//!
//! Tables are read-only once built and can be shared across threads.

use crate::core::config::read_config;
use crate::scoring::components::{LengthRange, MAX_PATTERN_PRIORITY};
use crate::text::OcrText;
use crate::{CitescanError, Result};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What the scorer needs to know about a city.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CityPatternEntry {
    pub length: LengthRange,
    pub priority: i32,
}

/// Read-only `city_id -> (length range, priority)` lookup.
///
/// Unknown ids return `None`, which the scorer treats as "no match".
pub trait CityPatternTable: Send + Sync {
    fn lookup(&self, city_id: &str) -> Option<CityPatternEntry>;
}

/// City pattern definition as written in a table file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityPattern {
    pub city_id: String,
    pub city_name: String,
    pub regex: String,
    pub priority: i32,
    pub length_min: i32,
    pub length_max: i32,
    #[serde(default)]
    pub format_example: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CityTableFile {
    #[serde(default)]
    cities: Vec<CityPattern>,
}

#[derive(Debug, Clone)]
struct CompiledPattern {
    pattern: CityPattern,
    regex: Regex,
}

/// A citation number found in OCR text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CityMatch {
    pub city_id: String,
    pub city_name: String,
    pub priority: i32,
    pub citation_number: String,
}

/// City pattern table with compiled regexes, kept in priority order.
#[derive(Debug, Clone, Default)]
pub struct CityTable {
    patterns: IndexMap<String, CompiledPattern>,
}

static BUILTIN_CITY_TABLE: Lazy<CityTable> = Lazy::new(|| {
    CityTable::from_patterns(builtin_patterns()).expect("Built-in city patterns are valid and should compile")
});

fn builtin_patterns() -> Vec<CityPattern> {
    vec![
        CityPattern {
            city_id: "us-ca-san_francisco".to_string(),
            city_name: "San Francisco".to_string(),
            regex: "^(SFMTA|MT)[0-9]{8}$".to_string(),
            priority: 1,
            length_min: 10,
            length_max: 13,
            format_example: Some("SFMTA91234567".to_string()),
        },
        CityPattern {
            city_id: "us-ny-new_york".to_string(),
            city_name: "New York".to_string(),
            regex: "^[0-9]{10}$".to_string(),
            priority: 2,
            length_min: 10,
            length_max: 10,
            format_example: Some("1234567890".to_string()),
        },
        CityPattern {
            city_id: "us-co-denver".to_string(),
            city_name: "Denver".to_string(),
            regex: "^[0-9]{5,9}$".to_string(),
            priority: 3,
            length_min: 5,
            length_max: 9,
            format_example: Some("1234567".to_string()),
        },
        CityPattern {
            city_id: "us-ca-los_angeles".to_string(),
            city_name: "Los Angeles".to_string(),
            regex: "^[0-9A-Z]{6,11}$".to_string(),
            priority: 4,
            length_min: 6,
            length_max: 11,
            format_example: Some("LA123456".to_string()),
        },
    ]
}

fn compile(pattern: CityPattern) -> Result<CompiledPattern> {
    if pattern.city_id.trim().is_empty() {
        return Err(CitescanError::validation("City id cannot be empty"));
    }

    if !(1..=MAX_PATTERN_PRIORITY).contains(&pattern.priority) {
        return Err(CitescanError::validation(format!(
            "City '{}' has priority {}, expected 1..={}",
            pattern.city_id, pattern.priority, MAX_PATTERN_PRIORITY
        )));
    }

    if pattern.length_min < 0 || pattern.length_max < pattern.length_min {
        return Err(CitescanError::validation(format!(
            "City '{}' has invalid length range [{}, {}]",
            pattern.city_id, pattern.length_min, pattern.length_max
        )));
    }

    let regex = Regex::new(&pattern.regex).map_err(|e| {
        CitescanError::validation_with_source(
            format!("City '{}' has an invalid citation regex", pattern.city_id),
            e,
        )
    })?;

    Ok(CompiledPattern { pattern, regex })
}

impl CityTable {
    /// The built-in table of supported cities.
    pub fn builtin() -> &'static CityTable {
        &BUILTIN_CITY_TABLE
    }

    /// Build a table, validating and compiling every pattern.
    ///
    /// # Errors
    ///
    /// `CitescanError::Validation` for duplicate ids, priorities outside 1..=4,
    /// bad length ranges or regexes that don't compile.
    pub fn from_patterns(patterns: impl IntoIterator<Item = CityPattern>) -> Result<Self> {
        let mut compiled: Vec<CompiledPattern> = Vec::new();
        for pattern in patterns {
            if compiled.iter().any(|c| c.pattern.city_id == pattern.city_id) {
                return Err(CitescanError::validation(format!(
                    "Duplicate city id '{}' in city table",
                    pattern.city_id
                )));
            }
            compiled.push(compile(pattern)?);
        }

        compiled.sort_by_key(|c| c.pattern.priority);

        Ok(Self {
            patterns: compiled
                .into_iter()
                .map(|c| (c.pattern.city_id.clone(), c))
                .collect(),
        })
    }

    /// Load a table from TOML (`[[cities]]` entries).
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_config(path.as_ref())?;
        let file: CityTableFile = toml::from_str(&content)
            .map_err(|e| CitescanError::validation(format!("Invalid TOML in {}: {}", path.as_ref().display(), e)))?;
        Self::from_patterns(file.cities)
    }

    /// Load a table from YAML (`cities:` list).
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_config(path.as_ref())?;
        let file: CityTableFile = serde_yaml_ng::from_str(&content)
            .map_err(|e| CitescanError::validation(format!("Invalid YAML in {}: {}", path.as_ref().display(), e)))?;
        Self::from_patterns(file.cities)
    }

    /// Load a table from JSON (`{"cities": [...]}`).
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_config(path.as_ref())?;
        let file: CityTableFile = serde_json::from_str(&content)
            .map_err(|e| CitescanError::validation(format!("Invalid JSON in {}: {}", path.as_ref().display(), e)))?;
        Self::from_patterns(file.cities)
    }

    pub fn get(&self, city_id: &str) -> Option<&CityPattern> {
        self.patterns.get(city_id).map(|c| &c.pattern)
    }

    /// Patterns in priority order, most specific first.
    pub fn patterns(&self) -> impl Iterator<Item = &CityPattern> {
        self.patterns.values().map(|c| &c.pattern)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Find the most specific city whose pattern matches the normalized text.
    pub fn match_text(&self, text: &OcrText) -> Option<CityMatch> {
        let normalized = text.normalized();
        self.patterns
            .values()
            .find_map(|compiled| Self::match_compiled(compiled, &normalized))
    }

    /// Try the hinted city first, then fall back to [`CityTable::match_text`].
    pub fn match_with_hint(&self, text: &OcrText, city_id: &str) -> Option<CityMatch> {
        let normalized = text.normalized();
        self.patterns
            .get(city_id)
            .and_then(|compiled| Self::match_compiled(compiled, &normalized))
            .or_else(|| {
                self.patterns
                    .values()
                    .find_map(|compiled| Self::match_compiled(compiled, &normalized))
            })
    }

    fn match_compiled(compiled: &CompiledPattern, normalized: &str) -> Option<CityMatch> {
        compiled.regex.find(normalized).map(|m| CityMatch {
            city_id: compiled.pattern.city_id.clone(),
            city_name: compiled.pattern.city_name.clone(),
            priority: compiled.pattern.priority,
            citation_number: m.as_str().to_string(),
        })
    }
}

impl CityPatternTable for CityTable {
    fn lookup(&self, city_id: &str) -> Option<CityPatternEntry> {
        self.get(city_id).map(|pattern| CityPatternEntry {
            length: LengthRange {
                min: pattern.length_min,
                max: pattern.length_max,
            },
            priority: pattern.priority,
        })
    }
}
