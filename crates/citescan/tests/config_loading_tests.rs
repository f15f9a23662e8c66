//! Configuration and city table loading tests.
//!
//! Covers:
//! - `ScoringConfig::from_file` with TOML/YAML/JSON
//! - `CityTable` loaders and their validation
//! - A loaded configuration flowing through the scorer

use citescan::{CitescanError, CityTable, ConfidenceLevel, ConfidenceScorer, OcrText, ScoringConfig};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_from_file_toml_succeeds() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("citescan.toml");

    fs::write(
        &config_path,
        r#"
[thresholds]
high = 0.9
medium = 0.7

[fallback]
consistency_threshold = 0.6
"#,
    )
    .unwrap();

    let config = ScoringConfig::from_file(&config_path).unwrap();
    assert_eq!(config.thresholds.high, 0.9);
    assert_eq!(config.thresholds.medium, 0.7);
    assert_eq!(config.fallback.consistency_threshold, 0.6);
    assert_eq!(config.fallback.weak_component_threshold, 0.5);
}

#[test]
fn test_from_file_yaml_succeeds() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("citescan.yml");

    fs::write(
        &config_path,
        r#"
thresholds:
  high: 0.8
  medium: 0.5
"#,
    )
    .unwrap();

    let config = ScoringConfig::from_file(&config_path).unwrap();
    assert_eq!(config.thresholds.high, 0.8);
    assert_eq!(config.thresholds.medium, 0.5);
}

#[test]
fn test_from_file_json_succeeds() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("citescan.json");

    fs::write(&config_path, r#"{"fallback": {"weak_component_threshold": 0.4}}"#).unwrap();

    let config = ScoringConfig::from_file(&config_path).unwrap();
    assert_eq!(config.thresholds.high, 0.85);
    assert_eq!(config.fallback.weak_component_threshold, 0.4);
}

#[test]
fn test_from_file_rejects_unordered_thresholds() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("citescan.toml");

    fs::write(&config_path, "[thresholds]\nhigh = 0.5\nmedium = 0.8\n").unwrap();

    let err = ScoringConfig::from_file(&config_path).unwrap_err();
    assert!(matches!(err, CitescanError::Validation { .. }));
}

#[test]
fn test_from_file_missing_or_unsupported() {
    let temp_dir = TempDir::new().unwrap();

    let missing = ScoringConfig::from_file(temp_dir.path().join("absent.toml"));
    assert!(matches!(missing, Err(CitescanError::Validation { .. })));

    let unsupported_path = temp_dir.path().join("citescan.ini");
    fs::write(&unsupported_path, "high=0.9").unwrap();
    assert!(ScoringConfig::from_file(&unsupported_path).is_err());
}

#[test]
fn test_loaded_thresholds_drive_classification() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("citescan.toml");
    fs::write(&config_path, "[thresholds]\nhigh = 0.97\nmedium = 0.75\n").unwrap();

    let scorer = ConfidenceScorer::new(ScoringConfig::from_file(&config_path).unwrap()).unwrap();
    let result = scorer
        .score(&OcrText::from("1234567890"), &[0.9, 0.92, 0.88], 1, 8, 12)
        .unwrap();

    assert_eq!(result.level(), ConfidenceLevel::Medium);
    assert!(!result.should_auto_accept());
}

#[test]
fn test_city_table_from_toml() {
    let temp_dir = TempDir::new().unwrap();
    let table_path = temp_dir.path().join("cities.toml");

    fs::write(
        &table_path,
        r#"
[[cities]]
city_id = "us-or-portland"
city_name = "Portland"
regex = "^PDX[0-9]{6}$"
priority = 2
length_min = 9
length_max = 9
format_example = "PDX123456"

[[cities]]
city_id = "us-wa-seattle"
city_name = "Seattle"
regex = "^[0-9]{8}$"
priority = 3
length_min = 8
length_max = 8
"#,
    )
    .unwrap();

    let table = CityTable::from_toml_file(&table_path).unwrap();
    assert_eq!(table.len(), 2);

    let found = table.match_text(&OcrText::from("pdx 123456")).unwrap();
    assert_eq!(found.city_id, "us-or-portland");
    assert_eq!(found.citation_number, "PDX123456");

    let scorer = ConfidenceScorer::default();
    let result = scorer
        .score_for_city(&OcrText::from("PDX123456"), &[0.9], Some("us-or-portland"), &table)
        .unwrap();
    assert_eq!(result.component_score(citescan::ComponentKind::PatternMatch), 0.85);
    assert_eq!(result.component_score(citescan::ComponentKind::TextCompleteness), 1.0);
}

#[test]
fn test_city_table_from_yaml_and_json() {
    let temp_dir = TempDir::new().unwrap();

    let yaml_path = temp_dir.path().join("cities.yaml");
    fs::write(
        &yaml_path,
        r#"
cities:
  - city_id: us-tx-austin
    city_name: Austin
    regex: "^A[0-9]{7}$"
    priority: 1
    length_min: 8
    length_max: 8
"#,
    )
    .unwrap();
    let yaml = CityTable::from_yaml_file(&yaml_path).unwrap();
    assert!(yaml.get("us-tx-austin").is_some());

    let json_path = temp_dir.path().join("cities.json");
    fs::write(
        &json_path,
        r#"{"cities": [{"city_id": "us-il-chicago", "city_name": "Chicago", "regex": "^[0-9]{10}$", "priority": 2, "length_min": 10, "length_max": 10}]}"#,
    )
    .unwrap();
    let json = CityTable::from_json_file(&json_path).unwrap();
    assert_eq!(json.get("us-il-chicago").unwrap().city_name, "Chicago");
}

#[test]
fn test_city_table_rejects_bad_entries() {
    let temp_dir = TempDir::new().unwrap();
    let table_path = temp_dir.path().join("cities.toml");

    let bad_regex = r#"
[[cities]]
city_id = "broken"
city_name = "Broken"
regex = "^[0-9"
priority = 1
length_min = 1
length_max = 2
"#;
    fs::write(&table_path, bad_regex).unwrap();
    assert!(matches!(
        CityTable::from_toml_file(&table_path),
        Err(CitescanError::Validation { .. })
    ));

    let bad_priority = r#"
[[cities]]
city_id = "too-vague"
city_name = "Too Vague"
regex = ".*"
priority = 5
length_min = 1
length_max = 2
"#;
    fs::write(&table_path, bad_priority).unwrap();
    assert!(matches!(
        CityTable::from_toml_file(&table_path),
        Err(CitescanError::Validation { .. })
    ));
}
