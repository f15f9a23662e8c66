//! citescan command-line interface
//!
//! Scores OCR output for a parking citation capture and prints the result with
//! fallback advice. Diagnostics go to stderr via `RUST_LOG`.

use anyhow::{Context, Result};
use citescan::{
    CityTable, ConfidenceResult, ConfidenceScorer, FallbackAdvisor, OcrText, PreprocessOptions, ScoreTelemetry,
    ScoringConfig,
};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "citescan")]
#[command(about = "Confidence scoring for parking citation OCR", long_about = None)]
#[command(version)]
struct Cli {
    /// Scoring config file (.toml, .yaml, .yml or .json). Defaults to a discovered citescan.toml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// City pattern table file. Defaults to the built-in table
    #[arg(long, global = true)]
    cities: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score recognized text with per-observation confidences
    Score {
        /// Recognized text
        #[arg(short, long)]
        text: String,

        /// Per-observation confidences (comma-separated)
        #[arg(short = 'C', long, value_delimiter = ',', allow_negative_numbers = true)]
        confidences: Vec<f64>,

        /// City id; pattern priority and length range come from the city table
        #[arg(long, conflicts_with_all = ["priority", "min", "max"])]
        city: Option<String>,

        /// Pattern priority (0 = no match, 1 = most specific, 4 = least)
        #[arg(short, long, default_value = "0", allow_negative_numbers = true)]
        priority: i32,

        /// Minimum expected text length
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        min: i32,

        /// Maximum expected text length
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        max: i32,
    },

    /// Score from an average confidence and pattern priority only
    Simple {
        /// Average recognition confidence
        #[arg(short, long)]
        average: f64,

        /// Pattern priority (0 = no match, 1 = most specific, 4 = least)
        #[arg(short, long, default_value = "0", allow_negative_numbers = true)]
        priority: i32,
    },

    /// Detect the city from the citation pattern, then score
    Detect {
        /// Recognized text
        #[arg(short, long)]
        text: String,

        /// Per-observation confidences (comma-separated)
        #[arg(short = 'C', long, value_delimiter = ',', allow_negative_numbers = true)]
        confidences: Vec<f64>,

        /// City id to try first
        #[arg(long)]
        hint: Option<String>,
    },

    /// List the city pattern table
    Cities,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let scorer = ConfidenceScorer::new(config).context("Invalid scoring configuration")?;
    let owned_table = cli
        .cities
        .as_deref()
        .map(load_city_table)
        .transpose()?;
    let table = owned_table.as_ref().unwrap_or(CityTable::builtin());

    match cli.command {
        Commands::Score {
            text,
            confidences,
            city,
            priority,
            min,
            max,
        } => {
            let text = OcrText::from(text);
            let result = match city.as_deref() {
                Some(city_id) => scorer.score_for_city(&text, &confidences, Some(city_id), table)?,
                None => scorer.score(&text, &confidences, priority, min, max)?,
            };
            print_result(&result, &scorer.advisor(), cli.format)
        }

        Commands::Simple { average, priority } => {
            let result = scorer.score_simple(average, priority)?;
            print_result(&result, &scorer.advisor(), cli.format)
        }

        Commands::Detect {
            text,
            confidences,
            hint,
        } => {
            let detected = scorer.score_detected(&OcrText::from(text), &confidences, table, hint.as_deref())?;
            let advisor = scorer.advisor();

            match cli.format {
                OutputFormat::Json => {
                    let output = json!({
                        "city": detected.city,
                        "result": detected.result,
                        "telemetry": ScoreTelemetry::from_result(&detected.result, &advisor),
                    });
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
                OutputFormat::Text => {
                    match &detected.city {
                        Some(city) => println!(
                            "City:           {} ({}), citation {}",
                            city.city_name, city.city_id, city.citation_number
                        ),
                        None => println!("City:           no pattern matched"),
                    }
                    print_text(&detected.result, &advisor);
                }
            }
            Ok(())
        }

        Commands::Cities => {
            match cli.format {
                OutputFormat::Json => {
                    let patterns: Vec<_> = table.patterns().collect();
                    println!("{}", serde_json::to_string_pretty(&patterns)?);
                }
                OutputFormat::Text => {
                    println!("{} city pattern(s)", table.len());
                    for pattern in table.patterns() {
                        println!(
                            "  [{}] {} - {} /{}/ length {}..={}",
                            pattern.priority,
                            pattern.city_id,
                            pattern.city_name,
                            pattern.regex,
                            pattern.length_min,
                            pattern.length_max
                        );
                    }
                }
            }
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<ScoringConfig> {
    match path {
        Some(path) => ScoringConfig::from_file(path)
            .with_context(|| format!("Failed to load scoring config from {}", path.display())),
        None => Ok(ScoringConfig::discover()?.unwrap_or_default()),
    }
}

fn load_city_table(path: &Path) -> Result<CityTable> {
    let table = match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => CityTable::from_toml_file(path),
        Some("yaml") | Some("yml") => CityTable::from_yaml_file(path),
        Some("json") => CityTable::from_json_file(path),
        _ => anyhow::bail!("Unsupported city table extension: {}", path.display()),
    };
    table.with_context(|| format!("Failed to load city table from {}", path.display()))
}

fn print_result(result: &ConfidenceResult, advisor: &FallbackAdvisor, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let output = json!({
                "result": result,
                "telemetry": ScoreTelemetry::from_result(result, advisor),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => print_text(result, advisor),
    }
    Ok(())
}

fn print_text(result: &ConfidenceResult, advisor: &FallbackAdvisor) {
    println!(
        "Overall:        {:.4} ({}) - {}",
        result.overall_confidence(),
        result.level(),
        result.level().message()
    );
    println!("Recommendation: {}", result.recommendation().as_str());
    println!("Auto-accept:    {}", if result.should_auto_accept() { "yes" } else { "no" });
    println!("Components:");
    for component in result.components() {
        println!(
            "  {:<18} {:.4} x {:.2} = {:.4}",
            component.name(),
            component.score(),
            component.weight(),
            component.weighted_score()
        );
    }

    let use_fallback = advisor.should_use_fallback(result);
    let preprocessing = if use_fallback {
        advisor.suggest_preprocessing(result)
    } else {
        PreprocessOptions::NONE
    };
    println!(
        "Fallback:       {} (preprocessing: {})",
        if use_fallback { "yes" } else { "no" },
        preprocessing
    );
}
