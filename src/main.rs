use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::debug;

use clarus_index::history::{JsonHistoryStore, ScoreStore};
use clarus_index::scoring::{
    self, DimensionScores, EditorialOverride, IndexTier, PropertyTier, RubricRegistry, ScoreRequest,
    TierScores,
};

const EXIT_SUCCESS: i32 = 0;
const EXIT_FAILURE: i32 = 1;
const EXIT_INPUT: i32 = 2;
const EXIT_CONFIG: i32 = 4;
const EXIT_STORAGE: i32 = 5;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score a property and print its Clarus Index
    Score {
        /// Property identifier recorded on the score
        #[arg(short, long)]
        property: String,

        /// Property tier: tier_1, tier_2 or tier_3
        #[arg(short, long)]
        tier: PropertyTier,

        /// Dimension score as name=value (repeatable)
        #[arg(short, long = "dim", value_parser = parse_dimension)]
        dims: Vec<(String, f64)>,

        /// YAML or JSON file mapping dimension names to scores
        #[arg(short, long)]
        scores: Option<PathBuf>,

        /// Score against this rubric version instead of the live one
        #[arg(long)]
        rubric_version: Option<u32>,

        /// Editorial cap on the published index tier
        #[arg(long, requires = "reason")]
        cap: Option<IndexTier>,

        /// Reason recorded with the editorial cap
        #[arg(long, requires = "cap")]
        reason: Option<String>,

        /// Append the result to the score history
        #[arg(long)]
        save: bool,

        /// Print the score record as JSON
        #[arg(long)]
        json: bool,
    },
    /// List registered rubrics
    Rubrics,
    /// Show stored scores for a property
    History {
        property: String,

        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Recompute stored scores under their own rubric versions
    Verify { property: String },
    /// Write the built-in rubrics to the config file
    Init {
        /// Overwrite an existing file without asking
        #[arg(long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "clarus-index")]
#[command(about = "Clarus Index scoring for wellness properties", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to rubric config (defaults to ~/.config/clarus-index/rubrics.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to score history (defaults to ~/.config/clarus-index/history.json)
    #[arg(long, global = true)]
    history: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

fn parse_dimension(s: &str) -> Result<(String, f64), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{}'", s))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing dimension name in '{}'", s));
    }
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("invalid score '{}' for dimension '{}'", value.trim(), name))?;
    Ok((name.to_string(), value))
}

fn read_scores_file(path: &Path) -> Result<DimensionScores> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read scores file at {}", path.display()))?;
    serde_saphyr::from_str(&content)
        .with_context(|| format!("Failed to parse scores file {}", path.display()))
}

fn main() {
    let cli = Cli::parse();
    clarus_index::logging::init_cli_logger(cli.verbose);

    // init writes the rubric file, so it must not require a loadable one
    if let Commands::Init { force } = cli.command {
        match clarus_index::config::init::run_init(cli.config, force) {
            Ok(Some(path)) => println!("Wrote default rubrics to {}", path.display()),
            Ok(None) => println!("Kept existing rubric config."),
            Err(e) => {
                eprintln!("Config error: {:#}", e);
                std::process::exit(EXIT_CONFIG);
            }
        }
        std::process::exit(EXIT_SUCCESS);
    }

    // Rubrics must load cleanly before anything is scored
    let config = match clarus_index::config::load_config(cli.config.clone()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    let registry = match RubricRegistry::load(&config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Rubric config errors:");
            for error in &e.errors {
                eprintln!("  - {}", error);
            }
            std::process::exit(EXIT_CONFIG);
        }
    };

    let store = cli
        .history
        .clone()
        .map(JsonHistoryStore::new)
        .unwrap_or_else(JsonHistoryStore::default_location);
    debug!(path = %store.path().display(), "using score history");

    let use_colors = clarus_index::output::should_use_colors();

    let code = run_command(cli.command, &registry, store, use_colors);
    std::process::exit(code);
}

/// Runs any command other than `init`, once the rubrics have loaded.
fn run_command(command: Commands, registry: &RubricRegistry, store: JsonHistoryStore, use_colors: bool) -> i32 {
    match command {
        Commands::Score {
            property,
            tier,
            dims,
            scores,
            rubric_version,
            cap,
            reason,
            save,
            json,
        } => {
            let mut raw = match scores.as_deref().map(read_scores_file).transpose() {
                Ok(s) => s.unwrap_or_default(),
                Err(e) => {
                    eprintln!("Input error: {:#}", e);
                    std::process::exit(EXIT_INPUT);
                }
            };
            // --dim values win over the scores file
            raw.extend(dims);

            let mut request = ScoreRequest::new(property, TierScores::new(tier, raw));
            if let Some(version) = rubric_version {
                request = request.with_rubric_version(version);
            }
            if let (Some(max_tier), Some(reason)) = (cap, reason) {
                request = request.with_override(EditorialOverride { max_tier, reason });
            }

            run_score(registry, store, &request, save, json, use_colors)
        }
        Commands::Rubrics => {
            println!(
                "{}",
                clarus_index::output::format_rubrics(&registry.snapshot(), use_colors)
            );
            EXIT_SUCCESS
        }
        Commands::History { property, json } => match store.history(&property) {
            Ok(records) if json => match serde_json::to_string_pretty(&records) {
                Ok(out) => {
                    println!("{}", out);
                    EXIT_SUCCESS
                }
                Err(e) => {
                    eprintln!("Failed to serialize history: {}", e);
                    EXIT_FAILURE
                }
            },
            Ok(records) => {
                println!(
                    "{}",
                    clarus_index::output::format_history_table(&records, use_colors)
                );
                EXIT_SUCCESS
            }
            Err(e) => {
                eprintln!("Storage error: {:#}", e);
                EXIT_STORAGE
            }
        },
        Commands::Verify { property } => run_verify(registry, &store, &property, use_colors),
        // Dispatched by main before the rubrics load
        Commands::Init { .. } => EXIT_SUCCESS,
    }
}

fn run_score(
    registry: &RubricRegistry,
    mut store: JsonHistoryStore,
    request: &ScoreRequest,
    save: bool,
    json: bool,
    use_colors: bool,
) -> i32 {
    let record = match scoring::score_property_now(registry, request) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Scoring error: {}", e);
            return EXIT_INPUT;
        }
    };

    if json {
        match serde_json::to_string_pretty(&record) {
            Ok(out) => println!("{}", out),
            Err(e) => {
                eprintln!("Failed to serialize score: {}", e);
                return EXIT_FAILURE;
            }
        }
    } else {
        println!(
            "{}",
            clarus_index::output::format_score_detail(&record, use_colors)
        );
    }

    if save {
        if let Err(e) = store.save_score(&record) {
            eprintln!("Storage error: {:#}", e);
            return EXIT_STORAGE;
        }
        if !json {
            println!("Saved to {}", store.path().display());
        }
    }

    EXIT_SUCCESS
}

fn run_verify(registry: &RubricRegistry, store: &JsonHistoryStore, property: &str, use_colors: bool) -> i32 {
    let records = match store.history(property) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Storage error: {:#}", e);
            return EXIT_STORAGE;
        }
    };

    if records.is_empty() {
        println!("No scores recorded for {}.", property);
        return EXIT_SUCCESS;
    }

    let mut all_ok = true;
    for record in &records {
        match scoring::verify(registry, record) {
            Ok(reproduced) => {
                all_ok &= reproduced;
                println!(
                    "{}",
                    clarus_index::output::format_verification(record, reproduced, use_colors)
                );
            }
            Err(e) => {
                all_ok = false;
                eprintln!(
                    "Cannot reproduce score from {} (rubric v{}): {}",
                    record.computed_at.to_rfc3339(),
                    record.rubric_version,
                    e
                );
            }
        }
    }

    if all_ok {
        EXIT_SUCCESS
    } else {
        EXIT_FAILURE
    }
}
