//! BNRA CLI - divergence reports and consensus cascades from backend exports

#![deny(warnings)]

// Global invariants enforced:
// - Deterministic output ordering
// - Identical input yields byte-for-byte identical output

use anyhow::Context;
use bnra_core::config;
use bnra_core::consensus::{build_consensus_cascade, build_weighted_consensus_cascade};
use bnra_core::report::render_cells;
use bnra_core::{
    analysis, cascade_divergence, render_json, render_text, sort_reports, stats_of,
    AnalysisOptions, CascadeAnalysis, CascadeField, DivergenceBand, RiskFileExport,
};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bnra")]
#[command(about = "Expert divergence and consensus statistics for BNRA risk files")]
#[command(version = env!("BNRA_VERSION"))]
struct Cli {
    /// Log engine internals to stderr (overrides BNRA_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build discussion reports for every risk file in a backend export
    Report {
        /// Path to the JSON export
        path: PathBuf,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Lowest divergence band to show (overrides config file)
        #[arg(long)]
        min_band: Option<BandArg>,

        /// Path to config file (default: auto-discover)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Summary statistics of literal scale values
    Stats {
        /// Scale values such as DP3 or CP2.5; "-" or "null" for unanswered
        #[arg(required = true)]
        values: Vec<String>,

        /// Comma-separated reliability weights, one per value
        #[arg(long, value_delimiter = ',')]
        weights: Option<Vec<f64>>,
    },
    /// Consensus and divergence of a list of expert cascade analyses
    Consensus {
        /// Path to a JSON array of cascade analyses
        path: PathBuf,

        /// Weight experts by their quality rating
        #[arg(long)]
        weighted: bool,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Path to config file for the default quality (default: auto-discover)
        #[arg(long, requires = "weighted")]
        config: Option<PathBuf>,
    },
    /// Validate or show configuration
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Validate a config file
    Validate {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Show the resolved configuration (merged defaults + config file)
    Show {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum BandArg {
    Low,
    Medium,
    High,
}

impl From<BandArg> for DivergenceBand {
    fn from(band: BandArg) -> Self {
        match band {
            BandArg::Low => DivergenceBand::Low,
            BandArg::Medium => DivergenceBand::Medium,
            BandArg::High => DivergenceBand::High,
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("BNRA_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Report {
            path,
            format,
            min_band,
            config: config_path,
        } => {
            let export: RiskFileExport = read_json(&path)?;
            tracing::debug!(risk_files = export.risk_files.len(), "export loaded");
            let mut options = load_options(config_path.as_deref())?;

            // CLI flags override config file values
            if let Some(band) = min_band {
                options.min_band = band.into();
            }

            let reports = export
                .risk_files
                .par_iter()
                .map(|rf| {
                    analysis::analyze_risk_file(rf, &options)
                        .with_context(|| format!("failed to analyze risk file {}", rf.id))
                })
                .collect::<anyhow::Result<Vec<_>>>()?;
            let reports = sort_reports(reports);

            match format {
                OutputFormat::Text => print!("{}", render_text(&reports)),
                OutputFormat::Json => println!("{}", render_json(&reports)),
            }
        }
        Commands::Stats { values, weights } => {
            let values: Vec<Option<String>> = values
                .into_iter()
                .map(|v| match v.as_str() {
                    "-" | "null" => None,
                    _ => Some(v),
                })
                .collect();

            match stats_of(&values, weights.as_deref())? {
                Some(stats) => {
                    println!("min: {}", stats.min_label);
                    println!("max: {}", stats.max_label);
                    println!("avg: {}", stats.avg_label);
                    println!("std: {}", stats.std);
                }
                None => println!("no answers"),
            }
        }
        Commands::Consensus {
            path,
            weighted,
            format,
            config: config_path,
        } => {
            let analyses: Vec<CascadeAnalysis> = read_json(&path)?;
            tracing::debug!(analyses = analyses.len(), weighted, "cascade analyses loaded");

            let consensus = if weighted {
                let options = load_options(config_path.as_deref())?;
                build_weighted_consensus_cascade(&analyses, options.default_quality)?
            } else {
                build_consensus_cascade(&analyses)?
            };
            let divergence = cascade_divergence(&analyses)?;

            match format {
                OutputFormat::Json => {
                    let output = serde_json::json!({
                        "respondents": analyses.len(),
                        "divergence": divergence,
                        "consensus": consensus,
                    });
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
                OutputFormat::Text => {
                    let cells = CascadeField::ALL
                        .iter()
                        .map(|f| (f.short_name().to_string(), consensus.cell(*f).map(str::to_string)))
                        .collect();
                    println!("respondents: {}", analyses.len());
                    println!("divergence: {:.2}", divergence);
                    println!("consensus: {}", render_cells(&cells));
                }
            }
        }
        Commands::Config { action } => match action {
            ConfigAction::Validate { path } => {
                let root = std::env::current_dir()?;
                match config::load_and_resolve(&root, path.as_deref()) {
                    Ok(config) => {
                        if let Some(ref p) = config.config_path {
                            println!("Config valid: {}", p.display());
                        } else {
                            println!("No config file found. Using defaults.");
                        }
                    }
                    Err(e) => {
                        eprintln!("Config validation failed: {:#}", e);
                        std::process::exit(1);
                    }
                }
            }
            ConfigAction::Show { path } => {
                let root = std::env::current_dir()?;
                let resolved = config::load_and_resolve(&root, path.as_deref())
                    .context("failed to load configuration")?;

                println!("Configuration:");
                if let Some(ref p) = resolved.config_path {
                    println!("  Source: {}", p.display());
                } else {
                    println!("  Source: defaults (no config file found)");
                }
                println!();
                println!("Thresholds:");
                println!("  medium: {}", resolved.thresholds.medium);
                println!("  high: {}", resolved.thresholds.high);
                println!();
                println!("Weighting:");
                println!("  default_quality: {}", resolved.default_quality);
                println!();
                println!("Filters:");
                println!("  min_band: {}", resolved.min_band.as_str());
            }
        },
    }

    Ok(())
}

/// Resolve analysis options from the config file found in the current directory
fn load_options(config_path: Option<&Path>) -> anyhow::Result<AnalysisOptions> {
    let root = std::env::current_dir()?;
    let resolved = config::load_and_resolve(&root, config_path)
        .context("failed to load configuration")?;

    if let Some(config_path) = &resolved.config_path {
        eprintln!("Using config: {}", config_path.display());
    }

    Ok(AnalysisOptions::from(&resolved))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    if !path.exists() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}
