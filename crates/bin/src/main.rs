//! ClaimLens CLI binary.
//!
//! Provides the command-line interface for claim risk analysis and modeling.

mod logging;

use claimlens::data::schema::{TOTAL_CLAIMS, TOTAL_PREMIUM};
use claimlens::data::{dataset_info, load_insurance_data};
use claimlens::features::{PreparedDataset, prepare_premium_dataset, prepare_severity_dataset};
use claimlens::hypothesis::{
    HypothesisError, RiskDifferenceResult, format_results, group_claim_frequency,
    group_claim_severity, test_gender_risk_difference, test_province_risk_difference,
    test_zipcode_margin_difference, test_zipcode_risk_difference,
};
use claimlens::models::{
    ModelKind, TrainedModel, compare_models, feature_importance, train_model,
};
use claimlens::output::{
    ComparisonTable, ExportFormat, Exporter, ReportBuilder, export_claim_frequency,
    export_claim_severity, group_summary_table,
};
use claimlens::{AnalysisConfig, ProjectPaths};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use polars::prelude::DataFrame;
use serde_json::json;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use tracing::{info, warn};

/// Features listed after model comparison.
const TOP_FEATURES: usize = 10;

#[derive(Parser)]
#[command(name = "claimlens")]
#[command(about = "ClaimLens: insurance claim risk analysis and modeling", long_about = None)]
#[command(version)]
struct Cli {
    /// Project root holding data/, models/, reports/ and logs/
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// JSON file with analysis parameters
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level used when RUST_LOG is unset (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show shape, dtypes and missing values of the dataset
    Info {
        /// Data file; defaults to the first file in data/raw
        #[arg(long)]
        data: Option<PathBuf>,
    },

    /// Claim frequency and severity per group
    Summarize {
        /// Data file; defaults to the first file in data/raw
        #[arg(long)]
        data: Option<PathBuf>,

        /// Grouping column; repeat for several (defaults to the config dimensions)
        #[arg(long = "dimension")]
        dimensions: Vec<String>,
    },

    /// Run the risk and margin hypothesis tests
    Hypotheses {
        /// Data file; defaults to the first file in data/raw
        #[arg(long)]
        data: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Train and compare regression models
    Model {
        /// Data file; defaults to the first file in data/raw
        #[arg(long)]
        data: Option<PathBuf>,

        /// Prediction target
        #[arg(long, value_enum, default_value_t = Target::Severity)]
        target: Target,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Target {
    /// Claim amount of policies with a claim
    Severity,
    /// Total premium of every policy
    Premium,
}

impl Target {
    const fn name(self) -> &'static str {
        match self {
            Self::Severity => "severity",
            Self::Premium => "premium",
        }
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let paths = ProjectPaths::new(&cli.root);
    paths.ensure_directories()?;
    logging::init(&cli.log_level, &paths.log_file())?;

    let config = match &cli.config {
        Some(path) => AnalysisConfig::from_json_file(path)?,
        None => AnalysisConfig::default(),
    };
    config.validate()?;

    match cli.command {
        Commands::Info { data } => show_info(&paths, data.as_deref())?,
        Commands::Summarize { data, dimensions } => {
            let dimensions = if dimensions.is_empty() {
                config.dimensions.clone()
            } else {
                dimensions
            };
            summarize(&paths, data.as_deref(), &dimensions)?;
        }
        Commands::Hypotheses { data, format } => {
            run_hypotheses(&paths, &config, data.as_deref(), format)?;
        }
        Commands::Model { data, target } => {
            run_models(&paths, &config, data.as_deref(), target)?;
        }
    }

    Ok(())
}

fn load(paths: &ProjectPaths, data: Option<&Path>) -> Result<DataFrame, Box<dyn Error>> {
    Ok(load_insurance_data(data, &paths.raw_data_dir())?)
}

fn banner(title: &str) {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║{:^62}║", title);
    println!("╚══════════════════════════════════════════════════════════════╝\n");
}

fn show_info(paths: &ProjectPaths, data: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let df = load(paths, data)?;
    let info = dataset_info(&df);

    banner("DATASET INFO");
    println!("Rows:    {}", info.shape.0);
    println!("Columns: {}", info.shape.1);
    println!("Memory:  {:.2} MB\n", info.memory_usage_mb);

    println!("{:<32} {:<16} {:>10}", "Column", "Type", "Missing");
    println!("{}", "-".repeat(60));
    for column in &info.columns {
        println!(
            "{:<32} {:<16} {:>10}",
            column,
            info.dtypes.get(column).map_or("?", String::as_str),
            info.missing_values.get(column).copied().unwrap_or(0)
        );
    }

    Ok(())
}

fn summarize(
    paths: &ProjectPaths,
    data: Option<&Path>,
    dimensions: &[String],
) -> Result<(), Box<dyn Error>> {
    let df = load(paths, data)?;
    banner("CLAIM FREQUENCY AND SEVERITY");

    for dimension in dimensions {
        let summaries = group_claim_frequency(&df, dimension)?;
        print!("{}", group_summary_table(dimension, &summaries));
        let path = export_claim_frequency(&summaries, dimension, &paths.reports_dir())?;
        println!("Saved: {}", path.display());

        let severity = group_claim_severity(&df, dimension)?;
        if severity.is_empty() {
            println!("No claims recorded, severity by {} skipped\n", dimension);
            continue;
        }
        println!("\nClaim Severity by {}", dimension);
        println!("{:<20} {:>10} {:>14} {:>14}", "Group", "Claims", "Mean", "Std");
        println!("{}", "-".repeat(60));
        for row in &severity {
            println!(
                "{:<20} {:>10} {:>14.2} {:>14}",
                row.group.as_deref().unwrap_or("(missing)"),
                row.claim_count,
                row.mean_severity,
                row.std_severity
                    .map_or_else(|| "n/a".to_string(), |s| format!("{:.2}", s))
            );
        }
        let path = export_claim_severity(&severity, dimension, &paths.reports_dir())?;
        println!("Saved: {}\n", path.display());
    }

    Ok(())
}

fn run_hypotheses(
    paths: &ProjectPaths,
    config: &AnalysisConfig,
    data: Option<&Path>,
    format: OutputFormat,
) -> Result<(), Box<dyn Error>> {
    let df = load(paths, data)?;
    let alpha = config.alpha;

    let province = test_province_risk_difference(&df, alpha)?;
    let zipcode_risk = test_zipcode_risk_difference(&df, alpha, config.top_n)?;
    let zipcode_margin = test_zipcode_margin_difference(&df, alpha, config.top_n)?;
    let gender: Option<RiskDifferenceResult> = match test_gender_risk_difference(&df, alpha) {
        Ok(result) => Some(result),
        Err(HypothesisError::NoData(reason)) => {
            warn!(%reason, "Gender test skipped");
            None
        }
        Err(e) => return Err(e.into()),
    };

    match format {
        OutputFormat::Text => {
            let mut text = String::new();
            text.push_str(&format_results(
                &province,
                "No risk differences across provinces",
            ));
            text.push_str(&format_results(
                &zipcode_risk,
                "No risk differences between zip codes",
            ));
            text.push_str(&format_results(
                &zipcode_margin,
                "No significant margin difference between zip codes",
            ));
            match &gender {
                Some(result) => text.push_str(&format_results(
                    result,
                    "No significant risk difference between Women and Men",
                )),
                None => text.push_str("\nGender test skipped: no Male/Female records\n"),
            }

            print!("{}", text);
            let path = paths.reports_dir().join("hypothesis_tests.txt");
            fs::write(&path, &text)?;
            println!("\nSaved: {}", path.display());
        }
        OutputFormat::Json => {
            let report = ReportBuilder::new()
                .name("hypothesis_tests")
                .alpha(alpha)
                .contents(json!({
                    "province_risk": province,
                    "zipcode_risk": zipcode_risk,
                    "zipcode_margin": zipcode_margin,
                    "gender_risk": gender,
                }))
                .build()?;
            println!("{}", report.to_json()?);
            let path = report.save(&paths.reports_dir())?;
            eprintln!("Saved: {}", path.display());
        }
    }

    info!(alpha, "Hypothesis tests complete");
    Ok(())
}

fn prepare(
    df: &DataFrame,
    config: &AnalysisConfig,
    target: Target,
) -> Result<PreparedDataset, Box<dyn Error>> {
    let split = config.split();
    let prepared = match target {
        Target::Severity => prepare_severity_dataset(df, TOTAL_CLAIMS, &split)?,
        Target::Premium => prepare_premium_dataset(df, TOTAL_PREMIUM, &split)?,
    };
    Ok(prepared)
}

fn run_models(
    paths: &ProjectPaths,
    config: &AnalysisConfig,
    data: Option<&Path>,
    target: Target,
) -> Result<(), Box<dyn Error>> {
    let df = load(paths, data)?;
    let dataset = prepare(&df, config, target)?;

    banner(&format!("MODEL COMPARISON: {}", target.name().to_uppercase()));
    println!(
        "Train rows: {}  Test rows: {}  Features: {}",
        dataset.x_train.nrows(),
        dataset.x_test.nrows(),
        dataset.feature_names.len()
    );

    let preprocessor_path = paths
        .models_dir()
        .join(format!("preprocessor_{}.json", target.name()));
    fs::write(
        &preprocessor_path,
        serde_json::to_string_pretty(&dataset.preprocessor)?,
    )?;

    let kinds: Vec<ModelKind> = ModelKind::all()
        .into_iter()
        .filter(|kind| {
            let available = kind.is_available();
            if !available {
                warn!(model = %kind, "Model not available in this build, skipped");
            }
            available
        })
        .collect();

    let pb = ProgressBar::new(kinds.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let mut models: Vec<TrainedModel> = Vec::with_capacity(kinds.len());
    for kind in kinds {
        pb.set_message(format!("Training {}...", kind));
        models.push(train_model(
            kind,
            &dataset.x_train,
            &dataset.y_train,
            config.seed,
        )?);
        pb.inc(1);
    }
    pb.finish_with_message(format!("Trained {} models", models.len()));

    let comparison = compare_models(&models, &dataset.x_test, &dataset.y_test)?;
    let table = ComparisonTable::new(target.name(), &comparison);
    print!("{}", table.to_ascii_table());

    let comparison_path = paths
        .reports_dir()
        .join(format!(
            "model_comparison_{}.{}",
            target.name(),
            ExportFormat::Csv.extension()
        ));
    comparison.export_to_file(&comparison_path, ExportFormat::Csv)?;
    println!("Saved: {}", comparison_path.display());

    let best = table
        .best()
        .and_then(|row| models.iter().find(|m| m.name == row.model));
    if let Some(best) = best {
        match feature_importance(best.model.as_ref(), &dataset.feature_names) {
            Ok(mut ranked) => {
                ranked.truncate(TOP_FEATURES);
                println!("\nTop features ({}):", best.name);
                for (rank, feature) in ranked.iter().enumerate() {
                    println!("{:>3}. {:<40} {:>10.4}", rank + 1, feature.feature, feature.importance);
                }
                let importance_path = paths
                    .reports_dir()
                    .join(format!(
                        "feature_importance_{}.{}",
                        target.name(),
                        ExportFormat::Csv.extension()
                    ));
                ranked.export_to_file(&importance_path, ExportFormat::Csv)?;
                println!("Saved: {}", importance_path.display());
            }
            Err(e) => warn!(model = %best.name, error = %e, "No feature importance"),
        }
    }

    Ok(())
}
