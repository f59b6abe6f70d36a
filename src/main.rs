use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{error, info};

use shipment_analyzer::display::{format_count, render_raw_table, render_summary};
use shipment_analyzer::{logging, AnalyzerConfig, AnalyzerError, PipelineOutcome, ShipmentPipeline};

#[derive(Parser)]
#[command(name = "shipment_analyzer")]
#[command(about = "Filters shipment exports and builds out-of-order summary reports")]
#[command(version = "0.1.0")]
struct Cli {
    /// TOML config file (default: $SHIPMENT_ANALYZER_CONFIG, then ./analyzer.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter an analyzer export and write the summary workbook
    Analyze {
        /// The .xlsx export to analyze
        input: PathBuf,
        /// Directory the report is written into
        #[arg(long, default_value = "output")]
        output_dir: PathBuf,
        /// Print counts and summaries as JSON instead of tables
        #[arg(long)]
        json: bool,
    },
    /// Check an export for the required columns
    Validate {
        /// The .xlsx export to check
        input: PathBuf,
    },
}

fn load_config(path: Option<&Path>) -> anyhow::Result<AnalyzerConfig> {
    let config = match path {
        Some(p) => AnalyzerConfig::load_from(p),
        None => AnalyzerConfig::load(),
    };
    config.context("Failed to load configuration")
}

fn print_outcome(outcome: &PipelineOutcome) {
    println!("\n✅ Preview of Uploaded Data");
    println!("{}", render_raw_table(&outcome.preview));

    println!("\n📋 Filtered Dataset Summary");
    println!("   Total shipments before filtering: {}", format_count(outcome.before));
    println!("   Total shipments after filtering: {}", format_count(outcome.after));
    for warning in &outcome.warnings {
        println!("⚠️  {}", warning);
    }

    for (icon, summary) in ["📊", "📍", "🚛"].iter().zip(outcome.summaries.tables()) {
        println!("\n{} {}", icon, summary.title);
        println!("{}", render_summary(summary));
    }
}

fn analyze(pipeline: &ShipmentPipeline, input: &Path, output_dir: &Path, json: bool) -> anyhow::Result<()> {
    let outcome = match pipeline.run_file(input) {
        Ok(outcome) => outcome,
        Err(e @ AnalyzerError::Schema { .. }) => {
            println!("⚠️  {}", e);
            std::process::exit(2);
        }
        Err(e) => return Err(e).with_context(|| format!("Failed to analyze {}", input.display())),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_outcome(&outcome);
    }

    let path = outcome
        .save_report(output_dir)
        .with_context(|| format!("Failed to save report into {}", output_dir.display()))?;
    if !json {
        println!("\n⬇️  Excel report ({}) written to {}", outcome.report_mime_type, path.display());
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let pipeline = ShipmentPipeline::new(config);

    match cli.command {
        Commands::Analyze { input, output_dir, json } => {
            info!("Analyzing {}", input.display());
            analyze(&pipeline, &input, &output_dir, json)?;
        }
        Commands::Validate { input } => {
            let bytes = std::fs::read(&input).with_context(|| format!("Failed to read {}", input.display()))?;
            let missing = pipeline.check_schema(&bytes)?;
            if missing.is_empty() {
                println!("✅ {} has every required column", input.display());
            } else {
                error!("Missing columns: {}", missing.join(", "));
                println!("⚠️  Missing required columns in uploaded file: {}", missing.join(", "));
                std::process::exit(2);
            }
        }
    }
    Ok(())
}
