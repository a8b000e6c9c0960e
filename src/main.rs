use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use footprint_engine::{
    dashboard, ChangeSet, ChartKind, Dashboard, EmissionEngine, EngineConfig, FootprintHistory,
    FootprintPipeline, FootprintReport, InputGuard, NoopAdvisor,
};

#[derive(Debug, Parser)]
#[command(name = "footprint", about = "Household carbon footprint calculator")]
struct Cli {
    /// Engine tables (JSON). Built-in defaults when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Footprint, benchmarks, reduction potential and dashboard for a questionnaire.
    Calculate {
        #[arg(long)]
        profile: PathBuf,
    },
    /// What-if scenario over the footprint of a questionnaire.
    Simulate {
        #[arg(long)]
        profile: PathBuf,
        #[arg(long)]
        changes: PathBuf,
    },
    /// One chart dataset: pie, bar, waterfall, comparison, trends or scenarios.
    Chart {
        #[arg(long)]
        profile: PathBuf,
        #[arg(long)]
        kind: ChartKind,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CalculateOutput {
    report: FootprintReport,
    dashboard: Dashboard,
}

fn init_tracing(log_json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // Logs go to stderr; stdout carries the JSON result.
    if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn load_engine(path: Option<&Path>) -> Result<EmissionEngine, Box<dyn Error>> {
    let config = match path {
        Some(p) => EngineConfig::load(p)?,
        None => EngineConfig::default(),
    };
    Ok(EmissionEngine::new(config)?)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let engine = load_engine(cli.config.as_deref())?;

    match cli.command {
        Command::Calculate { profile } => {
            let profile = InputGuard::validate_json(&fs::read_to_string(&profile)?)?;
            let household_size = profile.household_size;
            let potentials = engine.config().potentials.clone();

            let pipeline = FootprintPipeline::new(engine, NoopAdvisor);
            let report = pipeline.run(&profile, chrono::Utc::now()).await?;

            let mut history = FootprintHistory::new();
            let id = history.record(
                report.assessment.footprint.clone(),
                report.assessment.benchmarks.clone(),
            );
            info!(footprint_id = %id, "footprint recorded");

            let dashboard = dashboard::build(
                &report.assessment.footprint,
                &report.assessment.benchmarks,
                household_size,
                &potentials,
                &history,
            );
            println!(
                "{}",
                serde_json::to_string_pretty(&CalculateOutput { report, dashboard })?
            );
        }
        Command::Simulate { profile, changes } => {
            let profile = InputGuard::validate_json(&fs::read_to_string(&profile)?)?;
            let changes: ChangeSet = serde_json::from_str(&fs::read_to_string(&changes)?)?;

            let baseline = engine.calculate_now(&profile)?;
            let outcome = engine.simulate(&baseline, profile.region(), &changes);
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Command::Chart { profile, kind } => {
            let profile = InputGuard::validate_json(&fs::read_to_string(&profile)?)?;
            let assessment = engine.assess(&profile, chrono::Utc::now())?;

            let mut history = FootprintHistory::new();
            history.record(assessment.footprint.clone(), assessment.benchmarks.clone());

            let chart = dashboard::chart(kind, &assessment.footprint, &assessment.benchmarks, &history);
            println!("{}", serde_json::to_string_pretty(&chart)?);
        }
    }

    Ok(())
}
