use anyhow::Context;
use clap::Parser;
use cornercore::lap::TelemetrySequence;
use generator::profile::{build_lap_records, GeneratorConfig};
use gui_bridge::bridge::GuiBridge;
use gui_bridge::model::ComparisonModel;
use log::info;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::WorkflowConfig;
use workflow::loader::load_lap;
use workflow::report::{format_summary, write_report};
use workflow::runner::Runner;

mod generator;
mod gui_bridge;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Compare two fastest laps corner by corner")]
struct Args {
    /// Telemetry of the first driver (JSON array of sample records)
    #[arg(long)]
    telemetry_a: Option<PathBuf>,
    /// Telemetry of the second driver (JSON array of sample records)
    #[arg(long)]
    telemetry_b: Option<PathBuf>,
    #[arg(long, default_value = "VER")]
    drv_a: String,
    #[arg(long, default_value = "NOR")]
    drv_b: String,
    /// Load analysis thresholds and channel schema from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    #[arg(long, default_value_t = 2.0)]
    dist_step: f64,
    #[arg(long, default_value_t = 25.0)]
    tol_m: f64,
    #[arg(long, default_value_t = 18.0)]
    min_drop: f64,
    #[arg(long, default_value_t = 10.0)]
    min_recovery: f64,
    #[arg(long, default_value_t = 4)]
    min_len: usize,
    /// Pace of the synthetic second lap when no telemetry files are given
    #[arg(long, default_value_t = 0.97)]
    rival_pace: f64,
    /// Write the comparison payload as JSON
    #[arg(long)]
    report: Option<PathBuf>,
    /// Keep the GUI bridge alive for incoming comparisons
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn load_laps(
    args: &Args,
    config: &WorkflowConfig,
) -> anyhow::Result<(TelemetrySequence, TelemetrySequence)> {
    match (&args.telemetry_a, &args.telemetry_b) {
        (Some(a), Some(b)) => Ok((load_lap(a, &config.schema)?, load_lap(b, &config.schema)?)),
        (None, None) => {
            info!("no telemetry given; generating synthetic laps");
            let base = GeneratorConfig::default();
            let rival = base.rival(args.rival_pace, base.seed + 1);
            let lap_a = config
                .schema
                .resolve(&build_lap_records(&base)?)
                .context("resolving synthetic lap A")?;
            let lap_b = config
                .schema
                .resolve(&build_lap_records(&rival)?)
                .context("resolving synthetic lap B")?;
            Ok((lap_a, lap_b))
        }
        _ => anyhow::bail!("--telemetry-a and --telemetry-b must be given together"),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = if let Some(path) = &args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::from_args(
            args.dist_step,
            args.tol_m,
            args.min_drop,
            args.min_recovery,
            args.min_len,
        )
    };

    let runner = Runner::new(workflow_config.clone())?;
    let (lap_a, lap_b) = load_laps(&args, &workflow_config)?;
    let result = runner.execute(&lap_a, &lap_b)?;

    println!(
        "{} vs {} -> corners {}/{}, matched {}",
        args.drv_a,
        args.drv_b,
        result.run_a.segments.len(),
        result.run_b.segments.len(),
        result.comparison.rows.len()
    );

    let model = ComparisonModel::new(&args.drv_a, &args.drv_b, &result);
    println!("\n{}", format_summary(&model));

    if let Some(path) = &args.report {
        write_report(path, &model)?;
        info!("report written to {}", path.display());
    }

    let metrics = runner.metrics();
    info!(
        "laps {} (empty {}), corners {}, errors {}",
        metrics.laps, metrics.empty_laps, metrics.corners, metrics.errors
    );

    if args.serve {
        let gui_bridge = GuiBridge::new(Arc::new(runner.clone()));
        gui_bridge.publish(&model)?;
        gui_bridge.publish_status("HTTP bridge running (Ctrl+C to stop)...");
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}
