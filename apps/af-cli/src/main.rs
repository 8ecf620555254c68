mod case;

use af_actuator::{ActError, ActuatorContainer, ActuatorRegistry, ActuatorSnapshot};
use af_core::units::{newtons, watts};
use af_interp::AirfoilCache;
use case::{CaseConfig, CaseError};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;
use uom::si::force::kilonewton;
use uom::si::power::kilowatt;

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Case(#[from] CaseError),

    #[error(transparent)]
    Actuator(#[from] ActError),

    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),

    #[error("Failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
}

type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "af-cli")]
#[command(about = "Actuator disk and line driver", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse, validate and initialize every actuator in a case
    Validate {
        /// Path to the case YAML file
        case_path: PathBuf,
    },
    /// List the registered actuator types
    Types,
    /// Step the actuators against the case inflow
    Run {
        /// Path to the case YAML file
        case_path: PathBuf,
        /// Override the number of steps
        #[arg(long)]
        steps: Option<usize>,
        /// Print only the final step
        #[arg(long)]
        last_only: bool,
    },
}

/// One JSON line per actuator per step.
#[derive(Serialize)]
struct StepRecord<'a> {
    step: usize,
    #[serde(flatten)]
    snapshot: &'a ActuatorSnapshot,
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { case_path } => cmd_validate(&case_path),
        Commands::Types => cmd_types(),
        Commands::Run {
            case_path,
            steps,
            last_only,
        } => cmd_run(&case_path, steps, last_only),
    }
}

fn build(case: &CaseConfig) -> CliResult<ActuatorContainer> {
    let registry = ActuatorRegistry::with_builtins();
    registry.verify_coverage()?;

    let mut container = ActuatorContainer::from_mapping(&registry, &case.actuators)?;
    let mut airfoils = AirfoilCache::with_builtins();
    container.init_all(case.domain_box(), &mut airfoils)?;
    Ok(container)
}

fn cmd_validate(case_path: &Path) -> CliResult<()> {
    println!("Validating case: {}", case_path.display());
    let case = CaseConfig::load(case_path)?;
    let container = build(&case)?;
    for act in container.iter() {
        let bb = &act.info().bound_box;
        println!(
            "  {} ({}) force points: {}, bounds: {:?}..{:?}",
            act.label(),
            act.identifier(),
            act.force_view().pos.len(),
            bb.lo,
            bb.hi
        );
    }
    println!("✓ Case is valid ({} actuators)", container.len());
    Ok(())
}

fn cmd_types() -> CliResult<()> {
    let registry = ActuatorRegistry::with_builtins();
    for id in registry.identifiers() {
        println!("{id}");
    }
    Ok(())
}

fn cmd_run(case_path: &Path, steps: Option<usize>, last_only: bool) -> CliResult<()> {
    let case = CaseConfig::load(case_path)?;
    let steps = steps.unwrap_or(case.steps);
    let mut container = build(&case)?;
    let sampler = case.inflow.sampler(case.domain_box())?;

    info!(actuators = container.len(), steps, "starting run");
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for step in 1..=steps {
        container.step(sampler.as_ref())?;
        if !last_only || step == steps {
            for snapshot in &container.snapshots() {
                let line = serde_json::to_string(&StepRecord { step, snapshot })?;
                writeln!(out, "{line}")?;
            }
        }
    }

    print_disk_summary(&container.snapshots());
    Ok(())
}

/// Thrust and power of every disk, on stderr so stdout stays JSON lines.
fn print_disk_summary(snapshots: &[ActuatorSnapshot]) {
    for snap in snapshots {
        let (Some(thrust), Some(power)) = (snap.scalars.get("thrust"), snap.scalars.get("power"))
        else {
            continue;
        };
        eprintln!(
            "{}: thrust = {:.3} kN, power = {:.3} kW",
            snap.label,
            newtons(*thrust).get::<kilonewton>(),
            watts(*power).get::<kilowatt>()
        );
    }
}
