//! DocBot CLI - workshop scenario runner.
//!
//! Single binary that provides:
//! - `docbot run <scenario.yaml>` - drive a scenario's task script to completion
//! - `docbot check <scenario.yaml>` - validate a scenario without running it

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use docbot_sim::{run_scenario, RunOutcome, Scenario, StepReport};
use docbot_tasks::TaskSpec;

#[derive(Parser)]
#[command(name = "docbot")]
#[command(about = "DocBot workshop scenario runner", version)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario's task script
    Run {
        /// Scenario YAML file
        scenario: PathBuf,

        /// Override the scenario seed
        #[arg(long)]
        seed: Option<u64>,

        /// Override the tick budget
        #[arg(long)]
        max_ticks: Option<u64>,

        /// Print the trace log after the run
        #[arg(long)]
        trace: bool,
    },

    /// Validate a scenario without running it
    Check {
        /// Scenario YAML file
        scenario: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    match cli.command {
        Commands::Run {
            scenario,
            seed,
            max_ticks,
            trace,
        } => run(&scenario, seed, max_ticks, trace),
        Commands::Check { scenario } => check(&scenario),
    }
}

fn run(path: &Path, seed: Option<u64>, max_ticks: Option<u64>, trace: bool) -> Result<()> {
    let mut scenario = Scenario::load(path)?;
    tracing::debug!(path = %path.display(), "scenario loaded");
    if let Some(seed) = seed {
        scenario.seed = seed;
    }
    if let Some(max_ticks) = max_ticks {
        scenario.max_ticks = max_ticks;
    }

    lint_or_bail(&scenario)?;

    let report = run_scenario(&scenario)
        .with_context(|| format!("failed to dispatch scenario from {}", path.display()))?;

    for step in &report.steps {
        print_step(step);
    }

    if trace {
        for event in &report.trace.events {
            println!(
                "trace {:>5}  {:<24} a={} b={} {}",
                event.tick, event.tag, event.a, event.b, event.detail
            );
        }
    }

    match report.outcome {
        RunOutcome::Completed => {
            println!(
                "completed: {} step(s) in {} tick(s)",
                report.steps.len(),
                report.ticks_used
            );
            Ok(())
        }
        RunOutcome::StepFailed { step } => {
            bail!("step {step} failed after {} tick(s)", report.ticks_used)
        }
        RunOutcome::OutOfTicks { step } => {
            bail!(
                "tick budget ({}) ran out in step {step}",
                scenario.max_ticks
            )
        }
    }
}

fn check(path: &Path) -> Result<()> {
    let scenario = Scenario::load(path)?;
    lint_or_bail(&scenario)?;

    println!(
        "ok: {} step(s), {} tag(s), {} waypoint(s), {} indicator(s), seed {}",
        scenario.script.len(),
        scenario.scene.tags.len(),
        scenario.scene.waypoints.len(),
        scenario.scene.indicators.len(),
        scenario.seed
    );
    Ok(())
}

fn lint_or_bail(scenario: &Scenario) -> Result<()> {
    let problems = scenario.lint();
    if problems.is_empty() {
        return Ok(());
    }
    for problem in &problems {
        eprintln!("error: {problem}");
    }
    bail!("scenario has {} problem(s)", problems.len())
}

fn print_step(step: &StepReport) {
    println!(
        "{:>5}..{:>5}  {:<40} {:?}",
        step.started_tick,
        step.finished_tick,
        display_spec(&step.spec),
        step.outcome
    );
}

fn display_spec(spec: &TaskSpec) -> String {
    match spec.arg.as_deref() {
        Some(arg) => format!("{}({arg})", spec.name),
        None => format!("{}()", spec.name),
    }
}
