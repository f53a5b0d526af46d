mod config;
mod error;
mod logging;
mod summary;

use std::path::{Path, PathBuf};
use std::time::Instant;

use allot_core::{
    AllocationStatus, Allocator, GroupCapPolicy, OutputLayout, OutputRecord, Partition, emit,
};
use allot_highs::HighsSolver;
use allot_io::{CsvSink, InputPaths, load_entities};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{info, warn};

use crate::config::RunConfig;
use crate::error::CliError;
use crate::summary::{CheckSummary, RunSummary, print_check_table, print_run_table};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Allocate town demand across cargo carriers and depots"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Solve the allocation and write the ratio table
    Solve(SolveArgs),
    /// Read and partition the inputs, build the model and report its size
    Check(CheckArgs),
}

#[derive(Args, Debug, Clone)]
struct InputArgs {
    /// Cargo table (capacities and share windows)
    #[arg(long)]
    cargo: PathBuf,

    /// Town table (demand and NPS scores)
    #[arg(long)]
    towns: PathBuf,

    /// Depot table; town demand becomes a percentage of depot capacity
    #[arg(long)]
    depots: Option<PathBuf>,

    /// Delivery-mode table (same-day and carry-over capacities and costs)
    #[arg(long)]
    delivery: Option<PathBuf>,
}

impl InputArgs {
    fn paths(&self) -> InputPaths {
        InputPaths {
            cargo: self.cargo.clone(),
            towns: self.towns.clone(),
            depots: self.depots.clone(),
            delivery: self.delivery.clone(),
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
struct ModelArgs {
    /// TOML file with [model] and [solver] tables
    #[arg(long)]
    config: Option<PathBuf>,

    /// Solver time limit in seconds
    #[arg(long)]
    time_limit: Option<f64>,

    /// Objective weight per unit of overflow
    #[arg(long)]
    exceed_cost: Option<f64>,

    /// Build without overflow variables
    #[arg(long)]
    no_exceed_penalty: bool,

    /// Add carry-over variables for towns with delivery-mode data
    #[arg(long)]
    carry_over: bool,

    /// Volume capped by the per-group maximum share
    #[arg(long, value_enum)]
    group_cap: Option<GroupCap>,

    /// Solve the continuous relaxation
    #[arg(long)]
    continuous: bool,

    /// Re-solve once without global minimum shares if infeasible
    #[arg(long)]
    relax_on_infeasible: bool,
}

impl ModelArgs {
    /// File values first, then explicit flags on top.
    fn resolve(&self) -> Result<RunConfig, Box<dyn std::error::Error>> {
        let mut config = RunConfig::load_optional(self.config.as_deref())?;
        if let Some(seconds) = self.time_limit {
            config.solver = config.solver.with_time_limit(seconds);
        }
        if let Some(cost) = self.exceed_cost {
            config.model = config.model.with_exceed_cost(cost);
        }
        if self.no_exceed_penalty {
            config.model = config.model.with_exceed_penalty(false);
        }
        if self.carry_over {
            config.model = config.model.with_carry_over(true);
        }
        if let Some(policy) = self.group_cap {
            config.model = config.model.with_group_cap_policy(policy.into());
        }
        if self.continuous {
            config.model = config.model.with_integral(false);
        }
        if self.relax_on_infeasible {
            config.model = config.model.with_relax_on_infeasible(true);
        }
        config.solver.validate()?;
        Ok(config)
    }
}

#[derive(Parser, Debug)]
struct SolveArgs {
    #[command(flatten)]
    inputs: InputArgs,

    /// Result table path
    #[arg(long)]
    output: PathBuf,

    #[command(flatten)]
    model: ModelArgs,

    /// Output format for stdout
    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Log filter, e.g. `info` or `allot_core=debug`
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Parser, Debug)]
struct CheckArgs {
    #[command(flatten)]
    inputs: InputArgs,

    #[command(flatten)]
    model: ModelArgs,

    /// Output format for stdout
    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Log filter, e.g. `info` or `allot_core=debug`
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum GroupCap {
    AllocatedOnly,
    AllocatedAndOverflow,
}

impl From<GroupCap> for GroupCapPolicy {
    fn from(value: GroupCap) -> Self {
        match value {
            GroupCap::AllocatedOnly => GroupCapPolicy::AllocatedOnly,
            GroupCap::AllocatedAndOverflow => GroupCapPolicy::AllocatedAndOverflow,
        }
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    match cli.command {
        Command::Solve(args) => solve_command(args),
        Command::Check(args) => check_command(args),
    }
}

fn load_partition(inputs: &InputArgs) -> Result<Partition, Box<dyn std::error::Error>> {
    let entities = load_entities(&inputs.paths())?;
    Ok(Partition::build(&entities)?)
}

fn solve_command(args: SolveArgs) -> Result<(), Box<dyn std::error::Error>> {
    logging::init(args.log_level.as_deref()).map_err(CliError::Logging)?;
    let started = Instant::now();

    let config = args.model.resolve()?;
    let partition = load_partition(&args.inputs)?;
    let mut allocator = Allocator::new(HighsSolver::with_config(config.solver), config.model);
    let outcome = allocator.run(&partition)?;

    let mut written = 0;
    let mut output = None;
    if outcome.has_solution() {
        let records = outcome.records(&partition)?;
        written = write_output(&args.output, &partition, &records)?;
        output = Some(args.output.display().to_string());
    }

    let summary = RunSummary::from_outcome(&outcome, &partition, written, output);
    match args.format {
        OutputFormat::Table => print_run_table(&summary),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
    }

    info!(
        component = "cli",
        operation = "solve",
        status = summary.status.as_str(),
        records = written,
        duration_ms = started.elapsed().as_secs_f64() * 1000.0,
        "Allocation run finished"
    );

    if !outcome.has_solution() {
        return Err(CliError::NoAllocation {
            status: summary.status,
            solver_status: summary.solver_status,
        }
        .into());
    }
    if outcome.status() != AllocationStatus::Optimal {
        warn!(
            component = "cli",
            operation = "solve",
            status = summary.status.as_str(),
            "Result table holds a non-optimal allocation"
        );
    }
    Ok(())
}

fn write_output(
    path: &Path,
    partition: &Partition,
    records: &[OutputRecord],
) -> Result<usize, Box<dyn std::error::Error>> {
    let layout = OutputLayout::from_partition(partition);
    let mut sink = CsvSink::create(path)?;
    let written = emit(&mut sink, &layout, records);
    drop(sink);
    if written.is_err() {
        // Nothing was written; leave no empty file behind.
        let _ = std::fs::remove_file(path);
    }
    Ok(written?)
}

fn check_command(args: CheckArgs) -> Result<(), Box<dyn std::error::Error>> {
    logging::init(args.log_level.as_deref()).map_err(CliError::Logging)?;

    let config = args.model.resolve()?;
    let partition = load_partition(&args.inputs)?;
    let allocator = Allocator::new(HighsSolver::with_config(config.solver), config.model);
    let built = allocator.build(&partition)?;

    let summary = CheckSummary::new(&partition, built.size());
    match args.format {
        OutputFormat::Table => print_check_table(&summary),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
    }
    Ok(())
}
