use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;
use territory_optimizer::generator::{generate, CostPattern};
use territory_optimizer::{
    AssignmentMatrix, AssignmentSolver, CapacityBounds, Cost, FlowSolver, LabeledMatrix, Matrix,
    ShortestPath, SolutionReport, SolveError, SolverConfig,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Assign shops to offices at minimum total cost.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug)]
struct SolverArgs {
    /// Shortest path routine used for augmentation
    #[arg(long, value_enum, default_value_t = ShortestPath::Dijkstra)]
    strategy: ShortestPath,
    /// Give up after this many seconds
    #[arg(long)]
    time_limit: Option<f64>,
}

impl SolverArgs {
    fn config(&self) -> Result<SolverConfig> {
        let time_limit = self
            .time_limit
            .map(Duration::try_from_secs_f64)
            .transpose()
            .context("invalid time limit")?;
        Ok(SolverConfig::new(self.strategy, time_limit))
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Solve the cost matrix in INPUT and write the 0/1 solution to OUTPUT
    Run {
        input: PathBuf,
        output: PathBuf,
        /// Minimum number of shops per office
        #[arg(long, default_value_t = 0)]
        min: usize,
        /// Maximum number of shops per office, defaults to the number of shops
        #[arg(long)]
        max: Option<usize>,
        #[command(flatten)]
        solver: SolverArgs,
    },
    /// Generate a synthetic cost matrix and solve it
    Test {
        #[arg(long, default_value_t = 330)]
        rows: usize,
        #[arg(long, default_value_t = 11)]
        cols: usize,
        /// Bounds are rows / cols ± slack
        #[arg(long, default_value_t = 3)]
        slack: usize,
        #[arg(long, default_value = "TestInput.csv")]
        input: PathBuf,
        #[arg(long, default_value = "TestOutput.csv")]
        output: PathBuf,
        /// Draw random costs from this seed instead of sequential ones
        #[arg(long)]
        seed: Option<u64>,
        #[command(flatten)]
        solver: SolverArgs,
    },
}

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn banner(message: &str) {
    println!("--------------------------");
    println!("... {}", message);
    println!("--------------------------");
}

fn solve_and_report<C: Cost>(
    solver: &FlowSolver,
    costs: &Matrix<C>,
    bounds: CapacityBounds,
) -> Result<AssignmentMatrix, SolveError> {
    let assignment = solver.solve(costs, bounds)?;
    let report = SolutionReport::new(costs, &assignment)?;
    println!("{}", report);
    Ok(assignment)
}

fn run(
    input: &Path,
    output: &Path,
    min: usize,
    max: Option<usize>,
    config: SolverConfig,
) -> Result<()> {
    banner("reading input file");
    let costs = LabeledMatrix::read_path(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let shops = costs.values.rows();
    let bounds = CapacityBounds::new(min, max.unwrap_or(shops));

    banner("solving problem");
    let solver = FlowSolver::new(config);
    // integral inputs are solved in exact arithmetic while they fit in i64
    let exact = costs
        .integral()
        .map(|integral| solve_and_report(&solver, &integral, bounds));
    let assignment = match exact {
        Some(Err(SolveError::NumericOverflow { context })) => {
            warn!("i64 overflow while {}, solving with f64 costs", context);
            solve_and_report(&solver, &costs.values, bounds)?
        }
        Some(result) => result?,
        None => solve_and_report(&solver, &costs.values, bounds)?,
    };

    banner("writing solution matrix");
    costs
        .with_assignment(&assignment)
        .write_path(output)
        .with_context(|| format!("failed to write {}", output.display()))?;
    banner(&format!("Output written to {}", output.display()));
    Ok(())
}

fn main() -> Result<()> {
    enable_tracing();
    let args = Args::parse();
    match args.command {
        Command::Run {
            input,
            output,
            min,
            max,
            solver,
        } => run(&input, &output, min, max, solver.config()?),
        Command::Test {
            rows,
            cols,
            slack,
            input,
            output,
            seed,
            solver,
        } => {
            let pattern = match seed {
                Some(seed) => CostPattern::Uniform { seed, max: 200 },
                None => CostPattern::Sequential,
            };
            generate(rows, cols, pattern)?
                .write_path(&input)
                .with_context(|| format!("failed to write {}", input.display()))?;
            info!("test input written to {}", input.display());

            let bounds = CapacityBounds::around_average(rows, cols, slack);
            println!("*********************************************");
            println!("running test optimization...");
            println!("Match {} shops to {} offices", rows, cols);
            println!("Allow {} to {} shops per office", bounds.min, bounds.max);
            println!("*********************************************");
            run(&input, &output, bounds.min, Some(bounds.max), solver.config()?)
        }
    }
}
