#![allow(clippy::cast_precision_loss)]

use anyhow::{Context, anyhow, bail};
use clap::{ArgAction, Args, Parser, Subcommand};
use dpll_sat::sat::cnf::Cnf;
use dpll_sat::sat::dimacs::{parse_file, parse_str};
use dpll_sat::sat::dpll::Dpll;
use dpll_sat::sat::generator::{satisfiable_2sat, unsatisfiable_2sat};
use dpll_sat::sat::solver::{
    DEFAULT_MAX_DECISIONS, DEFAULT_MAX_DEPTH, SearchResult, SolutionStats, Solver, SolverOptions,
};
use dpll_sat::sat::validate;
use dpll_sat::sat::variable_selection::VariableSelectionType;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tikv_jemalloc_ctl::{epoch, stats};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Defines the command-line interface for the solver.
#[derive(Parser, Debug)]
#[command(name = "dpll-sat", version, about = "A DPLL SAT solver")]
pub(crate) struct Cli {
    /// Path to a DIMACS .cnf file, solved when no subcommand is given.
    pub path: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub common: CommonOptions,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Solve a CNF file in DIMACS format.
    File {
        /// Path to the DIMACS .cnf file.
        #[arg(long)]
        path: PathBuf,
    },

    /// Solve a CNF formula provided as plain text.
    Text {
        /// DIMACS clauses as a string (e.g. "1 -2 0\n2 3 0").
        #[arg(short, long)]
        input: String,
    },

    /// Solve every .cnf file below a directory.
    Dir {
        #[arg(long)]
        path: PathBuf,
    },

    /// Write a random 2-SAT instance in DIMACS format.
    Generate {
        /// Number of variables (at least 2).
        #[arg(long)]
        vars: usize,

        /// Number of clauses.
        #[arg(long)]
        clauses: usize,

        /// Generate an unsatisfiable instance (needs at least 4 clauses).
        #[arg(long, default_value_t = false)]
        unsat: bool,

        /// Seed for the generator. A random seed is used when omitted.
        #[arg(long)]
        seed: Option<u64>,

        /// Output file. Prints to stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate shell completion scripts.
    Completions {
        /// The shell to generate completions for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Options shared by every solving command. They are global, so they may be
/// given before or after the subcommand.
#[derive(Args, Debug, Clone)]
pub(crate) struct CommonOptions {
    /// Log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG` overrides it.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub(crate) verbose: u8,

    /// Re-check a reported model against the formula.
    #[arg(long, default_value_t = true, action = ArgAction::Set, global = true)]
    pub(crate) verify: bool,

    /// Print problem and search statistics.
    #[arg(long, default_value_t = true, action = ArgAction::Set, global = true)]
    pub(crate) stats: bool,

    /// Print the satisfying assignment.
    #[arg(short, long, default_value_t = false, global = true)]
    pub(crate) print_solution: bool,

    /// Give up after this many case splits.
    #[arg(long, default_value_t = DEFAULT_MAX_DECISIONS, global = true)]
    pub(crate) max_decisions: usize,

    /// Give up once the search stack is deeper than this.
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH, global = true)]
    pub(crate) max_depth: usize,

    #[arg(long, default_value_t = VariableSelectionType::MostFrequent, global = true)]
    pub(crate) variable_selection: VariableSelectionType,

    /// Seed for `random-order` variable selection.
    #[arg(long = "selection-seed", default_value_t = 0, global = true)]
    pub(crate) seed: u64,
}

impl Default for CommonOptions {
    fn default() -> Self {
        let options = SolverOptions::default();
        Self {
            verbose: 0,
            verify: true,
            stats: true,
            print_solution: false,
            max_decisions: options.max_decisions,
            max_depth: options.max_depth,
            variable_selection: options.variable_selection,
            seed: options.seed,
        }
    }
}

impl CommonOptions {
    pub(crate) const fn solver_options(&self) -> SolverOptions {
        SolverOptions {
            max_decisions: self.max_decisions,
            max_depth: self.max_depth,
            variable_selection: self.variable_selection,
            seed: self.seed,
        }
    }
}

impl Cli {
    pub(crate) const fn verbosity(&self) -> u8 {
        self.common.verbose
    }
}

pub(crate) const fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Installs the `tracing` subscriber. Logs go to stderr so that DIMACS
/// written to stdout stays clean.
pub(crate) fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for(verbosity)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Allocated and resident memory in MiB, as reported by jemalloc.
pub(crate) fn memory_usage() -> anyhow::Result<(f64, f64)> {
    epoch::advance().map_err(|e| anyhow!("failed to refresh jemalloc stats: {e}"))?;
    let allocated = stats::allocated::mib()
        .and_then(|mib| mib.read())
        .map_err(|e| anyhow!("jemalloc allocated: {e}"))?;
    let resident = stats::resident::mib()
        .and_then(|mib| mib.read())
        .map_err(|e| anyhow!("jemalloc resident: {e}"))?;
    Ok((
        allocated as f64 / (1024.0 * 1024.0),
        resident as f64 / (1024.0 * 1024.0),
    ))
}

/// Runs the solver and times it.
pub(crate) fn solve(cnf: &Cnf, common: &CommonOptions) -> (SearchResult, Duration, SolutionStats) {
    let time = Instant::now();
    let mut solver = Dpll::new(cnf, common.solver_options());
    let result = solver.solve();
    let elapsed = time.elapsed();
    debug!(%result, ?elapsed, "solver returned");
    (result, elapsed, solver.stats())
}

/// Re-checks a model against the formula and prints the verdict.
///
/// # Errors
///
/// If the model does not satisfy the formula.
pub(crate) fn verify_solution(cnf: &Cnf, result: &SearchResult) -> anyhow::Result<()> {
    if let Some(model) = result.model() {
        validate::check(cnf, model).context("solution failed verification")?;
        println!("Verified: true");
    }
    Ok(())
}

/// Solves `cnf`, prints the report, and returns the outcome.
///
/// # Errors
///
/// If the solver reports an internal error, verification fails, or memory
/// statistics cannot be read.
pub(crate) fn solve_and_report(
    cnf: &Cnf,
    common: &CommonOptions,
    label: Option<&Path>,
    parse_time: Duration,
) -> anyhow::Result<SearchResult> {
    if let Some(name) = label {
        println!("Solving: {}", name.display());
    }
    info!(
        variables = cnf.num_vars(),
        clauses = cnf.len(),
        literals = cnf.num_literals(),
        "formula loaded"
    );

    let (result, elapsed, solver_stats) = solve(cnf, common);

    if let SearchResult::InternalError(err) = &result {
        bail!("{err} (clause: {:?})", err.clause.as_ref().map(ToString::to_string));
    }

    if common.verify {
        verify_solution(cnf, &result)?;
    }

    if common.stats {
        let (allocated, resident) = memory_usage()?;
        print_stats(parse_time, elapsed, cnf, &solver_stats, allocated, resident);
    }

    if common.print_solution {
        if let Some(model) = result.model() {
            println!("Solutions: {}", model.solutions());
        }
    }

    if let SearchResult::ResourceExceeded { limit, .. } = &result {
        warn!(%limit, "search gave up");
    }
    println!("\n{result}");

    Ok(result)
}

/// Parses and solves a DIMACS file.
///
/// # Errors
///
/// If the file cannot be read or parsed, or solving fails.
pub(crate) fn solve_file(path: &Path, common: &CommonOptions) -> anyhow::Result<SearchResult> {
    let time = Instant::now();
    let cnf = parse_file(path).with_context(|| format!("failed to parse {}", path.display()))?;
    let parse_time = time.elapsed();
    solve_and_report(&cnf, common, Some(path), parse_time)
}

/// Parses and solves DIMACS text given on the command line.
///
/// # Errors
///
/// If the text cannot be parsed, or solving fails.
pub(crate) fn solve_text(input: &str, common: &CommonOptions) -> anyhow::Result<SearchResult> {
    let time = Instant::now();
    // shells pass "\n" through literally
    let cnf = parse_str(&input.replace("\\n", "\n")).context("failed to parse input")?;
    let parse_time = time.elapsed();
    solve_and_report(&cnf, common, None, parse_time)
}

/// Solves every `.cnf` file below `path`.
///
/// # Errors
///
/// If `path` is not a directory, or any file fails to parse or solve.
pub(crate) fn solve_dir(path: &Path, common: &CommonOptions) -> anyhow::Result<()> {
    if !path.is_dir() {
        bail!("provided path is not a directory: {}", path.display());
    }

    let mut solved = 0_usize;
    for entry in walkdir::WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
    {
        let file_path = entry.path();
        if !file_path.is_file() {
            continue;
        }
        if file_path.extension().is_none_or(|ext| ext != "cnf") {
            debug!(path = %file_path.display(), "skipping non-CNF file");
            continue;
        }

        solve_file(file_path, common)?;
        solved += 1;
    }

    info!(solved, "directory finished");
    Ok(())
}

/// Builds a random 2-SAT instance.
///
/// # Errors
///
/// If the parameters cannot produce an instance.
pub(crate) fn generate(vars: usize, clauses: usize, unsat: bool, seed: u64) -> anyhow::Result<Cnf> {
    let mut rng = fastrand::Rng::with_seed(seed);
    let cnf = if unsat {
        unsatisfiable_2sat(vars, clauses, &mut rng)
    } else {
        satisfiable_2sat(vars, clauses, &mut rng)
    };
    cnf.context("failed to generate instance")
}

/// Writes a generated instance to `output`, or stdout.
///
/// # Errors
///
/// If generation fails or the file cannot be written.
pub(crate) fn write_instance(
    vars: usize,
    clauses: usize,
    unsat: bool,
    seed: Option<u64>,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let seed = seed.unwrap_or_else(|| fastrand::u64(..));
    let cnf = generate(vars, clauses, unsat, seed)?;
    info!(seed, vars, clauses, unsat, "generated instance");

    let dimacs = format!("c seed {seed}\n{cnf}");
    match output {
        Some(path) => std::fs::write(path, dimacs)
            .with_context(|| format!("unable to write {}", path.display()))?,
        None => print!("{dimacs}"),
    }
    Ok(())
}

/// Prints a single statistic as a table row.
pub(crate) fn stat_line(label: &str, value: impl std::fmt::Display) {
    println!("|  {label:<28} {value:>18}  |");
}

/// Prints a counter together with its per-second rate.
pub(crate) fn stat_line_with_rate(label: &str, value: usize, elapsed: f64) {
    let rate = if elapsed > 0.0 {
        value as f64 / elapsed
    } else {
        0.0
    };
    println!("|  {label:<20} {value:>12} ({rate:>9.0}/sec)  |");
}

/// Prints a summary of problem and search statistics.
pub(crate) fn print_stats(
    parse_time: Duration,
    elapsed: Duration,
    cnf: &Cnf,
    s: &SolutionStats,
    allocated: f64,
    resident: f64,
) {
    let elapsed_secs = elapsed.as_secs_f64();

    println!("\n=======================[ Problem Statistics ]=========================");
    stat_line("Parse time (s)", format!("{:.3}", parse_time.as_secs_f64()));
    stat_line("Variables", cnf.num_vars());
    stat_line("Clauses", cnf.len());
    stat_line("Clauses (declared)", cnf.num_clauses());
    stat_line("Literals", cnf.num_literals());

    println!("========================[ Search Statistics ]========================");
    stat_line_with_rate("Decisions", s.decisions, elapsed_secs);
    stat_line_with_rate("Backtracks", s.backtracks, elapsed_secs);
    stat_line_with_rate("Propagations", s.propagations, elapsed_secs);
    stat_line_with_rate("Pure literals", s.pure_literals, elapsed_secs);
    stat_line_with_rate("Conflicts", s.conflicts, elapsed_secs);
    stat_line("Max depth", s.max_depth);
    stat_line("Memory usage (MiB)", format!("{allocated:.2}"));
    stat_line("Resident memory (MiB)", format!("{resident:.2}"));
    stat_line("CPU time (s)", format!("{elapsed_secs:.3}"));
    println!("=====================================================================");
}
