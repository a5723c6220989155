//! # dpll-sat
//!
//! Command-line front end for the DPLL solver in the `dpll_sat` library.
//!
//! ```sh
//! # Solve a DIMACS file
//! dpll-sat problem.cnf
//!
//! # Same, with explicit options
//! dpll-sat file --path problem.cnf --variable-selection jeroslow-wang -p
//!
//! # Solve clauses given as text
//! dpll-sat text --input "1 2 0\n-1 0"
//!
//! # Solve every .cnf file in a directory, giving up after 10k decisions each
//! dpll-sat dir --path data/ --max-decisions 10000
//!
//! # Write an unsatisfiable random 2-SAT instance
//! dpll-sat generate --vars 20 --clauses 60 --unsat --seed 1 -o unsat.cnf
//! ```
//!
//! The verdict is printed last: `SATISFIABLE`, `UNSATISFIABLE`, or `UNKNOWN`
//! when the search budget ran out. An internal solver error exits with a
//! non-zero status.

use crate::command_line::cli::{
    Cli, Commands, init_logging, solve_dir, solve_file, solve_text, write_instance,
};
use clap::{CommandFactory, Parser};

mod command_line;

#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbosity());

    match cli.command {
        Some(Commands::File { path }) => {
            solve_file(&path, &cli.common)?;
        }
        Some(Commands::Text { input }) => {
            solve_text(&input, &cli.common)?;
        }
        Some(Commands::Dir { path }) => {
            solve_dir(&path, &cli.common)?;
        }
        Some(Commands::Generate {
            vars,
            clauses,
            unsat,
            seed,
            output,
        }) => {
            write_instance(vars, clauses, unsat, seed, output.as_deref())?;
        }
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
        }
        None => match cli.path {
            Some(path) => {
                solve_file(&path, &cli.common)?;
            }
            None => {
                Cli::command().print_help()?;
                std::process::exit(2);
            }
        },
    }

    Ok(())
}
