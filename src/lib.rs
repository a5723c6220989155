#![warn(missing_docs)]
//! A DPLL SAT solver: unit propagation, pure literal elimination and
//! chronological backtracking over formulas in conjunctive normal form, with
//! bounded search and independent model validation.
//!
//! ```
//! use dpll_sat::sat::cnf::Cnf;
//! use dpll_sat::sat::solver::{solve, SearchResult, SolverOptions};
//!
//! let cnf = Cnf::from_literals(vec![vec![1, 2], vec![-1]]).unwrap();
//! match solve(&cnf, SolverOptions::default()) {
//!     SearchResult::Model(model) => assert_eq!(model.var_value(2), Some(true)),
//!     other => panic!("unexpected outcome: {other}"),
//! }
//! ```

/// The `sat` module holds the formula representation, DIMACS reader, search
/// engine and validator.
pub mod sat;
