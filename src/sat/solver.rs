#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Solver configuration, statistics and outcomes.
//!
//! A search ends in exactly one of four ways, each a distinct
//! [`SearchResult`] variant: a model, a proof of unsatisfiability, an
//! exhausted resource budget, or a detected defect in the solver itself.
//! Callers must never read "gave up" or "broken" as "no model".

use crate::sat::assignment::Assignment;
use crate::sat::clause::Clause;
use crate::sat::cnf::Cnf;
use crate::sat::dpll::Dpll;
use crate::sat::literal::{Literal, Variable};
use crate::sat::validate::Violation;
use crate::sat::variable_selection::VariableSelectionType;
use core::fmt;
use thiserror::Error;

/// Default cap on case-split decisions.
pub const DEFAULT_MAX_DECISIONS: usize = 1_000_000;

/// Default cap on the depth of the search stack.
pub const DEFAULT_MAX_DEPTH: usize = 1_000_000;

/// Tunables for a single search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverOptions {
    /// The search gives up once more than this many decisions were made.
    pub max_decisions: usize,
    /// The search gives up once the stack holds more than this many frames.
    pub max_depth: usize,
    /// Branching heuristic.
    pub variable_selection: VariableSelectionType,
    /// Seed for randomised heuristics.
    pub seed: u64,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            max_decisions: DEFAULT_MAX_DECISIONS,
            max_depth: DEFAULT_MAX_DEPTH,
            variable_selection: VariableSelectionType::default(),
            seed: 0,
        }
    }
}

impl SolverOptions {
    #[must_use]
    pub const fn with_max_decisions(mut self, max_decisions: usize) -> Self {
        self.max_decisions = max_decisions;
        self
    }

    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub const fn with_variable_selection(mut self, selection: VariableSelectionType) -> Self {
        self.variable_selection = selection;
        self
    }

    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Counters accumulated by one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SolutionStats {
    /// Case splits.
    pub decisions: usize,
    /// Abandoned decision branches.
    pub backtracks: usize,
    /// Literals forced by unit clauses.
    pub propagations: usize,
    /// Pure literals assigned.
    pub pure_literals: usize,
    /// Falsified clauses met.
    pub conflicts: usize,
    /// Deepest search stack seen.
    pub max_depth: usize,
}

/// The budget that stopped a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceLimit {
    /// The decision budget, with its configured maximum.
    Decisions(usize),
    /// The depth limit, with its configured maximum.
    Depth(usize),
}

impl fmt::Display for ResourceLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decisions(max) => write!(f, "decision budget of {max} exceeded"),
            Self::Depth(max) => write!(f, "search depth limit of {max} exceeded"),
        }
    }
}

/// Solver invariants that were found broken.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// A unit clause of the reduced formula names an assigned variable.
    #[error("unit literal {literal} refers to an already assigned variable")]
    AssignedUnitLiteral { literal: Literal },
    /// Clauses remain but every variable is assigned.
    #[error("unresolved clauses remain but no variable is left to branch on")]
    NoBranchVariable,
    /// The selector returned an id that is not a valid variable.
    #[error("variable {0} cannot be branched on")]
    VariableOutOfRange(Variable),
    /// The validator rejected a model the search reported.
    #[error("reported model rejected: {0}")]
    ModelRejected(Violation),
}

/// A solver defect, with the state needed to diagnose it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("internal solver error: {violation}")]
pub struct InternalError {
    /// The broken invariant.
    pub violation: InvariantViolation,
    /// The clause involved, when there is one.
    pub clause: Option<Clause>,
    /// The assignment at the moment the defect was detected.
    pub assignment: Assignment,
}

/// Outcome of a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchResult {
    /// A satisfying assignment, total over `1..=num_vars`.
    Model(Assignment),
    /// No assignment satisfies the formula.
    Unsatisfiable,
    /// The search stopped early; the formula may or may not be satisfiable.
    ResourceExceeded {
        limit: ResourceLimit,
        stats: SolutionStats,
    },
    /// The solver broke one of its own invariants.
    InternalError(Box<InternalError>),
}

impl SearchResult {
    #[must_use]
    pub const fn is_model(&self) -> bool {
        matches!(self, Self::Model(_))
    }

    #[must_use]
    pub const fn is_unsatisfiable(&self) -> bool {
        matches!(self, Self::Unsatisfiable)
    }

    #[must_use]
    pub const fn is_resource_exceeded(&self) -> bool {
        matches!(self, Self::ResourceExceeded { .. })
    }

    /// `true` for a model or a refutation.
    #[must_use]
    pub const fn is_definite(&self) -> bool {
        self.is_model() || self.is_unsatisfiable()
    }

    #[must_use]
    pub const fn model(&self) -> Option<&Assignment> {
        match self {
            Self::Model(a) => Some(a),
            _ => None,
        }
    }
}

/// The verdict line printed by the command line tool.
impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Model(_) => write!(f, "SATISFIABLE"),
            Self::Unsatisfiable => write!(f, "UNSATISFIABLE"),
            Self::ResourceExceeded { .. } => write!(f, "UNKNOWN"),
            Self::InternalError(_) => write!(f, "ERROR"),
        }
    }
}

/// A complete search procedure over a borrowed formula.
pub trait Solver<'a> {
    fn new(cnf: &'a Cnf, options: SolverOptions) -> Self;

    /// Runs the search and validates any model it produces.
    fn solve(&mut self) -> SearchResult;

    fn stats(&self) -> SolutionStats;
}

/// Solves `cnf` with the given options.
///
/// A reported model has already passed [`crate::sat::validate::check`];
/// a model that fails it comes back as [`SearchResult::InternalError`].
#[must_use]
pub fn solve(cnf: &Cnf, options: SolverOptions) -> SearchResult {
    Dpll::new(cnf, options).solve()
}
