#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Branching heuristics.
//!
//! A selector picks the next unassigned variable to case-split on. Any
//! deterministic choice keeps the search sound and complete; the heuristics
//! differ only in how quickly they tend to find a model or a refutation.
//! All of them are deterministic for a given formula (and seed, for
//! [`RandomOrder`]), so repeated runs explore the same tree.

use crate::sat::assignment::Assignment;
use crate::sat::cnf::Cnf;
use crate::sat::literal::Variable;
use clap::ValueEnum;
use core::fmt;
use itertools::Itertools;
use ordered_float::OrderedFloat;
use rustc_hash::FxHashMap;

pub trait VariableSelection {
    fn new(cnf: &Cnf) -> Self
    where
        Self: Sized;

    /// An unassigned variable, or `None` when every variable has a value.
    fn pick(&mut self, assignment: &Assignment) -> Option<Variable>;

    /// Returns to the state right after construction. Called before every
    /// search.
    fn reset(&mut self) {}
}

/// Lowest unassigned variable id first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FixedOrder;

impl VariableSelection for FixedOrder {
    fn new(_: &Cnf) -> Self {
        Self
    }

    fn pick(&mut self, assignment: &Assignment) -> Option<Variable> {
        assignment.remaining().next()
    }
}

/// A static ranking computed once from the formula.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct StaticOrder(Vec<Variable>);

impl StaticOrder {
    fn pick(&self, assignment: &Assignment) -> Option<Variable> {
        self.0
            .iter()
            .copied()
            .find(|&v| assignment.is_remaining(v))
            // variables that occur in no clause
            .or_else(|| assignment.remaining().next())
    }
}


/// Most occurrences in the original formula first, ties broken by lower id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MostFrequent(StaticOrder);

impl VariableSelection for MostFrequent {
    fn new(cnf: &Cnf) -> Self {
        let order = cnf
            .occurrences()
            .into_iter()
            .sorted_by_key(|&(v, count)| (core::cmp::Reverse(count), v))
            .map(|(v, _)| v)
            .collect();
        Self(StaticOrder(order))
    }

    fn pick(&mut self, assignment: &Assignment) -> Option<Variable> {
        self.0.pick(assignment)
    }
}

/// Static two-sided Jeroslow-Wang: each occurrence in a clause of length `n`
/// contributes `2^-n`, so variables in short clauses rank first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JeroslowWang(StaticOrder);

impl JeroslowWang {
    /// Scores of the variables that occur in `cnf`.
    #[must_use]
    pub fn scores(cnf: &Cnf) -> FxHashMap<Variable, OrderedFloat<f64>> {
        let mut scores: FxHashMap<Variable, OrderedFloat<f64>> = FxHashMap::default();
        for clause in cnf {
            let weight = 2f64.powi(-i32::try_from(clause.len()).unwrap_or(i32::MAX));
            for var in clause.variables() {
                scores.entry(var).or_default().0 += weight;
            }
        }
        scores
    }
}

impl VariableSelection for JeroslowWang {
    fn new(cnf: &Cnf) -> Self {
        let order = Self::scores(cnf)
            .into_iter()
            .sorted_by_key(|&(v, score)| (core::cmp::Reverse(score), v))
            .map(|(v, _)| v)
            .collect();
        Self(StaticOrder(order))
    }

    fn pick(&mut self, assignment: &Assignment) -> Option<Variable> {
        self.0.pick(assignment)
    }
}

/// Uniform choice among unassigned variables from a seeded generator.
#[derive(Debug, Clone)]
pub struct RandomOrder {
    seed: u64,
    rng: fastrand::Rng,
}

impl RandomOrder {
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: fastrand::Rng::with_seed(seed),
        }
    }
}

impl VariableSelection for RandomOrder {
    fn new(_: &Cnf) -> Self {
        Self::with_seed(0)
    }

    fn pick(&mut self, assignment: &Assignment) -> Option<Variable> {
        let n = assignment.num_remaining();
        if n == 0 {
            return None;
        }
        assignment.remaining().nth(self.rng.usize(..n))
    }

    fn reset(&mut self) {
        self.rng = fastrand::Rng::with_seed(self.seed);
    }
}

/// Heuristic names accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, ValueEnum)]
pub enum VariableSelectionType {
    FixedOrder,
    #[default]
    MostFrequent,
    JeroslowWang,
    RandomOrder,
}

impl fmt::Display for VariableSelectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FixedOrder => "fixed-order",
            Self::MostFrequent => "most-frequent",
            Self::JeroslowWang => "jeroslow-wang",
            Self::RandomOrder => "random-order",
        };
        write!(f, "{name}")
    }
}

impl VariableSelectionType {
    /// Builds the selector for `cnf`. `seed` only affects [`RandomOrder`].
    #[must_use]
    pub fn to_impl(self, cnf: &Cnf, seed: u64) -> VariableSelectionImpls {
        match self {
            Self::FixedOrder => VariableSelectionImpls::FixedOrder(FixedOrder::new(cnf)),
            Self::MostFrequent => VariableSelectionImpls::MostFrequent(MostFrequent::new(cnf)),
            Self::JeroslowWang => VariableSelectionImpls::JeroslowWang(JeroslowWang::new(cnf)),
            Self::RandomOrder => VariableSelectionImpls::RandomOrder(RandomOrder::with_seed(seed)),
        }
    }
}

/// Enum dispatch over the available heuristics.
#[derive(Debug, Clone)]
pub enum VariableSelectionImpls {
    FixedOrder(FixedOrder),
    MostFrequent(MostFrequent),
    JeroslowWang(JeroslowWang),
    RandomOrder(RandomOrder),
}

impl VariableSelection for VariableSelectionImpls {
    fn new(cnf: &Cnf) -> Self {
        Self::MostFrequent(MostFrequent::new(cnf))
    }

    fn pick(&mut self, assignment: &Assignment) -> Option<Variable> {
        match self {
            Self::FixedOrder(s) => s.pick(assignment),
            Self::MostFrequent(s) => s.pick(assignment),
            Self::JeroslowWang(s) => s.pick(assignment),
            Self::RandomOrder(s) => s.pick(assignment),
        }
    }

    fn reset(&mut self) {
        match self {
            Self::FixedOrder(s) => s.reset(),
            Self::MostFrequent(s) => s.reset(),
            Self::JeroslowWang(s) => s.reset(),
            Self::RandomOrder(s) => s.reset(),
        }
    }
}
