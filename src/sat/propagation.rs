#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Forced literals in a reduced formula.
//!
//! Both helpers return at most one literal: the search assigns it, then
//! simplifies again before looking for the next one.

use crate::sat::clause::Clause;
use crate::sat::literal::Literal;
use rustc_hash::FxHashMap;

/// The literal of the first unit clause, if any.
#[must_use]
pub fn find_unit(clauses: &[Clause]) -> Option<Literal> {
    clauses.iter().find(|c| c.is_unit()).map(|c| c[0])
}

/// Occurrence count of every literal in `clauses`.
#[must_use]
pub fn literal_counts(clauses: &[Clause]) -> FxHashMap<Literal, usize> {
    let mut counts = FxHashMap::default();
    for &lit in clauses.iter().flatten() {
        *counts.entry(lit).or_insert(0) += 1;
    }
    counts
}

/// The first literal, in clause order, whose negation never occurs.
#[must_use]
pub fn find_pure(clauses: &[Clause]) -> Option<Literal> {
    let counts = literal_counts(clauses);
    clauses
        .iter()
        .flatten()
        .copied()
        .find(|lit| !counts.contains_key(&lit.negated()))
}
