#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Reduction of a formula under a partial assignment.
//!
//! Satisfied clauses disappear, falsified literals are dropped from the rest,
//! and unassigned literals are kept verbatim. The formula itself is never
//! touched; the reduced view is a fresh set of clauses.

use crate::sat::assignment::Assignment;
use crate::sat::clause::{Clause, LiteralStorage};
use crate::sat::cnf::Cnf;

/// Result of simplifying a formula.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Simplified {
    /// Every literal of the clause at this index is false.
    Conflict { clause: usize },
    /// No clause is left unsatisfied.
    Satisfied,
    /// The unsatisfied clauses, restricted to their unassigned literals.
    /// Never empty, and no clause in it is empty.
    Reduced(Vec<Clause>),
}

/// Reduces `cnf` under `assignment`.
///
/// Scanning stops at the first clause whose literals are all false.
#[must_use]
pub fn simplify(cnf: &Cnf, assignment: &Assignment) -> Simplified {
    let mut reduced = Vec::new();

    'clauses: for (idx, clause) in cnf.iter().enumerate() {
        let mut kept = LiteralStorage::new();
        for &lit in clause {
            match assignment.literal_value(lit) {
                Some(true) => continue 'clauses,
                Some(false) => {}
                None => kept.push(lit),
            }
        }

        if kept.is_empty() {
            return Simplified::Conflict { clause: idx };
        }
        reduced.push(Clause::new(kept));
    }

    if reduced.is_empty() {
        Simplified::Satisfied
    } else {
        Simplified::Reduced(reduced)
    }
}
