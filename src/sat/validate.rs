#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Independent model checking.
//!
//! The validator shares nothing with the search beyond the formula and the
//! final assignment, so a bug in simplification or backtracking shows up here
//! as a rejected model rather than a wrong answer.

use crate::sat::assignment::Assignment;
use crate::sat::cnf::Cnf;
use crate::sat::literal::Variable;
use thiserror::Error;

/// Why an assignment is not a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Violation {
    /// A variable that appears in the formula has no value.
    #[error("variable {var} in clause {clause} is unassigned")]
    Unassigned { clause: usize, var: Variable },
    /// Every literal of the clause is false.
    #[error("clause {clause} is falsified")]
    Falsified { clause: usize },
}

impl Violation {
    /// Index of the offending clause.
    #[must_use]
    pub const fn clause(self) -> usize {
        match self {
            Self::Unassigned { clause, .. } | Self::Falsified { clause } => clause,
        }
    }
}

/// Checks that `assignment` is total over the formula's variables and makes
/// every clause true.
///
/// # Errors
///
/// The first [`Violation`] found. Totality is checked over all clauses before
/// any clause is evaluated.
pub fn check(cnf: &Cnf, assignment: &Assignment) -> Result<(), Violation> {
    for (idx, clause) in cnf.iter().enumerate() {
        if let Some(var) = clause.variables().find(|&v| !assignment.is_assigned(v)) {
            return Err(Violation::Unassigned { clause: idx, var });
        }
    }

    match cnf
        .iter()
        .position(|c| !c.iter().any(|&l| assignment.literal_value(l) == Some(true)))
    {
        Some(clause) => Err(Violation::Falsified { clause }),
        None => Ok(()),
    }
}

/// `true` if `assignment` is a model of `cnf`.
#[must_use]
pub fn validate(cnf: &Cnf, assignment: &Assignment) -> bool {
    check(cnf, assignment).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::literal::Literal;

    fn cnf(clauses: &[&[i32]]) -> Cnf {
        Cnf::from_literals(clauses.iter().map(|c| c.iter().copied())).unwrap()
    }

    fn assignment(n: usize, lits: &[i32]) -> Assignment {
        let mut a = Assignment::new(n);
        for &l in lits {
            a.assign(Literal::from_i32(l).unwrap());
        }
        a
    }

    #[test]
    fn test_valid_model() {
        let f = cnf(&[&[1, 2], &[-1, 3]]);
        assert!(validate(&f, &assignment(3, &[1, -2, 3])));
    }

    #[test]
    fn test_falsified_clause() {
        let f = cnf(&[&[1, 2], &[-1, 3]]);
        let a = assignment(3, &[1, 2, -3]);
        assert_eq!(check(&f, &a), Err(Violation::Falsified { clause: 1 }));
        assert!(!validate(&f, &a));
    }

    #[test]
    fn test_partial_assignment_rejected() {
        // 1 = true satisfies the clause, but 2 is unassigned
        let f = cnf(&[&[1, 2]]);
        let a = assignment(2, &[1]);
        assert_eq!(check(&f, &a), Err(Violation::Unassigned { clause: 0, var: 2 }));
    }

    #[test]
    fn test_variables_outside_clauses_may_be_unassigned() {
        let f = cnf(&[&[1]]).with_num_vars(3).unwrap();
        assert!(validate(&f, &assignment(3, &[1])));
    }

    #[test]
    fn test_validation_is_idempotent_and_pure() {
        let f = cnf(&[&[1, -2], &[2, 3]]);
        let a = assignment(3, &[1, 2, -3]);
        let (f0, a0) = (f.clone(), a.clone());
        let first = validate(&f, &a);
        let second = validate(&f, &a);
        assert_eq!(first, second);
        assert_eq!(f, f0);
        assert_eq!(a, a0);
    }

    #[test]
    fn test_empty_formula() {
        assert!(validate(&Cnf::default(), &Assignment::new(0)));
    }
}
