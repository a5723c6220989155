#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The clause store: a formula in conjunctive normal form.
//!
//! A `Cnf` is built once, either by the DIMACS parser or programmatically, and
//! is read-only afterwards. The search engine and the validator only ever
//! borrow it.

use crate::sat::clause::Clause;
use crate::sat::error::{Error, Result};
use crate::sat::literal::{Literal, Variable};
use core::fmt;
use core::ops::Index;
use rustc_hash::{FxHashMap, FxHashSet};

/// A CNF formula plus its declared dimensions.
///
/// The fields are private so that `num_vars` can never fall below a variable
/// used in the clauses; [`Cnf::new`] and [`Cnf::from_literals`] are the only
/// constructors.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cnf {
    /// The clauses, in input order. None of them is empty.
    clauses: Vec<Clause>,
    /// Highest variable id. Never lower than any variable used in `clauses`.
    num_vars: usize,
    /// Clause count as declared by the source. Bookkeeping only.
    num_clauses: usize,
}

impl Cnf {
    /// Creates a formula from already built clauses.
    ///
    /// `declared_vars` is widened if a clause mentions a higher variable.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyClause`] if any clause has no literals, and
    /// [`Error::LiteralOutOfRange`] if `declared_vars` exceeds the largest
    /// representable variable id.
    pub fn new(clauses: Vec<Clause>, declared_vars: usize, declared_clauses: usize) -> Result<Self> {
        if let Some(index) = clauses.iter().position(Clause::is_empty) {
            return Err(Error::EmptyClause { index });
        }
        representable(declared_vars)?;

        let max_var = clauses
            .iter()
            .flat_map(Clause::variables)
            .max()
            .map_or(0, |v| v as usize);

        if max_var > declared_vars {
            tracing::warn!(
                declared = declared_vars,
                used = max_var,
                "formula uses variables beyond the declared count"
            );
        }
        if clauses.len() != declared_clauses {
            tracing::debug!(
                declared = declared_clauses,
                actual = clauses.len(),
                "declared clause count differs from parsed clauses"
            );
        }

        Ok(Self {
            clauses,
            num_vars: declared_vars.max(max_var),
            num_clauses: declared_clauses,
        })
    }

    /// Creates a formula from signed integers, inferring both counts.
    ///
    /// # Errors
    ///
    /// [`Error::ZeroLiteral`] for a `0` inside a clause,
    /// [`Error::LiteralOutOfRange`] for `i32::MIN`, and
    /// [`Error::EmptyClause`] for a clause with no literals.
    pub fn from_literals<I, C>(clauses: I) -> Result<Self>
    where
        I: IntoIterator<Item = C>,
        C: IntoIterator<Item = i32>,
    {
        let clauses: Vec<Clause> = clauses
            .into_iter()
            .map(|c| {
                c.into_iter()
                    .map(|v| match v {
                        0 => Err(Error::ZeroLiteral),
                        v => Literal::from_i32(v).ok_or(Error::LiteralOutOfRange(i64::from(v))),
                    })
                    .collect::<Result<Vec<_>>>()
                    .map(Clause::from)
            })
            .collect::<Result<_>>()?;

        let num_clauses = clauses.len();
        Self::new(clauses, 0, num_clauses)
    }

    /// Declares variables up to `num_vars`. Never narrows the formula.
    ///
    /// # Errors
    ///
    /// [`Error::LiteralOutOfRange`] if `num_vars` exceeds the largest
    /// representable variable id.
    pub fn with_num_vars(mut self, num_vars: usize) -> Result<Self> {
        representable(num_vars)?;
        self.num_vars = self.num_vars.max(num_vars);
        Ok(self)
    }

    #[must_use]
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Highest variable id.
    #[must_use]
    pub const fn num_vars(&self) -> usize {
        self.num_vars
    }

    #[must_use]
    pub const fn num_clauses(&self) -> usize {
        self.num_clauses
    }

    pub fn iter(&self) -> impl Iterator<Item = &Clause> {
        self.clauses.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Total number of literal occurrences across all clauses.
    #[must_use]
    pub fn num_literals(&self) -> usize {
        self.clauses.iter().map(Clause::len).sum()
    }

    /// Variables that occur in at least one clause.
    #[must_use]
    pub fn variables(&self) -> FxHashSet<Variable> {
        self.clauses.iter().flat_map(Clause::variables).collect()
    }

    /// Occurrence count of each variable, both polarities combined.
    #[must_use]
    pub fn occurrences(&self) -> FxHashMap<Variable, usize> {
        let mut counts = FxHashMap::default();
        for var in self.clauses.iter().flat_map(Clause::variables) {
            *counts.entry(var).or_insert(0) += 1;
        }
        counts
    }
}

fn representable(num_vars: usize) -> Result<()> {
    if i32::try_from(num_vars).is_err() {
        return Err(Error::LiteralOutOfRange(
            i64::try_from(num_vars).unwrap_or(i64::MAX),
        ));
    }
    Ok(())
}

impl Index<usize> for Cnf {
    type Output = Clause;

    fn index(&self, index: usize) -> &Self::Output {
        &self.clauses[index]
    }
}

impl<'a> IntoIterator for &'a Cnf {
    type Item = &'a Clause;
    type IntoIter = core::slice::Iter<'a, Clause>;

    fn into_iter(self) -> Self::IntoIter {
        self.clauses.iter()
    }
}

/// Renders the formula in DIMACS format. The header carries the actual
/// clause count, not the declared one.
impl fmt::Display for Cnf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "p cnf {} {}", self.num_vars, self.clauses.len())?;
        for clause in &self.clauses {
            writeln!(f, "{clause}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_literals_infers_counts() {
        let cnf = Cnf::from_literals(vec![vec![1, -3], vec![2]]).unwrap();
        assert_eq!(cnf.num_vars(), 3);
        assert_eq!(cnf.num_clauses(), 2);
        assert_eq!(cnf.num_literals(), 3);
    }

    #[test]
    fn test_rejects_empty_clause() {
        let err = Cnf::from_literals(vec![vec![1], vec![]]).unwrap_err();
        assert!(matches!(err, Error::EmptyClause { index: 1 }));
    }

    #[test]
    fn test_rejects_zero_literal() {
        let err = Cnf::from_literals(vec![vec![1, 0, 2]]).unwrap_err();
        assert!(matches!(err, Error::ZeroLiteral));
    }

    #[test]
    fn test_declared_vars_widened() {
        let clauses = vec![Clause::new([Literal::from_i32(5).unwrap()])];
        let cnf = Cnf::new(clauses, 2, 1).unwrap();
        assert_eq!(cnf.num_vars(), 5);
    }

    #[test]
    fn test_declared_vars_kept_when_higher() {
        let clauses = vec![Clause::new([Literal::from_i32(1).unwrap()])];
        let cnf = Cnf::new(clauses, 4, 7).unwrap();
        assert_eq!(cnf.num_vars(), 4);
        assert_eq!(cnf.num_clauses(), 7);
    }

    #[test]
    fn test_with_num_vars_never_narrows() {
        let cnf = Cnf::from_literals(vec![vec![5]]).unwrap();
        let cnf = cnf.with_num_vars(2).unwrap();
        assert_eq!(cnf.num_vars(), 5);
        let cnf = cnf.with_num_vars(8).unwrap();
        assert_eq!(cnf.num_vars(), 8);
        assert!(matches!(
            cnf.with_num_vars(usize::MAX),
            Err(Error::LiteralOutOfRange(_))
        ));
    }

    #[test]
    fn test_rejects_unrepresentable_declared_vars() {
        let err = Cnf::new(Vec::new(), usize::MAX, 0).unwrap_err();
        assert!(matches!(err, Error::LiteralOutOfRange(_)));
    }

    #[test]
    fn test_occurrences() {
        let cnf = Cnf::from_literals(vec![vec![1, 2], vec![-1, 3], vec![1]]).unwrap();
        let occ = cnf.occurrences();
        assert_eq!(occ[&1], 3);
        assert_eq!(occ[&2], 1);
        assert_eq!(occ.get(&4), None);
        assert_eq!(cnf.variables().len(), 3);
    }

    #[test]
    fn test_display_dimacs() {
        let cnf = Cnf::from_literals(vec![vec![1, -2], vec![2]]).unwrap();
        assert_eq!(cnf.to_string(), "p cnf 2 2\n-2 1 0\n2 0\n");
    }
}
