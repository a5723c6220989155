#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Random 2-SAT instances with a known answer.
//!
//! Both generators draw clauses over two distinct variables and never make
//! both literals negative, so the all-true assignment satisfies every random
//! clause. The unsatisfiable generator prefixes the four clauses
//! `(p ∨ q) (p ∨ ¬q) (¬p ∨ q) (¬p ∨ ¬q)`, which no assignment survives.

use crate::sat::clause::Clause;
use crate::sat::cnf::Cnf;
use crate::sat::error::{Error, Result};
use crate::sat::literal::Literal;
use fastrand::Rng;

fn check_vars(vars: usize, clauses: usize) -> Result<()> {
    if vars < 2 {
        return Err(Error::InvalidInstance {
            vars,
            clauses,
            reason: "2-SAT clauses need two distinct variables",
        });
    }
    if i32::try_from(vars).is_err() {
        return Err(Error::InvalidInstance {
            vars,
            clauses,
            reason: "too many variables",
        });
    }
    Ok(())
}

fn literal(var: usize, polarity: bool) -> Result<Literal> {
    u32::try_from(var)
        .ok()
        .and_then(|v| Literal::new(v, polarity))
        .ok_or(Error::LiteralOutOfRange(i64::try_from(var).unwrap_or(i64::MAX)))
}

/// Two distinct variables in `1..=vars`.
fn distinct_pair(rng: &mut Rng, vars: usize) -> (usize, usize) {
    let i = rng.usize(1..=vars);
    let mut j = rng.usize(1..vars);
    if j >= i {
        j += 1;
    }
    (i, j)
}

/// A clause over two distinct variables, at least one literal positive.
fn random_clause(rng: &mut Rng, vars: usize) -> Result<Clause> {
    let (i, j) = distinct_pair(rng, vars);
    let mut positive_i = rng.bool();
    let mut positive_j = rng.bool();
    if !positive_i && !positive_j {
        if rng.bool() {
            positive_i = true;
        } else {
            positive_j = true;
        }
    }
    Ok(Clause::new([literal(i, positive_i)?, literal(j, positive_j)?]))
}

/// A satisfiable 2-SAT instance with `vars` variables and `clauses` clauses.
///
/// # Errors
///
/// [`Error::InvalidInstance`] if `vars < 2`.
pub fn satisfiable_2sat(vars: usize, clauses: usize, rng: &mut Rng) -> Result<Cnf> {
    check_vars(vars, clauses)?;
    let body = (0..clauses)
        .map(|_| random_clause(rng, vars))
        .collect::<Result<Vec<_>>>()?;
    Cnf::new(body, vars, clauses)
}

/// An unsatisfiable 2-SAT instance with `vars` variables and `clauses` clauses.
///
/// # Errors
///
/// [`Error::InvalidInstance`] if `vars < 2` or `clauses < 4`.
pub fn unsatisfiable_2sat(vars: usize, clauses: usize, rng: &mut Rng) -> Result<Cnf> {
    check_vars(vars, clauses)?;
    if clauses < 4 {
        return Err(Error::InvalidInstance {
            vars,
            clauses,
            reason: "an unsatisfiable 2-SAT core needs four clauses",
        });
    }

    let (p, q) = distinct_pair(rng, vars);
    let mut body = Vec::with_capacity(clauses);
    for (sp, sq) in [(true, true), (true, false), (false, true), (false, false)] {
        body.push(Clause::new([literal(p, sp)?, literal(q, sq)?]));
    }
    for _ in 4..clauses {
        body.push(random_clause(rng, vars)?);
    }

    Cnf::new(body, vars, clauses)
}
