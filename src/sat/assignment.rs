#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Variable assignments.
//!
//! [`Assignment`] is a partial map from variable id to boolean, stored as a
//! dense vector indexed by id. Alongside it a bit set tracks the variables
//! that are still unassigned, so that `remaining ∪ assigned = {1..=n}` and the
//! two never overlap. Both are updated together by every mutation.

use crate::sat::literal::{Literal, Variable};
use bit_vec::BitVec;
use core::fmt;
use core::ops::Index;
use itertools::Itertools;

/// State of a single variable.
#[derive(Debug, Clone, PartialEq, Eq, Copy, Default, Hash, PartialOrd, Ord)]
pub enum VarState {
    #[default]
    Unassigned,
    Assigned(bool),
}

impl VarState {
    #[must_use]
    pub const fn is_assigned(self) -> bool {
        matches!(self, Self::Assigned(_))
    }

    #[must_use]
    pub const fn is_unassigned(self) -> bool {
        !self.is_assigned()
    }

    #[must_use]
    pub const fn value(self) -> Option<bool> {
        match self {
            Self::Assigned(b) => Some(b),
            Self::Unassigned => None,
        }
    }
}

/// A partial assignment over variables `1..=num_vars`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Assignment {
    states: Vec<VarState>,
    remaining: BitVec,
    num_remaining: usize,
}

impl Index<Variable> for Assignment {
    type Output = VarState;

    fn index(&self, index: Variable) -> &Self::Output {
        &self.states[index as usize]
    }
}

impl Assignment {
    /// An empty assignment with every variable in `1..=num_vars` remaining.
    #[must_use]
    pub fn new(num_vars: usize) -> Self {
        let mut remaining = BitVec::from_elem(num_vars + 1, true);
        remaining.set(0, false);
        Self {
            states: vec![VarState::Unassigned; num_vars + 1],
            remaining,
            num_remaining: num_vars,
        }
    }

    /// Highest variable id this assignment covers.
    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.states.len().saturating_sub(1)
    }

    /// Makes `lit` true.
    ///
    /// The variable must be unassigned; assigning twice without an
    /// intervening [`Assignment::unassign`] is a logic error.
    pub fn assign(&mut self, lit: Literal) {
        let var = lit.variable();
        debug_assert!(
            self[var].is_unassigned(),
            "variable {var} assigned twice"
        );
        if self[var].is_unassigned() {
            self.num_remaining -= 1;
        }
        self.states[var as usize] = VarState::Assigned(lit.polarity());
        self.remaining.set(var as usize, false);
    }

    /// Returns `var` to the unassigned state and the remaining set.
    pub fn unassign(&mut self, var: Variable) {
        if self[var].is_assigned() {
            self.num_remaining += 1;
        }
        self.states[var as usize] = VarState::Unassigned;
        self.remaining.set(var as usize, true);
    }

    /// Value of `var`, or `None` when unassigned or out of range.
    #[must_use]
    pub fn var_value(&self, var: Variable) -> Option<bool> {
        self.states.get(var as usize).copied().and_then(VarState::value)
    }

    /// Truth value of `lit` under this assignment, `None` if its variable is
    /// unassigned.
    #[must_use]
    pub fn literal_value(&self, lit: Literal) -> Option<bool> {
        self.var_value(lit.variable()).map(|b| lit.evaluate(b))
    }

    #[must_use]
    pub fn is_assigned(&self, var: Variable) -> bool {
        self.var_value(var).is_some()
    }

    /// `true` if `var` is in the remaining (unassigned) set.
    #[must_use]
    pub fn is_remaining(&self, var: Variable) -> bool {
        self.remaining.get(var as usize).unwrap_or(false)
    }

    /// Unassigned variables in ascending order.
    pub fn remaining(&self) -> impl Iterator<Item = Variable> + '_ {
        self.remaining
            .iter()
            .enumerate()
            .filter(|&(_, set)| set)
            .filter_map(|(i, _)| Variable::try_from(i).ok())
    }

    #[must_use]
    pub const fn num_remaining(&self) -> usize {
        self.num_remaining
    }

    #[must_use]
    pub fn num_assigned(&self) -> usize {
        self.num_vars() - self.num_remaining
    }

    /// `true` once every variable has a value.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.num_remaining == 0
    }

    /// Assigned variables paired with their values, ascending by id.
    pub fn assigned(&self) -> impl Iterator<Item = (Variable, bool)> + '_ {
        self.states
            .iter()
            .enumerate()
            .filter_map(|(i, s)| Some((Variable::try_from(i).ok()?, s.value()?)))
    }

    /// The assigned literals as a printable model.
    #[must_use]
    pub fn solutions(&self) -> Solutions {
        Solutions(
            self.assigned()
                .filter_map(|(var, value)| Literal::new(var, value))
                .collect(),
        )
    }
}

/// A model as a list of signed literals, ascending by variable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Solutions(Vec<Literal>);

impl Solutions {
    /// The model as DIMACS-style integers.
    #[must_use]
    pub fn to_i32s(&self) -> Vec<i32> {
        self.0.iter().map(|l| l.to_i32()).collect()
    }
}

impl fmt::Display for Solutions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().join(" "))
    }
}
