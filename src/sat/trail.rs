#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The assignment trail.
//!
//! Every assignment the search makes is pushed here together with the reason
//! it was made. Backtracking truncates the trail to an earlier length,
//! unassigning the popped variables newest first, which restores the
//! [`Assignment`] and its remaining set exactly.

use crate::sat::assignment::Assignment;
use crate::sat::literal::Literal;
use core::ops::Index;

/// Why a literal was put on the trail.
#[derive(Debug, Clone, PartialEq, Eq, Default, Copy, Hash, PartialOrd, Ord)]
pub enum Reason {
    /// A case split.
    #[default]
    Decision,
    /// Forced by a unit clause of the reduced formula.
    Unit,
    /// A pure literal.
    Pure,
    /// An unconstrained variable filled in after the formula was satisfied.
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq, Copy)]
pub struct Step {
    pub lit: Literal,
    pub reason: Reason,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Trail {
    steps: Vec<Step>,
}

impl Index<usize> for Trail {
    type Output = Step;

    fn index(&self, index: usize) -> &Self::Output {
        &self.steps[index]
    }
}

impl Trail {
    #[must_use]
    pub const fn new() -> Self {
        Self { steps: Vec::new() }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter()
    }

    /// Assigns `lit` and records it.
    pub fn push(&mut self, assignment: &mut Assignment, lit: Literal, reason: Reason) {
        assignment.assign(lit);
        self.steps.push(Step { lit, reason });
    }

    /// Pops steps until `len` remain, unassigning each popped variable.
    pub fn undo_to(&mut self, assignment: &mut Assignment, len: usize) {
        while self.steps.len() > len {
            if let Some(step) = self.steps.pop() {
                assignment.unassign(step.lit.variable());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(v: i32) -> Literal {
        Literal::from_i32(v).unwrap()
    }

    #[test]
    fn test_push_assigns() {
        let mut a = Assignment::new(3);
        let mut t = Trail::new();
        t.push(&mut a, lit(2), Reason::Decision);
        t.push(&mut a, lit(-3), Reason::Unit);
        assert_eq!(t.len(), 2);
        assert_eq!(t[1].reason, Reason::Unit);
        assert_eq!(a.var_value(3), Some(false));
        assert_eq!(t.iter().filter(|s| s.reason == Reason::Decision).count(), 1);
    }

    #[test]
    fn test_undo_restores_exactly() {
        let mut a = Assignment::new(4);
        let mut t = Trail::new();
        t.push(&mut a, lit(1), Reason::Decision);
        let before = a.clone();
        let mark = t.len();

        t.push(&mut a, lit(-2), Reason::Unit);
        t.push(&mut a, lit(4), Reason::Pure);
        t.undo_to(&mut a, mark);

        assert_eq!(a, before);
        assert_eq!(t.len(), 1);

        t.undo_to(&mut a, 0);
        assert_eq!(a, Assignment::new(4));
        assert!(t.is_empty());
    }
}
