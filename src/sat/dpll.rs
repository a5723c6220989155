#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Defines the DPLL (Davis-Putnam-Logemann-Loveland) search engine.
//!
//! Each iteration of the search loop handles one node of the search tree:
//!
//! 1.  **Budget:** stop with [`SearchResult::ResourceExceeded`] once more
//!     decisions were made than allowed, or the stack grew too deep.
//! 2.  **Simplify:** reduce the formula under the current assignment. A
//!     falsified clause means backtracking; no remaining clause means a model.
//! 3.  **Unit propagation:** a single-literal clause forces its literal.
//! 4.  **Pure literals:** a literal whose negation never occurs is set true.
//! 5.  **Decision:** otherwise pick a variable and try `true`, then `false`.
//!
//! Steps 3 and 4 assign one literal per iteration and go back to step 1.
//!
//! Instead of recursing, every assignment pushes a frame onto an explicit
//! stack. A frame remembers the trail length before its assignment, so
//! popping it undoes exactly what it (and everything above it) did. A
//! decision frame whose `true` branch failed is flipped to `false` in place;
//! any other failed frame is popped and the failure moves down the stack.
//! The stack empties only when the whole formula is refuted.

use crate::sat::assignment::Assignment;
use crate::sat::clause::Clause;
use crate::sat::cnf::Cnf;
use crate::sat::literal::Literal;
use crate::sat::propagation::{find_pure, find_unit};
use crate::sat::simplify::{Simplified, simplify};
use crate::sat::solver::{
    InternalError, InvariantViolation, ResourceLimit, SearchResult, SolutionStats, Solver,
    SolverOptions,
};
use crate::sat::trail::{Reason, Trail};
use crate::sat::validate;
use crate::sat::variable_selection::{VariableSelection, VariableSelectionImpls};
use tracing::{debug, error, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    /// A unit or pure literal. It has no alternative.
    Forced { mark: usize },
    /// A case split on `lit`'s variable, currently trying `lit`.
    Decision {
        mark: usize,
        lit: Literal,
        flipped: bool,
    },
}

/// A DPLL solver over a borrowed formula.
///
/// The formula is never modified. The solver exclusively owns the assignment,
/// trail and statistics for the duration of a search.
#[derive(Debug, Clone)]
pub struct Dpll<'a, S: VariableSelection = VariableSelectionImpls> {
    cnf: &'a Cnf,
    /// The current (partial) assignment.
    pub assignment: Assignment,
    /// Every assignment on the active path, oldest first.
    pub trail: Trail,
    frames: Vec<Frame>,
    selector: S,
    options: SolverOptions,
    stats: SolutionStats,
}

impl<'a> Solver<'a> for Dpll<'a, VariableSelectionImpls> {
    fn new(cnf: &'a Cnf, options: SolverOptions) -> Self {
        let selector = options.variable_selection.to_impl(cnf, options.seed);
        Self::with_selector(cnf, options, selector)
    }

    fn solve(&mut self) -> SearchResult {
        self.solve_and_validate()
    }

    fn stats(&self) -> SolutionStats {
        self.stats
    }
}

impl<'a, S: VariableSelection> Dpll<'a, S> {
    /// Creates a solver using a specific selector instead of the one named in
    /// `options`.
    pub fn with_selector(cnf: &'a Cnf, options: SolverOptions, selector: S) -> Self {
        Self {
            cnf,
            assignment: Assignment::new(cnf.num_vars()),
            trail: Trail::new(),
            frames: Vec::new(),
            selector,
            options,
            stats: SolutionStats::default(),
        }
    }

    /// Runs [`Dpll::search`], then re-checks any model against the formula.
    pub fn solve_and_validate(&mut self) -> SearchResult {
        let result = self.search();

        if let SearchResult::Model(model) = &result {
            if let Err(violation) = validate::check(self.cnf, model) {
                error!(%violation, "search reported a model the validator rejects");
                return SearchResult::InternalError(Box::new(InternalError {
                    violation: InvariantViolation::ModelRejected(violation),
                    clause: self.cnf.clauses().get(violation.clause()).cloned(),
                    assignment: model.clone(),
                }));
            }
        }

        result
    }

    /// Explores the search tree from an empty assignment.
    ///
    /// On a model the solver keeps the satisfying assignment. On every other
    /// outcome the assignment is unwound back to empty.
    pub fn search(&mut self) -> SearchResult {
        self.reset();
        debug!(
            num_vars = self.cnf.num_vars(),
            num_clauses = self.cnf.len(),
            max_decisions = self.options.max_decisions,
            max_depth = self.options.max_depth,
            "starting search"
        );

        let result = self.run();

        debug!(
            outcome = %result,
            decisions = self.stats.decisions,
            backtracks = self.stats.backtracks,
            propagations = self.stats.propagations,
            pure_literals = self.stats.pure_literals,
            "search finished"
        );
        result
    }

    fn run(&mut self) -> SearchResult {
        loop {
            if self.stats.decisions > self.options.max_decisions {
                return self.exceeded(ResourceLimit::Decisions(self.options.max_decisions));
            }
            if self.frames.len() > self.options.max_depth {
                return self.exceeded(ResourceLimit::Depth(self.options.max_depth));
            }

            let clauses = match simplify(self.cnf, &self.assignment) {
                Simplified::Conflict { clause } => {
                    self.stats.conflicts += 1;
                    trace!(clause, depth = self.frames.len(), "conflict");
                    if self.backtrack() {
                        continue;
                    }
                    return SearchResult::Unsatisfiable;
                }
                Simplified::Satisfied => {
                    self.complete_model();
                    return SearchResult::Model(self.assignment.clone());
                }
                Simplified::Reduced(clauses) => clauses,
            };

            if let Some(lit) = find_unit(&clauses) {
                if self.assignment.is_assigned(lit.variable()) {
                    let clause = clauses.iter().find(|c| c.is_unit()).cloned();
                    return self.internal(InvariantViolation::AssignedUnitLiteral { literal: lit }, clause);
                }
                trace!(%lit, "unit propagation");
                self.stats.propagations += 1;
                self.force(lit, Reason::Unit);
                continue;
            }

            if let Some(lit) = find_pure(&clauses) {
                trace!(%lit, "pure literal");
                self.stats.pure_literals += 1;
                self.force(lit, Reason::Pure);
                continue;
            }

            let Some(var) = self.selector.pick(&self.assignment) else {
                return self.internal(InvariantViolation::NoBranchVariable, clauses.first().cloned());
            };
            let Some(lit) = Literal::new(var, true).filter(|_| self.assignment.is_remaining(var))
            else {
                return self.internal(InvariantViolation::VariableOutOfRange(var), None);
            };

            self.stats.decisions += 1;
            trace!(%lit, decisions = self.stats.decisions, "decision");
            self.frames.push(Frame::Decision {
                mark: self.trail.len(),
                lit,
                flipped: false,
            });
            self.trail.push(&mut self.assignment, lit, Reason::Decision);
            self.stats.max_depth = self.stats.max_depth.max(self.frames.len());
        }
    }

    fn force(&mut self, lit: Literal, reason: Reason) {
        self.frames.push(Frame::Forced {
            mark: self.trail.len(),
        });
        self.trail.push(&mut self.assignment, lit, reason);
        self.stats.max_depth = self.stats.max_depth.max(self.frames.len());
    }

    /// Undoes frames until a decision can be flipped. Returns `false` when no
    /// untried branch is left.
    fn backtrack(&mut self) -> bool {
        while let Some(frame) = self.frames.pop() {
            match frame {
                Frame::Forced { mark } => self.trail.undo_to(&mut self.assignment, mark),
                Frame::Decision { mark, flipped, .. } if flipped => {
                    self.stats.backtracks += 1;
                    self.trail.undo_to(&mut self.assignment, mark);
                }
                Frame::Decision { mark, lit, .. } => {
                    self.stats.backtracks += 1;
                    self.trail.undo_to(&mut self.assignment, mark);

                    let flipped = lit.negated();
                    trace!(lit = %flipped, depth = self.frames.len(), "backtrack");
                    self.frames.push(Frame::Decision {
                        mark,
                        lit: flipped,
                        flipped: true,
                    });
                    self.trail.push(&mut self.assignment, flipped, Reason::Decision);
                    return true;
                }
            }
        }
        false
    }

    /// Gives every still unassigned variable the value `false`. Only called
    /// once no clause is left, so these variables are unconstrained.
    fn complete_model(&mut self) {
        let unconstrained: Vec<Literal> = self
            .assignment
            .remaining()
            .filter_map(|var| Literal::new(var, false))
            .collect();
        if !unconstrained.is_empty() {
            trace!(count = unconstrained.len(), "defaulting unconstrained variables");
        }
        for lit in unconstrained {
            self.trail.push(&mut self.assignment, lit, Reason::Default);
        }
    }

    fn unwind(&mut self) {
        self.frames.clear();
        self.trail.undo_to(&mut self.assignment, 0);
    }

    fn reset(&mut self) {
        self.unwind();
        self.selector.reset();
        self.stats = SolutionStats::default();
    }

    fn exceeded(&mut self, limit: ResourceLimit) -> SearchResult {
        debug!(%limit, "search aborted");
        self.unwind();
        SearchResult::ResourceExceeded {
            limit,
            stats: self.stats,
        }
    }

    fn internal(
        &mut self,
        violation: InvariantViolation,
        clause: Option<Clause>,
    ) -> SearchResult {
        error!(%violation, "solver invariant violated");
        let assignment = self.assignment.clone();
        self.unwind();
        SearchResult::InternalError(Box::new(InternalError {
            violation,
            clause,
            assignment,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::variable_selection::{FixedOrder, VariableSelectionType};
    use proptest::prelude::*;

    fn cnf(clauses: &[&[i32]]) -> Cnf {
        Cnf::from_literals(clauses.iter().map(|c| c.iter().copied())).unwrap()
    }

    fn options() -> SolverOptions {
        SolverOptions::default().with_variable_selection(VariableSelectionType::FixedOrder)
    }

    #[test]
    fn test_contradictory_two_clauses_unsat() {
        let f = cnf(&[&[1, 2], &[-1, 2], &[1, -2], &[-1, -2]]);
        let mut solver = Dpll::new(&f, options());
        assert_eq!(solver.solve(), SearchResult::Unsatisfiable);
        assert_eq!(solver.assignment, Assignment::new(2));
        assert!(solver.trail.is_empty());
        assert_eq!(solver.stats().decisions, 1);
    }

    #[test]
    fn test_single_clause_sat() {
        let f = cnf(&[&[1, 2]]);
        let mut solver = Dpll::new(&f, options());
        let result = solver.solve();
        let model = result.model().unwrap();
        assert!(model.var_value(1) == Some(true) || model.var_value(2) == Some(true));
        assert!(validate::validate(&f, model));
    }

    #[test]
    fn test_direct_unit_conflict() {
        let f = cnf(&[&[1], &[-1]]);
        let mut solver = Dpll::new(&f, options());
        assert_eq!(solver.solve(), SearchResult::Unsatisfiable);
        let stats = solver.stats();
        assert_eq!(stats.decisions, 0);
        assert_eq!(stats.propagations, 1);
        assert_eq!(stats.conflicts, 1);
    }

    #[test]
    fn test_units_chain_without_decisions() {
        let f = cnf(&[&[1, 2, 3], &[-1], &[-2]]);
        let mut solver = Dpll::new(&f, options());
        let result = solver.solve();
        let model = result.model().unwrap();
        assert_eq!(model.var_value(1), Some(false));
        assert_eq!(model.var_value(2), Some(false));
        assert_eq!(model.var_value(3), Some(true));
        assert_eq!(solver.stats().decisions, 0);
        assert_eq!(solver.stats().propagations, 3);
    }

    #[test]
    fn test_exactly_one_decision() {
        let f = cnf(&[&[1, 2], &[-1, 2], &[1, -2]]);
        let mut solver = Dpll::new(&f, options());
        let result = solver.solve();
        assert!(result.is_model());
        assert_eq!(solver.stats().decisions, 1);
    }

    #[test]
    fn test_pure_literal_one_at_a_time() {
        // both 1 and -2 are pure; only the first found is assigned per step
        let f = cnf(&[&[1, -2], &[1, 3], &[-2, -3]]);
        let mut solver = Dpll::new(&f, options());
        let result = solver.solve();
        let model = result.model().unwrap();
        assert_eq!(model.var_value(1), Some(true));
        assert_eq!(model.var_value(2), Some(false));
        assert_eq!(solver.stats().decisions, 0);
        assert_eq!(solver.stats().pure_literals, 2);
    }

    #[test]
    fn test_unconstrained_variables_default_false() {
        let f = cnf(&[&[2]]).with_num_vars(4).unwrap();
        let mut solver = Dpll::new(&f, options());
        let result = solver.solve();
        let model = result.model().unwrap();
        assert!(model.is_complete());
        assert_eq!(model.solutions().to_i32s(), vec![-1, 2, -3, -4]);
        let defaults = solver
            .trail
            .iter()
            .filter(|s| s.reason == Reason::Default)
            .count();
        assert_eq!(defaults, 3);
    }

    #[test]
    fn test_empty_formula_is_sat() {
        let f = Cnf::default();
        let mut solver = Dpll::new(&f, options());
        assert_eq!(solver.solve(), SearchResult::Model(Assignment::new(0)));
    }

    #[test]
    fn test_decision_budget_exceeded() {
        let f = cnf(&[&[1, 2], &[-1, 2], &[1, -2]]);
        let mut solver = Dpll::new(&f, options().with_max_decisions(0));
        let result = solver.solve();
        assert!(matches!(
            result,
            SearchResult::ResourceExceeded {
                limit: ResourceLimit::Decisions(0),
                stats: SolutionStats { decisions: 1, .. }
            }
        ));
        assert_eq!(solver.assignment, Assignment::new(2));

        let mut solver = Dpll::new(&f, options().with_max_decisions(1));
        assert!(solver.solve().is_model());
    }

    #[test]
    fn test_depth_limit_exceeded() {
        let f = cnf(&[&[1], &[2], &[3]]);
        let mut solver = Dpll::new(&f, options().with_max_depth(1));
        let result = solver.solve();
        assert!(matches!(
            result,
            SearchResult::ResourceExceeded {
                limit: ResourceLimit::Depth(1),
                ..
            }
        ));
        assert!(Dpll::new(&f, options().with_max_depth(3)).solve().is_model());
    }

    #[test]
    fn test_with_custom_selector() {
        let f = cnf(&[&[1, 2, 3], &[-1, -2], &[-2, -3], &[-1, -3], &[1, -2, 3]]);
        let mut solver = Dpll::with_selector(&f, options(), FixedOrder);
        let result = solver.solve_and_validate();
        assert!(validate::validate(&f, result.model().unwrap()));
    }

    #[test]
    fn test_search_is_repeatable() {
        let f = cnf(&[&[1, 2], &[-1, -2], &[1, -2], &[-1, 2, 3], &[-3, 4, 5], &[-4, -5]]);
        for selection in [VariableSelectionType::FixedOrder, VariableSelectionType::RandomOrder] {
            let mut solver = Dpll::new(&f, options().with_variable_selection(selection).with_seed(5));
            let first = solver.solve();
            let first_stats = solver.stats();
            let second = solver.solve();
            assert_eq!(first, second, "{selection}");
            assert_eq!(first_stats, solver.stats(), "{selection}");
        }
    }

    #[test]
    fn test_clause_beyond_declared_count_is_solved() {
        let clauses = vec![Clause::new([Literal::from_i32(5).unwrap()])];
        let f = Cnf::new(clauses, 2, 1).unwrap();
        let result = Dpll::new(&f, options()).solve();
        let model = result.model().unwrap();
        assert_eq!(model.num_vars(), 5);
        assert_eq!(model.var_value(5), Some(true));
    }

    /// Pushes `lit` as a frame the way the search loop does.
    fn place(solver: &mut Dpll<'_>, lit: Literal, decision: bool, flipped: bool) {
        let mark = solver.trail.len();
        let (frame, reason) = if decision {
            (Frame::Decision { mark, lit, flipped }, Reason::Decision)
        } else {
            (Frame::Forced { mark }, Reason::Unit)
        };
        solver.frames.push(frame);
        solver.trail.push(&mut solver.assignment, lit, reason);
    }

    #[test]
    fn test_failed_branch_restores_state() {
        let f = cnf(&[&[1, 2, 3, 4]]);
        let mut solver = Dpll::new(&f, options());
        let lit = |v| Literal::from_i32(v).unwrap();

        place(&mut solver, lit(-1), false, false);
        let before = (solver.assignment.clone(), solver.trail.len());
        place(&mut solver, lit(2), true, false);
        place(&mut solver, lit(-3), false, false);
        place(&mut solver, lit(4), true, true);

        assert!(solver.backtrack());
        let mut expected = before.0.clone();
        expected.assign(lit(-2));
        assert_eq!(solver.assignment, expected);
        assert_eq!(solver.trail.len(), before.1 + 1);
        assert_eq!(solver.trail[before.1].lit, lit(-2));

        place(&mut solver, lit(3), false, false);
        assert!(!solver.backtrack());
        assert_eq!(solver.assignment, Assignment::new(4));
        assert!(solver.trail.is_empty());
        assert_eq!(solver.stats().backtracks, 3);
    }

    /// Distinct literals over `1..=n` in random order, a split point and a
    /// frame kind for every literal after it.
    fn branch_layout() -> impl Strategy<Value = (u32, Vec<Literal>, usize, Vec<bool>)> {
        (2..=8u32).prop_flat_map(|n| {
            (
                Just((1..=n).collect::<Vec<_>>()).prop_shuffle(),
                prop::collection::vec(any::<bool>(), n as usize),
                0..n as usize,
                prop::collection::vec(any::<bool>(), n as usize),
            )
                .prop_map(move |(vars, signs, split, kinds)| {
                    let lits = vars
                        .into_iter()
                        .zip(signs)
                        .filter_map(|(v, s)| Literal::new(v, s))
                        .collect();
                    (n, lits, split, kinds)
                })
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn failed_subtree_restores_state((n, lits, split, kinds) in branch_layout()) {
            let f = Cnf::default().with_num_vars(n as usize).unwrap();
            let mut solver = Dpll::new(&f, options());
            for &lit in &lits[..split] {
                place(&mut solver, lit, false, false);
            }
            let (assignment_before, trail_before) = (solver.assignment.clone(), solver.trail.len());

            let decision = lits[split];
            place(&mut solver, decision, true, false);
            for (&lit, &is_decision) in lits[split + 1..].iter().zip(&kinds) {
                // decisions inside the subtree have already tried both values
                place(&mut solver, lit, is_decision, true);
            }

            prop_assert!(solver.backtrack());
            let mut expected = assignment_before;
            expected.assign(decision.negated());
            prop_assert_eq!(&solver.assignment, &expected);
            prop_assert_eq!(solver.trail.len(), trail_before + 1);

            prop_assert!(!solver.backtrack());
            prop_assert_eq!(&solver.assignment, &Assignment::new(n as usize));
            prop_assert!(solver.trail.is_empty());
        }
    }

    /// A selector that keeps naming a variable that is already assigned.
    struct Stuck;

    impl VariableSelection for Stuck {
        fn new(_: &Cnf) -> Self {
            Self
        }

        fn pick(&mut self, _: &Assignment) -> Option<crate::sat::literal::Variable> {
            Some(1)
        }
    }

    #[test]
    fn test_bad_selector_is_internal_error() {
        // after 1 = true and the forced -2, a second split on 3 or 4 is needed
        let f = cnf(&[&[1, 2], &[-1, -2], &[3, 4], &[-3, -4]]);
        let mut solver = Dpll::with_selector(&f, options(), Stuck);
        let SearchResult::InternalError(err) = solver.search() else {
            panic!("expected an internal error");
        };
        assert_eq!(err.violation, InvariantViolation::VariableOutOfRange(1));
        assert_eq!(err.assignment.var_value(1), Some(true));
        assert_eq!(solver.assignment, Assignment::new(4));
    }

    /// A selector that claims nothing is left to branch on.
    struct Exhausted;

    impl VariableSelection for Exhausted {
        fn new(_: &Cnf) -> Self {
            Self
        }

        fn pick(&mut self, _: &Assignment) -> Option<crate::sat::literal::Variable> {
            None
        }
    }

    #[test]
    fn test_no_branch_variable_is_internal_error() {
        let f = cnf(&[&[1, 2], &[-1, -2]]);
        let mut solver = Dpll::with_selector(&f, options(), Exhausted);
        let SearchResult::InternalError(err) = solver.search() else {
            panic!("expected an internal error");
        };
        assert_eq!(err.violation, InvariantViolation::NoBranchVariable);
        assert!(err.clause.is_some());
    }
}
