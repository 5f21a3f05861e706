#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Iterative DPLL (Davis-Putnam-Logemann-Loveland) with chronological
//! backtracking.
//!
//! The search is a small state machine:
//!
//! - **Initial**: an empty formula is satisfiable, a formula with an empty
//!   clause is not. Otherwise propagate the unit clauses.
//! - **Propagating**: run BCP on the pending literal (if any). A conflict
//!   moves to *Conflicted*; otherwise the search is done if every variable
//!   has a value, else it moves to *Deciding*.
//! - **Deciding**: pick an open variable, record the trail length as the
//!   decision mark, and try the variable true.
//! - **Conflicted**: pop the innermost decision mark, undo the trail back to
//!   it and try the decision literal with the opposite sign. The flip pushes
//!   no new mark, so if it fails too the next conflict abandons the variable
//!   and falls back to the decision before it. With no mark left the formula
//!   is unsatisfiable.
//!
//! All state lives in one [`Dpll`] value. Undo works on suffixes of the
//! trail; clause content is never copied.

use crate::sat::assignment::Assignment;
use crate::sat::cnf::Cnf;
use crate::sat::literal::Literal;
use crate::sat::logging::targets;
use crate::sat::propagation::Propagator;
use crate::sat::solver::{DefaultConfig, SolutionStats, Solutions, Solver, SolverConfig};
use crate::sat::trail::{DecisionStack, Reason, Trail};
use crate::sat::variable_selection::VariableSelection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchState {
    Initial,
    Propagating,
    Deciding,
    Conflicted,
    Sat,
    Unsat,
}

#[derive(Debug, Clone)]
pub struct Dpll<Config: SolverConfig = DefaultConfig> {
    pub cnf: Cnf<Config::Literal>,
    pub assignment: Assignment,
    pub trail: Trail<Config::Literal>,
    pub decisions: DecisionStack,
    pub propagator: Propagator<Config::Literal>,
    pub selector: Config::VariableSelector,
    state: SearchState,
    /// Literal to assert on the next propagation: a decision or a flip.
    pending: Option<(Config::Literal, Reason)>,
    stats: SolutionStats,
}

impl<Config: SolverConfig> Solver<Config> for Dpll<Config> {
    fn new(cnf: Cnf<Config::Literal>) -> Self {
        let selector = Config::VariableSelector::new(cnf.num_vars);
        Self::with_selector(cnf, selector)
    }

    fn solve(&mut self) -> Option<Solutions> {
        loop {
            self.state = match self.state {
                SearchState::Initial => self.initial(),
                SearchState::Propagating => self.propagate(),
                SearchState::Deciding => self.decide(),
                SearchState::Conflicted => self.backtrack(),
                SearchState::Sat => {
                    log::debug!(target: targets::DECISION, "Satisfiable: {:?}", self.stats());
                    return Some(self.solutions());
                }
                SearchState::Unsat => {
                    log::debug!(target: targets::DECISION, "Unsatisfiable: {:?}", self.stats());
                    return None;
                }
            };
        }
    }

    fn solutions(&self) -> Solutions {
        self.assignment.get_solutions()
    }

    fn stats(&self) -> SolutionStats {
        SolutionStats {
            propagations: self.propagator.propagations,
            ..self.stats
        }
    }
}

impl<Config: SolverConfig> Dpll<Config> {
    #[must_use]
    pub fn with_selector(cnf: Cnf<Config::Literal>, selector: Config::VariableSelector) -> Self {
        Self {
            assignment: Assignment::new(cnf.num_vars),
            trail: Trail::new(cnf.num_vars),
            decisions: DecisionStack::new(),
            propagator: Propagator::new(),
            selector,
            cnf,
            state: SearchState::Initial,
            pending: None,
            stats: SolutionStats::default(),
        }
    }

    #[must_use]
    pub const fn state(&self) -> SearchState {
        self.state
    }

    /// Number of open decisions.
    #[must_use]
    pub fn decision_level(&self) -> usize {
        self.decisions.len()
    }

    fn initial(&mut self) -> SearchState {
        if self.cnf.is_empty() {
            return SearchState::Sat;
        }
        if self.cnf.has_empty_clause() {
            return SearchState::Unsat;
        }
        self.pending = None;
        SearchState::Propagating
    }

    fn propagate(&mut self) -> SearchState {
        let forced = self.pending.take();
        let result =
            self.propagator
                .propagate(&self.cnf, &mut self.assignment, &mut self.trail, forced);

        debug_assert!(self.invariants_hold());

        match result {
            Ok(()) if self.assignment.is_complete() => SearchState::Sat,
            Ok(()) => SearchState::Deciding,
            Err(conflict) => {
                self.stats.conflicts += 1;
                log::trace!(
                    target: targets::BACKTRACK,
                    "Conflict on clause {} at level {}",
                    conflict.clause,
                    self.decisions.len()
                );
                SearchState::Conflicted
            }
        }
    }

    fn decide(&mut self) -> SearchState {
        let Some(var) = self.selector.pick(&self.assignment) else {
            return SearchState::Sat;
        };

        self.decisions.push(self.trail.len());
        self.stats.decisions += 1;

        let lit = Config::Literal::new(var, true);
        log::trace!(
            target: targets::DECISION,
            "Decide {lit} at level {}",
            self.decisions.len()
        );
        self.pending = Some((lit, Reason::Decision));
        SearchState::Propagating
    }

    fn backtrack(&mut self) -> SearchState {
        let Some(mark) = self.decisions.pop() else {
            return SearchState::Unsat;
        };

        let Some(decision) = self.trail.backstep_to(&mut self.assignment, mark) else {
            unreachable!("decision mark {mark} is past the end of the trail");
        };
        debug_assert_eq!(decision.reason, Reason::Decision);

        let flipped = decision.lit.negated();
        self.stats.flips += 1;
        log::trace!(
            target: targets::BACKTRACK,
            "Flip {} to {flipped} at level {}",
            decision.lit,
            self.decisions.len()
        );

        self.pending = Some((flipped, Reason::Flip));
        SearchState::Propagating
    }

    /// Watch mirror, trail against assignment, open set against assignment,
    /// and an empty propagation stack.
    #[must_use]
    pub fn invariants_hold(&self) -> bool {
        self.propagator.is_idle()
            && self.assignment.is_consistent()
            && self.trail.matches(&self.assignment)
            && (!self.propagator.is_initialised() || self.propagator.watches().is_mirrored())
            && self.decisions.len() <= self.cnf.num_vars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solver(num_vars: usize, clauses: Vec<Vec<i32>>) -> Dpll {
        Dpll::new(Cnf::new(num_vars, clauses).unwrap())
    }

    #[test]
    fn test_single_unit() {
        let mut s = solver(1, vec![vec![1]]);
        let sol = s.solve().unwrap();
        assert!(sol.check(1));
        assert_eq!(s.state(), SearchState::Sat);
        assert_eq!(s.stats().decisions, 0);
    }

    #[test]
    fn test_conflicting_units() {
        let mut s = solver(1, vec![vec![1], vec![-1]]);
        assert_eq!(s.solve(), None);
        assert_eq!(s.state(), SearchState::Unsat);
    }

    #[test]
    fn test_two_clauses() {
        let mut s = solver(2, vec![vec![1, 2], vec![-1, -2]]);
        let sol = s.solve().unwrap();
        assert!(sol.check(1));
        assert!(sol.check(-2));
    }

    #[test]
    fn test_no_clauses() {
        let mut s = solver(3, vec![]);
        let sol = s.solve().unwrap();
        assert_eq!(sol.len(), 3);
        assert!(!s.propagator.is_initialised());
    }

    #[test]
    fn test_empty_clause_skips_propagation() {
        let mut s = solver(2, vec![vec![1, 2], vec![]]);
        assert_eq!(s.solve(), None);
        assert!(!s.propagator.is_initialised());
        assert_eq!(s.stats().propagations, 0);
    }

    #[test]
    fn test_single_flip() {
        // x1 = true fails (forces x2 and x3, contradicting the last clause),
        // so x1 is flipped to false.
        let mut s = solver(3, vec![vec![-1, 2], vec![-2, 3], vec![-1, -3]]);
        let sol = s.solve().unwrap();
        assert!(sol.check(-1));
        assert_eq!(s.stats().flips, 1);
        assert_eq!(s.stats().conflicts, 1);
        assert!(s.invariants_hold());
    }

    #[test]
    fn test_unsat_exhausts_both_branches() {
        let mut s = solver(2, vec![vec![1, 2], vec![1, -2], vec![-1, 2], vec![-1, -2]]);
        assert_eq!(s.solve(), None);
        assert_eq!(s.stats().decisions, 1);
        assert_eq!(s.stats().flips, 1);
        assert_eq!(s.stats().conflicts, 2);
        assert!(s.decisions.is_empty());
    }

    #[test]
    fn test_flip_without_new_mark() {
        let mut s = solver(3, vec![vec![-1, 2], vec![-2, 3], vec![-1, -3]]);

        assert_eq!(s.initial(), SearchState::Propagating);
        assert_eq!(s.propagate(), SearchState::Deciding);
        assert_eq!(s.decide(), SearchState::Propagating);
        assert_eq!(s.decisions.len(), 1);
        assert_eq!(s.propagate(), SearchState::Conflicted);

        assert_eq!(s.backtrack(), SearchState::Propagating);
        assert!(s.decisions.is_empty());
        assert!(s.trail.is_empty());
        assert_eq!(s.propagate(), SearchState::Deciding);
        assert_eq!(s.trail[0].reason, Reason::Flip);
        assert_eq!(s.assignment.var_value(1), Some(false));
    }

    #[test]
    fn test_backtrack_restores_assignment() {
        let mut s = solver(4, vec![vec![-1, 2], vec![-2, 3], vec![-3, -4], vec![3, 4, 1]]);

        assert_eq!(s.initial(), SearchState::Propagating);
        assert_eq!(s.propagate(), SearchState::Deciding);
        let before = s.assignment.clone();

        s.decide();
        s.propagate();
        let after_first = s.assignment.clone();
        assert_eq!(s.trail.len(), 4);

        s.state = SearchState::Conflicted;
        s.backtrack();
        s.pending = None;
        assert_eq!(s.assignment, before);
        assert!(s.invariants_hold());

        // Same decision again gives the same assignment, even though the
        // watches may sit on different literals now.
        s.decide();
        s.propagate();
        assert_eq!(s.assignment, after_first);
        assert!(s.invariants_hold());
    }

    #[test]
    fn test_with_selector() {
        use crate::sat::solver::DynamicConfig;
        use crate::sat::variable_selection::VariableSelectionType;

        let cnf = Cnf::new(3, vec![vec![1, 2, 3], vec![-1, -2], vec![-2, -3]]).unwrap();
        let mut s: Dpll<DynamicConfig> =
            Dpll::with_selector(cnf.clone(), VariableSelectionType::Random.to_impl(3));
        let sol = s.solve().unwrap();
        assert!(cnf.verify(&sol));
    }
}
