#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The trail (chronological undo log) and the decision stack.

use crate::sat::assignment::Assignment;
use crate::sat::literal::Literal;
use crate::sat::logging::targets;
use rustc_hash::FxHashSet;
use std::ops::Index;

/// Why a literal was put on the trail.
#[derive(Debug, Clone, PartialEq, Eq, Default, Copy, Hash, PartialOrd, Ord)]
pub enum Reason {
    /// First branch of a decision.
    #[default]
    Decision,
    /// Second branch of a decision, after the first one failed.
    Flip,
    /// Forced by a unit clause of the input.
    Unit(usize),
    /// Forced by a clause whose other literals are all false.
    Clause(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Step<L: Literal> {
    pub lit: L,
    pub reason: Reason,
}

/// Assigned literals in the order they were assigned.
///
/// Undo always removes a suffix, so the positions of earlier steps stay valid.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Trail<L: Literal> {
    t: Vec<Step<L>>,
}

impl<L: Literal> Index<usize> for Trail<L> {
    type Output = Step<L>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.t[index]
    }
}

impl<L: Literal> Trail<L> {
    #[must_use]
    pub fn new(num_vars: usize) -> Self {
        Self {
            t: Vec::with_capacity(num_vars),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.t.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Step<L>> {
        self.t.iter()
    }

    pub fn push(&mut self, lit: L, reason: Reason) {
        self.t.push(Step { lit, reason });
    }

    /// Removes every step from position `mark` onwards, unassigning each
    /// variable, and returns the step that was at `mark`.
    pub fn backstep_to(&mut self, assignment: &mut Assignment, mark: usize) -> Option<Step<L>> {
        if mark >= self.t.len() {
            return None;
        }

        for step in self.t.drain(mark + 1..).rev() {
            assignment.unassign(step.lit.variable());
        }

        let first = self.t.pop()?;
        assignment.unassign(first.lit.variable());

        log::trace!(target: targets::BACKTRACK, "Trail cut back to {mark}, undid from {}", first.lit);
        Some(first)
    }

    /// The trail holds each assigned variable exactly once and nothing else.
    #[must_use]
    pub fn matches(&self, assignment: &Assignment) -> bool {
        let mut seen = FxHashSet::default();
        let distinct = self.t.iter().all(|s| seen.insert(s.lit.variable()));

        distinct
            && seen.len() == assignment.num_vars() - assignment.open_count()
            && self
                .t
                .iter()
                .all(|s| assignment.literal_value(s.lit) == Some(true))
    }
}

/// Trail positions at which each open decision began, innermost last.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DecisionStack(Vec<usize>);

impl DecisionStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, mark: usize) {
        debug_assert!(self.0.last().is_none_or(|&m| m <= mark));
        self.0.push(mark);
    }

    pub fn pop(&mut self) -> Option<usize> {
        self.0.pop()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
