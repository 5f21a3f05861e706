#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Boolean constraint propagation over the two-watched-literal index.
//!
//! [`Propagator::propagate`] drains a stack of literals to make true. Each
//! assignment falsifies the negated literal, and only clauses watching that
//! negation are visited: either the watch moves to another literal that is
//! not false, or the clause forces its other watch, or it is in conflict.
//!
//! The watch index is built on the first call, so a formula can be loaded
//! and inspected without paying for it.

use crate::sat::assignment::Assignment;
use crate::sat::cnf::Cnf;
use crate::sat::literal::{Literal, Variable};
use crate::sat::logging::targets;
use crate::sat::trail::{Reason, Trail};
use crate::sat::watch::WatchIndex;
use rustc_hash::FxHashMap;

/// A clause with every literal false under the current assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Conflict {
    pub clause: usize,
}

/// Pending literals, last in first out.
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash, PartialOrd, Ord)]
pub struct PropagationStack<L: Literal>(Vec<(L, Reason)>);

impl<L: Literal> PropagationStack<L> {
    pub fn push(&mut self, p: (L, Reason)) {
        self.0.push(p);
    }

    pub fn pop(&mut self) -> Option<(L, Reason)> {
        self.0.pop()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<L: Literal> Extend<(L, Reason)> for PropagationStack<L> {
    fn extend<T: IntoIterator<Item = (L, Reason)>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

#[derive(Debug, Clone, Default)]
pub struct Propagator<L: Literal> {
    watches: WatchIndex<L>,
    initialised: bool,
    stack: PropagationStack<L>,
    /// Literals assigned by this propagator so far.
    pub propagations: usize,
}

impl<L: Literal> Propagator<L> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            watches: WatchIndex::default(),
            initialised: false,
            stack: PropagationStack::default(),
            propagations: 0,
        }
    }

    #[must_use]
    pub const fn is_initialised(&self) -> bool {
        self.initialised
    }

    #[must_use]
    pub const fn watches(&self) -> &WatchIndex<L> {
        &self.watches
    }

    /// True when nothing is waiting to be propagated.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.stack.is_empty()
    }

    /// Makes every literal in `forced` true, along with everything they imply.
    ///
    /// On the first call the watch index is built and the literals of unit
    /// clauses are forced as well.
    ///
    /// The stack is empty when this returns, whatever the result. After a
    /// conflict the assignment, trail and watch index are still consistent
    /// with each other, ready for the caller to backtrack.
    ///
    /// # Errors
    ///
    /// A [`Conflict`] naming a clause that became false.
    pub fn propagate<I>(
        &mut self,
        cnf: &Cnf<L>,
        assignment: &mut Assignment,
        trail: &mut Trail<L>,
        forced: I,
    ) -> Result<(), Conflict>
    where
        I: IntoIterator<Item = (L, Reason)>,
    {
        if !self.initialised {
            self.watches = WatchIndex::new(cnf);
            self.initialised = true;
            let units = initial_units(&self.watches)?;
            self.stack.extend(units);
        }

        self.stack.extend(forced);

        while let Some((lit, reason)) = self.stack.pop() {
            if assignment.is_assigned(lit.variable()) {
                log::trace!(target: targets::PROPAGATION, "Skipped {lit}, already assigned");
                continue;
            }

            assignment.assign(lit);
            trail.push(lit, reason);
            self.propagations += 1;
            log::trace!(target: targets::PROPAGATION, "Assigned {lit} ({reason:?})");

            if let Err(conflict) = self.visit_watchers(cnf, assignment, lit.negated()) {
                log::trace!(target: targets::PROPAGATION, "Conflict in clause {}", conflict.clause);
                self.stack.clear();
                return Err(conflict);
            }
        }

        Ok(())
    }

    /// Visits every clause watching `falsified`, which has just become false.
    ///
    /// The watcher list of `falsified` is compacted in place: clauses whose
    /// watch moves away are dropped from it, the rest keep their entry. On a
    /// conflict the unvisited tail is kept as is.
    fn visit_watchers(
        &mut self,
        cnf: &Cnf<L>,
        assignment: &Assignment,
        falsified: L,
    ) -> Result<(), Conflict> {
        let mut watching = self.watches.take_watchers(falsified);
        let mut result = Ok(());
        let mut kept = 0;
        let mut next = 0;

        while next < watching.len() {
            let clause_id = watching[next];
            next += 1;

            let Some(other) = self.watches.other_watch(clause_id, falsified) else {
                watching[kept] = clause_id;
                kept += 1;
                result = Err(Conflict { clause: clause_id });
                break;
            };

            let replacement = cnf.literals_of(clause_id).iter().copied().find(|&l| {
                l != falsified && l != other && assignment.literal_value(l) != Some(false)
            });

            if let Some(replacement) = replacement {
                self.watches.redirect_watch(clause_id, falsified, replacement);
                continue;
            }

            watching[kept] = clause_id;
            kept += 1;

            match assignment.literal_value(other) {
                None => self.stack.push((other, Reason::Clause(clause_id))),
                Some(true) => {}
                Some(false) => {
                    result = Err(Conflict { clause: clause_id });
                    break;
                }
            }
        }

        let unvisited = watching.len() - next;
        watching.copy_within(next.., kept);
        watching.truncate(kept + unvisited);
        self.watches.restore_watchers(falsified, watching);

        result
    }
}

/// Literals of unit clauses, each once. Two unit clauses on the same variable
/// with opposite signs are a conflict before any search.
fn initial_units<L: Literal>(watches: &WatchIndex<L>) -> Result<Vec<(L, Reason)>, Conflict> {
    let mut forced: FxHashMap<Variable, L> = FxHashMap::default();
    let mut units = Vec::new();

    for (clause, lit) in watches.units() {
        match forced.get(&lit.variable()) {
            Some(&seen) if seen == lit => {}
            Some(_) => return Err(Conflict { clause }),
            None => {
                forced.insert(lit.variable(), lit);
                units.push((lit, Reason::Unit(clause)));
            }
        }
    }

    log::debug!(target: targets::PROPAGATION, "{} unit clauses to force", units.len());
    Ok(units)
}
