#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The two-watched-literal index.
//!
//! Two tables that mirror each other: for every literal, the clauses watching
//! it; for every clause, the (at most two) literals it watches. A clause id is
//! in the list of a literal exactly when that literal is one of the clause's
//! watches. Both sides are only ever changed together, through
//! [`WatchIndex::move_watch`].

use crate::sat::cnf::Cnf;
use crate::sat::literal::Literal;
use crate::sat::logging::targets;
use smallvec::SmallVec;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WatchIndex<L: Literal> {
    /// Indexed by [`Literal::index`].
    watchers: Vec<SmallVec<[usize; 6]>>,
    /// Indexed by clause id.
    watched: Vec<SmallVec<[L; 2]>>,
}

impl<L: Literal> WatchIndex<L> {
    /// Watches the first two literals of every clause, or the single literal
    /// of a unit clause. Empty clauses and tautologies get no watches.
    #[must_use]
    pub fn new(cnf: &Cnf<L>) -> Self {
        let mut index = Self {
            watchers: vec![SmallVec::new(); 2 * (cnf.num_vars + 1)],
            watched: vec![SmallVec::new(); cnf.clause_count()],
        };

        let mut skipped = 0_usize;
        for (i, clause) in cnf.iter().enumerate() {
            if clause.is_tautology() || clause.is_empty() {
                skipped += 1;
                continue;
            }

            for &lit in clause.iter().take(2) {
                index.watchers[lit.index()].push(i);
                index.watched[i].push(lit);
            }
        }

        log::debug!(
            target: targets::WATCH,
            "Watching {} of {} clauses",
            cnf.clause_count() - skipped,
            cnf.clause_count()
        );

        index
    }

    /// Clauses currently watching `lit`.
    #[must_use]
    pub fn watcher_clauses_of(&self, lit: L) -> &[usize] {
        &self.watchers[lit.index()]
    }

    /// Literals currently watched by the clause.
    #[must_use]
    pub fn current_watches_of(&self, clause_id: usize) -> &[L] {
        &self.watched[clause_id]
    }

    #[must_use]
    pub fn is_watched(&self, clause_id: usize, lit: L) -> bool {
        self.watched[clause_id].contains(&lit)
    }

    /// Clauses watching a single literal, with that literal.
    pub fn units(&self) -> impl Iterator<Item = (usize, L)> + '_ {
        self.watched
            .iter()
            .enumerate()
            .filter(|(_, w)| w.len() == 1)
            .map(|(i, w)| (i, w[0]))
    }

    /// Moves one watch of `clause_id` from `from` to `to`, updating both tables.
    pub fn move_watch(&mut self, clause_id: usize, from: L, to: L) {
        let list = &mut self.watchers[from.index()];
        if let Some(pos) = list.iter().position(|&c| c == clause_id) {
            list.swap_remove(pos);
        }
        self.redirect_watch(clause_id, from, to);
    }

    /// Detaches the watcher list of `lit` so the caller can walk it while
    /// moving watches elsewhere. The two tables disagree about `lit` until
    /// the list goes back through [`WatchIndex::restore_watchers`].
    pub(crate) fn take_watchers(&mut self, lit: L) -> SmallVec<[usize; 6]> {
        std::mem::take(&mut self.watchers[lit.index()])
    }

    pub(crate) fn restore_watchers(&mut self, lit: L, list: SmallVec<[usize; 6]>) {
        debug_assert!(self.watchers[lit.index()].is_empty());
        self.watchers[lit.index()] = list;
    }

    /// Points the watch of `clause_id` on `from` at `to` instead. The entry in
    /// the watcher list of `from` is left to the caller.
    pub(crate) fn redirect_watch(&mut self, clause_id: usize, from: L, to: L) {
        debug_assert!(self.is_watched(clause_id, from));
        debug_assert!(!self.is_watched(clause_id, to));
        debug_assert_ne!(from, to);

        for w in &mut self.watched[clause_id] {
            if *w == from {
                *w = to;
            }
        }
        self.watchers[to.index()].push(clause_id);
    }

    /// The watch of `clause_id` that is not `lit`, or `None` for a clause with
    /// a single watch.
    #[must_use]
    pub fn other_watch(&self, clause_id: usize, lit: L) -> Option<L> {
        match self.watched[clause_id].as_slice() {
            [a, b] if *a == lit => Some(*b),
            [a, b] if *b == lit => Some(*a),
            _ => None,
        }
    }

    /// Checks that the two tables describe the same relation.
    #[must_use]
    pub fn is_mirrored(&self) -> bool {
        let forward = self.watched.iter().enumerate().all(|(c, lits)| {
            lits.iter()
                .all(|l| self.watchers[l.index()].iter().filter(|&&w| w == c).count() == 1)
        });

        let backward = self.watchers.iter().enumerate().all(|(idx, clauses)| {
            clauses
                .iter()
                .all(|&c| self.watched[c].iter().any(|l| l.index() == idx))
        });

        forward && backward
    }
}
