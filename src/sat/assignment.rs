#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Partial assignments and models.

use crate::sat::literal::{Literal, Variable};
use core::ops::Index;
use itertools::Itertools;
use std::collections::BTreeSet;
use std::fmt::Display;

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
    pub const fn is_true(self) -> bool {
        matches!(self, Self::Assigned(true))
    }

    #[must_use]
    pub const fn is_false(self) -> bool {
        matches!(self, Self::Assigned(false))
    }
}

/// A partial map from variables to truth values.
///
/// The set of open (unassigned) variables is kept alongside the values and is
/// always exactly `{1..=num_vars}` minus the assigned ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    states: Vec<VarState>,
    open: BTreeSet<Variable>,
}

impl Index<Variable> for Assignment {
    type Output = VarState;

    fn index(&self, index: Variable) -> &Self::Output {
        &self.states[index as usize]
    }
}

impl Assignment {
    /// # Panics
    ///
    /// If `num_vars` does not fit in a [`Variable`].
    #[must_use]
    pub fn new(num_vars: usize) -> Self {
        let top = Variable::try_from(num_vars).expect("variable count exceeds u32");
        Self {
            states: vec![VarState::Unassigned; num_vars + 1],
            open: (1..=top).collect(),
        }
    }

    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.states.len() - 1
    }

    /// Makes `lit` true.
    pub fn assign<L: Literal>(&mut self, lit: L) {
        let var = lit.variable();
        debug_assert!(self[var].is_unassigned(), "variable {var} assigned twice");
        self.states[var as usize] = VarState::Assigned(lit.polarity());
        self.open.remove(&var);
    }

    pub fn unassign(&mut self, var: Variable) {
        self.states[var as usize] = VarState::Unassigned;
        self.open.insert(var);
    }

    #[must_use]
    pub fn is_assigned(&self, var: Variable) -> bool {
        self[var].is_assigned()
    }

    #[must_use]
    pub fn var_value(&self, var: Variable) -> Option<bool> {
        match self.states.get(var as usize) {
            Some(VarState::Assigned(b)) => Some(*b),
            _ => None,
        }
    }

    /// `Some(true)` if `lit` is satisfied, `Some(false)` if falsified.
    #[must_use]
    pub fn literal_value<L: Literal>(&self, lit: L) -> Option<bool> {
        self.var_value(lit.variable()).map(|b| b == lit.polarity())
    }

    /// Unassigned variables in ascending order.
    pub fn open_variables(&self) -> impl Iterator<Item = Variable> + '_ {
        self.open.iter().copied()
    }

    #[must_use]
    pub fn open_count(&self) -> usize {
        self.open.len()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.open.is_empty()
    }

    /// Variables currently holding a value, ascending.
    #[allow(clippy::cast_possible_truncation)]
    pub fn assigned_variables(&self) -> impl Iterator<Item = Variable> + '_ {
        self.states
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, s)| s.is_assigned())
            .map(|(i, _)| i as Variable)
    }

    /// Checks the open set against the stored values.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn is_consistent(&self) -> bool {
        self.states
            .iter()
            .enumerate()
            .skip(1)
            .all(|(i, s)| s.is_unassigned() == self.open.contains(&(i as Variable)))
    }

    /// The model. Variables without a value are reported as true; any value
    /// works for them once every clause is satisfied.
    #[must_use]
    pub fn get_solutions(&self) -> Solutions {
        Solutions::new(
            (1..self.states.len())
                .map(|i| {
                    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
                    let var = i as i32;
                    if self.states[i].is_false() { -var } else { var }
                })
                .collect(),
        )
    }
}

/// A total assignment as signed DIMACS literals, one per variable, ordered by
/// variable.
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub struct Solutions(Vec<i32>);

impl Solutions {
    #[must_use]
    pub fn new(mut literals: Vec<i32>) -> Self {
        literals.sort_by_key(|l| l.unsigned_abs());
        Self(literals)
    }

    /// True if `lit` holds in this model.
    #[must_use]
    pub fn check(&self, lit: i32) -> bool {
        self.value(lit.unsigned_abs()) == Some(lit.is_positive())
    }

    #[must_use]
    pub fn value(&self, var: Variable) -> Option<bool> {
        self.0
            .binary_search_by_key(&var, |l| l.unsigned_abs())
            .ok()
            .map(|i| self.0[i].is_positive())
    }

    pub fn iter(&self) -> impl Iterator<Item = &i32> {
        self.0.iter()
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

impl Display for Solutions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().join(" "))
    }
}
