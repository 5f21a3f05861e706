#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Choosing the next decision variable.
//!
//! The choice only affects search order. Both policies are deterministic for
//! a given input (and seed), so runs are reproducible.

use crate::sat::assignment::Assignment;
use crate::sat::literal::Variable;
use clap::ValueEnum;
use std::fmt::{Debug, Display};

pub trait VariableSelection: Debug + Clone {
    fn new(num_vars: usize) -> Self;

    /// Some open variable, or `None` if every variable has a value.
    fn pick(&mut self, assignment: &Assignment) -> Option<Variable>;
}

/// Lowest-numbered open variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FixedOrder;

impl VariableSelection for FixedOrder {
    fn new(_: usize) -> Self {
        Self
    }

    fn pick(&mut self, assignment: &Assignment) -> Option<Variable> {
        assignment.open_variables().next()
    }
}

const DEFAULT_SEED: u64 = 0x5EED;

/// Uniformly random open variable from a seeded generator.
#[derive(Debug, Clone)]
pub struct RandomOrder(fastrand::Rng);

impl RandomOrder {
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self(fastrand::Rng::with_seed(seed))
    }
}

impl VariableSelection for RandomOrder {
    fn new(_: usize) -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    fn pick(&mut self, assignment: &Assignment) -> Option<Variable> {
        let open = assignment.open_count();
        if open == 0 {
            return None;
        }
        assignment.open_variables().nth(self.0.usize(..open))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, ValueEnum)]
pub enum VariableSelectionType {
    #[default]
    Fixed,
    Random,
}

impl Display for VariableSelectionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fixed => write!(f, "fixed"),
            Self::Random => write!(f, "random"),
        }
    }
}

impl VariableSelectionType {
    #[must_use]
    pub fn to_impl(self, seed: u64) -> VariableSelectionImpls {
        match self {
            Self::Fixed => VariableSelectionImpls::Fixed(FixedOrder),
            Self::Random => VariableSelectionImpls::Random(RandomOrder::with_seed(seed)),
        }
    }
}

/// A selector chosen at runtime.
#[derive(Debug, Clone)]
pub enum VariableSelectionImpls {
    Fixed(FixedOrder),
    Random(RandomOrder),
}

impl VariableSelection for VariableSelectionImpls {
    fn new(num_vars: usize) -> Self {
        Self::Fixed(FixedOrder::new(num_vars))
    }

    fn pick(&mut self, assignment: &Assignment) -> Option<Variable> {
        match self {
            Self::Fixed(s) => s.pick(assignment),
            Self::Random(s) => s.pick(assignment),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::literal::{DoubleLiteral, Literal};

    #[test]
    fn test_fixed_order_picks_lowest() {
        let mut a = Assignment::new(4);
        let mut s = FixedOrder::new(4);
        assert_eq!(s.pick(&a), Some(1));

        a.assign(DoubleLiteral::from_i32(1));
        a.assign(DoubleLiteral::from_i32(-3));
        assert_eq!(s.pick(&a), Some(2));

        a.assign(DoubleLiteral::from_i32(2));
        a.assign(DoubleLiteral::from_i32(4));
        assert_eq!(s.pick(&a), None);
    }

    #[test]
    fn test_random_order_picks_open() {
        let mut a = Assignment::new(10);
        for v in [1, 2, 5, 7, 9] {
            a.assign(DoubleLiteral::from_i32(v));
        }

        let mut s = RandomOrder::with_seed(7);
        for _ in 0..50 {
            let v = s.pick(&a).unwrap();
            assert!(!a.is_assigned(v));
        }
    }

    #[test]
    fn test_random_order_is_reproducible() {
        let a = Assignment::new(100);
        let mut x = RandomOrder::with_seed(42);
        let mut y = RandomOrder::with_seed(42);
        for _ in 0..20 {
            assert_eq!(x.pick(&a), y.pick(&a));
        }
    }

    #[test]
    fn test_to_impl() {
        let a = Assignment::new(3);
        let mut s = VariableSelectionType::Fixed.to_impl(0);
        assert_eq!(s.pick(&a), Some(1));
        assert!(matches!(
            VariableSelectionType::Random.to_impl(1),
            VariableSelectionImpls::Random(_)
        ));
    }
}
