#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The interface shared by every solving strategy.

use crate::sat::cnf::Cnf;
use crate::sat::literal::{DoubleLiteral, Literal};
use crate::sat::variable_selection::{FixedOrder, VariableSelection, VariableSelectionImpls};
use clap::ValueEnum;
use std::fmt::{Debug, Display};

pub use crate::sat::assignment::Solutions;

/// Compile-time choice of the pieces a solver is built from.
pub trait SolverConfig: Debug + Clone {
    type Literal: Literal;
    type VariableSelector: VariableSelection;
}

/// Dense literals, lowest open variable first.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultConfig;

impl SolverConfig for DefaultConfig {
    type Literal = DoubleLiteral;
    type VariableSelector = FixedOrder;
}

/// Dense literals, selector chosen at runtime (from the command line).
#[derive(Debug, Clone, Copy, Default)]
pub struct DynamicConfig;

impl SolverConfig for DynamicConfig {
    type Literal = DoubleLiteral;
    type VariableSelector = VariableSelectionImpls;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct SolutionStats {
    pub decisions: usize,
    pub conflicts: usize,
    pub propagations: usize,
    /// Decisions whose first branch failed and were retried with the other
    /// polarity.
    pub flips: usize,
}

pub trait Solver<C: SolverConfig = DefaultConfig> {
    fn new(cnf: Cnf<C::Literal>) -> Self;

    /// `Some` model if the formula is satisfiable, `None` if it is not.
    fn solve(&mut self) -> Option<Solutions>;

    /// The current assignment, with unassigned variables reported as true.
    fn solutions(&self) -> Solutions;

    fn stats(&self) -> SolutionStats;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, ValueEnum)]
pub enum SolverType {
    /// Iterative DPLL with watched-literal propagation.
    #[default]
    Dpll,
    /// Copy-and-branch recursion without propagation. Recurses once per
    /// variable, so formulas over 10000 variables are refused.
    Recursive,
}

impl Display for SolverType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dpll => write!(f, "dpll"),
            Self::Recursive => write!(f, "recursive"),
        }
    }
}
