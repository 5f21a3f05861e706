//! A copy-and-branch recursive search.
//!
//! Every branch works on its own simplified copy of the clause list: clauses
//! satisfied by the branch literal are dropped and its negation is removed
//! from the rest. There is no propagation, so this is only useful on small
//! formulas, as a second opinion on the watched-literal solver.
//!
//! The search recurses once per branching variable, so stack depth grows with
//! the variable count. [`Recursive::try_new`] refuses formulas over
//! [`MAX_VARIABLES`]; [`Solver::new`] does not check.

use crate::sat::assignment::Assignment;
use crate::sat::cnf::Cnf;
use crate::sat::error::FormulaError;
use crate::sat::literal::Literal;
use crate::sat::solver::{DefaultConfig, SolutionStats, Solutions, Solver, SolverConfig};
use smallvec::SmallVec;

type Clauses<L> = Vec<SmallVec<[L; 8]>>;

/// Most variables [`Recursive::try_new`] accepts. Keeps the recursion well
/// inside a default 8 MiB main-thread stack.
pub const MAX_VARIABLES: usize = 10_000;

#[derive(Debug, Clone)]
pub struct Recursive<Config: SolverConfig = DefaultConfig> {
    pub cnf: Cnf<Config::Literal>,
    pub assignment: Assignment,
    stats: SolutionStats,
}

impl<Config: SolverConfig> Solver<Config> for Recursive<Config> {
    fn new(cnf: Cnf<Config::Literal>) -> Self {
        Self {
            assignment: Assignment::new(cnf.num_vars),
            cnf,
            stats: SolutionStats::default(),
        }
    }

    fn solve(&mut self) -> Option<Solutions> {
        let clauses: Clauses<Config::Literal> = self
            .cnf
            .iter()
            .filter(|c| !c.is_tautology())
            .map(|c| SmallVec::from_slice(c.literals()))
            .collect();

        if self.search(&clauses) {
            Some(self.solutions())
        } else {
            None
        }
    }

    fn solutions(&self) -> Solutions {
        self.assignment.get_solutions()
    }

    fn stats(&self) -> SolutionStats {
        self.stats
    }
}

impl<Config: SolverConfig> Recursive<Config> {
    /// As [`Solver::new`], but refuses formulas the recursion could not
    /// finish without exhausting the stack.
    ///
    /// # Errors
    ///
    /// [`FormulaError::TooManyVariables`] if `cnf` has more than
    /// [`MAX_VARIABLES`] variables.
    pub fn try_new(cnf: Cnf<Config::Literal>) -> Result<Self, FormulaError> {
        if cnf.num_vars > MAX_VARIABLES {
            return Err(FormulaError::TooManyVariables {
                variables: cnf.num_vars,
                limit: MAX_VARIABLES,
            });
        }
        Ok(<Self as Solver<Config>>::new(cnf))
    }

    fn search(&mut self, clauses: &Clauses<Config::Literal>) -> bool {
        if clauses.is_empty() {
            return true;
        }

        if clauses.iter().any(|c| c.is_empty()) {
            self.stats.conflicts += 1;
            return false;
        }

        let Some(var) = clauses.iter().flatten().map(|l| l.variable()).min() else {
            return true;
        };
        self.stats.decisions += 1;

        for polarity in [true, false] {
            let lit = Config::Literal::new(var, polarity);
            self.assignment.assign(lit);

            if self.search(&simplify(clauses, lit)) {
                return true;
            }

            self.assignment.unassign(var);
            if polarity {
                self.stats.flips += 1;
            }
        }

        false
    }
}

/// The clauses left once `lit` is true.
fn simplify<L: Literal>(clauses: &Clauses<L>, lit: L) -> Clauses<L> {
    let falsified = lit.negated();
    clauses
        .iter()
        .filter(|c| !c.contains(&lit))
        .map(|c| c.iter().copied().filter(|&l| l != falsified).collect())
        .collect()
}
