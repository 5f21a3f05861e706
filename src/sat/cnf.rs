#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The clause store.
//!
//! A [`Cnf`] owns the input clauses for the lifetime of a solve. Clauses are
//! addressed by their position (the clause id) and are never mutated: the
//! watch index only moves pointers, it never rewrites clause content.

use crate::sat::assignment::Solutions;
use crate::sat::clause::Clause;
use crate::sat::error::FormulaError;
use crate::sat::literal::{DoubleLiteral, Literal};
use crate::sat::logging::targets;
use itertools::Itertools;
use std::fmt::Display;
use std::ops::Index;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cnf<L: Literal = DoubleLiteral> {
    pub clauses: Vec<Clause<L>>,
    /// Variables are `1..=num_vars`.
    pub num_vars: usize,
}

/// How far past the declared variable count a clause may reach before the
/// formula is rejected. Per-variable tables are sized by the largest variable,
/// so a stray huge literal would otherwise turn into a huge allocation.
pub const UNDECLARED_VARIABLE_MARGIN: usize = 1 << 16;

impl<L: Literal> Cnf<L> {
    /// Builds a clause store over variables `1..=num_vars`.
    ///
    /// If a clause mentions a variable above `num_vars` the variable count is
    /// raised to cover it; the declared count is advisory only, up to
    /// [`UNDECLARED_VARIABLE_MARGIN`] variables past it.
    ///
    /// # Errors
    ///
    /// [`FormulaError::ZeroLiteral`] if any clause contains `0`, and
    /// [`FormulaError::VariableOutOfRange`] if a clause mentions a variable
    /// more than the margin past `num_vars`.
    pub fn new<I, C>(num_vars: usize, clauses: I) -> Result<Self, FormulaError>
    where
        I: IntoIterator<Item = C>,
        C: AsRef<[i32]>,
    {
        Self::build(num_vars, num_vars.saturating_add(UNDECLARED_VARIABLE_MARGIN), clauses)
    }

    fn build<I, C>(num_vars: usize, limit: usize, clauses: I) -> Result<Self, FormulaError>
    where
        I: IntoIterator<Item = C>,
        C: AsRef<[i32]>,
    {
        let mut max_var = num_vars;
        let mut stored = Vec::new();

        for (idx, clause) in clauses.into_iter().enumerate() {
            let clause = clause.as_ref();
            if clause.contains(&0) {
                return Err(FormulaError::ZeroLiteral { clause: idx });
            }
            if let Some(var) = clause.iter().map(|l| l.unsigned_abs() as usize).max() {
                if var > limit {
                    return Err(FormulaError::VariableOutOfRange {
                        clause: idx,
                        variable: var,
                        limit,
                    });
                }
                max_var = max_var.max(var);
            }
            stored.push(Clause::from(clause));
        }

        if max_var > num_vars {
            log::warn!(
                target: targets::PARSE,
                "Declared {num_vars} variables, but clauses mention variable {max_var}"
            );
        }

        Ok(Self {
            clauses: stored,
            num_vars: max_var,
        })
    }

    /// As [`Cnf::new`], additionally comparing against a declared clause count.
    /// A mismatch is logged and otherwise ignored.
    ///
    /// # Errors
    ///
    /// See [`Cnf::new`].
    pub fn with_declared<I, C>(
        num_vars: usize,
        num_clauses: usize,
        clauses: I,
    ) -> Result<Self, FormulaError>
    where
        I: IntoIterator<Item = C>,
        C: AsRef<[i32]>,
    {
        let cnf = Self::new(num_vars, clauses)?;
        if cnf.clause_count() != num_clauses {
            log::warn!(
                target: targets::PARSE,
                "Declared {num_clauses} clauses, found {}",
                cnf.clause_count()
            );
        }
        Ok(cnf)
    }

    #[must_use]
    pub fn clause_count(&self) -> usize {
        self.clauses.len()
    }

    /// The literals of the clause with the given id.
    ///
    /// # Panics
    ///
    /// If `clause_id` is out of range.
    #[must_use]
    pub fn literals_of(&self, clause_id: usize) -> &[L] {
        self.clauses[clause_id].literals()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// True if some clause has no literals, which no assignment satisfies.
    #[must_use]
    pub fn has_empty_clause(&self) -> bool {
        self.clauses.iter().any(Clause::is_empty)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Clause<L>> {
        self.clauses.iter()
    }

    /// Total number of literal occurrences.
    #[must_use]
    pub fn literal_count(&self) -> usize {
        self.clauses.iter().map(Clause::len).sum()
    }

    /// Checks that every clause has at least one literal true in `solutions`.
    #[must_use]
    pub fn verify(&self, solutions: &Solutions) -> bool {
        self.clauses
            .iter()
            .all(|clause| clause.iter().any(|lit| solutions.check(lit.to_i32())))
    }
}

impl<L: Literal> Index<usize> for Cnf<L> {
    type Output = Clause<L>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.clauses[index]
    }
}

impl<L: Literal> TryFrom<Vec<Vec<i32>>> for Cnf<L> {
    type Error = FormulaError;

    /// Variable count is taken from the largest variable mentioned. With no
    /// declared count, the margin is measured from the number of literal
    /// occurrences instead.
    fn try_from(clauses: Vec<Vec<i32>>) -> Result<Self, Self::Error> {
        let occurrences: usize = clauses.iter().map(Vec::len).sum();
        Self::build(0, occurrences.saturating_add(UNDECLARED_VARIABLE_MARGIN), clauses)
    }
}

impl<L: Literal> Display for Cnf<L> {
    /// Writes the formula as DIMACS.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "p cnf {} {}", self.num_vars, self.clauses.len())?;
        for clause in &self.clauses {
            if clause.is_empty() {
                writeln!(f, "0")?;
            } else {
                writeln!(f, "{} 0", clause.iter().join(" "))?;
            }
        }
        Ok(())
    }
}
