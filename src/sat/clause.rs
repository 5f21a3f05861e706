use crate::sat::literal::Literal;
use core::ops::Index;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

/// A disjunction of distinct literals. Content is fixed once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Clause<L: Literal> {
    literals: SmallVec<[L; 8]>,
    tautology: bool,
}

impl<L: Literal> Clause<L> {
    /// Builds a clause, dropping repeated literals but keeping first-seen order.
    pub fn new<I: IntoIterator<Item = L>>(literals: I) -> Self {
        let mut seen = FxHashSet::default();
        let literals: SmallVec<[L; 8]> = literals.into_iter().filter(|l| seen.insert(*l)).collect();
        let tautology = literals.iter().any(|l| seen.contains(&l.negated()));

        Self {
            literals,
            tautology,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    #[must_use]
    pub fn is_unit(&self) -> bool {
        self.len() == 1
    }

    /// True if the clause holds some literal together with its negation.
    #[must_use]
    pub const fn is_tautology(&self) -> bool {
        self.tautology
    }

    pub fn iter(&self) -> impl Iterator<Item = &L> {
        self.literals.iter()
    }

    #[must_use]
    pub fn literals(&self) -> &[L] {
        &self.literals
    }

    /// Literals as signed DIMACS integers.
    #[must_use]
    pub fn to_dimacs(&self) -> Vec<i32> {
        self.literals.iter().map(|l| l.to_i32()).collect()
    }
}

impl<L: Literal> Index<usize> for Clause<L> {
    type Output = L;

    fn index(&self, index: usize) -> &Self::Output {
        &self.literals[index]
    }
}

impl<L: Literal> From<&[i32]> for Clause<L> {
    fn from(literals: &[i32]) -> Self {
        Self::new(literals.iter().map(|&l| L::from_i32(l)))
    }
}

impl<L: Literal> From<Vec<L>> for Clause<L> {
    fn from(literals: Vec<L>) -> Self {
        Self::new(literals)
    }
}
