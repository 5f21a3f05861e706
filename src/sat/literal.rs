#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Literal encodings.
//!
//! A literal is a variable together with a polarity. DIMACS writes them as
//! signed nonzero integers; inside the solver they are stored behind the
//! [`Literal`] trait so the watch index can address them densely through
//! [`Literal::index`].

use core::ops::{Neg, Not};
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Variables are numbered from 1. Index 0 is never a real variable.
pub type Variable = u32;

pub trait Literal: Copy + Debug + Display + Eq + Hash + Ord + Default {
    fn new(var: Variable, polarity: bool) -> Self;
    fn variable(self) -> Variable;
    fn polarity(self) -> bool;

    #[must_use]
    fn negated(self) -> Self;

    /// Dense position of this literal, used to address per-literal tables.
    /// Distinct literals over variables `<= n` map into `0..2 * (n + 1)`.
    fn index(self) -> usize;

    fn is_negated(self) -> bool {
        !self.polarity()
    }

    fn is_positive(self) -> bool {
        self.polarity()
    }

    /// # Panics
    ///
    /// In debug builds, if `value` is zero. `0` is the DIMACS clause terminator
    /// and never a literal; callers reject it before it reaches here.
    #[must_use]
    fn from_i32(value: i32) -> Self {
        debug_assert_ne!(value, 0, "0 is not a literal");
        Self::new(value.unsigned_abs(), value.is_positive())
    }

    #[must_use]
    fn to_i32(self) -> i32 {
        #[allow(clippy::cast_possible_wrap)]
        let var = self.variable() as i32;
        if self.polarity() { var } else { -var }
    }
}

/// `2v` for the positive literal, `2v + 1` for the negative one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct DoubleLiteral(u32);

impl Literal for DoubleLiteral {
    fn new(var: Variable, polarity: bool) -> Self {
        if polarity {
            Self(var * 2)
        } else {
            Self(var * 2 + 1)
        }
    }

    fn variable(self) -> Variable {
        self.0 / 2
    }

    fn polarity(self) -> bool {
        self.0 % 2 == 0
    }

    fn negated(self) -> Self {
        Self(self.0 ^ 1)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Plain signed integer, exactly as written in DIMACS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct NegativeLiteral(i32);

impl Literal for NegativeLiteral {
    fn new(var: Variable, polarity: bool) -> Self {
        #[allow(clippy::cast_possible_wrap)]
        let var = var as i32;

        if polarity { Self(var) } else { Self(-var) }
    }

    fn variable(self) -> Variable {
        self.0.unsigned_abs()
    }

    fn polarity(self) -> bool {
        self.0.is_positive()
    }

    fn negated(self) -> Self {
        Self(-self.0)
    }

    fn index(self) -> usize {
        let var = self.0.unsigned_abs() as usize;
        if self.0.is_positive() { 2 * var } else { 2 * var + 1 }
    }
}

macro_rules! impl_literal_ops {
    ($($ty:ty),*) => {$(
        impl Neg for $ty {
            type Output = Self;

            fn neg(self) -> Self::Output {
                self.negated()
            }
        }

        impl Not for $ty {
            type Output = Self;

            fn not(self) -> Self::Output {
                self.negated()
            }
        }

        impl Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.to_i32())
            }
        }
    )*};
}

impl_literal_ops!(DoubleLiteral, NegativeLiteral);

#[cfg(test)]
mod tests {
    use super::*;

    fn check_encoding<L: Literal>() {
        for value in [1, -1, 7, -7, 42] {
            let lit = L::from_i32(value);
            assert_eq!(lit.to_i32(), value);
            assert_eq!(lit.variable(), value.unsigned_abs());
            assert_eq!(lit.polarity(), value > 0);
            assert_eq!(lit.negated().to_i32(), -value);
            assert_eq!(lit.negated().negated(), lit);
            assert_ne!(lit.index(), lit.negated().index());
        }
    }

    #[test]
    fn test_double_literal() {
        check_encoding::<DoubleLiteral>();
        assert_eq!(DoubleLiteral::from_i32(3).index(), 6);
        assert_eq!(DoubleLiteral::from_i32(-3).index(), 7);
        assert_eq!(-DoubleLiteral::from_i32(3), DoubleLiteral::from_i32(-3));
    }

    #[test]
    fn test_negative_literal() {
        check_encoding::<NegativeLiteral>();
        assert_eq!(
            NegativeLiteral::from_i32(5).index(),
            DoubleLiteral::from_i32(5).index()
        );
        assert_eq!(!NegativeLiteral::from_i32(-2), NegativeLiteral::from_i32(2));
    }

    #[test]
    fn test_display_is_dimacs() {
        assert_eq!(DoubleLiteral::from_i32(-12).to_string(), "-12");
        assert_eq!(NegativeLiteral::from_i32(4).to_string(), "4");
    }
}
