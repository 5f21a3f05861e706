//! Error types.
//!
//! Only malformed input is an error. Satisfiable and unsatisfiable are both
//! results, and a conflict found during propagation is a control-flow value
//! ([`Conflict`](crate::sat::propagation::Conflict)), not an error.

use std::fmt;

/// Any reason a formula could not be loaded.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Parse(ParseError),
    Formula(FormulaError),
}

/// Problems with DIMACS text.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParseError {
    /// No `p cnf` line before the first clause, or no input at all.
    MissingHeader,

    /// A `p` line that is not `p cnf <vars> <clauses>`, at the given line.
    MalformedHeader(usize),

    /// A token in a clause that is not an integer.
    InvalidLiteral { line: usize, token: String },

    /// The underlying reader failed.
    Io(std::io::ErrorKind),
}

/// Problems with clause content handed to the clause store directly, or with
/// a formula a solver refuses to take on.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FormulaError {
    /// A clause contains the literal `0`.
    ZeroLiteral { clause: usize },

    /// A clause mentions a variable too far past the declared count.
    VariableOutOfRange {
        clause: usize,
        variable: usize,
        limit: usize,
    },

    /// More variables than the chosen solver accepts.
    TooManyVariables { variables: usize, limit: usize },
}

impl From<ParseError> for ErrorKind {
    fn from(e: ParseError) -> Self {
        ErrorKind::Parse(e)
    }
}

impl From<FormulaError> for ErrorKind {
    fn from(e: FormulaError) -> Self {
        ErrorKind::Formula(e)
    }
}

impl From<std::io::Error> for ErrorKind {
    fn from(e: std::io::Error) -> Self {
        ErrorKind::Parse(ParseError::Io(e.kind()))
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingHeader => write!(f, "missing `p cnf` problem line"),
            Self::MalformedHeader(line) => write!(f, "malformed problem line at line {line}"),
            Self::InvalidLiteral { line, token } => {
                write!(f, "invalid literal '{token}' at line {line}")
            }
            Self::Io(kind) => write!(f, "failed to read input: {kind}"),
        }
    }
}

impl fmt::Display for FormulaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroLiteral { clause } => write!(f, "clause {clause} contains the literal 0"),
            Self::VariableOutOfRange {
                clause,
                variable,
                limit,
            } => write!(
                f,
                "clause {clause} mentions variable {variable}, past the limit of {limit}"
            ),
            Self::TooManyVariables { variables, limit } => write!(
                f,
                "{variables} variables, but the solver accepts at most {limit}"
            ),
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "malformed formula: {e}"),
            Self::Formula(e) => write!(f, "invalid formula: {e}"),
        }
    }
}

impl std::error::Error for ParseError {}
impl std::error::Error for FormulaError {}
impl std::error::Error for ErrorKind {}
