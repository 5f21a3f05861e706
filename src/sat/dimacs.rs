#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! A parser for the DIMACS CNF format.
//!
//! - Lines starting with `c` are comments, wherever they appear.
//! - The problem line `p cnf <num_variables> <num_clauses>` must come before
//!   the first clause. Its counts are advisory.
//! - Clause literals are whitespace-separated integers, each clause ended by
//!   `0`. A clause may span lines; a line holding only `0` is an empty clause.
//! - A line starting with `%` ends the data. Blank lines are ignored.
//! - Literals left without a closing `0` at the end of input form a last clause.

use crate::sat::cnf::Cnf;
use crate::sat::error::{ErrorKind, ParseError};
use crate::sat::literal::Literal;
use crate::sat::logging::targets;
use std::io::{self, BufRead};
use std::path::Path;

/// Parses DIMACS text from a `BufRead` source.
///
/// # Errors
///
/// A [`ParseError`] (wrapped in [`ErrorKind`]) for a missing or malformed
/// problem line, a token that is not an integer, or a failed read.
pub fn parse_dimacs<R: BufRead, L: Literal>(reader: R) -> Result<Cnf<L>, ErrorKind> {
    let mut header: Option<(usize, usize)> = None;
    let mut clauses = ClauseReader::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let mut parts = line.split_whitespace().peekable();

        match parts.peek() {
            None | Some(&"c") => {}
            Some(t) if t.starts_with('c') => {}
            Some(&"%") => break,
            Some(&"p") => {
                if header.is_some() {
                    return Err(ParseError::MalformedHeader(line_no).into());
                }
                header = Some(parse_header(parts, line_no)?);
            }
            Some(_) => {
                if header.is_none() {
                    return Err(ParseError::MissingHeader.into());
                }
                clauses.read_tokens(parts, line_no)?;
            }
        }
    }

    let clauses = clauses.finish();

    let Some((num_vars, num_clauses)) = header else {
        return Err(ParseError::MissingHeader.into());
    };

    log::debug!(
        target: targets::PARSE,
        "Parsed {} clauses over {num_vars} declared variables",
        clauses.len()
    );

    Ok(Cnf::with_declared(num_vars, num_clauses, clauses)?)
}

/// Collects `0`-terminated clauses from whitespace-separated literal tokens.
/// A clause may span any number of calls to [`ClauseReader::read_tokens`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClauseReader {
    clauses: Vec<Vec<i32>>,
    current: Vec<i32>,
}

impl ClauseReader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the literal tokens of one line. `line_no` is only used for
    /// error reporting.
    ///
    /// # Errors
    ///
    /// [`ParseError::InvalidLiteral`] for a token that is not an `i32`, or is
    /// `i32::MIN`, which has no negation.
    pub fn read_tokens<'a, I>(&mut self, tokens: I, line_no: usize) -> Result<(), ParseError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for token in tokens {
            let lit = token
                .parse::<i32>()
                .ok()
                .filter(|&l| l != i32::MIN)
                .ok_or_else(|| ParseError::InvalidLiteral {
                    line: line_no,
                    token: token.to_string(),
                })?;
            if lit == 0 {
                self.clauses.push(std::mem::take(&mut self.current));
            } else {
                self.current.push(lit);
            }
        }
        Ok(())
    }

    /// The clauses read so far. Literals still waiting for their `0` form a
    /// last clause.
    #[must_use]
    pub fn finish(mut self) -> Vec<Vec<i32>> {
        if !self.current.is_empty() {
            self.clauses.push(self.current);
        }
        self.clauses
    }
}

fn parse_header<'a, I>(parts: I, line_no: usize) -> Result<(usize, usize), ParseError>
where
    I: Iterator<Item = &'a str>,
{
    let fields: Vec<&str> = parts.collect();
    match fields.as_slice() {
        ["p", "cnf", vars, clauses] => {
            let vars = vars
                .parse::<u32>()
                .map_err(|_| ParseError::MalformedHeader(line_no))? as usize;
            let clauses = clauses.parse().map_err(|_| ParseError::MalformedHeader(line_no))?;
            Ok((vars, clauses))
        }
        _ => Err(ParseError::MalformedHeader(line_no)),
    }
}

/// Parses a DIMACS CNF file.
///
/// # Errors
///
/// As [`parse_dimacs`], plus failure to open the file.
pub fn parse_file<L: Literal, P: AsRef<Path>>(file_path: P) -> Result<Cnf<L>, ErrorKind> {
    let file = std::fs::File::open(file_path)?;
    let reader = io::BufReader::new(file);
    parse_dimacs(reader)
}

/// Parses DIMACS held in a string.
///
/// # Errors
///
/// As [`parse_dimacs`].
pub fn parse_str<L: Literal>(input: &str) -> Result<Cnf<L>, ErrorKind> {
    parse_dimacs(io::Cursor::new(input))
}
