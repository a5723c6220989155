#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! A parser for the DIMACS CNF file format.
//!
//! The format is line oriented:
//! - Comment lines start with `c`.
//! - The problem line `p cnf <num_variables> <num_clauses>` declares the
//!   dimensions. The clause count is kept for bookkeeping and not enforced.
//! - Every other non-empty line holds whitespace separated literals. Each `0`
//!   terminates a clause and is stripped before the clause is recorded.
//! - A `%` line ends the data section (a convention of competition files).
//!
//! Unlike a permissive reader, a `0` with no literals in front of it is an
//! error here: the solver core never receives empty clauses.

use crate::sat::clause::Clause;
use crate::sat::cnf::Cnf;
use crate::sat::error::{Error, MalformedKind, Result};
use crate::sat::literal::Literal;
use std::io::{self, BufRead};
use std::path::Path;

/// Declared dimensions from a `p cnf` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Header {
    num_vars: usize,
    num_clauses: usize,
}

fn malformed(line: usize, kind: MalformedKind) -> Error {
    Error::MalformedInput { line, kind }
}

fn parse_header(line_no: usize, line: &str) -> Result<Header> {
    let bad = || malformed(line_no, MalformedKind::BadHeader(line.trim().to_string()));

    let mut parts = line.split_whitespace();
    if parts.next() != Some("p") || parts.next() != Some("cnf") {
        return Err(bad());
    }
    let num_vars = parts.next().and_then(|s| s.parse().ok()).ok_or_else(bad)?;
    let num_clauses = parts.next().and_then(|s| s.parse().ok()).ok_or_else(bad)?;
    if parts.next().is_some() {
        return Err(bad());
    }

    Ok(Header {
        num_vars,
        num_clauses,
    })
}

fn parse_literal(line_no: usize, token: &str) -> Result<i32> {
    let value: i64 = token
        .parse()
        .map_err(|_| malformed(line_no, MalformedKind::BadLiteral(token.to_string())))?;

    i32::try_from(value)
        .ok()
        .filter(|&v| v != i32::MIN)
        .ok_or_else(|| malformed(line_no, MalformedKind::LiteralOutOfRange(value)))
}

/// Parses DIMACS formatted data from a `BufRead` source.
///
/// # Errors
///
/// - [`Error::Io`] if reading fails.
/// - [`Error::MalformedInput`] for a bad or repeated problem line, a token
///   that is not an integer, a literal out of range, or an empty clause.
pub fn parse_dimacs<R: BufRead>(reader: R) -> Result<Cnf> {
    let mut header: Option<Header> = None;
    let mut clauses: Vec<Clause> = Vec::new();
    let mut current: Vec<Literal> = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let trimmed = line.trim_start();

        match trimmed.chars().next() {
            None | Some('c') => continue,
            Some('%') => break,
            Some('p') => {
                if header.is_some() {
                    return Err(malformed(line_no, MalformedKind::DuplicateHeader));
                }
                header = Some(parse_header(line_no, trimmed)?);
                continue;
            }
            Some(_) => {}
        }

        for token in trimmed.split_whitespace() {
            let value = parse_literal(line_no, token)?;
            match Literal::from_i32(value) {
                Some(lit) => current.push(lit),
                None if current.is_empty() => {
                    return Err(malformed(line_no, MalformedKind::EmptyClause));
                }
                None => clauses.push(Clause::new(current.drain(..))),
            }
        }

        if !current.is_empty() {
            tracing::debug!(line = line_no, "accepting clause without `0` terminator");
            clauses.push(Clause::new(current.drain(..)));
        }
    }

    let (num_vars, num_clauses) =
        header.map_or((0, clauses.len()), |h| (h.num_vars, h.num_clauses));

    tracing::debug!(
        num_vars,
        num_clauses,
        parsed = clauses.len(),
        "parsed DIMACS input"
    );

    Cnf::new(clauses, num_vars, num_clauses)
}

/// Parses DIMACS text held in memory.
///
/// # Errors
///
/// See [`parse_dimacs`].
pub fn parse_str(input: &str) -> Result<Cnf> {
    parse_dimacs(io::Cursor::new(input))
}

/// Parses a DIMACS CNF file.
///
/// # Errors
///
/// [`Error::Io`] if the file cannot be opened, otherwise see [`parse_dimacs`].
pub fn parse_file<P: AsRef<Path>>(file_path: P) -> Result<Cnf> {
    let file = std::fs::File::open(file_path)?;
    let reader = io::BufReader::new(file);
    parse_dimacs(reader)
}
