//! Errors raised while building a formula.
//!
//! Search outcomes (unsatisfiable, budget exhausted, internal defects) are not
//! errors; they are reported through [`crate::sat::solver::SearchResult`].

use thiserror::Error;

/// The main error type for formula ingestion and instance generation.
#[derive(Debug, Error)]
pub enum Error {
    /// A DIMACS line could not be understood.
    #[error("malformed input on line {line}: {kind}")]
    MalformedInput {
        /// 1-based line number in the source text.
        line: usize,
        /// What was wrong with it.
        kind: MalformedKind,
    },

    /// An in-memory clause with no literals was supplied.
    #[error("clause {index} is empty")]
    EmptyClause {
        /// Position of the clause in the supplied sequence.
        index: usize,
    },

    /// Literal `0` appeared inside an in-memory clause.
    #[error("literal 0 is reserved as the clause terminator")]
    ZeroLiteral,

    /// A literal whose magnitude cannot be represented.
    #[error("literal {0} is out of range")]
    LiteralOutOfRange(i64),

    /// Requested generator parameters cannot produce the instance.
    #[error("cannot generate instance with {vars} variables and {clauses} clauses: {reason}")]
    InvalidInstance {
        vars: usize,
        clauses: usize,
        reason: &'static str,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Specific DIMACS defects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedKind {
    #[error("expected `p cnf <vars> <clauses>`, found `{0}`")]
    BadHeader(String),

    #[error("a second problem line was found")]
    DuplicateHeader,

    #[error("`{0}` is not an integer literal")]
    BadLiteral(String),

    #[error("literal {0} is out of range")]
    LiteralOutOfRange(i64),

    #[error("clause terminator without literals")]
    EmptyClause,
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
