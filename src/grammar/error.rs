use thiserror::Error;

use super::grammar::{Production, Symbol};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("grammar has no productions")]
    Empty,
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },
    #[error("invalid notation: {0}")]
    InvalidNotation(String),
    #[error("`{0}` is not a nonterminal name (expected a single uppercase letter)")]
    InvalidNonTerminal(String),
    #[error("nonterminal `{0}` has no alternatives")]
    NoAlternatives(char),
    #[error("an alternative of `{0}` is empty, write epsilon instead")]
    EmptyBody(char),
    #[error("nonterminal `{referenced}` used by `{left}` is never defined")]
    UndefinedNonTerminal { left: char, referenced: char },
    #[error("symbol `{symbol}` in an alternative of `{left}` cannot be classified")]
    UnclassifiedSymbol { left: char, symbol: char },
    #[error("epsilon must be the only symbol of an alternative of `{0}`")]
    MisplacedEpsilon(char),
    #[error("end marker `{symbol}` cannot appear in an alternative of `{left}`")]
    EndMarkerInBody { left: char, symbol: char },
}

/// Two productions of the same nonterminal compete for one table cell.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "grammar is not LL(1): `{}` on {lookahead:?} selects both alternative {} and alternative {}",
    .existing.left,
    .existing.alternative,
    .incoming.alternative
)]
pub struct Ll1Conflict {
    pub lookahead: Symbol,
    pub existing: Production,
    pub incoming: Production,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("reserved symbol `{symbol}` at position {position} of the input")]
    ReservedSymbol { symbol: char, position: usize },
    #[error("`{symbol}` at position {position} is not a terminal")]
    NotATerminal { symbol: char, position: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Grammar(#[from] GrammarError),
    #[error(transparent)]
    Conflict(#[from] Ll1Conflict),
    #[error(transparent)]
    Input(#[from] InputError),
}
