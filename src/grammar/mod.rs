pub mod error;
pub mod first_follow;
pub mod grammar;
pub mod ll1_parser;
pub mod ll1_table;
pub mod parse;
pub mod pretty_print;

pub use error::{Error, GrammarError, InputError, Ll1Conflict};
pub use grammar::{Grammar, Notation, Production, Symbol, SymbolSet, SymbolSets};
pub use ll1_parser::{Action, ParseOutcome, RejectReason, Rejection, TraceStep, Verdict};
pub use ll1_table::ParsingTable;

pub const EPSILON: char = 'ε';
pub const END_MARK: char = '$';
