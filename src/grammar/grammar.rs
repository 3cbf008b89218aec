use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{
    error::{GrammarError, Ll1Conflict},
    first_follow,
    ll1_table::ParsingTable,
    END_MARK, EPSILON,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Symbol {
    Terminal(char),
    NonTerminal(char),
    Epsilon,
    EndMark,
}

/// Characters reserved for the empty string and the end of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Notation {
    pub epsilon: char,
    pub end_marker: char,
}

impl Default for Notation {
    fn default() -> Self {
        Self {
            epsilon: EPSILON,
            end_marker: END_MARK,
        }
    }
}

impl Notation {
    pub fn validate(&self) -> Result<(), GrammarError> {
        if self.epsilon == self.end_marker {
            return Err(GrammarError::InvalidNotation(format!(
                "epsilon and end marker are both `{}`",
                self.epsilon
            )));
        }
        for c in [self.epsilon, self.end_marker] {
            if c.is_ascii_uppercase() {
                return Err(GrammarError::InvalidNotation(format!(
                    "`{}` would shadow a nonterminal",
                    c
                )));
            }
        }
        Ok(())
    }

    pub fn classify(&self, c: char) -> Option<Symbol> {
        if c == self.epsilon {
            Some(Symbol::Epsilon)
        } else if c == self.end_marker {
            Some(Symbol::EndMark)
        } else if c.is_ascii_uppercase() {
            Some(Symbol::NonTerminal(c))
        } else if c.is_ascii_lowercase() {
            Some(Symbol::Terminal(c))
        } else {
            None
        }
    }

    pub fn symbol_char(&self, symbol: Symbol) -> char {
        match symbol {
            Symbol::Terminal(c) | Symbol::NonTerminal(c) => c,
            Symbol::Epsilon => self.epsilon,
            Symbol::EndMark => self.end_marker,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Production {
    pub left: char,
    /// Position among the alternatives of `left`.
    pub alternative: usize,
    pub body: Vec<Symbol>,
}

impl Production {
    pub fn is_epsilon(&self) -> bool {
        self.body == [Symbol::Epsilon]
    }
}

pub type Productions = IndexMap<char, Vec<Production>>;
pub type SymbolSet = BTreeSet<Symbol>;
pub type SymbolSets = IndexMap<char, SymbolSet>;

#[derive(Debug, Clone)]
pub struct Grammar {
    notation: Notation,
    start: char,
    productions: Productions,
    terminals: BTreeSet<char>,
    first: SymbolSets,
    follow: SymbolSets,
    table: Result<ParsingTable, Ll1Conflict>,
}

impl Grammar {
    /// Builds a grammar from `(nonterminal, alternatives)` pairs; the first
    /// nonterminal is the start symbol.
    pub fn new<I, S>(productions: I) -> Result<Self, GrammarError>
    where
        I: IntoIterator<Item = (char, Vec<S>)>,
        S: AsRef<str>,
    {
        Self::with_notation(productions, Notation::default())
    }

    pub fn with_notation<I, S>(productions: I, notation: Notation) -> Result<Self, GrammarError>
    where
        I: IntoIterator<Item = (char, Vec<S>)>,
        S: AsRef<str>,
    {
        notation.validate()?;

        let mut raw: IndexMap<char, Vec<S>> = IndexMap::new();
        for (left, rights) in productions {
            if notation.classify(left) != Some(Symbol::NonTerminal(left)) {
                return Err(GrammarError::InvalidNonTerminal(left.to_string()));
            }
            raw.entry(left).or_default().extend(rights);
        }
        let start = match raw.keys().next() {
            Some(&start) => start,
            None => return Err(GrammarError::Empty),
        };

        let mut classified = Productions::new();
        let mut terminals = BTreeSet::new();
        for (&left, rights) in &raw {
            if rights.is_empty() {
                return Err(GrammarError::NoAlternatives(left));
            }
            let mut alternatives = Vec::with_capacity(rights.len());
            for (alternative, right) in rights.iter().enumerate() {
                let body = classify_body(&notation, &raw, left, right.as_ref())?;
                terminals.extend(body.iter().filter_map(|s| match s {
                    Symbol::Terminal(c) => Some(*c),
                    _ => None,
                }));
                alternatives.push(Production {
                    left,
                    alternative,
                    body,
                });
            }
            classified.insert(left, alternatives);
        }

        Ok(Self::from_productions(notation, start, classified, terminals))
    }

    fn from_productions(
        notation: Notation,
        start: char,
        productions: Productions,
        terminals: BTreeSet<char>,
    ) -> Self {
        let first = first_follow::calculate_first(&productions);
        let follow = first_follow::calculate_follow(&productions, &first, start);
        let table = ParsingTable::build(&productions, &first, &follow, &terminals);

        Self {
            notation,
            start,
            productions,
            terminals,
            first,
            follow,
            table,
        }
    }

    pub fn notation(&self) -> &Notation {
        &self.notation
    }

    pub fn start_symbol(&self) -> char {
        self.start
    }

    pub fn non_terminals(&self) -> impl Iterator<Item = char> + '_ {
        self.productions.keys().copied()
    }

    pub fn terminals(&self) -> impl Iterator<Item = char> + '_ {
        self.terminals.iter().copied()
    }

    pub fn productions(&self) -> &Productions {
        &self.productions
    }

    pub fn alternatives(&self, non_terminal: char) -> Option<&[Production]> {
        self.productions.get(&non_terminal).map(|v| v.as_slice())
    }

    pub fn first_sets(&self) -> &SymbolSets {
        &self.first
    }

    pub fn follow_sets(&self) -> &SymbolSets {
        &self.follow
    }

    pub fn first(&self, non_terminal: char) -> Option<&SymbolSet> {
        self.first.get(&non_terminal)
    }

    pub fn follow(&self, non_terminal: char) -> Option<&SymbolSet> {
        self.follow.get(&non_terminal)
    }

    pub fn is_nullable(&self, non_terminal: char) -> bool {
        self.first(non_terminal)
            .map_or(false, |first| first.contains(&Symbol::Epsilon))
    }

    /// FIRST of an arbitrary symbol sequence under this grammar's sets.
    pub fn first_of(&self, symbols: &[Symbol]) -> SymbolSet {
        first_follow::first_of_sequence(&self.first, symbols)
    }

    pub fn parsing_table(&self) -> Result<&ParsingTable, Ll1Conflict> {
        self.table.as_ref().map_err(Clone::clone)
    }

    pub fn symbol_char(&self, symbol: Symbol) -> char {
        self.notation.symbol_char(symbol)
    }

    pub fn body_to_string(&self, body: &[Symbol]) -> String {
        body.iter().map(|s| self.symbol_char(*s)).collect()
    }
}

fn classify_body<S>(
    notation: &Notation,
    declared: &IndexMap<char, Vec<S>>,
    left: char,
    right: &str,
) -> Result<Vec<Symbol>, GrammarError> {
    let mut body = Vec::new();
    for c in right.chars().filter(|c| !c.is_whitespace()) {
        let symbol = match notation.classify(c) {
            Some(Symbol::EndMark) => {
                return Err(GrammarError::EndMarkerInBody { left, symbol: c })
            }
            Some(Symbol::NonTerminal(n)) if !declared.contains_key(&n) => {
                return Err(GrammarError::UndefinedNonTerminal {
                    left,
                    referenced: n,
                })
            }
            Some(symbol) => symbol,
            None => return Err(GrammarError::UnclassifiedSymbol { left, symbol: c }),
        };
        body.push(symbol);
    }

    if body.is_empty() {
        return Err(GrammarError::EmptyBody(left));
    }
    if body.len() > 1 && body.contains(&Symbol::Epsilon) {
        return Err(GrammarError::MisplacedEpsilon(left));
    }
    Ok(body)
}
