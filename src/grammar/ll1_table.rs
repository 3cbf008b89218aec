use std::collections::{BTreeMap, BTreeSet};

use indexmap::IndexMap;
use tracing::{debug, warn};

use super::{
    error::Ll1Conflict,
    first_follow::first_of_sequence,
    grammar::{Production, Productions, Symbol, SymbolSets},
};

/// Predictive parsing table: (nonterminal, lookahead) to the alternative to
/// expand. Missing cells are syntax errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsingTable {
    columns: Vec<Symbol>,
    rows: IndexMap<char, BTreeMap<Symbol, Production>>,
}

impl ParsingTable {
    pub(super) fn build(
        productions: &Productions,
        first: &SymbolSets,
        follow: &SymbolSets,
        terminals: &BTreeSet<char>,
    ) -> Result<Self, Ll1Conflict> {
        let columns: Vec<Symbol> = terminals
            .iter()
            .map(|&t| Symbol::Terminal(t))
            .chain(std::iter::once(Symbol::EndMark))
            .collect();

        let mut rows = IndexMap::new();
        for (&left, alternatives) in productions {
            let mut row: BTreeMap<Symbol, Production> = BTreeMap::new();
            for production in alternatives {
                let first_p = first_of_sequence(first, &production.body);
                for &t in first_p.iter().filter(|s| **s != Symbol::Epsilon) {
                    insert(&mut row, t, production)?;
                }
                if first_p.contains(&Symbol::Epsilon) {
                    for &t in &follow[&left] {
                        insert(&mut row, t, production)?;
                    }
                }
            }
            rows.insert(left, row);
        }

        debug!(
            cells = rows.values().map(BTreeMap::len).sum::<usize>(),
            "built LL(1) table"
        );
        Ok(Self { columns, rows })
    }

    pub fn get(&self, non_terminal: char, lookahead: Symbol) -> Option<&Production> {
        self.rows.get(&non_terminal)?.get(&lookahead)
    }

    /// Sorted terminals followed by the end marker.
    pub fn columns(&self) -> &[Symbol] {
        &self.columns
    }

    pub fn non_terminals(&self) -> impl Iterator<Item = char> + '_ {
        self.rows.keys().copied()
    }

    /// Each row with one entry per column, `None` for an empty cell.
    pub fn rows(&self) -> impl Iterator<Item = (char, Vec<Option<&Production>>)> + '_ {
        self.rows.iter().map(move |(&left, row)| {
            (
                left,
                self.columns.iter().map(|c| row.get(c)).collect::<Vec<_>>(),
            )
        })
    }
}

fn insert(
    row: &mut BTreeMap<Symbol, Production>,
    lookahead: Symbol,
    production: &Production,
) -> Result<(), Ll1Conflict> {
    match row.get(&lookahead) {
        Some(existing) if existing != production => {
            warn!(
                non_terminal = %production.left,
                ?lookahead,
                "LL(1) conflict"
            );
            Err(Ll1Conflict {
                lookahead,
                existing: existing.clone(),
                incoming: production.clone(),
            })
        }
        Some(_) => Ok(()),
        None => {
            row.insert(lookahead, production.clone());
            Ok(())
        }
    }
}
