use serde::Serialize;
use tracing::{debug, trace};

use super::{
    error::{Error, InputError},
    grammar::{Grammar, Production, Symbol},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Action {
    Match(char),
    Expand(Production),
    Accept,
    Error(RejectReason),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RejectReason {
    /// The table has no alternative for this nonterminal and lookahead.
    NoEntry { non_terminal: char, lookahead: Symbol },
    UnexpectedSymbol { expected: Symbol, found: Symbol },
}

/// One row of a parse trace. Both vectors are snapshots taken before the
/// step is applied; `remaining` always ends with the end marker and
/// `stack` lists the bottom first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceStep {
    pub remaining: Vec<Symbol>,
    pub stack: Vec<Symbol>,
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    pub remaining: Vec<Symbol>,
    pub stack: Vec<Symbol>,
    pub reason: RejectReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Verdict {
    Accepted,
    Rejected(Rejection),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseOutcome {
    pub verdict: Verdict,
    pub trace: Vec<TraceStep>,
}

impl ParseOutcome {
    pub fn is_accepted(&self) -> bool {
        self.verdict == Verdict::Accepted
    }
}

impl Grammar {
    /// Runs the predictive parser over `input`.
    ///
    /// Fails before taking any step when the grammar is not LL(1) or the
    /// input contains a reserved or non-terminal character. Syntax errors
    /// are reported through [`Verdict::Rejected`].
    pub fn recognize(&self, input: &str) -> Result<ParseOutcome, Error> {
        let table = self.parsing_table()?;
        let mut buffer = self.classify_input(input)?;
        buffer.push(Symbol::EndMark);

        let mut stack = vec![Symbol::EndMark, Symbol::NonTerminal(self.start_symbol())];
        let mut position = 0;
        let mut steps = Vec::new();

        let verdict = loop {
            // the end marker is never popped, so the stack is never empty
            let top = stack.last().copied().unwrap_or(Symbol::EndMark);
            let lookahead = buffer[position];
            let remaining = buffer[position..].to_vec();
            let snapshot = stack.clone();

            let action = match (top, lookahead) {
                (Symbol::EndMark, Symbol::EndMark) => Action::Accept,
                (Symbol::Terminal(x), Symbol::Terminal(c)) if x == c => {
                    stack.pop();
                    position += 1;
                    Action::Match(c)
                }
                (Symbol::NonTerminal(nt), _) => match table.get(nt, lookahead) {
                    Some(production) => {
                        stack.pop();
                        if !production.is_epsilon() {
                            stack.extend(production.body.iter().rev().copied());
                        }
                        Action::Expand(production.clone())
                    }
                    None => Action::Error(RejectReason::NoEntry {
                        non_terminal: nt,
                        lookahead,
                    }),
                },
                (expected, found) => Action::Error(RejectReason::UnexpectedSymbol { expected, found }),
            };
            trace!(?remaining, ?snapshot, ?action, "parser step");

            let done = match &action {
                Action::Accept => Some(Verdict::Accepted),
                Action::Error(reason) => Some(Verdict::Rejected(Rejection {
                    remaining: remaining.clone(),
                    stack: snapshot.clone(),
                    reason: reason.clone(),
                })),
                _ => None,
            };
            steps.push(TraceStep {
                remaining,
                stack: snapshot,
                action,
            });
            if let Some(verdict) = done {
                break verdict;
            }
        };

        debug!(
            input,
            accepted = verdict == Verdict::Accepted,
            steps = steps.len(),
            "parse finished"
        );
        Ok(ParseOutcome {
            verdict,
            trace: steps,
        })
    }

    fn classify_input(&self, input: &str) -> Result<Vec<Symbol>, InputError> {
        input
            .chars()
            .enumerate()
            .map(|(position, c)| match self.notation().classify(c) {
                Some(symbol @ Symbol::Terminal(_)) => Ok(symbol),
                Some(Symbol::Epsilon | Symbol::EndMark) => Err(InputError::ReservedSymbol {
                    symbol: c,
                    position,
                }),
                _ => Err(InputError::NotATerminal {
                    symbol: c,
                    position,
                }),
            })
            .collect()
    }

    /// Text of an expansion, e.g. `A -> c`.
    pub fn production_to_string(&self, production: &Production) -> String {
        format!(
            "{} -> {}",
            production.left,
            self.body_to_string(&production.body)
        )
    }
}
