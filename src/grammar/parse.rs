use indexmap::IndexMap;

use super::{
    error::GrammarError,
    grammar::{Grammar, Notation},
};

impl Grammar {
    /// Reads the arrow notation, one left side per line:
    ///
    /// ```text
    /// S -> aABb
    /// A -> c | ε
    ///   | d
    /// ```
    pub fn parse(grammar: &str) -> Result<Self, GrammarError> {
        Self::parse_with_notation(grammar, Notation::default())
    }

    pub fn parse_with_notation(grammar: &str, notation: Notation) -> Result<Self, GrammarError> {
        let mut raw_productions: Vec<(char, Vec<&str>)> = Vec::new();

        let mut previous_left: Option<char> = None;
        for (i, line) in grammar.lines().enumerate() {
            if line.chars().all(|c| c.is_whitespace()) {
                continue;
            }
            let syntax = |message: &str| GrammarError::Syntax {
                line: i + 1,
                message: message.to_string(),
            };

            let parts: Vec<&str> = line.split("->").collect();
            if parts.len() > 2 {
                return Err(syntax("too many \"->\""));
            }
            let (left, rights): (char, &str) = if parts.len() == 2 {
                let left_str = parts[0].trim();
                let mut chars = left_str.chars();
                match (chars.next(), chars.next()) {
                    (None, _) => return Err(syntax("empty left side")),
                    (Some(left), None) => (left, parts[1]),
                    (Some(_), Some(_)) => {
                        return Err(syntax("left side must be a single symbol"))
                    }
                }
            } else {
                match (previous_left, parts[0].trim().strip_prefix('|')) {
                    (Some(left), Some(rights)) => (left, rights),
                    (None, _) => return Err(syntax("cannot find left side")),
                    (Some(_), None) => return Err(syntax("expected \"->\" or \"|\"")),
                }
            };

            previous_left = Some(left);
            raw_productions.push((left, rights.split('|').map(str::trim).collect()));
        }

        Self::with_notation(raw_productions, notation)
    }

    /// Reads a JSON object from nonterminal names to alternative bodies,
    /// keeping the key order.
    pub fn from_json(grammar: &str, notation: Notation) -> Result<Self, GrammarError> {
        let map: IndexMap<String, Vec<String>> =
            serde_json::from_str(grammar).map_err(|e| GrammarError::Syntax {
                line: e.line(),
                message: e.to_string(),
            })?;

        let mut productions = Vec::with_capacity(map.len());
        for (left, rights) in map {
            let mut chars = left.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => productions.push((c, rights)),
                _ => return Err(GrammarError::InvalidNonTerminal(left)),
            }
        }
        Self::with_notation(productions, notation)
    }
}

#[cfg(test)]
mod tests {
    use crate::grammar::{Grammar, GrammarError, Notation, Symbol};
    use pretty_assertions::assert_eq;

    #[test]
    fn simple_parse() {
        let g = Grammar::parse("S -> a").unwrap();
        assert_eq!(g.start_symbol(), 'S');
        assert_eq!(g.alternatives('S').unwrap()[0].body, vec![Symbol::Terminal('a')]);
    }

    #[test]
    fn parse_with_space_and_newline() {
        let g = Grammar::parse("  S -> a A \n | b\n\nA -> c | ε").unwrap();
        let s = g.alternatives('S').unwrap();
        assert_eq!(
            s[0].body,
            vec![Symbol::Terminal('a'), Symbol::NonTerminal('A')]
        );
        assert_eq!(s[1].body, vec![Symbol::Terminal('b')]);
        assert!(g.alternatives('A').unwrap()[1].is_epsilon());
    }

    #[test]
    fn empty_parse() {
        assert_eq!(Grammar::parse("  \n  ").unwrap_err(), GrammarError::Empty);
    }

    #[test]
    fn two_rightarrows_parse() {
        assert!(matches!(
            Grammar::parse("S -> a -> b"),
            Err(GrammarError::Syntax { line: 1, .. })
        ));
    }

    #[test]
    fn no_left_parse() {
        assert!(matches!(
            Grammar::parse("-> a"),
            Err(GrammarError::Syntax { line: 1, .. })
        ));
    }

    #[test]
    fn no_previous_left_parse() {
        assert!(matches!(
            Grammar::parse("| a b\n S -> a"),
            Err(GrammarError::Syntax { line: 1, .. })
        ));
    }

    #[test]
    fn multi_character_left_side() {
        assert!(matches!(
            Grammar::parse("S -> a\nExpr -> a"),
            Err(GrammarError::Syntax { line: 2, .. })
        ));
    }

    #[test]
    fn classic_lowercase_epsilon() {
        let notation = Notation {
            epsilon: 'e',
            end_marker: '$',
        };
        let g = Grammar::parse_with_notation(
            "S -> Abc | ad\nA -> gS | Cr | e\nC -> f | p | e",
            notation,
        )
        .unwrap();
        assert!(g.is_nullable('A'));
        assert!(g.recognize("frbc").unwrap().is_accepted());
    }

    #[test]
    fn json_grammar_keeps_key_order() {
        let g = Grammar::from_json(
            r#"{"S": ["aABb"], "A": ["c", "ε"], "B": ["d", "ε"]}"#,
            Notation::default(),
        )
        .unwrap();
        assert_eq!(g.non_terminals().collect::<Vec<_>>(), vec!['S', 'A', 'B']);
        assert!(g.recognize("acdb").unwrap().is_accepted());
    }

    #[test]
    fn json_grammar_errors() {
        assert_eq!(
            Grammar::from_json(r#"{"Expr": ["a"]}"#, Notation::default()).unwrap_err(),
            GrammarError::InvalidNonTerminal("Expr".to_string())
        );
        assert!(matches!(
            Grammar::from_json("[1, 2", Notation::default()),
            Err(GrammarError::Syntax { .. })
        ));
    }
}
