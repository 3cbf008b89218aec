use tracing::debug;

use super::grammar::{Productions, Symbol, SymbolSet, SymbolSets};

/// FIRST of a symbol sequence: scan past nullable nonterminals and add
/// epsilon only when every symbol can derive the empty string.
pub fn first_of_sequence(first: &SymbolSets, symbols: &[Symbol]) -> SymbolSet {
    let mut result = SymbolSet::new();
    for symbol in symbols {
        match symbol {
            Symbol::Terminal(_) => {
                result.insert(*symbol);
                return result;
            }
            Symbol::NonTerminal(nt) => {
                let mut nullable = false;
                for s in first.get(nt).into_iter().flatten() {
                    if *s == Symbol::Epsilon {
                        nullable = true;
                    } else {
                        result.insert(*s);
                    }
                }
                if !nullable {
                    return result;
                }
            }
            Symbol::Epsilon => {}
            // never inside a body
            Symbol::EndMark => {
                result.insert(*symbol);
                return result;
            }
        }
    }
    result.insert(Symbol::Epsilon);
    result
}

pub(super) fn calculate_first(productions: &Productions) -> SymbolSets {
    let mut first: SymbolSets = productions
        .keys()
        .map(|&nt| (nt, SymbolSet::new()))
        .collect();

    let mut passes = 0;
    let mut changed = true;
    while changed {
        changed = false;
        passes += 1;
        for (nt, alternatives) in productions {
            for production in alternatives {
                let f = first_of_sequence(&first, &production.body);
                let set = &mut first[nt];
                let before = set.len();
                set.extend(f);
                changed |= set.len() != before;
            }
        }
    }

    debug!(passes, "FIRST sets reached a fixed point");
    first
}

pub(super) fn calculate_follow(
    productions: &Productions,
    first: &SymbolSets,
    start: char,
) -> SymbolSets {
    let mut follow: SymbolSets = productions
        .keys()
        .map(|&nt| (nt, SymbolSet::new()))
        .collect();
    follow[&start].insert(Symbol::EndMark);

    let mut passes = 0;
    let mut changed = true;
    while changed {
        changed = false;
        passes += 1;
        for (left, alternatives) in productions {
            for production in alternatives {
                let mut trailer = follow[left].clone();
                for symbol in production.body.iter().rev() {
                    match symbol {
                        Symbol::NonTerminal(nt) => {
                            let set = &mut follow[nt];
                            let before = set.len();
                            set.extend(trailer.iter().copied());
                            changed |= set.len() != before;

                            let first_nt = &first[nt];
                            let rest = first_nt.iter().filter(|s| **s != Symbol::Epsilon);
                            if first_nt.contains(&Symbol::Epsilon) {
                                trailer.extend(rest);
                            } else {
                                trailer = rest.copied().collect();
                            }
                        }
                        Symbol::Terminal(_) => {
                            trailer = SymbolSet::from([*symbol]);
                        }
                        Symbol::Epsilon | Symbol::EndMark => {}
                    }
                }
            }
        }
    }

    debug!(passes, "FOLLOW sets reached a fixed point");
    follow
}

#[cfg(test)]
mod tests {
    use crate::grammar::grammar::{Grammar, Symbol, SymbolSet};
    use pretty_assertions::assert_eq;

    fn set(symbols: &str) -> SymbolSet {
        symbols
            .chars()
            .map(|c| match c {
                'ε' => Symbol::Epsilon,
                '$' => Symbol::EndMark,
                c => Symbol::Terminal(c),
            })
            .collect()
    }

    fn textbook() -> Grammar {
        Grammar::new([
            ('S', vec!["aABb"]),
            ('A', vec!["c", "ε"]),
            ('B', vec!["d", "ε"]),
        ])
        .unwrap()
    }

    #[test]
    fn first_of_textbook_grammar() {
        let g = textbook();
        assert_eq!(g.first('S'), Some(&set("a")));
        assert_eq!(g.first('A'), Some(&set("cε")));
        assert_eq!(g.first('B'), Some(&set("dε")));
    }

    #[test]
    fn follow_of_textbook_grammar() {
        let g = textbook();
        assert_eq!(g.follow('S'), Some(&set("$")));
        assert_eq!(g.follow('A'), Some(&set("bd")));
        assert_eq!(g.follow('B'), Some(&set("b")));
    }

    #[test]
    fn forward_references_do_not_depend_on_declaration_order() {
        // S needs FIRST(A) before A is visited
        let g = Grammar::new([('S', vec!["Ab"]), ('A', vec!["Bc"]), ('B', vec!["x", "ε"])])
            .unwrap();
        assert_eq!(g.first('S'), Some(&set("cx")));
        assert_eq!(g.first('A'), Some(&set("cx")));
        assert_eq!(g.follow('B'), Some(&set("c")));
        assert_eq!(g.follow('A'), Some(&set("b")));
    }

    #[test]
    fn nullable_prefix_longer_than_two_symbols() {
        let g = Grammar::new([
            ('S', vec!["ABCd"]),
            ('A', vec!["a", "ε"]),
            ('B', vec!["b", "ε"]),
            ('C', vec!["c", "ε"]),
        ])
        .unwrap();
        assert_eq!(g.first('S'), Some(&set("abcd")));
        assert_eq!(g.follow('A'), Some(&set("bcd")));
        assert_eq!(g.follow('B'), Some(&set("cd")));
        assert!(!g.is_nullable('S'));
    }

    #[test]
    fn epsilon_only_when_whole_alternative_is_nullable() {
        let g = Grammar::new([('S', vec!["AB"]), ('A', vec!["a", "ε"]), ('B', vec!["ε"])])
            .unwrap();
        assert_eq!(g.first('S'), Some(&set("aε")));

        let g = Grammar::new([('S', vec!["Ab"]), ('A', vec!["a", "ε"])]).unwrap();
        assert_eq!(g.first('S'), Some(&set("ab")));
    }

    #[test]
    fn mutual_recursion_through_nullable_symbols() {
        let g = Grammar::new([
            ('S', vec!["AS", "b"]),
            ('A', vec!["aA", "ε"]),
        ])
        .unwrap();
        assert_eq!(g.first('A'), Some(&set("aε")));
        assert_eq!(g.first('S'), Some(&set("ab")));
        assert_eq!(g.follow('A'), Some(&set("ab")));
    }

    #[test]
    fn end_marker_follows_start_symbol() {
        let g = Grammar::new([('E', vec!["TX"]), ('X', vec!["pTX", "ε"]), ('T', vec!["i"])])
            .unwrap();
        assert!(g.follow('E').unwrap().contains(&Symbol::EndMark));
        assert_eq!(g.follow('X'), Some(&set("$")));
        assert_eq!(g.follow('T'), Some(&set("p$")));
    }

    #[test]
    fn first_of_sequence_matches_textbook_definition() {
        let g = textbook();
        let seq = [
            Symbol::NonTerminal('A'),
            Symbol::NonTerminal('B'),
            Symbol::Terminal('b'),
        ];
        assert_eq!(g.first_of(&seq), set("bcd"));
        assert_eq!(g.first_of(&seq[..2]), set("cdε"));
        assert_eq!(g.first_of(&[Symbol::Epsilon]), set("ε"));
    }

    #[test]
    fn recomputation_is_deterministic() {
        let (a, b) = (textbook(), textbook());
        assert_eq!(a.first_sets(), b.first_sets());
        assert_eq!(a.follow_sets(), b.follow_sets());
    }
}
