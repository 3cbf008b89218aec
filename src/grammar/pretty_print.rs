use crowbook_text_processing::escape;
use serde::Serialize;

use super::{
    error::Ll1Conflict,
    grammar::{Grammar, Symbol},
    ll1_parser::{Action, ParseOutcome, RejectReason, Verdict},
    EPSILON,
};

fn columns_to_plaintext(output: &[Vec<String>]) -> String {
    let columns = output.iter().map(|line| line.len()).max().unwrap_or(0);
    let width: Vec<usize> = (0..columns)
        .map(|j| {
            output
                .iter()
                .filter_map(|line| line.get(j))
                .map(|s| s.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    output
        .iter()
        .map(|line| {
            line.iter()
                .enumerate()
                .map(|(i, s)| format!("{:>width$}", s, width = width[i]))
                .collect::<Vec<_>>()
                .join(" | ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn tex(s: &str) -> String {
    escape::tex(s).replace(EPSILON, r"$\epsilon$")
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductionOutput {
    pub left: char,
    pub rights: Vec<String>,
}

impl ProductionOutput {
    pub fn to_plaintext(&self) -> String {
        format!("{} -> {}", self.left, self.rights.join(" | "))
    }

    pub fn to_latex(&self) -> String {
        let right = self
            .rights
            .iter()
            .map(|right| tex(right))
            .collect::<Vec<_>>()
            .join(r" \mid ");
        format!(r"{} & \rightarrow & {}", self.left, right)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductionOutputVec {
    productions: Vec<ProductionOutput>,
}

impl ProductionOutputVec {
    pub fn to_plaintext(&self) -> String {
        self.productions
            .iter()
            .map(|p| p.to_plaintext())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_latex(&self) -> String {
        std::iter::once(r"\[\begin{array}{cll}".to_string())
            .chain(self.productions.iter().map(|p| p.to_latex()))
            .collect::<Vec<_>>()
            .join("\\\\\n")
            + "\n\\end{array}\\]"
    }
}

#[derive(Debug, Clone, Serialize)]
struct NonTerminalOutput {
    name: char,
    nullable: bool,
    first: Vec<String>,
    follow: Vec<String>,
}

impl NonTerminalOutput {
    fn to_latex(&self) -> String {
        fn f(a: &[String]) -> String {
            a.iter().map(|s| tex(s)).collect::<Vec<_>>().join(r"\ ")
        }

        format!(
            "{} & {} & {} & {}",
            self.name,
            self.nullable,
            f(&self.first),
            f(&self.follow)
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NonTerminalOutputVec {
    data: Vec<NonTerminalOutput>,
}

impl NonTerminalOutputVec {
    pub fn to_plaintext(&self) -> String {
        let mut output = vec![vec![
            "Symbol".to_string(),
            "Nullable".to_string(),
            "First".to_string(),
            "Follow".to_string(),
        ]];
        output.extend(self.data.iter().map(|nt| {
            vec![
                nt.name.to_string(),
                nt.nullable.to_string(),
                nt.first.join(", "),
                nt.follow.join(", "),
            ]
        }));
        columns_to_plaintext(&output)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn to_latex(&self) -> String {
        let content = self
            .data
            .iter()
            .map(|e| e.to_latex())
            .collect::<Vec<_>>()
            .join("\\\\\n");

        "\\begin{tabular}{c|c|c|c}\n".to_string()
            + "Symbol & Nullable & First & Follow\\\\\\hline\n"
            + &content
            + "\\\\\n\\end{tabular}"
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LL1TableOutput {
    terminals: Vec<String>,
    /// One cell per terminal column; empty string for no entry.
    rows: Vec<(char, Vec<String>)>,
}

impl LL1TableOutput {
    pub fn to_plaintext(&self) -> String {
        let mut header = vec![String::new()];
        header.extend(self.terminals.iter().cloned());
        let mut output = vec![header];
        for (left, row) in &self.rows {
            let mut line = vec![left.to_string()];
            line.extend(row.iter().cloned());
            output.push(line);
        }
        columns_to_plaintext(&output)
    }

    pub fn to_latex(&self) -> String {
        let mut header = vec![format!(
            "\\[\\begin{{array}}{{c{}}}\n",
            "|l".repeat(self.terminals.len())
        )];
        header.extend(self.terminals.iter().map(|t| format!("\\text{{{}}}", tex(t))));

        let content = self
            .rows
            .iter()
            .map(|(left, row)| {
                std::iter::once(left.to_string())
                    .chain(row.iter().map(|cell| tex(cell)))
                    .collect::<Vec<_>>()
                    .join(" & ")
            })
            .collect::<Vec<_>>()
            .join("\\\\\n");

        header.join(" & ") + "\\\\\\hline\n" + &content + "\n\\end{array}\\]"
    }
}

#[derive(Debug, Clone, Serialize)]
struct TraceRowOutput {
    buffer: String,
    stack: String,
    action: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TraceOutput {
    input: String,
    accepted: bool,
    rows: Vec<TraceRowOutput>,
}

impl TraceOutput {
    pub fn to_plaintext(&self) -> String {
        let mut output = vec![vec![
            "Buffer".to_string(),
            "Stack".to_string(),
            "Action".to_string(),
        ]];
        output.extend(
            self.rows
                .iter()
                .map(|r| vec![r.buffer.clone(), r.stack.clone(), r.action.clone()]),
        );
        format!(
            "{}\n{}: {}",
            columns_to_plaintext(&output),
            self.input,
            if self.accepted { "accepted" } else { "rejected" }
        )
    }

    pub fn to_latex(&self) -> String {
        let content = self
            .rows
            .iter()
            .map(|r| {
                format!(
                    "{} & {} & {}",
                    tex(&r.buffer),
                    tex(&r.stack),
                    tex(&r.action)
                )
            })
            .collect::<Vec<_>>()
            .join("\\\\\n");

        "\\begin{tabular}{r|l|l}\n".to_string()
            + "Buffer & Stack & Action\\\\\\hline\n"
            + &content
            + "\\\\\n\\end{tabular}"
    }
}

impl Grammar {
    fn symbols_to_strings<'a>(&self, symbols: impl IntoIterator<Item = &'a Symbol>) -> Vec<String> {
        symbols
            .into_iter()
            .map(|s| self.symbol_char(*s).to_string())
            .collect()
    }

    pub fn to_production_output_vec(&self) -> ProductionOutputVec {
        let productions = self
            .productions()
            .iter()
            .map(|(&left, alternatives)| ProductionOutput {
                left,
                rights: alternatives
                    .iter()
                    .map(|p| self.body_to_string(&p.body))
                    .collect(),
            })
            .collect();
        ProductionOutputVec { productions }
    }

    pub fn to_non_terminal_output_vec(&self) -> NonTerminalOutputVec {
        let data = self
            .non_terminals()
            .map(|nt| NonTerminalOutput {
                name: nt,
                nullable: self.is_nullable(nt),
                first: self.symbols_to_strings(self.first(nt).into_iter().flatten()),
                follow: self.symbols_to_strings(self.follow(nt).into_iter().flatten()),
            })
            .collect();
        NonTerminalOutputVec { data }
    }

    pub fn to_ll1_table_output(&self) -> Result<LL1TableOutput, Ll1Conflict> {
        let table = self.parsing_table()?;
        let rows = table
            .rows()
            .map(|(left, row)| {
                (
                    left,
                    row.into_iter()
                        .map(|cell| {
                            cell.map(|p| self.production_to_string(p))
                                .unwrap_or_default()
                        })
                        .collect(),
                )
            })
            .collect();
        Ok(LL1TableOutput {
            terminals: self.symbols_to_strings(table.columns()),
            rows,
        })
    }

    pub fn action_to_string(&self, action: &Action) -> String {
        match action {
            Action::Match(c) => format!("match {}", c),
            Action::Expand(production) => self.production_to_string(production),
            Action::Accept => "accept".to_string(),
            Action::Error(RejectReason::NoEntry {
                non_terminal,
                lookahead,
            }) => format!(
                "error: no entry for {} on {}",
                non_terminal,
                self.symbol_char(*lookahead)
            ),
            Action::Error(RejectReason::UnexpectedSymbol { expected, found }) => format!(
                "error: expected {}, found {}",
                self.symbol_char(*expected),
                self.symbol_char(*found)
            ),
        }
    }

    pub fn to_trace_output(&self, input: &str, outcome: &ParseOutcome) -> TraceOutput {
        let rows = outcome
            .trace
            .iter()
            .map(|step| TraceRowOutput {
                buffer: self.body_to_string(&step.remaining),
                stack: self.body_to_string(&step.stack),
                action: self.action_to_string(&step.action),
            })
            .collect();
        TraceOutput {
            input: input.to_string(),
            accepted: outcome.verdict == Verdict::Accepted,
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::grammar::Grammar;
    use pretty_assertions::assert_eq;

    fn textbook() -> Grammar {
        Grammar::parse("S -> aABb\nA -> c | ε\nB -> d | ε").unwrap()
    }

    #[test]
    fn productions_plaintext() {
        assert_eq!(
            textbook().to_production_output_vec().to_plaintext(),
            "S -> aABb\nA -> c | ε\nB -> d | ε"
        );
    }

    #[test]
    fn sets_plaintext() {
        assert_eq!(
            textbook().to_non_terminal_output_vec().to_plaintext(),
            [
                "Symbol | Nullable | First | Follow",
                "     S |    false |     a |      $",
                "     A |     true |  c, ε |   b, d",
                "     B |     true |  d, ε |      b",
            ]
            .join("\n")
        );
    }

    #[test]
    fn sets_json() {
        assert_eq!(
            textbook().to_non_terminal_output_vec().to_json(),
            r#"{"data":[{"name":"S","nullable":false,"first":["a"],"follow":["$"]},{"name":"A","nullable":true,"first":["c","ε"],"follow":["b","d"]},{"name":"B","nullable":true,"first":["d","ε"],"follow":["b"]}]}"#
        );
    }

    #[test]
    fn table_plaintext() {
        let g = textbook();
        let text = g.to_ll1_table_output().unwrap().to_plaintext();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].ends_with("| $"));
        assert!(lines[1].contains("S -> aABb"));
        assert!(lines[2].contains("A -> ε"));
    }

    #[test]
    fn trace_plaintext() {
        let g = textbook();
        let outcome = g.recognize("acx").unwrap();
        let text = g.to_trace_output("acx", &outcome).to_plaintext();
        assert!(text.starts_with("Buffer"));
        assert!(text.contains("error: no entry for B on x"));
        assert!(text.ends_with("acx: rejected"));
    }

    #[test]
    fn latex_escapes_epsilon() {
        let latex = textbook().to_production_output_vec().to_latex();
        assert!(latex.contains(r"c \mid $\epsilon$"));
    }
}
