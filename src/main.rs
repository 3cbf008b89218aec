use std::{io::Read, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use ll1_helper::{Grammar, Notation};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Show {
    /// Productions
    Prod,
    /// Nullable, first and follow
    Sets,
    /// LL(1) parsing table
    Table,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Plain,
    Latex,
    Json,
}

/// Compute FIRST/FOLLOW sets and the LL(1) table of a grammar, then
/// run the predictive parser on each input.
#[derive(Parser, Debug)]
struct Args {
    /// Grammar file in arrow or JSON notation; read from stdin when absent
    grammar: Option<PathBuf>,
    #[clap(short, long, default_values = ["prod", "sets", "table"])]
    show: Vec<Show>,
    #[clap(short, long, default_value = "plain")]
    format: OutputFormat,
    /// A string to recognize; may be repeated
    #[clap(short, long)]
    input: Vec<String>,
    #[clap(long, default_value = "ε")]
    epsilon: char,
    #[clap(long, default_value = "$")]
    end_marker: char,
}

fn read_grammar(args: &Args) -> Result<Grammar> {
    let text = match &args.grammar {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut text = String::new();
            std::io::stdin()
                .lock()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            text
        }
    };

    let notation = Notation {
        epsilon: args.epsilon,
        end_marker: args.end_marker,
    };
    let grammar = if text.trim_start().starts_with('{') {
        Grammar::from_json(&text, notation)
    } else {
        Grammar::parse_with_notation(&text, notation)
    };
    Ok(grammar?)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let g = read_grammar(&args)?;

    for show in &args.show {
        let output = match show {
            Show::Prod => {
                let t = g.to_production_output_vec();
                match args.format {
                    OutputFormat::Plain => t.to_plaintext(),
                    OutputFormat::Latex => t.to_latex(),
                    OutputFormat::Json => serde_json::to_string(&t)?,
                }
            }
            Show::Sets => {
                let t = g.to_non_terminal_output_vec();
                match args.format {
                    OutputFormat::Plain => t.to_plaintext(),
                    OutputFormat::Latex => t.to_latex(),
                    OutputFormat::Json => t.to_json(),
                }
            }
            Show::Table => {
                let t = g.to_ll1_table_output()?;
                match args.format {
                    OutputFormat::Plain => t.to_plaintext(),
                    OutputFormat::Latex => t.to_latex(),
                    OutputFormat::Json => serde_json::to_string(&t)?,
                }
            }
        };
        println!("{}\n", output);
    }

    for input in &args.input {
        let outcome = g.recognize(input)?;
        let t = g.to_trace_output(input, &outcome);
        println!(
            "{}\n",
            match args.format {
                OutputFormat::Plain => t.to_plaintext(),
                OutputFormat::Latex => t.to_latex(),
                OutputFormat::Json => serde_json::to_string(&t)?,
            }
        );
    }

    Ok(())
}
