extern crate wasm_bindgen;

use serde::Serialize;
use wasm_bindgen::prelude::*;

pub mod grammar;
pub use grammar::{Error, Grammar, Notation};

fn to_json<T: Serialize>(result: Result<T, Error>) -> String {
    match result {
        Ok(t) => serde_json::to_string(&t).unwrap_or_default(),
        Err(e) => serde_json::json!({ "error": e.to_string() }).to_string(),
    }
}

#[wasm_bindgen]
pub fn first_follow_to_json(grammar: &str) -> String {
    to_json(
        Grammar::parse(grammar)
            .map(|g| g.to_non_terminal_output_vec())
            .map_err(Error::from),
    )
}

#[wasm_bindgen]
pub fn ll1_table_to_json(grammar: &str) -> String {
    to_json(
        Grammar::parse(grammar)
            .map_err(Error::from)
            .and_then(|g| g.to_ll1_table_output().map_err(Error::from)),
    )
}

#[wasm_bindgen]
pub fn parse_to_json(grammar: &str, input: &str) -> String {
    to_json(
        Grammar::parse(grammar)
            .map_err(Error::from)
            .and_then(|g| {
                let outcome = g.recognize(input)?;
                Ok(g.to_trace_output(input, &outcome))
            }),
    )
}

#[cfg(test)]
mod json_tests {
    use pretty_assertions::assert_eq;

    const TEXTBOOK: &str = "S -> aABb\nA -> c | ε\nB -> d | ε";

    #[test]
    fn first_follow_json() {
        let json: serde_json::Value =
            serde_json::from_str(&crate::first_follow_to_json(TEXTBOOK)).unwrap();
        assert_eq!(json["data"][1]["first"], serde_json::json!(["c", "ε"]));
    }

    #[test]
    fn table_json() {
        let json: serde_json::Value =
            serde_json::from_str(&crate::ll1_table_to_json(TEXTBOOK)).unwrap();
        assert_eq!(
            json["terminals"],
            serde_json::json!(["a", "b", "c", "d", "$"])
        );
        assert_eq!(json["rows"][0][1][0], "S -> aABb");
    }

    #[test]
    fn parse_json() {
        let json: serde_json::Value =
            serde_json::from_str(&crate::parse_to_json(TEXTBOOK, "ab")).unwrap();
        assert_eq!(json["accepted"], true);
        assert_eq!(json["rows"][2]["action"], "A -> ε");
    }

    #[test]
    fn errors_are_reported_as_json() {
        let json: serde_json::Value =
            serde_json::from_str(&crate::first_follow_to_json("S -> aB")).unwrap();
        assert_eq!(
            json["error"],
            "nonterminal `B` used by `S` is never defined"
        );

        let json: serde_json::Value =
            serde_json::from_str(&crate::ll1_table_to_json("S -> aA | aB\nA -> b\nB -> c"))
                .unwrap();
        assert!(json["error"].as_str().unwrap().starts_with("grammar is not LL(1)"));
    }
}
