//! Property tests for the parser on malformed input.
//!
//! Every input must parse to completion without panicking. Inputs that are
//! known to be broken must come back with at least one diagnostic.

use std::rc::Rc;

use proptest::prelude::*;

use super::parser::parse;
use crate::{errors::errors::Diagnostic, lexer::lexer::scan_all};

const PROGRAM: &str = "func add(a i64, b i64) i64 {\n    return a + b * 2;\n}\n";

const FRAGMENTS: &[&str] = &[
    "func", "return", "main", "x", "i64", "u8", "f64", "bool", "(", ")", "{", "}", "[", "]",
    ",", ";", "+", "-", "*", "/", "<", "<=", "==", "!=", "&", "1", "2.5", "0x1f", "\"s\"",
    "'c'", "\"open", "/*", "//", "@",
];

/// Lexes and parses `source`, returning every diagnostic from both stages.
fn diagnostics_for(source: &str) -> Vec<Diagnostic> {
    let (tokens, mut diagnostics) = scan_all(source.to_string(), Some("fuzz.fr".to_string()));
    let (_, syntactic) = parse(tokens, Rc::new("fuzz.fr".to_string()));

    diagnostics.extend(syntactic);
    diagnostics
}

fn last_brace() -> usize {
    PROGRAM.rfind('}').unwrap_or(PROGRAM.len())
}

fn token_soup() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(FRAGMENTS), 0..60).prop_map(|parts| parts.join(" "))
}

fn proptest_config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

#[test]
fn test_program_itself_is_clean() {
    assert!(diagnostics_for(PROGRAM).is_empty());
}

#[test]
fn test_every_truncation_is_reported() {
    for cut in 1..=last_brace() {
        let prefix = &PROGRAM[..cut];

        assert!(!diagnostics_for(prefix).is_empty(), "no diagnostic for {:?}", prefix);
    }
}

#[test]
fn test_every_single_deletion_terminates() {
    for index in 0..PROGRAM.len() {
        let spliced = format!("{}{}", &PROGRAM[..index], &PROGRAM[index + 1..]);

        diagnostics_for(&spliced);
    }
}

proptest! {
    #![proptest_config(proptest_config())]

    #[test]
    fn parser_never_panics(input in "\\PC{0,300}") {
        diagnostics_for(&input);
    }

    #[test]
    fn token_soup_terminates(input in token_soup()) {
        diagnostics_for(&input);
    }

    #[test]
    fn spliced_program_terminates(start in 0..PROGRAM.len(), length in 0usize..20, insert in token_soup()) {
        let end = (start + length).min(PROGRAM.len());
        let spliced = format!("{}{}{}", &PROGRAM[..start], insert, &PROGRAM[end..]);

        diagnostics_for(&spliced);
    }

    #[test]
    fn missing_delimiter_is_reported(pick in 0usize..6) {
        let delimiters: Vec<usize> = PROGRAM
            .char_indices()
            .filter(|(_, c)| matches!(c, '(' | ')' | '{' | '}'))
            .map(|(index, _)| index)
            .collect();
        let index = delimiters[pick % delimiters.len()];
        let spliced = format!("{}{}", &PROGRAM[..index], &PROGRAM[index + 1..]);

        prop_assert!(!diagnostics_for(&spliced).is_empty(), "no diagnostic for {:?}", spliced);
    }

    #[test]
    fn truncated_soup_program_is_reported(cut in 1usize..=last_brace(), insert in token_soup()) {
        let tail = insert.replace(|c: char| matches!(c, '{' | '}' | ';'), "");
        let source = format!("{}{}", &PROGRAM[..cut], tail);

        prop_assert!(!diagnostics_for(&source).is_empty(), "no diagnostic for {:?}", source);
    }
}
