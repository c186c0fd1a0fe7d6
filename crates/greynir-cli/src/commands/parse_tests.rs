use greynir_core::Grammar;
use greynir_dict::{builder, DictEntry};

use super::parse::{run, ParseArgs};

fn sample_grammar(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("g.bin");
    let grammar = Grammar::from_text("%root Sentence\nSentence -> no_nf_et_kk so_0_gm_fh\n", "test").unwrap();
    std::fs::write(&path, grammar.to_binary_bytes()).unwrap();
    path
}

fn sample_dict(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("d.bin");
    let entries = vec![
        DictEntry {
            word_form: "Villi".to_string(),
            stem: "Villi".to_string(),
            word_id: Some(1),
            word_class: "no".to_string(),
            subclass: "alm".to_string(),
            inflection: "NF ET KK".to_string(),
        },
        DictEntry {
            word_form: "leit".to_string(),
            stem: "líta".to_string(),
            word_id: Some(2),
            word_class: "so".to_string(),
            subclass: "alm".to_string(),
            inflection: "GM FH ÞT".to_string(),
        },
    ];
    builder::build_to_file(&entries, &path).unwrap();
    path
}

fn sample_tokens(dir: &tempfile::TempDir, sentence: &str) -> std::path::PathBuf {
    let path = dir.path().join("tokens.txt");
    std::fs::write(&path, format!("{sentence}\n")).unwrap();
    path
}

#[test]
fn parses_a_valid_sentence_in_pretty_form() {
    let dir = tempfile::tempdir().unwrap();
    let args = ParseArgs {
        grammar: sample_grammar(&dir),
        dict: sample_dict(&dir),
        tokens: sample_tokens(&dir, "Villi leit"),
        dump: false,
        detailed: false,
    };
    assert!(run(args).is_ok());
}

#[test]
fn parses_a_valid_sentence_as_a_flat_dump() {
    let dir = tempfile::tempdir().unwrap();
    let args = ParseArgs {
        grammar: sample_grammar(&dir),
        dict: sample_dict(&dir),
        tokens: sample_tokens(&dir, "Villi leit"),
        dump: true,
        detailed: false,
    };
    assert!(run(args).is_ok());
}

#[test]
fn a_sentence_with_no_parse_does_not_abort_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    let args = ParseArgs {
        grammar: sample_grammar(&dir),
        dict: sample_dict(&dir),
        tokens: sample_tokens(&dir, "leit Villi"),
        dump: false,
        detailed: false,
    };
    assert!(run(args).is_ok());
}

#[test]
fn missing_grammar_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let args = ParseArgs {
        grammar: "/nonexistent/g.bin".into(),
        dict: sample_dict(&dir),
        tokens: sample_tokens(&dir, "Villi leit"),
        dump: false,
        detailed: false,
    };
    assert!(run(args).is_err());
}
