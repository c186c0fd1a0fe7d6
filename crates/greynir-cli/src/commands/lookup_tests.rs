use greynir_dict::{builder, DictEntry};

use super::lookup::{run, LookupArgs};

fn sample_dict(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("dict.bin");
    let entries = vec![DictEntry {
        word_form: "hestur".to_string(),
        stem: "hestur".to_string(),
        word_id: Some(1),
        word_class: "no".to_string(),
        subclass: "alm".to_string(),
        inflection: "NF ET KK".to_string(),
    }];
    builder::build_to_file(&entries, &path).unwrap();
    path
}

#[test]
fn prints_readings_for_a_known_word() {
    let dir = tempfile::tempdir().unwrap();
    let dict = sample_dict(&dir);

    assert!(run(LookupArgs { dict, word: "hestur".to_string() }).is_ok());
}

#[test]
fn reports_no_readings_for_an_unknown_word() {
    let dir = tempfile::tempdir().unwrap();
    let dict = sample_dict(&dir);

    assert!(run(LookupArgs { dict, word: "ekkiorð".to_string() }).is_ok());
}

#[test]
fn missing_file_is_an_error() {
    let err = run(LookupArgs { dict: "/nonexistent/dict.bin".into(), word: "hestur".to_string() }).unwrap_err();
    assert!(!err.is_empty());
}
