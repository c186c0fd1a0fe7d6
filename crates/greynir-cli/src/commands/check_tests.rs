use super::check::{run, CheckArgs};

fn write(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn reports_ok_for_a_valid_grammar() {
    let dir = tempfile::tempdir().unwrap();
    let grammar = write(&dir, "g.grammar", "%root Sentence\nSentence -> no_nf so_0\n");

    assert!(run(CheckArgs { grammar }).is_ok());
}

#[test]
fn reports_an_unreachable_nonterminal() {
    let dir = tempfile::tempdir().unwrap();
    let grammar = write(&dir, "g.grammar", "%root Sentence\nSentence -> no_nf\nOrphan -> so_0\n");

    let err = run(CheckArgs { grammar }).unwrap_err();
    assert!(err.contains("Orphan"), "error should name the unreachable nonterminal: {err}");
}

#[test]
fn missing_file_is_an_error() {
    let err = run(CheckArgs { grammar: "/nonexistent/g.grammar".into() }).unwrap_err();
    assert!(err.contains("reading"));
}
