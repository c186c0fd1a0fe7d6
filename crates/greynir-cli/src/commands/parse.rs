//! `greynir parse`: load a grammar and dictionary, parse one
//! pre-tokenized sentence per input line, reduce the forest to a single
//! best tree, and print it (§6).

use std::path::PathBuf;

use clap::Args;

use greynir_core::{Reading, Token, TokenKind};
use greynir_dict::Dict;
use greynir_lib::matcher::LexicalMatcher;
use greynir_lib::reducer::{reduce_forest, PreferenceTable, VerbTable};
use greynir_lib::{dump, earley, GrammarCache};

#[derive(Args)]
pub struct ParseArgs {
    /// Path to a compiled binary grammar file.
    pub(crate) grammar: PathBuf,
    /// Path to a compiled binary dictionary file.
    pub(crate) dict: PathBuf,
    /// Path to a file with one whitespace-delimited sentence per line.
    pub(crate) tokens: PathBuf,
    /// Print the compact flat dump (`R1`/`Q0`-delimited) instead of the
    /// indented pretty form.
    #[arg(long)]
    pub(crate) dump: bool,
    /// Show interior binarization nodes normally elided from the pretty form.
    #[arg(long)]
    pub(crate) detailed: bool,
}

fn tokenize(line: &str, dict: &Dict) -> Result<Vec<Token>, String> {
    line.split_whitespace()
        .map(|word| {
            let readings: Vec<Reading> = dict.lookup_readings(word).map_err(|e| e.to_string())?;
            Ok(Token::with_readings(TokenKind::Word, word, readings))
        })
        .collect()
}

pub fn run(args: ParseArgs) -> Result<(), String> {
    let grammar = GrammarCache::shared().get_or_load(&args.grammar).map_err(|e| e.to_string())?;
    let dict = Dict::open(&args.dict).map_err(|e| e.to_string())?;
    let preferences = PreferenceTable::load_default();
    let verbs = VerbTable::load_default();

    let text = std::fs::read_to_string(&args.tokens).map_err(|e| format!("reading {:?}: {e}", args.tokens))?;

    for (line_no, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let tokens = tokenize(line, &dict)?;
        let matcher = LexicalMatcher::new(&tokens, &grammar);
        let mut result = match earley::parse(&grammar, &tokens, &matcher) {
            Ok(result) => result,
            Err(e) => {
                println!("line {}: {e}", line_no + 1);
                continue;
            }
        };

        reduce_forest(&mut result.sppf, &grammar, &tokens, result.root, &preferences, &verbs);

        let rendered = if args.dump {
            dump::flat_dump(&result.sppf, result.root, &grammar, &tokens)
        } else {
            dump::pretty_print_detailed(&result.sppf, result.root, &grammar, &tokens, args.detailed)
        };
        println!("{rendered}");
    }

    Ok(())
}
