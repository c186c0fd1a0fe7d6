//! `greynir check`: compile a text-format grammar and report load-time
//! invariant violations (§4.2, §7).

use std::path::PathBuf;

use clap::Args;

use greynir_core::{Grammar, NonterminalId};

#[derive(Args)]
pub struct CheckArgs {
    /// Path to a `.grammar` text source file.
    pub(crate) grammar: PathBuf,
}

pub fn run(args: CheckArgs) -> Result<(), String> {
    let source = std::fs::read_to_string(&args.grammar).map_err(|e| format!("reading {:?}: {e}", args.grammar))?;
    let source_name = args.grammar.display().to_string();

    match Grammar::from_text(&source, &source_name) {
        Ok(grammar) => {
            let production_count: usize = (0..grammar.nonterminal_count() as u32).map(|i| grammar.productions_of(NonterminalId(i)).count()).sum();
            println!(
                "{source_name}: ok ({} nonterminals, {} terminals, {} productions)",
                grammar.nonterminal_count(),
                grammar.terminal_count(),
                production_count,
            );
            Ok(())
        }
        Err(e) => Err(e.render()),
    }
}
