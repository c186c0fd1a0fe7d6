//! `greynir lookup`: print a word's dictionary readings (§4.1, §6).

use std::path::PathBuf;

use clap::Args;

use greynir_dict::Dict;

#[derive(Args)]
pub struct LookupArgs {
    /// Path to a compiled binary dictionary file.
    pub(crate) dict: PathBuf,
    /// The word form to look up.
    pub(crate) word: String,
}

pub fn run(args: LookupArgs) -> Result<(), String> {
    let dict = Dict::open(&args.dict).map_err(|e| e.to_string())?;
    let readings = dict.lookup(&args.word).map_err(|e| e.to_string())?;

    if readings.is_empty() {
        println!("{}: no readings", args.word);
        return Ok(());
    }

    for reading in readings {
        println!("{} {} {} {}", reading.stem, reading.word_class, reading.subclass, reading.inflection);
    }
    Ok(())
}
