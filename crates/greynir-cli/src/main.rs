//! `greynir`: a thin command-line harness over `greynir-core`,
//! `greynir-dict`, and `greynir-lib` (§6). Exists to exercise the
//! library from a terminal, not as a product surface in its own right.

mod commands;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "greynir", about = "Earley-Scott parser over a compressed Icelandic morphological dictionary")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse pre-tokenized sentences against a compiled grammar and dictionary.
    Parse(commands::parse::ParseArgs),
    /// Compile a text-format grammar and report invariant violations.
    Check(commands::check::CheckArgs),
    /// Print a word's dictionary readings.
    Lookup(commands::lookup::LookupArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let result = match cli.command {
        Command::Parse(args) => commands::parse::run(args),
        Command::Check(args) => commands::check::run(args),
        Command::Lookup(args) => commands::lookup::run(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}
