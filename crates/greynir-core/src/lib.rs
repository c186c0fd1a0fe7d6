//! Grammar and token data structures shared by the Greynir parsing core.
//!
//! This crate owns the data model (§3): nonterminals, terminals,
//! productions, a loaded [`Grammar`], the [`Token`]/[`Reading`] input
//! alphabet, and the morphological variant bitset both the matcher and the
//! reducer read. It has no parsing logic of its own; `greynir-lib` and
//! `greynir-dict` consume these types.
//!
//! ```
//! use greynir_core::Grammar;
//!
//! let grammar = Grammar::from_text(
//!     "Sentence -> no_nf so_1_nf\n",
//!     "inline",
//! ).unwrap();
//! assert_eq!(grammar.nonterminal(grammar.root).name, "Sentence");
//! ```

mod error;
mod grammar;
mod interner;
#[cfg(test)]
mod interner_tests;
mod symbol_ids;
mod token;
mod variant;

pub use error::GrammarError;
pub use grammar::{Grammar, Nonterminal, Production, Terminal};
pub use interner::{Interner, Symbol};
pub use symbol_ids::{GrammarSymbol, NonterminalId, ProductionId, TerminalId};
pub use token::{Reading, Token, TokenKind};
pub use variant::{Variant, VariantSet};
