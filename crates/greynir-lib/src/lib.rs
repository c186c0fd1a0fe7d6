//! Greynir parsing core: an Earley-Scott parser that builds a Shared
//! Packed Parse Forest (§4.4), a three-pass reducer that scores and
//! collapses it to a single best tree (§4.6), and the forest-navigation,
//! matching, and presentation machinery around them.
//!
//! `greynir-core` owns the data model (grammar, tokens, variants);
//! `greynir-dict` owns the compressed morphological dictionary; this
//! crate is the parser itself, grammar-agnostic and dictionary-agnostic
//! except through the [`matcher::TerminalMatcher`] callback a caller
//! supplies.
//!
//! ```
//! use greynir_core::{Grammar, Reading, Token, TokenKind};
//! use greynir_lib::earley;
//! use greynir_lib::matcher::LexicalMatcher;
//!
//! let grammar = Grammar::from_text("%root S\nS -> no_nf\n", "inline").unwrap();
//! let tokens = vec![Token::with_readings(
//!     TokenKind::Word,
//!     "Villi",
//!     vec![Reading::new("Villi", "no", "alm", "NF ET KK")],
//! )];
//!
//! let matcher = LexicalMatcher::new(&tokens, &grammar);
//! let result = earley::parse(&grammar, &tokens, &matcher).expect("should parse");
//! assert_eq!(result.sppf.node(result.root).start, 0);
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod cache;
pub mod dump;
pub mod earley;
pub mod error;
pub mod matcher;
pub mod navigator;
pub mod reducer;
pub mod simple_tree;
pub mod sppf;
pub mod tree;

pub use cache::GrammarCache;
pub use dump::{flat_dump, pretty_print, pretty_print_detailed};
pub use earley::{parse, ParseResult};
pub use error::ParseError;
pub use matcher::{token_matches, TerminalMatcher};
pub use navigator::{ForestNavigator, ForestVisitor};
pub use reducer::{reduce_forest, PreferenceTable, ReduceReport, VerbTable};
pub use simple_tree::{project, NonterminalNameMap, SimpleTree};
pub use sppf::{Label, NodeId, Sppf};
pub use tree::{build_tree, ParseTree};
