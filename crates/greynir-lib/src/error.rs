//! Errors the parsing core returns to its caller (§7). Only invariant
//! violations are fatal; a failed parse is an ordinary value.

/// §4.4/§7: the parser could not derive the token sequence from the root
/// nonterminal. Carries the earliest token index at which every state set
/// in the Earley recognizer went empty.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("no parse: failed at token {token_index}")]
pub struct ParseError {
    pub token_index: usize,
}

/// §7 "internal invariant violation": an observed SPPF cycle or an
/// out-of-range production index. The core never returns these as
/// values; encountering one is a bug in the core itself, so callers
/// should treat a panic carrying this message as fatal to the process,
/// not as a recoverable `Result`.
pub fn invariant_violation(message: impl std::fmt::Display) -> ! {
    panic!("internal invariant violation: {message}");
}
