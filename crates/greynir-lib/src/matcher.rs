//! §4.3: decide whether a token's readings license a given terminal.
//!
//! The Design Notes ask for a trait the parser accepts directly instead of
//! an integer-handle callback; [`TerminalMatcher`] is that trait, and
//! [`LexicalMatcher`] is the standard implementation backed by a token
//! slice. Matching a reading against a terminal is a single `VariantSet`
//! subset test (`is_subset_of`), per the Design Notes' bitset guidance.

use greynir_core::{Reading, Terminal, TerminalId, Token, TokenKind, Variant};

/// §4.4's match callback, as a trait rather than a C-ABI handle (Design
/// Notes: "prefer a trait/interface that the parser accepts directly").
/// `matches` must be side-effect-free with respect to parser state so
/// that repeated and out-of-order calls are safe.
pub trait TerminalMatcher {
    fn matches(&self, token_index: usize, terminal: TerminalId) -> bool;
}

/// Terminal names that are themselves a specific word form rather than a
/// BÍN category tag; they resolve to the category that word actually
/// belongs to (§4.3 policy 1).
const CATEGORY_ALIASES: &[(&str, &str)] = &[("sá", "fn"), ("vera", "so"), ("hver", "st")];

fn resolve_alias(first: &str) -> &str {
    CATEGORY_ALIASES.iter().find(|(name, _)| *name == first).map(|(_, cat)| *cat).unwrap_or(first)
}

/// Verb forms that are rejected unless the terminal explicitly asks for
/// them (§4.3 policy 3).
const UNDESIRABLE_VERB_FORMS: &[Variant] = &[Variant::Bh, Variant::Sagnb, Variant::Lhþt];

fn is_undesirable(reading: &Reading, terminal: &Terminal) -> bool {
    if terminal.first != "so" {
        return false;
    }
    UNDESIRABLE_VERB_FORMS.iter().any(|v| reading.variants.contains(*v) && !terminal.has_variant(*v))
}

/// Whether `reading` satisfies `terminal` on its own (ignoring the
/// token's kind; callers have already established `reading` belongs to
/// a `Word` token).
pub fn reading_matches(reading: &Reading, terminal: &Terminal) -> bool {
    if terminal.is_literal() {
        return false;
    }
    let required_class = resolve_alias(&terminal.first);
    if reading.word_class != required_class {
        return false;
    }
    if is_undesirable(reading, terminal) {
        return false;
    }
    // Verb arity and object case-government are valence properties
    // resolved by the reducer's verb table (§4.6): BÍN's inflection tag
    // never carries them (a finite verb reading has no case of its
    // own), so both are excluded from the matcher's variant subset test.
    let mut required = terminal.variants.without(Variant::Arity0).without(Variant::Arity1).without(Variant::Arity2);
    if terminal.first == "so" {
        for case in [Variant::Nf, Variant::Þf, Variant::Þgf, Variant::Ef] {
            required = required.without(case);
        }
    }
    required.is_subset_of(reading.variants)
}

/// Non-`Word` token kinds map to a fixed terminal category, independent
/// of variants (these tokens never carry BÍN readings).
fn kind_category(kind: TokenKind) -> Option<&'static str> {
    match kind {
        TokenKind::Number => Some("tala"),
        TokenKind::Percent => Some("prósenta"),
        TokenKind::Date => Some("dagsetning"),
        TokenKind::Time => Some("tími"),
        TokenKind::Year => Some("ártal"),
        TokenKind::Ordinal => Some("raðtala"),
        TokenKind::Currency => Some("gjaldmiðill"),
        TokenKind::Person => Some("mannsnafn"),
        TokenKind::Entity => Some("sérnafn"),
        TokenKind::Word
        | TokenKind::Punctuation
        | TokenKind::SentenceBegin
        | TokenKind::SentenceEnd
        | TokenKind::ParagraphBegin
        | TokenKind::ParagraphEnd => None,
    }
}

/// Whether `token` licenses `terminal`, independent of position (the
/// free function `LexicalMatcher::matches` delegates to).
pub fn token_matches(token: &Token, terminal: &Terminal) -> bool {
    if terminal.is_literal() {
        let literal = terminal.name.trim_matches(|c| c == '"' || c == '\'');
        return token.text.eq_ignore_ascii_case(literal);
    }

    if let Some(category) = kind_category(token.kind) {
        // A numeral etc. may also carry readings (e.g. spelled-out
        // numbers look up as `no`/`töl` in the dictionary); either a
        // kind match or a reading match is sufficient.
        if terminal.first == category {
            return true;
        }
    }

    match token.kind {
        TokenKind::Word => {
            if token.readings.is_empty() {
                // Unknown word: falls back to the proper-noun terminal
                // only (§4.3, §7 "unknown/unmapped token").
                return terminal.first == "sérnafn";
            }
            token.readings.iter().any(|r| reading_matches(r, terminal))
        }
        _ => token.readings.iter().any(|r| reading_matches(r, terminal)),
    }
}

/// The standard [`TerminalMatcher`]: a pure function of a token slice and
/// the grammar's terminal table.
pub struct LexicalMatcher<'a> {
    tokens: &'a [Token],
    grammar: &'a greynir_core::Grammar,
}

impl<'a> LexicalMatcher<'a> {
    pub fn new(tokens: &'a [Token], grammar: &'a greynir_core::Grammar) -> Self {
        LexicalMatcher { tokens, grammar }
    }
}

impl TerminalMatcher for LexicalMatcher<'_> {
    fn matches(&self, token_index: usize, terminal: TerminalId) -> bool {
        let Some(token) = self.tokens.get(token_index) else { return false };
        token_matches(token, self.grammar.terminal(terminal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use greynir_core::Grammar;

    fn grammar() -> Grammar {
        Grammar::from_text("Sentence -> no_nf_et_kk so_1_þf\n", "test").unwrap()
    }

    #[test]
    fn noun_reading_matches_case_number_gender() {
        let g = grammar();
        let hestur = Token::with_readings(TokenKind::Word, "hestur", vec![Reading::new("hestur", "no", "alm", "NF ET KK")]);
        let terminal = g.terminal(greynir_core::TerminalId(1));
        assert!(token_matches(&hestur, terminal));
    }

    #[test]
    fn wrong_case_does_not_match() {
        let g = grammar();
        let hesti = Token::with_readings(TokenKind::Word, "hesti", vec![Reading::new("hestur", "no", "alm", "ÞGF ET KK")]);
        let terminal = g.terminal(greynir_core::TerminalId(1));
        assert!(!token_matches(&hesti, terminal));
    }

    #[test]
    fn unknown_word_falls_back_to_sernafn() {
        let g = Grammar::from_text("Sentence -> sérnafn\n", "test").unwrap();
        let unknown = Token::new(TokenKind::Word, "Þorlákur");
        let terminal = g.terminal(greynir_core::TerminalId(1));
        assert!(token_matches(&unknown, terminal));
    }

    #[test]
    fn literal_terminal_matches_text_case_insensitively() {
        let g = Grammar::from_text("Sentence -> \"og\"\n", "test").unwrap();
        let tok = Token::new(TokenKind::Word, "Og");
        let terminal = g.terminal(greynir_core::TerminalId(1));
        assert!(token_matches(&tok, terminal));
    }

    #[test]
    fn undesirable_verb_form_rejected_unless_requested() {
        let g = Grammar::from_text("Sentence -> so_1_þf | so_1_þf_bh\n", "test").unwrap();
        let reading = Reading::new("taka", "so", "alm", "BH GM ÞF");
        let tok = Token::with_readings(TokenKind::Word, "tak", vec![reading]);
        let plain = g.terminal(greynir_core::TerminalId(1));
        let bh = g.terminal(greynir_core::TerminalId(2));
        assert!(!token_matches(&tok, plain));
        assert!(token_matches(&tok, bh));
    }
}
