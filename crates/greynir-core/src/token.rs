//! Tokens and morphological readings, the parser's input alphabet.

use crate::variant::VariantSet;

/// The broad category a token belongs to, independent of its text.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum TokenKind {
    Word,
    Punctuation,
    Number,
    Percent,
    Date,
    Time,
    Year,
    Ordinal,
    Currency,
    Person,
    Entity,
    SentenceBegin,
    SentenceEnd,
    ParagraphBegin,
    ParagraphEnd,
}

/// One morphological analysis of a token: a lemma, a word class (`no`,
/// `so`, `lo`, ...), a subclass, and an inflection tag decoded into a
/// [`VariantSet`].
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Reading {
    pub lemma: String,
    pub word_class: String,
    pub subclass: String,
    pub variants: VariantSet,
}

impl Reading {
    pub fn new(lemma: impl Into<String>, word_class: impl Into<String>, subclass: impl Into<String>, tag: &str) -> Self {
        Reading {
            lemma: lemma.into(),
            word_class: word_class.into(),
            subclass: subclass.into(),
            variants: VariantSet::parse_tag(tag),
        }
    }
}

/// One position in the token stream handed to the parser.
///
/// A `Word` token with an empty `readings` list is an unknown word: it
/// still occupies a position and may match fallback terminals (such as
/// `sérnafn`) per the matcher's policy (§4.3).
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub readings: Vec<Reading>,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Token { kind, text: text.into(), readings: Vec::new() }
    }

    pub fn with_readings(kind: TokenKind, text: impl Into<String>, readings: Vec<Reading>) -> Self {
        Token { kind, text: text.into(), readings }
    }

    pub fn is_unknown_word(&self) -> bool {
        matches!(self.kind, TokenKind::Word) && self.readings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::Variant;

    #[test]
    fn unknown_word_has_no_readings() {
        let tok = Token::new(TokenKind::Word, "Þorlákur");
        assert!(tok.is_unknown_word());
    }

    #[test]
    fn reading_decodes_tag_into_variants() {
        let r = Reading::new("hestur", "no", "alm", "ÞGF FT KK");
        assert!(r.variants.contains(Variant::Þgf));
        assert!(r.variants.contains(Variant::Ft));
        assert!(r.variants.contains(Variant::Kk));
    }
}
