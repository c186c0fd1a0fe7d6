//! Morphological variant categories and the bitset used to test them.
//!
//! A terminal name such as `so_2_þgf_nh` carries a `first` category (`so`)
//! and a handful of variant tags (`2`, `þgf`, `nh`). A dictionary reading's
//! inflection tag is a space-separated string of the same vocabulary (BÍN
//! codes). Representing both sides as a `VariantSet` bitset turns "does this
//! reading satisfy this terminal" into a single subset test instead of
//! repeated substring search.

/// One morphological variant tag drawn from the BÍN code vocabulary.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum Variant {
    // Case
    Nf,
    Þf,
    Þgf,
    Ef,
    // Number
    Et,
    Ft,
    // Gender
    Kk,
    Kvk,
    Hk,
    // Person
    P1,
    P2,
    P3,
    // Mood / verb form
    Fh,
    Vh,
    Bh,
    Sagnb,
    Lh,
    Lhþt,
    Nh,
    // Voice
    Gm,
    Mm,
    // Tense
    Nt,
    Þt,
    // Degree
    Mst,
    Esb,
    Evb,
    Fsb,
    Vb,
    Sb,
    // Verb argument arity
    Arity0,
    Arity1,
    Arity2,
    // Misc
    Op,
    Subj,
    NoCase,
    Gr,
    Abbrev,
    Nhm,
}

const ALL_VARIANTS: &[(Variant, &str)] = &[
    (Variant::Nf, "nf"),
    (Variant::Þf, "þf"),
    (Variant::Þgf, "þgf"),
    (Variant::Ef, "ef"),
    (Variant::Et, "et"),
    (Variant::Ft, "ft"),
    (Variant::Kk, "kk"),
    (Variant::Kvk, "kvk"),
    (Variant::Hk, "hk"),
    (Variant::P1, "p1"),
    (Variant::P2, "p2"),
    (Variant::P3, "p3"),
    (Variant::Fh, "fh"),
    (Variant::Vh, "vh"),
    (Variant::Bh, "bh"),
    (Variant::Sagnb, "sagnb"),
    (Variant::Lh, "lh"),
    (Variant::Lhþt, "lhþt"),
    (Variant::Nh, "nh"),
    (Variant::Gm, "gm"),
    (Variant::Mm, "mm"),
    (Variant::Nt, "nt"),
    (Variant::Þt, "þt"),
    (Variant::Mst, "mst"),
    (Variant::Esb, "esb"),
    (Variant::Evb, "evb"),
    (Variant::Fsb, "fsb"),
    (Variant::Vb, "vb"),
    (Variant::Sb, "sb"),
    (Variant::Arity0, "0"),
    (Variant::Arity1, "1"),
    (Variant::Arity2, "2"),
    (Variant::Op, "op"),
    (Variant::Subj, "subj"),
    (Variant::NoCase, "none"),
    (Variant::Gr, "gr"),
    (Variant::Abbrev, "abbrev"),
    (Variant::Nhm, "nhm"),
];

impl Variant {
    pub fn from_code(code: &str) -> Option<Variant> {
        ALL_VARIANTS
            .iter()
            .find(|(_, c)| c.eq_ignore_ascii_case(code))
            .map(|(v, _)| *v)
    }

    pub fn code(self) -> &'static str {
        ALL_VARIANTS
            .iter()
            .find(|(v, _)| *v == self)
            .map(|(_, c)| *c)
            .expect("every Variant has a code")
    }

    fn bit(self) -> u64 {
        1u64 << (self as u8)
    }
}

/// A small bitset over [`Variant`]. Backed by a `u64`; `ALL_VARIANTS` has
/// fewer than 64 entries so every tag fits in one word.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash, Debug)]
pub struct VariantSet(u64);

impl VariantSet {
    pub const EMPTY: VariantSet = VariantSet(0);

    pub fn insert(&mut self, v: Variant) {
        self.0 |= v.bit();
    }

    pub fn with(mut self, v: Variant) -> Self {
        self.insert(v);
        self
    }

    pub fn contains(self, v: Variant) -> bool {
        self.0 & v.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True iff every variant required by `self` is present in `other`.
    ///
    /// Used as `terminal_required.is_subset_of(reading_variants)`.
    pub fn is_subset_of(self, other: VariantSet) -> bool {
        self.0 & other.0 == self.0
    }

    pub fn union(self, other: VariantSet) -> VariantSet {
        VariantSet(self.0 | other.0)
    }

    pub fn without(self, v: Variant) -> VariantSet {
        VariantSet(self.0 & !v.bit())
    }

    pub fn iter(self) -> impl Iterator<Item = Variant> {
        ALL_VARIANTS
            .iter()
            .filter(move |(v, _)| self.contains(*v))
            .map(|(v, _)| *v)
    }

    /// Parse a space-separated BÍN inflection tag (e.g. `"ÞGF FT"`) into a
    /// set, ignoring tokens outside the known vocabulary (they carry no
    /// parse-relevant information for this matcher).
    pub fn parse_tag(tag: &str) -> VariantSet {
        let mut set = VariantSet::EMPTY;
        for tok in tag.split_whitespace() {
            if let Some(v) = Variant::from_code(&tok.to_lowercase()) {
                set.insert(v);
            }
        }
        set
    }

    /// Parse the underscore-delimited variant suffix of a terminal name,
    /// e.g. `so_2_þgf_nh` -> `{Arity2, Þgf, Nh}` (the `first` part, `so`,
    /// is not itself a variant and must be stripped by the caller).
    pub fn parse_terminal_variants<'a>(parts: impl Iterator<Item = &'a str>) -> VariantSet {
        let mut set = VariantSet::EMPTY;
        for tok in parts {
            if let Some(v) = Variant::from_code(tok) {
                set.insert(v);
            }
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subset_test() {
        let required = VariantSet::EMPTY.with(Variant::Þgf).with(Variant::Ft);
        let reading = VariantSet::parse_tag("ÞGF FT KVK");
        assert!(required.is_subset_of(reading));

        let reading2 = VariantSet::parse_tag("NF ET KVK");
        assert!(!required.is_subset_of(reading2));
    }

    #[test]
    fn unknown_tokens_are_ignored() {
        let set = VariantSet::parse_tag("ÞGF GERVIFALL FT");
        assert!(set.contains(Variant::Þgf));
        assert!(set.contains(Variant::Ft));
    }

    #[test]
    fn code_roundtrip() {
        for (v, code) in ALL_VARIANTS {
            assert_eq!(Variant::from_code(code), Some(*v));
            assert_eq!(v.code(), *code);
        }
    }
}
