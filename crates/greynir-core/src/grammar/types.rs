use indexmap::IndexMap;

use crate::symbol_ids::{GrammarSymbol, NonterminalId, ProductionId, TerminalId};
use crate::variant::{Variant, VariantSet};

/// A grammar nonterminal: a name and whether it is a generated optional
/// wrapper (its name ends in `?` or `*`), which dumpers use to elide empty
/// optionals from their output.
#[derive(Clone, Debug)]
pub struct Nonterminal {
    pub name: String,
    pub index: NonterminalId,
    pub is_optional: bool,
}

impl Nonterminal {
    pub fn new(name: impl Into<String>, index: NonterminalId) -> Self {
        let name = name.into();
        let is_optional = name.ends_with('?') || name.ends_with('*');
        Nonterminal { name, index, is_optional }
    }
}

/// A grammar terminal: a name, optionally followed by underscore-delimited
/// variants (`so_2_þgf_nh`). `first` is the category before the first
/// underscore (`so`); `variants` is the parsed suffix.
#[derive(Clone, Debug)]
pub struct Terminal {
    pub name: String,
    pub index: TerminalId,
    pub first: String,
    pub variants: VariantSet,
}

impl Terminal {
    pub fn new(name: impl Into<String>, index: TerminalId) -> Self {
        let name = name.into();
        let mut parts = name.split('_');
        let first = parts.next().unwrap_or("").to_string();
        let variants = VariantSet::parse_terminal_variants(parts);
        Terminal { name, index, first, variants }
    }

    pub fn is_literal(&self) -> bool {
        self.name.starts_with('"') || self.name.starts_with('\'')
    }

    pub fn has_variant(&self, v: Variant) -> bool {
        self.variants.contains(v)
    }

    /// The verb-argument arity (0, 1, or 2) this terminal requires, if any.
    pub fn verb_arity(&self) -> Option<u8> {
        if self.first != "so" {
            return None;
        }
        if self.variants.contains(Variant::Arity0) {
            Some(0)
        } else if self.variants.contains(Variant::Arity1) {
            Some(1)
        } else if self.variants.contains(Variant::Arity2) {
            Some(2)
        } else {
            None
        }
    }
}

/// One alternative right-hand side for a nonterminal: an ordered sequence
/// of symbols, a stable id, and an integer priority (lower is preferred).
/// An empty `symbols` vector denotes the epsilon production.
#[derive(Clone, Debug)]
pub struct Production {
    pub id: ProductionId,
    pub nonterminal: NonterminalId,
    pub priority: i32,
    pub symbols: Vec<GrammarSymbol>,
}

impl Production {
    pub fn is_epsilon(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// A loaded, validated grammar: nonterminals, terminals, their productions,
/// the root nonterminal, and per-nonterminal score adjustments used by the
/// reducer (§4.6).
#[derive(Clone, Debug)]
pub struct Grammar {
    pub(crate) nonterminals: Vec<Nonterminal>,
    pub(crate) terminals: Vec<Terminal>,
    pub(crate) productions: Vec<Production>,
    pub(crate) productions_by_nonterminal: IndexMap<NonterminalId, Vec<ProductionId>>,
    pub(crate) nonterminal_scores: Vec<i32>,
    pub root: NonterminalId,
}

impl Grammar {
    pub fn nonterminal(&self, id: NonterminalId) -> &Nonterminal {
        &self.nonterminals[id.0 as usize]
    }

    pub fn terminal(&self, id: TerminalId) -> &Terminal {
        &self.terminals[id.0 as usize]
    }

    pub fn nonterminals(&self) -> &[Nonterminal] {
        &self.nonterminals
    }

    pub fn terminals(&self) -> &[Terminal] {
        &self.terminals
    }

    pub fn production(&self, id: ProductionId) -> &Production {
        &self.productions[id.0 as usize]
    }

    /// Productions of `nt`, in declaration order; each carries its own
    /// priority (§4.2's contract: `productions_of`).
    pub fn productions_of(&self, nt: NonterminalId) -> impl Iterator<Item = &Production> {
        self.productions_by_nonterminal
            .get(&nt)
            .into_iter()
            .flatten()
            .map(move |id| self.production(*id))
    }

    pub fn nonterminal_score(&self, nt: NonterminalId) -> i32 {
        self.nonterminal_scores[nt.0 as usize]
    }

    pub fn nonterminal_count(&self) -> usize {
        self.nonterminals.len()
    }

    pub fn terminal_count(&self) -> usize {
        self.terminals.len().saturating_sub(1)
    }
}
