//! Stable integer identities for grammar symbols.

use std::fmt;

/// A nonterminal's stable index into [`crate::Grammar`]'s nonterminal table.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct NonterminalId(pub u32);

/// A terminal's stable index into [`crate::Grammar`]'s terminal table.
/// Terminal indices are 1-based per the on-disk grammar format; index 0 is
/// reserved and never assigned to a real terminal.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct TerminalId(pub u32);

/// A production's stable, grammar-wide unique id.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ProductionId(pub u32);

impl fmt::Display for NonterminalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "N{}", self.0)
    }
}

impl fmt::Display for TerminalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

impl fmt::Display for ProductionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// A symbol on the right-hand side of a production: either a nonterminal
/// or a terminal. The on-disk and in-memory encoding (§3) represents this
/// as a signed integer (negative = nonterminal, positive = terminal); this
/// enum is the in-memory, type-safe equivalent, with `to_encoded`/
/// `from_encoded` at the boundary that needs the packed form.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum GrammarSymbol {
    Nonterminal(NonterminalId),
    Terminal(TerminalId),
}

impl GrammarSymbol {
    pub fn to_encoded(self) -> i32 {
        match self {
            GrammarSymbol::Nonterminal(id) => -(id.0 as i32) - 1,
            GrammarSymbol::Terminal(id) => id.0 as i32,
        }
    }

    pub fn from_encoded(raw: i32) -> GrammarSymbol {
        if raw < 0 {
            GrammarSymbol::Nonterminal(NonterminalId((-raw - 1) as u32))
        } else {
            GrammarSymbol::Terminal(TerminalId(raw as u32))
        }
    }

    pub fn as_nonterminal(self) -> Option<NonterminalId> {
        match self {
            GrammarSymbol::Nonterminal(id) => Some(id),
            GrammarSymbol::Terminal(_) => None,
        }
    }

    pub fn as_terminal(self) -> Option<TerminalId> {
        match self {
            GrammarSymbol::Terminal(id) => Some(id),
            GrammarSymbol::Nonterminal(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding_roundtrips() {
        let nt = GrammarSymbol::Nonterminal(NonterminalId(5));
        let t = GrammarSymbol::Terminal(TerminalId(5));
        assert_eq!(GrammarSymbol::from_encoded(nt.to_encoded()), nt);
        assert_eq!(GrammarSymbol::from_encoded(t.to_encoded()), t);
        assert_ne!(nt.to_encoded(), t.to_encoded());
    }
}
