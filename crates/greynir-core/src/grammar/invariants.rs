//! Load-time invariant checks (§4.2): every nonterminal has at least one
//! production, none rewrites to itself in a single unconditional step,
//! every nonterminal is reachable from the root, and every nonterminal can
//! derive some terminal string.

use std::collections::HashSet;

use crate::error::GrammarError;
use crate::symbol_ids::{GrammarSymbol, NonterminalId};

use super::types::Grammar;

pub fn validate(g: &Grammar) -> Result<(), GrammarError> {
    check_nonempty(g)?;
    check_trivial_cycles(g)?;
    check_reachable(g)?;
    check_productive(g)?;
    Ok(())
}

fn check_nonempty(g: &Grammar) -> Result<(), GrammarError> {
    for nt in g.nonterminals() {
        if g.productions_of(nt.index).next().is_none() {
            return Err(GrammarError::EmptyNonterminal { name: nt.name.clone() });
        }
    }
    Ok(())
}

fn check_trivial_cycles(g: &Grammar) -> Result<(), GrammarError> {
    for nt in g.nonterminals() {
        let prods: Vec<_> = g.productions_of(nt.index).collect();
        if prods.len() == 1 {
            let p = prods[0];
            if p.symbols.len() == 1 && p.symbols[0] == GrammarSymbol::Nonterminal(nt.index) {
                return Err(GrammarError::TrivialCycle { name: nt.name.clone() });
            }
        }
    }
    Ok(())
}

fn check_reachable(g: &Grammar) -> Result<(), GrammarError> {
    let mut seen: HashSet<NonterminalId> = HashSet::new();
    let mut stack = vec![g.root];
    seen.insert(g.root);
    while let Some(nt) = stack.pop() {
        for p in g.productions_of(nt) {
            for sym in &p.symbols {
                if let GrammarSymbol::Nonterminal(child) = sym
                    && seen.insert(*child)
                {
                    stack.push(*child);
                }
            }
        }
    }
    for nt in g.nonterminals() {
        if !seen.contains(&nt.index) {
            return Err(GrammarError::Unreachable { name: nt.name.clone() });
        }
    }
    Ok(())
}

fn check_productive(g: &Grammar) -> Result<(), GrammarError> {
    let mut productive: HashSet<NonterminalId> = HashSet::new();
    loop {
        let mut changed = false;
        for nt in g.nonterminals() {
            if productive.contains(&nt.index) {
                continue;
            }
            let is_productive = g.productions_of(nt.index).any(|p| {
                p.symbols.iter().all(|sym| match sym {
                    GrammarSymbol::Terminal(_) => true,
                    GrammarSymbol::Nonterminal(n) => productive.contains(n),
                })
            });
            if is_productive {
                productive.insert(nt.index);
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    for nt in g.nonterminals() {
        if !productive.contains(&nt.index) {
            return Err(GrammarError::Unproductive { name: nt.name.clone() });
        }
    }
    Ok(())
}
