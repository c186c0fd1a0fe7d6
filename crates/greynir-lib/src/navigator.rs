//! §4.5: a generic top-down SPPF walk with per-node memoization, the
//! substrate the reducer, the printer, and the flat-dump serializer all
//! build on. Memoization is keyed on [`NodeId`]; callers that need to
//! revisit shared nodes (e.g. to count combinations, §8 scenario 6) can
//! opt out.

use std::collections::HashMap;

use greynir_core::{NonterminalId, ProductionId};

use crate::sppf::{Label, NodeId, Sppf};

/// Hook points a [`ForestNavigator`] calls back into, one method per
/// §4.5 hook: epsilon-node, token-node, nonterminal-node (split here into
/// `enter_nonterminal`/`finalize_node`), family-entry, add-child-result.
pub trait ForestVisitor {
    type Output: Clone;

    fn visit_epsilon(&mut self) -> Self::Output;
    fn visit_token(&mut self, terminal: greynir_core::TerminalId, token_index: usize) -> Self::Output;

    /// Called once when descending into a nonterminal or partial-item
    /// node, before any of its families are visited.
    fn enter_nonterminal(&mut self, _nonterminal: Option<NonterminalId>, _node: NodeId) {}

    /// Called once per family, before its children are visited.
    /// `family_index` is this family's 0-based position among the
    /// node's families; `is_ambiguous` is whether the node has more
    /// than one (needed by the flat-dump serializer's `On` lines, §6).
    fn enter_family(&mut self, _production: Option<ProductionId>, _family_index: usize, _is_ambiguous: bool) {}

    /// Called once per child result within a family, in `(left, right)`
    /// order; the default just appends, which is enough for every
    /// visitor in this crate.
    fn add_child_result(&mut self, acc: &mut Vec<Self::Output>, child: Self::Output) {
        acc.push(child);
    }

    /// Combine one family's accumulated children into that family's result.
    fn finalize_family(&mut self, production: Option<ProductionId>, children: Vec<Self::Output>) -> Self::Output;

    /// Combine every family's result (several, if the node is ambiguous)
    /// into the node's final result.
    fn finalize_node(&mut self, nonterminal: Option<NonterminalId>, node: NodeId, family_results: Vec<Self::Output>) -> Self::Output;
}

/// Drives a [`ForestVisitor`] over an [`Sppf`], memoizing by default.
pub struct ForestNavigator<'a, V: ForestVisitor> {
    sppf: &'a Sppf,
    visitor: V,
    memo: HashMap<NodeId, V::Output>,
    memoize: bool,
}

impl<'a, V: ForestVisitor> ForestNavigator<'a, V> {
    pub fn new(sppf: &'a Sppf, visitor: V) -> Self {
        ForestNavigator { sppf, visitor, memo: HashMap::new(), memoize: true }
    }

    /// Opt out of memoization; every reachable occurrence of a shared
    /// node is revisited (used when a visitor must count distinct
    /// derivations rather than distinct nodes, §8 scenario 6).
    pub fn revisiting(sppf: &'a Sppf, visitor: V) -> Self {
        ForestNavigator { sppf, visitor, memo: HashMap::new(), memoize: false }
    }

    pub fn visitor(&self) -> &V {
        &self.visitor
    }

    pub fn visitor_mut(&mut self) -> &mut V {
        &mut self.visitor
    }

    pub fn into_visitor(self) -> V {
        self.visitor
    }

    pub fn navigate(&mut self, id: NodeId) -> V::Output {
        if self.memoize
            && let Some(out) = self.memo.get(&id)
        {
            return out.clone();
        }

        let node = self.sppf.node(id);
        let out = match node.label {
            Label::Token(terminal, token_index) => self.visitor.visit_token(terminal, token_index),
            Label::Completed(nt) => self.navigate_families(Some(nt), id),
            Label::Item(..) => self.navigate_families(None, id),
        };

        if self.memoize {
            self.memo.insert(id, out.clone());
        }
        out
    }

    fn navigate_families(&mut self, nonterminal: Option<NonterminalId>, id: NodeId) -> V::Output {
        self.visitor.enter_nonterminal(nonterminal, id);
        let families = self.sppf.node(id).families.clone();
        let is_ambiguous = families.len() > 1;
        let mut family_results = Vec::with_capacity(families.len());
        for (family_index, family) in families.into_iter().enumerate() {
            self.visitor.enter_family(family.production, family_index, is_ambiguous);
            let mut children = Vec::with_capacity(2);
            // A family's left slot is only "nothing" in the epsilon sense
            // when right is also absent (a true null derivation); when
            // only one slot is populated (e.g. a length-1 production has
            // no left accumulator) we visit that slot alone and never
            // call `visit_epsilon`, mirroring the reference navigator's
            // `isinstance(f, tuple)` branch.
            match (family.left, family.right) {
                (None, None) => {
                    let out = self.visitor.visit_epsilon();
                    self.visitor.add_child_result(&mut children, out);
                }
                (Some(left), None) => {
                    let out = self.navigate(left);
                    self.visitor.add_child_result(&mut children, out);
                }
                (None, Some(right)) => {
                    let out = self.navigate(right);
                    self.visitor.add_child_result(&mut children, out);
                }
                (Some(left), Some(right)) => {
                    let out = self.navigate(left);
                    self.visitor.add_child_result(&mut children, out);
                    let out = self.navigate(right);
                    self.visitor.add_child_result(&mut children, out);
                }
            }
            family_results.push(self.visitor.finalize_family(family.production, children));
        }
        self.visitor.finalize_node(nonterminal, id, family_results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use greynir_core::TerminalId;

    struct CountTokens;
    impl ForestVisitor for CountTokens {
        type Output = u32;
        fn visit_epsilon(&mut self) -> u32 {
            0
        }
        fn visit_token(&mut self, _terminal: TerminalId, _token_index: usize) -> u32 {
            1
        }
        fn finalize_family(&mut self, _production: Option<ProductionId>, children: Vec<u32>) -> u32 {
            children.iter().sum()
        }
        fn finalize_node(&mut self, _nonterminal: Option<NonterminalId>, _node: NodeId, family_results: Vec<u32>) -> u32 {
            family_results.into_iter().max().unwrap_or(0)
        }
    }

    #[test]
    fn counts_tokens_under_a_chain_of_families() {
        let mut sppf = Sppf::new();
        let a = sppf.token_node(TerminalId(1), 0);
        let b = sppf.token_node(TerminalId(2), 1);
        let nt = greynir_core::NonterminalId(0);
        let pair = sppf.make_node(greynir_core::ProductionId(0), 2, nt, 1, 0, 1, None, a);
        let whole = sppf.make_node(greynir_core::ProductionId(0), 2, nt, 2, 0, 2, Some(pair), b);

        let mut nav = ForestNavigator::new(&sppf, CountTokens);
        assert_eq!(nav.navigate(whole), 2);
    }
}
