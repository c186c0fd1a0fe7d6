//! The Shared Packed Parse Forest (§3, §4.4): an arena of nodes addressed
//! by stable index, with a registry that guarantees shared packing of
//! completed-nonterminal nodes within one parse.
//!
//! Nodes are never removed and never hold `Rc`/back-pointers; `NodeId` is
//! just an index into `Sppf::nodes`, the same technique `BuildGraph` uses
//! for its build-time query graph. This sidesteps the reference-cycle
//! problem a DAG would otherwise pose and makes memoized traversal (see
//! [`crate::navigator`]) a hash lookup keyed by `NodeId`.

use std::collections::HashMap;

use greynir_core::{NonterminalId, ProductionId, TerminalId};

/// Index into [`Sppf::nodes`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeId(u32);

/// What an SPPF node represents (§3's three label kinds).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Label {
    /// A scanned token, matched against `terminal` at `token_index`.
    /// Always spans `[token_index, token_index + 1]`; never ambiguous.
    Token(TerminalId, usize),
    /// A completed nonterminal: `dot == production.len()`. Unique per
    /// `(nonterminal, start, end)` within one parse (shared packing).
    Completed(NonterminalId),
    /// A partial item `A -> alpha . beta`, `dot` symbols into `production`.
    /// These are the binarization nodes Scott's construction introduces
    /// so that every family has at most two children.
    Item(ProductionId, u32),
}

/// One alternative way to derive a node's span: a left child (the
/// accumulated prefix, `w`) and a right child (the symbol just matched,
/// `v`), either of which may be absent (`None` stands for epsilon).
/// `production` names the production this family came from, needed by
/// the reducer's priority partitioning (§4.6) and to distinguish
/// alternatives that happen to share both children.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Family {
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
    pub production: Option<ProductionId>,
}

#[derive(Clone, Debug)]
pub struct Node {
    pub label: Label,
    pub start: usize,
    pub end: usize,
    pub families: Vec<Family>,
}

impl Node {
    pub fn is_ambiguous(&self) -> bool {
        self.families.len() > 1
    }

    /// A node is "completed" iff it isn't labelled by a partial item (§3).
    pub fn is_completed(&self) -> bool {
        !matches!(self.label, Label::Item(..))
    }
}

/// The forest itself: an arena plus the `(label, start, end)` -> `NodeId`
/// registry that packs completed-nonterminal nodes.
#[derive(Debug, Default)]
pub struct Sppf {
    nodes: Vec<Node>,
    registry: HashMap<(Label, usize, usize), NodeId>,
}

impl Sppf {
    pub fn new() -> Self {
        Sppf { nodes: Vec::new(), registry: HashMap::new() }
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Find an already-completed `(nonterminal, start, end)` node, if any
    /// (used to look up the parse root after the main loop finishes, and
    /// by the predictor's zero-width shortcut via an external `H` map).
    pub fn find_completed(&self, nt: NonterminalId, start: usize, end: usize) -> Option<NodeId> {
        self.registry.get(&(Label::Completed(nt), start, end)).copied()
    }

    fn get_or_create(&mut self, label: Label, start: usize, end: usize) -> NodeId {
        if let Some(&id) = self.registry.get(&(label, start, end)) {
            return id;
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node { label, start, end, families: Vec::new() });
        self.registry.insert((label, start, end), id);
        id
    }

    fn add_family(&mut self, id: NodeId, family: Family) {
        let node = &mut self.nodes[id.0 as usize];
        if !node.families.contains(&family) {
            node.families.push(family);
        }
    }

    /// Replace a node's families wholesale. Used only by the reducer
    /// (§4.6 pass 3) to collapse an ambiguous node to its single
    /// surviving family.
    pub(crate) fn set_families(&mut self, id: NodeId, families: Vec<Family>) {
        self.nodes[id.0 as usize].families = families;
    }

    /// A scanned-token leaf. Leaves never carry families; repeated calls
    /// for the same `(terminal, token_index)` return the same node.
    pub fn token_node(&mut self, terminal: TerminalId, token_index: usize) -> NodeId {
        self.get_or_create(Label::Token(terminal, token_index), token_index, token_index + 1)
    }

    /// A zero-child (epsilon) completion of `nonterminal` at `pos`, used
    /// when a production with no symbols completes immediately.
    pub fn epsilon_node(&mut self, nonterminal: NonterminalId, production: ProductionId, pos: usize) -> NodeId {
        let id = self.get_or_create(Label::Completed(nonterminal), pos, pos);
        self.add_family(id, Family { left: None, right: None, production: Some(production) });
        id
    }

    /// The standard Scott/Johnstone `make_node`: advance an item through
    /// symbol `v`, starting from prefix `w` (`None` if nothing was matched
    /// yet). `production`/`new_dot` describe the item *after* the advance;
    /// when `new_dot == 1` and the production has more than one symbol,
    /// there is nothing to pack yet, so `v` itself is reused as the
    /// intermediate node rather than wrapping it (§4.4).
    pub fn make_node(
        &mut self,
        production: ProductionId,
        production_len: usize,
        nonterminal: NonterminalId,
        new_dot: usize,
        origin: usize,
        current: usize,
        w: Option<NodeId>,
        v: NodeId,
    ) -> NodeId {
        if new_dot == 1 && production_len >= 2 {
            return v;
        }
        let label = if new_dot == production_len { Label::Completed(nonterminal) } else { Label::Item(production, new_dot as u32) };
        let id = self.get_or_create(label, origin, current);
        self.add_family(id, Family { left: w, right: Some(v), production: Some(production) });
        id
    }

    /// Count the number of distinct derivations reachable from `node`
    /// (§8 scenario 6: `count_combinations`). Exponential in the worst
    /// case on an unreduced forest; only meant for small test fixtures.
    pub fn count_combinations(&self, node: NodeId) -> u64 {
        fn go(sppf: &Sppf, id: Option<NodeId>, memo: &mut HashMap<NodeId, u64>) -> u64 {
            let Some(id) = id else { return 1 };
            if let Some(&c) = memo.get(&id) {
                return c;
            }
            let node = sppf.node(id);
            let total: u64 = node
                .families
                .iter()
                .map(|f| go(sppf, f.left, memo).saturating_mul(go(sppf, f.right, memo)))
                .sum();
            let total = total.max(1).min(u64::MAX / 2);
            memo.insert(id, total);
            total
        }
        go(self, Some(node), &mut HashMap::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_node_is_shared() {
        let mut sppf = Sppf::new();
        let a = sppf.token_node(TerminalId(3), 0);
        let b = sppf.token_node(TerminalId(3), 0);
        assert_eq!(a, b);
        assert!(sppf.node(a).families.is_empty());
    }

    #[test]
    fn completed_nonterminal_is_packed_by_label_and_span() {
        let mut sppf = Sppf::new();
        let tok = sppf.token_node(TerminalId(1), 0);
        let a = sppf.make_node(ProductionId(0), 1, NonterminalId(0), 1, 0, 1, None, tok);
        let b = sppf.make_node(ProductionId(1), 1, NonterminalId(0), 1, 0, 1, None, tok);
        // Both productions complete the same (N, 0, 1) span: shared packing (§8).
        assert_eq!(a, b);
        assert_eq!(sppf.node(a).families.len(), 2);
    }

    #[test]
    fn no_duplicate_families() {
        let mut sppf = Sppf::new();
        let tok = sppf.token_node(TerminalId(1), 0);
        let a = sppf.make_node(ProductionId(0), 1, NonterminalId(0), 1, 0, 1, None, tok);
        let b = sppf.make_node(ProductionId(0), 1, NonterminalId(0), 1, 0, 1, None, tok);
        assert_eq!(a, b);
        assert_eq!(sppf.node(a).families.len(), 1);
    }
}
