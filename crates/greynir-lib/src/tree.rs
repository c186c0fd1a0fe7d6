//! §4.6 post-reduction: flatten a single-family SPPF into an ordinary
//! n-ary parse tree, undoing Scott's binarization (§4.4) now that every
//! reachable node has exactly one family.

use greynir_core::{NonterminalId, TerminalId};

use crate::sppf::{Family, Label, NodeId, Sppf};

/// A disambiguated parse tree: a scanned-token leaf or a nonterminal
/// with its children in left-to-right production order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseTree {
    Token { terminal: TerminalId, token_index: usize },
    Nonterminal { nonterminal: NonterminalId, children: Vec<ParseTree> },
}

impl ParseTree {
    pub fn nonterminal(&self) -> Option<NonterminalId> {
        match self {
            ParseTree::Nonterminal { nonterminal, .. } => Some(*nonterminal),
            ParseTree::Token { .. } => None,
        }
    }

    pub fn terminal(&self) -> Option<TerminalId> {
        match self {
            ParseTree::Token { terminal, .. } => Some(*terminal),
            ParseTree::Nonterminal { .. } => None,
        }
    }

    pub fn children(&self) -> &[ParseTree] {
        match self {
            ParseTree::Nonterminal { children, .. } => children,
            ParseTree::Token { .. } => &[],
        }
    }
}

/// Build a [`ParseTree`] from a reduced forest rooted at `id`. The
/// forest must already have exactly one family per reachable node
/// (i.e. [`crate::reducer::reduce`] has run on this root); an
/// unreduced or partial-item root is an internal invariant violation,
/// not a recoverable error, since callers only ever call this after a
/// successful reduction.
pub fn build_tree(sppf: &Sppf, id: NodeId) -> ParseTree {
    let node = sppf.node(id);
    match node.label {
        Label::Token(terminal, token_index) => ParseTree::Token { terminal, token_index },
        Label::Completed(nonterminal) => {
            let children = collect_children(sppf, id).into_iter().map(|child| build_tree(sppf, child)).collect();
            ParseTree::Nonterminal { nonterminal, children }
        }
        Label::Item(..) => crate::error::invariant_violation("build_tree called on a partial-item node"),
    }
}

fn single_family(sppf: &Sppf, id: NodeId) -> Family {
    let node = sppf.node(id);
    if node.families.len() != 1 {
        crate::error::invariant_violation("build_tree requires a reduced forest (exactly one family per node)");
    }
    node.families[0]
}

/// Undo one level of binarization: a family's `left` child is either the
/// single symbol matched so far (when the production has fewer than two
/// symbols before this point) or a `Label::Item` chain node standing for
/// everything matched before `right` (§4.4's `make_node` shortcut).
fn collect_children(sppf: &Sppf, id: NodeId) -> Vec<NodeId> {
    let family = single_family(sppf, id);
    let mut children = match family.left {
        None => Vec::new(),
        Some(left_id) => {
            if matches!(sppf.node(left_id).label, Label::Item(..)) {
                collect_children(sppf, left_id)
            } else {
                vec![left_id]
            }
        }
    };
    if let Some(right_id) = family.right {
        children.push(right_id);
    }
    children
}

#[cfg(test)]
mod tests {
    use super::*;
    use greynir_core::{Grammar, Reading, Token, TokenKind};

    use crate::earley;
    use crate::matcher::{token_matches, TerminalMatcher};
    use crate::reducer::{reduce_forest, PreferenceTable, VerbTable};

    fn word(text: &str, class: &str, tag: &str) -> Token {
        Token::with_readings(TokenKind::Word, text, vec![Reading::new(text, class, "alm", tag)])
    }

    struct FixtureMatcher<'a> {
        tokens: &'a [Token],
        grammar: &'a Grammar,
    }
    impl TerminalMatcher for FixtureMatcher<'_> {
        fn matches(&self, token_index: usize, terminal: TerminalId) -> bool {
            token_matches(&self.tokens[token_index], self.grammar.terminal(terminal))
        }
    }

    #[test]
    fn flattens_reduced_forest_into_nary_tree() {
        let grammar = Grammar::from_text("%root Sentence\nSentence -> NP VP\nNP -> no_nf_et_kk\nVP -> so_0_gm_fh\n", "test").unwrap();
        let tokens = vec![word("Villi", "no", "NF ET KK"), word("leit", "so", "FH GM ÞT")];
        let matcher = FixtureMatcher { tokens: &tokens, grammar: &grammar };
        let mut result = earley::parse(&grammar, &tokens, &matcher).expect("should parse");
        reduce_forest(&mut result.sppf, &grammar, &tokens, result.root, &PreferenceTable::empty(), &VerbTable::empty());

        let tree = build_tree(&result.sppf, result.root);
        let ParseTree::Nonterminal { nonterminal, children } = &tree else { panic!("root must be a nonterminal") };
        assert_eq!(grammar.nonterminal(*nonterminal).name, "Sentence");
        assert_eq!(children.len(), 2);
        assert_eq!(grammar.nonterminal(children[0].nonterminal().unwrap()).name, "NP");
        assert_eq!(grammar.nonterminal(children[1].nonterminal().unwrap()).name, "VP");
        assert_eq!(children[0].children().len(), 1);
        assert!(children[0].children()[0].terminal().is_some());
    }
}
