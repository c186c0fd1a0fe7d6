//! `[ADDED]` §4.6's `SimpleTree` projection: a presentation-facing tree
//! built from a disambiguated [`ParseTree`] by renaming and/or
//! collapsing interior nonterminals through a configurable name map.
//! Follows the reference projection tool's "push on entry, collapse a
//! single same-tag child on exit" builder; the tree-pattern-matching
//! query sublanguage built on top of the reference tool is out of
//! scope (§4.6), so this module is only the projection plus accessors.

use std::collections::HashMap;

use greynir_core::{Grammar, Terminal, TerminalId, Token, VariantSet};

use crate::tree::ParseTree;

/// Maps a raw grammar nonterminal name (`NlFrumlag`) to the tag a
/// [`SimpleTree`] should carry for it (`NP-SUBJ`). Names absent from
/// the map pass through unchanged.
#[derive(Clone, Debug, Default)]
pub struct NonterminalNameMap(HashMap<String, String>);

impl NonterminalNameMap {
    pub fn new(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        NonterminalNameMap(entries.into_iter().collect())
    }

    pub fn identity() -> Self {
        NonterminalNameMap::default()
    }

    fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.0.get(name).map(String::as_str).unwrap_or(name)
    }
}

/// A token-index range, inclusive of its first token and exclusive of
/// the one past its last (mirroring `Sppf::Node`'s `start`/`end`).
pub type Span = (usize, usize);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SimpleTree {
    Terminal { tag: String, terminal: TerminalId, span: Span, text: String, variants: VariantSet, lemma: Option<String> },
    Nonterminal { tag: String, span: Span, children: Vec<SimpleTree> },
}

impl SimpleTree {
    pub fn tag(&self) -> &str {
        match self {
            SimpleTree::Terminal { tag, .. } | SimpleTree::Nonterminal { tag, .. } => tag,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            SimpleTree::Terminal { span, .. } | SimpleTree::Nonterminal { span, .. } => *span,
        }
    }

    pub fn children(&self) -> &[SimpleTree] {
        match self {
            SimpleTree::Nonterminal { children, .. } => children,
            SimpleTree::Terminal { .. } => &[],
        }
    }

    pub fn terminal(&self) -> Option<TerminalId> {
        match self {
            SimpleTree::Terminal { terminal, .. } => Some(*terminal),
            SimpleTree::Nonterminal { .. } => None,
        }
    }

    pub fn variants(&self) -> VariantSet {
        match self {
            SimpleTree::Terminal { variants, .. } => *variants,
            SimpleTree::Nonterminal { .. } => VariantSet::EMPTY,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            SimpleTree::Terminal { text, .. } => Some(text),
            SimpleTree::Nonterminal { .. } => None,
        }
    }

    pub fn lemma(&self) -> Option<&str> {
        match self {
            SimpleTree::Terminal { lemma, .. } => lemma.as_deref(),
            SimpleTree::Nonterminal { .. } => None,
        }
    }
}

fn project_leaf(terminal: TerminalId, token_index: usize, grammar: &Grammar, tokens: &[Token]) -> SimpleTree {
    let term: &Terminal = grammar.terminal(terminal);
    let token = &tokens[token_index];
    let reading = token.readings.iter().find(|r| r.word_class == term.first);
    SimpleTree::Terminal {
        tag: term.name.clone(),
        terminal,
        span: (token_index, token_index + 1),
        text: token.text.clone(),
        variants: reading.map(|r| r.variants).unwrap_or(VariantSet::EMPTY),
        lemma: reading.map(|r| r.lemma.clone()),
    }
}

/// Project a disambiguated [`ParseTree`] into a [`SimpleTree`] under
/// `names`. A nonterminal that resolves to the same tag as its single
/// child collapses into that child (the reference tool's "collapse on
/// exit" rule), so chains of wrapper nonterminals (`NlFrumlag -> Nl ->
/// ...`) don't bloat the presentation tree.
pub fn project(tree: &ParseTree, grammar: &Grammar, tokens: &[Token], names: &NonterminalNameMap) -> SimpleTree {
    match *tree {
        ParseTree::Token { terminal, token_index } => project_leaf(terminal, token_index, grammar, tokens),
        ParseTree::Nonterminal { nonterminal, ref children } => {
            let tag = names.resolve(&grammar.nonterminal(nonterminal).name).to_string();
            let projected: Vec<SimpleTree> = children.iter().map(|c| project(c, grammar, tokens, names)).collect();
            let span = projected.first().map(|f| f.span().0).zip(projected.last().map(|l| l.span().1)).unwrap_or((0, 0));
            if let [only] = projected.as_slice() {
                if only.tag() == tag {
                    return only.clone();
                }
            }
            SimpleTree::Nonterminal { tag, span, children: projected }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use greynir_core::{Reading, TokenKind};

    use crate::earley;
    use crate::matcher::{token_matches, TerminalMatcher};
    use crate::reducer::{reduce_forest, PreferenceTable, VerbTable};
    use crate::tree::build_tree;

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
    fn collapses_single_child_wrapper_nonterminal() {
        // `Wrap` exists purely to defer to `NP`; the projection collapses
        // it away when the name map maps both to the same tag.
        let grammar = Grammar::from_text("%root Wrap\nWrap -> NP\nNP -> no_nf_et_kk\n", "test").unwrap();
        let tokens = vec![word("Villi", "no", "NF ET KK")];
        let matcher = FixtureMatcher { tokens: &tokens, grammar: &grammar };
        let mut result = earley::parse(&grammar, &tokens, &matcher).expect("should parse");
        reduce_forest(&mut result.sppf, &grammar, &tokens, result.root, &PreferenceTable::empty(), &VerbTable::empty());
        let tree = build_tree(&result.sppf, result.root);

        let names = NonterminalNameMap::new([("Wrap".to_string(), "NP".to_string())]);
        let simple = project(&tree, &grammar, &tokens, &names);
        assert_eq!(simple.tag(), "NP");
        assert_eq!(simple.children().len(), 1);
        assert_eq!(simple.children()[0].text(), Some("Villi"));
        assert_eq!(simple.children()[0].lemma(), Some("Villi"));
    }

    #[test]
    fn renames_and_keeps_distinct_nonterminals() {
        let grammar = Grammar::from_text("%root Setning\nSetning -> NlFrumlag\nNlFrumlag -> no_nf_et_kk\n", "test").unwrap();
        let tokens = vec![word("Villi", "no", "NF ET KK")];
        let matcher = FixtureMatcher { tokens: &tokens, grammar: &grammar };
        let mut result = earley::parse(&grammar, &tokens, &matcher).expect("should parse");
        reduce_forest(&mut result.sppf, &grammar, &tokens, result.root, &PreferenceTable::empty(), &VerbTable::empty());
        let tree = build_tree(&result.sppf, result.root);

        let names = NonterminalNameMap::new([("Setning".to_string(), "S".to_string()), ("NlFrumlag".to_string(), "NP-SUBJ".to_string())]);
        let simple = project(&tree, &grammar, &tokens, &names);
        assert_eq!(simple.tag(), "S");
        assert_eq!(simple.children()[0].tag(), "NP-SUBJ");
        assert_eq!(simple.span(), (0, 1));
    }
}
