//! §4.4: the generalized Earley-Scott recognizer, producing an SPPF
//! instead of a single parse. The main loop follows the classic
//! predictor/completer/scanner structure; `H` records completions whose
//! span is zero-width at the current position so the predictor can
//! eagerly advance through them (handles nullable/epsilon nonterminals
//! without a separate closure pass).

use std::collections::HashMap;

use greynir_core::{Grammar, GrammarSymbol, NonterminalId, ProductionId, Token};

use crate::error::ParseError;
use crate::matcher::TerminalMatcher;
use crate::sppf::{NodeId, Sppf};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
struct ItemKey {
    production: ProductionId,
    dot: usize,
    origin: usize,
}

#[derive(Clone, Copy, Debug)]
struct Item {
    key: ItemKey,
    /// The SPPF node for everything matched so far in this item. `None`
    /// exactly when `dot == 0` (nothing matched yet).
    node: Option<NodeId>,
}

/// One Earley state set, `E[i]`: an insertion-ordered, duplicate-free
/// list of items. Membership is keyed on `(production, dot, origin)`
/// alone; the SPPF node for a given key is deterministic (the registry
/// in [`Sppf`] dedups by `(label, start, end)`, and every item in one
/// column shares the same `end`), so re-adding an existing key is a
/// no-op rather than a second, divergent entry.
#[derive(Default)]
struct Column {
    order: Vec<Item>,
    seen: std::collections::HashSet<ItemKey>,
}

impl Column {
    fn try_add(&mut self, item: Item) {
        if self.seen.insert(item.key) {
            self.order.push(item);
        }
    }
}

/// The result of a successful parse: the forest and its root node,
/// spanning the whole token sequence under the grammar's root
/// nonterminal.
pub struct ParseResult {
    pub sppf: Sppf,
    pub root: NodeId,
}

/// Run the Earley-Scott recognizer described in §4.4.
pub fn parse(grammar: &Grammar, tokens: &[Token], matcher: &dyn TerminalMatcher) -> Result<ParseResult, ParseError> {
    let n = tokens.len();
    let mut sppf = Sppf::new();
    let mut columns: Vec<Column> = (0..=n).map(|_| Column::default()).collect();
    // Completions whose span collapsed to zero width at the current
    // position: `(nonterminal, position) -> completed node`.
    let mut h: HashMap<(NonterminalId, usize), NodeId> = HashMap::new();

    for prod in grammar.productions_of(grammar.root) {
        columns[0].try_add(Item { key: ItemKey { production: prod.id, dot: 0, origin: 0 }, node: None });
    }

    for i in 0..=n {
        let mut scan_queue: Vec<Item> = Vec::new();
        let mut idx = 0;
        while idx < columns[i].order.len() {
            let item = columns[i].order[idx];
            idx += 1;
            let prod = grammar.production(item.key.production);

            if item.key.dot == prod.symbols.len() {
                // Completer.
                let completed_node = if prod.symbols.is_empty() {
                    sppf.epsilon_node(prod.nonterminal, item.key.production, i)
                } else {
                    item.node.unwrap_or_else(|| crate::error::invariant_violation("completed non-epsilon item without a node"))
                };
                if item.key.origin == i {
                    h.insert((prod.nonterminal, i), completed_node);
                }
                let waiting: Vec<Item> = columns[item.key.origin]
                    .order
                    .iter()
                    .copied()
                    .filter(|w| {
                        let wp = grammar.production(w.key.production);
                        wp.symbols.get(w.key.dot) == Some(&GrammarSymbol::Nonterminal(prod.nonterminal))
                    })
                    .collect();
                for w_item in waiting {
                    let wp = grammar.production(w_item.key.production);
                    let new_dot = w_item.key.dot + 1;
                    let new_node =
                        sppf.make_node(w_item.key.production, wp.symbols.len(), wp.nonterminal, new_dot, w_item.key.origin, i, w_item.node, completed_node);
                    columns[i].try_add(Item { key: ItemKey { production: w_item.key.production, dot: new_dot, origin: w_item.key.origin }, node: Some(new_node) });
                }
            } else {
                match prod.symbols[item.key.dot] {
                    GrammarSymbol::Nonterminal(c) => {
                        // Predictor.
                        for cp in grammar.productions_of(c) {
                            columns[i].try_add(Item { key: ItemKey { production: cp.id, dot: 0, origin: i }, node: None });
                        }
                        if let Some(&completed) = h.get(&(c, i)) {
                            let new_dot = item.key.dot + 1;
                            let new_node = sppf.make_node(item.key.production, prod.symbols.len(), prod.nonterminal, new_dot, item.key.origin, i, item.node, completed);
                            columns[i].try_add(Item { key: ItemKey { production: item.key.production, dot: new_dot, origin: item.key.origin }, node: Some(new_node) });
                        }
                    }
                    GrammarSymbol::Terminal(_) => scan_queue.push(item),
                }
            }
        }

        if i < n {
            for item in &scan_queue {
                let prod = grammar.production(item.key.production);
                let GrammarSymbol::Terminal(t) = prod.symbols[item.key.dot] else {
                    crate::error::invariant_violation("scan queue held a non-terminal item")
                };
                if matcher.matches(i, t) {
                    let token_node = sppf.token_node(t, i);
                    let new_dot = item.key.dot + 1;
                    let new_node = sppf.make_node(item.key.production, prod.symbols.len(), prod.nonterminal, new_dot, item.key.origin, i + 1, item.node, token_node);
                    columns[i + 1].try_add(Item { key: ItemKey { production: item.key.production, dot: new_dot, origin: item.key.origin }, node: Some(new_node) });
                }
            }
        }
    }

    if let Some(root) = sppf.find_completed(grammar.root, 0, n) {
        return Ok(ParseResult { sppf, root });
    }

    let last_nonempty = (0..=n).rev().find(|&i| !columns[i].order.is_empty()).unwrap_or(0);
    Err(ParseError { token_index: last_nonempty })
}

#[cfg(test)]
mod tests {
    use super::*;
    use greynir_core::{Reading, TokenKind};

    fn word(text: &str, class: &str, tag: &str) -> Token {
        Token::with_readings(TokenKind::Word, text, vec![Reading::new(text, class, "alm", tag)])
    }

    struct FixtureMatcher<'a> {
        tokens: &'a [Token],
        grammar: &'a Grammar,
    }
    impl TerminalMatcher for FixtureMatcher<'_> {
        fn matches(&self, token_index: usize, terminal: greynir_core::TerminalId) -> bool {
            crate::matcher::token_matches(&self.tokens[token_index], self.grammar.terminal(terminal))
        }
    }

    #[test]
    fn parses_simple_intransitive_sentence() {
        let grammar = Grammar::from_text(
            "%root Sentence\nSentence -> NP VP\nNP -> no_nf_et_kk\nVP -> so_0_gm_fh\n",
            "test",
        )
        .unwrap();
        let tokens = vec![word("Villi", "no", "NF ET KK"), word("leit", "so", "FH GM ÞT")];
        let matcher = FixtureMatcher { tokens: &tokens, grammar: &grammar };
        let result = parse(&grammar, &tokens, &matcher).expect("should parse");
        assert!(result.sppf.node(result.root).is_completed());
        assert_eq!(result.sppf.node(result.root).start, 0);
        assert_eq!(result.sppf.node(result.root).end, 2);
    }

    #[test]
    fn reports_furthest_token_on_failure() {
        let grammar = Grammar::from_text("%root Sentence\nSentence -> no_nf_et_kk so_0_gm_fh\n", "test").unwrap();
        let tokens = vec![word("Villi", "no", "NF ET KK"), word("og", "st", "")];
        let matcher = FixtureMatcher { tokens: &tokens, grammar: &grammar };
        let err = parse(&grammar, &tokens, &matcher).unwrap_err();
        assert_eq!(err.token_index, 1);
    }

    #[test]
    fn ambiguous_pp_attachment_yields_two_derivations() {
        // "kona myrti mann med hnif": the PP can attach to the direct
        // object ("the man with the knife") or to the verb phrase
        // ("killed [him] with the knife"), per §8 scenario 2.
        let grammar = Grammar::from_text(
            "%root S\n\
             S -> NPSubj VP\n\
             NPSubj -> no_nf_et_kvk\n\
             VP -> VP PP | so_1_þf NPObj\n\
             NPObj -> NPObj PP | no_þf_et_kk\n\
             PP -> fs_þf no_þf_et_kk\n",
            "test",
        )
        .unwrap();
        let tokens = vec![
            word("kona", "no", "NF ET KVK"),
            word("myrti", "so", "FH GM ÞT"),
            word("mann", "no", "ÞF ET KK"),
            word("með", "fs", "ÞF"),
            word("hníf", "no", "ÞF ET KK"),
        ];
        let matcher = FixtureMatcher { tokens: &tokens, grammar: &grammar };
        let result = parse(&grammar, &tokens, &matcher).expect("should parse");
        assert!(result.sppf.count_combinations(result.root) >= 2);
    }
}
