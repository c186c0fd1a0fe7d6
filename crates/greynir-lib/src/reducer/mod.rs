//! §4.6: score alternative parses and collapse the SPPF to the single
//! best tree. Three passes, run in order by [`reduce_forest`]:
//!
//! 1. [`gather_finals`] walks every derivation, recording which terminal
//!    each token actually matched somewhere in the forest.
//! 2. [`score_tokens`] turns that per-token terminal set into a score
//!    for each option, using lexical preferences, morphological
//!    heuristics, and the verb-argument table.
//! 3. [`reduce`] walks the forest bottom-up, keeping at each ambiguous
//!    node the single family with the minimum production priority and,
//!    among those, the highest score, mutating the forest in place.

pub mod preferences;
pub mod verbs;
pub mod weights;

pub use preferences::{PreferenceRule, PreferenceTable};
pub use verbs::VerbTable;

use std::collections::{HashMap, HashSet};

use greynir_core::{Grammar, Terminal, TerminalId, Token, Variant};

use crate::navigator::{ForestNavigator, ForestVisitor};
use crate::sppf::{Label, NodeId, Sppf};

/// Pass 1 visitor: records the set of terminals matched at each token
/// index. Carries no other state; every hook but `visit_token` is a
/// no-op.
struct GatherVisitor {
    finals: HashMap<usize, HashSet<TerminalId>>,
}

impl ForestVisitor for GatherVisitor {
    type Output = ();

    fn visit_epsilon(&mut self) {}

    fn visit_token(&mut self, terminal: TerminalId, token_index: usize) {
        self.finals.entry(token_index).or_default().insert(terminal);
    }

    fn finalize_family(&mut self, _production: Option<greynir_core::ProductionId>, _children: Vec<()>) {}

    fn finalize_node(&mut self, _nonterminal: Option<greynir_core::NonterminalId>, _node: NodeId, _family_results: Vec<()>) {}
}

/// Pass 1 (§4.6): `finals[i]` is every terminal matched at token `i` in
/// any derivation reachable from `root`.
pub fn gather_finals(sppf: &Sppf, root: NodeId) -> HashMap<usize, HashSet<TerminalId>> {
    let mut nav = ForestNavigator::new(sppf, GatherVisitor { finals: HashMap::new() });
    nav.navigate(root);
    nav.into_visitor().finals
}

fn has_any_case(terminal: &Terminal) -> bool {
    [Variant::Nf, Variant::Þf, Variant::Þgf, Variant::Ef].iter().any(|&v| terminal.has_variant(v))
}

fn verb_stem(token: &Token) -> Option<&str> {
    token.readings.iter().find(|r| r.word_class == "so").map(|r| r.lemma.as_str())
}

/// The case a verb terminal governs, as a verb-table key fragment
/// (`""` if the terminal names no case, e.g. an arity-0 terminal).
fn case_signature(terminal: &Terminal) -> String {
    [Variant::Nf, Variant::Þf, Variant::Þgf, Variant::Ef]
        .iter()
        .find(|&&v| terminal.has_variant(v))
        .map(|v| v.code().to_string())
        .unwrap_or_default()
}

fn verb_heuristics(token: &Token, terminal: &Terminal, verbs: &VerbTable) -> i32 {
    let mut adj = 0;
    if let Some(arity) = terminal.verb_arity() {
        let mut arity_adj = weights::VERB_ARITY_FACTOR * arity as i32;
        if arity == 0 {
            let has_middle_voice_reading = token.readings.iter().any(|r| r.variants.contains(Variant::Mm));
            let declares_zero = verb_stem(token).map(|s| verbs.declares_zero_args(s)).unwrap_or(false);
            if !has_middle_voice_reading && !declares_zero {
                arity_adj = weights::VERB_ARITY0_UNSUPPORTED_PENALTY;
            }
        }
        adj += arity_adj;
        if let Some(stem) = verb_stem(token) {
            adj += verbs.score(stem, &case_signature(terminal));
        }
    }
    if terminal.has_variant(Variant::Sagnb) {
        adj += weights::VERB_SAGNB_BONUS;
    }
    if terminal.has_variant(Variant::Lh) {
        adj += if terminal.has_variant(Variant::Vb) { weights::VERB_LH_VB_PENALTY } else { weights::VERB_LH_BONUS };
    }
    if terminal.has_variant(Variant::Subj) {
        adj += if terminal.has_variant(Variant::NoCase) {
            weights::VERB_SUBJ_NONE_PENALTY
        } else if has_any_case(terminal) {
            weights::VERB_SUBJ_CASED_BONUS
        } else {
            0
        };
    }
    adj
}

/// Score every terminal option at one token, in isolation (everything
/// in §4.6 pass 2 except the cross-token `nh`/`nhm` bonus, which needs
/// every token's row to already exist — see [`apply_nh_nhm_bonus`]).
fn score_token_row(grammar: &Grammar, token: &Token, options: &HashSet<TerminalId>, preferences: &PreferenceTable, verbs: &VerbTable) -> HashMap<TerminalId, i32> {
    let mut row: HashMap<TerminalId, i32> = options.iter().map(|&t| (t, 0)).collect();

    // 1. Preference pairs, skipped when every option already agrees on
    // `first` (nothing to prefer between). `worse_adj`/`better_adj` are
    // hoisted above the rule loop and folded with min/max across every
    // rule touching a word, per §4.6 pass 2 item 1; an adjustment is only
    // recorded for a terminal when some *other* option in this row
    // actually matches the opposite side of the pair, matching the
    // original reducer's nested nothing-to-prefer-against guard.
    let firsts: HashSet<&str> = options.iter().map(|&t| grammar.terminal(t).first.as_str()).collect();
    if firsts.len() > 1 {
        let word = token.text.to_lowercase();
        let mut worse_adj: HashMap<TerminalId, i32> = HashMap::new();
        let mut better_adj: HashMap<TerminalId, i32> = HashMap::new();
        for rule in preferences.rules_for(&word) {
            for &wt in options {
                if !rule.worse.iter().any(|f| f == &grammar.terminal(wt).first) {
                    continue;
                }
                let has_better_counterpart = options.iter().any(|&bt| bt != wt && rule.better.iter().any(|f| f == &grammar.terminal(bt).first));
                if !has_better_counterpart {
                    continue;
                }
                let adj = weights::PREFERENCE_WORSE_FACTOR * rule.factor;
                worse_adj.entry(wt).and_modify(|v| *v = (*v).min(adj)).or_insert(adj);
            }
            for &bt in options {
                if !rule.better.iter().any(|f| f == &grammar.terminal(bt).first) {
                    continue;
                }
                let has_worse_counterpart = options.iter().any(|&wt| wt != bt && rule.worse.iter().any(|f| f == &grammar.terminal(wt).first));
                if !has_worse_counterpart {
                    continue;
                }
                let terminal = grammar.terminal(bt);
                let factor = if terminal.is_literal() { weights::PREFERENCE_BETTER_LITERAL_FACTOR } else { weights::PREFERENCE_BETTER_FACTOR };
                let adj = factor * rule.factor;
                better_adj.entry(bt).and_modify(|v| *v = (*v).max(adj)).or_insert(adj);
            }
        }
        for (t, adj) in worse_adj {
            *row.get_mut(&t).unwrap() += adj;
        }
        for (t, adj) in better_adj {
            *row.get_mut(&t).unwrap() += adj;
        }
    }

    // 2. Per-terminal morphological heuristics.
    for &t in options {
        let terminal = grammar.terminal(t);
        let mut adj = match terminal.first.as_str() {
            "ao" | "eo" => weights::ADVERB_PENALTY,
            "no" => {
                let mut n = 0;
                if terminal.has_variant(Variant::Et) {
                    n += weights::NOUN_SINGULAR_BONUS;
                }
                if terminal.has_variant(Variant::Abbrev) {
                    n += weights::NOUN_ABBREV_PENALTY;
                }
                n
            }
            "fs" => {
                if terminal.has_variant(Variant::Nf) {
                    weights::PREP_NOMINATIVE_PENALTY
                } else {
                    weights::PREP_OTHER_BONUS
                }
            }
            "so" => verb_heuristics(token, terminal, verbs),
            "tala" | "töl" => weights::NUMERAL_TALA_PENALTY,
            "sérnafn" if token.readings.is_empty() => weights::SERNAFN_NO_READINGS_BONUS,
            _ => 0,
        };
        if terminal.is_literal() {
            adj += weights::LITERAL_BONUS;
        }
        *row.get_mut(&t).unwrap() += adj;
    }

    // 3. Within-token cross-alternative adjustments.
    let numeral_present = options.iter().any(|&t| matches!(grammar.terminal(t).first.as_str(), "tala" | "töl"));
    if numeral_present {
        for &t in options {
            let terminal = grammar.terminal(t);
            if matches!(terminal.first.as_str(), "no" | "töl") && terminal.has_variant(Variant::Ef) {
                *row.get_mut(&t).unwrap() += weights::NUMERAL_GENITIVE_ALTERNATIVE_PENALTY;
            }
        }
    }
    let has_no_ef_ft_alternative = options.iter().any(|&t| {
        let terminal = grammar.terminal(t);
        terminal.first == "no" && terminal.has_variant(Variant::Ef) && terminal.has_variant(Variant::Ft)
    });
    if has_no_ef_ft_alternative {
        for &t in options {
            let terminal = grammar.terminal(t);
            if terminal.first == "so" && terminal.has_variant(Variant::Nh) {
                *row.get_mut(&t).unwrap() += weights::VERB_NH_NO_EF_FT_ALTERNATIVE_BONUS;
            }
        }
    }

    row
}

/// The cross-token half of the `nh`/`nhm` rule: a `so_..._nh` terminal at
/// token `i` gets a bonus if token `i - 1` matched an `nhm` (infinitive
/// marker) terminal, which in turn gets a smaller reciprocal bonus.
fn apply_nh_nhm_bonus(grammar: &Grammar, finals: &HashMap<usize, HashSet<TerminalId>>, scores: &mut HashMap<usize, HashMap<TerminalId, i32>>) {
    let mut indices: Vec<usize> = finals.keys().copied().collect();
    indices.sort_unstable();
    for i in indices {
        if i == 0 {
            continue;
        }
        let Some(prev_options) = finals.get(&(i - 1)) else { continue };
        let Some(nhm) = prev_options.iter().copied().find(|&t| grammar.terminal(t).first == "nhm") else { continue };
        let nh_terminals: Vec<TerminalId> = finals[&i]
            .iter()
            .copied()
            .filter(|&t| {
                let terminal = grammar.terminal(t);
                terminal.first == "so" && terminal.has_variant(Variant::Nh)
            })
            .collect();
        if nh_terminals.is_empty() {
            continue;
        }
        for t in nh_terminals {
            *scores.get_mut(&i).unwrap().get_mut(&t).unwrap() += weights::VERB_NH_AFTER_NHM_BONUS;
        }
        *scores.get_mut(&(i - 1)).unwrap().get_mut(&nhm).unwrap() += weights::NHM_BEFORE_NH_BONUS;
    }
}

/// Pass 2 (§4.6): per-token, per-terminal scores.
pub fn score_tokens(grammar: &Grammar, tokens: &[Token], finals: &HashMap<usize, HashSet<TerminalId>>, preferences: &PreferenceTable, verbs: &VerbTable) -> HashMap<usize, HashMap<TerminalId, i32>> {
    let mut scores: HashMap<usize, HashMap<TerminalId, i32>> =
        finals.iter().map(|(&i, options)| (i, score_token_row(grammar, &tokens[i], options, preferences, verbs))).collect();
    apply_nh_nhm_bonus(grammar, finals, &mut scores);
    scores
}

/// Pass 3 (§4.6): collapse `sppf` bottom-up starting at `root`, leaving
/// every ambiguous node with exactly one surviving family, and return
/// the root's total score.
pub fn reduce(sppf: &mut Sppf, grammar: &Grammar, scores: &HashMap<usize, HashMap<TerminalId, i32>>, root: NodeId) -> i32 {
    let mut memo: HashMap<NodeId, i32> = HashMap::new();
    reduce_node(sppf, grammar, scores, &mut memo, root)
}

fn reduce_node(sppf: &mut Sppf, grammar: &Grammar, scores: &HashMap<usize, HashMap<TerminalId, i32>>, memo: &mut HashMap<NodeId, i32>, id: NodeId) -> i32 {
    if let Some(&s) = memo.get(&id) {
        return s;
    }
    let node = sppf.node(id).clone();
    let result = match node.label {
        Label::Token(terminal, token_index) => scores.get(&token_index).and_then(|row| row.get(&terminal)).copied().unwrap_or(0),
        Label::Completed(_) | Label::Item(..) => {
            let family_scores: Vec<i32> = node
                .families
                .iter()
                .map(|family| {
                    let left = family.left.map(|c| reduce_node(sppf, grammar, scores, memo, c)).unwrap_or(0);
                    let right = family.right.map(|c| reduce_node(sppf, grammar, scores, memo, c)).unwrap_or(0);
                    left + right
                })
                .collect();
            let min_priority = node
                .families
                .iter()
                .map(|f| f.production.map(|p| grammar.production(p).priority).unwrap_or(i32::MAX))
                .min()
                .unwrap_or(i32::MAX);
            // First family at the minimum priority with the highest
            // score wins; strict `>` keeps the first-encountered family
            // on ties (§4.6 pass 3).
            let mut survivor: Option<(usize, i32)> = None;
            for (fi, family) in node.families.iter().enumerate() {
                let priority = family.production.map(|p| grammar.production(p).priority).unwrap_or(i32::MAX);
                if priority != min_priority {
                    continue;
                }
                let score = family_scores[fi];
                if survivor.is_none_or(|(_, best)| score > best) {
                    survivor = Some((fi, score));
                }
            }
            let Some((survivor_index, family_score)) = survivor else {
                crate::error::invariant_violation("reduced node has no families")
            };
            sppf.set_families(id, vec![node.families[survivor_index]]);
            let nt_bonus = if let Label::Completed(nt) = node.label { grammar.nonterminal_score(nt) } else { 0 };
            family_score + nt_bonus
        }
    };
    memo.insert(id, result);
    result
}

/// The gathered option sets and final score from a full §4.6 reduction,
/// returned by [`reduce_forest`] for callers (tests, the CLI's `--dump`)
/// that want the intermediate per-token terminal sets too.
pub struct ReduceReport {
    pub finals: HashMap<usize, HashSet<TerminalId>>,
    pub score: i32,
}

/// Run all three passes in order: gather, score, reduce. `sppf` is
/// mutated to its single-tree post-reduction shape.
pub fn reduce_forest(sppf: &mut Sppf, grammar: &Grammar, tokens: &[Token], root: NodeId, preferences: &PreferenceTable, verbs: &VerbTable) -> ReduceReport {
    let finals = gather_finals(sppf, root);
    let scores = score_tokens(grammar, tokens, &finals, preferences, verbs);
    let score = reduce(sppf, grammar, &scores, root);
    ReduceReport { finals, score }
}

#[cfg(test)]
mod tests {
    use super::*;
    use greynir_core::{Grammar, Reading, TokenKind};

    use crate::earley;
    use crate::matcher::token_matches;

    fn word(text: &str, class: &str, tag: &str) -> Token {
        Token::with_readings(TokenKind::Word, text, vec![Reading::new(text, class, "alm", tag)])
    }

    struct FixtureMatcher<'a> {
        tokens: &'a [Token],
        grammar: &'a Grammar,
    }
    impl crate::matcher::TerminalMatcher for FixtureMatcher<'_> {
        fn matches(&self, token_index: usize, terminal: TerminalId) -> bool {
            token_matches(&self.tokens[token_index], self.grammar.terminal(terminal))
        }
    }

    #[test]
    fn reduction_collapses_ambiguous_pp_attachment_to_one_tree() {
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
        let mut result = earley::parse(&grammar, &tokens, &matcher).expect("should parse");
        assert!(result.sppf.count_combinations(result.root) >= 2);

        let report = reduce_forest(&mut result.sppf, &grammar, &tokens, result.root, &PreferenceTable::empty(), &VerbTable::empty());
        assert_eq!(result.sppf.count_combinations(result.root), 1);

        // Idempotent: reducing the now-single-tree forest again is a no-op.
        let again = reduce(&mut result.sppf, &grammar, &score_tokens(&grammar, &tokens, &report.finals, &PreferenceTable::empty(), &VerbTable::empty()), result.root);
        assert_eq!(again, report.score);
        assert_eq!(result.sppf.count_combinations(result.root), 1);
    }

    #[test]
    fn priority_domination_overrides_score() {
        // `A` scores lower than `B` but has the lower (winning) priority.
        // Driving `reduce` directly on a hand-built two-family node
        // isolates the priority rule from lexical matching.
        let grammar = Grammar::from_text("%root S\nS -> A %0 | B %1\nA -> \"lágt\"\nB -> \"hátt\"\n", "test").unwrap();

        let mut sppf = Sppf::new();
        let low_prod = grammar.productions_of(grammar.root).next().unwrap().id;
        let high_prod = grammar.productions_of(grammar.root).nth(1).unwrap().id;
        let low_leaf = sppf.token_node(greynir_core::TerminalId(1), 0);
        let high_leaf = sppf.token_node(greynir_core::TerminalId(2), 0);
        let low = sppf.make_node(low_prod, 1, grammar.root, 1, 0, 1, None, low_leaf);
        let high = sppf.make_node(high_prod, 1, grammar.root, 1, 0, 1, None, high_leaf);
        assert_eq!(low, high, "both productions complete the same (root, 0, 1) span");

        let mut scores: HashMap<usize, HashMap<TerminalId, i32>> = HashMap::new();
        scores.insert(0, HashMap::from([(greynir_core::TerminalId(1), 1), (greynir_core::TerminalId(2), 100)]));
        let final_score = reduce(&mut sppf, &grammar, &scores, low);
        assert_eq!(sppf.node(low).families.len(), 1);
        assert_eq!(sppf.node(low).families[0].production, Some(low_prod));
        assert_eq!(final_score, 1);
    }
}
