//! §6 forest output: an indented debug print and a compact flat dump
//! (an `R1`/`Q0`-delimited line per node, prefixed `E`/`T`/`N`/`O` by
//! level), both built on [`ForestNavigator`] the way the reference
//! implementation's `ParseForestPrinter` and `ParseForestDumper` share
//! one `ParseForestNavigator` base class. Neither requires a reduced
//! forest: an ambiguous node prints/dumps an `Option`/`O` marker per
//! family.

use greynir_core::{Grammar, NonterminalId, ProductionId, TerminalId, Token};

use crate::navigator::{ForestNavigator, ForestVisitor};
use crate::sppf::{NodeId, Sppf};

fn is_empty_span(sppf: &Sppf, node: NodeId) -> bool {
    let n = sppf.node(node);
    n.start == n.end
}

struct FlatDumpVisitor<'a> {
    sppf: &'a Sppf,
    grammar: &'a Grammar,
    tokens: &'a [Token],
    level: usize,
    suppressed: usize,
    lines: Vec<String>,
}

impl FlatDumpVisitor<'_> {
    fn push(&mut self, line: String) {
        if self.suppressed == 0 {
            self.lines.push(line);
        }
    }
}

impl ForestVisitor for FlatDumpVisitor<'_> {
    type Output = ();

    fn visit_epsilon(&mut self) {
        self.push(format!("E{}", self.level));
    }

    fn visit_token(&mut self, terminal: TerminalId, token_index: usize) {
        let name = &self.grammar.terminal(terminal).name;
        let text = &self.tokens[token_index].text;
        self.push(format!("T{} {} {}", self.level, name, text));
    }

    fn enter_nonterminal(&mut self, nonterminal: Option<NonterminalId>, node: NodeId) {
        let Some(nt) = nonterminal else { return };
        let n = self.grammar.nonterminal(nt);
        if n.is_optional && is_empty_span(self.sppf, node) {
            // An empty `?`/`*` optional contributes nothing to the
            // dump, including its (trivially epsilon) children.
            self.suppressed += 1;
            return;
        }
        self.push(format!("N{} {}", self.level, n.name));
        self.level += 1;
    }

    fn enter_family(&mut self, _production: Option<ProductionId>, family_index: usize, is_ambiguous: bool) {
        if is_ambiguous {
            self.push(format!("O{} {}", self.level, family_index));
        }
    }

    fn finalize_family(&mut self, _production: Option<ProductionId>, _children: Vec<()>) {}

    fn finalize_node(&mut self, nonterminal: Option<NonterminalId>, node: NodeId, _family_results: Vec<()>) {
        let Some(nt) = nonterminal else { return };
        let n = self.grammar.nonterminal(nt);
        if n.is_optional && is_empty_span(self.sppf, node) {
            self.suppressed -= 1;
            return;
        }
        self.level -= 1;
    }
}

/// The compact flat dump (§6): one line per node, `R1`-started and
/// `Q0`-terminated, suitable for transport as a single string.
pub fn flat_dump(sppf: &Sppf, root: NodeId, grammar: &Grammar, tokens: &[Token]) -> String {
    let visitor = FlatDumpVisitor { sppf, grammar, tokens, level: 0, suppressed: 0, lines: vec!["R1".to_string()] };
    let mut nav = ForestNavigator::new(sppf, visitor);
    nav.navigate(root);
    let mut lines = nav.into_visitor().lines;
    lines.push("Q0".to_string());
    lines.join("\n")
}

struct PrettyPrintVisitor<'a> {
    sppf: &'a Sppf,
    grammar: &'a Grammar,
    tokens: &'a [Token],
    level: usize,
    suppressed: usize,
    detailed: bool,
    lines: Vec<String>,
}

impl PrettyPrintVisitor<'_> {
    fn indent(&self) -> String {
        "  ".repeat(self.level)
    }

    fn push(&mut self, line: String) {
        if self.suppressed == 0 {
            self.lines.push(line);
        }
    }
}

impl ForestVisitor for PrettyPrintVisitor<'_> {
    type Output = ();

    fn visit_epsilon(&mut self) {}

    fn visit_token(&mut self, terminal: TerminalId, token_index: usize) {
        let name = &self.grammar.terminal(terminal).name;
        let text = &self.tokens[token_index].text;
        self.push(format!("{}{}: {}", self.indent(), name, text));
    }

    fn enter_nonterminal(&mut self, nonterminal: Option<NonterminalId>, node: NodeId) {
        let Some(nt) = nonterminal else { return };
        let n = self.grammar.nonterminal(nt);
        if !self.detailed && n.is_optional && is_empty_span(self.sppf, node) {
            self.suppressed += 1;
            return;
        }
        self.push(format!("{}{}", self.indent(), n.name));
        self.level += 1;
    }

    fn enter_family(&mut self, _production: Option<ProductionId>, family_index: usize, is_ambiguous: bool) {
        if is_ambiguous {
            self.push(format!("{}Option {}:", self.indent(), family_index + 1));
        }
    }

    fn finalize_family(&mut self, _production: Option<ProductionId>, _children: Vec<()>) {}

    fn finalize_node(&mut self, nonterminal: Option<NonterminalId>, node: NodeId, _family_results: Vec<()>) {
        let Some(nt) = nonterminal else { return };
        let n = self.grammar.nonterminal(nt);
        if !self.detailed && n.is_optional && is_empty_span(self.sppf, node) {
            self.suppressed -= 1;
            return;
        }
        self.level -= 1;
    }
}

/// The indented debug form (§6), two spaces per nesting level,
/// eliding interior (binarization) nodes and empty optionals.
pub fn pretty_print(sppf: &Sppf, root: NodeId, grammar: &Grammar, tokens: &[Token]) -> String {
    pretty_print_detailed(sppf, root, grammar, tokens, false)
}

/// As [`pretty_print`], but also showing interior-node detail that is
/// normally elided (used by `greynir parse --detailed`).
pub fn pretty_print_detailed(sppf: &Sppf, root: NodeId, grammar: &Grammar, tokens: &[Token], detailed: bool) -> String {
    let visitor = PrettyPrintVisitor { sppf, grammar, tokens, level: 0, suppressed: 0, detailed, lines: Vec::new() };
    let mut nav = ForestNavigator::new(sppf, visitor);
    nav.navigate(root);
    nav.into_visitor().lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use greynir_core::{Reading, TokenKind};

    use crate::earley;
    use crate::matcher::{token_matches, TerminalMatcher};

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

    fn parsed(grammar: &Grammar, tokens: &[Token]) -> crate::earley::ParseResult {
        let matcher = FixtureMatcher { tokens, grammar };
        earley::parse(grammar, tokens, &matcher).expect("should parse")
    }

    #[test]
    fn flat_dump_is_bracketed_by_version_and_end_markers() {
        let grammar = Grammar::from_text("%root Sentence\nSentence -> NP VP\nNP -> no_nf_et_kk\nVP -> so_0_gm_fh\n", "test").unwrap();
        let tokens = vec![word("Villi", "no", "NF ET KK"), word("leit", "so", "FH GM ÞT")];
        let result = parsed(&grammar, &tokens);

        let dump = flat_dump(&result.sppf, result.root, &grammar, &tokens);
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines.first(), Some(&"R1"));
        assert_eq!(lines.last(), Some(&"Q0"));
        assert!(lines.contains(&"N0 Sentence"));
        assert!(lines.iter().any(|l| l.starts_with("T1 no_nf_et_kk Villi")));
        // `NP -> no_nf_et_kk` is a length-1 production: its completed node
        // has no left accumulator, but that's not an epsilon derivation,
        // so no spurious "E1" line should precede the token line.
        assert!(!lines.contains(&"E1"));
    }

    #[test]
    fn pretty_print_indents_by_nesting_level() {
        let grammar = Grammar::from_text("%root Sentence\nSentence -> NP VP\nNP -> no_nf_et_kk\nVP -> so_0_gm_fh\n", "test").unwrap();
        let tokens = vec![word("Villi", "no", "NF ET KK"), word("leit", "so", "FH GM ÞT")];
        let result = parsed(&grammar, &tokens);

        let printed = pretty_print(&result.sppf, result.root, &grammar, &tokens);
        assert!(printed.contains("Sentence"));
        assert!(printed.contains("  NP"));
        assert!(printed.contains("    no_nf_et_kk: Villi"));
    }
}
