//! Parser for the human-authored `.grammar` text format.
//!
//! Syntax, one rule per nonterminal (continuation alternatives may be
//! written on their own line, prefixed with `|`):
//!
//! ```text
//! %root Sentence
//!
//! # comments start with a hash
//! Sentence -> Subject Verb Object
//!           | Subject Verb
//! Subject  -> no_nf | fn_nf
//! Empty    -> 0              # 0 is the epsilon production
//! Literal  -> "og" Sentence
//! ```
//!
//! A bare alternative may end with an explicit priority annotation
//! (`%N`); lower wins ties exactly as undecorated alternatives do by
//! their declaration order, so `%N` is only needed to reorder relative to
//! that default.
//!
//! A name is a nonterminal iff it appears on the left of some `->`;
//! every other bare name is a terminal, exactly like `first` categories
//! in BÍN terminal names (`no`, `so_2_þgf`, ...). Quoted text is always a
//! literal terminal.

use std::collections::HashMap;

use crate::error::GrammarError;
use crate::symbol_ids::{GrammarSymbol, NonterminalId, ProductionId, TerminalId};

use super::types::{Grammar, Nonterminal, Production, Terminal};

struct RawAlternative {
    symbols: Vec<String>,
    priority: Option<i32>,
    span: std::ops::Range<usize>,
}

struct RawRule {
    name: String,
    alternatives: Vec<RawAlternative>,
}

pub fn parse(source: &str, source_name: &str) -> Result<Grammar, GrammarError> {
    let (root_directive, rules) = parse_lines(source, source_name)?;

    // Pass 1: every LHS name is a nonterminal, in first-occurrence order.
    let mut nt_index: HashMap<String, NonterminalId> = HashMap::new();
    let mut nonterminals = Vec::new();
    for rule in &rules {
        if !nt_index.contains_key(&rule.name) {
            let id = NonterminalId(nonterminals.len() as u32);
            nt_index.insert(rule.name.clone(), id);
            nonterminals.push(Nonterminal::new(rule.name.clone(), id));
        }
    }

    // Pass 2: every other bare name, and every quoted literal, is a terminal,
    // again in first-occurrence order. Index 0 is reserved.
    let mut term_index: HashMap<String, TerminalId> = HashMap::new();
    let mut terminals = vec![Terminal::new("", TerminalId(0))];
    let mut productions = Vec::new();
    let mut productions_by_nonterminal: indexmap::IndexMap<NonterminalId, Vec<ProductionId>> =
        indexmap::IndexMap::new();

    for rule in &rules {
        let owner = nt_index[&rule.name];
        for (alt_idx, alt) in rule.alternatives.iter().enumerate() {
            let mut symbols = Vec::new();
            if !(alt.symbols.len() == 1 && alt.symbols[0] == "0") {
                for tok in &alt.symbols {
                    let sym = if let Some(&nt) = nt_index.get(tok) {
                        GrammarSymbol::Nonterminal(nt)
                    } else {
                        let id = *term_index.entry(tok.clone()).or_insert_with(|| {
                            let id = TerminalId(terminals.len() as u32);
                            terminals.push(Terminal::new(tok.clone(), id));
                            id
                        });
                        GrammarSymbol::Terminal(id)
                    };
                    symbols.push(sym);
                }
            }
            let id = ProductionId(productions.len() as u32);
            let priority = alt.priority.unwrap_or(alt_idx as i32);
            productions.push(Production { id, nonterminal: owner, priority, symbols });
            productions_by_nonterminal.entry(owner).or_default().push(id);
        }
    }

    let root = match root_directive {
        Some(name) => *nt_index.get(&name).ok_or_else(|| GrammarError::Unreachable { name: name.clone() })?,
        None => nonterminals.first().map(|n| n.index).unwrap_or(NonterminalId(0)),
    };

    let nonterminal_scores = vec![0; nonterminals.len()];

    let grammar = Grammar {
        nonterminals,
        terminals,
        productions,
        productions_by_nonterminal,
        nonterminal_scores,
        root,
    };

    super::invariants::validate(&grammar)?;
    Ok(grammar)
}

fn parse_lines(source: &str, source_name: &str) -> Result<(Option<String>, Vec<RawRule>), GrammarError> {
    let mut rules: Vec<RawRule> = Vec::new();
    let mut root_directive = None;
    let mut byte_offset = 0usize;

    for raw_line in source.split_inclusive('\n') {
        let line_start = byte_offset;
        byte_offset += raw_line.len();
        let line = strip_comment(raw_line);
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("%root") {
            root_directive = Some(rest.trim().to_string());
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix('|') {
            let Some(rule) = rules.last_mut() else {
                return Err(syntax_error(
                    "continuation line with no preceding rule",
                    line_start,
                    line_start + trimmed.len(),
                    source,
                    source_name,
                ));
            };
            rule.alternatives.push(parse_alternative(rest, line_start, source)?);
            continue;
        }
        let Some(arrow_pos) = trimmed.find("->") else {
            return Err(syntax_error(
                "expected '->' in rule",
                line_start,
                line_start + trimmed.len(),
                source,
                source_name,
            ));
        };
        let name = trimmed[..arrow_pos].trim().to_string();
        if name.is_empty() {
            return Err(syntax_error("missing nonterminal name", line_start, line_start + arrow_pos, source, source_name));
        }
        let rhs = &trimmed[arrow_pos + 2..];
        let mut alternatives = Vec::new();
        for part in rhs.split('|') {
            alternatives.push(parse_alternative(part, line_start, source)?);
        }
        rules.push(RawRule { name, alternatives });
    }

    Ok((root_directive, rules))
}

fn parse_alternative(text: &str, line_start: usize, _source: &str) -> Result<RawAlternative, GrammarError> {
    let trimmed = text.trim();
    let (body, priority) = match trimmed.rsplit_once('%') {
        Some((body, prio)) if prio.trim().parse::<i32>().is_ok() => {
            (body.trim(), Some(prio.trim().parse().unwrap()))
        }
        _ => (trimmed, None),
    };

    let mut symbols = Vec::new();
    let mut chars = body.char_indices().peekable();
    while let Some(&(i, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        if c == '"' || c == '\'' {
            let quote = c;
            chars.next();
            let start = i;
            let mut end = body.len();
            for (j, cc) in chars.by_ref() {
                if cc == quote {
                    end = j + cc.len_utf8();
                    break;
                }
            }
            symbols.push(body[start..end].to_string());
            continue;
        }
        let start = i;
        let mut end = body.len();
        for (j, cc) in chars.by_ref() {
            if cc.is_whitespace() {
                end = j;
                break;
            }
        }
        symbols.push(body[start..end].to_string());
    }

    Ok(RawAlternative { symbols, priority, span: line_start..line_start + text.len() })
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(i) => &line[..i],
        None => line,
    }
}

fn syntax_error(message: &str, start: usize, end: usize, source: &str, source_name: &str) -> GrammarError {
    GrammarError::Syntax {
        message: message.to_string(),
        span: start..end,
        source_name: source_name.to_string(),
        source_text: source.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol_ids::GrammarSymbol;
    use indoc::indoc;

    #[test]
    fn parses_simple_grammar() {
        let src = indoc! {r#"
            %root Sentence
            Sentence -> Subject Verb
            Subject  -> no_nf
                      | fn_nf
            Verb     -> so_1_þgf
        "#};
        let g = parse(src, "test.grammar").unwrap();
        assert_eq!(g.nonterminal(g.root).name, "Sentence");
        let subj = g
            .nonterminals()
            .iter()
            .find(|n| n.name == "Subject")
            .unwrap();
        assert_eq!(g.productions_of(subj.index).count(), 2);
    }

    #[test]
    fn epsilon_production_has_no_symbols() {
        let src = "Opt -> 0\nRoot -> Opt\n";
        let g = parse(src, "test.grammar").unwrap();
        let opt = g.nonterminals().iter().find(|n| n.name == "Opt").unwrap();
        let prod = g.productions_of(opt.index).next().unwrap();
        assert!(prod.is_epsilon());
    }

    #[test]
    fn literal_terminal_is_quoted() {
        let src = r#"Root -> "og" Root2
Root2 -> no_nf
"#;
        let g = parse(src, "test.grammar").unwrap();
        let root = g.nonterminals().iter().find(|n| n.name == "Root").unwrap();
        let prod = g.productions_of(root.index).next().unwrap();
        let GrammarSymbol::Terminal(t) = prod.symbols[0] else { panic!("expected terminal") };
        assert!(g.terminal(t).is_literal());
    }

    #[test]
    fn rejects_unreachable_nonterminal() {
        let src = "Root -> no_nf\nDead -> so_0\n";
        let err = parse(src, "test.grammar").unwrap_err();
        assert!(matches!(err, GrammarError::Unreachable { .. }));
    }
}
