//! §4.6 pass 2: the verb-argument table, keyed by `stem + "_" +
//! case-signature` (e.g. `lofa_þgf`), giving a bonus or penalty specific
//! to one verb's government of one case pattern. Also answers whether a
//! verb is known to take zero arguments, used by the arity-0 penalty.

use std::collections::HashMap;

const DEFAULT_VERBS_JSON: &str = include_str!("../../config/verbs.json");

#[derive(Debug, Default, Clone)]
pub struct VerbTable {
    scores: HashMap<String, i32>,
}

impl VerbTable {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let scores: HashMap<String, i32> = serde_json::from_str(json)?;
        Ok(VerbTable { scores })
    }

    /// The table bundled with this crate (`config/verbs.json`).
    pub fn load_default() -> Self {
        VerbTable::from_json(DEFAULT_VERBS_JSON).expect("bundled verbs.json is well-formed")
    }

    pub fn empty() -> Self {
        VerbTable::default()
    }

    /// Score for `stem` governing `case_signature` (e.g. `"þgf"`), 0 if
    /// the table has no opinion.
    pub fn score(&self, stem: &str, case_signature: &str) -> i32 {
        if case_signature.is_empty() {
            return 0;
        }
        self.scores.get(&format!("{stem}_{case_signature}")).copied().unwrap_or(0)
    }

    /// Whether `stem` is known to take zero arguments (an impersonal or
    /// intransitive verb listed with no case suffix).
    pub fn declares_zero_args(&self, stem: &str) -> bool {
        self.scores.contains_key(stem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_table_scores_known_verb() {
        let table = VerbTable::load_default();
        assert_eq!(table.score("lofa", "þgf"), 2);
        assert_eq!(table.score("lofa", "þf"), 0);
    }

    #[test]
    fn unknown_verb_scores_zero() {
        let table = VerbTable::empty();
        assert_eq!(table.score("gera", "þf"), 0);
        assert!(!table.declares_zero_args("gera"));
    }
}
