//! §4.6 pass 2 item 1: lexical preference pairs, keyed by lowercased
//! word. Loaded from a small embedded JSON table rather than hard-coded,
//! per the Design Notes: the reference implementation treats this list
//! as externally tunable data, not algorithm structure.

use std::collections::HashMap;

use serde::Deserialize;

const DEFAULT_PREFERENCES_JSON: &str = include_str!("../../config/preferences.json");

/// One `(worse_first_parts, better_first_parts, factor)` triple.
#[derive(Debug, Deserialize, Clone)]
pub struct PreferenceRule {
    pub worse: Vec<String>,
    pub better: Vec<String>,
    pub factor: i32,
}

/// The full table: lowercased word form -> its preference rules.
#[derive(Debug, Default, Clone)]
pub struct PreferenceTable {
    rules: HashMap<String, Vec<PreferenceRule>>,
}

impl PreferenceTable {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let rules: HashMap<String, Vec<PreferenceRule>> = serde_json::from_str(json)?;
        Ok(PreferenceTable { rules })
    }

    /// The table bundled with this crate (`config/preferences.json`).
    pub fn load_default() -> Self {
        PreferenceTable::from_json(DEFAULT_PREFERENCES_JSON).expect("bundled preferences.json is well-formed")
    }

    pub fn empty() -> Self {
        PreferenceTable::default()
    }

    pub fn rules_for(&self, word: &str) -> &[PreferenceRule] {
        self.rules.get(&word.to_lowercase()).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_table_parses() {
        let table = PreferenceTable::load_default();
        assert!(!table.rules_for("myrti").is_empty());
        assert!(table.rules_for("gluggatjald").is_empty());
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let table = PreferenceTable::from_json(r#"{"fyrir": [{"worse": ["fs_nf"], "better": ["fs_þf"], "factor": 1}]}"#).unwrap();
        assert_eq!(table.rules_for("Fyrir").len(), 1);
    }
}
