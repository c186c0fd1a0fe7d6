//! Builds a compressed dictionary file from plain-text lexicon entries.
//!
//! This is the inverse of [`crate::reader`]'s lookup algorithm: it exists
//! so the on-disk format is testable by round-trip (build -> mmap ->
//! lookup) without depending on a licensed BÍN export being present in
//! this repository.

use std::collections::BTreeMap;
use std::path::Path;

use indexmap::IndexMap;

use crate::error::DictError;
use crate::layout::*;
use crate::trie;

/// One plain-text lexicon line: `stem;word_id;word_class;subclass;word_form;inflection`.
#[derive(Clone, Debug)]
pub struct DictEntry {
    pub word_form: String,
    pub stem: String,
    pub word_id: Option<i32>,
    pub word_class: String,
    pub subclass: String,
    pub inflection: String,
}

impl DictEntry {
    pub fn parse_line(line: &str) -> Option<DictEntry> {
        let fields: Vec<&str> = line.splitn(6, ';').collect();
        let [stem, word_id, word_class, subclass, word_form, inflection] = fields.as_slice() else {
            return None;
        };
        let word_id = if word_id.is_empty() { None } else { word_id.parse().ok() };
        Some(DictEntry {
            word_form: (*word_form).to_string(),
            stem: (*stem).to_string(),
            word_id,
            word_class: (*word_class).to_string(),
            subclass: (*subclass).to_string(),
            inflection: (*inflection).to_string(),
        })
    }
}

fn to_latin1(s: &str) -> Result<Vec<u8>, DictError> {
    s.chars()
        .map(|c| u32::from(c).try_into().map_err(|_| DictError::NotLatin1 { form: s.to_string() }))
        .collect()
}

struct BuildNode {
    value: Option<u32>,
    children: BTreeMap<u8, BuildEdge>,
}

struct BuildEdge {
    fragment: Vec<u8>,
    node: BuildNode,
}

impl BuildNode {
    fn new() -> Self {
        BuildNode { value: None, children: BTreeMap::new() }
    }
}

fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

fn insert(node: &mut BuildNode, suffix: &[u8], value: u32) {
    if suffix.is_empty() {
        node.value = Some(value);
        return;
    }
    let first = suffix[0];
    if let Some(edge) = node.children.get_mut(&first) {
        let common = common_prefix_len(&edge.fragment, suffix);
        if common == edge.fragment.len() {
            insert(&mut edge.node, &suffix[common..], value);
            return;
        }
        let old_edge = node.children.remove(&first).unwrap();
        let (shared, rest_old) = old_edge.fragment.split_at(common);
        let shared = shared.to_vec();
        let mut mid = BuildNode::new();
        mid.children.insert(rest_old[0], BuildEdge { fragment: rest_old.to_vec(), node: old_edge.node });
        let rest_new = &suffix[common..];
        if rest_new.is_empty() {
            mid.value = Some(value);
        } else {
            let mut leaf = BuildNode::new();
            leaf.value = Some(value);
            mid.children.insert(rest_new[0], BuildEdge { fragment: rest_new.to_vec(), node: leaf });
        }
        node.children.insert(first, BuildEdge { fragment: shared, node: mid });
    } else {
        let mut leaf = BuildNode::new();
        leaf.value = Some(value);
        node.children.insert(first, BuildEdge { fragment: suffix.to_vec(), node: leaf });
    }
}

fn serialize(out: &mut Vec<u8>, base: u32, node: &BuildNode, fragment: &[u8], alphabet_index: &BTreeMap<u8, u8>) -> u32 {
    let mut child_offsets = Vec::with_capacity(node.children.len());
    for edge in node.children.values() {
        child_offsets.push(serialize(out, base, &edge.node, &edge.fragment, alphabet_index));
    }
    let idxfn = |b: u8| *alphabet_index.get(&b).unwrap_or(&0);
    let rel = trie::encode_node(out, fragment, node.value, &child_offsets, idxfn);
    base + rel
}

/// Build a compressed dictionary file's bytes from a set of entries.
pub fn build(entries: &[DictEntry]) -> Result<Vec<u8>, DictError> {
    // Intern stems and meanings, in first-occurrence order.
    let mut stems: IndexMap<(Option<i32>, Vec<u8>), u32> = IndexMap::new();
    let mut meanings: IndexMap<(String, String, String), u32> = IndexMap::new();
    let mut forms: IndexMap<Vec<u8>, Vec<(u32, u32)>> = IndexMap::new();
    let mut alphabet_set: std::collections::BTreeSet<u8> = std::collections::BTreeSet::new();

    for e in entries {
        let form_bytes = to_latin1(&e.word_form)?;
        let stem_bytes = to_latin1(&e.stem)?;
        for &b in &form_bytes {
            alphabet_set.insert(b);
        }
        let stem_idx = *stems.entry((e.word_id, stem_bytes)).or_insert_with(|| stems.len() as u32);
        let meaning_idx = *meanings
            .entry((e.word_class.clone(), e.subclass.clone(), e.inflection.clone()))
            .or_insert_with(|| meanings.len() as u32);
        forms.entry(form_bytes).or_default().push((stem_idx, meaning_idx));
    }

    if alphabet_set.len() + 1 >= 128 {
        return Err(DictError::AlphabetOverflow { count: alphabet_set.len() });
    }
    let alphabet: Vec<u8> = alphabet_set.into_iter().collect();
    let alphabet_index: BTreeMap<u8, u8> = alphabet.iter().enumerate().map(|(i, &b)| (b, i as u8 + 1)).collect();

    // Alphabet section.
    let mut alphabet_buf = Vec::new();
    alphabet_buf.extend_from_slice(&ALPHABET_TAG);
    alphabet_buf.extend_from_slice(&(alphabet.len() as u32).to_le_bytes());
    alphabet_buf.extend_from_slice(&alphabet);
    while alphabet_buf.len() % 4 != 0 {
        alphabet_buf.push(0);
    }

    let mappings_base = (HEADER_LEN + alphabet_buf.len()) as u32;

    // Mapping section: one run of DWORDs per distinct form; records each form's
    // absolute starting offset for the trie to use as its leaf value.
    let mut mapping_buf = Vec::new();
    let mut form_offsets: IndexMap<Vec<u8>, u32> = IndexMap::new();
    for (form, readings) in &forms {
        let offset = mappings_base + mapping_buf.len() as u32;
        form_offsets.insert(form.clone(), offset);
        for (i, (stem_idx, meaning_idx)) in readings.iter().enumerate() {
            let mut dword = (stem_idx & MAPPING_STEM_MASK) << MAPPING_STEM_SHIFT | (meaning_idx & MAPPING_MEANING_MASK);
            if i + 1 == readings.len() {
                dword |= MAPPING_LAST_BIT;
            }
            mapping_buf.extend_from_slice(&dword.to_le_bytes());
        }
    }

    // Stems section: [count][offset table][records...]. The offset table is
    // written before the variable-length records so a reader can find it at
    // a fixed position (`stems_offset + 4`) without a second pass.
    let stems_base = mappings_base + mapping_buf.len() as u32;
    let stems_header_len = 4 + stems.len() as u32 * 4;
    let mut stem_records = Vec::new();
    let mut stem_record_offsets = Vec::with_capacity(stems.len());
    for (word_id, stem_bytes) in stems.keys() {
        stem_record_offsets.push(stems_base + stems_header_len + stem_records.len() as u32);
        let start = stem_records.len();
        stem_records.extend_from_slice(&word_id.unwrap_or(0).to_le_bytes());
        stem_records.extend_from_slice(stem_bytes);
        stem_records.push(0);
        let target = pad4(stem_records.len() - start) + start;
        while stem_records.len() < target {
            stem_records.push(0);
        }
    }
    let mut stems_buf = Vec::new();
    stems_buf.extend_from_slice(&(stems.len() as u32).to_le_bytes());
    for off in &stem_record_offsets {
        stems_buf.extend_from_slice(&off.to_le_bytes());
    }
    stems_buf.extend_from_slice(&stem_records);

    // Meanings section: [count][offset table][fixed-size records...].
    let meanings_base = stems_base + stems_buf.len() as u32;
    let meanings_header_len = 4 + meanings.len() as u32 * 4;
    let mut meanings_buf = Vec::new();
    meanings_buf.extend_from_slice(&(meanings.len() as u32).to_le_bytes());
    for i in 0..meanings.len() {
        let offset = meanings_base + meanings_header_len + (i * MEANING_RECORD_LEN) as u32;
        meanings_buf.extend_from_slice(&offset.to_le_bytes());
    }
    for (class, subclass, inflection) in meanings.keys() {
        let mut record = format!("{class} {subclass} {inflection}").into_bytes();
        record.truncate(MEANING_RECORD_LEN);
        record.resize(MEANING_RECORD_LEN, b' ');
        meanings_buf.extend_from_slice(&record);
    }

    let forms_base = meanings_base + meanings_buf.len() as u32;
    let mut root = BuildNode::new();
    for (form, _) in &forms {
        insert(&mut root, form, form_offsets[form]);
    }
    let mut forms_buf = Vec::new();
    let root_offset = serialize(&mut forms_buf, forms_base, &root, &[], &alphabet_index);

    let mut out = Vec::with_capacity(HEADER_LEN + alphabet_buf.len() + mapping_buf.len() + stems_buf.len() + meanings_buf.len() + forms_buf.len());
    out.extend_from_slice(&VERSION);
    for offset in [mappings_base, root_offset, stems_base, meanings_base, (HEADER_LEN) as u32] {
        out.extend_from_slice(&offset.to_le_bytes());
    }
    out.extend_from_slice(&alphabet_buf);
    out.extend_from_slice(&mapping_buf);
    out.extend_from_slice(&stems_buf);
    out.extend_from_slice(&meanings_buf);
    out.extend_from_slice(&forms_buf);

    Ok(out)
}

pub fn build_to_file(entries: &[DictEntry], path: &Path) -> Result<(), DictError> {
    let bytes = build(entries)?;
    std::fs::write(path, bytes).map_err(|source| DictError::Io { path: path.to_path_buf(), source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_semicolon_line() {
        let e = DictEntry::parse_line("hestur;0;kk;alm;hesti;ÞGF ET").unwrap();
        assert_eq!(e.stem, "hestur");
        assert_eq!(e.word_form, "hesti");
        assert_eq!(e.inflection, "ÞGF ET");
    }

    #[test]
    fn rejects_non_latin1_form() {
        let entries = vec![DictEntry {
            word_form: "日本".into(),
            stem: "x".into(),
            word_id: None,
            word_class: "no".into(),
            subclass: "alm".into(),
            inflection: "NF ET".into(),
        }];
        assert!(matches!(build(&entries), Err(DictError::NotLatin1 { .. })));
    }
}
